use super::StoreClient;
use crate::error::ApiError;
use crate::serde_util::string_f64;
use serde::{Deserialize, Serialize};
use std::fmt;

impl StoreClient {
    pub async fn get_item(&self, item_type: ItemType, no: &str) -> Result<CatalogItem, ApiError> {
        self.get(
            &format!("/items/{}/{}", item_type, no),
            &[],
            &format!("Item {} {}", item_type, no),
            &format!("item-{}-{}.json", item_type, no),
        )
        .await
    }

    // Only no, type and thumbnail_url are filled in
    pub async fn get_item_image(
        &self,
        item_type: ItemType,
        no: &str,
        color_id: i64,
    ) -> Result<CatalogItem, ApiError> {
        self.get(
            &format!("/items/{}/{}/images/{}", item_type, no, color_id),
            &[],
            &format!("Item image {} {} {}", item_type, no, color_id),
            &format!("item-image-{}-{}-{}.json", item_type, no, color_id),
        )
        .await
    }

    // Items that include any color of the given item
    pub async fn get_supersets(
        &self,
        item_type: ItemType,
        no: &str,
    ) -> Result<Vec<SupersetEntries>, ApiError> {
        self.get(
            &format!("/items/{}/{}/supersets", item_type, no),
            &[],
            &format!("Supersets {} {}", item_type, no),
            &format!("supersets-{}-{}.json", item_type, no),
        )
        .await
    }

    pub async fn get_supersets_by_color(
        &self,
        item_type: ItemType,
        no: &str,
        color_id: i64,
    ) -> Result<Vec<SupersetEntries>, ApiError> {
        self.get(
            &format!("/items/{}/{}/supersets", item_type, no),
            &[("color_id", color_id.to_string())],
            &format!("Supersets {} {} {}", item_type, no, color_id),
            &format!("supersets-{}-{}-{}.json", item_type, no, color_id),
        )
        .await
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogItem {
    pub no: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub category_id: i64,
    pub alternate_no: String,
    pub image_url: String,
    pub thumbnail_url: String,
    // Grams, two decimal places
    #[serde(with = "string_f64")]
    pub weight: f64,
    #[serde(with = "string_f64")]
    pub dim_x: f64,
    #[serde(with = "string_f64")]
    pub dim_y: f64,
    #[serde(with = "string_f64")]
    pub dim_z: f64,
    pub year_released: i64,
    pub description: String,
    pub is_obsolete: bool,
    pub language_code: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SupersetEntries {
    pub color_id: i64,
    pub entries: Vec<SupersetEntry>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SupersetEntry {
    pub item: CatalogItem,
    // How many of the given item the super item contains
    pub quantity: i64,
    pub appears_as: AppearsAs,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Minifig,
    #[default]
    Part,
    Set,
    Book,
    Gear,
    Catalog,
    Instruction,
    UnsortedLot,
    OriginalBox,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Minifig => "MINIFIG",
            ItemType::Part => "PART",
            ItemType::Set => "SET",
            ItemType::Book => "BOOK",
            ItemType::Gear => "GEAR",
            ItemType::Catalog => "CATALOG",
            ItemType::Instruction => "INSTRUCTION",
            ItemType::UnsortedLot => "UNSORTED_LOT",
            ItemType::OriginalBox => "ORIGINAL_BOX",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
            .map_err(|_| format!("unknown item type `{}`", s))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AppearsAs {
    #[serde(rename = "A")]
    Alternate,
    #[serde(rename = "C")]
    Counterpart,
    #[serde(rename = "E")]
    Extra,
    #[default]
    #[serde(rename = "R")]
    Regular,
}
