// Client for LEGO Bricks & Pieces (replacement parts) lookups

use crate::config::ClientConfig;
use crate::credentials::LegoCredentials;
use crate::error::ApiError;
use crate::http::{ClientStats, HttpCore};
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};
use tracing::debug;

// The service refuses requests without the age gate cookie
#[derive(Debug, Serialize)]
struct AgeAndCountry<'a> {
    age: &'a str,
    countrycode: &'a str,
}

#[derive(Debug, Clone)]
pub struct LegoClient {
    http: HttpCore,
    cookie: String,
}

impl LegoClient {
    pub fn new(config: ClientConfig, credentials: &LegoCredentials) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpCore::new(config, false)?,
            cookie: age_and_country_cookie(credentials)?,
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.http.stats()
    }

    // Bricks matching an element or design number
    pub async fn get_part(&self, id: &str) -> Result<ProductInformation, ApiError> {
        let url = format!("{}/getitemordesign", self.http.config().lego_base);
        let query = [("itemordesignnumber", id), ("isSalesFlow", "true")];
        self.get(&url, &query, &format!("Part {}", id), &format!("part-{}.json", id))
            .await
    }

    // Every brick of a set
    pub async fn get_set(&self, id: &str) -> Result<ProductInformation, ApiError> {
        let url = format!("{}/getproduct", self.http.config().lego_base);
        let query = [("productnumber", id), ("isSalesFlow", "true")];
        self.get(&url, &query, &format!("Set {}", id), &format!("set-{}.json", id))
            .await
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        tag: &str,
        archive_name: &str,
    ) -> Result<ProductInformation, ApiError> {
        let product: ProductInformation = self
            .http
            .fetch_json(tag, Some(archive_name), |client| {
                client
                    .get(url)
                    .query(query)
                    .header(COOKIE, self.cookie.as_str())
            })
            .await?;
        debug!(tag, bricks = product.bricks.len(), "decoded product");
        Ok(product)
    }
}

pub fn age_and_country_cookie(credentials: &LegoCredentials) -> Result<String, ApiError> {
    let value = serde_json::to_string(&AgeAndCountry {
        age: &credentials.age,
        countrycode: &credentials.country_code,
    })
    .map_err(|e| ApiError::JsonParseError {
        tag: "csAgeAndCountry".to_string(),
        message: e.to_string(),
    })?;
    Ok(format!("csAgeAndCountry={}", value))
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProductInformation {
    pub product: Option<Product>,
    pub bricks: Vec<Brick>,
    #[serde(rename = "ImageBaseUrl")]
    pub image_base_url: String,
    // Shape varies by market; kept as raw JSON
    #[serde(rename = "UnAvailableInformation")]
    pub unavailable_information: serde_json::Value,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Product {
    pub product_no: String,
    pub product_name: String,
    pub item_no: String,
    pub asset: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Brick {
    pub item_no: i64,
    #[serde(rename = "ItemDescr")]
    pub item_description: String,
    #[serde(rename = "ColourLikeDescr")]
    pub color_like_description: String,
    // Upper-case abbreviations, e.g. "BR.RED" or "MED. ST-GREY"
    #[serde(rename = "ColourDescr")]
    pub color_description: String,
    #[serde(rename = "MaingroupDescr")]
    pub maingroup_description: String,
    pub asset: String,
    pub max_qty: i64,
    #[serde(rename = "Ip")]
    pub ip: bool,
    pub price: f64,
    // Currency, empty when the brick has no price
    #[serde(rename = "CId")]
    pub currency_id: String,
    #[serde(rename = "SQty")]
    pub s_qty: i64,
    #[serde(rename = "DesignId")]
    pub design_id: i64,
    pub price_str: String,
    pub price_with_tax_str: String,
    pub item_unavailable: bool,
    pub unavailable_link: Option<UnavailableLink>,
    pub unavailable_reason: Option<UnavailableReason>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UnavailableLink {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UnavailableReason {
    pub reason_text: String,
    pub link_text: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub path: String,
    pub key: String,
    pub has_version: bool,
    pub restricted_markets: Vec<serde_json::Value>,
}
