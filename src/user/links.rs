//! URL builders mirroring the website's own client-side link helpers.
//!
//! Links are protocol-relative (`//host/...`) like the ones the website
//! renders, except the login URL which always uses https.

use super::wanted::ItemTypeCode;
use crate::store::oauth::encode;
use rand::Rng;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    Www,
    Alpha,
    Img,
    Static,
    Store,
}

pub fn bl_host(host_type: HostType) -> &'static str {
    match host_type {
        HostType::Www | HostType::Alpha => "www.bricklink.com",
        HostType::Img => "img.bricklink.com",
        HostType::Static => "static.bricklink.com",
        HostType::Store => "store.bricklink.com",
    }
}

pub fn catalog_item_page_url(item_id: i64) -> String {
    format!(
        "//{}/v2/catalog/catalogitem.page?id={}",
        bl_host(HostType::Www),
        item_id
    )
}

pub fn catalog_item_page_url_with_color(item_id: i64, color_id: i64) -> String {
    format!(
        "//{}/v2/catalog/catalogitem.page?id={}&idColor={}",
        bl_host(HostType::Www),
        item_id,
        color_id
    )
}

// Sets, instructions and boxes carry a sequence suffix, e.g. S=75159-1
pub fn catalog_item_page_url_by_item_no(item_type: ItemTypeCode, item_no: &str, item_seq: i64) -> String {
    let seq = match item_type {
        ItemTypeCode::Set | ItemTypeCode::Instruction | ItemTypeCode::OriginalBox => {
            format!("-{}", item_seq)
        }
        _ => String::new(),
    };
    format!(
        "//{}/v2/catalog/catalogitem.page?{}={}{}",
        bl_host(HostType::Www),
        item_type.code(),
        item_no,
        seq
    )
}

pub fn catalog_items_for_sale_page_url(item_id: i64, color_id: i64) -> String {
    format!("{}#T=S", catalog_item_page_url_with_color(item_id, color_id))
}

pub fn news_page_url(message_id: i64) -> String {
    format!(
        "//{}/v2/community/newsview.page?msgid={}",
        bl_host(HostType::Www),
        message_id
    )
}

pub fn store_url(seller_username: &str) -> String {
    format!("//{}/{}", bl_host(HostType::Store), seller_username)
}

pub fn store_url_by_id(seller_id: i64) -> String {
    format!("//{}/store/home.page?sid={}", bl_host(HostType::Www), seller_id)
}

pub fn store_inv_url(seller_username: &str, inv_id: i64) -> String {
    format!("{}?itemID={}", store_url(seller_username), inv_id)
}

pub fn store_inv_url_by_id(seller_id: i64, inv_id: i64) -> String {
    format!("{}&itemID={}", store_url_by_id(seller_id), inv_id)
}

pub fn store_cart_url(seller_username: &str) -> String {
    format!("{}#/cart", store_url(seller_username))
}

pub fn store_checkout_url(seller_username: &str) -> String {
    format!("{}#/checkout", store_url(seller_username))
}

pub fn store_cart_url_by_id(seller_id: i64) -> String {
    format!("{}#/cart", store_url_by_id(seller_id))
}

pub fn store_feedback_url(seller_username: &str) -> String {
    format!(
        "//{}/store/home.page?p={}#/feedback",
        bl_host(HostType::Www),
        seller_username
    )
}

/// Filter state of the store front, serialized into the `o=` fragment.
///
/// Unset fields are left out of the JSON. The 0/1 flags follow the website:
/// for `exclude_*` and `only_custom_items`, 0 shows, 1 hides and 2 shows only
/// those lots.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StoreOptions {
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    // 1 name, 2 number, 3 condition, 4 color, 6 price, 7 quantity, 8 sale, 9 date added
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<u8>,
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub descending: Option<u8>,
    #[serde(rename = "pgSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(rename = "pg", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "itemTypeFilter", skip_serializing_if = "Option::is_none")]
    pub item_type_filter: Option<ItemTypeCode>,
    #[serde(rename = "catIDFilter", skip_serializing_if = "Option::is_none")]
    pub category_id_filter: Option<String>,
    #[serde(rename = "colorIDFilter", skip_serializing_if = "Option::is_none")]
    pub color_id_filter: Option<String>,
    // Comma separated
    #[serde(rename = "wantedMoreArrayID", skip_serializing_if = "Option::is_none")]
    pub wanted_list_ids: Option<String>,
    #[serde(rename = "bOnSale", skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<u8>,
    #[serde(rename = "bOnlyCustomItems", skip_serializing_if = "Option::is_none")]
    pub only_custom_items: Option<u8>,
    #[serde(rename = "bExcludeSuperLot", skip_serializing_if = "Option::is_none")]
    pub exclude_superlot: Option<u8>,
    #[serde(rename = "bExcludeTiered", skip_serializing_if = "Option::is_none")]
    pub exclude_tiered: Option<u8>,
    #[serde(rename = "bExcludeBulk", skip_serializing_if = "Option::is_none")]
    pub exclude_bulk: Option<u8>,
    // "N" or "U"
    #[serde(rename = "invNew", skip_serializing_if = "Option::is_none")]
    pub inventory_new: Option<String>,
    #[serde(rename = "bOnWantedList", skip_serializing_if = "Option::is_none")]
    pub on_wanted_list: Option<u8>,
    // Hide lots whose have quantity already covers the want
    #[serde(rename = "bHideHaveMore", skip_serializing_if = "Option::is_none")]
    pub hide_have_more: Option<u8>,
}

pub fn store_shop_url(seller_username: &str, options: &StoreOptions) -> String {
    let json = serde_json::to_string(options).unwrap_or_else(|e| {
        warn!(error = %e, "cannot serialize store options");
        String::from("{}")
    });
    format!("{}#/shop?o={}", store_url(seller_username), json)
}

// Store front filtered to lots on the given wanted lists
pub fn store_wanted_list_url(seller_username: &str, wanted_list_ids: &[i64]) -> String {
    let ids: Vec<String> = wanted_list_ids.iter().map(|id| id.to_string()).collect();
    let options = StoreOptions {
        wanted_list_ids: Some(ids.join(",")),
        on_wanted_list: Some(1),
        ..StoreOptions::default()
    };
    store_shop_url(seller_username, &options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSize {
    Small,
    Medium,
    Large,
}

impl FlagSize {
    fn letter(&self) -> char {
        match self {
            FlagSize::Small => 'S',
            FlagSize::Medium => 'M',
            FlagSize::Large => 'L',
        }
    }
}

pub fn country_flag_url(country_id: &str, size: FlagSize) -> String {
    format!(
        "//{}/Images/Flags{}/{}.gif",
        bl_host(HostType::Img),
        size.letter(),
        country_id
    )
}

pub fn login_url(log_in_to: &str) -> String {
    format!(
        "https://{}/v2/login.page?logInTo={}",
        bl_host(HostType::Www),
        encode(log_in_to)
    )
}

pub fn default_store_logo_url() -> String {
    format!(
        "//{}/clone/img/store-default-image.png",
        bl_host(HostType::Static)
    )
}

// Upper bounds (exclusive) of each feedback icon tier
const FEEDBACK_TIERS: [i64; 10] = [10, 50, 100, 500, 1000, 2500, 5000, 10000, 25000, 50000];

pub fn feedback_icon_url(score: i64) -> String {
    let index = FEEDBACK_TIERS
        .iter()
        .position(|&limit| score < limit)
        .unwrap_or(FEEDBACK_TIERS.len());
    format!(
        "//{}/clone/img/feedback_{:03}.png",
        bl_host(HostType::Static),
        index
    )
}

// Four random hex digits
fn rand_2_byte() -> String {
    format!("{:04x}", rand::thread_rng().gen::<u16>())
}

/// Message id in the website's format: the current time in milliseconds as
/// hex, right-padded with zeros to 16 digits, then 16 random hex digits.
pub fn create_mid() -> String {
    let ms = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let mut time = format!("{:x}", ms);
    time.push_str("0000000000000000");
    time.truncate(16);
    format!(
        "{}-{}{}{}{}",
        time,
        rand_2_byte(),
        rand_2_byte(),
        rand_2_byte(),
        rand_2_byte()
    )
}
