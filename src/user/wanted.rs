use super::{AjaxResponse, ReturnStatus, UserClient};
use crate::error::ApiError;
use crate::report::WantedListSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// Wanted list 0 is the account's default list; its page also indexes the other lists
pub const DEFAULT_WANTED_LIST: i64 = 0;

impl UserClient {
    // One page of a wanted list, 1-based
    pub async fn get_wanted_list(&self, id: i64, page: u32) -> Result<WantedListResults, ApiError> {
        let url = format!("{}/ajax/clone/wanted/search2.ajax", self.config().www_base);
        let query = [
            ("wantedMoreID", id.to_string()),
            ("pageSize", self.config().wanted_page_size.to_string()),
            ("pg", page.to_string()),
        ];
        let response: WantedListResponse = self
            .get_ajax(
                &url,
                &query,
                &format!("Wanted List {}", id),
                Some(&format!("wl-{}-{}.json", id, page)),
            )
            .await?;
        Ok(response.results)
    }

    // Every page of a wanted list, with the items of all pages merged into the first
    pub async fn get_wanted_list_all(&self, id: i64) -> Result<WantedListResults, ApiError> {
        let mut results = self.get_wanted_list(id, 1).await?;
        let mut page = 1;

        while (results.wanted_items.len() as i64) < results.total_results {
            page += 1;
            let next = self.get_wanted_list(id, page).await?;
            if next.wanted_items.is_empty() {
                debug!(id, page, "wanted list ended before its reported total");
                break;
            }
            results.wanted_items.extend(next.wanted_items);
        }

        info!(
            id,
            pages = page,
            items = results.wanted_items.len(),
            "fetched wanted list"
        );
        Ok(results)
    }

    // Names and ids of every wanted list of the account
    pub async fn get_wanted_lists(&self) -> Result<Vec<WantedList>, ApiError> {
        let results = self.get_wanted_list(DEFAULT_WANTED_LIST, 1).await?;
        Ok(results.wanted_lists)
    }
}

#[async_trait]
impl WantedListSource for UserClient {
    async fn wanted_lists(&self) -> Result<Vec<WantedList>, ApiError> {
        self.get_wanted_lists().await
    }

    async fn wanted_items(&self, list_id: i64) -> Result<Vec<WantedItem>, ApiError> {
        Ok(self.get_wanted_list_all(list_id).await?.wanted_items)
    }

    fn max_concurrent_requests(&self) -> usize {
        self.config().max_concurrent_requests
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct WantedListResponse {
    results: WantedListResults,
    #[serde(flatten)]
    status: ReturnStatus,
}

impl AjaxResponse for WantedListResponse {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WantedListResults {
    #[serde(rename = "itemOptions")]
    pub item_options: ItemOptions,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    #[serde(rename = "lists")]
    pub wanted_lists: Vec<WantedList>,
    #[serde(rename = "wantedItems")]
    pub wanted_items: Vec<WantedItem>,
    #[serde(rename = "categories")]
    pub category_groups: Vec<CategoryGroup>,
    #[serde(rename = "totalCnt")]
    pub item_count: i64,
    #[serde(rename = "wantedListInfo")]
    pub wanted_list_info: WantedListInfo,
    #[serde(rename = "searchMode")]
    pub search_mode: i64,
    #[serde(rename = "emptySearch")]
    pub empty_search: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemOptions {
    #[serde(rename = "showStores")]
    pub show_stores: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WantedList {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WantedItem {
    #[serde(rename = "wantedID")]
    pub wanted_id: i64,
    #[serde(rename = "wantedMoreID")]
    pub wanted_list_id: i64,
    #[serde(rename = "wantedMoreName")]
    pub wanted_list_name: String,
    #[serde(rename = "itemNo")]
    pub item_no: String,
    #[serde(rename = "itemID")]
    pub item_id: i64,
    #[serde(rename = "itemSeq")]
    pub item_seq: i64,
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemType")]
    pub item_type: ItemTypeCode,
    #[serde(rename = "itemBrand")]
    pub item_brand: i64,
    #[serde(rename = "imgURL")]
    pub image_url: String,
    #[serde(rename = "wantedQty")]
    pub wanted_qty: i64,
    #[serde(rename = "wantedQtyFilled")]
    pub wanted_qty_filled: i64,
    #[serde(rename = "wantedNew")]
    pub condition: WantedCondition,
    #[serde(rename = "wantedNotify")]
    pub notify: WantedNotify,
    #[serde(rename = "wantedRemark")]
    pub remark: Option<String>,
    // -1 when no maximum price is set
    #[serde(rename = "wantedPrice")]
    pub wanted_price: f64,
    #[serde(rename = "formatWantedPrice")]
    pub format_wanted_price: String,
    #[serde(rename = "colorID")]
    pub color_id: i64,
    #[serde(rename = "colorName")]
    pub color_name: String,
    #[serde(rename = "colorHex")]
    pub color_hex: String,
}

impl WantedItem {
    // Quantity still missing, never negative
    pub fn remaining_qty(&self) -> i64 {
        (self.wanted_qty - self.wanted_qty_filled).max(0)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WantedListInfo {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "num")]
    pub item_count: i64,
    pub id: i64,
    #[serde(rename = "curSymbol")]
    pub currency_symbol: String,
    #[serde(rename = "progress")]
    pub completion: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryGroup {
    #[serde(rename = "type")]
    pub item_type: ItemTypeCode,
    #[serde(rename = "cats")]
    pub categories: Vec<CategoryInfo>,
    pub total: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryInfo {
    #[serde(rename = "catName")]
    pub category_name: String,
    #[serde(rename = "catID")]
    pub category_id: i64,
    #[serde(rename = "cnt")]
    pub count: i64,
    #[serde(rename = "invCnt")]
    pub inventory_count: i64,
}

// Single-letter item types used by the website
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ItemTypeCode {
    #[serde(rename = "S")]
    Set,
    #[default]
    #[serde(rename = "P")]
    Part,
    #[serde(rename = "M")]
    Minifig,
    #[serde(rename = "B")]
    Book,
    #[serde(rename = "G")]
    Gear,
    #[serde(rename = "C")]
    Catalog,
    #[serde(rename = "I")]
    Instruction,
    #[serde(rename = "O")]
    OriginalBox,
    #[serde(rename = "U")]
    CustomItem,
}

impl ItemTypeCode {
    pub fn code(&self) -> char {
        match self {
            ItemTypeCode::Set => 'S',
            ItemTypeCode::Part => 'P',
            ItemTypeCode::Minifig => 'M',
            ItemTypeCode::Book => 'B',
            ItemTypeCode::Gear => 'G',
            ItemTypeCode::Catalog => 'C',
            ItemTypeCode::Instruction => 'I',
            ItemTypeCode::OriginalBox => 'O',
            ItemTypeCode::CustomItem => 'U',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'S' => Some(ItemTypeCode::Set),
            'P' => Some(ItemTypeCode::Part),
            'M' => Some(ItemTypeCode::Minifig),
            'B' => Some(ItemTypeCode::Book),
            'G' => Some(ItemTypeCode::Gear),
            'C' => Some(ItemTypeCode::Catalog),
            'I' => Some(ItemTypeCode::Instruction),
            'O' => Some(ItemTypeCode::OriginalBox),
            'U' => Some(ItemTypeCode::CustomItem),
            _ => None,
        }
    }

    // Display name; gear has no plural form
    pub fn name(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (ItemTypeCode::Part, false) => "Part",
            (ItemTypeCode::Part, true) => "Parts",
            (ItemTypeCode::Set, false) => "Set",
            (ItemTypeCode::Set, true) => "Sets",
            (ItemTypeCode::Minifig, false) => "Minifig",
            (ItemTypeCode::Minifig, true) => "Minifigs",
            (ItemTypeCode::Gear, _) => "Gear",
            (ItemTypeCode::Instruction, false) => "Instruction",
            (ItemTypeCode::Instruction, true) => "Instructions",
            (ItemTypeCode::OriginalBox, false) => "Original Box",
            (ItemTypeCode::OriginalBox, true) => "Original Boxes",
            (ItemTypeCode::Catalog, false) => "Catalog",
            (ItemTypeCode::Catalog, true) => "Catalogs",
            (ItemTypeCode::Book, false) => "Book",
            (ItemTypeCode::Book, true) => "Books",
            (ItemTypeCode::CustomItem, false) => "Custom Item",
            (ItemTypeCode::CustomItem, true) => "Custom Items",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WantedCondition {
    #[default]
    #[serde(rename = "X")]
    Any,
    #[serde(rename = "N")]
    New,
    #[serde(rename = "U")]
    Used,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WantedNotify {
    #[serde(rename = "Y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock_server::{CannedResponse, MockServer};
    use crate::user::tests::test_client;
    use test_case::test_case;

    fn page(total: i64, items: &[(&str, i64)]) -> String {
        let items: Vec<String> = items
            .iter()
            .map(|(no, color)| {
                format!(
                    r#"{{"wantedID": 1, "wantedMoreID": 7, "wantedMoreName": "MOC", "itemNo": "{}", "itemType": "P",
                        "wantedQty": 4, "wantedQtyFilled": 1, "wantedNew": "X", "wantedNotify": "N",
                        "wantedRemark": null, "wantedPrice": -1.0, "colorID": {}}}"#,
                    no, color
                )
            })
            .collect();
        format!(
            r#"{{"results": {{"totalResults": {}, "lists": [{{"id": 7, "name": "MOC"}}],
                "wantedItems": [{}], "wantedListInfo": {{"name": "MOC", "id": 7, "num": {}}}}},
                "returnCode": 0, "returnMessage": "OK", "errorTicket": 0, "procssingTime": 3}}"#,
            total,
            items.join(","),
            total
        )
    }

    #[tokio::test]
    async fn test_get_wanted_list_page() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(&page(2, &[("3001", 11), ("3023", 5)])));

        let client = test_client(&server);
        let results = client.get_wanted_list(7, 1).await.unwrap();

        assert_eq!(results.total_results, 2);
        assert_eq!(results.wanted_items.len(), 2);
        let item = &results.wanted_items[0];
        assert_eq!(item.item_no, "3001");
        assert_eq!(item.item_type, ItemTypeCode::Part);
        assert_eq!(item.remaining_qty(), 3);
        assert_eq!(item.remark, None);

        let request = &server.requests()[0];
        assert_eq!(request.path(), "/ajax/clone/wanted/search2.ajax");
        assert_eq!(request.query_param("wantedMoreID").as_deref(), Some("7"));
        assert_eq!(request.query_param("pageSize").as_deref(), Some("100"));
        assert_eq!(request.query_param("pg").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_wanted_lists_come_from_the_default_list() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(
            r#"{"results": {"totalResults": 0, "wantedItems": [],
                "lists": [{"id": 0, "name": "Main"}, {"id": 7, "name": "[LOOSE] Bin"}]},
                "returnCode": 0, "returnMessage": "OK"}"#,
        ));

        let client = test_client(&server);
        let lists = client.get_wanted_lists().await.unwrap();

        let ids: Vec<i64> = lists.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![DEFAULT_WANTED_LIST, 7]);
        assert_eq!(lists[0].name, "Main");
        let request = &server.requests()[0];
        assert_eq!(request.query_param("wantedMoreID").as_deref(), Some("0"));
        assert_eq!(request.query_param("pg").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_get_wanted_list_all_walks_pages() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(&page(3, &[("3001", 11), ("3023", 5)])));
        server.enqueue(CannedResponse::json(&page(3, &[("3069b", 1)])));

        let client = test_client(&server);
        let results = client.get_wanted_list_all(7).await.unwrap();

        let numbers: Vec<&str> = results
            .wanted_items
            .iter()
            .map(|i| i.item_no.as_str())
            .collect();
        assert_eq!(numbers, vec!["3001", "3023", "3069b"]);
        assert_eq!(server.requests().len(), 2);
        assert_eq!(server.requests()[1].query_param("pg").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_get_wanted_list_all_stops_on_empty_page() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(&page(10, &[("3001", 11)])));
        server.enqueue(CannedResponse::json(&page(10, &[])));

        let client = test_client(&server);
        let results = client.get_wanted_list_all(7).await.unwrap();
        assert_eq!(results.wanted_items.len(), 1);
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_non_zero_return_code_is_an_error() {
        let server = MockServer::start().await;
        server.enqueue(CannedResponse::json(
            r#"{"returnCode": -2, "returnMessage": "Login required"}"#,
        ));

        let client = test_client(&server);
        let err = client.get_wanted_list(7, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::ReturnCode { code: -2, .. }));
    }

    #[test_case(ItemTypeCode::Part, false, "Part")]
    #[test_case(ItemTypeCode::OriginalBox, true, "Original Boxes")]
    #[test_case(ItemTypeCode::Gear, true, "Gear")]
    #[test_case(ItemTypeCode::CustomItem, true, "Custom Items")]
    fn test_item_type_names(item_type: ItemTypeCode, plural: bool, expected: &str) {
        assert_eq!(item_type.name(plural), expected);
    }

    #[test]
    fn test_item_type_codes() {
        assert_eq!(ItemTypeCode::from_code('o'), Some(ItemTypeCode::OriginalBox));
        assert_eq!(ItemTypeCode::from_code('Z'), None);
        assert_eq!(ItemTypeCode::Instruction.code(), 'I');
    }

    #[test]
    fn test_remaining_qty_never_negative() {
        let item = WantedItem {
            wanted_qty: 2,
            wanted_qty_filled: 5,
            ..WantedItem::default()
        };
        assert_eq!(item.remaining_qty(), 0);
    }
}
