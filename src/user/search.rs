use super::{AjaxResponse, ReturnStatus, UserClient};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

const SEARCH_RESULTS_PER_PAGE: u32 = 25;

impl UserClient {
    // Store lots for sale matching `query`, one page of results, 1-based
    pub async fn search_product(&self, query: &str, page: u32) -> Result<SearchProduct, ApiError> {
        let url = format!("{}/ajax/clone/search/searchproduct.ajax", self.config().www_base);
        let params = [
            ("q", query.to_string()),
            ("st", "0".to_string()),
            ("brand", "1000".to_string()),
            ("color", "-1".to_string()),
            ("nosuperlot", "1".to_string()),
            ("showempty", "1".to_string()),
            ("rpp", SEARCH_RESULTS_PER_PAGE.to_string()),
            ("pi", page.to_string()),
        ];
        self.get_ajax(&url, &params, &format!("Search {}", query), None)
            .await
    }

    // Details of one store lot, as shown in the store's item modal
    pub async fn get_store_item(
        &self,
        inv_id: i64,
        store_id: i64,
        wanted_list_ids: &[i64],
    ) -> Result<StoreItem, ApiError> {
        let url = format!("{}/ajax/clone/store/item.ajax", self.config().store_base);
        let ids: Vec<String> = wanted_list_ids.iter().map(|id| id.to_string()).collect();
        let params = [
            ("invID", inv_id.to_string()),
            ("sid", store_id.to_string()),
            ("wantedMoreArrayID", ids.join(",")),
        ];
        self.get_ajax(
            &url,
            &params,
            &format!("Store item {}", inv_id),
            Some(&format!("store-item-{}-{}.json", store_id, inv_id)),
        )
        .await
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchProduct {
    #[serde(rename = "total_count")]
    pub total_count: i64,
    #[serde(rename = "idColor")]
    pub color_id: i64,
    #[serde(rename = "rpp")]
    pub results_per_page: i64,
    #[serde(rename = "pi")]
    pub page_index: i64,
    pub list: Vec<ProductListing>,
    #[serde(flatten)]
    pub status: ReturnStatus,
}

impl AjaxResponse for SearchProduct {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

// Prices are in the store currency unless marked as display prices
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductListing {
    #[serde(rename = "idInv")]
    pub inventory_id: i64,
    #[serde(rename = "strDesc")]
    pub description: String,
    #[serde(rename = "codeNew")]
    pub new_or_used: String,
    #[serde(rename = "codeComplete")]
    pub completeness: String,
    #[serde(rename = "n4Qty")]
    pub quantity: i64,
    #[serde(rename = "idColor")]
    pub color_id: i64,
    #[serde(rename = "idColorDefault")]
    pub color_id_default: i64,
    #[serde(rename = "strColor")]
    pub color: String,
    // Image uploaded by the seller
    #[serde(rename = "strInvImgUrl")]
    pub image_url: String,
    #[serde(rename = "idInvImg")]
    pub image_id: i64,
    #[serde(rename = "typeInvImg")]
    pub image_type: String,
    #[serde(rename = "typeImgDefault")]
    pub image_type_default: String,
    #[serde(rename = "hasExtendedDescription")]
    pub has_extended_description: i64,
    #[serde(rename = "instantCheckout")]
    pub instant_checkout: bool,
    #[serde(rename = "mInvSalePrice")]
    pub sale_price: String,
    #[serde(rename = "mDisplaySalePrice")]
    pub sale_price_display: String,
    #[serde(rename = "nSalePct")]
    pub sale_percent: i64,
    #[serde(rename = "nTier1Qty")]
    pub tier1_quantity: i64,
    #[serde(rename = "nTier2Qty")]
    pub tier2_quantity: i64,
    #[serde(rename = "nTier3Qty")]
    pub tier3_quantity: i64,
    #[serde(rename = "nTier1InvPrice")]
    pub tier1_price: String,
    #[serde(rename = "nTier2InvPrice")]
    pub tier2_price: String,
    #[serde(rename = "nTier3InvPrice")]
    pub tier3_price: String,
    #[serde(rename = "strCategory")]
    pub category: String,
    #[serde(rename = "strStorename")]
    pub store_name: String,
    #[serde(rename = "idCurrencyStore")]
    pub store_currency_id: i64,
    #[serde(rename = "mMinBuy")]
    pub min_buy: String,
    #[serde(rename = "strSellerUsername")]
    pub seller_username: String,
    #[serde(rename = "n4SellerFeedbackScore")]
    pub seller_feedback_score: i64,
    #[serde(rename = "strSellerCountryName")]
    pub seller_country_name: String,
    #[serde(rename = "strSellerCountryCode")]
    pub seller_country_code: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreItem {
    #[serde(rename = "invID")]
    pub inventory_id: i64,
    pub description: String,
    #[serde(rename = "extDescription")]
    pub extended_description: String,
    #[serde(rename = "invQty")]
    pub inventory_quantity: i64,
    #[serde(rename = "invBulk")]
    pub inventory_bulk: i64,
    #[serde(rename = "invSale")]
    pub inventory_sale: i64,
    #[serde(rename = "itemType")]
    pub item_type: String,
    // "N" or "U"
    #[serde(rename = "invNew")]
    pub inventory_new: String,
    #[serde(rename = "colorID")]
    pub color_id: i64,
    #[serde(rename = "colorName")]
    pub color_name: String,
    #[serde(rename = "colorHex")]
    pub color_hex: String,
    #[serde(rename = "invDate")]
    pub inventory_date: String,
    #[serde(rename = "itemNo")]
    pub item_no: String,
    #[serde(rename = "itemSeq")]
    pub item_seq: i64,
    #[serde(rename = "itemID")]
    pub item_id: i64,
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemStatus")]
    pub item_status: String,
    #[serde(rename = "itemBrand")]
    pub item_brand: i64,
    #[serde(rename = "invComplete")]
    pub inventory_complete: String,
    #[serde(rename = "nativePrice")]
    pub native_price: String,
    #[serde(rename = "salePrice")]
    pub sale_price: String,
    #[serde(rename = "invPrice")]
    pub inventory_price: String,
    #[serde(rename = "invTierQty1")]
    pub tier1_quantity: i64,
    #[serde(rename = "invTierQty2")]
    pub tier2_quantity: i64,
    #[serde(rename = "invTierQty3")]
    pub tier3_quantity: i64,
    #[serde(rename = "invTierPrice1")]
    pub tier1_price: String,
    #[serde(rename = "invTierPrice2")]
    pub tier2_price: String,
    #[serde(rename = "invTierPrice3")]
    pub tier3_price: String,
    #[serde(rename = "cartQty")]
    pub cart_quantity: i64,
    #[serde(rename = "cartBindQty")]
    pub cart_bind_quantity: i64,
    #[serde(rename = "invImgID")]
    pub inventory_image_id: i64,
    #[serde(rename = "invImgType")]
    pub inventory_image_type: String,
    #[serde(rename = "imgURL")]
    pub image_url: String,
    #[serde(rename = "largeImgs")]
    pub large_images: Vec<LargeImage>,
    #[serde(rename = "catInfo")]
    pub category_info: Vec<StoreItemCategory>,
    #[serde(rename = "newLotIDLink")]
    pub new_lot_id_link: i64,
    #[serde(rename = "usedLotIDLink")]
    pub used_lot_id_link: i64,
    #[serde(rename = "colorItems")]
    pub color_items: Vec<ColorItem>,
    pub wanted: Wanted,
    #[serde(rename = "cartErrorMsg")]
    pub cart_error_message: String,
    #[serde(flatten)]
    pub status: ReturnStatus,
}

impl AjaxResponse for StoreItem {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreItemCategory {
    #[serde(rename = "catID")]
    pub category_id: i64,
    #[serde(rename = "catName")]
    pub category_name: String,
    #[serde(rename = "catLevel")]
    pub category_level: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LargeImage {
    #[serde(rename = "idImg")]
    pub image_id: i64,
    #[serde(rename = "strUrlS")]
    pub url_small: String,
    #[serde(rename = "strUrlL")]
    pub url_large: String,
    #[serde(rename = "idColor")]
    pub color_id: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorItem {
    #[serde(rename = "invID")]
    pub inventory_id: i64,
    #[serde(rename = "colorID")]
    pub color_id: i64,
    #[serde(rename = "colorHex")]
    pub color_hex: String,
    #[serde(rename = "colorName")]
    pub color_name: String,
}

// How the lot relates to the viewer's wanted lists
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Wanted {
    pub lists: Vec<WantedListSummary>,
    #[serde(rename = "wantedMoreName")]
    pub wanted_list_name: String,
    #[serde(rename = "wantedRemarks")]
    pub remarks: String,
    #[serde(rename = "wantedPrice")]
    pub price: String,
    #[serde(rename = "wantedQty")]
    pub quantity: i64,
    #[serde(rename = "wantedQtyFilled")]
    pub quantity_filled: i64,
    #[serde(rename = "wantedQtyHasAll")]
    pub has_all: bool,
    #[serde(rename = "qtyWarn")]
    pub quantity_warn: bool,
    #[serde(rename = "priceWarn")]
    pub price_warn: bool,
    #[serde(rename = "wantedListCnt")]
    pub wanted_list_count: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WantedListSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub remarks: String,
    pub condition: String,
    #[serde(rename = "qty")]
    pub quantity: i64,
    #[serde(rename = "qtyFilled")]
    pub quantity_filled: i64,
    #[serde(rename = "qtyWarn")]
    pub quantity_warn: bool,
    pub price: String,
    #[serde(rename = "priceWarn")]
    pub price_warn: bool,
}
