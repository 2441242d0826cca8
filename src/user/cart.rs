use super::{AjaxResponse, ReturnStatus, UserClient};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use tracing::warn;

impl UserClient {
    // Add store lots to the cart of seller `sid`
    pub async fn add_to_cart(
        &self,
        sid: &str,
        items: &[CartItemSimple],
    ) -> Result<AddToCartResponse, ApiError> {
        let url = format!("{}/ajax/clone/cart/add.ajax", self.config().www_base);
        let item_array = serde_json::to_string(items).map_err(|e| ApiError::JsonParseError {
            tag: "Add to cart".to_string(),
            message: e.to_string(),
        })?;
        let form = [("itemArray", item_array), ("sid", sid.to_string())];

        let response: AddToCartResponse = self.post_ajax(&url, &form, "Add to cart").await?;
        for status in response.item_return_status.iter().filter(|s| s.code != "OK") {
            warn!(inv_id = status.inventory_id, code = %status.code, message = %status.message, "lot not added to cart");
        }
        Ok(response)
    }

    // Summary of every store cart of the logged-in user
    pub async fn get_global_cart(&self) -> Result<CartInfo, ApiError> {
        let url = format!("{}/ajax/renovate/getglobalcart.ajax", self.config().www_base);
        self.get_ajax(&url, &[], "Global cart", None).await
    }

    // Checkout conditions for one store cart; `key` comes from the global cart
    pub async fn get_checkout_info(
        &self,
        seller_id: i64,
        key: &str,
    ) -> Result<CheckoutInfo, ApiError> {
        let url = format!("{}/ajax/clone/store/preparecheckout.ajax", self.config().www_base);
        let query = [
            ("action", "conditions".to_string()),
            ("sid", seller_id.to_string()),
            ("key", key.to_string()),
            ("checkPaypal", "0".to_string()),
        ];
        self.get_ajax(
            &url,
            &query,
            &format!("Checkout info {}", seller_id),
            Some(&format!("checkout-info-{}.json", seller_id)),
        )
        .await
    }
}

// Minimal lot description accepted by add.ajax
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct CartItemSimple {
    #[serde(rename = "invID")]
    pub inventory_id: i64,
    #[serde(rename = "invQty")]
    pub quantity: String,
    #[serde(rename = "sellerID")]
    pub seller_id: i64,
    #[serde(rename = "sourceType")]
    pub source_type: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AddToCartResponse {
    pub errors: i64,
    #[serde(rename = "itemReturnStatus")]
    pub item_return_status: Vec<ItemReturnStatus>,
    pub carts: Vec<StoreCart>,
    #[serde(rename = "totStoreCartCnt")]
    pub total_store_cart_count: i64,
    #[serde(rename = "cartItemErrorCode")]
    pub cart_item_error_code: i64,
    #[serde(flatten)]
    pub status: ReturnStatus,
}

impl AjaxResponse for AddToCartResponse {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemReturnStatus {
    #[serde(rename = "invID")]
    pub inventory_id: i64,
    pub code: String,
    #[serde(rename = "msg")]
    pub message: String,
    pub sid: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreCart {
    #[serde(rename = "sellerID")]
    pub seller_id: i64,
    #[serde(rename = "vatPct")]
    pub vat_pct: i64,
    #[serde(rename = "sellerName")]
    pub seller_name: String,
    #[serde(rename = "storeName")]
    pub store_name: String,
    #[serde(rename = "countryID")]
    pub country_id: String,
    pub feedback: i64,
    #[serde(rename = "current_cart")]
    pub current_cart: CartItems,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CartItems {
    pub items: Vec<CartItemDetail>,
    pub superlots: Vec<String>,
    #[serde(rename = "totalItems")]
    pub total_items: i64,
    #[serde(rename = "totalLots")]
    pub total_lots: i64,
    #[serde(rename = "totalPrice")]
    pub total_price: String,
    #[serde(rename = "totalNativePrice")]
    pub total_native_price: String,
    #[serde(rename = "totalWarnings")]
    pub total_warnings: i64,
    #[serde(rename = "totalNativePriceRaw")]
    pub total_native_price_raw: String,
    #[serde(rename = "totalWeightGrams")]
    pub total_weight_grams: String,
    #[serde(rename = "totalWeightOunces")]
    pub total_weight_ounces: String,
    #[serde(rename = "weightUnknownLots")]
    pub weight_unknown_lots: i64,
    #[serde(rename = "aveLotPrice")]
    pub average_lot_price: String,
}

// Prices are preformatted strings such as "US $0.12"
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CartItemDetail {
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "invDescription")]
    pub inventory_description: String,
    #[serde(rename = "invID")]
    pub inventory_id: i64,
    #[serde(rename = "invQty")]
    pub inventory_quantity: i64,
    #[serde(rename = "bulkQty")]
    pub bulk_quantity: i64,
    #[serde(rename = "superlotID")]
    pub superlot_id: i64,
    #[serde(rename = "superlotQty")]
    pub superlot_quantity: i64,
    #[serde(rename = "salePercent")]
    pub sale_percent: i64,
    #[serde(rename = "itemType")]
    pub item_type: String,
    #[serde(rename = "itemBrand")]
    pub item_brand: i64,
    #[serde(rename = "invNew")]
    pub inventory_condition: String,
    #[serde(rename = "invComplete")]
    pub inventory_complete: String,
    #[serde(rename = "colorID")]
    pub color_id: i64,
    #[serde(rename = "colorName")]
    pub color_name: String,
    #[serde(rename = "itemNo")]
    pub item_no: String,
    #[serde(rename = "itemSeq")]
    pub item_seq: i64,
    #[serde(rename = "itemID")]
    pub item_id: i64,
    #[serde(rename = "itemStatus")]
    pub item_status: String,
    #[serde(rename = "smallImg")]
    pub small_image: String,
    #[serde(rename = "largeImg")]
    pub large_image: String,
    #[serde(rename = "nativePrice")]
    pub native_price: String,
    #[serde(rename = "salePrice")]
    pub sale_price: String,
    #[serde(rename = "invPrice")]
    pub inventory_price: String,
    #[serde(rename = "invTierQty1")]
    pub tier_quantity1: i64,
    #[serde(rename = "invTierPrice1")]
    pub tier_price1: String,
    #[serde(rename = "invTierQty2")]
    pub tier_quantity2: i64,
    #[serde(rename = "invTierPrice2")]
    pub tier_price2: String,
    #[serde(rename = "invTierQty3")]
    pub tier_quantity3: i64,
    #[serde(rename = "invTierPrice3")]
    pub tier_price3: String,
    #[serde(rename = "cartQty")]
    pub cart_quantity: i64,
    #[serde(rename = "cartBindQty")]
    pub cart_bind_quantity: i64,
    #[serde(rename = "invDate")]
    pub inventory_date: String,
    #[serde(rename = "invAvailable")]
    pub inventory_available: String,
    pub warnings: Vec<i64>,
    #[serde(rename = "totalWeightGrams")]
    pub total_weight_grams: String,
    #[serde(rename = "totalPrice")]
    pub total_price: String,
    #[serde(rename = "totalNativePrice")]
    pub total_native_price: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CartInfo {
    pub list: Vec<StoreList>,
    #[serde(rename = "total_store_cnt")]
    pub total_store_count: i64,
    #[serde(rename = "total_lot_cnt")]
    pub total_lot_count: i64,
    #[serde(flatten)]
    pub status: ReturnStatus,
}

impl AjaxResponse for CartInfo {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreList {
    #[serde(rename = "sellerid")]
    pub seller_id: String,
    #[serde(rename = "store_name")]
    pub store_name: String,
    pub username: String,
    #[serde(rename = "countryid")]
    pub country_id: String,
    #[serde(rename = "feedback_score")]
    pub feedback_score: i64,
    #[serde(rename = "instantCheckout")]
    pub instant_checkout: bool,
    #[serde(rename = "lotcnt")]
    pub lot_count: i64,
    #[serde(rename = "fDispPrice")]
    pub display_price: f64,
    #[serde(rename = "strTotPrice")]
    pub total_price: String,
    // Pass to get_checkout_info
    pub key: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckoutInfo {
    pub conditions: Conditions,
    #[serde(flatten)]
    pub status: ReturnStatus,
}

impl AjaxResponse for CheckoutInfo {
    fn return_status(&self) -> &ReturnStatus {
        &self.status
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Conditions {
    pub error: ConditionsError,
    #[serde(rename = "targetShippingMethod")]
    pub target_shipping_method: TargetShippingMethod,
    #[serde(rename = "estShippingAndHandlingNative")]
    pub est_shipping_and_handling_native: String,
    #[serde(rename = "costType")]
    pub cost_type: i64,
    #[serde(rename = "hasShippingCost")]
    pub has_shipping_cost: bool,
    #[serde(rename = "shippingLocation")]
    pub shipping_location: String,
    pub domestic: bool,
    #[serde(rename = "onlyMethod")]
    pub only_method: bool,
    #[serde(rename = "orderRestriction")]
    pub order_restriction: OrderRestriction,
    #[serde(rename = "showSalesTax")]
    pub show_sales_tax: bool,
    #[serde(rename = "salesTaxFinal")]
    pub sales_tax_final: bool,
    #[serde(rename = "batchID")]
    pub batch_id: i64,
    #[serde(rename = "batchNum")]
    pub batch_num: i64,
    #[serde(rename = "batchTotalNativePrice")]
    pub batch_total_native_price: String,
    #[serde(rename = "orderItemTotalNativePrice")]
    pub order_item_total_native_price: String,
    #[serde(rename = "avgLotNativePrice")]
    pub avg_lot_native_price: String,
    #[serde(rename = "orderTotalNativePrice")]
    pub order_total_native_price: String,
    #[serde(rename = "batchTotalPrice")]
    pub batch_total_price: String,
    #[serde(rename = "orderTotalPrice")]
    pub order_total_price: String,
    #[serde(rename = "orderItemTotalPrice")]
    pub order_item_total_price: String,
    #[serde(rename = "avgLotPrice")]
    pub avg_lot_price: String,
    #[serde(rename = "loggedIn")]
    pub logged_in: bool,
    #[serde(rename = "emailConfirmed")]
    pub email_confirmed: bool,
    #[serde(rename = "salesTaxNative")]
    pub sales_tax_native: String,
    #[serde(rename = "salesTax")]
    pub sales_tax: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConditionsError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderRestriction {
    #[serde(rename = "minBuyMet")]
    pub min_buy_met: bool,
    #[serde(rename = "avgBuyMet")]
    pub avg_buy_met: bool,
    #[serde(rename = "minBuyShortageNative")]
    pub min_buy_shortage_native: String,
    #[serde(rename = "avgBuyShortageNative")]
    pub avg_buy_shortage_native: String,
    #[serde(rename = "minBuyShortage")]
    pub min_buy_shortage: String,
    #[serde(rename = "avgBuyShortage")]
    pub avg_buy_shortage: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetShippingMethod {
    pub id: i64,
    pub name: String,
    #[serde(rename = "unitType")]
    pub unit_type: i64,
    #[serde(rename = "apiMethod")]
    pub api_method: bool,
    #[serde(rename = "packageRestrictions")]
    pub package_restrictions: Vec<PackageRestriction>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PackageRestriction {
    #[serde(rename = "type")]
    pub restriction_type: i64,
    pub arg1: String,
    pub arg2: String,
    pub arg3: String,
}
