use super::catalog::CatalogItem;
use super::{Direction, StoreClient};
use crate::error::ApiError;
use crate::serde_util::string_f64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

impl StoreClient {
    // Orders received ("in") or placed ("out")
    pub async fn get_orders(&self, direction: Direction) -> Result<Vec<Order>, ApiError> {
        let query = vec![("direction", direction.to_string())];
        self.get(
            "/orders",
            &query,
            &format!("Orders {}", direction),
            &format!("orders-{}.json", direction),
        )
        .await
    }

    // Orders filtered by status; `filed` selects filed or un-filed orders
    pub async fn get_orders_by_status(
        &self,
        direction: Direction,
        include: &[OrderStatus],
        exclude: &[OrderStatus],
        filed: bool,
    ) -> Result<Vec<Order>, ApiError> {
        let query = vec![
            ("direction", direction.to_string()),
            ("status", status_filter(include, exclude)),
            ("filed", filed.to_string()),
        ];
        self.get("/orders", &query, &format!("Orders {}", direction), "orders-by-status.json")
            .await
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, ApiError> {
        let order: Order = self
            .get(
                &format!("/orders/{}", id),
                &[],
                &format!("Order {}", id),
                &format!("order-{}.json", id),
            )
            .await?;
        order.log_unrecognized_values();
        Ok(order)
    }

    // Items of an order, grouped in batches
    pub async fn get_order_items(&self, id: i64) -> Result<Vec<Vec<OrderItem>>, ApiError> {
        self.get(
            &format!("/orders/{}/items", id),
            &[],
            &format!("Order {} items", id),
            &format!("order-{}-items.json", id),
        )
        .await
    }
}

// `include` statuses as-is, `exclude` statuses prefixed with `-`
pub fn status_filter(include: &[OrderStatus], exclude: &[OrderStatus]) -> String {
    include
        .iter()
        .map(|s| s.as_str().to_string())
        .chain(exclude.iter().map(|s| format!("-{}", s.as_str())))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Order {
    pub order_id: i64,
    pub date_ordered: Option<DateTime<Utc>>,
    pub date_status_changed: Option<DateTime<Utc>>,
    pub seller_name: String,
    pub store_name: String,
    pub buyer_name: String,
    pub buyer_email: String,
    // Includes the order just placed and purged orders
    pub buyer_order_count: i64,
    pub require_insurance: bool,
    pub status: OrderStatus,
    pub is_invoiced: bool,
    pub is_filed: bool,
    pub drive_thru_sent: bool,
    pub remarks: String,
    pub total_count: i64,
    pub unique_count: i64,
    // 0 when any item lacks weight information
    #[serde(with = "string_f64")]
    pub total_weight: f64,
    pub payment: Option<Payment>,
    pub shipping: Option<Shipping>,
    pub cost: Option<Cost>,
    #[serde(rename = "disp_cost")]
    pub display_cost: Option<Cost>,
}

impl Order {
    pub fn log_unrecognized_values(&self) {
        if self.status == OrderStatus::Unknown {
            warn!(order_id = self.order_id, "unrecognized order status");
        }
        if let Some(payment) = &self.payment {
            if payment.method == PaymentMethod::Unknown {
                warn!(order_id = self.order_id, "unrecognized payment method");
            }
            if payment.status == PaymentStatus::Unknown {
                warn!(order_id = self.order_id, "unrecognized payment status");
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Payment {
    pub method: PaymentMethod,
    pub currency_code: String,
    pub date_paid: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Shipping {
    pub method: String,
    pub method_id: i64,
    #[serde(rename = "tracking_no")]
    pub tracking_numbers: String,
    pub tracking_link: String,
    pub date_shipped: Option<DateTime<Utc>>,
    pub address: Option<Address>,
}

// Split fields are only present when the buyer normalized their address
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Address {
    pub name: PersonName,
    pub full: String,
    pub address1: String,
    pub address2: String,
    // ISO 3166-1 alpha-2, except UK instead of GB
    pub country_code: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PersonName {
    pub full: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Cost {
    pub currency_code: String,
    #[serde(with = "string_f64")]
    pub subtotal: f64,
    #[serde(with = "string_f64")]
    pub grand_total: f64,
    #[serde(with = "string_f64")]
    pub etc1: f64,
    #[serde(with = "string_f64")]
    pub etc2: f64,
    #[serde(with = "string_f64")]
    pub insurance: f64,
    #[serde(with = "string_f64")]
    pub shipping: f64,
    #[serde(with = "string_f64")]
    pub credit: f64,
    #[serde(with = "string_f64")]
    pub coupon: f64,
    #[serde(rename = "salesTax", with = "string_f64")]
    pub sales_tax: f64,
    #[serde(with = "string_f64")]
    pub vat_rate: f64,
    #[serde(with = "string_f64")]
    pub vat_amount: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderItem {
    pub inventory_id: i64,
    pub item: CatalogItem,
    pub color_id: i64,
    pub color_name: String,
    pub quantity: i64,
    pub new_or_used: NewOrUsed,
    // Only meaningful for sets
    pub completeness: Completeness,
    #[serde(with = "string_f64")]
    pub unit_price: f64,
    // After tiered pricing
    #[serde(with = "string_f64")]
    pub unit_price_final: f64,
    #[serde(rename = "disp_unit_price", with = "string_f64")]
    pub unit_price_display: f64,
    #[serde(rename = "disp_unit_price_final", with = "string_f64")]
    pub unit_price_final_display: f64,
    pub currency_code: String,
    #[serde(rename = "disp_currency_code")]
    pub currency_code_display: String,
    pub description: String,
    pub remarks: String,
    #[serde(with = "string_f64")]
    pub weight: f64,
    #[serde(with = "string_f64")]
    pub order_cost: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Updated,
    Processing,
    Ready,
    Paid,
    Packed,
    Shipped,
    Received,
    Completed,
    #[serde(rename = "OCR")]
    OrderCancelRequested,
    #[serde(rename = "NPB")]
    NonPayingBuyer,
    #[serde(rename = "NPX")]
    NonPayingBuyerExpired,
    #[serde(rename = "NRS")]
    NonResponsiveSeller,
    #[serde(rename = "NSS")]
    NonShippingSeller,
    Cancelled,
    Purged,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Updated => "UPDATED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Ready => "READY",
            OrderStatus::Paid => "PAID",
            OrderStatus::Packed => "PACKED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::OrderCancelRequested => "OCR",
            OrderStatus::NonPayingBuyer => "NPB",
            OrderStatus::NonPayingBuyerExpired => "NPX",
            OrderStatus::NonResponsiveSeller => "NRS",
            OrderStatus::NonShippingSeller => "NSS",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Purged => "PURGED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
            .ok()
            .filter(|status| *status != OrderStatus::Unknown)
            .ok_or_else(|| format!("unknown order status `{}`", s))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PaymentStatus {
    Completed,
    Received,
    None,
    Sent,
    Clearing,
    Returned,
    Bounced,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PaymentMethod {
    PayPal,
    #[serde(rename = "PayPal (Onsite)")]
    PayPalOnsite,
    #[serde(rename = "Credit/Debit (Powered by Stripe)")]
    Stripe,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum NewOrUsed {
    #[default]
    #[serde(rename = "N")]
    New,
    #[serde(rename = "U")]
    Used,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Completeness {
    #[serde(rename = "C")]
    Complete,
    #[serde(rename = "B")]
    Incomplete,
    #[serde(rename = "S")]
    Sealed,
    #[default]
    #[serde(other)]
    NotApplicable,
}
