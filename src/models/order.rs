use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Booking/sale/construction transaction stored in the `orders` collection.
///
/// `property_id` is an opaque string reference, not a foreign key - listings
/// can be deleted out from under an order and the order survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: String,
    pub property_id: String,

    /// "booking", "sale" or "construction"
    pub order_type: String,

    /// status and payment_status are independent enumerations with no
    /// transition table; the PATCH allow-list constrains which fields
    /// change, not the values
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,

    pub amount: f64,

    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

fn default_status() -> String {
    "pending".to_string()
}

fn default_payment_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateOrderRequest {
    pub property_id: String,
    pub order_type: String,
    pub amount: f64,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
}

/// Client-mutable order fields. user_id/property_id/amount are fixed
/// at creation time and ignored if present in a PATCH body.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub notes: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub order_type: String,
    pub status: String,
    pub payment_status: String,
    pub amount: f64,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: order.user_id,
            property_id: order.property_id,
            order_type: order.order_type,
            status: order.status,
            payment_status: order.payment_status,
            amount: order.amount,
            check_in: order.check_in,
            check_out: order.check_out,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
