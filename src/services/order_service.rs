use crate::database::{MongoDB, ORDERS};
use crate::models::{CreateOrderRequest, Order, OrderResponse, UpdateOrderRequest};
use crate::services::auth_service::Claims;
use crate::utils::AppError;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

const ORDER_TYPES: &[&str] = &["booking", "sale", "construction"];

fn parse_order_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest("Invalid order ID".to_string()))
}

/// Allow-listed $set document for PATCH. user_id, property_id and amount
/// are fixed at creation time; anything else in the body is ignored.
pub fn build_update_doc(request: &UpdateOrderRequest, now: i64) -> Document {
    let mut update_doc = doc! { "updated_at": now };

    if let Some(status) = &request.status {
        update_doc.insert("status", status);
    }
    if let Some(payment_status) = &request.payment_status {
        update_doc.insert("payment_status", payment_status);
    }
    if let Some(notes) = &request.notes {
        update_doc.insert("notes", notes);
    }
    if let Some(check_in) = &request.check_in {
        update_doc.insert("check_in", check_in);
    }
    if let Some(check_out) = &request.check_out {
        update_doc.insert("check_out", check_out);
    }

    update_doc
}

pub async fn create_order(
    db: &MongoDB,
    claims: &Claims,
    request: CreateOrderRequest,
) -> Result<OrderResponse, AppError> {
    if request.property_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "property_id is required".to_string(),
        ));
    }
    if !ORDER_TYPES.contains(&request.order_type.as_str()) {
        return Err(AppError::InvalidRequest(format!(
            "Invalid order type: {}. Supported: booking, sale, construction",
            request.order_type
        )));
    }

    let now = Utc::now().timestamp();
    let order = Order {
        id: None,
        // Owner comes from the verified token, never from the body
        user_id: claims.sub.clone(),
        property_id: request.property_id,
        order_type: request.order_type,
        status: "pending".to_string(),
        payment_status: "pending".to_string(),
        amount: request.amount,
        check_in: request.check_in,
        check_out: request.check_out,
        notes: request.notes,
        created_at: now,
        updated_at: now,
    };

    let collection = db.collection::<Order>(ORDERS);
    let result = collection
        .insert_one(&order)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create order: {}", e)))?;

    let mut created = order;
    created.id = result.inserted_id.as_object_id();

    Ok(OrderResponse::from(created))
}

/// Caller's own orders; admins see the whole collection.
pub async fn list_orders(db: &MongoDB, claims: &Claims) -> Result<Vec<OrderResponse>, AppError> {
    let collection = db.collection::<Order>(ORDERS);

    let filter = if claims.is_admin() {
        doc! {}
    } else {
        doc! { "user_id": &claims.sub }
    };

    let mut cursor = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut orders = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(order) => orders.push(OrderResponse::from(order)),
            Err(e) => log::warn!("⚠️ Skipping malformed order document: {}", e),
        }
    }

    Ok(orders)
}

pub async fn get_order(db: &MongoDB, claims: &Claims, id: &str) -> Result<OrderResponse, AppError> {
    let object_id = parse_order_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let order = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !claims.can_access(&order.user_id) {
        return Err(AppError::Forbidden("Not the owner of this order".to_string()));
    }

    Ok(OrderResponse::from(order))
}

pub async fn update_order(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: &UpdateOrderRequest,
) -> Result<OrderResponse, AppError> {
    let object_id = parse_order_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let order = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !claims.can_access(&order.user_id) {
        return Err(AppError::Forbidden("Not the owner of this order".to_string()));
    }

    let update_doc = build_update_doc(request, Utc::now().timestamp());

    collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(OrderResponse::from(updated))
}

pub async fn delete_order(db: &MongoDB, claims: &Claims, id: &str) -> Result<(), AppError> {
    let object_id = parse_order_id(id)?;
    let collection = db.collection::<Order>(ORDERS);

    let order = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !claims.can_access(&order.user_id) {
        return Err(AppError::Forbidden("Not the owner of this order".to_string()));
    }

    let result = collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_doc_allow_list() {
        let request = UpdateOrderRequest {
            status: Some("confirmed".to_string()),
            payment_status: Some("paid".to_string()),
            notes: Some("keys at the reception".to_string()),
            ..Default::default()
        };

        let update_doc = build_update_doc(&request, 99);
        assert_eq!(update_doc.get_str("status").unwrap(), "confirmed");
        assert_eq!(update_doc.get_str("payment_status").unwrap(), "paid");
        assert_eq!(update_doc.get_i64("updated_at").unwrap(), 99);
        // Fixed-at-creation fields never appear in the $set
        assert!(update_doc.get("user_id").is_none());
        assert!(update_doc.get("property_id").is_none());
        assert!(update_doc.get("amount").is_none());
    }

    #[test]
    fn test_update_doc_empty_request() {
        let update_doc = build_update_doc(&UpdateOrderRequest::default(), 7);
        assert_eq!(update_doc.len(), 1);
        assert_eq!(update_doc.get_i64("updated_at").unwrap(), 7);
    }

    #[test]
    fn test_order_type_allow_list() {
        assert!(ORDER_TYPES.contains(&"booking"));
        assert!(ORDER_TYPES.contains(&"sale"));
        assert!(ORDER_TYPES.contains(&"construction"));
        assert!(!ORDER_TYPES.contains(&"rental"));
    }
}
