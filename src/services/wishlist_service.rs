use crate::database::{MongoDB, PROPERTIES, WISHLIST};
use crate::models::{AddWishlistRequest, Property, WishlistEntry, WishlistEntryResponse};
use crate::utils::{is_duplicate_key, AppError};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

pub async fn list_wishlist(
    db: &MongoDB,
    user_id: &str,
) -> Result<Vec<WishlistEntryResponse>, AppError> {
    let collection = db.collection::<WishlistEntry>(WISHLIST);

    let mut cursor = collection
        .find(doc! { "user_id": user_id })
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut entries = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(entry) => entries.push(WishlistEntryResponse::from(entry)),
            Err(e) => log::warn!("⚠️ Skipping malformed wishlist document: {}", e),
        }
    }

    Ok(entries)
}

/// Insert-first: the unique (user_id, property_id) index is the source of
/// truth for uniqueness. A duplicate-key write error maps to 409; there is
/// no read-then-insert pre-check to race against.
pub async fn add_to_wishlist(
    db: &MongoDB,
    user_id: &str,
    request: AddWishlistRequest,
) -> Result<WishlistEntryResponse, AppError> {
    if request.property_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "property_id is required".to_string(),
        ));
    }

    let now = Utc::now().timestamp();

    // Snapshot from the live listing when the opaque id resolves to one;
    // otherwise trust the display fields the client sent
    let entry = match lookup_property(db, &request.property_id).await? {
        Some(property) => WishlistEntry::from_property(user_id, &property, now),
        None => WishlistEntry {
            id: None,
            user_id: user_id.to_string(),
            property_id: request.property_id,
            title: request.title,
            price: request.price,
            city: request.city,
            property_type: request.property_type,
            image: request.image,
            created_at: now,
        },
    };

    let collection = db.collection::<WishlistEntry>(WISHLIST);
    let result = collection.insert_one(&entry).await.map_err(|e| {
        if is_duplicate_key(&e) {
            AppError::Duplicate("Property already in wishlist".to_string())
        } else {
            AppError::Database(format!("Failed to add to wishlist: {}", e))
        }
    })?;

    let mut created = entry;
    created.id = result.inserted_id.as_object_id();

    Ok(WishlistEntryResponse::from(created))
}

pub async fn remove_from_wishlist(
    db: &MongoDB,
    user_id: &str,
    property_id: &str,
) -> Result<(), AppError> {
    let collection = db.collection::<WishlistEntry>(WISHLIST);

    let result = collection
        .delete_one(doc! { "user_id": user_id, "property_id": property_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Property not in wishlist".to_string()));
    }

    Ok(())
}

/// property_id is an opaque reference; a non-ObjectId or unknown id is not
/// an error here, it just means there is no listing to snapshot from.
async fn lookup_property(db: &MongoDB, property_id: &str) -> Result<Option<Property>, AppError> {
    let object_id = match ObjectId::parse_str(property_id) {
        Ok(id) => id,
        Err(_) => return Ok(None),
    };

    db.collection::<Property>(PROPERTIES)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
