use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::Property;

/// One favorite per (user, property), enforced by the unique compound
/// index created in database::ensure_indexes. The display fields are a
/// denormalized snapshot taken at add time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub user_id: String,
    pub property_id: String,

    pub title: Option<String>,
    pub price: Option<f64>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub image: Option<String>,

    pub created_at: i64,
}

impl WishlistEntry {
    /// Snapshot from a live listing.
    pub fn from_property(user_id: &str, property: &Property, now: i64) -> Self {
        WishlistEntry {
            id: None,
            user_id: user_id.to_string(),
            property_id: property.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: Some(property.title.clone()),
            price: Some(property.price),
            city: Some(property.city.clone()),
            property_type: Some(property.property_type.clone()),
            image: property.images.first().cloned(),
            created_at: now,
        }
    }
}

/// Add request. The display fields are only used when property_id does not
/// resolve to a live listing (it is an opaque reference).
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddWishlistRequest {
    pub property_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WishlistEntryResponse {
    pub id: String,
    pub property_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
}

impl From<WishlistEntry> for WishlistEntryResponse {
    fn from(entry: WishlistEntry) -> Self {
        WishlistEntryResponse {
            id: entry.id.map(|id| id.to_hex()).unwrap_or_default(),
            property_id: entry.property_id,
            title: entry.title,
            price: entry.price,
            city: entry.city,
            property_type: entry.property_type,
            image: entry.image,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LandlordInfo, Property};

    fn sample_property() -> Property {
        Property {
            id: Some(ObjectId::new()),
            title: "2BHK near the lake".to_string(),
            description: None,
            property_type: "rent".to_string(),
            price: 32000.0,
            city: "Mumbai".to_string(),
            state: Some("Maharashtra".to_string()),
            address: None,
            bedrooms: 2,
            bathrooms: 2,
            guests: 4,
            area_sqft: Some(950.0),
            amenities: vec!["parking".to_string()],
            features: vec![],
            images: vec!["https://cdn.example.com/p1.jpg".to_string()],
            landlord: LandlordInfo {
                user_id: "landlord-1".to_string(),
                name: None,
                email: "owner@example.com".to_string(),
                phone: None,
            },
            nearby_places: vec![],
            available: true,
            verified: false,
            featured: false,
            rating: 0.0,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn test_snapshot_from_property() {
        let property = sample_property();
        let entry = WishlistEntry::from_property("user-9", &property, 42);

        assert_eq!(entry.user_id, "user-9");
        assert_eq!(entry.property_id, property.id.unwrap().to_hex());
        assert_eq!(entry.title.as_deref(), Some("2BHK near the lake"));
        assert_eq!(entry.price, Some(32000.0));
        assert_eq!(entry.image.as_deref(), Some("https://cdn.example.com/p1.jpg"));
        assert_eq!(entry.created_at, 42);
    }

    #[test]
    fn test_snapshot_without_images() {
        let mut property = sample_property();
        property.images.clear();

        let entry = WishlistEntry::from_property("user-9", &property, 42);
        assert_eq!(entry.image, None);
    }
}
