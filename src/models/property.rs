use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Listing stored in the `properties` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,
    pub description: Option<String>,

    /// "rent" or "sale"
    pub property_type: String,
    pub price: f64,

    pub city: String,
    pub state: Option<String>,
    pub address: Option<String>,

    #[serde(default)]
    pub bedrooms: i32,
    #[serde(default)]
    pub bathrooms: i32,
    #[serde(default)]
    pub guests: i32,
    pub area_sqft: Option<f64>,

    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,

    /// Owner sub-document, stamped from the creator's claims
    pub landlord: LandlordInfo,

    #[serde(default)]
    pub nearby_places: Vec<NearbyPlace>,

    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,

    /// Display rating, 0..=5
    #[serde(default)]
    pub rating: f64,

    /// Unix timestamps
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LandlordInfo {
    /// Back-reference to the owning user
    pub user_id: String,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NearbyPlace {
    pub name: String,
    /// school, hospital, metro, market, ...
    pub category: String,
    pub distance_km: f64,
}

/// Request to create a listing
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub price: f64,
    pub city: String,
    pub state: Option<String>,
    pub address: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub guests: Option<i32>,
    pub area_sqft: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub nearby_places: Option<Vec<NearbyPlace>>,
}

/// Request to update a listing. Only these fields are client-mutable;
/// verified/featured/rating are applied for admin callers only.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub guests: Option<i32>,
    pub area_sqft: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub nearby_places: Option<Vec<NearbyPlace>>,
    pub available: Option<bool>,
    pub verified: Option<bool>,
    pub featured: Option<bool>,
    pub rating: Option<f64>,
}

/// Flat search/filter params for GET /properties.
/// Absent filters are simply omitted from the Mongo filter.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PropertySearchQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum counts
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub guests: Option<i32>,
    /// Comma-separated; every listed amenity must be present
    pub amenities: Option<String>,
    pub available: Option<bool>,
    pub verified: Option<bool>,
    /// Free-text match over title/description/city
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    /// "asc" or "desc" (default desc)
    pub sort_order: Option<String>,
}

/// Listing as returned by the API (ObjectId rendered as hex)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub price: f64,
    pub city: String,
    pub state: Option<String>,
    pub address: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub guests: i32,
    pub area_sqft: Option<f64>,
    pub amenities: Vec<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub landlord: LandlordInfo,
    pub nearby_places: Vec<NearbyPlace>,
    pub available: bool,
    pub verified: bool,
    pub featured: bool,
    pub rating: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        PropertyResponse {
            id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: p.title,
            description: p.description,
            property_type: p.property_type,
            price: p.price,
            city: p.city,
            state: p.state,
            address: p.address,
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            guests: p.guests,
            area_sqft: p.area_sqft,
            amenities: p.amenities,
            features: p.features,
            images: p.images,
            landlord: p.landlord,
            nearby_places: p.nearby_places,
            available: p.available,
            verified: p.verified,
            featured: p.featured,
            rating: p.rating,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    pub total_pages: u64,
}
