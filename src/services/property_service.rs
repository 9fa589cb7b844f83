use crate::database::{MongoDB, PROPERTIES, USERS};
use crate::models::{
    CreatePropertyRequest, LandlordInfo, Pagination, Property, PropertyResponse,
    PropertySearchQuery, UpdatePropertyRequest, User, ROLE_LANDLORD,
};
use crate::services::auth_service::Claims;
use crate::utils::{escape_regex, page_params, total_pages, AppError};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest("Invalid property ID".to_string()))
}

/// Builds the Mongo filter from the flat query params. Absent filters are
/// omitted; free-text input is regex-escaped before entering $regex.
pub fn build_search_filter(query: &PropertySearchQuery) -> Document {
    let mut filter = Document::new();

    if let Some(city) = &query.city {
        filter.insert("city", doc! { "$regex": escape_regex(city), "$options": "i" });
    }
    if let Some(state) = &query.state {
        filter.insert("state", doc! { "$regex": escape_regex(state), "$options": "i" });
    }
    if let Some(property_type) = &query.property_type {
        filter.insert("property_type", property_type);
    }

    let mut price = Document::new();
    if let Some(min_price) = query.min_price {
        price.insert("$gte", min_price);
    }
    if let Some(max_price) = query.max_price {
        price.insert("$lte", max_price);
    }
    if !price.is_empty() {
        filter.insert("price", price);
    }

    // Bedroom/bathroom/guest params are minimums
    if let Some(bedrooms) = query.bedrooms {
        filter.insert("bedrooms", doc! { "$gte": bedrooms });
    }
    if let Some(bathrooms) = query.bathrooms {
        filter.insert("bathrooms", doc! { "$gte": bathrooms });
    }
    if let Some(guests) = query.guests {
        filter.insert("guests", doc! { "$gte": guests });
    }

    if let Some(amenities) = &query.amenities {
        let list: Vec<String> = amenities
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !list.is_empty() {
            filter.insert("amenities", doc! { "$all": list });
        }
    }

    if let Some(available) = query.available {
        filter.insert("available", available);
    }
    if let Some(verified) = query.verified {
        filter.insert("verified", verified);
    }

    if let Some(search) = &query.search {
        let pattern = escape_regex(search);
        filter.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": &pattern, "$options": "i" } },
                doc! { "description": { "$regex": &pattern, "$options": "i" } },
                doc! { "city": { "$regex": &pattern, "$options": "i" } },
            ],
        );
    }

    filter
}

/// Sort spec from allow-listed fields; unknown fields fall back to recency.
pub fn build_sort(sort_by: Option<&str>, sort_order: Option<&str>) -> Document {
    let field = match sort_by {
        Some("price") => "price",
        Some("rating") => "rating",
        _ => "created_at",
    };
    let direction = match sort_order {
        Some("asc") => 1,
        _ => -1,
    };
    doc! { field: direction }
}

/// Allow-listed $set document for PATCH. Verification/display flags are
/// applied for admin callers only; everything else in the body is ignored.
pub fn build_update_doc(request: &UpdatePropertyRequest, is_admin: bool, now: i64) -> Document {
    let mut update_doc = doc! { "updated_at": now };

    if let Some(title) = &request.title {
        update_doc.insert("title", title);
    }
    if let Some(description) = &request.description {
        update_doc.insert("description", description);
    }
    if let Some(property_type) = &request.property_type {
        update_doc.insert("property_type", property_type);
    }
    if let Some(price) = request.price {
        update_doc.insert("price", price);
    }
    if let Some(city) = &request.city {
        update_doc.insert("city", city);
    }
    if let Some(state) = &request.state {
        update_doc.insert("state", state);
    }
    if let Some(address) = &request.address {
        update_doc.insert("address", address);
    }
    if let Some(bedrooms) = request.bedrooms {
        update_doc.insert("bedrooms", bedrooms);
    }
    if let Some(bathrooms) = request.bathrooms {
        update_doc.insert("bathrooms", bathrooms);
    }
    if let Some(guests) = request.guests {
        update_doc.insert("guests", guests);
    }
    if let Some(area_sqft) = request.area_sqft {
        update_doc.insert("area_sqft", area_sqft);
    }
    if let Some(amenities) = &request.amenities {
        update_doc.insert("amenities", amenities.clone());
    }
    if let Some(features) = &request.features {
        update_doc.insert("features", features.clone());
    }
    if let Some(images) = &request.images {
        update_doc.insert("images", images.clone());
    }
    if let Some(nearby_places) = &request.nearby_places {
        if let Ok(bson) = mongodb::bson::to_bson(nearby_places) {
            update_doc.insert("nearby_places", bson);
        }
    }
    if let Some(available) = request.available {
        update_doc.insert("available", available);
    }

    if is_admin {
        if let Some(verified) = request.verified {
            update_doc.insert("verified", verified);
        }
        if let Some(featured) = request.featured {
            update_doc.insert("featured", featured);
        }
        if let Some(rating) = request.rating {
            update_doc.insert("rating", rating.clamp(0.0, 5.0));
        }
    }

    update_doc
}

/// One find + one count_documents, with pagination metadata.
pub async fn search(
    db: &MongoDB,
    query: &PropertySearchQuery,
) -> Result<(Vec<PropertyResponse>, Pagination), AppError> {
    let collection = db.collection::<Property>(PROPERTIES);

    let filter = build_search_filter(query);
    let sort = build_sort(query.sort_by.as_deref(), query.sort_order.as_deref());
    let (page, limit, skip) = page_params(query.page, query.limit);

    let total = collection
        .count_documents(filter.clone())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut cursor = collection
        .find(filter)
        .sort(sort)
        .skip(skip)
        .limit(limit)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut properties = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(property) => properties.push(PropertyResponse::from(property)),
            Err(e) => log::warn!("⚠️ Skipping malformed property document: {}", e),
        }
    }

    let pagination = Pagination {
        page,
        limit,
        total,
        total_pages: total_pages(total, limit),
    };

    Ok((properties, pagination))
}

pub async fn featured(db: &MongoDB) -> Result<Vec<PropertyResponse>, AppError> {
    let collection = db.collection::<Property>(PROPERTIES);

    let mut cursor = collection
        .find(doc! { "featured": true, "available": true })
        .sort(doc! { "rating": -1 })
        .limit(8)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut properties = Vec::new();
    while let Some(result) = cursor.next().await {
        if let Ok(property) = result {
            properties.push(PropertyResponse::from(property));
        }
    }

    Ok(properties)
}

pub async fn get_property(db: &MongoDB, id: &str) -> Result<PropertyResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Property>(PROPERTIES);

    let property = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    Ok(PropertyResponse::from(property))
}

pub async fn create_property(
    db: &MongoDB,
    claims: &Claims,
    request: CreatePropertyRequest,
) -> Result<PropertyResponse, AppError> {
    if claims.role != ROLE_LANDLORD && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only landlords can create listings".to_string(),
        ));
    }

    // Landlord sub-document is stamped from the caller, never from the body
    let users = db.collection::<User>(USERS);
    let owner = users
        .find_one(doc! { "user_id": &claims.sub })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let now = Utc::now().timestamp();
    let property = Property {
        id: None,
        title: request.title,
        description: request.description,
        property_type: request.property_type,
        price: request.price,
        city: request.city,
        state: request.state,
        address: request.address,
        bedrooms: request.bedrooms.unwrap_or(0),
        bathrooms: request.bathrooms.unwrap_or(0),
        guests: request.guests.unwrap_or(0),
        area_sqft: request.area_sqft,
        amenities: request.amenities.unwrap_or_default(),
        features: request.features.unwrap_or_default(),
        images: request.images.unwrap_or_default(),
        landlord: LandlordInfo {
            user_id: owner.user_id,
            name: owner.name,
            email: owner.email,
            phone: owner.phone,
        },
        nearby_places: request.nearby_places.unwrap_or_default(),
        available: true,
        verified: false,
        featured: false,
        rating: 0.0,
        created_at: now,
        updated_at: now,
    };

    let collection = db.collection::<Property>(PROPERTIES);
    let result = collection
        .insert_one(&property)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create property: {}", e)))?;

    let mut created = property;
    created.id = result.inserted_id.as_object_id();

    Ok(PropertyResponse::from(created))
}

pub async fn update_property(
    db: &MongoDB,
    claims: &Claims,
    id: &str,
    request: &UpdatePropertyRequest,
) -> Result<PropertyResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Property>(PROPERTIES);

    let property = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    if !claims.can_access(&property.landlord.user_id) {
        return Err(AppError::Forbidden(
            "Not the owner of this listing".to_string(),
        ));
    }

    let update_doc = build_update_doc(request, claims.is_admin(), Utc::now().timestamp());

    collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let updated = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    Ok(PropertyResponse::from(updated))
}

pub async fn delete_property(db: &MongoDB, claims: &Claims, id: &str) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Property>(PROPERTIES);

    let property = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    if !claims.can_access(&property.landlord.user_id) {
        return Err(AppError::Forbidden(
            "Not the owner of this listing".to_string(),
        ));
    }

    let result = collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Property not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_empty_query_builds_empty_filter() {
        let filter = build_search_filter(&PropertySearchQuery::default());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_city_and_price_range_filter() {
        let query = PropertySearchQuery {
            city: Some("Mumbai".to_string()),
            min_price: Some(30000.0),
            max_price: Some(60000.0),
            ..Default::default()
        };

        let filter = build_search_filter(&query);

        let city = filter.get_document("city").unwrap();
        assert_eq!(city.get_str("$regex").unwrap(), "Mumbai");
        assert_eq!(city.get_str("$options").unwrap(), "i");

        let price = filter.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 30000.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 60000.0);
    }

    #[test]
    fn test_min_price_only() {
        let query = PropertySearchQuery {
            min_price: Some(10000.0),
            ..Default::default()
        };

        let filter = build_search_filter(&query);
        let price = filter.get_document("price").unwrap();
        assert!(price.get("$gte").is_some());
        assert!(price.get("$lte").is_none());
    }

    #[test]
    fn test_regex_input_is_escaped() {
        let query = PropertySearchQuery {
            city: Some("(a+)+".to_string()),
            ..Default::default()
        };

        let filter = build_search_filter(&query);
        let city = filter.get_document("city").unwrap();
        assert_eq!(city.get_str("$regex").unwrap(), "\\(a\\+\\)\\+");
    }

    #[test]
    fn test_amenities_parsed_to_all_clause() {
        let query = PropertySearchQuery {
            amenities: Some("parking, gym,,pool ".to_string()),
            ..Default::default()
        };

        let filter = build_search_filter(&query);
        let clause = filter.get_document("amenities").unwrap();
        let all = clause.get_array("$all").unwrap();
        let values: Vec<&str> = all.iter().filter_map(|b| b.as_str()).collect();
        assert_eq!(values, vec!["parking", "gym", "pool"]);
    }

    #[test]
    fn test_minimum_counts_and_booleans() {
        let query = PropertySearchQuery {
            bedrooms: Some(2),
            available: Some(true),
            verified: Some(false),
            ..Default::default()
        };

        let filter = build_search_filter(&query);
        assert_eq!(
            filter.get_document("bedrooms").unwrap().get_i32("$gte").unwrap(),
            2
        );
        assert_eq!(filter.get_bool("available").unwrap(), true);
        assert_eq!(filter.get_bool("verified").unwrap(), false);
    }

    #[test]
    fn test_search_spans_title_description_city() {
        let query = PropertySearchQuery {
            search: Some("lake view".to_string()),
            ..Default::default()
        };

        let filter = build_search_filter(&query);
        let or = filter.get_array("$or").unwrap();
        assert_eq!(or.len(), 3);
    }

    #[test]
    fn test_sort_allow_list() {
        assert_eq!(build_sort(Some("price"), Some("asc")), doc! { "price": 1 });
        assert_eq!(build_sort(Some("rating"), None), doc! { "rating": -1 });
        // Unknown sort fields fall back to recency
        assert_eq!(
            build_sort(Some("landlord.email"), Some("asc")),
            doc! { "created_at": 1 }
        );
        assert_eq!(build_sort(None, None), doc! { "created_at": -1 });
    }

    #[test]
    fn test_update_doc_allow_list() {
        let request = UpdatePropertyRequest {
            title: Some("New title".to_string()),
            price: Some(45000.0),
            verified: Some(true),
            featured: Some(true),
            rating: Some(9.0),
            ..Default::default()
        };

        // Non-admin: privileged fields are dropped
        let update_doc = build_update_doc(&request, false, 1000);
        assert_eq!(update_doc.get_str("title").unwrap(), "New title");
        assert_eq!(update_doc.get_f64("price").unwrap(), 45000.0);
        assert!(update_doc.get("verified").is_none());
        assert!(update_doc.get("featured").is_none());
        assert!(update_doc.get("rating").is_none());
        assert_eq!(update_doc.get_i64("updated_at").unwrap(), 1000);

        // Admin: applied, rating clamped to the display bound
        let update_doc = build_update_doc(&request, true, 1000);
        assert_eq!(update_doc.get_bool("verified").unwrap(), true);
        assert_eq!(update_doc.get_f64("rating").unwrap(), 5.0);
    }

    #[test]
    fn test_update_doc_untouched_fields_absent() {
        let update_doc = build_update_doc(&UpdatePropertyRequest::default(), true, 1);
        // Only the timestamp
        assert_eq!(update_doc.len(), 1);
        assert!(matches!(update_doc.get("updated_at"), Some(Bson::Int64(1))));
    }
}
