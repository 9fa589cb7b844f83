use crate::database::{MongoDB, PROPERTIES};
use crate::models::{LandlordInfo, NearbyPlace, Property};
use mongodb::bson::doc;

/// Seeds a small sample catalog into an empty properties collection so a
/// fresh deployment has something to browse. No-op once any listing exists.
pub async fn seed_sample_properties(db: &MongoDB) {
    let collection = db.collection::<Property>(PROPERTIES);

    let count = collection.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("🏠 Properties: {} listings already in DB — skipping seed", count);
        return;
    }

    log::info!("🏠 Properties: seeding sample listings...");

    let now = chrono::Utc::now().timestamp();
    let listings = build_sample_listings(now);

    match collection.insert_many(&listings).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} sample listings", result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed sample listings: {}", e);
        }
    }
}

fn build_sample_listings(now: i64) -> Vec<Property> {
    let seed_landlord = LandlordInfo {
        user_id: "system".into(),
        name: Some("Estate Demo Realty".into()),
        email: "listings@estate-service.com".into(),
        phone: Some("+91 98765 43210".into()),
    };

    vec![
        Property {
            id: None,
            title: "2BHK apartment near Powai Lake".into(),
            description: Some(
                "Sunlit two-bedroom with a lake-facing balcony, covered parking and \
                 24x7 security. Walking distance to the tech park shuttle stop."
                    .into(),
            ),
            property_type: "rent".into(),
            price: 42000.0,
            city: "Mumbai".into(),
            state: Some("Maharashtra".into()),
            address: Some("Hiranandani Gardens, Powai".into()),
            bedrooms: 2,
            bathrooms: 2,
            guests: 4,
            area_sqft: Some(980.0),
            amenities: vec!["parking".into(), "gym".into(), "security".into()],
            features: vec!["lake view".into(), "modular kitchen".into()],
            images: vec![],
            landlord: seed_landlord.clone(),
            nearby_places: vec![
                NearbyPlace {
                    name: "Powai Lake".into(),
                    category: "park".into(),
                    distance_km: 0.4,
                },
                NearbyPlace {
                    name: "Hiranandani Hospital".into(),
                    category: "hospital".into(),
                    distance_km: 1.2,
                },
            ],
            available: true,
            verified: true,
            featured: true,
            rating: 4.6,
            created_at: now,
            updated_at: now,
        },
        Property {
            id: None,
            title: "3BHK villa with private garden".into(),
            description: Some(
                "Independent villa on a quiet lane in Whitefield. Private garden, \
                 two covered parking spots, solar water heating."
                    .into(),
            ),
            property_type: "sale".into(),
            price: 18500000.0,
            city: "Bengaluru".into(),
            state: Some("Karnataka".into()),
            address: Some("Palm Meadows, Whitefield".into()),
            bedrooms: 3,
            bathrooms: 3,
            guests: 6,
            area_sqft: Some(2400.0),
            amenities: vec!["parking".into(), "garden".into(), "solar".into()],
            features: vec!["gated community".into(), "corner plot".into()],
            images: vec![],
            landlord: seed_landlord.clone(),
            nearby_places: vec![NearbyPlace {
                name: "Whitefield Metro".into(),
                category: "metro".into(),
                distance_km: 2.1,
            }],
            available: true,
            verified: true,
            featured: true,
            rating: 4.8,
            created_at: now,
            updated_at: now,
        },
        Property {
            id: None,
            title: "Studio flat for working professionals".into(),
            description: Some(
                "Compact fully-furnished studio above a cafe strip. Ideal for a \
                 single tenant; broadband and housekeeping included in rent."
                    .into(),
            ),
            property_type: "rent".into(),
            price: 21000.0,
            city: "Pune".into(),
            state: Some("Maharashtra".into()),
            address: Some("Koregaon Park Annexe".into()),
            bedrooms: 1,
            bathrooms: 1,
            guests: 2,
            area_sqft: Some(420.0),
            amenities: vec!["wifi".into(), "furnished".into(), "housekeeping".into()],
            features: vec![],
            images: vec![],
            landlord: seed_landlord,
            nearby_places: vec![],
            available: true,
            verified: false,
            featured: false,
            rating: 4.1,
            created_at: now,
            updated_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_listings_shape() {
        let listings = build_sample_listings(1000);

        assert_eq!(listings.len(), 3);
        for listing in &listings {
            assert!(listing.price > 0.0);
            assert!(!listing.city.is_empty());
            assert_eq!(listing.landlord.user_id, "system");
            assert!(listing.rating >= 0.0 && listing.rating <= 5.0);
            assert_eq!(listing.created_at, 1000);
        }

        // At least one featured listing for the front page
        assert!(listings.iter().any(|l| l.featured));
    }
}
