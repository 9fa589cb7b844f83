use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Marketplace roles. Anything outside this set is rejected at registration.
pub const VALID_ROLES: &[&str] = &["buyer", "seller", "tenant", "landlord", "builder", "admin"];

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LANDLORD: &str = "landlord";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String, // PRIMARY IDENTIFIER - hex string, referenced by other collections
    pub email: String,
    /// bcrypt hash. Never serialized into API responses (see UserInfo).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    /// Display counters maintained by the review flow
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
    pub last_login: Option<BsonDateTime>,
}

fn default_role() -> String {
    "buyer".to_string()
}

fn default_is_active() -> bool {
    true
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_applies_defaults() {
        // Documents written before the role/rating fields existed
        let doc = serde_json::json!({
            "user_id": "64f0aa",
            "email": "old@user.com"
        });

        let user: User = serde_json::from_value(doc).unwrap();
        assert_eq!(user.role, "buyer");
        assert!(user.is_active);
        assert_eq!(user.review_count, 0);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_password_hash_not_serialized_when_absent() {
        let user = User {
            id: None,
            user_id: "u1".to_string(),
            email: "a@b.c".to_string(),
            password: None,
            name: None,
            phone: None,
            role: "admin".to_string(),
            rating: 0.0,
            review_count: 0,
            is_active: true,
            created_at: None,
            updated_at: None,
            last_login: None,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(user.is_admin());
    }
}
