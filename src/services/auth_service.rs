use crate::database::{MongoDB, USERS};
use crate::models::user::{User, ROLE_ADMIN, VALID_ROLES};
use crate::utils::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Ownership check used by every mutate/approve endpoint: the caller
    /// must own the document or hold the admin role.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.sub == owner_id || self.is_admin()
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// One of buyer/seller/tenant/landlord/builder (default: buyer).
    /// admin is never self-assignable.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub rating: f64,
    pub review_count: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.user_id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            rating: user.rating,
            review_count: user.review_count,
        }
    }
}

fn get_jwt_secret() -> String {
    // Insecure development fallback, same behavior as the original deployment
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "estate-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "estate-api".to_string())
}

// Generate JWT token (24h)
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Database(format!("Failed to generate token: {}", e)))
}

// Generate refresh token (30 days)
pub fn generate_refresh_token(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(30)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: String::new(),
        role: user.role.clone(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Database(format!("Failed to generate refresh token: {}", e)))
}

// Verify JWT token (signature, expiry, audience, issuer)
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

// User registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);

    if request.email.trim().is_empty() {
        return Err(AppError::InvalidRequest("Email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password is required".to_string()));
    }

    let role = request.role.as_deref().unwrap_or("buyer");
    if !VALID_ROLES.contains(&role) {
        return Err(AppError::InvalidRequest(format!(
            "Invalid role: {}. Supported: buyer, seller, tenant, landlord, builder",
            role
        )));
    }
    // Privileged role, never accepted from a registration payload
    if role == ROLE_ADMIN {
        return Err(AppError::InvalidRequest(
            "Role admin cannot be self-assigned".to_string(),
        ));
    }

    if collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .is_some()
    {
        return Err(AppError::Duplicate("User already exists".to_string()));
    }

    // Salted one-way hash; the raw secret is never stored or logged
    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))?;

    let new_user_id = ObjectId::new().to_hex();

    let new_user = User {
        id: None,
        user_id: new_user_id.clone(),
        email: request.email.clone(),
        password: Some(hashed_password),
        name: request.name.clone(),
        phone: request.phone.clone(),
        role: role.to_string(),
        rating: 0.0,
        review_count: 0,
        is_active: true,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
        last_login: Some(BsonDateTime::now()),
    };

    collection.insert_one(&new_user).await.map_err(|e| {
        if crate::utils::is_duplicate_key(&e) {
            AppError::Duplicate("User already exists".to_string())
        } else {
            AppError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    let token = generate_jwt(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user)?;

    log::info!("✅ User registered: {} (role: {})", new_user.email, role);

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(new_user),
    })
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| AppError::Database(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    collection
        .update_one(
            doc! { "user_id": &user.user_id },
            doc! { "$set": { "last_login": BsonDateTime::now() } },
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let token = generate_jwt(&user)?;
    let refresh_token = generate_refresh_token(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(user),
    })
}

// Refresh token
pub async fn refresh_token(
    db: &MongoDB,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, AppError> {
    let claims = verify_token(&request.refresh_token).map_err(AppError::Unauthorized)?;

    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "user_id": &claims.sub })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    let token = generate_jwt(&user)?;
    let new_refresh_token = generate_refresh_token(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(new_refresh_token),
        user: UserInfo::from(user),
    })
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserInfo::from(user))
}

// Allow-listed profile update (name, phone)
pub async fn update_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<UserInfo, AppError> {
    let collection = db.collection::<User>(USERS);

    let mut update_doc = doc! { "updated_at": BsonDateTime::now() };
    if let Some(name) = &request.name {
        update_doc.insert("name", name);
    }
    if let Some(phone) = &request.phone {
        update_doc.insert("phone", phone);
    }

    let result = collection
        .update_one(doc! { "user_id": user_id }, doc! { "$set": update_doc })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    get_current_user(db, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: &str) -> User {
        User {
            id: None,
            user_id: "64f0c2aa51e9ab0001d7a001".to_string(),
            email: "tenant@example.com".to_string(),
            password: None,
            name: Some("Asha".to_string()),
            phone: None,
            role: role.to_string(),
            rating: 4.5,
            review_count: 12,
            is_active: true,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let user = sample_user("tenant");
        let token = generate_jwt(&user).unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, "tenant");
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let user = sample_user("buyer");
        let mut token = generate_jwt(&user).unwrap();
        token.push('x');

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let iat = (Utc::now() - Duration::hours(48)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(24)).timestamp() as usize;

        let claims = Claims {
            sub: "u1".to_string(),
            email: "e@x.y".to_string(),
            role: "buyer".to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let iat = Utc::now().timestamp() as usize;
        let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;

        let claims = Claims {
            sub: "u1".to_string(),
            email: "e@x.y".to_string(),
            role: "buyer".to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: "some-other-api".to_string(),
            iss: get_jwt_issuer(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_ownership_check() {
        let user = sample_user("landlord");
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert!(claims.can_access(&user.user_id));
        assert!(!claims.can_access("someone-else"));

        let admin = sample_user("admin");
        let admin_claims = verify_token(&generate_jwt(&admin).unwrap()).unwrap();
        assert!(admin_claims.can_access("someone-else"));
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hashed = hash("s3cret", DEFAULT_COST).unwrap();
        assert_ne!(hashed, "s3cret");
        assert!(verify("s3cret", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }
}
