use mongodb::{Client, Collection, Database};
use std::error::Error;

pub const PROPERTIES: &str = "properties";
pub const USERS: &str = "users";
pub const ORDERS: &str = "orders";
pub const WISHLIST: &str = "wishlist";
pub const CONSTRUCTION_PROJECTS: &str = "construction_projects";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuning
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // MONGODB_DB overrides the URI path segment
        let db_name = match db_name {
            Some(name) => name.to_string(),
            None => uri
                .split('/')
                .next_back()
                .and_then(|s| s.split('?').next())
                .filter(|s| !s.is_empty())
                .unwrap_or("estate")
                .to_string(),
        };

        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the static indexes. All uniqueness guarantees live here, not
    /// in application-level read-then-write checks.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let properties = self
            .database()
            .collection::<mongodb::bson::Document>(PROPERTIES);

        let city_index = IndexModel::builder()
            .keys(doc! { "city": 1, "state": 1 })
            .build();
        match properties.create_index(city_index).await {
            Ok(_) => log::info!("   ✅ Index created: properties(city, state)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let type_price_index = IndexModel::builder()
            .keys(doc! { "property_type": 1, "price": 1 })
            .build();
        match properties.create_index(type_price_index).await {
            Ok(_) => log::info!("   ✅ Index created: properties(property_type, price)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let orders = self.database().collection::<mongodb::bson::Document>(ORDERS);

        let orders_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .build();
        match orders.create_index(orders_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Unique compound pair: the duplicate-key error from this index is
        // the source of truth for "already in wishlist" (mapped to 409)
        let wishlist = self.database().collection::<mongodb::bson::Document>(WISHLIST);

        let wishlist_unique_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "property_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match wishlist.create_index(wishlist_unique_index).await {
            Ok(_) => log::info!("   ✅ Index created: wishlist(user_id, property_id) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let projects = self
            .database()
            .collection::<mongodb::bson::Document>(CONSTRUCTION_PROJECTS);

        let projects_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .build();
        match projects.create_index(projects_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: construction_projects(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let users = self.database().collection::<mongodb::bson::Document>(USERS);

        let users_email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match users.create_index(users_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
