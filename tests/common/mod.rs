//! Helpers for integration tests.

use chrono::{Duration, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use storelink::db::{DbPool, establish_connection_pool};
use storelink::domain::seller::{NewSeller, Seller};
use storelink::normalize::slugify;
use storelink::repository::{DieselRepository, SellerWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Insert a seller with sensible defaults for repository tests.
#[allow(dead_code)]
pub fn create_seller(repo: &DieselRepository, email: &str, store_name: &str) -> Seller {
    repo.create_seller(&NewSeller {
        name: "Owner".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        phone: "+919876543210".to_string(),
        slug: slugify(store_name),
        store_name: store_name.to_string(),
        description: None,
        trial_ends_at: Utc::now().naive_utc() + Duration::days(14),
    })
    .expect("seller should be created")
}
