use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Minimal user row; identity management itself lives outside this service,
/// courses only need to resolve a lecturer reference.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
