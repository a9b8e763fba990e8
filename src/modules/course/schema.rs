use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::modules::media::model::AssetRef;

/// Course row. Scalars live in columns; the owned module/video tree is one
/// JSONB document written whole on every mutation (last-write-wins).
#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub level: String,
    pub price: Decimal,
    pub lecturer: Uuid,
    pub requirements: Vec<String>,
    pub thumbnail: Option<Json<AssetRef>>,
    pub modules: Json<Vec<CourseModule>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Uuid,
    pub name: String,
    pub videos: Vec<VideoItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseModule {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self { id: Uuid::now_v7(), name, videos: Vec::new(), created_at: now, updated_at: now }
    }
}

/// One media entry of a module. May hold video or image content despite the
/// name; `asset` is always present, an entry without uploaded content is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: Uuid,
    pub name: String,
    pub asset: AssetRef,
    pub duration: Option<i64>,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub level: String,
    pub price: Decimal,
    pub lecturer: Uuid,
    pub requirements: Vec<String>,
    pub thumbnail: Option<AssetRef>,
    pub modules: Vec<CourseModule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseEntity> for CourseResponse {
    fn from(entity: CourseEntity) -> Self {
        CourseResponse {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            level: entity.level,
            price: entity.price,
            lecturer: entity.lecturer,
            requirements: entity.requirements,
            thumbnail: entity.thumbnail.map(|t| t.0),
            modules: entity.modules.0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseCountResponse {
    #[serde(rename = "totalCourses")]
    pub total_courses: i64,
}
