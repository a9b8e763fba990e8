use std::sync::Arc;

use crate::modules::course::schema::CourseEntity;
use crate::modules::media::store::{MediaKind, MediaStore};

/// Gathers every remote asset referenced by a course document: the
/// thumbnail plus every video of every module.
pub fn collect_assets(course: &CourseEntity) -> Vec<(String, MediaKind)> {
    let mut assets = Vec::new();

    if let Some(thumbnail) = &course.thumbnail {
        assets.push((thumbnail.asset_id.clone(), MediaKind::Image));
    }

    for module in course.modules.iter() {
        for video in &module.videos {
            assets.push((video.asset.asset_id.clone(), MediaKind::from_mime(&video.mime_type)));
        }
    }

    assets
}

/// Best-effort removal of every collected asset. Each failure is logged and
/// skipped; nothing is reported back to the caller and the primary delete
/// stands regardless of the outcome.
pub async fn purge_assets(store: Arc<dyn MediaStore>, assets: Vec<(String, MediaKind)>) {
    for (asset_id, kind) in assets {
        if let Err(err) = store.remove(&asset_id, kind).await {
            log::warn!("Failed to remove asset {}: {}", asset_id, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::course::schema::{CourseModule, VideoItem};
    use crate::modules::media::model::AssetRef;
    use crate::modules::media::store::testing::MemoryMediaStore;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn video(asset_id: &str, mime: &str) -> VideoItem {
        let now = Utc::now();
        VideoItem {
            id: Uuid::now_v7(),
            name: format!("{asset_id}.bin"),
            asset: AssetRef {
                asset_id: asset_id.to_string(),
                url: format!("https://media.test/{asset_id}"),
            },
            duration: None,
            size: 10,
            mime_type: mime.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn course() -> CourseEntity {
        let now = Utc::now();
        CourseEntity {
            id: Uuid::now_v7(),
            name: "Intro".to_string(),
            description: None,
            level: "Beginner".to_string(),
            price: Decimal::new(10, 0),
            lecturer: Uuid::now_v7(),
            requirements: Vec::new(),
            thumbnail: Some(Json(AssetRef {
                asset_id: "thumb-1".to_string(),
                url: "https://media.test/thumb-1".to_string(),
            })),
            modules: Json(vec![CourseModule {
                id: Uuid::now_v7(),
                name: "M1".to_string(),
                videos: vec![video("vid-1", "video/mp4"), video("img-1", "image/png")],
                created_at: now,
                updated_at: now,
            }]),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn collects_thumbnail_and_every_video() {
        let assets = collect_assets(&course());
        assert_eq!(
            assets,
            vec![
                ("thumb-1".to_string(), MediaKind::Image),
                ("vid-1".to_string(), MediaKind::Video),
                ("img-1".to_string(), MediaKind::Image),
            ]
        );
    }

    #[actix_web::test]
    async fn one_failure_does_not_block_the_rest() {
        let store = Arc::new(MemoryMediaStore::failing_remove_of("vid-1"));
        purge_assets(store.clone(), collect_assets(&course())).await;

        let removed = store.removed.lock().unwrap();
        assert_eq!(removed.len(), 2);
        assert!(removed.iter().any(|(id, _)| id == "thumb-1"));
        assert!(removed.iter().any(|(id, _)| id == "img-1"));
    }
}
