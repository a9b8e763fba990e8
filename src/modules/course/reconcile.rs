use chrono::Utc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::course::model::{DeclaredModule, DeclaredVideo};
use crate::modules::course::schema::{CourseModule, VideoItem};
use crate::modules::media::attachment::{Attachment, AttachmentSet};
use crate::modules::media::store::{MediaKind, MediaStore};

/// Builds the module tree for a brand-new course. Every declared video must
/// match exactly one attachment by original file name; otherwise the whole
/// operation fails and nothing may be persisted. Declared order is
/// authoritative for the final tree.
pub async fn assemble_modules(
    declared: &[DeclaredModule],
    attachments: &AttachmentSet,
    store: &dyn MediaStore,
) -> Result<Vec<CourseModule>, error::SystemError> {
    let mut modules = Vec::with_capacity(declared.len());

    for module in declared {
        let mut videos = Vec::with_capacity(module.videos.len());
        for video in &module.videos {
            let attachment = attachments.by_name(&video.name).ok_or_else(|| {
                error::SystemError::asset_not_found(format!(
                    "No file attached for video/image: {}",
                    video.name
                ))
            })?;
            videos.push(upload_video(video, attachment, store, None).await?);
        }
        modules.push(build_module(module.name.clone(), videos, None));
    }

    Ok(modules)
}

/// Merges a declared tree with the persisted one. Attachments address
/// videos by (module index, video index); positions outside the declared
/// tree are ignored. A declared video without a fresh attachment carries
/// its asset, size, type and creation timestamp forward from the same
/// position in the persisted tree; one with neither source is rejected.
pub async fn reconcile_modules(
    declared: &[DeclaredModule],
    current: &[CourseModule],
    attachments: &AttachmentSet,
    store: &dyn MediaStore,
) -> Result<Vec<CourseModule>, error::SystemError> {
    let mut modules = Vec::with_capacity(declared.len());

    for (m, module) in declared.iter().enumerate() {
        let current_module = current.get(m);
        let mut videos = Vec::with_capacity(module.videos.len());

        for (v, video) in module.videos.iter().enumerate() {
            let existing = current_module.and_then(|cm| cm.videos.get(v));
            let item = match attachments.at(m, v) {
                Some(attachment) => upload_video(video, attachment, store, existing).await?,
                None => carry_forward(video, existing)?,
            };
            videos.push(item);
        }

        modules.push(build_module(module.name.clone(), videos, current_module));
    }

    Ok(modules)
}

/// Uploads a fresh attachment and builds the video entry around the
/// returned asset reference. Identity and creation timestamp survive from
/// the existing entry when the upload replaces one.
async fn upload_video(
    declared: &DeclaredVideo,
    attachment: &Attachment,
    store: &dyn MediaStore,
    existing: Option<&VideoItem>,
) -> Result<VideoItem, error::SystemError> {
    let kind = MediaKind::from_mime(&attachment.mime_type);
    let asset = store.upload(attachment.bytes.clone(), &attachment.mime_type, kind).await?;
    let now = Utc::now();

    Ok(VideoItem {
        id: existing.map(|e| e.id).unwrap_or_else(Uuid::now_v7),
        name: declared.name.clone(),
        asset,
        duration: declared.duration,
        size: attachment.size(),
        mime_type: attachment.mime_type.clone(),
        created_at: existing.map(|e| e.created_at).unwrap_or(now),
        updated_at: now,
    })
}

fn carry_forward(
    declared: &DeclaredVideo,
    existing: Option<&VideoItem>,
) -> Result<VideoItem, error::SystemError> {
    let existing = existing.ok_or_else(|| {
        error::SystemError::asset_not_found(format!(
            "No asset available for video/image: {}",
            declared.name
        ))
    })?;

    Ok(VideoItem {
        id: existing.id,
        name: declared.name.clone(),
        asset: existing.asset.clone(),
        duration: declared.duration.or(existing.duration),
        size: existing.size,
        mime_type: existing.mime_type.clone(),
        created_at: existing.created_at,
        updated_at: Utc::now(),
    })
}

fn build_module(
    name: String,
    videos: Vec<VideoItem>,
    existing: Option<&CourseModule>,
) -> CourseModule {
    let now = Utc::now();
    CourseModule {
        id: existing.map(|e| e.id).unwrap_or_else(Uuid::now_v7),
        name,
        videos,
        created_at: existing.map(|e| e.created_at).unwrap_or(now),
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::media::model::AssetRef;
    use crate::modules::media::store::testing::MemoryMediaStore;
    use chrono::Duration;

    fn attachment(file_name: &str, mime: &str) -> Attachment {
        Attachment {
            file_name: file_name.to_string(),
            mime_type: mime.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn declared(name: &str, videos: &[(&str, Option<i64>)]) -> DeclaredModule {
        DeclaredModule {
            name: name.to_string(),
            videos: videos
                .iter()
                .map(|(n, d)| DeclaredVideo { name: n.to_string(), duration: *d })
                .collect(),
        }
    }

    fn persisted_video(name: &str, asset_id: &str) -> VideoItem {
        let yesterday = Utc::now() - Duration::days(1);
        VideoItem {
            id: Uuid::now_v7(),
            name: name.to_string(),
            asset: AssetRef {
                asset_id: asset_id.to_string(),
                url: format!("https://media.test/video/{asset_id}"),
            },
            duration: Some(30),
            size: 1024,
            mime_type: "video/mp4".to_string(),
            created_at: yesterday,
            updated_at: yesterday,
        }
    }

    fn persisted_module(name: &str, videos: Vec<VideoItem>) -> CourseModule {
        let yesterday = Utc::now() - Duration::days(1);
        CourseModule {
            id: Uuid::now_v7(),
            name: name.to_string(),
            videos,
            created_at: yesterday,
            updated_at: yesterday,
        }
    }

    #[actix_web::test]
    async fn create_matches_attachments_by_file_name() {
        let store = MemoryMediaStore::new();
        let mut attachments = AttachmentSet::default();
        attachments.insert("files", attachment("a.mp4", "video/mp4"));
        attachments.insert("files", attachment("b.png", "image/png"));

        let tree = vec![declared("M1", &[("a.mp4", Some(30)), ("b.png", None)])];
        let modules = assemble_modules(&tree, &attachments, &store).await.unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "M1");
        assert_eq!(modules[0].videos.len(), 2);

        let first = &modules[0].videos[0];
        assert_eq!(first.name, "a.mp4");
        assert_eq!(first.duration, Some(30));
        assert_eq!(first.size, 3);
        assert!(!first.asset.asset_id.is_empty());
        assert!(!first.asset.url.is_empty());

        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads[0].0, MediaKind::Video);
        assert_eq!(uploads[1].0, MediaKind::Image);
    }

    #[actix_web::test]
    async fn create_fails_when_an_attachment_is_missing() {
        let store = MemoryMediaStore::new();
        let mut attachments = AttachmentSet::default();
        attachments.insert("files", attachment("a.mp4", "video/mp4"));

        let tree = vec![declared("M1", &[("a.mp4", None), ("missing.mp4", None)])];
        let err = assemble_modules(&tree, &attachments, &store).await.unwrap_err();

        assert!(matches!(err, error::SystemError::AssetNotFound(_)));
    }

    #[actix_web::test]
    async fn create_propagates_upload_failures() {
        let store = MemoryMediaStore::failing_uploads();
        let mut attachments = AttachmentSet::default();
        attachments.insert("files", attachment("a.mp4", "video/mp4"));

        let tree = vec![declared("M1", &[("a.mp4", None)])];
        let err = assemble_modules(&tree, &attachments, &store).await.unwrap_err();

        assert!(matches!(err, error::SystemError::UploadFailure(_)));
    }

    #[actix_web::test]
    async fn update_without_attachments_carries_metadata_forward() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module(
            "M1",
            vec![persisted_video("a.mp4", "keep-a"), persisted_video("b.mp4", "keep-b")],
        )];
        let tree = vec![declared("M1", &[("a.mp4", Some(30)), ("b.mp4", Some(30))])];

        let modules =
            reconcile_modules(&tree, &current, &AttachmentSet::default(), &store).await.unwrap();

        assert_eq!(store.upload_count(), 0);
        for (merged, original) in modules[0].videos.iter().zip(&current[0].videos) {
            assert_eq!(merged.id, original.id);
            assert_eq!(merged.asset, original.asset);
            assert_eq!(merged.size, original.size);
            assert_eq!(merged.mime_type, original.mime_type);
            assert_eq!(merged.created_at, original.created_at);
            assert!(merged.updated_at > original.updated_at);
        }
    }

    #[actix_web::test]
    async fn update_replaces_only_the_targeted_video() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module(
            "M1",
            vec![persisted_video("a.mp4", "keep-a"), persisted_video("b.mp4", "old-b")],
        )];
        let tree = vec![declared("M1", &[("a.mp4", None), ("b.mp4", Some(45))])];

        let mut attachments = AttachmentSet::default();
        attachments.insert("modules[0][videos][1][file]", attachment("b.mp4", "video/mp4"));

        let modules = reconcile_modules(&tree, &current, &attachments, &store).await.unwrap();

        assert_eq!(store.upload_count(), 1);

        let untouched = &modules[0].videos[0];
        assert_eq!(untouched.asset.asset_id, "keep-a");
        assert_eq!(untouched.size, 1024);

        let replaced = &modules[0].videos[1];
        assert_eq!(replaced.asset.asset_id, "asset-1");
        assert_eq!(replaced.size, 3);
        assert_eq!(replaced.duration, Some(45));
        // identity and creation time survive a content replacement
        assert_eq!(replaced.id, current[0].videos[1].id);
        assert_eq!(replaced.created_at, current[0].videos[1].created_at);
    }

    #[actix_web::test]
    async fn update_ignores_positions_outside_the_declared_tree() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module("M1", vec![persisted_video("a.mp4", "keep-a")])];
        let tree = vec![declared("M1", &[("a.mp4", None)])];

        let mut attachments = AttachmentSet::default();
        attachments.insert("modules[5][videos][0][file]", attachment("stray.mp4", "video/mp4"));

        let modules = reconcile_modules(&tree, &current, &attachments, &store).await.unwrap();

        assert_eq!(store.upload_count(), 0);
        assert_eq!(modules[0].videos[0].asset.asset_id, "keep-a");
    }

    #[actix_web::test]
    async fn update_rejects_videos_with_no_asset_source() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module("M1", vec![persisted_video("a.mp4", "keep-a")])];
        let tree = vec![declared("M1", &[("a.mp4", None), ("brand-new.mp4", None)])];

        let err = reconcile_modules(&tree, &current, &AttachmentSet::default(), &store)
            .await
            .unwrap_err();

        assert!(matches!(err, error::SystemError::AssetNotFound(_)));
    }

    #[actix_web::test]
    async fn update_uploads_for_new_positions_with_attachments() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module("M1", vec![persisted_video("a.mp4", "keep-a")])];
        let tree = vec![declared("M1", &[("a.mp4", None), ("new.mp4", Some(12))])];

        let mut attachments = AttachmentSet::default();
        attachments.insert("modules[0][videos][1][file]", attachment("new.mp4", "video/mp4"));

        let modules = reconcile_modules(&tree, &current, &attachments, &store).await.unwrap();

        assert_eq!(store.upload_count(), 1);
        assert_eq!(modules[0].videos[1].name, "new.mp4");
        assert_eq!(modules[0].videos[1].duration, Some(12));
        assert!(!modules[0].videos[1].asset.asset_id.is_empty());
    }

    #[actix_web::test]
    async fn update_keeps_module_ids_stable_by_position() {
        let store = MemoryMediaStore::new();
        let current = vec![persisted_module("M1", vec![persisted_video("a.mp4", "keep-a")])];
        let tree = vec![declared("M1 renamed", &[("a.mp4", None)]), declared("M2", &[])];

        let modules =
            reconcile_modules(&tree, &current, &AttachmentSet::default(), &store).await.unwrap();

        assert_eq!(modules[0].id, current[0].id);
        assert_eq!(modules[0].name, "M1 renamed");
        assert_eq!(modules[0].created_at, current[0].created_at);
        assert_ne!(modules[1].id, current[0].id);
        assert!(modules[1].videos.is_empty());
    }
}
