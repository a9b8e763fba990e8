use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::course::model::{CourseDocument, CourseForm, NewCourse};
use crate::modules::course::repository::CourseRepository;
use crate::modules::course::schema::{CourseModule, CourseResponse, VideoItem};
use crate::modules::course::{cleanup, reconcile};
use crate::modules::media::attachment::{Attachment, AttachmentSet};
use crate::modules::media::model::AssetRef;
use crate::modules::media::store::{MediaKind, MediaStore};
use crate::modules::user::repository::UserRepository;

#[derive(Clone)]
pub struct CourseService {
    repo: Arc<dyn CourseRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    media: Arc<dyn MediaStore>,
}

impl CourseService {
    pub fn with_dependencies(
        repo: Arc<dyn CourseRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        info!("CourseService initialized with dependencies");
        CourseService { repo, users, media }
    }

    pub async fn list_courses(&self) -> Result<Vec<CourseResponse>, error::SystemError> {
        Ok(self.repo.find_all().await?.into_iter().map(CourseResponse::from).collect())
    }

    pub async fn get_course(&self, id: Uuid) -> Result<CourseResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(CourseResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Course not found"))
    }

    pub async fn count_courses(&self) -> Result<i64, error::SystemError> {
        self.repo.count().await
    }

    /// Creates a course atomically with its module tree: every attachment is
    /// resolved and uploaded before the single document write. Any failure
    /// along the way aborts with nothing persisted.
    pub async fn create_course(
        &self,
        form: CourseForm,
        attachments: AttachmentSet,
    ) -> Result<CourseResponse, error::SystemError> {
        let name =
            form.name.ok_or_else(|| error::SystemError::bad_request("Course name required"))?;
        let price =
            form.price.ok_or_else(|| error::SystemError::bad_request("Course price required"))?;
        let level =
            form.level.ok_or_else(|| error::SystemError::bad_request("Course level required"))?;
        let lecturer = form
            .lecturer
            .ok_or_else(|| error::SystemError::bad_request("Course lecturer required"))?;

        if self.users.find_by_id(&lecturer).await?.is_none() {
            return Err(error::SystemError::bad_request("Lecturer not found"));
        }

        let thumbnail = self.upload_thumbnail(&attachments).await?;
        let declared = form.modules.unwrap_or_default();
        let modules =
            reconcile::assemble_modules(&declared, &attachments, self.media.as_ref()).await?;

        let course = self
            .repo
            .insert(&NewCourse {
                name,
                description: form.description,
                level,
                price,
                lecturer,
                requirements: form.requirements.unwrap_or_default(),
                thumbnail,
                modules,
            })
            .await?;

        info!("Course {} created", course.id);
        Ok(course.into())
    }

    /// Reconciles the declared module tree against the persisted one and
    /// writes the whole document back. Absent or empty scalar fields keep
    /// their stored values; a fresh thumbnail replaces the old reference
    /// without deleting the old asset.
    pub async fn update_course(
        &self,
        id: Uuid,
        form: CourseForm,
        attachments: AttachmentSet,
    ) -> Result<CourseResponse, error::SystemError> {
        let current = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        if let Some(lecturer) = form.lecturer {
            if self.users.find_by_id(&lecturer).await?.is_none() {
                return Err(error::SystemError::bad_request("Lecturer not found"));
            }
        }

        let modules = match form.modules.filter(|m| !m.is_empty()) {
            Some(declared) => {
                reconcile::reconcile_modules(
                    &declared,
                    &current.modules,
                    &attachments,
                    self.media.as_ref(),
                )
                .await?
            }
            None => current.modules.0.clone(),
        };

        let thumbnail = match self.upload_thumbnail(&attachments).await? {
            Some(asset) => Some(asset),
            None => current.thumbnail.clone().map(|t| t.0),
        };

        let doc = CourseDocument {
            name: form.name.unwrap_or(current.name),
            description: form.description.or(current.description),
            level: form.level.unwrap_or(current.level),
            price: form.price.unwrap_or(current.price),
            lecturer: form.lecturer.unwrap_or(current.lecturer),
            requirements: form
                .requirements
                .filter(|r| !r.is_empty())
                .unwrap_or(current.requirements),
            thumbnail,
            modules,
        };

        let updated = self
            .repo
            .replace(&id, &doc)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        Ok(updated.into())
    }

    /// Deletes the document, then kicks off best-effort remote asset cleanup
    /// in the background. The delete succeeds regardless of cleanup outcome.
    pub async fn delete_course(&self, id: Uuid) -> Result<(), error::SystemError> {
        let course = self
            .repo
            .delete(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let assets = cleanup::collect_assets(&course);
        info!("Course {} deleted, purging {} assets", id, assets.len());
        actix_web::rt::spawn(cleanup::purge_assets(self.media.clone(), assets));

        Ok(())
    }

    pub async fn add_module(
        &self,
        id: Uuid,
        name: String,
    ) -> Result<CourseResponse, error::SystemError> {
        let current = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let mut modules = current.modules.0.clone();
        modules.push(CourseModule::new(name));

        let updated = self
            .repo
            .replace(&id, &CourseDocument::from_entity(&current, modules))
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        Ok(updated.into())
    }

    pub async fn add_video(
        &self,
        course_id: Uuid,
        module_id: Uuid,
        file: Attachment,
        name: Option<String>,
        duration: Option<i64>,
    ) -> Result<VideoItem, error::SystemError> {
        let current = self
            .repo
            .find_by_id(&course_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let mut modules = current.modules.0.clone();
        let module = modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or_else(|| error::SystemError::not_found("Module not found"))?;

        let kind = MediaKind::from_mime(&file.mime_type);
        let asset = self.media.upload(file.bytes.clone(), &file.mime_type, kind).await?;

        let now = Utc::now();
        let video = VideoItem {
            id: Uuid::now_v7(),
            name: name.unwrap_or_else(|| file.file_name.clone()),
            asset,
            duration,
            size: file.size(),
            mime_type: file.mime_type.clone(),
            created_at: now,
            updated_at: now,
        };

        module.videos.push(video.clone());
        module.updated_at = now;

        self.repo
            .replace(&course_id, &CourseDocument::from_entity(&current, modules))
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        Ok(video)
    }

    pub async fn remove_video(
        &self,
        course_id: Uuid,
        module_id: Uuid,
        video_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let current = self
            .repo
            .find_by_id(&course_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let mut modules = current.modules.0.clone();
        let module = modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or_else(|| error::SystemError::not_found("Module not found"))?;

        let position = module
            .videos
            .iter()
            .position(|v| v.id == video_id)
            .ok_or_else(|| error::SystemError::not_found("Video not found"))?;
        let video = module.videos.remove(position);
        module.updated_at = Utc::now();

        self.repo
            .replace(&course_id, &CourseDocument::from_entity(&current, modules))
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        // asset removal is advisory; the document change stands either way
        let kind = MediaKind::from_mime(&video.mime_type);
        if let Err(err) = self.media.remove(&video.asset.asset_id, kind).await {
            log::warn!("Failed to remove asset {}: {}", video.asset.asset_id, err);
        }

        Ok(())
    }

    async fn upload_thumbnail(
        &self,
        attachments: &AttachmentSet,
    ) -> Result<Option<AssetRef>, error::SystemError> {
        match attachments.thumbnail() {
            Some(file) => {
                let asset =
                    self.media.upload(file.bytes.clone(), &file.mime_type, MediaKind::Image).await?;
                Ok(Some(asset))
            }
            None => Ok(None),
        }
    }
}
