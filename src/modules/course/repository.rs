use uuid::Uuid;

use crate::{
    api::error,
    modules::course::model::{CourseDocument, NewCourse},
    modules::course::schema::CourseEntity,
};

#[async_trait::async_trait]
pub trait CourseRepository {
    /// All courses, newest first.
    async fn find_all(&self) -> Result<Vec<CourseEntity>, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError>;

    async fn count(&self) -> Result<i64, error::SystemError>;

    async fn insert(&self, course: &NewCourse) -> Result<CourseEntity, error::SystemError>;

    /// Whole-document overwrite; returns `None` when the id no longer exists.
    async fn replace(
        &self,
        id: &Uuid,
        doc: &CourseDocument,
    ) -> Result<Option<CourseEntity>, error::SystemError>;

    /// Deletes and returns the removed document so asset cleanup can run.
    async fn delete(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError>;
}
