use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::course::model::{CourseDocument, NewCourse},
    modules::course::repository::CourseRepository,
    modules::course::schema::CourseEntity,
};

#[derive(Clone)]
pub struct CoursePgRepository {
    pool: sqlx::PgPool,
}

impl CoursePgRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CourseRepository for CoursePgRepository {
    async fn find_all(&self) -> Result<Vec<CourseEntity>, error::SystemError> {
        let courses = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT * FROM courses ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError> {
        let course = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT * FROM courses WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn count(&self) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM courses
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert(&self, course: &NewCourse) -> Result<CourseEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (name, description, level, price, lecturer, requirements, thumbnail, modules)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&course.name)
        .bind(&course.description)
        .bind(&course.level)
        .bind(course.price)
        .bind(course.lecturer)
        .bind(&course.requirements)
        .bind(course.thumbnail.as_ref().map(Json))
        .bind(Json(&course.modules))
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn replace(
        &self,
        id: &Uuid,
        doc: &CourseDocument,
    ) -> Result<Option<CourseEntity>, error::SystemError> {
        let entity = sqlx::query_as::<_, CourseEntity>(
            r#"
            UPDATE courses
            SET name = $2, description = $3, level = $4, price = $5, lecturer = $6,
                requirements = $7, thumbnail = $8, modules = $9, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&doc.name)
        .bind(&doc.description)
        .bind(&doc.level)
        .bind(doc.price)
        .bind(doc.lecturer)
        .bind(&doc.requirements)
        .bind(doc.thumbnail.as_ref().map(Json))
        .bind(Json(&doc.modules))
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError> {
        let entity = sqlx::query_as::<_, CourseEntity>(
            r#"
            DELETE FROM courses WHERE id = $1 RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }
}
