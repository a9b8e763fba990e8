use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::api::error;
use crate::modules::course::schema::{CourseEntity, CourseModule};
use crate::modules::media::model::AssetRef;

/// Client-declared module tree, submitted as a JSON-encoded string field
/// next to the file attachments.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclaredModule {
    pub name: String,
    #[serde(default)]
    pub videos: Vec<DeclaredVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeclaredVideo {
    pub name: String,
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Scalar course fields parsed out of the multipart text parts. Absent or
/// empty fields stay `None`; on update they leave the stored value alone.
#[derive(Debug, Default)]
pub struct CourseForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub price: Option<Decimal>,
    pub lecturer: Option<Uuid>,
    pub requirements: Option<Vec<String>>,
    pub modules: Option<Vec<DeclaredModule>>,
}

impl CourseForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, error::SystemError> {
        let mut form = CourseForm {
            name: nonempty(fields.get("name")),
            description: nonempty(fields.get("description")),
            level: nonempty(fields.get("level")),
            ..CourseForm::default()
        };

        if let Some(price) = nonempty(fields.get("price")) {
            let price: Decimal = price
                .parse()
                .map_err(|_| error::SystemError::bad_request("Price must be a decimal number"))?;
            if price < Decimal::ZERO {
                return Err(error::SystemError::bad_request("Price must not be negative"));
            }
            form.price = Some(price);
        }

        if let Some(lecturer) = nonempty(fields.get("lecturer")) {
            form.lecturer = Some(
                lecturer
                    .parse()
                    .map_err(|_| error::SystemError::bad_request("Lecturer must be a user id"))?,
            );
        }

        if let Some(requirements) = nonempty(fields.get("requirements")) {
            form.requirements = Some(
                serde_json::from_str(&requirements)
                    .map_err(|_| error::SystemError::bad_request("Invalid requirements JSON"))?,
            );
        }

        if let Some(modules) = nonempty(fields.get("modules")) {
            form.modules = Some(
                serde_json::from_str(&modules)
                    .map_err(|_| error::SystemError::bad_request("Invalid modules JSON"))?,
            );
        }

        Ok(form)
    }
}

fn nonempty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(|v| v.to_string())
}

/// Fully-resolved course ready for its first write. Every video in
/// `modules` already carries an asset reference.
#[derive(Debug)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub level: String,
    pub price: Decimal,
    pub lecturer: Uuid,
    pub requirements: Vec<String>,
    pub thumbnail: Option<AssetRef>,
    pub modules: Vec<CourseModule>,
}

/// Whole-document state written back on every course mutation.
#[derive(Debug)]
pub struct CourseDocument {
    pub name: String,
    pub description: Option<String>,
    pub level: String,
    pub price: Decimal,
    pub lecturer: Uuid,
    pub requirements: Vec<String>,
    pub thumbnail: Option<AssetRef>,
    pub modules: Vec<CourseModule>,
}

impl CourseDocument {
    /// Snapshot of a stored course with its module tree swapped out,
    /// scalars untouched.
    pub fn from_entity(entity: &CourseEntity, modules: Vec<CourseModule>) -> Self {
        CourseDocument {
            name: entity.name.clone(),
            description: entity.description.clone(),
            level: entity.level.clone(),
            price: entity.price,
            lecturer: entity.lecturer,
            requirements: entity.requirements.clone(),
            thumbnail: entity.thumbnail.clone().map(|t| t.0),
            modules,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddModuleModel {
    #[validate(length(min = 1, message = "Module name required"))]
    pub name: String,
}
