use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web};
use uuid::Uuid;

use crate::api::{error, success};
use crate::modules::course::model::{AddModuleModel, CourseForm};
use crate::modules::course::schema::{CourseCountResponse, CourseResponse, VideoItem};
use crate::modules::course::service::CourseService;
use crate::modules::media::attachment;
use crate::utils::ValidatedJson;

/// Ids arrive as raw path segments; anything that is not a UUID names no
/// resource and is reported as such.
fn parse_id(raw: &str) -> Result<Uuid, error::Error> {
    raw.parse().map_err(|_| error::Error::not_found("Invalid course id"))
}

#[get("")]
pub async fn get_courses(
    course_service: web::Data<CourseService>,
) -> Result<success::Success<Vec<CourseResponse>>, error::Error> {
    let courses = course_service.list_courses().await?;
    Ok(success::Success::ok(Some(courses)).message("Courses retrieved successfully"))
}

#[get("/count")]
pub async fn get_course_count(
    course_service: web::Data<CourseService>,
) -> Result<success::Success<CourseCountResponse>, error::Error> {
    let total_courses = course_service.count_courses().await?;
    Ok(success::Success::ok(Some(CourseCountResponse { total_courses })))
}

#[get("/{id}")]
pub async fn get_course(
    course_service: web::Data<CourseService>,
    id: web::Path<String>,
) -> Result<success::Success<CourseResponse>, error::Error> {
    let id = parse_id(&id)?;
    let course = course_service.get_course(id).await?;
    Ok(success::Success::ok(Some(course)).message("Course retrieved successfully"))
}

#[post("")]
pub async fn create_course(
    course_service: web::Data<CourseService>,
    payload: Multipart,
) -> Result<success::Success<CourseResponse>, error::Error> {
    let (fields, attachments) = attachment::collect(payload).await?;
    let form = CourseForm::from_fields(&fields).map_err(error::Error::from)?;
    let course = course_service.create_course(form, attachments).await?;
    Ok(success::Success::created(Some(course)).message("Course created"))
}

#[put("/{id}")]
pub async fn update_course(
    course_service: web::Data<CourseService>,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<success::Success<CourseResponse>, error::Error> {
    let id = parse_id(&id)?;
    let (fields, attachments) = attachment::collect(payload).await?;
    let form = CourseForm::from_fields(&fields).map_err(error::Error::from)?;
    let course = course_service.update_course(id, form, attachments).await?;
    Ok(success::Success::ok(Some(course)).message("Course updated"))
}

#[delete("/{id}")]
pub async fn delete_course(
    course_service: web::Data<CourseService>,
    id: web::Path<String>,
) -> Result<success::Success<()>, error::Error> {
    let id = parse_id(&id)?;
    course_service.delete_course(id).await?;
    Ok(success::Success::ok(None).message("Course deleted"))
}

#[post("/{id}/modules")]
pub async fn add_module(
    course_service: web::Data<CourseService>,
    id: web::Path<String>,
    module: ValidatedJson<AddModuleModel>,
) -> Result<success::Success<CourseResponse>, error::Error> {
    let id = parse_id(&id)?;
    let course = course_service.add_module(id, module.0.name).await?;
    Ok(success::Success::created(Some(course)).message("Module added"))
}

#[post("/{course_id}/modules/{module_id}/videos")]
pub async fn add_video(
    course_service: web::Data<CourseService>,
    path: web::Path<(String, String)>,
    payload: Multipart,
) -> Result<success::Success<VideoItem>, error::Error> {
    let (course_id, module_id) = path.into_inner();
    let course_id = parse_id(&course_id)?;
    let module_id = parse_id(&module_id)?;

    let (fields, attachments) = attachment::collect(payload).await?;
    let file = attachments
        .into_single()
        .ok_or_else(|| error::Error::bad_request("No file uploaded"))?;
    let name = fields.get("name").filter(|n| !n.trim().is_empty()).cloned();
    let duration = fields.get("duration").and_then(|d| d.trim().parse().ok());

    let video = course_service.add_video(course_id, module_id, file, name, duration).await?;
    Ok(success::Success::created(Some(video)).message("Video added"))
}

#[delete("/{course_id}/modules/{module_id}/videos/{video_id}")]
pub async fn remove_video(
    course_service: web::Data<CourseService>,
    path: web::Path<(String, String, String)>,
) -> Result<success::Success<()>, error::Error> {
    let (course_id, module_id, video_id) = path.into_inner();
    let course_id = parse_id(&course_id)?;
    let module_id = parse_id(&module_id)?;
    let video_id = parse_id(&video_id)?;

    course_service.remove_video(course_id, module_id, video_id).await?;
    Ok(success::Success::ok(None).message("Video deleted"))
}
