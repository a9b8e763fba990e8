pub mod cleanup;
pub mod handle;
pub mod model;
pub mod reconcile;
pub mod repository;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

pub use repository::CourseRepository;
pub use repository_pg::CoursePgRepository;
pub use schema::{CourseEntity, CourseModule, CourseResponse, VideoItem};
pub use service::CourseService;
