pub mod course;
pub mod media;
pub mod user;
