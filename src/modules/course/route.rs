use crate::modules::course::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    // /count must register ahead of the /{id} matcher
    cfg.service(
        scope("/courses")
            .service(get_course_count)
            .service(get_courses)
            .service(get_course)
            .service(create_course)
            .service(update_course)
            .service(delete_course)
            .service(add_module)
            .service(add_video)
            .service(remove_video),
    );
}
