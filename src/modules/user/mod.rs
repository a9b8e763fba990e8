pub mod repository;
pub mod repository_pg;
pub mod schema;

pub use repository::UserRepository;
pub use repository_pg::UserPgRepository;
pub use schema::UserEntity;
