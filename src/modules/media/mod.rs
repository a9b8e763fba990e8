pub mod attachment;
pub mod model;
pub mod store;
pub mod store_http;

pub use attachment::{Attachment, AttachmentSet};
pub use model::AssetRef;
pub use store::{MediaKind, MediaStore};
pub use store_http::HttpMediaStore;
