use crate::api::error;
use crate::modules::media::model::AssetRef;

/// Resource type an asset is tagged with at the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `image/*` payloads are tagged as images, everything else as video.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }

    pub fn as_segment(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads one binary and returns its stable asset reference. A failure
    /// means the caller must abort without persisting anything.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        kind: MediaKind,
    ) -> Result<AssetRef, error::SystemError>;

    /// Removes one asset. Best-effort: callers log failures and move on.
    async fn remove(&self, asset_id: &str, kind: MediaKind) -> Result<(), error::SystemError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::{MediaKind, MediaStore};
    use crate::api::error;
    use crate::modules::media::model::AssetRef;

    /// In-memory double recording every store interaction.
    pub struct MemoryMediaStore {
        pub uploads: Mutex<Vec<(MediaKind, String)>>,
        pub removed: Mutex<Vec<(String, MediaKind)>>,
        fail_uploads: bool,
        fail_remove_of: Option<String>,
        counter: AtomicUsize,
    }

    impl MemoryMediaStore {
        pub fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
                fail_uploads: false,
                fail_remove_of: None,
                counter: AtomicUsize::new(0),
            }
        }

        pub fn failing_uploads() -> Self {
            Self { fail_uploads: true, ..Self::new() }
        }

        pub fn failing_remove_of(asset_id: &str) -> Self {
            Self { fail_remove_of: Some(asset_id.to_string()), ..Self::new() }
        }

        pub fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl MediaStore for MemoryMediaStore {
        async fn upload(
            &self,
            _bytes: Vec<u8>,
            mime_type: &str,
            kind: MediaKind,
        ) -> Result<AssetRef, error::SystemError> {
            if self.fail_uploads {
                return Err(error::SystemError::upload_failure("media store unreachable"));
            }
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            self.uploads.lock().unwrap().push((kind, mime_type.to_string()));
            Ok(AssetRef {
                asset_id: format!("asset-{n}"),
                url: format!("https://media.test/{}/asset-{n}", kind.as_segment()),
            })
        }

        async fn remove(
            &self,
            asset_id: &str,
            kind: MediaKind,
        ) -> Result<(), error::SystemError> {
            if self.fail_remove_of.as_deref() == Some(asset_id) {
                return Err(error::SystemError::cleanup_failure("media store unreachable"));
            }
            self.removed.lock().unwrap().push((asset_id.to_string(), kind));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_is_classified_as_image() {
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("image/webp"), MediaKind::Image);
    }

    #[test]
    fn everything_else_is_classified_as_video() {
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("application/octet-stream"), MediaKind::Video);
    }
}
