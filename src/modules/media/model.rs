use serde::{Deserialize, Serialize};

/// A (provider id, retrieval URL) pair identifying one uploaded binary
/// in the remote object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    pub asset_id: String,
    pub url: String,
}
