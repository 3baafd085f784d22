//! Storage types

use chrono::{DateTime, Utc};

use crate::stores::StoreName;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Metadata about a storage object
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// A storage object with its data
#[derive(Debug, Clone)]
pub struct StorageObject {
    pub metadata: ObjectMetadata,
    pub data: Vec<u8>,
}

/// Object key for a store snapshot, e.g. `users/all_users.json`
pub fn snapshot_key(store: StoreName, key: &str) -> String {
    format!("{}/{}.json", store, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_key() {
        assert_eq!(snapshot_key(StoreName::Records, "data"), "records/data.json");
        assert_eq!(
            snapshot_key(StoreName::Stats, StoreName::Stats.key()),
            "stats/recent_logs.json"
        );
    }
}
