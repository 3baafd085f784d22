//! Store catalog
//!
//! The admin interface manages exactly three stores. Each store keeps a single
//! JSON snapshot under a fixed key, and both the upload endpoint and the upload
//! orchestrator resolve keys through this table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of one of the managed stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreName {
    Records,
    Users,
    Stats,
}

impl StoreName {
    /// All stores, in display order
    pub const ALL: [StoreName; 3] = [StoreName::Records, StoreName::Users, StoreName::Stats];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreName::Records => "records",
            StoreName::Users => "users",
            StoreName::Stats => "stats",
        }
    }

    /// Persistence key the snapshot is stored under
    pub fn key(&self) -> &'static str {
        self.config().key
    }

    pub fn config(&self) -> &'static StoreConfig {
        match self {
            StoreName::Records => &STORE_CONFIGS[0],
            StoreName::Users => &STORE_CONFIGS[1],
            StoreName::Stats => &STORE_CONFIGS[2],
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub name: StoreName,
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Conventional file name of the snapshot
    pub hint: &'static str,
}

pub static STORE_CONFIGS: [StoreConfig; 3] = [
    StoreConfig {
        name: StoreName::Records,
        key: "data",
        label: "Records",
        description: "Main database records",
        hint: "records/data.json",
    },
    StoreConfig {
        name: StoreName::Users,
        key: "all_users",
        label: "Users",
        description: "User accounts and roles",
        hint: "users/all_users.json",
    },
    StoreConfig {
        name: StoreName::Stats,
        key: "recent_logs",
        label: "Statistics",
        description: "Activity logs and metrics",
        hint: "stats/recent_logs.json",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(StoreName::Records.key(), "data");
        assert_eq!(StoreName::Users.key(), "all_users");
        assert_eq!(StoreName::Stats.key(), "recent_logs");
    }

    #[test]
    fn test_configs_line_up_with_names() {
        for store in StoreName::ALL {
            assert_eq!(store.config().name, store);
            assert_eq!(store.config().hint, format!("{}/{}.json", store, store.key()));
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&StoreName::Stats).unwrap();
        assert_eq!(json, "\"stats\"");

        let parsed: StoreName = serde_json::from_str("\"users\"").unwrap();
        assert_eq!(parsed, StoreName::Users);

        assert!(serde_json::from_str::<StoreName>("\"logs\"").is_err());
    }
}
