use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = "Spendscope";

/// Stores user preferences shared by every screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub locale: String,
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// User whose records are fetched when a screen does not name one.
    pub default_user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for stored records. Defaults to `~/Documents/Spendscope`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_user_id: None,
            data_root: None,
        }
    }
}

impl Config {
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(DATA_DIR_NAME)
    }

    /// Falls back to the configured default when `user_id` is blank.
    pub fn user_or_default<'a>(&'a self, user_id: Option<&'a str>) -> &'a str {
        user_id
            .filter(|id| !id.trim().is_empty())
            .or(self.default_user_id.as_deref())
            .unwrap_or_default()
    }
}
