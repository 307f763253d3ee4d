//! API credentials from `api_keys.json`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Agency API keys. Every field is optional; fetchers ask for what they need.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub census: Option<String>,
    #[serde(default)]
    pub fred: Option<String>,
    #[serde(default)]
    pub bea: Option<String>,
    #[serde(default)]
    pub bls: Option<String>,

    /// Why the file could not be read, reported by [`ApiKeys::require`]
    #[serde(skip)]
    unreadable: Option<String>,
}

impl ApiKeys {
    /// Load keys. Never fails: an absent file gives empty keys, and an
    /// unreadable one fails only the fetchers that `require` a key.
    pub async fn load(path: &Path) -> Self {
        let parsed = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice::<Self>(&bytes).map_err(AppError::from),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} not found; keyed APIs will fail", path.display());
                return Self::default();
            }
            Err(e) => Err(e.into()),
        };
        parsed.unwrap_or_else(|e| {
            log::warn!("{} unreadable: {}", path.display(), e);
            Self {
                unreadable: Some(format!("{}: {}", path.display(), e)),
                ..Self::default()
            }
        })
    }

    /// A key that must be present and non-blank.
    pub fn require(&self, name: &str) -> Result<&str> {
        if let Some(reason) = &self.unreadable {
            return Err(AppError::config(format!(
                "cannot read API key '{name}' from {reason}"
            )));
        }
        self.get(name)
            .ok_or_else(|| AppError::MissingCredential(name.to_string()))
    }

    /// A key if present and non-blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = match name {
            "census" => &self.census,
            "fred" => &self.fred,
            "bea" => &self.bea,
            "bls" => &self.bls,
            _ => return None,
        };
        key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_missing_key() {
        let keys: ApiKeys = serde_json::from_str(r#"{"census": "abc", "fred": "  "}"#).unwrap();
        assert_eq!(keys.require("census").unwrap(), "abc");
        assert!(matches!(
            keys.require("fred"),
            Err(AppError::MissingCredential(name)) if name == "fred"
        ));
        assert!(keys.require("bea").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_gives_empty_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keys = ApiKeys::load(&dir.path().join("api_keys.json")).await;
        assert!(keys.get("bls").is_none());
        assert!(matches!(keys.require("bls"), Err(AppError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_fails_only_on_require() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_keys.json");
        std::fs::write(&path, "{not json").unwrap();

        let keys = ApiKeys::load(&path).await;
        assert!(keys.get("census").is_none());
        let err = keys.require("census").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("api_keys.json"));
    }
}
