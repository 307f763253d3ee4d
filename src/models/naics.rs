//! Crosswalk entries mapping agency codes to NAICS industries.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One crosswalk row.
///
/// `naics` is a single code, a comma-separated list, `"composite"`, `"-"`,
/// a range such as `"31-33"`, or a code annotated with `"(other)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaicsMapEntry {
    pub naics: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub aggregate: bool,
}

impl NaicsMapEntry {
    pub fn new(naics: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            naics: naics.into(),
            name: name.into(),
            aggregate: false,
        }
    }

    /// The first concrete code, or `None` for composites, ranges and
    /// annotated entries.
    pub fn primary_code(&self) -> Option<&str> {
        let naics = self.naics.as_str();
        if naics == "composite" || naics.contains('(') || naics.contains('-') {
            return None;
        }
        naics.split(',').next().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Agency code to crosswalk entry.
pub type NaicsMap = HashMap<String, NaicsMapEntry>;

/// Load a crosswalk JSON object, `None` when the file is absent.
pub async fn load_naics_map(path: &Path) -> Result<Option<NaicsMap>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
