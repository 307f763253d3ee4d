//! Search index records and the page registry they point at.

use serde::{Deserialize, Serialize};

use crate::naics::SourceFamily;

/// A chart page a data file is displayed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub page: &'static str,
    pub page_label: &'static str,
    pub section: &'static str,
    pub section_label: &'static str,
}

/// A data file and every page that shows it.
#[derive(Debug, Clone)]
pub struct DataFilePages {
    pub data_file: &'static str,
    pub family: SourceFamily,
    pub pages: Vec<PageInfo>,
}

/// One row of `search_index.json`: a series as shown on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub id: String,
    pub name: String,
    pub section: String,
    pub section_label: String,
    pub page: String,
    pub page_label: String,
    pub data_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics_name: Option<String>,
}
