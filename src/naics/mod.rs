//! NAICS resolution for series identifiers.
//!
//! Every source family encodes its industry differently in the series id:
//!
//! | Family    | Example       | Rule                                        |
//! |-----------|---------------|---------------------------------------------|
//! | CES       | `CES3133600101` | chars `3..11` looked up in the CES crosswalk |
//! | M3        | `11A_VS`      | prefix looked up in the M3 crosswalk        |
//! | Wholesale | `4231_SM`     | all-digit prefix is the code                |
//! | QSS       | `2211T_QREV`  | prefix minus trailing letters               |
//!
//! Resolution never fails; an id that cannot be classified is
//! [`Resolution::Unresolved`].

mod m3_map;
mod sectors;

use std::path::Path;

use crate::error::Result;
use crate::models::{NaicsMap, NaicsMapEntry, load_naics_map};

pub use sectors::{SECTORS, sector_name};

/// How a source family encodes its industry in the series id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFamily {
    Ces,
    M3,
    Wholesale,
    Qss,
    /// No industry encoding
    Unclassified,
}

/// Outcome of resolving one series id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A concrete NAICS code, with a crosswalk name when one exists
    Code { code: String, name: Option<String> },
    /// Crosswalk knows the category but it has no single code (composites)
    NameOnly(String),
    Unresolved,
}

impl Resolution {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Code { name, .. } => name.as_deref(),
            Self::NameOnly(name) => Some(name),
            Self::Unresolved => None,
        }
    }

    /// Code and display name for an index entry.
    ///
    /// The crosswalk name wins unless it merely repeats the series name;
    /// otherwise the 2-digit sector name; otherwise the series' own name.
    /// `None` when there is no code.
    pub fn display(&self, series_name: &str) -> Option<(String, String)> {
        let code = self.code()?;
        let name = self
            .name()
            .filter(|name| *name != series_name)
            .map(str::to_string)
            .or_else(|| code.get(..2).and_then(sector_name).map(str::to_string))
            .unwrap_or_else(|| series_name.to_string());
        Some((code.to_string(), name))
    }
}

/// Crosswalk tables plus the per-family extraction rules.
#[derive(Debug, Clone, Default)]
pub struct NaicsResolver {
    ces: NaicsMap,
    m3: NaicsMap,
}

impl NaicsResolver {
    pub fn new(ces: NaicsMap, m3: NaicsMap) -> Self {
        Self { ces, m3 }
    }

    /// Resolver with an empty CES table and the built-in M3 crosswalk.
    pub fn with_builtin() -> Self {
        Self::new(NaicsMap::new(), builtin_m3_map())
    }

    /// Load crosswalk files from `config_dir`, using built-ins for any
    /// that are missing.
    pub async fn load(ces_path: &Path, m3_path: &Path) -> Result<Self> {
        let ces = load_naics_map(ces_path).await?.unwrap_or_else(|| {
            log::warn!(
                "{} not found; CES series will not carry NAICS codes",
                ces_path.display()
            );
            NaicsMap::new()
        });
        let m3 = load_naics_map(m3_path).await?.unwrap_or_else(builtin_m3_map);
        Ok(Self::new(ces, m3))
    }

    pub fn resolve(&self, family: SourceFamily, series_id: &str) -> Resolution {
        match family {
            SourceFamily::Ces => self.resolve_ces(series_id),
            SourceFamily::M3 => self.resolve_m3(series_id),
            SourceFamily::Wholesale => resolve_wholesale(series_id),
            SourceFamily::Qss => resolve_qss(series_id),
            SourceFamily::Unclassified => Resolution::Unresolved,
        }
    }

    fn resolve_ces(&self, series_id: &str) -> Resolution {
        let Some(establishment) = series_id.get(3..11) else {
            return Resolution::Unresolved;
        };
        match self.ces.get(establishment) {
            Some(entry) if entry.naics != "-" => Resolution::Code {
                code: entry.naics.clone(),
                name: Some(entry.name.clone()),
            },
            _ => Resolution::Unresolved,
        }
    }

    fn resolve_m3(&self, series_id: &str) -> Resolution {
        let Some(entry) = self.m3.get(id_prefix(series_id)) else {
            return Resolution::Unresolved;
        };
        match entry.primary_code() {
            Some(code) => Resolution::Code {
                code: code.to_string(),
                name: Some(entry.name.clone()),
            },
            None => Resolution::NameOnly(entry.name.clone()),
        }
    }
}

/// The part of an id before the first `_`.
fn id_prefix(series_id: &str) -> &str {
    series_id.split('_').next().unwrap_or(series_id)
}

fn resolve_wholesale(series_id: &str) -> Resolution {
    let prefix = id_prefix(series_id);
    if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
        Resolution::Code {
            code: prefix.to_string(),
            name: None,
        }
    } else {
        Resolution::Unresolved
    }
}

fn resolve_qss(series_id: &str) -> Resolution {
    let code = id_prefix(series_id).trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if code.is_empty() || code == "000000" {
        Resolution::Unresolved
    } else {
        Resolution::Code {
            code: code.to_string(),
            name: None,
        }
    }
}

/// The built-in M3 crosswalk as a map.
pub fn builtin_m3_map() -> NaicsMap {
    m3_map::M3_CROSSWALK
        .iter()
        .map(|&(code, naics, name, aggregate)| {
            (
                code.to_string(),
                NaicsMapEntry {
                    naics: naics.to_string(),
                    name: name.to_string(),
                    aggregate,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ces_resolver() -> NaicsResolver {
        let mut ces = NaicsMap::new();
        ces.insert(
            "31336001".into(),
            NaicsMapEntry::new("3361", "Motor vehicles"),
        );
        ces.insert("30000000".into(), NaicsMapEntry::new("-", "Manufacturing"));
        NaicsResolver::new(ces, builtin_m3_map())
    }

    #[test]
    fn test_m3_concrete_code() {
        let r = NaicsResolver::with_builtin().resolve(SourceFamily::M3, "11A_VS");
        assert_eq!(r.code(), Some("3112"));
        assert_eq!(r.name(), Some("Grain and Oilseed Milling"));
    }

    #[test]
    fn test_m3_aggregate_has_name_only() {
        let r = NaicsResolver::with_builtin().resolve(SourceFamily::M3, "MTM_SM");
        assert_eq!(r, Resolution::NameOnly("Total Manufacturing".into()));
        assert_eq!(r.code(), None);
    }

    #[test]
    fn test_m3_comma_list_takes_first() {
        let r = NaicsResolver::with_builtin().resolve(SourceFamily::M3, "11C_NO");
        assert_eq!(r.code(), Some("3116"));
    }

    #[test]
    fn test_m3_unknown_code() {
        let r = NaicsResolver::with_builtin().resolve(SourceFamily::M3, "ZZZ_VS");
        assert_eq!(r, Resolution::Unresolved);
    }

    #[test]
    fn test_wholesale_digits_only() {
        let resolver = NaicsResolver::default();
        assert_eq!(
            resolver.resolve(SourceFamily::Wholesale, "4231_SM").code(),
            Some("4231")
        );
        assert_eq!(
            resolver.resolve(SourceFamily::Wholesale, "ABCD_SM"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn test_qss_strips_trailing_letters() {
        let resolver = NaicsResolver::default();
        assert_eq!(
            resolver.resolve(SourceFamily::Qss, "2211T_QREV").code(),
            Some("2211")
        );
        assert_eq!(
            resolver.resolve(SourceFamily::Qss, "4849YT_QREV").code(),
            Some("4849")
        );
        assert_eq!(
            resolver.resolve(SourceFamily::Qss, "000000T_QREV"),
            Resolution::Unresolved
        );
        assert_eq!(
            resolver.resolve(SourceFamily::Qss, "TOTAL_QREV"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn test_ces_lookup_and_sentinel() {
        let resolver = ces_resolver();
        let r = resolver.resolve(SourceFamily::Ces, "CES3133600101");
        assert_eq!(r.code(), Some("3361"));
        assert_eq!(r.name(), Some("Motor vehicles"));

        assert_eq!(
            resolver.resolve(SourceFamily::Ces, "CES3000000001"),
            Resolution::Unresolved
        );
        assert_eq!(
            resolver.resolve(SourceFamily::Ces, "CES31"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn test_ces_resolution_is_pure() {
        let resolver = ces_resolver();
        let first = resolver.resolve(SourceFamily::Ces, "CES3133600101");
        for _ in 0..3 {
            assert_eq!(resolver.resolve(SourceFamily::Ces, "CES3133600101"), first);
        }
    }

    #[test]
    fn test_unclassified_family() {
        let r = NaicsResolver::with_builtin().resolve(SourceFamily::Unclassified, "11A_VS");
        assert_eq!(r, Resolution::Unresolved);
    }

    #[test]
    fn test_display_fallbacks() {
        let with_name = Resolution::Code {
            code: "3112".into(),
            name: Some("Grain and Oilseed Milling".into()),
        };
        assert_eq!(
            with_name.display("Grain - Value of Shipments"),
            Some(("3112".into(), "Grain and Oilseed Milling".into()))
        );

        let sector_only = Resolution::Code {
            code: "4231".into(),
            name: None,
        };
        assert_eq!(
            sector_only.display("Motor vehicles"),
            Some(("4231".into(), "Wholesale Trade".into()))
        );

        let unknown_sector = Resolution::Code {
            code: "9999".into(),
            name: None,
        };
        assert_eq!(
            unknown_sector.display("Mystery"),
            Some(("9999".into(), "Mystery".into()))
        );

        assert_eq!(Resolution::NameOnly("Total".into()).display("x"), None);
    }

    #[test]
    fn test_display_name_repeating_series_name_uses_sector() {
        let same_name = Resolution::Code {
            code: "3361".into(),
            name: Some("Motor vehicles".into()),
        };
        assert_eq!(
            same_name.display("Motor vehicles"),
            Some(("3361".into(), "Manufacturing".into()))
        );

        let same_unknown_sector = Resolution::Code {
            code: "9999".into(),
            name: Some("Mystery".into()),
        };
        assert_eq!(
            same_unknown_sector.display("Mystery"),
            Some(("9999".into(), "Mystery".into()))
        );
    }
}
