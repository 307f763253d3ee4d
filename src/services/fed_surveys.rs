//! Regional Federal Reserve business survey diffusion indexes.
//!
//! Ten files from five Reserve Banks, in three layouts:
//! - CSV exports with a named date column (Philadelphia and New York)
//! - workbooks with a header row and dates in column A (Philadelphia
//!   services, Dallas, Richmond)
//! - Kansas City workbooks, transposed: dates across row 3, indicators down
//!   column A, split into month-ago / six-months-ahead sections

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{Data, DataType, Range, Reader, Xlsx, open_workbook_from_rs};
use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::{Frequency, Metadata, ObservationPoint, Series, TimeSeriesDocument, renumber, MIN_OBSERVATIONS};
use crate::services::{FetchContext, FetchReport, Fetcher, FetcherId};
use crate::utils::{http, period, round2};

const MFG_OUTPUT: &str = "fed_surveys/fed_mfg.json";
const SVC_OUTPUT: &str = "fed_surveys/fed_svc.json";

const NULL_TOKENS: &[&str] = &["ND", "#N/A", "NA", "N/A", "."];

/// `(source column or row label, code, display name)`, in output order.
pub type ColumnMap = &'static [(&'static str, &'static str, &'static str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyKind {
    Manufacturing,
    Services,
}

/// How a survey file lays out its observations.
#[derive(Debug, Clone, Copy)]
pub enum SurveyLayout {
    /// CSV, one row per month
    Csv { date_column: &'static str },
    /// Workbook sheet with a header row; the first sheet when `sheet` is `None`
    Sheet { sheet: Option<&'static str> },
    /// Kansas City workbook. `columns` holds the month-ago rows, `future`
    /// the six-months-ahead rows; only seasonally adjusted sections count.
    Transposed { future: ColumnMap },
}

/// One downloadable survey file.
#[derive(Debug)]
pub struct SurveySource {
    pub key: &'static str,
    pub city: &'static str,
    pub kind: SurveyKind,
    pub url: &'static str,
    pub layout: SurveyLayout,
    pub columns: ColumnMap,
}

impl SurveySource {
    /// Prefix for series ids, e.g. `PHILLY` from `philly_mfg`.
    fn id_prefix(&self) -> String {
        self.key
            .split('_')
            .next()
            .unwrap_or(self.key)
            .to_ascii_uppercase()
    }
}

static PHILLY_MFG_COLUMNS: ColumnMap = &[
    ("GAC", "GA_C", "General Activity"),
    ("NOC", "NO_C", "New Orders"),
    ("SHC", "SH_C", "Shipments"),
    ("UOC", "UO_C", "Unfilled Orders"),
    ("DTC", "DT_C", "Delivery Times"),
    ("IVC", "IV_C", "Inventories"),
    ("PPC", "PP_C", "Prices Paid"),
    ("PRC", "PR_C", "Prices Received"),
    ("NEC", "EMP_C", "Employment"),
    ("AWC", "AW_C", "Avg Workweek"),
    ("GAF", "GA_F", "Future General Activity"),
    ("NOF", "NO_F", "Future New Orders"),
    ("SHF", "SH_F", "Future Shipments"),
    ("UOF", "UO_F", "Future Unfilled Orders"),
    ("DTF", "DT_F", "Future Delivery Times"),
    ("IVF", "IV_F", "Future Inventories"),
    ("PPF", "PP_F", "Future Prices Paid"),
    ("PRF", "PR_F", "Future Prices Received"),
    ("NEF", "EMP_F", "Future Employment"),
    ("AWF", "AW_F", "Future Avg Workweek"),
    ("CEF", "CE_F", "Future Capital Expenditures"),
];

static PHILLY_SVC_COLUMNS: ColumnMap = &[
    ("garbndif_sa", "GA_C", "General Activity (Regional)"),
    ("gabndif_sa", "GAC_C", "General Activity (Company)"),
    ("nobndif_sa", "NO_C", "New Orders"),
    ("srbndif_sa", "REV_C", "Sales/Revenue"),
    ("uobndif_sa", "UO_C", "Unfilled Orders"),
    ("ivbndif_sa", "IV_C", "Inventories"),
    ("ppbndif_sa", "PP_C", "Prices Paid"),
    ("prbndif_sa", "PR_C", "Prices Received"),
    ("nfbndif_sa", "EMP_C", "Full-Time Employment"),
    ("npbndif_sa", "PEMP_C", "Part-Time Employment"),
    ("awbndif_sa", "AW_C", "Avg Workweek"),
    ("wbbndif_sa", "WB_C", "Wages & Benefits"),
    ("cpbndif_sa", "CEP_C", "CapEx (Plant)"),
    ("cebndif_sa", "CEE_C", "CapEx (Equipment)"),
    ("garfbndif_sa", "GA_F", "Future General Activity (Regional)"),
    ("gafbndif_sa", "GAC_F", "Future General Activity (Company)"),
];

static DALLAS_MFG_COLUMNS: ColumnMap = &[
    ("Prod", "PROD_C", "Production"),
    ("Capu", "CU_C", "Capacity Utilization"),
    ("Vnwo", "NO_C", "New Orders"),
    ("Gro", "GA_C", "General Business Activity"),
    ("Ufil", "UO_C", "Unfilled Orders"),
    ("Vshp", "SH_C", "Shipments"),
    ("Dtm", "DT_C", "Delivery Times"),
    ("Fgi", "IV_C", "Finished Goods Inventories"),
    ("Prm", "PP_C", "Prices Paid (Raw Materials)"),
    ("Pfg", "PR_C", "Prices Received (Finished Goods)"),
    ("Wgs", "WB_C", "Wages & Benefits"),
    ("Nemp", "EMP_C", "Employment"),
    ("Avgwk", "AW_C", "Hours Worked"),
    ("Cexp", "CE_C", "Capital Expenditures"),
    ("Colk", "OL_C", "Company Outlook"),
    ("Bact", "BA_C", "Business Activity"),
    ("Uncr", "UN_C", "Outlook Uncertainty"),
    ("Fprod", "PROD_F", "Future Production"),
    ("Fcapu", "CU_F", "Future Capacity Utilization"),
    ("Fvnwo", "NO_F", "Future New Orders"),
    ("Fgro", "GA_F", "Future General Business Activity"),
    ("Fufil", "UO_F", "Future Unfilled Orders"),
    ("Fvshp", "SH_F", "Future Shipments"),
    ("Fdtm", "DT_F", "Future Delivery Times"),
    ("Ffgi", "IV_F", "Future Finished Goods Inventories"),
    ("Fprm", "PP_F", "Future Prices Paid"),
    ("Fpfg", "PR_F", "Future Prices Received"),
    ("Fwgs", "WB_F", "Future Wages & Benefits"),
    ("Fnemp", "EMP_F", "Future Employment"),
    ("Favgwk", "AW_F", "Future Hours Worked"),
    ("Fcexp", "CE_F", "Future Capital Expenditures"),
    ("Fcolk", "OL_F", "Future Company Outlook"),
    ("Fbact", "BA_F", "Future Business Activity"),
];

static DALLAS_SVC_COLUMNS: ColumnMap = &[
    ("rev", "REV_C", "Revenue"),
    ("emp", "EMP_C", "Employment"),
    ("pemp", "PEMP_C", "Part-Time Employment"),
    ("avgwk", "AW_C", "Hours Worked"),
    ("wgs", "WB_C", "Wages & Benefits"),
    ("inp", "PP_C", "Input Prices"),
    ("sell", "PR_C", "Selling Prices"),
    ("cexp", "CE_C", "Capital Expenditures"),
    ("colk", "OL_C", "Company Outlook"),
    ("bact", "GA_C", "General Business Activity"),
    ("uncr", "UN_C", "Outlook Uncertainty"),
    ("frev", "REV_F", "Future Revenue"),
    ("femp", "EMP_F", "Future Employment"),
    ("fpemp", "PEMP_F", "Future Part-Time Employment"),
    ("favgwk", "AW_F", "Future Hours Worked"),
    ("fwgs", "WB_F", "Future Wages & Benefits"),
    ("finp", "PP_F", "Future Input Prices"),
    ("fsell", "PR_F", "Future Selling Prices"),
    ("fcexp", "CE_F", "Future Capital Expenditures"),
    ("fcolk", "OL_F", "Future Company Outlook"),
    ("fbact", "GA_F", "Future General Business Activity"),
];

// `_c` current, `_e` expected
static RICHMOND_MFG_COLUMNS: ColumnMap = &[
    ("sa_mfg_composite", "GA_C", "Composite Index"),
    ("sa_mfg_ship_c", "SH_C", "Shipments"),
    ("sa_mfg_new_orders_c", "NO_C", "New Orders"),
    ("sa_mfg_bk_logs_c", "UO_C", "Backlogs"),
    ("sa_mfg_cap_util_c", "CU_C", "Capacity Utilization"),
    ("sa_mfg_vend_lead_c", "DT_C", "Vendor Lead Time"),
    ("sa_mfg_emp_c", "EMP_C", "Employment"),
    ("sa_mfg_workwk_c", "AW_C", "Avg Workweek"),
    ("sa_mfg_wage_c", "WB_C", "Wages"),
    ("sa_mfg_fd_gds_inv_c", "IV_C", "Finished Goods Inventories"),
    ("sa_mfg_raw_mats_inv_c", "RMI_C", "Raw Materials Inventories"),
    ("sa_mfg_local_bus_cond_c", "LBC_C", "Local Business Conditions"),
    ("sa_mfg_capital_expnd_c", "CE_C", "Capital Expenditures"),
    ("sa_mfg_equip_sftw_expnd_c", "ESE_C", "Equipment & Software Spending"),
    ("sa_mfg_bus_svcs_expnd_c", "BSE_C", "Business Services Spending"),
    ("sa_mfg_nec_skls_avail_c", "SKL_C", "Skilled Workers Availability"),
    ("sa_mfg_ship_e", "SH_F", "Future Shipments"),
    ("sa_mfg_new_orders_e", "NO_F", "Future New Orders"),
    ("sa_mfg_bk_logs_e", "UO_F", "Future Backlogs"),
    ("sa_mfg_cap_util_e", "CU_F", "Future Capacity Utilization"),
    ("sa_mfg_vend_lead_e", "DT_F", "Future Vendor Lead Time"),
    ("sa_mfg_emp_e", "EMP_F", "Future Employment"),
    ("sa_mfg_workwk_e", "AW_F", "Future Avg Workweek"),
    ("sa_mfg_wage_e", "WB_F", "Future Wages"),
    ("sa_mfg_fd_gds_inv_e", "IV_F", "Future Finished Goods Inventories"),
    ("sa_mfg_raw_mats_inv_e", "RMI_F", "Future Raw Materials Inventories"),
    ("sa_mfg_local_bus_cond_e", "LBC_F", "Future Local Business Conditions"),
    ("sa_mfg_capital_expnd_e", "CE_F", "Future Capital Expenditures"),
    ("sa_mfg_nec_skls_avail_e", "SKL_F", "Future Skilled Workers Availability"),
];

static RICHMOND_SVC_COLUMNS: ColumnMap = &[
    ("sa_svc_revs_sales_c", "REV_C", "Revenue/Sales"),
    ("sa_svc_emp_c", "EMP_C", "Employment"),
    ("sa_svc_ave_wage_c", "WB_C", "Wages"),
    ("sa_svc_demand_c", "DEM_C", "Demand"),
    ("sa_svc_local_bus_cond_c", "LBC_C", "Local Business Conditions"),
    ("sa_svc_nec_skls_avail_c", "SKL_C", "Skilled Workers Availability"),
    ("sa_svc_ave_workwk_c", "AW_C", "Avg Workweek"),
    ("sa_svc_capital_expnd_c", "CE_C", "Capital Expenditures"),
    ("sa_svc_equip_sftw_expnd_c", "ESE_C", "Equipment & Software Spending"),
    ("sa_svc_bus_svcs_expnd_c", "BSE_C", "Business Services Spending"),
    ("sa_svc_revs_sales_e", "REV_F", "Future Revenue/Sales"),
    ("sa_svc_emp_e", "EMP_F", "Future Employment"),
    ("sa_svc_ave_wage_e", "WB_F", "Future Wages"),
    ("sa_svc_demand_e", "DEM_F", "Future Demand"),
    ("sa_svc_local_bus_cond_e", "LBC_F", "Future Local Business Conditions"),
    ("sa_svc_nec_skls_avail_e", "SKL_F", "Future Skilled Workers Availability"),
    ("sa_svc_ave_workwk_e", "AW_F", "Future Avg Workweek"),
    ("sa_svc_capital_expnd_e", "CE_F", "Future Capital Expenditures"),
    ("sa_svc_equip_sftw_expnd_e", "ESE_F", "Future Equipment & Software Spending"),
    ("sa_svc_bus_svcs_expnd_e", "BSE_F", "Future Business Services Spending"),
];

static NY_MFG_COLUMNS: ColumnMap = &[
    ("GACDISA", "GA_C", "General Business Conditions"),
    ("NOCDISA", "NO_C", "New Orders"),
    ("SHCDISA", "SH_C", "Shipments"),
    ("UOCDISA", "UO_C", "Unfilled Orders"),
    ("DTCDISA", "DT_C", "Delivery Times"),
    ("IVCDISA", "IV_C", "Inventories"),
    ("PPCDISA", "PP_C", "Prices Paid"),
    ("PRCDISA", "PR_C", "Prices Received"),
    ("NECDISA", "EMP_C", "Number of Employees"),
    ("AWCDISA", "AW_C", "Avg Employee Workweek"),
    ("ASCDISA", "TS_C", "Technology Spending"),
    ("GAFDISA", "GA_F", "Future General Business Conditions"),
    ("NOFDISA", "NO_F", "Future New Orders"),
    ("SHFDISA", "SH_F", "Future Shipments"),
    ("UOFDISA", "UO_F", "Future Unfilled Orders"),
    ("DTFDISA", "DT_F", "Future Delivery Times"),
    ("IVFDISA", "IV_F", "Future Inventories"),
    ("PPFDISA", "PP_F", "Future Prices Paid"),
    ("PRFDISA", "PR_F", "Future Prices Received"),
    ("NEFDISA", "EMP_F", "Future Number of Employees"),
    ("AWFDISA", "AW_F", "Future Avg Employee Workweek"),
    ("CEFDISA", "CE_F", "Future Capital Expenditures"),
    ("ASFDISA", "TS_F", "Future Technology Spending"),
];

// Not seasonally adjusted at the source.
static NY_SVC_COLUMNS: ColumnMap = &[
    ("BACDINA", "GA_C", "Business Activity"),
    ("BCCDINA", "BC_C", "Business Climate"),
    ("EMCDINA", "EMP_C", "Employment"),
    ("WPCDINA", "WB_C", "Wages"),
    ("PPCDINA", "PP_C", "Prices Paid"),
    ("PRCDINA", "PR_C", "Prices Received"),
    ("CSCDINA", "CE_C", "Capital Spending"),
    ("ASCDINA", "TS_C", "Technology Spending"),
    ("BAFDINA", "GA_F", "Future Business Activity"),
    ("BCFDINA", "BC_F", "Future Business Climate"),
    ("EMFDINA", "EMP_F", "Future Employment"),
    ("WPFDINA", "WB_F", "Future Wages"),
    ("PPFDINA", "PP_F", "Future Prices Paid"),
    ("PRFDINA", "PR_F", "Future Prices Received"),
    ("CSFDINA", "CE_F", "Future Capital Spending"),
    ("ASFDINA", "TS_F", "Future Technology Spending"),
];

static KC_MFG_CURRENT: ColumnMap = &[
    ("Composite Index", "GA_C", "Composite Index"),
    ("Production", "PROD_C", "Production"),
    ("Volume of shipments", "SH_C", "Shipments"),
    ("Volume of new orders", "NO_C", "New Orders"),
    ("Backlog of orders", "UO_C", "Unfilled Orders"),
    ("Number of employees", "EMP_C", "Employment"),
    ("Average employee workweek", "AW_C", "Avg Workweek"),
    ("Prices received for finished product", "PR_C", "Prices Received"),
    ("Prices paid for raw materials", "PP_C", "Prices Paid"),
    ("Capital expenditures", "CE_C", "Capital Expenditures"),
    ("New orders for exports", "EX_C", "Export Orders"),
    ("Supplier delivery time", "DT_C", "Supplier Delivery Time"),
    ("Inventories: Materials", "RMI_C", "Inventories: Materials"),
    ("Inventories: Finished goods", "IV_C", "Inventories: Finished Goods"),
];

static KC_MFG_FUTURE: ColumnMap = &[
    ("Composite Index", "GA_F", "Future Composite Index"),
    ("Production", "PROD_F", "Future Production"),
    ("Volume of shipments", "SH_F", "Future Shipments"),
    ("Volume of new orders", "NO_F", "Future New Orders"),
    ("Backlog of orders", "UO_F", "Future Unfilled Orders"),
    ("Number of employees", "EMP_F", "Future Employment"),
    ("Average employee workweek", "AW_F", "Future Avg Workweek"),
    ("Prices received for finished product", "PR_F", "Future Prices Received"),
    ("Prices paid for raw materials", "PP_F", "Future Prices Paid"),
    ("Capital expenditures", "CE_F", "Future Capital Expenditures"),
    ("New orders for exports", "EX_F", "Future Export Orders"),
    ("Supplier delivery time", "DT_F", "Future Supplier Delivery Time"),
    ("Inventories: Materials", "RMI_F", "Future Inventories: Materials"),
    ("Inventories: Finished goods", "IV_F", "Future Inventories: Finished Goods"),
];

static KC_SVC_CURRENT: ColumnMap = &[
    ("Composite Index", "GA_C", "Composite Index"),
    ("General Revenue/Sales", "REV_C", "Revenue/Sales"),
    ("Number of Employees", "EMP_C", "Employment"),
    ("Employee Hours Worked", "AW_C", "Hours Worked"),
    ("Part-Time/Temporary Employment", "PEMP_C", "Part-Time Employment"),
    ("Wages and Benefits", "WB_C", "Wages & Benefits"),
    ("Inventory Levels", "IV_C", "Inventories"),
    ("Credit Conditions/Access to Credit", "CR_C", "Credit Conditions"),
    ("Capital Expenditures", "CE_C", "Capital Expenditures"),
    ("Input Prices", "PP_C", "Prices Paid"),
    ("Selling Prices", "PR_C", "Prices Received"),
];

static KC_SVC_FUTURE: ColumnMap = &[
    ("Composite Index", "GA_F", "Future Composite Index"),
    ("General Revenue/Sales", "REV_F", "Future Revenue/Sales"),
    ("Number of Employees", "EMP_F", "Future Employment"),
    ("Employee Hours Worked", "AW_F", "Future Hours Worked"),
    ("Part-Time/Temporary Employment", "PEMP_F", "Future Part-Time Employment"),
    ("Wages and Benefits", "WB_F", "Future Wages & Benefits"),
    ("Inventory Levels", "IV_F", "Future Inventories"),
    ("Credit Conditions/Access to Credit", "CR_F", "Future Credit Conditions"),
    ("Capital Expenditures", "CE_F", "Future Capital Expenditures"),
    ("Input Prices", "PP_F", "Future Prices Paid"),
    ("Selling Prices", "PR_F", "Future Prices Received"),
];

pub static SOURCES: &[SurveySource] = &[
    SurveySource {
        key: "philly_mfg",
        city: "Philadelphia",
        kind: SurveyKind::Manufacturing,
        url: "https://www.philadelphiafed.org/-/media/FRBP/Assets/Surveys-And-Data/MBOS/Historical-Data/Diffusion-Indexes/bos_dif.csv",
        layout: SurveyLayout::Csv { date_column: "DATE" },
        columns: PHILLY_MFG_COLUMNS,
    },
    SurveySource {
        key: "philly_svc",
        city: "Philadelphia",
        kind: SurveyKind::Services,
        url: "https://www.philadelphiafed.org/-/media/FRBP/Assets/Surveys-And-Data/NBOS/nboshistory.xlsx",
        layout: SurveyLayout::Sheet { sheet: Some("Diffusion") },
        columns: PHILLY_SVC_COLUMNS,
    },
    // Served as .xls but the content is xlsx.
    SurveySource {
        key: "dallas_mfg",
        city: "Dallas",
        kind: SurveyKind::Manufacturing,
        url: "https://www.dallasfed.org/~/media/Documents/research/surveys/tmos/documents/index_sa.xls",
        layout: SurveyLayout::Sheet { sheet: None },
        columns: DALLAS_MFG_COLUMNS,
    },
    SurveySource {
        key: "dallas_svc",
        city: "Dallas",
        kind: SurveyKind::Services,
        url: "https://www.dallasfed.org/~/media/Documents/research/surveys/tssos/documents/tssos_index_sa.xls",
        layout: SurveyLayout::Sheet { sheet: None },
        columns: DALLAS_SVC_COLUMNS,
    },
    SurveySource {
        key: "richmond_mfg",
        city: "Richmond",
        kind: SurveyKind::Manufacturing,
        url: "https://www.richmondfed.org/-/media/RichmondFedOrg/region_communities/regional_data_analysis/regional_economy/surveys_of_business_conditions/manufacturing/data/mfg_historicaldata.xlsx",
        layout: SurveyLayout::Sheet { sheet: None },
        columns: RICHMOND_MFG_COLUMNS,
    },
    SurveySource {
        key: "richmond_svc",
        city: "Richmond",
        kind: SurveyKind::Services,
        url: "https://www.richmondfed.org/-/media/RichmondFedOrg/region_communities/regional_data_analysis/regional_economy/surveys_of_business_conditions/non-manufacturing/data/nmf_historicaldata.xlsx",
        layout: SurveyLayout::Sheet { sheet: None },
        columns: RICHMOND_SVC_COLUMNS,
    },
    SurveySource {
        key: "ny_mfg",
        city: "New York",
        kind: SurveyKind::Manufacturing,
        url: "https://www.newyorkfed.org/medialibrary/media/Survey/Empire/data/ESMS_SeasonallyAdjusted_Diffusion.csv",
        layout: SurveyLayout::Csv { date_column: "surveyDate" },
        columns: NY_MFG_COLUMNS,
    },
    SurveySource {
        key: "ny_svc",
        city: "New York",
        kind: SurveyKind::Services,
        url: "https://www.newyorkfed.org/medialibrary/media/survey/business_leaders/data/bls_notseasonallyadjusted_diffusion.csv",
        layout: SurveyLayout::Csv { date_column: "surveyDate" },
        columns: NY_SVC_COLUMNS,
    },
    SurveySource {
        key: "kc_mfg",
        city: "Kansas City",
        kind: SurveyKind::Manufacturing,
        url: "https://www.kansascityfed.org/Manufacturing/documents/14937/2026Feb26historicalmfg.xlsx",
        layout: SurveyLayout::Transposed { future: KC_MFG_FUTURE },
        columns: KC_MFG_CURRENT,
    },
    SurveySource {
        key: "kc_svc",
        city: "Kansas City",
        kind: SurveyKind::Services,
        url: "https://www.kansascityfed.org/Services/documents/14259/2026Janhistoricalserv.xlsx",
        layout: SurveyLayout::Transposed { future: KC_SVC_FUTURE },
        columns: KC_SVC_CURRENT,
    },
];

/// Survey dates come as ISO dates or `Mon-YY`; both map to the month start.
pub fn parse_survey_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.len() >= 10 && s.as_bytes()[4] == b'-' {
        return period::iso_month(s.get(..10)?);
    }
    period::month_abbrev(s)
}

/// Survey cell to a two-decimal value, or `None` for blanks and null tokens.
pub fn parse_survey_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || NULL_TOKENS.contains(&s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite()).map(round2)
}

fn cell_text(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => Some(s.trim()),
        _ => None,
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => parse_survey_date(s),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .and_then(|d| NaiveDate::from_ymd_opt(d.year(), d.month(), 1)),
        _ => None,
    }
}

fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => v.is_finite().then(|| round2(*v)),
        Data::Int(v) => Some(round2(*v as f64)),
        Data::String(s) => parse_survey_value(s),
        _ => None,
    }
}

/// Turn per-column observations into series, in column-map order.
///
/// Series with fewer than two non-null values are dropped.
fn finish_series(source: &SurveySource, parsed: Vec<(&str, &str, Vec<ObservationPoint>)>) -> Vec<Series> {
    let prefix = source.id_prefix();
    let series = parsed
        .into_iter()
        .filter_map(|(code, name, mut data)| {
            data.sort_by_key(|p| p.date);
            let series = Series {
                id: format!("{prefix}_{code}"),
                name: format!("{} - {}", source.city, name),
                display_order: 0,
                data,
            };
            (series.valid_count() >= MIN_OBSERVATIONS).then_some(series)
        })
        .collect();
    renumber(series)
}

/// Parse one survey CSV. Columns missing from the file are ignored.
pub fn parse_survey_csv(source: &SurveySource, date_column: &str, body: &[u8]) -> Result<Vec<Series>> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(body);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body);
    let headers = reader.headers()?.clone();
    let date_index = headers
        .iter()
        .position(|h| h == date_column)
        .ok_or_else(|| {
            AppError::api(
                "Fed survey",
                format!("{}: no '{}' column", source.key, date_column),
            )
        })?;

    let active: Vec<(usize, &str, &str)> = source
        .columns
        .iter()
        .filter_map(|(column, code, name)| {
            headers
                .iter()
                .position(|h| h == *column)
                .map(|index| (index, *code, *name))
        })
        .collect();
    let mut points: Vec<Vec<ObservationPoint>> = vec![Vec::new(); active.len()];

    for record in reader.records() {
        let record = record?;
        let Some(date) = record.get(date_index).and_then(parse_survey_date) else {
            continue;
        };
        for (slot, (index, _, _)) in active.iter().enumerate() {
            let value = record.get(*index).and_then(parse_survey_value);
            points[slot].push(ObservationPoint { date, value });
        }
    }

    let parsed = active
        .iter()
        .zip(points)
        .map(|((_, code, name), data)| (*code, *name, data))
        .collect();
    Ok(finish_series(source, parsed))
}

/// Parse a sheet whose first row names the columns and whose first column
/// holds the dates.
pub fn parse_survey_sheet(source: &SurveySource, range: &Range<Data>) -> Vec<Series> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let active: Vec<(usize, &str, &str)> = source
        .columns
        .iter()
        .filter_map(|(column, code, name)| {
            header
                .iter()
                .position(|h| cell_text(h) == Some(*column))
                .map(|index| (index, *code, *name))
        })
        .collect();
    let mut points: Vec<Vec<ObservationPoint>> = vec![Vec::new(); active.len()];

    for row in rows {
        let Some(date) = row.first().and_then(cell_date) else {
            continue;
        };
        for (slot, (index, _, _)) in active.iter().enumerate() {
            let value = row.get(*index).and_then(cell_value);
            points[slot].push(ObservationPoint { date, value });
        }
    }

    let parsed = active
        .iter()
        .zip(points)
        .map(|((_, code, name), data)| (*code, *name, data))
        .collect();
    finish_series(source, parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Current,
    Future,
}

/// Parse a transposed Kansas City sheet.
///
/// Dates run across row 3 from column B. A "Versus a Month Ago" or
/// "Expected in Six Months" label opens a section, which counts only when
/// the row below it says "(seasonally adjusted)". "Versus a Year Ago" and
/// any "not seasonally adjusted" tag close it.
pub fn parse_transposed_sheet(source: &SurveySource, future: ColumnMap, range: &Range<Data>) -> Vec<Series> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };
    let text_at = |row: u32, col: u32| range.get_value((row, col)).and_then(cell_text);

    let dates: Vec<(u32, NaiveDate)> = (1..=end_col)
        .filter_map(|col| {
            range
                .get_value((2, col))
                .and_then(cell_date)
                .map(|date| (col, date))
        })
        .collect();
    if dates.is_empty() {
        return Vec::new();
    }

    let mut current: Vec<Option<Vec<ObservationPoint>>> = vec![None; source.columns.len()];
    let mut ahead: Vec<Option<Vec<ObservationPoint>>> = vec![None; future.len()];
    let mut section: Option<Section> = None;

    for row in 3..=end_row {
        let Some(label) = text_at(row, 0) else {
            continue;
        };
        let adjusted_below = || {
            text_at(row + 1, 0)
                .is_some_and(|next| next.to_ascii_lowercase().contains("seasonally adjusted"))
        };
        let lower = label.to_ascii_lowercase();
        match label {
            "Versus a Month Ago" => {
                section = adjusted_below().then_some(Section::Current);
                continue;
            }
            "Expected in Six Months" => {
                section = adjusted_below().then_some(Section::Future);
                continue;
            }
            "Versus a Year Ago" => {
                section = None;
                continue;
            }
            _ if lower.contains("seasonally adjusted") => {
                if lower.contains("not") {
                    section = None;
                }
                continue;
            }
            _ => {}
        }

        let (map, slots) = match section {
            Some(Section::Current) => (source.columns, &mut current),
            Some(Section::Future) => (future, &mut ahead),
            None => continue,
        };
        let Some(slot) = map.iter().position(|(row_label, _, _)| *row_label == label) else {
            continue;
        };
        let data = dates
            .iter()
            .map(|(col, date)| ObservationPoint {
                date: *date,
                value: range.get_value((row, *col)).and_then(cell_value),
            })
            .collect();
        slots[slot] = Some(data);
    }

    let parsed = source
        .columns
        .iter()
        .zip(current)
        .chain(future.iter().zip(ahead))
        .filter_map(|((_, code, name), data)| data.map(|data| (*code, *name, data)))
        .collect();
    finish_series(source, parsed)
}

fn open_sheet(body: &[u8], sheet: Option<&str>) -> Result<Range<Data>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(body))?;
    let range = match sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::api("Fed survey", "workbook has no sheets"))??,
    };
    Ok(range)
}

/// Parse a downloaded survey file according to its layout.
pub fn parse_survey(source: &SurveySource, body: &[u8]) -> Result<Vec<Series>> {
    match source.layout {
        SurveyLayout::Csv { date_column } => parse_survey_csv(source, date_column, body),
        SurveyLayout::Sheet { sheet } => Ok(parse_survey_sheet(source, &open_sheet(body, sheet)?)),
        SurveyLayout::Transposed { future } => {
            Ok(parse_transposed_sheet(source, future, &open_sheet(body, None)?))
        }
    }
}

fn survey_metadata(kind: SurveyKind) -> Metadata {
    let title = match kind {
        SurveyKind::Manufacturing => "Fed Regional Surveys - Manufacturing",
        SurveyKind::Services => "Fed Regional Surveys - Services",
    };
    Metadata::new(
        title,
        "Federal Reserve Banks of Philadelphia, Dallas, Richmond, New York, Kansas City",
        "Diffusion Index",
        Frequency::Monthly,
    )
}

/// Fed regional survey fetcher.
pub struct FedSurveyFetcher;

#[async_trait]
impl Fetcher for FedSurveyFetcher {
    fn id(&self) -> FetcherId {
        FetcherId::FedSurveys
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchReport> {
        let mut manufacturing = Vec::new();
        let mut services = Vec::new();
        let mut errors = Vec::new();

        for (i, source) in SOURCES.iter().enumerate() {
            if i > 0 {
                http::pause(ctx.config.rate_limits.census_ms).await;
            }
            log::info!("  Downloading {}...", source.key);
            let parsed = match ctx.client.bytes(ctx.client.get(source.url)).await {
                Ok(body) => parse_survey(source, &body),
                Err(e) => Err(e),
            };
            match parsed {
                Ok(series) => {
                    log::info!("    {} series parsed", series.len());
                    match source.kind {
                        SurveyKind::Manufacturing => manufacturing.extend(series),
                        SurveyKind::Services => services.extend(series),
                    }
                }
                Err(e) => {
                    log::warn!("    {}: {}", source.key, e);
                    errors.push(e);
                }
            }
        }

        let mut report = FetchReport::default();
        let outputs = [
            (MFG_OUTPUT, SurveyKind::Manufacturing, manufacturing),
            (SVC_OUTPUT, SurveyKind::Services, services),
        ];
        for (key, kind, series) in outputs {
            if series.is_empty() {
                continue;
            }
            let document = TimeSeriesDocument::new(survey_metadata(kind), renumber(series));
            ctx.storage.save_document(key, &document).await?;
            report.record(key, document.series.len());
        }

        if report.files.is_empty() {
            return Err(errors
                .pop()
                .unwrap_or_else(|| AppError::api("Fed survey", "no series parsed")));
        }
        Ok(report)
    }
}
