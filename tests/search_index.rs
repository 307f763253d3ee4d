//! Post-processing feeding the search index, through the public API.

use chrono::NaiveDate;
use econdata::models::{
    Config, Frequency, Metadata, ObservationPoint, SearchIndexEntry, Series, TimeSeriesDocument,
};
use econdata::naics::NaicsResolver;
use econdata::pipeline::{build_search_index, run_post_process};
use econdata::storage::LocalStorage;

fn series(id: &str, name: &str, points: u32) -> Series {
    Series {
        id: id.into(),
        name: name.into(),
        display_order: 0,
        data: (1..=points)
            .map(|m| ObservationPoint {
                date: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
                value: Some(f64::from(m)),
            })
            .collect(),
    }
}

fn document(title: &str, series: Vec<Series>) -> TimeSeriesDocument {
    TimeSeriesDocument::new(
        Metadata::new(title, "U.S. Census Bureau", "Millions of dollars", Frequency::Monthly),
        series,
    )
}

#[tokio::test]
async fn test_post_processed_documents_are_indexed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.paths.data_dir = dir.path().join("json");
    config.paths.config_dir = dir.path().join("config");
    let storage = LocalStorage::new(&config.paths.data_dir);

    storage
        .save_document(
            "wholesale/wholesale.json",
            &document(
                "Wholesale",
                vec![
                    series("4231_SM", "Motor vehicles and parts", 3),
                    series("4231_IR", "Motor vehicles and parts", 3),
                    series("MERCH_SM", "Merchant wholesalers", 3),
                ],
            ),
        )
        .await
        .unwrap();
    storage
        .save_document(
            "m3/m3.json",
            &document(
                "M3",
                vec![
                    series("11A_VS", "Grain and oilseed milling", 1),
                    series("MTM_VS", "Total manufacturing", 3),
                    series("MTM_IS", "Total manufacturing ratio", 3),
                ],
            ),
        )
        .await
        .unwrap();

    let report = run_post_process(&config).await.unwrap();
    assert!(report.written.iter().any(|(k, _)| k == "wholesale/wholesale_sales.json"));

    let stats = build_search_index(&storage, &NaicsResolver::with_builtin())
        .await
        .unwrap();
    assert_eq!(stats.files_processed, 3);

    let entries: Vec<SearchIndexEntry> = storage
        .read_json("search/search_index.json")
        .await
        .unwrap()
        .unwrap();

    let find = |id: &str, file: &str| {
        entries
            .iter()
            .find(|e| e.id == id && e.data_file == file)
            .cloned()
    };

    let sales = find("4231_SM", "wholesale/wholesale_sales.json").unwrap();
    assert_eq!(sales.naics.as_deref(), Some("4231"));
    assert_eq!(sales.naics_name.as_deref(), Some("Wholesale Trade"));
    assert_eq!(sales.page, "wholesale/sales.html");

    let merchants = find("MERCH_SM", "wholesale/wholesale_sales.json").unwrap();
    assert!(merchants.naics.is_none());

    assert!(find("4231_IR", "wholesale/wholesale_ratio.json").is_some());

    // The builder indexes what it is given, short series included.
    let grain = find("11A_VS", "m3/m3.json").unwrap();
    assert_eq!(grain.naics.as_deref(), Some("3112"));
    assert!(find("MTM_IS", "m3/m3.json").is_none());
}
