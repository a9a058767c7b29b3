//! End-to-end loading from on-disk sources.

use std::io::Write;

use pcr_catalog::{load_catalog, read_headers, LoadError, SchemaError};
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file
}

#[test]
fn test_load_catalog_from_csv() {
    let file = csv_file(
        "Vendor Part Number,Description,Gauge,Item Weight (g),PCR Content %\n\
         3001,Produce bag,1.25,50,30\n\
         3002,Liner,,12.5,\n\
         ,orphan row,,9,10\n\
         3003,Bad weight,,n/a,25\n",
    );

    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.dropped_blank, 1);
    assert_eq!(catalog.missing_weight, 1);

    let record = catalog.find(" 3001 ").unwrap();
    assert_eq!(record.unit_weight_g, Some(50.0));
    assert_eq!(record.pcr_percent, Some(30.0));
    assert_eq!(record.gauge.as_deref(), Some("1.25"));

    // Defective weight survives load and is only a problem at compute time.
    let bad = catalog.find("3003").unwrap();
    assert_eq!(bad.unit_weight_g, None);
    assert_eq!(bad.pcr_percent, Some(25.0));
}

#[test]
fn test_load_tsv_with_variant_headers() {
    let mut file = tempfile::Builder::new()
        .suffix(".tsv")
        .tempfile()
        .expect("create temp tsv");
    file.write_all(b"part_number\tweight (g)\trecycled content %\n77-A\t8.4\t45\n")
        .expect("write temp tsv");

    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    let record = catalog.find("77-a").unwrap();
    assert_eq!(record.unit_weight_g, Some(8.4));
    assert_eq!(record.pcr_percent, Some(45.0));
}

#[test]
fn test_missing_required_columns_reports_headers() {
    let file = csv_file("Description,PCR Content %\nProduce bag,30\n");

    match load_catalog(file.path()) {
        Err(LoadError::Schema(SchemaError::MissingRequiredColumns { missing, detected })) => {
            assert_eq!(missing, vec!["part number", "unit weight (g)"]);
            assert_eq!(detected, vec!["Description", "PCR Content %"]);
        }
        other => panic!("expected MissingRequiredColumns, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_source_unreadable() {
    let err = load_catalog(std::path::Path::new("no_such_catalog.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_) | LoadError::Io(_)));
}

#[test]
fn test_read_headers_verbatim() {
    let file = csv_file("Vendor Part Number,Item Weight (g)\n3001,50\n");
    let headers = read_headers(file.path()).unwrap();
    assert_eq!(headers, vec!["Vendor Part Number", "Item Weight (g)"]);
}
