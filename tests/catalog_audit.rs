//! Tests for the catalog dimension audit used by `plotfind check`.

use plotfind::{Catalog, VectorDimension};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_catalog(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "vector,title,synopsis,language,year").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn audit_reports_mixed_dimensions() {
    // A catalog mixing two embedding versions: half the rows at the target
    // dimension, half at twice it, plus one blank.
    let file = write_catalog(&[
        "\"[0.1, 0.2]\",Current,plot,English,2020",
        "\"[0.1, 0.2, 0.3, 0.4]\",Legacy,plot,English,2011",
        "\"[0.5, 0.6, 0.7, 0.8]\",Legacy Two,plot,Spanish,2012",
        ",Blank,plot,English,2021",
    ]);

    let catalog = Catalog::load(file.path()).unwrap();
    let audit = catalog.audit(VectorDimension::new(2).unwrap());

    assert_eq!(audit.rows, 4);
    assert_eq!(audit.target_dimension, 2);
    assert!(!audit.is_clean());

    assert_eq!(audit.length_counts.get(&2), Some(&1));
    assert_eq!(audit.length_counts.get(&4), Some(&2));
    assert_eq!(audit.length_counts.get(&0), Some(&1));

    assert_eq!(audit.anomalies.len(), 3);
    assert_eq!(audit.anomalies[0].position, 1);
    assert_eq!(audit.anomalies[0].title, "Legacy");
}

#[test]
fn audit_of_clean_catalog_has_no_anomalies() {
    let file = write_catalog(&[
        "\"[0.1, 0.2]\",A,plot,English,2020",
        "\"[0.3, 0.4]\",B,plot,English,2021",
    ]);

    let catalog = Catalog::load(file.path()).unwrap();
    let audit = catalog.audit(VectorDimension::new(2).unwrap());

    assert!(audit.is_clean());
    assert!(audit.anomalies.is_empty());
    assert_eq!(audit.length_counts.len(), 1);
}

#[test]
fn audit_serializes_for_json_output() {
    let file = write_catalog(&["\"[0.1, 0.2]\",A,plot,English,2020"]);
    let catalog = Catalog::load(file.path()).unwrap();
    let audit = catalog.audit(VectorDimension::new(2).unwrap());

    let json = serde_json::to_value(&audit).unwrap();
    assert_eq!(json["rows"], 1);
    assert_eq!(json["target_dimension"], 2);
    assert!(json["anomalies"].as_array().unwrap().is_empty());
}
