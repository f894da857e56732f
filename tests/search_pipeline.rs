//! End-to-end tests for the catalog -> sanitize -> index -> search flow.

use plotfind::io::ExitCode;
use plotfind::vector::VectorError;
use plotfind::{Catalog, EmbeddingGenerator, SearchError, SearchService, VectorDimension};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Deterministic embedder so distances are known exactly.
struct StubEmbedder {
    vector: Vec<f32>,
}

impl EmbeddingGenerator for StubEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, VectorError> {
        Ok(self.vector.clone())
    }

    fn dimension(&self) -> VectorDimension {
        VectorDimension::new(self.vector.len()).unwrap()
    }
}

fn write_catalog(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "vector,title,synopsis,language,year").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn build_service(file: &NamedTempFile, query: Vec<f32>) -> SearchService {
    let catalog = Catalog::load(file.path()).unwrap();
    let dimension = VectorDimension::new(query.len()).unwrap();
    SearchService::build(catalog, Arc::new(StubEmbedder { vector: query }), dimension).unwrap()
}

#[test]
fn search_returns_closest_rows_in_order() {
    let file = write_catalog(&[
        "\"[1.0, 0.0]\",Gravity Well,A crew drifts toward a dead star,English,2013",
        "\"[0.0, 1.0]\",Tide Lines,Two strangers meet on a ferry,French,2004",
        "\"[0.9, 0.2]\",Redshift,A probe returns changed,English,1997",
    ]);

    let service = build_service(&file, vec![0.9, 0.1]);
    let results = service.search("a ship lost near a star", 3).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Redshift");
    assert_eq!(results[1].title, "Gravity Well");
    assert_eq!(results[2].title, "Tide Lines");
    assert!(results[0].distance <= results[1].distance);
    assert!(results[1].distance <= results[2].distance);
}

#[test]
fn result_items_carry_catalog_metadata() {
    let file = write_catalog(&[
        "\"[1.0, 0.0]\",Gravity Well,A crew drifts toward a dead star,English,2013",
    ]);

    let service = build_service(&file, vec![1.0, 0.0]);
    let results = service.search("anything", 1).unwrap();

    let item = &results[0];
    assert_eq!(item.title, "Gravity Well");
    assert_eq!(item.synopsis, "A crew drifts toward a dead star");
    assert_eq!(item.language, "English");
    assert_eq!(item.year, Some(2013));
    assert!((item.distance - 0.0).abs() < 1e-6);
}

#[test]
fn malformed_rows_are_recovered_not_dropped() {
    // One clean row, one empty cell, one garbled cell, one wrong length.
    // All four must survive into the corpus so positions line up.
    let file = write_catalog(&[
        "\"[1.0, 0.0]\",Clean,plot,English,2000",
        ",Missing,plot,English,2001",
        "\"not a vector\",Garbled,plot,English,2002",
        "\"[1.0, 2.0, 3.0]\",Short,plot,English,2003",
    ]);

    let service = build_service(&file, vec![1.0, 0.0]);
    assert_eq!(service.corpus_size(), 4);

    let results = service.search("anything", 4).unwrap();
    assert_eq!(results[0].title, "Clean");
    // The three recovered rows all sit at the zero vector, so they tie at
    // distance 1.0 and come back in catalog order.
    assert_eq!(results[1].title, "Missing");
    assert_eq!(results[2].title, "Garbled");
    assert_eq!(results[3].title, "Short");
    assert!((results[1].distance - 1.0).abs() < 1e-6);
}

#[test]
fn doubled_vectors_are_truncated_to_the_first_half() {
    // A 4-dim cell against a 2-dim target keeps the first two components.
    let file = write_catalog(&[
        "\"[1.0, 0.0, 9.0, 9.0]\",Doubled,plot,English,2000",
        "\"[0.0, 1.0]\",Other,plot,English,2001",
    ]);

    let service = build_service(&file, vec![1.0, 0.0]);
    let results = service.search("anything", 2).unwrap();

    assert_eq!(results[0].title, "Doubled");
    assert!((results[0].distance - 0.0).abs() < 1e-6);
}

#[test]
fn k_larger_than_corpus_is_clamped() {
    let file = write_catalog(&["\"[1.0, 0.0]\",Only,plot,English,2000"]);
    let service = build_service(&file, vec![0.5, 0.5]);
    let results = service.search("anything", 50).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn zero_k_returns_empty_success() {
    let file = write_catalog(&["\"[1.0, 0.0]\",Only,plot,English,2000"]);
    let service = build_service(&file, vec![0.5, 0.5]);
    let results = service.search("anything", 0).unwrap();
    assert!(results.is_empty());
    assert_eq!(ExitCode::from_search_results(&results), ExitCode::NotFound);
}

#[test]
fn empty_catalog_is_a_startup_error() {
    let file = write_catalog(&[]);
    let catalog = Catalog::load(file.path()).unwrap();
    let result = SearchService::build(
        catalog,
        Arc::new(StubEmbedder {
            vector: vec![0.0, 0.0],
        }),
        VectorDimension::new(2).unwrap(),
    );

    match result {
        Err(SearchError::Index(VectorError::EmptyCorpus)) => {}
        other => panic!("expected EmptyCorpus, got {other:?}"),
    }
}

#[test]
fn missing_catalog_file_is_an_io_error() {
    let result = Catalog::load(std::path::Path::new("/no/such/catalog.csv"));
    let err = result.unwrap_err();
    assert!(matches!(err, SearchError::CatalogRead { .. }));
    assert_eq!(ExitCode::from_error(&err), ExitCode::IoError);
}

#[test]
fn repeated_searches_are_deterministic() {
    let file = write_catalog(&[
        "\"[1.0, 0.0]\",A,plot,English,2000",
        "\"[0.0, 1.0]\",B,plot,English,2001",
        "\"[0.5, 0.5]\",C,plot,English,2002",
    ]);

    let service = build_service(&file, vec![0.4, 0.6]);
    let first = service.search("anything", 3).unwrap();
    for _ in 0..5 {
        let again = service.search("anything", 3).unwrap();
        let titles: Vec<_> = again.iter().map(|r| r.title.as_str()).collect();
        let expected: Vec<_> = first.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, expected);
    }
}
