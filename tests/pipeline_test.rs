//! End-to-end tests for export runs over a snapshot corpus

mod common;

use chrono::{TimeZone, Utc};
use common::{config, coordinator, read_json, read_zip_entry, zip_entry_names, RecordingPurger};
use quire::core::export::{CatalogArtifact, ExportErrorType};
use quire::core::invalidation::InvalidationOutcome;
use quire::core::state::WriteMode;
use quire::domain::{QuireError, WorkTitle};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn title(name: &str) -> WorkTitle {
    WorkTitle::new(name).unwrap()
}

#[tokio::test]
async fn test_full_export_isolates_failed_works() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);

    let summary = coordinator.export_all(false).await.unwrap();

    assert_eq!(summary.total_works, 4);
    assert_eq!(summary.succeeded_works, 2);
    assert_eq!(summary.failed_works, 1);
    assert_eq!(summary.skipped_works, 1);
    assert!(!summary.is_successful());
    assert_eq!(
        summary.exported_titles,
        vec![title("Genesis"), title("Rashi on Genesis")]
    );

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Materialization);
    assert_eq!(summary.errors[0].context.as_deref(), Some("title=Broken"));

    let layout = coordinator.layout();
    assert!(layout.archive_path(&title("Genesis")).exists());
    assert!(layout.archive_path(&title("Rashi on Genesis")).exists());
    assert!(!layout.archive_path(&title("Broken")).exists());
    assert!(!layout.root().join(".scratch").join("Broken").exists());

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.schema_version, "4");
    assert_eq!(
        watermark.titles.keys().collect::<Vec<_>>(),
        vec!["Genesis", "Rashi on Genesis"]
    );
    assert!(watermark.titles["Genesis"].ends_with(":00"));

    for artifact in CatalogArtifact::ALL {
        assert!(
            layout.artifact_path(artifact).exists(),
            "missing {}",
            artifact.file_name()
        );
    }
}

#[tokio::test]
async fn test_section_and_index_documents() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    coordinator.export_all(false).await.unwrap();

    let archive = coordinator.layout().archive_path(&title("Genesis"));
    assert_eq!(
        zip_entry_names(&archive),
        vec!["Genesis 1.json", "Genesis 2.json", "Genesis_index.json"]
    );

    let chapter = read_zip_entry(&archive, "Genesis 1.json");
    assert_eq!(chapter["ref"], "Genesis 1");
    assert_eq!(chapter["heRef"], "בראשית א");
    assert_eq!(chapter["next"], "Genesis 2");
    assert!(chapter["prev"].is_null());
    assert_eq!(chapter["content"][0]["segmentNumber"], "1");
    assert_eq!(chapter["content"][0]["text"], "In the beginning");
    assert_eq!(chapter["content"][0]["he"], "בראשית ברא");
    assert_eq!(
        chapter["content"][0]["links"],
        json!([
            {"sourceHeRef": "", "sourceRef": "Onkelos Genesis 1:1", "category": "Targum"},
            {"sourceHeRef": "", "sourceRef": "Rashi on Genesis 1:1:1"}
        ])
    );
    assert!(chapter["content"][1].get("links").is_none());

    let index = read_zip_entry(&archive, "Genesis_index.json");
    assert_eq!(index["title"], "Genesis");
    assert_eq!(index["versionTitle"], "Genesis EN");
    assert_eq!(index["license"], "CC-BY");
    assert_eq!(index["heVersionTitle"], "Genesis HE");
    assert_eq!(index["content_counts"], json!([2, 1]));

    let rashi = coordinator.layout().archive_path(&title("Rashi on Genesis"));
    let intro = read_zip_entry(&rashi, "Rashi on Genesis, Introduction.json");
    assert_eq!(intro["ref"], "Rashi on Genesis, Introduction");
    assert_eq!(
        intro["sections"]["Rashi on Genesis, Introduction 1"]["next"],
        "Rashi on Genesis 1"
    );
}

#[tokio::test]
async fn test_catalog_artifacts_content() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    coordinator.export_all(false).await.unwrap();
    let layout = coordinator.layout();

    let toc_text = std::fs::read_to_string(layout.artifact_path(CatalogArtifact::Toc)).unwrap();
    assert!(toc_text.starts_with("[\n    {"));

    let calendar = read_json(&layout.artifact_path(CatalogArtifact::Calendar));
    assert_eq!(calendar["parasha"]["1/4/2025"]["parasha"], "Bereshit");
    assert_eq!(calendar["parasha"]["1/4/2025"]["ref"]["en"], "Genesis 1");
    assert_eq!(calendar["dafyomi"]["1/1/2025"]["ref"]["en"], "Genesis 2");

    let categories = read_json(&layout.artifact_path(CatalogArtifact::HebrewCategories));
    assert_eq!(categories, json!({"Tanakh": "תנ״ך", "Liturgy": "סידור"}));

    let people = read_json(&layout.artifact_path(CatalogArtifact::People));
    assert_eq!(people, json!({"onkelos": 1, "rashi": 1}));

    let packages = read_json(&layout.artifact_path(CatalogArtifact::Packages));
    let packages = packages.as_array().unwrap();
    let tanakh = packages
        .iter()
        .find(|p| p["en"] == "TANAKH and all commentaries")
        .unwrap();
    let expected_size = layout.archive_size("Genesis") + layout.archive_size("Rashi on Genesis");
    assert!(expected_size > 0);
    assert_eq!(tanakh["size"], expected_size);
    assert_eq!(
        tanakh["indexes"],
        json!(["Genesis", "Broken", "Rashi on Genesis"])
    );

    let liturgy = packages.iter().find(|p| p["en"] == "LITURGY").unwrap();
    assert_eq!(liturgy["indexes"], json!(["Siddur"]));
    assert_eq!(liturgy["size"], 0);
}

#[tokio::test]
async fn test_full_export_clears_stale_output() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    let stale = coordinator.layout().root().join("Stale.zip");
    std::fs::create_dir_all(coordinator.layout().root()).unwrap();
    std::fs::write(&stale, b"old").unwrap();

    coordinator.export_all(false).await.unwrap();
    assert!(!stale.exists());
}

#[tokio::test]
async fn test_skip_existing_keeps_archives_and_records_them() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    let rashi = coordinator.layout().archive_path(&title("Rashi on Genesis"));
    std::fs::create_dir_all(coordinator.layout().root()).unwrap();
    std::fs::write(&rashi, b"previous").unwrap();

    let summary = coordinator.export_all(true).await.unwrap();

    assert_eq!(summary.succeeded_works, 1);
    assert_eq!(summary.skipped_works, 2);
    assert_eq!(std::fs::read(&rashi).unwrap(), b"previous");

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert!(watermark.contains("Rashi on Genesis"));
    assert!(watermark.contains("Genesis"));
}

/// Every file under `root`, relative and sorted
fn file_listing(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                files.push(relative.to_string_lossy().to_string());
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}

#[tokio::test]
async fn test_updated_without_watermark_runs_full_export() {
    let updated_dir = TempDir::new().unwrap();
    let (updated, _tx) = coordinator(config(updated_dir.path()), None);
    let summary = updated.export_updated().await.unwrap();

    assert_eq!(summary.total_works, 4);
    assert_eq!(summary.succeeded_works, 2);
    let watermark = updated.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.len(), 2);

    let full_dir = TempDir::new().unwrap();
    let (full, _tx) = coordinator(config(full_dir.path()), None);
    full.export_all(false).await.unwrap();

    let listing = file_listing(updated.layout().root());
    assert!(listing.contains(&"Genesis.zip".to_string()));
    assert!(listing.contains(&"last_updated.json".to_string()));
    assert_eq!(listing, file_listing(full.layout().root()));
}

#[tokio::test]
async fn test_updated_exports_changed_and_new_works_only() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    let stamped_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    coordinator
        .watermarks()
        .write_at(
            &[title("Genesis"), title("Rashi on Genesis")],
            WriteMode::Overwrite,
            stamped_at,
        )
        .await
        .unwrap();

    let summary = coordinator.export_updated().await.unwrap();

    // Genesis changed; Broken and Siddur are new
    assert_eq!(summary.total_works, 3);
    assert_eq!(summary.succeeded_works, 1);
    assert_eq!(summary.failed_works, 1);
    assert_eq!(summary.skipped_works, 1);
    assert_eq!(summary.exported_titles, vec![title("Genesis")]);

    let layout = coordinator.layout();
    assert!(layout.archive_path(&title("Genesis")).exists());
    assert!(!layout.archive_path(&title("Rashi on Genesis")).exists());
    assert!(layout.artifact_path(CatalogArtifact::Toc).exists());

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.titles["Rashi on Genesis"], "2025-01-01T00:00:00");
    assert_ne!(watermark.titles["Genesis"], "2025-01-01T00:00:00");
    assert!(!watermark.contains("Broken"));
}

#[tokio::test]
async fn test_updated_with_nothing_changed() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);
    let stamped_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    coordinator
        .watermarks()
        .write_at(
            &[
                title("Genesis"),
                title("Rashi on Genesis"),
                title("Broken"),
                title("Siddur"),
            ],
            WriteMode::Overwrite,
            stamped_at,
        )
        .await
        .unwrap();

    let summary = coordinator.export_updated().await.unwrap();

    assert_eq!(summary.total_works, 0);
    assert!(summary.is_successful());
    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.len(), 4);
    assert!(watermark
        .titles
        .values()
        .all(|stamp| stamp == "2025-02-01T00:00:00"));
}

#[tokio::test]
async fn test_export_one_merges_on_success_only() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);

    let failed = coordinator.export_one(&title("Broken")).await.unwrap();
    assert_eq!(failed.failed_works, 1);
    assert!(failed.invalidation.is_none());
    assert!(coordinator.watermarks().load().await.unwrap().is_none());

    let summary = coordinator.export_one(&title("Genesis")).await.unwrap();
    assert!(summary.is_successful());
    assert_eq!(summary.invalidation, Some(InvalidationOutcome::Disabled));

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.titles.keys().collect::<Vec<_>>(), vec!["Genesis"]);
    assert_eq!(watermark.schema_version, "4");
}

#[tokio::test]
async fn test_identical_inputs_produce_identical_archives() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let (a, _tx_a) = coordinator(config(first.path()), None);
    let (b, _tx_b) = coordinator(config(second.path()), None);

    a.export_one(&title("Genesis")).await.unwrap();
    b.export_one(&title("Genesis")).await.unwrap();

    let bytes_a = std::fs::read(a.layout().archive_path(&title("Genesis"))).unwrap();
    let bytes_b = std::fs::read(b.layout().archive_path(&title("Genesis"))).unwrap();
    assert_eq!(bytes_a, bytes_b);
}

#[tokio::test]
async fn test_watermark_write_purges_exported_titles() {
    let dir = TempDir::new().unwrap();
    let purger = Arc::new(RecordingPurger::default());
    let (coordinator, _tx) = coordinator(config(dir.path()), Some(purger.clone()));

    let summary = coordinator.export_all(false).await.unwrap();

    assert_eq!(summary.invalidation, Some(InvalidationOutcome::Purged { count: 11 }));
    let requests = purger.requests();
    assert_eq!(requests.len(), 1);

    let urls = &requests[0];
    let base = "https://static.example.org/export/4";
    assert!(urls.contains(&format!("{base}/Genesis.zip")));
    assert!(urls.contains(&format!("{base}/Genesis_index.json")));
    assert!(urls.contains(&format!("{base}/Rashi on Genesis.zip")));
    assert!(urls.contains(&format!("{base}/toc.json")));
    assert!(urls.contains(&format!("{base}/last_updated.json")));
    assert!(!urls.contains(&format!("{base}/Broken.zip")));
}

#[tokio::test]
async fn test_failed_purge_does_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let purger = Arc::new(RecordingPurger::failing());
    let (coordinator, _tx) = coordinator(config(dir.path()), Some(purger.clone()));

    let summary = coordinator.export_one(&title("Genesis")).await.unwrap();

    assert_eq!(summary.succeeded_works, 1);
    assert!(matches!(
        summary.invalidation,
        Some(InvalidationOutcome::Failed { .. })
    ));
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Invalidation);
    assert!(coordinator.watermarks().load().await.unwrap().is_some());
}

#[tokio::test]
async fn test_shutdown_stops_new_works_but_keeps_watermark_barrier() {
    let dir = TempDir::new().unwrap();
    let (coordinator, tx) = coordinator(config(dir.path()), None);
    tx.send(true).unwrap();

    let summary = coordinator.export_all(false).await.unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.succeeded_works, 0);
    let layout = coordinator.layout();
    assert!(layout.artifact_path(CatalogArtifact::Toc).exists());
    assert!(!layout.artifact_path(CatalogArtifact::People).exists());

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert!(watermark.is_empty());
}

#[tokio::test]
async fn test_base_files_go_to_sources_paths() {
    let dir = TempDir::new().unwrap();
    let sources = dir.path().join("sources");
    let mut cfg = config(&dir.path().join("out"));
    cfg.export.sources_paths = vec![sources.to_string_lossy().to_string()];
    let (coordinator, _tx) = coordinator(cfg, None);

    coordinator.export_all(false).await.unwrap();
    let summary = coordinator.export_base_files().await.unwrap();

    assert_eq!(summary.catalog_artifacts.len(), 6);
    assert!(sources.join("toc.json").exists());
    assert!(sources.join("calendar.json").exists());
    assert!(!sources.join("last_updated.json").exists());

    let packages = read_json(&sources.join("packages.json"));
    let complete = packages
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["en"] == "COMPLETE LIBRARY")
        .unwrap();
    assert!(complete["size"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_base_files_require_sources_paths() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);

    let err = coordinator.export_base_files().await.unwrap_err();
    assert!(matches!(err, QuireError::Configuration(_)));
}

#[tokio::test]
async fn test_catalog_only_commands_leave_watermark_alone() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);

    let toc = coordinator.export_toc().await.unwrap();
    assert_eq!(
        toc.catalog_artifacts,
        vec![CatalogArtifact::Toc, CatalogArtifact::SearchToc]
    );

    let catalog = coordinator.export_catalog().await.unwrap();
    assert_eq!(catalog.catalog_artifacts.len(), 6);
    assert!(coordinator.watermarks().load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_catalog_only_commands_purge_shared_artifacts() {
    let dir = TempDir::new().unwrap();
    let purger = Arc::new(RecordingPurger::default());
    let (coordinator, _tx) = coordinator(config(dir.path()), Some(purger.clone()));
    let base = "https://static.example.org/export/4";

    let toc = coordinator.export_toc().await.unwrap();
    assert_eq!(toc.invalidation, Some(InvalidationOutcome::Purged { count: 7 }));

    let requests = purger.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains(&format!("{base}/toc.json")));
    assert!(requests[0].contains(&format!("{base}/search_toc.json")));

    let catalog = coordinator.export_catalog().await.unwrap();
    assert_eq!(catalog.invalidation, Some(InvalidationOutcome::Purged { count: 7 }));
    assert_eq!(purger.requests().len(), 2);
    assert!(purger.requests()[1].contains(&format!("{base}/packages.json")));
}

#[tokio::test]
async fn test_write_last_updated_creates_empty_record() {
    let dir = TempDir::new().unwrap();
    let (coordinator, _tx) = coordinator(config(dir.path()), None);

    let outcome = coordinator.write_last_updated().await.unwrap();
    assert_eq!(outcome, InvalidationOutcome::Disabled);

    let watermark = coordinator.watermarks().load().await.unwrap().unwrap();
    assert_eq!(watermark.schema_version, "4");
    assert!(watermark.is_empty());
}
