//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use quire::adapters::cdn::PurgeTransport;
use quire::adapters::corpus::CorpusSnapshot;
use quire::config::{
    ApplicationConfig, CalendarConfig, CdnConfig, CorpusConfig, ExportConfig, LoggingConfig,
    QuireConfig,
};
use quire::core::export::ExportCoordinator;
use quire::domain::{CdnError, Result};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Snapshot with one plain work, one work with a non-section intro, one
/// work whose text points at a missing version, and a catalog title with no
/// work behind it
pub fn snapshot_value() -> Value {
    json!({
        "works": [
            {
                "title": "Genesis",
                "he_title": "בראשית",
                "categories": ["Tanakh", "Torah"],
                "versions": [
                    {"title": "Genesis EN", "language": "en", "license": "CC-BY"},
                    {"title": "Genesis HE", "language": "he"}
                ],
                "units": [
                    {"ref": "Genesis 1", "he_ref": "בראשית א", "text": {
                        "en": {"segments": ["In the beginning", "And the earth"]},
                        "he": {"segments": ["בראשית ברא", "והארץ"]}
                    }},
                    {"ref": "Genesis 2", "he_ref": "בראשית ב", "text": {
                        "en": {"segments": ["Thus the heavens"]},
                        "he": {"segments": ["ויכלו"]}
                    }}
                ]
            },
            {
                "title": "Rashi on Genesis",
                "categories": ["Tanakh", "Commentary", "Rashi"],
                "versions": [{"title": "Rashi EN", "language": "en"}],
                "units": [
                    {"ref": "Rashi on Genesis, Introduction", "sections": [
                        {"ref": "Rashi on Genesis, Introduction 1", "text": {"en": {"segments": ["Rashi said"]}}}
                    ]},
                    {"ref": "Rashi on Genesis 1", "text": {"en": {"segments": ["In the beginning: ..."]}}}
                ]
            },
            {
                "title": "Broken",
                "categories": ["Tanakh", "Writings"],
                "versions": [{"title": "Broken EN", "language": "en"}],
                "units": [
                    {"ref": "Broken 1", "text": {"en": {"segments": ["z"], "version": "Gone"}}}
                ]
            }
        ],
        "links": {
            "Genesis 1:1": [
                {"source_ref": "Onkelos Genesis 1:1", "category": "Targum"},
                {"source_ref": "Rashi on Genesis 1:1:1", "category": "Commentary"}
            ]
        },
        "toc": [
            {"category": "Tanakh", "heCategory": "תנ״ך", "contents": [
                {"category": "Torah", "heCategory": "תורה", "contents": [{"title": "Genesis"}]},
                {"category": "Writings", "heCategory": "כתובים", "contents": [{"title": "Broken"}]},
                {"category": "Commentary", "contents": [
                    {"category": "Rashi", "contents": [{"title": "Rashi on Genesis"}]}
                ]}
            ]},
            {"category": "Liturgy", "heCategory": "סידור", "contents": [{"title": "Siddur"}]}
        ],
        "search_toc": [{"category": "Tanakh", "contents": [{"title": "Genesis"}]}],
        "terms": {"Tanakh": "תנ״ך", "Liturgy": "סידור"},
        "text_categories": ["Tanakh", "Liturgy", "Torah"],
        "people": ["Rashi", "Onkelos", "rashi"],
        "history": [
            {"date": "2025-01-02T08:00:00Z", "ref": "Genesis 1:1"},
            {"date": "2025-01-03T08:00:00Z", "title": "Broken"}
        ],
        "calendar": {
            "parasha": [{"date": "2025-01-04", "reference": "Genesis 1", "extra": {"parasha": "Bereshit"}}],
            "dafyomi": [{"date": "2025-01-01", "reference": "Genesis 2"}]
        }
    })
}

pub fn snapshot() -> Arc<CorpusSnapshot> {
    Arc::new(CorpusSnapshot::from_value(snapshot_value()).unwrap())
}

pub fn config(export_path: &Path) -> QuireConfig {
    QuireConfig {
        application: ApplicationConfig::default(),
        export: ExportConfig {
            export_path: export_path.to_string_lossy().to_string(),
            schema_version: 4,
            minify_json: false,
            parallel_works: 2,
            sources_paths: vec![],
        },
        corpus: CorpusConfig {
            snapshot_path: "corpus.json".to_string(),
        },
        calendar: CalendarConfig { horizon_days: 30 },
        cdn: CdnConfig {
            public_base_url: "https://static.example.org/export".to_string(),
            ..CdnConfig::default()
        },
        logging: LoggingConfig::console_only(),
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
}

/// Coordinator over the fixture snapshot with a fixed calendar date
pub fn coordinator(
    config: QuireConfig,
    purger: Option<Arc<dyn PurgeTransport>>,
) -> (ExportCoordinator, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let corpus = snapshot();
    let coordinator = ExportCoordinator::new(config, corpus.clone(), corpus.clone(), corpus, purger, rx)
        .with_today(today());
    (coordinator, tx)
}

/// Purge transport that records every request
#[derive(Default)]
pub struct RecordingPurger {
    pub requests: Mutex<Vec<Vec<String>>>,
    pub fail: bool,
}

impl RecordingPurger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PurgeTransport for RecordingPurger {
    async fn purge(&self, urls: &[String]) -> Result<()> {
        self.requests.lock().unwrap().push(urls.to_vec());
        if self.fail {
            return Err(CdnError::Rejected {
                status: 503,
                message: "unavailable".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Read one JSON entry out of a ZIP archive
pub fn read_zip_entry(archive: &Path, name: &str) -> Value {
    use std::io::Read;

    let mut zip = zip::ZipArchive::new(std::fs::File::open(archive).unwrap()).unwrap();
    let mut body = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap()
}

pub fn zip_entry_names(archive: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(std::fs::File::open(archive).unwrap()).unwrap();
    zip.file_names().map(str::to_string).collect()
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}
