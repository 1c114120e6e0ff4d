//! Download package descriptors
//!
//! A package is a named offline bundle of works selected by category path.
//! Its size is the sum of the works' already-exported archives.

use super::layout::OutputLayout;
use crate::domain::catalog::titles_in_category;
use crate::domain::CatalogNode;
use serde::Serialize;

/// Number of leading toc categories that get a bundle of their own
const TOP_LEVEL_PACKAGE_COUNT: usize = 7;

/// Top-level categories already covered by curated bundles
const CURATED_TOP_LEVEL: [&str; 2] = ["Tanakh", "Talmud"];

/// One entry of `packages.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub en: String,
    pub he: String,
    pub color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Titles in the bundle; omitted for the complete library
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<String>>,

    /// Sum of archive sizes in bytes
    pub size: u64,
}

/// A bundle before its titles are resolved
#[derive(Debug, Clone)]
struct PackageSpec {
    en: String,
    he: String,
    color: String,
    parent: Option<String>,
    categories: Vec<String>,
}

impl PackageSpec {
    fn new(en: &str, he: &str, color: &str, parent: Option<&str>, categories: &[&str]) -> Self {
        Self {
            en: en.to_string(),
            he: he.to_string(),
            color: color.to_string(),
            parent: parent.map(str::to_string),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn curated() -> Vec<PackageSpec> {
    vec![
        PackageSpec::new("COMPLETE LIBRARY", "כל הספרייה", "Other", None, &[]),
        PackageSpec::new(
            "TANAKH with Rashi",
            "תנ״ך עם רש״י",
            "Tanakh",
            Some("TANAKH and all commentaries"),
            &[
                "Tanakh/Torah",
                "Tanakh/Prophets",
                "Tanakh/Writings",
                "Tanakh/Commentary/Rashi",
            ],
        ),
        PackageSpec::new(
            "TANAKH and all commentaries",
            "תנ״ך וכל המפרשים",
            "Tanakh",
            None,
            &["Tanakh"],
        ),
        PackageSpec::new(
            "TALMUD with Rashi and Tosafot",
            "תלמוד עם רש״י ותוספות",
            "Talmud",
            Some("TALMUD and all commentaries"),
            &[
                "Talmud/Bavli/Seder Zeraim",
                "Talmud/Bavli/Seder Moed",
                "Talmud/Bavli/Seder Nashim",
                "Talmud/Bavli/Seder Nezikin",
                "Talmud/Bavli/Seder Kodashim",
                "Talmud/Bavli/Seder Tahorot",
                "Talmud/Bavli/Commentary/Rashi",
                "Talmud/Bavli/Commentary/Tosafot",
            ],
        ),
        PackageSpec::new(
            "TALMUD and all commentaries",
            "תלמוד וכל המפרשים",
            "Talmud",
            None,
            &["Talmud"],
        ),
    ]
}

/// Build the package list from a normalized toc
///
/// Works that were never exported count as zero bytes.
pub fn build_packages(toc: &[CatalogNode], layout: &OutputLayout) -> Vec<PackageDescriptor> {
    let mut specs = curated();

    for node in toc.iter().take(TOP_LEVEL_PACKAGE_COUNT) {
        let Some(category) = node.category_name() else {
            continue;
        };
        if CURATED_TOP_LEVEL.contains(&category) {
            continue;
        }
        specs.push(PackageSpec {
            en: category.to_uppercase(),
            he: node.attribute("heCategory").unwrap_or_default().to_string(),
            color: category.to_string(),
            parent: None,
            categories: vec![category.to_string()],
        });
    }

    specs
        .into_iter()
        .map(|spec| {
            let titles: Vec<String> = if spec.categories.is_empty() {
                titles_in_category(toc, &[])
            } else {
                spec.categories
                    .iter()
                    .flat_map(|path| {
                        let path: Vec<&str> = path.split('/').collect();
                        titles_in_category(toc, &path)
                    })
                    .collect()
            };
            let size = titles.iter().map(|t| layout.archive_size(t)).sum();

            PackageDescriptor {
                indexes: (!spec.categories.is_empty()).then_some(titles),
                en: spec.en,
                he: spec.he,
                color: spec.color,
                parent: spec.parent,
                size,
            }
        })
        .collect()
}
