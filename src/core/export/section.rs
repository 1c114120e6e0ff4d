//! Section materialization
//!
//! Turns one section-level reference into a self-contained
//! [`ExportDocument`]: both languages' text, version attribution when it
//! differs from the work's defaults, sibling navigation and per-segment
//! links.

use super::versions::DefaultVersions;
use crate::adapters::corpus::Corpus;
use crate::domain::work::EXPORTED_LINK_CATEGORIES;
use crate::domain::{
    AttributionFields, AttributionSide, ExportDocument, Link, Result, SegmentRecord, SimpleLink,
    TextChunk, TextRef, PRIMARY_LANGUAGE, TRANSLATION_LANGUAGE,
};
use std::sync::Arc;

/// Renders section-level references into export documents
#[derive(Clone)]
pub struct SectionMaterializer {
    corpus: Arc<dyn Corpus>,
}

impl SectionMaterializer {
    pub fn new(corpus: Arc<dyn Corpus>) -> Self {
        Self { corpus }
    }

    /// Materialize one section-level reference
    ///
    /// # Errors
    ///
    /// Propagates any corpus failure. Errors are not swallowed here; the
    /// work exporter decides how a failed section affects its work.
    pub async fn materialize(
        &self,
        reference: &TextRef,
        defaults: &DefaultVersions,
    ) -> Result<ExportDocument> {
        let translation = self
            .corpus
            .text_chunk(reference, TRANSLATION_LANGUAGE)
            .await?;
        let primary = self.corpus.text_chunk(reference, PRIMARY_LANGUAGE).await?;

        let mut attribution = AttributionFields::default();
        apply_attribution(&mut attribution, &translation, defaults);
        apply_attribution(&mut attribution, &primary, defaults);

        let segment_count = translation.segments.len().max(primary.segments.len());
        let mut content = Vec::with_capacity(segment_count);
        for n in 1..=segment_count {
            let links = self.corpus.links_for(&reference.segment_ref(n)).await?;
            content.push(SegmentRecord {
                segment_number: n.to_string(),
                text: translation.segment(n).map(str::to_string),
                he: primary.segment(n).map(str::to_string),
                links: if links.is_empty() {
                    None
                } else {
                    Some(links.iter().map(simple_link).collect())
                },
            });
        }

        Ok(ExportDocument {
            reference: reference.normal.clone(),
            he_ref: reference.he_normal.clone(),
            index_title: reference.index_title.as_str().to_string(),
            he_title: reference.he_title.clone(),
            section_ref: reference.section_ref.clone(),
            next: reference.next.clone(),
            prev: reference.prev.clone(),
            attribution,
            content,
        })
    }
}

/// Attribution for one language's chunk
///
/// Merged chunks get a provenance title only. A single version is attributed
/// when its language has a default and the titles differ.
fn apply_attribution(fields: &mut AttributionFields, chunk: &TextChunk, defaults: &DefaultVersions) {
    let Some(side) = AttributionSide::for_language(&chunk.language) else {
        return;
    };

    if chunk.is_merged {
        fields.apply_merged(side, &chunk.sources);
        return;
    }

    if let Some(version) = &chunk.version {
        match defaults.title(&version.language) {
            Some(default_title) if default_title != version.title => {
                fields.apply_version(side, version)
            }
            _ => {}
        }
    }
}

fn simple_link(link: &Link) -> SimpleLink {
    SimpleLink {
        source_he_ref: link.source_he_ref.clone(),
        source_ref: link.source_ref.clone(),
        category: link
            .category
            .as_deref()
            .filter(|c| EXPORTED_LINK_CATEGORIES.contains(c))
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::corpus::CorpusSnapshot;
    use crate::core::export::versions::resolve_defaults;
    use crate::domain::WorkTitle;
    use serde_json::json;

    fn corpus() -> Arc<CorpusSnapshot> {
        Arc::new(
            CorpusSnapshot::from_value(json!({
                "works": [{
                    "title": "Foo",
                    "he_title": "פו",
                    "versions": [
                        {"title": "Foo EN", "language": "en"},
                        {"title": "Foo HE", "language": "he"},
                        {"title": "Foo EN Alt", "language": "en",
                         "license": "CC-BY", "notes": "", "source": "https://example.org"}
                    ],
                    "units": [
                        {"ref": "Foo 1", "he_ref": "פו א", "text": {
                            "en": {"segments": ["a", "b", "c"]},
                            "he": {"segments": ["א", "ב", "ג", "ד", "ה"], "merged_from": ["Y", "X", "Y"]}
                        }},
                        {"ref": "Foo 2", "he_ref": "פו ב", "text": {
                            "en": {"segments": ["d"], "version": "Foo EN Alt"},
                            "he": {"segments": ["ו"]}
                        }}
                    ]
                }],
                "links": {
                    "Foo 1:1": [
                        {"source_ref": "Bar 1:1", "source_he_ref": "בר א:א", "category": "Targum"},
                        {"source_ref": "Baz 2:2", "source_he_ref": "בז ב:ב", "category": "Commentary"}
                    ]
                }
            }))
            .unwrap(),
        )
    }

    async fn materialize(reference: &str) -> ExportDocument {
        let corpus = corpus();
        let work = corpus.work(&WorkTitle::new("Foo").unwrap()).await.unwrap();
        let defaults = resolve_defaults(&work);
        let reference = corpus.resolve_ref(reference).await.unwrap();
        SectionMaterializer::new(corpus)
            .materialize(&reference, &defaults)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_segment_count_is_longest_language() {
        let doc = materialize("Foo 1").await;

        assert_eq!(doc.content.len(), 5);
        assert_eq!(doc.content[2].text.as_deref(), Some("c"));
        assert_eq!(doc.content[3].text, None);
        assert_eq!(doc.content[3].he.as_deref(), Some("ד"));
        assert_eq!(doc.content[4].segment_number, "5");
    }

    #[tokio::test]
    async fn test_merged_chunk_attribution() {
        let doc = materialize("Foo 1").await;

        assert_eq!(doc.attribution.he_version_title.as_deref(), Some("Merged from X, Y"));
        assert_eq!(doc.attribution.he_license, None);
        assert_eq!(doc.attribution.he_version_notes, None);
        assert_eq!(doc.attribution.version_title, None);
    }

    #[tokio::test]
    async fn test_non_default_version_emits_present_fields_only() {
        let doc = materialize("Foo 2").await;

        assert_eq!(doc.attribution.version_title.as_deref(), Some("Foo EN Alt"));
        assert_eq!(doc.attribution.license.as_deref(), Some("CC-BY"));
        assert_eq!(doc.attribution.version_source.as_deref(), Some("https://example.org"));
        assert_eq!(doc.attribution.version_notes, None);
        assert_eq!(doc.attribution.he_version_title, None);

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("versionNotes").is_none());
        assert!(value.get("heVersionTitle").is_none());
    }

    #[tokio::test]
    async fn test_links_keep_only_allowed_categories() {
        let doc = materialize("Foo 1").await;
        let links = doc.content[0].links.as_ref().unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].category.as_deref(), Some("Targum"));
        assert_eq!(links[1].source_ref, "Baz 2:2");
        assert_eq!(links[1].category, None);
        assert!(doc.content[1].links.is_none());
    }

    #[tokio::test]
    async fn test_navigation_and_identity() {
        let doc = materialize("Foo 1").await;

        assert_eq!(doc.reference, "Foo 1");
        assert_eq!(doc.he_ref, "פו א");
        assert_eq!(doc.index_title, "Foo");
        assert_eq!(doc.prev, None);
        assert_eq!(doc.next.as_deref(), Some("Foo 2"));
    }

    #[tokio::test]
    async fn test_materialization_is_deterministic() {
        let first = serde_json::to_vec(&materialize("Foo 1").await).unwrap();
        let second = serde_json::to_vec(&materialize("Foo 1").await).unwrap();
        assert_eq!(first, second);
    }
}
