//! External system integrations for Quire.
//!
//! - [`corpus`] - Read interface over the text corpus, its history log and
//!   calendar records, plus a JSON snapshot implementation
//! - [`cdn`] - Cache purge transport
//!
//! Collaborators are traits used behind `Arc<dyn Trait>` so the pipeline can
//! be driven by any backing store and tested against in-memory fixtures.
//!
//! ```rust,no_run
//! use quire::adapters::corpus::{Corpus, CorpusSnapshot};
//! use quire::domain::WorkTitle;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = CorpusSnapshot::load("corpus.json").await?;
//! let work = corpus.work(&WorkTitle::new("Genesis")?).await?;
//! println!("{} has {} versions", work.title, work.versions.len());
//! # Ok(())
//! # }
//! ```

pub mod cdn;
pub mod corpus;
