//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for corpus identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work title newtype wrapper
///
/// A work's title is its globally unique identity in the corpus and the stem
/// of every artifact exported for it (`{title}.zip`, `{title}_index.json`).
///
/// # Examples
///
/// ```
/// use quire::domain::ids::WorkTitle;
/// use std::str::FromStr;
///
/// let title = WorkTitle::from_str("Genesis").unwrap();
/// assert_eq!(title.as_str(), "Genesis");
/// assert_eq!(title.archive_name(), "Genesis.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkTitle(String);

impl WorkTitle {
    /// Creates a new WorkTitle from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or contains a path separator,
    /// since titles name files in the output area.
    pub fn new(title: impl Into<String>) -> Result<Self, String> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Work title cannot be empty".to_string());
        }
        if title.contains('/') || title.contains('\\') || title == "." || title == ".." {
            return Err(format!("Work title cannot be used as a file name: {title}"));
        }
        Ok(Self(title))
    }

    /// Returns the title as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// File name of the work's archive
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.0)
    }

    /// File name of the work's index document
    pub fn index_document_name(&self) -> String {
        format!("{}_index.json", self.0)
    }
}

impl fmt::Display for WorkTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkTitle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WorkTitle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkTitle> for String {
    fn from(title: WorkTitle) -> Self {
        title.0
    }
}

impl AsRef<str> for WorkTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
