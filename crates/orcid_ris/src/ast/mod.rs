//! The normalized, in-memory model of a researcher's works.
//!
//! Values here have every registry fallback already applied, so formatting code never needs to
//! reason about missing or malformed registry data.

use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer};

mod orcid_id;

pub use orcid_id::OrcidId;

/// Title used when the registry record carries none.
pub const NO_TITLE: &str = "No Title";

/// The registry's stable key for one work within a researcher's record.
///
/// The registry sends it as an integer but it is treated as opaque text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PutCode(String);

impl PutCode {
    /// Wraps an existing put-code value.
    #[must_use]
    pub fn new<S: Into<String>>(code: S) -> Self {
        Self(code.into())
    }

    /// The put-code as used in registry URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PutCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PutCode {
    fn from(code: u64) -> Self {
        Self(code.to_string())
    }
}

impl<'de> Deserialize<'de> for PutCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            serde_json::Value::String(s) if !s.trim().is_empty() => Ok(Self(s.trim().to_owned())),
            other => Err(D::Error::custom(format!("invalid put-code: {other}"))),
        }
    }
}

/// Category of a work, mapped from the registry's `type` field onto a RIS reference type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WorkType {
    /// `journal-article`
    JournalArticle,
    /// `book`
    Book,
    /// `book-chapter`
    BookChapter,
    /// `conference-paper`
    ConferencePaper,
    /// `report`
    Report,
    /// `dissertation`
    Dissertation,
    /// `other` and every type without a dedicated RIS code.
    #[default]
    Generic,
}

impl WorkType {
    /// Looks up a registry type name, ignoring case. Unknown names map to [`WorkType::Generic`].
    #[must_use]
    pub fn from_registry_type(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "journal-article" => Self::JournalArticle,
            "book" => Self::Book,
            "book-chapter" => Self::BookChapter,
            "conference-paper" => Self::ConferencePaper,
            "report" => Self::Report,
            "dissertation" => Self::Dissertation,
            _ => Self::Generic,
        }
    }

    /// The four letter RIS `TY` code.
    #[must_use]
    pub const fn ris_code(self) -> &'static str {
        match self {
            Self::JournalArticle => "JOUR",
            Self::Book => "BOOK",
            Self::BookChapter => "CHAP",
            Self::ConferencePaper => "CONF",
            Self::Report => "RPRT",
            Self::Dissertation => "THES",
            Self::Generic => "GEN",
        }
    }
}

/// One normalized work.
///
/// Empty `journal`, `year`, and `doi` values mean the registry record did not carry them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Work {
    /// The registry key the work was fetched with, written as the RIS `ID`.
    pub put_code: PutCode,
    /// Reference type, [`WorkType::Generic`] when the registry gives none.
    pub kind: WorkType,
    /// Credit names in contributor order.
    pub authors: Vec<String>,
    /// The work title, or [`NO_TITLE`].
    pub title: String,
    /// Journal title.
    pub journal: String,
    /// Publication year as the registry gives it.
    pub year: String,
    /// The first DOI listed among the external identifiers.
    pub doi: String,
}

impl Work {
    /// A work with only its put-code set and every other field at its fallback value.
    #[must_use]
    pub fn new(put_code: PutCode) -> Self {
        Self {
            put_code,
            kind: WorkType::default(),
            authors: Vec::new(),
            title: NO_TITLE.to_owned(),
            journal: String::new(),
            year: String::new(),
            doi: String::new(),
        }
    }
}

/// Works in the order the registry listed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Biblio {
    works: Vec<Work>,
}

impl Biblio {
    /// Wraps works that are already in listing order.
    #[must_use]
    pub const fn new(works: Vec<Work>) -> Self {
        Self { works }
    }

    /// Appends a work, keeping listing order.
    pub fn insert(&mut self, work: Work) {
        self.works.push(work);
    }

    /// Iterates the works in listing order.
    pub fn works(&self) -> impl Iterator<Item = &Work> {
        self.works.iter()
    }

    /// Number of works.
    #[must_use]
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Returns `true` when there are no works.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}
