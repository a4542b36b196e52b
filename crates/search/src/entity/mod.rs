//! DBBE entity types and their filter classification tables.

mod tables;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use tables::{
    BIBLIOGRAPHY, DateFields, FieldClassificationTable, FilterKind, MANUSCRIPT, OCCURRENCE,
    PERSON, SortSpec, TYPE,
};

/// The searchable entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Manuscripts.
    Manuscript,
    /// Occurrences of an epigram in a manuscript.
    Occurrence,
    /// Normalized epigram types.
    Type,
    /// Historical and modern persons.
    Person,
    /// Bibliographic items.
    Bibliography,
}

impl EntityKind {
    /// All entity kinds.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Manuscript,
        EntityKind::Occurrence,
        EntityKind::Type,
        EntityKind::Person,
        EntityKind::Bibliography,
    ];

    /// URL path segment (`/manuscripts/search`).
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Manuscript => "manuscripts",
            EntityKind::Occurrence => "occurrences",
            EntityKind::Type => "types",
            EntityKind::Person => "persons",
            EntityKind::Bibliography => "bibliographies",
        }
    }

    /// Looks an entity up by its URL path segment.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    /// Search index name.
    pub fn index_name(&self) -> &'static str {
        match self {
            EntityKind::Manuscript => "manuscripts",
            EntityKind::Occurrence => "occurrences",
            EntityKind::Type => "types",
            EntityKind::Person => "persons",
            EntityKind::Bibliography => "bibliographies",
        }
    }

    /// The classification table for this entity.
    pub fn table(&self) -> &'static FieldClassificationTable {
        match self {
            EntityKind::Manuscript => &MANUSCRIPT,
            EntityKind::Occurrence => &OCCURRENCE,
            EntityKind::Type => &TYPE,
            EntityKind::Person => &PERSON,
            EntityKind::Bibliography => &BIBLIOGRAPHY,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Manuscript => write!(f, "manuscript"),
            EntityKind::Occurrence => write!(f, "occurrence"),
            EntityKind::Type => write!(f, "type"),
            EntityKind::Person => write!(f, "person"),
            EntityKind::Bibliography => write!(f, "bibliography"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manuscript" | "manuscripts" => Ok(EntityKind::Manuscript),
            "occurrence" | "occurrences" => Ok(EntityKind::Occurrence),
            "type" | "types" => Ok(EntityKind::Type),
            "person" | "persons" => Ok(EntityKind::Person),
            "bibliography" | "bibliographies" => Ok(EntityKind::Bibliography),
            _ => Err(format!("unknown entity type: {}", s)),
        }
    }
}
