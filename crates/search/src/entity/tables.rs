//! Per-entity filter classification tables.
//!
//! One table per entity replaces a hand-written sanitize method per
//! controller. A table lists every accepted filter key with its
//! [`FilterKind`], the logical sort names, the date interval fields and the
//! facet fields returned with each search.

use super::EntityKind;

/// How a raw filter value is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Numeric identifier compared exactly.
    Exact,
    /// Enumerated value. Kept only when the `requires` filter is present,
    /// in which case it defaults to `default`; unknown values are coerced
    /// to `default`.
    Choice {
        /// Accepted values.
        allowed: &'static [&'static str],
        /// Fallback value.
        default: &'static str,
        /// Filter this choice qualifies.
        requires: &'static str,
    },
    /// Free text.
    Text,
    /// `{from, to}` year range against the entity's date fields.
    Range,
    /// One or more ids of a related entity.
    Nested,
    /// Boolean flag.
    Boolean,
}

/// What a logical sort name expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSpec {
    /// Fixed field paths.
    Fields(&'static [&'static str]),
    /// The floor/ceiling pair, ordered by direction.
    Date,
}

/// Floor and ceiling fields of a fuzzy date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    /// Earliest possible year.
    pub floor: &'static str,
    /// Latest possible year.
    pub ceiling: &'static str,
}

/// Filter and sort configuration for one entity type.
#[derive(Debug)]
pub struct FieldClassificationTable {
    /// The entity this table describes.
    pub entity: EntityKind,
    /// Accepted filter keys.
    pub filters: &'static [(&'static str, FilterKind)],
    /// Accepted logical sort names.
    pub sorts: &'static [(&'static str, SortSpec)],
    /// Sort name used when none (or an unknown one) is requested.
    pub default_sort: &'static str,
    /// Fuzzy date fields, if the entity is dated.
    pub date_fields: Option<DateFields>,
    /// Filters ranked by relevance; their presence suppresses the default sort.
    pub text_keys: &'static [&'static str],
    /// Facets returned with every search.
    pub aggregate_fields: &'static [&'static str],
}

impl FieldClassificationTable {
    /// Returns the kind of a filter key.
    pub fn filter_kind(&self, key: &str) -> Option<FilterKind> {
        self.filters
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| *kind)
    }

    /// Returns the expansion of a logical sort name.
    pub fn sort(&self, name: &str) -> Option<SortSpec> {
        self.sorts
            .iter()
            .find(|(sort, _)| *sort == name)
            .map(|(_, spec)| *spec)
    }

    /// Returns true if `key` is a relevance-ranked text filter.
    pub fn is_text_key(&self, key: &str) -> bool {
        self.text_keys.contains(&key)
    }

    /// Expands a sort spec into field paths for the given direction.
    ///
    /// A descending date sort puts the ceiling first so the latest
    /// precisely dated records come first.
    pub fn sort_fields(&self, spec: SortSpec, ascending: bool) -> Vec<String> {
        match spec {
            SortSpec::Fields(fields) => fields.iter().map(|f| f.to_string()).collect(),
            SortSpec::Date => match self.date_fields {
                Some(DateFields { floor, ceiling }) if ascending => {
                    vec![floor.to_string(), ceiling.to_string()]
                }
                Some(DateFields { floor, ceiling }) => {
                    vec![ceiling.to_string(), floor.to_string()]
                }
                None => Vec::new(),
            },
        }
    }
}

const TEXT_TYPE: FilterKind = FilterKind::Choice {
    allowed: &["any", "all", "phrase"],
    default: "any",
    requires: "text",
};

const TITLE_TYPE: FilterKind = FilterKind::Choice {
    allowed: &["any", "all", "phrase"],
    default: "any",
    requires: "title",
};

const DATE_SEARCH_TYPE: FilterKind = FilterKind::Choice {
    allowed: &["overlap", "included", "exact"],
    default: "overlap",
    requires: "date",
};

const fn op_for(requires: &'static str) -> FilterKind {
    FilterKind::Choice {
        allowed: &["or", "and"],
        default: "or",
        requires,
    }
}

/// Manuscripts.
pub static MANUSCRIPT: FieldClassificationTable = FieldClassificationTable {
    entity: EntityKind::Manuscript,
    filters: &[
        ("city", FilterKind::Nested),
        ("library", FilterKind::Nested),
        ("collection", FilterKind::Nested),
        ("shelf", FilterKind::Text),
        ("diktyon", FilterKind::Exact),
        ("date", FilterKind::Range),
        ("date_search_type", DATE_SEARCH_TYPE),
        ("content", FilterKind::Nested),
        ("content_op", op_for("content")),
        ("person", FilterKind::Nested),
        ("role", FilterKind::Nested),
        ("origin", FilterKind::Nested),
        ("acknowledgement", FilterKind::Nested),
        ("comment", FilterKind::Text),
        ("public_comment", FilterKind::Text),
        ("public", FilterKind::Boolean),
        ("management", FilterKind::Nested),
        ("management_inverse", FilterKind::Boolean),
    ],
    sorts: &[
        ("name", SortSpec::Fields(&["name.keyword"])),
        ("date", SortSpec::Date),
    ],
    default_sort: "name",
    date_fields: Some(DateFields {
        floor: "date_floor_year",
        ceiling: "date_ceiling_year",
    }),
    text_keys: &["comment", "public_comment"],
    aggregate_fields: &[
        "city",
        "library",
        "collection",
        "content",
        "person",
        "role",
        "origin",
        "acknowledgement",
        "management",
    ],
};

/// Occurrences.
pub static OCCURRENCE: FieldClassificationTable = FieldClassificationTable {
    entity: EntityKind::Occurrence,
    filters: &[
        ("id", FilterKind::Exact),
        ("text", FilterKind::Text),
        ("text_type", TEXT_TYPE),
        ("title", FilterKind::Text),
        ("title_type", TITLE_TYPE),
        ("dbbe", FilterKind::Boolean),
        ("date", FilterKind::Range),
        ("date_search_type", DATE_SEARCH_TYPE),
        ("manuscript", FilterKind::Nested),
        ("person", FilterKind::Nested),
        ("role", FilterKind::Nested),
        ("genre", FilterKind::Nested),
        ("genre_op", op_for("genre")),
        ("metre", FilterKind::Nested),
        ("metre_op", op_for("metre")),
        ("subject", FilterKind::Nested),
        ("subject_op", op_for("subject")),
        ("manuscript_content", FilterKind::Nested),
        ("acknowledgement", FilterKind::Nested),
        ("text_status", FilterKind::Nested),
        ("comment", FilterKind::Text),
        ("public_comment", FilterKind::Text),
        ("public", FilterKind::Boolean),
        ("management", FilterKind::Nested),
        ("management_inverse", FilterKind::Boolean),
    ],
    sorts: &[
        ("id", SortSpec::Fields(&["id"])),
        ("incipit", SortSpec::Fields(&["incipit.keyword"])),
        ("manuscript", SortSpec::Fields(&["manuscript.name.keyword"])),
        ("date", SortSpec::Date),
    ],
    default_sort: "incipit",
    date_fields: Some(DateFields {
        floor: "date_floor_year",
        ceiling: "date_ceiling_year",
    }),
    text_keys: &["text", "title", "comment", "public_comment"],
    aggregate_fields: &[
        "manuscript",
        "person",
        "role",
        "genre",
        "metre",
        "subject",
        "manuscript_content",
        "acknowledgement",
        "text_status",
        "management",
    ],
};

/// Types.
pub static TYPE: FieldClassificationTable = FieldClassificationTable {
    entity: EntityKind::Type,
    filters: &[
        ("id", FilterKind::Exact),
        ("text", FilterKind::Text),
        ("text_type", TEXT_TYPE),
        ("title", FilterKind::Text),
        ("title_type", TITLE_TYPE),
        ("person", FilterKind::Nested),
        ("role", FilterKind::Nested),
        ("genre", FilterKind::Nested),
        ("genre_op", op_for("genre")),
        ("metre", FilterKind::Nested),
        ("metre_op", op_for("metre")),
        ("subject", FilterKind::Nested),
        ("subject_op", op_for("subject")),
        ("tag", FilterKind::Nested),
        ("tag_op", op_for("tag")),
        ("acknowledgement", FilterKind::Nested),
        ("text_status", FilterKind::Nested),
        ("critical_status", FilterKind::Nested),
        ("comment", FilterKind::Text),
        ("public_comment", FilterKind::Text),
        ("public", FilterKind::Boolean),
        ("management", FilterKind::Nested),
        ("management_inverse", FilterKind::Boolean),
    ],
    sorts: &[
        ("id", SortSpec::Fields(&["id"])),
        ("incipit", SortSpec::Fields(&["incipit.keyword"])),
    ],
    default_sort: "incipit",
    date_fields: None,
    text_keys: &["text", "title", "comment", "public_comment"],
    aggregate_fields: &[
        "person",
        "role",
        "genre",
        "metre",
        "subject",
        "tag",
        "acknowledgement",
        "text_status",
        "critical_status",
        "management",
    ],
};

/// Persons.
pub static PERSON: FieldClassificationTable = FieldClassificationTable {
    entity: EntityKind::Person,
    filters: &[
        ("name", FilterKind::Text),
        ("date", FilterKind::Range),
        ("date_search_type", DATE_SEARCH_TYPE),
        ("role", FilterKind::Nested),
        ("office", FilterKind::Nested),
        ("origin", FilterKind::Nested),
        ("self_designation", FilterKind::Nested),
        ("self_designation_op", op_for("self_designation")),
        ("historical", FilterKind::Boolean),
        ("modern", FilterKind::Boolean),
        ("acknowledgement", FilterKind::Nested),
        ("comment", FilterKind::Text),
        ("public_comment", FilterKind::Text),
        ("public", FilterKind::Boolean),
        ("management", FilterKind::Nested),
        ("management_inverse", FilterKind::Boolean),
    ],
    sorts: &[
        ("name", SortSpec::Fields(&["name.keyword"])),
        ("date", SortSpec::Date),
    ],
    default_sort: "name",
    date_fields: Some(DateFields {
        floor: "born_date_floor_year",
        ceiling: "death_date_ceiling_year",
    }),
    text_keys: &["name", "comment", "public_comment"],
    aggregate_fields: &[
        "role",
        "office",
        "origin",
        "self_designation",
        "acknowledgement",
        "management",
    ],
};

/// Bibliographic items.
pub static BIBLIOGRAPHY: FieldClassificationTable = FieldClassificationTable {
    entity: EntityKind::Bibliography,
    filters: &[
        ("type", FilterKind::Nested),
        ("title", FilterKind::Text),
        ("title_type", TITLE_TYPE),
        ("person", FilterKind::Nested),
        ("role", FilterKind::Nested),
        ("comment", FilterKind::Text),
        ("public_comment", FilterKind::Text),
        ("public", FilterKind::Boolean),
        ("management", FilterKind::Nested),
        ("management_inverse", FilterKind::Boolean),
    ],
    sorts: &[
        ("title", SortSpec::Fields(&["title.keyword"])),
        ("type", SortSpec::Fields(&["type.name.keyword", "title.keyword"])),
    ],
    default_sort: "title",
    date_fields: None,
    text_keys: &["title", "comment", "public_comment"],
    aggregate_fields: &["type", "person", "role", "management"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_sort_direction() {
        let asc = MANUSCRIPT.sort_fields(SortSpec::Date, true);
        let desc = MANUSCRIPT.sort_fields(SortSpec::Date, false);
        assert_eq!(asc, vec!["date_floor_year", "date_ceiling_year"]);
        assert_eq!(desc, vec!["date_ceiling_year", "date_floor_year"]);
    }

    #[test]
    fn test_person_date_uses_lifespan() {
        let desc = PERSON.sort_fields(SortSpec::Date, false);
        assert_eq!(desc, vec!["death_date_ceiling_year", "born_date_floor_year"]);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(MANUSCRIPT.filter_kind("city"), Some(FilterKind::Nested));
        assert_eq!(MANUSCRIPT.filter_kind("text"), None);
        assert!(OCCURRENCE.is_text_key("text"));
        assert!(!OCCURRENCE.is_text_key("genre"));
        assert!(TYPE.sort("date").is_none());
    }
}
