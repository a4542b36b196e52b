//! Search form schemas.
//!
//! Every search page is described by a fixed list of [`FieldDescriptor`]s.
//! Per-kind attributes (single or multiple selection, the field an AND/OR
//! toggle refers to, which side of the year range a field bounds) live in
//! the [`FieldKind`] variant, so nothing is attached to a field after the
//! schema is built.

use dbbe_search::entity::EntityKind;

/// Which end of the year range a year field sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// Lower bound (`year_from`).
    From,
    /// Upper bound (`year_to`).
    To,
}

/// What kind of input a field is, with the attributes of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A fixed choice sent as-is (`text_type`, `date_search_type`, `id`).
    Exact,
    /// Free text; typing is debounced.
    Text,
    /// One end of the year range; sent as `filters[date][from|to]`.
    Year(RangeBound),
    /// Related entities offered from the aggregation buckets.
    Nested {
        /// Whether several values may be selected.
        multiple: bool,
    },
    /// Yes/no switch.
    Boolean,
    /// AND/OR switch, only enabled when `multi_dependency` has two or more
    /// selected values.
    Toggle {
        /// The multi-select this switch combines.
        multi_dependency: &'static str,
    },
}

/// One field of a search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Filter key, unique within a schema.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Field that must have a value before this one is meaningful.
    pub dependency: Option<&'static str>,
}

impl FieldDescriptor {
    /// Returns true for fields whose candidates come from aggregation buckets.
    pub fn is_faceted(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { .. })
    }

    /// Returns true for multi-select fields.
    pub fn is_multiple(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { multiple: true })
    }
}

const fn single(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Nested { multiple: false },
        dependency: None,
    }
}

const fn multiple(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Nested { multiple: true },
        dependency: None,
    }
}

const fn depends_on(
    key: &'static str,
    label: &'static str,
    dependency: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Nested { multiple: false },
        dependency: Some(dependency),
    }
}

const fn text(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Text,
        dependency: None,
    }
}

const fn exact(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Exact,
        dependency: None,
    }
}

const fn flag(key: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Boolean,
        dependency: None,
    }
}

const fn toggle(key: &'static str, label: &'static str, of: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind: FieldKind::Toggle {
            multi_dependency: of,
        },
        dependency: None,
    }
}

const YEAR_FROM: FieldDescriptor = FieldDescriptor {
    key: "year_from",
    label: "Year from",
    kind: FieldKind::Year(RangeBound::From),
    dependency: None,
};

const YEAR_TO: FieldDescriptor = FieldDescriptor {
    key: "year_to",
    label: "Year to",
    kind: FieldKind::Year(RangeBound::To),
    dependency: None,
};

/// The search form of one entity type.
#[derive(Debug)]
pub struct SearchSchema {
    /// Entity searched by this form.
    pub entity: EntityKind,
    /// Fields in display order.
    pub fields: &'static [FieldDescriptor],
}

impl SearchSchema {
    /// Returns the schema of an entity's search page.
    pub fn for_entity(entity: EntityKind) -> &'static SearchSchema {
        match entity {
            EntityKind::Manuscript => &MANUSCRIPT_SEARCH,
            EntityKind::Occurrence => &OCCURRENCE_SEARCH,
            EntityKind::Type => &TYPE_SEARCH,
            EntityKind::Person => &PERSON_SEARCH,
            EntityKind::Bibliography => &BIBLIOGRAPHY_SEARCH,
        }
    }

    /// Looks a field up by key.
    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Fields whose `dependency` is `key`.
    pub fn dependants(&self, key: &str) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields
            .iter()
            .filter(move |field| field.dependency == Some(key))
    }

    /// AND/OR switches combining the multi-select `key`.
    pub fn toggles_of(&self, key: &str) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(move |field| {
            matches!(field.kind, FieldKind::Toggle { multi_dependency } if multi_dependency == key)
        })
    }

    /// Returns true if a non-empty value in `key` hands ordering to relevance.
    pub fn suppresses_sort(&self, key: &str) -> bool {
        self.entity.table().is_text_key(key)
    }

    /// Logical sort name used when the user has not picked one.
    pub fn default_order(&self) -> &'static str {
        self.entity.table().default_sort
    }

    /// Returns true if the schema has a year range.
    pub fn has_years(&self) -> bool {
        self.field(YEAR_FROM.key).is_some()
    }
}

/// Manuscript search form.
pub static MANUSCRIPT_SEARCH: SearchSchema = SearchSchema {
    entity: EntityKind::Manuscript,
    fields: &[
        single("city", "City"),
        depends_on("library", "Library", "city"),
        depends_on("collection", "Collection", "library"),
        text("shelf", "Shelf number"),
        exact("diktyon", "Diktyon"),
        YEAR_FROM,
        YEAR_TO,
        exact("date_search_type", "Date search options"),
        multiple("content", "Content"),
        toggle("content_op", "Content AND/OR", "content"),
        multiple("person", "Person"),
        multiple("role", "Role"),
        single("origin", "Origin"),
        multiple("acknowledgement", "Acknowledgements"),
        text("comment", "Comment"),
        flag("public", "Public"),
        multiple("management", "Management collection"),
        flag("management_inverse", "Exclude management collection"),
    ],
};

/// Occurrence search form.
pub static OCCURRENCE_SEARCH: SearchSchema = SearchSchema {
    entity: EntityKind::Occurrence,
    fields: &[
        text("text", "Text"),
        exact("text_type", "Text search options"),
        text("title", "Title"),
        exact("title_type", "Title search options"),
        exact("id", "Id"),
        YEAR_FROM,
        YEAR_TO,
        exact("date_search_type", "Date search options"),
        single("manuscript", "Manuscript"),
        multiple("person", "Person"),
        multiple("role", "Role"),
        multiple("genre", "Genre"),
        toggle("genre_op", "Genre AND/OR", "genre"),
        multiple("metre", "Metre"),
        toggle("metre_op", "Metre AND/OR", "metre"),
        multiple("subject", "Subject"),
        toggle("subject_op", "Subject AND/OR", "subject"),
        multiple("manuscript_content", "Manuscript content"),
        multiple("acknowledgement", "Acknowledgements"),
        flag("dbbe", "Transcribed by DBBE"),
        single("text_status", "Text status"),
        text("comment", "Comment"),
        flag("public", "Public"),
        multiple("management", "Management collection"),
        flag("management_inverse", "Exclude management collection"),
    ],
};

/// Type search form.
pub static TYPE_SEARCH: SearchSchema = SearchSchema {
    entity: EntityKind::Type,
    fields: &[
        text("text", "Text"),
        exact("text_type", "Text search options"),
        text("title", "Title"),
        exact("title_type", "Title search options"),
        exact("id", "Id"),
        multiple("person", "Person"),
        multiple("role", "Role"),
        multiple("genre", "Genre"),
        toggle("genre_op", "Genre AND/OR", "genre"),
        multiple("metre", "Metre"),
        toggle("metre_op", "Metre AND/OR", "metre"),
        multiple("subject", "Subject"),
        toggle("subject_op", "Subject AND/OR", "subject"),
        multiple("tag", "Tag"),
        toggle("tag_op", "Tag AND/OR", "tag"),
        multiple("acknowledgement", "Acknowledgements"),
        single("text_status", "Text status"),
        single("critical_status", "Editorial status"),
        text("comment", "Comment"),
        flag("public", "Public"),
        multiple("management", "Management collection"),
        flag("management_inverse", "Exclude management collection"),
    ],
};

/// Person search form.
pub static PERSON_SEARCH: SearchSchema = SearchSchema {
    entity: EntityKind::Person,
    fields: &[
        text("name", "Name"),
        YEAR_FROM,
        YEAR_TO,
        exact("date_search_type", "Date search options"),
        multiple("role", "Role"),
        multiple("office", "Office"),
        single("origin", "Origin"),
        multiple("self_designation", "Self designation"),
        toggle("self_designation_op", "Self designation AND/OR", "self_designation"),
        flag("historical", "Historical"),
        flag("modern", "Modern"),
        multiple("acknowledgement", "Acknowledgements"),
        text("comment", "Comment"),
        flag("public", "Public"),
        multiple("management", "Management collection"),
        flag("management_inverse", "Exclude management collection"),
    ],
};

/// Bibliography search form.
pub static BIBLIOGRAPHY_SEARCH: SearchSchema = SearchSchema {
    entity: EntityKind::Bibliography,
    fields: &[
        multiple("type", "Type"),
        text("title", "Title"),
        exact("title_type", "Title search options"),
        multiple("person", "Person"),
        multiple("role", "Role"),
        text("comment", "Comment"),
        flag("public", "Public"),
        multiple("management", "Management collection"),
        flag("management_inverse", "Exclude management collection"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        for entity in EntityKind::ALL {
            let schema = SearchSchema::for_entity(entity);
            let mut keys: Vec<_> = schema.fields.iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), schema.fields.len(), "{entity}");
        }
    }

    #[test]
    fn test_references_point_into_schema() {
        for entity in EntityKind::ALL {
            let schema = SearchSchema::for_entity(entity);
            for field in schema.fields {
                if let Some(dependency) = field.dependency {
                    assert!(schema.field(dependency).is_some(), "{}", field.key);
                }
                if let FieldKind::Toggle { multi_dependency } = field.kind {
                    assert!(
                        schema.field(multi_dependency).is_some_and(|f| f.is_multiple()),
                        "{}",
                        field.key
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_filter_is_known_to_the_server() {
        for entity in EntityKind::ALL {
            let schema = SearchSchema::for_entity(entity);
            let table = entity.table();
            for field in schema.fields {
                let key = match field.kind {
                    FieldKind::Year(_) => "date",
                    _ => field.key,
                };
                assert!(table.filter_kind(key).is_some(), "{entity}: {key}");
            }
        }
    }

    #[test]
    fn test_dependants() {
        let deps: Vec<_> = MANUSCRIPT_SEARCH.dependants("city").map(|f| f.key).collect();
        assert_eq!(deps, vec!["library"]);
        let toggles: Vec<_> = OCCURRENCE_SEARCH.toggles_of("genre").map(|f| f.key).collect();
        assert_eq!(toggles, vec!["genre_op"]);
    }

    #[test]
    fn test_sort_suppression_follows_text_keys() {
        assert!(OCCURRENCE_SEARCH.suppresses_sort("text"));
        assert!(OCCURRENCE_SEARCH.suppresses_sort("comment"));
        assert!(!OCCURRENCE_SEARCH.suppresses_sort("genre"));
        assert_eq!(MANUSCRIPT_SEARCH.default_order(), "name");
    }
}
