//! Turns untrusted request parameters into a [`SearchRequest`].
//!
//! One [`FilterSanitizer`] serves every entity type; the per-entity
//! differences live in its [`FieldClassificationTable`]. Sanitization never
//! fails: values that cannot be interpreted fall back to their defaults or
//! are dropped.

use tracing::{debug, trace};

use crate::entity::{EntityKind, FieldClassificationTable, FilterKind};
use crate::types::{
    DEFAULT_LIMIT, DEFAULT_PAGE, FilterValue, Filters, ParamValue, RawParams, SearchRequest,
    YearRange,
};
use crate::visibility::apply_visibility;

/// Default upper bound for `limit`.
pub const DEFAULT_MAX_LIMIT: usize = 1000;

/// Pagination bounds applied by the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizerLimits {
    /// Page size used when `limit` is missing or not numeric.
    pub default_limit: usize,
    /// Largest accepted page size.
    pub max_limit: usize,
}

impl Default for SanitizerLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

/// Sanitizes raw parameters for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct FilterSanitizer {
    table: &'static FieldClassificationTable,
    limits: SanitizerLimits,
}

impl FilterSanitizer {
    /// Creates a sanitizer over a classification table.
    pub fn new(table: &'static FieldClassificationTable, limits: SanitizerLimits) -> Self {
        Self { table, limits }
    }

    /// Creates a sanitizer for an entity with default limits.
    pub fn for_entity(entity: EntityKind) -> Self {
        Self::new(entity.table(), SanitizerLimits::default())
    }

    /// Returns the table this sanitizer classifies against.
    pub fn table(&self) -> &'static FieldClassificationTable {
        self.table
    }

    /// Sanitizes a parsed parameter tree.
    pub fn sanitize(&self, params: &RawParams, caller_can_view_internal: bool) -> SearchRequest {
        let limit = parse_int(params.get_str("limit"))
            .map(|limit| limit.clamp(1, self.limits.max_limit as i64) as usize)
            .unwrap_or_else(|| self.limits.default_limit.clamp(1, self.limits.max_limit));
        let page = parse_int(params.get_str("page"))
            .map(|page| page.max(1) as usize)
            .unwrap_or(DEFAULT_PAGE);

        let filters = match params.get("filters") {
            Some(ParamValue::Map(raw)) => self.classify(raw.iter()),
            Some(_) => {
                debug!(entity = %self.table.entity, "filters parameter is not a mapping, ignoring it");
                Filters::new()
            }
            None => Filters::new(),
        };
        let filters = apply_visibility(filters, caller_can_view_internal);

        let (order_by, ascending, sort_key) = match params.get_str("orderBy") {
            Some(requested) => {
                let ascending = params.get_str("ascending") != Some("0");
                let name = match self.table.sort(requested) {
                    Some(_) => requested,
                    None => {
                        debug!(
                            entity = %self.table.entity,
                            order_by = requested,
                            "unknown sort field, using default"
                        );
                        self.table.default_sort
                    }
                };
                (self.sort_fields(name, ascending), ascending, Some(name.to_string()))
            }
            None if filters.keys().any(|key| self.table.is_text_key(key)) => {
                (Vec::new(), true, None)
            }
            None => (self.sort_fields(self.table.default_sort, true), true, None),
        };

        trace!(entity = %self.table.entity, limit, page, ?order_by, "sanitized search request");

        SearchRequest {
            limit,
            page,
            order_by,
            ascending,
            filters,
            sort_key,
        }
    }

    /// Parses and sanitizes a raw query string.
    pub fn sanitize_query(&self, query: &str, caller_can_view_internal: bool) -> SearchRequest {
        self.sanitize(&RawParams::parse_query(query), caller_can_view_internal)
    }

    fn sort_fields(&self, name: &str, ascending: bool) -> Vec<String> {
        self.table
            .sort(name)
            .map(|spec| self.table.sort_fields(spec, ascending))
            .unwrap_or_default()
    }

    fn classify<'a>(&self, raw: impl Iterator<Item = (&'a String, &'a ParamValue)>) -> Filters {
        let mut filters = Filters::new();
        let mut choices = Vec::new();
        let mut year_alias = YearRange::default();

        for (key, value) in raw {
            if key == "year_from" || key == "year_to" {
                let year = value.as_scalar().and_then(|s| parse_year(Some(s)));
                if key == "year_from" {
                    year_alias.from = year;
                } else {
                    year_alias.to = year;
                }
                continue;
            }

            let Some(kind) = self.table.filter_kind(key) else {
                debug!(entity = %self.table.entity, filter = %key, "dropping unrecognized filter");
                continue;
            };

            let sanitized = match kind {
                FilterKind::Exact => value
                    .as_scalar()
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(|id| FilterValue::Exact(id.to_string())),
                FilterKind::Text => value
                    .as_scalar()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| FilterValue::Text(s.to_string())),
                FilterKind::Range => value.as_map().and_then(|map| {
                    let range = YearRange::new(
                        parse_year(map.get("from").and_then(ParamValue::as_scalar)),
                        parse_year(map.get("to").and_then(ParamValue::as_scalar)),
                    );
                    (!range.is_open()).then_some(FilterValue::Range(range))
                }),
                FilterKind::Nested => {
                    let mut ids: Vec<u64> = Vec::new();
                    for id in value.values() {
                        match id.trim().parse::<u64>() {
                            Ok(id) if !ids.contains(&id) => ids.push(id),
                            Ok(_) => {}
                            Err(_) => {
                                trace!(filter = %key, value = id, "ignoring non-numeric id");
                            }
                        }
                    }
                    (!ids.is_empty()).then_some(FilterValue::Nested(ids))
                }
                FilterKind::Boolean => value.as_scalar().and_then(parse_flag).map(FilterValue::Flag),
                FilterKind::Choice { .. } => {
                    choices.push((key.as_str(), value.as_scalar()));
                    continue;
                }
            };

            match sanitized {
                Some(sanitized) => {
                    filters.insert(key.clone(), sanitized);
                }
                None => {
                    debug!(entity = %self.table.entity, filter = %key, "dropping malformed filter value");
                }
            }
        }

        if !year_alias.is_open() && self.table.filter_kind("date") == Some(FilterKind::Range) {
            let merged = match filters.get("date") {
                Some(FilterValue::Range(range)) => YearRange::new(
                    range.from.or(year_alias.from),
                    range.to.or(year_alias.to),
                ),
                _ => year_alias,
            };
            filters.insert("date".to_string(), FilterValue::Range(merged));
        }

        self.resolve_choices(&mut filters, &choices);
        filters
    }

    /// Fills in every choice filter whose qualified filter is present.
    ///
    /// A choice is kept only next to the filter it qualifies; missing or
    /// unknown values fall back to the choice's default.
    fn resolve_choices(&self, filters: &mut Filters, requested: &[(&str, Option<&str>)]) {
        for (key, kind) in self.table.filters {
            let FilterKind::Choice {
                allowed,
                default,
                requires,
            } = *kind
            else {
                continue;
            };

            let applies = match filters.get(requires) {
                Some(FilterValue::Nested(ids)) => ids.len() >= 2,
                Some(_) => true,
                None => false,
            };
            if !applies {
                continue;
            }

            let value = requested
                .iter()
                .find(|(name, _)| name == key)
                .and_then(|(_, value)| *value)
                .filter(|value| allowed.contains(value))
                .unwrap_or(default);
            filters.insert(key.to_string(), FilterValue::Exact(value.to_string()));
        }
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

fn parse_year(value: Option<&str>) -> Option<i32> {
    value.and_then(|s| s.trim().parse::<i32>().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BIBLIOGRAPHY, MANUSCRIPT, OCCURRENCE, PERSON};

    fn sanitize(table: &'static FieldClassificationTable, query: &str) -> SearchRequest {
        FilterSanitizer::new(table, SanitizerLimits::default()).sanitize_query(query, true)
    }

    #[test]
    fn test_pagination_defaults() {
        let request = sanitize(&MANUSCRIPT, "limit=abc&page=");
        assert_eq!(request.limit, 25);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_pagination_is_clamped() {
        let request = sanitize(&MANUSCRIPT, "limit=0&page=-3");
        assert_eq!(request.limit, 1);
        assert_eq!(request.page, 1);

        let request = sanitize(&MANUSCRIPT, "limit=100000&page=4");
        assert_eq!(request.limit, DEFAULT_MAX_LIMIT);
        assert_eq!(request.page, 4);
    }

    #[test]
    fn test_unknown_order_falls_back_to_default() {
        let request = sanitize(&MANUSCRIPT, "orderBy=shoe_size");
        assert_eq!(request.order_by, vec!["name.keyword"]);
        assert_eq!(request.sort_key.as_deref(), Some("name"));

        let request = sanitize(&BIBLIOGRAPHY, "");
        assert_eq!(request.order_by, vec!["title.keyword"]);
        assert!(request.ascending);
    }

    #[test]
    fn test_ascending_only_false_for_zero() {
        assert!(sanitize(&OCCURRENCE, "orderBy=id&ascending=no").ascending);
        assert!(!sanitize(&OCCURRENCE, "orderBy=id&ascending=0").ascending);
    }

    #[test]
    fn test_date_sort_expansion() {
        let asc = sanitize(&MANUSCRIPT, "orderBy=date&ascending=1");
        assert_eq!(asc.order_by, vec!["date_floor_year", "date_ceiling_year"]);

        let desc = sanitize(&MANUSCRIPT, "orderBy=date&ascending=0");
        assert_eq!(desc.order_by, vec!["date_ceiling_year", "date_floor_year"]);
    }

    #[test]
    fn test_text_filter_suppresses_default_order() {
        let request = sanitize(&OCCURRENCE, "filters[text]=abc");
        assert!(request.order_by.is_empty());
        assert!(request.uses_relevance_order());

        let request = sanitize(&OCCURRENCE, "orderBy=date&filters[text]=abc");
        assert!(!request.order_by.is_empty());

        let request = sanitize(&MANUSCRIPT, "filters[comment]=abc");
        assert!(request.order_by.is_empty());

        let request = sanitize(&PERSON, "filters[name]=Manuel");
        assert!(request.order_by.is_empty());
    }

    #[test]
    fn test_filter_classification() {
        let request = sanitize(
            &MANUSCRIPT,
            "filters[city]=3&filters[shelf]=%20gr.%2012%20&filters[date][from]=1100\
             &filters[date][to]=1200&filters[public]=0&filters[bogus]=1&filters[diktyon]=123",
        );
        let filters = &request.filters;
        assert_eq!(filters["city"], FilterValue::Nested(vec![3]));
        assert_eq!(filters["shelf"], FilterValue::Text("gr. 12".into()));
        assert_eq!(
            filters["date"],
            FilterValue::Range(YearRange::new(Some(1100), Some(1200)))
        );
        assert_eq!(filters["public"], FilterValue::Flag(false));
        assert_eq!(filters["diktyon"], FilterValue::Exact("123".into()));
        assert!(!filters.contains_key("bogus"));
    }

    #[test]
    fn test_non_numeric_values_dropped() {
        let request = sanitize(
            &MANUSCRIPT,
            "filters[city]=paris&filters[library][]=1&filters[library][]=x&filters[diktyon]=abc",
        );
        assert!(!request.filters.contains_key("city"));
        assert!(!request.filters.contains_key("diktyon"));
        assert_eq!(request.filters["library"], FilterValue::Nested(vec![1]));
    }

    #[test]
    fn test_malformed_filters_are_empty() {
        let request = sanitize(&MANUSCRIPT, "filters=abc&limit=5");
        assert!(request.filters.is_empty());
        assert_eq!(request.limit, 5);
    }

    #[test]
    fn test_text_type_coercion() {
        let request = sanitize(&OCCURRENCE, "filters[text]=abc&filters[text_type]=fuzzy");
        assert_eq!(request.filters["text_type"], FilterValue::Exact("any".into()));

        let request = sanitize(&OCCURRENCE, "filters[text]=abc&filters[text_type]=phrase");
        assert_eq!(
            request.filters["text_type"],
            FilterValue::Exact("phrase".into())
        );

        let request = sanitize(&OCCURRENCE, "filters[text_type]=all");
        assert!(!request.filters.contains_key("text_type"));
    }

    #[test]
    fn test_date_search_type() {
        let request = sanitize(&MANUSCRIPT, "filters[date][from]=1000");
        assert_eq!(
            request.filters["date_search_type"],
            FilterValue::Exact("overlap".into())
        );

        let request = sanitize(
            &MANUSCRIPT,
            "filters[date][to]=1300&filters[date_search_type]=included",
        );
        assert_eq!(
            request.filters["date_search_type"],
            FilterValue::Exact("included".into())
        );

        let request = sanitize(&MANUSCRIPT, "filters[date_search_type]=exact");
        assert!(!request.filters.contains_key("date_search_type"));
    }

    #[test]
    fn test_year_aliases_form_range() {
        let request = sanitize(&OCCURRENCE, "filters[year_from]=1050&filters[year_to]=1150");
        assert_eq!(
            request.filters["date"],
            FilterValue::Range(YearRange::new(Some(1050), Some(1150)))
        );

        let request = sanitize(&BIBLIOGRAPHY, "filters[year_from]=1050");
        assert!(!request.filters.contains_key("date"));
    }

    #[test]
    fn test_operator_needs_two_ids() {
        let request = sanitize(&OCCURRENCE, "filters[genre][]=1&filters[genre_op]=and");
        assert!(!request.filters.contains_key("genre_op"));

        let request = sanitize(
            &OCCURRENCE,
            "filters[genre][]=1&filters[genre][]=2&filters[genre_op]=and",
        );
        assert_eq!(request.filters["genre_op"], FilterValue::Exact("and".into()));

        let request = sanitize(&OCCURRENCE, "filters[genre][]=1&filters[genre][]=2");
        assert_eq!(request.filters["genre_op"], FilterValue::Exact("or".into()));
    }

    #[test]
    fn test_unprivileged_request() {
        let sanitizer = FilterSanitizer::for_entity(EntityKind::Occurrence);
        let request = sanitizer.sanitize_query(
            "filters[comment]=draft%20note&filters[text_status]=1",
            false,
        );
        assert_eq!(
            request.filters["public_comment"],
            FilterValue::Text("draft note".into())
        );
        assert!(!request.filters.contains_key("comment"));
        assert!(!request.filters.contains_key("text_status"));
        assert_eq!(request.filters["public"], FilterValue::Flag(true));
    }
}
