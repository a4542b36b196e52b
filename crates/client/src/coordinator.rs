//! Query lifecycle.
//!
//! [`QueryLifecycleCoordinator`] turns form edits into search queries. It
//! owns the form model, the facet states, the sort state and the last
//! dispatched query, and tells its driver what to do next through
//! [`Action`]s. It never touches the network or a clock itself: the
//! driver (see [`crate::session`]) sleeps for [`Action::Schedule`] and
//! hands queries to the dispatcher.
//!
//! ```text
//! field input ─▶ Validating ─┬─ invalid ─▶ Idle (pending debounce cancelled)
//!                            └─ valid ───▶ Debouncing ─▶ Dispatching ─▶ Idle
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dbbe_search::types::{ParamValue, SearchResponse};

use crate::config::ClientConfig;
use crate::facets::FacetFieldController;
use crate::model::{FieldValue, SearchModel, SearchQuery};
use crate::schema::{FieldDescriptor, FieldKind, RangeBound, SearchSchema};
use crate::validation::{self, FieldError, YearBounds};

/// Where the coordinator is in the lifecycle of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Checking the form after an edit.
    Validating,
    /// Waiting for the debounce delay to pass.
    Debouncing,
    /// A query is in flight.
    Dispatching,
    /// Nothing to do.
    Idle,
}

/// What the driver must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing.
    None,
    /// Drop any pending debounce deadline.
    CancelPending,
    /// (Re)arm the debounce deadline; call
    /// [`QueryLifecycleCoordinator::on_debounce_elapsed`] when it passes.
    Schedule {
        /// Time to wait.
        delay: Duration,
    },
    /// Send this query now.
    Dispatch(SearchQuery),
}

/// Told whether the form holds edits that have not produced a result yet.
///
/// Registered once when the page starts, in place of a global unload hook.
pub trait NavigationGuard: Send + Sync {
    /// Called whenever the dirty state changes.
    fn set_dirty(&self, dirty: bool);
}

/// Sort, page and filters restored from a URL or history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredState {
    /// Form values.
    pub model: SearchModel,
    /// Page to show.
    pub page: usize,
    /// Sort to use; `None` lets relevance decide.
    pub order_by: Option<String>,
    /// Sort direction.
    pub ascending: bool,
}

/// Drives one search form from edits to queries.
pub struct QueryLifecycleCoordinator {
    schema: &'static SearchSchema,
    config: ClientConfig,
    model: SearchModel,
    facets: FacetFieldController,
    phase: Phase,
    page: usize,
    order_by: Option<String>,
    ascending: bool,
    /// Sort in effect before a free-text value took ordering over.
    saved_sort: Option<(Option<String>, bool)>,
    /// Set when the user picked a sort while text was present.
    sort_over_text: bool,
    pending: Option<SearchQuery>,
    last_dispatched: Option<String>,
    /// Query behind the data on screen.
    last_applied: Option<String>,
    history_reload: bool,
    bounds: YearBounds,
    errors: Vec<FieldError>,
    dirty: bool,
    guard: Option<Arc<dyn NavigationGuard>>,
}

impl fmt::Debug for QueryLifecycleCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLifecycleCoordinator")
            .field("entity", &self.schema.entity)
            .field("phase", &self.phase)
            .field("page", &self.page)
            .field("order_by", &self.order_by)
            .field("history_reload", &self.history_reload)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl QueryLifecycleCoordinator {
    /// Creates a coordinator for `schema` with the entity's default sort.
    pub fn new(schema: &'static SearchSchema, config: ClientConfig) -> Self {
        let facets = FacetFieldController::new(schema, config.search_page);
        let bounds = YearBounds::compute(None, None, config.year_min, config.year_max);
        Self {
            schema,
            facets,
            phase: Phase::Idle,
            page: 1,
            order_by: Some(schema.default_order().to_string()),
            ascending: true,
            saved_sort: None,
            sort_over_text: false,
            pending: None,
            last_dispatched: None,
            last_applied: None,
            history_reload: false,
            bounds,
            errors: Vec::new(),
            dirty: false,
            guard: None,
            model: SearchModel::new(),
            config,
        }
    }

    /// Registers the navigation guard.
    pub fn with_navigation_guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Returns the schema.
    pub fn schema(&self) -> &'static SearchSchema {
        self.schema
    }

    /// Returns the form model.
    pub fn model(&self) -> &SearchModel {
        &self.model
    }

    /// Returns the facet states.
    pub fn facets(&self) -> &FacetFieldController {
        &self.facets
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the sort in effect; `None` while relevance orders results.
    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// Returns the sort direction.
    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Returns the year bounds of the last validation pass.
    pub fn year_bounds(&self) -> YearBounds {
        self.bounds
    }

    /// Returns the errors of the last validation pass.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true while a history-driven reload is running.
    pub fn is_reloading_history(&self) -> bool {
        self.history_reload
    }

    /// Returns true while the form holds edits without a result.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Installs the data embedded in the page as the current result.
    ///
    /// The query that produced it counts as dispatched, so repeating it
    /// does not reach the network.
    pub fn load_initial(&mut self, initial: &SearchResponse) {
        self.facets
            .apply_aggregation(&initial.aggregation, &mut self.model);
        let serialized = self.current_query().to_query_string();
        self.last_applied = Some(serialized.clone());
        self.last_dispatched = Some(serialized);
        self.phase = Phase::Idle;
    }

    /// Handles an edit of one field.
    pub fn on_field_input(&mut self, key: &str, value: FieldValue) -> Action {
        let Some(descriptor) = self.schema.field(key) else {
            tracing::warn!(entity = %self.schema.entity, key, "Ignoring input for unknown field");
            return Action::None;
        };
        self.phase = Phase::Validating;
        self.model.set(descriptor.key, value);
        self.facets.on_field_changed(descriptor.key, &mut self.model);
        self.set_dirty(true);

        if !self.revalidate() {
            tracing::debug!(key, errors = self.errors.len(), "Invalid input, search cancelled");
            self.pending = None;
            self.phase = Phase::Idle;
            return Action::CancelPending;
        }

        if let Some(base) = self.text_mode_base(descriptor) {
            if !self.model.has_value(base) {
                // the mode only matters once there is text to match
                self.phase = if self.pending.is_some() {
                    Phase::Debouncing
                } else {
                    Phase::Idle
                };
                return Action::None;
            }
        }

        if self.schema.suppresses_sort(descriptor.key) {
            self.update_relevance_sort();
        }
        self.page = 1;

        if self.history_reload {
            tracing::debug!(key, "History reload running, input held back");
            self.pending = Some(self.current_query());
            self.phase = Phase::Dispatching;
            return Action::None;
        }

        let query = self.current_query();
        let delay = match descriptor.kind {
            FieldKind::Text => self.config.text_debounce,
            _ => self.config.field_debounce,
        };
        if delay.is_zero() {
            self.pending = None;
            return self.release(query);
        }
        self.pending = Some(query);
        self.phase = Phase::Debouncing;
        Action::Schedule { delay }
    }

    /// Handles the end of the debounce delay.
    ///
    /// While a history reload runs the pending query stays queued; it is
    /// released once the reload settles.
    pub fn on_debounce_elapsed(&mut self) -> Option<SearchQuery> {
        if self.history_reload {
            return None;
        }
        let query = self.pending.take()?;
        Self::dispatched(self.release(query))
    }

    /// Moves to another page of the same result.
    pub fn on_page(&mut self, page: usize) -> Action {
        self.page = page.max(1);
        self.hold_or_release()
    }

    /// Changes the sort.
    ///
    /// A sort picked while text is present stays in effect as the text
    /// changes.
    pub fn on_sort(&mut self, order_by: impl Into<String>, ascending: bool) -> Action {
        self.order_by = Some(order_by.into());
        self.ascending = ascending;
        self.saved_sort = None;
        self.sort_over_text = self.has_text();
        self.hold_or_release()
    }

    /// Applies a result to the form.
    ///
    /// Returns the query for edits made during a history reload, if any.
    pub fn on_response(&mut self, response: &SearchResponse) -> Option<SearchQuery> {
        self.facets
            .apply_aggregation(&response.aggregation, &mut self.model);
        self.last_applied = self.last_dispatched.clone();
        self.finish_dispatch()
    }

    /// Records a dispatch that ended without new data.
    ///
    /// The failed query no longer counts as dispatched, so sending it again
    /// reaches the network. Returns the query for edits made during a
    /// history reload, if any.
    pub fn on_dispatch_failed(&mut self) -> Option<SearchQuery> {
        self.last_dispatched = self.last_applied.clone();
        self.finish_dispatch()
    }

    /// Replaces the form, sort and page without dispatching anything.
    pub fn restore(&mut self, restored: RestoredState) {
        self.model = restored.model;
        self.page = restored.page.max(1);
        self.order_by = restored.order_by;
        self.ascending = restored.ascending;
        self.saved_sort = None;
        self.pending = None;
        self.revalidate();
        self.sort_over_text = self.order_by.is_some() && self.has_text();
        for field in self.schema.fields {
            self.facets.on_field_changed(field.key, &mut self.model);
        }
    }

    /// Replaces the form with a restored state and returns the query that
    /// reloads it. User edits are not dispatched until the reload settles.
    pub fn begin_history_reload(&mut self, restored: RestoredState) -> SearchQuery {
        self.restore(restored);
        self.history_reload = true;

        let query = self.current_query();
        self.last_dispatched = Some(query.to_query_string());
        self.phase = Phase::Dispatching;
        tracing::debug!(entity = %self.schema.entity, "History reload started");
        query
    }

    /// Builds the query for the current form, sort and page.
    ///
    /// Empty values, fields waiting for their dependency, AND/OR switches
    /// without two values to combine and text modes without text are left
    /// out.
    pub fn current_query(&self) -> SearchQuery {
        let mut filters = BTreeMap::new();
        let mut date = BTreeMap::new();
        for field in self.schema.fields {
            let value = self.model.get(field.key);
            if value.is_empty() || !self.is_applicable(field) {
                continue;
            }
            match field.kind {
                FieldKind::Year(bound) => {
                    if let Ok(Some(year)) = value.year() {
                        let side = match bound {
                            RangeBound::From => "from",
                            RangeBound::To => "to",
                        };
                        date.insert(side.to_string(), ParamValue::Scalar(year.to_string()));
                    }
                }
                _ => {
                    if let Some(param) = value.to_param() {
                        filters.insert(field.key.to_string(), param);
                    }
                }
            }
        }
        if !date.is_empty() {
            filters.insert("date".to_string(), ParamValue::Map(date));
        }

        SearchQuery {
            limit: self.config.page_size,
            page: self.page,
            order_by: self.order_by.clone(),
            ascending: self.ascending,
            filters,
        }
    }

    fn is_applicable(&self, field: &FieldDescriptor) -> bool {
        if let Some(dependency) = field.dependency {
            if !self.model.has_value(dependency) {
                return false;
            }
        }
        if let FieldKind::Toggle { multi_dependency } = field.kind {
            if self.model.get(multi_dependency).selection_len() < 2 {
                return false;
            }
        }
        match self.text_mode_base(field) {
            Some(base) => self.model.has_value(base),
            None => true,
        }
    }

    /// For `text_type` and `title_type`, the text field they qualify.
    fn text_mode_base(&self, field: &FieldDescriptor) -> Option<&'static str> {
        let base = field.key.strip_suffix("_type")?;
        self.schema
            .field(base)
            .filter(|base| base.kind == FieldKind::Text)
            .map(|base| base.key)
    }

    /// Validates the form, clearing year inputs that are not numbers and
    /// validating again. Returns whether the form is valid.
    fn revalidate(&mut self) -> bool {
        let (min, max) = (self.config.year_min, self.config.year_max);
        let mut result = validation::validate(self.schema, &self.model, min, max);
        let unparsable: Vec<&'static str> = result.unparsable_years().collect();
        if !unparsable.is_empty() {
            for key in unparsable {
                tracing::debug!(key, "Clearing year that is not a number");
                self.model.clear(key);
            }
            result = validation::validate(self.schema, &self.model, min, max);
        }
        self.bounds = result.bounds;
        self.errors = result.errors;
        self.errors.is_empty()
    }

    fn has_text(&self) -> bool {
        self.schema
            .fields
            .iter()
            .any(|field| self.schema.suppresses_sort(field.key) && self.model.has_value(field.key))
    }

    fn update_relevance_sort(&mut self) {
        if self.has_text() {
            if self.order_by.is_some() && !self.sort_over_text {
                self.saved_sort = Some((self.order_by.take(), self.ascending));
            }
            return;
        }
        self.sort_over_text = false;
        if let Some((order_by, ascending)) = self.saved_sort.take() {
            self.order_by = order_by;
            self.ascending = ascending;
        } else if self.order_by.is_none() {
            self.order_by = Some(self.schema.default_order().to_string());
            self.ascending = true;
        }
    }

    /// Hands `query` out unless it equals the last dispatched one.
    fn release(&mut self, query: SearchQuery) -> Action {
        let serialized = query.to_query_string();
        if self.last_dispatched.as_deref() == Some(serialized.as_str()) {
            tracing::debug!(query = %serialized, "Query unchanged, not dispatched");
            self.phase = Phase::Idle;
            self.set_dirty(false);
            return Action::None;
        }
        tracing::debug!(query = %serialized, "Dispatching query");
        self.last_dispatched = Some(serialized);
        self.phase = Phase::Dispatching;
        Action::Dispatch(query)
    }

    /// Queues the current query during a history reload, releases it
    /// otherwise.
    fn hold_or_release(&mut self) -> Action {
        let query = self.current_query();
        if self.history_reload {
            tracing::debug!(query = %query.to_query_string(), "History reload running, query held back");
            self.pending = Some(query);
            return Action::None;
        }
        self.pending = None;
        self.release(query)
    }

    fn dispatched(action: Action) -> Option<SearchQuery> {
        match action {
            Action::Dispatch(query) => Some(query),
            _ => None,
        }
    }

    fn finish_dispatch(&mut self) -> Option<SearchQuery> {
        let reloaded = std::mem::take(&mut self.history_reload);
        if reloaded && self.pending.take().is_some() {
            tracing::debug!(entity = %self.schema.entity, "History reload settled, releasing held query");
            let query = self.current_query();
            return Self::dispatched(self.release(query));
        }
        if self.pending.is_some() {
            self.phase = Phase::Debouncing;
        } else {
            self.phase = Phase::Idle;
            self.set_dirty(false);
        }
        None
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            if let Some(guard) = &self.guard {
                guard.set_dirty(dirty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::{DisabledReason, FieldState};
    use crate::model::Item;
    use crate::schema::{MANUSCRIPT_SEARCH, OCCURRENCE_SEARCH};
    use std::sync::Mutex;

    fn coordinator(schema: &'static SearchSchema) -> QueryLifecycleCoordinator {
        QueryLifecycleCoordinator::new(schema, ClientConfig::default())
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn test_text_input_is_debounced() {
        let mut c = coordinator(&OCCURRENCE_SEARCH);
        let action = c.on_field_input("text", text("βασ"));
        assert_eq!(
            action,
            Action::Schedule {
                delay: Duration::from_millis(1000)
            }
        );
        assert_eq!(c.phase(), Phase::Debouncing);

        let query = c.on_debounce_elapsed().unwrap();
        assert_eq!(query.filters["text"], ParamValue::Scalar("βασ".into()));
        assert_eq!(c.phase(), Phase::Dispatching);
    }

    #[test]
    fn test_selection_dispatches_immediately() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        let action = c.on_field_input("city", FieldValue::Item(Item::new(10, "Athos")));
        let Action::Dispatch(query) = action else {
            panic!("expected dispatch, got {action:?}");
        };
        assert_eq!(query.filters["city"], ParamValue::Scalar("10".into()));
        assert_eq!(query.page, 1);
        assert_eq!(query.order_by.as_deref(), Some("name"));
    }

    #[test]
    fn test_identical_query_is_suppressed() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        let city = FieldValue::Item(Item::new(10, "Athos"));
        assert!(matches!(
            c.on_field_input("city", city.clone()),
            Action::Dispatch(_)
        ));
        assert_eq!(c.on_field_input("city", city), Action::None);
    }

    #[test]
    fn test_invalid_year_cancels_pending() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        c.on_field_input("year_to", FieldValue::Year(1100));
        c.on_field_input("shelf", text("B 12"));
        assert_eq!(c.phase(), Phase::Debouncing);

        let action = c.on_field_input("year_from", FieldValue::Year(1200));
        assert_eq!(action, Action::CancelPending);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.on_debounce_elapsed().is_none());
    }

    #[test]
    fn test_year_not_a_number_is_cleared() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        let action = c.on_field_input("year_from", text("twelfth"));
        assert!(!c.model().has_value("year_from"));
        assert!(c.errors().is_empty());
        assert!(matches!(action, Action::Dispatch(_)));
    }

    #[test]
    fn test_years_become_date_range() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        c.on_field_input("year_from", FieldValue::Year(1000));
        c.on_field_input("year_to", FieldValue::Year(1100));
        let query = c.current_query();
        let ParamValue::Map(date) = &query.filters["date"] else {
            panic!("date must be a map");
        };
        assert_eq!(date["from"], ParamValue::Scalar("1000".into()));
        assert_eq!(date["to"], ParamValue::Scalar("1100".into()));
        assert_eq!(c.year_bounds().to_min, 1000);
        assert_eq!(c.year_bounds().from_max, 1100);
    }

    #[test]
    fn test_text_suppresses_and_restores_sort() {
        let mut c = coordinator(&OCCURRENCE_SEARCH);
        c.on_sort("date", false);
        c.on_field_input("text", text("βασιλεύς"));
        assert_eq!(c.order_by(), None);

        c.on_field_input("text", text(""));
        assert_eq!(c.order_by(), Some("date"));
        assert!(!c.ascending());
    }

    #[test]
    fn test_text_type_needs_text() {
        let mut c = coordinator(&OCCURRENCE_SEARCH);
        let action = c.on_field_input("text_type", FieldValue::Text("phrase".into()));
        assert_eq!(action, Action::None);
        assert!(!c.current_query().filters.contains_key("text_type"));

        c.on_field_input("text", text("βασιλεύς"));
        c.on_debounce_elapsed();
        let action = c.on_field_input("text_type", FieldValue::Text("all".into()));
        let Action::Dispatch(query) = action else {
            panic!("expected dispatch, got {action:?}");
        };
        assert_eq!(query.filters["text_type"], ParamValue::Scalar("all".into()));
    }

    #[test]
    fn test_unmet_dependency_and_toggle_are_stripped() {
        let mut c = coordinator(&OCCURRENCE_SEARCH);
        c.on_field_input("genre", FieldValue::Items(vec![Item::new(1, "Epigram")]));
        c.on_field_input("genre_op", FieldValue::Text("and".into()));
        assert!(!c.current_query().filters.contains_key("genre_op"));
        assert_eq!(
            c.facets().state("genre_op"),
            FieldState::Disabled(DisabledReason::MultiDependency)
        );

        let mut m = coordinator(&MANUSCRIPT_SEARCH);
        m.on_field_input("library", FieldValue::Item(Item::new(20, "Iviron")));
        assert!(!m.current_query().filters.contains_key("library"));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        c.on_page(3);
        assert_eq!(c.page(), 3);
        c.on_field_input("city", FieldValue::Item(Item::new(10, "Athos")));
        assert_eq!(c.page(), 1);
    }

    fn rome_reload(c: &mut QueryLifecycleCoordinator) -> SearchQuery {
        let mut model = SearchModel::new();
        model.set("city", FieldValue::Item(Item::new(11, "Rome")));
        c.begin_history_reload(RestoredState {
            model,
            page: 2,
            order_by: Some("name".into()),
            ascending: true,
        })
    }

    #[test]
    fn test_history_reload_holds_user_edits() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        let query = rome_reload(&mut c);
        assert_eq!(query.page, 2);

        assert_eq!(c.on_field_input("shelf", text("gr. 1")), Action::None);
        assert!(c.on_debounce_elapsed().is_none());
        assert_eq!(c.on_page(4), Action::None);

        let held = c.on_response(&SearchResponse::default()).unwrap();
        assert!(!c.is_reloading_history());
        assert_eq!(held.filters["shelf"], ParamValue::Scalar("gr. 1".into()));
        assert_eq!(held.filters["city"], ParamValue::Scalar("11".into()));
        assert_eq!(held.page, 4);
        assert_eq!(c.phase(), Phase::Dispatching);

        assert!(c.on_response(&SearchResponse::default()).is_none());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn test_history_reload_without_edits_releases_nothing() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        rome_reload(&mut c);
        assert!(c.on_dispatch_failed().is_none());
        assert!(!c.is_reloading_history());
        assert!(matches!(c.on_page(4), Action::Dispatch(_)));
    }

    #[test]
    fn test_failed_query_can_be_retried() {
        let mut c = coordinator(&MANUSCRIPT_SEARCH);
        let city = FieldValue::Item(Item::new(10, "Athos"));
        assert!(matches!(
            c.on_field_input("city", city.clone()),
            Action::Dispatch(_)
        ));
        assert!(c.on_dispatch_failed().is_none());
        assert!(matches!(c.on_field_input("city", city.clone()), Action::Dispatch(_)));

        c.on_response(&SearchResponse::default());
        assert_eq!(c.on_field_input("city", city), Action::None);
    }

    #[test]
    fn test_sort_picked_during_text_is_kept() {
        let mut c = coordinator(&OCCURRENCE_SEARCH);
        c.on_field_input("text", text("βασ"));
        assert_eq!(c.order_by(), None);

        c.on_sort("date", false);
        c.on_field_input("text", text("βασιλεύς"));
        assert_eq!(c.order_by(), Some("date"));
        assert!(!c.ascending());

        c.on_field_input("text", text(""));
        assert_eq!(c.order_by(), Some("date"));

        // fresh text takes over ordering again
        c.on_field_input("text", text("μέγας"));
        assert_eq!(c.order_by(), None);
    }

    #[derive(Default)]
    struct RecordingGuard(Mutex<Vec<bool>>);

    impl NavigationGuard for RecordingGuard {
        fn set_dirty(&self, dirty: bool) {
            self.0.lock().unwrap().push(dirty);
        }
    }

    #[test]
    fn test_navigation_guard_follows_dirty_state() {
        let guard = Arc::new(RecordingGuard::default());
        let mut c = coordinator(&MANUSCRIPT_SEARCH).with_navigation_guard(guard.clone());
        c.on_field_input("city", FieldValue::Item(Item::new(10, "Athos")));
        assert!(c.is_dirty());
        c.on_response(&SearchResponse::default());
        assert!(!c.is_dirty());
        assert_eq!(*guard.0.lock().unwrap(), vec![true, false]);
    }
}
