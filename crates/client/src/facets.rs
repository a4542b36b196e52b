//! Facet field state.
//!
//! Every time an aggregation arrives the controller walks the form in
//! display order and moves each field into one of its states:
//!
//! - a field whose dependency has no value is disabled and cleared;
//! - a faceted field without candidates is disabled, and cleared unless the
//!   controller serves a search page;
//! - otherwise the field is enabled and its selection is pruned to the
//!   candidates that still exist.
//!
//! AND/OR switches are enabled only while the multi-select they combine has
//! two or more selected values.

use std::collections::BTreeMap;

use dbbe_search::types::AggregationResult;

use crate::model::{FieldValue, Item, SearchModel};
use crate::schema::{FieldDescriptor, FieldKind, SearchSchema};

/// Why a field cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// The field it depends on has no value.
    AwaitingDependency,
    /// The aggregation offered no candidates.
    NoValues,
    /// The multi-select a switch combines has fewer than two values.
    MultiDependency,
}

/// State of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Waiting for the next aggregation.
    Loading,
    /// Usable.
    Enabled,
    /// Not usable.
    Disabled(DisabledReason),
}

impl FieldState {
    /// Returns true for disabled fields.
    pub fn is_disabled(&self) -> bool {
        matches!(self, FieldState::Disabled(_))
    }
}

/// A field together with its current state and candidates.
#[derive(Debug, Clone)]
pub struct FacetField {
    /// Schema entry of the field.
    pub descriptor: &'static FieldDescriptor,
    /// Current state.
    pub state: FieldState,
    /// Candidates from the last aggregation.
    pub options: Vec<Item>,
    /// Text shown in the empty input.
    pub placeholder: String,
}

impl FacetField {
    fn new(descriptor: &'static FieldDescriptor) -> Self {
        let state = match descriptor.kind {
            FieldKind::Nested { .. } => FieldState::Loading,
            FieldKind::Toggle { .. } => FieldState::Disabled(DisabledReason::MultiDependency),
            _ => FieldState::Enabled,
        };
        Self {
            descriptor,
            state,
            options: Vec::new(),
            placeholder: String::new(),
        }
    }
}

/// Drives the state of every field of one search form.
#[derive(Debug)]
pub struct FacetFieldController {
    schema: &'static SearchSchema,
    search: bool,
    fields: BTreeMap<&'static str, FacetField>,
}

impl FacetFieldController {
    /// Creates a controller for `schema`.
    ///
    /// With `search` set, a selection with no remaining candidates is kept
    /// so a filter restored from the URL stays visible.
    pub fn new(schema: &'static SearchSchema, search: bool) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|descriptor| (descriptor.key, FacetField::new(descriptor)))
            .collect();
        Self {
            schema,
            search,
            fields,
        }
    }

    /// Returns the schema this controller drives.
    pub fn schema(&self) -> &'static SearchSchema {
        self.schema
    }

    /// Returns a field.
    pub fn field(&self, key: &str) -> Option<&FacetField> {
        self.fields.get(key)
    }

    /// Returns the state of a field; unknown fields count as disabled.
    pub fn state(&self, key: &str) -> FieldState {
        self.fields
            .get(key)
            .map(|field| field.state)
            .unwrap_or(FieldState::Disabled(DisabledReason::NoValues))
    }

    /// Applies a new aggregation, updating states and pruning `model`.
    pub fn apply_aggregation(&mut self, aggregation: &AggregationResult, model: &mut SearchModel) {
        for descriptor in self.schema.fields {
            match descriptor.kind {
                FieldKind::Nested { .. } => {
                    let candidates = aggregation
                        .get(descriptor.key)
                        .map(|buckets| buckets.iter().map(Item::from).collect())
                        .unwrap_or_default();
                    self.update_faceted(descriptor, candidates, model);
                }
                FieldKind::Toggle { multi_dependency } => {
                    self.update_toggle(descriptor, multi_dependency, model);
                }
                _ => {
                    if let Some(dependency) = unmet_dependency(descriptor, model) {
                        self.disable_awaiting(descriptor, dependency, model);
                    }
                }
            }
        }
        tracing::debug!(
            entity = %self.schema.entity,
            disabled = self.fields.values().filter(|f| f.state.is_disabled()).count(),
            "Applied aggregation"
        );
    }

    /// Updates dependants of `key` after its value changed.
    ///
    /// Dependants go back to loading until the next aggregation, or are
    /// disabled and cleared at once when `key` was cleared. Switches
    /// combining `key` follow its selection size.
    pub fn on_field_changed(&mut self, key: &str, model: &mut SearchModel) {
        let cleared = !model.has_value(key);
        let dependants: Vec<&'static FieldDescriptor> = self.schema.dependants(key).collect();
        for descriptor in dependants {
            if cleared {
                self.disable_awaiting(descriptor, key, model);
                self.on_field_changed(descriptor.key, model);
            } else if let Some(field) = self.fields.get_mut(descriptor.key) {
                field.state = FieldState::Loading;
            }
        }
        let toggles: Vec<&'static FieldDescriptor> = self.schema.toggles_of(key).collect();
        for descriptor in toggles {
            self.update_toggle(descriptor, key, model);
        }
    }

    fn update_faceted(
        &mut self,
        descriptor: &'static FieldDescriptor,
        candidates: Vec<Item>,
        model: &mut SearchModel,
    ) {
        if let Some(dependency) = unmet_dependency(descriptor, model) {
            self.disable_awaiting(descriptor, dependency, model);
            return;
        }

        let search = self.search;
        let Some(field) = self.fields.get_mut(descriptor.key) else {
            return;
        };
        if candidates.is_empty() {
            if !search {
                model.clear(descriptor.key);
            }
            field.state = FieldState::Disabled(DisabledReason::NoValues);
            field.options.clear();
            field.placeholder = format!("No {} available", plural(descriptor.label));
            return;
        }

        let pruned = match model.get(descriptor.key) {
            FieldValue::Items(selected) => FieldValue::Items(
                selected
                    .iter()
                    .filter(|item| candidates.iter().any(|c| c.id == item.id))
                    .cloned()
                    .collect(),
            ),
            FieldValue::Item(selected) if !candidates.iter().any(|c| c.id == selected.id) => {
                FieldValue::Empty
            }
            other => other.clone(),
        };
        if pruned.is_empty() {
            model.clear(descriptor.key);
        } else {
            model.set(descriptor.key, pruned);
        }
        field.state = FieldState::Enabled;
        field.options = candidates;
        field.placeholder = select_placeholder(descriptor);
    }

    fn update_toggle(
        &mut self,
        descriptor: &'static FieldDescriptor,
        multi_dependency: &str,
        model: &SearchModel,
    ) {
        if let Some(field) = self.fields.get_mut(descriptor.key) {
            field.state = if model.get(multi_dependency).selection_len() >= 2 {
                FieldState::Enabled
            } else {
                FieldState::Disabled(DisabledReason::MultiDependency)
            };
        }
    }

    fn disable_awaiting(
        &mut self,
        descriptor: &'static FieldDescriptor,
        dependency: &str,
        model: &mut SearchModel,
    ) {
        model.clear(descriptor.key);
        let dependency_label = self
            .schema
            .field(dependency)
            .map(|field| field.label)
            .unwrap_or(dependency);
        if let Some(field) = self.fields.get_mut(descriptor.key) {
            field.state = FieldState::Disabled(DisabledReason::AwaitingDependency);
            field.options.clear();
            field.placeholder = format!(
                "Please select a {} first",
                dependency_label.to_lowercase()
            );
        }
    }
}

fn unmet_dependency(descriptor: &FieldDescriptor, model: &SearchModel) -> Option<&'static str> {
    descriptor
        .dependency
        .filter(|dependency| !model.has_value(dependency))
}

const AN_LABELS: &[&str] = &[
    "article",
    "office",
    "online source",
    "origin",
    "editorial status",
    "id",
];

/// Placeholder of an enabled field.
pub fn select_placeholder(descriptor: &FieldDescriptor) -> String {
    if descriptor.key == "diktyon" {
        return "Select a Diktyon number".to_string();
    }
    let label = descriptor.label.to_lowercase();
    if label == "acknowledgements" {
        format!("Select {}", label)
    } else if AN_LABELS.contains(&label.as_str()) {
        format!("Select an {}", label)
    } else {
        format!("Select a {}", label)
    }
}

fn plural(label: &str) -> String {
    let label = label.to_lowercase();
    if label.ends_with('s') {
        label
    } else {
        format!("{}s", label)
    }
}
