//! Form validation and year cross-bounding.

use thiserror::Error;

use crate::model::SearchModel;
use crate::schema::{FieldKind, RangeBound, SearchSchema};

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A year input that does not parse as a number.
    #[error("{key} is not a number")]
    YearNotANumber {
        /// Offending field.
        key: &'static str,
    },

    /// A year outside its current bounds.
    #[error("{key} must be between {min} and {max}")]
    OutOfRange {
        /// Offending field.
        key: &'static str,
        /// Lowest accepted value.
        min: i32,
        /// Highest accepted value.
        max: i32,
    },
}

impl FieldError {
    /// Returns the offending field key.
    pub fn key(&self) -> &'static str {
        match self {
            FieldError::YearNotANumber { key } | FieldError::OutOfRange { key, .. } => key,
        }
    }
}

/// Accepted ranges of the two year inputs.
///
/// Each bound follows the other input so the range can never be inverted:
/// `year_to` may not go below `year_from` and `year_from` may not go above
/// `year_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    /// Lowest accepted `year_from`.
    pub from_min: i32,
    /// Highest accepted `year_from`.
    pub from_max: i32,
    /// Lowest accepted `year_to`.
    pub to_min: i32,
    /// Highest accepted `year_to`.
    pub to_max: i32,
}

impl YearBounds {
    /// Computes the bounds from the current inputs.
    pub fn compute(from: Option<i32>, to: Option<i32>, min: i32, max: i32) -> Self {
        Self {
            from_min: min,
            from_max: to.map_or(max, |to| to.clamp(min, max)),
            to_min: from.map_or(min, |from| from.clamp(min, max)),
            to_max: max,
        }
    }

    fn of(&self, bound: RangeBound) -> (i32, i32) {
        match bound {
            RangeBound::From => (self.from_min, self.from_max),
            RangeBound::To => (self.to_min, self.to_max),
        }
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Year bounds after this pass.
    pub bounds: YearBounds,
    /// Failed fields, in schema order.
    pub errors: Vec<FieldError>,
}

impl Validation {
    /// Returns true when every field passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Year fields that failed to parse.
    pub fn unparsable_years(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().filter_map(|error| match error {
            FieldError::YearNotANumber { key } => Some(*key),
            FieldError::OutOfRange { .. } => None,
        })
    }
}

/// Validates the year inputs of `model`.
pub fn validate(schema: &SearchSchema, model: &SearchModel, min: i32, max: i32) -> Validation {
    let mut errors = Vec::new();
    let mut years = [None, None];
    for field in schema.fields {
        let FieldKind::Year(bound) = field.kind else {
            continue;
        };
        match model.get(field.key).year() {
            Ok(year) => years[bound as usize] = year.map(|y| (field.key, y)),
            Err(()) => errors.push(FieldError::YearNotANumber { key: field.key }),
        }
    }

    let [from, to] = years;
    let bounds = YearBounds::compute(from.map(|(_, y)| y), to.map(|(_, y)| y), min, max);
    for (bound, year) in [(RangeBound::From, from), (RangeBound::To, to)] {
        let Some((key, year)) = year else {
            continue;
        };
        let (lo, hi) = bounds.of(bound);
        if year < lo || year > hi {
            errors.push(FieldError::OutOfRange {
                key,
                min: lo,
                max: hi,
            });
        }
    }

    Validation { bounds, errors }
}
