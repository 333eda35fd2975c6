//! # Cell Position
//!
//! Row and column hints of a decoded cell, used only for diagnostics.

use std::fmt;

/// Tuple and field index of the cell being decoded.
///
/// Both hints are unknown by default. They have no effect on the decoded
/// value; codec functions include them in error messages.
///
/// # Examples
///
/// ```
/// use pg_coder::domain::value_objects::position::CellPosition;
///
/// assert_eq!(CellPosition::UNKNOWN.to_string(), "unknown position");
/// assert_eq!(CellPosition::new(4, 2).to_string(), "tuple 4, field 2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPosition {
    tuple: Option<i32>,
    field: Option<i32>,
}

impl CellPosition {
    /// Position of a cell whose location is not known.
    pub const UNKNOWN: Self = Self {
        tuple: None,
        field: None,
    };

    /// Creates a known position.
    #[inline]
    #[must_use]
    pub const fn new(tuple: i32, field: i32) -> Self {
        Self {
            tuple: Some(tuple),
            field: Some(field),
        }
    }

    /// Returns the tuple (row) index, if known.
    #[inline]
    #[must_use]
    pub const fn tuple(&self) -> Option<i32> {
        self.tuple
    }

    /// Returns the field (column) index, if known.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> Option<i32> {
        self.field
    }

    /// Returns true if neither hint is known.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.tuple.is_none() && self.field.is_none()
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tuple, self.field) {
            (Some(tuple), Some(field)) => write!(f, "tuple {tuple}, field {field}"),
            _ => write!(f, "unknown position"),
        }
    }
}
