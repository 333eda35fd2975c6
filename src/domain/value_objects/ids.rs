//! # Identity Value Objects
//!
//! Type-safe identity wrappers for coder handles and database type
//! identifiers.
//!
//! - [`CoderId`] - Handle of a coder inside a [`TypeMap`](crate::coder::TypeMap)
//! - [`Oid`] - Database type identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a coder owned by a type map.
///
/// Composite coders store a `CoderId` rather than a reference to their
/// element coder. The handle is only meaningful for the type map that
/// issued it.
///
/// # Examples
///
/// ```
/// use pg_coder::domain::value_objects::ids::CoderId;
///
/// let id = CoderId::new(3);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.to_string(), "#3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoderId(usize);

impl CoderId {
    /// Creates a handle from an arena index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CoderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Database type identifier.
///
/// Opaque to the coder framework: it is stored and compared, never
/// validated. A freshly constructed coder carries [`Oid::UNSET`].
///
/// # Examples
///
/// ```
/// use pg_coder::domain::value_objects::ids::Oid;
///
/// let oid = Oid::new(23);
/// assert_eq!(oid.get(), 23);
/// assert!(Oid::UNSET.is_unset());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Oid(u32);

impl Oid {
    /// Identifier of a coder that has not been assigned a type.
    pub const UNSET: Self = Self(0);

    /// Creates an OID from its numeric value.
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true if no type has been assigned.
    #[inline]
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Oid {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Oid> for u32 {
    #[inline]
    fn from(oid: Oid) -> Self {
        oid.0
    }
}
