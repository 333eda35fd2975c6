//! # Composite Parameters
//!
//! Structural metadata carried by composite coders: the element coder
//! handle, the element delimiter and the quotation policy.
//!
//! The container algorithm itself (array or record syntax) is a codec
//! function; it reads these parameters through
//! [`EncodeContext::composite`](super::EncodeContext::composite) and
//! [`DecodeContext::composite`](super::DecodeContext::composite).

use crate::config::CoderDefaults;
use crate::domain::value_objects::{CoderId, Delimiter};

/// Parameters of a composite coder.
///
/// # Examples
///
/// ```
/// use pg_coder::coder::CompositeParams;
///
/// let params = CompositeParams::default();
/// assert_eq!(params.delimiter().as_byte(), b',');
/// assert!(params.needs_quotation());
/// assert!(params.elements_type().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeParams {
    elements_type: Option<CoderId>,
    delimiter: Delimiter,
    needs_quotation: bool,
}

impl CompositeParams {
    /// Creates parameters with no element coder.
    #[must_use]
    pub const fn new(delimiter: Delimiter, needs_quotation: bool) -> Self {
        Self {
            elements_type: None,
            delimiter,
            needs_quotation,
        }
    }

    /// Creates parameters from configured defaults.
    #[must_use]
    pub const fn from_defaults(defaults: &CoderDefaults) -> Self {
        Self::new(defaults.delimiter, defaults.needs_quotation)
    }

    /// Returns the element coder handle, if any.
    #[inline]
    #[must_use]
    pub const fn elements_type(&self) -> Option<CoderId> {
        self.elements_type
    }

    /// Returns the element delimiter.
    #[inline]
    #[must_use]
    pub const fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Returns whether elements are quoted when needed.
    #[inline]
    #[must_use]
    pub const fn needs_quotation(&self) -> bool {
        self.needs_quotation
    }

    pub(crate) fn set_elements_type(&mut self, elements_type: Option<CoderId>) {
        self.elements_type = elements_type;
    }

    pub(crate) fn set_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter = delimiter;
    }

    pub(crate) fn set_needs_quotation(&mut self, needs_quotation: bool) {
        self.needs_quotation = needs_quotation;
    }
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self::new(Delimiter::DEFAULT, true)
    }
}
