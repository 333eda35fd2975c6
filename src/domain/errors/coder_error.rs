//! # Coder Errors
//!
//! Typed error definitions for coder construction, binding and use.
//!
//! This module provides the [`CoderError`] enum with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Construction errors
//! - **2000-2999**: Binding errors
//! - **3000-3999**: Argument errors
//! - **4000-4999**: Type errors
//! - **5000-5999**: Codec errors (reported by codec functions)
//!
//! # Examples
//!
//! ```
//! use pg_coder::domain::errors::CoderError;
//!
//! let error = CoderError::ArgumentCount { given: 2 };
//! assert_eq!(error.code(), 3001);
//! assert_eq!(error.category(), "argument");
//! ```

use crate::domain::value_objects::{CellPosition, CoderId};
use thiserror::Error;

/// Coder-level error with numeric error codes.
///
/// The fatal length violation of the two-phase encode protocol is not a
/// variant here: it aborts the operation instead of being returned.
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Construction errors |
/// | 2000-2999 | Binding errors |
/// | 3000-3999 | Argument errors |
/// | 4000-4999 | Type errors |
/// | 5000-5999 | Codec errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoderError {
    // ========================================================================
    // Construction Errors (1000-1999)
    // ========================================================================
    /// An abstract coder class was instantiated.
    #[error("{0} cannot be instantiated directly")]
    AbstractClass(String),

    /// The codec function does not fit the role of the base class.
    #[error("cannot bind {function} function to {base} class {class}")]
    RoleMismatch {
        /// Name of the class being defined.
        class: String,
        /// Name of the base class.
        base: &'static str,
        /// Kind of function supplied.
        function: &'static str,
    },

    /// A class name is already taken by a class with another base.
    #[error("{class} is already defined with base {existing}")]
    ClassRedefined {
        /// Qualified class name.
        class: String,
        /// Base class of the existing definition.
        existing: &'static str,
    },

    // ========================================================================
    // Binding Errors (2000-2999)
    // ========================================================================
    /// No encode function is bound and no fallback applies.
    #[error("no encoder function defined for {0}")]
    NoEncoder(String),

    /// No decode function is bound and no fallback applies.
    #[error("no decoder function defined for {0}")]
    NoDecoder(String),

    /// A coder handle does not resolve in the type map.
    #[error("unknown coder {0}")]
    UnknownCoder(CoderId),

    // ========================================================================
    // Argument Errors (3000-3999)
    // ========================================================================
    /// Positional decode called with an unsupported number of arguments.
    #[error("wrong number of arguments ({given} for 1 or 3)")]
    ArgumentCount {
        /// Number of arguments supplied.
        given: usize,
    },

    /// Delimiter is not exactly one byte.
    #[error("delimiter size must be one byte, got {0} bytes")]
    InvalidDelimiter(usize),

    /// An argument value is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dynamic attribute access with an unknown attribute name.
    #[error("unknown attribute '{attribute}' for {class}")]
    UnknownAttribute {
        /// Attribute name.
        attribute: String,
        /// Class name of the coder.
        class: String,
    },

    // ========================================================================
    // Type Errors (4000-4999)
    // ========================================================================
    /// Elements type assigned a value that is neither a coder nor absent.
    #[error("wrong elements type {0} (expected some kind of Coder)")]
    WrongElementsType(&'static str),

    /// Argument of the wrong type.
    #[error("wrong argument type {found} (expected {expected})")]
    WrongArgumentType {
        /// Expected type name.
        expected: &'static str,
        /// Supplied type name.
        found: &'static str,
    },

    /// Composite-only operation called on a simple coder.
    #[error("{0} is not a composite coder")]
    NotComposite(String),

    // ========================================================================
    // Codec Errors (5000-5999)
    // ========================================================================
    /// Wire data could not be decoded.
    #[error("invalid input for {coder} at {position}: {message}")]
    InvalidInput {
        /// Coder that rejected the input.
        coder: String,
        /// Cell position of the offending value.
        position: CellPosition,
        /// Reason.
        message: String,
    },

    /// Native value is not supported by the codec function.
    #[error("{coder} cannot encode a value of type {found}")]
    UnsupportedValue {
        /// Coder that rejected the value.
        coder: String,
        /// Type name of the value.
        found: &'static str,
    },

    /// Input bytes are invalid in the declared text encoding.
    #[error("invalid {encoding} byte sequence at {position}")]
    InvalidEncoding {
        /// Declared encoding name.
        encoding: &'static str,
        /// Cell position of the offending value.
        position: CellPosition,
    },
}

impl CoderError {
    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use pg_coder::domain::errors::CoderError;
    ///
    /// assert_eq!(CoderError::AbstractClass("Coder".to_string()).code(), 1001);
    /// assert_eq!(CoderError::WrongElementsType("integer").code(), 4001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Construction errors (1000-1999)
            Self::AbstractClass(_) => 1001,
            Self::RoleMismatch { .. } => 1002,
            Self::ClassRedefined { .. } => 1003,

            // Binding errors (2000-2999)
            Self::NoEncoder(_) => 2001,
            Self::NoDecoder(_) => 2002,
            Self::UnknownCoder(_) => 2003,

            // Argument errors (3000-3999)
            Self::ArgumentCount { .. } => 3001,
            Self::InvalidDelimiter(_) => 3002,
            Self::InvalidArgument(_) => 3003,
            Self::UnknownAttribute { .. } => 3004,

            // Type errors (4000-4999)
            Self::WrongElementsType(_) => 4001,
            Self::WrongArgumentType { .. } => 4002,
            Self::NotComposite(_) => 4003,

            // Codec errors (5000-5999)
            Self::InvalidInput { .. } => 5001,
            Self::UnsupportedValue { .. } => 5002,
            Self::InvalidEncoding { .. } => 5003,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "construction",
            2000..=2999 => "binding",
            3000..=3999 => "argument",
            4000..=4999 => "type",
            5000..=5999 => "codec",
            _ => "unknown",
        }
    }

    /// Returns true if this is a binding error.
    #[inline]
    #[must_use]
    pub const fn is_binding_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an argument error.
    #[inline]
    #[must_use]
    pub const fn is_argument_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }

    /// Returns true if this is a type error.
    #[inline]
    #[must_use]
    pub const fn is_type_error(&self) -> bool {
        matches!(self.code(), 4000..=4999)
    }
}

/// Result type for coder operations.
pub type CoderResult<T> = Result<T, CoderError>;
