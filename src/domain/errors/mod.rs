//! # Domain Errors
//!
//! Typed error types for coder operations.
//!
//! Error codes are organized by category:
//! - 1000-1999: Construction errors
//! - 2000-2999: Binding errors
//! - 3000-3999: Argument errors
//! - 4000-4999: Type errors
//! - 5000-5999: Codec errors
//!
//! # Examples
//!
//! ```
//! use pg_coder::domain::errors::{CoderError, CoderResult};
//!
//! fn checked_delimiter(bytes: &[u8]) -> CoderResult<u8> {
//!     match bytes {
//!         [byte] => Ok(*byte),
//!         other => Err(CoderError::InvalidDelimiter(other.len())),
//!     }
//! }
//!
//! assert!(checked_delimiter(b";").is_ok());
//! assert!(checked_delimiter(b"").is_err());
//! ```

pub mod coder_error;

pub use coder_error::{CoderError, CoderResult};
