//! # Domain Layer
//!
//! Types shared by every coder:
//! - **Errors**: [`CoderError`](errors::CoderError) with numeric codes
//! - **Value Objects**: OIDs, formats, delimiters, positions and native values

pub mod errors;
pub mod value_objects;
