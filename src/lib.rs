//! # pg-coder
//!
//! Composable type coders translating native values to and from the text
//! and binary wire representations of PostgreSQL.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain`): errors and value objects shared by every coder
//! - **Coder Framework** (`coder`): coders, codec function contracts, class
//!   factory, element fallback and the type map arena
//! - **Reference Codecs** (`codecs`): a minimal set of codec functions
//!   exercising the framework
//! - **Ambient** (`config`, `telemetry`): configuration loading and tracing setup
//!
//! ## Example
//!
//! ```rust
//! use pg_coder::codecs;
//! use pg_coder::coder::TypeMap;
//! use pg_coder::domain::value_objects::{Oid, Value};
//!
//! let encoders = codecs::text_encoders()?;
//! let decoders = codecs::text_decoders()?;
//!
//! let mut map = TypeMap::new();
//! let int_enc = map.insert_class(&encoders.get("Integer").unwrap(), Oid::new(23))?;
//! let int_dec = map.insert_class(&decoders.get("Integer").unwrap(), Oid::new(23))?;
//! let array_enc = map.insert_class(&encoders.get("Array").unwrap(), Oid::new(1007))?;
//! let array_dec = map.insert_class(&decoders.get("Array").unwrap(), Oid::new(1007))?;
//! map.set_elements_type(array_enc, Some(int_enc))?;
//! map.set_elements_type(array_dec, Some(int_dec))?;
//!
//! let value: Value = [1i64, 2, 3].into_iter().collect();
//! let wire = map.encode(array_enc, &value)?;
//! assert_eq!(wire, b"{1,2,3}");
//! assert_eq!(map.decode(array_dec, &wire)?, value);
//! # Ok::<(), pg_coder::domain::errors::CoderError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codecs;
pub mod coder;
pub mod config;
pub mod domain;
pub mod telemetry;
