//! # Value Objects
//!
//! Small immutable types shared by the coder framework.
//!
//! ## Identity Types
//!
//! - [`Oid`]: database type identifier assigned by the type registry
//! - [`CoderId`]: stable handle of a coder inside a type map
//!
//! ## Wire Metadata
//!
//! - [`Format`]: text or binary transmission format
//! - [`Delimiter`]: one-byte element separator of composite coders
//! - [`TextEncoding`]: declared encoding of decode input
//! - [`CellPosition`]: tuple/field hints of a decoded cell
//!
//! ## Values
//!
//! - [`Value`]: native value accepted by encoders and returned by decoders

pub mod delimiter;
pub mod format;
pub mod ids;
pub mod position;
pub mod text_encoding;
pub mod value;


pub use delimiter::Delimiter;
pub use format::Format;
pub use ids::{CoderId, Oid};
pub use position::CellPosition;
pub use text_encoding::TextEncoding;
pub use value::Value;
