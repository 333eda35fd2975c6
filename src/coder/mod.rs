//! # Coder Framework
//!
//! Composable encoders and decoders between native [`Value`]s and wire
//! bytes.
//!
//! ## Components
//!
//! - [`Coder`]: metadata plus one bound codec function, simple or composite
//! - [`EncodeFn`] / [`DecodeFn`]: native codec function signatures
//! - [`CoderClass`] / [`Namespace`]: class descriptors created by [`define_coder`]
//! - [`ElementEncoder`] / [`ElementDecoder`]: element fallback resolution
//! - [`TypeMap`]: arena owning coders and resolving element handles
//!
//! [`Value`]: crate::domain::value_objects::Value

pub mod attribute;
pub mod class;
#[allow(clippy::module_inception)]
pub mod coder;
pub mod composite;
pub mod fallback;
pub mod traits;
pub mod type_map;

#[cfg(test)]
mod proptest_roundtrip;

pub use attribute::AttrValue;
pub use class::{BaseClass, CodecFn, CoderClass, Namespace, Role, define_coder};
pub use coder::{Coder, CoderKind, DecodeArgs, HostEncodeFn};
pub use composite::CompositeParams;
pub use fallback::{ElementDecoder, ElementEncoder, FallbackKind};
pub use traits::{DecodeContext, DecodeFn, EncodeContext, EncodeFn, EncodeStep, WriteFn};
pub use type_map::{CoderLookup, Detached, TypeMap};
