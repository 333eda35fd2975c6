//! # Type Map
//!
//! Arena owning the coders of a connection.
//!
//! Coders refer to each other through [`CoderId`] handles: a composite
//! coder stores the handle of its element coder, never the coder itself.
//! The [`TypeMap`] owns every coder and resolves handles through the
//! [`CoderLookup`] trait, so an element coder lives exactly as long as the
//! map that holds it.
//!
//! Coders are configured after insertion through [`TypeMap::get_mut`] and
//! treated as read-only once encode/decode traffic starts. Shared reads of a
//! map are safe from any number of threads.
//!
//! # Examples
//!
//! ```
//! use pg_coder::coder::TypeMap;
//! use pg_coder::codecs;
//! use pg_coder::domain::value_objects::{Oid, Value};
//!
//! let encoders = codecs::text_encoders().unwrap();
//! let mut map = TypeMap::new();
//! let int4 = map.insert_class(&encoders.get("Integer").unwrap(), Oid::new(23)).unwrap();
//! let int4_array = map.insert_class(&encoders.get("Array").unwrap(), Oid::new(1007)).unwrap();
//! map.set_elements_type(int4_array, Some(int4)).unwrap();
//!
//! let value: Value = [1i64, 2, 3].into_iter().collect();
//! assert_eq!(map.encode(int4_array, &value).unwrap(), b"{1,2,3}");
//! ```

use super::class::{CoderClass, Role};
use super::coder::{Coder, DecodeArgs};
use crate::config::CoderDefaults;
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::{CoderId, Format, Oid, Value};
use tracing::debug;

/// Resolves coder handles.
pub trait CoderLookup {
    /// Returns the coder behind `id`, if it exists.
    fn coder(&self, id: CoderId) -> Option<&Coder>;
}

/// Lookup that resolves no handle.
///
/// Used when a coder runs outside a type map. Composite coders whose element
/// handle cannot be resolved fail with `CoderError::UnknownCoder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl CoderLookup for Detached {
    fn coder(&self, _id: CoderId) -> Option<&Coder> {
        None
    }
}

/// Arena of coders addressed by [`CoderId`].
#[derive(Debug, Default)]
pub struct TypeMap {
    coders: Vec<Coder>,
    defaults: CoderDefaults,
}

impl TypeMap {
    /// Creates an empty map with default coder settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map applying `defaults` to coders created by
    /// [`TypeMap::insert_class`].
    #[must_use]
    pub fn with_defaults(defaults: CoderDefaults) -> Self {
        Self {
            coders: Vec::new(),
            defaults,
        }
    }

    /// Returns the defaults applied to instantiated classes.
    #[inline]
    #[must_use]
    pub const fn defaults(&self) -> &CoderDefaults {
        &self.defaults
    }

    /// Takes ownership of `coder` and returns its handle.
    pub fn insert(&mut self, coder: Coder) -> CoderId {
        let id = CoderId::new(self.coders.len());
        debug!(
            id = %id,
            coder = %coder.display_name(),
            oid = %coder.oid(),
            format = %coder.format(),
            "coder registered"
        );
        self.coders.push(coder);
        id
    }

    /// Instantiates `class` with `oid` and registers the coder.
    ///
    /// The format is the one fixed by the class namespace, else the
    /// configured default. Composite coders get the configured delimiter and
    /// quotation policy.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`CoderClass::instantiate`].
    pub fn insert_class(&mut self, class: &CoderClass, oid: Oid) -> CoderResult<CoderId> {
        let mut coder = class.instantiate()?;
        coder.set_oid(oid);
        coder.set_format(class.format().unwrap_or(self.defaults.format));
        coder.apply_defaults(&self.defaults);
        Ok(self.insert(coder))
    }

    /// Returns the coder behind `id`.
    #[must_use]
    pub fn get(&self, id: CoderId) -> Option<&Coder> {
        self.coders.get(id.index())
    }

    /// Returns the coder behind `id` for configuration.
    #[must_use]
    pub fn get_mut(&mut self, id: CoderId) -> Option<&mut Coder> {
        self.coders.get_mut(id.index())
    }

    /// Returns the coder behind `id`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownCoder` if the handle is not in this map.
    pub fn require(&self, id: CoderId) -> CoderResult<&Coder> {
        self.get(id).ok_or(CoderError::UnknownCoder(id))
    }

    /// Sets or clears the element coder of composite coder `composite`.
    ///
    /// # Errors
    ///
    /// - `CoderError::UnknownCoder` if either handle is not in this map
    /// - `CoderError::NotComposite` if `composite` is a simple coder
    pub fn set_elements_type(
        &mut self,
        composite: CoderId,
        element: Option<CoderId>,
    ) -> CoderResult<()> {
        if let Some(element) = element {
            self.require(element)?;
        }
        self.get_mut(composite)
            .ok_or(CoderError::UnknownCoder(composite))?
            .set_elements_type(element)
    }

    /// Returns the most recently registered coder for `oid`, `format` and
    /// `role`.
    #[must_use]
    pub fn coder_for(&self, oid: Oid, format: Format, role: Role) -> Option<CoderId> {
        self.coders
            .iter()
            .rposition(|c| c.oid() == oid && c.format() == format && c.role() == role)
            .map(CoderId::new)
    }

    /// Encodes `value` with coder `id`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownCoder` for an unknown handle, otherwise
    /// the errors of [`Coder::encode_in`].
    ///
    /// # Panics
    ///
    /// Panics if a native encode function writes more bytes than it
    /// requested.
    pub fn encode(&self, id: CoderId, value: &Value) -> CoderResult<Vec<u8>> {
        self.require(id)?.encode_in(value, self)
    }

    /// Decodes `data` with coder `id`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownCoder` for an unknown handle, otherwise
    /// the errors of [`Coder::decode_args`].
    pub fn decode(&self, id: CoderId, data: &[u8]) -> CoderResult<Value> {
        self.decode_args(id, &DecodeArgs::new(data))
    }

    /// Decodes with explicit arguments using coder `id`.
    ///
    /// # Errors
    ///
    /// Same as [`TypeMap::decode`].
    pub fn decode_args(&self, id: CoderId, args: &DecodeArgs<'_>) -> CoderResult<Value> {
        self.require(id)?.decode_args(args, self)
    }

    /// Returns the number of coders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coders.len()
    }

    /// Returns true if the map holds no coder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coders.is_empty()
    }

    /// Iterates over the coders with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (CoderId, &Coder)> {
        self.coders
            .iter()
            .enumerate()
            .map(|(i, coder)| (CoderId::new(i), coder))
    }
}

impl CoderLookup for TypeMap {
    fn coder(&self, id: CoderId) -> Option<&Coder> {
        self.get(id)
    }
}
