//! # Coder Classes
//!
//! Class descriptors and the factory that defines them.
//!
//! A [`CoderClass`] permanently associates a name and a base class with one
//! native codec function. Instantiating it yields a [`Coder`] with the
//! function bound to the slot matching the class role. Classes live in a
//! [`Namespace`], so type-specific modules add coders by calling
//! [`define_coder`] without touching the framework.
//!
//! # Examples
//!
//! ```
//! use pg_coder::coder::{BaseClass, CodecFn, DecodeContext, Namespace, define_coder};
//! use pg_coder::domain::errors::CoderResult;
//! use pg_coder::domain::value_objects::{Format, Value};
//!
//! fn decode_flag(_ctx: &DecodeContext<'_>, data: &[u8]) -> CoderResult<Value> {
//!     Ok(Value::Bool(data == b"t"))
//! }
//!
//! let mut decoders = Namespace::with_format("TextDecoder", Format::Text);
//! let flag = CodecFn::Decode(decode_flag);
//! let class = define_coder("Flag", flag, BaseClass::SimpleDecoder, &mut decoders).unwrap();
//! assert_eq!(class.qualified_name(), "TextDecoder::Flag");
//!
//! let coder = class.instantiate().unwrap();
//! assert_eq!(coder.decode(b"t").unwrap(), Value::Bool(true));
//! ```

use super::coder::Coder;
use super::traits::{DecodeFn, EncodeFn};
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::Format;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// Base classes and roles
// ============================================================================

/// Whether a coder encodes or decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Native value to wire bytes.
    Encoder,
    /// Wire bytes to native value.
    Decoder,
}

/// The built-in coder class hierarchy.
///
/// `Coder`, `SimpleCoder` and `CompositeCoder` are abstract; the other four
/// combine a kind (simple/composite) with a role (encoder/decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseClass {
    /// Root of the hierarchy.
    Coder,
    /// Abstract leaf coder.
    SimpleCoder,
    /// Abstract container coder.
    CompositeCoder,
    /// Leaf encoder.
    SimpleEncoder,
    /// Leaf decoder.
    SimpleDecoder,
    /// Container encoder.
    CompositeEncoder,
    /// Container decoder.
    CompositeDecoder,
}

impl BaseClass {
    /// Returns the class name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coder => "Coder",
            Self::SimpleCoder => "SimpleCoder",
            Self::CompositeCoder => "CompositeCoder",
            Self::SimpleEncoder => "SimpleEncoder",
            Self::SimpleDecoder => "SimpleDecoder",
            Self::CompositeEncoder => "CompositeEncoder",
            Self::CompositeDecoder => "CompositeDecoder",
        }
    }

    /// Returns the role, or `None` for abstract classes.
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::SimpleEncoder | Self::CompositeEncoder => Some(Role::Encoder),
            Self::SimpleDecoder | Self::CompositeDecoder => Some(Role::Decoder),
            Self::Coder | Self::SimpleCoder | Self::CompositeCoder => None,
        }
    }

    /// Returns true if the class cannot be instantiated.
    #[inline]
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        self.role().is_none()
    }

    /// Returns true for container classes.
    #[inline]
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::CompositeCoder | Self::CompositeEncoder | Self::CompositeDecoder
        )
    }
}

impl fmt::Display for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Codec functions
// ============================================================================

/// A native codec function of either role.
#[derive(Clone, Copy)]
pub enum CodecFn {
    /// Encode function.
    Encode(EncodeFn),
    /// Decode function.
    Decode(DecodeFn),
}

impl CodecFn {
    /// Returns the role the function serves.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Encode(_) => Role::Encoder,
            Self::Decode(_) => Role::Decoder,
        }
    }

    /// Returns `"encode"` or `"decode"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Encode(_) => "encode",
            Self::Decode(_) => "decode",
        }
    }
}

impl fmt::Debug for CodecFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodecFn::{}", self.kind())
    }
}

// ============================================================================
// Class descriptor
// ============================================================================

/// A defined coder class: name, base class and bound function.
#[derive(Debug, Clone)]
pub struct CoderClass {
    name: String,
    namespace: String,
    format: Option<Format>,
    base: BaseClass,
    function: CodecFn,
}

impl CoderClass {
    /// Returns the unqualified class name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the defining namespace.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns `namespace::name`, or the bare name at the root namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// Returns the base class.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> BaseClass {
        self.base
    }

    /// Returns the bound function.
    #[inline]
    #[must_use]
    pub const fn function(&self) -> CodecFn {
        self.function
    }

    /// Returns the format fixed by the defining namespace, if any.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        self.format
    }

    /// Creates a coder of this class with its function bound.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::AbstractClass` if the base class is abstract.
    pub fn instantiate(&self) -> CoderResult<Coder> {
        let mut coder = Coder::with_class_name(self.base, Arc::from(self.qualified_name()))?;
        if let Some(format) = self.format {
            coder.set_format(format);
        }
        coder.bind(self.function)?;
        Ok(coder)
    }
}

// ============================================================================
// Namespace
// ============================================================================

/// A named group of coder classes.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    path: String,
    format: Option<Format>,
    classes: BTreeMap<String, Arc<CoderClass>>,
}

impl Namespace {
    /// Creates an empty namespace; its coders take the type map default format.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: None,
            classes: BTreeMap::new(),
        }
    }

    /// Creates an empty namespace whose coders speak `format`.
    #[must_use]
    pub fn with_format(path: impl Into<String>, format: Format) -> Self {
        Self {
            format: Some(format),
            ..Self::new(path)
        }
    }

    /// Returns the namespace path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the format fixed for this namespace, if any.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        self.format
    }

    /// Defines class `name` bound to `function`.
    ///
    /// Defining an existing name again with the same base replaces the
    /// class. Classes with an abstract base can be defined but not
    /// instantiated.
    ///
    /// # Errors
    ///
    /// - `CoderError::RoleMismatch` if `function` does not fit the role of `base`
    /// - `CoderError::ClassRedefined` if `name` exists with another base
    pub fn define(
        &mut self,
        name: &str,
        function: CodecFn,
        base: BaseClass,
    ) -> CoderResult<Arc<CoderClass>> {
        let class = CoderClass {
            name: name.to_string(),
            namespace: self.path.clone(),
            format: self.format,
            base,
            function,
        };

        if let Some(role) = base.role()
            && role != function.role()
        {
            return Err(CoderError::RoleMismatch {
                class: class.qualified_name(),
                base: base.name(),
                function: function.kind(),
            });
        }

        if let Some(existing) = self.classes.get(name)
            && existing.base != base
        {
            return Err(CoderError::ClassRedefined {
                class: existing.qualified_name(),
                existing: existing.base.name(),
            });
        }

        let class = Arc::new(class);
        let qualified = class.qualified_name();
        if self
            .classes
            .insert(name.to_string(), Arc::clone(&class))
            .is_some()
        {
            warn!(class = %qualified, "coder class redefined, replacing bound function");
        } else {
            debug!(
                class = %qualified,
                base = %base,
                function = function.kind(),
                "coder class defined"
            );
        }
        Ok(class)
    }

    /// Returns the class named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<CoderClass>> {
        self.classes.get(name).cloned()
    }

    /// Instantiates the class named `name`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidArgument` if no such class is defined,
    /// otherwise the errors of [`CoderClass::instantiate`].
    pub fn instantiate(&self, name: &str) -> CoderResult<Coder> {
        self.classes
            .get(name)
            .ok_or_else(|| {
                CoderError::InvalidArgument(format!("undefined coder class {}::{name}", self.path))
            })?
            .instantiate()
    }

    /// Iterates over the classes in name order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<CoderClass>> {
        self.classes.values()
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no class is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Defines class `name` in `namespace`, bound to `function`.
///
/// # Errors
///
/// See [`Namespace::define`].
pub fn define_coder(
    name: &str,
    function: CodecFn,
    base: BaseClass,
    namespace: &mut Namespace,
) -> CoderResult<Arc<CoderClass>> {
    namespace.define(name, function, base)
}
