//! # Dynamic Attributes
//!
//! Name-based attribute access for hosts that configure coders from
//! untyped values, such as a type registry reading catalog rows.
//!
//! The typed setters on [`Coder`] cover the same ground; this surface adds
//! the runtime checks an untyped caller needs:
//!
//! | Attribute | Accepts | Rejects with |
//! |-----------|---------|--------------|
//! | `oid` | integer in u32 range | `InvalidArgument`, `WrongArgumentType` |
//! | `format` | integer 0 or 1 | `InvalidArgument`, `WrongArgumentType` |
//! | `name` | text or nil | `WrongArgumentType` |
//! | `elements_type` | coder handle or nil | `WrongElementsType` |
//! | `delimiter` | one-byte text or bytes | `InvalidDelimiter`, `WrongArgumentType` |
//! | `needs_quotation` | anything (nil and false are false) | never |
//!
//! The last three exist only on composite coders.

use super::coder::Coder;
use crate::domain::errors::{CoderError, CoderResult};
use crate::domain::value_objects::CoderId;

/// Untyped attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Absent value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Character string.
    Text(String),
    /// Handle of a coder.
    Coder(CoderId),
}

impl AttrValue {
    /// Returns the type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Coder(_) => "coder",
        }
    }

    /// Returns false for `Nil` and `Bool(false)`, true otherwise.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    fn wrong_type(&self, expected: &'static str) -> CoderError {
        CoderError::WrongArgumentType {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<CoderId> for AttrValue {
    fn from(id: CoderId) -> Self {
        Self::Coder(id)
    }
}

impl From<Option<CoderId>> for AttrValue {
    fn from(id: Option<CoderId>) -> Self {
        id.map_or(Self::Nil, Self::Coder)
    }
}

impl Coder {
    /// Sets attribute `name` from an untyped value.
    ///
    /// # Errors
    ///
    /// See the module table. Unknown names, and composite attributes on a
    /// simple coder, fail with `CoderError::UnknownAttribute`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pg_coder::coder::{AttrValue, BaseClass, Coder};
    /// use pg_coder::domain::errors::CoderError;
    ///
    /// let mut array = Coder::new(BaseClass::CompositeEncoder).unwrap();
    /// let err = array.set_attribute("elements_type", AttrValue::Int(5)).unwrap_err();
    /// assert_eq!(err, CoderError::WrongElementsType("integer"));
    ///
    /// array.set_attribute("needs_quotation", AttrValue::Nil).unwrap();
    /// assert_eq!(array.attribute("needs_quotation").unwrap(), AttrValue::Bool(false));
    /// ```
    pub fn set_attribute(&mut self, name: &str, value: AttrValue) -> CoderResult<()> {
        match name {
            "oid" => {
                let AttrValue::Int(raw) = value else {
                    return Err(value.wrong_type("integer"));
                };
                let oid = u32::try_from(raw)
                    .map_err(|_| CoderError::InvalidArgument(format!("oid {raw} out of range")))?;
                self.set_oid(oid);
                Ok(())
            }
            "format" => match value {
                AttrValue::Int(code) => self.set_format_code(code),
                other => Err(other.wrong_type("integer")),
            },
            "name" => match value {
                AttrValue::Nil => {
                    self.set_name(None);
                    Ok(())
                }
                AttrValue::Text(text) => {
                    self.set_name(Some(text));
                    Ok(())
                }
                other => Err(other.wrong_type("text or nil")),
            },
            _ if !self.is_composite() => Err(self.unknown_attribute(name)),
            "elements_type" => match value {
                AttrValue::Nil => self.set_elements_type(None),
                AttrValue::Coder(id) => self.set_elements_type(Some(id)),
                other => Err(CoderError::WrongElementsType(other.type_name())),
            },
            "delimiter" => match value {
                AttrValue::Text(text) => self.set_delimiter(text.as_bytes()),
                AttrValue::Bytes(bytes) => self.set_delimiter(&bytes),
                other => Err(other.wrong_type("text or bytes")),
            },
            "needs_quotation" => self.set_needs_quotation(value.is_truthy()),
            _ => Err(self.unknown_attribute(name)),
        }
    }

    /// Returns attribute `name` as an untyped value.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::UnknownAttribute` for unknown names and for
    /// composite attributes on a simple coder.
    pub fn attribute(&self, name: &str) -> CoderResult<AttrValue> {
        let composite = self.composite();
        match (name, composite) {
            ("oid", _) => Ok(AttrValue::Int(i64::from(self.oid().get()))),
            ("format", _) => Ok(AttrValue::Int(i64::from(self.format().code()))),
            ("name", _) => Ok(self
                .name()
                .map_or(AttrValue::Nil, |n| AttrValue::Text(n.to_string()))),
            ("elements_type", Some(params)) => Ok(params.elements_type().into()),
            ("delimiter", Some(params)) => {
                let bytes = params.delimiter().to_bytes();
                Ok(AttrValue::Bytes(bytes.to_vec()))
            }
            ("needs_quotation", Some(params)) => Ok(AttrValue::Bool(params.needs_quotation())),
            _ => Err(self.unknown_attribute(name)),
        }
    }

    fn unknown_attribute(&self, name: &str) -> CoderError {
        CoderError::UnknownAttribute {
            attribute: name.to_string(),
            class: self.class_name().to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coder::BaseClass;
    use crate::domain::value_objects::{Format, Oid};

    fn composite() -> Coder {
        Coder::new(BaseClass::CompositeEncoder).unwrap()
    }

    mod elements_type {
        use super::*;

        #[test]
        fn rejects_non_coder_naming_type() {
            let mut coder = composite();
            for (value, type_name) in [
                (AttrValue::Int(1), "integer"),
                (AttrValue::Text("x".into()), "text"),
                (AttrValue::Bool(true), "bool"),
            ] {
                assert_eq!(
                    coder.set_attribute("elements_type", value),
                    Err(CoderError::WrongElementsType(type_name))
                );
            }
        }

        #[test]
        fn nil_clears() {
            let mut coder = composite();
            coder
                .set_attribute("elements_type", CoderId::new(3).into())
                .unwrap();
            assert_eq!(
                coder.attribute("elements_type").unwrap(),
                AttrValue::Coder(CoderId::new(3))
            );
            coder
                .set_attribute("elements_type", AttrValue::Nil)
                .unwrap();
            assert_eq!(coder.attribute("elements_type").unwrap(), AttrValue::Nil);
            assert_eq!(coder.elements_type(), None);
        }
    }

    mod scalars {
        use super::*;

        #[test]
        fn oid_range_checked() {
            let mut coder = composite();
            coder.set_attribute("oid", AttrValue::Int(1007)).unwrap();
            assert_eq!(coder.oid(), Oid::new(1007));
            assert!(matches!(
                coder.set_attribute("oid", AttrValue::Int(-1)),
                Err(CoderError::InvalidArgument(_))
            ));
            assert!(matches!(
                coder.set_attribute("oid", AttrValue::Text("23".into())),
                Err(CoderError::WrongArgumentType { .. })
            ));
        }

        #[test]
        fn format_by_code() {
            let mut coder = composite();
            coder.set_attribute("format", AttrValue::Int(1)).unwrap();
            assert_eq!(coder.format(), Format::Binary);
            assert_eq!(coder.attribute("format").unwrap(), AttrValue::Int(1));
            assert!(coder.set_attribute("format", AttrValue::Int(3)).is_err());
        }

        #[test]
        fn name_text_or_nil() {
            let mut coder = composite();
            coder
                .set_attribute("name", AttrValue::Text("_int4".into()))
                .unwrap();
            assert_eq!(coder.name(), Some("_int4"));
            coder.set_attribute("name", AttrValue::Nil).unwrap();
            assert_eq!(coder.attribute("name").unwrap(), AttrValue::Nil);
        }

        #[test]
        fn quotation_truthiness() {
            let mut coder = composite();
            coder
                .set_attribute("needs_quotation", AttrValue::Bool(false))
                .unwrap();
            assert_eq!(coder.needs_quotation(), Some(false));
            coder
                .set_attribute("needs_quotation", AttrValue::Int(0))
                .unwrap();
            assert_eq!(coder.needs_quotation(), Some(true));
        }

        #[test]
        fn delimiter_one_byte() {
            let mut coder = composite();
            coder
                .set_attribute("delimiter", AttrValue::Text(";".into()))
                .unwrap();
            assert_eq!(
                coder.attribute("delimiter").unwrap(),
                AttrValue::Bytes(vec![b';'])
            );
            assert_eq!(
                coder.set_attribute("delimiter", AttrValue::Text(String::new())),
                Err(CoderError::InvalidDelimiter(0))
            );
            assert_eq!(
                coder.set_attribute("delimiter", AttrValue::Text("é".into())),
                Err(CoderError::InvalidDelimiter(2))
            );
        }
    }

    mod unknown {
        use super::*;

        #[test]
        fn unknown_name() {
            let mut coder = composite();
            assert!(matches!(
                coder.set_attribute("precision", AttrValue::Int(1)),
                Err(CoderError::UnknownAttribute { .. })
            ));
        }

        #[test]
        fn composite_attributes_absent_on_simple_coder() {
            let mut coder = Coder::new(BaseClass::SimpleDecoder).unwrap();
            assert!(matches!(
                coder.attribute("delimiter"),
                Err(CoderError::UnknownAttribute { .. })
            ));
            assert!(matches!(
                coder.set_attribute("needs_quotation", AttrValue::Bool(true)),
                Err(CoderError::UnknownAttribute { .. })
            ));
        }
    }
}
