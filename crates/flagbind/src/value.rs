//! Value kinds and the conversion from bound values into concrete field types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// What a flag carries, derived from the declared type of its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ValueKind {
    /// Presence flag, never consumes a value token.
    Bool,
    /// Base-10 signed integer taken from the next token.
    Int,
    /// Next token, verbatim.
    String,
    /// Declared type cannot be bound. Matching it is an error.
    Other,
}

impl ValueKind {
    /// Whether a flag of this kind consumes the following token.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Bool)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A converted value on its way into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Bool(bool),
    Int(i64),
    String(&'a str),
}

impl Value<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::String(_) => ValueKind::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("`{0}` is not a base-10 integer")]
    NotAnInteger(String),

    #[error("{value} does not fit in `{type_name}`")]
    OutOfRange {
        value: i64,
        type_name: &'static str,
    },

    #[error("expected a {expected} value, got {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },
}

/// A field type the binder can write into.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be bound from command-line flags",
    note = "supported field types are `bool`, primitive integers and `String`"
)]
pub trait FieldValue {
    const KIND: ValueKind;

    fn store(&mut self, value: Value<'_>) -> Result<(), ValueError>;
}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn store(&mut self, value: Value<'_>) -> Result<(), ValueError> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(ValueError::KindMismatch {
                expected: Self::KIND,
                found: other.kind(),
            }),
        }
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn store(&mut self, value: Value<'_>) -> Result<(), ValueError> {
        match value {
            Value::String(s) => {
                s.clone_into(self);
                Ok(())
            }
            other => Err(ValueError::KindMismatch {
                expected: Self::KIND,
                found: other.kind(),
            }),
        }
    }
}

macro_rules! impl_int_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: ValueKind = ValueKind::Int;

                fn store(&mut self, value: Value<'_>) -> Result<(), ValueError> {
                    match value {
                        Value::Int(n) => {
                            *self = <$ty>::try_from(n).map_err(|_| ValueError::OutOfRange {
                                value: n,
                                type_name: stringify!($ty),
                            })?;
                            Ok(())
                        }
                        other => Err(ValueError::KindMismatch {
                            expected: Self::KIND,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_int_field!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Parse a base-10 signed integer the way flag values are read.
pub(crate) fn parse_int(raw: &str) -> Result<i64, ValueError> {
    raw.parse::<i64>()
        .map_err(|_| ValueError::NotAnInteger(raw.to_string()))
}
