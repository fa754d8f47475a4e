//! The binding table: one entry per struct field, in declaration order.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::{FieldValue, Value, ValueError, ValueKind};

/// Writes a converted value into one concrete field of `T`.
pub type Setter<T> = fn(&mut T, Value<'_>) -> std::result::Result<(), ValueError>;

/// A struct whose fields can be bound from command-line tokens.
///
/// Usually derived:
///
/// ```
/// use flagbind::Args;
///
/// #[derive(Default, Args)]
/// struct Config {
///     #[args("alias=a,argument=all,description=All values")]
///     all: bool,
///     #[args("argument=port,description=Port number")]
///     port: u16,
/// }
///
/// let mut config = Config::default();
/// flagbind::load_args(&mut config, &["prog", "-a", "--port", "8080"]).unwrap();
/// assert!(config.all);
/// assert_eq!(config.port, 8080);
/// ```
///
/// Only structs with named fields qualify:
///
/// ```compile_fail
/// #[derive(flagbind::Args)]
/// enum Mode {
///     Fast,
///     Slow,
/// }
/// ```
pub trait Args: Sized {
    /// Every field of the struct, annotated or not, in declaration order.
    fn fields() -> Vec<FieldDef<Self>>;
}

/// One field of a binding table.
pub struct FieldDef<T> {
    name: Cow<'static, str>,
    annotation: Option<Cow<'static, str>>,
    type_name: Cow<'static, str>,
    kind: ValueKind,
    setter: Option<Setter<T>>,
}

impl<T> FieldDef<T> {
    /// An annotated field of a supported type `V`.
    pub fn bind<V: FieldValue>(
        name: impl Into<Cow<'static, str>>,
        annotation: impl Into<Cow<'static, str>>,
        setter: Setter<T>,
    ) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            type_name: Cow::Borrowed(std::any::type_name::<V>()),
            kind: V::KIND,
            setter: Some(setter),
        }
    }

    /// An annotated field whose type cannot be bound.
    ///
    /// It still shows up in the schema and in help output; matching it while
    /// binding fails with [`Error::UnsupportedFieldType`].
    pub fn unsupported(
        name: impl Into<Cow<'static, str>>,
        annotation: impl Into<Cow<'static, str>>,
        type_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            type_name: type_name.into(),
            kind: ValueKind::Other,
            setter: None,
        }
    }

    /// A field without annotation. It takes part in shape validation only.
    pub fn skipped(
        name: impl Into<Cow<'static, str>>,
        type_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            type_name: type_name.into(),
            kind: ValueKind::Other,
            setter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The setter, or `UnsupportedFieldType` when the field has none.
    pub(crate) fn setter(&self) -> Result<Setter<T>> {
        self.setter.ok_or_else(|| Error::UnsupportedFieldType {
            field: self.name.to_string(),
            type_name: self.type_name.to_string(),
        })
    }
}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("annotation", &self.annotation)
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("bindable", &self.setter.is_some())
            .finish()
    }
}

impl<T> Clone for FieldDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            annotation: self.annotation.clone(),
            type_name: self.type_name.clone(),
            kind: self.kind,
            setter: self.setter,
        }
    }
}
