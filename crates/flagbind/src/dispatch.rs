//! Field dispatch used by `#[derive(Args)]`.
//!
//! The derive cannot see whether a field type implements [`FieldValue`], so it
//! calls methods on `&Slot<V>` and lets method resolution decide: the
//! [`Bindable`] impl applies when `V: FieldValue`, otherwise autoref reaches
//! the [`Unbindable`] impl on `&Slot<V>`. Every annotated field compiles, and
//! fields of unsupported types fail when a token matches them.

use std::marker::PhantomData;

use crate::field::{FieldDef, Setter};
use crate::value::{FieldValue, Value, ValueError, ValueKind};

pub struct Slot<V>(PhantomData<V>);

impl<V> Slot<V> {
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

pub trait Bindable<V> {
    fn field_def<T>(
        &self,
        name: &'static str,
        annotation: &'static str,
        type_name: &'static str,
        setter: Setter<T>,
    ) -> FieldDef<T>;

    fn store(&self, slot: &mut V, value: Value<'_>) -> Result<(), ValueError>;
}

impl<V: FieldValue> Bindable<V> for Slot<V> {
    fn field_def<T>(
        &self,
        name: &'static str,
        annotation: &'static str,
        _type_name: &'static str,
        setter: Setter<T>,
    ) -> FieldDef<T> {
        FieldDef::bind::<V>(name, annotation, setter)
    }

    fn store(&self, slot: &mut V, value: Value<'_>) -> Result<(), ValueError> {
        slot.store(value)
    }
}

pub trait Unbindable<V> {
    fn field_def<T>(
        &self,
        name: &'static str,
        annotation: &'static str,
        type_name: &'static str,
        setter: Setter<T>,
    ) -> FieldDef<T>;

    fn store(&self, slot: &mut V, value: Value<'_>) -> Result<(), ValueError>;
}

impl<V> Unbindable<V> for &Slot<V> {
    fn field_def<T>(
        &self,
        name: &'static str,
        annotation: &'static str,
        type_name: &'static str,
        _setter: Setter<T>,
    ) -> FieldDef<T> {
        FieldDef::unsupported(name, annotation, type_name)
    }

    // Unreachable: unsupported fields never hand out their setter.
    fn store(&self, _slot: &mut V, value: Value<'_>) -> Result<(), ValueError> {
        Err(ValueError::KindMismatch {
            expected: ValueKind::Other,
            found: value.kind(),
        })
    }
}
