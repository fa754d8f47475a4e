use serde::{Deserialize, Serialize};

/// What the binder does with a flag that matches no descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFlags {
    /// Step over the token and keep going.
    #[default]
    Skip,
    /// Fail with [`Error::UnknownFlag`](crate::Error::UnknownFlag).
    Reject,
}

/// What the binder does with a value that cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidValues {
    /// Leave the field untouched and keep going.
    #[default]
    Ignore,
    /// Fail with [`Error::InvalidValue`](crate::Error::InvalidValue).
    Reject,
}

/// What happens when two fields claim the same alias or long name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collisions {
    /// The field declared first answers the flag.
    #[default]
    FirstWins,
    /// Building the binder fails with [`Error::DuplicateFlag`](crate::Error::DuplicateFlag).
    Reject,
}

/// Binder policies. The defaults are the permissive ones.
///
/// Deserializes from kebab-case keys, every key optional:
///
/// ```json
/// { "unknown-flags": "reject", "invalid-values": "reject", "collisions": "first-wins" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BindOptions {
    pub unknown_flags: UnknownFlags,
    pub invalid_values: InvalidValues,
    pub collisions: Collisions,
}

impl BindOptions {
    /// Every policy set to fail.
    pub fn strict() -> Self {
        Self {
            unknown_flags: UnknownFlags::Reject,
            invalid_values: InvalidValues::Reject,
            collisions: Collisions::Reject,
        }
    }
}
