use std::io;

use thiserror::Error;

use crate::metadata::MetadataError;
use crate::value::ValueError;

/// Errors raised while extracting a schema, binding tokens or rendering help.
#[derive(Debug, Error)]
pub enum Error {
    /// The binding table does not describe a struct with uniquely named fields.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("malformed metadata on field `{field}`: {source}")]
    MalformedMetadata {
        field: String,
        #[source]
        source: MetadataError,
    },

    #[error("unsupported type `{type_name}` for field `{field}`")]
    UnsupportedFieldType { field: String, type_name: String },

    /// A token that is neither `--name` nor `-alias`.
    #[error("unrecognized token `{0}`")]
    UnrecognizedToken(String),

    /// A matched descriptor points at a field the binding table does not have.
    #[error("field `{0}` not found in binding table")]
    FieldNotFound(String),

    #[error("flag `{0}` expects a value but none was given")]
    MissingValue(String),

    #[error("unknown flag `{0}`")]
    UnknownFlag(String),

    #[error("invalid value `{value}` for flag `{flag}`: {source}")]
    InvalidValue {
        flag: String,
        value: String,
        #[source]
        source: ValueError,
    },

    #[error("flag `{flag}` is declared by both `{first}` and `{second}`")]
    DuplicateFlag {
        flag: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
