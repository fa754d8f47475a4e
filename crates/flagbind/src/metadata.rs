//! Parser for the field annotation language.
//!
//! An annotation is a comma separated list of `key=value` pairs:
//!
//! ```text
//! alias=a,argument=all,description=All values
//! ```
//!
//! Recognized keys are `alias`, `argument` (the long flag name) and
//! `description`. Anything else is ignored. A pair is split on its first `=`;
//! plain values cannot contain `,`. A value may instead be written in double
//! quotes, in which case `,` and `=` are literal and `\"`/`\\` are escapes:
//!
//! ```text
//! argument=host,description="Host name, or IP address"
//! ```

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("pair `{0}` has no `=` separator")]
    MissingSeparator(String),

    #[error("unterminated quoted value in `{0}`")]
    UnterminatedQuote(String),

    #[error("unexpected characters after quoted value in `{0}`")]
    TrailingCharacters(String),
}

/// The recognized keys of one annotation. Missing keys are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub alias: String,
    pub long_name: String,
    pub description: String,
}

/// Parse one raw annotation string.
pub fn parse(raw: &str) -> Result<Metadata, MetadataError> {
    let mut meta = Metadata::default();

    for pair in split_pairs(raw)? {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(MetadataError::MissingSeparator(pair.to_string()));
        };
        let value = unquote(pair, value)?;
        match key.trim() {
            "alias" => meta.alias = value,
            "argument" => meta.long_name = value,
            "description" => meta.description = value,
            other => tracing::debug!(key = other, "ignoring unrecognized metadata key"),
        }
    }

    Ok(meta)
}

/// Split on `,`, skipping over a quoted value that directly follows a pair's
/// first `=`.
fn split_pairs(raw: &str) -> Result<Vec<&str>, MetadataError> {
    let bytes = raw.as_bytes();
    let mut pairs = Vec::new();
    let mut start = 0;
    let mut seen_eq = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b',' => {
                pairs.push(&raw[start..i]);
                start = i + 1;
                seen_eq = false;
            }
            b'=' if !seen_eq => {
                seen_eq = true;
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    loop {
                        match bytes.get(i) {
                            None => {
                                return Err(MetadataError::UnterminatedQuote(
                                    raw[start..].to_string(),
                                ));
                            }
                            Some(b'\\') => i += 2,
                            Some(b'"') => break,
                            Some(_) => i += 1,
                        }
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    pairs.push(&raw[start..]);

    Ok(pairs)
}

fn unquote(pair: &str, value: &str) -> Result<String, MetadataError> {
    let Some(body) = value.strip_prefix('"') else {
        return Ok(value.to_string());
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err(MetadataError::UnterminatedQuote(pair.to_string())),
            },
            '"' => {
                if chars.next().is_some() {
                    return Err(MetadataError::TrailingCharacters(pair.to_string()));
                }
                return Ok(out);
            }
            other => out.push(other),
        }
    }

    Err(MetadataError::UnterminatedQuote(pair.to_string()))
}
