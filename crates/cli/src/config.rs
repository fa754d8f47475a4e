use anyhow::{Context, Result, bail};
use flagbind::BindOptions;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "flagbind.json";

/// Points at a config file other than `./flagbind.json`.
pub const CONFIG_ENV: &str = "FLAGBIND_CONFIG";

/// Load binder options from `$FLAGBIND_CONFIG` or `./flagbind.json`.
///
/// A missing default file means default options; a missing file named by the
/// environment is an error.
pub fn load_options() -> Result<BindOptions> {
    load_options_from(std::env::var_os(CONFIG_ENV))
}

fn load_options_from(explicit: Option<OsString>) -> Result<BindOptions> {
    let (path, explicit) = match explicit {
        Some(p) => (PathBuf::from(p), true),
        None => (PathBuf::from(DEFAULT_CONFIG_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("config not found: {}", path.display());
        }
        return Ok(BindOptions::default());
    }

    let options = read_options(&path)?;
    tracing::debug!(path = %path.display(), ?options, "loaded bind options");
    Ok(options)
}

fn read_options(path: &Path) -> Result<BindOptions> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_options(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_options(text: &str) -> Result<BindOptions> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagbind::{Collisions, InvalidValues, UnknownFlags};

    #[test]
    fn parses_partial_config() {
        let options = parse_options(r#"{ "invalid-values": "reject" }"#).unwrap();
        assert_eq!(options.invalid_values, InvalidValues::Reject);
        assert_eq!(options.unknown_flags, UnknownFlags::Skip);
        assert_eq!(options.collisions, Collisions::FirstWins);
    }

    #[test]
    fn rejects_unknown_policy_values() {
        assert!(parse_options(r#"{ "unknown-flags": "explode" }"#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_options_from(Some("/nonexistent/flagbind.json".into())).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }
}
