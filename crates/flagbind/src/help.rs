//! Usage text rendered from a schema.
//!
//! The layout is fixed:
//!
//! ```text
//! Usage: <name> [parameter]
//! <description>
//! parameters:
//!     -a --all         All values
//!     -t --text=WORD   Simple text
//! ```
//!
//! The alias column is `-` right-aligned in five columns followed by the
//! alias. Descriptions are padded so that they line up at a fixed target for
//! typical flag widths.

use std::fmt::Write as _;
use std::io;

use crate::error::Result;
use crate::field::Args;
use crate::schema::Schema;

const ALIAS_WIDTH: usize = 5;
const DESCRIPTION_TARGET: isize = 18;
const VALUE_PLACEHOLDER: &str = "WORD";

/// Render the help text for `T`.
pub fn render<T: Args>(name: &str, description: &str) -> Result<String> {
    let schema = Schema::extract::<T>()?;
    Ok(render_schema(name, description, &schema))
}

/// Write the help text for `T` to `out`.
pub fn write_help<T: Args, W: io::Write>(
    out: &mut W,
    name: &str,
    description: &str,
) -> Result<()> {
    let text = render::<T>(name, description)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// Print the help text for `T` to stdout.
pub fn print_help<T: Args>(name: &str, description: &str) -> Result<()> {
    write_help::<T, _>(&mut io::stdout().lock(), name, description)
}

/// Render help from an already extracted schema, one line per descriptor in
/// schema order.
pub fn render_schema(name: &str, description: &str, schema: &Schema) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Usage: {name} [parameter]");
    let _ = writeln!(out, "{description}");
    out.push_str("parameters:\n");

    for d in schema {
        let mut counter: isize = 0;

        if d.alias.is_empty() {
            out.push_str("   ");
        } else {
            let _ = write!(out, "{:>ALIAS_WIDTH$}{}", "-", d.alias);
            counter += 3;
        }

        if !d.long_name.is_empty() {
            let _ = write!(out, " --{}", d.long_name);
            counter += d.long_name.len() as isize + 3;
            if d.kind.takes_value() {
                let _ = write!(out, "={VALUE_PLACEHOLDER}");
                counter += 5;
            }
        }

        if !d.description.is_empty() {
            let width = DESCRIPTION_TARGET - counter + d.description.len() as isize;
            pad_description(&mut out, &d.description, width);
        }
        out.push('\n');
    }

    out
}

/// Right-justify `text` in `width` columns; a negative width left-justifies
/// in `-width` columns instead.
fn pad_description(out: &mut String, text: &str, width: isize) {
    let columns = width.unsigned_abs();
    if width >= 0 {
        let _ = write!(out, "{text:>columns$}");
    } else {
        let _ = write!(out, "{text:<columns$}");
    }
}
