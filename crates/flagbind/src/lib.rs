//! Bind command-line flags into annotated structs.
//!
//! Each bindable field carries a small annotation naming its short alias, its
//! long flag and a description:
//!
//! ```
//! use flagbind::Args;
//!
//! #[derive(Debug, Default, Args)]
//! struct Arguments {
//!     #[args("alias=a,argument=all,description=All values")]
//!     all: bool,
//!     #[args("alias=t,argument=text,description=Simple text")]
//!     text: String,
//!     #[args("argument=port,description=Port number")]
//!     port: i32,
//!     #[args("alias=h,description=Host name")]
//!     host: String,
//! }
//!
//! let argv = ["test", "-a", "--text", "hello", "--port", "8080", "-h", "localhost"];
//! let mut args = Arguments::default();
//! flagbind::load_args(&mut args, &argv)?;
//! assert!(args.all);
//! assert_eq!(args.port, 8080);
//! assert_eq!(args.host, "localhost");
//!
//! let help = flagbind::help::render::<Arguments>("test", "Collect parameters")?;
//! assert!(help.contains("    -a --all         All values"));
//! # Ok::<(), flagbind::Error>(())
//! ```
//!
//! The pieces can be used separately: [`Schema::extract`] turns a struct into
//! an ordered list of [`FieldDescriptor`]s, a [`Binder`] walks a token list
//! against it, and [`help`] renders usage text from it. Binding policies for
//! unknown flags, unparsable values and flag collisions live in
//! [`BindOptions`].

mod bind;
mod dispatch;
mod error;
mod field;
pub mod help;
pub mod metadata;
mod options;
mod schema;
mod value;

pub use bind::Binder;
pub use error::{Error, Result};
pub use field::{Args, FieldDef, Setter};
pub use options::{BindOptions, Collisions, InvalidValues, UnknownFlags};
pub use schema::{Collision, FieldDescriptor, Schema};
pub use value::{FieldValue, Value, ValueError, ValueKind};

#[cfg(feature = "derive")]
pub use flagbind_macros::Args;

// Used by `#[derive(Args)]`, not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::dispatch::{Bindable, Slot, Unbindable};
}

/// Bind `tokens` into `target` with the default options.
///
/// `tokens[0]` is the program name and is ignored.
pub fn load_args<'t, T: Args, S: AsRef<str>>(
    target: &'t mut T,
    tokens: &[S],
) -> Result<&'t mut T> {
    Binder::<T>::new()?.bind(tokens, target)
}

/// Bind the arguments of the current process into `target`.
///
/// Arguments that are not valid UTF-8 are converted lossily.
pub fn load_args_from_env<T: Args>(target: &mut T) -> Result<&mut T> {
    let tokens: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    load_args(target, &tokens)
}
