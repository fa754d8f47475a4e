//! Token binding: walk the token list and write matched flags into a target.

use crate::error::{Error, Result};
use crate::field::{Args, FieldDef};
use crate::options::{BindOptions, Collisions, InvalidValues, UnknownFlags};
use crate::schema::{FieldDescriptor, Schema};
use crate::value::{self, Value, ValueError, ValueKind};

/// Binds tokens into instances of `T`.
///
/// Holds the schema and binding table so one binder can be reused across
/// targets. Binding is a single left-to-right pass; token `0` (the program
/// name) is never looked at.
#[derive(Debug, Clone)]
pub struct Binder<T> {
    schema: Schema,
    fields: Vec<FieldDef<T>>,
    options: BindOptions,
}

impl<T: Args> Binder<T> {
    pub fn new() -> Result<Self> {
        Self::with_options(BindOptions::default())
    }

    pub fn with_options(options: BindOptions) -> Result<Self> {
        Self::from_fields(T::fields(), options)
    }
}

impl<T> Binder<T> {
    /// Build a binder from a hand-written binding table.
    pub fn from_fields(fields: Vec<FieldDef<T>>, options: BindOptions) -> Result<Self> {
        let schema = Schema::from_fields(&fields)?;
        Self::from_parts(schema, fields, options)
    }

    /// Pair an already extracted schema with a binding table.
    ///
    /// Descriptors are resolved against `fields` by identifier at bind time;
    /// a descriptor without a matching entry fails with `FieldNotFound`. An
    /// entry whose kind differs from its descriptor fails here with
    /// `InvalidTarget`.
    pub fn from_parts(
        schema: Schema,
        fields: Vec<FieldDef<T>>,
        options: BindOptions,
    ) -> Result<Self> {
        for descriptor in &schema {
            let Some(def) = fields.iter().find(|f| f.name() == descriptor.field) else {
                continue;
            };
            if def.kind() != descriptor.kind {
                return Err(Error::InvalidTarget(format!(
                    "field `{}` is described as {} but bound as {}",
                    descriptor.field,
                    descriptor.kind,
                    def.kind()
                )));
            }
        }
        if options.collisions == Collisions::Reject {
            if let Some(c) = schema.collisions().into_iter().next() {
                return Err(Error::DuplicateFlag {
                    flag: c.flag,
                    first: c.first,
                    second: c.second,
                });
            }
        }
        Ok(Self {
            schema,
            fields,
            options,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> BindOptions {
        self.options
    }

    /// Bind `tokens` into `target` and hand the same target back.
    ///
    /// Processing stops at the first error; fields written before it keep
    /// their new values.
    pub fn bind<'t, S: AsRef<str>>(&self, tokens: &[S], target: &'t mut T) -> Result<&'t mut T> {
        let mut cursor = 1;

        while cursor < tokens.len() {
            let token = tokens[cursor].as_ref();
            cursor += 1;

            let descriptor = if let Some(name) = token.strip_prefix("--") {
                self.schema.lookup_long(name)
            } else if let Some(name) = token.strip_prefix('-') {
                self.schema.lookup_alias(name)
            } else {
                return Err(Error::UnrecognizedToken(token.to_string()));
            };

            let Some(descriptor) = descriptor else {
                match self.options.unknown_flags {
                    UnknownFlags::Skip => {
                        tracing::debug!(token, "no field for flag, skipping");
                        continue;
                    }
                    UnknownFlags::Reject => return Err(Error::UnknownFlag(token.to_string())),
                }
            };

            let def = self
                .fields
                .iter()
                .find(|f| f.name() == descriptor.field)
                .ok_or_else(|| Error::FieldNotFound(descriptor.field.clone()))?;

            match descriptor.kind {
                ValueKind::Bool => {
                    let setter = def.setter()?;
                    let stored = setter(target, Value::Bool(true));
                    self.settle(token, "", descriptor, stored)?;
                }
                ValueKind::Int => {
                    let setter = def.setter()?;
                    let raw = next_value(tokens, &mut cursor, token)?;
                    let stored = value::parse_int(raw).and_then(|n| setter(target, Value::Int(n)));
                    self.settle(token, raw, descriptor, stored)?;
                }
                ValueKind::String => {
                    let setter = def.setter()?;
                    let raw = next_value(tokens, &mut cursor, token)?;
                    let stored = setter(target, Value::String(raw));
                    self.settle(token, raw, descriptor, stored)?;
                }
                ValueKind::Other => {
                    return Err(Error::UnsupportedFieldType {
                        field: descriptor.field.clone(),
                        type_name: descriptor.type_name.clone(),
                    });
                }
            }
        }

        Ok(target)
    }

    fn settle(
        &self,
        flag: &str,
        raw: &str,
        descriptor: &FieldDescriptor,
        stored: std::result::Result<(), ValueError>,
    ) -> Result<()> {
        match stored {
            Ok(()) => {
                tracing::debug!(flag, field = %descriptor.field, "bound flag");
                Ok(())
            }
            Err(source) => match self.options.invalid_values {
                InvalidValues::Ignore => {
                    tracing::warn!(
                        flag,
                        value = raw,
                        field = %descriptor.field,
                        error = %source,
                        "ignoring invalid value"
                    );
                    Ok(())
                }
                InvalidValues::Reject => Err(Error::InvalidValue {
                    flag: flag.to_string(),
                    value: raw.to_string(),
                    source,
                }),
            },
        }
    }
}

/// Consume the token after `flag`.
fn next_value<'a, S: AsRef<str>>(
    tokens: &'a [S],
    cursor: &mut usize,
    flag: &str,
) -> Result<&'a str> {
    let raw = tokens
        .get(*cursor)
        .ok_or_else(|| Error::MissingValue(flag.to_string()))?;
    *cursor += 1;
    Ok(raw.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[derive(Debug, Default)]
    struct Arguments {
        all: bool,
        text: String,
        port: i32,
        host: String,
        tags: Vec<String>,
    }

    impl Args for Arguments {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::bind::<bool>(
                    "all",
                    "alias=a,argument=all,description=All values",
                    |t: &mut Self, v| t.all.store(v),
                ),
                FieldDef::bind::<String>(
                    "text",
                    "alias=t,argument=text,description=Simple text",
                    |t: &mut Self, v| t.text.store(v),
                ),
                FieldDef::bind::<i32>(
                    "port",
                    "argument=port,description=Port number",
                    |t: &mut Self, v| t.port.store(v),
                ),
                FieldDef::bind::<String>(
                    "host",
                    "alias=h,description=Host name",
                    |t: &mut Self, v| t.host.store(v),
                ),
                FieldDef::unsupported("tags", "argument=tag", "Vec<String>"),
            ]
        }
    }

    fn argv(line: &str) -> Vec<&str> {
        line.split(' ').collect()
    }

    fn bind(line: &str) -> Result<Arguments> {
        let mut args = Arguments::default();
        Binder::<Arguments>::new()?.bind(&argv(line), &mut args)?;
        Ok(args)
    }

    fn bind_with(line: &str, options: BindOptions) -> Result<Arguments> {
        let mut args = Arguments::default();
        Binder::<Arguments>::with_options(options)?.bind(&argv(line), &mut args)?;
        Ok(args)
    }

    #[test]
    fn binds_every_kind() {
        let args = bind("test.exe -a --text hello --port 8080 -h localhost").unwrap();
        assert!(args.all);
        assert_eq!(args.text, "hello");
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "localhost");
    }

    #[test]
    fn order_does_not_matter() {
        let args = bind("prog -h localhost --port 8080 --text hello -a").unwrap();
        assert!(args.all);
        assert_eq!(args.text, "hello");
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "localhost");
    }

    #[test]
    fn bool_flag_does_not_consume_next_token() {
        let args = bind("prog -a --text hello").unwrap();
        assert!(args.all);
        assert_eq!(args.text, "hello");
    }

    #[test]
    fn alias_and_long_name_are_equivalent() {
        let short = bind("prog -t hello").unwrap();
        let long = bind("prog --text hello").unwrap();
        assert_eq!(short.text, long.text);
        assert_eq!(short.text, "hello");
    }

    #[test]
    fn first_token_is_skipped() {
        let args = bind("--all").unwrap();
        assert!(!args.all);
    }

    #[test]
    fn returns_the_same_target() {
        let mut args = Arguments::default();
        let binder = Binder::<Arguments>::new().unwrap();
        let returned = binder.bind(&["prog", "-a"], &mut args).unwrap();
        returned.port = 1;
        assert!(args.all);
        assert_eq!(args.port, 1);
    }

    #[test]
    fn value_tokens_are_taken_verbatim() {
        let args = bind("prog --text --port").unwrap();
        assert_eq!(args.text, "--port");
        assert_eq!(args.port, 0);

        let args = bind("prog --port -12").unwrap();
        assert_eq!(args.port, -12);
    }

    #[test]
    fn bare_word_is_unrecognized() {
        let mut args = Arguments::default();
        let binder = Binder::<Arguments>::new().unwrap();
        let err = binder
            .bind(&["prog", "-a", "stray", "--text", "hi"], &mut args)
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedToken(t) if t == "stray"));
        // Processing stopped at the stray token.
        assert!(args.all);
        assert!(args.text.is_empty());
    }

    #[test]
    fn value_flag_last_is_missing_value() {
        let err = bind("prog -a --port").unwrap_err();
        assert!(matches!(err, Error::MissingValue(f) if f == "--port"));

        let err = bind("prog -t").unwrap_err();
        assert!(matches!(err, Error::MissingValue(f) if f == "-t"));
    }

    #[test]
    fn unknown_flags_are_skipped_by_default() {
        let args = bind("prog --verbose -x --text hi").unwrap();
        assert_eq!(args.text, "hi");
    }

    #[test]
    fn unknown_flags_can_be_rejected() {
        let options = BindOptions {
            unknown_flags: UnknownFlags::Reject,
            ..Default::default()
        };
        let err = bind_with("prog --text hi --verbose", options).unwrap_err();
        assert!(matches!(err, Error::UnknownFlag(f) if f == "--verbose"));
    }

    #[test]
    fn skipped_unknown_flag_does_not_consume_a_value() {
        // `--nope` is skipped on its own; `value` is then a bare word.
        let err = bind("prog --nope value").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedToken(t) if t == "value"));
    }

    #[test]
    fn empty_flag_names_never_match() {
        // `port` has no alias and `host` has no long name.
        let args = bind("prog - --").unwrap();
        assert_eq!(args.port, 0);
        assert!(args.host.is_empty());
    }

    #[test]
    fn invalid_int_leaves_field_untouched_by_default() {
        let args = bind("prog --port 80 --port eighty -a").unwrap();
        assert_eq!(args.port, 80);
        assert!(args.all);
    }

    #[test]
    fn out_of_range_int_is_an_invalid_value() {
        let args = bind("prog --port 4294967296").unwrap();
        assert_eq!(args.port, 0);

        let options = BindOptions {
            invalid_values: InvalidValues::Reject,
            ..Default::default()
        };
        let err = bind_with("prog --port 4294967296", options).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidValue { source: ValueError::OutOfRange { .. }, .. }
        ));
    }

    #[test]
    fn invalid_int_can_be_rejected() {
        let options = BindOptions {
            invalid_values: InvalidValues::Reject,
            ..Default::default()
        };
        let err = bind_with("prog --port eighty", options).unwrap_err();
        match err {
            Error::InvalidValue { flag, value, source } => {
                assert_eq!(flag, "--port");
                assert_eq!(value, "eighty");
                assert_eq!(source, ValueError::NotAnInteger("eighty".into()));
            }
            other => panic!("expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn unsupported_field_fails_only_when_matched() {
        assert!(bind("prog -a").is_ok());
        let err = bind("prog --tag x").unwrap_err();
        match err {
            Error::UnsupportedFieldType { field, type_name } => {
                assert_eq!(field, "tags");
                assert_eq!(type_name, "Vec<String>");
            }
            other => panic!("expected UnsupportedFieldType, got: {other:?}"),
        }
    }

    #[test]
    fn descriptor_without_table_entry_is_field_not_found() {
        let schema = Schema::extract::<Arguments>().unwrap();
        let fields: Vec<FieldDef<Arguments>> = Arguments::fields()
            .into_iter()
            .filter(|f| f.name() != "host")
            .collect();
        let binder = Binder::from_parts(schema, fields, BindOptions::default()).unwrap();

        let mut args = Arguments::default();
        let err = binder.bind(&["prog", "-h", "localhost"], &mut args).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(f) if f == "host"));
    }

    #[test]
    fn kind_mismatch_between_schema_and_table_is_rejected() {
        let schema = Schema::extract::<Arguments>().unwrap();
        let fields: Vec<FieldDef<Arguments>> = Arguments::fields()
            .into_iter()
            .map(|f| {
                if f.name() == "port" {
                    FieldDef::bind::<String>("port", "argument=port", |t: &mut Arguments, v| {
                        t.text.store(v)
                    })
                } else {
                    f
                }
            })
            .collect();

        let err = Binder::from_parts(schema, fields, BindOptions::default()).unwrap_err();
        assert!(
            matches!(&err, Error::InvalidTarget(msg) if msg.contains("`port`") && msg.contains("int") && msg.contains("string")),
            "unexpected error: {err:?}"
        );
    }

    #[derive(Debug, Default)]
    struct Clashing {
        first: String,
        second: String,
    }

    impl Args for Clashing {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::bind::<String>("first", "alias=n,argument=name", |t: &mut Self, v| {
                    t.first.store(v)
                }),
                FieldDef::bind::<String>("second", "alias=n,argument=nick", |t: &mut Self, v| {
                    t.second.store(v)
                }),
            ]
        }
    }

    #[test]
    fn collisions_resolve_to_the_first_declared_field() {
        let mut target = Clashing::default();
        Binder::<Clashing>::new()
            .unwrap()
            .bind(&["prog", "-n", "x", "--nick", "y"], &mut target)
            .unwrap();
        assert_eq!(target.first, "x");
        assert_eq!(target.second, "y");
    }

    #[test]
    fn collisions_can_be_rejected() {
        let options = BindOptions {
            collisions: Collisions::Reject,
            ..Default::default()
        };
        let err = Binder::<Clashing>::with_options(options).unwrap_err();
        match err {
            Error::DuplicateFlag { flag, first, second } => {
                assert_eq!(flag, "-n");
                assert_eq!(first, "first");
                assert_eq!(second, "second");
            }
            other => panic!("expected DuplicateFlag, got: {other:?}"),
        }
    }

    #[test]
    fn binder_is_reusable() {
        let binder = Binder::<Arguments>::new().unwrap();
        let mut a = Arguments::default();
        let mut b = Arguments::default();
        binder.bind(&["prog", "--port", "1"], &mut a).unwrap();
        binder.bind(&["prog", "--port", "2"], &mut b).unwrap();
        assert_eq!((a.port, b.port), (1, 2));
        assert!(a.tags.is_empty());
    }
}
