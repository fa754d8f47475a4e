mod config;

use anyhow::{Context, Result};
use flagbind::{Args, Binder};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

const NAME: &str = "flagbind-demo";
const DESCRIPTION: &str = "Bind command-line flags into a sample service configuration";

#[derive(Debug, Args, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ServeArgs {
    #[args("alias=h,argument=help,description=Show this help")]
    #[serde(skip)]
    help: bool,

    #[args("argument=schema,description=Print flags as JSON")]
    #[serde(skip)]
    schema: bool,

    #[args("alias=v,argument=verbose,description=Verbose output")]
    verbose: bool,

    #[args("alias=n,argument=name,description=Service name")]
    name: String,

    #[args("alias=H,argument=host,description=\"Host name, or IP\"")]
    host: String,

    #[args("alias=p,argument=port,description=Port number")]
    port: u16,

    #[args("alias=j,argument=jobs,description=Worker count")]
    jobs: u32,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            help: false,
            schema: false,
            verbose: false,
            name: "demo".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            jobs: 4,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let options = config::load_options()?;
    let binder = Binder::<ServeArgs>::with_options(options)
        .context("failed to build the argument binder")?;

    let tokens: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let mut args = ServeArgs::default();
    binder.bind(&tokens, &mut args).context("invalid arguments")?;

    if args.help {
        flagbind::help::print_help::<ServeArgs>(NAME, DESCRIPTION)?;
        return Ok(());
    }

    if args.schema {
        println!("{}", serde_json::to_string_pretty(binder.schema())?);
        return Ok(());
    }

    tracing::debug!(?args, "bound arguments");
    println!("{}", serde_json::to_string_pretty(&args)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
