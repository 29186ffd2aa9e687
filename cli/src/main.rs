use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};
use moonbridge_core::{Interpreter, InterpreterOptions, stdlib::register_stdlib};
use tracing::debug;

/// Moonbridge - run Lua scripts against a Rust host
#[derive(Parser, Debug)]
#[command(name = "moonbridge")]
#[command(about = "Run a Lua script and call into it", long_about = None)]
struct Args {
    /// Lua script to load
    script: PathBuf,

    /// Global function to call through the call gateway after loading
    #[arg(long, value_name = "FUNCTION")]
    invoke: Option<String>,

    /// Payload passed to the invoked function (if not provided, reads from stdin)
    #[arg(long, requires = "invoke")]
    payload: Option<String>,

    /// Print these globals as JSON after running (repeatable)
    #[arg(long = "global", value_name = "NAME")]
    globals: Vec<String>,

    /// Maximum table nesting followed when reading values
    #[arg(long, default_value_t = InterpreterOptions::default().max_depth)]
    max_depth: usize,

    /// Fail instead of writing nil when a record cannot be serialized
    #[arg(long)]
    strict_records: bool,

    /// Write empty sequences as `{__emptyarray = true}`
    #[arg(long)]
    mark_empty_arrays: bool,

    /// Do not install the `json` package
    #[arg(long)]
    no_stdlib: bool,
}

impl Args {
    fn options(&self) -> InterpreterOptions {
        InterpreterOptions {
            max_depth: self.max_depth,
            strict_records: self.strict_records,
            mark_empty_arrays: self.mark_empty_arrays,
        }
    }
}

fn read_payload(payload: Option<&str>) -> Result<Vec<u8>> {
    match payload {
        Some(payload) => Ok(payload.as_bytes().to_vec()),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .into_diagnostic()
                .wrap_err("failed to read payload from stdin")?;
            Ok(buffer)
        }
    }
}

/// `moonbridge_core::Error` is `!Send` (it wraps `mlua::Error`), so it cannot
/// go through `IntoDiagnostic`; carry its message into a report instead.
fn core_error(err: moonbridge_core::Error) -> miette::Report {
    miette::miette!("{err}")
}

fn print_globals(lua: &mut Interpreter, names: &[String]) -> Result<()> {
    let globals = lua.get_globals(names).map_err(core_error)?;
    let object: serde_json::Map<String, serde_json::Value> = globals
        .into_iter()
        .map(|(name, value)| (name, value.to_json()))
        .collect();
    let text = serde_json::to_string_pretty(&serde_json::Value::Object(object)).into_diagnostic()?;
    println!("{text}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level, default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let source = fs::read_to_string(&args.script)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", args.script.display()))?;

    let mut lua = Interpreter::with_options(args.options());
    if !args.no_stdlib {
        register_stdlib(&mut lua).map_err(core_error)?;
    }

    debug!(script = %args.script.display(), "running script");
    lua.exec(&source)
        .map_err(core_error)
        .wrap_err_with(|| format!("error running {}", args.script.display()))?;

    if let Some(function) = &args.invoke {
        let payload = read_payload(args.payload.as_deref())?;
        let reply = lua
            .invoke(function, &payload)
            .map_err(core_error)
            .wrap_err_with(|| format!("calling '{function}' failed"))?;
        println!("{reply}");
    }

    if !args.globals.is_empty() {
        print_globals(&mut lua, &args.globals)?;
    }

    Ok(())
}
