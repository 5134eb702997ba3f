//! deprop CLI - mark a method deprecated across a source tree.
//!
//! Features:
//! - Name or exact-signature targeting
//! - Cascade to called methods (can be disabled)
//! - Class promotion once every member is deprecated
//! - Dry-run mode and JSON output

use anyhow::{anyhow, Result};
use clap::Parser;

use deprop_core::{
    init_logging, print_json, print_plain, Deprop, LogFormat, PropagationResult, ScopeMode,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Propagate deprecation markers through a source tree")]
pub struct Cli {
    /// Path to the root of the project
    #[arg(default_value = ".")]
    path: String,

    /// Name of the method to deprecate
    #[arg(short, long, required_unless_present = "promote_only")]
    method: Option<String>,

    /// Exact signature to disambiguate overloads, e.g. "int add(int a, int b)"
    #[arg(short, long)]
    signature: Option<String>,

    /// Output the result in JSON format
    #[arg(long)]
    json: bool,

    /// Show what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Do not cascade the marker to called methods
    #[arg(long)]
    no_cascade: bool,

    /// Ignore braces inside string literals and comments when bounding bodies
    #[arg(long)]
    lexed: bool,

    /// Only promote classes whose members are all deprecated
    #[arg(long, conflicts_with_all = ["method", "signature"])]
    promote_only: bool,

    /// Human-readable log lines on stderr instead of JSON
    #[arg(long)]
    pretty_log: bool,
}

/// Rejects method names that cannot be a single identifier.
fn validate_method_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first = chars
        .next()
        .ok_or_else(|| anyhow!("Method name must not be empty"))?;
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return Err(anyhow!("Method name must start with a letter, '_' or '$': {}", name));
    }
    if let Some(bad) = chars.find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '$')) {
        return Err(anyhow!("Method name contains invalid character {:?}: {}", bad, name));
    }
    Ok(())
}

/// Builds the engine from command-line flags.
///
/// Only flags that were given override deprop.toml.
fn build_engine(cli: &Cli) -> Deprop {
    let mut deprop = Deprop::new(&cli.path).dry_run(cli.dry_run);
    if let Some(method) = &cli.method {
        deprop = deprop
            .with_target(method.trim())
            .with_signature(cli.signature.clone());
    }
    if cli.no_cascade {
        deprop = deprop.with_cascade(false);
    }
    if cli.lexed {
        deprop = deprop.with_scope_mode(ScopeMode::Lexed);
    }
    deprop
}

fn execute(cli: &Cli) -> Result<PropagationResult> {
    if !cli.promote_only {
        validate_method_name(cli.method.as_deref().unwrap_or_default().trim())?;
    }
    let deprop = build_engine(cli);
    Ok(if cli.promote_only {
        deprop.promote_classes()
    } else {
        deprop.run()
    })
}

/// Exit status for a finished run: 0 on success, 1 on failure.
fn exit_code(result: &PropagationResult) -> i32 {
    if result.success {
        0
    } else {
        1
    }
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deprop internal error: {}", info);
        eprintln!("[PANIC] No further files will be written. Exiting with code 2.");
        std::process::exit(2);
    }));

    let cli = Cli::parse();

    // Structured logging to stderr, respects RUST_LOG
    init_logging(if cli.pretty_log {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    });

    let result = match execute(&cli) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            std::process::exit(2);
        }
    };

    if cli.json {
        print_json(&result);
    } else {
        print_plain(&result);
    }

    std::process::exit(exit_code(&result));
}
