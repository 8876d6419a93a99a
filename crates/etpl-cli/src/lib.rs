//! `etpl-cli`: the command-line driver crate for the eTPL compiler
//! pipeline (§12). All logic the `etpl` binary needs lives here so the
//! binary crate itself stays a one-line shim, mirroring the teacher's
//! `tsz` bin / `tsz-cli` crate split.

pub mod args;
pub mod backend;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod frontend;

use clap::Parser;

use args::CliArgs;
use driver::Driver;

/// Parses arguments, wires up logging, runs the pipeline, and renders any
/// error to stderr. Returns the process exit code: `0` on success, `1` on
/// pipeline or usage failure.
#[must_use]
pub fn run() -> i32 {
    let args = CliArgs::parse();

    if args.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Driver::default().run(&args) {
        Ok(()) => 0,
        Err(err) => {
            // `Driver::run` doesn't hand back the partially-built `Collection`
            // on failure, so line-number lookup (`diagnostics::render`'s
            // `collection` parameter) is never available at this call site
            // today; the renderer still degrades cleanly to a bare message.
            eprintln!("{}", diagnostics::render(&err, None, args.no_color));
            1
        }
    }
}
