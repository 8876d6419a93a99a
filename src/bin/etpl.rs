//! `etpl` binary entry point. All CLI logic lives in the `etpl-cli` crate.

fn main() {
    std::process::exit(etpl_cli::run());
}
