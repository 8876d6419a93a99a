//! Command-line argument parsing (§12), in the style of the teacher's
//! `tsz-cli::args` (`clap`-derive, struct-level `#[command(...)]`,
//! per-field `#[arg(...)]`).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "etpl", version, about = "Compiler middle-end for the eTPL typed presentation language")]
pub struct CliArgs {
    /// Input IR file, in the JSON IR interchange format (§11.2).
    pub input: PathBuf,

    /// Write generated parser code here.
    #[arg(short = 'p', long = "parser-out", value_name = "FILE")]
    pub parser_code_out: Option<PathBuf>,

    /// Root feature extraction at this type name. Required whenever `-F` or
    /// `-f` is given.
    #[arg(short = 'b', long = "base-type", value_name = "TYPE")]
    pub base_type: Option<String>,

    /// Write generated feature-extraction code here.
    #[arg(short = 'F', long = "feature-code-out", value_name = "FILE")]
    pub feature_code_out: Option<PathBuf>,

    /// Write the plain feature list here, one feature per line.
    #[arg(short = 'f', long = "feature-list-out", value_name = "FILE")]
    pub feature_list_out: Option<PathBuf>,

    /// Pre-populate a global symbol as `name=value`. Repeatable.
    #[arg(long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, i64)>,

    /// Disable colourised diagnostic output (also honours `NO_COLOR`).
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Validates flag combinations the pipeline can't express as pure
    /// `clap` constraints (§12: "`-F`/`-f` require `-b`").
    pub fn validate(&self) -> Result<(), String> {
        let needs_base_type = self.feature_code_out.is_some() || self.feature_list_out.is_some();
        if needs_base_type && self.base_type.is_none() {
            return Err("-F/-f require -b <TYPE>".to_string());
        }
        if self.parser_code_out.is_none() && self.feature_code_out.is_none() && self.feature_list_out.is_none() {
            return Err("nothing to do: pass at least one of -p, -F, -f".to_string());
        }
        Ok(())
    }
}

fn parse_define(s: &str) -> Result<(String, i64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got \"{s}\""))?;
    let value: i64 = value.parse().map_err(|_| format!("\"{value}\" is not an integer"))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut v = vec!["etpl", "input.json"];
        v.extend_from_slice(extra);
        CliArgs::parse_from(v)
    }

    #[test]
    fn feature_flags_without_base_type_fail_validation() {
        let a = args(&["-f", "out.txt"]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn feature_flags_with_base_type_validate() {
        let a = args(&["-f", "out.txt", "-b", "Packet"]);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn no_output_flags_fail_validation() {
        let a = args(&[]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn define_parses_name_and_integer_value() {
        let a = args(&["--define", "n=4", "-p", "out.rs"]);
        assert_eq!(a.defines, vec![("n".to_string(), 4)]);
    }
}
