//! The compilation pipeline driver (§12): the exact eight-step sequence
//! from raw input to emitted output files, fail-fast with no partial
//! writes.
//!
//! Grounded on the *shape* of the teacher's `tsz-cli::driver::Driver` — a
//! `compile(...) -> Result<...>` entry point that times each phase with a
//! `tracing` span and aggregates the first hard error rather than the TS
//! driver's incremental-build machinery (tsconfig loading, `BuildInfo`
//! caching, parallel module graphs), none of which this pipeline has an
//! analogue for.

use std::fs;

use etpl_algebra::features;
use etpl_checker::check_collection;
use etpl_ir::Collection;
use tracing::debug_span;

use crate::args::CliArgs;
use crate::backend::{DebugFeatureEmitter, DebugParserEmitter, FeatureCodeEmitter, ParserCodeEmitter};
use crate::error::PipelineError;
use crate::frontend::{JsonIrParser, SurfaceParser};

pub struct Driver {
    parser: JsonIrParser,
    parser_emitter: DebugParserEmitter,
    feature_emitter: DebugFeatureEmitter,
}

impl Default for Driver {
    fn default() -> Self {
        Driver { parser: JsonIrParser, parser_emitter: DebugParserEmitter, feature_emitter: DebugFeatureEmitter }
    }
}

impl Driver {
    /// Runs the full pipeline for `args`. Every stage up to and including
    /// code generation happens in memory; output files are only written
    /// once every requested emitter has produced its text, so a failure at
    /// any stage leaves the filesystem untouched (§12: "fail-fast, no
    /// partial outputs").
    pub fn run(&self, args: &CliArgs) -> Result<(), PipelineError> {
        args.validate().map_err(PipelineError::Usage)?;

        let source = fs::read_to_string(&args.input)?;

        let mut raw = debug_span!("parse").in_scope(|| self.parser.parse(&source))?;
        for (name, _value) in &args.defines {
            raw.add_global_symbol(name.clone());
        }
        debug_span!("check_raw").in_scope(|| check_collection(&raw))?;
        let normal = debug_span!("normalise").in_scope(|| etpl_lowering::normalize(&raw))?;

        let mut collection = normal;
        debug_span!("sort").in_scope(|| -> Result<(), PipelineError> {
            collection.sort()?;
            Ok(())
        })?;
        debug_span!("assign_type_ids").in_scope(|| {
            collection.assign_type_ids(Collection::DEFAULT_TYPE_ID_BASE);
        });
        debug_span!("check_validated").in_scope(|| check_collection(&collection))?;

        let feature_list = if let Some(type_name) = &args.base_type {
            let root = collection
                .lookup(type_name)
                .ok_or_else(|| PipelineError::Usage(format!("no such type \"{type_name}\"")))?;
            Some((root, debug_span!("compute_algebra").in_scope(|| features(&collection, root))))
        } else {
            None
        };

        // Generate every requested output before writing any of it.
        let parser_code = match &args.parser_code_out {
            Some(_) => Some(self.parser_emitter.emit_parser(&collection)?),
            None => None,
        };
        let feature_code = match (&args.feature_code_out, &feature_list) {
            (Some(_), Some((root, flist))) => Some(self.feature_emitter.emit_feature_code(&collection, *root, flist)?),
            (Some(_), None) => unreachable!("validate() guarantees base_type is set whenever feature_code_out is"),
            (None, _) => None,
        };
        let feature_listing = match (&args.feature_list_out, &feature_list) {
            (Some(_), Some((_, flist))) => Some(flist.join("\n")),
            (Some(_), None) => unreachable!("validate() guarantees base_type is set whenever feature_list_out is"),
            (None, _) => None,
        };

        if let (Some(path), Some(code)) = (&args.parser_code_out, parser_code) {
            fs::write(path, code)?;
        }
        if let (Some(path), Some(code)) = (&args.feature_code_out, feature_code) {
            fs::write(path, code)?;
        }
        if let (Some(path), Some(listing)) = (&args.feature_list_out, feature_listing) {
            fs::write(path, listing)?;
        }

        Ok(())
    }
}
