//! Colourised diagnostic rendering (§6.4, §10.4).
//!
//! No file in the retrieved teacher pack implements this — `tsz-cli`'s
//! `lib.rs` references a `reporter` module that isn't present in the pack,
//! and `tsz-checker::error_reporter` turns out to be `CheckerState`'s
//! internal diagnostic *collection*, not a terminal renderer. This module
//! is grounded only in the generic `colored`-crate convention (already a
//! teacher dependency) and the spec's explicit requirement; see
//! `DESIGN.md`.
//!
//! Unlike the teacher's byte-span `Diagnostic` (anchored to an offset into
//! source text it has in hand), the JSON IR format carries at most an
//! optional source `line` per definition and no raw text at all, so there's
//! no column to put a caret under. The renderer reports a line reference
//! instead of an in-line caret, and says so plainly rather than faking one.

use colored::Colorize;

use etpl_ir::{Collection, DefId};

use crate::error::PipelineError;

/// Finds the `DefId` in `collection` whose chained name matches `target`,
/// by walking down from every top-level definition via
/// `Definition::children()`. `Collection` has no reverse name index; this
/// is only ever called on the (rare) error path.
fn find_by_chained_name(collection: &Collection, target: &str) -> Option<DefId> {
    fn walk(collection: &Collection, id: DefId, target: &str) -> Option<DefId> {
        if collection.chained_name(id) == target {
            return Some(id);
        }
        for child in collection.get(id).children() {
            if let Some(found) = walk(collection, child, target) {
                return Some(found);
            }
        }
        None
    }
    collection.top_level().iter().find_map(|&id| walk(collection, id, target))
}

/// Renders `err` as a single colourised diagnostic block:
/// `error[<code>]: <message>`, followed by a `--> line N` reference when
/// `collection` is available and the error names a definition with a known
/// source line.
#[must_use]
pub fn render(err: &PipelineError, collection: Option<&Collection>, no_color: bool) -> String {
    if no_color {
        colored::control::set_override(false);
    }

    let code = err.code();
    let header = if code == 0 {
        format!("{}: {}", "error".red().bold(), err)
    } else {
        format!("{}[{}]: {}", "error".red().bold(), format!("E{code}").red(), err)
    };

    let line = collection.and_then(|c| {
        err.subject()
            .and_then(|name| find_by_chained_name(c, name))
            .and_then(|id| c.get(id).common().line)
    });

    match line {
        Some(n) => format!("{header}\n  {} line {n}", "-->".blue()),
        None => header,
    }
}
