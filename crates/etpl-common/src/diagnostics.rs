//! Diagnostic types and the eTPL message catalogue.
//!
//! Every diagnostic the pipeline can raise is listed in [`diagnostic_codes`]
//! and carries a category, a stable numeric code, and a message template with
//! `{0}`, `{1}`, ... placeholders filled in by [`format_message`].

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Stable numeric codes for every diagnostic the pipeline can emit.
///
/// Grouped by the taxonomy the checker/normaliser/resolver use: syntax,
/// symbol and type resolution, structural check rule violations, and width
/// computation.
pub mod diagnostic_codes {
    // Syntax / parsing (reported by the surface parser, surfaced here so the
    // CLI can render them uniformly).
    pub const SYNTAX_ERROR: u32 = 1000;

    // Symbol and type resolution.
    pub const UNKNOWN_TYPE: u32 = 1100;
    pub const UNKNOWN_SYMBOL: u32 = 1101;
    pub const CYCLIC_DEPENDENCY: u32 = 1102;
    pub const DUPLICATE_DEFINITION: u32 = 1103;

    // Width / dynamic-type / feature algebra.
    pub const WIDTH_UNDETERMINED: u32 = 1200;

    // Structural checker rules (§4.5 / §7), one code per named rule id.
    pub const NON_OPT_AFTER_OPT: u32 = 1300;
    pub const DISTINCTIVE_NON_ENUM: u32 = 1301;
    pub const DUPLICATE_MEMBER: u32 = 1302;
    pub const AMBIGUOUS_NESTED: u32 = 1303;
    pub const SELECT_OUTSIDE_STRUCT: u32 = 1304;
    pub const MISSING_DEFAULT: u32 = 1305;
    pub const MULTIPLE_DEFAULT: u32 = 1306;
    pub const DEFAULT_NOT_LAST: u32 = 1307;
    pub const UNBALANCED_CASES: u32 = 1308;
    pub const MULTIPLE_FALLBACK: u32 = 1309;
    pub const NON_INTEGER_ARG: u32 = 1310;
}

pub mod diagnostic_messages {
    use super::{diagnostic_codes::*, DiagnosticCategory, DiagnosticMessage};

    pub const SYNTAX_ERROR: DiagnosticMessage = DiagnosticMessage {
        code: SYNTAX_ERROR,
        category: DiagnosticCategory::Error,
        message: "{0}",
    };

    pub const UNKNOWN_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: UNKNOWN_TYPE,
        category: DiagnosticCategory::Error,
        message: "unknown type '{0}'",
    };

    pub const UNKNOWN_SYMBOL: DiagnosticMessage = DiagnosticMessage {
        code: UNKNOWN_SYMBOL,
        category: DiagnosticCategory::Error,
        message: "unknown symbol '{0}'",
    };

    pub const CYCLIC_DEPENDENCY: DiagnosticMessage = DiagnosticMessage {
        code: CYCLIC_DEPENDENCY,
        category: DiagnosticCategory::Error,
        message: "cyclic dependency involving '{0}'",
    };

    pub const DUPLICATE_DEFINITION: DiagnosticMessage = DiagnosticMessage {
        code: DUPLICATE_DEFINITION,
        category: DiagnosticCategory::Error,
        message: "'{0}' is already defined",
    };

    pub const WIDTH_UNDETERMINED: DiagnosticMessage = DiagnosticMessage {
        code: WIDTH_UNDETERMINED,
        category: DiagnosticCategory::Error,
        message: "width of '{0}' cannot be determined statically",
    };

    pub const NON_OPT_AFTER_OPT: DiagnosticMessage = DiagnosticMessage {
        code: NON_OPT_AFTER_OPT,
        category: DiagnosticCategory::Error,
        message: "non-optional member '{0}' follows an optional member",
    };

    pub const DISTINCTIVE_NON_ENUM: DiagnosticMessage = DiagnosticMessage {
        code: DISTINCTIVE_NON_ENUM,
        category: DiagnosticCategory::Error,
        message: "member '{0}' is marked distinctive but does not reference an enum",
    };

    pub const DUPLICATE_MEMBER: DiagnosticMessage = DiagnosticMessage {
        code: DUPLICATE_MEMBER,
        category: DiagnosticCategory::Error,
        message: "duplicate member name '{0}'",
    };

    pub const AMBIGUOUS_NESTED: DiagnosticMessage = DiagnosticMessage {
        code: AMBIGUOUS_NESTED,
        category: DiagnosticCategory::Error,
        message: "nested definition '{0}' is ambiguous without a name",
    };

    pub const SELECT_OUTSIDE_STRUCT: DiagnosticMessage = DiagnosticMessage {
        code: SELECT_OUTSIDE_STRUCT,
        category: DiagnosticCategory::Error,
        message: "select-case '{0}' must appear as a struct member",
    };

    pub const MISSING_DEFAULT: DiagnosticMessage = DiagnosticMessage {
        code: MISSING_DEFAULT,
        category: DiagnosticCategory::Error,
        message: "select-case '{0}' has no default case and does not cover every enum item",
    };

    pub const MULTIPLE_DEFAULT: DiagnosticMessage = DiagnosticMessage {
        code: MULTIPLE_DEFAULT,
        category: DiagnosticCategory::Error,
        message: "select-case '{0}' declares more than one default case",
    };

    pub const DEFAULT_NOT_LAST: DiagnosticMessage = DiagnosticMessage {
        code: DEFAULT_NOT_LAST,
        category: DiagnosticCategory::Error,
        message: "default case of select-case '{0}' must be the last case",
    };

    pub const UNBALANCED_CASES: DiagnosticMessage = DiagnosticMessage {
        code: UNBALANCED_CASES,
        category: DiagnosticCategory::Error,
        message: "select-case '{0}' has cases that do not match its discriminant's items",
    };

    pub const MULTIPLE_FALLBACK: DiagnosticMessage = DiagnosticMessage {
        code: MULTIPLE_FALLBACK,
        category: DiagnosticCategory::Error,
        message: "select-case '{0}' declares more than one fallback case",
    };

    pub const NON_INTEGER_ARG: DiagnosticMessage = DiagnosticMessage {
        code: NON_INTEGER_ARG,
        category: DiagnosticCategory::Error,
        message: "argument '{0}' must be an integer literal or symbol",
    };

    pub const ALL: &[DiagnosticMessage] = &[
        SYNTAX_ERROR,
        UNKNOWN_TYPE,
        UNKNOWN_SYMBOL,
        CYCLIC_DEPENDENCY,
        DUPLICATE_DEFINITION,
        WIDTH_UNDETERMINED,
        NON_OPT_AFTER_OPT,
        DISTINCTIVE_NON_ENUM,
        DUPLICATE_MEMBER,
        AMBIGUOUS_NESTED,
        SELECT_OUTSIDE_STRUCT,
        MISSING_DEFAULT,
        MULTIPLE_DEFAULT,
        DEFAULT_NOT_LAST,
        UNBALANCED_CASES,
        MULTIPLE_FALLBACK,
        NON_INTEGER_ARG,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// A single reportable diagnostic, anchored to a byte range in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_template(
        file: impl Into<String>,
        start: u32,
        length: u32,
        template: DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            category: template.category,
            code: template.code,
            file: file.into(),
            start,
            length,
            message_text: format_message(template.message, args),
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    diagnostic_messages::ALL
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
#[must_use]
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_placeholders() {
        assert_eq!(format_message("unknown type '{0}'", &["Foo"]), "unknown type 'Foo'");
    }

    #[test]
    fn every_code_has_a_template() {
        for message in diagnostic_messages::ALL {
            assert_eq!(get_message_template(message.code), Some(message.message));
        }
    }

    #[test]
    fn builds_error_from_template() {
        let diag = Diagnostic::from_template(
            "example.etpl",
            10,
            3,
            diagnostic_messages::UNKNOWN_SYMBOL,
            &["count"],
        );
        assert_eq!(diag.code, diagnostic_codes::UNKNOWN_SYMBOL);
        assert_eq!(diag.message_text, "unknown symbol 'count'");
    }
}
