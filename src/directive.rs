//! Directive matching for single lines.
//!
//! A directive lives inside a line comment at the start of a line:
//!
//! ```text
//! // #define NAME
//! // #include "relative/path"
//! ```
//!
//! Leading whitespace, and any amount of whitespace between `//` and `#`, is
//! allowed. Directives appearing mid-line are ordinary content.

use lazy_static::lazy_static;
use regex::Regex;

/// A recognized directive together with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `// #define NAME`
    Define(String),
    /// `// #undefine NAME`
    Undefine(String),
    /// `// #include "path"`
    Include(String),
    /// `// #ifdef NAME`
    IfDef(String),
    /// `// #ifndef NAME`
    IfNDef(String),
    /// `// #endif`
    EndIf,
    /// `// #warning "message"`
    Warning(String),
    /// `// #error "message"`
    Error(String),
    /// Any other `// #word`; carries the word.
    Unknown(String),
}

#[derive(Debug, Clone, Copy)]
enum DirectiveKind {
    Define,
    Undefine,
    Include,
    IfDef,
    IfNDef,
    EndIf,
    Warning,
    Error,
    Unknown,
}

lazy_static! {
    /// The grammar, in match priority order. Read-only once built.
    static ref DIRECTIVES: Vec<(DirectiveKind, Regex)> = vec![
        (DirectiveKind::Define, directive_regex(r#"define\s+(\S+)"#)),
        (DirectiveKind::Undefine, directive_regex(r#"undefine\s+(\S+)"#)),
        (DirectiveKind::Include, directive_regex(r#"include\s+"([^"]+)""#)),
        (DirectiveKind::IfDef, directive_regex(r#"ifdef\s+(\S+)"#)),
        (DirectiveKind::IfNDef, directive_regex(r#"ifndef\s+(\S+)"#)),
        (DirectiveKind::EndIf, directive_regex(r#"endif\b"#)),
        (DirectiveKind::Warning, directive_regex(r#"warning\s+"([^"]+)""#)),
        (DirectiveKind::Error, directive_regex(r#"error\s+"([^"]+)""#)),
        (DirectiveKind::Unknown, directive_regex(r#"(\S*)"#)),
    ];
}

// The patterns above are literals, so compilation cannot fail at runtime.
fn directive_regex(body: &str) -> Regex {
    Regex::new(&format!(r#"^\s*//\s*#{}"#, body)).unwrap()
}

/// Classifies `line`, returning `None` for ordinary content.
pub fn match_line(line: &str) -> Option<Directive> {
    DIRECTIVES.iter().find_map(|(kind, regex)| {
        let captures = regex.captures(line)?;
        let arg = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Some(match kind {
            DirectiveKind::Define => Directive::Define(arg),
            DirectiveKind::Undefine => Directive::Undefine(arg),
            DirectiveKind::Include => Directive::Include(arg),
            DirectiveKind::IfDef => Directive::IfDef(arg),
            DirectiveKind::IfNDef => Directive::IfNDef(arg),
            DirectiveKind::EndIf => Directive::EndIf,
            DirectiveKind::Warning => Directive::Warning(arg),
            DirectiveKind::Error => Directive::Error(arg),
            DirectiveKind::Unknown => Directive::Unknown(arg),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_define_and_undefine() {
        assert_eq!(
            match_line("// #define DEBUG"),
            Some(Directive::Define("DEBUG".to_string()))
        );
        assert_eq!(
            match_line("// #undefine DEBUG"),
            Some(Directive::Undefine("DEBUG".to_string()))
        );
    }

    #[test]
    fn test_match_include_quoted_path() {
        assert_eq!(
            match_line(r#"// #include "lib/util.js""#),
            Some(Directive::Include("lib/util.js".to_string()))
        );
    }

    #[test]
    fn test_ifdef_does_not_shadow_ifndef() {
        assert_eq!(
            match_line("// #ifdef A"),
            Some(Directive::IfDef("A".to_string()))
        );
        assert_eq!(
            match_line("// #ifndef A"),
            Some(Directive::IfNDef("A".to_string()))
        );
    }

    #[test]
    fn test_whitespace_is_flexible() {
        assert_eq!(match_line("//#endif"), Some(Directive::EndIf));
        assert_eq!(match_line("   \t//   #endif"), Some(Directive::EndIf));
        assert_eq!(
            match_line("\t// #ifdef   FLAG  trailing"),
            Some(Directive::IfDef("FLAG".to_string()))
        );
    }

    #[test]
    fn test_warning_and_error_take_quoted_messages() {
        assert_eq!(
            match_line(r#"// #warning "careful now""#),
            Some(Directive::Warning("careful now".to_string()))
        );
        assert_eq!(
            match_line(r#"// #error "stop""#),
            Some(Directive::Error("stop".to_string()))
        );
    }

    #[test]
    fn test_malformed_known_directive_is_unknown() {
        // no quotes around the path
        assert_eq!(
            match_line("// #include util.js"),
            Some(Directive::Unknown("include".to_string()))
        );
        assert_eq!(
            match_line("// #endiffy"),
            Some(Directive::Unknown("endiffy".to_string()))
        );
        assert_eq!(
            match_line("// #endif_x"),
            Some(Directive::Unknown("endif_x".to_string()))
        );
        assert_eq!(match_line("// #endif // trailing"), Some(Directive::EndIf));
        assert_eq!(
            match_line("// #pragma once"),
            Some(Directive::Unknown("pragma".to_string()))
        );
    }

    #[test]
    fn test_ordinary_lines() {
        assert_eq!(match_line("var x = 1; // #define X"), None);
        assert_eq!(match_line("# define X"), None);
        assert_eq!(match_line("// plain comment"), None);
        assert_eq!(match_line(""), None);
    }
}
