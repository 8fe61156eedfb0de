//! Lexical validation of CSS selector fragments.
//!
//! A fragment is a single complex selector such as `.dark`,
//! `[data-theme="dark"]` or `&:where(.dark, .dark *)`. Selector lists at the
//! top level are rejected: a fragment must describe exactly one match target.
//! Block delimiters (`{`, `}`) and statement separators (`;`) are rejected
//! outside of quoted strings so a fragment can be spliced into generated CSS.
//!
//! Tokenizing is done by `cssparser`; this crate layers the selector grammar
//! on top.

mod parser;

use cssparser::{ParseErrorKind, Parser, ParserInput};

/// Reasons a selector fragment is rejected.
///
/// Offsets are byte offsets into the trimmed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("unexpected '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("unexpected end of selector while reading {0}")]
    UnexpectedEnd(&'static str),

    #[error("combinator at offset {offset} is not followed by a selector")]
    DanglingCombinator { offset: usize },

    #[error("'{open}' opened at offset {offset} is never closed")]
    Unclosed { open: char, offset: usize },

    #[error("selector lists are not allowed (',' at offset {offset})")]
    SelectorList { offset: usize },

    #[error("malformed selector: {0}")]
    Malformed(String),
}

/// Validate a selector fragment.
///
/// Leading and trailing whitespace is ignored.
pub fn validate_selector(input: &str) -> Result<(), SelectorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Empty);
    }
    // The tokenizer reads a trailing `\` as an escaped U+FFFD, which would
    // swallow whatever follows the fragment once spliced into a rule.
    if trimmed.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1 {
        return Err(SelectorError::UnexpectedEnd("escape"));
    }

    let mut input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut input);
    let result = parser::fragment(&mut parser);
    result.map_err(|e| match e.kind {
        ParseErrorKind::Custom(error) => error,
        ParseErrorKind::Basic(kind) => SelectorError::Malformed(format!("{:?}", kind)),
    })
}

/// Check whether a selector fragment is valid.
pub fn is_valid_selector(input: &str) -> bool {
    validate_selector(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_dark_mode_selectors() {
        for sel in [
            ".dark",
            "html.dark",
            "#app.dark",
            "[data-theme=\"dark\"]",
            "[data-mode=dark]",
            ":root[data-theme='dark' i]",
            ":is(.dark *)",
            "&:where(.dark, .dark *)",
            "body > .dark",
            ".theme ~ .panel + .dark",
            ".dark\\:mode",
            "::backdrop",
            "*",
            ".--token",
        ] {
            assert!(is_valid_selector(sel), "expected '{}' to be valid", sel);
        }
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(validate_selector("  .dark \n"), Ok(()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(validate_selector(""), Err(SelectorError::Empty));
        assert_eq!(validate_selector("   "), Err(SelectorError::Empty));
    }

    #[test]
    fn test_block_delimiters_rejected() {
        assert_eq!(
            validate_selector(".dark {"),
            Err(SelectorError::UnexpectedToken {
                token: "{".into(),
                offset: 6
            })
        );
        assert!(matches!(
            validate_selector(".a;.b"),
            Err(SelectorError::UnexpectedToken { ref token, offset: 2 }) if token == ";"
        ));
    }

    #[test]
    fn test_braces_allowed_inside_strings() {
        assert!(is_valid_selector("[data-x=\"{;}\"]"));
    }

    #[test]
    fn test_selector_list_rejected() {
        assert_eq!(
            validate_selector(".a, .b"),
            Err(SelectorError::SelectorList { offset: 2 })
        );
    }

    #[test]
    fn test_dangling_combinator() {
        assert_eq!(
            validate_selector(".dark >"),
            Err(SelectorError::DanglingCombinator { offset: 6 })
        );
        assert_eq!(
            validate_selector("> .dark"),
            Err(SelectorError::UnexpectedToken {
                token: ">".into(),
                offset: 0
            })
        );
    }

    #[test]
    fn test_bare_class_dot() {
        assert_eq!(
            validate_selector("."),
            Err(SelectorError::UnexpectedEnd("class name"))
        );
        assert!(validate_selector("..dark").is_err());
        assert!(validate_selector(".1dark").is_err());
        assert!(validate_selector("#1a").is_err());
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            validate_selector("[data-x"),
            Err(SelectorError::Unclosed { open: '[', offset: 0 })
        );
        assert_eq!(
            validate_selector(":is(.dark"),
            Err(SelectorError::Unclosed { open: '(', offset: 1 })
        );
        assert_eq!(
            validate_selector("[x=\"dark]"),
            Err(SelectorError::Unclosed { open: '"', offset: 3 })
        );
    }

    #[test]
    fn test_raw_pseudo_arguments() {
        assert!(is_valid_selector("li:nth-child(2n+1)"));
        assert!(is_valid_selector(":lang(en)"));
        assert!(validate_selector(":nth-child(2n").is_err());
    }

    #[test]
    fn test_trailing_escape() {
        assert_eq!(
            validate_selector(".dark\\"),
            Err(SelectorError::UnexpectedEnd("escape"))
        );
    }

    #[test]
    fn test_namespace_selectors() {
        for sel in ["svg|rect", "*|*", "|a", "ns|*", "[xlink|href]", "[*|lang]", "[|id]", "[lang|=en]"] {
            assert!(is_valid_selector(sel), "expected '{}' to be valid", sel);
        }
        assert!(validate_selector("svg|").is_err());
        assert!(validate_selector("[*]").is_err());
    }

    #[test]
    fn test_selector_arguments() {
        assert!(is_valid_selector(":not(:is(.a, .b)) > .dark"));
        assert!(is_valid_selector("section:has(> img, + p)"));
        assert!(validate_selector(":is()").is_err());
        assert!(validate_selector(":where(.a {})").is_err());
        assert!(validate_selector(":lang(en;)").is_err());
    }

    #[test]
    fn test_comments_ignored() {
        assert!(is_valid_selector(".dark /* night */ .panel"));
    }
}
