//! Selector grammar over the `cssparser` tokenizer.
//!
//! Only structure is checked; no selector tree is built.

use cssparser::{ParseError, Parser, SourcePosition, Token};

use crate::SelectorError;

pub(crate) type ParseResult<'i, T> = Result<T, ParseError<'i, SelectorError>>;

/// Functional pseudo-classes whose arguments are a selector list.
const SELECTOR_FUNCTIONS: &[&str] = &[
    "is",
    "where",
    "not",
    "has",
    "matches",
    "-webkit-any",
    "-moz-any",
    "host",
    "host-context",
    "slotted",
];

/// A single complex selector followed by the end of input.
pub(crate) fn fragment<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    complex(p, false)?;
    skip_ws(p);
    match next(p) {
        None => Ok(()),
        Some((start, Token::Comma)) => fail(
            p,
            SelectorError::SelectorList {
                offset: start.byte_index(),
            },
        ),
        Some((start, _)) => unexpected(p, start),
    }
}

/// Next token other than a comment, with the position it starts at.
fn next<'i>(p: &mut Parser<'i, '_>) -> Option<(SourcePosition, Token<'i>)> {
    let start = p.position();
    p.next_including_whitespace().ok().cloned().map(|token| (start, token))
}

fn peek<'i>(p: &mut Parser<'i, '_>) -> Option<Token<'i>> {
    let state = p.state();
    let token = p.next_including_whitespace().ok().cloned();
    p.reset(&state);
    token
}

fn skip_ws(p: &mut Parser<'_, '_>) -> bool {
    let mut skipped = false;
    loop {
        let state = p.state();
        if !matches!(p.next_including_whitespace(), Ok(Token::WhiteSpace(_))) {
            p.reset(&state);
            return skipped;
        }
        skipped = true;
    }
}

fn fail<'i, T>(p: &Parser<'i, '_>, error: SelectorError) -> ParseResult<'i, T> {
    Err(p.new_custom_error(error))
}

fn unexpected<'i, T>(p: &Parser<'i, '_>, start: SourcePosition) -> ParseResult<'i, T> {
    fail(
        p,
        SelectorError::UnexpectedToken {
            token: p.slice_from(start).to_string(),
            offset: start.byte_index(),
        },
    )
}

fn end<'i, T>(p: &Parser<'i, '_>, what: &'static str) -> ParseResult<'i, T> {
    fail(p, SelectorError::UnexpectedEnd(what))
}

/// Compounds joined by combinators. A relative selector (`:has(> img)`) may
/// open with a combinator.
fn complex<'i>(p: &mut Parser<'i, '_>, relative: bool) -> ParseResult<'i, ()> {
    if relative {
        skip_ws(p);
        if combinator(p) {
            skip_ws(p);
        }
    }
    compound(p)?;

    loop {
        let state = p.state();
        let had_ws = skip_ws(p);
        let at = p.position();
        let explicit = combinator(p);
        if explicit {
            skip_ws(p);
        } else if !had_ws {
            return Ok(());
        }

        match peek(p) {
            Some(token) if starts_compound(&token) => compound(p)?,
            _ if explicit => {
                return fail(
                    p,
                    SelectorError::DanglingCombinator {
                        offset: at.byte_index(),
                    },
                )
            }
            _ => {
                p.reset(&state);
                return Ok(());
            }
        }
    }
}

fn combinator(p: &mut Parser<'_, '_>) -> bool {
    let state = p.state();
    if matches!(
        p.next_including_whitespace(),
        Ok(Token::Delim('>' | '+' | '~'))
    ) {
        return true;
    }
    p.reset(&state);
    false
}

fn starts_compound(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::Delim('*' | '.' | '&' | '|')
            | Token::IDHash(_)
            | Token::Hash(_)
            | Token::SquareBracketBlock
            | Token::Colon
    )
}

/// An optional type selector followed by ids, classes, attributes,
/// pseudo-classes and `&`, with no whitespace in between.
fn compound<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    let mut parts = usize::from(type_selector(p)?);

    loop {
        let state = p.state();
        let Some((start, token)) = next(p) else { break };
        match token {
            Token::IDHash(_) | Token::Delim('&') => {}
            Token::Hash(_) => return unexpected(p, start),
            Token::Delim('.') => class_name(p)?,
            Token::SquareBracketBlock => block(p, start, ('[', ']'), attribute)?,
            Token::Colon => pseudo(p)?,
            _ => {
                p.reset(&state);
                break;
            }
        }
        parts += 1;
    }

    if parts == 0 {
        return match next(p) {
            None => end(p, "selector"),
            Some((start, _)) => unexpected(p, start),
        };
    }
    Ok(())
}

/// `name`, `*`, `ns|name`, `*|name`, `|name` (and `*` in place of `name`).
fn type_selector<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, bool> {
    let state = p.state();
    match next(p) {
        Some((_, Token::Ident(_) | Token::Delim('*'))) => {
            let after = p.state();
            if matches!(next(p), Some((_, Token::Delim('|')))) {
                qualified_name(p, true)?;
            } else {
                p.reset(&after);
            }
            Ok(true)
        }
        Some((_, Token::Delim('|'))) => {
            qualified_name(p, true)?;
            Ok(true)
        }
        _ => {
            p.reset(&state);
            Ok(false)
        }
    }
}

/// The local name after a namespace bar.
fn qualified_name<'i>(p: &mut Parser<'i, '_>, allow_star: bool) -> ParseResult<'i, ()> {
    match next(p) {
        Some((_, Token::Ident(_))) => Ok(()),
        Some((_, Token::Delim('*'))) if allow_star => Ok(()),
        Some((start, _)) => unexpected(p, start),
        None => end(p, "name"),
    }
}

fn class_name<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    match next(p) {
        Some((_, Token::Ident(_))) => Ok(()),
        Some((start, _)) => unexpected(p, start),
        None => end(p, "class name"),
    }
}

/// After the first `:` of a pseudo-class or pseudo-element.
fn pseudo<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    let state = p.state();
    if !matches!(p.next_including_whitespace(), Ok(Token::Colon)) {
        p.reset(&state);
    }

    match next(p) {
        Some((_, Token::Ident(_))) => Ok(()),
        Some((start, Token::Function(name))) => {
            let takes_selectors = SELECTOR_FUNCTIONS
                .iter()
                .any(|f| name.eq_ignore_ascii_case(f));
            let relative = name.eq_ignore_ascii_case("has");
            block(p, start, ('(', ')'), |p| {
                if takes_selectors {
                    selector_list(p, relative)
                } else {
                    raw_arguments(p)
                }
            })
        }
        Some((start, _)) => unexpected(p, start),
        None => end(p, "pseudo-class"),
    }
}

/// Parse the contents of the block whose opening token starts at `start`.
///
/// The tokenizer closes blocks implicitly at the end of input, so the
/// closing delimiter is checked against the source.
fn block<'i, F>(
    p: &mut Parser<'i, '_>,
    start: SourcePosition,
    (open, close): (char, char),
    parse: F,
) -> ParseResult<'i, ()>
where
    F: for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> ParseResult<'i, ()>,
{
    p.parse_nested_block(parse)?;
    if !closed_by(p.slice_from(start), close) {
        return fail(
            p,
            SelectorError::Unclosed {
                open,
                offset: start.byte_index(),
            },
        );
    }
    Ok(())
}

/// Whether `text` ends with an unescaped `close`.
fn closed_by(text: &str, close: char) -> bool {
    match text.strip_suffix(close) {
        Some(rest) => rest.chars().rev().take_while(|&c| c == '\\').count() % 2 == 0,
        None => false,
    }
}

fn quoted_string<'i>(p: &Parser<'i, '_>, start: SourcePosition) -> ParseResult<'i, ()> {
    let text = p.slice_from(start);
    let quote = text.chars().next().unwrap_or('"');
    if text.len() >= 2 && closed_by(&text[1..], quote) {
        Ok(())
    } else {
        fail(
            p,
            SelectorError::Unclosed {
                open: quote,
                offset: start.byte_index(),
            },
        )
    }
}

/// `[name]`, `[ns|name]`, `[name op value]`, `[name op value i]`.
fn attribute<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    skip_ws(p);
    match next(p) {
        Some((_, Token::Ident(_))) => {
            let state = p.state();
            if matches!(next(p), Some((_, Token::Delim('|')))) {
                qualified_name(p, false)?;
            } else {
                p.reset(&state);
            }
        }
        Some((_, Token::Delim('*'))) => match next(p) {
            Some((_, Token::Delim('|'))) => qualified_name(p, false)?,
            Some((start, _)) => return unexpected(p, start),
            None => return end(p, "attribute name"),
        },
        Some((_, Token::Delim('|'))) => qualified_name(p, false)?,
        Some((start, _)) => return unexpected(p, start),
        None => return end(p, "attribute name"),
    }

    skip_ws(p);
    match next(p) {
        None => return Ok(()),
        Some((
            _,
            Token::Delim('=')
            | Token::IncludeMatch
            | Token::DashMatch
            | Token::PrefixMatch
            | Token::SuffixMatch
            | Token::SubstringMatch,
        )) => {}
        Some((start, _)) => return unexpected(p, start),
    }

    skip_ws(p);
    match next(p) {
        Some((_, Token::Ident(_))) => {}
        Some((start, Token::QuotedString(_))) => quoted_string(p, start)?,
        Some((start, _)) => return unexpected(p, start),
        None => return end(p, "attribute value"),
    }

    skip_ws(p);
    match next(p) {
        None => return Ok(()),
        Some((_, Token::Ident(flag)))
            if flag.eq_ignore_ascii_case("i") || flag.eq_ignore_ascii_case("s") => {}
        Some((start, _)) => return unexpected(p, start),
    }

    skip_ws(p);
    match next(p) {
        None => Ok(()),
        Some((start, _)) => unexpected(p, start),
    }
}

/// Comma-separated selectors inside `:is()`, `:not()`, `:has()` and friends.
fn selector_list<'i>(p: &mut Parser<'i, '_>, relative: bool) -> ParseResult<'i, ()> {
    loop {
        skip_ws(p);
        complex(p, relative)?;
        skip_ws(p);
        match next(p) {
            None => return Ok(()),
            Some((_, Token::Comma)) => {}
            Some((start, _)) => return unexpected(p, start),
        }
    }
}

/// Arguments such as `2n+1` or `en`. Anything goes except block and
/// statement delimiters.
fn raw_arguments<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, ()> {
    let mut empty = true;
    while let Some((start, token)) = next(p) {
        match token {
            Token::WhiteSpace(_) => continue,
            Token::CurlyBracketBlock
            | Token::CloseCurlyBracket
            | Token::Semicolon
            | Token::BadString(_)
            | Token::BadUrl(_) => return unexpected(p, start),
            Token::QuotedString(_) => quoted_string(p, start)?,
            Token::ParenthesisBlock | Token::Function(_) => {
                block(p, start, ('(', ')'), raw_arguments)?
            }
            Token::SquareBracketBlock => block(p, start, ('[', ']'), raw_arguments)?,
            _ => {}
        }
        empty = false;
    }

    if empty {
        end(p, "arguments")
    } else {
        Ok(())
    }
}
