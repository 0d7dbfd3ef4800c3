use crate::check::lexer::RawAssertion;
use crate::check::{Assertion, Expression, Variant};
use crate::diag::{CheckError, Result};

/// Parse one assertion body into its expression sequence.
///
/// # Errors
///
/// Returns an error for an empty body and for a variable definition inside
/// a negative assertion.
pub(super) fn parse_assertion(file: &str, raw: &RawAssertion) -> Result<Assertion> {
    let expressions = parse_expressions(&raw.body);
    if expressions.is_empty() {
        return Err(CheckError::EmptyAssertion {
            file: file.to_string(),
            line: raw.line,
        });
    }
    if raw.variant == Variant::Not
        && expressions
            .iter()
            .any(|e| matches!(e, Expression::VarDef { .. }))
    {
        return Err(CheckError::VarDefInNegative {
            file: file.to_string(),
            line: raw.line,
        });
    }
    Ok(Assertion {
        variant: raw.variant,
        line: raw.line,
        text: raw.body.clone(),
        expressions,
    })
}

/// Scan the body left to right. At each position a whitespace run, a
/// `{{...}}` pattern or a `[[...]]` variable may begin; anything else is
/// accumulated as literal text up to the next position where one of them
/// does. A malformed special form never fails the parse, it reads as text.
fn parse_expressions(body: &str) -> Vec<Expression> {
    let mut expressions = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let ws = leading_whitespace(rest);
        if ws > 0 {
            expressions.push(Expression::Separator);
            rest = &rest[ws..];
        } else if let Some((len, expr)) = special_at(rest) {
            expressions.push(expr);
            rest = &rest[len..];
        } else {
            let end = next_special(rest);
            expressions.push(Expression::Text(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }
    expressions
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn special_at(s: &str) -> Option<(usize, Expression)> {
    pattern_at(s).or_else(|| variable_at(s))
}

/// `{{<body>}}` with a non-greedy body: the shortest non-empty body wins,
/// so `{{abc}}{{def}}` reads as two patterns.
fn pattern_at(s: &str) -> Option<(usize, Expression)> {
    let inner = s.strip_prefix("{{")?;
    let body_len = shortest_body(inner, "}}")?;
    Some((body_len + 4, Expression::Pattern(inner[..body_len].to_string())))
}

/// `[[name]]` or `[[name:<body>]]`. Names are `[A-Za-z][A-Za-z0-9]*`; the
/// first colon separates the name from a definition body.
fn variable_at(s: &str) -> Option<(usize, Expression)> {
    let inner = s.strip_prefix("[[")?;

    let mut name_len = 0;
    for (i, c) in inner.char_indices() {
        let valid = if i == 0 {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric()
        };
        if !valid {
            break;
        }
        name_len = i + c.len_utf8();
    }
    if name_len == 0 {
        return None;
    }

    let name = &inner[..name_len];
    let after = &inner[name_len..];
    if after.starts_with("]]") {
        return Some((name_len + 4, Expression::VarRef(name.to_string())));
    }

    let body = after.strip_prefix(':')?;
    let body_len = shortest_body(body, "]]")?;
    Some((
        name_len + body_len + 5,
        Expression::VarDef {
            name: name.to_string(),
            pattern: body[..body_len].to_string(),
        },
    ))
}

/// Length of the shortest non-empty prefix of `s` followed by `close`.
fn shortest_body(s: &str, close: &str) -> Option<usize> {
    let first = s.chars().next()?;
    let skip = first.len_utf8();
    s[skip..].find(close).map(|i| i + skip)
}

/// Offset of the next position at which a special form begins, or the
/// length of `s` if the remainder is all literal text.
fn next_special(s: &str) -> usize {
    for (i, _) in s.char_indices().skip(1) {
        let rest = &s[i..];
        if leading_whitespace(rest) > 0 || special_at(rest).is_some() {
            return i;
        }
    }
    s.len()
}
