//! Matches one assertion against one output line.
//!
//! The assertion's expressions are split at separators into words; the
//! output line is tokenized by whitespace. Words are matched greedily: each
//! assertion word consumes the first remaining output word it matches in
//! full, and output words skipped along the way are discarded.

use regex::Regex;

use crate::check::{Assertion, Expression};
use crate::diag::{CheckError, Result};
use crate::matching::Bindings;

/// Attempt to match `assertion` against `output_line` under `vars`.
/// Returns the extended bindings on success, `None` on a plain non-match.
///
/// # Errors
///
/// A reference to an unbound variable, a redefinition of a bound one, and
/// an invalid regex fragment are hard failures, not non-matches.
pub(super) fn match_line(
    file: &str,
    assertion: &Assertion,
    output_line: &str,
    vars: &Bindings,
) -> Result<Option<Bindings>> {
    // Bindings accumulate on a shadow copy; the caller's map is published
    // to only through the return value, and only on full success.
    let mut bound = vars.clone();

    let output_words: Vec<&str> = output_line.split_whitespace().collect();
    let mut next = 0;

    for word in assertion.expressions.split(|e| *e == Expression::Separator) {
        if word.is_empty() {
            continue;
        }
        let mut found = false;
        while next < output_words.len() {
            let candidate = output_words[next];
            next += 1;
            let mut trial = bound.clone();
            if match_word(file, assertion, word, candidate, &mut trial)? {
                bound = trial;
                found = true;
                break;
            }
        }
        if !found {
            return Ok(None);
        }
    }
    Ok(Some(bound))
}

/// Match the expressions of one assertion word against one output word.
/// Expressions consume the word left to right without gaps, each anchored
/// where the previous one ended; the word matches only when they consume
/// it entirely. Definitions bind as soon as their fragment matches, so a
/// variable is referenceable right after its definition.
fn match_word(
    file: &str,
    assertion: &Assertion,
    expressions: &[Expression],
    word: &str,
    vars: &mut Bindings,
) -> Result<bool> {
    let mut pos = 0;
    for expression in expressions {
        match expression {
            Expression::Separator => {}
            Expression::Text(text) => {
                if !word[pos..].starts_with(text.as_str()) {
                    return Ok(false);
                }
                pos += text.len();
            }
            Expression::VarRef(name) => {
                let Some(value) = vars.get(name) else {
                    return Err(CheckError::UndefinedVariable {
                        file: file.to_string(),
                        line: assertion.line,
                        name: name.clone(),
                    });
                };
                if !word[pos..].starts_with(value.as_str()) {
                    return Ok(false);
                }
                pos += value.len();
            }
            Expression::Pattern(pattern) => {
                match match_fragment(file, assertion, pattern, &word[pos..])? {
                    Some(len) => pos += len,
                    None => return Ok(false),
                }
            }
            Expression::VarDef { name, pattern } => {
                if vars.contains_key(name) {
                    return Err(CheckError::VariableRedefinition {
                        file: file.to_string(),
                        line: assertion.line,
                        name: name.clone(),
                    });
                }
                match match_fragment(file, assertion, pattern, &word[pos..])? {
                    Some(len) => {
                        vars.insert(name.clone(), word[pos..pos + len].to_string());
                        pos += len;
                    }
                    None => return Ok(false),
                }
            }
        }
    }
    Ok(pos == word.len())
}

/// Length consumed by `pattern` when anchored at the start of `haystack`.
fn match_fragment(
    file: &str,
    assertion: &Assertion,
    pattern: &str,
    haystack: &str,
) -> Result<Option<usize>> {
    let re = Regex::new(&format!("^(?:{pattern})")).map_err(|source| CheckError::InvalidPattern {
        file: file.to_string(),
        line: assertion.line,
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(re.find(haystack).map(|m| m.end()))
}
