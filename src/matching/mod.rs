//! Reconciles an [`AssertionDocument`] with a [`DumpDocument`].
//!
//! Assertions are consumed window by window:
//!
//! ```text
//! 1. a (possibly empty) run of leading NOT assertions,
//! 2. one in-order assertion, or a maximal run of consecutive DAG
//!    assertions, matched greedily first-fit against unclaimed output
//!    lines at or after the cursor.
//! ```
//!
//! The NOT assertions of a window are then checked against the output lines
//! between the previous cursor and the window's earliest positive match;
//! trailing NOTs see the output tail. Variable bindings flow forward from
//! each successful positive match.

mod line;

use std::collections::HashMap;

use crate::check::{Assertion, AssertionDocument, TestCase, Variant};
use crate::diag::{CheckError, Result};
use crate::dump::{DumpDocument, PassGroup};

/// Variable bindings captured while matching one test case.
pub type Bindings = HashMap<String, String>;

/// Match every test case of `checker` against `dump`, stopping at the
/// first failure.
///
/// # Errors
///
/// Returns the failure of the first test case that does not hold, or a
/// missing pass group.
pub fn match_documents(checker: &AssertionDocument, dump: &DumpDocument) -> Result<()> {
    for case in &checker.cases {
        match_case(checker, case, dump)?;
    }
    Ok(())
}

/// Match a single test case against the pass group of the same name.
///
/// # Errors
///
/// Returns an error if the dump has no group named after the case, or if
/// any assertion of the case fails.
pub fn match_case(checker: &AssertionDocument, case: &TestCase, dump: &DumpDocument) -> Result<()> {
    let file = checker.file_name.as_str();
    let group = dump
        .find_group(&case.name)
        .ok_or_else(|| CheckError::PassGroupNotFound {
            file: file.to_string(),
            line: case.start_line,
            name: case.name.clone(),
        })?;

    let mut vars = Bindings::new();
    let mut cursor = 0;
    let mut remaining = case.assertions.as_slice();

    while !remaining.is_empty() {
        let (negatives, positives, rest) = next_window(remaining);
        remaining = rest;

        let outcome = match_positives(file, positives, group, cursor, &vars)?;

        // The negatives see the bindings from before this window's
        // positives; new bindings are adopted only after the check.
        check_negatives(file, negatives, group, cursor, outcome.window_start, &vars)?;

        cursor = outcome.next_cursor;
        vars = outcome.vars;
    }
    Ok(())
}

/// Split off the next window: leading NOT assertions, then either one
/// in-order assertion or a maximal run of DAG assertions.
fn next_window(assertions: &[Assertion]) -> (&[Assertion], &[Assertion], &[Assertion]) {
    let split = |slice: &[Assertion], variant: Variant| {
        slice.iter().take_while(|a| a.variant == variant).count()
    };

    let not_len = split(assertions, Variant::Not);
    let (negatives, rest) = assertions.split_at(not_len);

    let positive_len = match rest.first().map(|a| a.variant) {
        Some(Variant::InOrder) => 1,
        Some(Variant::Dag) => split(rest, Variant::Dag),
        Some(Variant::Not) | None => 0,
    };
    let (positives, rest) = rest.split_at(positive_len);
    (negatives, positives, rest)
}

struct PositiveOutcome {
    /// Index of the earliest line claimed by this window's positives;
    /// the end of the preceding NOT window. Body length when the window
    /// has no positives.
    window_start: usize,
    /// One past the latest claimed line.
    next_cursor: usize,
    vars: Bindings,
}

/// Find a distinct output line at or after `cursor` for every positive
/// assertion, greedily in source order, threading bindings through.
fn match_positives(
    file: &str,
    positives: &[Assertion],
    group: &PassGroup,
    cursor: usize,
    vars: &Bindings,
) -> Result<PositiveOutcome> {
    if positives.is_empty() {
        return Ok(PositiveOutcome {
            window_start: group.body.len(),
            next_cursor: group.body.len(),
            vars: vars.clone(),
        });
    }

    let mut vars = vars.clone();
    let mut claimed: Vec<usize> = Vec::with_capacity(positives.len());
    for assertion in positives {
        let found = find_first_match(file, assertion, group, cursor, &claimed, &vars)?;
        let Some((idx, new_vars)) = found else {
            return Err(CheckError::UnmatchedAssertion {
                file: file.to_string(),
                line: assertion.line,
                text: assertion.text.clone(),
                group: group.name.clone(),
                output_line: group.start_line + cursor,
            });
        };
        claimed.push(idx);
        vars = new_vars;
    }

    let window_start = claimed.iter().min().copied().unwrap_or(cursor);
    let last = claimed.iter().max().copied().unwrap_or(cursor);
    Ok(PositiveOutcome {
        window_start,
        next_cursor: last + 1,
        vars,
    })
}

/// First unclaimed output line at or after `cursor` that the assertion
/// matches, together with the bindings the match produced.
fn find_first_match(
    file: &str,
    assertion: &Assertion,
    group: &PassGroup,
    cursor: usize,
    claimed: &[usize],
    vars: &Bindings,
) -> Result<Option<(usize, Bindings)>> {
    for (idx, output_line) in group.body.iter().enumerate().skip(cursor) {
        if claimed.contains(&idx) {
            continue;
        }
        if let Some(new_vars) = line::match_line(file, assertion, output_line, vars)? {
            return Ok(Some((idx, new_vars)));
        }
    }
    Ok(None)
}

/// Every NOT assertion must fail to match every output line in
/// `[window_start, window_end)`.
fn check_negatives(
    file: &str,
    negatives: &[Assertion],
    group: &PassGroup,
    window_start: usize,
    window_end: usize,
    vars: &Bindings,
) -> Result<()> {
    for assertion in negatives {
        for idx in window_start..window_end {
            if line::match_line(file, assertion, &group.body[idx], vars)?.is_some() {
                return Err(CheckError::ForbiddenMatch {
                    file: file.to_string(),
                    line: assertion.line,
                    text: assertion.text.clone(),
                    group: group.name.clone(),
                    output_line: group.start_line + idx,
                });
            }
        }
    }
    Ok(())
}
