use crate::check::Variant;
use crate::diag::{CheckError, Result};

/// An assertion body as extracted from its comment line, before expression
/// parsing.
#[derive(Debug)]
pub(super) struct RawAssertion {
    pub body: String,
    pub variant: Variant,
    pub line: usize,
}

#[derive(Debug)]
pub(super) struct RawCase {
    pub name: String,
    pub start_line: usize,
    pub assertions: Vec<RawAssertion>,
}

/// Strip a directive of the form `<comment> <keyword>:` from the start of
/// `line` and return the trimmed remainder. The comment marker must be the
/// first non-whitespace token and the keyword must be followed immediately
/// by a colon, so `ACHECK:` never passes for `CHECK:`.
fn strip_directive<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.trim_start();
    let rest = rest
        .strip_prefix("//")
        .or_else(|| rest.strip_prefix('#'))?
        .trim_start();
    let rest = rest.strip_prefix(keyword)?.strip_prefix(':')?;
    Some(rest.trim())
}

/// Scan `content` line by line and group assertion bodies under their
/// enclosing `-START` case. Non-directive lines are silently ignored.
pub(super) fn lex(file: &str, content: &str, prefix: &str) -> Result<Vec<RawCase>> {
    let start_keyword = format!("{prefix}-START");
    let dag_keyword = format!("{prefix}-DAG");
    let not_keyword = format!("{prefix}-NOT");

    let mut cases: Vec<RawCase> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(name) = strip_directive(line, &start_keyword) {
            if name.is_empty() {
                return Err(CheckError::UnnamedCase {
                    file: file.to_string(),
                    line: line_no,
                });
            }
            cases.push(RawCase {
                name: name.to_string(),
                start_line: line_no,
                assertions: Vec::new(),
            });
            continue;
        }

        let parsed = strip_directive(line, prefix)
            .map(|body| (body, Variant::InOrder))
            .or_else(|| strip_directive(line, &dag_keyword).map(|body| (body, Variant::Dag)))
            .or_else(|| strip_directive(line, &not_keyword).map(|body| (body, Variant::Not)));

        if let Some((body, variant)) = parsed {
            let Some(case) = cases.last_mut() else {
                return Err(CheckError::AssertionOutsideCase {
                    file: file.to_string(),
                    line: line_no,
                    prefix: prefix.to_string(),
                });
            };
            case.assertions.push(RawAssertion {
                body: body.to_string(),
                variant,
                line: line_no,
            });
        }
    }
    Ok(cases)
}
