//! Parser for the C1visualizer CFG dump format.
//!
//! The dump alternates `begin_compilation ... end_compilation` blocks, which
//! name the method being compiled, and `begin_cfg ... end_cfg` blocks, one
//! per compiler pass. Each cfg block becomes a [`PassGroup`] named
//! `"<method> <pass>"`; its body is opaque text for the matcher.

use crate::diag::{CheckError, Result};

/// The dump lines of one compiler pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassGroup {
    /// Composite `"<method> <pass>"` name.
    pub name: String,
    /// Absolute dump-file line number of the first body line.
    pub start_line: usize,
    /// Trimmed body lines, blank lines included so that
    /// `start_line + index` stays an exact file position.
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpDocument {
    pub file_name: String,
    pub groups: Vec<PassGroup>,
}

enum ParseState {
    /// Expecting `begin_compilation` or `begin_cfg`.
    Outside,
    /// Scanning a compilation block for its `method "<name>"` line.
    InCompilation,
    /// `begin_cfg` was seen; the next line must be `name "<pass>"`.
    StartingCfg,
    /// Accumulating body lines until `end_cfg`.
    InCfg,
}

/// Extract the quoted value of a `<keyword> "<value>"` line. Anything after
/// the closing quote is ignored.
fn quoted_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('"')?;
    match rest.find('"') {
        Some(0) | None => None,
        Some(end) => Some(&rest[..end]),
    }
}

impl DumpDocument {
    /// Run the block state machine over `content`.
    ///
    /// # Errors
    ///
    /// Returns an error for a cfg block before any method header, a missing
    /// pass name after `begin_cfg`, or content outside all blocks.
    pub fn parse(file_name: &str, content: &str) -> Result<Self> {
        let mut groups: Vec<PassGroup> = Vec::new();
        let mut current: Option<PassGroup> = None;
        let mut method: Option<String> = None;
        let mut state = ParseState::Outside;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() && !matches!(state, ParseState::InCfg) {
                continue;
            }

            match state {
                ParseState::Outside => {
                    if line == "begin_cfg" {
                        if method.is_none() {
                            return Err(CheckError::CfgWithoutMethod {
                                file: file_name.to_string(),
                                line: line_no,
                            });
                        }
                        state = ParseState::StartingCfg;
                    } else if line == "begin_compilation" {
                        state = ParseState::InCompilation;
                    } else {
                        return Err(CheckError::LineOutsideBlock {
                            file: file_name.to_string(),
                            line: line_no,
                        });
                    }
                }
                ParseState::InCompilation => {
                    if let Some(name) = quoted_value(line, "method") {
                        method = Some(name.to_string());
                    } else if line == "end_compilation" {
                        state = ParseState::Outside;
                    }
                }
                ParseState::StartingCfg => {
                    let Some(pass) = quoted_value(line, "name") else {
                        return Err(CheckError::PassNameExpected {
                            file: file_name.to_string(),
                            line: line_no,
                        });
                    };
                    let name = match &method {
                        Some(method) => format!("{method} {pass}"),
                        None => pass.to_string(),
                    };
                    current = Some(PassGroup {
                        name,
                        start_line: line_no + 1,
                        body: Vec::new(),
                    });
                    state = ParseState::InCfg;
                }
                ParseState::InCfg => {
                    if line == "end_cfg" {
                        groups.extend(current.take());
                        state = ParseState::Outside;
                    } else if let Some(group) = current.as_mut() {
                        group.body.push(line.to_string());
                    }
                }
            }
        }

        // A dump truncated inside a cfg block still yields the partial group.
        groups.extend(current);

        Ok(Self {
            file_name: file_name.to_string(),
            groups,
        })
    }

    /// First group with the given name, if any. A pass run several times
    /// dumps several groups of one name; the first always wins.
    pub fn find_group(&self, name: &str) -> Option<&PassGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}
