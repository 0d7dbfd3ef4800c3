//! Structured failure reporting. Every variant that originates in a file
//! carries the file name and 1-based line number of the offending input.

pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{file}:{line}: assertion appears before the first {prefix}-START directive")]
    AssertionOutsideCase {
        file: String,
        line: usize,
        prefix: String,
    },

    #[error("{file}:{line}: test case has no name")]
    UnnamedCase { file: String, line: usize },

    #[error("{file}:{line}: assertion has an empty body")]
    EmptyAssertion { file: String, line: usize },

    #[error("{file}:{line}: negative assertions cannot define variables")]
    VarDefInNegative { file: String, line: usize },

    #[error("{file}:{line}: expected a pass name after begin_cfg")]
    PassNameExpected { file: String, line: usize },

    #[error("{file}:{line}: cfg block without a preceding method header")]
    CfgWithoutMethod { file: String, line: usize },

    #[error("{file}:{line}: line lies outside any block")]
    LineOutsideBlock { file: String, line: usize },

    #[error("{file}:{line}: pass group \"{name}\" not found in the dump")]
    PassGroupNotFound {
        file: String,
        line: usize,
        name: String,
    },

    #[error("{file}:{line}: invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        file: String,
        line: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{file}:{line}: use of undefined variable \"{name}\"")]
    UndefinedVariable {
        file: String,
        line: usize,
        name: String,
    },

    #[error("{file}:{line}: multiple definitions of variable \"{name}\"")]
    VariableRedefinition {
        file: String,
        line: usize,
        name: String,
    },

    #[error(
        "{file}:{line}: could not match \"{text}\" in group \"{group}\" \
         starting from output line {output_line}"
    )]
    UnmatchedAssertion {
        file: String,
        line: usize,
        text: String,
        group: String,
        output_line: usize,
    },

    #[error("{file}:{line}: forbidden \"{text}\" matches output line {output_line} of group \"{group}\"")]
    ForbiddenMatch {
        file: String,
        line: usize,
        text: String,
        group: String,
        output_line: usize,
    },
}

#[cfg(test)]
impl PartialEq for CheckError {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}
