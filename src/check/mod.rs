mod lexer;
mod parser;

use crate::diag::Result;

/// Ordering discipline of a single assertion.
///
/// ```text
/// CHECK:      InOrder   must match after the previous positive match
/// CHECK-DAG:  Dag       any order within a run of consecutive DAG lines
/// CHECK-NOT:  Not       must not match between surrounding positives
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    InOrder,
    Dag,
    Not,
}

/// One element of an assertion's pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Literal text, escaped when used as a pattern.
    Text(String),
    /// Embedded regex fragment (`{{...}}`), used verbatim.
    Pattern(String),
    /// Reference to a previously bound variable (`[[name]]`).
    VarRef(String),
    /// Named capture (`[[name:regex]]`).
    VarDef { name: String, pattern: String },
    /// Whitespace boundary between words of the assertion.
    Separator,
}

/// A single directive extracted from a source file. The original text and
/// line number are kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub variant: Variant,
    pub line: usize,
    pub text: String,
    pub expressions: Vec<Expression>,
}

/// Assertions grouped under one `-START` directive, matched against the
/// pass group of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub start_line: usize,
    pub assertions: Vec<Assertion>,
}

/// All test cases extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionDocument {
    pub file_name: String,
    pub cases: Vec<TestCase>,
}

impl AssertionDocument {
    /// Extract and parse every assertion in `content`. Lines that are not
    /// directives for `prefix` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for an assertion outside any test case, an unnamed
    /// test case, an empty assertion body, or a variable definition inside
    /// a negative assertion.
    pub fn parse(file_name: &str, content: &str, prefix: &str) -> Result<Self> {
        let mut cases = Vec::new();
        for raw_case in lexer::lex(file_name, content, prefix)? {
            let mut assertions = Vec::with_capacity(raw_case.assertions.len());
            for raw in &raw_case.assertions {
                assertions.push(parser::parse_assertion(file_name, raw)?);
            }
            cases.push(TestCase {
                name: raw_case.name,
                start_line: raw_case.start_line,
                assertions,
            });
        }
        Ok(Self {
            file_name: file_name.to_string(),
            cases,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diag::CheckError;

    #[test]
    fn document_groups_assertions_under_their_case() {
        let content = "\
// CHECK-START: Group1
// CHECK: foo
// CHECK-DAG: bar
// CHECK-START: Group2
// CHECK-NOT: abc
";
        let doc = AssertionDocument::parse("<test-file>", content, "CHECK").unwrap();
        assert_eq!(doc.cases.len(), 2);
        assert_eq!(doc.cases[0].name, "Group1");
        assert_eq!(doc.cases[0].assertions[0].variant, Variant::InOrder);
        assert_eq!(doc.cases[0].assertions[0].text, "foo");
        assert_eq!(doc.cases[0].assertions[1].variant, Variant::Dag);
        assert_eq!(doc.cases[1].assertions[0].variant, Variant::Not);
    }

    #[test]
    fn empty_assertion_body_fails_with_its_line() {
        let err = AssertionDocument::parse("<test-file>", "// CHECK-START: p\n// CHECK:\n", "CHECK")
            .unwrap_err();
        assert!(matches!(err, CheckError::EmptyAssertion { line: 2, .. }));
    }

    #[test]
    fn var_def_in_not_fails_with_its_line() {
        let content = "// CHECK-START: p\n// CHECK-NOT: [[X:abc]]\n";
        let err = AssertionDocument::parse("<test-file>", content, "CHECK").unwrap_err();
        assert!(matches!(err, CheckError::VarDefInNegative { line: 2, .. }));
    }
}
