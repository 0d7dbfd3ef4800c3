//! Core engine for checking compiler CFG dumps against embedded assertions.
//!
//! Source files carry `CHECK`-style comment directives grouped into test
//! cases; the compiler emits a C1visualizer dump split into pass groups.
//! [`check`] parses the directives, [`dump`] parses the dump, and
//! [`matching`] reconciles the two.

pub mod check;
pub mod diag;
pub mod discovery;
pub mod dump;
pub mod matching;
