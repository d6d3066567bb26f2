//! Parser tests
//!
//! End-to-end behaviour of the parse engine:
//! - Worked examples and statement coverage
//! - Error recovery and diagnostics
//! - Incremental reparsing
//! - Table persistence
//! - Property tests over generated files and edits
//! - Deeply nested input

mod tests_deep_input;
mod tests_incremental;
mod tests_language;
mod tests_properties;
mod tests_recovery;
mod tests_scenarios;
mod tests_statements;
