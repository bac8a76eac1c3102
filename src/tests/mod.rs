//! Internal test modules - whitebox tests with crate access
//!
//! Cross-module suites exercising the full decode → order → wrap → emit
//! pipeline, plus property-based tests for the ordering and width
//! invariants.
