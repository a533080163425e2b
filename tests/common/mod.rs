//! Shared test utilities for befunge-plus integration tests.
//!
//! This module provides:
//! - Program builders for multi-line and wide sources
//! - Run helpers that capture output in memory
//! - Assertion helpers for outcomes
//!
//! ## AAA Pattern
//!
//! All tests follow the Arrange-Act-Assert pattern:
//! - Arrange: Build the source and configuration
//! - Act: Run the program
//! - Assert: Verify output, status and heap state

#![allow(dead_code)]

use befunge_plus::*;

pub type TestVm<'a> = Vm<ReaderInput<&'a [u8]>, OutputBuffer>;

/// Outcome of a program run.
pub struct RunResult {
    pub output: String,
    pub result: BefResult<RunSummary>,
}

// =============================================================================
// Configuration Builders
// =============================================================================

/// Deterministic configuration with a generous step budget.
pub fn test_config() -> ExecutorConfig {
    ExecutorConfig::sandboxed(1_000_000)
}

/// Test configuration with a small heap.
pub fn small_heap_config(blocks: usize) -> ExecutorConfig {
    test_config().with_heap_capacity(blocks)
}

// =============================================================================
// Program Builders
// =============================================================================

/// Join rows into a program source.
pub fn rows(lines: &[&str]) -> String {
    lines.join("\n")
}

/// A row with `left` at column 0 and `right` ending at column 79.
pub fn spanning_row(left: &str, right: &str) -> String {
    let gap = GRID_WIDTH - left.len() - right.len();
    format!("{}{}{}", left, " ".repeat(gap), right)
}

pub const GRID_WIDTH: usize = befunge_plus::core::GRID_W;
pub const GRID_HEIGHT: usize = befunge_plus::core::GRID_H;

// =============================================================================
// Run Helpers
// =============================================================================

/// Build a VM for `source` reading from `input`.
pub fn build<'a>(source: &str, input: &'a str, config: ExecutorConfig) -> TestVm<'a> {
    let grid = Grid::from_source(source.as_bytes()).expect("test source should load");
    Vm::with_config(grid, ReaderInput::new(input.as_bytes()), OutputBuffer::new(), config)
}

/// Run a program with the given input and configuration.
pub fn run_with(source: &str, input: &str, config: ExecutorConfig) -> RunResult {
    let mut vm = build(source, input, config);
    let result = vm.run();
    RunResult {
        output: vm.output().to_string_lossy(),
        result,
    }
}

/// Run a program with no input.
pub fn run(source: &str) -> RunResult {
    run_with(source, "", test_config())
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Run a program that must halt and return its output.
pub fn output_of(source: &str) -> String {
    let run = run(source);
    if let Err(e) = &run.result {
        panic!("program failed: {}", e);
    }
    run.output
}

/// Run a program that must fail and return its error and partial output.
pub fn failure_of(source: &str) -> (BefError, String) {
    let run = run(source);
    match run.result {
        Ok(summary) => panic!("program halted after {} steps", summary.steps),
        Err(e) => (e, run.output),
    }
}
