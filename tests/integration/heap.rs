//! Cons cells and garbage collection driven through whole programs.

use crate::common::*;
use befunge_plus::*;

/// Builds the list (3 2 1) and prints it head first.
fn print_list_program() -> String {
    rows(&[
        r"01\c2\c3\c>    :v",
        "          ^ t.h:_@",
    ])
}

/// Builds the list (3 2 1), allocates and drops `n` cells read from
/// input, then prints the list.
fn churn_then_print_program() -> String {
    rows(&[
        r"01\c2\c3\c&>00c$1-:v",
        "           ^       _$     >   :v",
        "                          ^t.h:_@",
    ])
}

/// Allocates and drops `n` cells read from input.
fn garbage_loop_program() -> String {
    rows(&[
        "&>00c$1-:v",
        " ^       _@",
    ])
}

// ═══════════════════════════════════════════════════════════════════════════
// Cells
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cons_head_tail() {
    assert_eq!(output_of("12c:h.t.@"), "12");
}

#[test]
fn test_walk_list_to_nil() {
    // The last cell allocated first is block 0 and must still test as true
    let run = run_with(&print_list_program(), "", test_config());
    let summary = run.result.unwrap();
    assert_eq!(run.output, "321");
    assert_eq!(summary.live_cells, 3);
    assert_eq!(summary.gc.collections, 0);
}

#[test]
fn test_shared_tail_reads_same_cell() {
    // S = (R . R) with R = (1 . 2); both halves of S lead to the same head
    assert_eq!(output_of("12c:c:hh.th.@"), "11");
}

#[test]
fn test_head_of_integer_fails() {
    let (err, output) = failure_of("1.5h.@");
    assert_eq!(output, "1");
    assert_eq!(err, BefError::NotABlock { operation: 'h', position: Position::new(3, 0) });
    assert_eq!(err.category(), ErrorCategory::Runtime);
}

#[test]
fn test_tail_of_integer_fails() {
    let (err, _) = failure_of("5t@");
    assert!(matches!(err, BefError::NotABlock { operation: 't', .. }));
}

#[test]
fn test_reference_is_truthy() {
    // `!` of a reference to block 0 is 0
    assert_eq!(output_of("00c!.@"), "0");
}

// ═══════════════════════════════════════════════════════════════════════════
// Collection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_garbage_beyond_capacity_is_reclaimed() {
    let run = run_with(&garbage_loop_program(), "1000", small_heap_config(16));
    let summary = run.result.unwrap();
    assert!(summary.gc.collections > 0);
    assert!(summary.gc.total_reclaimed >= 1000 - 16);
    // The exhausted counter is left behind
    assert_eq!(summary.stack_depth, 1);
}

#[test]
fn test_rooted_list_survives_churn() {
    let run = run_with(&churn_then_print_program(), "200", small_heap_config(8));
    let summary = run.result.unwrap();
    assert_eq!(run.output, "321");
    assert!(summary.gc.collections > 0);
}

#[test]
fn test_no_collection_while_arena_has_room() {
    let run = run_with(&garbage_loop_program(), "100", small_heap_config(1000));
    let summary = run.result.unwrap();
    assert_eq!(summary.gc.collections, 0);
    assert_eq!(summary.live_cells, 100);
}

#[test]
fn test_all_live_is_out_of_memory() {
    // Every allocated reference stays on the stack
    let run = run_with(">00c", "", small_heap_config(16));
    assert_eq!(run.result.unwrap_err(), BefError::OutOfMemory { capacity: 16 });
}

#[test]
fn test_out_of_memory_exit_status() {
    let err = BefError::OutOfMemory { capacity: 4 };
    assert_eq!(err.category(), ErrorCategory::Heap);
    assert_eq!(err.exit_status(), 1);
}

#[test]
fn test_heap_state_after_run() {
    let mut vm = build(&print_list_program(), "", test_config());
    vm.run().unwrap();
    assert_eq!(*vm.status(), VmStatus::Halted);
    assert_eq!(vm.heap().touched(), 3);
    assert!(!vm.heap().has_collected());
}
