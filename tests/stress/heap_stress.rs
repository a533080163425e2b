//! Stress tests for the heap and the operand stack.
//!
//! These tests are ignored by default. Run with:
//! `cargo test --release -- --ignored`
//!
//! Or run a specific test:
//! `cargo test --release stress_heap_churn -- --ignored`

use befunge_plus::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::*;

/// Walk a list from `list`, returning its heads in order.
fn heads(heap: &Heap, mut list: Value) -> Vec<i64> {
    let mut out = Vec::new();
    while let Some(id) = list.as_ref() {
        out.push(heap.head(id).as_int());
        list = heap.tail(id);
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// Heap Stress Tests
// ═══════════════════════════════════════════════════════════════════════════

/// Stress test: 1M allocations through a small arena with a changing root set.
///
/// Every rooted list must read back exactly as it was built.
#[test]
#[ignore]
fn stress_heap_churn_1m() {
    let mut heap = Heap::with_capacity(4096);
    let mut rng = StdRng::seed_from_u64(0xBEF);
    let mut roots: Vec<Value> = Vec::new();
    let mut expected: Vec<Vec<i64>> = Vec::new();

    for i in 0..1_000_000i64 {
        match rng.gen_range(0..10) {
            // Start a new rooted list
            0 if roots.len() < 32 => {
                let id = heap.alloc(Value::int(i), Value::ZERO, &roots).unwrap();
                roots.push(Value::Ref(id));
                expected.push(vec![i]);
            }
            // Drop a root
            1 if !roots.is_empty() => {
                let victim = rng.gen_range(0..roots.len());
                roots.swap_remove(victim);
                expected.swap_remove(victim);
            }
            // Grow a rooted list, unless it is getting long
            2 | 3 if !roots.is_empty() => {
                let which = rng.gen_range(0..roots.len());
                if expected[which].len() < 64 {
                    let id = heap.alloc(Value::int(i), roots[which], &roots).unwrap();
                    roots[which] = Value::Ref(id);
                    expected[which].insert(0, i);
                }
            }
            // Garbage
            _ => {
                heap.alloc(Value::int(i), Value::ZERO, &roots).unwrap();
            }
        }
        assert!(heap.live_count() <= heap.capacity());
    }

    assert!(heap.stats().collections > 100);
    assert_eq!(heap.marked_count(), 0);
    for (root, want) in roots.iter().zip(&expected) {
        assert_eq!(&heads(&heap, *root), want);
    }
}

/// Stress test: a 1M-cell list survives a collection.
///
/// Marking must not recurse on the native stack.
#[test]
#[ignore]
fn stress_deep_list_collection() {
    const LEN: i64 = 1_000_000;
    let mut heap = Heap::with_capacity(LEN as usize + 1);
    let mut list = Value::ZERO;
    for i in 0..LEN {
        let id = heap.alloc(Value::int(i), list, &[list]).unwrap();
        list = Value::Ref(id);
    }

    let reclaimed = heap.collect(&[list]).unwrap();
    assert_eq!(reclaimed, 0);
    assert_eq!(heap.live_count(), LEN as usize);

    let values = heads(&heap, list);
    assert_eq!(values.len(), LEN as usize);
    assert_eq!(values[0], LEN - 1);
    assert_eq!(values[values.len() - 1], 0);
}

/// Stress test: a long cyclic chain is marked once and kept.
#[test]
#[ignore]
fn stress_cycle_collection() {
    const LEN: usize = 100_000;
    let mut heap = Heap::with_capacity(LEN);
    let first = heap.alloc(Value::int(0), Value::ZERO, &[]).unwrap();
    let mut last = first;
    for i in 1..LEN {
        let id = heap.alloc(Value::int(i as i64), Value::ZERO, &[Value::Ref(first)]).unwrap();
        heap.set(last, heap.head(last), Value::Ref(id));
        last = id;
    }
    heap.set(last, heap.head(last), Value::Ref(first));

    // Full arena: the collection must find every block live
    let err = heap.alloc(Value::ZERO, Value::ZERO, &[Value::Ref(first)]).unwrap_err();
    assert_eq!(err, BefError::OutOfMemory { capacity: LEN });

    // Dropping the root frees the whole ring
    heap.alloc(Value::ZERO, Value::ZERO, &[]).unwrap();
    assert_eq!(heap.stats().last_reclaimed, LEN);
}

// ═══════════════════════════════════════════════════════════════════════════
// Program Stress Tests
// ═══════════════════════════════════════════════════════════════════════════

/// Stress test: 2M garbage cells allocated by a running program.
#[test]
#[ignore]
fn stress_program_garbage_2m() {
    let source = rows(&[
        "&>00c$1-:v",
        " ^       _@",
    ]);
    let config = ExecutorConfig::sandboxed(100_000_000).with_heap_capacity(4096);
    let run = run_with(&source, "2000000", config);
    let summary = run.result.unwrap();
    assert!(summary.gc.collections >= 2_000_000 / 4096);
    assert!(summary.live_cells <= 4096);
}

/// Stress test: 1M pushes then 1M pops on the operand stack.
#[test]
#[ignore]
fn stress_stack_push_pop_1m() {
    let mut stack = Stack::new();
    for i in 0..1_000_000i64 {
        stack.push(Value::int(i));
    }
    assert_eq!(stack.depth(), 1_000_000);
    for i in (0..1_000_000i64).rev() {
        assert_eq!(stack.pop(), Value::int(i));
    }
    assert!(stack.is_empty());
    assert_eq!(stack.pop(), Value::ZERO);
}
