//! Cons-cell heap for the befunge-plus virtual machine.
//!
//! A fixed-capacity arena of two-field blocks with a free list threaded
//! through the `head` field of free blocks, and a stop-the-world mark-sweep
//! collector that runs when the free list is exhausted.
//!
//! # Allocation regimes
//!
//! Until the first collection the arena is handed out by bumping the free
//! list head one slot at a time; cells past the bump point are not
//! materialised yet. After the first collection, allocation follows the links
//! written by the sweep. `collected_once` records which regime is active.
//!
//! # Marking
//!
//! The mark phase uses pointer reversal (Deutsch-Schorr-Waite): the field just
//! followed is overwritten with a back-link to the previous block and restored
//! on the way back, so traversal needs no recursion and no extra storage
//! proportional to depth. Mark bits and the "tail already explored" flags live
//! in bitsets indexed by block id rather than in the values themselves.
//!
//! Blocks are stored as two tagged words (see [`Value::to_word`]), so the
//! default arena occupies exactly its 2^24-word budget.

use std::time::Instant;

use super::error::{BefError, BefResult};
use super::value::{BlockId, Value};

/// Default arena size: a 2^24-word budget split into two-word blocks.
pub const HEAP_SIZE: usize = ((1 << 24) * std::mem::size_of::<u64>()) / (2 * std::mem::size_of::<u64>());

/// A single cons cell, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub head: Value,
    pub tail: Value,
}

/// Arena storage for one block: both fields in the tagged-word layout, so a
/// block costs two machine words.
#[derive(Debug, Clone, Copy)]
struct Slot {
    head: u64,
    tail: u64,
}

impl Slot {
    #[inline]
    fn new(head: Value, tail: Value) -> Self {
        Slot { head: head.to_word(), tail: tail.to_word() }
    }

    #[inline]
    fn head(self) -> Value {
        Value::from_word(self.head)
    }

    #[inline]
    fn tail(self) -> Value {
        Value::from_word(self.tail)
    }
}

/// One bit per arena slot.
#[derive(Debug, Clone)]
struct MarkBits {
    words: Vec<u64>,
}

impl MarkBits {
    fn new(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)] }
    }

    #[inline]
    fn get(&self, i: usize) -> bool {
        self.words[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    fn clear(&mut self, i: usize) {
        self.words[i / 64] &= !(1 << (i % 64));
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Collector statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Number of collections run.
    pub collections: u64,
    /// Free cells produced by the most recent collection.
    pub last_reclaimed: usize,
    /// Free cells produced over all collections.
    pub total_reclaimed: u64,
    /// Wall time of the most recent collection.
    pub last_duration_us: u64,
}

/// The cons-cell heap.
pub struct Heap {
    cells: Vec<Slot>,
    capacity: usize,
    /// Next block to hand out. Equal to `end()` when nothing is free.
    free_list: BlockId,
    /// Number of blocks linked into the free list (not counting the
    /// unmaterialised tail of the arena).
    listed_free: usize,
    collected_once: bool,
    marked: MarkBits,
    tail_explored: MarkBits,
    stats: GcStats,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Create a heap with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(HEAP_SIZE)
    }

    /// Create a heap holding at most `capacity` blocks.
    pub fn with_capacity(capacity: usize) -> Self {
        // u32::MAX is reserved for BlockId::MARKED_NULL
        let capacity = capacity.min(u32::MAX as usize - 1);
        Heap {
            cells: Vec::new(),
            capacity,
            free_list: BlockId(0),
            listed_free: 0,
            collected_once: false,
            marked: MarkBits::new(capacity),
            tail_explored: MarkBits::new(capacity),
            stats: GcStats::default(),
        }
    }

    /// One past the last block; the free list is empty when its head is here.
    #[inline]
    fn end(&self) -> BlockId {
        BlockId(self.capacity as u32)
    }

    /// First block that has never been handed out.
    #[inline]
    fn frontier(&self) -> BlockId {
        BlockId(self.cells.len() as u32)
    }

    /// Allocate a block holding `(head, tail)`.
    ///
    /// If nothing is free, collects garbage first, treating `roots` (the
    /// operand stack) as the only references into the heap. Fails with
    /// `OutOfMemory` when the collection frees nothing.
    pub fn alloc(&mut self, head: Value, tail: Value, roots: &[Value]) -> BefResult<BlockId> {
        if self.free_list == self.end() {
            self.collect(roots)?;
        }

        let id = self.free_list;
        if !self.collected_once || id == self.frontier() {
            // Bump: the block has never been used
            self.cells.push(Slot::new(head, tail));
            self.free_list = BlockId(id.0 + 1);
        } else {
            self.free_list = Self::link(self.cells[id.index()].head())?;
            self.cells[id.index()] = Slot::new(head, tail);
            self.listed_free -= 1;
        }
        Ok(id)
    }

    /// Get the head of a block.
    #[inline]
    pub fn head(&self, id: BlockId) -> Value {
        self.cells[id.index()].head()
    }

    /// Get the tail of a block.
    #[inline]
    pub fn tail(&self, id: BlockId) -> Value {
        self.cells[id.index()].tail()
    }

    /// Get a copy of a block.
    #[inline]
    pub fn block(&self, id: BlockId) -> Block {
        let slot = self.cells[id.index()];
        Block { head: slot.head(), tail: slot.tail() }
    }

    /// Overwrite both fields of an allocated block.
    #[inline]
    pub fn set(&mut self, id: BlockId, head: Value, tail: Value) {
        self.cells[id.index()] = Slot::new(head, tail);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocks handed out at least once.
    pub fn touched(&self) -> usize {
        self.cells.len()
    }

    /// Blocks available without collecting.
    pub fn free_count(&self) -> usize {
        self.listed_free + (self.capacity - self.cells.len())
    }

    /// Blocks in use (live or not yet collected).
    pub fn live_count(&self) -> usize {
        self.cells.len() - self.listed_free
    }

    /// Whether any collection has run.
    pub fn has_collected(&self) -> bool {
        self.collected_once
    }

    pub fn stats(&self) -> GcStats {
        self.stats
    }

    /// Number of marked blocks. Outside a collection this is always zero.
    pub fn marked_count(&self) -> usize {
        self.marked.count() + self.tail_explored.count()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Garbage Collection
    // ═══════════════════════════════════════════════════════════════════

    /// Run a full mark-sweep collection. Returns the number of free blocks
    /// linked by the sweep.
    pub fn collect(&mut self, roots: &[Value]) -> BefResult<usize> {
        let started = Instant::now();

        // Top of stack first
        for root in roots.iter().rev() {
            if let Value::Ref(target) = *root {
                self.mark_from(target)?;
            }
        }

        let reclaimed = self.sweep();
        self.collected_once = true;

        let duration_us = started.elapsed().as_micros() as u64;
        self.stats.collections += 1;
        self.stats.last_reclaimed = reclaimed;
        self.stats.total_reclaimed += reclaimed as u64;
        self.stats.last_duration_us = duration_us;

        crate::audit_log!(
            action = "GC",
            entity = ("Heap", self.stats.collections.to_string()),
            description = format!("Reclaimed {} of {} cells", reclaimed, self.cells.len()),
            category = Heap,
            duration_us = duration_us,
            meta = { live: self.live_count() },
        );

        if self.free_list == self.end() {
            crate::audit_log!(
                action = "GC",
                entity = ("Heap", self.stats.collections.to_string()),
                description = "Collection freed nothing",
                category = Heap,
                severity = Critical,
                outcome = Failure,
            );
            return Err(BefError::OutOfMemory { capacity: self.capacity });
        }
        Ok(reclaimed)
    }

    /// Mark everything reachable from `root` by pointer reversal.
    fn mark_from(&mut self, root: BlockId) -> BefResult<()> {
        let mut prev = BlockId::MARKED_NULL;
        let mut cur = root;
        self.marked.set(cur.index());

        loop {
            let slot = self.cells[cur.index()];
            let (head, tail) = (slot.head(), slot.tail());

            if let Some(next) = self.unmarked_target(head) {
                // Descend through head, leaving a back-link behind
                self.cells[cur.index()].head = Value::Ref(prev).to_word();
                prev = cur;
                cur = next;
                self.marked.set(cur.index());
            } else if let Some(next) = self.unmarked_target(tail) {
                // Record that the tail is the field holding the back-link
                self.tail_explored.set(cur.index());
                self.cells[cur.index()].tail = Value::Ref(prev).to_word();
                prev = cur;
                cur = next;
                self.marked.set(cur.index());
            } else {
                let child = cur;
                cur = prev;
                if cur == BlockId::MARKED_NULL {
                    return Ok(());
                }

                let slot = &mut self.cells[cur.index()];
                if !self.tail_explored.get(cur.index()) {
                    prev = Self::link(slot.head())?;
                    slot.head = Value::Ref(child).to_word();
                } else {
                    prev = Self::link(slot.tail())?;
                    slot.tail = Value::Ref(child).to_word();
                }
            }
        }
    }

    /// The block `v` refers to, if it has not been marked yet.
    #[inline]
    fn unmarked_target(&self, v: Value) -> Option<BlockId> {
        match v {
            Value::Ref(id) if id != BlockId::MARKED_NULL && !self.marked.get(id.index()) => Some(id),
            _ => None,
        }
    }

    /// Read a link (free-list or back-link) stored in a field.
    #[inline]
    fn link(v: Value) -> BefResult<BlockId> {
        v.as_ref().ok_or_else(|| BefError::Internal {
            message: format!("heap link field holds {:?}", v),
        })
    }

    /// Unmark survivors and rebuild the free list from everything else.
    fn sweep(&mut self) -> usize {
        // Blocks already on the free list are unmarked and get relinked below
        self.free_list = self.frontier();
        self.listed_free = 0;

        for i in 0..self.cells.len() {
            if self.marked.get(i) {
                self.marked.clear(i);
                self.tail_explored.clear(i);
            } else {
                self.cells[i] = Slot::new(Value::Ref(self.free_list), Value::ZERO);
                self.free_list = BlockId(i as u32);
                self.listed_free += 1;
            }
        }
        self.listed_free
    }
}
