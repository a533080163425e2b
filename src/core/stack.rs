//! Operand stack for the befunge-plus virtual machine.
//!
//! Popping or peeking an empty stack yields the zero integer instead of
//! failing; many instructions rely on that. The stack is also the collector's
//! root set, exposed through [`Stack::as_slice`].

use std::fmt;
use super::value::Value;
use super::error::{BefError, BefResult};
use super::position::Position;

/// Default stack capacity in values (2^20 words).
pub const STACK_SIZE: usize = 1 << 20;

/// The operand stack.
#[derive(Clone, Default)]
pub struct Stack {
    elements: Vec<Value>,
    max_depth: usize,
}

impl Stack {
    /// Create a new empty stack with unlimited depth.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            max_depth: 0, // 0 means unlimited
        }
    }

    /// Create a stack with a maximum depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            elements: Vec::new(),
            max_depth,
        }
    }

    /// Get the current depth of the stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    /// Check if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Push a value with overflow checking.
    pub fn push_checked(&mut self, value: Value, position: Position) -> BefResult<()> {
        if self.max_depth > 0 && self.elements.len() >= self.max_depth {
            return Err(BefError::StackOverflow {
                max_depth: self.max_depth,
                position,
            });
        }
        self.elements.push(value);
        Ok(())
    }

    /// Push a value without checking.
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.elements.push(value);
    }

    /// Pop the top value, or zero if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Value {
        self.elements.pop().unwrap_or(Value::ZERO)
    }

    /// The top value, or zero if the stack is empty.
    #[inline]
    pub fn peek(&self) -> Value {
        self.elements.last().copied().unwrap_or(Value::ZERO)
    }

    /// Pop two values, returning them in push order `(v1, v2)`; `v2` was on top.
    #[inline]
    pub fn pop_pair(&mut self) -> (Value, Value) {
        let v2 = self.pop();
        let v1 = self.pop();
        (v1, v2)
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stack{:?}", self.elements)
    }
}
