//! Value type for befunge-plus: a 62-bit integer or a reference to a heap cell.
//!
//! As a machine word, bit 0 is the type tag and bit 1 is reserved for the
//! collector's mark. In memory the two kinds are a closed enum and the mark
//! lives in the heap's own bitset; the packed layout is available through
//! [`Value::to_word`] and [`Value::from_word`].
//!
//! Integer arithmetic wraps at 62 bits. Applying arithmetic to a reference is
//! a contract violation of the program: the result is meaningless but safe
//! (the block index stands in for the integer payload).

use std::ops::{Add, Sub, Mul, Div, Rem, Not};
use std::fmt;

use super::error::{BefError, BefResult, DivisionByZeroPolicy};
use super::position::Position;

/// Width of the integer payload.
pub const INT_BITS: u32 = 62;

/// Smallest representable integer (-2^61).
pub const INT_MIN: i64 = -(1 << (INT_BITS - 1));

/// Largest representable integer (2^61 - 1).
pub const INT_MAX: i64 = (1 << (INT_BITS - 1)) - 1;

/// Tag bit set on integer words.
pub const INT_TAG: u64 = 0b01;

/// Mark bit reserved in every word; never part of a value's meaning.
pub const MARK_BIT: u64 = 0b10;

/// Index of a block in the heap arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Back-link terminator used while the collector reverses pointers.
    /// Never a valid arena index.
    pub const MARKED_NULL: BlockId = BlockId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == BlockId::MARKED_NULL {
            write!(f, "BlockId(null)")
        } else {
            write!(f, "BlockId({})", self.0)
        }
    }
}

/// A value on the stack or in a heap cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed integer, always within `INT_MIN..=INT_MAX`.
    Int(i64),
    /// Reference to a cons cell.
    Ref(BlockId),
}

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Ref(id) => write!(f, "Ref({})", id.0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Ref(id) => write!(f, "<cell {}>", id.0),
        }
    }
}

/// Sign-extend the low 62 bits of `n`.
#[inline]
fn wrap62(n: i64) -> i64 {
    (n << 2) >> 2
}

impl Value {
    /// The zero integer; also what an empty stack yields.
    pub const ZERO: Value = Value::Int(0);

    /// The one integer.
    pub const ONE: Value = Value::Int(1);

    /// Create an integer value, wrapping into the 62-bit range.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(wrap62(n))
    }

    /// Create an integer from a character byte. Bytes are signed, as in the
    /// reference interpreter, so 0x80..=0xFF become negative.
    #[inline]
    pub fn from_char(c: u8) -> Self {
        Value::Int(c as i8 as i64)
    }

    /// Create 1 or 0.
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b { Value::ONE } else { Value::ZERO }
    }

    /// Decode to a native integer.
    #[inline]
    pub fn as_int(self) -> i64 {
        match self {
            Value::Int(n) => n,
            Value::Ref(id) => id.0 as i64,
        }
    }

    /// Decode to a character, narrowed to one byte.
    #[inline]
    pub fn to_byte(self) -> u8 {
        self.as_int() as u8
    }

    #[inline]
    pub fn is_ref(self) -> bool {
        matches!(self, Value::Ref(_))
    }

    #[inline]
    pub fn as_ref(self) -> Option<BlockId> {
        match self {
            Value::Ref(id) => Some(id),
            Value::Int(_) => None,
        }
    }

    /// Truth value used by `_`, `|` and `!`: nonzero is true. A reference is
    /// never null, so every reference is true, including one to block 0.
    #[inline]
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Int(n) => n != 0,
            Value::Ref(_) => true,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Word Encoding
    // ═══════════════════════════════════════════════════════════════════

    /// Pack into the tagged-word layout: integers as `(n << 2) | 1`,
    /// references as `id << 2`. The mark bit is always clear.
    pub fn to_word(self) -> u64 {
        match self {
            Value::Int(n) => ((n << 2) as u64) | INT_TAG,
            Value::Ref(id) => (id.0 as u64) << 2,
        }
    }

    /// Unpack a tagged word. The mark bit is ignored.
    pub fn from_word(word: u64) -> Self {
        if word & INT_TAG != 0 {
            Value::Int((word as i64) >> 2)
        } else {
            Value::Ref(BlockId((word >> 2) as u32))
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Comparison and Configurable Division
    // ═══════════════════════════════════════════════════════════════════

    /// 1 if `self > rhs`, else 0.
    #[inline]
    pub fn greater_than(self, rhs: Self) -> Self {
        Value::from_bool(self.as_int() > rhs.as_int())
    }

    /// Division truncating toward zero, with the zero-divisor policy applied.
    pub fn checked_div_at(self, rhs: Self, policy: DivisionByZeroPolicy, position: Position) -> BefResult<Self> {
        if rhs.as_int() == 0 {
            return Self::zero_divisor(self, policy, position);
        }
        Ok(Value::int(self.as_int().wrapping_div(rhs.as_int())))
    }

    /// Remainder with the sign of the dividend, with the zero-divisor policy applied.
    pub fn checked_mod_at(self, rhs: Self, policy: DivisionByZeroPolicy, position: Position) -> BefResult<Self> {
        if rhs.as_int() == 0 {
            return Self::zero_divisor(self, policy, position);
        }
        Ok(Value::int(self.as_int().wrapping_rem(rhs.as_int())))
    }

    fn zero_divisor(dividend: Self, policy: DivisionByZeroPolicy, position: Position) -> BefResult<Self> {
        match policy {
            DivisionByZeroPolicy::ReturnZero => Ok(Value::ZERO),
            DivisionByZeroPolicy::Error => Err(BefError::DivisionByZero {
                dividend: dividend.as_int(),
                position,
            }),
        }
    }
}

impl Add for Value {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Value::int(self.as_int().wrapping_add(rhs.as_int()))
    }
}

impl Sub for Value {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Value::int(self.as_int().wrapping_sub(rhs.as_int()))
    }
}

impl Mul for Value {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Value::int(self.as_int().wrapping_mul(rhs.as_int()))
    }
}

impl Div for Value {
    type Output = Self;
    /// Truncating division; a zero divisor yields 0.
    fn div(self, rhs: Self) -> Self::Output {
        match rhs.as_int() {
            0 => Value::ZERO,
            d => Value::int(self.as_int().wrapping_div(d)),
        }
    }
}

impl Rem for Value {
    type Output = Self;
    /// Truncating remainder; a zero divisor yields 0.
    fn rem(self, rhs: Self) -> Self::Output {
        match rhs.as_int() {
            0 => Value::ZERO,
            d => Value::int(self.as_int().wrapping_rem(d)),
        }
    }
}

impl Not for Value {
    type Output = Self;
    /// Logical not: 0 becomes 1, anything else becomes 0.
    fn not(self) -> Self::Output {
        Value::from_bool(!self.is_truthy())
    }
}
