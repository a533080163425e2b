//! Instruction set for befunge-plus.
//!
//! Each grid byte compiles to one `OpCode` when the program is loaded, and
//! again whenever `p` overwrites it. Two extra opcodes, `WrapX` and `WrapY`,
//! never come from source: they fill the border ring around the grid and
//! snap the cursor back onto the opposite edge.

use std::fmt;

/// A compiled instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // ═══════════════════════════════════════════════════════════════════
    // Arithmetic
    // ═══════════════════════════════════════════════════════════════════

    /// Stack: ( a b -- a+b )
    Add,
    /// Stack: ( a b -- a-b )
    Sub,
    /// Stack: ( a b -- a*b )
    Mul,
    /// Truncating division.
    /// Stack: ( a b -- a/b )
    Div,
    /// Remainder with the sign of the dividend.
    /// Stack: ( a b -- a%b )
    Mod,
    /// Logical not.
    /// Stack: ( a -- !a )
    Not,
    /// Stack: ( a b -- a>b )
    Greater,

    // ═══════════════════════════════════════════════════════════════════
    // Control Flow
    // ═══════════════════════════════════════════════════════════════════

    Right,
    Left,
    Up,
    Down,
    /// Pick one of the four directions uniformly.
    Random,
    /// Left if the popped value is nonzero, else right.
    /// Stack: ( a -- )
    HorizontalIf,
    /// Up if the popped value is nonzero, else down.
    /// Stack: ( a -- )
    VerticalIf,
    /// Skip the next cell.
    Bridge,
    /// Stop the program successfully.
    End,

    // ═══════════════════════════════════════════════════════════════════
    // Stack Manipulation
    // ═══════════════════════════════════════════════════════════════════

    /// Push every byte up to the next `"`.
    StringMode,
    /// Stack: ( a -- a a )
    Dup,
    /// Stack: ( a b -- b a )
    Swap,
    /// Stack: ( a -- )
    Pop,
    /// Stack: ( -- n )
    Digit(u8),

    // ═══════════════════════════════════════════════════════════════════
    // I/O and Self-Modification
    // ═══════════════════════════════════════════════════════════════════

    /// Stack: ( a -- )
    PrintInt,
    /// Stack: ( a -- )
    PrintChar,
    /// Stack: ( -- n )
    InputInt,
    /// Stack: ( -- c )
    InputChar,
    /// Stack: ( x y -- c )
    Get,
    /// Stack: ( v x y -- )
    Put,

    // ═══════════════════════════════════════════════════════════════════
    // Cons Cells
    // ═══════════════════════════════════════════════════════════════════

    /// Allocate a cell.
    /// Stack: ( head tail -- ref )
    Cell,
    /// Stack: ( ref -- head )
    Head,
    /// Stack: ( ref -- tail )
    Tail,

    // ═══════════════════════════════════════════════════════════════════
    // Grid Structure
    // ═══════════════════════════════════════════════════════════════════

    /// Space.
    Nop,
    /// A byte with no meaning; faults if dispatched.
    Unknown(u8),
    /// Border cell left or right of the grid.
    WrapX,
    /// Border cell above or below the grid.
    WrapY,
}

impl OpCode {
    /// Compile a source byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'+' => OpCode::Add,
            b'-' => OpCode::Sub,
            b'*' => OpCode::Mul,
            b'/' => OpCode::Div,
            b'%' => OpCode::Mod,
            b'!' => OpCode::Not,
            b'`' => OpCode::Greater,
            b'>' => OpCode::Right,
            b'<' => OpCode::Left,
            b'^' => OpCode::Up,
            b'v' => OpCode::Down,
            b'?' => OpCode::Random,
            b'_' => OpCode::HorizontalIf,
            b'|' => OpCode::VerticalIf,
            b'"' => OpCode::StringMode,
            b':' => OpCode::Dup,
            b'\\' => OpCode::Swap,
            b'$' => OpCode::Pop,
            b'.' => OpCode::PrintInt,
            b',' => OpCode::PrintChar,
            b'#' => OpCode::Bridge,
            b'g' => OpCode::Get,
            b'p' => OpCode::Put,
            b'&' => OpCode::InputInt,
            b'~' => OpCode::InputChar,
            b'@' => OpCode::End,
            b'c' => OpCode::Cell,
            b'h' => OpCode::Head,
            b't' => OpCode::Tail,
            b'0'..=b'9' => OpCode::Digit(byte - b'0'),
            b' ' => OpCode::Nop,
            other => OpCode::Unknown(other),
        }
    }

    /// The source byte this opcode compiles from, if it has one.
    pub fn to_byte(self) -> Option<u8> {
        let byte = match self {
            OpCode::Add => b'+',
            OpCode::Sub => b'-',
            OpCode::Mul => b'*',
            OpCode::Div => b'/',
            OpCode::Mod => b'%',
            OpCode::Not => b'!',
            OpCode::Greater => b'`',
            OpCode::Right => b'>',
            OpCode::Left => b'<',
            OpCode::Up => b'^',
            OpCode::Down => b'v',
            OpCode::Random => b'?',
            OpCode::HorizontalIf => b'_',
            OpCode::VerticalIf => b'|',
            OpCode::StringMode => b'"',
            OpCode::Dup => b':',
            OpCode::Swap => b'\\',
            OpCode::Pop => b'$',
            OpCode::PrintInt => b'.',
            OpCode::PrintChar => b',',
            OpCode::Bridge => b'#',
            OpCode::Get => b'g',
            OpCode::Put => b'p',
            OpCode::InputInt => b'&',
            OpCode::InputChar => b'~',
            OpCode::End => b'@',
            OpCode::Cell => b'c',
            OpCode::Head => b'h',
            OpCode::Tail => b't',
            OpCode::Digit(d) => b'0' + d,
            OpCode::Nop => b' ',
            OpCode::Unknown(b) => b,
            OpCode::WrapX | OpCode::WrapY => return None,
        };
        Some(byte)
    }

    /// Mnemonic used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Not => "NOT",
            OpCode::Greater => "GT",
            OpCode::Right => "RIGHT",
            OpCode::Left => "LEFT",
            OpCode::Up => "UP",
            OpCode::Down => "DOWN",
            OpCode::Random => "RANDOM",
            OpCode::HorizontalIf => "HIF",
            OpCode::VerticalIf => "VIF",
            OpCode::Bridge => "BRIDGE",
            OpCode::End => "END",
            OpCode::StringMode => "STRING",
            OpCode::Dup => "DUP",
            OpCode::Swap => "SWAP",
            OpCode::Pop => "POP",
            OpCode::Digit(_) => "DIGIT",
            OpCode::PrintInt => "PRINT_INT",
            OpCode::PrintChar => "PRINT_CHAR",
            OpCode::InputInt => "INPUT_INT",
            OpCode::InputChar => "INPUT_CHAR",
            OpCode::Get => "GET",
            OpCode::Put => "PUT",
            OpCode::Cell => "CELL",
            OpCode::Head => "HEAD",
            OpCode::Tail => "TAIL",
            OpCode::Nop => "NOP",
            OpCode::Unknown(_) => "UNKNOWN",
            OpCode::WrapX => "WRAP_X",
            OpCode::WrapY => "WRAP_Y",
        }
    }

    /// (values popped, values pushed).
    pub fn stack_effect(&self) -> (usize, usize) {
        match self {
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod | OpCode::Greater => (2, 1),
            OpCode::Not | OpCode::Head | OpCode::Tail => (1, 1),
            OpCode::HorizontalIf | OpCode::VerticalIf => (1, 0),
            OpCode::Pop | OpCode::PrintInt | OpCode::PrintChar => (1, 0),
            OpCode::Dup => (1, 2),
            OpCode::Swap => (2, 2),
            OpCode::Digit(_) | OpCode::InputInt | OpCode::InputChar => (0, 1),
            OpCode::Get => (2, 1),
            OpCode::Put => (3, 0),
            OpCode::Cell => (2, 1),
            // String mode pushes a variable number of values
            OpCode::StringMode => (0, 0),
            OpCode::Right | OpCode::Left | OpCode::Up | OpCode::Down | OpCode::Random
            | OpCode::Bridge | OpCode::End | OpCode::Nop | OpCode::Unknown(_)
            | OpCode::WrapX | OpCode::WrapY => (0, 0),
        }
    }

    /// Whether this is a border wrap handle.
    #[inline]
    pub fn is_wrap(&self) -> bool {
        matches!(self, OpCode::WrapX | OpCode::WrapY)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCode::Digit(d) => write!(f, "{}({})", self.name(), d),
            OpCode::Unknown(b) => write!(f, "{}(0x{:02x})", self.name(), b),
            _ => write!(f, "{}", self.name()),
        }
    }
}
