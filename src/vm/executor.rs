//! The befunge-plus dispatch loop.
//!
//! A `Vm` owns everything a run touches: the grid, the operand stack, the
//! heap, the cursor, the random source and the console streams. Independent
//! machines share nothing.
//!
//! Each cycle fetches the compiled instruction under the cursor, resolving
//! border wrap handles first, executes it and then moves the cursor one cell
//! in the current direction. `@` stops the loop without moving.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::{BefError, BefResult, ErrorConfig};
use crate::core::heap::{GcStats, Heap, HEAP_SIZE};
use crate::core::position::{Direction, Position};
use crate::core::stack::Stack;
use crate::core::value::Value;
use crate::grid::Grid;
use crate::opcode::OpCode;
use crate::runtime::io::{InputSource, OutputSink};

/// Configuration for the executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Heap capacity in blocks.
    pub heap_capacity: usize,
    /// Division policy and stack depth limit.
    pub errors: ErrorConfig,
    /// Maximum instructions to run (0 = unlimited).
    pub max_steps: u64,
    /// Seed for `?`; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            heap_capacity: HEAP_SIZE,
            errors: ErrorConfig::default(),
            max_steps: 0,
            seed: None,
        }
    }
}

impl ExecutorConfig {
    /// Division by zero is a fault.
    pub fn strict() -> Self {
        Self {
            errors: ErrorConfig::strict(),
            ..Self::default()
        }
    }

    /// Deterministic and bounded: fixed seed, step budget, small heap.
    pub fn sandboxed(max_steps: u64) -> Self {
        Self {
            heap_capacity: 1 << 16,
            max_steps,
            seed: Some(0),
            ..Self::default()
        }
    }

    pub fn with_heap_capacity(mut self, blocks: usize) -> Self {
        self.heap_capacity = blocks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmStatus {
    Running,
    /// `@` was executed.
    Halted,
    /// A fatal error stopped the run.
    Failed(BefError),
}

/// Figures reported when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed, including string-mode cells.
    pub steps: u64,
    pub stack_depth: usize,
    pub live_cells: usize,
    pub gc: GcStats,
}

/// The befunge-plus virtual machine.
pub struct Vm<I: InputSource, O: OutputSink> {
    config: ExecutorConfig,
    grid: Grid,
    stack: Stack,
    heap: Heap,
    pos: Position,
    dir: Direction,
    rng: StdRng,
    steps: u64,
    status: VmStatus,
    input: I,
    output: O,
}

impl<I: InputSource, O: OutputSink> Vm<I, O> {
    /// Create a machine with the default configuration.
    pub fn new(grid: Grid, input: I, output: O) -> Self {
        Self::with_config(grid, input, output, ExecutorConfig::default())
    }

    /// Create a machine with a custom configuration.
    pub fn with_config(grid: Grid, input: I, output: O, config: ExecutorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            stack: Stack::with_max_depth(config.errors.max_stack_depth),
            heap: Heap::with_capacity(config.heap_capacity),
            config,
            grid,
            pos: Position::ORIGIN,
            dir: Direction::Right,
            rng,
            steps: 0,
            status: VmStatus::Running,
            input,
            output,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn status(&self) -> &VmStatus {
        &self.status
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.steps,
            stack_depth: self.stack.depth(),
            live_cells: self.heap.live_count(),
            gc: self.heap.stats(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Running
    // ═══════════════════════════════════════════════════════════════════

    /// Run until `@` or the first fault.
    pub fn run(&mut self) -> BefResult<RunSummary> {
        while self.step()? {}

        let summary = self.summary();
        crate::audit_log!(
            action = "HALT",
            entity = ("Program", self.pos.to_string()),
            description = format!("Halted after {} steps", summary.steps),
            category = Execute,
            outcome = Success,
            meta = {
                steps: summary.steps,
                stack_depth: summary.stack_depth,
                collections: summary.gc.collections,
            },
        );
        Ok(summary)
    }

    /// Execute one instruction. Returns false once the program has halted.
    pub fn step(&mut self) -> BefResult<bool> {
        match &self.status {
            VmStatus::Running => {}
            VmStatus::Halted => return Ok(false),
            VmStatus::Failed(err) => return Err(err.clone()),
        }

        match self.cycle() {
            Ok(()) => Ok(self.status == VmStatus::Running),
            Err(err) => {
                crate::audit_log!(
                    action = "FAULT",
                    entity = ("Program", self.pos.to_string()),
                    description = err.to_string(),
                    category = Execute,
                    severity = Error,
                    outcome = Failure,
                    meta = { code: err.code(), steps: self.steps },
                );
                self.status = VmStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn cycle(&mut self) -> BefResult<()> {
        self.count_step()?;
        let op = self.fetch();
        self.execute_op(op)?;
        if op != OpCode::End {
            self.advance();
        }
        Ok(())
    }

    fn count_step(&mut self) -> BefResult<()> {
        let limit = self.config.max_steps;
        if limit > 0 && self.steps >= limit {
            return Err(BefError::StepLimitExceeded { limit });
        }
        self.steps += 1;
        Ok(())
    }

    /// The instruction under the cursor, after resolving any wrap handles.
    fn fetch(&mut self) -> OpCode {
        loop {
            let op = self.grid.op_at(self.pos);
            if !op.is_wrap() {
                return op;
            }
            self.pos = self.grid.resolve_wrap(self.pos);
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.pos = self.pos.step(self.dir);
    }

    #[inline]
    fn push(&mut self, value: Value) -> BefResult<()> {
        self.stack.push_checked(value, self.pos)
    }

    fn execute_op(&mut self, op: OpCode) -> BefResult<()> {
        let policy = self.config.errors.division_by_zero;

        match op {
            // ═══════════════════════════════════════════════════════════
            // Arithmetic
            // ═══════════════════════════════════════════════════════════

            OpCode::Add => {
                let (a, b) = self.stack.pop_pair();
                self.push(a + b)?;
            }
            OpCode::Sub => {
                let (a, b) = self.stack.pop_pair();
                self.push(a - b)?;
            }
            OpCode::Mul => {
                let (a, b) = self.stack.pop_pair();
                self.push(a * b)?;
            }
            OpCode::Div => {
                let (a, b) = self.stack.pop_pair();
                let q = a.checked_div_at(b, policy, self.pos)?;
                self.push(q)?;
            }
            OpCode::Mod => {
                let (a, b) = self.stack.pop_pair();
                let r = a.checked_mod_at(b, policy, self.pos)?;
                self.push(r)?;
            }
            OpCode::Not => {
                let a = self.stack.pop();
                self.push(!a)?;
            }
            OpCode::Greater => {
                let (a, b) = self.stack.pop_pair();
                self.push(a.greater_than(b))?;
            }

            // ═══════════════════════════════════════════════════════════
            // Control Flow
            // ═══════════════════════════════════════════════════════════

            OpCode::Right => self.dir = Direction::Right,
            OpCode::Left => self.dir = Direction::Left,
            OpCode::Up => self.dir = Direction::Up,
            OpCode::Down => self.dir = Direction::Down,
            OpCode::Random => {
                self.dir = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            }
            OpCode::HorizontalIf => {
                self.dir = if self.stack.pop().is_truthy() { Direction::Left } else { Direction::Right };
            }
            OpCode::VerticalIf => {
                self.dir = if self.stack.pop().is_truthy() { Direction::Up } else { Direction::Down };
            }
            OpCode::Bridge => {
                // Land on the skipped cell; a border there wraps before the
                // cycle's own advance
                self.advance();
                self.pos = self.grid.resolve_wrap(self.pos);
            }
            OpCode::End => {
                self.status = VmStatus::Halted;
            }

            // ═══════════════════════════════════════════════════════════
            // Stack Manipulation
            // ═══════════════════════════════════════════════════════════

            OpCode::StringMode => self.string_mode()?,
            OpCode::Dup => {
                let a = self.stack.peek();
                self.push(a)?;
            }
            OpCode::Swap => {
                let (a, b) = self.stack.pop_pair();
                self.push(b)?;
                self.push(a)?;
            }
            OpCode::Pop => {
                self.stack.pop();
            }
            OpCode::Digit(d) => self.push(Value::int(d as i64))?,

            // ═══════════════════════════════════════════════════════════
            // I/O and Self-Modification
            // ═══════════════════════════════════════════════════════════

            OpCode::PrintInt => {
                let a = self.stack.pop();
                self.output.write_int(a.as_int())?;
            }
            OpCode::PrintChar => {
                let a = self.stack.pop();
                self.output.write_char(a.to_byte())?;
            }
            OpCode::InputInt => {
                let n = self.input.read_int()?;
                self.push(Value::int(n))?;
            }
            OpCode::InputChar => {
                let c = self.input.read_char()?;
                self.push(Value::int(c))?;
            }
            OpCode::Get => {
                let (x, y) = self.stack.pop_pair();
                let cell = self.grid.get(x.as_int(), y.as_int());
                self.push(cell.map_or(Value::ZERO, Value::from_char))?;
            }
            OpCode::Put => {
                let (x, y) = self.stack.pop_pair();
                let v = self.stack.pop();
                self.grid.put(x.as_int(), y.as_int(), v.to_byte());
            }

            // ═══════════════════════════════════════════════════════════
            // Cons Cells
            // ═══════════════════════════════════════════════════════════

            OpCode::Cell => {
                // Operands stay on the stack during allocation so that a
                // collection sees them as roots
                let id = self.heap.alloc(Value::ZERO, Value::ZERO, self.stack.as_slice())?;
                let (head, tail) = self.stack.pop_pair();
                self.heap.set(id, head, tail);
                self.push(Value::Ref(id))?;
            }
            OpCode::Head => {
                let id = self.stack.pop().as_ref().ok_or(BefError::NotABlock {
                    operation: 'h',
                    position: self.pos,
                })?;
                self.push(self.heap.head(id))?;
            }
            OpCode::Tail => {
                let id = self.stack.pop().as_ref().ok_or(BefError::NotABlock {
                    operation: 't',
                    position: self.pos,
                })?;
                self.push(self.heap.tail(id))?;
            }

            // ═══════════════════════════════════════════════════════════
            // Grid Structure
            // ═══════════════════════════════════════════════════════════

            OpCode::Nop => {}
            OpCode::Unknown(byte) => {
                return Err(BefError::UnknownInstruction { byte, position: self.pos });
            }
            OpCode::WrapX | OpCode::WrapY => {
                return Err(BefError::Internal {
                    message: format!("wrap handle dispatched at {}", self.pos),
                });
            }
        }

        Ok(())
    }

    /// Push every byte between the opening quote and the next `"`, following
    /// wraps. Leaves the cursor on the closing quote.
    fn string_mode(&mut self) -> BefResult<()> {
        self.advance();
        loop {
            if self.grid.is_border(self.pos) {
                self.pos = self.grid.resolve_wrap(self.pos);
                continue;
            }

            let byte = self.grid.raw_at(self.pos).ok_or_else(|| BefError::Internal {
                message: format!("string mode left the grid at {}", self.pos),
            })?;
            if byte == b'"' {
                return Ok(());
            }

            self.count_step()?;
            self.push(Value::from_char(byte))?;
            self.advance();
        }
    }
}
