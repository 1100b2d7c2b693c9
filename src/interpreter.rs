use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};
use crate::BrainfuckError;
use crate::compiler::{Instruction, Program, Segment};
use crate::tape::{Addressing, InputProvider, Tape, DEFAULT_TAPE_LENGTH};

/// Observer invoked after every executed instruction with the full tape state.
pub type Observer = Box<dyn FnMut(&Tape)>;

/// Builder for the [`Interpreter`](crate::interpreter::Interpreter) struct.
pub struct InterpreterBuilder {
    tape_length: usize,
    addressing: Addressing,
    timeout: Option<Duration>,
    frame_rate: Option<f64>,
    merge_reads: bool,
    seed: HashMap<isize, i64>,
    queued_input: Vec<u8>,
    input: Option<Box<dyn InputProvider>>,
    observer: Option<Observer>
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        InterpreterBuilder::new()
    }
}

impl InterpreterBuilder {

    /// Creates a new [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) with the default settings.
    pub fn new() -> InterpreterBuilder {
        InterpreterBuilder {
            tape_length: DEFAULT_TAPE_LENGTH,
            addressing: Addressing::default(),
            timeout: None,
            frame_rate: None,
            merge_reads: true,
            seed: HashMap::new(),
            queued_input: Vec::new(),
            input: None,
            observer: None
        }
    }

    /// Sets the tape length.
    /// Panics if the length is set to zero.
    pub fn tape_length(&mut self, tape_length: usize) -> &mut Self {
        if tape_length == 0 {
            panic!("Tape length must be at least 1.");
        }
        self.tape_length = tape_length;
        self
    }

    /// Sets the addressing policy applied to pointer moves.
    pub fn addressing(&mut self, addressing: Addressing) -> &mut Self {
        self.addressing = addressing;
        self
    }

    /// Sets the cooperative time budget for a run.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Throttles execution to `frame_rate` instructions per second while an
    /// observer is attached.
    pub fn frame_rate(&mut self, frame_rate: f64) -> &mut Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    /// Controls how a merged run of `,` executes: one read per visit (the
    /// default) or one read per source character.
    pub fn merge_reads(&mut self, merge_reads: bool) -> &mut Self {
        self.merge_reads = merge_reads;
        self
    }

    /// Pre-populates the tape from an address/value mapping.
    pub fn seed_cells(&mut self, seed: HashMap<isize, i64>) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Pre-supplies the input queue, bypassing the interactive provider.
    pub fn queue_input<I: IntoIterator<Item = u8>>(&mut self, bytes: I) -> &mut Self {
        self.queued_input = bytes.into_iter().collect();
        self
    }

    /// Sets the provider asked for more input when the queue runs dry.
    pub fn input<P: InputProvider + 'static>(&mut self, provider: P) -> &mut Self {
        self.input = Some(Box::new(provider));
        self
    }

    /// Attaches an observer invoked after every executed instruction.
    pub fn observe<F: FnMut(&Tape) + 'static>(&mut self, observer: F) -> &mut Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Builds the actual [`Interpreter`](crate::interpreter::Interpreter).
    pub fn build(&mut self) -> Interpreter {
        let mut tape = Tape::new(self.tape_length, self.addressing);
        tape.seed(&std::mem::replace(&mut self.seed, HashMap::new()));
        tape.queue_input(self.queued_input.drain(..));
        Interpreter {
            tape,
            timeout: self.timeout,
            frame_rate: self.frame_rate,
            merge_reads: self.merge_reads,
            input: std::mem::replace(&mut self.input, None),
            observer: std::mem::replace(&mut self.observer, None),
            started: None
        }
    }

}

/// Walks a compiled [`Program`](crate::compiler::Program), driving one
/// [`Tape`](crate::tape::Tape) to completion.
pub struct Interpreter {
    tape: Tape,
    timeout: Option<Duration>,
    frame_rate: Option<f64>,
    merge_reads: bool,
    input: Option<Box<dyn InputProvider>>,
    observer: Option<Observer>,
    started: Option<Instant>
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {

    /// Builds an [`Interpreter`](crate::interpreter::Interpreter) with the default settings.
    pub fn new() -> Interpreter {
        InterpreterBuilder::new().build()
    }

    /// Creates an [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) to configure
    /// a new [`Interpreter`](crate::interpreter::Interpreter).
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Returns a reference to the tape driven by this [`Interpreter`](crate::interpreter::Interpreter).
    /// After a failed run, this is the state as of the failing instruction.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Consumes the interpreter and returns the finished tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Compiles and executes Brainfuck source text.
    pub fn run_source(&mut self, source: &str) -> Result<(), BrainfuckError> {
        let program = Program::compile(source)?;
        self.run(&program)
    }

    /// Executes the given compiled program in this [`Interpreter`](crate::interpreter::Interpreter).
    ///
    /// The time budget, if one is configured, starts counting here and is
    /// re-checked after every instruction.
    pub fn run(&mut self, program: &Program) -> Result<(), BrainfuckError> {
        self.started = Some(Instant::now());
        self.run_segments(program.segments())
    }

    fn run_segments(&mut self, segments: &[Segment]) -> Result<(), BrainfuckError> {
        for segment in segments {
            match segment {

                Segment::Run(instructions) => {
                    for instruction in instructions {
                        self.step(instruction)?;
                    }
                },

                // Pretest semantics: the condition cell is read freshly
                // before every iteration, the first included. The deadline
                // check here keeps an empty body from looping unchecked.
                Segment::Loop(body) => {
                    while self.tape.peek() != 0 {
                        self.check_deadline()?;
                        self.run_segments(body)?;
                    }
                }

            }
        }
        Ok(())
    }

    fn step(&mut self, instruction: &Instruction) -> Result<(), BrainfuckError> {
        match *instruction {

            Instruction::Add { amount } => {
                self.tape.modify(amount as i64);
            },

            Instruction::Sub { amount } => {
                self.tape.modify(-(amount as i64));
            },

            Instruction::Left { amount } => {
                self.tape.move_by(-(amount as isize))?;
            },

            Instruction::Right { amount } => {
                self.tape.move_by(amount as isize)?;
            },

            Instruction::Input { amount } => {
                let reads = if self.merge_reads { 1 } else { amount };
                for _ in 0..reads {
                    self.tape.read_input(self.input.as_deref_mut())?;
                }
            },

            Instruction::Output { amount } => {
                self.tape.write_output(amount);
            }

        }

        self.check_deadline()?;

        if let Some(ref mut observer) = self.observer {
            observer(&self.tape);
            if let Some(frame_rate) = self.frame_rate {
                if frame_rate > 0.0 {
                    thread::sleep(Duration::from_secs_f64(1.0 / frame_rate));
                }
            }
        }

        Ok(())
    }

    fn check_deadline(&self) -> Result<(), BrainfuckError> {
        if let (Some(started), Some(timeout)) = (self.started, self.timeout) {
            if started.elapsed() > timeout {
                return Err(BrainfuckError::Timeout);
            }
        }
        Ok(())
    }

}
