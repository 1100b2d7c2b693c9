#[macro_use] extern crate log;
#[macro_use] extern crate lazy_static;

pub mod error;
pub mod parser;
pub mod compiler;
pub mod tape;
pub mod interpreter;
pub mod ints;
pub mod builder;
pub mod search;

pub use crate::error::BrainfuckError;
pub use crate::compiler::{Instruction, Program, Segment};
pub use crate::interpreter::Interpreter;
pub use crate::tape::{Addressing, InputProvider, Tape};
