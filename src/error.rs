use std::error::Error;
use std::{fmt, io};

#[derive(Debug)]
pub enum BrainfuckError {
    /// Generic message
    Message(String),
    /// I/O error.
    IoError(io::Error),
    /// Mismatched or missing bracket while parsing.
    SyntaxError { message: String, index: usize, excerpt: String },
    /// Unknown addressing mode name.
    UnknownAddressingMode(String),
    /// The data pointer moved outside the tape under bounded addressing.
    PointerOutOfRange(isize),
    /// The cooperative time budget was exceeded.
    Timeout,
}

impl Error for BrainfuckError {}

impl fmt::Display for BrainfuckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BrainfuckError::*;
        match self {
            Message(ref m) => {
                write!(f, "{}", m)
            },
            IoError(ref e) => {
                write!(f, "I/O error: {}", e)
            },
            SyntaxError { ref message, index, ref excerpt } => {
                write!(f, "{} at index {}\n{}", message, index, excerpt)
            },
            UnknownAddressingMode(ref name) => {
                write!(f, "Unknown addressing mode: {}", name)
            },
            PointerOutOfRange(index) => {
                write!(f, "Pointer index out of range: {}", index)
            },
            Timeout => {
                write!(f, "Time budget exceeded")
            }
        }
    }
}

impl From<&str> for BrainfuckError {
    fn from(s: &str) -> Self {
        BrainfuckError::Message(s.to_owned())
    }
}

impl From<String> for BrainfuckError {
    fn from(s: String) -> Self {
        BrainfuckError::Message(s)
    }
}

impl From<io::Error> for BrainfuckError {
    fn from(e: io::Error) -> Self {
        BrainfuckError::IoError(e)
    }
}
