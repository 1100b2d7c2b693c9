use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::BrainfuckError;
use crate::compiler::Program;
use crate::interpreter::Interpreter;

/// Minimal Brainfuck encodings for every byte value.
///
/// Two candidate shapes compete for each value: a bare run of `+` or `-`,
/// and the multiply-and-adjust form `>B[<M>-]<E` (set a counter one cell to
/// the right, accumulate into the target, then adjust). The winner is the
/// shortest code that leaves the value in the current cell and everything
/// else untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntTable {
    codes: BTreeMap<u8, String>
}

lazy_static! {
    /// Process-wide default table, generated on first use.
    pub static ref MINIMAL_INTS: IntTable = IntTable::generate();
}

impl IntTable {

    /// Searches for the minimal encoding of every byte value by actually
    /// executing candidates on a fresh tape, deepening the total run budget
    /// until all 256 values are covered.
    pub fn generate() -> IntTable {
        let mut codes: BTreeMap<u8, String> = BTreeMap::new();
        let mut total = 0;
        loop {
            for &sign in &[b'+', b'-'] {
                consider(&mut codes, run_of(sign, total));
            }
            for base in 0..=total {
                for mul in 1..=(total - base) {
                    let adjust = total - base - mul;
                    for &sb in &[b'+', b'-'] {
                        for &sm in &[b'+', b'-'] {
                            for &sa in &[b'+', b'-'] {
                                consider(&mut codes, format!(
                                    ">{}[<{}>-]<{}",
                                    run_of(sb, base),
                                    run_of(sm, mul),
                                    run_of(sa, adjust)
                                ));
                            }
                        }
                    }
                }
            }
            trace!("Integer table at budget {}: {}/256 values", total, codes.len());
            if codes.len() == 256 {
                break;
            }
            total += 1;
        }
        IntTable { codes }
    }

    /// Loads a previously saved table.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<IntTable, BrainfuckError> {
        let file = File::open(path)?;
        serde_json::from_reader(file)
            .map_err(|e| BrainfuckError::Message(format!("Malformed integer table: {}", e)))
    }

    /// Saves the table as pretty-printed JSON, keys sorted.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BrainfuckError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| BrainfuckError::Message(format!("Cannot write integer table: {}", e)))
    }

    /// Loads the table from `path`, generating and saving it first if the
    /// file does not exist yet.
    pub fn cached<P: AsRef<Path>>(path: P) -> Result<IntTable, BrainfuckError> {
        let path = path.as_ref();
        if path.exists() {
            debug!("Loading integer table from {}", path.display());
            IntTable::load(path)
        } else {
            info!("Generating integer table, will be cached at {}", path.display());
            let table = IntTable::generate();
            table.save(path)?;
            Ok(table)
        }
    }

    /// The minimal code setting the current cell to `value`.
    /// Assumes a cell starting at 0; callers clear first.
    pub fn code(&self, value: u8) -> &str {
        &self.codes[&value]
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

}

fn run_of(sign: u8, length: usize) -> String {
    (sign as char).to_string().repeat(length)
}

// Keeps `candidate` if it is the shortest code seen so far for the value it
// computes. Ties keep the earlier candidate.
fn consider(codes: &mut BTreeMap<u8, String>, candidate: String) {
    let value = value_of(&candidate);
    match codes.get(&value) {
        Some(existing) if existing.len() <= candidate.len() => {},
        _ => {
            codes.insert(value, candidate);
        }
    }
}

fn value_of(candidate: &str) -> u8 {
    let program = Program::compile(candidate)
        .expect("generated candidate is well-formed");
    let mut interpreter = Interpreter::new();
    interpreter.run(&program)
        .expect("generated candidate runs without input or bounds faults");
    interpreter.tape().peek()
}
