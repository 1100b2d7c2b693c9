use std::collections::HashMap;
use std::ops::Range;
use std::time::{Duration, Instant};
use rayon::prelude::*;
use crate::BrainfuckError;
use crate::compiler::Program;
use crate::interpreter::Interpreter;
use crate::tape::{Addressing, DEFAULT_TAPE_LENGTH};

// Discovery enumerates loop programs only; I/O is outside the
// memory-to-memory equivalence the vectors describe.
const ALPHABET: &[u8] = b"+-<>[]";

/// One input/output test vector: the initial memory and the *entire*
/// expected final memory. A candidate that leaves scratch cells dirty does
/// not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    pub seed: HashMap<isize, i64>,
    pub expected: HashMap<isize, u8>
}

/// Tape and budget configuration for batch candidate runs.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub tape_length: usize,
    pub addressing: Addressing,
    pub timeout: Option<Duration>
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            tape_length: DEFAULT_TAPE_LENGTH,
            addressing: Addressing::default(),
            timeout: Some(Duration::from_secs(1))
        }
    }
}

/// Checks a compiled program against every vector, each on its own freshly
/// seeded tape. Vectors are fanned out across threads; the shared program is
/// the only thing the runs have in common. Any run error, a timeout
/// included, counts as a mismatch.
pub fn matches_vectors(program: &Program, vectors: &[TestVector], config: &SearchConfig) -> bool {
    vectors.par_iter().all(|vector| {
        let mut builder = Interpreter::builder();
        builder
            .tape_length(config.tape_length)
            .addressing(config.addressing)
            .seed_cells(vector.seed.clone());
        if let Some(timeout) = config.timeout {
            builder.timeout(timeout);
        }
        let mut interpreter = builder.build();
        match interpreter.run(program) {
            Ok(()) => *interpreter.tape().cells() == vector.expected,
            Err(_) => false
        }
    })
}

/// Compiles a candidate once, checks it against the vectors and logs the
/// verdict.
pub fn verify_candidate(
    label: &str,
    source: &str,
    vectors: &[TestVector],
    config: &SearchConfig
) -> Result<bool, BrainfuckError> {
    let program = Program::compile(source)?;
    let started = Instant::now();
    let ok = matches_vectors(&program, vectors, config);
    if ok {
        info!(
            "The code {:?} solves the problem of {} ({} vectors in {:.2?})",
            source, label, vectors.len(), started.elapsed()
        );
    } else {
        debug!("The code {:?} does not solve the problem of {}", source, label);
    }
    Ok(ok)
}

/// Builds the vector table for a binary byte operator: operands in cells 0
/// and 1, result expected alone in cell 0.
pub fn binary_op_vectors<F>(op: F, lhs: Range<u8>, rhs: Range<u8>) -> Vec<TestVector>
    where F: Fn(u8, u8) -> u8
{
    let mut vectors = Vec::new();
    for a in lhs {
        for b in rhs.clone() {
            let mut seed = HashMap::new();
            seed.insert(0, i64::from(a));
            seed.insert(1, i64::from(b));
            let mut expected = HashMap::new();
            let result = op(a, b);
            if result != 0 {
                expected.insert(0, result);
            }
            vectors.push(TestVector { seed, expected });
        }
    }
    vectors
}

/// Brute-force discovery of a minimal program matching the vectors:
/// iterative deepening over bracket-balanced candidates, shortest first.
/// Returns the source of the first match, or `None` if nothing up to
/// `max_len` works.
pub fn discover(vectors: &[TestVector], max_len: usize, config: &SearchConfig) -> Option<String> {
    for len in 0..=max_len {
        debug!("Searching candidate programs of length {}", len);
        let mut prefix = Vec::with_capacity(len);
        let found = enumerate(&mut prefix, len, 0, &mut |source| {
            Program::compile(source)
                .map(|program| matches_vectors(&program, vectors, config))
                .unwrap_or(false)
        });
        if let Some(source) = found {
            info!("Found a program of length {}: {:?}", len, source);
            return Some(source);
        }
    }
    None
}

// Depth-first enumeration of candidates of exactly `remaining` more
// characters, pruning anything whose brackets cannot balance.
fn enumerate<F>(prefix: &mut Vec<u8>, remaining: usize, depth: usize, visit: &mut F) -> Option<String>
    where F: FnMut(&str) -> bool
{
    if depth > remaining {
        return None;
    }
    if remaining == 0 {
        let source: String = prefix.iter().map(|&b| b as char).collect();
        return if visit(&source) { Some(source) } else { None };
    }
    for &c in ALPHABET {
        let next_depth = match c {
            b'[' => depth + 1,
            b']' => {
                if depth == 0 {
                    continue;
                }
                depth - 1
            },
            _ => depth
        };
        prefix.push(c);
        let found = enumerate(prefix, remaining - 1, next_depth, visit);
        prefix.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}
