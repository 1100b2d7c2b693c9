use std::collections::HashMap;
use std::time::Duration;
use bfforge::Interpreter;
use bfforge::builder::CodeBuilder;
use bfforge::ints::MINIMAL_INTS;
use bfforge::search::{self, SearchConfig, TestVector};

#[test]
fn test_builder_greeting_outputs() {
    let mut builder = CodeBuilder::new(&MINIMAL_INTS);
    builder.write_buffer(b"BF!", false, true);

    let mut interpreter = Interpreter::new();
    interpreter.run_source(&builder.build()).unwrap();
    assert_eq!(interpreter.tape().output(), "BF!");
}

#[test]
fn test_builder_while_loop_runs_once() {
    let mut builder = CodeBuilder::new(&MINIMAL_INTS);
    builder
        .get_input(1)
        .start_while()
        .set_value(0)
        .move_pointer(1)
        .output_char()
        .end_while();

    // The loop clears its own condition cell, so it runs at most once,
    // emitting whatever cell 1 held (0 here).
    let mut interpreter = Interpreter::builder()
        .queue_input(vec![3])
        .build();
    interpreter.run_source(&builder.build()).unwrap();
    assert!(interpreter.tape().cells().is_empty());
    assert_eq!(interpreter.tape().output(), "\u{0}");
}

#[test]
fn test_built_constant_setter_matches_vectors() {
    // `set_value` starts with a clear, so the built code maps *any*
    // starting cell to the same constant.
    let mut builder = CodeBuilder::new(&MINIMAL_INTS);
    builder.set_value(7);
    let source = builder.build();

    let vectors: Vec<TestVector> = (0..20i64).map(|x| TestVector {
        seed: vec![(0, x)].into_iter().collect(),
        expected: vec![(0, 7u8)].into_iter().collect()
    }).collect();

    let config = SearchConfig::default();
    assert!(search::verify_candidate("set 7", &source, &vectors, &config).unwrap());
}

#[test]
fn test_discover_finds_wraparound_clear() {
    // Any starting value must end as 0 with nothing else touched. The
    // shortest such program is a lone loop, and `[+]` (clear by wrapping
    // upward) enumerates before `[-]`.
    let vectors: Vec<TestVector> = (0..4i64).map(|x| TestVector {
        seed: vec![(0, x)].into_iter().collect(),
        expected: HashMap::new()
    }).collect();

    let config = SearchConfig {
        timeout: Some(Duration::from_millis(100)),
        ..SearchConfig::default()
    };
    assert_eq!(search::discover(&vectors, 3, &config), Some("[+]".to_owned()));
}
