use bfforge::{Addressing, BrainfuckError, Interpreter, Program};

fn run(program: &[u8], input: &[u8], expected: &[u8]) -> Result<(), BrainfuckError> {

    // Compile the program
    let source = std::str::from_utf8(program).map_err(|_| "Program is not valid UTF-8")?;
    let program = Program::compile(source)?;

    // Prepare an interpreter to run it
    let mut interpreter = Interpreter::builder()
        .tape_length(30_000)
        .addressing(Addressing::Bounded)
        .queue_input(input.iter().copied())
        .build();

    // Aaaaand, run!
    interpreter.run(&program)?;

    // Check that the output log matches the expected one
    if interpreter.tape().output().as_bytes() != expected {
        return Err("Mismatching output".into());
    }

    Ok(())

}

// A test for each program

macro_rules! test_program {
    ($name:ident) => {
        paste::item! {
            #[test]
            fn [<test_ $name>]() {
                let program = include_bytes!(concat!("./programs/", stringify!($name), ".b"));
                let input = include_bytes!(concat!("./programs/", stringify!($name), ".b.in"));
                let output = include_bytes!(concat!("./programs/", stringify!($name), ".b.out"));
                run(program, input, output).unwrap();
            }
        }
    };
}

test_program!(hello_world);
test_program!(seven);
test_program!(increment_io);
