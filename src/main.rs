#[macro_use] extern crate log;

use std::io::{self, Write};
use std::time::Duration;
use clap::{App, Arg, ArgMatches};
use bfforge::{Addressing, BrainfuckError, InputProvider, Program, Tape};
use bfforge::interpreter::{Interpreter, InterpreterBuilder};

/// Interactive input: one prompted line of stdin per request.
struct StdinInput;

impl InputProvider for StdinInput {
    fn read_line(&mut self) -> io::Result<String> {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(|c| c == '\n' || c == '\r').to_owned())
    }
}

// In-place tape rendering for `--watch`, one frame per executed instruction.
fn render_frame(tape: &Tape) {
    let mut columns = Vec::with_capacity(tape.length());
    for i in 0..tape.length() as isize {
        let value = format!("{:>3}", tape.cells().get(&i).copied().unwrap_or(0));
        if i == tape.position() {
            columns.push(format!("*{}*", value));
        } else {
            columns.push(value);
        }
    }
    print!("\r{}", columns.join(" | "));
    let _ = io::stdout().flush();
}

fn configure(builder: &mut InterpreterBuilder, matches: &ArgMatches) -> Result<(), BrainfuckError> {

    if let Some(length) = matches.value_of("tape-length") {
        let length = length.parse::<usize>()
            .map_err(|_| format!("Invalid tape length: {}", length))?;
        builder.tape_length(length);
    }

    if let Some(mode) = matches.value_of("addressing") {
        let mode: Addressing = mode.parse()?;
        builder.addressing(mode);
    }

    if let Some(timeout) = matches.value_of("timeout") {
        let secs = timeout.parse::<f64>()
            .map_err(|_| format!("Invalid timeout: {}", timeout))?;
        builder.timeout(Duration::from_secs_f64(secs));
    }

    if let Some(text) = matches.value_of("input") {
        builder.queue_input(text.bytes());
    }

    if matches.is_present("each-read") {
        builder.merge_reads(false);
    }

    if let Some(rate) = matches.value_of("watch") {
        let rate = rate.parse::<f64>()
            .map_err(|_| format!("Invalid frame rate: {}", rate))?;
        builder.frame_rate(rate).observe(render_frame);
    }

    Ok(())
}

fn main_execute(path: &str, matches: &ArgMatches) -> Result<(), BrainfuckError> {

    // Compile the file
    debug!("Opening {}.", path);
    let source = std::fs::read_to_string(path)?;
    debug!("Compiling source file.");
    let program = Program::compile(&source)?;

    // Prepare an interpreter to run the program
    let mut builder = Interpreter::builder();
    builder.input(StdinInput);
    configure(&mut builder, matches)?;
    let mut interpreter = builder.build();

    // Aaaaand, run!
    debug!("Running program.");
    let result = interpreter.run(&program);
    if matches.is_present("watch") {
        println!();
    }
    result?;
    debug!("Done.");

    print!("{}", interpreter.tape().output());
    io::stdout().flush()?;

    Ok(())

}

fn main() {

    // All the cli options are here
    let matches = App::new("bfforge")
        .version("0.1.0")
        .about("A Brainfuck interpreter and program synthesis toolkit")
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1)
        )
        .arg(
            Arg::with_name("tape-length")
                .short("l")
                .long("tape-length")
                .takes_value(true)
                .help("Number of cells on the tape")
        )
        .arg(
            Arg::with_name("addressing")
                .short("a")
                .long("addressing")
                .takes_value(true)
                .possible_values(&["bounded", "cyclic", "unbounded"])
                .help("Policy for pointer moves outside the tape")
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .help("Time budget in seconds")
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .help("Pre-supplied input text, bypassing the interactive prompt")
        )
        .arg(
            Arg::with_name("each-read")
                .long("each-read")
                .help("Consume one input byte per , even in a merged run")
        )
        .arg(
            Arg::with_name("watch")
                .short("w")
                .long("watch")
                .takes_value(true)
                .help("Render the tape after every instruction at the given frame rate")
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity. Repeat to increase.")
        )
        .get_matches();

    // Initialize logger as soon as possible
    let verbosity = match matches.occurrences_of("v") {
        0     => "warn",
        1     => "info",
        2     => "debug",
        3 | _ => "trace"
    };
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("BFFORGE_LOG", format!("bfforge={}", verbosity))
            .write_style_or("BFFORGE_LOG_STYLE", "auto")
    )
    .init();

    let file = matches.value_of("INPUT").unwrap();
    if let Err(e) = main_execute(file, &matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}
