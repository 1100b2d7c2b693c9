use std::fmt;
use crate::ints::IntTable;

/// A described fragment of Brainfuck source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    description: String,
    code: String
}

impl CodeSnippet {

    pub fn new<D: Into<String>, C: Into<String>>(description: D, code: C) -> CodeSnippet {
        CodeSnippet {
            description: description.into(),
            code: code.into()
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn code(&self) -> &str {
        &self.code
    }

}

impl fmt::Display for CodeSnippet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<28} {}", self.description, self.code)
    }
}

/// Assembles Brainfuck source from higher-level snippets, then cleans the
/// result up textually before it is handed to the compiler.
///
/// Misuse (unbalanced loops, zero-sized input buffers) panics: the builder
/// is driven by code, not by user input.
pub struct CodeBuilder<'a> {
    snippets: Vec<CodeSnippet>,
    depth: usize,
    ints: &'a IntTable
}

impl<'a> CodeBuilder<'a> {

    pub fn new(ints: &'a IntTable) -> CodeBuilder<'a> {
        CodeBuilder {
            snippets: Vec::new(),
            depth: 0,
            ints
        }
    }

    /// `[-]`: drives the current cell to 0 whatever it holds.
    pub fn clear_cell(&mut self) -> &mut Self {
        self.push(CodeSnippet::new("Clear cell", "[-]"));
        self
    }

    /// Clears the current cell and sets it to `value` using the minimal
    /// encoding from the integer table.
    pub fn set_value(&mut self, value: u8) -> &mut Self {
        self.push(CodeSnippet::new(
            format!("Set number {}", value),
            format!("[-]{}", self.ints.code(value))
        ));
        self
    }

    /// Moves the data pointer by `offset` cells.
    pub fn move_pointer(&mut self, offset: isize) -> &mut Self {
        if offset == 0 {
            return self;
        }
        let direction = if offset > 0 { ">" } else { "<" };
        let distance = offset.abs() as usize;
        self.push(CodeSnippet::new(
            format!("Move {} cells {}.", distance, if offset > 0 { "right" } else { "left" }),
            direction.repeat(distance)
        ));
        self
    }

    /// Opens a loop over the current cell.
    pub fn start_while(&mut self) -> &mut Self {
        self.depth += 1;
        self.push(CodeSnippet::new("Start 'while'.", "["));
        self
    }

    /// Closes the innermost open loop.
    /// Panics if no loop is open.
    pub fn end_while(&mut self) -> &mut Self {
        assert!(self.depth > 0, "Mismatched ] (missing [)");
        self.depth -= 1;
        self.push(CodeSnippet::new("End 'while'.", "]"));
        self
    }

    /// Reads `buffer_size` input bytes into consecutive cells, leaving the
    /// pointer on the last one.
    /// Panics if the buffer size is zero.
    pub fn get_input(&mut self, buffer_size: usize) -> &mut Self {
        assert!(buffer_size >= 1, "Need positive buffer size.");
        self.push(CodeSnippet::new(
            format!("Get {} bytes of input.", buffer_size),
            format!(",{}", ">,".repeat(buffer_size - 1))
        ));
        self
    }

    /// `.`: appends the current cell's character to the output log.
    pub fn output_char(&mut self) -> &mut Self {
        self.push(CodeSnippet::new("Output character.", "."));
        self
    }

    /// Writes `values` into consecutive cells starting at the pointer,
    /// optionally emitting each one, leaving the pointer on the last cell.
    /// With `clean` the cells are assumed to already hold 0 and the
    /// clearing prefix is skipped.
    pub fn write_buffer(&mut self, values: &[u8], clean: bool, output: bool) -> &mut Self {
        let mut code: String = values.iter()
            .map(|&value| format!(
                "{}{}{}>",
                if clean { "" } else { "[-]" },
                self.ints.code(value),
                if output { "." } else { "" }
            ))
            .collect();
        code.pop();
        self.push(CodeSnippet::new(
            format!("Write buffer of {} bytes.", values.len()),
            code.replace("<>", "")
        ));
        self
    }

    pub fn snippets(&self) -> &[CodeSnippet] {
        &self.snippets
    }

    /// Concatenates the snippets and applies the textual cleanups.
    /// Panics if a loop is still open.
    pub fn build(&self) -> String {
        assert!(self.depth == 0, "Unclosed [ (missing ])");
        let code: String = self.snippets.iter().map(|s| s.code.as_str()).collect();
        cleanup(code)
    }

    fn push(&mut self, snippet: CodeSnippet) {
        self.snippets.push(snippet);
    }

}

// Textual peephole cleanup: cancel adjacent inverse pairs until none are
// left, then drop every loop that opens right after another loop closed
// (the previous loop only exits when the cell is 0, so the next one can
// never run).
fn cleanup(mut code: String) -> String {
    const NULLOPS: [&str; 5] = ["+-", "-+", "<>", "><", "[]"];

    loop {
        let mut changed = false;
        for nullop in &NULLOPS {
            if code.contains(nullop) {
                code = code.replace(nullop, "");
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    while let Some(i) = code.find("][") {
        let start = i + 1;
        let mut depth = 0usize;
        let mut end = code.len();
        for (j, c) in code[start..].char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + j + 1;
                        break;
                    }
                },
                _ => {}
            }
        }
        code.replace_range(start..end, "");
    }

    code
}
