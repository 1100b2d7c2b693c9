use itertools::Itertools;
use crate::BrainfuckError;
use crate::parser::{self, Node};

/// A single counted instruction. `amount` is the length of the run of
/// identical source characters the instruction was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Add { amount: usize },
    Sub { amount: usize },
    Left { amount: usize },
    Right { amount: usize },
    Input { amount: usize },
    Output { amount: usize }
}

/// A compiled segment: either a loop-free run of instructions,
/// or a loop wrapping a nested sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Run(Vec<Instruction>),
    Loop(Vec<Segment>)
}

/// A compiled, immutable program. Compile once, run as many times as needed:
/// a `Program` carries no execution state, so it can be shared freely across
/// threads as long as every execution gets its own tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    segments: Vec<Segment>
}

impl Program {

    /// Compiles Brainfuck source text into a [`Program`](crate::compiler::Program).
    pub fn compile(source: &str) -> Result<Program, BrainfuckError> {
        let nodes = parser::parse(source)?;
        Ok(Program::from_tree(&nodes))
    }

    /// Compiles an already parsed instruction tree.
    pub fn from_tree(nodes: &[Node]) -> Program {
        Program {
            segments: compile_nodes(nodes)
        }
    }

    pub(crate) fn from_segments(segments: Vec<Segment>) -> Program {
        Program { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

}

fn compile_nodes(nodes: &[Node]) -> Vec<Segment> {
    nodes.iter().map(|node| match node {
        Node::Leaf(chars) => Segment::Run(compile_leaf(chars)),
        Node::Loop(body) => Segment::Loop(compile_nodes(body))
    }).collect()
}

// Collapses maximal runs of identical characters into single counted
// instructions. An empty leaf compiles to an empty run.
fn compile_leaf(chars: &[u8]) -> Vec<Instruction> {
    use Instruction::*;

    chars.iter().map(|&c| match c {
        b'+' => Add { amount: 1 },
        b'-' => Sub { amount: 1 },
        b'<' => Left { amount: 1 },
        b'>' => Right { amount: 1 },
        b',' => Input { amount: 1 },
        b'.' => Output { amount: 1 },
        // The filter only lets the six leaf operators and brackets through,
        // and the parser consumes the brackets.
        _ => unreachable!("non-instruction byte {:?} survived filtering", c as char)
    })
    .coalesce(|a, b| {
        match (a, b) {
            (Add { amount: x }, Add { amount: y }) => Ok(Add { amount: x + y }),
            (Sub { amount: x }, Sub { amount: y }) => Ok(Sub { amount: x + y }),
            (Left { amount: x }, Left { amount: y }) => Ok(Left { amount: x + y }),
            (Right { amount: x }, Right { amount: y }) => Ok(Right { amount: x + y }),
            (Input { amount: x }, Input { amount: y }) => Ok(Input { amount: x + y }),
            (Output { amount: x }, Output { amount: y }) => Ok(Output { amount: x + y }),
            (a, b) => Err((a, b))
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Instruction::*;

    fn compile(source: &str) -> Vec<Segment> {
        Program::compile(source).unwrap().segments
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(compile(""), vec![]);
    }

    #[test]
    fn test_runs_are_merged() {
        assert_eq!(compile("+++>>--"), vec![
            Segment::Run(vec![
                Add { amount: 3 },
                Right { amount: 2 },
                Sub { amount: 2 }
            ])
        ]);
    }

    #[test]
    fn test_alternating_runs_stay_separate() {
        assert_eq!(compile("+-+"), vec![
            Segment::Run(vec![
                Add { amount: 1 },
                Sub { amount: 1 },
                Add { amount: 1 }
            ])
        ]);
    }

    #[test]
    fn test_input_runs_are_merged() {
        // A run of `,` compiles to a single counted read; how many bytes it
        // consumes at run time is up to the interpreter's merged-reads switch.
        assert_eq!(compile(",,,"), vec![
            Segment::Run(vec![Input { amount: 3 }])
        ]);
    }

    #[test]
    fn test_empty_loop() {
        assert_eq!(compile("[]"), vec![Segment::Loop(vec![])]);
    }

    #[test]
    fn test_structure_is_preserved() {
        assert_eq!(compile("++[>+[-]<]."), vec![
            Segment::Run(vec![Add { amount: 2 }]),
            Segment::Loop(vec![
                Segment::Run(vec![Right { amount: 1 }, Add { amount: 1 }]),
                Segment::Loop(vec![
                    Segment::Run(vec![Sub { amount: 1 }])
                ]),
                Segment::Run(vec![Left { amount: 1 }])
            ]),
            Segment::Run(vec![Output { amount: 1 }])
        ]);
    }

    #[test]
    fn test_runs_do_not_merge_across_loops() {
        assert_eq!(compile("+[+]+"), vec![
            Segment::Run(vec![Add { amount: 1 }]),
            Segment::Loop(vec![Segment::Run(vec![Add { amount: 1 }])]),
            Segment::Run(vec![Add { amount: 1 }])
        ]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let prog = "++[>+++<-]>,.";
        assert_eq!(Program::compile(prog).unwrap(), Program::compile(prog).unwrap());
    }
}
