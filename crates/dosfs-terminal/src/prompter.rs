//! Interactive yes/no confirmation on the terminal.

use std::io::{self, BufRead, Write};

use dosfs_core::Prompter;

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        let stdin = io::stdin();
        ask(&mut stdin.lock(), &mut io::stderr(), question)
    }
}

/// Ask `question` until a valid answer arrives. End of input or a read
/// error counts as no.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> bool {
    loop {
        if write!(output, "{question} (Y/N)? ").and_then(|()| output.flush()).is_err() {
            return false;
        }
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {},
        }
        if let Some(answer) = parse_answer(&line) {
            return answer;
        }
    }
}

/// `y`/`yes` or `n`/`no`, any case.
pub fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
