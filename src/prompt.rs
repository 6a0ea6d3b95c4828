use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::CompressionTarget;
use crate::error::Error;

/// Question/answer channel over any reader and writer
///
/// Every `ask_*` loop re-prompts without limit on bad input; the only way out
/// besides a valid answer is the input being closed.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints one line
    pub fn say(&mut self, line: impl Display) -> Result<(), Error> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `question` and returns the answer without its line ending
    pub fn ask(&mut self, question: &str) -> Result<String, Error> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        let answer = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(answer);
        Ok(line)
    }

    /// Asks until the answer is a number within `[1, 200]`
    pub fn ask_target(&mut self) -> Result<CompressionTarget, Error> {
        loop {
            let answer = self.ask("Enter the compression target percentage (1-200): ")?;
            match answer.trim().parse::<f64>() {
                Ok(value) => match CompressionTarget::new(value) {
                    Some(target) => return Ok(target),
                    None => self.say("Please enter a value between 1 and 200.")?,
                },
                Err(_) => self.say("Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Asks for a 1-based menu choice and returns it as a 0-based index
    pub fn ask_choice(&mut self, count: usize) -> Result<usize, Error> {
        loop {
            let answer = self.ask("Enter the number of your choice: ")?;
            match answer.trim().parse::<usize>() {
                Ok(choice) if (1..=count).contains(&choice) => return Ok(choice - 1),
                Ok(_) => self.say("Invalid choice. Please try again.")?,
                Err(_) => self.say("Invalid input. Please enter a number.")?,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn ask_strips_line_endings_only() {
        let mut p = prompter("  spaced dir \r\n");
        assert_eq!(p.ask("? ").unwrap(), "  spaced dir ");
    }

    #[test]
    fn target_rejects_garbage_and_out_of_range() {
        let mut p = prompter("abc\n0\n200.5\n-3\n75\n");
        let target = p.ask_target().unwrap();
        assert_eq!(target.percent(), 75.0);
        let out = transcript(p);
        assert_eq!(out.matches("Invalid input. Please enter a number.").count(), 1);
        assert_eq!(out.matches("Please enter a value between 1 and 200.").count(), 3);
    }

    #[test]
    fn target_accepts_boundaries() {
        assert_eq!(prompter("1\n").ask_target().unwrap().percent(), 1.0);
        assert_eq!(prompter("200\n").ask_target().unwrap().percent(), 200.0);
        assert_eq!(prompter(" 12.5 \n").ask_target().unwrap().percent(), 12.5);
    }

    #[test]
    fn target_fails_when_input_closes() {
        assert!(matches!(prompter("nope\n").ask_target(), Err(Error::InputClosed)));
    }

    #[test]
    fn choice_is_one_based() {
        let mut p = prompter("0\nx\n4\n3\n");
        assert_eq!(p.ask_choice(3).unwrap(), 2);
        let out = transcript(p);
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 2);
        assert_eq!(out.matches("Invalid input. Please enter a number.").count(), 1);
    }
}
