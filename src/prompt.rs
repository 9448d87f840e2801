//! Interactive prompting.
//!
//! The auth and command layers never read the console directly; they go
//! through [`Prompter`] so flows can be driven by a scripted fake in tests.

use std::io::{self, BufRead, Write};

/// A source of interactive user input.
pub trait Prompter {
    /// Read one line of input. An empty label prints no prompt text.
    fn read_line(&self, label: &str) -> io::Result<String>;

    /// Present numbered options and return the chosen index.
    fn choose_one(&self, label: &str, options: &[String]) -> io::Result<usize>;
}

/// Stdin-backed prompter used by the real CLI.
pub struct StdinPrompter;

impl StdinPrompter {
    fn prompt(label: &str) -> io::Result<String> {
        if !label.is_empty() {
            print!("{label}: ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim().to_string())
    }
}

impl Prompter for StdinPrompter {
    fn read_line(&self, label: &str) -> io::Result<String> {
        Self::prompt(label)
    }

    fn choose_one(&self, label: &str, options: &[String]) -> io::Result<usize> {
        println!("\n{label}:");
        for (i, option) in options.iter().enumerate() {
            println!("{}. {}", i + 1, option);
        }
        loop {
            let choice = Self::prompt("\nChoice")?;
            if let Ok(n) = choice.parse::<usize>() {
                if n >= 1 && n <= options.len() {
                    return Ok(n - 1);
                }
            }
            println!("Invalid choice");
        }
    }
}

/// Scripted prompter for tests: answers come from a fixed queue.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::cell::RefCell<std::collections::VecDeque<String>>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: std::cell::RefCell::new(answers.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn read_line(&self, _label: &str) -> io::Result<String> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn choose_one(&self, _label: &str, options: &[String]) -> io::Result<usize> {
        let answer = self.read_line("")?;
        let n: usize = answer
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-numeric choice"))?;
        if n < 1 || n > options.len() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "choice out of range"));
        }
        Ok(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompter_pops_in_order() {
        let prompter = ScriptedPrompter::new(["first", "second"]);
        assert_eq!(prompter.read_line("x").unwrap(), "first");
        assert_eq!(prompter.read_line("y").unwrap(), "second");
        assert!(prompter.read_line("z").is_err());
    }

    #[test]
    fn test_scripted_prompter_choose_one() {
        let prompter = ScriptedPrompter::new(["2"]);
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(prompter.choose_one("pick", &options).unwrap(), 1);
    }
}
