//! Line-oriented prompt helpers.
//!
//! Input and output are generic so sessions can be driven from scripted
//! buffers in tests.

use std::io::{self, BufRead, Write};

const YES_WORDS: &[&str] = &["y", "yes", "是"];
const NO_WORDS: &[&str] = &["n", "no", "否"];

/// Parses a yes/no answer. Returns `None` for anything else.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    let answer = answer.trim().to_lowercase();
    if YES_WORDS.contains(&answer.as_str()) {
        Some(true)
    } else if NO_WORDS.contains(&answer.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parses a 1-based menu number into a 0-based index below `len`.
pub fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let number: usize = answer.trim().parse().ok()?;
    if number == 0 || number > len {
        return None;
    }
    Some(number - 1)
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line of output.
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Prints `prompt` and reads one trimmed line.
    ///
    /// # Errors
    /// `UnexpectedEof` once input is exhausted.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Asks until a yes/no answer is given.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        loop {
            if let Some(answer) = parse_yes_no(&self.ask(prompt)?) {
                return Ok(answer);
            }
            self.say("Please answer y/n.")?;
        }
    }

    /// Like [`Self::confirm`], but empty input returns `None`.
    pub fn confirm_or_skip(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(answer) = parse_yes_no(&answer) {
                return Ok(Some(answer));
            }
            self.say("Please answer y/n, or press Enter to skip.")?;
        }
    }

    /// Single yes/no question where anything but "yes" means no.
    pub fn agree(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(parse_yes_no(&self.ask(prompt)?) == Some(true))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_choice, parse_yes_no, Console};
    use std::io::Cursor;

    #[test]
    fn yes_no_accepts_english_and_chinese_words() {
        assert_eq!(parse_yes_no(" Y "), Some(true));
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no("是"), Some(true));
        assert_eq!(parse_yes_no("NO"), Some(false));
        assert_eq!(parse_yes_no("否"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn choice_is_one_based_and_bounded() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice(" 3 ", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
        assert_eq!(parse_choice("1", 0), None);
    }

    #[test]
    fn confirm_repeats_until_valid_answer() {
        let mut console = Console::new(Cursor::new("hmm\nn\n"), Vec::new());
        assert!(!console.confirm("ok? ").unwrap());
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Please answer y/n."));
    }

    #[test]
    fn ask_reports_closed_input() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        let err = console.ask("name: ").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
