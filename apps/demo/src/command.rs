/// One line of demo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoCommand {
    /// Same as tapping the "Assert" button: a failing assertion.
    Assert(Option<String>),
    Pass,
    Quit,
    Empty,
    Unknown(String),
}

impl DemoCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "assert" | "a" => Self::Assert((!rest.is_empty()).then(|| rest.to_owned())),
            "pass" | "p" => Self::Pass,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_owned()),
        }
    }
}
