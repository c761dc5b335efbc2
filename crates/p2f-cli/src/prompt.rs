//! Terminal prompts.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use p2f_domain::Prompter;
use p2f_pipeline::AFFIRMATIVE_TOKENS;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Reads answers from the terminal with line editing.
pub struct ConsolePrompter {
    editor: DefaultEditor,
    format: OutputFormat,
}

impl ConsolePrompter {
    /// Create a prompter on the current terminal.
    ///
    /// With a machine-readable `format` the leading lines of a question are
    /// written to stderr so stdout holds only the summary.
    pub fn new(format: OutputFormat) -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| CliError::Prompt(format!("Failed to initialize editor: {}", e)))?;
        Ok(Self { editor, format })
    }
}

/// Split a question into the lines printed up front and the editable
/// last line.
fn split_question(question: &str) -> (Option<&str>, &str) {
    match question.rsplit_once('\n') {
        Some((head, tail)) => (Some(head), tail),
        None => (None, question),
    }
}

impl Prompter for ConsolePrompter {
    type Error = CliError;

    /// Leading lines of a multi-line question are printed first; only the
    /// last line becomes the editable prompt. End of input counts as an
    /// empty answer.
    fn ask(&mut self, question: &str) -> Result<String> {
        let (head, prompt) = split_question(question);
        if let Some(head) = head {
            if self.format.is_machine_readable() {
                eprintln!("{}", head);
            } else {
                println!("{}", head);
            }
        }

        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Ok(String::new()),
            Err(ReadlineError::Interrupted) => Err(CliError::Interrupted),
            Err(e) => Err(CliError::Prompt(e.to_string())),
        }
    }
}

/// Whether an answer is a yes.
pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE_TOKENS.contains(&answer.trim())
}

/// Ask a yes/no question; anything but a yes is a no.
pub fn confirm<P>(prompter: &mut P, question: &str) -> std::result::Result<bool, P::Error>
where
    P: Prompter,
{
    let answer = prompter.ask(question)?;
    Ok(is_affirmative(&answer))
}
