//! Line-oriented terminal I/O used by the flow.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use super::error::FlowError;
use crate::table::GridTable;

pub trait Terminal {
    /// Show `prompt` and read one answer line (without the line ending)
    fn ask(&mut self, prompt: &str) -> Result<String, FlowError>;

    /// Print one status line
    fn say(&mut self, line: &str);

    fn show_table(&mut self, table: &GridTable) {
        let rendered = table.to_string();
        self.say(rendered.trim_end());
    }
}

/// Real stdin/stdout
#[derive(Debug, Default)]
pub struct StdioTerminal;

impl StdioTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for StdioTerminal {
    fn ask(&mut self, prompt: &str) -> Result<String, FlowError> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(FlowError::InputClosed {
                prompt: prompt.to_string(),
            });
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Pre-recorded answers; records every prompt and printed line
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    output: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every prompt asked, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Every line printed via `say`, in order
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Answers nobody asked for
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn ask(&mut self, prompt: &str) -> Result<String, FlowError> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| FlowError::InputClosed {
                prompt: prompt.to_string(),
            })
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
