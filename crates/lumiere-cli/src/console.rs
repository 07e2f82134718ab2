//! Terminal input and notices.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use lumiere_core::ServiceError;
use lumiere_speech::NoticeSink;

/// Prints service notices to stderr.
pub struct ConsoleNotices;

impl NoticeSink for ConsoleNotices {
    fn notify(&self, error: &ServiceError) {
        eprintln!("  ! {}", error.user_message());
    }
}

/// Line-oriented prompt over stdin.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}
