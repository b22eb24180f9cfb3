use crate::application::intake::RequestDraft;
use crate::domain::payment_request::UserRef;
use crate::error::{Result, SplitPayError};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Read};

/// One line of a command script.
///
/// `request` is either an alias given to a `create` earlier in the script
/// or the UUID of a stored request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Create {
        #[serde(default)]
        request: Option<String>,
        draft: RequestDraft,
    },
    Reallocate {
        request: String,
        amounts: Vec<u64>,
    },
    Send {
        request: String,
    },
    Pay {
        request: String,
        user: UserRef,
        #[serde(default)]
        reference: Option<String>,
    },
    Cancel {
        request: String,
    },
}

/// Reads commands from a JSON Lines source, one object per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub struct CommandReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and parses commands.
    ///
    /// A malformed line yields an error for that line only; reading goes on.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                line.as_ref()
                    .map(|l| {
                        let l = l.trim();
                        !l.is_empty() && !l.starts_with('#')
                    })
                    .unwrap_or(true)
            })
            .map(|(index, line)| -> Result<Command> {
                let line = line?;
                serde_json::from_str(&line).map_err(|e| {
                    SplitPayError::ValidationError(format!("Line {}: {}", index + 1, e))
                })
            })
    }
}
