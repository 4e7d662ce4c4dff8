//! Interactive vault shell.
//!
//! Each input line is parsed into a `ShellCommand`, which is then run
//! against the open `Vault` passed in by the caller.  The loop owns no
//! state of its own beyond the handle it was given.
//!
//! ```text
//! $> set github hunter2
//! New value : hunter2
//! $> get github
//! github: hunter2
//! $> exit
//! ```

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::errors::Result;
use crate::vault::Vault;

/// Prompt printed before each line is read.
pub const PROMPT: &str = "$> ";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `set <key> <value>`: the value is the rest of the line.
    Set { key: String, value: String },
    /// `unset <key>`
    Unset { key: String },
    /// `get <key>`
    Get { key: String },
    /// `dump`: print every record.
    Dump,
    /// `exit`
    Exit,
}

/// Why a line could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command")]
    Unknown(String),

    #[error("Command {command} requires {required} arguments")]
    MissingArguments {
        command: &'static str,
        required: usize,
    },
}

/// What the loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl ShellCommand {
    /// Parse one input line.  Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, ParseError> {
        let (name, rest) = split_word(line.trim());

        let command = match name {
            "" => return Ok(None),
            "set" => {
                let (key, value) = split_word(rest);
                if key.is_empty() || value.is_empty() {
                    return Err(missing("set", 2));
                }
                Self::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "unset" => Self::Unset {
                key: required_key(rest, "unset")?,
            },
            "get" => Self::Get {
                key: required_key(rest, "get")?,
            },
            "dump" => Self::Dump,
            "exit" => Self::Exit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Run `command` against `vault`, writing its output to `out`.
pub fn execute<W: Write>(vault: &mut Vault, command: ShellCommand, out: &mut W) -> Result<Flow> {
    match command {
        ShellCommand::Set { key, value } => {
            vault.set(&key, &value)?;
            writeln!(out, "New value : {value}")?;
        }
        ShellCommand::Unset { key } => {
            vault.unset(&key)?;
            writeln!(out, "{key} deleted")?;
        }
        ShellCommand::Get { key } => {
            writeln!(out, "{key}: {}", vault.get(&key).unwrap_or("null"))?;
        }
        ShellCommand::Dump => {
            for (key, value) in vault.iter() {
                writeln!(out, "{key}: {value}")?;
            }
        }
        ShellCommand::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

/// Read-evaluate loop: prompt, read a line, run it, repeat.
///
/// Parse errors and failed saves are reported on `err` and the loop
/// carries on.  The loop ends on `exit` or at end of input; only I/O
/// errors on the streams themselves abort it.
pub fn run<R, W, E>(vault: &mut Vault, input: R, out: &mut W, err: &mut E) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(err, "{e}")?;
                continue;
            }
        };

        match execute(vault, command, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) => writeln!(err, "{e}")?,
        }
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn required_key(rest: &str, command: &'static str) -> std::result::Result<String, ParseError> {
    match split_word(rest).0 {
        "" => Err(missing(command, 1)),
        key => Ok(key.to_string()),
    }
}

fn missing(command: &'static str, required: usize) -> ParseError {
    ParseError::MissingArguments { command, required }
}
