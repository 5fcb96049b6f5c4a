use std::collections::VecDeque;
use std::io::{self, BufRead};

/// All commands a player can issue.
///
/// Numbers are kept exactly as typed: 1-based, and possibly negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `mpp <src> <count> <dest>`: move a chunk between cascades.
    MovePile { src: i64, count: i64, dest: i64 },
    /// `md <dest>`: draw card onto a cascade.
    MoveDraw { dest: i64 },
    /// `mpf <src> <foundation>`: cascade top onto a foundation.
    MoveToFoundation { src: i64, foundation: i64 },
    /// `mdf <foundation>`: draw card onto a foundation.
    MoveDrawToFoundation { foundation: i64 },
    /// `dd`: discard the front draw card.
    DiscardDraw,
    /// `q` / `Q`.
    Quit,
    /// Anything else in command position.
    Unknown(String),
}

/// Reads [`Command`]s from a whitespace-delimited token stream.
///
/// Input is pulled one line at a time, so an interactive reader is never
/// asked for more than the next command needs. Tokens that should have
/// been numbers but were not are skipped and counted; see
/// [`CommandReader::take_skipped`].
pub struct CommandReader<R> {
    input: R,
    tokens: VecDeque<String>,
    skipped: usize,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(input: R) -> Self {
        CommandReader {
            input,
            tokens: VecDeque::new(),
            skipped: 0,
        }
    }

    /// The next command, or `Ok(None)` once input is exhausted
    /// (including mid-command).
    pub fn next_command(&mut self) -> io::Result<Option<Command>> {
        let Some(token) = self.next_token()? else {
            return Ok(None);
        };

        let cmd = match token.to_lowercase().as_str() {
            "mpp" => {
                let (Some(src), Some(count), Some(dest)) = (
                    self.next_number()?,
                    self.next_number()?,
                    self.next_number()?,
                ) else {
                    return Ok(None);
                };
                match (src, count, dest) {
                    (Arg::Number(src), Arg::Number(count), Arg::Number(dest)) => {
                        Command::MovePile { src, count, dest }
                    }
                    _ => Command::Quit,
                }
            }
            "md" => match self.next_number()? {
                Some(Arg::Number(dest)) => Command::MoveDraw { dest },
                Some(Arg::Quit) => Command::Quit,
                None => return Ok(None),
            },
            "mpf" => {
                let (Some(src), Some(foundation)) = (self.next_number()?, self.next_number()?)
                else {
                    return Ok(None);
                };
                match (src, foundation) {
                    (Arg::Number(src), Arg::Number(foundation)) => {
                        Command::MoveToFoundation { src, foundation }
                    }
                    _ => Command::Quit,
                }
            }
            "mdf" => match self.next_number()? {
                Some(Arg::Number(foundation)) => Command::MoveDrawToFoundation { foundation },
                Some(Arg::Quit) => Command::Quit,
                None => return Ok(None),
            },
            "dd" => Command::DiscardDraw,
            "q" => Command::Quit,
            _ => Command::Unknown(token),
        };
        Ok(Some(cmd))
    }

    /// How many non-numeric argument tokens were skipped since the last call.
    pub fn take_skipped(&mut self) -> usize {
        std::mem::take(&mut self.skipped)
    }

    /// Next numeric argument, skipping junk. A `q` ends the command early.
    fn next_number(&mut self) -> io::Result<Option<Arg>> {
        // Once a quit has been seen, later argument slots resolve to quit
        // without consuming input.
        loop {
            let Some(token) = self.peek_token()? else {
                return Ok(None);
            };
            if token.eq_ignore_ascii_case("q") {
                return Ok(Some(Arg::Quit));
            }
            let parsed = token.parse::<i64>().ok();
            self.tokens.pop_front();
            match parsed {
                Some(n) => return Ok(Some(Arg::Number(n))),
                None => self.skipped += 1,
            }
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        self.peek_token()?;
        Ok(self.tokens.pop_front())
    }

    fn peek_token(&mut self) -> io::Result<Option<&str>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.tokens.front().map(String::as_str))
    }
}

/// One argument slot of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arg {
    Number(i64),
    Quit,
}
