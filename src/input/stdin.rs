//! # Line-Buffered Key Source
//!
//! Reads keys from piped stdin (or any other buffered reader) a line at a
//! time. Every non-whitespace character in a line counts as one key press.
//! Interactive terminals use [`super::terminal::RawKeys`] instead.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin};

use crate::error::{Result, SumdBridgeError};

use super::KeySource;

/// Key source over any buffered reader
pub struct LineKeys<R> {
    reader: R,
    pending: VecDeque<char>,
}

impl LineKeys<BufReader<Stdin>> {
    /// Read keys from the process's standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> LineKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead + Send> KeySource for LineKeys<R> {
    fn next_key(&mut self) -> Result<Option<char>> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }

            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| SumdBridgeError::Input(format!("Failed to read keys: {}", e)))?;
            if read == 0 {
                return Ok(None);
            }

            self.pending
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }
}
