//! Whitespace splitting of an input line into borrowed tokens.

use crate::error::FatalError;
use std::ops::Index;
use tracing::trace;

/// Characters that separate tokens: space, tab, newline, carriage return and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\n', '\r', '\x07'];

/// Ordered, non-empty views into the line they were split from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens<'a> {
    items: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Token at `index`, or `None` once past the last one.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.items.get(index).copied()
    }

    /// The command name, if there is one.
    pub fn first(&self) -> Option<&'a str> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.items
    }
}

impl<'a> Index<usize> for Tokens<'a> {
    type Output = &'a str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

/// Split `line` on [`DELIMITERS`], dropping the empty spans between consecutive ones.
///
/// Token storage starts with `capacity` slots and grows by `increment` when full;
/// growth failure is [`FatalError::Allocation`].
pub fn split_line(line: &str, capacity: usize, increment: usize) -> Result<Tokens<'_>, FatalError> {
    let increment = increment.max(1);
    let mut items: Vec<&str> = Vec::new();
    items.try_reserve_exact(capacity.max(1))?;

    for token in line.split(DELIMITERS).filter(|t| !t.is_empty()) {
        if items.len() == items.capacity() {
            items.try_reserve_exact(increment)?;
        }
        items.push(token);
    }

    trace!(count = items.len(), "split line");
    Ok(Tokens { items })
}
