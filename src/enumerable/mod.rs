//! Pull-based enumeration over host collections.
//!
//! This module provides:
//! - `Enumerator`, the cursor handed to the query engine
//! - `to_enumerator`, the adapter from runtime values to enumerators
//! - `deduce_element_type`, the static counterpart used at catalog build

mod adapter;
mod element_type;

use std::fmt;

use crate::types::Value;

pub use adapter::to_enumerator;
pub use element_type::deduce_element_type;

/// Cursor over a sequence of values.
///
/// Supports both `move_next`/`current` pulls and the `Iterator` protocol.
/// An enumerator is single-consumer; request a fresh one per consumer.
pub struct Enumerator {
    source: Box<dyn Iterator<Item = Value> + Send>,
    current: Option<Value>,
}

impl Enumerator {
    /// Wraps an owned iterator.
    pub fn new<I>(source: I) -> Self
    where
        I: Iterator<Item = Value> + Send + 'static,
    {
        Enumerator {
            source: Box::new(source),
            current: None,
        }
    }

    /// Creates an enumerator with no elements.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Advances to the next element; returns false once exhausted.
    pub fn move_next(&mut self) -> bool {
        self.current = self.source.next();
        self.current.is_some()
    }

    /// Returns the element the last `move_next` landed on.
    #[must_use]
    pub fn current(&self) -> Option<&Value> {
        self.current.as_ref()
    }
}

impl Iterator for Enumerator {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.move_next() {
            self.current.clone()
        } else {
            None
        }
    }
}

impl fmt::Debug for Enumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
