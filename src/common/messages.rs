//! Diagnostics that travel alongside successful values.
//!
//! Reading and rendering never abort because one element was unrecognised or
//! referenced a missing style. Instead each stage returns a best-effort value
//! plus the messages it accumulated, in document order. Messages are
//! deduplicated by exact equality at the top-level conversion boundary.

use std::collections::HashSet;

/// A non-fatal diagnostic produced during reading, compiling or rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    /// Recoverable and informational: the input was understood well enough to
    /// continue, but some of it was ignored or approximated.
    Warning(String),
    /// A value could not be produced (for example a failing image converter);
    /// the affected node degrades to empty output.
    Error(String),
}

impl Message {
    /// Create a warning message.
    pub fn warning(text: impl Into<String>) -> Self {
        Message::Warning(text.into())
    }

    /// Create an error message.
    pub fn error(text: impl Into<String>) -> Self {
        Message::Error(text.into())
    }

    /// The message text.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Message::Warning(text) | Message::Error(text) => text,
        }
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self, Message::Warning(_))
    }
}

/// A value together with the diagnostics accumulated while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct WithMessages<T> {
    pub value: T,
    pub messages: Vec<Message>,
}

impl<T> WithMessages<T> {
    /// Wrap a value with no diagnostics.
    pub fn new(value: T) -> Self {
        Self {
            value,
            messages: Vec::new(),
        }
    }

    /// Wrap a value with the given diagnostics.
    pub fn with(value: T, messages: Vec<Message>) -> Self {
        Self { value, messages }
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, func: impl FnOnce(T) -> U) -> WithMessages<U> {
        WithMessages {
            value: func(self.value),
            messages: self.messages,
        }
    }

    /// Chain onto another producer, concatenating diagnostics in order.
    pub fn flat_map<U>(self, func: impl FnOnce(T) -> WithMessages<U>) -> WithMessages<U> {
        let mut next = func(self.value);
        let mut messages = self.messages;
        messages.append(&mut next.messages);
        WithMessages {
            value: next.value,
            messages,
        }
    }
}

/// Remove duplicate messages, keeping the first occurrence of each.
pub fn dedup_messages(messages: &mut Vec<Message>) {
    let mut seen = HashSet::new();
    messages.retain(|message| seen.insert(message.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_deduplicated_preserving_order() {
        let mut messages = vec![
            Message::warning("b"),
            Message::warning("a"),
            Message::warning("b"),
            Message::error("b"),
        ];
        dedup_messages(&mut messages);
        assert_eq!(
            messages,
            vec![
                Message::warning("b"),
                Message::warning("a"),
                Message::error("b"),
            ]
        );
    }

    #[test]
    fn test_flat_map_concatenates_messages_in_order() {
        let first = WithMessages::with(1, vec![Message::warning("first")]);
        let combined =
            first.flat_map(|value| WithMessages::with(value + 1, vec![Message::warning("second")]));
        assert_eq!(combined.value, 2);
        assert_eq!(
            combined.messages,
            vec![Message::warning("first"), Message::warning("second")]
        );
    }
}
