//! Cross-cutting types shared by every conversion stage.

pub mod error;
pub mod messages;

pub use error::{Error, Result};
pub use messages::{dedup_messages, Message, WithMessages};

#[cfg(test)]
mod tests {
    use super::{dedup_messages, Message};

    #[test]
    fn test_dedup_is_reachable_at_the_module_surface() {
        let mut messages = vec![Message::warning("x"), Message::warning("x")];
        dedup_messages(&mut messages);
        assert_eq!(messages, vec![Message::warning("x")]);
    }
}
