//! Conversation transcript for a single solve invocation
//!
//! The transcript is the entire mechanism by which the model sees prior
//! reasoning and execution results; there is no separate memory layer. It is
//! append-only and discarded when `solve` returns.

#![allow(dead_code)]

use llm_core::ChatMessage;

/// Role of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    System,
    User,
    Assistant,
    /// Formatted execution result injected after an assistant turn with code.
    Observation,
}

/// One immutable entry in the transcript.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

/// Ordered, append-only transcript of turns.
///
/// The first turn is always the system turn; observation turns only ever
/// follow an assistant turn.
#[derive(Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create a transcript seeded with the system and user turns.
    pub fn new(system: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            turns: vec![
                Turn {
                    role: TurnRole::System,
                    content: system.into(),
                },
                Turn {
                    role: TurnRole::User,
                    content: query.into(),
                },
            ],
        }
    }

    /// Append the model's raw response as an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: TurnRole::Assistant,
            content: content.into(),
        });
    }

    /// Append a formatted execution result.
    pub fn push_observation(&mut self, content: impl Into<String>) {
        debug_assert!(
            matches!(self.turns.last().map(|t| t.role), Some(TurnRole::Assistant)),
            "observation must follow an assistant turn"
        );
        self.turns.push(Turn {
            role: TurnRole::Observation,
            content: content.into(),
        });
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Content of the most recent assistant turn, if any.
    pub fn last_assistant(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Assistant)
            .map(|t| t.content.as_str())
    }

    /// Render the full history, in order, for the completion call.
    ///
    /// Observation turns carry the user wire role: the formatted execution
    /// result is what the model observes on its next turn.
    pub fn render(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|t| match t.role {
                TurnRole::System => ChatMessage::system(t.content.clone()),
                TurnRole::User | TurnRole::Observation => ChatMessage::user(t.content.clone()),
                TurnRole::Assistant => ChatMessage::assistant(t.content.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_core::Role;

    #[test]
    fn test_seeded_with_system_and_user() {
        let conv = Conversation::new("be helpful", "what is 2+2?");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.turns()[0].role, TurnRole::System);
        assert_eq!(conv.turns()[1].role, TurnRole::User);
        assert_eq!(conv.turns()[1].content, "what is 2+2?");
    }

    #[test]
    fn test_render_preserves_order_and_roles() {
        let mut conv = Conversation::new("sys", "query");
        conv.push_assistant("thinking");
        conv.push_observation("stdout: 4");
        conv.push_assistant("done");

        let messages = conv.render();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "stdout: 4");
        assert_eq!(messages[4].role, Role::Assistant);
    }

    #[test]
    fn test_last_assistant() {
        let mut conv = Conversation::new("sys", "query");
        assert!(conv.last_assistant().is_none());

        conv.push_assistant("first");
        conv.push_observation("obs");
        assert_eq!(conv.last_assistant(), Some("first"));

        conv.push_assistant("second");
        assert_eq!(conv.last_assistant(), Some("second"));
    }
}
