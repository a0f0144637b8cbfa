//! Canonical conversation transcript

use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::messages::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Ordered user/assistant turns exactly as the remote model saw them.
///
/// Append-only through [`Transcript::push_exchange`]; the only other mutation
/// is [`Transcript::clear`], which empties it entirely and bumps the
/// generation. Every way in (construction, deserialization, append) checks
/// the same rules: turns alternate user/assistant starting with user, no turn
/// is empty, and no block carries a cache breakpoint or is a marker block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
    generation: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a transcript from stored turns
    pub fn from_turns(turns: Vec<Turn>) -> PromptCacheResult<Self> {
        if turns.len() % 2 != 0 {
            return Err(PromptCacheError::invalid_field(
                "transcript",
                format!("Expected complete exchanges, got {} turns", turns.len()),
            ));
        }
        for (index, turn) in turns.iter().enumerate() {
            let expected = if index % 2 == 0 { Role::User } else { Role::Assistant };
            check_turn(index, turn, expected)?;
        }
        Ok(Self {
            turns,
            generation: 0,
        })
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Reset counter; changes every time the transcript is cleared
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of completed user/assistant exchanges
    pub fn exchange_count(&self) -> usize {
        self.turns.len() / 2
    }

    /// Drop every turn and start a new generation
    pub fn clear(&mut self) {
        self.turns.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Append one completed exchange
    pub(crate) fn push_exchange(&mut self, user: Turn, assistant: Turn) -> PromptCacheResult<()> {
        let index = self.turns.len();
        check_turn(index, &user, Role::User)?;
        check_turn(index + 1, &assistant, Role::Assistant)?;
        self.turns.push(user);
        self.turns.push(assistant);
        Ok(())
    }
}

impl TryFrom<Vec<Turn>> for Transcript {
    type Error = PromptCacheError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        Self::from_turns(turns)
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}

fn check_turn(index: usize, turn: &Turn, expected: Role) -> PromptCacheResult<()> {
    let problem = if turn.role != expected {
        format!("Turn {} should be {}, found {}", index, expected, turn.role)
    } else if turn.content.is_empty() {
        format!("Turn {} has no content", index)
    } else if turn.content.iter().any(|b| b.breakpoint().is_some()) {
        format!("Turn {} carries a cache breakpoint", index)
    } else {
        return Ok(());
    };
    Err(PromptCacheError::invalid_field("transcript", problem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBreakpoint, CacheTtl};
    use crate::llm::messages::ContentBlock;

    #[test]
    fn test_clear_bumps_generation() {
        let mut transcript = Transcript::new();
        transcript
            .push_exchange(Turn::user("Hi"), Turn::assistant(vec![ContentBlock::text("Hello")]))
            .unwrap();
        assert_eq!(transcript.exchange_count(), 1);

        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.generation(), 1);
    }

    #[test]
    fn test_push_rejects_wrong_roles() {
        let mut transcript = Transcript::new();
        let err = transcript
            .push_exchange(Turn::assistant(vec![ContentBlock::text("Hello")]), Turn::user("Hi"))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_from_turns_validates_alternation() {
        assert!(Transcript::from_turns(vec![Turn::user("a")]).is_err());
        assert!(Transcript::from_turns(vec![Turn::user("a"), Turn::user("b")]).is_err());

        let transcript = Transcript::from_turns(vec![
            Turn::user("a"),
            Turn::assistant(vec![ContentBlock::text("b")]),
        ])
        .unwrap();
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_serializes_as_turn_array() {
        let transcript = Transcript::from_turns(vec![
            Turn::user("a"),
            Turn::assistant(vec![ContentBlock::text("b")]),
        ])
        .unwrap();
        let value = serde_json::to_value(&transcript).unwrap();
        assert!(value.is_array());
        let back: Transcript = serde_json::from_value(value).unwrap();
        assert_eq!(back, transcript);
    }

    #[test]
    fn test_from_turns_rejects_cache_artifacts() {
        let with_marker = vec![
            Turn {
                role: Role::User,
                content: vec![
                    ContentBlock::text("Hi"),
                    ContentBlock::cache_marker(CacheTtl::Short),
                ],
            },
            Turn::assistant(vec![ContentBlock::text("Hello")]),
        ];
        assert!(Transcript::from_turns(with_marker).is_err());

        let annotated_reply = vec![
            Turn::user("Hi"),
            Turn::assistant(vec![
                ContentBlock::text("Hello").with_breakpoint(CacheBreakpoint::long()),
            ]),
        ];
        let err = Transcript::from_turns(annotated_reply).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_empty_turns_rejected() {
        assert!(Transcript::from_turns(vec![Turn::user("Hi"), Turn::assistant(vec![])]).is_err());

        let mut transcript = Transcript::new();
        assert!(
            transcript
                .push_exchange(Turn::user("Hi"), Turn::assistant(vec![]))
                .is_err()
        );
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_deserialize_applies_the_same_checks() {
        let starts_with_assistant = r#"[
            {"role": "assistant", "content": [{"type": "text", "text": "Hello"}]},
            {"role": "user", "content": [{"type": "text", "text": "Hi"}]}
        ]"#;
        assert!(serde_json::from_str::<Transcript>(starts_with_assistant).is_err());

        let marker = r#"[
            {"role": "user", "content": [
                {"type": "text", "text": "Hi"},
                {"type": "text", "text": "", "cache": {"ttl": "5m"}}
            ]},
            {"role": "assistant", "content": [{"type": "text", "text": "Hello"}]}
        ]"#;
        assert!(serde_json::from_str::<Transcript>(marker).is_err());
    }
}
