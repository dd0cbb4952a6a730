//! Learning modes and the order they cycle in

use serde::{Deserialize, Serialize};

use crate::card::FlashCard;

/// How a card is presented while practicing a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningMode {
    /// Gapped sentence, full sentence flashed first
    #[default]
    Learn,
    /// Gapped sentence, no hint
    PracticeRecall,
    /// Sentence shown, translation expected
    SourceToTarget,
    /// Translation shown, sentence expected
    TargetToSource,
}

impl LearningMode {
    /// All modes in cycle order
    pub const CYCLE: [LearningMode; 4] = [
        LearningMode::Learn,
        LearningMode::PracticeRecall,
        LearningMode::SourceToTarget,
        LearningMode::TargetToSource,
    ];

    /// The mode after this one, wrapping back to [`LearningMode::Learn`]
    pub fn next(self) -> Self {
        match self {
            LearningMode::Learn => LearningMode::PracticeRecall,
            LearningMode::PracticeRecall => LearningMode::SourceToTarget,
            LearningMode::SourceToTarget => LearningMode::TargetToSource,
            LearningMode::TargetToSource => LearningMode::Learn,
        }
    }

    /// Text shown to the learner
    pub fn prompt(self, card: &FlashCard) -> &str {
        match self {
            LearningMode::Learn | LearningMode::PracticeRecall => &card.game_sentence,
            LearningMode::SourceToTarget => &card.source_sentence,
            LearningMode::TargetToSource => &card.translation,
        }
    }

    /// Answer the learner has to type
    pub fn expected(self, card: &FlashCard) -> &str {
        match self {
            LearningMode::SourceToTarget => &card.translation,
            _ => &card.source_sentence,
        }
    }

    /// Whether the full answer is flashed before input
    pub fn reveals_answer(self) -> bool {
        self == LearningMode::Learn
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::Learn => "learn",
            LearningMode::PracticeRecall => "practice-recall",
            LearningMode::SourceToTarget => "source-to-target",
            LearningMode::TargetToSource => "target-to-source",
        }
    }

    pub fn parse_name(name: &str) -> Option<Self> {
        Self::CYCLE.into_iter().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for LearningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
