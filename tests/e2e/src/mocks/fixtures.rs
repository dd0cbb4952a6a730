//! Deck Fixtures
//!
//! Realistic Dutch/English decks and cards with prepared memory state:
//! - A small three-chunk deck with a gap at chunk 3
//! - Cards placed in each memory phase
//! - Trouble-card scenarios

use chrono::NaiveDate;
use zinnen_core::{DeckImport, FlashCard, UserSession, VocabCard};

/// Sentence, gapped sentence, translation
const CHUNK_1: &[(&str, &str, &str)] = &[
    ("Ik ga naar huis.", "Ik ga ____ huis.", "I am going home."),
    ("Waar is het station?", "Waar is het _______?", "Where is the station?"),
    ("Ik heb honger.", "Ik heb ______.", "I am hungry."),
];

const CHUNK_2: &[(&str, &str, &str)] = &[
    ("Het regent vandaag.", "Het ______ vandaag.", "It is raining today."),
    ("Wij eten om zes uur.", "Wij eten om ___ uur.", "We eat at six o'clock."),
    ("Kun je me helpen?", "Kun je me _______?", "Can you help me?"),
    ("De trein is te laat.", "De trein is te ____.", "The train is late."),
];

const CHUNK_4: &[(&str, &str, &str)] = &[
    ("Ik woon in Utrecht.", "Ik woon in _______.", "I live in Utrecht."),
    ("Hoeveel kost dit?", "Hoeveel ____ dit?", "How much does this cost?"),
];

/// Factory for test decks
///
/// ```rust,ignore
/// let deck = DeckFixtures::dutch_deck();
/// db.seed_deck(&deck);
/// ```
pub struct DeckFixtures;

impl DeckFixtures {
    /// The day fixtures treat as "today" unless told otherwise
    pub fn start_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    /// Chunks 1, 2 and 4 (chunk 3 deliberately missing), vocabulary, and a
    /// session at the start of chunk 1
    pub fn dutch_deck() -> DeckImport {
        let mut cards = Vec::new();
        for (chunk_id, rows) in [(1, CHUNK_1), (2, CHUNK_2), (4, CHUNK_4)] {
            for (i, (source, game, translation)) in rows.iter().enumerate() {
                cards.push(FlashCard::new(chunk_id, i as u32 + 1, *source, *game, *translation));
            }
        }

        DeckImport {
            cards,
            vocab: Self::vocab(),
            session: Some(UserSession {
                current_chunk_id: 1,
                flashcard_position: 0,
                user_preferences: r#"{"tts":true}"#.to_string(),
                last_updated: Self::start_day(),
            }),
        }
    }

    /// Same deck without a starting session
    pub fn dutch_deck_without_session() -> DeckImport {
        DeckImport {
            session: None,
            ..Self::dutch_deck()
        }
    }

    pub fn vocab() -> Vec<VocabCard> {
        [
            ("trein", "noun", "train", Some("de")),
            ("huis", "noun", "house", Some("het")),
            ("helpen", "verb", "to help", None),
            ("station", "noun", "station", Some("het")),
            ("laat", "adjective", "late", None),
        ]
        .into_iter()
        .map(|(word, word_type, translation, article)| VocabCard {
            word: word.to_string(),
            word_type: word_type.to_string(),
            translation: translation.to_string(),
            article: article.map(str::to_string),
        })
        .collect()
    }

    /// Number of cards in [`DeckFixtures::dutch_deck`] for a chunk
    pub fn chunk_size(chunk_id: u32) -> usize {
        match chunk_id {
            1 => CHUNK_1.len(),
            2 => CHUNK_2.len(),
            4 => CHUNK_4.len(),
            _ => 0,
        }
    }

    /// A simple card with numbered sentences
    pub fn card(chunk_id: u32, id: u32) -> FlashCard {
        FlashCard::new(
            chunk_id,
            id,
            format!("Dit is zin {} van blok {}.", id, chunk_id),
            format!("Dit is ___ {} van blok {}.", id, chunk_id),
            format!("This is sentence {} of chunk {}.", id, chunk_id),
        )
    }

    /// A card that has already been reviewed
    pub fn reviewed(
        chunk_id: u32,
        id: u32,
        last_reviewed: NaiveDate,
        strength: u32,
        ease: f64,
        interval: u32,
    ) -> FlashCard {
        Self::card(chunk_id, id).with_memory(last_reviewed, strength, ease, interval)
    }

    /// One card per memory phase, none due on [`DeckFixtures::start_day`]
    /// except the unseen card
    pub fn memory_phase_cards() -> Vec<FlashCard> {
        let day = Self::start_day();
        let yesterday = day.pred_opt().expect("valid date");
        vec![
            Self::card(1, 1),
            Self::reviewed(1, 2, yesterday, 1, 2.6, 2),
            Self::reviewed(1, 3, yesterday, 4, 2.8, 30),
            Self::reviewed(1, 4, day, 0, 1.9, 1),
        ]
    }

    /// Fifteen reviewed cards, none due on [`DeckFixtures::start_day`],
    /// with strengths 0..=4 and eases spread over [1.3, 2.7]
    pub fn trouble_scenario() -> Vec<FlashCard> {
        let day = Self::start_day();
        (1..=15)
            .map(|i| {
                let ease = 1.3 + f64::from(i % 8) * 0.2;
                Self::reviewed(2, i, day, i % 5, ease, 10 + i)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dutch_deck_shape() {
        let deck = DeckFixtures::dutch_deck();
        assert_eq!(deck.cards.len(), 9);
        assert!(deck.cards.iter().all(|c| c.chunk_id != 3));
        assert!(deck.cards.iter().all(FlashCard::is_new));
        assert_eq!(DeckFixtures::chunk_size(2), 4);
    }

    #[test]
    fn test_trouble_scenario_not_due() {
        let today = DeckFixtures::start_day();
        assert!(DeckFixtures::trouble_scenario().iter().all(|c| !c.is_due(today)));
    }
}
