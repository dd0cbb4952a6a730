//! Journey: a learner's first days
//!
//! Import a deck, learn the first chunk through every mode, move on, and
//! come back when the learned cards fall due.

use chrono::Days;
use zinnen_core::{LearningMode, MemoryPhase};
use zinnen_e2e_tests::{DeckFixtures, TestDatabaseManager};

#[test]
fn test_learner_journey() {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck());
    let mut manager = db.session_manager();
    manager.resume().unwrap();

    // ========================================================================
    // Learn chunk 1: one correct pass per mode
    // ========================================================================
    for mode in LearningMode::CYCLE {
        assert_eq!(manager.active().unwrap().mode(), mode);
        loop {
            let expected = manager.active().unwrap().expected().unwrap().to_string();
            let outcome = manager.submit_answer(&expected.to_uppercase()).unwrap();
            assert!(outcome.correct);
            if outcome.chunk_complete {
                break;
            }
        }
        manager.active_mut().unwrap().next_mode();
    }

    // Only the first hidden-answer pass reaches the scheduler
    for card in manager.active().unwrap().cards() {
        assert_eq!(card.recall_strength, Some(1));
        assert_eq!(card.interval, Some(2));
        assert_eq!(MemoryPhase::of(card), MemoryPhase::Learning);
    }

    // ========================================================================
    // Move on
    // ========================================================================
    let next = manager.next_chunk_id().unwrap().unwrap();
    assert_eq!(next, 2);
    manager.advance_chunk(next).unwrap();
    assert_eq!(manager.load_session().unwrap().flashcard_position, 0);

    let deck = db.deck();
    let due = deck.due_cards().unwrap();
    assert_eq!(due.len(), 6);
    assert!(due.iter().all(|c| c.is_new()));

    // ========================================================================
    // Two days later chunk 1 is back
    // ========================================================================
    db.advance_days(1);
    assert!(deck.due_cards().unwrap().iter().all(|c| c.chunk_id != 1));
    db.advance_days(1);
    let due = deck.due_cards().unwrap();
    assert_eq!(due.iter().filter(|c| c.chunk_id == 1).count(), 3);

    // Unseen cards still come first, then the returning ones
    assert!(due[..6].iter().all(|c| c.is_new()));
    assert_eq!(
        due[6].due_date(),
        Some(DeckFixtures::start_day() + Days::new(2))
    );

    let stats = deck.stats().unwrap();
    assert_eq!(stats.learning, 3);
    assert_eq!(stats.retained, 0);
    assert_eq!(stats.unseen, 6);
    assert_eq!(stats.due_today, 9);

    // ========================================================================
    // Review them: 2 * 2.6 -> 5 days
    // ========================================================================
    for card in due.iter().filter(|c| c.chunk_id == 1) {
        let graded = deck.grade(card, true).unwrap();
        assert_eq!(graded.interval, Some(5));
        assert_eq!(graded.recall_strength, Some(2));
    }
    assert_eq!(deck.due_cards().unwrap().len(), 6);
}
