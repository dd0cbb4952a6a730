//! Journey: learning a deck chunk by chunk
//!
//! Resuming where the learner stopped, moving on to the next chunk, and
//! refusing chunks that were never seeded.

use zinnen_core::{Error, ErrorKind, LearningMode};
use zinnen_e2e_tests::{DeckFixtures, TestDatabaseManager};

fn seeded() -> TestDatabaseManager {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck());
    db
}

#[test]
fn test_resume_starts_at_seeded_session() {
    let db = seeded();
    let mut manager = db.session_manager();

    let active = manager.resume().unwrap();
    assert_eq!(active.chunk_id(), 1);
    assert_eq!(active.position(), 0);
    assert_eq!(active.len(), DeckFixtures::chunk_size(1));
    assert_eq!(active.mode(), LearningMode::Learn);
    assert_eq!(active.prompt(), Some("Ik ga ____ huis."));
}

#[test]
fn test_advance_then_load_session_is_at_start_of_chunk() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.save_session(1, 2, r#"{"tts":true}"#).unwrap();
    db.advance_days(1);

    let cards = manager.advance_chunk(2).unwrap();
    assert_eq!(cards.len(), DeckFixtures::chunk_size(2));

    let session = manager.load_session().unwrap();
    assert_eq!(session.current_chunk_id, 2);
    assert_eq!(session.flashcard_position, 0);
    assert_eq!(session.user_preferences, r#"{"tts":true}"#);
    assert_eq!(session.last_updated, db.today());
}

#[test]
fn test_advance_to_missing_chunk_leaves_session_alone() {
    let db = seeded();
    let mut manager = db.session_manager();
    let before = manager.load_session().unwrap();

    let err = manager.advance_chunk(3).unwrap_err();
    assert!(matches!(err, Error::EmptyChunk(3)));
    assert_eq!(err.kind(), ErrorKind::Setup);
    assert_eq!(manager.load_session().unwrap(), before);
}

#[test]
fn test_next_chunk_skips_the_gap() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.resume().unwrap();

    assert_eq!(manager.next_chunk_id().unwrap(), Some(2));
    manager.advance_chunk(2).unwrap();
    assert_eq!(manager.next_chunk_id().unwrap(), Some(4));
    manager.advance_chunk(4).unwrap();
    assert_eq!(manager.next_chunk_id().unwrap(), None);
}

#[test]
fn test_position_survives_restart() {
    let mut db = seeded();
    {
        let mut manager = db.session_manager();
        manager.resume().unwrap();
        manager.submit_answer("Ik ga naar huis.").unwrap();
        manager.submit_answer("waar is het station?").unwrap();
        manager.suspend().unwrap();
    }

    db.reopen();
    let mut manager = db.session_manager();
    let active = manager.resume().unwrap();
    assert_eq!(active.chunk_id(), 1);
    assert_eq!(active.position(), 2);
    assert_eq!(active.prompt(), Some("Ik heb ______."));
}

#[test]
fn test_out_of_range_position_restarts_chunk() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.save_session(4, 17, "").unwrap();

    let active = manager.resume().unwrap();
    assert_eq!(active.chunk_id(), 4);
    assert_eq!(active.position(), 0);
}

#[test]
fn test_missing_session_is_setup_error() {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck_without_session());
    let mut manager = db.session_manager();

    let err = manager.resume().unwrap_err();
    assert!(matches!(err, Error::NoSessionFound));
    assert_eq!(err.kind(), ErrorKind::Setup);

    assert_eq!(manager.resume_or_start().unwrap().chunk_id(), 1);
}

#[test]
fn test_grading_outside_current_chunk_is_rejected() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.resume().unwrap();

    let other = manager.load_chunk(2).unwrap().remove(0);
    let err = manager.grade(&other, true).unwrap_err();
    assert!(matches!(err, Error::CardNotInChunk(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(db.card(other.key()).is_new());
}

#[test]
fn test_earlier_chunks_stay_reviewable() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.resume().unwrap();

    // One wrong recall on the first card of chunk 1, then move on
    manager.active_mut().unwrap().set_mode(LearningMode::PracticeRecall);
    assert!(manager.submit_answer("Ik weet het niet").unwrap().graded);
    manager.advance_chunk(2).unwrap();

    db.advance_days(1);
    let due = db.deck().due_cards().unwrap();
    assert!(due.iter().any(|c| c.chunk_id == 1 && c.id == 1 && !c.is_new()));
}

#[test]
fn test_each_mode_expects_its_own_answer() {
    let db = seeded();
    let mut manager = db.session_manager();
    manager.resume().unwrap();

    let expected: Vec<(LearningMode, String, String)> = LearningMode::CYCLE
        .iter()
        .map(|&mode| {
            let active = manager.active_mut().unwrap();
            active.set_mode(mode);
            (
                mode,
                active.prompt().unwrap().to_string(),
                active.expected().unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(expected[0].1, "Ik ga ____ huis.");
    assert_eq!(expected[1].2, "Ik ga naar huis.");
    assert_eq!(expected[2].1, "Ik ga naar huis.");
    assert_eq!(expected[2].2, "I am going home.");
    assert_eq!(expected[3].1, "I am going home.");
    assert_eq!(expected[3].2, "Ik ga naar huis.");
}
