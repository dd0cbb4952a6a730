//! Journey: driving a session from an async host
//!
//! Every call is offloaded to the blocking pool; results and errors come
//! back unchanged.

use zinnen_core::{AsyncSession, Error, LearningMode, ReviewQueue};
use zinnen_e2e_tests::{DeckFixtures, TestDatabaseManager};

#[tokio::test]
async fn test_learn_and_review_through_async_handle() {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck());
    let session = AsyncSession::new(db.session_manager());

    let active = session.resume().await.unwrap();
    assert_eq!(active.chunk_id(), 1);

    // The first pass shows the answer, so it only counts toward the score
    let outcome = session.submit_answer("Ik ga naar huis".to_string()).await.unwrap();
    assert!(outcome.correct);
    assert!(!outcome.graded);
    assert!(outcome.card.is_new());

    let active = session.set_mode(LearningMode::PracticeRecall).await.unwrap();
    assert_eq!(active.position(), 1);
    let outcome = session.submit_answer("Waar is het station?".to_string()).await.unwrap();
    assert!(outcome.graded);
    assert_eq!(outcome.card.recall_strength, Some(1));

    let saved = session.suspend().await.unwrap();
    assert_eq!(saved.flashcard_position, 2);

    // The graded card is out until its interval passes
    let due = session.due_cards().await.unwrap();
    assert_eq!(due.len(), 8);
    assert!(matches!(session.review_queue().await.unwrap(), ReviewQueue::Due(_)));
}

#[tokio::test]
async fn test_concurrent_callers_are_serialized() {
    let db = TestDatabaseManager::new_temp();
    db.seed_chunks(&[1], 20);
    let session = AsyncSession::new(db.session_manager());

    let cards = session.due_cards().await.unwrap();
    let handles: Vec<_> = cards
        .into_iter()
        .map(|card| {
            let session = session.clone();
            tokio::spawn(async move { session.grade(card, true).await })
        })
        .collect();

    for handle in handles {
        let graded = handle.await.unwrap().unwrap();
        assert_eq!(graded.interval, Some(2));
    }
    assert!(session.due_cards().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_setup_errors_reach_the_caller() {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck_without_session());
    let session = AsyncSession::new(db.session_manager());

    assert!(matches!(session.load_session().await, Err(Error::NoSessionFound)));
    assert!(matches!(session.load_chunk(3).await, Err(Error::EmptyChunk(3))));
    assert_eq!(session.load_chunk(4).await.unwrap().len(), DeckFixtures::chunk_size(4));
}
