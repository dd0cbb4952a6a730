//! Journey: reviewing cards over several weeks
//!
//! Grades flow into the store, intervals grow with correct answers and
//! collapse on mistakes, and when nothing is due the weakest cards come up.

use chrono::Days;
use zinnen_core::{due_cards, CardStore, MemoryPhase, ReviewQueue, MIN_EASE_FACTOR};
use zinnen_e2e_tests::{DeckFixtures, TestDatabaseManager};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_new_cards_due_on_any_day() {
    let db = TestDatabaseManager::new_temp();
    db.seed_deck(&DeckFixtures::dutch_deck());
    let deck = db.deck();

    assert_eq!(deck.due_cards().unwrap().len(), 9);
    db.advance_days(3650);
    assert_eq!(deck.due_cards().unwrap().len(), 9);
}

#[test]
fn test_correct_answers_stretch_the_interval() {
    let db = TestDatabaseManager::new_temp();
    let keys = db.seed_chunks(&[1], 1);
    let deck = db.deck();

    let first = deck.grade(&db.card(keys[0]), true).unwrap();
    assert_eq!(first.recall_strength, Some(1));
    assert_eq!(first.interval, Some(2));
    assert!(approx(first.ease_factor.unwrap(), 2.6));
    assert_eq!(first.last_reviewed, Some(DeckFixtures::start_day()));

    // Not due until the interval has passed
    db.advance_days(1);
    assert!(deck.due_cards().unwrap().is_empty());
    db.advance_days(1);
    assert_eq!(deck.due_cards().unwrap().len(), 1);

    let second = deck.grade(&first, true).unwrap();
    assert_eq!(second.interval, Some(5));
    db.advance_days(5);
    let third = deck.grade(&second, true).unwrap();
    assert_eq!(third.interval, Some(13));
    assert_eq!(third.recall_strength, Some(3));
    assert_eq!(MemoryPhase::of(&third), MemoryPhase::Retained);

    assert_eq!(db.card(keys[0]), third);
}

#[test]
fn test_mistake_resets_streak_and_interval() {
    let db = TestDatabaseManager::new_temp();
    let day = DeckFixtures::start_day();
    db.seed_cards(&[DeckFixtures::reviewed(1, 1, day - Days::new(30), 5, 1.4, 30)]);
    let deck = db.deck();

    let card = deck.due_cards().unwrap().remove(0);
    let relapsed = deck.grade(&card, false).unwrap();
    assert_eq!(relapsed.recall_strength, Some(0));
    assert_eq!(relapsed.interval, Some(1));
    assert!(approx(relapsed.ease_factor.unwrap(), MIN_EASE_FACTOR));
    assert_eq!(MemoryPhase::of(&relapsed), MemoryPhase::Relapsed);

    // Ease never drops below the floor
    db.advance_days(1);
    let again = deck.grade(&relapsed, false).unwrap();
    assert!(again.ease_factor.unwrap() >= MIN_EASE_FACTOR);

    // Due again tomorrow
    assert!(deck.due_cards().unwrap().is_empty());
    db.advance_days(1);
    assert_eq!(deck.due_cards().unwrap().len(), 1);
}

#[test]
fn test_due_order_unseen_first_then_by_due_day() {
    let db = TestDatabaseManager::new_temp();
    let day = DeckFixtures::start_day();
    db.seed_cards(&[
        DeckFixtures::card(1, 1),
        DeckFixtures::reviewed(1, 2, day - Days::new(10), 1, 2.5, 3),
        DeckFixtures::reviewed(2, 1, day - Days::new(5), 1, 2.5, 5),
        DeckFixtures::reviewed(2, 2, day - Days::new(20), 1, 2.5, 2),
        DeckFixtures::reviewed(4, 1, day - Days::new(1), 1, 2.5, 4),
    ]);

    let due: Vec<String> = db
        .deck()
        .due_cards()
        .unwrap()
        .iter()
        .map(|c| c.key().to_string())
        .collect();
    assert_eq!(due, vec!["1/1", "2/2", "1/2", "2/1"]);
}

#[test]
fn test_store_due_query_agrees_with_scan() {
    let db = TestDatabaseManager::new_temp();
    let day = DeckFixtures::start_day();
    let cards: Vec<_> = (1..=40)
        .map(|i| {
            if i % 7 == 0 {
                DeckFixtures::card(i % 3 + 1, i)
            } else {
                DeckFixtures::reviewed(i % 3 + 1, i, day - Days::new(u64::from(i)), i % 4, 2.0, i % 9 + 1)
            }
        })
        .collect();
    db.seed_cards(&cards);

    for offset in [0, 3, 10, 40] {
        let today = day + Days::new(offset);
        let from_store = db.store.list_due_cards(today).unwrap();
        let from_scan = due_cards(db.store.list_all_cards().unwrap(), today);
        assert_eq!(
            from_store.iter().map(|c| c.due_date()).collect::<Vec<_>>(),
            from_scan.iter().map(|c| c.due_date()).collect::<Vec<_>>()
        );
        assert_eq!(from_store.len(), from_scan.len());
    }
}

#[test]
fn test_trouble_cards_when_nothing_is_due() {
    let db = TestDatabaseManager::new_temp();
    db.seed_cards(&DeckFixtures::trouble_scenario());
    let deck = db.deck();

    match deck.review_queue().unwrap() {
        ReviewQueue::Trouble(cards) => {
            let ids: Vec<u32> = cards.iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![10, 5, 15, 1, 11, 6, 2, 12, 7, 8]);
        }
        other => panic!("expected trouble cards, got {:?}", other),
    }
}

#[test]
fn test_empty_deck_has_nothing_to_review() {
    let db = TestDatabaseManager::new_temp();
    assert_eq!(db.deck().review_queue().unwrap(), ReviewQueue::Empty);
}

#[test]
fn test_graded_state_survives_restart() {
    let mut db = TestDatabaseManager::new_temp();
    let keys = db.seed_chunks(&[1], 2);
    let graded = db.deck().grade(&db.card(keys[1]), true).unwrap();

    db.reopen();
    assert_eq!(db.card(keys[1]), graded);
    assert!(db.card(keys[0]).is_new());
}

#[test]
fn test_memory_phases_across_the_calendar() {
    let db = TestDatabaseManager::new_temp();
    db.seed_cards(&DeckFixtures::memory_phase_cards());
    let deck = db.deck();

    let stats = deck.stats().unwrap();
    assert_eq!(
        (stats.unseen, stats.learning, stats.retained, stats.relapsed),
        (1, 1, 1, 1)
    );
    assert_eq!(stats.due_today, 1);

    // Learning and relapsed cards come back the next day
    db.advance_days(1);
    let due: Vec<u32> = deck.due_cards().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(due, vec![1, 2, 4]);

    // The retained card waits out its 30 days from yesterday
    db.set_day(DeckFixtures::start_day() + Days::new(28));
    assert_eq!(deck.due_cards().unwrap().len(), 3);
    db.set_day(DeckFixtures::start_day() + Days::new(29));
    assert_eq!(deck.due_cards().unwrap().len(), 4);

    // Going back in time hides them again
    db.set_day(DeckFixtures::start_day());
    assert_eq!(deck.due_cards().unwrap().len(), 1);
}
