//! Card selection: what to review today
//!
//! Due cards first; when nothing is due, the weakest reviewed cards
//! ("trouble cards") are offered instead.

use chrono::NaiveDate;

use crate::card::FlashCard;

/// Maximum number of trouble cards offered in one review
pub const TROUBLE_LIMIT: usize = 10;

/// Select the cards due on `today`.
///
/// A card is due when `today >= last_reviewed + interval`. Never-reviewed
/// cards are always due and come first; the rest are ordered by ascending
/// due date. Ties keep the input order.
pub fn due_cards(cards: impl IntoIterator<Item = FlashCard>, today: NaiveDate) -> Vec<FlashCard> {
    let mut due: Vec<FlashCard> = cards.into_iter().filter(|c| c.is_due(today)).collect();
    // Option orders None before Some, which puts unseen cards first
    due.sort_by_key(FlashCard::due_date);
    due
}

/// Select up to [`TROUBLE_LIMIT`] low-confidence cards.
///
/// Ordered by lowest recall strength, then lowest ease factor, then earliest
/// review day. Cards with any unset memory field are new, not troublesome,
/// and never appear here.
pub fn trouble_cards(cards: impl IntoIterator<Item = FlashCard>) -> Vec<FlashCard> {
    let mut candidates: Vec<FlashCard> = cards.into_iter().filter(|c| !c.is_new()).collect();
    candidates.sort_by(|a, b| {
        a.recall_strength
            .cmp(&b.recall_strength)
            .then_with(|| {
                let ease_a = a.ease_factor.unwrap_or_default();
                let ease_b = b.ease_factor.unwrap_or_default();
                ease_a.total_cmp(&ease_b)
            })
            .then_with(|| a.last_reviewed.cmp(&b.last_reviewed))
    });
    candidates.truncate(TROUBLE_LIMIT);
    candidates
}

/// What a review session should work through
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewQueue {
    /// Cards whose review day has arrived
    Due(Vec<FlashCard>),
    /// Nothing due; the weakest reviewed cards instead
    Trouble(Vec<FlashCard>),
    /// Nothing to review at all
    Empty,
}

impl ReviewQueue {
    /// Build the queue: due cards, else trouble cards, else empty
    pub fn build(cards: Vec<FlashCard>, today: NaiveDate) -> Self {
        let due = due_cards(cards.iter().cloned(), today);
        if !due.is_empty() {
            return ReviewQueue::Due(due);
        }
        let trouble = trouble_cards(cards);
        if trouble.is_empty() {
            ReviewQueue::Empty
        } else {
            ReviewQueue::Trouble(trouble)
        }
    }

    /// Cards in review order
    pub fn cards(&self) -> &[FlashCard] {
        match self {
            ReviewQueue::Due(cards) | ReviewQueue::Trouble(cards) => cards,
            ReviewQueue::Empty => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    pub fn into_cards(self) -> Vec<FlashCard> {
        match self {
            ReviewQueue::Due(cards) | ReviewQueue::Trouble(cards) => cards,
            ReviewQueue::Empty => Vec::new(),
        }
    }
}
