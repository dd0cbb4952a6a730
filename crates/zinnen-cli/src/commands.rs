//! Subcommand implementations

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use colored::Colorize;
use zinnen_core::{
    format_day, is_good_match, jumble_words, CardStore, Clock, Deck, DeckImport, DeckSeeder, Error,
    FlashCard, LearningMode, MemoryPhase, ReviewQueue, SessionManager, SqliteStore, SystemClock,
};

use crate::prompt::Prompter;

/// Load a JSON deck file
pub fn run_import(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let deck: DeckImport =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let summary = store.import_deck(&deck)?;

    println!("{}", "=== Deck Imported ===".cyan().bold());
    println!("{}: {}", "Cards".white().bold(), summary.cards);
    println!("{}: {}", "Vocabulary".white().bold(), summary.vocab);
    if summary.session_created {
        println!("{}", "Session created".green());
    } else if deck.session.is_some() {
        println!("{}", "Existing session kept".dimmed());
    }
    Ok(())
}

/// Deck statistics and the current session
pub fn run_status(store: SqliteStore) -> anyhow::Result<()> {
    let manager = SessionManager::new(store, SystemClock);
    let stats = manager.deck().stats()?;

    println!("{}", "=== Zinnen Deck ===".cyan().bold());
    println!();
    println!("{}: {}", "Total Cards".white().bold(), stats.total_cards);
    println!("{}: {}", "Chunks".white().bold(), stats.chunks);
    println!("{}: {}", "Due Today".white().bold(), stats.due_today);
    println!("{}: {}", "Vocabulary".white().bold(), stats.vocab_entries);

    println!();
    println!("{}", "=== Memory Phases ===".yellow().bold());
    print_distribution_bar("Unseen", stats.unseen, stats.total_cards);
    print_distribution_bar("Learning", stats.learning, stats.total_cards);
    print_distribution_bar("Retained", stats.retained, stats.total_cards);
    print_distribution_bar("Relapsed", stats.relapsed, stats.total_cards);

    println!();
    match manager.load_session() {
        Ok(session) => {
            println!("{}", "=== Session ===".magenta().bold());
            println!("{}: {}", "Current Chunk".white().bold(), session.current_chunk_id);
            println!("{}: {}", "Position".white().bold(), session.flashcard_position);
            println!("{}: {}", "Last Updated".white().bold(), format_day(session.last_updated));
            if let Some(next) = manager.next_chunk_id()? {
                println!("{}: {}", "Next Chunk".white().bold(), next);
            } else {
                println!("{}", "Last chunk of the deck".dimmed());
            }
        }
        Err(Error::NoSessionFound) => {
            println!("{}", "No session yet. Run `zinnen learn` to start.".dimmed());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_distribution_bar(label: &str, count: usize, total: usize) {
    const WIDTH: usize = 30;
    let filled = if total > 0 { count * WIDTH / total } else { 0 };
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(WIDTH - filled));
    println!("  {:<10} {} {}", label, bar.green(), count);
}

/// Cards due today, or on `date`
pub fn run_due(store: SqliteStore, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let deck = Deck::new(store, SystemClock);
    let day = date.unwrap_or_else(|| deck.today());
    let due = deck.due_cards_on(day)?;

    println!("{}", format!("=== Due on {} ===", format_day(day)).cyan().bold());
    if due.is_empty() {
        println!("{}", "Nothing due.".dimmed());
    }
    for card in &due {
        print_card_line(card);
    }
    Ok(())
}

/// Weakest reviewed cards
pub fn run_trouble(store: SqliteStore) -> anyhow::Result<()> {
    let deck = Deck::new(store, SystemClock);
    let trouble = deck.trouble_cards()?;

    println!("{}", "=== Trouble Cards ===".red().bold());
    if trouble.is_empty() {
        println!("{}", "No reviewed cards yet.".dimmed());
    }
    for card in &trouble {
        print_card_line(card);
    }
    Ok(())
}

fn print_card_line(card: &FlashCard) {
    let due = card
        .due_date()
        .map(format_day)
        .unwrap_or_else(|| "new".to_string());
    println!(
        "  {:>7}  {:<9} {:<10}  {}  ease {:.2}  streak {}",
        card.key().to_string().bold(),
        MemoryPhase::of(card).as_str(),
        due,
        card.translation,
        card.ease_factor.unwrap_or_default(),
        card.recall_strength.unwrap_or_default(),
    );
}

/// Interactive review on the terminal
pub fn run_review(store: SqliteStore, limit: Option<usize>) -> anyhow::Result<()> {
    let deck = Deck::new(store, SystemClock);
    let tally = review_loop(&deck, limit, &mut Prompter::stdio())?;
    println!();
    println!("{}: {}/{}", "Correct".white().bold(), tally.correct, tally.reviewed);
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub reviewed: usize,
    pub correct: usize,
}

/// Show each translation and expect the sentence back
pub fn review_loop<S, C, R, W>(
    deck: &Deck<S, C>,
    limit: Option<usize>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<ReviewTally>
where
    S: CardStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    let queue = deck.review_queue()?;
    match &queue {
        ReviewQueue::Due(cards) => {
            prompter.say(format!("{} cards due", cards.len()).cyan().bold())?
        }
        ReviewQueue::Trouble(cards) => prompter.say(
            format!("Nothing due. Practicing {} trouble cards", cards.len())
                .yellow()
                .bold(),
        )?,
        ReviewQueue::Empty => {
            prompter.say("Nothing to review.".dimmed())?;
            return Ok(ReviewTally::default());
        }
    }

    let mut tally = ReviewTally::default();
    for card in queue.into_cards().into_iter().take(limit.unwrap_or(usize::MAX)) {
        prompter.say("")?;
        prompter.say(&card.translation)?;
        let Some(answer) = prompter.ask(">".bold())? else {
            break;
        };

        let correct = is_good_match(&card.source_sentence, &answer);
        let graded = deck.grade(&card, correct)?;
        tally.reviewed += 1;

        let next = graded.due_date().map(format_day).unwrap_or_default();
        if correct {
            tally.correct += 1;
            prompter.say(format!("{} next review {}", "Correct!".green().bold(), next))?;
        } else {
            prompter.say(format!("{} {}", "Expected:".red().bold(), card.source_sentence))?;
        }
    }
    Ok(tally)
}

/// Interactive chunk practice on the terminal
pub fn run_learn(store: SqliteStore, mode: Option<LearningMode>) -> anyhow::Result<()> {
    let mut manager = SessionManager::new(store, SystemClock);
    learn_loop(&mut manager, mode, &mut Prompter::stdio())
}

/// Work through the active chunk mode by mode.
///
/// A finished mode starts the next one; after the last mode the learner
/// moves to the next chunk. Quitting saves the cursor.
pub fn learn_loop<S, C, R, W>(
    manager: &mut SessionManager<S, C>,
    mode: Option<LearningMode>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()>
where
    S: CardStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    let chunk_id = manager.resume_or_start()?.chunk_id();
    if let (Some(mode), Some(active)) = (mode, manager.active_mut()) {
        active.set_mode(mode);
    }
    prompter.say(format!("=== Chunk {} ===", chunk_id).cyan().bold())?;

    loop {
        let Some(active) = manager.active() else {
            break;
        };
        let (Some(prompt), Some(expected)) = (active.prompt(), active.expected()) else {
            break;
        };
        let mode = active.mode();

        prompter.say("")?;
        prompter.say(format!(
            "[{}] {}/{}",
            mode.as_str().blue(),
            active.score(),
            active.len()
        ))?;
        prompter.say(prompt)?;
        if mode.reveals_answer() {
            prompter.say(expected.dimmed())?;
        }

        let Some(answer) = prompter.ask(">".bold())? else {
            let saved = manager.suspend()?;
            prompter.say(
                format!(
                    "Saved: chunk {} at card {}",
                    saved.current_chunk_id,
                    saved.flashcard_position + 1
                )
                .dimmed(),
            )?;
            break;
        };

        let outcome = manager.submit_answer(&answer)?;
        if !outcome.correct {
            prompter.say(format!("{} {}", "Try again:".red().bold(), outcome.expected))?;
            continue;
        }
        prompter.say("Correct!".green().bold())?;
        if !outcome.chunk_complete {
            continue;
        }

        let Some(active) = manager.active_mut() else {
            break;
        };
        let next_mode = active.next_mode();
        if next_mode != LearningMode::Learn {
            prompter.say(format!("Mode complete. Next: {}", next_mode).yellow().bold())?;
            continue;
        }

        match manager.next_chunk_id()? {
            Some(next) => {
                manager.advance_chunk(next)?;
                prompter.say(format!("Chunk complete! Moved on to chunk {}", next).green().bold())?;
            }
            None => {
                manager.suspend()?;
                prompter.say("Deck complete!".green().bold())?;
            }
        }
        break;
    }
    Ok(())
}

/// Move to a chunk, the next one by default
pub fn run_advance(store: SqliteStore, chunk: Option<u32>) -> anyhow::Result<()> {
    let mut manager = SessionManager::new(store, SystemClock);
    let target = match chunk {
        Some(chunk) => chunk,
        None => match manager.next_chunk_id()? {
            Some(next) => next,
            None => {
                println!("{}", "Already at the last chunk.".dimmed());
                return Ok(());
            }
        },
    };

    let cards = manager.advance_chunk(target)?;
    println!("{} {} ({} cards)", "Now on chunk".green().bold(), target, cards.len());
    Ok(())
}

/// Print a shuffled word order
pub fn run_jumble(sentence: &str) -> anyhow::Result<()> {
    println!("{}", jumble_words(sentence)?);
    Ok(())
}

/// Vocabulary list
pub fn run_vocab(store: SqliteStore) -> anyhow::Result<()> {
    let deck = Deck::new(store, SystemClock);
    let vocab = deck.vocabulary()?;

    println!("{}", "=== Vocabulary ===".cyan().bold());
    if vocab.is_empty() {
        println!("{}", "No vocabulary imported.".dimmed());
    }
    for entry in &vocab {
        let word = match &entry.article {
            Some(article) if !article.is_empty() => format!("{} {}", article, entry.word),
            _ => entry.word.clone(),
        };
        println!("  {:<24} {:<10} {}", word.bold(), entry.word_type.dimmed(), entry.translation);
    }
    Ok(())
}

/// Full copy of the database
pub fn run_backup(store: &SqliteStore, output: &Path) -> anyhow::Result<()> {
    store.backup_to(output)?;
    println!("{} {}", "Backup written to".green().bold(), output.display());
    Ok(())
}
