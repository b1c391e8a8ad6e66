use crate::cards::{Card, Rank, Suit};
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

/// Failures here are programmer errors, not client faults; the lifecycle
/// converts them into a table reset rather than an error message.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck exhausted")]
    Exhausted,
    #[error("duplicate card drawn: {0}")]
    DuplicateDraw(Card),
    #[error("fresh deck has {0} cards")]
    WrongSize(usize),
    #[error("fresh deck contains duplicate {0}")]
    DuplicateCard(Card),
}

/// The table's card source for one hand. Top of the deck is the last
/// element. Every card leaving the deck is recorded in `seen`, which doubles
/// as the duplicate guard for the whole hand.
#[derive(Debug, Clone)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub burns: Vec<Card>,
    seen: HashSet<Card>,
}

impl Deck {
    /// Build the full 52-card deck, verify it, and shuffle.
    pub fn fresh() -> Result<Self, DeckError> {
        let mut cards = Vec::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self::verify(&cards)?;
        let mut rng = rng();
        cards.shuffle(&mut rng);
        Ok(Deck {
            cards,
            burns: Vec::new(),
            seen: HashSet::new(),
        })
    }

    /// A deck with a fixed draw order, for tests. Cards pop from the end.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Deck {
            cards,
            burns: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn verify(cards: &[Card]) -> Result<(), DeckError> {
        if cards.len() != 52 {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut unique = HashSet::new();
        for &card in cards {
            if !unique.insert(card) {
                return Err(DeckError::DuplicateCard(card));
            }
        }
        Ok(())
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        let card = self.cards.pop().ok_or(DeckError::Exhausted)?;
        if !self.seen.insert(card) {
            return Err(DeckError::DuplicateDraw(card));
        }
        Ok(card)
    }

    pub fn burn(&mut self) -> Result<(), DeckError> {
        let card = self.draw()?;
        self.burns.push(card);
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn burned(&self) -> usize {
        self.burns.len()
    }

    /// Number of cards that have left the deck this hand.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
