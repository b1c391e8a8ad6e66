use crate::cards::{Card, Rank};
use itertools::Itertools;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("evaluator given {0} cards, wants 5 to 7")]
    WrongCardCount(usize),
}

/// Hand categories in ascending order of strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandCategory {
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// The rank tuple of an evaluated hand: category first, then tiebreak ranks
/// in decreasing order of importance. Two ranks compare category-first, then
/// lexicographically on the tiebreaks; equality signals a split.
#[derive(Debug, Clone)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreaks: Vec<Rank>,
}

impl HandRank {
    /// Human description used in showdown summaries, e.g. "Flush (Ace high)".
    pub fn describe(&self) -> String {
        let t = &self.tiebreaks;
        match self.category {
            HandCategory::StraightFlush => format!("Straight Flush ({} high)", t[0].word()),
            HandCategory::FourOfAKind => format!("Four of a Kind ({})", t[0].plural()),
            HandCategory::FullHouse => {
                format!("Full House ({} over {})", t[0].plural(), t[1].plural())
            }
            HandCategory::Flush => format!("Flush ({} high)", t[0].word()),
            HandCategory::Straight => format!("Straight ({} high)", t[0].word()),
            HandCategory::ThreeOfAKind => format!("Three of a Kind ({})", t[0].plural()),
            HandCategory::TwoPair => {
                format!("Two Pair ({} and {})", t[0].plural(), t[1].plural())
            }
            HandCategory::OnePair => format!("Pair of {}", t[0].plural()),
            HandCategory::HighCard => format!("High Card ({})", t[0].word()),
        }
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandRank {}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| cmp_tiebreaks(&self.tiebreaks, &other.tiebreaks))
    }
}

/// Lexicographic, with missing positions treated as rank value 0.
fn cmp_tiebreaks(a: &[Rank], b: &[Rank]) -> Ordering {
    let a = a.iter().map(|r| r.value());
    let b = b.iter().map(|r| r.value());
    for pair in a.zip_longest(b) {
        let (x, y) = pair.or(0, 0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Rank the best 5-card hand makeable from 5, 6, or 7 cards.
pub fn evaluate(cards: &[Card]) -> Result<HandRank, EvalError> {
    match cards.len() {
        5 => Ok(evaluate_five(cards)),
        6 | 7 => Ok(cards
            .iter()
            .copied()
            .combinations(5)
            .map(|five| evaluate_five(&five))
            .max()
            .expect("combinations of 6 or 7 cards are nonempty")),
        n => Err(EvalError::WrongCardCount(n)),
    }
}

fn evaluate_five(cards: &[Card]) -> HandRank {
    debug_assert_eq!(cards.len(), 5);

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high_card(cards);

    // Rank groups, largest count first, ties broken by higher rank.
    let mut groups: Vec<(u8, Rank)> = Vec::new();
    for card in cards {
        match groups.iter_mut().find(|(_, r)| *r == card.rank) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, card.rank)),
        }
    }
    groups.sort_by(|a, b| b.cmp(a));

    if is_flush {
        if let Some(high) = straight_high {
            return HandRank {
                category: HandCategory::StraightFlush,
                tiebreaks: vec![high],
            };
        }
    }

    if groups[0].0 == 4 {
        return HandRank {
            category: HandCategory::FourOfAKind,
            tiebreaks: vec![groups[0].1, groups[1].1],
        };
    }

    if groups[0].0 == 3 && groups[1].0 == 2 {
        return HandRank {
            category: HandCategory::FullHouse,
            tiebreaks: vec![groups[0].1, groups[1].1],
        };
    }

    if is_flush {
        return HandRank {
            category: HandCategory::Flush,
            tiebreaks: ranks_descending(cards),
        };
    }

    if let Some(high) = straight_high {
        return HandRank {
            category: HandCategory::Straight,
            tiebreaks: vec![high],
        };
    }

    if groups[0].0 == 3 {
        return HandRank {
            category: HandCategory::ThreeOfAKind,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1],
        };
    }

    if groups[0].0 == 2 && groups[1].0 == 2 {
        return HandRank {
            category: HandCategory::TwoPair,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1],
        };
    }

    if groups[0].0 == 2 {
        return HandRank {
            category: HandCategory::OnePair,
            tiebreaks: vec![groups[0].1, groups[1].1, groups[2].1, groups[3].1],
        };
    }

    HandRank {
        category: HandCategory::HighCard,
        tiebreaks: ranks_descending(cards),
    }
}

/// Five distinct ranks spanning exactly four, or the wheel. The wheel scores
/// with high card Five so A-2-3-4-5 loses to 2-3-4-5-6.
fn straight_high_card(cards: &[Card]) -> Option<Rank> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() != 5 {
        return None;
    }
    if values[4] - values[0] == 4 {
        return Some(Rank::from_value(values[4]));
    }
    if values == [2, 3, 4, 5, 14] {
        return Some(Rank::Five);
    }
    None
}

fn ranks_descending(cards: &[Card]) -> Vec<Rank> {
    let mut ranks: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
    ranks.sort_by(|a, b| b.cmp(a));
    ranks
}
