use crate::cards::Card;
use crate::eval::HandRank;
use crate::player::{Chips, PlayerId};
use serde::Serialize;

/// One revealed hand at showdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownHand {
    pub player_id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRow {
    pub player_id: PlayerId,
    pub name: String,
    pub amount: Chips,
}

/// What the last completed showdown looked like; kept for display until the
/// next hand is dealt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownSummary {
    pub board: Vec<Card>,
    pub hands: Vec<ShowdownHand>,
    pub payouts: Vec<PayoutRow>,
}

/// Split the pot described by per-seat contributions into layered side pots
/// and award them. Side pots are never materialized during betting; they are
/// derived here from the distinct positive contribution levels.
///
/// `ranks[i]` is `Some` for seats still contending at showdown (folded seats
/// contribute chips but cannot win). `dealer` is the dealer's seat index;
/// odd chips go to tied winners one at a time starting at the first winner
/// in seat order after the dealer, wrapping the ring.
pub fn distribute(
    contributions: &[Chips],
    ranks: &[Option<HandRank>],
    dealer: usize,
) -> Vec<Chips> {
    let n = contributions.len();
    let mut winnings = vec![0; n];

    let mut levels: Vec<Chips> = contributions.iter().copied().filter(|&c| c > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut floor: Chips = 0;
    for level in levels {
        let contributors: Vec<usize> = (0..n).filter(|&i| contributions[i] >= level).collect();
        let amount = (level - floor) * contributors.len() as Chips;
        floor = level;

        let eligible: Vec<usize> = contributors
            .into_iter()
            .filter(|&i| ranks[i].is_some())
            .collect();
        // Unreachable under normal play; skipping loses the layer, which is
        // the documented behavior.
        let Some(best) = eligible.iter().filter_map(|&i| ranks[i].as_ref()).max() else {
            continue;
        };
        let winners: Vec<usize> = eligible
            .into_iter()
            .filter(|&i| ranks[i].as_ref() == Some(best))
            .collect();

        let share = amount / winners.len() as Chips;
        let remainder = amount % winners.len() as Chips;
        for &w in &winners {
            winnings[w] += share;
        }
        for &w in ordered_after(&winners, dealer).iter().take(remainder as usize) {
            winnings[w] += 1;
        }
    }

    winnings
}

/// Winners rotated so the first seat after the dealer comes first.
fn ordered_after(winners: &[usize], dealer: usize) -> Vec<usize> {
    let start = winners
        .iter()
        .position(|&w| w > dealer)
        .unwrap_or(0);
    let mut ordered = Vec::with_capacity(winners.len());
    ordered.extend_from_slice(&winners[start..]);
    ordered.extend_from_slice(&winners[..start]);
    ordered
}
