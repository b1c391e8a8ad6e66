use crate::cards::{Card, Rank, Suit};
use crate::eval::{evaluate, HandCategory};
use crate::table::Table;
use serde::Serialize;

/// Best-effort hint shown to a player in a live hand. Pure UX metadata: the
/// betting engine never reads it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandInsight {
    pub current_hand: String,
    pub strength_score: u8,
    pub strength_label: &'static str,
    pub draws: Vec<String>,
    pub recommendation: String,
}

pub fn hand_insight(table: &Table, viewer: &str) -> Option<HandInsight> {
    if !table.hand_in_progress {
        return None;
    }
    let player = table.player(viewer)?;
    if !player.in_hand || player.hole_cards.len() != 2 {
        return None;
    }

    let (current_hand, score, draws) = if table.community_cards.is_empty() {
        let (hand, score) = preflop(&player.hole_cards);
        (hand, score, Vec::new())
    } else {
        postflop(&player.hole_cards, &table.community_cards)?
    };

    let to_call = table.current_bet.saturating_sub(player.bet_this_round);
    Some(HandInsight {
        current_hand,
        strength_score: score,
        strength_label: label(score),
        draws: draws.clone(),
        recommendation: recommend(score, to_call > 0, !draws.is_empty()),
    })
}

fn label(score: u8) -> &'static str {
    match score {
        90.. => "Monster",
        78.. => "Very Strong",
        64.. => "Strong",
        50.. => "Playable",
        36.. => "Marginal",
        _ => "Weak",
    }
}

fn recommend(score: u8, facing_bet: bool, drawing: bool) -> String {
    let advice = match (score, facing_bet) {
        (78.., _) => "Bet or raise for value",
        (64.., false) => "Bet",
        (64.., true) => "Call",
        (50.., false) => "Check or bet small",
        (50.., true) => "Call a reasonable price",
        (_, false) => "Check",
        (_, true) if drawing => "Call only if the price is right",
        (_, true) => "Fold to big bets",
    };
    advice.to_string()
}

/// Closed formula over (high, low, suited, gap, pair). Rough by design; it
/// only has to order starting hands sensibly within [1, 100].
fn preflop(hole: &[Card]) -> (String, u8) {
    let (a, b) = (hole[0], hole[1]);
    let (hi, lo) = if a.rank >= b.rank { (a, b) } else { (b, a) };
    let suited = hi.suit == lo.suit;

    if hi.rank == lo.rank {
        let score = 55 + 3 * hi.rank.value() as i32;
        return (format!("Pair of {}", hi.rank.plural()), clamp(score));
    }

    let gap = (hi.rank.value() - lo.rank.value() - 1).min(4) as i32;
    let score = 3 * hi.rank.value() as i32 + 2 * lo.rank.value() as i32 - 5
        + if suited { 6 } else { 0 }
        - 3 * gap;
    let hand = format!(
        "{}-{} {}",
        hi.rank.word(),
        lo.rank.word(),
        if suited { "suited" } else { "offsuit" }
    );
    (hand, clamp(score))
}

/// Score bands per made-hand category; each band stays below the next so the
/// score is monotonic in category no matter the kickers or draw bonus.
const BAND_FLOORS: [i32; 10] = [10, 36, 52, 64, 72, 78, 84, 90, 95, 101];

fn postflop(hole: &[Card], board: &[Card]) -> Option<(String, u8, Vec<String>)> {
    let mut known = hole.to_vec();
    known.extend_from_slice(board);
    let rank = evaluate(&known).ok()?;

    let cat = rank.category as usize;
    let floor = BAND_FLOORS[cat];
    let ceiling = BAND_FLOORS[cat + 1] - 1;
    let primary = rank.tiebreaks.first().map(|r| r.value()).unwrap_or(2) as i32;
    let mut score = floor + (ceiling - floor - 1) * (primary - 2) / 12;

    let mut draws = Vec::new();
    if board.len() < 5 {
        if rank.category < HandCategory::Flush && has_flush_draw(&known) {
            draws.push("Flush draw".to_string());
        }
        if rank.category < HandCategory::Straight {
            match straight_draw(&known) {
                Some(StraightDraw::OpenEnded) => {
                    draws.push("Open-ended straight draw".to_string())
                }
                Some(StraightDraw::Gutshot) => draws.push("Gutshot straight draw".to_string()),
                None => {}
            }
        }
        score = (score + 3 * draws.len() as i32).min(ceiling);
    }

    Some((rank.describe(), clamp(score), draws))
}

fn clamp(score: i32) -> u8 {
    score.clamp(1, 100) as u8
}

fn has_flush_draw(cards: &[Card]) -> bool {
    Suit::ALL
        .iter()
        .any(|&s| cards.iter().filter(|c| c.suit == s).count() == 4)
}

enum StraightDraw {
    OpenEnded,
    Gutshot,
}

/// Scan the five-rank windows (wheel included, ace low as 1) for four cards
/// to a straight.
fn straight_draw(cards: &[Card]) -> Option<StraightDraw> {
    let mut present = [false; 15];
    for c in cards {
        present[c.rank.value() as usize] = true;
        if c.rank == Rank::Ace {
            present[1] = true;
        }
    }

    // A run of four with both ends live completes two ways.
    for low in 2..=10usize {
        if (low..low + 4).all(|v| present[v]) {
            return Some(StraightDraw::OpenEnded);
        }
    }
    for low in 1..=10usize {
        let window = (low..low + 5).filter(|&v| present[v]).count();
        if window == 4 {
            return Some(StraightDraw::Gutshot);
        }
    }
    None
}
