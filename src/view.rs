use crate::advisor::{hand_insight, HandInsight};
use crate::betting::AvailableActions;
use crate::cards::Card;
use crate::player::{Chips, PlayerId};
use crate::pot::ShowdownSummary;
use crate::table::{LogEntry, Phase, Table};
use serde::Serialize;

/// A player as everyone sees them. Hole cards are deliberately absent from
/// this type: no projection can leak what it never carries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub is_admin: bool,
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub bet_this_round: Chips,
}

/// The `state` payload for one viewer. Everything here is freshly computed
/// per broadcast; clients hold no other server state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub joined: bool,
    pub you_id: PlayerId,
    pub game_started: bool,
    pub hand_in_progress: bool,
    pub hand_number: u32,
    pub phase: Phase,
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub pot: Chips,
    pub current_bet: Chips,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    pub current_turn_id: Option<PlayerId>,
    pub community_cards: Vec<Card>,
    pub your_cards: Vec<Card>,
    pub deck_remaining: usize,
    pub burn_count: usize,
    pub hand_insight: Option<HandInsight>,
    pub available_actions: AvailableActions,
    pub can_act: bool,
    pub players: Vec<PlayerView>,
    pub logs: Vec<LogEntry>,
    pub last_showdown: Option<ShowdownSummary>,
}

impl TableView {
    pub fn project(table: &Table, viewer: &str) -> TableView {
        let me = table.player(viewer);
        let your_cards = match me {
            Some(p) if p.in_hand => p.hole_cards.clone(),
            _ => Vec::new(),
        };
        TableView {
            joined: me.is_some(),
            you_id: viewer.to_string(),
            game_started: table.game_started,
            hand_in_progress: table.hand_in_progress,
            hand_number: table.hand_number,
            phase: table.phase,
            starting_stack: table.starting_stack,
            small_blind: table.small_blind,
            big_blind: table.big_blind,
            pot: table.pot,
            current_bet: table.current_bet,
            dealer_id: table.dealer_id.clone(),
            small_blind_id: table.small_blind_id.clone(),
            big_blind_id: table.big_blind_id.clone(),
            current_turn_id: table.current_turn_id.clone(),
            community_cards: table.community_cards.clone(),
            your_cards,
            deck_remaining: table.deck.remaining(),
            burn_count: table.deck.burned(),
            hand_insight: hand_insight(table, viewer),
            available_actions: table.available_actions(viewer),
            can_act: table.can_act(viewer),
            players: table
                .players
                .iter()
                .filter(|p| !p.disconnected)
                .map(|p| PlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    chips: p.chips,
                    is_admin: p.is_admin,
                    in_hand: p.in_hand,
                    folded: p.folded,
                    all_in: p.all_in,
                    bet_this_round: p.bet_this_round,
                })
                .collect(),
            logs: table.logs.iter().cloned().collect(),
            last_showdown: table.last_showdown.clone(),
        }
    }
}
