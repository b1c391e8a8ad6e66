use crate::cards::Card;
use crate::deck::Deck;
use crate::eval::evaluate;
use crate::player::{Chips, Player, PlayerId};
use crate::pot::{self, PayoutRow, ShowdownHand, ShowdownSummary};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;

pub const MAX_PLAYERS: usize = 6;
pub const DEFAULT_STARTING_STACK: Chips = 1000;
pub const SMALL_BLIND: Chips = 10;
pub const BIG_BLIND: Chips = 20;
pub const MIN_STARTING_STACK: u64 = 50;
pub const MAX_STARTING_STACK: u64 = 1_000_000;
pub const LOG_CAPACITY: usize = 40;
/// Pause between the end of one hand and the deal of the next.
pub const NEXT_HAND_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// What a state-mutating event left behind, from the transport's point of
/// view: play continues, another hand is due after the inter-hand delay, or
/// the table dropped back to the lobby (cancelling any pending deal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    Continue,
    NextHandScheduled,
    Lobby,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub time: String,
    pub message: String,
}

/// Client-protocol errors from the lobby handlers. The display string is
/// exactly what goes back to the offending socket.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LobbyError {
    #[error("You are not seated at this table")]
    NotSeated,
    #[error("Already seated at the table")]
    AlreadySeated,
    #[error("Game already started")]
    GameAlreadyStarted,
    #[error("Table is full")]
    TableFull,
    #[error("Name must be 2 to 20 characters")]
    BadName,
    #[error("Only the admin can do that")]
    NotAdmin,
    #[error("Starting stack must be between 50 and 1,000,000")]
    BadStackAmount,
    #[error("Need at least 2 connected players to start")]
    NotEnoughPlayers,
}

/// The single authoritative table. Owns every player record, the deck, and
/// the pot; nothing in here is ever handed out by reference to a client.
#[derive(Debug)]
pub struct Table {
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub phase: Phase,
    pub game_started: bool,
    pub hand_in_progress: bool,
    pub hand_number: u32,
    /// Insertion order is ring order.
    pub players: Vec<Player>,
    pub deck: Deck,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    /// Highest bet anyone must match this street.
    pub current_bet: Chips,
    /// Minimum increment for the next full raise.
    pub last_raise_size: Chips,
    pub current_turn_id: Option<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    pub last_showdown: Option<ShowdownSummary>,
    pub logs: VecDeque<LogEntry>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Table {
            starting_stack: DEFAULT_STARTING_STACK,
            small_blind: SMALL_BLIND,
            big_blind: BIG_BLIND,
            phase: Phase::Lobby,
            game_started: false,
            hand_in_progress: false,
            hand_number: 0,
            players: Vec::new(),
            deck: Deck::stacked(Vec::new()),
            community_cards: Vec::new(),
            pot: 0,
            current_bet: 0,
            last_raise_size: BIG_BLIND,
            current_turn_id: None,
            dealer_id: None,
            small_blind_id: None,
            big_blind_id: None,
            last_showdown: None,
            logs: VecDeque::new(),
        }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
        });
    }

    // ---- lobby ----

    pub fn join(&mut self, id: &str, name: &str) -> Result<(), LobbyError> {
        if self.seat_index(id).is_some() {
            return Err(LobbyError::AlreadySeated);
        }
        if self.game_started {
            return Err(LobbyError::GameAlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(LobbyError::TableFull);
        }
        let name = sanitize_name(name).ok_or(LobbyError::BadName)?;
        let mut player = Player::new(id.to_string(), name, self.starting_stack);
        if !self.players.iter().any(|p| p.is_admin && !p.disconnected) {
            player.is_admin = true;
        }
        self.log(format!("{} joined the table", player.name));
        self.players.push(player);
        Ok(())
    }

    pub fn set_starting_stack(&mut self, id: &str, amount: u64) -> Result<(), LobbyError> {
        let caller = self.seat_index(id).ok_or(LobbyError::NotSeated)?;
        if !self.players[caller].is_admin {
            return Err(LobbyError::NotAdmin);
        }
        if self.game_started {
            return Err(LobbyError::GameAlreadyStarted);
        }
        if !(MIN_STARTING_STACK..=MAX_STARTING_STACK).contains(&amount) {
            return Err(LobbyError::BadStackAmount);
        }
        self.starting_stack = amount as Chips;
        for p in &mut self.players {
            p.chips = self.starting_stack;
        }
        self.log(format!("Starting stack set to {}", amount));
        Ok(())
    }

    pub fn start_game(&mut self, id: &str) -> Result<HandOutcome, LobbyError> {
        let caller = self.seat_index(id).ok_or(LobbyError::NotSeated)?;
        if !self.players[caller].is_admin {
            return Err(LobbyError::NotAdmin);
        }
        if self.game_started {
            return Err(LobbyError::GameAlreadyStarted);
        }
        if self.players.iter().filter(|p| !p.disconnected).count() < 2 {
            return Err(LobbyError::NotEnoughPlayers);
        }
        self.game_started = true;
        self.log("Game started");
        Ok(self.start_hand())
    }

    // ---- hand lifecycle ----

    /// Deal the next hand, or fall back to the lobby if fewer than two
    /// players can still play.
    pub fn start_hand(&mut self) -> HandOutcome {
        self.players.retain(|p| !p.disconnected);
        self.ensure_admin();

        let eligible: Vec<usize> = (0..self.players.len())
            .filter(|&i| self.players[i].chips > 0)
            .collect();
        if eligible.len() < 2 {
            if self.game_started {
                if let Some(&only) = eligible.first() {
                    let name = self.players[only].name.clone();
                    self.log(format!("{} wins the game", name));
                }
            }
            return self.return_to_lobby();
        }

        self.deck = match Deck::fresh() {
            Ok(deck) => deck,
            Err(e) => return self.abort_hand(&e.to_string()),
        };
        self.last_showdown = None;
        self.community_cards.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.last_raise_size = self.big_blind;
        for p in &mut self.players {
            p.reset_for_hand();
        }
        for &i in &eligible {
            self.players[i].in_hand = true;
        }
        self.hand_number += 1;
        self.hand_in_progress = true;
        self.phase = Phase::Preflop;
        self.log(format!("Hand #{}", self.hand_number));

        // Button moves to the next eligible seat; heads-up the dealer posts
        // the small blind.
        let dealer = match self.dealer_index() {
            Some(prev) => match self.next_in_hand_after(prev) {
                Some(next) => next,
                None => return self.resolve_by_fold(),
            },
            None => eligible[0],
        };
        let (sb_idx, bb_idx) = if eligible.len() == 2 {
            match self.next_in_hand_after(dealer) {
                Some(other) => (dealer, other),
                None => return self.resolve_by_fold(),
            }
        } else {
            let sb = self.next_in_hand_after(dealer);
            let bb = sb.and_then(|sb| self.next_in_hand_after(sb));
            match (sb, bb) {
                (Some(sb), Some(bb)) => (sb, bb),
                _ => return self.resolve_by_fold(),
            }
        };
        self.dealer_id = Some(self.players[dealer].id.clone());
        self.small_blind_id = Some(self.players[sb_idx].id.clone());
        self.big_blind_id = Some(self.players[bb_idx].id.clone());

        // Two cards each, one at a time, starting left of the button.
        let mut order = Vec::new();
        let mut idx = dealer;
        for _ in 0..self.players.len() {
            idx = (idx + 1) % self.players.len();
            if self.players[idx].in_hand {
                order.push(idx);
            }
        }
        for _round in 0..2 {
            for &i in &order {
                match self.deck.draw() {
                    Ok(card) => self.players[i].hole_cards.push(card),
                    Err(e) => return self.abort_hand(&e.to_string()),
                }
            }
        }

        // Forced bets, capped by the stack. A short blind goes all-in but
        // does not lower the bet everyone else must match.
        let small_blind = self.small_blind;
        let big_blind = self.big_blind;
        let sb_paid = self.players[sb_idx].pay(small_blind);
        self.pot += sb_paid;
        let sb_name = self.players[sb_idx].name.clone();
        self.log(format!("{} posts small blind {}", sb_name, sb_paid));
        let bb_paid = self.players[bb_idx].pay(big_blind);
        self.pot += bb_paid;
        let bb_name = self.players[bb_idx].name.clone();
        self.log(format!("{} posts big blind {}", bb_name, bb_paid));
        self.current_bet = big_blind.max(sb_paid).max(bb_paid);

        for p in &mut self.players {
            p.acted = !p.is_actionable();
        }
        match self.next_actionable_after(bb_idx) {
            Some(first) => {
                self.current_turn_id = Some(self.players[first].id.clone());
                HandOutcome::Continue
            }
            None => self.fast_forward(),
        }
    }

    /// Burn one, deal the next street's community cards, advance the phase.
    pub(crate) fn deal_next_street(&mut self) -> Result<(), crate::deck::DeckError> {
        let (next, count, label) = match self.phase {
            Phase::Preflop => (Phase::Flop, 3, "Flop"),
            Phase::Flop => (Phase::Turn, 1, "Turn"),
            Phase::Turn => (Phase::River, 1, "River"),
            _ => return Ok(()),
        };
        self.deck.burn()?;
        for _ in 0..count {
            let card = self.deck.draw()?;
            self.community_cards.push(card);
        }
        self.phase = next;
        let board = self
            .community_cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.log(format!("{}: {}", label, board));
        Ok(())
    }

    /// The current betting round is done: move to the next street, or to
    /// showdown from the river.
    pub(crate) fn end_betting_round(&mut self) -> HandOutcome {
        if self.phase == Phase::River {
            return self.showdown();
        }
        if let Err(e) = self.deal_next_street() {
            return self.abort_hand(&e.to_string());
        }
        self.current_bet = 0;
        self.last_raise_size = self.big_blind;
        for p in &mut self.players {
            p.reset_for_street();
        }
        let dealer = self.dealer_index().unwrap_or(0);
        match self.next_actionable_after(dealer) {
            Some(first) => {
                self.current_turn_id = Some(self.players[first].id.clone());
                HandOutcome::Continue
            }
            None => self.fast_forward(),
        }
    }

    /// Nobody left who can act but the pot is still contested: reveal the
    /// rest of the board and go straight to showdown.
    pub(crate) fn fast_forward(&mut self) -> HandOutcome {
        self.current_turn_id = None;
        while self.phase != Phase::River {
            if let Err(e) = self.deal_next_street() {
                return self.abort_hand(&e.to_string());
            }
        }
        self.showdown()
    }

    pub(crate) fn showdown(&mut self) -> HandOutcome {
        self.phase = Phase::Showdown;
        self.current_turn_id = None;
        let dealer = self.dealer_index().unwrap_or(0);

        let mut ranks = Vec::with_capacity(self.players.len());
        for p in &self.players {
            if p.in_hand {
                let mut cards = p.hole_cards.clone();
                cards.extend_from_slice(&self.community_cards);
                match evaluate(&cards) {
                    Ok(rank) => ranks.push(Some(rank)),
                    Err(e) => return self.abort_hand(&e.to_string()),
                }
            } else {
                ranks.push(None);
            }
        }

        let contributions: Vec<Chips> =
            self.players.iter().map(|p| p.total_contribution).collect();
        let winnings = pot::distribute(&contributions, &ranks, dealer);

        let mut hands = Vec::new();
        let mut payouts = Vec::new();
        for (i, p) in self.players.iter_mut().enumerate() {
            if let Some(rank) = &ranks[i] {
                hands.push(ShowdownHand {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                    cards: p.hole_cards.clone(),
                    description: rank.describe(),
                });
            }
            if winnings[i] > 0 {
                p.chips += winnings[i];
                payouts.push(PayoutRow {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                    amount: winnings[i],
                });
            }
        }
        payouts.sort_by(|a, b| b.amount.cmp(&a.amount));
        for hand in &hands {
            let line = format!("{} shows {}", hand.name, hand.description);
            self.log(line);
        }
        for row in &payouts {
            let line = format!("{} wins {}", row.name, row.amount);
            self.log(line);
        }
        self.last_showdown = Some(ShowdownSummary {
            board: self.community_cards.clone(),
            hands,
            payouts,
        });
        self.finish_hand()
    }

    /// Only one contender left: the pot is theirs, cards stay hidden.
    pub(crate) fn resolve_by_fold(&mut self) -> HandOutcome {
        let pot = self.pot;
        if let Some(winner) = self.players.iter_mut().find(|p| p.in_hand) {
            winner.chips += pot;
            let name = winner.name.clone();
            self.log(format!("{} wins {} uncontested", name, pot));
        }
        self.last_showdown = None;
        self.finish_hand()
    }

    fn finish_hand(&mut self) -> HandOutcome {
        self.hand_in_progress = false;
        self.current_turn_id = None;
        self.pot = 0;
        self.current_bet = 0;
        for p in &mut self.players {
            p.reset_for_hand();
        }
        let standing: Vec<String> = self
            .players
            .iter()
            .filter(|p| !p.disconnected && p.chips > 0)
            .map(|p| p.name.clone())
            .collect();
        match standing.as_slice() {
            [_, _, ..] => {
                self.log("Next hand starts shortly");
                HandOutcome::NextHandScheduled
            }
            [last] => {
                let name = last.clone();
                self.log(format!("{} wins the game", name));
                self.return_to_lobby()
            }
            [] => self.return_to_lobby(),
        }
    }

    /// Lenient recovery for invariant violations: give the committed chips
    /// back, note the diagnostic, drop to the lobby.
    fn abort_hand(&mut self, diagnostic: &str) -> HandOutcome {
        self.log(format!("Hand aborted: {}", diagnostic));
        for p in &mut self.players {
            p.chips += p.total_contribution;
        }
        self.return_to_lobby()
    }

    fn return_to_lobby(&mut self) -> HandOutcome {
        self.players.retain(|p| !p.disconnected);
        self.ensure_admin();
        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.phase = Phase::Lobby;
        self.game_started = false;
        self.hand_in_progress = false;
        self.pot = 0;
        self.current_bet = 0;
        self.community_cards.clear();
        self.current_turn_id = None;
        self.dealer_id = None;
        self.small_blind_id = None;
        self.big_blind_id = None;
        self.log("Back to the lobby");
        HandOutcome::Lobby
    }

    // ---- disconnects ----

    /// Transport-driven. An actionable player is folded out; an all-in
    /// player keeps their stake through showdown; the seat itself is only
    /// removed between hands.
    pub fn handle_disconnect(&mut self, id: &str) -> HandOutcome {
        let Some(idx) = self.seat_index(id) else {
            return HandOutcome::Continue;
        };
        self.players[idx].disconnected = true;
        let name = self.players[idx].name.clone();
        self.log(format!("{} disconnected", name));

        if !self.hand_in_progress {
            self.players.remove(idx);
            self.ensure_admin();
            return HandOutcome::Continue;
        }
        if self.players[idx].is_actionable() {
            let on_turn = self.current_turn_id.as_deref() == Some(id);
            self.players[idx].fold();
            self.log(format!("{} folds (disconnected)", name));
            return self.settle_after_action(idx, on_turn);
        }
        HandOutcome::Continue
    }

    fn ensure_admin(&mut self) {
        if self.players.iter().any(|p| p.is_admin && !p.disconnected) {
            return;
        }
        for p in &mut self.players {
            p.is_admin = false;
        }
        let name = match self.players.iter_mut().find(|p| !p.disconnected) {
            Some(first) => {
                first.is_admin = true;
                Some(first.name.clone())
            }
            None => None,
        };
        if let Some(name) = name {
            self.log(format!("{} is now the admin", name));
        }
    }

    // ---- ring helpers ----

    pub fn seat_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn dealer_index(&self) -> Option<usize> {
        self.dealer_id.as_deref().and_then(|id| self.seat_index(id))
    }

    pub(crate) fn next_in_hand_after(&self, idx: usize) -> Option<usize> {
        let n = self.players.len();
        if n == 0 {
            return None;
        }
        (1..=n)
            .map(|step| (idx + step) % n)
            .find(|&i| self.players[i].in_hand)
    }

    pub(crate) fn next_actionable_after(&self, idx: usize) -> Option<usize> {
        let n = self.players.len();
        if n == 0 {
            return None;
        }
        (1..=n)
            .map(|step| (idx + step) % n)
            .find(|&i| self.players[i].is_actionable())
    }

    pub(crate) fn contender_count(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand).count()
    }
}

/// Trim, collapse internal whitespace, and require 2 to 20 characters.
fn sanitize_name(raw: &str) -> Option<String> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = name.chars().count();
    (2..=20).contains(&len).then_some(name)
}
