//! Authoritative single-table no-limit Texas Hold'em engine.
//!
//! The table owns every rule decision: deck order, blinds, turn order,
//! betting legality, street progression, showdown evaluation with side
//! pots, and the per-viewer projection of all of it. Transports feed it
//! events one at a time and broadcast the views it produces.

pub mod advisor;
pub mod betting;
pub mod cards;
pub mod deck;
pub mod eval;
pub mod player;
pub mod pot;
pub mod table;
pub mod view;

pub use advisor::{hand_insight, HandInsight};
pub use betting::{ActionError, AvailableActions, PlayerAction};
pub use cards::{card, Card, ParseCardError, Rank, Suit};
pub use deck::{Deck, DeckError};
pub use eval::{evaluate, EvalError, HandCategory, HandRank};
pub use player::{Chips, Player, PlayerId};
pub use pot::{distribute, PayoutRow, ShowdownHand, ShowdownSummary};
pub use table::{
    HandOutcome, LobbyError, LogEntry, Phase, Table, BIG_BLIND, DEFAULT_STARTING_STACK,
    LOG_CAPACITY, MAX_PLAYERS, NEXT_HAND_DELAY, SMALL_BLIND,
};
pub use view::{PlayerView, TableView};
