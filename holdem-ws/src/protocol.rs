use holdem_engine::{PlayerAction, TableView};
use serde::{Deserialize, Serialize};

/// Inbound wire events. Anything that fails to parse into one of these gets
/// an `errorMessage` back and never reaches the table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    Join { name: String },
    SetStartingStack { amount: u64 },
    StartGame,
    Action { action: ActionKind, amount: Option<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

impl ActionKind {
    pub fn into_action(self, amount: Option<u64>) -> Result<PlayerAction, &'static str> {
        match self {
            ActionKind::Fold => Ok(PlayerAction::Fold),
            ActionKind::Check => Ok(PlayerAction::Check),
            ActionKind::Call => Ok(PlayerAction::Call),
            ActionKind::Raise => match amount {
                Some(to) if to <= u32::MAX as u64 => Ok(PlayerAction::Raise { to: to as u32 }),
                Some(_) => Err("Raise amount too large"),
                None => Err("Raise requires an amount"),
            },
        }
    }
}

/// Outbound wire events: a per-viewer projection after every mutation, or a
/// human-readable error to the offending socket only.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    State(TableView),
    ErrorMessage { message: String },
}
