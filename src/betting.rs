use crate::player::Chips;
use crate::table::{HandOutcome, Table};
use serde::Serialize;
use thiserror::Error;

/// A betting decision by the player on turn. `Raise` is always "raise to",
/// the total bet for the street, not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Raise { to: Chips },
}

/// Client-protocol errors from the action handler; every check runs before
/// any mutation, so a rejected action leaves the table untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActionError {
    #[error("You are not seated at this table")]
    NotSeated,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("You cannot act right now")]
    NotActionable,
    #[error("Cannot check, there is a bet to call")]
    CannotCheck,
    #[error("Nothing to call, check instead")]
    NothingToCall,
    #[error("Cannot raise, action not reopened")]
    ActionNotReopened,
    #[error("Raise must exceed the current bet")]
    RaiseNotAboveBet,
    #[error("Not enough chips for that raise")]
    InsufficientChips,
    #[error("Minimum raise is to {0}")]
    RaiseBelowMinimum(Chips),
}

/// The per-viewer action menu sent with every state projection. All fields
/// are zeroed unless the viewer is the actionable player on turn.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableActions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub can_raise: bool,
    pub call_amount: Chips,
    pub min_raise_to: Chips,
    pub max_raise_to: Chips,
}

impl AvailableActions {
    pub fn none() -> Self {
        AvailableActions {
            can_fold: false,
            can_check: false,
            can_call: false,
            can_raise: false,
            call_amount: 0,
            min_raise_to: 0,
            max_raise_to: 0,
        }
    }
}

impl Table {
    /// Whether `id` is the actionable player currently on turn.
    pub fn can_act(&self, id: &str) -> bool {
        self.hand_in_progress
            && self.current_turn_id.as_deref() == Some(id)
            && self.player(id).is_some_and(|p| p.is_actionable())
    }

    pub fn available_actions(&self, id: &str) -> AvailableActions {
        if !self.can_act(id) {
            return AvailableActions::none();
        }
        let Some(p) = self.player(id) else {
            return AvailableActions::none();
        };
        let to_call = self.current_bet.saturating_sub(p.bet_this_round);
        let max_total = p.bet_this_round + p.chips;
        let min_raise_to = if self.current_bet == 0 {
            self.big_blind
        } else {
            self.current_bet + self.last_raise_size
        };
        let raise_rights = !p.acted || to_call == 0;
        AvailableActions {
            can_fold: true,
            can_check: to_call == 0,
            can_call: to_call > 0 && p.chips > 0,
            can_raise: raise_rights && max_total > self.current_bet,
            call_amount: to_call.min(p.chips),
            min_raise_to: min_raise_to.min(max_total),
            max_raise_to: max_total,
        }
    }

    /// Validate and apply one betting action, then advance the hand: next
    /// turn, next street, fast-forward, or an immediate fold-out win.
    pub fn apply_action(
        &mut self,
        id: &str,
        action: PlayerAction,
    ) -> Result<HandOutcome, ActionError> {
        let idx = self.seat_index(id).ok_or(ActionError::NotSeated)?;
        if !self.game_started || !self.hand_in_progress {
            return Err(ActionError::NoHandInProgress);
        }
        if self.current_turn_id.as_deref() != Some(id) {
            return Err(ActionError::NotYourTurn);
        }
        if !self.players[idx].is_actionable() {
            return Err(ActionError::NotActionable);
        }

        let to_call = self
            .current_bet
            .saturating_sub(self.players[idx].bet_this_round);
        match action {
            PlayerAction::Fold => {
                self.players[idx].fold();
                let name = self.players[idx].name.clone();
                self.log(format!("{} folds", name));
            }
            PlayerAction::Check => {
                if to_call != 0 {
                    return Err(ActionError::CannotCheck);
                }
                self.players[idx].acted = true;
                let name = self.players[idx].name.clone();
                self.log(format!("{} checks", name));
            }
            PlayerAction::Call => {
                if to_call == 0 {
                    return Err(ActionError::NothingToCall);
                }
                let paid = self.players[idx].pay(to_call);
                self.pot += paid;
                self.players[idx].acted = true;
                let name = self.players[idx].name.clone();
                let all_in = self.players[idx].all_in;
                self.log(format!(
                    "{} calls {}{}",
                    name,
                    paid,
                    if all_in { " (all-in)" } else { "" }
                ));
            }
            PlayerAction::Raise { to } => {
                let p = &self.players[idx];
                let max_total = p.bet_this_round + p.chips;
                let min_raise_to = if self.current_bet == 0 {
                    self.big_blind
                } else {
                    self.current_bet + self.last_raise_size
                };
                // Raise rights lapse once a player has acted and is facing
                // a bet.
                if !(!p.acted || to_call == 0) {
                    return Err(ActionError::ActionNotReopened);
                }
                if to <= self.current_bet {
                    return Err(ActionError::RaiseNotAboveBet);
                }
                if to > max_total {
                    return Err(ActionError::InsufficientChips);
                }
                if to < min_raise_to && to != max_total {
                    return Err(ActionError::RaiseBelowMinimum(min_raise_to));
                }

                let prev_bet = self.current_bet;
                let owed = to - self.players[idx].bet_this_round;
                let paid = self.players[idx].pay(owed);
                self.pot += paid;
                self.players[idx].acted = true;
                self.current_bet = to;
                // Only a full raise moves the minimum for the next one; an
                // all-in under-raise leaves it untouched.
                let increment = to - prev_bet;
                if increment >= self.last_raise_size {
                    self.last_raise_size = increment;
                }
                let name = self.players[idx].name.clone();
                let all_in = self.players[idx].all_in;
                let verb = if prev_bet == 0 { "bets" } else { "raises to" };
                self.log(format!(
                    "{} {} {}{}",
                    name,
                    verb,
                    to,
                    if all_in { " (all-in)" } else { "" }
                ));
            }
        }

        Ok(self.settle_after_action(idx, true))
    }

    /// A betting round is complete once every actionable player has acted
    /// and matches the current bet.
    pub(crate) fn round_complete(&self) -> bool {
        self.players
            .iter()
            .filter(|p| p.is_actionable())
            .all(|p| p.acted && p.bet_this_round == self.current_bet)
    }

    /// Common tail for actions and forced folds: fold-out win, round
    /// completion, or pass the turn along the ring.
    pub(crate) fn settle_after_action(&mut self, idx: usize, on_turn: bool) -> HandOutcome {
        if self.contender_count() <= 1 {
            return self.resolve_by_fold();
        }
        if self.round_complete() {
            return self.end_betting_round();
        }
        if on_turn {
            match self.next_actionable_after(idx) {
                Some(next) => self.current_turn_id = Some(self.players[next].id.clone()),
                None => return self.fast_forward(),
            }
        }
        HandOutcome::Continue
    }
}
