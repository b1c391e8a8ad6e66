use crate::protocol::{ClientEvent, ServerEvent};
use holdem_engine::{HandOutcome, Table, TableView, NEXT_HAND_DELAY};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};

/// Per-client outbound queue. Sends never block; a dead receiver just drops
/// out of the subscriber map at the next broadcast.
pub type ClientTx = mpsc::UnboundedSender<String>;

pub enum ActorMsg {
    Connect { viewer: String, tx: ClientTx },
    Event { viewer: String, event: ClientEvent },
    Disconnect { viewer: String },
    Tick,
}

/// The single owner of the table. Every connect, client event, disconnect
/// and timer tick funnels through one channel and is handled to completion
/// before the next, so no two mutations ever interleave.
pub struct TableActor {
    pub table: Table,
    pub subscribers: HashMap<String, ClientTx>,
    /// Deadline for dealing the next hand, checked on every tick. Cleared
    /// to cancel.
    pub next_hand_at: Option<Instant>,
}

impl Default for TableActor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableActor {
    pub fn new() -> Self {
        TableActor {
            table: Table::new(),
            subscribers: HashMap::new(),
            next_hand_at: None,
        }
    }

    pub fn spawn() -> mpsc::UnboundedSender<ActorMsg> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tick_tx = tx.clone();
        tokio::spawn(async move {
            loop {
                sleep(Duration::from_millis(200)).await;
                if tick_tx.send(ActorMsg::Tick).is_err() {
                    break;
                }
            }
        });
        tokio::spawn(async move {
            let mut actor = TableActor::new();
            while let Some(msg) = rx.recv().await {
                actor.handle(msg);
            }
        });
        tx
    }

    pub fn handle(&mut self, msg: ActorMsg) {
        match msg {
            ActorMsg::Connect { viewer, tx } => {
                info!(%viewer, "client connected");
                self.subscribers.insert(viewer, tx);
                self.broadcast();
            }
            ActorMsg::Event { viewer, event } => match self.dispatch(&viewer, event) {
                Ok(()) => self.broadcast(),
                Err(message) => self.send_error(&viewer, &message),
            },
            ActorMsg::Disconnect { viewer } => {
                info!(%viewer, "client disconnected");
                self.subscribers.remove(&viewer);
                let outcome = self.table.handle_disconnect(&viewer);
                self.apply_outcome(outcome);
                self.broadcast();
            }
            ActorMsg::Tick => {
                if self.next_hand_at.is_some_and(|at| Instant::now() >= at) {
                    self.next_hand_at = None;
                    let outcome = self.table.start_hand();
                    self.apply_outcome(outcome);
                    self.broadcast();
                }
            }
        }
    }

    /// Rejected events leave the table untouched and produce no broadcast;
    /// the error string goes back to the sender alone.
    fn dispatch(&mut self, viewer: &str, event: ClientEvent) -> Result<(), String> {
        match event {
            ClientEvent::Join { name } => {
                self.table.join(viewer, &name).map_err(|e| e.to_string())?;
                info!(%viewer, "seated");
            }
            ClientEvent::SetStartingStack { amount } => {
                self.table
                    .set_starting_stack(viewer, amount)
                    .map_err(|e| e.to_string())?;
            }
            ClientEvent::StartGame => {
                let outcome = self.table.start_game(viewer).map_err(|e| e.to_string())?;
                // Dealing always cancels whatever deal was pending first.
                self.next_hand_at = None;
                self.apply_outcome(outcome);
                info!(%viewer, "game started");
            }
            ClientEvent::Action { action, amount } => {
                let action = action.into_action(amount).map_err(str::to_string)?;
                let outcome = self
                    .table
                    .apply_action(viewer, action)
                    .map_err(|e| e.to_string())?;
                self.apply_outcome(outcome);
            }
        }
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: HandOutcome) {
        match outcome {
            HandOutcome::Continue => {}
            HandOutcome::NextHandScheduled => {
                self.next_hand_at = Some(Instant::now() + NEXT_HAND_DELAY);
            }
            HandOutcome::Lobby => self.next_hand_at = None,
        }
    }

    fn send_error(&self, viewer: &str, message: &str) {
        warn!(%viewer, message, "rejected client event");
        if let Some(tx) = self.subscribers.get(viewer) {
            let event = ServerEvent::ErrorMessage {
                message: message.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&event) {
                let _ = tx.send(json);
            }
        }
    }

    /// Push a freshly projected view to every connected client. Projection
    /// is per viewer: each client only ever sees its own hole cards.
    fn broadcast(&mut self) {
        let table = &self.table;
        self.subscribers.retain(|viewer, tx| {
            let view = TableView::project(table, viewer);
            match serde_json::to_string(&ServerEvent::State(view)) {
                Ok(json) => tx.send(json).is_ok(),
                Err(_) => true,
            }
        });
    }
}
