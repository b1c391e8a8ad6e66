use holdem_ws::actor::{ActorMsg, TableActor};
use holdem_ws::protocol::{ActionKind, ClientEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

struct TestClient {
    viewer: String,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    fn connect(actor: &mut TableActor, viewer: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        actor.handle(ActorMsg::Connect {
            viewer: viewer.to_string(),
            tx,
        });
        TestClient {
            viewer: viewer.to_string(),
            rx,
        }
    }

    fn send(&self, actor: &mut TableActor, event: ClientEvent) {
        actor.handle(ActorMsg::Event {
            viewer: self.viewer.clone(),
            event,
        });
    }

    fn join(&self, actor: &mut TableActor, name: &str) {
        self.send(
            actor,
            ClientEvent::Join {
                name: name.to_string(),
            },
        );
    }

    /// Drain the outbound queue and return the messages received so far.
    fn drain(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(json) = self.rx.try_recv() {
            out.push(serde_json::from_str(&json).unwrap());
        }
        out
    }

    fn last_state(&mut self) -> Value {
        let states: Vec<Value> = self
            .drain()
            .into_iter()
            .filter(|v| v["type"] == "state")
            .collect();
        states.last().cloned().expect("at least one state message")
    }
}

fn action(kind: ActionKind, amount: Option<u64>) -> ClientEvent {
    ClientEvent::Action {
        action: kind,
        amount,
    }
}

#[tokio::test]
async fn joining_broadcasts_state_to_everyone() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");

    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");

    let state = alice.last_state();
    assert_eq!(state["joined"], true);
    assert_eq!(state["youId"], "p1");
    assert_eq!(state["players"].as_array().unwrap().len(), 2);
    assert_eq!(state["players"][0]["isAdmin"], true);

    let state = bob.last_state();
    assert_eq!(state["youId"], "p2");
    assert_eq!(state["gameStarted"], false);
}

#[tokio::test]
async fn rejected_events_answer_only_the_sender() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");
    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");
    let mut carol = TestClient::connect(&mut actor, "p3");
    alice.drain();
    bob.drain();
    carol.drain();

    // A bad name mutates nothing and reaches nobody else.
    carol.join(&mut actor, "x");
    let events = carol.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "errorMessage");
    assert_eq!(events[0]["message"], "Name must be 2 to 20 characters");
    assert!(alice.drain().is_empty());

    // Same for a non-admin trying to configure the table.
    bob.send(
        &mut actor,
        ClientEvent::SetStartingStack { amount: 500 },
    );
    let events = bob.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["message"], "Only the admin can do that");
    assert!(alice.drain().is_empty());
}

#[tokio::test]
async fn started_hands_deal_hidden_hole_cards() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");
    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");
    alice.send(&mut actor, ClientEvent::StartGame);

    let state = alice.last_state();
    assert_eq!(state["handInProgress"], true);
    assert_eq!(state["phase"], "preflop");
    assert_eq!(state["yourCards"].as_array().unwrap().len(), 2);
    assert_eq!(state["deckRemaining"], 48);
    // The opponent entry carries no cards at all.
    for player in state["players"].as_array().unwrap() {
        assert!(player.get("holeCards").is_none());
        assert!(player.get("cards").is_none());
    }

    let bob_state = bob.last_state();
    let alice_cards = state["yourCards"].as_array().unwrap();
    let bob_cards = bob_state["yourCards"].as_array().unwrap();
    assert_eq!(bob_cards.len(), 2);
    assert_ne!(alice_cards, bob_cards);
}

#[tokio::test]
async fn actions_flow_and_errors_stay_private() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");
    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");
    alice.send(&mut actor, ClientEvent::StartGame);
    alice.drain();
    bob.drain();

    // Heads-up: the dealer (Alice) acts first and owes the half blind.
    bob.send(&mut actor, action(ActionKind::Call, None));
    let events = bob.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["message"], "Not your turn");
    assert!(alice.drain().is_empty());

    alice.send(&mut actor, action(ActionKind::Call, None));
    let state = alice.last_state();
    assert_eq!(state["pot"], 40);
    assert_eq!(state["currentTurnId"], "p2");
    assert_eq!(state["canAct"], false);

    let state = bob.last_state();
    assert_eq!(state["canAct"], true);
    assert_eq!(state["availableActions"]["canCheck"], true);

    // A raise without an amount never reaches the table.
    bob.send(&mut actor, action(ActionKind::Raise, None));
    let events = bob.drain();
    assert_eq!(events[0]["message"], "Raise requires an amount");
}

#[tokio::test]
async fn disconnect_mid_hand_folds_and_pays_the_survivor() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");
    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");
    alice.send(&mut actor, ClientEvent::StartGame);
    bob.drain();

    actor.handle(ActorMsg::Disconnect {
        viewer: "p1".to_string(),
    });
    let state = bob.last_state();
    assert_eq!(state["handInProgress"], false);
    // Bob collected Alice's small blind; heads-up that also ends the game,
    // so no further deal is pending.
    let bob_row = state["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "p2")
        .cloned()
        .unwrap();
    assert_eq!(bob_row["chips"], 1010);
    assert_eq!(state["gameStarted"], false);
    assert_eq!(state["phase"], "lobby");
    assert!(actor.next_hand_at.is_none());
}

#[tokio::test]
async fn tick_deals_the_scheduled_hand() {
    let mut actor = TableActor::new();
    let mut alice = TestClient::connect(&mut actor, "p1");
    let mut bob = TestClient::connect(&mut actor, "p2");
    alice.join(&mut actor, "Alice");
    bob.join(&mut actor, "Bob");
    alice.send(&mut actor, ClientEvent::StartGame);

    // Fold the first hand away so the next one gets scheduled.
    alice.send(&mut actor, action(ActionKind::Fold, None));
    assert!(actor.next_hand_at.is_some());
    assert_eq!(actor.table.hand_number, 1);

    // Not due yet: ticks do nothing.
    actor.handle(ActorMsg::Tick);
    assert_eq!(actor.table.hand_number, 1);

    actor.next_hand_at = Some(Instant::now() - Duration::from_millis(1));
    actor.handle(ActorMsg::Tick);
    assert!(actor.next_hand_at.is_none());
    assert_eq!(actor.table.hand_number, 2);
    assert_eq!(alice.last_state()["handNumber"], 2);
    assert_eq!(bob.last_state()["handInProgress"], true);
}
