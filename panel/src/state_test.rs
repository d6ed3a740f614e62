use super::*;

fn contact(id: &str) -> Contact {
    Contact { id: id.to_owned(), username: format!("user-{id}"), avatar_image: String::new() }
}

fn conversation(peer: &str) -> Conversation {
    Conversation { user_id: "me".to_owned(), contact: contact(peer) }
}

fn history(items: &[(bool, &str)]) -> Vec<ChatMessage> {
    items
        .iter()
        .map(|(from_self, message)| ChatMessage { from_self: *from_self, message: (*message).to_owned() })
        .collect()
}

fn texts(core: &PanelCore) -> Vec<String> {
    core.messages().iter().map(|e| e.text.clone()).collect()
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_is_idle_and_empty() {
    let core = PanelCore::default();
    assert_eq!(core.phase(), Phase::Idle);
    assert!(core.conversation().is_none());
    assert!(core.messages().is_empty());
    assert!(core.scroll_anchor().is_none());
}

// =============================================================
// select / apply_history
// =============================================================

#[test]
fn select_issues_ticket_for_user_and_peer() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));
    assert_eq!(ticket.request(), &HistoryRequest { from: "me".to_owned(), to: "peer-1".to_owned() });
    assert_eq!(core.phase(), Phase::Loading);
}

#[test]
fn apply_history_renders_items_in_returned_order() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));

    let action = core.apply_history(ticket, history(&[(true, "a"), (false, "b"), (true, "c")]));

    assert_eq!(texts(&core), ["a", "b", "c"]);
    assert_eq!(core.phase(), Phase::Ready);
    let last = core.messages().last_key().expect("last entry");
    assert_eq!(action, Action::ScrollTo(last));
    assert_eq!(core.scroll_anchor(), Some(last));
}

#[test]
fn apply_empty_history_yields_no_scroll() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));
    assert_eq!(core.apply_history(ticket, Vec::new()), Action::None);
    assert_eq!(core.phase(), Phase::Ready);
}

#[test]
fn switching_conversation_clears_then_replaces_list() {
    let mut core = PanelCore::new();
    let first = core.select(conversation("peer-1"));
    core.apply_history(first, history(&[(true, "old")]));

    let second = core.select(conversation("peer-2"));
    assert!(core.messages().is_empty());
    assert_eq!(core.conversation().map(|c| c.contact.id.as_str()), Some("peer-2"));

    core.apply_history(second, history(&[(false, "new")]));
    assert_eq!(texts(&core), ["new"]);
}

#[test]
fn stale_history_response_is_dropped() {
    let mut core = PanelCore::new();
    let stale = core.select(conversation("peer-1"));
    let fresh = core.select(conversation("peer-2"));

    core.apply_history(fresh, history(&[(false, "from peer 2")]));
    let action = core.apply_history(stale, history(&[(false, "from peer 1")]));

    assert_eq!(action, Action::None);
    assert_eq!(texts(&core), ["from peer 2"]);
}

#[test]
fn stale_response_arriving_first_does_not_settle_loading() {
    let mut core = PanelCore::new();
    let stale = core.select(conversation("peer-1"));
    let fresh = core.select(conversation("peer-2"));

    core.apply_history(stale, history(&[(false, "x")]));
    assert!(core.messages().is_empty());
    assert_eq!(core.phase(), Phase::Loading);

    core.apply_history(fresh, history(&[(false, "y")]));
    assert_eq!(texts(&core), ["y"]);
}

#[test]
fn messages_received_while_loading_survive_history() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));
    core.receive("live");
    let sent = core.compose("mine").expect("outgoing");

    core.apply_history(ticket, history(&[(true, "h1"), (false, "h2")]));

    assert_eq!(texts(&core), ["h1", "h2", "live", "mine"]);
    assert_eq!(core.scroll_anchor(), Some(sent.key));
}

#[test]
fn history_failure_leaves_list_unchanged() {
    let mut core = PanelCore::new();
    let first = core.select(conversation("peer-1"));
    core.apply_history(first, history(&[(true, "kept")]));

    // Re-opening the same conversation with a live message, then failing.
    let retry = core.select(conversation("peer-1"));
    core.receive("during reload");
    let before = core.messages().entries().to_vec();

    core.history_failed(retry, &"connection refused");

    assert_eq!(core.messages().entries(), before.as_slice());
    assert_eq!(core.phase(), Phase::Ready);
}

#[test]
fn stale_history_failure_keeps_newer_request_loading() {
    let mut core = PanelCore::new();
    let stale = core.select(conversation("peer-1"));
    let _fresh = core.select(conversation("peer-2"));

    core.history_failed(stale, &"timeout");
    assert_eq!(core.phase(), Phase::Loading);
}

#[test]
fn ticket_is_dropped_after_deselect() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));
    core.deselect();

    assert_eq!(core.apply_history(ticket, history(&[(true, "late")])), Action::None);
    assert!(core.messages().is_empty());
    assert_eq!(core.phase(), Phase::Idle);
}

// =============================================================
// compose
// =============================================================

#[test]
fn compose_appends_self_entry_immediately() {
    let mut core = PanelCore::new();
    let _ticket = core.select(conversation("peer-1"));

    let out = core.compose("hello").expect("outgoing");

    assert_eq!(core.messages().len(), 1);
    let entry = &core.messages().entries()[0];
    assert!(entry.from_self);
    assert_eq!(entry.text, "hello");
    assert_eq!(entry.key, out.key);
    assert_eq!(core.scroll_anchor(), Some(out.key));
}

#[test]
fn compose_builds_request_and_event() {
    let mut core = PanelCore::new();
    let _ticket = core.select(conversation("peer-1"));

    let out = core.compose("hello").expect("outgoing");

    assert_eq!(
        out.request,
        SendRequest { from: "me".to_owned(), to: "peer-1".to_owned(), message: "hello".to_owned() }
    );
    assert_eq!(
        out.event,
        SocketEvent::SendMsg(SendMsg { to: "peer-1".to_owned(), from: "me".to_owned(), message: "hello".to_owned() })
    );
}

#[test]
fn compose_rejects_blank_text() {
    let mut core = PanelCore::new();
    let _ticket = core.select(conversation("peer-1"));
    assert!(core.compose("").is_none());
    assert!(core.compose("   \n").is_none());
    assert!(core.messages().is_empty());
}

#[test]
fn compose_without_conversation_is_noop() {
    let mut core = PanelCore::new();
    assert!(core.compose("hello").is_none());
    assert!(core.messages().is_empty());
}

// =============================================================
// receive / apply_event
// =============================================================

#[test]
fn receive_appends_exactly_one_peer_entry() {
    let mut core = PanelCore::new();
    let ticket = core.select(conversation("peer-1"));
    core.apply_history(ticket, history(&[(true, "a")]));

    let action = core.receive("incoming");

    assert_eq!(core.messages().len(), 2);
    let entry = &core.messages().entries()[1];
    assert!(!entry.from_self);
    assert_eq!(entry.text, "incoming");
    assert_eq!(action, Action::ScrollTo(entry.key));
}

#[test]
fn apply_event_routes_msg_receive() {
    let mut core = PanelCore::new();
    let _ticket = core.select(conversation("peer-1"));

    core.apply_event(SocketEvent::MsgReceive { message: "ping".to_owned() });

    assert_eq!(texts(&core), ["ping"]);
}

#[test]
fn apply_event_ignores_other_events() {
    let mut core = PanelCore::new();
    let _ticket = core.select(conversation("peer-1"));

    let action = core.apply_event(SocketEvent::Other { name: "typing".to_owned(), payload: serde_json::Value::Null });
    let action2 = core.apply_event(SocketEvent::AddUser { user_id: "x".to_owned() });

    assert_eq!(action, Action::None);
    assert_eq!(action2, Action::None);
    assert!(core.messages().is_empty());
}
