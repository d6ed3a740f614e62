use frames::ChatMessage;

use super::*;

fn list(messages: &[(bool, &str)]) -> MessageList {
    let mut list = MessageList::new();
    for (from_self, text) in messages {
        list.push(*from_self, *text);
    }
    list
}

#[test]
fn line_names_the_author() {
    let list = list(&[(true, "hi"), (false, "hey")]);
    assert_eq!(line(&list.entries()[0], "bob"), "you: hi");
    assert_eq!(line(&list.entries()[1], "bob"), "bob: hey");
}

#[test]
fn header_pluralizes() {
    assert_eq!(header("bob", 1), "--- conversation with bob (1 message) ---");
    assert_eq!(header("bob", 0), "--- conversation with bob (0 messages) ---");
}

#[test]
fn pending_returns_only_new_entries() {
    let mut transcript = Transcript::new("bob");
    let mut list = list(&[(false, "one")]);

    assert_eq!(transcript.pending(&list), ["bob: one"]);
    assert!(transcript.pending(&list).is_empty());

    list.push(true, "two");
    assert_eq!(transcript.pending(&list), ["you: two"]);
}

#[test]
fn pending_restarts_after_clear() {
    let mut transcript = Transcript::new("bob");
    let mut list = list(&[(false, "a"), (false, "b")]);
    transcript.skip(&list);

    list.clear();
    list.splice_history(vec![ChatMessage { from_self: true, message: "fresh".to_owned() }]);

    assert_eq!(transcript.pending(&list), ["you: fresh"]);
}

#[test]
fn write_lines_ends_each_line() {
    let mut out = Vec::new();
    write_lines(&mut out, &["a".to_owned(), "b".to_owned()]).expect("write");
    assert_eq!(out, b"a\nb\n");
}
