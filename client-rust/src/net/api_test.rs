use futures::executor::block_on;

use super::*;

fn history_request() -> HistoryRequest {
    HistoryRequest { from: "me".to_owned(), to: "peer-1".to_owned() }
}

#[test]
fn stubs_fail_outside_browser() {
    let err = block_on(BrowserApi.fetch_history(&history_request())).expect_err("stub");
    assert!(matches!(err, PanelError::Request(_)));

    let send = SendRequest { from: "me".to_owned(), to: "peer-1".to_owned(), message: "hi".to_owned() };
    assert!(block_on(BrowserApi.send_message(&send)).is_err());
}

#[test]
fn contact_stub_is_empty_outside_browser() {
    assert!(block_on(fetch_contacts("me")).is_empty());
    block_on(logout("me"));
}

#[test]
fn undecodable_contact_list_is_empty() {
    let decoded = serde_json::from_str::<Vec<Contact>>(r#"{"status":false}"#);
    assert!(contacts_or_empty(decoded).is_empty());
}

#[test]
fn decoded_contact_list_is_kept() {
    let contact = Contact { id: "p-1".to_owned(), username: "bob".to_owned(), avatar_image: String::new() };
    let decoded: Result<Vec<Contact>, std::convert::Infallible> = Ok(vec![contact.clone()]);
    assert_eq!(contacts_or_empty(decoded), [contact]);
}
