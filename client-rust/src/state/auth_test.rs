use super::*;

fn user() -> User {
    User { id: "u-1".to_owned(), username: "alice".to_owned(), email: None, avatar_image: None }
}

// =============================================================
// AuthState
// =============================================================

#[test]
fn auth_state_default_has_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert_eq!(state.user_id(), None);
}

#[test]
fn user_id_reads_signed_in_user() {
    let state = AuthState { user: Some(user()) };
    assert_eq!(state.user_id(), Some("u-1"));
}
