use super::*;

#[test]
fn contact_class_marks_selection() {
    assert_eq!(contact_class(false), "contact");
    assert_eq!(contact_class(true), "contact contact--selected");
}
