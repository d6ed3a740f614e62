pub mod chat_input;
pub mod contact_list;
pub mod logout;
pub mod message_panel;
