//! Who may send, read and modify which messages. No I/O happens here.

use super::{Kind, Message};

pub fn can_send(sender_present: bool) -> bool {
    sender_present
}

/// Must agree with the `WHERE` clause the store filters by.
pub fn is_visible(message: &Message, requester: &str) -> bool {
    match message.kind {
        Kind::Status | Kind::Broadcast => true,
        Kind::Private => message.from == requester || message.to == requester,
    }
}

pub fn can_modify(message: &Message, requester: &str) -> bool {
    message.from == requester
}
