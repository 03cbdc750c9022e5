// Messaging module - inbound frame classification and message retention
pub mod decoder;
pub mod history;

pub use decoder::{decode_frame, DecodedFrame};
pub use history::MessageHistory;
