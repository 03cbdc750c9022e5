pub mod constants;
pub mod error;
pub mod message;

pub use constants::*;
pub use error::{FeedError, Result};
pub use message::ChatMessage;
