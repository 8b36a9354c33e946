mod types;

pub use types::{ChatMessage, Club, User, Versioned};
