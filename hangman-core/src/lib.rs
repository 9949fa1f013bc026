pub mod game_state;
pub mod guess_validation;
pub mod score_ledger;
pub mod statistics;
pub mod user_record;
pub mod word_bank;

// Re-export main components
pub use game_state::*;
pub use guess_validation::*;
pub use score_ledger::*;
pub use statistics::*;
pub use user_record::*;
pub use word_bank::*;
