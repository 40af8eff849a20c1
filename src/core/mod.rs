pub mod game_data;
pub mod move_outcome;
pub mod wire;

pub use game_data::GameData;
pub use move_outcome::MoveOutcome;
pub use wire::{ErrorResponse, FirstWordResponse, NextWordRequest, NextWordResponse};
