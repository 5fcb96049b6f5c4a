//! Klondike solitaire: a rules engine for the Basic, Whitehead, and
//! Limited-Draw variants, plus the text controller and view that drive it.

pub mod board;
pub mod card;
pub mod cli;
pub mod command;
pub mod deck;
pub mod error;
pub mod game;
pub mod history;
pub mod klondike;
pub mod model;
pub mod renderer;
pub mod rules;

pub use card::{Card, Color, Rank, Suit, full_deck};
pub use deck::is_valid_deal;
pub use error::{ErrorKind, KlondikeError};
pub use klondike::Klondike;
pub use model::KlondikeModel;
pub use rules::{RuleSet, Variant};
