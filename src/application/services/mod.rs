//! Application services

pub mod game;

pub use game::{GameService, SessionOptions};
