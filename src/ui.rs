pub mod console;

use crate::{difficulty::Difficulty, game::Game, records::ScoreTable};

/// What the session needs from whoever draws the game and talks to the player.
pub trait Presenter {
    /// Asks for the name to store with a new record. `None` skips the record.
    fn request_player_name(&mut self, suggested: &str) -> Option<String>;

    fn show_records(&mut self, difficulty: Difficulty, table: &ScoreTable);

    fn show_rules(&mut self);

    fn show_about(&mut self);

    /// `place` is the table slot the time went into, if it was recorded.
    fn game_won(&mut self, elapsed_millis: u64, place: Option<usize>);

    fn game_lost(&mut self, game: &Game);

    fn notify(&mut self, message: &str);
}
