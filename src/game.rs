use crate::{
    base::board::{Board, FlagOutcome, OpenOutcome, RejectReason},
    difficulty::Difficulty,
    error::Result,
    stopwatch::Stopwatch,
};
use log::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    /// Fresh board, the clock starts with the first move.
    #[default]
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GameState {
    pub fn is_end(&self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

/// One round of play on a single board.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    state: GameState,
    stopwatch: Stopwatch,
    triggered: Option<(usize, usize)>,
}

/// Starts a round on a fresh random board sized for `difficulty`.
pub fn new_game(difficulty: Difficulty) -> Result<Game> {
    debug!("New {difficulty} game");
    let board = Board::new(difficulty.rows(), difficulty.columns(), difficulty.mines())?;
    Ok(Game::with_board(board))
}

impl Game {
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            state: GameState::NotStarted,
            stopwatch: Stopwatch::new(),
            triggered: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered(&self) -> Option<(usize, usize)> {
        self.triggered
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.stopwatch.elapsed_millis()
    }

    pub fn check_win(&self) -> bool {
        self.board.check_win()
    }

    pub fn open(&mut self, row: usize, column: usize) -> OpenOutcome {
        if self.state.is_end() {
            return OpenOutcome::Rejected(RejectReason::GameOver);
        }
        let outcome = self.board.open(row, column);
        match outcome {
            OpenOutcome::MineTriggered => {
                self.mark_started();
                self.triggered = Some((row, column));
                self.finish(GameState::Lost);
            },
            OpenOutcome::Opened => {
                self.mark_started();
                self.evaluate_win();
            },
            OpenOutcome::AlreadyOpen | OpenOutcome::Rejected(_) => {},
        }
        outcome
    }

    pub fn toggle_flag(&mut self, row: usize, column: usize) -> FlagOutcome {
        if self.state.is_end() {
            return FlagOutcome::Rejected(RejectReason::GameOver);
        }
        let outcome = self.board.toggle_flag(row, column);
        if outcome.has_update() {
            self.mark_started();
            self.evaluate_win();
        }
        outcome
    }

    fn mark_started(&mut self) {
        if self.state == GameState::NotStarted {
            self.state = GameState::Running;
            self.stopwatch.start();
        }
    }

    fn evaluate_win(&mut self) {
        if self.board.check_win() {
            self.finish(GameState::Won);
        }
    }

    fn finish(&mut self, state: GameState) {
        self.stopwatch.stop();
        self.state = state;
        debug!("Game ended: {:?} after {} ms", state, self.stopwatch.elapsed_millis());
    }
}
