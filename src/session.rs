use crate::{
    base::board::{FlagOutcome, OpenOutcome},
    config::GlobalConfig,
    difficulty::Difficulty,
    error::Result,
    game::{Game, new_game},
    records::{ScoreRecord, ScoreStore, ScoreTable},
    ui::Presenter,
};
use log::{debug, info, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Open(usize, usize),
    Flag(usize, usize),
    NewGame,
    SetDifficulty(Difficulty),
    ShowRecords,
    ResetRecords,
    Rules,
    About,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the current game and the score table of its difficulty.
pub struct Session {
    config: GlobalConfig,
    game: Game,
    records: ScoreTable,
    store: ScoreStore,
}

impl Session {
    pub fn new(config: GlobalConfig, store: ScoreStore) -> Result<Self> {
        let game = new_game(config.difficulty)?;
        Ok(Self::with_game(config, store, game))
    }

    pub fn with_game(config: GlobalConfig, store: ScoreStore, game: Game) -> Self {
        let records = store.load(config.difficulty);
        Self {
            config,
            game,
            records,
            store,
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn records(&self) -> &ScoreTable {
        &self.records
    }

    pub fn handle(&mut self, command: Command, presenter: &mut dyn Presenter) -> Result<Flow> {
        trace!("Handling command: {:?}", command);
        match command {
            Command::Open(row, column) => match self.game.open(row, column) {
                OpenOutcome::MineTriggered => presenter.game_lost(&self.game),
                OpenOutcome::Opened if self.game.check_win() => self.on_won(presenter),
                OpenOutcome::Rejected(reason) => presenter.notify(&format!("Cannot open: {reason}")),
                OpenOutcome::Opened | OpenOutcome::AlreadyOpen => {},
            },
            Command::Flag(row, column) => match self.game.toggle_flag(row, column) {
                FlagOutcome::Rejected(reason) => presenter.notify(&format!("Cannot flag: {reason}")),
                _ if self.game.check_win() => self.on_won(presenter),
                FlagOutcome::Flagged | FlagOutcome::Unflagged => {},
            },
            Command::NewGame => self.new_game()?,
            Command::SetDifficulty(difficulty) => self.set_difficulty(difficulty)?,
            Command::ShowRecords => presenter.show_records(self.difficulty(), &self.records),
            Command::ResetRecords => {
                self.reset_records(presenter);
                presenter.show_records(self.difficulty(), &self.records);
            },
            Command::Rules => presenter.show_rules(),
            Command::About => presenter.show_about(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn new_game(&mut self) -> Result<()> {
        self.game = new_game(self.difficulty())?;
        Ok(())
    }

    /// Switches difficulty, loading its records and starting a fresh game.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        debug!("Switching difficulty to {difficulty}");
        self.config.difficulty = difficulty;
        self.records = self.store.load(difficulty);
        self.new_game()
    }

    fn reset_records(&mut self, presenter: &mut dyn Presenter) {
        self.records.reset();
        self.persist_records(presenter);
    }

    fn on_won(&mut self, presenter: &mut dyn Presenter) {
        let elapsed = self.game.elapsed_millis();
        info!("Won {} game in {} ms", self.difficulty(), elapsed);

        if self.records.position_for(elapsed).is_none() {
            presenter.game_won(elapsed, None);
            return;
        }
        let Some(name) = presenter.request_player_name(&self.config.player_name) else {
            debug!("Player declined to enter a name, record skipped");
            presenter.game_won(elapsed, None);
            return;
        };

        // a zero time would read back as a free slot
        let record = ScoreRecord::new(&name, elapsed.max(1));
        self.config.player_name = record.name.clone();
        let place = self.records.submit(record);
        self.persist_records(presenter);

        presenter.game_won(elapsed, place);
        presenter.show_records(self.difficulty(), &self.records);
    }

    fn persist_records(&self, presenter: &mut dyn Presenter) {
        if let Err(e) = self.store.save(self.difficulty(), &self.records) {
            presenter.notify(&format!("Could not save records: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{base::board::Board, game::GameState};
    use std::path::Path;

    #[derive(Default)]
    struct Script {
        name: Option<String>,
        asked_for_name: usize,
        won: Vec<(u64, Option<usize>)>,
        lost: usize,
        shown_records: usize,
        notes: Vec<String>,
    }

    impl Presenter for Script {
        fn request_player_name(&mut self, _suggested: &str) -> Option<String> {
            self.asked_for_name += 1;
            self.name.clone()
        }

        fn show_records(&mut self, _difficulty: Difficulty, _table: &ScoreTable) {
            self.shown_records += 1;
        }

        fn show_rules(&mut self) {}

        fn show_about(&mut self) {}

        fn game_won(&mut self, elapsed_millis: u64, place: Option<usize>) {
            self.won.push((elapsed_millis, place));
        }

        fn game_lost(&mut self, _game: &Game) {
            self.lost += 1;
        }

        fn notify(&mut self, message: &str) {
            self.notes.push(message.to_owned());
        }
    }

    fn session(dir: &Path, mines: &[(usize, usize)]) -> Session {
        let config = GlobalConfig {
            difficulty: Difficulty::Beginner,
            ..Default::default()
        };
        let game = Game::with_board(Board::with_mines(2, 2, mines).unwrap());
        Session::with_game(config, ScoreStore::new(dir), game)
    }

    fn win(session: &mut Session, script: &mut Script) {
        for command in [Command::Flag(0, 0), Command::Open(0, 1), Command::Open(1, 0), Command::Open(1, 1)] {
            assert_eq!(session.handle(command, &mut *script).unwrap(), Flow::Continue);
        }
    }

    #[test]
    fn test_win_stores_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &[(0, 0)]);
        let mut script = Script {
            name: Some("Ann".to_owned()),
            ..Default::default()
        };

        win(&mut session, &mut script);

        assert_eq!(session.game().state(), GameState::Won);
        assert_eq!(script.asked_for_name, 1);
        assert_eq!(script.won.len(), 1);
        assert_eq!(script.won[0].1, Some(0));
        assert_eq!(script.shown_records, 1);
        assert_eq!(session.records().records()[0].name, "Ann");
        assert_eq!(session.config().player_name, "Ann");

        let stored = ScoreStore::new(dir.path()).load(Difficulty::Beginner);
        assert_eq!(&stored, session.records());
    }

    #[test]
    fn test_declined_name_skips_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &[(0, 0)]);
        let mut script = Script::default();

        win(&mut session, &mut script);

        assert_eq!(script.asked_for_name, 1);
        assert_eq!(script.won.len(), 1);
        assert_eq!(script.won[0].1, None);
        assert!(session.records().records().iter().all(|r| r.is_sentinel()));
        assert!(!ScoreStore::new(dir.path()).path(Difficulty::Beginner).exists());
    }

    #[test]
    fn test_loss_and_rejections_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &[(0, 0)]);
        let mut script = Script::default();

        session.handle(Command::Open(0, 0), &mut script).unwrap();
        assert_eq!(script.lost, 1);
        assert_eq!(session.game().state(), GameState::Lost);

        session.handle(Command::Open(1, 1), &mut script).unwrap();
        session.handle(Command::Flag(1, 1), &mut script).unwrap();
        assert_eq!(script.notes.len(), 2);
        assert!(script.won.is_empty());
    }

    #[test]
    fn test_new_game_and_difficulty_switch() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &[(0, 0)]);
        let mut script = Script::default();

        session.handle(Command::Open(0, 0), &mut script).unwrap();
        session.handle(Command::NewGame, &mut script).unwrap();
        assert_eq!(session.game().state(), GameState::NotStarted);
        assert_eq!(session.game().board().rows(), 9);

        session
            .handle(Command::SetDifficulty(Difficulty::Advanced), &mut script)
            .unwrap();
        assert_eq!(session.difficulty(), Difficulty::Advanced);
        assert_eq!(session.game().board().columns(), 32);
        assert_eq!(session.handle(Command::Quit, &mut script).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_reset_records_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path());
        let mut table = ScoreTable::default();
        table.submit(ScoreRecord::new("Bob", 999));
        store.save(Difficulty::Beginner, &table).unwrap();

        let mut session = session(dir.path(), &[(0, 0)]);
        assert_eq!(session.records(), &table);

        let mut script = Script::default();
        session.handle(Command::ResetRecords, &mut script).unwrap();
        assert_eq!(session.records(), &ScoreTable::default());
        assert_eq!(store.load(Difficulty::Beginner), ScoreTable::default());
        assert_eq!(script.shown_records, 1);
    }

    #[test]
    fn test_failed_save_keeps_record_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // a plain file where the records directory should be
        let blocker = dir.path().join("records");
        std::fs::write(&blocker, "").unwrap();
        let mut session = session(&blocker, &[(0, 0)]);
        let mut script = Script {
            name: Some("Zoe".to_owned()),
            ..Default::default()
        };

        win(&mut session, &mut script);

        assert_eq!(session.game().state(), GameState::Won);
        assert_eq!(script.notes.len(), 1);
        assert!(script.notes[0].starts_with("Could not save records"));
        assert_eq!(script.won.len(), 1);
        assert_eq!(script.won[0].1, Some(0));
        assert_eq!(session.records().records()[0].name, "Zoe");
        assert!(session.records().records()[0].elapsed_millis >= 1);
    }
}
