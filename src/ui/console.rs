use std::io::{BufRead, Write};

use log::{error, trace};

use crate::{
    base::board::CellState,
    difficulty::Difficulty,
    error::Result,
    game::{Game, GameState},
    records::ScoreTable,
    session::{Command, Flow, Session},
    stopwatch::{format_clock, format_record_time},
    ui::Presenter,
};

const RULES: &str = "\
How to play
 * Uncover every square that does not hide a mine and flag every mine.
 * `o ROW COL` uncovers a square. Uncovering a mine loses the game.
 * A number tells how many mines touch that square (1-8). A blank square has
   none, and its neighbours are uncovered for you.
 * `f ROW COL` plants or removes a flag. The mine counter shows how many
   flags are left to place.
 * `n` new game, `d beginner|intermediate|advanced` change difficulty,
   `r` records, `reset` clear records, `h` this help, `about`, `q` quit.";

const ABOUT: &str = concat!("classicsweeper ", env!("CARGO_PKG_VERSION"), ", a classic Minesweeper for the terminal.");

/// Line-based front end reading commands from `input` and drawing to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn run(&mut self, session: &mut Session) -> Result<()> {
        writeln!(self.output, "Type `h` for help.")?;
        loop {
            write!(self.output, "{}", render_status(session))?;
            write!(self.output, "{}", render_board(session.game()))?;
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                trace!("Input closed");
                return Ok(());
            };
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(self.output, "{message}")?;
                    continue;
                },
            };
            if session.handle(command, &mut *self)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            error!("Failed to write to console: {e}");
        }
    }
}

impl<R: BufRead, W: Write> Presenter for Console<R, W> {
    fn request_player_name(&mut self, suggested: &str) -> Option<String> {
        if suggested.is_empty() {
            self.say("New record! Enter your name:");
        } else {
            self.say(&format!("New record! Enter your name [{suggested}]:"));
        }
        let line = self
            .read_line()
            .inspect_err(|e| error!("Failed to read player name: {e}"))
            .ok()??;
        let name = match line.trim() {
            "" => suggested,
            name => name,
        };
        Some(name.to_owned())
    }

    fn show_records(&mut self, difficulty: Difficulty, table: &ScoreTable) {
        self.say(&render_records(difficulty, table));
    }

    fn show_rules(&mut self) {
        self.say(RULES);
    }

    fn show_about(&mut self) {
        self.say(ABOUT);
    }

    fn game_won(&mut self, elapsed_millis: u64, place: Option<usize>) {
        let time = format_record_time(elapsed_millis);
        match place {
            Some(place) => self.say(&format!("You won in {time}, place {} in the records!", place + 1)),
            None => self.say(&format!("Congratulations, you won in {time}!")),
        }
    }

    fn game_lost(&mut self, game: &Game) {
        match game.triggered() {
            Some((row, column)) => self.say(&format!("Game over! You hit the mine at {} {}.", row + 1, column + 1)),
            None => self.say("Game over! You hit a mine."),
        }
    }

    fn notify(&mut self, message: &str) {
        self.say(message);
    }
}

/// Parses one input line. Rows and columns are typed 1-based.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "o" | "open" => {
            let (row, column) = parse_position(&args)?;
            Command::Open(row, column)
        },
        "f" | "flag" => {
            let (row, column) = parse_position(&args)?;
            Command::Flag(row, column)
        },
        "n" | "new" => Command::NewGame,
        "d" | "difficulty" => {
            let name = args.first().ok_or("usage: d beginner|intermediate|advanced")?;
            Command::SetDifficulty(name.parse()?)
        },
        "r" | "records" => Command::ShowRecords,
        "reset" => Command::ResetRecords,
        "h" | "help" | "rules" => Command::Rules,
        "about" => Command::About,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`, type `h` for help")),
    };
    Ok(Some(command))
}

fn parse_position(args: &[&str]) -> std::result::Result<(usize, usize), String> {
    let [row, column] = args else {
        return Err("expected ROW COL".to_owned());
    };
    let parse = |s: &str| match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("`{s}` is not a row or column number")),
    };
    Ok((parse(*row)?, parse(*column)?))
}

/// One line with the board size, flags left, the clock and the best recorded time.
pub fn render_status(session: &Session) -> String {
    let game = session.game();
    let board = game.board();
    let best = match session.records().records().first() {
        Some(record) if !record.is_sentinel() => format_record_time(record.elapsed_millis),
        _ => "-".to_owned(),
    };
    let state = match game.state() {
        GameState::NotStarted => "ready",
        GameState::Running => "playing",
        GameState::Won => "won",
        GameState::Lost => "lost",
    };
    format!(
        "{} {}x{}  mines: {}/{}  time: {}  best: {}  [{}]\n",
        session.difficulty(),
        board.rows(),
        board.columns(),
        board.flags_remaining(),
        board.mines(),
        format_clock(game.stopwatch().elapsed()),
        best,
        state
    )
}

/// Draws the board with 1-based labels. A lost game also shows the mines.
pub fn render_board(game: &Game) -> String {
    let board = game.board();
    let lost = game.state() == GameState::Lost;
    let mut out = String::from("   ");
    for column in 1..=board.columns() {
        out.push_str(&format!("{column:>3}"));
    }
    out.push('\n');

    for ((row, column), cell) in board.cells().indexed_iter() {
        if column == 0 {
            out.push_str(&format!("{:>3}", row + 1));
        }
        let glyph = match cell.state {
            CellState::Opened if cell.has_mine => 'X',
            CellState::Opened if cell.neighbor_count == 0 => ' ',
            CellState::Opened => char::from(b'0' + cell.neighbor_count),
            CellState::Flagged if lost && !cell.has_mine => 'x',
            CellState::Flagged => 'F',
            CellState::Covered if lost && cell.has_mine => '*',
            CellState::Covered => '.',
        };
        out.push_str(&format!("{glyph:>3}"));
        if column + 1 == board.columns() {
            out.push('\n');
        }
    }
    out
}

pub fn render_records(difficulty: Difficulty, table: &ScoreTable) -> String {
    let mut out = format!("{difficulty} records\n");
    for (place, record) in table.records().iter().enumerate() {
        if record.is_sentinel() {
            out.push_str(&format!("{:>2}. -\n", place + 1));
        } else {
            out.push_str(&format!(
                "{:>2}. {:<20} {}\n",
                place + 1,
                record.name,
                format_record_time(record.elapsed_millis)
            ));
        }
    }
    out
}
