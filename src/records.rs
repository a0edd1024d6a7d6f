use crate::{
    difficulty::Difficulty,
    error::{Error, Result},
};
use log::{debug, error, info, warn};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub const TABLE_LEN: usize = 10;
pub const SENTINEL_NAME: &str = "Unknown";

const SEPARATOR: char = ':';
const EXTENSION: &str = "txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRecord {
    pub name: String,
    pub elapsed_millis: u64,
}

impl ScoreRecord {
    /// Builds a record with a name that is safe to store in a score file.
    pub fn new(name: &str, elapsed_millis: u64) -> Self {
        Self {
            name: sanitize_name(name),
            elapsed_millis,
        }
    }

    pub fn sentinel() -> Self {
        Self {
            name: SENTINEL_NAME.to_owned(),
            elapsed_millis: 0,
        }
    }

    /// A zero time marks a free slot.
    pub fn is_sentinel(&self) -> bool {
        self.elapsed_millis == 0
    }
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl std::fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.name, self.elapsed_millis)
    }
}

impl std::str::FromStr for ScoreRecord {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let (name, time) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| Error::InvalidRecord(line.to_owned()))?;
        let elapsed_millis = time
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRecord(line.to_owned()))?;
        Ok(Self {
            name: name.to_owned(),
            elapsed_millis,
        })
    }
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|&c| c != SEPARATOR && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        SENTINEL_NAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// The ten best times for one difficulty, fastest first, free slots at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTable {
    records: [ScoreRecord; TABLE_LEN],
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            records: std::array::from_fn(|_| ScoreRecord::sentinel()),
        }
    }
}

impl ScoreTable {
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Slot a finishing time would take: the first free slot or the first slower record.
    pub fn position_for(&self, elapsed_millis: u64) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.is_sentinel() || elapsed_millis < r.elapsed_millis)
    }

    /// Inserts at `index`, pushing later records down and dropping the last one.
    pub fn insert_at(&mut self, index: usize, record: ScoreRecord) -> bool {
        if index >= TABLE_LEN {
            return false;
        }
        self.records[index..].rotate_right(1);
        self.records[index] = record;
        true
    }

    /// Inserts the record if its time qualifies, returning the slot it took.
    pub fn submit(&mut self, record: ScoreRecord) -> Option<usize> {
        let index = self.position_for(record.elapsed_millis)?;
        self.insert_at(index, record);
        Some(index)
    }

    pub fn reset(&mut self) {
        self.records.fill(ScoreRecord::sentinel());
    }

    /// Parses up to ten `name:time` lines. Slots without a line stay free.
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = Self::default();
        for (slot, line) in table.records.iter_mut().zip(text.lines()) {
            *slot = line.parse()?;
        }
        Ok(table)
    }
}

impl std::fmt::Display for ScoreTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Score files on disk, one per difficulty.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    dir: PathBuf,
}

impl ScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, difficulty: Difficulty) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", difficulty.name()))
    }

    /// Reads the table for `difficulty`, falling back to free slots on any failure.
    pub fn load(&self, difficulty: Difficulty) -> ScoreTable {
        let path = self.path(difficulty);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No records at {}, starting empty", path.to_string_lossy());
                return ScoreTable::default();
            },
            Err(e) => {
                warn!("Failed to read records {}: {}", path.to_string_lossy(), e);
                return ScoreTable::default();
            },
        };
        ScoreTable::parse(&text)
            .inspect(|_| debug!("Loaded {difficulty} records from {}", path.to_string_lossy()))
            .unwrap_or_else(|e| {
                warn!("Failed to parse records {}: {}", path.to_string_lossy(), e);
                ScoreTable::default()
            })
    }

    pub fn save(&self, difficulty: Difficulty, table: &ScoreTable) -> Result<()> {
        let path = self.path(difficulty);
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, table.to_string()))
            .inspect_err(|e| error!("Failed to save records {}: {}", path.to_string_lossy(), e))?;
        debug!("Saved {difficulty} records to {}", path.to_string_lossy());
        Ok(())
    }
}
