#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    MissingDirectory(String),
    TomlSerialize(toml::ser::Error),
    TomlDeserialize(toml::de::Error),
    InvalidBoard { rows: usize, columns: usize, mines: usize },
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IO(value)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(value: toml::ser::Error) -> Self {
        Error::TomlSerialize(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::TomlDeserialize(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(e) => write!(f, "IO error: {e}"),
            Self::MissingDirectory(dir) => write!(f, "missing directory: {dir}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialization error: {e}"),
            Self::TomlDeserialize(e) => write!(f, "TOML deserialization error: {e}"),
            Self::InvalidBoard { rows, columns, mines } => {
                write!(f, "invalid board: {rows}x{columns} with {mines} mines")
            },
            Self::InvalidRecord(line) => write!(f, "invalid record line: {line:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(e) => Some(e),
            Self::MissingDirectory(_) => None,
            Self::TomlSerialize(e) => Some(e),
            Self::TomlDeserialize(e) => Some(e),
            Self::InvalidBoard { .. } => None,
            Self::InvalidRecord(_) => None,
        }
    }
}
