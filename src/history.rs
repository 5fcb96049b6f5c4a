use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use derive_more::{Display, Error};
use directories::ProjectDirs;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::board::Board;
use crate::game::{GameSummary, Outcome};
use crate::rules::Variant;

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY: &[u8] = b"klondike_history_key_do_not_cheat";
const HMAC_SIZE: usize = 32;

/// One finished (or abandoned) game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub variant: Variant,
    /// Shuffle seed, when the game was reproducible.
    pub seed: Option<u64>,
    pub piles: usize,
    pub draw: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub outcome: Outcome,
    pub score: u32,
    pub moves: u32,
    pub final_board: Option<Board>,
}

impl GameRecord {
    pub fn new(
        variant: Variant,
        seed: Option<u64>,
        piles: usize,
        draw: usize,
        start_time: i64,
        end_time: i64,
        summary: GameSummary,
    ) -> Self {
        Self {
            variant,
            seed,
            piles,
            draw,
            start_time,
            end_time,
            outcome: summary.outcome,
            score: summary.score,
            moves: summary.moves,
            final_board: None,
        }
    }
}

/// Totals across every recorded game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub played: usize,
    pub won: usize,
    pub best_score: u32,
}

#[derive(Debug, Display, Error)]
pub enum HistoryError {
    #[display("history I/O failed: {source}")]
    Io { source: io::Error },
    #[display("history encoding failed: {source}")]
    Encode { source: bincode::Error },
    #[display("no data directory available")]
    NoDataDir,
    #[display("invalid signing key")]
    Key,
}

impl From<io::Error> for HistoryError {
    fn from(source: io::Error) -> Self {
        HistoryError::Io { source }
    }
}

impl From<bincode::Error> for HistoryError {
    fn from(source: bincode::Error) -> Self {
        HistoryError::Encode { source }
    }
}

/// The entire game history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub records: Vec<GameRecord>,
}

impl History {
    /// Load the history from the default location. A missing, corrupted, or
    /// tampered file yields an empty history.
    pub fn load() -> Self {
        match Self::file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load the history from `path`; see [`History::load`].
    pub fn load_from(path: &Path) -> Self {
        let data = match File::open(path).and_then(|mut f| {
            let mut data = Vec::new();
            f.read_to_end(&mut data)?;
            Ok(data)
        }) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No readable history");
                return Self::default();
            }
        };

        if data.len() < HMAC_SIZE {
            warn!(path = %path.display(), "History file too short; starting fresh");
            return Self::default();
        }

        let (payload, signature) = data.split_at(data.len() - HMAC_SIZE);
        let verified = sign(payload).is_ok_and(|mac| mac.verify_slice(signature).is_ok());
        if !verified {
            warn!(path = %path.display(), "History signature mismatch; starting fresh");
            return Self::default();
        }

        match bincode::deserialize(payload) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "History file unreadable; starting fresh");
                Self::default()
            }
        }
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), HistoryError> {
        let path = Self::file_path().ok_or(HistoryError::NoDataDir)?;
        self.save_to(&path)
    }

    /// Save to `path` atomically: write a signed temp file, then rename.
    pub fn save_to(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut data = bincode::serialize(self)?;
        let signature = sign(&data)?.finalize().into_bytes();
        data.extend_from_slice(&signature);

        let temp_path = path.with_extension("tmp");
        let written = File::create(&temp_path).and_then(|mut f| {
            f.write_all(&data)?;
            f.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        fs::rename(&temp_path, path)?;
        debug!(path = %path.display(), records = self.records.len(), "History saved");
        Ok(())
    }

    pub fn push(&mut self, record: GameRecord) {
        self.records.push(record);
    }

    pub fn summary(&self) -> Summary {
        Summary {
            played: self.records.len(),
            won: self
                .records
                .iter()
                .filter(|r| r.outcome == Outcome::Won)
                .count(),
            best_score: self.records.iter().map(|r| r.score).max().unwrap_or(0),
        }
    }

    /// Path to the save file (`history.dat`).
    pub fn file_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "klondike-rs", "klondike-rs")?;
        Some(proj_dirs.data_dir().join("history.dat"))
    }
}

fn sign(payload: &[u8]) -> Result<HmacSha256, HistoryError> {
    let mut mac = HmacSha256::new_from_slice(SECRET_KEY).map_err(|_| HistoryError::Key)?;
    mac.update(payload);
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("klondike-rs-test-{}-{name}", std::process::id()))
            .join("history.dat")
    }

    fn record(outcome: Outcome, score: u32) -> GameRecord {
        GameRecord::new(
            Variant::LimitedDraw { redraws: 1 },
            Some(9),
            7,
            3,
            1_700_000_000,
            1_700_000_300,
            GameSummary {
                outcome,
                score,
                moves: 12,
            },
        )
    }

    #[test]
    fn save_then_load_restores_records() {
        let path = temp_path("roundtrip");
        let mut history = History::default();
        history.push(record(Outcome::Lost, 7));
        history.push(record(Outcome::Won, 52));

        history.save_to(&path).unwrap();
        assert_eq!(History::load_from(&path), history);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn tampered_file_loads_empty() {
        let path = temp_path("tampered");
        let mut history = History::default();
        history.push(record(Outcome::Won, 52));
        history.save_to(&path).unwrap();

        let mut data = fs::read(&path).unwrap();
        data[0] ^= 0xff;
        fs::write(&path, data).unwrap();

        assert!(History::load_from(&path).records.is_empty());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_or_short_file_loads_empty() {
        let path = temp_path("short");
        assert!(History::load_from(&path).records.is_empty());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"tiny").unwrap();
        assert!(History::load_from(&path).records.is_empty());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn summary_counts_wins_and_best_score() {
        let mut history = History::default();
        assert_eq!(history.summary(), Summary::default());

        history.push(record(Outcome::Quit, 3));
        history.push(record(Outcome::Won, 52));
        history.push(record(Outcome::Lost, 20));
        assert_eq!(
            history.summary(),
            Summary {
                played: 3,
                won: 1,
                best_score: 52
            }
        );
    }
}
