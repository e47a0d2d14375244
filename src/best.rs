use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::task::Mode;

/// Best results for one mode. Each field only ever goes up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    #[serde(default)]
    pub wpm: u32,
    #[serde(default, rename = "acc")]
    pub accuracy: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Local>>,
}

impl BestRecord {
    /// Keep the max of each field independently. Returns true if anything improved.
    pub fn merge(&mut self, wpm: u32, accuracy: u32) -> bool {
        let mut improved = false;
        if wpm > self.wpm {
            self.wpm = wpm;
            improved = true;
        }
        if accuracy > self.accuracy {
            self.accuracy = accuracy;
            improved = true;
        }
        if improved {
            self.updated_at = Some(Local::now());
        }
        improved
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScores {
    #[serde(default)]
    pub position: BestRecord,
    #[serde(default)]
    pub sentence: BestRecord,
}

impl BestScores {
    pub fn get(&self, mode: Mode) -> BestRecord {
        match mode {
            Mode::Position => self.position,
            Mode::Sentence => self.sentence,
        }
    }

    pub fn get_mut(&mut self, mode: Mode) -> &mut BestRecord {
        match mode {
            Mode::Position => &mut self.position,
            Mode::Sentence => &mut self.sentence,
        }
    }
}

pub trait BestScoreStore: Send {
    fn load(&self) -> BestScores;
    fn save(&self, scores: &BestScores) -> io::Result<()>;

    /// Fold a finished task into the stored record for `mode`
    fn record(&self, mode: Mode, wpm: u32, accuracy: u32) -> BestRecord {
        let mut scores = self.load();
        let improved = scores.get_mut(mode).merge(wpm, accuracy);
        if improved {
            if let Err(err) = self.save(&scores) {
                warn!(error = %err, "could not persist best scores");
            }
        }
        scores.get(mode)
    }
}

/// Best scores kept as one JSON document on disk
#[derive(Debug, Clone)]
pub struct FileBestScoreStore {
    path: PathBuf,
}

impl FileBestScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::best_scores_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileBestScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BestScoreStore for FileBestScoreStore {
    fn load(&self) -> BestScores {
        let Ok(bytes) = fs::read(&self.path) else {
            return BestScores::default();
        };
        match serde_json::from_slice::<BestScores>(&bytes) {
            Ok(scores) => scores,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "ignoring malformed best scores");
                BestScores::default()
            }
        }
    }

    fn save(&self, scores: &BestScores) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(scores).map_err(io::Error::other)?;
        fs::write(&self.path, data)
    }
}

/// In-process store; nothing touches disk
#[derive(Debug, Default)]
pub struct MemoryBestScoreStore {
    scores: Mutex<BestScores>,
}

impl MemoryBestScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryBestScoreStore {
    fn load(&self) -> BestScores {
        self.scores
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn save(&self, scores: &BestScores) -> io::Result<()> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|_| io::Error::other("best score store poisoned"))?;
        *guard = scores.clone();
        Ok(())
    }
}
