use chrono::Utc;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::keyboard;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

const DEFAULT_DATA_FILE: &str = "default.json";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DataError {
    #[error("refusing to fetch `{0}`: only http(s) urls are supported")]
    Unsupported(String),
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed data document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("data document has an empty `{0}` list")]
    Empty(&'static str),
}

/// Named key groups drilled in position mode, in display order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PositionGroup {
    Home,
    LeftTop,
    LeftBottom,
    Center,
    RightTop,
    RightBottom,
    All,
    Number,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 8] = [
        PositionGroup::Home,
        PositionGroup::LeftTop,
        PositionGroup::LeftBottom,
        PositionGroup::Center,
        PositionGroup::RightTop,
        PositionGroup::RightBottom,
        PositionGroup::All,
        PositionGroup::Number,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|g| *g == self).unwrap_or(0)
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSentence")]
pub struct Sentence {
    pub text: String,
    pub level: Difficulty,
}

// Sentence lists in the wild are either bare strings or `{text, level}`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSentence {
    Plain(String),
    Full {
        text: String,
        #[serde(default)]
        level: Option<Difficulty>,
    },
}

impl From<RawSentence> for Sentence {
    fn from(raw: RawSentence) -> Self {
        match raw {
            RawSentence::Plain(text) => Sentence {
                text,
                level: Difficulty::default(),
            },
            RawSentence::Full { text, level } => Sentence {
                text,
                level: level.unwrap_or_default(),
            },
        }
    }
}

/// Practice material: key groups for position drills plus the sentence pool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dataset {
    pub positions: BTreeMap<String, Vec<char>>,
    pub sentences: Vec<Sentence>,
}

impl Dataset {
    /// The dataset compiled into the binary
    pub fn builtin() -> Self {
        builtin_ref().clone()
    }

    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        if dataset.sentences.is_empty() {
            return Err(DataError::Empty("sentences"));
        }
        Ok(dataset)
    }

    /// Keys drilled for `group`. The "all" group is the whole keyboard, and a
    /// group the active document lacks falls back to the built-in keys.
    pub fn keys_for(&self, group: PositionGroup) -> Vec<char> {
        if group == PositionGroup::All {
            return keyboard::all_keys();
        }

        let key = group.to_string();
        match self.positions.get(&key) {
            Some(keys) if !keys.is_empty() => keys.clone(),
            _ => builtin_ref()
                .positions
                .get(&key)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Sentences of the given level, or the whole pool for `None`
    pub fn sentences_for(&self, level: Option<Difficulty>) -> Vec<&Sentence> {
        self.sentences
            .iter()
            .filter(|s| level.map_or(true, |l| s.level == l))
            .collect()
    }
}

fn builtin_ref() -> &'static Dataset {
    static BUILTIN: OnceLock<Dataset> = OnceLock::new();
    BUILTIN.get_or_init(|| {
        let file = DATA_DIR
            .get_file(DEFAULT_DATA_FILE)
            .expect("Built-in data file not found");

        let raw = file
            .contents_utf8()
            .expect("Unable to interpret built-in data as a string");

        Dataset::from_json(raw).expect("Unable to deserialize built-in data")
    })
}

pub fn is_fetchable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn cache_busted(url: &str, stamp: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}_={stamp}")
}

/// Fetch an override document once. No retries.
pub fn fetch_override(url: &str) -> Result<Dataset, DataError> {
    if !is_fetchable(url) {
        return Err(DataError::Unsupported(url.to_string()));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let target = cache_busted(url, Utc::now().timestamp_millis());
    debug!(url = %target, "fetching data document");

    let response = client
        .get(&target)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()?;

    if !response.status().is_success() {
        return Err(DataError::Status(response.status().as_u16()));
    }

    let body = response.text()?;
    Dataset::from_json(&body)
}

/// Fetch on a background thread and hand a valid document to `deliver`.
/// Failures only leave a trace in the log; the built-in data stays active.
pub fn spawn_fetch<F>(url: String, deliver: F) -> thread::JoinHandle<()>
where
    F: FnOnce(Dataset) + Send + 'static,
{
    thread::spawn(move || match fetch_override(&url) {
        Ok(dataset) => {
            info!(
                url = %url,
                groups = dataset.positions.len(),
                sentences = dataset.sentences.len(),
                "loaded override data"
            );
            deliver(dataset);
        }
        Err(err) => warn!(url = %url, error = %err, "keeping built-in data"),
    })
}
