use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Difficulty, PositionGroup};

/// Target length of a generated position drill, before trimming
pub const SEQUENCE_LEN: usize = 34;
/// Chance that a drilled key is followed by a space
pub const SPACE_PROBABILITY: f64 = 0.18;

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
pub enum Mode {
    #[default]
    Position,
    Sentence,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Position => Mode::Sentence,
            Mode::Sentence => Mode::Position,
        }
    }
}

/// Difficulty selector for sentence mode
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LevelFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl LevelFilter {
    const ORDER: [LevelFilter; 4] = [
        LevelFilter::All,
        LevelFilter::Easy,
        LevelFilter::Medium,
        LevelFilter::Hard,
    ];

    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            LevelFilter::All => None,
            LevelFilter::Easy => Some(Difficulty::Easy),
            LevelFilter::Medium => Some(Difficulty::Medium),
            LevelFilter::Hard => Some(Difficulty::Hard),
        }
    }

    fn index(self) -> usize {
        Self::ORDER.iter().position(|l| *l == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// What the user is asked to type. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeTask {
    pub text: String,
    pub mode: Mode,
    pub group: Option<PositionGroup>,
    pub difficulty: Option<Difficulty>,
}

impl PracticeTask {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Free-form practice text, judged like a sentence
    pub fn custom(text: String) -> Self {
        Self {
            text,
            mode: Mode::Sentence,
            group: None,
            difficulty: None,
        }
    }
}

/// Random drill over `keys`: keys sampled uniformly, each followed by a space
/// with probability [`SPACE_PROBABILITY`], until at least `len` chars.
pub fn generate_sequence<R: Rng>(keys: &[char], len: usize, rng: &mut R) -> String {
    if keys.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let mut count = 0;
    while count < len {
        let Some(&key) = keys.choose(rng) else {
            break;
        };
        out.push(key);
        count += 1;
        if rng.gen_bool(SPACE_PROBABILITY) {
            out.push(' ');
            count += 1;
        }
    }

    out.trim().to_string()
}

pub fn position_task<R: Rng>(
    dataset: &Dataset,
    group: PositionGroup,
    rng: &mut R,
) -> PracticeTask {
    let keys = dataset.keys_for(group);
    PracticeTask {
        text: generate_sequence(&keys, SEQUENCE_LEN, rng),
        mode: Mode::Position,
        group: Some(group),
        difficulty: None,
    }
}

/// One sentence from the filtered pool; an empty level falls back to the whole pool
pub fn sentence_task<R: Rng>(
    dataset: &Dataset,
    level: LevelFilter,
    rng: &mut R,
) -> PracticeTask {
    let mut pool = dataset.sentences_for(level.difficulty());
    if pool.is_empty() {
        pool = dataset.sentences_for(None);
    }

    let (text, difficulty) = pool
        .choose(rng)
        .map(|s| (s.text.clone(), Some(s.level)))
        .unwrap_or_default();

    PracticeTask {
        text,
        mode: Mode::Sentence,
        group: None,
        difficulty,
    }
}
