use serde::{Deserialize, Serialize};

use crate::dataset::PositionGroup;
use crate::task::{LevelFilter, Mode};

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
pub enum Lang {
    #[default]
    Ko,
    En,
}

impl Lang {
    pub fn toggled(self) -> Self {
        match self {
            Lang::Ko => Lang::En,
            Lang::En => Lang::Ko,
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Lang::Ko => &KO,
            Lang::En => &EN,
        }
    }
}

/// UI copy for one language
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub mode_position: &'static str,
    pub mode_sentence: &'static str,
    pub difficulty: &'static str,
    pub time: &'static str,
    pub wpm: &'static str,
    pub accuracy: &'static str,
    pub best: &'static str,
    pub next: &'static str,
    pub restart: &'static str,
    pub sentence_label: &'static str,
    pub placeholder: &'static str,
    pub complete: &'static str,
    groups: [&'static str; 8],
    levels: [&'static str; 4],
}

static KO: Strings = Strings {
    title: "영어 타자 연습",
    subtitle: "자리익히기 → 문장연습",
    mode_position: "자리익히기",
    mode_sentence: "문장 연습",
    difficulty: "난이도",
    time: "Time",
    wpm: "WPM",
    accuracy: "Accuracy",
    best: "최고 기록",
    next: "다음 과제",
    restart: "처음부터",
    sentence_label: "문장 연습",
    placeholder: "여기에 입력을 시작하세요",
    complete: "완료! Enter 를 누르면 다음 과제",
    groups: [
        "기본자리",
        "왼손 윗자리",
        "왼손 아랫자리",
        "가운데자리",
        "오른손 윗자리",
        "오른손 아랫자리",
        "전체자리",
        "숫자자리",
    ],
    levels: ["전체", "쉬움", "보통", "어려움"],
};

static EN: Strings = Strings {
    title: "Simple English Typing Practice",
    subtitle: "Position → Sentence",
    mode_position: "Position",
    mode_sentence: "Sentences",
    difficulty: "Difficulty",
    time: "Time",
    wpm: "WPM",
    accuracy: "Accuracy",
    best: "Best",
    next: "Next Task",
    restart: "Restart",
    sentence_label: "Sentence Practice",
    placeholder: "Start typing here",
    complete: "Done! Press Enter for the next task",
    groups: [
        "Home row",
        "Left top",
        "Left bottom",
        "Center",
        "Right top",
        "Right bottom",
        "All keys",
        "Numbers",
    ],
    levels: ["All", "Easy", "Medium", "Hard"],
};

impl Strings {
    pub fn group(&self, group: PositionGroup) -> &'static str {
        self.groups[group.index()]
    }

    pub fn level(&self, level: LevelFilter) -> &'static str {
        match level {
            LevelFilter::All => self.levels[0],
            LevelFilter::Easy => self.levels[1],
            LevelFilter::Medium => self.levels[2],
            LevelFilter::Hard => self.levels[3],
        }
    }

    pub fn mode(&self, mode: Mode) -> &'static str {
        match mode {
            Mode::Position => self.mode_position,
            Mode::Sentence => self.mode_sentence,
        }
    }
}
