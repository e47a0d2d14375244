use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::best::{BestRecord, BestScoreStore};
use crate::dataset::{Dataset, PositionGroup};
use crate::judge::{judge, InputState, Rejection, Transition};
use crate::keyboard;
use crate::metrics;
use crate::task::{self, LevelFilter, Mode, PracticeTask};
use crate::typing_policy::{classify_key, KeyAction};

/// Scores of a finished task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub elapsed: Duration,
    /// stored best for the mode after this result was folded in
    pub best: BestRecord,
}

/// One practice widget: current task, what has been typed, and where results go.
pub struct PracticeSession {
    dataset: Dataset,
    task: PracticeTask,
    input: InputState,
    mode: Mode,
    group: PositionGroup,
    level: LevelFilter,
    custom: Option<String>,
    rng: StdRng,
    best_store: Box<dyn BestScoreStore>,
    last_result: Option<TaskResult>,
}

impl std::fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticeSession")
            .field("task", &self.task)
            .field("input", &self.input)
            .field("mode", &self.mode)
            .field("group", &self.group)
            .field("level", &self.level)
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}

impl PracticeSession {
    /// Starts on the home row drill, like a fresh page load
    pub fn new(dataset: Dataset, best_store: Box<dyn BestScoreStore>) -> Self {
        Self::with_rng(dataset, best_store, StdRng::from_entropy())
    }

    pub fn with_rng(dataset: Dataset, best_store: Box<dyn BestScoreStore>, rng: StdRng) -> Self {
        let mut session = Self {
            dataset,
            task: PracticeTask::custom(String::new()),
            input: InputState::default(),
            mode: Mode::Position,
            group: PositionGroup::Home,
            level: LevelFilter::All,
            custom: None,
            rng,
            best_store,
            last_result: None,
        };
        session.load_position(PositionGroup::Home);
        session
    }

    pub fn task(&self) -> &PracticeTask {
        &self.task
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Selected mode. A custom prompt does not change it.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn group(&self) -> PositionGroup {
        self.group
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }

    pub fn last_result(&self) -> Option<TaskResult> {
        self.last_result
    }

    pub fn is_complete(&self) -> bool {
        self.input.is_complete()
    }

    pub fn elapsed(&self) -> Duration {
        self.input.elapsed
    }

    pub fn wpm(&self) -> u32 {
        metrics::wpm(self.input.correct, self.input.elapsed)
    }

    pub fn accuracy(&self) -> u32 {
        metrics::accuracy(self.input.correct, self.input.wrong)
    }

    /// Stored best for the current mode, read fresh from the store
    pub fn best(&self) -> BestRecord {
        self.best_store.load().get(self.mode())
    }

    /// Next char the user is expected to type
    pub fn expected_char(&self) -> Option<char> {
        self.task.text.chars().nth(self.input.typed_len())
    }

    /// Keys to highlight on the keyboard: the drilled group, lowercased
    pub fn active_keys(&self) -> Vec<char> {
        match self.mode() {
            Mode::Position if !self.is_custom() => self
                .dataset
                .keys_for(self.group)
                .into_iter()
                .map(keyboard::normalize)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn install(&mut self, task: PracticeTask) {
        info!(
            mode = %task.mode,
            group = ?task.group,
            difficulty = ?task.difficulty,
            len = task.len(),
            "loaded task"
        );
        self.input = InputState::new(&task.text);
        self.task = task;
        self.last_result = None;
    }

    pub fn load_position(&mut self, group: PositionGroup) {
        self.custom = None;
        self.mode = Mode::Position;
        self.group = group;
        let task = task::position_task(&self.dataset, group, &mut self.rng);
        self.install(task);
    }

    pub fn load_sentence(&mut self) {
        self.custom = None;
        self.mode = Mode::Sentence;
        let task = task::sentence_task(&self.dataset, self.level, &mut self.rng);
        self.install(task);
    }

    /// Practice a fixed text; "next task" repeats it
    pub fn load_custom(&mut self, text: String) {
        self.custom = Some(text.clone());
        self.install(PracticeTask::custom(text));
    }

    /// Change the difficulty filter without loading a sentence
    pub fn select_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    pub fn set_level(&mut self, level: LevelFilter) {
        self.level = level;
        self.load_sentence();
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Position => self.load_position(self.group),
            Mode::Sentence => self.load_sentence(),
        }
    }

    /// New task of the same kind
    pub fn next_task(&mut self) {
        if let Some(text) = self.custom.clone() {
            self.load_custom(text);
            return;
        }
        self.switch_mode(self.mode());
    }

    /// Back to the first drill
    pub fn restart(&mut self) {
        self.load_position(PositionGroup::Home);
    }

    /// Swap the practice material. The task on screen is left alone.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }

    pub fn tick(&mut self, now: Instant) {
        self.input.tick(now);
    }

    /// Feed the whole proposed input line through the judge
    pub fn apply_input(&mut self, proposed: &str, now: Instant) -> Result<(), Rejection> {
        match judge(&self.input, &self.task.text, proposed, now) {
            Transition::Accepted(next) => {
                self.input = next;
                if self.input.is_complete() {
                    self.finish();
                }
                Ok(())
            }
            Transition::Rejected(why) => {
                debug!(?why, "input rejected");
                Err(why)
            }
        }
    }

    pub fn type_char(&mut self, c: char, now: Instant) -> Result<(), Rejection> {
        let mut proposed = self.input.typed.clone();
        proposed.push(c);
        self.apply_input(&proposed, now)
    }

    /// Route a key press through the typing policy
    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> KeyAction {
        let action = classify_key(key, self.is_complete());
        match action {
            KeyAction::Append(c) => {
                // rejections are logged in apply_input
                self.type_char(c, now).ok();
            }
            KeyAction::NextTask => self.next_task(),
            KeyAction::Blocked | KeyAction::Ignored => {}
        }
        action
    }

    fn finish(&mut self) {
        let wpm = self.wpm();
        let accuracy = self.accuracy();
        let best = if self.is_custom() {
            self.best()
        } else {
            self.best_store.record(self.mode(), wpm, accuracy)
        };

        info!(
            mode = %self.mode(),
            wpm,
            accuracy,
            elapsed_ms = self.input.elapsed.as_millis() as u64,
            "task complete"
        );

        self.last_result = Some(TaskResult {
            wpm,
            accuracy,
            elapsed: self.input.elapsed,
            best,
        });
    }
}
