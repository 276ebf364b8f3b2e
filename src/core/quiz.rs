//! Quiz gate: question pool, per-question countdown, and lock cadence.
//!
//! The gate does not decide what a verdict means for the run; it reports
//! `Correct`/`Incorrect` (or a timeout) and the session drives the phase
//! transition.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::rng::SimpleRng;
use crate::types::{QUESTION_TIME_LIMIT_MS, QUIZ_GAP_MAX, QUIZ_GAP_MIN};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// 0-based index into `options`.
    pub correct_index: usize,
}

/// The external question source: an ordered, read-only pool supplied
/// wholesale at startup.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already-validated questions (mainly for tests).
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    /// Parse and validate a JSON array of questions. A malformed or empty
    /// pool is a fatal precondition: the run must not start.
    pub fn from_json(json: &str) -> Result<Self> {
        let questions: Vec<Question> =
            serde_json::from_str(json).context("failed to parse question pool")?;
        validate(&questions)?;
        Ok(Self { questions })
    }

    /// The question pool shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("../../assets/questions.json"))
            .context("built-in question pool is invalid")
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

fn validate(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        bail!("question pool is empty");
    }
    for (i, q) in questions.iter().enumerate() {
        if q.options.len() != OPTION_COUNT {
            bail!(
                "question {} has {} options, expected {}",
                i,
                q.options.len(),
                OPTION_COUNT
            );
        }
        if q.correct_index >= OPTION_COUNT {
            bail!(
                "question {} has correct index {} out of range",
                i,
                q.correct_index
            );
        }
    }
    Ok(())
}

/// Outcome of evaluating an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy)]
struct ActiveQuestion {
    index: usize,
    elapsed_ms: u32,
}

/// Holds the pool, the open question with its countdown, and the lock
/// cadence counter.
#[derive(Debug, Clone)]
pub struct QuizGate {
    bank: QuestionBank,
    rng: SimpleRng,
    locks_since_quiz: u32,
    threshold: u32,
    active: Option<ActiveQuestion>,
}

impl QuizGate {
    pub fn new(bank: QuestionBank, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let threshold = draw_threshold(&mut rng);
        Self {
            bank,
            rng,
            locks_since_quiz: 0,
            threshold,
            active: None,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Locks accumulated toward the next gate.
    pub fn locks_since_quiz(&self) -> u32 {
        self.locks_since_quiz
    }

    /// The currently drawn cadence threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record one piece lock. Returns true when the counter reaches the
    /// threshold, which also resets the counter and redraws a fresh
    /// threshold for the next cycle.
    pub fn note_lock(&mut self) -> bool {
        self.locks_since_quiz += 1;
        if self.locks_since_quiz >= self.threshold {
            self.locks_since_quiz = 0;
            self.threshold = draw_threshold(&mut self.rng);
            return true;
        }
        false
    }

    /// Draw a question uniformly at random (with replacement — repeats
    /// are allowed) and start its countdown.
    pub fn open(&mut self) -> &Question {
        let index = self.rng.next_range(self.bank.len() as u32) as usize;
        self.active = Some(ActiveQuestion {
            index,
            elapsed_ms: 0,
        });
        &self.bank.questions[index]
    }

    /// The open question, if a quiz is in progress.
    pub fn question(&self) -> Option<&Question> {
        self.active.and_then(|a| self.bank.get(a.index))
    }

    /// Advance the countdown. Returns true exactly when the question has
    /// just expired (auto-submits as incorrect with a timeout message).
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.elapsed_ms >= QUESTION_TIME_LIMIT_MS {
            return false;
        }
        active.elapsed_ms = active.elapsed_ms.saturating_add(elapsed_ms);
        active.elapsed_ms >= QUESTION_TIME_LIMIT_MS
    }

    /// Remaining time as a fraction of the limit, continuously decreasing
    /// for smooth progress-bar animation. 0.0 when no question is open.
    pub fn time_fraction(&self) -> f32 {
        match self.active {
            Some(a) => {
                let remaining = QUESTION_TIME_LIMIT_MS.saturating_sub(a.elapsed_ms);
                remaining as f32 / QUESTION_TIME_LIMIT_MS as f32
            }
            None => 0.0,
        }
    }

    /// Compare the selected option against the open question's answer and
    /// close the question. With no question open, returns `Incorrect`
    /// (the session gates this on phase, so that path is unreachable
    /// in normal play).
    pub fn evaluate(&mut self, selected: usize) -> Verdict {
        let Some(active) = self.active.take() else {
            return Verdict::Incorrect;
        };
        let correct = self
            .bank
            .get(active.index)
            .map(|q| q.correct_index == selected)
            .unwrap_or(false);
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    /// Discard the open question and its countdown (phase teardown).
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Fresh run: counter back to zero, new threshold, no open question.
    pub fn reset(&mut self) {
        self.locks_since_quiz = 0;
        self.threshold = draw_threshold(&mut self.rng);
        self.active = None;
    }
}

/// Uniform draw in `[QUIZ_GAP_MIN, QUIZ_GAP_MAX]`.
fn draw_threshold(rng: &mut SimpleRng) -> u32 {
    QUIZ_GAP_MIN + rng.next_range(QUIZ_GAP_MAX - QUIZ_GAP_MIN + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn tiny_bank() -> QuestionBank {
        QuestionBank::new(vec![
            Question {
                prompt: "First?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 0,
            },
            Question {
                prompt: "Second?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 3,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_bank_rejects_empty_pool() {
        assert!(QuestionBank::new(vec![]).is_err());
        assert!(QuestionBank::from_json("[]").is_err());
    }

    #[test]
    fn test_bank_rejects_bad_option_count() {
        let json = r#"[{"prompt":"p","options":["a","b"],"correctIndex":0}]"#;
        assert!(QuestionBank::from_json(json).is_err());
    }

    #[test]
    fn test_bank_rejects_out_of_range_answer() {
        let json = r#"[{"prompt":"p","options":["a","b","c","d"],"correctIndex":4}]"#;
        assert!(QuestionBank::from_json(json).is_err());
    }

    #[test]
    fn test_bank_parses_camel_case_records() {
        let json = r#"[{"prompt":"p","options":["a","b","c","d"],"correctIndex":2}]"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).unwrap().correct_index, 2);
    }

    #[test]
    fn test_builtin_pool_is_valid() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(!bank.is_empty());
    }

    #[test]
    fn test_cadence_threshold_always_in_bounds() {
        let mut gate = QuizGate::new(tiny_bank(), 7);
        for _ in 0..200 {
            assert!((QUIZ_GAP_MIN..=QUIZ_GAP_MAX).contains(&gate.threshold()));
            // Exhaust a full cycle.
            while !gate.note_lock() {}
        }
    }

    #[test]
    fn test_gate_fires_at_threshold_and_resets() {
        let mut gate = QuizGate::new(tiny_bank(), 7);
        let threshold = gate.threshold();

        for i in 1..threshold {
            assert!(!gate.note_lock(), "fired early at lock {}", i);
        }
        assert!(gate.note_lock());
        assert_eq!(gate.locks_since_quiz(), 0);
    }

    #[test]
    fn test_evaluate_by_index_equality() {
        let mut gate = QuizGate::new(tiny_bank(), 7);
        let correct = gate.open().correct_index;
        assert_eq!(gate.evaluate(correct), Verdict::Correct);
        assert!(gate.question().is_none(), "evaluation closes the question");

        let correct = gate.open().correct_index;
        let wrong = (correct + 1) % OPTION_COUNT;
        assert_eq!(gate.evaluate(wrong), Verdict::Incorrect);
    }

    #[test]
    fn test_countdown_fraction_decreases_and_expires() {
        let mut gate = QuizGate::new(tiny_bank(), 7);
        gate.open();
        assert_eq!(gate.time_fraction(), 1.0);

        assert!(!gate.tick(QUESTION_TIME_LIMIT_MS / 2));
        let halfway = gate.time_fraction();
        assert!(halfway > 0.4 && halfway < 0.6);

        assert!(gate.tick(QUESTION_TIME_LIMIT_MS / 2));
        assert_eq!(gate.time_fraction(), 0.0);

        // Expiry fires once, not every tick.
        assert!(!gate.tick(16));
    }

    #[test]
    fn test_tick_without_open_question_is_inert() {
        let mut gate = QuizGate::new(tiny_bank(), 7);
        assert!(!gate.tick(1_000_000));
        assert_eq!(gate.time_fraction(), 0.0);
    }

    #[test]
    fn test_draws_are_uniform_with_replacement() {
        let mut gate = QuizGate::new(tiny_bank(), 99);
        let mut seen = [false; 2];
        for _ in 0..50 {
            let prompt = gate.open().prompt.clone();
            seen[if prompt == "First?" { 0 } else { 1 }] = true;
            gate.close();
        }
        assert!(seen[0] && seen[1]);
    }
}
