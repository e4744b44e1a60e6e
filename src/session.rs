//! Per-game state
//!
//! A [`Session`] records where one elimination run stands: which phase it is
//! in, what has been confirmed, and how far through each question list it has
//! got. The engine owns all transitions; the shell only reads a session.

use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Why a game ended without a correct guess
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Every class was rejected, or the confirmed class has no subclasses
    ClassUndetermined,
    /// Every subclass of the confirmed class was rejected
    SubclassUndetermined,
    /// The confirmed class and subclass match no animal
    NoSubclassMatch,
    NoCandidates,
    WrongGuess,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::ClassUndetermined => "Could not determine the class.",
            FailureReason::SubclassUndetermined => "Could not determine the subclass.",
            FailureReason::NoSubclassMatch => "No animals match that subclass.",
            FailureReason::NoCandidates => "Could not make a guess.",
            FailureReason::WrongGuess => "Did not guess correctly.",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Outcome {
    Success { animal: String },
    Failure { reason: FailureReason },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Success { animal } => format!("Got it! You were thinking of {}.", animal),
            Outcome::Failure { reason } => reason.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingClass,
    AwaitingSubclass,
    AwaitingCharacteristic,
    AwaitingGuessConfirmation,
    Finished(Outcome),
}

/// A pre-sorted (or pre-shuffled) question list and how far we are through it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    items: Vec<String>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(items: Vec<String>) -> Self {
        Self { items, pos: 0 }
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.items.get(self.pos).map(String::as_str)
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.items.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.items.len()
    }

    pub(crate) fn items(&self) -> &[String] {
        &self.items
    }
}

/// One elimination run. Create a new one for every game.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) phase: Phase,
    pub(crate) subject: Option<String>,
    pub(crate) classes: Cursor,
    pub(crate) subclasses: Cursor,
    pub(crate) characteristics: Cursor,
    pub(crate) confirmed_class: Option<String>,
    pub(crate) confirmed_subclass: Option<String>,
    pub(crate) candidates: Vec<String>,
    pub(crate) answered: HashMap<String, bool>,
    pub(crate) best_guess: Option<String>,
    pub(crate) questions_asked: usize,
    pub(crate) rng: StdRng,
}

impl Session {
    pub(crate) fn new(subject: Option<String>, classes: Vec<String>, rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            phase: Phase::AwaitingClass,
            subject,
            classes: Cursor::new(classes),
            subclasses: Cursor::default(),
            characteristics: Cursor::default(),
            confirmed_class: None,
            confirmed_subclass: None,
            candidates: Vec::new(),
            answered: HashMap::new(),
            best_guess: None,
            questions_asked: 0,
            rng,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The animal picked in the shell for the info display, if any
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn confirmed_class(&self) -> Option<&str> {
        self.confirmed_class.as_deref()
    }

    pub fn confirmed_subclass(&self) -> Option<&str> {
        self.confirmed_subclass.as_deref()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The characteristics this session will ask about, in asking order
    pub fn pending_characteristics(&self) -> &[String] {
        self.characteristics.items()
    }

    pub fn answered(&self) -> &HashMap<String, bool> {
        &self.answered
    }

    pub fn best_guess(&self) -> Option<&str> {
        self.best_guess.as_deref()
    }

    pub fn questions_asked(&self) -> usize {
        self.questions_asked
    }
}
