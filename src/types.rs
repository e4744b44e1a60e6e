//! Core types shared by the parser, the engine and the shell.

use serde::{Deserialize, Serialize};

/// The kinds of fact the knowledge base understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    Class,
    Subclass,
    Characteristic,
}

impl Predicate {
    /// Recognise a predicate name. Spanish spellings are accepted because
    /// existing fact files use them.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "class" | "clase" => Some(Predicate::Class),
            "subclass" | "subclase" => Some(Predicate::Subclass),
            "characteristic" | "caracteristica" | "característica" => {
                Some(Predicate::Characteristic)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Class => "class",
            Predicate::Subclass => "subclass",
            Predicate::Characteristic => "characteristic",
        }
    }
}

/// One `predicate(subject, value)` statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fact {
    pub predicate: Predicate,
    /// Animal name, lowercased
    pub subject: String,
    pub value: String,
}

/// What the engine is currently asking about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Class,
    Subclass,
    Characteristic,
    GuessConfirmation,
    /// The game is over; `text` carries the result message
    Terminal,
}

/// A question (or final message) for the presentation shell to render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
    /// The class, subclass, characteristic or animal the question is about
    pub payload: Option<String>,
}

impl Prompt {
    pub fn expects_answer(&self) -> bool {
        self.kind != PromptKind::Terminal
    }
}

/// Capitalize an animal key for display ("dog" -> "Dog").
pub fn display_name(animal: &str) -> String {
    let mut chars = animal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
