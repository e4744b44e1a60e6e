//! animal-guess - twenty questions over a fact file
//!
//! Loads facts of the form `class(dog, mammal).` into an immutable knowledge
//! base and plays an elimination game against it: confirm a class, then a
//! subclass, then ask about characteristics and guess the best-scoring
//! animal.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use animal_guess::{load_knowledge, Engine};
//!
//! let kb = load_knowledge(Path::new("animals.pl"))?;
//! let engine = Engine::new(&kb);
//!
//! let mut session = engine.start_session(None)?;
//! while !session.is_finished() {
//!     let prompt = engine.current_prompt(&session);
//!     let yes = ask_user(&prompt.text);
//!     session = engine.answer(session, yes);
//! }
//! println!("{}", engine.current_prompt(&session).text);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   facts   ┌────────────────┐
//! │ parser       │ ────────▶ │ KnowledgeBase  │  (read-only)
//! └──────────────┘           └───────┬────────┘
//!                                    │ &borrow
//!                            ┌───────▼────────┐
//!   shell ── answer(bool) ─▶ │ Engine         │ ─▶ Prompt
//!                            └───────┬────────┘
//!                                    │ owns nothing; moves
//!                            ┌───────▼────────┐
//!                            │ Session        │  (one per game)
//!                            └────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod images;
pub mod knowledge;
pub mod parser;
pub mod session;
pub mod types;

// Core types
pub use engine::{pick_best, Engine};
pub use error::KnowledgeError;
pub use knowledge::{AnimalProfile, KnowledgeBase, KnowledgeEntry};
pub use session::{FailureReason, Outcome, Phase, Session};
pub use types::*;

// Loading
pub use parser::{load_knowledge, load_report, parse_facts, parse_line, ParseReport, SkippedLine};

// Configuration and display collaborators
pub use config::{EngineConfig, ShellConfig};
pub use images::{DirectoryImageResolver, ImageResolver};
