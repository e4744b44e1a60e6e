//! Elimination Engine
//!
//! Drives a [`Session`] through the narrowing phases:
//!
//! ```text
//! class -> subclass -> characteristics -> guess -> finished
//! ```
//!
//! Classes and subclasses are asked in sorted order until one is confirmed.
//! Characteristics are drawn from the union over the remaining candidates,
//! shuffled once per session and capped. When they run out, every candidate
//! is scored by the number of its characteristics answered "yes" and the
//! first one to reach the top score is offered as the guess.
//!
//! The engine holds no game state of its own. It never fails during play:
//! dead ends become [`Phase::Finished`] with a [`FailureReason`].

use crate::config::EngineConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::session::{Cursor, FailureReason, Outcome, Phase, Session};
use crate::types::{Prompt, PromptKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub struct Engine<'a> {
    kb: &'a KnowledgeBase,
    config: EngineConfig,
}

impl<'a> Engine<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self::with_config(kb, EngineConfig::default())
    }

    pub fn with_config(kb: &'a KnowledgeBase, config: EngineConfig) -> Self {
        Self { kb, config }
    }

    pub fn knowledge(&self) -> &'a KnowledgeBase {
        self.kb
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a new game. `chosen` is the animal picked for the info display;
    /// it must exist but does not influence the questions.
    pub fn start_session(&self, chosen: Option<&str>) -> Result<Session> {
        let subject = match chosen {
            Some(animal) => {
                self.kb.entry_of(animal)?;
                Some(animal.trim().to_lowercase())
            }
            None => None,
        };

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Session::new(subject, self.kb.distinct_classes(), rng);
        info!(
            session = %session.id,
            classes = session.classes.items().len(),
            "session started"
        );

        if session.classes.is_exhausted() {
            self.finish(&mut session, Outcome::Failure {
                reason: FailureReason::ClassUndetermined,
            });
        }
        Ok(session)
    }

    /// The question to show for the session's current phase, or the final
    /// message once it has finished.
    pub fn current_prompt(&self, session: &Session) -> Prompt {
        let question = match &session.phase {
            Phase::AwaitingClass => session.classes.current().map(|class| {
                (PromptKind::Class, format!("Is it a {}?", class), class)
            }),
            Phase::AwaitingSubclass => session.subclasses.current().map(|subclass| {
                (
                    PromptKind::Subclass,
                    format!("Does it belong to the {} subclass?", subclass),
                    subclass,
                )
            }),
            Phase::AwaitingCharacteristic => session.characteristics.current().map(|c| {
                (
                    PromptKind::Characteristic,
                    format!("Does it have the characteristic {}?", c),
                    c,
                )
            }),
            Phase::AwaitingGuessConfirmation => session.best_guess.as_deref().map(|animal| {
                (
                    PromptKind::GuessConfirmation,
                    format!("Is it {}?", animal),
                    animal,
                )
            }),
            Phase::Finished(outcome) => {
                let payload = match outcome {
                    Outcome::Success { animal } => Some(animal.clone()),
                    Outcome::Failure { .. } => None,
                };
                return Prompt {
                    kind: PromptKind::Terminal,
                    text: outcome.message(),
                    payload,
                };
            }
        };

        match question {
            Some((kind, text, payload)) => Prompt {
                kind,
                text,
                payload: Some(payload.to_string()),
            },
            // Transitions settle eagerly, so an awaiting phase always has a
            // current item. Report a dead end rather than panic.
            None => Prompt {
                kind: PromptKind::Terminal,
                text: stalled_reason(&session.phase).message().to_string(),
                payload: None,
            },
        }
    }

    /// Feed the answer to the current question and advance the session.
    /// Answers given to a finished session are ignored.
    pub fn answer(&self, mut session: Session, yes: bool) -> Session {
        if session.is_finished() {
            debug!(session = %session.id, "answer ignored, session finished");
            return session;
        }
        session.questions_asked += 1;

        match session.phase {
            Phase::AwaitingClass => self.answer_class(&mut session, yes),
            Phase::AwaitingSubclass => self.answer_subclass(&mut session, yes),
            Phase::AwaitingCharacteristic => self.answer_characteristic(&mut session, yes),
            Phase::AwaitingGuessConfirmation => self.answer_guess(&mut session, yes),
            Phase::Finished(_) => {}
        }
        session
    }

    /// Score of every candidate, in candidate order
    pub fn score_candidates(&self, session: &Session) -> Vec<(String, usize)> {
        session
            .candidates
            .iter()
            .map(|animal| {
                let score = self
                    .kb
                    .entry_of(animal)
                    .map(|entry| {
                        entry
                            .characteristics
                            .iter()
                            .filter(|c| session.answered.get(*c).copied().unwrap_or(false))
                            .count()
                    })
                    .unwrap_or(0);
                (animal.clone(), score)
            })
            .collect()
    }

    fn answer_class(&self, session: &mut Session, yes: bool) {
        let Some(class) = session.classes.current().map(str::to_string) else {
            return self.fail(session, FailureReason::ClassUndetermined);
        };
        debug!(session = %session.id, class = %class, yes, "class answer");

        if yes {
            let subclasses = self.kb.distinct_subclasses(&class);
            session.confirmed_class = Some(class);
            session.subclasses = Cursor::new(subclasses);
            if session.subclasses.is_exhausted() {
                return self.fail(session, FailureReason::ClassUndetermined);
            }
            session.phase = Phase::AwaitingSubclass;
        } else {
            session.classes.advance();
            if session.classes.is_exhausted() {
                self.fail(session, FailureReason::ClassUndetermined);
            }
        }
    }

    fn answer_subclass(&self, session: &mut Session, yes: bool) {
        let Some(subclass) = session.subclasses.current().map(str::to_string) else {
            return self.fail(session, FailureReason::SubclassUndetermined);
        };
        debug!(session = %session.id, subclass = %subclass, yes, "subclass answer");

        if !yes {
            session.subclasses.advance();
            if session.subclasses.is_exhausted() {
                self.fail(session, FailureReason::SubclassUndetermined);
            }
            return;
        }

        let class = session.confirmed_class.clone().unwrap_or_default();
        session.candidates = self.kb.animals_matching(&class, &subclass);
        session.confirmed_subclass = Some(subclass);
        if session.candidates.is_empty() {
            return self.fail(session, FailureReason::NoSubclassMatch);
        }

        // Sorted before shuffling so a seeded session is reproducible
        let mut pending: Vec<String> = session
            .candidates
            .iter()
            .filter_map(|animal| self.kb.entry_of(animal).ok())
            .flat_map(|entry| entry.characteristics.iter())
            .filter(|c| !session.answered.contains_key(*c))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        pending.shuffle(&mut session.rng);
        pending.truncate(self.config.max_characteristic_questions);

        debug!(
            session = %session.id,
            candidates = session.candidates.len(),
            questions = pending.len(),
            "entering characteristics phase"
        );
        session.characteristics = Cursor::new(pending);
        session.phase = Phase::AwaitingCharacteristic;
        self.settle_characteristics(session);
    }

    fn answer_characteristic(&self, session: &mut Session, yes: bool) {
        if let Some(characteristic) = session.characteristics.current().map(str::to_string) {
            debug!(session = %session.id, characteristic = %characteristic, yes, "characteristic answer");
            session.answered.insert(characteristic, yes);
            session.characteristics.advance();
        }
        self.settle_characteristics(session);
    }

    fn answer_guess(&self, session: &mut Session, yes: bool) {
        match (yes, session.best_guess.clone()) {
            (true, Some(animal)) => self.finish(session, Outcome::Success { animal }),
            _ => self.fail(session, FailureReason::WrongGuess),
        }
    }

    /// Skip characteristics that already have an answer; evaluate once the
    /// list runs out.
    fn settle_characteristics(&self, session: &mut Session) {
        while let Some(c) = session.characteristics.current() {
            if !session.answered.contains_key(c) {
                return;
            }
            session.characteristics.advance();
        }
        self.evaluate(session);
    }

    fn evaluate(&self, session: &mut Session) {
        let scores = self.score_candidates(session);
        debug!(session = %session.id, ?scores, "evaluating candidates");

        match pick_best(scores.iter().map(|(name, score)| (name.as_str(), *score))) {
            Some((animal, _)) => {
                session.best_guess = Some(animal.to_string());
                session.phase = Phase::AwaitingGuessConfirmation;
            }
            None => self.fail(session, FailureReason::NoCandidates),
        }
    }

    fn fail(&self, session: &mut Session, reason: FailureReason) {
        self.finish(session, Outcome::Failure { reason });
    }

    fn finish(&self, session: &mut Session, outcome: Outcome) {
        info!(
            session = %session.id,
            questions = session.questions_asked,
            outcome = %outcome.message(),
            "session finished"
        );
        session.phase = Phase::Finished(outcome);
    }
}

/// Highest score wins. On a tie the earlier candidate is kept: a later one
/// only replaces the running best with a strictly greater score.
pub fn pick_best<'s, I>(scored: I) -> Option<(&'s str, usize)>
where
    I: IntoIterator<Item = (&'s str, usize)>,
{
    let mut best: Option<(&'s str, usize)> = None;
    for (name, score) in scored {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }
    best
}

fn stalled_reason(phase: &Phase) -> FailureReason {
    match phase {
        Phase::AwaitingClass => FailureReason::ClassUndetermined,
        Phase::AwaitingSubclass => FailureReason::SubclassUndetermined,
        _ => FailureReason::NoCandidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnowledgeError;
    use crate::parser::parse_facts;

    const DOG_AND_CAT: &str = "\
class(dog, mammal).
subclass(dog, domestic).
caracteristica(dog, barks).
caracteristica(dog, loyal).
class(cat, mammal).
subclass(cat, domestic).
caracteristica(cat, meows).
caracteristica(cat, loyal).
";

    const ZOO: &str = "\
class(eagle, bird).
subclass(eagle, raptor).
caracteristica(eagle, flies).
caracteristica(eagle, hooked_beak).
class(owl, bird).
subclass(owl, raptor).
caracteristica(owl, flies).
caracteristica(owl, nocturnal).
class(dog, mammal).
subclass(dog, domestic).
caracteristica(dog, barks).
class(wolf, mammal).
subclass(wolf, wild).
caracteristica(wolf, howls).
caracteristica(wolf, pack).
class(shark, fish).
subclass(shark, cartilaginous).
caracteristica(shark, fins).
";

    fn kb(text: &str) -> KnowledgeBase {
        parse_facts(text).knowledge
    }

    fn seeded(kb: &KnowledgeBase) -> Engine<'_> {
        Engine::with_config(
            kb,
            EngineConfig {
                seed: Some(7),
                ..Default::default()
            },
        )
    }

    /// Answer every characteristic question from the animal's real traits.
    fn answer_as(engine: &Engine, mut session: Session, animal: &str) -> Session {
        let entry = engine.knowledge().entry_of(animal).unwrap().clone();
        while session.phase == Phase::AwaitingCharacteristic {
            let prompt = engine.current_prompt(&session);
            let trait_name = prompt.payload.unwrap();
            session = engine.answer(session, entry.has_characteristic(&trait_name));
        }
        session
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    #[test]
    fn test_pick_best_first_to_reach_max_wins() {
        let best = pick_best(vec![("a", 2), ("b", 3), ("c", 3)]);
        assert_eq!(best, Some(("b", 3)));
    }

    #[test]
    fn test_pick_best_all_zero_keeps_first() {
        assert_eq!(pick_best(vec![("x", 0), ("y", 0)]), Some(("x", 0)));
    }

    #[test]
    fn test_pick_best_empty() {
        assert_eq!(pick_best(Vec::<(&str, usize)>::new()), None);
    }

    // =========================================================================
    // Session start
    // =========================================================================

    #[test]
    fn test_start_session_first_prompt_is_first_class() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();

        let prompt = engine.current_prompt(&session);
        assert_eq!(prompt.kind, PromptKind::Class);
        assert_eq!(prompt.payload.as_deref(), Some("bird"));
        assert_eq!(prompt.text, "Is it a bird?");
    }

    #[test]
    fn test_start_session_with_chosen_animal() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let session = engine.start_session(Some("Wolf")).unwrap();
        assert_eq!(session.subject(), Some("wolf"));
    }

    #[test]
    fn test_start_session_unknown_animal() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let err = engine.start_session(Some("unicorn")).unwrap_err();
        assert!(matches!(err, KnowledgeError::UnknownAnimal(_)));
    }

    #[test]
    fn test_start_session_without_classes_finishes() {
        let kb = kb("caracteristica(ghost, spooky).\n");
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::ClassUndetermined
            })
        );
        assert_eq!(engine.current_prompt(&session).kind, PromptKind::Terminal);
    }

    // =========================================================================
    // Class and subclass phases
    // =========================================================================

    #[test]
    fn test_rejecting_every_class_fails() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let mut session = engine.start_session(None).unwrap();
        for _ in 0..3 {
            session = engine.answer(session, false);
        }
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::ClassUndetermined
            })
        );
        assert_eq!(
            engine.current_prompt(&session).text,
            "Could not determine the class."
        );
    }

    #[test]
    fn test_class_order_is_sorted() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let mut session = engine.start_session(None).unwrap();
        let mut asked = Vec::new();
        while !session.is_finished() {
            asked.push(engine.current_prompt(&session).payload.unwrap());
            session = engine.answer(session, false);
        }
        assert_eq!(asked, vec!["bird", "fish", "mammal"]);
    }

    #[test]
    fn test_confirming_class_moves_to_subclasses() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, false); // bird
        let session = engine.answer(session, false); // fish
        let session = engine.answer(session, true); // mammal

        assert_eq!(session.phase(), &Phase::AwaitingSubclass);
        assert_eq!(session.confirmed_class(), Some("mammal"));
        let prompt = engine.current_prompt(&session);
        assert_eq!(prompt.kind, PromptKind::Subclass);
        assert_eq!(prompt.payload.as_deref(), Some("domestic"));
    }

    #[test]
    fn test_rejecting_every_subclass_fails() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, true); // bird
        let session = engine.answer(session, false); // raptor
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::SubclassUndetermined
            })
        );
    }

    #[test]
    fn test_class_without_subclasses_fails() {
        let kb = kb("class(slug, mollusc).\ncaracteristica(slug, slimy).\n");
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, true);
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::ClassUndetermined
            })
        );
    }

    #[test]
    fn test_empty_candidates_skip_characteristics() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let mut session = engine.start_session(None).unwrap();
        session.subclasses = Cursor::new(vec!["imaginary".to_string()]);
        session.confirmed_class = Some("bird".to_string());
        session.phase = Phase::AwaitingSubclass;

        let session = engine.answer(session, true);
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::NoSubclassMatch
            })
        );
        assert!(session.answered().is_empty());
        assert!(session.pending_characteristics().is_empty());
    }

    // =========================================================================
    // Characteristics and guess
    // =========================================================================

    #[test]
    fn test_dog_and_cat_end_to_end() {
        let kb = kb(DOG_AND_CAT);
        let engine = Engine::new(&kb);
        let session = engine.start_session(Some("dog")).unwrap();

        let session = engine.answer(session, true); // mammal
        let session = engine.answer(session, true); // domestic
        assert_eq!(session.phase(), &Phase::AwaitingCharacteristic);
        assert_eq!(session.candidates(), &["dog".to_string(), "cat".to_string()]);

        let mut asked = session.pending_characteristics().to_vec();
        asked.sort();
        assert_eq!(asked, vec!["barks", "loyal", "meows"]);

        let session = answer_as(&engine, session, "dog");
        assert_eq!(session.answered().get("barks"), Some(&true));
        assert_eq!(session.answered().get("meows"), Some(&false));
        assert_eq!(session.answered().get("loyal"), Some(&true));
        assert_eq!(
            engine.score_candidates(&session),
            vec![("dog".to_string(), 2), ("cat".to_string(), 1)]
        );

        let prompt = engine.current_prompt(&session);
        assert_eq!(prompt.kind, PromptKind::GuessConfirmation);
        assert_eq!(prompt.text, "Is it dog?");
        assert_eq!(session.best_guess(), Some("dog"));

        let session = engine.answer(session, true);
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Success {
                animal: "dog".to_string()
            })
        );
        let terminal = engine.current_prompt(&session);
        assert_eq!(terminal.kind, PromptKind::Terminal);
        assert_eq!(terminal.payload.as_deref(), Some("dog"));
    }

    #[test]
    fn test_rejected_guess_fails() {
        let kb = kb(DOG_AND_CAT);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, true);
        let session = engine.answer(session, true);
        let session = answer_as(&engine, session, "cat");
        assert_eq!(session.best_guess(), Some("cat"));

        let session = engine.answer(session, false);
        assert_eq!(
            session.outcome(),
            Some(&Outcome::Failure {
                reason: FailureReason::WrongGuess
            })
        );
    }

    #[test]
    fn test_no_characteristics_guesses_first_candidate() {
        let text = "\
class(ant, insect).
subclass(ant, social).
class(bee, insect).
subclass(bee, social).
";
        let kb = kb(text);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, true);
        let session = engine.answer(session, true);

        assert_eq!(session.phase(), &Phase::AwaitingGuessConfirmation);
        assert_eq!(session.best_guess(), Some("ant"));
        assert_eq!(
            engine.score_candidates(&session),
            vec![("ant".to_string(), 0), ("bee".to_string(), 0)]
        );
    }

    #[test]
    fn test_characteristic_questions_are_capped() {
        let mut text = String::from("class(blob, thing).\nsubclass(blob, odd).\n");
        for i in 0..40 {
            text.push_str(&format!("caracteristica(blob, trait{}).\n", i));
        }
        let kb = kb(&text);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, true);
        let session = engine.answer(session, true);

        assert_eq!(session.pending_characteristics().len(), 15);
        let session = answer_as(&engine, session, "blob");
        assert_eq!(session.answered().len(), 15);
        assert_eq!(session.best_guess(), Some("blob"));
    }

    #[test]
    fn test_seeded_sessions_share_question_order() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let order = || {
            let session = engine.start_session(None).unwrap();
            let session = engine.answer(session, true);
            let session = engine.answer(session, true);
            session.pending_characteristics().to_vec()
        };
        assert_eq!(order(), order());
    }

    #[test]
    fn test_finished_session_ignores_answers() {
        let kb = kb(DOG_AND_CAT);
        let engine = seeded(&kb);
        let session = engine.start_session(None).unwrap();
        let session = engine.answer(session, false);
        assert!(session.is_finished());
        let asked = session.questions_asked();

        let session = engine.answer(session, true);
        assert_eq!(session.questions_asked(), asked);
        assert!(!session.outcome().unwrap().is_success());
    }

    #[test]
    fn test_every_answer_pattern_terminates_within_bound() {
        let kb = kb(ZOO);
        let engine = seeded(&kb);
        let classes = kb.distinct_classes().len();
        let cap = engine.config().max_characteristic_questions;

        for pattern in 0u32..64 {
            let mut session = engine.start_session(None).unwrap();
            let mut step = 0;
            while !session.is_finished() {
                let yes = (pattern >> (step % 6)) & 1 == 1;
                session = engine.answer(session, yes);
                step += 1;
                assert!(step <= 100, "pattern {pattern} did not terminate");
            }
            let subclasses = session
                .confirmed_class()
                .map(|c| kb.distinct_subclasses(c).len())
                .unwrap_or(0);
            assert!(session.questions_asked() <= classes + subclasses + cap + 1);
        }
    }
}
