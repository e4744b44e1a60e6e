//! Fact file parser
//!
//! Reads lines of the form `predicate(subject, value).` and folds them into a
//! [`KnowledgeBase`]. Lines without parentheses are treated as comments.
//!
//! Parsing is lenient: a line that looks like a fact but cannot be read is
//! skipped, logged and recorded in the [`ParseReport`]. Only an unreadable
//! file stops a load.

use crate::error::{KnowledgeError, Result};
use crate::knowledge::KnowledgeBase;
use crate::types::{Fact, Predicate};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A fact line that was skipped during a lenient load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based
    pub line_number: usize,
    pub text: String,
    pub reason: String,
}

/// Result of parsing a whole fact file
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub knowledge: KnowledgeBase,
    pub facts_applied: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Parse one line.
///
/// Returns `Ok(None)` for lines that are not facts: comments, blank lines and
/// facts with a predicate we do not know.
pub fn parse_line(line: &str) -> Result<Option<Fact>> {
    if !(line.contains('(') && line.contains(')')) {
        return Ok(None);
    }

    let statement = line.trim().trim_end_matches('.').trim_end();
    let (head, rest) = statement
        .split_once('(')
        .ok_or_else(|| KnowledgeError::malformed(line, "missing opening parenthesis"))?;

    let Some(predicate) = Predicate::from_name(head) else {
        debug!(predicate = head.trim(), "ignoring unknown predicate");
        return Ok(None);
    };

    let close = rest.rfind(')').ok_or_else(|| {
        KnowledgeError::malformed(line, "closing parenthesis comes before the opening one")
    })?;
    if !rest[close + 1..].trim().is_empty() {
        return Err(KnowledgeError::malformed(
            line,
            "unexpected text after closing parenthesis",
        ));
    }

    let mut fields = rest[..close].split(',').map(str::trim);
    let subject = fields.next().unwrap_or_default();
    if subject.is_empty() {
        return Err(KnowledgeError::malformed(line, "empty subject"));
    }

    let value = fields.next().unwrap_or_default();
    if value.is_empty() {
        return Err(KnowledgeError::malformed(
            line,
            format!("{} fact needs a value", predicate.name()),
        ));
    }

    Ok(Some(Fact {
        predicate,
        subject: subject.to_lowercase(),
        value: value.to_string(),
    }))
}

/// Parse a whole fact file already in memory.
pub fn parse_facts(text: &str) -> ParseReport {
    let mut knowledge = KnowledgeBase::new();
    let mut facts_applied = 0;
    let mut skipped = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(fact)) => {
                debug!(
                    predicate = fact.predicate.name(),
                    subject = %fact.subject,
                    value = %fact.value,
                    "fact"
                );
                knowledge.apply(fact);
                facts_applied += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = idx + 1, "skipping line: {}", e);
                let reason = match e {
                    KnowledgeError::MalformedFact { reason, .. } => reason,
                    other => other.to_string(),
                };
                skipped.push(SkippedLine {
                    line_number: idx + 1,
                    text: line.trim().to_string(),
                    reason,
                });
            }
        }
    }

    ParseReport {
        knowledge,
        facts_applied,
        skipped,
    }
}

/// Load a fact file and keep the details of what was skipped.
pub fn load_report(path: &Path) -> Result<ParseReport> {
    let text = fs::read_to_string(path)
        .map_err(|e| KnowledgeError::from_io(path.to_path_buf(), e))?;
    let report = parse_facts(&text);
    info!(
        path = %path.display(),
        animals = report.knowledge.len(),
        facts = report.facts_applied,
        skipped = report.skipped.len(),
        "knowledge loaded"
    );
    Ok(report)
}

/// Load a fact file into a knowledge base.
pub fn load_knowledge(path: &Path) -> Result<KnowledgeBase> {
    load_report(path).map(|report| report.knowledge)
}
