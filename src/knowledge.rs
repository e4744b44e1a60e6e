//! In-memory knowledge base
//!
//! Maps each animal to its class, subclass and characteristics. Built once by
//! the parser and read-only afterwards; sessions only ever borrow it.
//!
//! Animals keep the order in which the fact file first mentioned them. That
//! order is what candidate scoring iterates over, so it decides ties.

use crate::error::{KnowledgeError, Result};
use crate::types::{display_name, Fact, Predicate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Everything known about one animal
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub characteristics: Vec<String>,
}

impl KnowledgeEntry {
    pub fn has_characteristic(&self, characteristic: &str) -> bool {
        self.characteristics.iter().any(|c| c == characteristic)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    order: Vec<String>,
    entries: HashMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a knowledge base from already-parsed facts.
    pub fn from_facts<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = Fact>,
    {
        let mut kb = Self::new();
        for fact in facts {
            kb.apply(fact);
        }
        kb
    }

    /// Fold one fact in. Class and subclass are last-write-wins;
    /// characteristics accumulate without duplicates.
    pub(crate) fn apply(&mut self, fact: Fact) {
        let Fact {
            predicate,
            subject,
            value,
        } = fact;

        if !self.entries.contains_key(&subject) {
            self.order.push(subject.clone());
        }
        let entry = self.entries.entry(subject).or_default();

        match predicate {
            Predicate::Class => entry.class = Some(value),
            Predicate::Subclass => entry.subclass = Some(value),
            Predicate::Characteristic => {
                if !entry.has_characteristic(&value) {
                    entry.characteristics.push(value);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, animal: &str) -> bool {
        self.entries.contains_key(&animal.trim().to_lowercase())
    }

    /// Entries in first-mention order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KnowledgeEntry)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), e)))
    }

    /// Animal names sorted by key, capitalized for display
    pub fn animals_sorted(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.order.iter().collect();
        keys.sort();
        keys.into_iter().map(|k| display_name(k)).collect()
    }

    /// Look up an animal by name, ignoring case.
    pub fn entry_of(&self, animal: &str) -> Result<&KnowledgeEntry> {
        let key = animal.trim().to_lowercase();
        self.entries
            .get(&key)
            .ok_or_else(|| KnowledgeError::UnknownAnimal(animal.trim().to_string()))
    }

    pub fn distinct_classes(&self) -> Vec<String> {
        self.entries
            .values()
            .filter_map(|e| e.class.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn distinct_subclasses(&self, class: &str) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.class.as_deref() == Some(class))
            .filter_map(|e| e.subclass.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Animals with exactly this class and subclass, in first-mention order
    pub fn animals_matching(&self, class: &str, subclass: &str) -> Vec<String> {
        self.iter()
            .filter(|(_, e)| {
                e.class.as_deref() == Some(class) && e.subclass.as_deref() == Some(subclass)
            })
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Info card for an animal chosen in the shell
    pub fn profile(&self, animal: &str) -> Result<AnimalProfile> {
        let entry = self.entry_of(animal)?;
        Ok(AnimalProfile {
            name: display_name(&animal.trim().to_lowercase()),
            class: entry.class.clone(),
            subclass: entry.subclass.clone(),
            characteristics: entry.characteristics.clone(),
        })
    }
}

impl Serialize for KnowledgeBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, entry) in self.iter() {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// Human-readable summary of one animal
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnimalProfile {
    pub name: String,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub characteristics: Vec<String>,
}

impl fmt::Display for AnimalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "About {}:", self.name)?;
        writeln!(f, "  • Class: {}", self.class.as_deref().unwrap_or("unknown"))?;
        writeln!(
            f,
            "  • Subclass: {}",
            self.subclass.as_deref().unwrap_or("unknown")
        )?;
        write!(f, "  • Characteristics: {}", self.characteristics.join(", "))
    }
}
