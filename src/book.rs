use crate::error::{DrillError, Result};
use crate::record::StatRecord;
use std::collections::HashMap;

/// Every tracked character and its counters.
///
/// Lookups go by character; iteration follows insertion order so a saved file
/// keeps its row order across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBook {
    order: Vec<String>,
    records: HashMap<String, StatRecord>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a character at the end. Fails if the character is already tracked.
    pub fn insert(&mut self, character: impl Into<String>, record: StatRecord) -> Result<()> {
        let character = character.into();
        if self.records.contains_key(&character) {
            return Err(DrillError::DuplicateCharacter(character));
        }
        self.order.push(character.clone());
        self.records.insert(character, record);
        Ok(())
    }

    pub fn get(&self, character: &str) -> Option<&StatRecord> {
        self.records.get(character)
    }

    pub fn get_mut(&mut self, character: &str) -> Option<&mut StatRecord> {
        self.records.get_mut(character)
    }

    pub fn contains(&self, character: &str) -> bool {
        self.records.contains_key(character)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatRecord)> + '_ {
        self.order
            .iter()
            .filter_map(|c| self.records.get(c).map(|r| (c.as_str(), r)))
    }

    /// Pairs every character accepted by `eligible` with the weight `weigh`
    /// assigns it, in book order.
    pub fn weighted<E, W>(&self, eligible: E, weigh: W) -> Vec<(String, u64)>
    where
        E: Fn(&StatRecord) -> bool,
        W: Fn(&StatRecord) -> u64,
    {
        self.iter()
            .filter(|(_, record)| eligible(record))
            .map(|(character, record)| (character.to_string(), weigh(record)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut book = ProgressBook::new();
        book.insert("音", StatRecord::new("jam1")).unwrap();
        book.insert("字", StatRecord::new("zi6")).unwrap();
        book.insert("一", StatRecord::new("jat1")).unwrap();

        let order: Vec<&str> = book.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ["音", "字", "一"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut book = ProgressBook::new();
        book.insert("字", StatRecord::new("zi6")).unwrap();
        assert_matches!(
            book.insert("字", StatRecord::new("zi6")),
            Err(DrillError::DuplicateCharacter(c)) if c == "字"
        );
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut book = ProgressBook::new();
        book.insert("字", StatRecord::new("zi6")).unwrap();
        book.get_mut("字").unwrap().record_learn();
        assert_eq!(book.get("字").unwrap().learned(), 1);
        assert!(book.get("音").is_none());
    }

    #[test]
    fn weighted_filters_and_weighs() {
        let mut book = ProgressBook::new();
        book.insert("字", StatRecord::new("zi6")).unwrap();
        book.insert("音", StatRecord::new("jam1")).unwrap();
        book.get_mut("音").unwrap().record_learn();

        let population = book.weighted(StatRecord::has_learned, StatRecord::weight_for_learn);
        assert_eq!(population, vec![("音".to_string(), 500_000)]);
    }
}
