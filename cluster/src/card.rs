use std::collections::HashMap;
use std::sync::RwLock;

use lexigraph_vecstore::Cluster;
use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

/// Spaced-repetition state of a card, as reported by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningState {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

/// A live flashcard record. Mutable outside this crate; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub learning_state: LearningState,
    #[serde(default)]
    pub is_familiar: bool,
}

impl Card {
    pub fn new(id: &str, word: &str) -> Self {
        Self {
            id: id.to_string(),
            word: word.to_string(),
            learning_state: LearningState::New,
            is_familiar: false,
        }
    }

    /// True once the learner has touched the card.
    pub fn has_progress(&self) -> bool {
        self.learning_state != LearningState::New || self.is_familiar
    }

    /// Normalized word key of this card.
    pub fn key(&self) -> String {
        self.word.trim().to_lowercase()
    }
}

/// Source of live cards for a deck.
#[async_trait::async_trait]
pub trait CardProvider: Send + Sync {
    async fn list_cards(&self, deck_id: &str) -> Result<Vec<Card>, ClusterError>;
}

/// In-memory [`CardProvider`]. Unknown decks list as empty.
#[derive(Default)]
pub struct MemoryCards {
    decks: RwLock<HashMap<String, Vec<Card>>>,
}

impl MemoryCards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cards of `deck_id`.
    pub fn set_deck(&self, deck_id: &str, cards: Vec<Card>) -> Result<(), ClusterError> {
        let mut decks = self
            .decks
            .write()
            .map_err(|e| ClusterError::Cards(e.to_string()))?;
        decks.insert(deck_id.to_string(), cards);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CardProvider for MemoryCards {
    async fn list_cards(&self, deck_id: &str) -> Result<Vec<Card>, ClusterError> {
        let decks = self
            .decks
            .read()
            .map_err(|e| ClusterError::Cards(e.to_string()))?;
        Ok(decks.get(deck_id).cloned().unwrap_or_default())
    }
}

/// A cluster joined against live cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydratedCluster {
    pub label: String,
    pub cards: Vec<Card>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unembedded: bool,
}

/// Join word-key clusters against `cards`.
///
/// When several cards share a word, a card with progress wins over a fresh
/// one; otherwise the first listed wins. Words with no live card are
/// skipped, and clusters left with no cards are dropped.
pub fn rehydrate(clusters: &[Cluster], cards: &[Card]) -> Vec<HydratedCluster> {
    let mut by_word: HashMap<String, &Card> = HashMap::with_capacity(cards.len());
    for card in cards {
        by_word
            .entry(card.key())
            .and_modify(|best| {
                if card.has_progress() && !best.has_progress() {
                    *best = card;
                }
            })
            .or_insert(card);
    }

    clusters
        .iter()
        .filter_map(|c| {
            let cards: Vec<Card> = c
                .items
                .iter()
                .filter_map(|w| by_word.get(w).map(|&card| card.clone()))
                .collect();
            (!cards.is_empty()).then(|| HydratedCluster {
                label: c.label.clone(),
                cards,
                unembedded: c.unembedded,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(label: &str, items: &[&str]) -> Cluster {
        Cluster {
            label: label.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            unembedded: false,
        }
    }

    #[test]
    fn progress_beats_fresh_duplicate() {
        let fresh = Card::new("1", "Apple");
        let mut studied = Card::new("2", "apple");
        studied.learning_state = LearningState::Review;
        let mut familiar = Card::new("3", "banana");
        familiar.is_familiar = true;
        let later_fresh = Card::new("4", "banana");

        let out = rehydrate(
            &[cluster("apple", &["apple", "banana"])],
            &[fresh, studied.clone(), familiar.clone(), later_fresh],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].cards, vec![studied, familiar]);
    }

    #[test]
    fn first_card_wins_among_equals() {
        let out = rehydrate(
            &[cluster("kiwi", &["kiwi"])],
            &[Card::new("a", "kiwi"), Card::new("b", "kiwi")],
        );
        assert_eq!(out[0].cards[0].id, "a");
    }

    #[test]
    fn deleted_cards_drop_out() {
        let out = rehydrate(
            &[cluster("apple", &["apple", "pear"]), cluster("gone", &["gone"])],
            &[Card::new("1", "pear")],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "apple");
        assert_eq!(out[0].cards.len(), 1);
    }

    #[tokio::test]
    async fn memory_cards_lists_decks() {
        let cards = MemoryCards::new();
        cards.set_deck("d1", vec![Card::new("1", "apple")]).unwrap();
        assert_eq!(cards.list_cards("d1").await.unwrap().len(), 1);
        assert!(cards.list_cards("other").await.unwrap().is_empty());
    }
}
