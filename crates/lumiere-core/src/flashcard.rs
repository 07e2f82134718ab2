//! Flashcard navigator: a clamped cursor over a word list with a reveal flag.

use crate::model::VocabularyItem;

#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    items: Vec<VocabularyItem>,
    cursor: usize,
    revealed: bool,
}

impl FlashcardDeck {
    pub fn new(items: Vec<VocabularyItem>) -> Self {
        Self {
            items,
            cursor: 0,
            revealed: false,
        }
    }

    pub fn current(&self) -> Option<&VocabularyItem> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.items.len()
    }

    /// Toggle between the front (headword) and back (meaning) of the card.
    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Move forward. Returns `false` at the last card.
    pub fn next(&mut self) -> bool {
        self.revealed = false;
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move back. Returns `false` at the first card.
    pub fn previous(&mut self) -> bool {
        self.revealed = false;
        if self.is_first() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// "n / len" with a 1-based n, for display.
    pub fn position(&self) -> String {
        if self.items.is_empty() {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.cursor + 1, self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::five_items;

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut deck = FlashcardDeck::new(five_items());
        assert!(deck.is_first());
        assert!(!deck.previous());
        assert_eq!(deck.cursor(), 0);

        for _ in 0..4 {
            assert!(deck.next());
        }
        assert!(deck.is_last());
        assert!(!deck.next());
        assert_eq!(deck.cursor(), 4);
        assert_eq!(deck.position(), "5 / 5");
        assert_eq!(deck.current().unwrap().id, "w105");
    }

    #[test]
    fn moving_hides_the_answer() {
        let mut deck = FlashcardDeck::new(five_items());
        deck.flip();
        assert!(deck.is_revealed());
        deck.next();
        assert!(!deck.is_revealed());

        deck.flip();
        deck.previous();
        assert!(!deck.is_revealed());

        // Even a blocked move resets the flag.
        deck.flip();
        assert!(!deck.previous());
        assert!(!deck.is_revealed());
    }

    #[test]
    fn empty_deck() {
        let mut deck = FlashcardDeck::new(vec![]);
        assert!(deck.current().is_none());
        assert!(!deck.next());
        assert!(!deck.previous());
        assert_eq!(deck.position(), "0 / 0");
    }
}
