use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::rules::{Redraw, RuleSet};

/// A cascade card together with whether it is face-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub card: Card,
    pub visible: bool,
}

/// One tableau column; index 0 is the bottom card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    slots: Vec<Slot>,
}

impl Cascade {
    pub fn height(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn top(&self) -> Option<Card> {
        self.slots.last().map(|s| s.card)
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// The top `count` slots, bottom-most first.
    pub fn chunk(&self, count: usize) -> &[Slot] {
        &self.slots[self.slots.len().saturating_sub(count)..]
    }

    pub fn push(&mut self, card: Card, visible: bool) {
        self.slots.push(Slot { card, visible });
    }

    /// Remove the top `count` slots, preserving their order.
    pub fn take(&mut self, count: usize) -> Vec<Slot> {
        let at = self.slots.len().saturating_sub(count);
        self.slots.split_off(at)
    }

    pub fn pop(&mut self) -> Option<Slot> {
        self.slots.pop()
    }

    pub fn extend(&mut self, slots: impl IntoIterator<Item = Slot>) {
        self.slots.extend(slots);
    }

    /// Turn the top card face-up, if there is one.
    pub fn reveal_top(&mut self) {
        if let Some(top) = self.slots.last_mut() {
            top.visible = true;
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots.iter().map(|s| s.card)
    }
}

/// An ascending same-suit run built from the Ace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foundation {
    cards: Vec<Card>,
}

impl Foundation {
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Can `card` be placed here next?
    pub fn accepts(&self, card: Card) -> bool {
        match self.top() {
            None => card.rank == crate::card::Rank::Ace,
            Some(top) => top.suit == card.suit && card.is_one_above(top),
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }
}

/// A draw-pile card and how many more times it may be recycled.
/// `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawEntry {
    pub card: Card,
    pub redraws_left: Option<u32>,
}

/// The stock, consumed from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPile {
    entries: VecDeque<DrawEntry>,
    /// Cards whose redraws ran out, in the order they left play.
    spent: Vec<Card>,
}

impl DrawPile {
    pub fn new(cards: impl IntoIterator<Item = Card>, redraw: Redraw) -> Self {
        let redraws_left = match redraw {
            Redraw::Unlimited => None,
            Redraw::Capped(n) => Some(n),
        };
        DrawPile {
            entries: cards
                .into_iter()
                .map(|card| DrawEntry { card, redraws_left })
                .collect(),
            spent: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn front(&self) -> Option<Card> {
        self.entries.front().map(|e| e.card)
    }

    pub fn take_front(&mut self) -> Option<Card> {
        self.entries.pop_front().map(|e| e.card)
    }

    /// Move the front card to the back, or drop it for good once its
    /// redraw counter is spent. Returns the card and whether it was recycled.
    pub fn discard_front(&mut self) -> Option<(Card, bool)> {
        let mut entry = self.entries.pop_front()?;
        let recycled = match entry.redraws_left {
            None => true,
            Some(0) => false,
            Some(n) => {
                entry.redraws_left = Some(n - 1);
                true
            }
        };
        if recycled {
            self.entries.push_back(entry);
        } else {
            self.spent.push(entry.card);
        }
        Some((entry.card, recycled))
    }

    /// Up to `k` cards from the front.
    pub fn peek(&self, k: usize) -> Vec<Card> {
        self.entries.iter().take(k).map(|e| e.card).collect()
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.entries.iter().map(|e| e.card)
    }

    /// Cards permanently removed by a capped redraw.
    pub fn spent(&self) -> &[Card] {
        &self.spent
    }
}

/// Triangular number: cards needed to deal `piles` cascades.
pub fn triangle(piles: usize) -> usize {
    piles.saturating_mul(piles.saturating_add(1)) / 2
}

/// The full table for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub cascades: Vec<Cascade>,
    pub foundations: Vec<Foundation>,
    pub draw: DrawPile,
    /// How many draw cards are shown at once.
    pub num_draw: usize,
}

impl Board {
    /// Deal `deck` (already validated and shuffled) onto `num_piles` cascades.
    ///
    /// Cards are laid out row by row: the first pass puts one card on every
    /// cascade, the next pass starts one cascade further right, and so on,
    /// until cascade `i` holds `i + 1` cards. Whatever is left becomes the
    /// draw pile. One foundation is created per Ace in the deck.
    pub fn deal(deck: Vec<Card>, num_piles: usize, num_draw: usize, rules: &RuleSet) -> Self {
        let dealt = triangle(num_piles).min(deck.len());
        let num_foundations = deck
            .iter()
            .filter(|c| c.rank == crate::card::Rank::Ace)
            .count();

        let mut cascades: Vec<Cascade> = vec![Cascade::default(); num_piles];
        let mut pile = 0;
        let mut start = 0;
        for &card in &deck[..dealt] {
            if pile == num_piles {
                start += 1;
                pile = start;
            }
            cascades[pile].push(card, !rules.hidden_cards);
            pile += 1;
        }
        for cascade in &mut cascades {
            cascade.reveal_top();
        }

        Board {
            cascades,
            foundations: vec![Foundation::default(); num_foundations],
            draw: DrawPile::new(deck[dealt..].iter().copied(), rules.redraw),
            num_draw,
        }
    }

    /// Every card dealt, including any spent draw cards, in no particular order.
    pub fn all_cards(&self) -> Vec<Card> {
        self.cascades
            .iter()
            .flat_map(Cascade::cards)
            .chain(self.foundations.iter().flat_map(Foundation::cards))
            .chain(self.draw.cards())
            .chain(self.draw.spent().iter().copied())
            .collect()
    }

    /// Sum of the top rank of every foundation.
    pub fn score(&self) -> u32 {
        self.foundations
            .iter()
            .filter_map(Foundation::top)
            .map(|c| u32::from(c.rank.value()))
            .sum()
    }

    /// Tallest cascade.
    pub fn num_rows(&self) -> usize {
        self.cascades.iter().map(Cascade::height).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit, full_deck};

    #[test]
    fn deal_is_triangular_with_top_cards_visible() {
        let board = Board::deal(full_deck(), 7, 1, &RuleSet::BASIC);

        for (i, cascade) in board.cascades.iter().enumerate() {
            assert_eq!(cascade.height(), i + 1);
            for j in 0..cascade.height() {
                let visible = cascade.slot(j).unwrap().visible;
                assert_eq!(visible, j == i, "pile {i} card {j}");
            }
        }
        assert_eq!(board.draw.len(), 24);
        assert_eq!(board.foundations.len(), 4);
    }

    #[test]
    fn deal_order_fills_rows_left_to_right() {
        let deck = full_deck();
        let board = Board::deal(deck.clone(), 3, 1, &RuleSet::BASIC);

        // Row 0: deck[0..3] on piles 0,1,2; row 1: deck[3..5] on piles 1,2; row 2: deck[5] on pile 2.
        assert_eq!(board.cascades[0].cards().collect::<Vec<_>>(), vec![deck[0]]);
        assert_eq!(board.cascades[1].cards().collect::<Vec<_>>(), vec![deck[1], deck[3]]);
        assert_eq!(
            board.cascades[2].cards().collect::<Vec<_>>(),
            vec![deck[2], deck[4], deck[5]]
        );
        assert_eq!(board.draw.front(), Some(deck[6]));
    }

    #[test]
    fn whitehead_deal_shows_every_card() {
        let board = Board::deal(full_deck(), 7, 1, &RuleSet::WHITEHEAD);
        assert!(
            board
                .cascades
                .iter()
                .all(|c| (0..c.height()).all(|j| c.slot(j).unwrap().visible))
        );
    }

    #[test]
    fn unlimited_discard_cycles() {
        let a = Card::new(Rank::Ace, Suit::Clubs);
        let b = Card::new(Rank::Two, Suit::Clubs);
        let mut draw = DrawPile::new([a, b], Redraw::Unlimited);
        for _ in 0..10 {
            draw.discard_front();
        }
        assert_eq!(draw.peek(5), vec![a, b]);
    }

    #[test]
    fn capped_discard_drops_exhausted_cards() {
        let a = Card::new(Rank::Ace, Suit::Clubs);
        let b = Card::new(Rank::Two, Suit::Clubs);
        let mut draw = DrawPile::new([a, b], Redraw::Capped(1));

        assert_eq!(draw.discard_front(), Some((a, true)));
        assert_eq!(draw.discard_front(), Some((b, true)));
        assert_eq!(draw.discard_front(), Some((a, false)));
        assert_eq!(draw.peek(3), vec![b]);
        assert_eq!(draw.discard_front(), Some((b, false)));
        assert!(draw.is_empty());
        assert_eq!(draw.spent(), &[a, b]);
        assert_eq!(draw.discard_front(), None);
    }

    #[test]
    fn foundation_accepts_ace_then_same_suit_successor() {
        let mut f = Foundation::default();
        assert!(!f.accepts(Card::new(Rank::Two, Suit::Hearts)));
        assert!(f.accepts(Card::new(Rank::Ace, Suit::Hearts)));
        f.push(Card::new(Rank::Ace, Suit::Hearts));
        assert!(f.accepts(Card::new(Rank::Two, Suit::Hearts)));
        assert!(!f.accepts(Card::new(Rank::Two, Suit::Diamonds)));
        assert!(!f.accepts(Card::new(Rank::Three, Suit::Hearts)));
    }

    #[test]
    fn take_preserves_order() {
        let mut c = Cascade::default();
        let cards: Vec<Card> = (1..=4)
            .filter_map(Rank::from_value)
            .map(|r| Card::new(r, Suit::Spades))
            .collect();
        for &card in &cards {
            c.push(card, true);
        }
        let taken: Vec<Card> = c.take(2).into_iter().map(|s| s.card).collect();
        assert_eq!(taken, cards[2..].to_vec());
        assert_eq!(c.top(), Some(cards[1]));
    }
}
