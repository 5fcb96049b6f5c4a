//! The three rule profiles, expressed as data rather than subclasses.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank};

/// Which flavour of Klondike is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Standard Klondike.
    Basic,
    /// Build down by same color; any card may fill an empty cascade; no hidden cards.
    Whitehead,
    /// Standard rules, but each draw card may be recycled at most `redraws` times.
    LimitedDraw { redraws: u32 },
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Whitehead => "whitehead",
            Variant::LimitedDraw { .. } => "limited",
        }
    }
}

/// How a card may be placed on a non-empty cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// One rank lower, opposite color.
    AlternatingColor,
    /// One rank lower, same color.
    SameColor,
}

/// Which cards may land on an empty cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCascade {
    KingOnly,
    AnyRank,
}

/// What happens to the front draw card when it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Always goes to the back of the draw pile.
    Unlimited,
    /// Goes to the back while its counter lasts, then leaves play.
    Capped(u32),
}

/// Everything that differs between variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub stacking: Stacking,
    pub empty_cascade: EmptyCascade,
    /// Every card of a moved chunk must share one suit.
    pub single_suit_chunks: bool,
    /// Cascades are dealt face-down except for the top card.
    pub hidden_cards: bool,
    pub redraw: Redraw,
}

impl RuleSet {
    pub const BASIC: RuleSet = RuleSet {
        stacking: Stacking::AlternatingColor,
        empty_cascade: EmptyCascade::KingOnly,
        single_suit_chunks: false,
        hidden_cards: true,
        redraw: Redraw::Unlimited,
    };

    pub const WHITEHEAD: RuleSet = RuleSet {
        stacking: Stacking::SameColor,
        empty_cascade: EmptyCascade::AnyRank,
        single_suit_chunks: true,
        hidden_cards: false,
        redraw: Redraw::Unlimited,
    };

    pub const fn limited_draw(redraws: u32) -> RuleSet {
        RuleSet {
            redraw: Redraw::Capped(redraws),
            ..RuleSet::BASIC
        }
    }

    /// May `card` be placed on top of `onto` in a cascade?
    pub fn can_stack(&self, card: Card, onto: Card) -> bool {
        let colors_ok = match self.stacking {
            Stacking::AlternatingColor => card.color() != onto.color(),
            Stacking::SameColor => card.color() == onto.color(),
        };
        colors_ok && onto.is_one_above(card)
    }

    /// May `card` be the bottom card of an empty cascade?
    pub fn can_fill_empty(&self, card: Card) -> bool {
        match self.empty_cascade {
            EmptyCascade::KingOnly => card.rank == Rank::King,
            EmptyCascade::AnyRank => true,
        }
    }

    /// Does `chunk` satisfy the suit constraint on multi-card moves?
    pub fn is_movable_chunk(&self, chunk: &[Card]) -> bool {
        if !self.single_suit_chunks {
            return true;
        }
        match chunk.first() {
            Some(first) => chunk.iter().all(|c| c.suit == first.suit),
            None => true,
        }
    }
}

impl From<Variant> for RuleSet {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Basic => RuleSet::BASIC,
            Variant::Whitehead => RuleSet::WHITEHEAD,
            Variant::LimitedDraw { redraws } => RuleSet::limited_draw(redraws),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn card(value: u8, suit: Suit) -> Card {
        Card::new(Rank::from_value(value).unwrap(), suit)
    }

    #[test]
    fn basic_stacks_alternating_colors_descending() {
        let rules = RuleSet::BASIC;
        assert!(rules.can_stack(card(6, Suit::Hearts), card(7, Suit::Spades)));
        assert!(!rules.can_stack(card(6, Suit::Clubs), card(7, Suit::Spades)));
        assert!(!rules.can_stack(card(5, Suit::Hearts), card(7, Suit::Spades)));
        assert!(!rules.can_stack(card(8, Suit::Hearts), card(7, Suit::Spades)));
    }

    #[test]
    fn whitehead_stacks_same_color_descending() {
        let rules = RuleSet::WHITEHEAD;
        assert!(rules.can_stack(card(6, Suit::Clubs), card(7, Suit::Spades)));
        assert!(rules.can_stack(card(6, Suit::Diamonds), card(7, Suit::Hearts)));
        assert!(!rules.can_stack(card(6, Suit::Hearts), card(7, Suit::Spades)));
    }

    #[test]
    fn empty_cascade_rules() {
        assert!(RuleSet::BASIC.can_fill_empty(card(13, Suit::Clubs)));
        assert!(!RuleSet::BASIC.can_fill_empty(card(12, Suit::Clubs)));
        assert!(RuleSet::WHITEHEAD.can_fill_empty(card(2, Suit::Clubs)));
    }

    #[test]
    fn chunk_suit_constraint_only_in_whitehead() {
        let mixed = [card(7, Suit::Spades), card(6, Suit::Clubs)];
        let pure = [card(7, Suit::Spades), card(6, Suit::Spades)];
        assert!(RuleSet::BASIC.is_movable_chunk(&mixed));
        assert!(!RuleSet::WHITEHEAD.is_movable_chunk(&mixed));
        assert!(RuleSet::WHITEHEAD.is_movable_chunk(&pure));
    }

    #[test]
    fn limited_draw_inherits_basic_stacking() {
        let rules = RuleSet::from(Variant::LimitedDraw { redraws: 2 });
        assert_eq!(rules.stacking, Stacking::AlternatingColor);
        assert_eq!(rules.empty_cascade, EmptyCascade::KingOnly);
        assert!(rules.hidden_cards);
        assert_eq!(rules.redraw, Redraw::Capped(2));
    }
}
