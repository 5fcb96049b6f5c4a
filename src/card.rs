use std::fmt;

use serde::{Deserialize, Serialize};

/// The four French suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// Card color, used by the cascade stacking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    /// All four suits, in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Single glyph used in text rendering.
    pub fn glyph(self) -> &'static str {
        match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♢",
            Suit::Hearts => "♡",
            Suit::Spades => "♠",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }
}

/// Card rank, Ace low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All thirteen ranks, Ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ordinal value, 1 (Ace) through 13 (King).
    pub fn value(self) -> u8 {
        self as u8 + 1
    }

    /// The rank with the given ordinal value, if any.
    pub fn from_value(value: u8) -> Option<Rank> {
        value
            .checked_sub(1)
            .and_then(|i| Rank::ALL.get(usize::from(i)))
            .copied()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// An immutable playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn color(self) -> Color {
        self.suit.color()
    }

    pub fn is_red(self) -> bool {
        self.color() == Color::Red
    }

    /// Is `self` exactly one rank above `other`?
    pub fn is_one_above(self, other: Card) -> bool {
        self.rank.value() == other.rank.value() + 1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.glyph())
    }
}

/// A fresh, unshuffled 52-card deck: all Aces first, then all Twos, and so on,
/// each rank in [`Suit::ALL`] order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);

    for &rank in &Rank::ALL {
        for &suit in &Suit::ALL {
            deck.push(Card::new(rank, suit));
        }
    }

    debug_assert_eq!(deck.len(), 52, "Deck must have exactly 52 cards");
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_rank_symbol_and_glyph() {
        assert_eq!(Card::new(Rank::Three, Suit::Hearts).to_string(), "3♡");
        assert_eq!(Card::new(Rank::Ten, Suit::Spades).to_string(), "10♠");
        assert_eq!(Card::new(Rank::Ace, Suit::Clubs).to_string(), "A♣");
        assert_eq!(Card::new(Rank::King, Suit::Diamonds).to_string(), "K♢");
    }

    #[test]
    fn colors_partition_suits() {
        assert!(Card::new(Rank::Two, Suit::Hearts).is_red());
        assert!(Card::new(Rank::Two, Suit::Diamonds).is_red());
        assert_eq!(Suit::Clubs.color(), Color::Black);
        assert_eq!(Suit::Spades.color(), Color::Black);
    }

    #[test]
    fn rank_values_round_trip_through_from_value() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_value(rank.value()), Some(rank));
        }
        assert_eq!(Rank::from_value(0), None);
        assert_eq!(Rank::from_value(14), None);
        assert_eq!(Rank::King.value(), 13);
    }

    #[test]
    fn full_deck_is_rank_major_and_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck[0], Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(deck[3], Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(deck[4], Card::new(Rank::Two, Suit::Clubs));

        let unique: std::collections::HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 52);
    }
}
