use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::{Card, Rank};

/// Can `cards` be dealt?
///
/// A deck is valid when it splits into one run per Ace, each run climbing
/// from Ace one rank at a time within a single suit, all runs of equal length,
/// with no card left over. The order of `cards` does not matter.
pub fn is_valid_deal(cards: &[Card]) -> bool {
    if cards.is_empty() {
        return false;
    }

    // Stable sort so every rank-r card is seen after all rank-(r-1) cards.
    let mut pool = cards.to_vec();
    pool.sort_by_key(|c| c.rank);

    let (aces, rest): (Vec<Card>, Vec<Card>) =
        pool.into_iter().partition(|c| c.rank == Rank::Ace);
    if aces.is_empty() {
        return false;
    }

    let mut runs: Vec<Vec<Card>> = aces.into_iter().map(|ace| vec![ace]).collect();
    let mut leftover = 0usize;

    for card in rest {
        let run = runs.iter_mut().find(|run| {
            run.last()
                .is_some_and(|top| top.suit == card.suit && card.is_one_above(*top))
        });
        match run {
            Some(run) => run.push(card),
            None => leftover += 1,
        }
    }

    let first_len = runs[0].len();
    leftover == 0 && runs.iter().all(|run| run.len() == first_len)
}

/// Shuffle a deck in place with the given RNG.
pub fn shuffle<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    deck.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::card::{Suit, full_deck};

    fn run(suit: Suit, len: u8) -> Vec<Card> {
        (1..=len)
            .filter_map(Rank::from_value)
            .map(|rank| Card::new(rank, suit))
            .collect()
    }

    #[test]
    fn full_deck_is_valid() {
        assert!(is_valid_deal(&full_deck()));
    }

    #[test]
    fn empty_deck_is_invalid() {
        assert!(!is_valid_deal(&[]));
    }

    #[test]
    fn deck_without_aces_is_invalid() {
        let deck = vec![
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Three, Suit::Clubs),
        ];
        assert!(!is_valid_deal(&deck));
    }

    #[test]
    fn short_equal_runs_are_valid() {
        let mut deck = run(Suit::Hearts, 3);
        deck.extend(run(Suit::Spades, 3));
        assert!(is_valid_deal(&deck));

        let aces: Vec<Card> = Suit::ALL.iter().map(|&s| Card::new(Rank::Ace, s)).collect();
        assert!(is_valid_deal(&aces));
    }

    #[test]
    fn unequal_runs_are_invalid() {
        let mut deck = run(Suit::Hearts, 3);
        deck.extend(run(Suit::Spades, 2));
        assert!(!is_valid_deal(&deck));
    }

    #[test]
    fn gap_in_run_is_invalid() {
        let deck = vec![
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::Three, Suit::Clubs),
        ];
        assert!(!is_valid_deal(&deck));
    }

    #[test]
    fn duplicate_card_is_invalid() {
        let mut deck = full_deck();
        deck.push(Card::new(Rank::Five, Suit::Diamonds));
        assert!(!is_valid_deal(&deck));
    }

    #[test]
    fn two_full_runs_of_one_suit_are_valid() {
        let mut deck = run(Suit::Clubs, 13);
        deck.extend(run(Suit::Clubs, 13));
        assert!(is_valid_deal(&deck));
    }

    #[test]
    fn validity_does_not_depend_on_order() {
        let mut rng = SmallRng::seed_from_u64(7);

        let mut valid = run(Suit::Diamonds, 5);
        valid.extend(run(Suit::Clubs, 5));
        let mut invalid = run(Suit::Diamonds, 5);
        invalid.extend(run(Suit::Clubs, 4));

        for _ in 0..50 {
            shuffle(&mut valid, &mut rng);
            shuffle(&mut invalid, &mut rng);
            assert!(is_valid_deal(&valid));
            assert!(!is_valid_deal(&invalid));
        }
    }
}
