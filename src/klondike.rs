//! The Klondike rules engine.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, instrument};

use crate::board::{Board, Cascade, triangle};
use crate::card::{Card, full_deck};
use crate::deck::{self, is_valid_deal};
use crate::error::{KlondikeError, Result};
use crate::model::KlondikeModel;
use crate::rules::{EmptyCascade, RuleSet, Variant};

/// A single game of Klondike under one [`Variant`].
///
/// The engine is created empty and becomes playable once
/// [`KlondikeModel::start_game`] succeeds. It can only be started once.
/// Moves are refused once the draw pile is empty; queries keep working.
#[derive(Debug, Clone)]
pub struct Klondike {
    variant: Variant,
    rules: RuleSet,
    rng: SmallRng,
    board: Option<Board>,
}

impl Klondike {
    /// A new engine whose shuffles are seeded from the OS.
    pub fn new(variant: Variant) -> Self {
        Self::with_rng(variant, SmallRng::from_os_rng())
    }

    /// A new engine with reproducible shuffles.
    pub fn with_seed(variant: Variant, seed: u64) -> Self {
        Self::with_rng(variant, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(variant: Variant, rng: SmallRng) -> Self {
        Klondike {
            variant,
            rules: RuleSet::from(variant),
            rng,
            board: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The table, once the game has started.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    fn started(&self) -> Result<&Board> {
        self.board
            .as_ref()
            .ok_or_else(|| KlondikeError::illegal_move("The game has not yet started."))
    }

    /// The table, if a move may be made on it right now.
    fn in_progress(&mut self) -> Result<&mut Board> {
        let board = self
            .board
            .as_mut()
            .ok_or_else(|| KlondikeError::illegal_move("The game has not yet started."))?;
        if board.draw.is_empty() {
            return Err(KlondikeError::illegal_move("The game is over."));
        }
        Ok(board)
    }
}

#[track_caller]
fn check_pile(board: &Board, pile: usize) -> Result<()> {
    if pile >= board.cascades.len() {
        return Err(KlondikeError::invalid_argument(
            "Invalid pile number provided.",
        ));
    }
    Ok(())
}

#[track_caller]
fn check_foundation(board: &Board, foundation: usize) -> Result<()> {
    if foundation >= board.foundations.len() {
        return Err(KlondikeError::invalid_argument(
            "Invalid foundation pile number provided.",
        ));
    }
    Ok(())
}

/// May `card` be the new bottom-of-chunk on `dest`?
fn check_landing(rules: &RuleSet, card: Card, dest: &Cascade) -> Result<()> {
    match dest.top() {
        None if !rules.can_fill_empty(card) => {
            let msg = match rules.empty_cascade {
                EmptyCascade::KingOnly => "Only kings can be moved to empty cascade piles.",
                EmptyCascade::AnyRank => "This card cannot start an empty cascade pile.",
            };
            Err(KlondikeError::illegal_move(msg))
        }
        Some(top) if !rules.can_stack(card, top) => {
            Err(KlondikeError::illegal_move(format!("{card} cannot be placed on {top}.")))
        }
        _ => Ok(()),
    }
}

fn check_foundation_accepts(board: &Board, foundation: usize, card: Card) -> Result<()> {
    let target = &board.foundations[foundation];
    if target.accepts(card) {
        return Ok(());
    }
    match target.top() {
        None => Err(KlondikeError::illegal_move(
            "Only aces can be moved to empty foundation piles.",
        )),
        Some(top) => Err(KlondikeError::illegal_move(format!(
            "{card} cannot be placed on {top}."
        ))),
    }
}

impl KlondikeModel for Klondike {
    fn deck(&self) -> Vec<Card> {
        full_deck()
    }

    #[instrument(level = "debug", skip(self, deck), fields(deck_len = deck.len()))]
    fn start_game(
        &mut self,
        deck: Vec<Card>,
        shuffle: bool,
        num_piles: usize,
        num_draw: usize,
    ) -> Result<()> {
        if self.board.is_some() {
            return Err(KlondikeError::illegal_move("The game has already started."));
        }
        if !is_valid_deal(&deck) {
            return Err(KlondikeError::invalid_argument("Invalid deck provided."));
        }
        if num_piles == 0 || num_draw == 0 {
            return Err(KlondikeError::invalid_argument(
                "Number of piles and draw cards must be at least 1.",
            ));
        }
        if deck.len() < triangle(num_piles) {
            return Err(KlondikeError::invalid_argument(
                "Deck is too small for the given number of piles.",
            ));
        }

        let mut deck = deck;
        if shuffle {
            deck::shuffle(&mut deck, &mut self.rng);
        }
        let board = Board::deal(deck, num_piles, num_draw, &self.rules);
        info!(
            variant = self.variant.name(),
            piles = num_piles,
            foundations = board.foundations.len(),
            draw = board.draw.len(),
            "Game started"
        );
        self.board = Some(board);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn move_pile(&mut self, src: usize, count: usize, dest: usize) -> Result<()> {
        let rules = self.rules;
        let board = self.in_progress()?;
        check_pile(board, src)?;
        check_pile(board, dest)?;
        if src == dest {
            return Err(KlondikeError::invalid_argument(
                "Source and destination piles cannot be the same.",
            ));
        }
        if count == 0 || count > board.cascades[src].height() {
            return Err(KlondikeError::invalid_argument(
                "An invalid number of cards to move was provided.",
            ));
        }

        let chunk = board.cascades[src].chunk(count);
        if chunk.iter().any(|slot| !slot.visible) {
            return Err(KlondikeError::illegal_move("Face-down cards cannot be moved."));
        }
        let cards: Vec<Card> = chunk.iter().map(|slot| slot.card).collect();
        if !rules.is_movable_chunk(&cards) {
            return Err(KlondikeError::illegal_move(
                "All cards being moved must be the same suit.",
            ));
        }
        check_landing(&rules, cards[0], &board.cascades[dest])?;

        let moved = board.cascades[src].take(count);
        board.cascades[src].reveal_top();
        board.cascades[dest].extend(moved);
        debug!(src, count, dest, "Moved pile");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn move_draw(&mut self, dest: usize) -> Result<()> {
        let rules = self.rules;
        let board = self.in_progress()?;
        check_pile(board, dest)?;
        let card = board
            .draw
            .front()
            .ok_or_else(|| KlondikeError::illegal_move("The draw pile is empty."))?;
        check_landing(&rules, card, &board.cascades[dest])?;

        board.draw.take_front();
        board.cascades[dest].push(card, true);
        debug!(%card, dest, "Moved draw card to cascade");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn move_to_foundation(&mut self, src: usize, foundation: usize) -> Result<()> {
        let board = self.in_progress()?;
        check_foundation(board, foundation)?;
        check_pile(board, src)?;
        let card = board.cascades[src]
            .top()
            .ok_or_else(|| KlondikeError::illegal_move("The source pile is empty."))?;
        check_foundation_accepts(board, foundation, card)?;

        board.cascades[src].pop();
        board.cascades[src].reveal_top();
        board.foundations[foundation].push(card);
        debug!(%card, src, foundation, "Moved card to foundation");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn move_draw_to_foundation(&mut self, foundation: usize) -> Result<()> {
        let board = self.in_progress()?;
        check_foundation(board, foundation)?;
        let card = board
            .draw
            .front()
            .ok_or_else(|| KlondikeError::illegal_move("The draw pile is empty."))?;
        check_foundation_accepts(board, foundation, card)?;

        board.draw.take_front();
        board.foundations[foundation].push(card);
        debug!(%card, foundation, "Moved draw card to foundation");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn discard_draw(&mut self) -> Result<()> {
        let board = self.in_progress()?;
        match board.draw.discard_front() {
            Some((card, recycled)) => {
                debug!(%card, recycled, remaining = board.draw.len(), "Discarded draw card");
                Ok(())
            }
            None => Err(KlondikeError::illegal_move("The draw pile is empty.")),
        }
    }

    fn num_rows(&self) -> Result<usize> {
        Ok(self.started()?.num_rows())
    }

    fn num_piles(&self) -> Result<usize> {
        Ok(self.started()?.cascades.len())
    }

    fn num_draw(&self) -> Result<usize> {
        Ok(self.started()?.num_draw)
    }

    fn num_foundations(&self) -> Result<usize> {
        Ok(self.started()?.foundations.len())
    }

    fn pile_height(&self, pile: usize) -> Result<usize> {
        let board = self.started()?;
        check_pile(board, pile)?;
        Ok(board.cascades[pile].height())
    }

    fn is_card_visible(&self, pile: usize, index: usize) -> Result<bool> {
        let board = self.started()?;
        check_pile(board, pile)?;
        board.cascades[pile]
            .slot(index)
            .map(|slot| slot.visible)
            .ok_or_else(|| KlondikeError::invalid_argument("Invalid card index provided."))
    }

    fn card_at(&self, pile: usize, index: usize) -> Result<Card> {
        let board = self.started()?;
        check_pile(board, pile)?;
        let slot = board.cascades[pile]
            .slot(index)
            .ok_or_else(|| KlondikeError::invalid_argument("Invalid card index provided."))?;
        if !slot.visible {
            return Err(KlondikeError::invalid_argument(
                "The provided card is not visible.",
            ));
        }
        Ok(slot.card)
    }

    fn foundation_top(&self, foundation: usize) -> Result<Option<Card>> {
        let board = self.started()?;
        check_foundation(board, foundation)?;
        Ok(board.foundations[foundation].top())
    }

    fn draw_cards(&self) -> Result<Vec<Card>> {
        let board = self.started()?;
        Ok(board.draw.peek(board.num_draw))
    }

    fn score(&self) -> Result<u32> {
        Ok(self.started()?.score())
    }

    fn is_game_over(&self) -> Result<bool> {
        Ok(self.started()?.draw.is_empty())
    }
}
