use crate::card::Card;
use crate::error::Result;

/// The operations a Klondike game exposes to a controller or a view.
///
/// All pile and foundation indices are 0-based. Every query fails with an
/// illegal-move error until [`KlondikeModel::start_game`] has succeeded.
pub trait KlondikeModel {
    /// A fresh, unshuffled standard deck.
    fn deck(&self) -> Vec<Card>;

    /// Deal `deck` onto `num_piles` cascades, showing `num_draw` draw cards at a time.
    fn start_game(
        &mut self,
        deck: Vec<Card>,
        shuffle: bool,
        num_piles: usize,
        num_draw: usize,
    ) -> Result<()>;

    /// Move the top `count` cards of cascade `src` onto cascade `dest`.
    fn move_pile(&mut self, src: usize, count: usize, dest: usize) -> Result<()>;

    /// Move the front draw card onto cascade `dest`.
    fn move_draw(&mut self, dest: usize) -> Result<()>;

    /// Move the top card of cascade `src` onto foundation `foundation`.
    fn move_to_foundation(&mut self, src: usize, foundation: usize) -> Result<()>;

    /// Move the front draw card onto foundation `foundation`.
    fn move_draw_to_foundation(&mut self, foundation: usize) -> Result<()>;

    /// Discard the front draw card.
    fn discard_draw(&mut self) -> Result<()>;

    fn num_rows(&self) -> Result<usize>;
    fn num_piles(&self) -> Result<usize>;
    fn num_draw(&self) -> Result<usize>;
    fn num_foundations(&self) -> Result<usize>;
    fn pile_height(&self, pile: usize) -> Result<usize>;
    fn is_card_visible(&self, pile: usize, index: usize) -> Result<bool>;

    /// The face-up card at `index` (0 = bottom) of cascade `pile`.
    fn card_at(&self, pile: usize, index: usize) -> Result<Card>;

    /// Top card of a foundation, `None` while it is empty.
    fn foundation_top(&self, foundation: usize) -> Result<Option<Card>>;

    /// The visible draw cards, front first.
    fn draw_cards(&self) -> Result<Vec<Card>>;

    /// Sum of the top rank of every foundation.
    fn score(&self) -> Result<u32>;

    /// The game ends when the draw pile is empty.
    fn is_game_over(&self) -> Result<bool>;
}
