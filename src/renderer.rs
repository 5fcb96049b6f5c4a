use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::card::{Card, Rank};
use crate::error::Result;
use crate::model::KlondikeModel;

/// Trait that abstracts the rendering layer, so the controller stays
/// output-agnostic.
pub trait Renderer {
    /// Render the full game state.
    fn render<M: KlondikeModel + ?Sized>(&mut self, model: &M) -> io::Result<()>;
    /// Display a line of text to the player.
    fn message(&mut self, msg: &str) -> io::Result<()>;
}

/// The board as a fixed-width text grid.
///
/// ```text
/// Draw: 3♡, 4♣
/// Foundation: A♣, <none>, <none>, <none>
///   X  ?  ?
///     2♠  ?
///        K♢
/// ```
///
/// Each cascade cell is three characters wide: a face-up card
/// right-aligned, `?` for a face-down card, `X` marking an empty pile.
pub fn render_text<M: KlondikeModel + ?Sized>(model: &M) -> Result<String> {
    render_with(model, |card| card.to_string())
}

/// Like [`render_text`], but `paint` decides how each face-up card is drawn.
/// `paint` must not change the visible width of the card.
pub fn render_with<M, F>(model: &M, paint: F) -> Result<String>
where
    M: KlondikeModel + ?Sized,
    F: Fn(Card) -> String,
{
    let mut out = String::new();

    let draw: Vec<String> = model.draw_cards()?.into_iter().map(&paint).collect();
    out.push_str("Draw: ");
    out.push_str(&draw.join(", "));
    out.push('\n');

    let mut foundations = Vec::new();
    for f in 0..model.num_foundations()? {
        foundations.push(match model.foundation_top(f)? {
            Some(card) => paint(card),
            None => "<none>".to_string(),
        });
    }
    out.push_str("Foundation: ");
    out.push_str(&foundations.join(", "));
    out.push('\n');

    let piles = model.num_piles()?;
    for row in 0..model.num_rows()? {
        for pile in 0..piles {
            let height = model.pile_height(pile)?;
            if row < height {
                if model.is_card_visible(pile, row)? {
                    let card = model.card_at(pile, row)?;
                    // Only "10" is two characters wide.
                    if card.rank != Rank::Ten {
                        out.push(' ');
                    }
                    out.push_str(&paint(card));
                } else {
                    out.push_str("  ?");
                }
            } else if row == 0 && height == 0 {
                out.push_str("  X");
            } else {
                out.push_str("   ");
            }
        }
        out.push('\n');
    }

    Ok(out.trim().to_string())
}

/// Plain text renderer over any writer.
pub struct TextView<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W) -> Self {
        TextView { out, color: false }
    }

    /// Paint red suits red with ANSI styling.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextView<W> {
    fn render<M: KlondikeModel + ?Sized>(&mut self, model: &M) -> io::Result<()> {
        let text = if self.color {
            render_with(model, |card| {
                if card.is_red() {
                    card.to_string().red().to_string()
                } else {
                    card.to_string()
                }
            })
        } else {
            render_text(model)
        }
        .map_err(io::Error::other)?;
        writeln!(self.out, "{text}")
    }

    fn message(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit, full_deck};
    use crate::klondike::Klondike;
    use crate::rules::Variant;

    #[test]
    fn renders_standard_opening() {
        let mut game = Klondike::with_seed(Variant::Basic, 0);
        game.start_game(full_deck(), false, 3, 2).unwrap();

        let text = render_text(&game).unwrap();
        let expected = [
            "Draw: 2♡, 2♠",
            "Foundation: <none>, <none>, <none>, <none>",
            " A♣  ?  ?",
            "    A♠  ?",
            "       2♢",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_pile_is_marked() {
        let mut game = Klondike::with_seed(Variant::Basic, 0);
        game.start_game(full_deck(), false, 2, 1).unwrap();
        game.move_to_foundation(0, 0).unwrap();

        let text = render_text(&game).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Foundation: A♣, <none>, <none>, <none>");
        assert_eq!(lines[2], "  X  ?");
        assert_eq!(lines[3], "    A♡");
    }

    #[test]
    fn ten_fills_the_whole_cell() {
        let ten = Card::new(Rank::Ten, Suit::Hearts);
        let mut deck = full_deck();
        let pos = deck.iter().position(|&c| c == ten).unwrap();
        deck.swap(0, pos);

        let mut game = Klondike::with_seed(Variant::Basic, 0);
        game.start_game(deck, false, 1, 1).unwrap();
        assert_eq!(render_text(&game).unwrap().lines().nth(2), Some("10♡"));
    }

    #[test]
    fn rendering_before_start_fails() {
        let game = Klondike::new(Variant::Basic);
        assert!(render_text(&game).unwrap_err().is_illegal_move());
    }

    #[test]
    fn text_view_writes_board_and_messages() {
        let mut game = Klondike::with_seed(Variant::Basic, 0);
        game.start_game(full_deck(), false, 1, 1).unwrap();

        let mut view = TextView::new(Vec::new());
        view.render(&game).unwrap();
        view.message("Score: 0").unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "Draw: A♢\nFoundation: <none>, <none>, <none>, <none>\n A♣\nScore: 0\n");
    }
}
