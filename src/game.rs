use std::io::{self, BufRead};

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::card::Card;
use crate::command::{Command, CommandReader};
use crate::error::KlondikeError;
use crate::model::KlondikeModel;
use crate::renderer::Renderer;

/// Why a game could not be played to an end.
#[derive(Debug, Display, Error)]
pub enum ControllerError {
    #[display("Game cannot be started: {source}")]
    StartFailed { source: KlondikeError },
    #[display("Input ran out before the game was over.")]
    InputExhausted,
    /// The engine refused a query it should always answer once started.
    #[display("Engine failure: {source}")]
    Engine { source: KlondikeError },
    #[display("I/O failure: {source}")]
    Io { source: io::Error },
}

impl From<KlondikeError> for ControllerError {
    fn from(source: KlondikeError) -> Self {
        ControllerError::Engine { source }
    }
}

impl From<io::Error> for ControllerError {
    fn from(source: io::Error) -> Self {
        ControllerError::Io { source }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every card reached the foundations.
    Won,
    /// The draw pile ran out with cards still on the table.
    Lost,
    /// The player quit.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub score: u32,
    /// Accepted moves.
    pub moves: u32,
}

/// The turn loop. `input` supplies player commands, `view` is injected so
/// the loop stays output-agnostic.
pub struct Controller<R, V> {
    commands: CommandReader<R>,
    view: V,
}

impl<R: BufRead, V: Renderer> Controller<R, V> {
    pub fn new(input: R, view: V) -> Self {
        Controller {
            commands: CommandReader::new(input),
            view,
        }
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Start `model` with the given deal and play until the game is over,
    /// the player quits, or input runs out.
    #[instrument(level = "debug", skip(self, model, deck))]
    pub fn play_game<M: KlondikeModel + ?Sized>(
        &mut self,
        model: &mut M,
        deck: Vec<Card>,
        shuffle: bool,
        num_piles: usize,
        num_draw: usize,
    ) -> Result<GameSummary, ControllerError> {
        model
            .start_game(deck, shuffle, num_piles, num_draw)
            .map_err(|source| ControllerError::StartFailed { source })?;
        self.display_board(model)?;

        let mut moves = 0;
        while !model.is_game_over()? {
            let Some(cmd) = self.commands.next_command()? else {
                return Err(ControllerError::InputExhausted);
            };
            for _ in 0..self.commands.take_skipped() {
                self.view.message("Invalid input. Play again.")?;
            }

            match cmd {
                Command::Quit => {
                    self.view.message("Game quit!")?;
                    self.view.message("State of game when quit:")?;
                    self.display_board(model)?;
                    let score = model.score()?;
                    info!(score, moves, "Player quit");
                    return Ok(GameSummary {
                        outcome: Outcome::Quit,
                        score,
                        moves,
                    });
                }
                Command::Unknown(token) => {
                    debug!(%token, "Unknown command");
                    self.view.message("Invalid move. Play again.")?;
                }
                cmd => match apply(model, &cmd) {
                    Ok(()) => moves += 1,
                    Err(e) => {
                        debug!(?cmd, error = %e, "Move rejected");
                        self.view
                            .message(&format!("Invalid move. Play again. {}", e.message))?;
                    }
                },
            }
            self.display_board(model)?;
        }

        let score = model.score()?;
        let outcome = if all_cards_home(model)? {
            self.view.message("You win!")?;
            Outcome::Won
        } else {
            self.view.message(&format!("Game over. Score: {score}"))?;
            Outcome::Lost
        };
        info!(?outcome, score, moves, "Game over");
        Ok(GameSummary {
            outcome,
            score,
            moves,
        })
    }

    fn display_board<M: KlondikeModel + ?Sized>(&mut self, model: &M) -> Result<(), ControllerError> {
        self.view.render(model)?;
        self.view.message(&format!("Score: {}", model.score()?))?;
        Ok(())
    }
}

/// Player numbers are 1-based; the engine's are 0-based.
fn index(n: i64) -> Result<usize, KlondikeError> {
    n.checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| KlondikeError::invalid_argument("Pile numbers start at 1."))
}

/// Card counts are taken as typed.
fn count(n: i64) -> Result<usize, KlondikeError> {
    usize::try_from(n).map_err(|_| {
        KlondikeError::invalid_argument("An invalid number of cards to move was provided.")
    })
}

fn apply<M: KlondikeModel + ?Sized>(model: &mut M, cmd: &Command) -> Result<(), KlondikeError> {
    match *cmd {
        Command::MovePile { src, count: n, dest } => {
            model.move_pile(index(src)?, count(n)?, index(dest)?)
        }
        Command::MoveDraw { dest } => model.move_draw(index(dest)?),
        Command::MoveToFoundation { src, foundation } => {
            model.move_to_foundation(index(src)?, index(foundation)?)
        }
        Command::MoveDrawToFoundation { foundation } => {
            model.move_draw_to_foundation(index(foundation)?)
        }
        Command::DiscardDraw => model.discard_draw(),
        Command::Quit | Command::Unknown(_) => Ok(()),
    }
}

/// With the draw pile empty, the game is won once every cascade is empty too.
fn all_cards_home<M: KlondikeModel + ?Sized>(model: &M) -> Result<bool, KlondikeError> {
    for pile in 0..model.num_piles()? {
        if model.pile_height(pile)? > 0 {
            return Ok(false);
        }
    }
    Ok(true)
}
