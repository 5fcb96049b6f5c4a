//! Command-line interface.

use clap::{Parser, Subcommand, ValueEnum};

use crate::rules::Variant;

/// Klondike solitaire in the terminal.
#[derive(Parser, Debug)]
#[command(name = "klondike-rs")]
#[command(about = "Klondike solitaire: basic, whitehead, or limited-draw", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Seed for a reproducible shuffle
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Deal the deck in order instead of shuffling it
    #[arg(long, global = true)]
    pub no_shuffle: bool,

    /// Do not record this game in the history file
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Color red suits
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub variant: VariantArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal
    Auto,
    Always,
    Never,
}

/// Which game to play
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantArgs {
    /// Standard Klondike
    Basic {
        /// Number of cascade piles
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u16).range(1..))]
        piles: u16,
        /// Number of draw cards shown at once
        #[arg(default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
        draw: u16,
    },
    /// Build by same color; any card fills an empty pile; everything face-up
    Whitehead {
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u16).range(1..))]
        piles: u16,
        #[arg(default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
        draw: u16,
    },
    /// Each draw card may come around only a limited number of times
    Limited {
        /// Times each card may reach the front of the draw pile
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        redraws: u32,
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u16).range(1..))]
        piles: u16,
        #[arg(default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
        draw: u16,
    },
}

impl VariantArgs {
    /// The engine variant. A card that may reach the front `n` times may be
    /// recycled `n - 1` times.
    pub fn variant(self) -> Variant {
        match self {
            VariantArgs::Basic { .. } => Variant::Basic,
            VariantArgs::Whitehead { .. } => Variant::Whitehead,
            VariantArgs::Limited { redraws, .. } => Variant::LimitedDraw {
                redraws: redraws.saturating_sub(1),
            },
        }
    }

    pub fn piles(self) -> usize {
        match self {
            VariantArgs::Basic { piles, .. }
            | VariantArgs::Whitehead { piles, .. }
            | VariantArgs::Limited { piles, .. } => usize::from(piles),
        }
    }

    pub fn draw(self) -> usize {
        match self {
            VariantArgs::Basic { draw, .. }
            | VariantArgs::Whitehead { draw, .. }
            | VariantArgs::Limited { draw, .. } => usize::from(draw),
        }
    }
}
