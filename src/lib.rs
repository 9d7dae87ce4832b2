//! Binary Automata - 2D binary cellular automata.
//!
//! A [`Grid`] of boolean cells is advanced one generation at a time by an
//! [`Automaton`]: neighbor counts are taken over a [`Kernel`] with
//! zero-padded edges, then a [`Rule`] decides each cell's next state (or
//! leaves it alone).
//!
//! ```
//! use binary_automata::{Automaton, Grid};
//!
//! let mut life = Automaton::game_of_life(5, 5).unwrap();
//! life.stamp(&Grid::parse("###").unwrap()).unwrap();
//!
//! life.tick();
//! assert_eq!(life.render()[1], "  █  ");
//! life.tick();
//! assert_eq!(life.render()[2], " ███ ");
//! ```

pub mod automaton;
pub mod error;
pub mod rules;

pub use automaton::{Automaton, AutomatonConfig, Grid, Kernel, NeighborCounts};
pub use error::{AutomatonError, Result};
pub use rules::{
    BoxedRule, GameOfLife, Labyrinth, LifeLike, Minotaur, MinotaurRandomized, Rule,
};
