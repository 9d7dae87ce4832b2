//! Transition rules: `(current state, live neighbor count) -> next state`.
//!
//! A rule returns `Some(state)` to write a new state for the cell, or `None`
//! to leave it as it is this generation. Rules never see the grid itself, so
//! the same rule works for any grid size or kernel.
//!
//! Besides the built-in unit structs, any
//! `Fn(bool, u32) -> Option<bool> + Send + Sync` closure or function is a
//! rule:
//!
//! ```
//! use binary_automata::{Automaton, Rule};
//!
//! // "Seeds" (B2/S): every live cell dies, dead cells with 2 neighbors are born.
//! let seeds = |alive: bool, neighbors: u32| Some(!alive && neighbors == 2);
//! assert_eq!(seeds.evaluate(false, 2), Some(true));
//!
//! let automaton = Automaton::new(16, 16, seeds).unwrap();
//! assert_eq!(automaton.population(), 0);
//! ```

use rand::Rng;

use crate::error::{AutomatonError, Result};

/// A cell transition rule.
///
/// `Send + Sync` so the engine can evaluate it from rayon workers.
pub trait Rule: Send + Sync {
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool>;
}

impl<F> Rule for F
where
    F: Fn(bool, u32) -> Option<bool> + Send + Sync,
{
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        self(current, neighbors)
    }
}

impl Rule for Box<dyn Rule> {
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        (**self).evaluate(current, neighbors)
    }
}

/// A rule chosen at runtime.
pub type BoxedRule = Box<dyn Rule>;

/// Conway's Game of Life, `B3/S23`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameOfLife;

impl Rule for GameOfLife {
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        match (current, neighbors) {
            (false, 3) => Some(true),
            (true, 2 | 3) => None,
            (true, _) => Some(false),
            _ => None,
        }
    }
}

/// Maze-growing rule from the literature, `B3/S12345`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Labyrinth;

impl Rule for Labyrinth {
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        match (current, neighbors) {
            (false, 3) => Some(true),
            (true, 1..=5) => None,
            (true, _) => Some(false),
            _ => None,
        }
    }
}

/// `B3/S01234`: grows labyrinths that percolate well with the Moore kernel
/// when bootstrapped from a small centered seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Minotaur;

impl Rule for Minotaur {
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        match (current, neighbors) {
            (false, 3) => Some(true),
            (true, n) if n >= 5 => Some(false),
            _ => None,
        }
    }
}

/// Minotaur with random erosion.
///
/// Before applying [`Minotaur`], each evaluation forces the cell low with
/// probability `probability` (0.001 by default), regardless of its state or
/// neighbors. This rule is NOT deterministic: it draws from the calling
/// thread's `rand::thread_rng()`, so two runs from the same grid diverge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinotaurRandomized {
    probability: f64,
}

impl MinotaurRandomized {
    pub const DEFAULT_PROBABILITY: f64 = 0.001;

    pub fn new() -> Self {
        MinotaurRandomized {
            probability: Self::DEFAULT_PROBABILITY,
        }
    }

    /// Erosion probability per cell per tick.
    pub fn with_probability(probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(AutomatonError::InvalidProbability(probability));
        }
        Ok(MinotaurRandomized { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for MinotaurRandomized {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for MinotaurRandomized {
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        if self.probability > 0.0 && rand::thread_rng().gen_bool(self.probability) {
            return Some(false);
        }
        Minotaur.evaluate(current, neighbors)
    }
}

/// Generic birth/survival rule for neighbor counts 0 through 8.
///
/// A low cell whose count is in `birth` becomes high, a high cell whose
/// count is not in `survival` becomes low, anything else is left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifeLike {
    birth: u16,
    survival: u16,
}

impl LifeLike {
    pub fn new(birth: &[u32], survival: &[u32]) -> Result<Self> {
        Ok(LifeLike {
            birth: to_mask(birth)?,
            survival: to_mask(survival)?,
        })
    }

    /// Parse a rulestring such as `B3/S23` or `s12345/b3`.
    pub fn parse(rulestring: &str) -> Result<Self> {
        let invalid = || AutomatonError::InvalidRule(rulestring.to_string());

        let (first, second) = rulestring.trim().split_once('/').ok_or_else(invalid)?;
        let mut birth = None;
        let mut survival = None;

        for part in [first, second] {
            let mut chars = part.chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survival,
                _ => return Err(invalid()),
            };
            if slot.is_some() {
                return Err(invalid());
            }

            let mut mask = 0u16;
            for digit in chars {
                let n = digit.to_digit(10).filter(|&n| n <= 8).ok_or_else(invalid)?;
                mask |= 1 << n;
            }
            *slot = Some(mask);
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(LifeLike { birth, survival }),
            _ => Err(invalid()),
        }
    }

    pub fn game_of_life() -> Self {
        LifeLike {
            birth: 1 << 3,
            survival: (1 << 2) | (1 << 3),
        }
    }

    fn born(&self, neighbors: u32) -> bool {
        neighbors <= 8 && self.birth & (1 << neighbors) != 0
    }

    fn survives(&self, neighbors: u32) -> bool {
        neighbors <= 8 && self.survival & (1 << neighbors) != 0
    }
}

impl Rule for LifeLike {
    #[inline]
    fn evaluate(&self, current: bool, neighbors: u32) -> Option<bool> {
        if !current && self.born(neighbors) {
            Some(true)
        } else if current && !self.survives(neighbors) {
            Some(false)
        } else {
            None
        }
    }
}

fn to_mask(counts: &[u32]) -> Result<u16> {
    counts.iter().try_fold(0u16, |mask, &n| {
        if n > 8 {
            Err(AutomatonError::InvalidRule(format!(
                "neighbor count {n} exceeds 8"
            )))
        } else {
            Ok(mask | 1 << n)
        }
    })
}
