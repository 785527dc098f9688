//! Injectable randomness
//!
//! Every random draw in the engines goes through [`Roller`]. Production code
//! uses the seeded [`GameRng`]; tests script exact draws with
//! [`ScriptedRoller`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of die rolls and uniform draws
pub trait Roller {
    /// Uniform integer in `1..=sides`; 0 when `sides` is 0
    fn roll(&mut self, sides: u32) -> u32;

    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f64;

    #[inline]
    fn d20(&mut self) -> u32 {
        self.roll(20)
    }

    /// Sum of `count` dice with `sides` faces
    fn dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll(sides)).sum()
    }

    /// True with probability `p`
    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index into a list of `len` items; 0 when `len` is 0
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.roll(len as u32) - 1) as usize
    }
}

impl<R: Roller + ?Sized> Roller for &mut R {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

/// Seeded game RNG backed by ChaCha8
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seeded when `seed` is given, random otherwise
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map(Self::new).unwrap_or_else(Self::from_entropy)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Roller for GameRng {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Roller that replays scripted draws, then falls back to a seeded RNG
///
/// Scripted rolls are clamped to the requested die so a script written for
/// a d20 cannot produce an impossible d6.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    rolls: VecDeque<u32>,
    units: VecDeque<f64>,
    fallback: GameRng,
}

impl ScriptedRoller {
    pub fn new(rolls: impl IntoIterator<Item = u32>, units: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            units: units.into_iter().collect(),
            fallback: GameRng::new(0),
        }
    }

    pub fn rolls(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self::new(rolls, std::iter::empty())
    }

    pub fn push_roll(&mut self, value: u32) -> &mut Self {
        self.rolls.push_back(value);
        self
    }

    pub fn push_unit(&mut self, value: f64) -> &mut Self {
        self.units.push_back(value);
        self
    }

    /// Scripted draws not yet consumed, as (rolls, units)
    pub fn remaining(&self) -> (usize, usize) {
        (self.rolls.len(), self.units.len())
    }
}

impl Roller for ScriptedRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        match self.rolls.pop_front() {
            Some(value) => value.clamp(1, sides),
            None => self.fallback.roll(sides),
        }
    }

    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(value) => value.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.fallback.unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let rolls_a: Vec<u32> = (0..20).map(|_| a.d20()).collect();
        let rolls_b: Vec<u32> = (0..20).map(|_| b.d20()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_zero_sides() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.roll(0), 0);
        assert_eq!(rng.pick(0), 0);
    }

    #[test]
    fn test_scripted_rolls_in_order() {
        let mut roller = ScriptedRoller::new([20, 1, 7], [0.25]);
        assert_eq!(roller.d20(), 20);
        assert_eq!(roller.d20(), 1);
        assert_eq!(roller.roll(6), 6); // 7 clamped to a d6
        assert_eq!(roller.unit(), 0.25);
        assert_eq!(roller.remaining(), (0, 0));
    }

    #[test]
    fn test_scripted_pick_and_chance() {
        let mut roller = ScriptedRoller::new([2], [0.39, 0.41]);
        assert_eq!(roller.pick(3), 1);
        assert!(roller.chance(0.4));
        assert!(!roller.chance(0.4));
    }

    fn two_d6<R: Roller>(mut roller: R) -> u32 {
        roller.dice(2, 6)
    }

    #[test]
    fn test_roller_through_mut_ref() {
        let mut roller = ScriptedRoller::rolls([3, 4, 5]);
        assert_eq!(two_d6(&mut roller), 7);
        assert_eq!(roller.remaining(), (1, 0));
    }
}
