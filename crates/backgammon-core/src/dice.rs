//! Dice rolls and per-die usage tracking.

use std::fmt;

use arrayvec::ArrayVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DIE_FACES, MAX_PLAY_MOVES};
use crate::error::DiceError;

/// A roll of two dice together with the values still left to play.
///
/// Doubles expand to four playable values, other rolls to two.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    values: [u8; 2],
    remaining: ArrayVec<u8, MAX_PLAY_MOVES>,
}

impl Dice {
    /// Creates a roll from two die faces.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::OutOfRange`] if a value is not in 1..=6.
    pub fn new(first: u8, second: u8) -> Result<Self, DiceError> {
        for value in [first, second] {
            if !(1..=DIE_FACES).contains(&value) {
                return Err(DiceError::OutOfRange(value));
            }
        }
        Ok(Self::from_faces(first, second))
    }

    fn from_faces(first: u8, second: u8) -> Self {
        let mut remaining = ArrayVec::new();
        if first == second {
            remaining.extend([first; MAX_PLAY_MOVES]);
        } else {
            // Higher die first so generation order is stable.
            remaining.push(first.max(second));
            remaining.push(first.min(second));
        }

        Self {
            values: [first, second],
            remaining,
        }
    }

    /// Rolls two fair dice.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = roll_die(rng);
        let second = roll_die(rng);
        Self::from_faces(first, second)
    }

    /// The two faces as rolled.
    #[inline]
    pub fn values(&self) -> (u8, u8) {
        (self.values[0], self.values[1])
    }

    /// Returns `true` if both faces match.
    #[inline]
    pub fn is_double(&self) -> bool {
        self.values[0] == self.values[1]
    }

    /// Number of die values this roll allows in total (4 for doubles, else 2).
    #[inline]
    pub fn playable_count(&self) -> usize {
        if self.is_double() { 4 } else { 2 }
    }

    /// Die values not yet played.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    /// Returns `true` when every die value has been played.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Marks one die of value `die` as used.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::NotAvailable`] if no unused die shows `die`.
    pub fn consume(&mut self, die: u8) -> Result<(), DiceError> {
        let pos = self
            .remaining
            .iter()
            .position(|&d| d == die)
            .ok_or(DiceError::NotAvailable(die))?;
        self.remaining.remove(pos);
        Ok(())
    }

    /// Returns a used die of value `die` to the unused set.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::NotAvailable`] if `die` was never part of this
    /// roll or all of its dice are already unused.
    pub fn restore(&mut self, die: u8) -> Result<(), DiceError> {
        let used = self.expanded().iter().filter(|&&d| d == die).count();
        let unused = self.remaining.iter().filter(|&&d| d == die).count();
        if unused >= used {
            return Err(DiceError::NotAvailable(die));
        }
        self.remaining.push(die);
        self.remaining.sort_unstable_by(|a, b| b.cmp(a));
        Ok(())
    }

    /// Checks that the faces are in range and the unused values belong to
    /// this roll.
    pub fn validate(&self) -> Result<(), DiceError> {
        let fresh = Self::new(self.values[0], self.values[1])?;
        let mut pool: ArrayVec<u8, MAX_PLAY_MOVES> = fresh.remaining;
        for &die in &self.remaining {
            let pos = pool
                .iter()
                .position(|&d| d == die)
                .ok_or(DiceError::NotAvailable(die))?;
            pool.remove(pos);
        }
        Ok(())
    }

    fn expanded(&self) -> ArrayVec<u8, MAX_PLAY_MOVES> {
        let mut all = ArrayVec::new();
        if self.is_double() {
            all.extend([self.values[0]; MAX_PLAY_MOVES]);
        } else {
            all.extend(self.values);
        }
        all
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.values[0], self.values[1])
    }
}

/// Rolls a single die.
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(1..=DIE_FACES)
}

/// All 21 distinct rolls with the number of the 36 outcomes each represents.
pub fn all_rolls() -> impl Iterator<Item = (Dice, u32)> {
    (1..=DIE_FACES).flat_map(|high| {
        (1..=high).map(move |low| {
            let weight = if high == low { 1 } else { 2 };
            (Dice::from_faces(high, low), weight)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_doubles_expand_to_four() {
        for face in 1..=6 {
            let dice = Dice::new(face, face).unwrap();
            assert!(dice.is_double());
            assert_eq!(dice.remaining(), &[face; 4]);
            assert_eq!(dice.playable_count(), 4);
        }
    }

    #[test]
    fn test_non_doubles_expand_to_two() {
        let dice = Dice::new(3, 5).unwrap();
        assert!(!dice.is_double());
        assert_eq!(dice.remaining(), &[5, 3]);
        assert_eq!(dice.playable_count(), 2);
        assert_eq!(dice.values(), (3, 5));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Dice::new(0, 3), Err(DiceError::OutOfRange(0)));
        assert_eq!(Dice::new(3, 7), Err(DiceError::OutOfRange(7)));
    }

    #[test]
    fn test_consume_and_restore() {
        let mut dice = Dice::new(4, 4).unwrap();
        dice.consume(4).unwrap();
        dice.consume(4).unwrap();
        assert_eq!(dice.remaining().len(), 2);
        assert_eq!(dice.consume(3), Err(DiceError::NotAvailable(3)));

        dice.restore(4).unwrap();
        assert_eq!(dice.remaining().len(), 3);
        dice.restore(4).unwrap();
        assert_eq!(dice.restore(4), Err(DiceError::NotAvailable(4)));
    }

    #[test]
    fn test_restore_keeps_descending_order() {
        let mut dice = Dice::new(2, 6).unwrap();
        dice.consume(6).unwrap();
        dice.restore(6).unwrap();
        assert_eq!(dice.remaining(), &[6, 2]);
    }

    #[test]
    fn test_roll_is_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (a, b) = Dice::roll(&mut rng).values();
            assert!((1..=6).contains(&a));
            assert!((1..=6).contains(&b));
        }
    }

    #[test]
    fn test_all_rolls_cover_36_outcomes() {
        let rolls: Vec<_> = all_rolls().collect();
        assert_eq!(rolls.len(), 21);
        assert_eq!(rolls.iter().map(|(_, w)| w).sum::<u32>(), 36);
    }

    #[test]
    fn test_validate() {
        let mut dice = Dice::new(6, 1).unwrap();
        assert!(dice.validate().is_ok());
        dice.remaining.push(6);
        assert!(dice.validate().is_err());
    }
}
