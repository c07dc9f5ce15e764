//! The doubling cube.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_MAX_CUBE_VALUE;
use crate::error::CubeError;
use crate::player::Player;

/// A double that awaits acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDouble {
    pub offered_by: Player,
    /// Cube value if the double is accepted.
    pub value: u32,
}

/// Doubling cube state for one game.
///
/// The cube starts centered at 1. After an accepted double the accepting
/// player owns it and is the only one who may redouble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublingCube {
    value: u32,
    owner: Option<Player>,
    enabled: bool,
    pending: Option<PendingDouble>,
    max_value: u32,
}

impl Default for DoublingCube {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_CUBE_VALUE)
    }
}

impl DoublingCube {
    /// Creates a centered cube at value 1.
    pub fn new(enabled: bool, max_value: u32) -> Self {
        Self {
            value: 1,
            owner: None,
            enabled,
            pending: None,
            max_value,
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The owning player, `None` while centered.
    #[inline]
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    #[inline]
    pub fn is_centered(&self) -> bool {
        self.owner.is_none()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    #[inline]
    pub fn pending(&self) -> Option<PendingDouble> {
        self.pending
    }

    /// Checks whether `player` may offer a double right now.
    ///
    /// Phase and Crawford restrictions are checked by the game state.
    pub fn can_double(&self, player: Player) -> Result<(), CubeError> {
        if !self.enabled {
            return Err(CubeError::Disabled);
        }
        if self.pending.is_some() {
            return Err(CubeError::AlreadyPending);
        }
        if self.owner.is_some_and(|owner| owner != player) {
            return Err(CubeError::NotOwner(player));
        }
        self.doubled_value()?;
        Ok(())
    }

    fn doubled_value(&self) -> Result<u32, CubeError> {
        self.value
            .checked_mul(2)
            .filter(|&doubled| doubled <= self.max_value)
            .ok_or(CubeError::MaxValue(self.max_value))
    }

    /// Offers a double on behalf of `player`.
    pub fn offer(&mut self, player: Player) -> Result<PendingDouble, CubeError> {
        self.can_double(player)?;
        let pending = PendingDouble {
            offered_by: player,
            value: self.doubled_value()?,
        };
        self.pending = Some(pending);
        debug!(%player, value = pending.value, "double offered");
        Ok(pending)
    }

    /// Accepts the pending double; the cube doubles and passes to the
    /// accepting player.
    pub fn accept(&mut self) -> Result<u32, CubeError> {
        let pending = self.pending.take().ok_or(CubeError::NoPendingOffer)?;
        self.value = pending.value;
        self.owner = Some(pending.offered_by.opposite());
        debug!(owner = %pending.offered_by.opposite(), value = self.value, "double accepted");
        Ok(self.value)
    }

    /// Declines the pending double. The cube value is left unchanged.
    pub fn decline(&mut self) -> Result<PendingDouble, CubeError> {
        let pending = self.pending.take().ok_or(CubeError::NoPendingOffer)?;
        debug!(declined_by = %pending.offered_by.opposite(), value = self.value, "double declined");
        Ok(pending)
    }

    /// Drops a pending offer without resolving it.
    pub(crate) fn clear_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_range_cube_cannot_double() {
        let top = 1 << 31;
        let mut cube = DoublingCube::new(true, top);
        cube.value = top;
        assert_eq!(cube.can_double(Player::White), Err(CubeError::MaxValue(top)));
        assert_eq!(cube.offer(Player::White), Err(CubeError::MaxValue(top)));
        assert!(cube.pending().is_none());
    }

    #[test]
    fn test_centered_cube_can_be_offered_by_either() {
        let cube = DoublingCube::default();
        assert!(cube.is_centered());
        assert!(cube.can_double(Player::White).is_ok());
        assert!(cube.can_double(Player::Black).is_ok());
    }

    #[test]
    fn test_accept_transfers_ownership() {
        let mut cube = DoublingCube::default();
        cube.offer(Player::White).unwrap();
        assert_eq!(cube.can_double(Player::Black), Err(CubeError::AlreadyPending));
        assert_eq!(cube.accept(), Ok(2));
        assert_eq!(cube.owner(), Some(Player::Black));
        assert_eq!(cube.can_double(Player::White), Err(CubeError::NotOwner(Player::White)));
        assert!(cube.can_double(Player::Black).is_ok());

        cube.offer(Player::Black).unwrap();
        assert_eq!(cube.accept(), Ok(4));
        assert_eq!(cube.owner(), Some(Player::White));
    }

    #[test]
    fn test_decline_keeps_value() {
        let mut cube = DoublingCube::default();
        cube.offer(Player::Black).unwrap();
        let pending = cube.decline().unwrap();
        assert_eq!(pending.offered_by, Player::Black);
        assert_eq!(cube.value(), 1);
        assert!(cube.is_centered());
    }

    #[test]
    fn test_no_pending_offer() {
        let mut cube = DoublingCube::default();
        assert_eq!(cube.accept(), Err(CubeError::NoPendingOffer));
        assert_eq!(cube.decline(), Err(CubeError::NoPendingOffer));
    }

    #[test]
    fn test_max_value_and_disabled() {
        let mut cube = DoublingCube::new(true, 2);
        cube.offer(Player::White).unwrap();
        cube.accept().unwrap();
        assert_eq!(cube.can_double(Player::Black), Err(CubeError::MaxValue(2)));

        let disabled = DoublingCube::new(false, 64);
        assert_eq!(disabled.can_double(Player::White), Err(CubeError::Disabled));
    }
}
