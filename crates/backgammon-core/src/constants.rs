//! Global constants

/// Number of points on the board.
pub const NUM_POINTS: usize = 24;

/// Checkers each player owns.
pub const CHECKERS_PER_PLAYER: u8 = 15;

/// Number of points in a home board.
pub const HOME_POINTS: usize = 6;

/// Pip distance of a checker on the bar.
pub const BAR_PIP: u8 = 25;

/// Largest face of a die.
pub const DIE_FACES: u8 = 6;

/// Maximum number of moves in one play (doubles).
pub const MAX_PLAY_MOVES: usize = 4;

/// Highest value the doubling cube may reach by default.
pub const DEFAULT_MAX_CUBE_VALUE: u32 = 64;
