//! Move-generation tree counting for testing and benchmarking.

use crate::dice;
use crate::move_list::PlayList;
use crate::player::Player;
use crate::position::Position;

/// Executes a perft run starting from the standard initial position with
/// white to move.
///
/// # Arguments
///
/// * `depth` - Number of turns to expand. Every turn branches over the 21
///   distinct rolls and then over the distinct plays of each roll.
///
/// # Returns
///
/// The number of leaf nodes visited.
pub fn perft_root(depth: u32) -> u64 {
    perft(&Position::new(), Player::White, depth)
}

/// Counts leaf nodes of the roll/play tree below `pos` with `player` to move.
///
/// A roll with no legal play counts as a single pass. Finished games are
/// leaves regardless of the remaining depth.
pub fn perft(pos: &Position, player: Player, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for (roll, _) in dice::all_rolls() {
        let plays = PlayList::new(pos, player, roll.remaining());
        if plays.is_empty() {
            nodes += perft(pos, player.opposite(), depth - 1);
            continue;
        }

        if depth == 1 {
            nodes += plays.len() as u64;
            continue;
        }
        for play in &plays {
            if play.result.winner().is_some() {
                nodes += 1;
            } else {
                nodes += perft(&play.result, player.opposite(), depth - 1);
            }
        }
    }
    nodes
}
