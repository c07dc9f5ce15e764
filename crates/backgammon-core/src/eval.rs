//! Heuristic position evaluation for the AI.
//!
//! Positions are scored from one player's point of view by a weighted sum
//! of hand-picked features. Larger is better for that player.

use crate::constants::{BAR_PIP, CHECKERS_PER_PLAYER, DIE_FACES, NUM_POINTS};
use crate::level::Weights;
use crate::player::Player;
use crate::position::Position;

/// Pips the player on roll is treated as being ahead by.
const ON_ROLL_PIPS: f32 = 4.0;

/// Slope of the race win-probability curve over the relative pip lead.
const RACE_SLOPE: f32 = 11.0;

/// Score of a won game; far above any heuristic score.
pub const WIN_SCORE: f32 = 1000.0;

/// Position features from one player's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Features {
    /// Opponent pip count minus own pip count.
    pub pip_lead: i32,
    /// Fraction of the 36 opponent rolls that hit at least one own blot.
    pub exposure: f32,
    /// Points holding two or more own checkers.
    pub made_points: u8,
    /// Made points inside the own home board.
    pub home_points: u8,
    /// Longest run of consecutive made points.
    pub prime: u8,
    /// Made points inside the opponent's home board.
    pub anchors: u8,
    pub opponent_bar: u8,
    pub own_bar: u8,
    pub borne_off: u8,
    /// Checkers of the two sides can still meet.
    pub contact: bool,
}

impl Features {
    /// Extracts the features of `pos` for `player`.
    pub fn extract(pos: &Position, player: Player) -> Self {
        let opponent = player.opposite();
        let contact = pos.has_contact();

        let mut made_points = 0;
        let mut home_points = 0;
        let mut anchors = 0;
        let mut prime = 0;
        let mut run = 0;
        for idx in 0..NUM_POINTS {
            if pos.count(idx, player) >= 2 {
                made_points += 1;
                if player.is_home(idx) {
                    home_points += 1;
                }
                if opponent.is_home(idx) {
                    anchors += 1;
                }
                run += 1;
                prime = prime.max(run);
            } else {
                run = 0;
            }
        }

        Features {
            pip_lead: pos.pip_count(opponent) as i32 - pos.pip_count(player) as i32,
            exposure: if contact { exposure(pos, player) } else { 0.0 },
            made_points,
            home_points,
            prime,
            anchors,
            opponent_bar: pos.bar(opponent),
            own_bar: pos.bar(player),
            borne_off: pos.off(player),
            contact,
        }
    }
}

/// Scores `pos` for `player` with the given weights.
///
/// With `race` set only the pip lead and borne-off checkers count; blots
/// cannot be hit once the sides have passed each other.
pub fn evaluate(pos: &Position, player: Player, weights: &Weights, race: bool) -> f32 {
    if pos.off(player) == CHECKERS_PER_PLAYER {
        return WIN_SCORE;
    }
    if pos.off(player.opposite()) == CHECKERS_PER_PLAYER {
        return -WIN_SCORE;
    }

    let f = Features::extract(pos, player);
    let race_score = weights.pip * f.pip_lead as f32 + weights.borne_off * f.borne_off as f32;
    if race || !f.contact {
        return race_score;
    }

    race_score
        + weights.exposure * f.exposure
        + weights.made_point * f.made_points as f32
        + weights.home_point * f.home_points as f32
        + weights.prime * f.prime as f32
        + weights.anchor * f.anchors as f32
        + weights.opponent_bar * f.opponent_bar as f32
        + weights.own_bar * f.own_bar as f32
}

/// Rough chance that `player`, on roll, wins the game from `pos`.
///
/// A logistic curve over the relative pip lead, shifted by bar checkers,
/// home-board strength and primes while contact remains.
pub fn win_probability(pos: &Position, player: Player) -> f32 {
    if pos.off(player) == CHECKERS_PER_PLAYER {
        return 1.0;
    }
    if pos.off(player.opposite()) == CHECKERS_PER_PLAYER {
        return 0.0;
    }

    let mine = pos.pip_count(player) as f32;
    let theirs = pos.pip_count(player.opposite()) as f32;
    let lead = (theirs - mine + ON_ROLL_PIPS) / mine.max(theirs).max(1.0);
    let mut x = RACE_SLOPE * lead;

    if pos.has_contact() {
        let own = Features::extract(pos, player);
        let other = Features::extract(pos, player.opposite());
        x += 0.4 * (own.opponent_bar as f32 - own.own_bar as f32);
        x += 0.15 * (own.home_points as f32 - other.home_points as f32);
        x += 0.1 * (own.prime as f32 - other.prime as f32);
        x -= 1.5 * (own.exposure - other.exposure);
    }
    1.0 / (1.0 + (-x).exp())
}

/// Fraction of opponent rolls that hit at least one of `player`'s blots.
///
/// Intermediate landing points of combination shots are not checked for
/// blocks, and checkers of an opponent on the bar still count as shooters.
pub fn exposure(pos: &Position, player: Player) -> f32 {
    let opponent = player.opposite();

    // Bit d set when some blot sits d pips in front of some shooter.
    let mut distances: u32 = 0;
    for blot in (0..NUM_POINTS).filter(|&idx| pos.count(idx, player) == 1) {
        let target = opponent.pip_of(blot);
        if pos.bar(opponent) > 0 {
            distances |= 1 << (BAR_PIP - target);
        }
        for idx in (0..NUM_POINTS).filter(|&idx| pos.count(idx, opponent) > 0) {
            let source = opponent.pip_of(idx);
            if source > target {
                distances |= 1 << (source - target);
            }
        }
    }
    if distances == 0 {
        return 0.0;
    }

    let mut hits = 0;
    for d1 in 1..=DIE_FACES {
        for d2 in 1..=DIE_FACES {
            let reach: &[u8] = if d1 == d2 {
                &[d1, d1 * 2, d1 * 3, d1 * 4]
            } else {
                &[d1, d2, d1 + d2]
            };
            if reach.iter().any(|&d| distances & (1 << d) != 0) {
                hits += 1;
            }
        }
    }
    hits as f32 / 36.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Personality, get_weights};

    #[test]
    fn test_start_is_symmetric() {
        let pos = Position::new();
        let white = Features::extract(&pos, Player::White);
        let black = Features::extract(&pos, Player::Black);
        assert_eq!(white, black);
        assert_eq!(white.pip_lead, 0);
        assert_eq!(white.made_points, 4);
        assert_eq!(white.home_points, 1);
        assert_eq!(white.anchors, 1);
        assert_eq!(white.exposure, 0.0);
        assert!(white.contact);
    }

    #[test]
    fn test_direct_shot_exposure() {
        // White blot on pip 10 is black's pip 15; black has a shooter on 21.
        let pos = Position::from_pips(&[(10, 1), (6, 14)], &[(21, 1), (1, 14)]).unwrap();
        let shots = exposure(&pos, Player::White);
        // Any 6, 5-1, 4-2, 3-3, 2-2: 11 + 2 + 2 + 1 + 1 = 17.
        assert_eq!(shots, 17.0 / 36.0);
    }

    #[test]
    fn test_no_exposure_without_contact() {
        let pos = Position::from_pips(&[(3, 1), (2, 14)], &[(3, 1), (2, 14)]).unwrap();
        assert!(!pos.has_contact());
        let f = Features::extract(&pos, Player::White);
        assert_eq!(f.exposure, 0.0);
    }

    #[test]
    fn test_race_prefers_pip_lead() {
        let weights = get_weights(Personality::Balanced);
        let ahead = Position::from_pips(&[(2, 15)], &[(6, 15)]).unwrap();
        let behind = Position::from_pips(&[(6, 15)], &[(2, 15)]).unwrap();
        assert!(
            evaluate(&ahead, Player::White, &weights, true)
                > evaluate(&behind, Player::White, &weights, true)
        );
    }

    #[test]
    fn test_hitting_is_valued() {
        let weights = get_weights(Personality::Aggressive);
        let quiet = Position::from_pips(&[(6, 15)], &[(20, 15)]).unwrap();
        let hit = Position::from_pips(&[(6, 15)], &[(25, 1), (20, 14)]).unwrap();
        assert!(
            evaluate(&hit, Player::White, &weights, false)
                > evaluate(&quiet, Player::White, &weights, false)
        );
    }

    #[test]
    fn test_win_probability() {
        let start = Position::new();
        let p = win_probability(&start, Player::White);
        assert!(p > 0.5 && p < 0.7);

        let crushing = Position::from_pips(&[(1, 2)], &[(6, 15)]).unwrap();
        assert!(win_probability(&crushing, Player::White) > 0.95);
        assert!(win_probability(&crushing, Player::Black) < 0.05);

        let won = Position::from_pips(&[], &[(6, 15)]).unwrap();
        assert_eq!(win_probability(&won, Player::White), 1.0);
    }
}
