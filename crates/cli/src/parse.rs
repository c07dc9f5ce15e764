//! Parsing helpers for REPL commands.

use backgammon_core::constants::BAR_PIP;
use backgammon_core::scoring::WinKind;

/// Parses a move in standard notation into `(from_pip, to_pip)`.
///
/// Accepts `13/8`, `13-8`, `bar/22`, `4/off` and an optional trailing `*`
/// for hits. The bar is pip 25 and the off tray pip 0.
pub fn parse_move(input: &str) -> Result<(u8, u8), String> {
    let input = input.trim().trim_end_matches('*');
    let (from, to) = input
        .split_once(['/', '-'])
        .ok_or_else(|| format!("Expected a move like 13/8, got '{input}'"))?;

    let from = match from.to_ascii_lowercase().as_str() {
        "bar" | "b" => BAR_PIP,
        pip => parse_pip(pip)?,
    };
    let to = match to.to_ascii_lowercase().as_str() {
        "off" | "o" => 0,
        pip => parse_pip(pip)?,
    };
    if to >= from {
        return Err(format!("Checkers move toward lower points: {from}/{to}"));
    }
    Ok((from, to))
}

fn parse_pip(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(pip) if (1..=24).contains(&pip) => Ok(pip),
        _ => Err(format!("Invalid point: '{s}'")),
    }
}

/// Parses a resignation value; no argument means a single game.
pub fn parse_win_kind(input: Option<&str>) -> Result<WinKind, String> {
    match input.map(str::to_ascii_lowercase).as_deref() {
        None | Some("single") | Some("s") | Some("1") => Ok(WinKind::Single),
        Some("gammon") | Some("g") | Some("2") => Ok(WinKind::Gammon),
        Some("backgammon") | Some("bg") | Some("3") => Ok(WinKind::Backgammon),
        Some(other) => Err(format!("Unknown resignation value: '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_valid() {
        assert_eq!(parse_move("13/8").unwrap(), (13, 8));
        assert_eq!(parse_move("24-18").unwrap(), (24, 18));
        assert_eq!(parse_move("bar/22*").unwrap(), (25, 22));
        assert_eq!(parse_move("BAR/20").unwrap(), (25, 20));
        assert_eq!(parse_move("4/off").unwrap(), (4, 0));
    }

    #[test]
    fn test_parse_move_invalid() {
        assert!(parse_move("").is_err());
        assert!(parse_move("13").is_err());
        assert!(parse_move("8/13").is_err());
        assert!(parse_move("30/24").is_err());
        assert!(parse_move("off/3").is_err());
    }

    #[test]
    fn test_parse_win_kind() {
        assert_eq!(parse_win_kind(None).unwrap(), WinKind::Single);
        assert_eq!(parse_win_kind(Some("Gammon")).unwrap(), WinKind::Gammon);
        assert_eq!(parse_win_kind(Some("bg")).unwrap(), WinKind::Backgammon);
        assert!(parse_win_kind(Some("triple")).is_err());
    }
}
