use backgammon_core::player::Player;
use clap::ValueEnum;

/// Who controls each side in the terminal game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameMode {
    /// Human plays White, AI plays Black
    HumanVsAi,
    /// AI plays White, Human plays Black
    AiVsHuman,
    /// AI plays both sides
    AiVsAi,
    /// Human plays both sides
    HumanVsHuman,
}

impl GameMode {
    /// Returns whether the AI acts for `player`.
    pub fn is_ai(self, player: Player) -> bool {
        matches!(
            (self, player),
            (GameMode::HumanVsAi, Player::Black)
                | (GameMode::AiVsHuman, Player::White)
                | (GameMode::AiVsAi, _)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::HumanVsAi => "Human vs AI",
            GameMode::AiVsHuman => "AI vs Human",
            GameMode::AiVsAi => "AI vs AI",
            GameMode::HumanVsHuman => "Human vs Human",
        }
    }
}
