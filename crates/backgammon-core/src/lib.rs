pub mod ai;
pub mod config;
pub mod constants;
pub mod cube;
pub mod dice;
pub mod error;
pub mod eval;
pub mod game_state;
pub mod level;
pub mod match_state;
pub mod move_list;
pub mod perft;
pub mod player;
pub mod position;
pub mod presets;
pub mod scoring;
pub mod session;
