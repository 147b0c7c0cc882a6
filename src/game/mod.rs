pub mod constants;
pub mod events;
pub mod game_loop;
pub mod match_result;
pub mod state;
pub mod systems;
