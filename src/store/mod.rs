pub mod actions;
pub mod state;
pub mod transitions;

pub use state::{AppState, FavCaches, LoginState, LoopMode, PlayQueue, PlaylistSnapshot};
