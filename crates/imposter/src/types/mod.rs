mod player_id;
mod session_id;

pub use player_id::PlayerId;
pub use session_id::SessionId;
