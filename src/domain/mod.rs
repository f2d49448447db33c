pub mod model;

pub use model::{PlaylistMeta, Quality, SongIds, Track, UserInfo};
