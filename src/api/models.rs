use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamp {
    pub ms: u64,
    pub seconds: u64,
    pub mmss: String,
}

/// `GET /playback/current` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentSong {
    pub track_id: String,
    pub track_uri: String,
    pub song: String,
    pub name: String,
    pub artists: Vec<String>,
    pub progress: Timestamp,
    pub duration: Timestamp,
    pub is_playing: bool,
}
