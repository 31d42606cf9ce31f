use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the now-playing server (`/playback/current` is appended).
    pub now_playing_url: String,
    /// Base URL of the lyrics API (`/?trackid=...` is appended).
    pub lyrics_url: String,
    /// Basic auth user for the now-playing server.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct TranslateConfig {
    /// Traditional → simplified dictionary (OpenCC `TSCharacters.txt` format).
    pub dictionary: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            now_playing_url: "http://localhost:8888".to_string(),
            lyrics_url: "http://localhost:8080".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
        }
    }
}

fn write_private(path: &Path, raw: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    // holds credentials
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

/// Explicit `--config` path, else the platform config dir.
fn resolve_path(override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Write the config, creating parent dirs.
pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve_path(override_path)?;
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    write_private(&path, &raw)
}

/// `<config dir>/nowlyrics/config.toml`
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "nowlyrics", "nowlyrics").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Read the config; a missing file is created with defaults.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_path(override_path)?;

    if !path.exists() {
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        write_private(&path, &raw)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
