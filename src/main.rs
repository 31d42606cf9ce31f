mod api;
mod config;
mod lyrics;
mod translate;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use tracing_subscriber::EnvFilter;

use crate::api::NowPlayingClient;
use crate::api::models::CurrentSong;
use crate::lyrics::{LyricsDocument, LyricsError};
use crate::translate::ScriptTable;

#[derive(Debug, Parser)]
#[command(name = "nowlyrics", version, about = "Now playing + synced lyrics for a self-hosted music server")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current song (default).
    Current,
    /// Print synchronized lyrics.
    Lyrics {
        /// Track to look up; defaults to the current song.
        #[arg(long)]
        track_id: Option<String>,
        /// Convert traditional characters to simplified.
        #[arg(long)]
        simplify: bool,
        /// Print as LRC instead of intervals.
        #[arg(long)]
        lrc: bool,
    },
    /// Dump synchronized lyrics as JSON.
    LyricsJson {
        #[arg(long)]
        track_id: Option<String>,
    },
    /// Print the current song and the lyric line playing right now.
    Now {
        #[arg(long)]
        simplify: bool,
    },
    /// Recover + synchronize a saved lyrics response body ("-" for stdin).
    Recover { path: std::path::PathBuf },

    /// Show or edit the config file.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the config (password hidden).
    Show,
    /// Set the now-playing server URL.
    Server { url: String },
    /// Set the lyrics API URL.
    LyricsUrl { url: String },
    /// Set Basic auth credentials for the now-playing server.
    Credentials { username: String, password: String },
    /// Remove stored credentials.
    ClearCredentials,
    /// Set the traditional → simplified dictionary file (omit to clear).
    Dictionary { path: Option<std::path::PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command.unwrap_or(Command::Current) {
        Command::Current => {
            let client = NowPlayingClient::new(&cfg.server)?;
            let song = client.current_song().await?;
            print_song(&song);
        }
        Command::Lyrics {
            track_id,
            simplify,
            lrc,
        } => {
            let client = NowPlayingClient::new(&cfg.server)?;
            let track_id = resolve_track_id(&client, track_id).await?;
            let Some(doc) = fetch_or_unavailable(&client, &track_id).await? else {
                return Ok(());
            };
            let doc = maybe_simplify(&cfg, simplify, doc)?;
            if lrc {
                print!("{}", doc.to_lrc());
            } else {
                print_lyrics(&doc);
            }
        }
        Command::LyricsJson { track_id } => {
            let client = NowPlayingClient::new(&cfg.server)?;
            let track_id = resolve_track_id(&client, track_id).await?;
            let doc = client.fetch_lyrics(&track_id).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Now { simplify } => {
            let client = NowPlayingClient::new(&cfg.server)?;
            let song = client.current_song().await?;
            print_song(&song);
            if song.track_id.is_empty() {
                return Ok(());
            }
            let Some(doc) = fetch_or_unavailable(&client, &song.track_id).await? else {
                return Ok(());
            };
            let doc = maybe_simplify(&cfg, simplify, doc)?;
            match doc.line_at(song.progress.ms as f64) {
                Some(i) => {
                    let line = &doc.lines[i];
                    println!(
                        "[{}] {}",
                        lyrics::lrc::format_timestamp(line.start_time),
                        line.words
                    );
                }
                None => println!("(instrumental)"),
            }
        }
        Command::Recover { path } => {
            let body = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read stdin")?;
                buf
            } else {
                std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?
            };
            let doc = lyrics::from_body(&body)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Config { cmd } => {
            let mut cfg = cfg;
            match cmd {
                ConfigCommand::Show => {
                    let mut shown = cfg.clone();
                    if shown.server.password.is_some() {
                        shown.server.password = Some("********".to_string());
                    }
                    print!("{}", toml::to_string_pretty(&shown).context("serialize config")?);
                    return Ok(());
                }
                ConfigCommand::Server { url } => cfg.server.now_playing_url = url,
                ConfigCommand::LyricsUrl { url } => cfg.server.lyrics_url = url,
                ConfigCommand::Credentials { username, password } => {
                    cfg.server.username = Some(username);
                    cfg.server.password = Some(password);
                }
                ConfigCommand::ClearCredentials => {
                    cfg.server.username = None;
                    cfg.server.password = None;
                }
                ConfigCommand::Dictionary { path } => cfg.translate.dictionary = path,
            }
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Updated config.");
        }
    }

    Ok(())
}

async fn resolve_track_id(
    client: &NowPlayingClient,
    track_id: Option<String>,
) -> anyhow::Result<String> {
    if let Some(id) = track_id {
        return Ok(id);
    }
    let song = client.current_song().await?;
    if song.track_id.is_empty() {
        anyhow::bail!("nothing is playing");
    }
    Ok(song.track_id)
}

/// `None` when the lyrics server answered without a usable payload.
async fn fetch_or_unavailable(
    client: &NowPlayingClient,
    track_id: &str,
) -> anyhow::Result<Option<LyricsDocument>> {
    match client.fetch_lyrics(track_id).await {
        Ok(doc) if doc.error => {
            println!("lyrics unavailable");
            Ok(None)
        }
        Ok(doc) => Ok(Some(doc)),
        Err(e) if matches!(e.downcast_ref::<LyricsError>(), Some(LyricsError::PayloadNotFound)) => {
            tracing::warn!(track_id, "lyrics payload not found");
            println!("lyrics unavailable");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn maybe_simplify(
    cfg: &config::Config,
    simplify: bool,
    doc: LyricsDocument,
) -> anyhow::Result<LyricsDocument> {
    if !simplify {
        return Ok(doc);
    }
    let path = cfg
        .translate
        .dictionary
        .as_deref()
        .context("--simplify needs translate.dictionary in the config")?;
    let table = ScriptTable::load(path)?;
    Ok(table.convert_document(&doc))
}

fn print_song(song: &CurrentSong) {
    if song.track_id.is_empty() && song.name.is_empty() {
        println!("Nothing playing.");
        return;
    }
    let artists = if song.artists.is_empty() {
        "".to_string()
    } else {
        format!(" - {}", song.artists.join(", "))
    };
    let state = if song.is_playing { "playing" } else { "paused" };
    println!(
        "{state} {}{}  [{}/{}]  (track_id={})",
        song.name, artists, song.progress.mmss, song.duration.mmss, song.track_id
    );
}

fn print_lyrics(doc: &LyricsDocument) {
    if doc.is_empty() {
        println!("(no lyrics lines, sync type {})", doc.sync_type);
        return;
    }
    for line in &doc.lines {
        println!(
            "[{} -> {}] {}",
            lyrics::lrc::format_timestamp(line.start_time),
            lyrics::lrc::format_timestamp(line.end_time),
            line.words
        );
    }
}
