//! Command handlers shared by one-shot invocation and the interactive shell.
//!
//! Every mutating handler confirms what it did with a single
//! `<player>: <outcome>` line on stdout; read-only handlers print a listing.
//! Failures bubble up as `anyhow` errors carrying the step that failed.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::warn;

use bluos_api::{Endpoint, Player};
use bluos_discovery::{Browser, DiscoveredPlayer};

use crate::settings::Settings;

/// Default step for volume nudges, in volume points.
pub const VOLUME_STEP: i32 = 5;

/// The player a command talks to, with the label used in confirmations.
pub struct Target {
    pub player: Player,
    pub label: String,
}

impl Target {
    /// Resolve the target player.
    ///
    /// An explicit `--player HOST[:PORT]` wins; otherwise the stored
    /// selection is used, labeled with its stored display name.
    pub fn resolve(address: Option<&str>, settings: &Settings) -> Result<Self> {
        let (endpoint, label) = match address {
            Some(address) => {
                let endpoint: Endpoint = address
                    .parse()
                    .with_context(|| format!("invalid player address '{}'", address))?;
                let label = endpoint.to_string();
                (endpoint, label)
            }
            None => {
                let endpoint = settings.endpoint()?;
                let label = settings
                    .name
                    .clone()
                    .unwrap_or_else(|| endpoint.to_string());
                (endpoint, label)
            }
        };
        Ok(Self {
            player: Player::new(endpoint),
            label,
        })
    }
}

/// Show who the player is and what it is doing.
pub fn status(target: &Target, json: bool) -> Result<()> {
    let sync = target
        .player
        .sync_status()
        .context("could not read the player identity")?;
    let status = target
        .player
        .status()
        .context("could not read the player status")?;

    if json {
        let payload = serde_json::json!({ "player": sync, "status": status });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let name = sync.name().unwrap_or(target.label.as_str());
    let hardware: Vec<&str> = [sync.brand(), sync.model()].into_iter().flatten().collect();
    if hardware.is_empty() {
        println!("{}", name);
    } else {
        println!("{} ({})", name, hardware.join(" "));
    }

    let line = status.now_playing();
    if line.is_empty() {
        println!("  nothing playing");
    } else {
        println!("  {}", line);
    }
    if let Some(state) = status.state() {
        println!("  state   {}", state);
    }
    if let Ok(level) = status.volume() {
        println!("  volume  {}", level);
    }
    Ok(())
}

/// Resume playback, or start playing a stream URL.
pub fn play(target: &Target, url: Option<&str>) -> Result<()> {
    match url {
        Some(url) => {
            target
                .player
                .play_url(url)
                .with_context(|| format!("could not play '{}'", url))?;
            println!("{}: playing {}", target.label, url);
        }
        None => {
            target.player.play().context("could not resume playback")?;
            println!("{}: playing", target.label);
        }
    }
    Ok(())
}

/// Pause playback.
pub fn pause(target: &Target) -> Result<()> {
    target.player.pause().context("could not pause playback")?;
    println!("{}: paused", target.label);
    Ok(())
}

/// Pause when the player is playing, resume otherwise.
pub fn toggle(target: &Target) -> Result<()> {
    let status = target
        .player
        .status()
        .context("could not read the player status")?;
    if matches!(status.state(), Some("play" | "stream")) {
        pause(target)
    } else {
        play(target, None)
    }
}

/// Jump to the next track.
pub fn skip(target: &Target) -> Result<()> {
    target.player.skip().context("could not skip forward")?;
    println!("{}: next track", target.label);
    Ok(())
}

/// Jump back to the previous track.
pub fn back(target: &Target) -> Result<()> {
    target.player.back().context("could not skip back")?;
    println!("{}: previous track", target.label);
    Ok(())
}

/// Set the volume to an absolute level.
pub fn volume_set(target: &Target, level: i32) -> Result<()> {
    target
        .player
        .set_volume(level)
        .context("could not set the volume")?;
    println!("{}: volume {}", target.label, level);
    Ok(())
}

/// Nudge the volume by `delta` points, clamped to the player's range.
pub fn volume_nudge(target: &Target, delta: i32) -> Result<()> {
    let current = target
        .player
        .volume()
        .context("could not read the current volume")?;
    volume_set(target, nudged(current, delta))
}

fn nudged(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).clamp(0, 100)
}

/// Print the local-music album catalog.
pub fn albums(target: &Target, refresh: bool, json: bool) -> Result<()> {
    let albums = if refresh {
        target.player.refresh_albums()
    } else {
        target.player.albums()
    }
    .context("could not build the album catalog")?;

    if json {
        println!("{}", serde_json::to_string_pretty(albums.as_ref())?);
        return Ok(());
    }
    println!("{}: {} albums", target.label, albums.len());
    for album in albums.iter() {
        println!("  {} - {}", album.artist, album.title);
    }
    Ok(())
}

/// Find one album in the catalog and queue it for playback.
pub fn album(target: &Target, query: &str) -> Result<()> {
    let album = target
        .player
        .find_album(query)
        .context("could not resolve the album")?;
    target
        .player
        .queue_album(&album)
        .context("could not queue the album")?;
    println!("{}: queued {} - {}", target.label, album.artist, album.title);
    Ok(())
}

/// List the player's preset slots.
pub fn presets(target: &Target, json: bool) -> Result<()> {
    let presets = target
        .player
        .presets()
        .context("could not list the presets")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }
    println!("{}: {} presets", target.label, presets.len());
    for preset in &presets {
        println!("  [{}] {}", preset.id, preset.name);
    }
    Ok(())
}

/// Load a preset by name or id.
pub fn preset(target: &Target, needle: &str) -> Result<()> {
    let preset = target
        .player
        .find_preset(needle)
        .context("could not resolve the preset")?;
    target
        .player
        .load_preset(&preset.id)
        .with_context(|| format!("could not load preset '{}'", preset.name))?;
    println!("{}: loaded preset {}", target.label, preset.name);
    Ok(())
}

/// Scan the network and list every player that answered its identity probe.
pub fn discover(tool: Option<&str>, json: bool) -> Result<()> {
    let players = bluos_discovery::discover_players(&browser_for(tool))
        .context("discovery failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&players)?);
        return Ok(());
    }
    if players.is_empty() {
        println!("No players found. Check that the players are powered on and on this network.");
        return Ok(());
    }
    println!("Found {} player(s):", players.len());
    println!("{}", format_player_list(&players));
    Ok(())
}

/// Discover players and store the one whose name matches.
pub fn use_named(settings: &mut Settings, name: &str, tool: Option<&str>) -> Result<()> {
    let tool = tool.or(settings.browse_tool.as_deref()).map(str::to_string);
    let players = bluos_discovery::discover_players(&browser_for(tool.as_deref()))
        .context("discovery failed")?;

    let lowered = name.to_lowercase();
    let found = players
        .iter()
        .find(|player| player.name.to_lowercase() == lowered);
    match found {
        Some(found) => {
            settings.player = Some(found.endpoint.clone());
            settings.name = Some(found.name.clone());
            if tool.is_some() {
                settings.browse_tool = tool;
            }
            settings.store().context("could not store the settings")?;
            println!("Selected {} at {}", found.name, found.endpoint);
            Ok(())
        }
        None => bail!(
            "no player named '{}' found. Available players:\n{}",
            name,
            format_player_list(&players)
        ),
    }
}

/// Store a player endpoint directly, without a discovery pass.
///
/// The name probe is best effort here: an unreachable player can still be
/// selected and labeled by its address.
pub fn use_host(
    settings: &mut Settings,
    host: &str,
    port: u16,
    tool: Option<&str>,
) -> Result<()> {
    let endpoint = Endpoint::new(host, port);
    let name = match bluos_discovery::identify(&endpoint) {
        Ok(name) => Some(name),
        Err(err) => {
            warn!("could not identify {}: {}", endpoint, err);
            None
        }
    };

    settings.player = Some(endpoint.clone());
    settings.name = name.clone();
    if let Some(tool) = tool {
        settings.browse_tool = Some(tool.to_string());
    }
    settings.store().context("could not store the settings")?;
    match name {
        Some(name) => println!("Selected {} at {}", name, endpoint),
        None => println!("Selected {}", endpoint),
    }
    Ok(())
}

/// Print the settings file location and contents.
pub fn config(settings: &Settings) -> Result<()> {
    println!("{}", Settings::default_path()?.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

/// Interactive prompt bound to one player.
///
/// The `Player` stays alive between commands, so the album catalog is built
/// once per session instead of once per invocation.
pub fn shell(target: &Target) -> Result<()> {
    println!(
        "Connected to {}. Commands: status, play [URL], pause, toggle, skip, back, \
         volume <up|down|LEVEL>, albums [refresh], album <QUERY>, presets, \
         preset <NAME-OR-ID>, quit.",
        target.label
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{}> ", target.label);
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if matches!(words.as_slice(), ["quit"] | ["exit"]) {
            break;
        }
        if let Err(err) = run_shell_command(target, &words) {
            eprintln!("error: {:#}", err);
        }
    }
    Ok(())
}

fn run_shell_command(target: &Target, words: &[&str]) -> Result<()> {
    match words {
        [] => Ok(()),
        ["status"] => status(target, false),
        ["play"] => play(target, None),
        ["play", url] => play(target, Some(*url)),
        ["pause"] => pause(target),
        ["toggle"] => toggle(target),
        ["skip"] => skip(target),
        ["back"] => back(target),
        ["volume", "up"] => volume_nudge(target, VOLUME_STEP),
        ["volume", "down"] => volume_nudge(target, -VOLUME_STEP),
        ["volume", level] => match level.parse() {
            Ok(level) => volume_set(target, level),
            Err(_) => bail!("volume takes 'up', 'down' or a level such as 40"),
        },
        ["albums"] => albums(target, false, false),
        ["albums", "refresh"] => albums(target, true, false),
        ["album", query @ ..] if !query.is_empty() => album(target, &query.join(" ")),
        ["presets"] => presets(target, false),
        ["preset", needle @ ..] if !needle.is_empty() => preset(target, &needle.join(" ")),
        _ => bail!("unknown command '{}'", words.join(" ")),
    }
}

fn browser_for(tool: Option<&str>) -> Browser {
    match tool {
        Some(tool) => Browser::new(tool),
        None => Browser::default(),
    }
}

fn format_player_list(players: &[DiscoveredPlayer]) -> String {
    if players.is_empty() {
        return "  (none)".to_string();
    }
    players
        .iter()
        .map(|player| format!("  - {} at {}", player.name, player.endpoint))
        .collect::<Vec<_>>()
        .join("\n")
}
