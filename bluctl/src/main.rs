//! Command-line controller for BluOS players.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod settings;

use commands::Target;
use settings::Settings;

/// Control BluOS players from the command line.
#[derive(Parser, Debug)]
#[command(name = "bluctl")]
#[command(about = "Control BluOS players from the command line")]
#[command(version)]
struct Cli {
    /// Player to talk to as HOST[:PORT], overriding the stored selection
    #[arg(short, long, global = true, value_name = "HOST[:PORT]")]
    player: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the player identity and what is playing
    Status {
        /// Emit the identity and status fields as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resume playback, or start playing a stream URL
    Play {
        /// Stream URL to hand to the player
        url: Option<String>,
    },
    /// Pause playback
    Pause,
    /// Pause when playing, resume otherwise
    Toggle,
    /// Jump to the next track
    Skip,
    /// Jump back to the previous track
    Back,
    /// Adjust the playback volume
    Volume {
        #[command(subcommand)]
        change: VolumeChange,
    },
    /// List every album in the local-music catalog
    Albums {
        /// Rebuild the catalog instead of reusing a cached copy
        #[arg(long)]
        refresh: bool,
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find an album in the catalog and queue it for playback
    Album {
        /// Album title, 'artist - title', or a substring of either
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List the player's preset slots
    Presets {
        /// Emit the presets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a preset by name or id
    Preset {
        /// Preset name or numeric id
        #[arg(required = true)]
        name_or_id: Vec<String>,
    },
    /// Scan the network for players
    Discover {
        /// Emit the discovered players as JSON
        #[arg(long)]
        json: bool,
        /// Service browser binary to run instead of avahi-browse
        #[arg(long)]
        tool: Option<String>,
    },
    /// Select the player that later commands talk to
    Use {
        /// Player name as reported by discovery
        name: Vec<String>,
        /// Bind to this host directly instead of discovering
        #[arg(long, conflicts_with = "name")]
        host: Option<String>,
        /// Port used together with --host
        #[arg(long, requires = "host")]
        port: Option<u16>,
        /// Service browser binary to run instead of avahi-browse
        #[arg(long)]
        tool: Option<String>,
    },
    /// Show the settings file location and contents
    Config,
    /// Open an interactive prompt bound to the selected player
    Shell,
}

#[derive(Subcommand, Debug)]
enum VolumeChange {
    /// Raise the volume by one step
    Up {
        /// Step size in volume points
        #[arg(long, default_value_t = commands::VOLUME_STEP)]
        step: i32,
    },
    /// Lower the volume by one step
    Down {
        /// Step size in volume points
        #[arg(long, default_value_t = commands::VOLUME_STEP)]
        step: i32,
    },
    /// Set the volume to an absolute level
    Set {
        /// Level between 0 and 100
        #[arg(value_parser = clap::value_parser!(i32).range(0..=100))]
        level: i32,
    },
}

/// Route log output to stderr so command output stays clean on stdout.
fn init_tracing() {
    let filter = if let Ok(directive) = std::env::var("BLUCTL_LOG") {
        tracing_subscriber::EnvFilter::new(directive)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let Cli { player, command } = Cli::parse();
    let mut settings = Settings::load().context("could not load the settings file")?;

    match command {
        Commands::Status { json } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::status(&target, json)
        }
        Commands::Play { url } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::play(&target, url.as_deref())
        }
        Commands::Pause => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::pause(&target)
        }
        Commands::Toggle => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::toggle(&target)
        }
        Commands::Skip => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::skip(&target)
        }
        Commands::Back => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::back(&target)
        }
        Commands::Volume { change } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            match change {
                VolumeChange::Up { step } => commands::volume_nudge(&target, step),
                VolumeChange::Down { step } => commands::volume_nudge(&target, -step),
                VolumeChange::Set { level } => commands::volume_set(&target, level),
            }
        }
        Commands::Albums { refresh, json } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::albums(&target, refresh, json)
        }
        Commands::Album { query } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::album(&target, &query.join(" "))
        }
        Commands::Presets { json } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::presets(&target, json)
        }
        Commands::Preset { name_or_id } => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::preset(&target, &name_or_id.join(" "))
        }
        Commands::Discover { json, tool } => {
            let tool = tool.or_else(|| settings.browse_tool.clone());
            commands::discover(tool.as_deref(), json)
        }
        Commands::Use {
            name,
            host,
            port,
            tool,
        } => match host {
            Some(host) => commands::use_host(
                &mut settings,
                &host,
                port.unwrap_or(bluos_api::DEFAULT_PORT),
                tool.as_deref(),
            ),
            None if name.is_empty() => {
                bail!("give a player name, or bind directly with --host")
            }
            None => commands::use_named(&mut settings, &name.join(" "), tool.as_deref()),
        },
        Commands::Config => commands::config(&settings),
        Commands::Shell => {
            let target = Target::resolve(player.as_deref(), &settings)?;
            commands::shell(&target)
        }
    }
}
