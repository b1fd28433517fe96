//! Simple player discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p bluos-discovery --example discover_json
//!
//! Pass a tool name to browse with something other than avahi-browse.

use bluos_discovery::{discover_players, Browser};

fn main() -> bluos_discovery::Result<()> {
    let browser = match std::env::args().nth(1) {
        Some(tool) => Browser::new(&tool),
        None => Browser::default(),
    };

    let players = discover_players(&browser)?;
    println!("{}", serde_json::to_string_pretty(&players).unwrap());
    Ok(())
}
