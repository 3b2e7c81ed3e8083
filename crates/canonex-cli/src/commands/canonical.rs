//! Canonical toggle command
//!
//! Usage: canonex canonical set <ID> | canonex canonical unset <ID>

use canonex_core::ExampleStore;
use clap::{Args, Subcommand};

use super::print_displacements;

#[derive(Debug, Args)]
pub struct CanonicalArgs {
    #[command(subcommand)]
    pub command: CanonicalCommand,
}

#[derive(Debug, Subcommand)]
pub enum CanonicalCommand {
    /// Make the example canonical for all of its keys
    Set { id: String },
    /// Release every key the example holds
    Unset { id: String },
}

pub fn execute(
    store: &ExampleStore,
    args: CanonicalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (id, on) = match args.command {
        CanonicalCommand::Set { id } => (id, true),
        CanonicalCommand::Unset { id } => (id, false),
    };

    let events = store.set_canonical(&id, on)?;
    print_displacements(&events);

    let keys = store.snapshot()?.canonical_keys(&id)?;
    if keys.is_empty() {
        println!("{} is not canonical", id);
    } else {
        let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
        println!("{} is canonical for {}", id, keys.join(", "));
    }

    Ok(())
}
