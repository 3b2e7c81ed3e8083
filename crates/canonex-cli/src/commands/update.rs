//! Update command
//!
//! Usage: canonex update <ID> [--text <TEXT>] [--intent <NAME> | --clear-intent]

use canonex_core::{ExamplePatch, ExampleStore};
use clap::Args;

use super::summary_line;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub text: Option<String>,

    #[arg(long, conflicts_with = "clear_intent")]
    pub intent: Option<String>,

    /// Remove the example's intent
    #[arg(long)]
    pub clear_intent: bool,
}

pub fn execute(store: &ExampleStore, args: UpdateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut patch = ExamplePatch::new();
    if let Some(text) = args.text {
        // Spans refer to the old text
        patch = patch.text(text).entities(Vec::new());
    }
    if let Some(intent) = args.intent {
        patch = patch.intent(Some(intent));
    } else if args.clear_intent {
        patch = patch.intent(None);
    }
    if patch.is_empty() {
        return Err("Nothing to update: pass --text, --intent or --clear-intent".into());
    }

    let example = store.update(&args.id, patch)?;
    println!("{}", summary_line(&example));

    Ok(())
}
