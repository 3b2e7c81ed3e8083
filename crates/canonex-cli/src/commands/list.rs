//! List command
//!
//! Usage: canonex list [--only-canonical] [--intent <NAME>] [--contains <TEXT>] [--json]

use canonex_core::{ExampleStore, ListFilter};
use clap::Args;

use super::summary_line;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only examples that are canonical for some key
    #[arg(long)]
    pub only_canonical: bool,

    #[arg(long)]
    pub intent: Option<String>,

    /// Case-insensitive text filter
    #[arg(long)]
    pub contains: Option<String>,

    /// Print a JSON array instead of one line per example
    #[arg(long)]
    pub json: bool,
}

pub fn execute(store: &ExampleStore, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut filter = ListFilter::new().only_canonical(args.only_canonical);
    if let Some(intent) = args.intent {
        filter = filter.intent(intent);
    }
    if let Some(needle) = args.contains {
        filter = filter.text_contains(needle);
    }

    let examples = store.list(&filter)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&examples)?);
    } else {
        for example in &examples {
            println!("{}", summary_line(example));
        }
    }

    Ok(())
}
