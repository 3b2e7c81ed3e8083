//! Show command
//!
//! Usage: canonex show <ID> [--json]

use canonex_core::ExampleStore;
use clap::Args;

use super::summary_line;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,

    /// Print the example and its capability view as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(store: &ExampleStore, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let example = store.get(&args.id)?;
    let view = store.view(&args.id)?;

    if args.json {
        let doc = serde_json::json!({ "example": example, "view": view });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", summary_line(&example));
    for span in &example.entities {
        println!(
            "  entity {}={} [{}..{}]",
            span.entity, span.value, span.start, span.end
        );
    }
    for tooltip in [
        &view.canonical_tooltip,
        &view.edit_tooltip,
        &view.delete_tooltip,
    ]
    .into_iter()
    .flatten()
    {
        println!("  {}", tooltip);
    }

    Ok(())
}
