//! Delete command

use canonex_core::ExampleStore;
use clap::Args;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn execute(store: &ExampleStore, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    store.delete(&args.id)?;
    println!("Deleted {}", args.id);
    Ok(())
}
