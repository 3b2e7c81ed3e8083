//! Check command: verify the canonical invariants of the stored corpus

use canonex_core::ExampleStore;

pub fn execute(store: &ExampleStore) -> Result<(), Box<dyn std::error::Error>> {
    store.verify()?;
    let snapshot = store.snapshot()?;
    println!(
        "OK: {} examples, {} canonical keys",
        snapshot.len(),
        snapshot.index().len()
    );
    Ok(())
}
