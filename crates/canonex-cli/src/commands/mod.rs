pub mod canonical;
pub mod check;
pub mod delete;
pub mod import;
pub mod list;
pub mod show;
pub mod update;

use canonex_core::{DisplacementEvent, Example};

/// Print displacement notifications the way a UI would toast them
pub fn print_displacements(events: &[DisplacementEvent]) {
    for event in events {
        println!("{}", event.message());
    }
}

/// One-line summary: id, canonical marker, intent, text
pub fn summary_line(example: &Example) -> String {
    format!(
        "{} {} {:<16} {}",
        example.id,
        if example.canonical { "*" } else { " " },
        example.intent.as_deref().unwrap_or("-"),
        example.text
    )
}
