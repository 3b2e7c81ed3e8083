use std::sync::Arc;

use canonex_core::{
    CollectingSink, EngineConfig, EntitySpan, ExampleStore, NewExample, NullRepository,
};

/// Store with no persistence whose sink the test can inspect
#[allow(dead_code)]
pub fn store_with_sink() -> (ExampleStore, CollectingSink) {
    let sink = CollectingSink::new();
    let store = ExampleStore::new(
        EngineConfig::default(),
        Arc::new(NullRepository),
        Arc::new(sink.clone()),
    );
    (store, sink)
}

/// Intent-only example
#[allow(dead_code)]
pub fn intent_example(text: &str, intent: &str) -> NewExample {
    NewExample::new(text).with_intent(intent)
}

/// Example whose whole text is one entity value
#[allow(dead_code)]
pub fn entity_example(text: &str, intent: Option<&str>, entity: &str) -> NewExample {
    let mut example =
        NewExample::new(text).with_entity(EntitySpan::new(entity, text, 0, text.chars().count()));
    if let Some(intent) = intent {
        example = example.with_intent(intent);
    }
    example
}

/// Insert and return the id, panicking on failure
#[allow(dead_code)]
pub fn insert(store: &ExampleStore, example: NewExample) -> String {
    store.insert(example).unwrap()
}
