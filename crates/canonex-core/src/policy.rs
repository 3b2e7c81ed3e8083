//! Canonical seeding policy
//!
//! Decides whether a freshly inserted example should be marked canonical
//! without an explicit request. Import and creation collaborators consult a
//! policy through [`ExampleStore::seed_canonical`](crate::ExampleStore::seed_canonical);
//! plain inserts never seed.

use crate::model::Example;
use crate::ops::Corpus;

/// Policy hook consulted after an insert
pub trait CanonicalSeedPolicy: Send + Sync {
    /// Return `true` if `example` should be marked canonical in `corpus`
    fn should_seed(&self, corpus: &Corpus, example: &Example) -> bool;
}

/// First example of an intent becomes its canonical example
///
/// Seeds only when the example has an intent and none of its grouping keys
/// has a holder yet, so seeding never displaces anything. An example whose
/// entity value is already held by another example is left unmarked even if
/// its intent has no canonical example.
///
/// # Example
/// ```
/// use canonex_core::ops::example_ops;
/// use canonex_core::policy::{CanonicalSeedPolicy, FirstExamplePerIntent};
/// use canonex_core::{Corpus, NewExample};
///
/// let mut corpus = Corpus::new();
/// let id = example_ops::insert_example(&mut corpus, NewExample::new("hi").with_intent("greet")).unwrap();
/// assert!(FirstExamplePerIntent.should_seed(&corpus, corpus.get(&id).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstExamplePerIntent;

impl CanonicalSeedPolicy for FirstExamplePerIntent {
    fn should_seed(&self, corpus: &Corpus, example: &Example) -> bool {
        if example.intent.is_none() {
            return false;
        }
        let index = corpus.index();
        example
            .grouping_keys(corpus.scope())
            .iter()
            .all(|key| index.holder(key).is_none())
    }
}

/// Never seeds
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeeding;

impl CanonicalSeedPolicy for NoSeeding {
    fn should_seed(&self, _corpus: &Corpus, _example: &Example) -> bool {
        false
    }
}
