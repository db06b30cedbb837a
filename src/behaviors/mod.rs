//! Built-in node behaviors
//!
//! Each module pairs a behavior with a template constructor producing a
//! node shaped the way the behavior expects. Hosts register additional
//! behaviors through `BehaviorRegistry::register`.

pub mod labeled_index;
pub mod picker;
pub mod search_replace;

pub use labeled_index::LabeledIndexBehavior;
pub use picker::PickerBehavior;
pub use search_replace::SearchReplaceBehavior;
