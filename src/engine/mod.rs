pub mod answer;
pub mod progress;
pub mod selection;

pub use answer::{matches_any, normalize_answer};
pub use progress::{LEARNED_THRESHOLD, ProgressModel};
pub use selection::{MinimumTierPolicy, PolicyKind, SelectionPolicy, WeightedPolicy};
