pub mod bulk;
pub mod combine;
pub mod picker;
pub mod word;

pub use combine::{ALL_WORDS_ID, combine, combine_all, resolve_target_set_id};
pub use picker::SetSelection;
pub use word::{Word, WordSet};
