use crate::session::GameMode;
use crate::sets::combine::{ALL_WORDS_ID, combine, combine_all};
use crate::sets::WordSet;

/// Which sets the learner has ticked for the next session.
///
/// "All words" is exclusive with concrete sets. Timed modes accept a single
/// entry; education accepts any number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetSelection {
    ids: Vec<String>,
}

impl SetSelection {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn toggle(&mut self, id: &str, mode: GameMode) {
        if self.contains(id) {
            self.ids.retain(|s| s != id);
            return;
        }
        if id == ALL_WORDS_ID || mode.is_timed() {
            self.ids = vec![id.to_string()];
        } else {
            self.ids.retain(|s| s != ALL_WORDS_ID);
            self.ids.push(id.to_string());
        }
    }

    /// Narrow to one entry when switching into a timed mode, preferring
    /// "all words" when it is ticked.
    pub fn restrict_for(&mut self, mode: GameMode) {
        if !mode.is_timed() || self.ids.len() <= 1 {
            return;
        }
        let keep = if self.contains(ALL_WORDS_ID) {
            ALL_WORDS_ID.to_string()
        } else {
            self.ids[0].clone()
        };
        self.ids = vec![keep];
    }

    /// The practice set for `mode`, or `None` when nothing usable is ticked.
    pub fn resolve(&self, all_sets: &[WordSet], mode: GameMode) -> Option<WordSet> {
        if self.contains(ALL_WORDS_ID) {
            return Some(combine_all(all_sets));
        }
        if mode.is_timed() {
            return self
                .ids
                .first()
                .and_then(|first| combine(all_sets, std::slice::from_ref(first)));
        }
        combine(all_sets, &self.ids)
    }
}
