use tracing::debug;

use crate::sets::{Word, WordSet};

/// Id of the virtual set holding every word of every set.
pub const ALL_WORDS_ID: &str = "all-words";
pub const ALL_WORDS_NAME: &str = "All words";

const COMPOSITE_PREFIX: &str = "combined:";
const COMPOSITE_SEPARATOR: &str = "+";

/// Constituents shorter than this are not real set ids and are ignored.
pub const MIN_SET_ID_LEN: usize = 32;

/// Union of the selected sets, or `None` when nothing matches.
///
/// A single match is passed through with its own id and name so progress can
/// be stored without remapping. Every word is tagged with its origin set.
pub fn combine(all_sets: &[WordSet], selected_ids: &[String]) -> Option<WordSet> {
    if selected_ids.is_empty() {
        return None;
    }
    if selected_ids.iter().any(|id| id == ALL_WORDS_ID) {
        return Some(combine_all(all_sets));
    }

    let chosen: Vec<&WordSet> = all_sets
        .iter()
        .filter(|set| selected_ids.contains(&set.id))
        .collect();

    match chosen.as_slice() {
        [] => None,
        [single] => Some(WordSet::new(
            single.id.clone(),
            single.name.clone(),
            tag_origin(single),
        )),
        many => {
            let mut ids: Vec<&str> = many.iter().map(|s| s.id.as_str()).collect();
            ids.sort_unstable();
            let id = composite_id(&ids);
            let names: Vec<&str> = many.iter().map(|s| s.name.as_str()).collect();
            let words = many.iter().flat_map(|s| tag_origin(s)).collect();
            debug!(%id, sets = many.len(), "combined word sets");
            Some(WordSet::new(id, format!("Combined: {}", names.join(", ")), words))
        }
    }
}

/// Every word of every set under the [`ALL_WORDS_ID`] sentinel.
pub fn combine_all(all_sets: &[WordSet]) -> WordSet {
    let words = all_sets.iter().flat_map(tag_origin).collect();
    WordSet::new(ALL_WORDS_ID, ALL_WORDS_NAME, words)
}

fn tag_origin(set: &WordSet) -> Vec<Word> {
    set.words
        .iter()
        .map(|w| {
            let mut word = w.clone();
            word.origin_set_id = Some(set.id.clone());
            word
        })
        .collect()
}

pub fn composite_id(sorted_ids: &[&str]) -> String {
    format!("{COMPOSITE_PREFIX}{}", sorted_ids.join(COMPOSITE_SEPARATOR))
}

pub fn is_composite(set_id: &str) -> bool {
    set_id.starts_with(COMPOSITE_PREFIX)
}

/// Concrete set ids behind a storage key. Plain ids map to themselves;
/// composite constituents too short to be real ids are skipped.
pub fn constituent_ids(set_id: &str) -> Vec<&str> {
    match set_id.strip_prefix(COMPOSITE_PREFIX) {
        Some(rest) => rest
            .split(COMPOSITE_SEPARATOR)
            .filter(|part| part.len() >= MIN_SET_ID_LEN)
            .collect(),
        None => vec![set_id],
    }
}

/// The concrete set a session-level record (drill result, stats) is filed
/// under. Composite ids resolve to their first full-length constituent, the
/// all-words sentinel to the origin of its first word.
pub fn resolve_target_set_id(set: &WordSet) -> Option<String> {
    if set.id == ALL_WORDS_ID {
        return set.words.iter().find_map(|w| w.origin_set_id.clone());
    }
    if is_composite(&set.id) {
        return constituent_ids(&set.id).first().map(|id| id.to_string());
    }
    Some(set.id.clone())
}
