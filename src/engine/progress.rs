use crate::sets::Word;

/// Counters strictly above this mark a word as learned.
pub const LEARNED_THRESHOLD: u32 = 15;

/// Short-memory progress: a streak of correct answers per word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressModel {
    pub threshold: u32,
}

impl Default for ProgressModel {
    fn default() -> Self {
        Self {
            threshold: LEARNED_THRESHOLD,
        }
    }
}

impl ProgressModel {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn is_learned(&self, word: &Word) -> bool {
        word.progress_counter > self.threshold
    }

    pub fn apply_answer(&self, word: &Word, correct: bool) -> Word {
        let mut next = word.clone();
        next.progress_counter = if correct {
            word.progress_counter.saturating_add(1)
        } else {
            0
        };
        next
    }

    /// Percentage of learned words, rounded. Empty input yields 0.
    pub fn calc_progress(&self, words: &[Word]) -> u8 {
        if words.is_empty() {
            return 0;
        }
        let learned = words.iter().filter(|w| self.is_learned(w)).count();
        (learned as f64 * 100.0 / words.len() as f64).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(counter: u32) -> Word {
        Word::new("w", "hint", &["answer"]).with_counter(counter)
    }

    #[test]
    fn test_learned_boundary() {
        let model = ProgressModel::default();
        assert!(!model.is_learned(&word(0)));
        assert!(!model.is_learned(&word(LEARNED_THRESHOLD)));
        assert!(model.is_learned(&word(LEARNED_THRESHOLD + 1)));
    }

    #[test]
    fn test_custom_threshold() {
        let model = ProgressModel::new(5);
        assert!(!model.is_learned(&word(5)));
        assert!(model.is_learned(&word(6)));
    }

    #[test]
    fn test_apply_answer_increments_and_resets() {
        let model = ProgressModel::default();
        let w = word(7);
        let up = model.apply_answer(&w, true);
        assert_eq!(up.progress_counter, 8);
        assert_eq!(w.progress_counter, 7, "input is left untouched");
        let down = model.apply_answer(&up, false);
        assert_eq!(down.progress_counter, 0);
        assert_eq!(model.apply_answer(&down, false).progress_counter, 0);
    }

    #[test]
    fn test_calc_progress() {
        let model = ProgressModel::default();
        assert_eq!(model.calc_progress(&[]), 0);
        assert_eq!(model.calc_progress(&[word(16), word(0), word(0)]), 33);
        assert_eq!(model.calc_progress(&[word(16), word(16), word(0)]), 67);
        assert_eq!(model.calc_progress(&[word(20), word(16)]), 100);
    }
}
