use std::collections::VecDeque;

use rand::RngCore;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::engine::{ProgressModel, SelectionPolicy, matches_any};
use crate::session::Effect;
use crate::sets::{Word, WordSet, resolve_target_set_id};
use crate::store::schema::{ProgressMap, SetStats, WordProgress};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EducationSettings {
    pub model: ProgressModel,
    pub history_window: usize,
    pub block_exposures: u32,
    pub review_interval: u32,
    pub low_supply_threshold: usize,
    pub track_set_stats: bool,
}

impl Default for EducationSettings {
    fn default() -> Self {
        Self {
            model: ProgressModel::default(),
            history_window: 3,
            block_exposures: 5,
            review_interval: 10,
            low_supply_threshold: 3,
            track_set_stats: true,
        }
    }
}

/// A word answered wrongly, held out of rotation while its correction is
/// shown for the next few answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub word_id: String,
    pub hint: String,
    pub answers: String,
    pub remaining: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EducationEvent {
    /// Explicit check of the typed answer.
    Submit(String),
    /// Live input; graded only once it already matches.
    InputChanged(String),
    /// Self-assessment after revealing a flashcard.
    Grade { knew: bool },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EducationUpdate {
    /// `None` when the event did not count as an answer.
    pub correct: Option<bool>,
    pub effects: Vec<Effect>,
}

/// Untimed adaptive session: every answer updates the word's counter and
/// picks the next prompt from a tiered pool.
pub struct EducationSession {
    set_id: String,
    set_name: String,
    stats_set_id: Option<String>,
    user_id: Option<String>,
    words: Vec<Word>,
    current: Option<usize>,
    history: VecDeque<String>,
    feedback: Vec<FeedbackEntry>,
    answer_count: u32,
    stats: SetStats,
    settings: EducationSettings,
    policy: Box<dyn SelectionPolicy>,
    rng: Box<dyn RngCore + Send>,
}

impl EducationSession {
    pub fn new(
        set: &WordSet,
        stored: &ProgressMap,
        stats: SetStats,
        user_id: Option<String>,
        settings: EducationSettings,
        policy: Box<dyn SelectionPolicy>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let words = set
            .words
            .iter()
            .map(|w| {
                let mut word = w.clone();
                word.progress_counter = stored.get(&w.id).map_or(0, |p| p.progress_counter);
                word
            })
            .collect();

        let mut session = Self {
            set_id: set.id.clone(),
            set_name: set.name.clone(),
            stats_set_id: resolve_target_set_id(set),
            user_id,
            words,
            current: None,
            history: VecDeque::new(),
            feedback: Vec::new(),
            answer_count: 0,
            stats,
            settings,
            policy,
            rng,
        };
        session.choose_next();
        info!(
            set_id = %session.set_id,
            words = session.words.len(),
            progress = session.progress(),
            "education session started"
        );
        session
    }

    pub fn apply(&mut self, event: EducationEvent) -> EducationUpdate {
        let Some(current) = self.current_word() else {
            return EducationUpdate::default();
        };
        let correct = match event {
            EducationEvent::Submit(raw) => matches_any(&raw, &current.answers),
            EducationEvent::InputChanged(raw) => {
                if !matches_any(&raw, &current.answers) {
                    return EducationUpdate::default();
                }
                true
            }
            EducationEvent::Grade { knew } => knew,
        };
        let effects = self.record_answer(correct);
        EducationUpdate {
            correct: Some(correct),
            effects,
        }
    }

    fn record_answer(&mut self, correct: bool) -> Vec<Effect> {
        let Some(idx) = self.current else {
            return Vec::new();
        };
        let mut effects = Vec::new();

        let updated = self.settings.model.apply_answer(&self.words[idx], correct);
        let word_id = updated.id.clone();
        effects.push(Effect::SaveProgress {
            user_id: self.user_id.clone(),
            set_id: updated
                .origin_set_id
                .clone()
                .unwrap_or_else(|| self.set_id.clone()),
            word_id: word_id.clone(),
            progress: WordProgress {
                progress_counter: updated.progress_counter,
            },
        });
        debug!(%word_id, correct, counter = updated.progress_counter, "answer recorded");

        self.history.push_back(word_id.clone());
        while self.history.len() > self.settings.history_window {
            self.history.pop_front();
        }

        if !correct {
            let exposures = self.settings.block_exposures;
            match self.feedback.iter_mut().find(|f| f.word_id == word_id) {
                Some(entry) => entry.remaining = entry.remaining.max(exposures),
                None => self.feedback.push(FeedbackEntry {
                    word_id: word_id.clone(),
                    hint: updated.hint.clone(),
                    answers: updated.answer_text(),
                    remaining: exposures,
                }),
            }
        }
        for entry in self.feedback.iter_mut().filter(|f| f.word_id != word_id) {
            entry.remaining = entry.remaining.saturating_sub(1);
        }
        self.feedback.retain(|f| f.remaining > 0);

        self.words[idx] = updated;
        self.answer_count += 1;

        self.stats.attempts += 1;
        if correct {
            self.stats.correct += 1;
        }
        if self.settings.track_set_stats
            && let Some(set_id) = &self.stats_set_id
        {
            effects.push(Effect::SaveSetStats {
                user_id: self.user_id.clone(),
                set_id: set_id.clone(),
                stats: self.stats,
            });
        }

        self.choose_next();
        effects
    }

    fn is_excluded(&self, word: &Word) -> bool {
        self.history.contains(&word.id) || self.is_blocked(&word.id)
    }

    pub fn is_blocked(&self, word_id: &str) -> bool {
        self.feedback.iter().any(|f| f.word_id == word_id)
    }

    fn collect<F: Fn(&Word) -> bool>(&self, keep: F) -> Vec<Word> {
        self.words.iter().filter(|w| keep(w)).cloned().collect()
    }

    fn select_from(&mut self, pool: &[Word]) -> Option<String> {
        self.policy
            .select(pool, self.rng.as_mut())
            .map(|w| w.id.clone())
    }

    fn review_due(&self, progress: u8) -> bool {
        let model = self.settings.model;
        let periodic = self.answer_count > 0
            && self.settings.review_interval > 0
            && self.answer_count % self.settings.review_interval == 0;
        let fresh_unlearned = self
            .words
            .iter()
            .filter(|w| !model.is_learned(w) && !self.is_excluded(w))
            .count();
        periodic || fresh_unlearned < self.settings.low_supply_threshold || progress == 100
    }

    /// Builds the candidate pool tier by tier and picks the next prompt.
    fn choose_next(&mut self) {
        let model = self.settings.model;
        let progress = model.calc_progress(&self.words);
        let mut pool: Vec<Word> = Vec::new();

        if self.review_due(progress) {
            let learned = self.collect(|w| model.is_learned(w) && !self.is_excluded(w));
            if let Some(id) = self.select_from(&learned) {
                pool = self.collect(|w| w.id == id);
            }
            if pool.is_empty() && progress == 100 {
                let any = self.collect(|w| !self.is_excluded(w));
                if let Some(id) = self.select_from(&any) {
                    pool = self.collect(|w| w.id == id);
                }
            }
        }

        // Unblocking the feedback words is the last unlearned tier, which
        // already covers a pending-feedback deadlock.
        let tiers: [&dyn Fn(&Word) -> bool; 6] = [
            &|w: &Word| !model.is_learned(w) && !self.is_excluded(w),
            &|w: &Word| !model.is_learned(w) && !self.is_blocked(&w.id),
            &|w: &Word| !model.is_learned(w),
            &|w: &Word| !self.is_excluded(w),
            &|w: &Word| !self.is_blocked(&w.id),
            &|_: &Word| true,
        ];
        for keep in tiers {
            if !pool.is_empty() {
                break;
            }
            pool = self.collect(keep);
        }

        pool.shuffle(self.rng.as_mut());
        let next = self.select_from(&pool);
        self.current = next.and_then(|id| self.words.iter().position(|w| w.id == id));
        if let Some(word) = self.current_word() {
            debug!(word_id = %word.id, pool = pool.len(), "next prompt");
        }
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.current.map(|idx| &self.words[idx])
    }

    /// True when the prompt is a review of an already learned word.
    pub fn is_review(&self) -> bool {
        self.current_word()
            .is_some_and(|w| self.settings.model.is_learned(w))
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn progress(&self) -> u8 {
        self.settings.model.calc_progress(&self.words)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn feedback(&self) -> &[FeedbackEntry] {
        &self.feedback
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn answer_count(&self) -> u32 {
        self.answer_count
    }

    pub fn stats(&self) -> SetStats {
        self.stats
    }

    pub fn set_id(&self) -> &str {
        &self.set_id
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }
}
