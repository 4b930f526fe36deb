use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::matches_any;
use crate::session::Effect;
use crate::session::result::DrillResult;
use crate::sets::{Word, WordSet, resolve_target_set_id};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillKind {
    /// Fixed pool; finishes early once every word is answered.
    Accuracy,
    /// Endless queue; words come back after the pool runs out.
    Speed,
}

impl DrillKind {
    pub fn key(self) -> &'static str {
        match self {
            DrillKind::Accuracy => "accuracy",
            DrillKind::Speed => "speed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillPhase {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrillSettings {
    pub time_budget: Duration,
    pub accuracy_pool_size: usize,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(240),
            accuracy_pool_size: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Start,
    Tick,
    Submit(String),
    /// Live input; submitted only once it already matches.
    InputChanged(String),
    Skip,
    /// Early finish, speed drills only.
    GiveUp,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrillUpdate {
    pub correct: Option<bool>,
    pub effects: Vec<Effect>,
}

/// Timed drill state machine: `NotStarted -> Running -> Finished`.
///
/// Time is passed in with every event so the machine never reads a clock.
pub struct TimedDrill {
    kind: DrillKind,
    phase: DrillPhase,
    set_id: String,
    set_name: String,
    target_set_id: Option<String>,
    user_id: Option<String>,
    pool: Vec<Word>,
    completed: Vec<bool>,
    queue: VecDeque<usize>,
    current: Option<usize>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    remaining_secs: u64,
    correct: u32,
    attempts: u32,
    errors: u32,
    skipped: u32,
    result: Option<DrillResult>,
    settings: DrillSettings,
    rng: Box<dyn RngCore + Send>,
}

impl TimedDrill {
    pub fn new(
        kind: DrillKind,
        set: &WordSet,
        user_id: Option<String>,
        settings: DrillSettings,
        mut rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let mut pool = set.words.clone();
        pool.shuffle(rng.as_mut());
        if kind == DrillKind::Accuracy {
            pool.truncate(settings.accuracy_pool_size);
        }
        Self {
            kind,
            phase: DrillPhase::NotStarted,
            set_id: set.id.clone(),
            set_name: set.name.clone(),
            target_set_id: resolve_target_set_id(set),
            user_id,
            completed: vec![false; pool.len()],
            pool,
            queue: VecDeque::new(),
            current: None,
            started_at: None,
            finished_at: None,
            remaining_secs: settings.time_budget.as_secs(),
            correct: 0,
            attempts: 0,
            errors: 0,
            skipped: 0,
            result: None,
            settings,
            rng,
        }
    }

    pub fn apply(&mut self, event: DrillEvent, now: Instant) -> DrillUpdate {
        match (self.phase, event) {
            (DrillPhase::NotStarted, DrillEvent::Start) => {
                self.start(now);
                DrillUpdate::default()
            }
            (DrillPhase::Running, event) => {
                if self.expire_if_due(now) {
                    return self.finish(now);
                }
                self.apply_running(event, now)
            }
            _ => DrillUpdate::default(),
        }
    }

    fn start(&mut self, now: Instant) {
        if self.pool.is_empty() {
            return;
        }
        self.phase = DrillPhase::Running;
        self.started_at = Some(now);
        self.remaining_secs = self.settings.time_budget.as_secs();
        match self.kind {
            DrillKind::Accuracy => self.current = Some(0),
            DrillKind::Speed => {
                self.queue = (0..self.pool.len()).collect();
                self.current = self.queue.front().copied();
            }
        }
        info!(
            kind = self.kind.key(),
            set_id = %self.set_id,
            words = self.pool.len(),
            "drill started"
        );
    }

    fn apply_running(&mut self, event: DrillEvent, now: Instant) -> DrillUpdate {
        let Some(idx) = self.current else {
            return DrillUpdate::default();
        };
        match event {
            DrillEvent::Start | DrillEvent::Tick => DrillUpdate::default(),
            DrillEvent::Submit(raw) => {
                let correct = matches_any(&raw, &self.pool[idx].answers);
                self.grade(idx, correct, now)
            }
            DrillEvent::InputChanged(raw) => {
                if matches_any(&raw, &self.pool[idx].answers) {
                    self.grade(idx, true, now)
                } else {
                    DrillUpdate::default()
                }
            }
            DrillEvent::Skip => {
                self.attempts += 1;
                self.skipped += 1;
                match self.kind {
                    DrillKind::Accuracy => self.current = self.next_open_after(idx),
                    DrillKind::Speed => {
                        self.queue.rotate_left(1);
                        self.current = self.queue.front().copied();
                    }
                }
                DrillUpdate::default()
            }
            DrillEvent::GiveUp => match self.kind {
                DrillKind::Speed => self.finish(now),
                DrillKind::Accuracy => DrillUpdate::default(),
            },
        }
    }

    fn grade(&mut self, idx: usize, correct: bool, now: Instant) -> DrillUpdate {
        self.attempts += 1;
        if !correct {
            self.errors += 1;
            return DrillUpdate {
                correct: Some(false),
                effects: Vec::new(),
            };
        }

        self.correct += 1;
        match self.kind {
            DrillKind::Accuracy => {
                self.completed[idx] = true;
                if self.completed_count() == self.pool.len() {
                    let mut update = self.finish(now);
                    update.correct = Some(true);
                    return update;
                }
                self.current = self.next_open_after(idx);
            }
            DrillKind::Speed => {
                self.queue.pop_front();
                if self.queue.is_empty() {
                    self.refill_queue(idx);
                }
                self.current = self.queue.front().copied();
            }
        }
        DrillUpdate {
            correct: Some(true),
            effects: Vec::new(),
        }
    }

    /// Next not-yet-completed word after `idx`, wrapping around. A lone
    /// remaining word stays current.
    fn next_open_after(&self, idx: usize) -> Option<usize> {
        let len = self.pool.len();
        (1..=len)
            .map(|step| (idx + step) % len)
            .find(|&i| !self.completed[i])
    }

    fn refill_queue(&mut self, just_answered: usize) {
        let mut order: Vec<usize> = (0..self.pool.len()).collect();
        order.shuffle(self.rng.as_mut());
        if order.len() > 1 && order[0] == just_answered {
            order.swap(0, 1);
        }
        debug!(words = order.len(), "speed queue refilled");
        self.queue = order.into();
    }

    fn expire_if_due(&mut self, now: Instant) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        let left = self
            .settings
            .time_budget
            .saturating_sub(now.saturating_duration_since(start));
        self.remaining_secs = left.as_millis().div_ceil(1000) as u64;
        left.is_zero()
    }

    fn finish(&mut self, now: Instant) -> DrillUpdate {
        self.phase = DrillPhase::Finished;
        self.current = None;
        let end = match self.started_at {
            Some(start) => now.min(start + self.settings.time_budget).max(start),
            None => now,
        };
        self.finished_at = Some(end);
        self.remaining_secs = self
            .started_at
            .map(|start| {
                self.settings
                    .time_budget
                    .saturating_sub(end.duration_since(start))
                    .as_secs()
            })
            .unwrap_or(0);

        let set_id = self
            .target_set_id
            .clone()
            .unwrap_or_else(|| self.set_id.clone());
        let result = DrillResult::from_drill(self, set_id);
        info!(
            kind = self.kind.key(),
            correct = result.correct_count,
            attempts = result.total_attempts,
            accuracy = result.accuracy,
            "drill finished"
        );

        let mut effects = Vec::new();
        if self.user_id.is_some() && self.target_set_id.is_some() {
            effects.push(Effect::SaveDrillResult(result.clone()));
        }
        self.result = Some(result);
        DrillUpdate {
            correct: None,
            effects,
        }
    }

    pub fn kind(&self) -> DrillKind {
        self.kind
    }

    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DrillPhase::Finished
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.current.map(|idx| &self.pool[idx])
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|&&done| done).count()
    }

    pub fn words_completed(&self) -> u32 {
        match self.kind {
            DrillKind::Accuracy => self.completed_count() as u32,
            DrillKind::Speed => self.correct,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn total_attempts(&self) -> u32 {
        self.attempts
    }

    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn skipped_count(&self) -> u32 {
        self.skipped
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn target_set_id(&self) -> Option<&str> {
        self.target_set_id.as_deref()
    }

    pub fn result(&self) -> Option<&DrillResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SET: &str = "0f6c8d7e-1111-4222-8333-944455566677";

    fn set(n: usize) -> WordSet {
        let words = (0..n)
            .map(|i| Word::new(format!("w{i}"), format!("hint{i}"), &[&format!("ans{i}")]))
            .collect();
        WordSet::new(SET, "Drill set", words)
    }

    fn drill(kind: DrillKind, n: usize, user: Option<&str>) -> TimedDrill {
        TimedDrill::new(
            kind,
            &set(n),
            user.map(str::to_string),
            DrillSettings::default(),
            Box::new(SmallRng::seed_from_u64(17)),
        )
    }

    fn answer(d: &TimedDrill) -> String {
        d.current_word().unwrap().answers[0].clone()
    }

    fn at(start: Instant, secs: u64) -> Instant {
        start + Duration::from_secs(secs)
    }

    #[test]
    fn test_accuracy_pool_truncated_to_twenty() {
        let d = drill(DrillKind::Accuracy, 35, None);
        assert_eq!(d.pool_size(), 20);
        assert_eq!(d.phase(), DrillPhase::NotStarted);
        let speed = drill(DrillKind::Speed, 35, None);
        assert_eq!(speed.pool_size(), 35);
    }

    #[test]
    fn test_events_before_start_are_noops() {
        let mut d = drill(DrillKind::Speed, 3, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Submit("ans0".into()), t0);
        d.apply(DrillEvent::Skip, t0);
        d.apply(DrillEvent::GiveUp, t0);
        assert_eq!(d.phase(), DrillPhase::NotStarted);
        assert_eq!(d.total_attempts(), 0);
    }

    #[test]
    fn test_empty_pool_never_starts() {
        let mut d = drill(DrillKind::Accuracy, 0, Some("u"));
        d.apply(DrillEvent::Start, Instant::now());
        assert_eq!(d.phase(), DrillPhase::NotStarted);
    }

    #[test]
    fn test_timer_runs_out_after_budget() {
        let mut d = drill(DrillKind::Speed, 5, Some("user-1"));
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        assert_eq!(d.remaining_secs(), 240);

        let mut effects = Vec::new();
        for tick in 1..=240 {
            let update = d.apply(DrillEvent::Tick, at(t0, tick));
            effects.extend(update.effects);
            if tick < 240 {
                assert_eq!(d.phase(), DrillPhase::Running, "tick {tick}");
                assert_eq!(d.remaining_secs(), 240 - tick);
            }
        }
        assert_eq!(d.phase(), DrillPhase::Finished);
        assert_eq!(d.remaining_secs(), 0);
        assert!((d.elapsed_secs() - 240.0).abs() < 0.01);
        assert_eq!(effects.len(), 1);

        // Further ticks do nothing and never emit a second result.
        let later = d.apply(DrillEvent::Tick, at(t0, 300));
        assert!(later.effects.is_empty());
    }

    #[test]
    fn test_late_event_finishes_at_deadline() {
        let mut d = drill(DrillKind::Accuracy, 3, Some("user-1"));
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let raw = answer(&d);
        let update = d.apply(DrillEvent::Submit(raw), at(t0, 500));
        assert!(d.is_finished());
        assert_eq!(d.total_attempts(), 0, "answer after the deadline is ignored");
        assert!((d.result().unwrap().time_spent_secs - 240.0).abs() < 0.01);
        assert_eq!(update.effects.len(), 1);
    }

    #[test]
    fn test_accuracy_finishes_early_when_all_completed() {
        let mut d = drill(DrillKind::Accuracy, 25, Some("user-1"));
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let mut effects = Vec::new();
        for i in 0..20 {
            assert!(!d.is_finished());
            d.apply(DrillEvent::Submit("wrong".into()), at(t0, 2 * i));
            let raw = answer(&d);
            effects.extend(d.apply(DrillEvent::Submit(raw), at(t0, 2 * i + 1)).effects);
        }
        assert!(d.is_finished());
        assert_eq!(d.completed_count(), 20);

        let result = d.result().unwrap();
        assert_eq!(result.correct_count, 20);
        assert_eq!(result.error_count, 20);
        assert_eq!(result.total_attempts, 40);
        assert_eq!(result.words_completed, 20);
        assert_eq!(result.accuracy, 50.0);
        assert_eq!(result.time_spent_secs, 39.0);
        assert!(result.words_per_minute.is_none());
        assert_eq!(result.set_id, SET);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_accuracy_skip_moves_to_open_word() {
        let mut d = drill(DrillKind::Accuracy, 3, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let first = d.current_word().unwrap().id.clone();
        d.apply(DrillEvent::Skip, t0);
        assert_ne!(d.current_word().unwrap().id, first);
        assert_eq!(d.skipped_count(), 1);
        assert_eq!(d.total_attempts(), 1);

        // Complete the other two; the skipped one is served again.
        for _ in 0..2 {
            if d.current_word().unwrap().id == first {
                d.apply(DrillEvent::Skip, t0);
            }
            let raw = answer(&d);
            d.apply(DrillEvent::Submit(raw), t0);
        }
        assert_eq!(d.current_word().unwrap().id, first);
        d.apply(DrillEvent::Skip, t0);
        assert_eq!(d.current_word().unwrap().id, first, "lone word stays current");
    }

    #[test]
    fn test_wrong_answer_keeps_word() {
        let mut d = drill(DrillKind::Speed, 4, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let before = d.current_word().unwrap().id.clone();
        let update = d.apply(DrillEvent::Submit("nope".into()), t0);
        assert_eq!(update.correct, Some(false));
        assert_eq!(d.current_word().unwrap().id, before);
        assert_eq!(d.error_count(), 1);
    }

    #[test]
    fn test_speed_repeats_after_queue_exhausted() {
        let mut d = drill(DrillKind::Speed, 3, Some("user-1"));
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let mut seen = Vec::new();
        for _ in 0..9 {
            let word = d.current_word().unwrap().id.clone();
            if let Some(prev) = seen.last() {
                assert_ne!(prev, &word, "refill does not repeat the last word");
            }
            seen.push(word);
            let raw = answer(&d);
            d.apply(DrillEvent::Submit(raw), t0);
        }
        assert_eq!(d.correct_count(), 9);
        assert_eq!(d.words_completed(), 9);
        assert!(!d.is_finished());
    }

    #[test]
    fn test_speed_skip_rotates_to_back() {
        let mut d = drill(DrillKind::Speed, 3, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let first = d.current_word().unwrap().id.clone();
        d.apply(DrillEvent::Skip, t0);
        d.apply(DrillEvent::Skip, t0);
        d.apply(DrillEvent::Skip, t0);
        assert_eq!(d.current_word().unwrap().id, first);
    }

    #[test]
    fn test_speed_give_up_reports_wpm() {
        let mut d = drill(DrillKind::Speed, 5, Some("user-1"));
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        for _ in 0..3 {
            let raw = answer(&d);
            d.apply(DrillEvent::Submit(raw), t0);
        }
        let update = d.apply(DrillEvent::GiveUp, at(t0, 30));
        assert!(d.is_finished());
        let result = d.result().unwrap();
        assert_eq!(result.words_per_minute, Some(6.0));
        assert_eq!(result.accuracy, 100.0);
        assert!(matches!(&update.effects[..], [Effect::SaveDrillResult(r)] if r.kind == DrillKind::Speed));
    }

    #[test]
    fn test_give_up_ignored_in_accuracy() {
        let mut d = drill(DrillKind::Accuracy, 5, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        d.apply(DrillEvent::GiveUp, t0);
        assert_eq!(d.phase(), DrillPhase::Running);
    }

    #[test]
    fn test_zero_elapsed_wpm_is_zero() {
        let mut d = drill(DrillKind::Speed, 2, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        d.apply(DrillEvent::GiveUp, t0);
        assert_eq!(d.result().unwrap().words_per_minute, Some(0.0));
        assert_eq!(d.result().unwrap().accuracy, 0.0);
    }

    #[test]
    fn test_guest_result_not_persisted() {
        let mut d = drill(DrillKind::Speed, 2, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let update = d.apply(DrillEvent::GiveUp, at(t0, 10));
        assert!(update.effects.is_empty());
        assert!(d.result().is_some(), "guests still see their result");
    }

    #[test]
    fn test_input_changed_auto_submits_on_match() {
        let mut d = drill(DrillKind::Speed, 3, None);
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let update = d.apply(DrillEvent::InputChanged("an".into()), t0);
        assert_eq!(update.correct, None);
        assert_eq!(d.total_attempts(), 0);
        let raw = answer(&d).to_uppercase();
        let update = d.apply(DrillEvent::InputChanged(raw), t0);
        assert_eq!(update.correct, Some(true));
        assert_eq!(d.total_attempts(), 1);
    }

    #[test]
    fn test_composite_set_result_targets_constituent() {
        let mut word = Word::new("w0", "h", &["a"]);
        word.origin_set_id = Some(SET.into());
        let other = "9a9a9a9a-2222-4333-8444-955566677788";
        let composite = WordSet::new(format!("combined:{SET}+{other}"), "Mixed", vec![word]);
        let mut d = TimedDrill::new(
            DrillKind::Accuracy,
            &composite,
            Some("user-1".into()),
            DrillSettings::default(),
            Box::new(SmallRng::seed_from_u64(1)),
        );
        let t0 = Instant::now();
        d.apply(DrillEvent::Start, t0);
        let update = d.apply(DrillEvent::Submit("a".into()), at(t0, 5));
        match &update.effects[..] {
            [Effect::SaveDrillResult(result)] => assert_eq!(result.set_id, SET),
            other => panic!("unexpected effects {other:?}"),
        }
    }
}
