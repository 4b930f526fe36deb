use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::runtime::Handle;
use tracing::{info, warn};

use lexdrill::config::{Config, LOCALES, SavedConfig, Setting};
use lexdrill::engine::PolicyKind;
use lexdrill::session::result::DrillResult;
use lexdrill::session::{
    DrillEvent, DrillKind, DrillPhase, EducationEvent, EducationSession, Effect, GameMode,
    TimedDrill,
};
use lexdrill::sets::{SetSelection, WordSet, resolve_target_set_id};
use lexdrill::store::{
    ProgressStore, ProgressWriter, SetLibrary, load_set_progress, load_set_stats,
};

use crate::ui::answer_input::{AnswerInput, InputResult};
use crate::ui::components::menu::Menu;
use crate::ui::components::set_list;
use crate::ui::components::word_prompt::AnswerStatus;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    SetPicker,
    Education,
    DrillIntro,
    Drill,
    DrillResult,
    Settings,
}

pub const SETTINGS_FIELDS: usize = Setting::ALL.len();

pub struct App {
    pub screen: AppScreen,
    pub mode: GameMode,
    pub menu: Menu,
    pub theme: &'static Theme,
    /// Effective config: the file plus command-line overrides.
    pub config: Config,
    saved_config: SavedConfig,
    pub sets: Vec<WordSet>,
    pub selection: SetSelection,
    pub picker_cursor: usize,
    pub education: Option<EducationSession>,
    pub drill: Option<TimedDrill>,
    pub input: AnswerInput,
    pub status: AnswerStatus,
    pub revealed: bool,
    /// Stored result for the same drill and set, read before this run.
    pub previous_result: Option<DrillResult>,
    pub notice: Option<String>,
    pub settings_selected: usize,
    pub should_quit: bool,
    library: SetLibrary,
    store: Arc<dyn ProgressStore>,
    writer: Option<ProgressWriter>,
    runtime: Handle,
}

impl App {
    pub fn new(
        config: Config,
        saved_config: SavedConfig,
        theme: &'static Theme,
        library: SetLibrary,
        store: Arc<dyn ProgressStore>,
        runtime: Handle,
    ) -> Self {
        let writer = ProgressWriter::spawn(store.clone(), &runtime);
        let mut app = Self {
            screen: AppScreen::Menu,
            mode: GameMode::default(),
            menu: Menu::new(),
            theme,
            config,
            saved_config,
            sets: Vec::new(),
            selection: SetSelection::default(),
            picker_cursor: 0,
            education: None,
            drill: None,
            input: AnswerInput::default(),
            status: AnswerStatus::None,
            revealed: false,
            previous_result: None,
            notice: None,
            settings_selected: 0,
            should_quit: false,
            library,
            store,
            writer: Some(writer),
            runtime,
        };
        app.reload_sets();
        app
    }

    pub fn reload_sets(&mut self) {
        match self.library.list_sets() {
            Ok(sets) => self.sets = sets,
            Err(err) => {
                warn!(%err, "could not read word sets");
                self.notice = Some(err.to_string());
            }
        }
        if self.selection.is_empty()
            && let Some(first) = self.sets.first()
        {
            self.selection = SetSelection::new(vec![first.id.clone()]);
        }
    }

    /// Display label for the current selection.
    pub fn selection_label(&self) -> Option<String> {
        self.selection
            .resolve(&self.sets, self.mode)
            .map(|set| set.name)
    }

    pub fn user_id(&self) -> Option<String> {
        self.config.user_id.clone()
    }

    fn persist(&self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        if let Some(writer) = &self.writer {
            writer.submit(effects);
        }
    }

    fn rng() -> Box<SmallRng> {
        Box::new(SmallRng::from_entropy())
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.selection.restrict_for(mode);
    }

    pub fn go_to_menu(&mut self) {
        self.education = None;
        self.drill = None;
        self.input.clear();
        self.status = AnswerStatus::None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_picker(&mut self) {
        self.reload_sets();
        let rows = set_list::row_ids(&self.sets).len();
        self.picker_cursor = self.picker_cursor.min(rows.saturating_sub(1));
        self.screen = AppScreen::SetPicker;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn picker_toggle(&mut self) {
        let ids = set_list::row_ids(&self.sets);
        if let Some(id) = ids.get(self.picker_cursor) {
            let id = id.to_string();
            self.selection.toggle(&id, self.mode);
        }
    }

    pub fn picker_move(&mut self, down: bool) {
        let rows = set_list::row_ids(&self.sets).len();
        if down {
            self.picker_cursor = (self.picker_cursor + 1).min(rows.saturating_sub(1));
        } else {
            self.picker_cursor = self.picker_cursor.saturating_sub(1);
        }
    }

    pub fn cycle_mode(&mut self) {
        let idx = GameMode::ALL
            .iter()
            .position(|m| *m == self.mode)
            .unwrap_or(0);
        self.set_mode(GameMode::ALL[(idx + 1) % GameMode::ALL.len()]);
    }

    /// Builds a session for `mode` from the current selection. Without a
    /// usable selection the set picker opens instead.
    pub fn start(&mut self, mode: GameMode) {
        self.set_mode(mode);
        self.notice = None;
        self.input.clear();
        self.status = AnswerStatus::None;
        self.revealed = false;

        let Some(set) = self.selection.resolve(&self.sets, mode) else {
            self.go_to_picker();
            return;
        };
        let user_id = self.user_id();
        // Earlier answers may still be queued; the store must see them first.
        self.flush_writes();

        match mode.drill_kind() {
            None => {
                let store = self.store.as_ref();
                let (stored, stats) = self.runtime.block_on(async {
                    let stored = load_set_progress(store, user_id.as_deref(), &set).await;
                    let stats = load_set_stats(store, user_id.as_deref(), &set).await;
                    (stored, stats)
                });
                let session = EducationSession::new(
                    &set,
                    &stored,
                    stats,
                    user_id,
                    self.config.education_settings(),
                    self.config.selection_policy.build(),
                    Self::rng(),
                );
                self.education = Some(session);
                self.drill = None;
                self.screen = AppScreen::Education;
            }
            Some(kind) => {
                let previous = self
                    .drill
                    .as_ref()
                    .and_then(|d| d.result())
                    .filter(|r| {
                        r.kind == kind && Some(&r.set_id) == resolve_target_set_id(&set).as_ref()
                    })
                    .cloned();
                self.previous_result = match previous {
                    Some(result) => Some(result),
                    None => self.fetch_previous_result(kind, &set),
                };
                self.drill = Some(TimedDrill::new(
                    kind,
                    &set,
                    user_id,
                    self.config.drill_settings(),
                    Self::rng(),
                ));
                self.education = None;
                self.screen = AppScreen::DrillIntro;
            }
        }
        info!(mode = ?mode, set = %set.name, "session started");
    }

    fn flush_writes(&self) {
        if let Some(writer) = &self.writer {
            self.runtime.block_on(writer.flush());
        }
    }

    fn fetch_previous_result(
        &self,
        kind: DrillKind,
        set: &WordSet,
    ) -> Option<DrillResult> {
        let user_id = self.config.user_id.as_deref()?;
        let target = resolve_target_set_id(set)?;
        self.runtime
            .block_on(self.store.get_drill_result(user_id, kind, &target))
            .unwrap_or_else(|err| {
                warn!(%err, "previous drill result unavailable");
                None
            })
    }

    pub fn retry(&mut self) {
        self.start(self.mode);
    }

    pub fn begin_drill(&mut self) {
        let Some(drill) = self.drill.as_mut() else {
            return;
        };
        drill.apply(DrillEvent::Start, Instant::now());
        if drill.phase() == DrillPhase::Running {
            self.screen = AppScreen::Drill;
        }
    }

    fn apply_drill(&mut self, event: DrillEvent) -> Option<bool> {
        let drill = self.drill.as_mut()?;
        let update = drill.apply(event, Instant::now());
        let finished = drill.is_finished();
        self.persist(update.effects);
        if finished {
            self.input.clear();
            self.screen = AppScreen::DrillResult;
        }
        update.correct
    }

    fn apply_education(&mut self, event: EducationEvent) -> Option<bool> {
        let session = self.education.as_mut()?;
        let answers = session.current_word().map(|w| w.answer_text());
        let update = session.apply(event);
        self.persist(update.effects);
        match update.correct {
            Some(true) => self.status = AnswerStatus::Correct,
            Some(false) => {
                self.status = AnswerStatus::Wrong {
                    answers: answers.unwrap_or_default(),
                }
            }
            None => {}
        }
        update.correct
    }

    /// Routes a key to the answer field and grades the result.
    pub fn handle_answer_key(&mut self, result: InputResult) {
        let value = self.input.value().to_string();
        let graded = match result {
            InputResult::Submit => match self.screen {
                AppScreen::Education => self.apply_education(EducationEvent::Submit(value)),
                AppScreen::Drill => {
                    let correct = self.apply_drill(DrillEvent::Submit(value));
                    self.status = match correct {
                        Some(false) => AnswerStatus::Miss,
                        Some(true) => AnswerStatus::Correct,
                        None => AnswerStatus::None,
                    };
                    correct
                }
                _ => None,
            },
            InputResult::Changed => match self.screen {
                AppScreen::Education => {
                    self.apply_education(EducationEvent::InputChanged(value))
                }
                AppScreen::Drill => {
                    let correct = self.apply_drill(DrillEvent::InputChanged(value));
                    if correct.is_some() {
                        self.status = AnswerStatus::Correct;
                    }
                    correct
                }
                _ => None,
            },
            InputResult::Continue | InputResult::Cancel => None,
        };
        // Any graded answer moves on to a new prompt.
        if graded.is_some() {
            self.input.clear();
        }
    }

    pub fn reveal(&mut self) {
        if self.education.as_ref().is_some_and(|s| s.current_word().is_some()) {
            self.revealed = true;
        }
    }

    pub fn grade(&mut self, knew: bool) {
        if !self.revealed {
            return;
        }
        self.apply_education(EducationEvent::Grade { knew });
        self.revealed = false;
        self.status = AnswerStatus::None;
    }

    pub fn skip(&mut self) {
        self.apply_drill(DrillEvent::Skip);
        self.input.clear();
        self.status = AnswerStatus::None;
    }

    pub fn give_up(&mut self) {
        self.apply_drill(DrillEvent::GiveUp);
    }

    pub fn tick(&mut self) {
        if self.screen == AppScreen::Drill {
            self.apply_drill(DrillEvent::Tick);
        }
    }

    /// Ends a running drill early. Speed drills keep their result; accuracy
    /// drills are abandoned.
    pub fn quit_drill(&mut self) {
        match self.drill.as_ref().map(|d| d.kind()) {
            Some(DrillKind::Speed) => self.give_up(),
            _ => self.go_to_menu(),
        }
    }

    pub fn last_result(&self) -> Option<&DrillResult> {
        self.drill.as_ref().and_then(|d| d.result())
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        let step: i64 = if forward { 1 } else { -1 };
        let Some(&setting) = Setting::ALL.get(self.settings_selected) else {
            return;
        };
        match setting {
            Setting::Theme => {
                if let Some(name) = Theme::cycle(&self.config.theme, forward)
                    && let Some(theme) = Theme::load(&name)
                {
                    self.config.theme = name;
                    self.theme = Box::leak(Box::new(theme));
                }
            }
            Setting::Locale => {
                let idx = LOCALES
                    .iter()
                    .position(|l| *l == self.config.locale)
                    .unwrap_or(0);
                let next = (idx as i64 + step).rem_euclid(LOCALES.len() as i64) as usize;
                self.config.locale = LOCALES[next].to_string();
                rust_i18n::set_locale(&self.config.locale);
            }
            Setting::SelectionPolicy => {
                let idx = PolicyKind::ALL
                    .iter()
                    .position(|p| *p == self.config.selection_policy)
                    .unwrap_or(0);
                let next =
                    (idx as i64 + step).rem_euclid(PolicyKind::ALL.len() as i64) as usize;
                self.config.selection_policy = PolicyKind::ALL[next];
            }
            Setting::LearnedThreshold => {
                self.config.learned_threshold =
                    (self.config.learned_threshold as i64 + step).clamp(1, 100) as u32;
            }
            Setting::DrillTimeBudget => {
                self.config.drill_time_budget_secs =
                    (self.config.drill_time_budget_secs as i64 + step * 30).clamp(30, 3600) as u64;
            }
            Setting::TrackSetStats => self.config.track_set_stats = !self.config.track_set_stats,
        }
        self.saved_config.record(&self.config, setting);
    }

    /// Writes settings changed on the settings screen back to the file the
    /// config was loaded from.
    pub fn save_settings(&mut self) {
        self.config.validate();
        if let Err(err) = self.saved_config.save() {
            warn!(%err, "could not save config");
            self.notice = Some(err.to_string());
        }
    }

    /// Waits for queued progress writes to land.
    pub fn shutdown(&mut self) {
        if let Some(writer) = self.writer.take() {
            self.runtime.block_on(writer.shutdown());
        }
    }
}
