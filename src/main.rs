mod app;
mod event;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;
use tracing::info;

use lexdrill::config::{Config, SavedConfig};
use lexdrill::engine::{PolicyKind, ProgressModel};
use lexdrill::session::{DrillKind, GameMode};
use lexdrill::sets::bulk::{parse_answers, parse_bulk};
use lexdrill::store::{JsonProgressStore, ProgressStore, SetLibrary};

use app::{App, AppScreen, SETTINGS_FIELDS};
use event::{AppEvent, EventHandler};
use ui::answer_input::InputResult;
use ui::components::dashboard::Dashboard;
use ui::components::feedback_list::FeedbackList;
use ui::components::menu::{MenuAction, MenuView};
use ui::components::progress_bar::ProgressBar;
use ui::components::set_list::SetList;
use ui::components::word_prompt::{PromptBody, WordPrompt};
use ui::layout::AppLayout;
use ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "en");

fn parse_policy(value: &str) -> Result<PolicyKind, String> {
    PolicyKind::from_key(value).ok_or_else(|| {
        let keys: Vec<&str> = PolicyKind::ALL.iter().map(|p| p.key()).collect();
        format!("expected one of: {}", keys.join(", "))
    })
}

#[derive(Parser)]
#[command(name = "lexdrill", version, about = "Terminal vocabulary trainer with adaptive word selection")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Play as this user (progress is kept per user)")]
    user: Option<String>,

    #[arg(long, help = "Play as a guest even if a user is configured")]
    guest: bool,

    #[arg(short, long, help = "Path to an alternative config.toml")]
    config: Option<PathBuf>,

    #[arg(short, long, value_parser = parse_policy, help = "Word selection policy (weighted, minimum-tier)")]
    policy: Option<PolicyKind>,

    #[arg(short, long, help = "Interface language (en, uk)")]
    locale: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Manage word sets
    #[command(subcommand)]
    Sets(SetsCommand),
    /// Manage the words of a set
    #[command(subcommand)]
    Words(WordsCommand),
    /// Show learning progress and the latest drill results for a set
    Progress { set_id: String },
}

#[derive(Subcommand)]
enum SetsCommand {
    List,
    Create { name: String },
    Rename { set_id: String, name: String },
    Delete { set_id: String },
}

#[derive(Subcommand)]
enum WordsCommand {
    /// List the words of a set
    List { set_id: String },
    /// Add one word; answers are comma separated
    Add {
        set_id: String,
        hint: String,
        answers: String,
    },
    /// Add every `hint - answer, answer` line of a file
    Import { set_id: String, file: PathBuf },
    Update {
        word_id: String,
        hint: String,
        answers: String,
    },
    Delete { word_id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let file_config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_from(&config_path).unwrap_or_default(),
    };
    let mut config = file_config.clone();
    if let Some(user) = cli.user {
        config.user_id = Some(user);
    }
    if cli.guest {
        config.user_id = None;
    }
    if let Some(policy) = cli.policy {
        config.selection_policy = policy;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate();
    rust_i18n::set_locale(&config.locale);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Some(command) => {
            lexdrill::logging::init_stderr_tracing(&config.log_level);
            run_command(command, &config, &runtime)
        }
        None => {
            let _log_guard = lexdrill::logging::init_file_tracing(
                &config.log_level,
                &config.data_path().join("logs"),
            );
            run_tui(config, SavedConfig::new(config_path, file_config), &runtime)
        }
    }
}

fn run_command(command: Command, config: &Config, runtime: &tokio::runtime::Runtime) -> Result<()> {
    let library = SetLibrary::new(&config.data_path())?;
    match command {
        Command::Sets(SetsCommand::List) => {
            for set in library.list_sets()? {
                println!("{}  {} ({} words)", set.id, set.name, set.words.len());
            }
        }
        Command::Sets(SetsCommand::Create { name }) => {
            let set = library.create_set(&name)?;
            println!("{}", set.id);
        }
        Command::Sets(SetsCommand::Rename { set_id, name }) => library.rename_set(&set_id, &name)?,
        Command::Sets(SetsCommand::Delete { set_id }) => library.delete_set(&set_id)?,
        Command::Words(WordsCommand::List { set_id }) => {
            for word in library.get_set(&set_id)?.words {
                println!("{}  {} - {}", word.id, word.hint, word.answer_text());
            }
        }
        Command::Words(WordsCommand::Add {
            set_id,
            hint,
            answers,
        }) => {
            let word = library.add_word(&set_id, &hint, &parse_answers(&answers))?;
            println!("{}", word.id);
        }
        Command::Words(WordsCommand::Import { set_id, file }) => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let items = parse_bulk(&content);
            let added = library.add_words_bulk(&set_id, &items)?;
            println!("added {} words", added.len());
        }
        Command::Words(WordsCommand::Update {
            word_id,
            hint,
            answers,
        }) => library.update_word(&word_id, &hint, &parse_answers(&answers))?,
        Command::Words(WordsCommand::Delete { word_id }) => library.delete_word(&word_id)?,
        Command::Progress { set_id } => {
            let set = library.get_set(&set_id)?;
            let store = JsonProgressStore::new(&config.data_path())?;
            let user = config.user_id.as_deref();
            let model = ProgressModel::new(config.learned_threshold);
            runtime.block_on(async {
                let stored = lexdrill::store::load_set_progress(&store, user, &set).await;
                let words: Vec<_> = set
                    .words
                    .iter()
                    .map(|w| {
                        let counter = stored.get(&w.id).map_or(0, |p| p.progress_counter);
                        w.clone().with_counter(counter)
                    })
                    .collect();
                let learned = words.iter().filter(|w| model.is_learned(w)).count();
                println!(
                    "{}: {}% ({learned}/{} learned)",
                    set.name,
                    model.calc_progress(&words),
                    words.len()
                );
                let stats = lexdrill::store::load_set_stats(&store, user, &set).await;
                println!("answers: {}/{} correct", stats.correct, stats.attempts);

                let Some(user) = user else {
                    return Ok::<(), anyhow::Error>(());
                };
                for kind in [DrillKind::Accuracy, DrillKind::Speed] {
                    if let Some(result) = store.get_drill_result(user, kind, &set.id).await? {
                        println!(
                            "{}: {:.2}% accuracy, {} words, {:.1}s{}",
                            kind.key(),
                            result.accuracy,
                            result.words_completed,
                            result.time_spent_secs,
                            result
                                .words_per_minute
                                .map(|wpm| format!(", {wpm:.2} wpm"))
                                .unwrap_or_default(),
                        );
                    }
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

fn run_tui(
    config: Config,
    saved_config: SavedConfig,
    runtime: &tokio::runtime::Runtime,
) -> Result<()> {
    let data_path = config.data_path();
    let library = SetLibrary::new(&data_path)?;
    let store: Arc<dyn ProgressStore> = Arc::new(JsonProgressStore::new(&data_path)?);
    let theme: &'static Theme = Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));
    info!(user = ?config.user_id, data_dir = %data_path.display(), "starting");

    let mut app = App::new(
        config,
        saved_config,
        theme,
        library,
        store,
        runtime.handle().clone(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::SetPicker => handle_picker_key(app, key),
        AppScreen::Education if app.mode == GameMode::Flashcard => handle_flashcard_key(app, key),
        AppScreen::Education => handle_education_key(app, key),
        AppScreen::DrillIntro => handle_intro_key(app, key),
        AppScreen::Drill => handle_drill_key(app, key),
        AppScreen::DrillResult => handle_result_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Start(mode) => app.start(mode),
        MenuAction::PickSets => app.go_to_picker(),
        MenuAction::Settings => app.go_to_settings(),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                run_menu_action(app, action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.picker_move(true),
        KeyCode::Char(' ') => app.picker_toggle(),
        KeyCode::Tab => app.cycle_mode(),
        KeyCode::Enter => app.start(app.mode),
        _ => {}
    }
}

fn handle_education_key(app: &mut App, key: KeyEvent) {
    match app.input.handle(key) {
        InputResult::Cancel => app.go_to_menu(),
        result => app.handle_answer_key(result),
    }
}

fn handle_flashcard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char(' ') | KeyCode::Enter if !app.revealed => app.reveal(),
        KeyCode::Char('y') | KeyCode::Right if app.revealed => app.grade(true),
        KeyCode::Char('n') | KeyCode::Left if app.revealed => app.grade(false),
        _ => {}
    }
}

fn handle_intro_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.begin_drill(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.skip(),
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => app.give_up(),
        _ => match app.input.handle(key) {
            InputResult::Cancel => app.quit_drill(),
            result => app.handle_answer_key(result),
        },
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_settings();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::SetPicker => render_picker(frame, app),
        AppScreen::Education => render_education(frame, app),
        AppScreen::DrillIntro => render_drill_intro(frame, app),
        AppScreen::Drill => render_drill(frame, app),
        AppScreen::DrillResult => render_result(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let user = app
        .config
        .user_id
        .clone()
        .unwrap_or_else(|| t!("app.guest").to_string());
    let header = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " lexdrill ",
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("| {user} | {info}"),
                Style::default().fg(colors.muted()).bg(colors.header_bg()),
            ),
        ]),
    ])
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, keys: &str) {
    let colors = &app.theme.colors;
    let mut spans = vec![Span::styled(keys.to_string(), Style::default().fg(colors.muted()))];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(format!(" {notice}"), Style::default().fg(colors.warning())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn main_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area)
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = main_layout(frame.area());
    let selection = app
        .selection_label()
        .unwrap_or_else(|| t!("menu.nothing_selected").to_string());

    render_header(frame, app, layout[0], &selection);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(
        MenuView {
            menu: &app.menu,
            selection_label: &selection,
            theme: app.theme,
        },
        menu_area,
    );

    render_footer(frame, app, layout[2], &t!("menu.footer"));
}

fn render_picker(frame: &mut ratatui::Frame, app: &App) {
    let layout = main_layout(frame.area());
    let selection = app
        .selection_label()
        .unwrap_or_else(|| t!("menu.nothing_selected").to_string());
    render_header(frame, app, layout[0], &selection);

    let area = ui::layout::centered_rect(60, 80, layout[1]);
    frame.render_widget(
        SetList {
            sets: &app.sets,
            selection: &app.selection,
            cursor: app.picker_cursor,
            mode: app.mode,
            theme: app.theme,
        },
        area,
    );

    render_footer(frame, app, layout[2], &t!("picker.footer"));
}

fn render_education(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.education.as_ref() else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;
    let flashcard = app.mode == GameMode::Flashcard;

    let title = if flashcard {
        t!("flashcard.title")
    } else {
        t!("education.title")
    };
    let stats = session.stats();
    let info = format!(
        "{title}: {} | {}% | {}",
        session.set_name(),
        session.progress(),
        t!("education.stats", correct = stats.correct, attempts = stats.attempts)
    );
    render_header(frame, app, app_layout.header, &info);

    let show_progress = tier.show_progress_bar(area.height);
    let show_feedback = tier.show_inline_feedback(area.height);
    let mut constraints = vec![Constraint::Min(7)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    if show_feedback {
        constraints.push(Constraint::Length(6));
    }
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    match session.current_word() {
        Some(word) => {
            let answers = word.answer_text();
            let body = if flashcard {
                PromptBody::Card {
                    revealed: app.revealed.then_some(answers.as_str()),
                }
            } else {
                PromptBody::Typed(&app.input)
            };
            frame.render_widget(
                WordPrompt {
                    hint: &word.hint,
                    body,
                    status: &app.status,
                    review: session.is_review(),
                    theme: app.theme,
                },
                main[0],
            );
        }
        None => {
            let idle = Paragraph::new(Line::from(Span::styled(
                t!("education.idle").to_string(),
                Style::default().fg(colors.warning()),
            )))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(colors.border())));
            frame.render_widget(idle, main[0]);
        }
    }

    let mut idx = 1;
    if show_progress {
        let model = ProgressModel::new(app.config.learned_threshold);
        let learned = session.words().iter().filter(|w| model.is_learned(w)).count();
        let bar = ProgressBar::new(&t!("education.learned"), session.progress(), app.theme)
            .detail(format!("{learned}/{}", session.words().len()));
        frame.render_widget(bar, main[idx]);
        idx += 1;
    }
    if show_feedback {
        frame.render_widget(
            FeedbackList {
                entries: session.feedback(),
                theme: app.theme,
            },
            main[idx],
        );
    }
    if let Some(sidebar) = app_layout.sidebar {
        frame.render_widget(
            FeedbackList {
                entries: session.feedback(),
                theme: app.theme,
            },
            sidebar,
        );
    }

    let footer = if !flashcard {
        t!("education.footer")
    } else if app.revealed {
        t!("flashcard.footer_revealed")
    } else {
        t!("flashcard.footer_hidden")
    };
    render_footer(frame, app, app_layout.footer, &footer);
}

fn drill_title(kind: DrillKind) -> String {
    match kind {
        DrillKind::Accuracy => t!("drill.accuracy_title").to_string(),
        DrillKind::Speed => t!("drill.speed_title").to_string(),
    }
}

fn render_drill_intro(frame: &mut ratatui::Frame, app: &App) {
    let Some(drill) = app.drill.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(50, 40, frame.area());

    let block = Block::bordered()
        .title(format!(" {} ", drill_title(drill.kind())))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let description = if drill.pool_size() == 0 {
        t!("drill.empty").to_string()
    } else {
        match drill.kind() {
            DrillKind::Accuracy => {
                t!("drill.intro_accuracy", count = drill.pool_size(), set = drill.set_name())
                    .to_string()
            }
            DrillKind::Speed => t!("drill.intro_speed", set = drill.set_name()).to_string(),
        }
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(description, Style::default().fg(colors.fg()))),
        Line::from(""),
        Line::from(Span::styled(
            t!("drill.time_budget", secs = drill.remaining_secs()).to_string(),
            Style::default().fg(colors.hint()),
        )),
        Line::from(""),
    ];
    if let Some(previous) = &app.previous_result {
        lines.push(Line::from(Span::styled(
            t!(
                "result.best",
                value = ui::components::dashboard::headline(previous)
            )
            .to_string(),
            Style::default().fg(colors.muted()),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );

    let footer_area = Rect::new(area.x, area.y + area.height, area.width, 1)
        .intersection(frame.area());
    render_footer(frame, app, footer_area, &t!("drill.intro_footer"));
}

fn render_drill(frame: &mut ratatui::Frame, app: &App) {
    let Some(drill) = app.drill.as_ref() else {
        return;
    };
    let area = frame.area();
    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let progress_text = match drill.kind() {
        DrillKind::Accuracy => t!(
            "drill.completed",
            done = drill.completed_count(),
            total = drill.pool_size()
        ),
        DrillKind::Speed => t!("drill.answered", count = drill.correct_count()),
    };
    let info = format!(
        "{}: {} | {} | {}",
        drill_title(drill.kind()),
        drill.set_name(),
        t!("drill.remaining", secs = drill.remaining_secs()),
        progress_text
    );
    render_header(frame, app, app_layout.header, &info);

    let show_progress = tier.show_progress_bar(area.height);
    let mut constraints = vec![Constraint::Min(7)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    if let Some(word) = drill.current_word() {
        frame.render_widget(
            WordPrompt {
                hint: &word.hint,
                body: PromptBody::Typed(&app.input),
                status: &app.status,
                review: false,
                theme: app.theme,
            },
            main[0],
        );
    }

    if show_progress {
        let budget = app.config.drill_time_budget_secs.max(1);
        let percent = match drill.kind() {
            DrillKind::Accuracy => {
                (drill.completed_count() * 100 / drill.pool_size().max(1)) as u8
            }
            DrillKind::Speed => ((budget - drill.remaining_secs().min(budget)) * 100 / budget) as u8,
        };
        let bar = ProgressBar::new(&drill_title(drill.kind()), percent, app.theme)
            .detail(progress_text.to_string());
        frame.render_widget(bar, main[1]);
    }

    let footer = match drill.kind() {
        DrillKind::Accuracy => t!("drill.footer_accuracy"),
        DrillKind::Speed => t!("drill.footer_speed"),
    };
    render_footer(frame, app, app_layout.footer, &footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(result) = app.last_result() {
        let centered = ui::layout::centered_rect(50, 60, area);
        let dashboard = Dashboard::new(result, app.previous_result.as_ref(), app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(t!("settings.title").to_string())
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |value: bool| {
        if value {
            t!("settings.on").to_string()
        } else {
            t!("settings.off").to_string()
        }
    };
    let fields: Vec<(String, String)> = vec![
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (t!("settings.locale").to_string(), app.config.locale.clone()),
        (
            t!("settings.policy").to_string(),
            match app.config.selection_policy {
                PolicyKind::Weighted => t!("policy.weighted").to_string(),
                PolicyKind::MinimumTier => t!("policy.minimum-tier").to_string(),
            },
        ),
        (
            t!("settings.threshold").to_string(),
            app.config.learned_threshold.to_string(),
        ),
        (
            t!("settings.time_budget").to_string(),
            app.config.drill_time_budget_secs.to_string(),
        ),
        (
            t!("settings.track_stats").to_string(),
            on_off(app.config.track_set_stats),
        ),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        t!("settings.help").to_string(),
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.hint()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        t!("settings.footer").to_string(),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
