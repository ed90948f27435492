mod app;
mod event;
mod logging;
mod ui;

use wordtrainer::{config, engine, session, store, words};

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use session::SessionMode;
use ui::components::progress_bar::ProgressBar;
use ui::components::stats_panel::StatsPanel;
use ui::components::word_card::WordCard;
use ui::layout::{AppLayout, format_clock, training_hints};

#[derive(Parser)]
#[command(
    name = "wordtrainer",
    version,
    about = "Terminal flashcard vocabulary trainer"
)]
struct Cli {
    #[arg(short, long, help = "Word source to select at startup (e.g. verbs.json)")]
    source: Option<String>,

    #[arg(short, long, help = "Directory with word lists and files.json")]
    words_dir: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config: {err}");
        Config::default()
    });
    if let Some(source) = cli.source {
        config.default_source = source;
    }
    if let Some(dir) = cli.words_dir {
        config.words_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(theme) = cli.theme {
        if !ui::theme::Theme::available_themes().contains(&theme) {
            eprintln!("Unknown bundled theme '{theme}', looking in the user theme dir");
        }
        config.theme = theme;
    }

    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordtrainer");
    let _log_guard = logging::init(&data_dir, &config.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));
    app.set_event_sender(events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
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
            AppEvent::WordsLoaded(loaded) => app.on_words_loaded(loaded),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.stop_session();
        app.should_quit = true;
        return;
    }

    // Nothing but cancel while words are loading.
    if app.is_loading() {
        if key.code == KeyCode::Esc {
            app.go_to_menu();
        }
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Loading => {}
        AppScreen::Card => handle_card_key(app, key),
        AppScreen::StatsOverlay => handle_stats_key(app, key),
        AppScreen::InactivityPrompt => handle_inactivity_key(app, key),
        AppScreen::Break => {}
        AppScreen::Complete => handle_complete_key(app, key),
        AppScreen::NoWords => handle_no_words_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => app.cycle_mode(),
        KeyCode::Char('e') => {
            app.menu.mode = SessionMode::Exam;
            app.refresh_menu();
        }
        KeyCode::Char('t') => {
            app.menu.mode = SessionMode::Training;
            app.refresh_menu();
        }
        KeyCode::Char('x') => app.redo_session(),
        KeyCode::Enter => app.start_session(),
        _ => {}
    }
}

fn handle_card_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') => app.reveal(),
        KeyCode::Char('y') => app.answer(true),
        KeyCode::Char('n') => app.answer(false),
        KeyCode::Right | KeyCode::Char('l') => app.next_word(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_word(),
        KeyCode::Char('r') => app.toggle_direction(),
        KeyCode::Char('s') | KeyCode::Esc => app.show_stats(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') | KeyCode::Enter | KeyCode::Esc => app.close_stats(),
        KeyCode::Char('q') => app.stop_session(),
        _ => {}
    }
}

fn handle_inactivity_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') | KeyCode::Enter => app.resume_after_inactivity(),
        KeyCode::Char('x') => app.restart_session(),
        KeyCode::Char('q') | KeyCode::Esc => app.stop_session(),
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('x') => app.restart_session(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_no_words_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
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
        AppScreen::Loading => render_message(frame, app, " Loading ", &["Loading words..."], "[Esc] Cancel"),
        AppScreen::Card => render_card(frame, app),
        AppScreen::StatsOverlay => {
            render_card(frame, app);
            render_stats_overlay(frame, app);
        }
        AppScreen::InactivityPrompt => render_message(
            frame,
            app,
            " Paused ",
            &["Are you still there?", "", "The session clock stopped after inactivity."],
            "[c] Continue  [x] Restart  [q] Stop",
        ),
        AppScreen::Break => render_break(frame, app),
        AppScreen::Complete => render_complete(frame, app),
        AppScreen::NoWords => {
            let detail = app.load_error.as_deref().unwrap_or("The selected source has no words.");
            render_message(frame, app, " No words found ", &[detail], "[Enter] Back to menu")
        }
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordtrainer ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {hints} "),
        Style::default().fg(app.theme.colors.text_muted()),
    )));
    frame.render_widget(footer, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(" | best session {}", format_clock(app.timer.high_score_secs));
    render_header(frame, app, layout[0], &header_info);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_footer(
        frame,
        app,
        layout[2],
        "[Enter] Start  [Tab] Mode  [x] Redo  [j/k] Select  [q] Quit",
    );
}

fn render_card(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = &app.session else {
        return;
    };
    let Some(card) = session.card() else {
        return;
    };
    let app_layout = AppLayout::new(frame.area());

    let mode = session.mode().map_or("", SessionMode::label);
    let header_info = format!(
        " | {mode} | {} | {} left | {}",
        session.source_id(),
        session.remaining(),
        format_clock(app.timer.elapsed_secs),
    );
    render_header(frame, app, app_layout.header, &header_info);

    let main = if app_layout.tier.show_progress_bar(app_layout.main.height) {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(3)])
            .split(app_layout.main);
        let total = session.roster().len();
        let done = total - session.remaining();
        frame.render_widget(ProgressBar::new(done, total, app.theme), split[1]);
        split[0]
    } else {
        app_layout.main
    };

    let position = (session.current_index() + 1, session.roster().len());
    frame.render_widget(WordCard::new(&card, position, app.theme), main);

    if let Some(sidebar) = app_layout.sidebar {
        let stats = session.stats();
        frame.render_widget(
            StatsPanel::new("Session", &stats, app.theme)
                .with_clock(Some(app.timer.elapsed_secs), app.timer.high_score_secs),
            sidebar,
        );
    }

    let hints = match session.mode() {
        Some(SessionMode::Exam) if session.is_revealed() => {
            "[y] Knew it  [n] Didn't  [r] Swap direction  [s] Stop".to_string()
        }
        Some(SessionMode::Exam) => "[Space] Reveal  [s] Stop".to_string(),
        _ => training_hints(session.has_previous(), session.has_next()),
    };
    render_footer(frame, app, app_layout.footer, &hints);
}

fn render_stats_overlay(frame: &mut ratatui::Frame, app: &App) {
    let Some(stats) = &app.last_stats else {
        return;
    };
    let area = ui::layout::centered_rect(50, 60, frame.area());
    render_panel_with_hint(
        frame,
        app,
        area,
        StatsPanel::new("Session stats", stats, app.theme)
            .with_clock(Some(app.timer.elapsed_secs), app.timer.high_score_secs),
        "[c] Continue  [q] Stop and save",
    );
}

fn render_complete(frame: &mut ratatui::Frame, app: &App) {
    let Some(stats) = &app.last_stats else {
        return;
    };
    let area = ui::layout::centered_rect(60, 70, frame.area());
    render_panel_with_hint(
        frame,
        app,
        area,
        StatsPanel::new("All words known", stats, app.theme)
            .with_clock(None, app.timer.high_score_secs),
        "[Enter] Menu  [x] Restart from scratch",
    );
}

fn render_panel_with_hint(
    frame: &mut ratatui::Frame,
    app: &App,
    area: ratatui::layout::Rect,
    panel: StatsPanel<'_>,
    hint: &str,
) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(area);
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(panel, split[0]);
    let hint = Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.colors.accent()),
    )))
    .alignment(Alignment::Center)
    .style(Style::default().bg(app.theme.colors.bg()));
    frame.render_widget(hint, split[1]);
}

fn render_break(frame: &mut ratatui::Frame, app: &App) {
    let remaining = format!("Back in {}", format_clock(app.break_remaining_secs()));
    let best = format!("Longest session: {}", format_clock(app.timer.high_score_secs));
    render_message(
        frame,
        app,
        " Break time ",
        &["Time to rest your eyes.", "", remaining.as_str(), best.as_str()],
        "The session resumes on its own",
    );
}

fn render_message(frame: &mut ratatui::Frame, app: &App, title: &str, lines: &[&str], hint: &str) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(40, 30, frame.area());

    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut body = vec![Line::from("")];
    body.extend(
        lines
            .iter()
            .map(|line| Line::from(Span::styled(*line, Style::default().fg(colors.fg())))),
    );
    Paragraph::new(body)
        .alignment(Alignment::Center)
        .render(layout[0], frame.buffer_mut());

    Paragraph::new(Line::from(Span::styled(
        hint,
        Style::default().fg(colors.text_muted()),
    )))
    .alignment(Alignment::Center)
    .render(layout[1], frame.buffer_mut());
}
