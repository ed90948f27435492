use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::stats::SessionStats;
use crate::engine::timer::{SessionTimer, TimerSignal};
use crate::event::AppEvent;
use crate::session::SessionMode;
use crate::session::state::{AnswerOutcome, Session};
use crate::store::json_store::JsonStore;
use crate::ui::components::menu::{Menu, MenuItem};
use crate::ui::theme::Theme;
use crate::words::loader::{LoadTracker, LoadedWords, spawn_load};
use crate::words::store::WordStore;
use crate::words::{ALL_SOURCES, SourceOption};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Loading,
    Card,
    StatsOverlay,
    InactivityPrompt,
    Break,
    Complete,
    NoWords,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub sources: Vec<SourceOption>,
    pub session: Option<Session>,
    pub timer: SessionTimer,
    pub last_stats: Option<SessionStats>,
    pub load_error: Option<String>,
    pub should_quit: bool,
    store: Option<JsonStore>,
    word_store: Arc<WordStore>,
    loads: LoadTracker,
    events: Option<Sender<AppEvent>>,
    ignore_saved: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(error = %err, "progress will not be saved");
                None
            }
        };
        let high_score = store.as_ref().map_or(0, JsonStore::load_high_score);

        let word_store = Arc::new(WordStore::new(config.words_dir()));
        let mut sources = word_store.list_sources();
        sources.push(SourceOption {
            value: ALL_SOURCES.to_string(),
            label: "All sources".to_string(),
        });

        let mut menu = Menu::new(theme);
        menu.selected = sources
            .iter()
            .position(|s| s.value == config.default_source)
            .unwrap_or(0);

        let timer = SessionTimer::new(config.timer_policy(), high_score);

        let mut app = Self {
            screen: AppScreen::Menu,
            menu,
            theme,
            sources,
            session: None,
            timer,
            last_stats: None,
            load_error: None,
            should_quit: false,
            store,
            word_store,
            loads: LoadTracker::default(),
            events: None,
            ignore_saved: false,
            rng: SmallRng::from_entropy(),
        };
        app.refresh_menu();
        app
    }

    /// Word loads report back through the event loop.
    pub fn set_event_sender(&mut self, tx: Sender<AppEvent>) {
        self.events = Some(tx);
    }

    pub fn selected_source(&self) -> &str {
        self.sources
            .get(self.menu.selected)
            .map_or(ALL_SOURCES, |s| s.value.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loads.is_loading()
    }

    /// Rebuild menu entries, marking sources whose saved exam is finished.
    pub fn refresh_menu(&mut self) {
        let mode = self.menu.mode;
        self.menu.items = self
            .sources
            .iter()
            .map(|source| MenuItem {
                label: source.label.clone(),
                completed: self
                    .store
                    .as_ref()
                    .and_then(|s| s.load_snapshot(&source.value, mode))
                    .is_some_and(|snapshot| snapshot.is_complete()),
            })
            .collect();
        if self.menu.selected >= self.menu.items.len() {
            self.menu.selected = 0;
        }
    }

    pub fn cycle_mode(&mut self) {
        self.menu.mode = match self.menu.mode {
            SessionMode::Exam => SessionMode::Training,
            SessionMode::Training => SessionMode::Exam,
        };
        self.refresh_menu();
    }

    pub fn start_session(&mut self) {
        self.begin_load(false);
    }

    /// Drop saved progress for the selected source and mode, then start over.
    pub fn redo_session(&mut self) {
        let source = self.selected_source().to_string();
        self.clear_saved(&source, self.menu.mode);
        self.begin_load(true);
    }

    fn begin_load(&mut self, ignore_saved: bool) {
        let source = self.selected_source().to_string();
        let request = self.loads.begin(&source, self.menu.mode);
        tracing::info!(
            generation = request.generation,
            source = %source,
            mode = request.mode.as_str(),
            "loading words"
        );

        self.ignore_saved = ignore_saved;
        self.session = None;
        self.load_error = None;
        self.screen = AppScreen::Loading;

        match self.events.clone() {
            Some(tx) => spawn_load(Arc::clone(&self.word_store), request, move |loaded| {
                let _ = tx.send(AppEvent::WordsLoaded(loaded));
            }),
            None => {
                let result = self
                    .word_store
                    .load_words(&request.source_id, request.options());
                self.on_words_loaded(LoadedWords { request, result });
            }
        }
    }

    pub fn on_words_loaded(&mut self, loaded: LoadedWords) {
        if !self.loads.accept(&loaded) {
            return;
        }
        let LoadedWords { request, result } = loaded;

        match result {
            Ok(words) => {
                let saved = if self.ignore_saved {
                    None
                } else {
                    self.store
                        .as_ref()
                        .and_then(|s| s.load_snapshot(&request.source_id, request.mode))
                };
                let session = Session::start(
                    request.mode,
                    &request.source_id,
                    words,
                    saved.as_ref(),
                    &mut self.rng,
                );
                if session.roster().is_empty() {
                    self.screen = AppScreen::NoWords;
                    return;
                }
                self.session = Some(session);
                self.timer.start(Instant::now());
                self.screen = AppScreen::Card;
                self.save_progress();
            }
            Err(err) => {
                let message = format!("{:#}", anyhow::Error::from(err));
                tracing::warn!(source = %request.source_id, error = %message, "word load failed");
                self.load_error = Some(message);
                self.screen = AppScreen::NoWords;
            }
        }
    }

    pub fn reveal(&mut self) {
        let now = Instant::now();
        if let Some(session) = self.session.as_mut()
            && session.reveal(now)
        {
            self.timer.record_interaction(now);
        }
    }

    pub fn answer(&mut self, is_correct: bool) {
        let now = Instant::now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.answer(is_correct, now) {
            AnswerOutcome::Ignored => return,
            AnswerOutcome::Next { .. } => self.timer.record_interaction(now),
            AnswerOutcome::Complete(stats) => {
                self.last_stats = Some(stats);
                // Only breaks and forced stops count toward the high score.
                self.timer.reset();
                self.screen = AppScreen::Complete;
            }
        }
        self.save_progress();
    }

    pub fn next_word(&mut self) {
        let now = Instant::now();
        if self.session.as_mut().is_some_and(Session::next) {
            self.timer.record_interaction(now);
            self.save_progress();
        }
    }

    pub fn previous_word(&mut self) {
        let now = Instant::now();
        if self.session.as_mut().is_some_and(Session::previous) {
            self.timer.record_interaction(now);
            self.save_progress();
        }
    }

    pub fn toggle_direction(&mut self) {
        let now = Instant::now();
        if self.session.as_mut().is_some_and(Session::toggle_direction) {
            self.timer.record_interaction(now);
            self.save_progress();
        }
    }

    pub fn show_stats(&mut self) {
        if let Some(session) = &self.session {
            self.last_stats = Some(session.stats());
            self.screen = AppScreen::StatsOverlay;
        }
    }

    pub fn close_stats(&mut self) {
        self.timer.record_interaction(Instant::now());
        self.screen = AppScreen::Card;
    }

    /// Leave the session and keep its progress for next time.
    pub fn stop_session(&mut self) {
        self.stop_timer(Instant::now());
        self.save_progress();
        if let Some(session) = self.session.as_mut() {
            session.stop();
        }
        self.go_to_menu();
    }

    /// Forget the session's progress entirely.
    pub fn restart_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(mode) = session.mode() {
                self.clear_saved(session.source_id(), mode);
            }
            session.restart();
        }
        self.timer.reset();
        self.go_to_menu();
    }

    pub fn resume_after_inactivity(&mut self) {
        self.timer.resume(Instant::now());
        self.screen = AppScreen::Card;
    }

    pub fn go_to_menu(&mut self) {
        self.loads.invalidate();
        self.session = None;
        self.screen = AppScreen::Menu;
        self.refresh_menu();
    }

    pub fn tick(&mut self) {
        match self.timer.tick(Instant::now()) {
            TimerSignal::Inactive => {
                tracing::info!("paused after inactivity");
                self.screen = AppScreen::InactivityPrompt;
            }
            TimerSignal::BreakStarted {
                elapsed_secs,
                new_high_score,
            } => {
                tracing::info!(elapsed_secs, "break started");
                if let Some(high) = new_high_score {
                    self.save_high_score(high);
                }
                self.screen = AppScreen::Break;
            }
            TimerSignal::BreakOver => {
                tracing::info!("break over");
                self.screen = if self.session.as_ref().is_some_and(Session::is_active) {
                    AppScreen::Card
                } else {
                    AppScreen::Menu
                };
            }
            TimerSignal::Idle | TimerSignal::Running { .. } | TimerSignal::OnBreak { .. } => {}
        }
    }

    pub fn break_remaining_secs(&self) -> u64 {
        self.timer
            .break_ends_at
            .map_or(0, |ends| ends.saturating_duration_since(Instant::now()).as_secs())
    }

    fn stop_timer(&mut self, now: Instant) {
        if let Some(high) = self.timer.stop(now) {
            self.save_high_score(high);
        }
    }

    fn save_progress(&self) {
        let (Some(store), Some(session)) = (&self.store, &self.session) else {
            return;
        };
        if let Some(snapshot) = session.snapshot(Utc::now())
            && let Err(err) = store.save_snapshot(&snapshot)
        {
            tracing::warn!(source = %snapshot.source_id, error = %err, "failed to save progress");
        }
    }

    fn save_high_score(&self, high_score_secs: u64) {
        tracing::info!(high_score_secs, "new high score");
        if let Some(store) = &self.store
            && let Err(err) = store.save_high_score(high_score_secs)
        {
            tracing::warn!(error = %err, "failed to save high score");
        }
    }

    fn clear_saved(&self, source_id: &str, mode: SessionMode) {
        if let Some(store) = &self.store
            && let Err(err) = store.clear_snapshot(source_id, mode)
        {
            tracing::warn!(source = %source_id, error = %err, "failed to clear progress");
        }
    }
}
