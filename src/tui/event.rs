//! Terminal events and the key map
//!
//! [`EventLoop`] merges crossterm input and a fixed-rate tick into one
//! channel. [`UserCommand`] gives keys their mode-independent meaning.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

const EVENT_BUFFER: usize = 256;

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input event
    Input(InputEvent),
    /// Render tick
    Tick,
}

/// Input events from the terminal
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Mode-independent meaning of a key outside of modals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    NavigateUp,
    NavigateDown,
    HalfPageUp,
    HalfPageDown,
    PageUp,
    PageDown,
    /// Enter: open the paired view
    Select,
    /// Escape: leave a view, or quit from the file list
    Back,
    Tab,
    /// Digit jump to a panel
    Jump(u8),
    ShowHelp,
    /// `q`
    Quit,
    /// Ctrl+C from anywhere
    ForceQuit,
    /// Any other printable key, interpreted per mode
    Action(char),
}

impl UserCommand {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(UserCommand::ForceQuit),

            // Scrolling
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(UserCommand::HalfPageUp),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(UserCommand::HalfPageDown),
            (KeyCode::PageUp, _) => Some(UserCommand::PageUp),
            (KeyCode::PageDown, _) => Some(UserCommand::PageDown),

            // Navigation
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                Some(UserCommand::NavigateUp)
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                Some(UserCommand::NavigateDown)
            }
            (KeyCode::Enter, _) => Some(UserCommand::Select),
            (KeyCode::Esc, _) => Some(UserCommand::Back),
            (KeyCode::Tab, _) => Some(UserCommand::Tab),
            (KeyCode::Char(c @ '1'..='5'), _) => Some(UserCommand::Jump(c as u8 - b'0')),

            // Help and quit
            (KeyCode::Char('?'), _) => Some(UserCommand::ShowHelp),
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(UserCommand::Quit),

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                Some(UserCommand::Action(c))
            }

            _ => None,
        }
    }
}

/// Translate a terminal event, keeping key presses and resizes only
fn translate(event: CrosstermEvent) -> Option<AppEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            Some(AppEvent::Input(InputEvent::Key(key)))
        }
        CrosstermEvent::Resize(w, h) => Some(AppEvent::Input(InputEvent::Resize(w, h))),
        _ => None,
    }
}

/// Terminal reader and tick timer feeding one channel
pub struct EventLoop {
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    /// Set while a push or pull is supervised
    input_paused: Arc<AtomicBool>,
    /// Resizes kept back by [`EventLoop::resume_input`]
    pending: VecDeque<AppEvent>,
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            tx,
            rx,
            input_paused: Arc::new(AtomicBool::new(false)),
            pending: VecDeque::new(),
        }
    }

    /// Spawn the terminal reader and the tick timer
    pub fn start(&mut self, tick_rate: Duration) {
        tokio::spawn(read_terminal(self.tx.clone(), self.input_paused.clone()));

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Drop key presses until [`EventLoop::resume_input`]
    pub fn pause_input(&self) {
        self.input_paused.store(true, Ordering::SeqCst);
        debug!("Key input paused");
    }

    /// Accept keys again. Keys and ticks queued meanwhile are discarded;
    /// only the latest resize is kept.
    pub fn resume_input(&mut self) {
        let mut dropped = 0;
        let mut resize = None;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                AppEvent::Input(InputEvent::Resize(..)) => resize = Some(event),
                _ => dropped += 1,
            }
        }
        self.pending.extend(resize);
        self.input_paused.store(false, Ordering::SeqCst);
        debug!("Key input resumed ({} queued events dropped)", dropped);
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        self.rx.recv().await
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Single long-running reader over the crossterm event stream
async fn read_terminal(tx: mpsc::Sender<AppEvent>, paused: Arc<AtomicBool>) {
    let mut reader = EventStream::new();
    while let Some(result) = reader.next().await {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                debug!("Error reading terminal event: {}", e);
                continue;
            }
        };
        let Some(app_event) = translate(event) else {
            continue;
        };
        let is_key = matches!(app_event, AppEvent::Input(InputEvent::Key(_)));
        if is_key && paused.load(Ordering::SeqCst) {
            continue;
        }
        if tx.send(app_event).await.is_err() {
            break;
        }
    }
}
