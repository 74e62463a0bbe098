//! Event plumbing for the terminal loop.
//!
//! Terminal input is read on a helper thread and forwarded over a channel.
//! The loop waits on that channel for at most one tick and gets a `Tick`
//! when nothing arrived, which is what drives the advance timer and the
//! surface animation. Tests push events into the same kind of channel.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Tick,
}

impl QuizEvent {
    /// The quiz event for a raw terminal event, if the quiz reacts to it.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            // release and repeat reports would double keystrokes on Windows
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(QuizEvent::Key(key)),
            Event::Resize(width, height) => Some(QuizEvent::Resize { width, height }),
            _ => None,
        }
    }
}

pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Events delivered over an mpsc channel.
pub struct ChannelSource {
    rx: Receiver<QuizEvent>,
}

impl ChannelSource {
    /// Read the terminal on a helper thread. The thread stops when reading
    /// fails or the source is dropped.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(raw) = event::read() {
                let Some(ev) = QuizEvent::from_terminal(raw) else {
                    continue;
                };
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub fn from_receiver(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Hands the loop one event per call, or `Tick` once `tick` passes quietly.
pub struct Runner<E: EventSource> {
    source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    pub fn step(&self) -> QuizEvent {
        // a closed channel keeps ticking so pending timers still fire
        self.source.recv_timeout(self.tick).unwrap_or(QuizEvent::Tick)
    }
}
