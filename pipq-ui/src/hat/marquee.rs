//! Marquee scrolling for text wider than the panel.
//!
//! Each marquee owns a thread that only advances its own offset. The UI thread
//! reads the offset when it draws; the thread never touches the API.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};

use super::frame::text_width;

pub const SCROLL_STEP: i32 = 1;
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(200);
pub const INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Blank pixels between the end of the text and its next copy.
pub const WRAP_GAP: i32 = 20;

pub struct Marquee {
    text: String,
    max_width: i32,
    offset: Arc<AtomicI32>,
    stop_tx: Option<Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Marquee {
    pub fn new(max_width: i32) -> Self {
        Self {
            text: String::new(),
            max_width,
            offset: Arc::new(AtomicI32::new(0)),
            stop_tx: None,
            join_handle: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn needs_scrolling(&self) -> bool {
        text_width(&self.text) > self.max_width
    }

    pub fn offset(&self) -> i32 {
        self.offset.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.is_some()
    }

    /// Replace the text. Scrolling restarts from the beginning; an unchanged
    /// text keeps its position.
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.stop();
        self.text = text.to_string();
        self.start();
    }

    /// Start scrolling if the text does not fit. No-op when already running.
    pub fn start(&mut self) {
        if self.is_running() || !self.needs_scrolling() {
            return;
        }
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let offset = Arc::clone(&self.offset);
        let wrap_point = text_width(&self.text) + WRAP_GAP;

        let spawned = thread::Builder::new()
            .name("marquee".into())
            .spawn(move || {
                match stop_rx.recv_timeout(INITIAL_DELAY) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
                loop {
                    let next = offset.load(Ordering::Relaxed) + SCROLL_STEP;
                    offset.store(if next >= wrap_point { 0 } else { next }, Ordering::Relaxed);
                    match stop_rx.recv_timeout(SCROLL_INTERVAL) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.stop_tx = Some(stop_tx);
                self.join_handle = Some(handle);
            }
            Err(e) => log::warn!(target: "hat", "failed to spawn marquee thread: {}", e),
        }
    }

    /// Stop scrolling and rewind to the start of the text.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
        self.offset.store(0, Ordering::Relaxed);
    }
}

impl Drop for Marquee {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_does_not_scroll() {
        let mut marquee = Marquee::new(100);
        marquee.set_text("Jazz");
        assert!(!marquee.needs_scrolling());
        assert!(!marquee.is_running());
        assert_eq!(marquee.offset(), 0);
    }

    #[test]
    fn long_text_starts_and_stops() {
        let mut marquee = Marquee::new(30);
        marquee.set_text("Concert Grand Piano Recording");
        assert!(marquee.is_running());

        marquee.stop();
        assert!(!marquee.is_running());
        assert_eq!(marquee.offset(), 0);
    }

    #[test]
    fn same_text_keeps_thread() {
        let mut marquee = Marquee::new(30);
        marquee.set_text("Concert Grand Piano Recording");
        marquee.set_text("Concert Grand Piano Recording");
        assert!(marquee.is_running());
        marquee.set_text("Jazz");
        assert!(!marquee.is_running());
    }

    #[test]
    fn offset_advances_after_initial_delay() {
        let mut marquee = Marquee::new(10);
        marquee.set_text("A long instrument name");
        assert_eq!(marquee.offset(), 0);
        thread::sleep(INITIAL_DELAY + SCROLL_INTERVAL * 2);
        assert!(marquee.offset() > 0);
    }
}
