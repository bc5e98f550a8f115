//! Playback state for the video shown in the viewer.
//!
//! The player tracks what is playing and where; rendering the frames is
//! the front end's business. Handles are cheap clones of shared state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug)]
struct Inner {
    state: PlaybackState,
    source: Option<String>,
    /// Position accumulated before the current playing stretch.
    position: Duration,
    /// When the current playing stretch began.
    resumed_at: Option<Instant>,
}

impl Inner {
    fn position(&self) -> Duration {
        match self.resumed_at {
            Some(at) => self.position + at.elapsed(),
            None => self.position,
        }
    }

    fn settle(&mut self) {
        self.position = self.position();
        self.resumed_at = None;
    }
}

#[derive(Debug, Clone)]
pub struct VideoPlayer {
    inner: Arc<Mutex<Inner>>,
}

impl Default for VideoPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPlayer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: PlaybackState::Stopped,
                source: None,
                position: Duration::ZERO,
                resumed_at: None,
            })),
        }
    }

    /// Starts `url` from the beginning.
    pub fn play(&self, url: &str) {
        let mut inner = self.inner.lock();
        inner.state = PlaybackState::Playing;
        inner.source = Some(url.to_string());
        inner.position = Duration::ZERO;
        inner.resumed_at = Some(Instant::now());
        debug!(url, "Playback started");
    }

    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.state == PlaybackState::Playing {
            inner.settle();
            inner.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        if inner.state == PlaybackState::Paused {
            inner.resumed_at = Some(Instant::now());
            inner.state = PlaybackState::Playing;
        }
    }

    pub fn toggle_pause(&self) {
        match self.playback_state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => {}
        }
    }

    /// Pauses and rewinds to the start. The source stays loaded.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.state != PlaybackState::Stopped {
            debug!(source = ?inner.source, "Playback stopped");
        }
        inner.state = PlaybackState::Stopped;
        inner.position = Duration::ZERO;
        inner.resumed_at = None;
    }

    pub fn position(&self) -> Duration {
        self.inner.lock().position()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    pub fn current_source(&self) -> Option<String> {
        self.inner.lock().source.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_position_tracks_playing_time() {
        let player = VideoPlayer::new();
        player.play("/media/videos/reel.mp4");
        tokio::time::advance(Duration::from_secs(3)).await;
        player.pause();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(player.position(), Duration::from_secs(3));

        player.resume();
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(player.position(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_rewinds() {
        let player = VideoPlayer::new();
        player.play("/media/videos/reel.mp4");
        tokio::time::advance(Duration::from_secs(2)).await;
        player.stop();
        assert_eq!(player.playback_state(), PlaybackState::Stopped);
        assert_eq!(player.position(), Duration::ZERO);
        assert_eq!(player.current_source().as_deref(), Some("/media/videos/reel.mp4"));
    }

    #[test]
    fn test_toggle_on_stopped_is_noop() {
        let player = VideoPlayer::new();
        player.toggle_pause();
        assert_eq!(player.playback_state(), PlaybackState::Stopped);
    }
}
