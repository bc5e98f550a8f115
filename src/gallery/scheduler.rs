//! Cancellable delayed events.
//!
//! - Each scheduled event is a tokio task that sleeps, then posts to the
//!   gallery's channel
//! - Tasks are grouped so reveal timers can be dropped on a page change
//!   without losing the pending transition release
//! - Dropping the scheduler aborts everything still pending

use std::collections::HashMap;
use std::time::Duration;

use flume::Sender;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::GalleryEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerGroup {
    Reveal,
    Transition,
}

pub struct Scheduler {
    tx: Sender<GalleryEvent>,
    pending: HashMap<TimerGroup, Vec<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(tx: Sender<GalleryEvent>) -> Self {
        Self {
            tx,
            pending: HashMap::new(),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, group: TimerGroup, delay: Duration, event: GalleryEvent) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tx.send_async(event).await {
                warn!(error = ?e, "Gallery gone, dropping timer event");
            }
        });

        let handles = self.pending.entry(group).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Aborts the group's pending timers. Returns how many were still running.
    pub fn cancel(&mut self, group: TimerGroup) -> usize {
        let Some(handles) = self.pending.remove(&group) else {
            return 0;
        };
        let mut cancelled = 0;
        for handle in handles {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            trace!(?group, cancelled, "Cancelled pending timers");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        self.cancel(TimerGroup::Reveal);
        self.cancel(TimerGroup::Transition);
    }

    #[cfg(test)]
    pub fn pending(&self, group: TimerGroup) -> usize {
        self.pending
            .get(&group)
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
