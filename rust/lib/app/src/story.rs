//! Story playback.
//!
//! [`StoryPlayer`] is the state machine; it never reads the clock itself,
//! every transition takes `now`. [`StoryDriver`] samples it on a fixed tick
//! and publishes frames until playback finishes or is cancelled.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Where playback stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoryPhase {
    Loading,
    Playing { index: usize, progress: f32 },
    Paused { index: usize, progress: f32 },
    /// The view should be dismissed.
    Finished,
}

/// Which half of the view a tap landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Left,
    Right,
}

impl TapZone {
    pub fn from_position(x: f32, width: f32) -> Self {
        if x < width / 2.0 { TapZone::Left } else { TapZone::Right }
    }
}

pub struct StoryPlayer {
    phase: StoryPhase,
    len: usize,
    item_duration: Duration,
    /// Instant at which the current item would have started had it never
    /// been paused.
    baseline: Instant,
}

impl StoryPlayer {
    pub fn new(item_duration: Duration) -> Self {
        Self {
            phase: StoryPhase::Loading,
            len: 0,
            item_duration,
            baseline: Instant::now(),
        }
    }

    pub fn phase(&self) -> StoryPhase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_finished(&self) -> bool {
        self.phase == StoryPhase::Finished
    }

    pub fn index(&self) -> Option<usize> {
        match self.phase {
            StoryPhase::Playing { index, .. } | StoryPhase::Paused { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn progress(&self) -> f32 {
        match self.phase {
            StoryPhase::Playing { progress, .. } | StoryPhase::Paused { progress, .. } => progress,
            _ => 0.0,
        }
    }

    /// Per-item fill of the segmented progress bar.
    pub fn segments(&self) -> Vec<f32> {
        let Some(current) = self.index() else {
            return vec![0.0; self.len];
        };
        (0..self.len)
            .map(|i| match i.cmp(&current) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => self.progress(),
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Stories arrived. An empty sequence finishes immediately.
    pub fn loaded(&mut self, len: usize, now: Instant) {
        if self.phase != StoryPhase::Loading {
            return;
        }
        if len == 0 {
            self.phase = StoryPhase::Finished;
            return;
        }
        self.len = len;
        self.start_item(0, now);
    }

    pub fn load_failed(&mut self) {
        if self.phase == StoryPhase::Loading {
            self.phase = StoryPhase::Finished;
        }
    }

    /// Advance progress to `now`, moving on when the item is used up.
    pub fn tick(&mut self, now: Instant) {
        let StoryPhase::Playing { index, progress } = self.phase else {
            return;
        };
        let elapsed = now.saturating_duration_since(self.baseline);
        let next = (elapsed.as_secs_f32() / self.item_duration.as_secs_f32()).clamp(0.0, 1.0);
        let next = next.max(progress);
        if next >= 1.0 {
            self.next_or_finish(index, now);
        } else {
            self.phase = StoryPhase::Playing { index, progress: next };
        }
    }

    /// Pointer down: freeze where we are.
    pub fn press(&mut self, now: Instant) {
        self.tick(now);
        if let StoryPhase::Playing { index, progress } = self.phase {
            self.phase = StoryPhase::Paused { index, progress };
        }
    }

    /// Pointer up: resume from the frozen progress.
    pub fn release(&mut self, now: Instant) {
        if let StoryPhase::Paused { index, progress } = self.phase {
            self.baseline = now - self.item_duration.mul_f32(progress);
            self.phase = StoryPhase::Playing { index, progress };
        }
    }

    /// Manual navigation. Left on the first item does nothing.
    pub fn tap(&mut self, zone: TapZone, now: Instant) {
        let Some(index) = self.index() else {
            return;
        };
        match zone {
            TapZone::Left if index > 0 => self.start_item(index - 1, now),
            TapZone::Left => {}
            TapZone::Right => self.next_or_finish(index, now),
        }
    }

    /// Dismiss regardless of position.
    pub fn finish(&mut self) {
        self.phase = StoryPhase::Finished;
    }

    fn next_or_finish(&mut self, index: usize, now: Instant) {
        if index + 1 < self.len {
            self.start_item(index + 1, now);
        } else {
            self.phase = StoryPhase::Finished;
        }
    }

    fn start_item(&mut self, index: usize, now: Instant) {
        self.baseline = now;
        self.phase = StoryPhase::Playing { index, progress: 0.0 };
    }
}

/// Ticks a shared [`StoryPlayer`] until it finishes or is cancelled.
pub struct StoryDriver {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StoryDriver {
    /// Start ticking every `tick`. `on_frame` sees the player after each
    /// tick, under its lock.
    pub fn spawn<F>(
        player: Arc<Mutex<StoryPlayer>>,
        tick: Duration,
        cancel: CancellationToken,
        on_frame: F,
    ) -> Self
    where
        F: Fn(&StoryPlayer) + Send + 'static,
    {
        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                info!("story driver started (tick={tick:?})");
                let mut ticker = tokio::time::interval(tick);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("story driver cancelled");
                            break;
                        }
                        _ = ticker.tick() => {
                            let mut p = player.lock().unwrap();
                            p.tick(Instant::now());
                            on_frame(&p);
                            if p.is_finished() {
                                break;
                            }
                        }
                    }
                }
                info!("story driver stopped");
            })
        };
        Self { cancel, task }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for StoryDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
