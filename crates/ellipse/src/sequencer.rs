//! Step sequencer: which construction step is revealed, plus auto-play.
//!
//! States
//! - `Idle`: everything shown, no stepping UI (the plan is drawn in reveal-all mode).
//! - `Showing(i)`: static, navigable with `next`/`prev`.
//! - `Playing(i)`: auto-advancing on a recurring tick.
//!
//! Timer model
//! - The timer is an owned value, not a callback. Time reaches it through
//!   `advance(dt)` (logical clock) or `tick(id)` (external clock that echoes
//!   the `TimerId` it was armed with). A tick whose id does not match the
//!   current timer is stale and ignored, so at most one timer can advance the
//!   step index.

use serde::Serialize;

use crate::cfg::DEFAULT_TICK_INTERVAL;

/// Sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SequencerState {
    Idle,
    Showing(usize),
    Playing(usize),
}

/// Identifier of an armed auto-advance timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId(pub u64);

/// Pending recurring tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    pub id: TimerId,
    pub interval: f64,
    /// Time accumulated since the last tick fired.
    pub elapsed: f64,
}

/// Input events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerEvent {
    EnableStepping,
    DisableStepping,
    Next,
    Prev,
    /// Start from step 0, or pause when already playing.
    Play,
    Reset,
    Tick(TimerId),
}

/// Finite-state machine over the revealed step.
#[derive(Clone, Debug)]
pub struct StepSequencer {
    step_count: usize,
    interval: f64,
    state: SequencerState,
    timer: Option<Timer>,
    next_timer: u64,
}

impl StepSequencer {
    /// Sequencer with the default 1.5 time-unit interval. `step_count` is at least 1.
    pub fn new(step_count: usize) -> Self {
        Self::with_interval(step_count, DEFAULT_TICK_INTERVAL)
    }

    pub fn with_interval(step_count: usize, interval: f64) -> Self {
        Self {
            step_count: step_count.max(1),
            interval: if interval.is_finite() && interval > 0.0 {
                interval
            } else {
                DEFAULT_TICK_INTERVAL
            },
            state: SequencerState::Idle,
            timer: None,
            next_timer: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SequencerState {
        self.state
    }
    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }
    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }
    /// Currently armed timer, if any.
    #[inline]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.timer.map(|t| t.id)
    }
    /// Step to render; the last step while idle.
    pub fn current_step(&self) -> usize {
        match self.state {
            SequencerState::Idle => self.last(),
            SequencerState::Showing(i) | SequencerState::Playing(i) => i,
        }
    }
    /// Idle means "show everything".
    #[inline]
    pub fn reveal_all(&self) -> bool {
        self.state == SequencerState::Idle
    }
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, SequencerState::Playing(_))
    }

    #[inline]
    fn last(&self) -> usize {
        self.step_count - 1
    }

    fn cancel_timer(&mut self) {
        if let Some(t) = self.timer.take() {
            tracing::trace!(timer = t.id.0, "timer cancelled");
        }
    }

    fn arm_timer(&mut self) -> TimerId {
        self.cancel_timer();
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timer = Some(Timer {
            id,
            interval: self.interval,
            elapsed: 0.0,
        });
        id
    }

    /// Apply one event. Returns true when the state changed.
    pub fn handle(&mut self, event: SequencerEvent) -> bool {
        let before = self.state;
        match (event, self.state) {
            (SequencerEvent::EnableStepping, SequencerState::Idle) => {
                self.state = SequencerState::Showing(0);
            }
            (SequencerEvent::EnableStepping, _) => {}
            (SequencerEvent::DisableStepping, _) => {
                self.cancel_timer();
                self.state = SequencerState::Idle;
            }
            (SequencerEvent::Next, SequencerState::Showing(i)) => {
                self.state = SequencerState::Showing((i + 1).min(self.last()));
            }
            (SequencerEvent::Prev, SequencerState::Showing(i)) => {
                self.state = SequencerState::Showing(i.saturating_sub(1));
            }
            (SequencerEvent::Next | SequencerEvent::Prev, _) => {}
            (SequencerEvent::Play, SequencerState::Playing(i)) => {
                self.cancel_timer();
                self.state = SequencerState::Showing(i);
            }
            (SequencerEvent::Play, SequencerState::Showing(_)) => {
                if self.step_count <= 1 {
                    self.cancel_timer();
                    self.state = SequencerState::Showing(0);
                } else {
                    let id = self.arm_timer();
                    tracing::debug!(timer = id.0, interval = self.interval, "auto-play armed");
                    self.state = SequencerState::Playing(0);
                }
            }
            (SequencerEvent::Play, SequencerState::Idle) => {}
            (SequencerEvent::Reset, _) => {
                self.cancel_timer();
                self.state = SequencerState::Showing(0);
            }
            (SequencerEvent::Tick(id), SequencerState::Playing(i)) => {
                if self.pending_timer() != Some(id) {
                    tracing::trace!(timer = id.0, "stale tick ignored");
                    return false;
                }
                let next = (i + 1).min(self.last());
                if next >= self.last() {
                    self.cancel_timer();
                    self.state = SequencerState::Showing(self.last());
                } else {
                    self.state = SequencerState::Playing(next);
                }
            }
            (SequencerEvent::Tick(id), _) => {
                tracing::trace!(timer = id.0, "tick outside playback ignored");
            }
        }
        before != self.state
    }

    pub fn enable_stepping(&mut self) -> bool {
        self.handle(SequencerEvent::EnableStepping)
    }
    pub fn disable_stepping(&mut self) -> bool {
        self.handle(SequencerEvent::DisableStepping)
    }
    pub fn next(&mut self) -> bool {
        self.handle(SequencerEvent::Next)
    }
    pub fn prev(&mut self) -> bool {
        self.handle(SequencerEvent::Prev)
    }
    pub fn play(&mut self) -> bool {
        self.handle(SequencerEvent::Play)
    }
    pub fn reset(&mut self) -> bool {
        self.handle(SequencerEvent::Reset)
    }
    pub fn tick(&mut self, id: TimerId) -> bool {
        self.handle(SequencerEvent::Tick(id))
    }

    /// Let `dt` time units pass on the logical clock; returns the number of ticks fired.
    pub fn advance(&mut self, dt: f64) -> usize {
        if !(dt > 0.0) {
            return 0;
        }
        let mut fired = 0;
        let mut budget = dt;
        while let Some(timer) = self.timer {
            let due = timer.interval - timer.elapsed;
            if budget < due {
                if let Some(t) = self.timer.as_mut() {
                    t.elapsed += budget;
                }
                break;
            }
            budget -= due;
            if let Some(t) = self.timer.as_mut() {
                t.elapsed = 0.0;
            }
            self.tick(timer.id);
            fired += 1;
        }
        fired
    }
}
