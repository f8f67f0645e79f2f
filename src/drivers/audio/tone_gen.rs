//! Square wave tone output on a plain GPIO, toggled from a periodic timer
//! interrupt until a tick deadline passes.
//!
//! The output pin is not routed to a timer compare channel, so every
//! interrupt flips the pin by hand. The audible frequency is half the
//! interrupt rate at a fixed 50% duty.
//!
//! Session lifecycle:
//! `Idle` -> `tone()` -> `Active` (toggling) -> deadline -> `Idle` (pin low).
//! Calling `tone()` while `Active` replaces the session in place.

use core::sync::atomic::{compiler_fence, AtomicU32, Ordering};

use embedded_hal::digital::StatefulOutputPin;

use super::ToneTimer;
use crate::time::{elapsed_ticks, Tick, TickSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneState {
    Idle,
    Active,
}

/// Deadline shared between `tone()` and the interrupt handler.
///
/// Written only from the foreground, read only from the handler.
pub struct ToneSession {
    start_time: AtomicU32,
    wait_time: AtomicU32,
}

impl ToneSession {
    pub const fn new() -> Self {
        Self {
            start_time: AtomicU32::new(0),
            wait_time: AtomicU32::new(0),
        }
    }

    fn begin(&self, start_time: Tick, wait_time: Tick) {
        self.wait_time.store(wait_time, Ordering::Release);
        self.start_time.store(start_time, Ordering::Release);
    }

    pub fn start_time(&self) -> Tick {
        self.start_time.load(Ordering::Acquire)
    }

    pub fn wait_time(&self) -> Tick {
        self.wait_time.load(Ordering::Acquire)
    }

    /// Whether `now` still falls inside the tone window.
    pub fn is_running_at(&self, now: Tick) -> bool {
        elapsed_ticks(self.start_time(), now) < self.wait_time()
    }
}

impl Default for ToneSession {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ToneGen<T, P, C> {
    timer: T,
    pin: P,
    clock: C,
    session: ToneSession,
}

impl<T: ToneTimer, P: StatefulOutputPin, C: TickSource> ToneGen<T, P, C> {
    /// Takes the collaborators without touching hardware. Call
    /// [`ToneGen::init`] once before the first tone.
    pub fn new(timer: T, pin: P, clock: C) -> Self {
        ToneGen {
            timer,
            pin,
            clock,
            session: ToneSession::new(),
        }
    }

    pub fn init(&mut self) {
        self.timer.init();
        self.timer.disable_interrupt();
        let _ = self.pin.set_low();

        #[cfg(feature = "defmt")]
        defmt::trace!("tone gen initialized, idle");
    }

    /// Starts (or restarts) a tone and returns right away.
    ///
    /// `divider` selects the interrupt rate and so the pitch, `duration_ticks`
    /// is measured on the tick source. A tone already playing is superseded.
    pub fn tone(&mut self, divider: u8, duration_ticks: Tick) {
        self.session.begin(self.clock.now(), duration_ticks);

        // the interrupt must observe both session writes, enable goes last
        compiler_fence(Ordering::SeqCst);

        self.timer.set_rate(divider);
        self.timer.clear_pending();
        self.timer.enable_interrupt();

        #[cfg(feature = "defmt")]
        defmt::trace!("tone divider {} for {} ticks", divider, duration_ticks);
    }

    /// Periodic interrupt body. Bind this to the timer's vector.
    pub fn on_tick(&mut self) {
        self.timer.clear_pending();

        if self.session.is_running_at(self.clock.now()) {
            let _ = self.pin.toggle();
        } else {
            self.timer.disable_interrupt();
            let _ = self.pin.set_low();
        }
    }

    pub fn state(&self) -> ToneState {
        if self.timer.is_enabled() {
            ToneState::Active
        } else {
            ToneState::Idle
        }
    }

    pub fn session(&self) -> &ToneSession {
        &self.session
    }

    pub fn release(self) -> (T, P, C) {
        (self.timer, self.pin, self.clock)
    }
}
