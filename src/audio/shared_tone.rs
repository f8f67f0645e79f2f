use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::digital::StatefulOutputPin;

use super::ToneError;
use crate::{
    drivers::audio::{
        tone_gen::{ToneGen, ToneState},
        ToneTimer,
    },
    time::{Tick, TickSource},
};

/// Lets foreground code and the timer interrupt vector share one [`ToneGen`].
///
/// Every access runs inside a critical section, so the handler never sees a
/// half started session. Meant to live in a `static`:
///
/// ```ignore
/// static TONE: SharedToneGen<Stm32ToneTimer<'static, TIM15>, Output<'static>, EmbassyTickSource> =
///     SharedToneGen::new();
///
/// #[interrupt]
/// unsafe fn TIM15() {
///     TONE.on_tick();
/// }
/// ```
pub struct SharedToneGen<T, P, C> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<ToneGen<T, P, C>>>>,
}

impl<T, P, C> SharedToneGen<T, P, C> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<T, P, C> Default for SharedToneGen<T, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ToneTimer, P: StatefulOutputPin, C: TickSource> SharedToneGen<T, P, C> {
    /// Hands over a generator, returning the one it replaces.
    pub fn install(&self, tone_gen: ToneGen<T, P, C>) -> Option<ToneGen<T, P, C>> {
        self.inner.lock(|cell| cell.borrow_mut().replace(tone_gen))
    }

    pub fn take(&self) -> Option<ToneGen<T, P, C>> {
        self.inner.lock(|cell| cell.borrow_mut().take())
    }

    fn with<R>(&self, f: impl FnOnce(&mut ToneGen<T, P, C>) -> R) -> Result<R, ToneError> {
        self.inner.lock(|cell| {
            cell.borrow_mut()
                .as_mut()
                .map(f)
                .ok_or(ToneError::NotInstalled)
        })
    }

    pub fn init(&self) -> Result<(), ToneError> {
        self.with(|tone_gen| tone_gen.init())
    }

    pub fn tone(&self, divider: u8, duration_ticks: Tick) -> Result<(), ToneError> {
        self.with(|tone_gen| tone_gen.tone(divider, duration_ticks))
    }

    /// Interrupt entry. A firing with nothing installed is dropped.
    pub fn on_tick(&self) {
        let _ = self.with(|tone_gen| tone_gen.on_tick());
    }

    pub fn state(&self) -> Result<ToneState, ToneError> {
        self.with(|tone_gen| tone_gen.state())
    }
}
