/// One unit of the monotonic hardware counter.
///
/// 32bit Cortex M has no AtomicU64, so session bookkeeping syncs on a
/// truncated 32 bit count. Comparisons go through [`elapsed_ticks`] which
/// stays correct across a single counter rollover.
pub type Tick = u32;

/// Monotonic tick counter owned by the clock subsystem.
pub trait TickSource {
    fn now(&self) -> Tick;
}

impl<C: TickSource + ?Sized> TickSource for &C {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Ticks elapsed between `start` and `now`, wrapping on counter rollover.
#[inline]
pub const fn elapsed_ticks(start: Tick, now: Tick) -> Tick {
    now.wrapping_sub(start)
}

/// Tick source backed by the embassy time driver.
///
/// The driver tick rate is set by the `embassy-time/tick-hz-*` feature.
/// At 32.768 kHz the truncated count rolls over after ~36 hours.
#[cfg(feature = "embassy-time")]
#[derive(Clone, Copy, Default)]
pub struct EmbassyTickSource;

#[cfg(feature = "embassy-time")]
impl EmbassyTickSource {
    pub const fn new() -> Self {
        Self
    }

    /// Converts a duration into driver ticks, saturating at `Tick::MAX`.
    pub fn ticks_from_duration(duration: embassy_time::Duration) -> Tick {
        let ticks = duration.as_ticks();
        if ticks > Tick::MAX as u64 {
            Tick::MAX
        } else {
            ticks as Tick
        }
    }
}

#[cfg(feature = "embassy-time")]
impl TickSource for EmbassyTickSource {
    fn now(&self) -> Tick {
        embassy_time::Instant::now().as_ticks() as Tick
    }
}
