//! Register values for timers that count up to an auto-reload value.
//!
//! A zero auto-reload value stalls the counter, so the counter is clocked
//! [`COUNTS_PER_TICK`] times faster than the tick rate and the reload value
//! never drops below 1, even for divider 0.

use crate::time::Tick;

pub const COUNTS_PER_TICK: u16 = 2;

/// Auto-reload value for an update every `divider + 1` ticks.
pub const fn auto_reload_for(divider: u8) -> u16 {
    (divider as u16 + 1) * COUNTS_PER_TICK - 1
}

/// Counter steps between two updates for a given auto-reload value.
pub const fn period_counts(auto_reload: u16) -> u32 {
    auto_reload as u32 + 1
}

/// Prescaler register value clocking the counter at `COUNTS_PER_TICK`
/// times `tick_freq_hz`. Saturates at the 16 bit register width.
pub const fn prescaler_for(clock_hz: u32, tick_freq_hz: u32) -> u16 {
    let mut counter_hz = tick_freq_hz.saturating_mul(COUNTS_PER_TICK as u32);
    if counter_hz == 0 {
        counter_hz = 1;
    }

    let mut div = clock_hz / counter_hz;
    if div == 0 {
        div = 1;
    }

    if div - 1 > u16::MAX as u32 {
        u16::MAX
    } else {
        (div - 1) as u16
    }
}

/// Ticks between two updates, the inverse of [`auto_reload_for`].
pub const fn period_ticks(auto_reload: u16) -> Tick {
    period_counts(auto_reload) / COUNTS_PER_TICK as u32
}
