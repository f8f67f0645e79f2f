use embassy_stm32::{
    time::Hertz,
    timer::{low_level::Timer, CoreInstance},
    Peripheral,
};

use super::{
    reload::{auto_reload_for, prescaler_for},
    ToneTimer,
};

/// Counter rate after init, a 16 MHz core clock divided by 1024.
pub const DEFAULT_TICK_FREQ_HZ: u32 = 15_625;

#[derive(Clone, Copy, Debug)]
pub struct Stm32ToneTimerConfig {
    pub tick_freq: Hertz,
}

impl Default for Stm32ToneTimerConfig {
    fn default() -> Self {
        Self {
            tick_freq: Hertz(DEFAULT_TICK_FREQ_HZ),
        }
    }
}

/// Drives the update interrupt of a basic STM32 timer. The auto-reload
/// register plays the role of the compare threshold, so the interrupt fires
/// every `divider + 1` ticks of `tick_freq`, divider 0 included.
pub struct Stm32ToneTimer<'d, T: CoreInstance> {
    timer: Timer<'d, T>,
    config: Stm32ToneTimerConfig,
}

impl<'d, T: CoreInstance> Stm32ToneTimer<'d, T> {
    pub fn new(tim: impl Peripheral<P = T> + 'd, config: Stm32ToneTimerConfig) -> Self {
        Stm32ToneTimer {
            timer: Timer::new(tim),
            config,
        }
    }

    fn prescaler(&self) -> u16 {
        prescaler_for(self.timer.get_clock_frequency().0, self.config.tick_freq.0)
    }
}

impl<'d, T: CoreInstance> ToneTimer for Stm32ToneTimer<'d, T> {
    fn init(&mut self) {
        self.timer.stop();
        self.timer.enable_update_interrupt(false);

        let psc = self.prescaler();
        let regs = self.timer.regs_core();
        regs.psc().write_value(psc);
        regs.arr().write(|r| r.set_arr(auto_reload_for(u8::MAX)));

        // the update event latches the prescaler and sets UIF as a side effect
        regs.egr().write(|r| r.set_ug(true));
        self.timer.clear_update_interrupt();

        self.timer.start();

        defmt::debug!(
            "tone timer running at {} Hz (psc {})",
            self.config.tick_freq.0,
            psc
        );
    }

    fn set_rate(&mut self, divider: u8) {
        let regs = self.timer.regs_core();
        regs.arr().write(|r| r.set_arr(auto_reload_for(divider)));
        regs.cnt().write(|r| r.set_cnt(0));
    }

    fn clear_pending(&mut self) {
        self.timer.clear_update_interrupt();
    }

    fn enable_interrupt(&mut self) {
        self.timer.enable_update_interrupt(true);
    }

    fn disable_interrupt(&mut self) {
        self.timer.enable_update_interrupt(false);
    }

    fn is_enabled(&self) -> bool {
        self.timer.regs_core().dier().read().uie()
    }
}
