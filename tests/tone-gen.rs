use core::cell::Cell;
use core::convert::Infallible;

use ateam_tone_gen::{Tick, TickSource, ToneGen, ToneState, ToneTimer};
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

#[derive(Default)]
struct SimHw {
    now: Cell<Tick>,
    pin_high: Cell<bool>,
    irq_enabled: Cell<bool>,
    pending: Cell<bool>,
    divider: Cell<u8>,
    firings: Cell<u32>,
}

struct SimTimer<'a>(&'a SimHw);

impl ToneTimer for SimTimer<'_> {
    fn init(&mut self) {
        // power-on state of the flag is unknown, leave one latched
        self.0.pending.set(true);
    }

    fn set_rate(&mut self, divider: u8) {
        self.0.divider.set(divider);
    }

    fn clear_pending(&mut self) {
        self.0.pending.set(false);
    }

    fn enable_interrupt(&mut self) {
        self.0.irq_enabled.set(true);
    }

    fn disable_interrupt(&mut self) {
        self.0.irq_enabled.set(false);
    }

    fn is_enabled(&self) -> bool {
        self.0.irq_enabled.get()
    }
}

struct SimPin<'a>(&'a SimHw);

impl ErrorType for SimPin<'_> {
    type Error = Infallible;
}

impl OutputPin for SimPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.pin_high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.pin_high.set(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.pin_high.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.pin_high.get())
    }
}

struct SimClock<'a>(&'a SimHw);

impl TickSource for SimClock<'_> {
    fn now(&self) -> Tick {
        self.0.now.get()
    }
}

type SimToneGen<'a> = ToneGen<SimTimer<'a>, SimPin<'a>, SimClock<'a>>;

fn setup(hw: &SimHw) -> SimToneGen<'_> {
    let mut tone_gen = ToneGen::new(SimTimer(hw), SimPin(hw), SimClock(hw));
    tone_gen.init();
    tone_gen
}

/// Delivers one timer interrupt if the source is enabled.
fn fire(hw: &SimHw, tone_gen: &mut SimToneGen) -> bool {
    if !hw.irq_enabled.get() {
        return false;
    }
    hw.firings.set(hw.firings.get() + 1);
    tone_gen.on_tick();
    true
}

fn advance(hw: &SimHw, ticks: Tick) {
    hw.now.set(hw.now.get().wrapping_add(ticks));
}

#[test]
fn idle_after_init() {
    let hw = SimHw::default();
    hw.pin_high.set(true);
    let mut tone_gen = setup(&hw);

    assert_eq!(tone_gen.state(), ToneState::Idle);
    assert!(!hw.irq_enabled.get());
    assert!(!hw.pin_high.get());
    assert!(!fire(&hw, &mut tone_gen));
}

#[test]
fn toggles_each_firing_within_window() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);
    hw.now.set(1_000);

    tone_gen.tone(42, 10);
    assert_eq!(hw.divider.get(), 42);

    let mut expected_high = true;
    for _ in 0..10 {
        assert!(fire(&hw, &mut tone_gen));
        assert_eq!(hw.pin_high.get(), expected_high);
        expected_high = !expected_high;
        advance(&hw, 1);
    }
    assert_eq!(tone_gen.state(), ToneState::Active);
}

#[test]
fn deadline_stops_tone_for_good() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);

    tone_gen.tone(7, 5);
    assert!(fire(&hw, &mut tone_gen));
    assert!(hw.pin_high.get());

    advance(&hw, 5);
    assert!(fire(&hw, &mut tone_gen));
    assert!(!hw.pin_high.get());
    assert!(!hw.irq_enabled.get());
    assert_eq!(tone_gen.state(), ToneState::Idle);

    let firings = hw.firings.get();
    for _ in 0..20 {
        advance(&hw, 1);
        assert!(!fire(&hw, &mut tone_gen));
    }
    assert_eq!(hw.firings.get(), firings);
    assert!(!hw.pin_high.get());
}

#[test]
fn later_tone_supersedes_earlier_one() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);

    tone_gen.tone(10, 100);
    advance(&hw, 20);
    assert!(fire(&hw, &mut tone_gen));

    // new session starts at 20 and runs for 10, the first deadline (100) no longer matters
    tone_gen.tone(20, 10);
    assert_eq!(tone_gen.session().start_time(), 20);
    assert_eq!(tone_gen.session().wait_time(), 10);
    assert_eq!(hw.divider.get(), 20);

    advance(&hw, 9);
    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Active);

    advance(&hw, 1);
    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Idle);
    assert!(!hw.pin_high.get());
}

#[test]
fn superseding_can_extend_a_tone() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);

    tone_gen.tone(10, 5);
    advance(&hw, 4);
    tone_gen.tone(10, 50);

    advance(&hw, 10);
    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Active);
}

#[test]
fn zero_duration_stops_on_first_firing() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);

    tone_gen.tone(3, 0);
    assert_eq!(tone_gen.state(), ToneState::Active);

    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Idle);
    assert!(!hw.pin_high.get());
    assert!(!fire(&hw, &mut tone_gen));
}

#[test]
fn rearms_after_completion() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);

    tone_gen.tone(5, 1);
    assert!(fire(&hw, &mut tone_gen));
    advance(&hw, 1);
    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Idle);

    advance(&hw, 100);
    tone_gen.tone(6, 3);
    assert_eq!(tone_gen.state(), ToneState::Active);
    assert!(fire(&hw, &mut tone_gen));
    assert!(hw.pin_high.get());
    advance(&hw, 1);
    assert!(fire(&hw, &mut tone_gen));
    assert!(!hw.pin_high.get());
}

#[test]
fn enabling_clears_latched_flag() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);
    assert!(hw.pending.get());

    tone_gen.tone(9, 4);
    assert!(!hw.pending.get());
}

#[test]
fn tone_across_counter_rollover() {
    let hw = SimHw::default();
    let mut tone_gen = setup(&hw);
    hw.now.set(Tick::MAX - 2);

    tone_gen.tone(11, 6);
    for _ in 0..6 {
        assert!(fire(&hw, &mut tone_gen));
        assert_eq!(tone_gen.state(), ToneState::Active);
        advance(&hw, 1);
    }

    assert_eq!(hw.now.get(), 3);
    assert!(fire(&hw, &mut tone_gen));
    assert_eq!(tone_gen.state(), ToneState::Idle);
}
