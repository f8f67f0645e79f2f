#![no_std]
#![no_main]

use ateam_tone_gen::{
    drivers::audio::stm32_timer::{Stm32ToneTimer, Stm32ToneTimerConfig},
    time::{EmbassyTickSource, Tick},
    SharedToneGen, ToneGen,
};
use embassy_stm32::{
    gpio::{Level, Output, Speed},
    interrupt,
    interrupt::InterruptExt,
    peripherals::TIM15,
};
use embassy_time::{Duration, Timer};

use defmt_rtt as _;
// provide embedded panic probe
use panic_probe as _;

type BuzzerToneGen =
    SharedToneGen<Stm32ToneTimer<'static, TIM15>, Output<'static>, EmbassyTickSource>;

static TONE: BuzzerToneGen = SharedToneGen::new();

// (divider, length) pairs, timer ticks run at 15.625 kHz
const SCALE: [(u8, u64); 8] = [
    (29, 200),
    (26, 200),
    (23, 200),
    (22, 200),
    (19, 200),
    (17, 200),
    (15, 200),
    (14, 400),
];

fn ticks_ms(ms: u64) -> Tick {
    EmbassyTickSource::ticks_from_duration(Duration::from_millis(ms))
}

#[interrupt]
unsafe fn TIM15() {
    TONE.on_tick();
}

#[embassy_executor::main]
async fn main(_spawner: embassy_executor::Spawner) {
    let p = embassy_stm32::init(Default::default());

    defmt::info!("embassy HAL configured.");

    let timer = Stm32ToneTimer::new(p.TIM15, Stm32ToneTimerConfig::default());
    let pin = Output::new(p.PE6, Level::Low, Speed::Low);
    TONE.install(ToneGen::new(timer, pin, EmbassyTickSource::new()));

    if TONE.init().is_err() {
        defmt::panic!("tone gen not installed");
    }

    interrupt::TIM15.set_priority(interrupt::Priority::P6);
    unsafe { interrupt::TIM15.enable() };

    defmt::info!("tone gen ready, playing scale");

    loop {
        for (divider, length_ms) in SCALE {
            let duration = ticks_ms(length_ms);
            if let Err(err) = TONE.tone(divider, duration) {
                defmt::error!("tone failed: {}", err);
            }

            // let the tone finish on its own before starting the next one
            Timer::after_millis(length_ms + 50).await;
            defmt::debug!("divider {} done, state {}", divider, TONE.state());
        }

        // a second tone before the first deadline supersedes it
        TONE.tone(30, ticks_ms(1_000)).ok();
        Timer::after_millis(100).await;
        TONE.tone(15, ticks_ms(100)).ok();

        Timer::after_millis(2_000).await;
    }
}
