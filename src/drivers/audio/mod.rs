pub mod reload;
pub mod tone_gen;

#[cfg(feature = "stm32")]
pub mod stm32_timer;

/// Hardware counter that raises a periodic interrupt for tone generation.
///
/// Implementations only program registers. None of these can fail
/// observably and none of them validate `divider`.
pub trait ToneTimer {
    /// Run the counter continuously at a fixed prescale in compare-match
    /// mode with the periodic interrupt disabled.
    fn init(&mut self);

    /// Program the compare threshold. The interrupt period becomes
    /// `divider + 1` counter ticks.
    fn set_rate(&mut self, divider: u8);

    /// Drop any latched compare-match condition so enabling does not
    /// produce an immediate spurious firing. Also acknowledges a firing
    /// from inside the handler on parts that don't self-clear.
    fn clear_pending(&mut self);

    fn enable_interrupt(&mut self);
    fn disable_interrupt(&mut self);

    fn is_enabled(&self) -> bool;
}
