pub mod shared_tone;

pub use shared_tone::SharedToneGen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneError {
    NotInstalled,
}
