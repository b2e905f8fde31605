/// A device the runner schedules against the CPU. The runner never asks
/// what kind of device it is holding; it only polls these capabilities.
pub trait Peripheral {
    /// short name of the device variant, e.g. "ps2"
    fn kind(&self) -> &'static str;

    /// whether the device is holding the interrupt line; stays true until
    /// the device's own acknowledge condition clears it
    fn asserting(&self) -> bool {
        false
    }

    /// whether the device must see every CPU step; when no device does, the
    /// runner executes a frame's ticks as one batch
    fn needs_timing(&self) -> bool {
        false
    }

    /// `ticks` CPU ticks have elapsed since the last call
    #[allow(unused)]
    fn tick(&mut self, ticks: u64) {}
}
