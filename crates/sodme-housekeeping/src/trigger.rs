#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    PositionClosed,
    PositionReduced,
    OrderFilled,
    OrderRejected,
    InstrumentExpired,
    EndOfDay,
    Manual,
    /// The ~5-minute sweep that runs continuously during market hours.
    PeriodicSweep,
}
