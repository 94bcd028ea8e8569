/// Port for the trading venue/account that operations act upon
///
/// The controller never calls a broker directly. It hands a shared reference
/// to strategies on start and to each operation on apply, always from the
/// tick loop thread. Any interior mutability is the broker's own concern.
pub trait Broker: Send + Sync + 'static {
    /// Get the broker's name/identifier for debugging
    fn name(&self) -> &str {
        "Broker"
    }
}
