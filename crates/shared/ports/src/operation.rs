use crate::error::OperationResult;

/// A unit of work to apply to a broker
///
/// Operations are consumed on application. Any closure taking the broker by
/// reference is an operation:
///
/// ```rust,ignore
/// let op = operation(|broker: &PaperBroker| {
///     broker.record("demo", tick, "hello");
///     Ok(())
/// });
/// ```
pub trait Operation<B: ?Sized>: Send {
    fn apply(self: Box<Self>, broker: &B) -> OperationResult<()>;
}

/// Boxed operation as returned by strategies
pub type BoxedOperation<B> = Box<dyn Operation<B>>;

impl<B, F> Operation<B> for F
where
    B: ?Sized,
    F: FnOnce(&B) -> OperationResult<()> + Send,
{
    fn apply(self: Box<Self>, broker: &B) -> OperationResult<()> {
        (*self)(broker)
    }
}

/// Box a closure as an operation
pub fn operation<B, F>(f: F) -> BoxedOperation<B>
where
    B: ?Sized + 'static,
    F: FnOnce(&B) -> OperationResult<()> + Send + 'static,
{
    Box::new(f)
}
