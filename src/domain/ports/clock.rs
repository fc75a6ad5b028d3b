use std::time::Instant;

/// Monotonic time source, injected so cache expiry can be driven by tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
