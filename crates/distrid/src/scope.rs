//! Process-wide access to the current ID generator and public-identity
//! converter.
//!
//! Each slot layers a per-thread stack of scoped overrides over one atomic
//! process default. Reads consult the topmost override first, then the
//! default. Overrides nest and unwind LIFO when their guard drops, so a test
//! or a request handler can temporarily substitute an instrumented generator
//! without touching global state seen by other threads.

use crate::{
    DistributedId, DistributedIdGenerator, IdGenerator, PublicIdentityConverter, Result,
};
use core::marker::PhantomData;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::sync::Arc;

#[cfg(not(any(test, feature = "test-util")))]
use crate::error::Error;

static DEFAULT_GENERATOR: RwLock<Option<Arc<dyn IdGenerator>>> = RwLock::new(None);
static DEFAULT_CONVERTER: RwLock<Option<Arc<PublicIdentityConverter>>> = RwLock::new(None);

thread_local! {
    static GENERATOR_OVERRIDES: RefCell<Vec<Arc<dyn IdGenerator>>> =
        const { RefCell::new(Vec::new()) };
    static CONVERTER_OVERRIDES: RefCell<Vec<Arc<PublicIdentityConverter>>> =
        const { RefCell::new(Vec::new()) };
}

/// Installs the process-default generator. Intended to be called once at
/// startup; a later call replaces the default for subsequent reads.
pub fn set_default_generator(generator: Arc<dyn IdGenerator>) {
    *DEFAULT_GENERATOR.write() = Some(generator);
}

/// Clears the process-default generator, for orderly shutdown.
pub fn reset_default_generator() {
    *DEFAULT_GENERATOR.write() = None;
}

/// Returns the current generator: the topmost scoped override on this
/// thread, else the process default.
///
/// If no default has been installed, a standard
/// [`DistributedIdGenerator`] over the wall clock is created and installed
/// lazily, so callers always get a working generator.
pub fn current_generator() -> Arc<dyn IdGenerator> {
    let override_ = GENERATOR_OVERRIDES.with(|stack| stack.borrow().last().cloned());
    if let Some(generator) = override_ {
        return generator;
    }
    if let Some(generator) = DEFAULT_GENERATOR.read().as_ref() {
        return Arc::clone(generator);
    }
    let mut slot = DEFAULT_GENERATOR.write();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(DistributedIdGenerator::default())))
}

/// Mints an ID from the current generator.
///
/// # Errors
/// Those of [`IdGenerator::create_id`].
pub fn create_id() -> Result<DistributedId> {
    current_generator().create_id()
}

/// Installs the process-default public-identity converter. Intended to be
/// called once at startup with the host's key material.
pub fn set_default_converter(converter: Arc<PublicIdentityConverter>) {
    *DEFAULT_CONVERTER.write() = Some(converter);
}

/// Clears the process-default converter, for orderly shutdown.
pub fn reset_default_converter() {
    *DEFAULT_CONVERTER.write() = None;
}

/// Returns the current converter: the topmost scoped override on this
/// thread, else the process default.
///
/// # Errors
/// [`Error::Configuration`](crate::Error::Configuration) if no converter has
/// been installed. Under `cfg(test)` or the `test-util` feature a zero-key
/// converter is installed lazily instead, so unit tests never have to wire
/// key material.
pub fn current_converter() -> Result<Arc<PublicIdentityConverter>> {
    let override_ = CONVERTER_OVERRIDES.with(|stack| stack.borrow().last().cloned());
    if let Some(converter) = override_ {
        return Ok(converter);
    }
    if let Some(converter) = DEFAULT_CONVERTER.read().as_ref() {
        return Ok(Arc::clone(converter));
    }
    fallback_converter()
}

#[cfg(any(test, feature = "test-util"))]
fn fallback_converter() -> Result<Arc<PublicIdentityConverter>> {
    let mut slot = DEFAULT_CONVERTER.write();
    Ok(Arc::clone(slot.get_or_insert_with(|| {
        Arc::new(PublicIdentityConverter::zero_key())
    })))
}

#[cfg(not(any(test, feature = "test-util")))]
fn fallback_converter() -> Result<Arc<PublicIdentityConverter>> {
    Err(Error::Configuration {
        reason: "no public-identity converter has been installed",
    })
}

/// A scoped generator override on the current thread.
///
/// The override applies from construction until the guard drops. Guards may
/// nest; the innermost one wins, and they must drop in reverse construction
/// order (which borrowing normally enforces).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use distrid::{DistributedIdGenerator, GeneratorScope};
///
/// let scoped: Arc<DistributedIdGenerator> = Arc::new(DistributedIdGenerator::default());
/// {
///     let _scope = GeneratorScope::new(scoped.clone());
///     let id = distrid::create_id().unwrap(); // minted by `scoped`
/// }
/// // the previous generator is back in effect
/// ```
pub struct GeneratorScope {
    // Thread-affine: the override must be popped on the thread it was pushed.
    _not_send: PhantomData<*const ()>,
}

impl GeneratorScope {
    /// Pushes `generator` as this thread's current generator.
    pub fn new(generator: Arc<dyn IdGenerator>) -> Self {
        GENERATOR_OVERRIDES.with(|stack| stack.borrow_mut().push(generator));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for GeneratorScope {
    fn drop(&mut self) {
        GENERATOR_OVERRIDES.with(|stack| stack.borrow_mut().pop());
    }
}

/// A scoped converter override on the current thread. See
/// [`GeneratorScope`] for the override discipline.
pub struct ConverterScope {
    _not_send: PhantomData<*const ()>,
}

impl ConverterScope {
    /// Pushes `converter` as this thread's current converter.
    pub fn new(converter: Arc<PublicIdentityConverter>) -> Self {
        CONVERTER_OVERRIDES.with(|stack| stack.borrow_mut().push(converter));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for ConverterScope {
    fn drop(&mut self) {
        CONVERTER_OVERRIDES.with(|stack| stack.borrow_mut().pop());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RandSource, SleepProvider, ThreadSleeper, TimeSource};
    use core::time::Duration;

    struct FixedTime(u64);
    impl TimeSource<u64> for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    struct FixedRand(u64);
    impl RandSource<u64> for FixedRand {
        fn rand(&self) -> u64 {
            self.0
        }
    }

    struct NoSleep;
    impl SleepProvider for NoSleep {
        fn sleep_for(&self, _duration: Duration) {}
    }

    fn pinned_generator(millis: u64) -> Arc<dyn IdGenerator> {
        Arc::new(DistributedIdGenerator::with_sources(
            FixedTime(millis),
            FixedRand(7),
            NoSleep,
        ))
    }

    #[test]
    fn create_id_works_without_any_setup() {
        let id = create_id().unwrap();
        assert!(id > DistributedId::ZERO);
    }

    #[test]
    fn scoped_overrides_nest_lifo() {
        let outer = pinned_generator(1_000);
        let inner = pinned_generator(2_000);

        {
            let _outer = GeneratorScope::new(outer);
            assert_eq!(create_id().unwrap().timestamp_millis(), 1_000);
            {
                let _inner = GeneratorScope::new(inner);
                assert_eq!(create_id().unwrap().timestamp_millis(), 2_000);
            }
            assert_eq!(create_id().unwrap().timestamp_millis(), 1_000);
        }

        // Back to the ambient default, which runs on the wall clock.
        assert!(create_id().unwrap().timestamp_millis() > 2_000);
    }

    #[test]
    fn overrides_are_thread_local() {
        let _scope = GeneratorScope::new(pinned_generator(5_000));
        assert_eq!(create_id().unwrap().timestamp_millis(), 5_000);

        let from_other_thread = std::thread::spawn(|| create_id().unwrap().timestamp_millis())
            .join()
            .unwrap();
        assert_ne!(from_other_thread, 5_000);
    }

    #[test]
    fn test_runs_get_a_zero_key_converter() {
        let converter = current_converter().unwrap();
        let public = converter.conceal_u64(42);
        assert_eq!(converter.reveal_u64(public), Some(42));
    }

    #[test]
    fn converter_scopes_override() {
        let scoped = Arc::new(PublicIdentityConverter::new(&[9u8; 32]).unwrap());
        let expected = scoped.conceal_u64(1);

        let _scope = ConverterScope::new(scoped);
        let seen = current_converter().unwrap().conceal_u64(1);
        assert_eq!(seen, expected);
    }

    #[test]
    fn default_generator_can_be_installed_and_reset() {
        // Other tests tolerate a pinned default: they either run under their
        // own scoped override or only require a working generator.
        set_default_generator(pinned_generator(9_000));
        assert_eq!(create_id().unwrap().timestamp_millis(), 9_000);

        reset_default_generator();
        // The next read lazily reinstalls a wall-clock generator.
        assert!(create_id().unwrap().timestamp_millis() > 9_000);
    }

    #[test]
    fn sleeper_is_send_sync() {
        // The ambient default must be shareable across threads.
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(&ThreadSleeper);
        let generator = DistributedIdGenerator::default();
        assert_send_sync(&generator);
    }
}
