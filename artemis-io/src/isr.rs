//! Static registration slot for interrupt trampolines.
//!
//! Hardware vectors cannot carry a context argument, so an interrupt handler
//! needs *some* static path to the driver it services. [`IsrSlot`] is that
//! path and nothing more: the driver registers itself once during `begin()`,
//! the vector dispatches through the slot, and the driver object itself stays
//! an ordinary owned value instead of a process-wide mutable global.
//!
//! ## Usage
//!
//! ```ignore
//! static UART0_SLOT: IsrSlot<Uart<Uart0Port, 256, 256>> = IsrSlot::new();
//!
//! // During init, with `serial: &'static Uart<..>`:
//! serial.begin(&UART0_SLOT)?;
//!
//! #[interrupt]
//! fn UART0() {
//!     UART0_SLOT.dispatch(|uart| uart.on_interrupt());
//! }
//! ```

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::error::RegisterError;

/// A set-once pointer from an interrupt vector to a driver instance.
///
/// Only atomic `load`/`store` are used. Registration and unregistration
/// happen from foreground code while the corresponding IRQ is masked; the
/// interrupt only ever reads the slot.
pub struct IsrSlot<T: 'static> {
    target: AtomicPtr<T>,
}

impl<T: Sync + 'static> IsrSlot<T> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        IsrSlot {
            target: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Point the slot at `target`.
    ///
    /// Registering the instance that already owns the slot is a no-op.
    /// Fails if a different instance is registered; the existing
    /// registration is left in place.
    pub fn register(&self, target: &'static T) -> Result<(), RegisterError> {
        let new = target as *const T as *mut T;
        let current = self.target.load(Ordering::Acquire);

        if current == new {
            return Ok(());
        }
        if !current.is_null() {
            warn!("isr: slot already registered");
            return Err(RegisterError);
        }

        self.target.store(new, Ordering::Release);
        trace!("isr: slot registered");
        Ok(())
    }

    /// Empty the slot if `target` owns it. Returns whether it did.
    pub fn unregister(&self, target: &T) -> bool {
        let current = self.target.load(Ordering::Acquire);
        if !ptr::eq(current, target) {
            return false;
        }
        self.target.store(ptr::null_mut(), Ordering::Release);
        trace!("isr: slot released");
        true
    }

    /// The registered instance, if any.
    pub fn get(&self) -> Option<&'static T> {
        let target = self.target.load(Ordering::Acquire);
        // SAFETY: Only `&'static T` values are ever stored, and `T: Sync`
        // makes sharing them with the interrupt context sound.
        unsafe { target.as_ref() }
    }

    /// Run `f` against the registered instance.
    ///
    /// Returns `false` (and does nothing) when the slot is empty, e.g. a
    /// spurious interrupt before `begin()`.
    pub fn dispatch(&self, f: impl FnOnce(&'static T)) -> bool {
        match self.get() {
            Some(target) => {
                f(target);
                true
            }
            None => false,
        }
    }

    /// Whether an instance is registered.
    pub fn is_registered(&self) -> bool {
        !self.target.load(Ordering::Acquire).is_null()
    }
}

impl<T: Sync + 'static> Default for IsrSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;
    use std::boxed::Box;

    struct Counter(AtomicU32);

    fn leak(n: u32) -> &'static Counter {
        Box::leak(Box::new(Counter(AtomicU32::new(n))))
    }

    #[test]
    fn empty_slot_dispatches_nothing() {
        let slot: IsrSlot<Counter> = IsrSlot::new();
        assert!(!slot.is_registered());
        assert!(slot.get().is_none());
        assert!(!slot.dispatch(|_| panic!("no target")));
    }

    #[test]
    fn register_and_dispatch() {
        let slot: IsrSlot<Counter> = IsrSlot::new();
        let counter = leak(0);

        slot.register(counter).unwrap();
        assert!(slot.is_registered());
        assert!(slot.dispatch(|c| {
            c.0.store(7, Ordering::Relaxed);
        }));
        assert_eq!(counter.0.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn second_instance_is_rejected() {
        let slot: IsrSlot<Counter> = IsrSlot::new();
        let first = leak(1);
        let second = leak(2);

        slot.register(first).unwrap();
        assert_eq!(slot.register(second), Err(RegisterError));
        // Re-registering the owner is fine.
        assert_eq!(slot.register(first), Ok(()));
        assert_eq!(slot.get().unwrap().0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn unregister_only_by_owner() {
        let slot: IsrSlot<Counter> = IsrSlot::new();
        let first = leak(1);
        let second = leak(2);

        slot.register(first).unwrap();
        assert!(!slot.unregister(second));
        assert!(slot.is_registered());
        assert!(slot.unregister(first));
        assert!(!slot.is_registered());

        slot.register(second).unwrap();
        assert_eq!(slot.get().unwrap().0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn usable_in_static() {
        static SLOT: IsrSlot<Counter> = IsrSlot::new();
        static TARGET: Counter = Counter(AtomicU32::new(3));

        SLOT.register(&TARGET).unwrap();
        assert!(SLOT.dispatch(|c| assert_eq!(c.0.load(Ordering::Relaxed), 3)));
    }
}
