//! Latest-value hand-off between UI handlers and hardware tasks.
//!
//! A [`GuardedValue`] holds the most recent value written by any producer.
//! Writers are UI handlers running on the dispatch context; the reader is a
//! periodic task. Each value has its own critical section, independent of the
//! display lock, so a slider write never contends with a screen update.

use core::cell::Cell;

use embassy_sync::blocking_mutex::{
    Mutex,
    raw::CriticalSectionRawMutex,
};

/// A mutex-protected value that is always observed whole.
pub struct GuardedValue<T> {
    current: Mutex<CriticalSectionRawMutex, Cell<T>>,
}

impl<T: Copy> GuardedValue<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            current: Mutex::new(Cell::new(initial)),
        }
    }

    /// Overwrite the value. Concurrent writers race; the last one wins.
    pub fn set(&self, value: T) {
        self.current.lock(|cell| cell.set(value));
    }

    /// The most recently completed write, or the initial value.
    pub fn get(&self) -> T {
        self.current.lock(Cell::get)
    }

    /// Read-modify-write inside one critical section.
    ///
    /// Single-field writers (one colour channel, one switch) go through here
    /// so they never lose another writer's field. Returns the new value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> T {
        self.current.lock(|cell| {
            let mut value = cell.get();
            f(&mut value);
            cell.set(value);
            value
        })
    }
}

impl<T: Copy + Default> Default for GuardedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
