//! The display as a single shared resource.
//!
//! Every touch of the screen, from a UI handler or from a periodic task, goes
//! through one [`DisplayLock`]. Tasks read their [`GuardedValue`]s before
//! taking it and never wait on one while holding it.
//!
//! [`GuardedValue`]: crate::guarded::GuardedValue

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    mutex::Mutex,
};

use crate::{
    battery::BatteryStatus,
    scan::AccessPoint,
};

/// The coarse lock around the screen.
pub type DisplayLock<S> = Mutex<CriticalSectionRawMutex, S>;

/// What the periodic tasks draw on the screen.
pub trait Screen {
    /// Update the battery indicator shown on every tab.
    fn show_battery(&mut self, status: BatteryStatus);

    /// Drop every entry of the access point list.
    fn clear_access_points(&mut self);

    /// Add one entry at the bottom of the access point list.
    fn append_access_point(&mut self, ap: &AccessPoint);

    /// The entry currently shown at `index`.
    fn access_point(&self, index: usize) -> Option<&AccessPoint>;
}
