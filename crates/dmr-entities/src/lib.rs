use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod access_control;
pub mod control;
pub mod display;
pub mod host;
pub mod lookup;
pub mod modem;
pub mod network;
pub mod slot;

// Re-export commonly used items
pub use access_control::AccessControl;
pub use control::{ControlDeps, ControlDispatcher, ControlError};
pub use display::{DmrDisplay, LogDisplay};
pub use host::{HostMode, RepeaterHost};
pub use lookup::{DmrIdLookup, IdentityLookup};
pub use modem::DmrModem;
pub use network::DmrNetwork;
pub use slot::{DmrSlot, RelaySlot, SlotContext};

/// Locks an adapter shared between the dispatcher and the slots.
/// A panic while holding the lock leaves no invariant behind, so poisoning is ignored.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
