use dmr_core::DmrData;

pub mod homebrew;
pub mod transports;
pub mod worker;

/// Frame-level network adapter
pub trait DmrNetwork: Send {
    /// Non-blocking. Returns the next received frame, if any.
    fn read(&mut self) -> Option<DmrData>;

    /// Queues a frame for sending. Returns false when the adapter can't take it.
    fn write(&mut self, data: &DmrData) -> bool;
}
