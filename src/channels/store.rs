//! # Channel Store
//!
//! Lock-protected [`ChannelSet`] shared by the input path and the sender.
//!
//! Every read and write goes through one mutex. The critical section only
//! ever copies values in or out; encoding a frame happens after the lock is
//! released.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use super::arming::ArmingState;
use super::{Channel, ChannelSet, ChannelUpdate};
use crate::sumd::encoder::encode_sumd_frame;

/// Cloneable handle to one session's channel values
///
/// Clones share the same underlying values, so one clone can be handed to
/// the sender task while another drives updates.
///
/// # Examples
///
/// ```
/// use sumd_bridge::channels::{ChannelStore, ChannelUpdate};
///
/// let store = ChannelStore::new();
/// store.update(ChannelUpdate::new().pitch(1600));
///
/// let frame = store.snapshot_and_encode();
/// assert_eq!(frame.len(), 15);
/// assert_eq!(store.snapshot().pitch, 1600);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    inner: Arc<Mutex<ChannelSet>>,
}

impl ChannelStore {
    /// Create a store holding the power-on defaults
    pub fn new() -> Self {
        Self::with_values(ChannelSet::default())
    }

    /// Create a store holding specific values
    pub fn with_values(values: ChannelSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(values)),
        }
    }

    /// Apply every provided field of `update` under a single lock
    ///
    /// All fields become visible together. Values are not range checked.
    pub fn update(&self, update: ChannelUpdate) {
        let mut values = self.lock();
        update.apply_to(&mut values);
    }

    /// Add `delta` to one channel and return the new value
    ///
    /// The read and the write happen under the same lock, so concurrent
    /// adjustments are never lost. Saturates at the u16 bounds.
    pub fn adjust(&self, channel: Channel, delta: i32) -> u16 {
        let mut values = self.lock();
        let adjusted = (values.get(channel) as i32 + delta).clamp(0, u16::MAX as i32) as u16;
        values.set(channel, adjusted);
        adjusted
    }

    /// Copy of all values at a single point in time
    pub fn snapshot(&self) -> ChannelSet {
        *self.lock()
    }

    /// Snapshot the values and build a ready-to-send SUMD frame
    pub fn snapshot_and_encode(&self) -> Vec<u8> {
        let channels = self.lock().to_wire_order();
        encode_sumd_frame(&channels)
    }

    /// Set aux1 to the armed value
    pub fn arm(&self) {
        self.set_arming_state(ArmingState::Armed);
    }

    /// Set aux1 to the disarmed value
    pub fn disarm(&self) {
        self.set_arming_state(ArmingState::Disarmed);
    }

    /// Set aux1 to the alternate flight mode value
    pub fn set_flight_mode(&self) {
        self.set_arming_state(ArmingState::FlightMode);
    }

    /// Current arming state, `None` if aux1 holds an unrecognised value
    pub fn arming_state(&self) -> Option<ArmingState> {
        ArmingState::from_aux1(self.lock().aux1)
    }

    fn set_arming_state(&self, state: ArmingState) {
        self.update(ChannelUpdate::new().aux1(state.aux1_value()));
        info!("aux1 set to {} ({})", state.aux1_value(), state);
    }

    // A poisoned lock still guards a plain, fully written ChannelSet
    fn lock(&self) -> MutexGuard<'_, ChannelSet> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
