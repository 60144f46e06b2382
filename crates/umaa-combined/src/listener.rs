// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Listener traits, status types, and masked event forwarding.
//!
//! Listeners provide callback-based notification for reader/writer adapter
//! events. Callbacks are invoked from transport background threads; they
//! must be `Send + Sync`, and the forwarding boundary treats them as
//! untrusted: a panicking user callback is caught and logged so it can
//! never unwind into transport-internal call stacks.

use crate::guid::Guid;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Status mask bits for listener event filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMask(u32);

impl StatusMask {
    /// No status enabled.
    pub const NONE: StatusMask = StatusMask(0);

    /// All statuses enabled.
    pub const ALL: StatusMask = StatusMask(0xFFFF_FFFF);

    /// Data available to read (reader).
    pub const DATA_AVAILABLE: StatusMask = StatusMask(1 << 0);

    /// Sample lost (reader).
    pub const SAMPLE_LOST: StatusMask = StatusMask(1 << 1);

    /// Sample rejected (reader).
    pub const SAMPLE_REJECTED: StatusMask = StatusMask(1 << 2);

    /// Liveliness changed (reader).
    pub const LIVELINESS_CHANGED: StatusMask = StatusMask(1 << 3);

    /// Requested deadline missed (reader).
    pub const REQUESTED_DEADLINE_MISSED: StatusMask = StatusMask(1 << 4);

    /// Requested incompatible QoS (reader).
    pub const REQUESTED_INCOMPATIBLE_QOS: StatusMask = StatusMask(1 << 5);

    /// Subscription matched (reader).
    pub const SUBSCRIPTION_MATCHED: StatusMask = StatusMask(1 << 6);

    /// Liveliness lost (writer).
    pub const LIVELINESS_LOST: StatusMask = StatusMask(1 << 7);

    /// Offered deadline missed (writer).
    pub const OFFERED_DEADLINE_MISSED: StatusMask = StatusMask(1 << 8);

    /// Offered incompatible QoS (writer).
    pub const OFFERED_INCOMPATIBLE_QOS: StatusMask = StatusMask(1 << 9);

    /// Publication matched (writer).
    pub const PUBLICATION_MATCHED: StatusMask = StatusMask(1 << 10);

    /// Create a new StatusMask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        StatusMask(bits)
    }

    /// Get the raw bits value.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Check if this mask contains the given status.
    #[must_use]
    pub const fn contains(&self, other: StatusMask) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Combine two masks with bitwise OR.
    #[must_use]
    pub const fn or(self, other: StatusMask) -> Self {
        StatusMask(self.0 | other.0)
    }

    /// Intersect two masks with bitwise AND.
    #[must_use]
    pub const fn and(self, other: StatusMask) -> Self {
        StatusMask(self.0 & other.0)
    }
}

impl std::ops::BitOr for StatusMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

/// Status information for subscription matching events.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionMatchedStatus {
    /// Total cumulative count of matched publications.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
    /// Current number of matched publications.
    pub current_count: u32,
    /// Change in current_count since last callback.
    pub current_count_change: i32,
    /// Key of the last matched/unmatched publication.
    pub last_publication_handle: Option<Guid>,
}

/// Status information for publication matching events.
#[derive(Debug, Clone, Default)]
pub struct PublicationMatchedStatus {
    /// Total cumulative count of matched subscriptions.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
    /// Current number of matched subscriptions.
    pub current_count: u32,
    /// Change in current_count since last callback.
    pub current_count_change: i32,
    /// Key of the last matched/unmatched subscription.
    pub last_subscription_handle: Option<Guid>,
}

/// Status information for liveliness changes.
#[derive(Debug, Clone, Default)]
pub struct LivelinessChangedStatus {
    /// Number of publications currently asserting liveliness.
    pub alive_count: u32,
    /// Change in alive_count since last callback.
    pub alive_count_change: i32,
    /// Number of publications that have lost liveliness.
    pub not_alive_count: u32,
    /// Change in not_alive_count since last callback.
    pub not_alive_count_change: i32,
    /// Key of the last publication to change liveliness.
    pub last_publication_handle: Option<Guid>,
}

/// Status information for sample lost events.
#[derive(Debug, Clone, Default)]
pub struct SampleLostStatus {
    /// Total cumulative count of lost samples.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
}

/// Status information for sample rejected events.
#[derive(Debug, Clone, Default)]
pub struct SampleRejectedStatus {
    /// Total cumulative count of rejected samples.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
}

/// Status information for deadline missed events.
#[derive(Debug, Clone, Default)]
pub struct RequestedDeadlineMissedStatus {
    /// Total cumulative count of missed deadlines.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
    /// Handle of the instance that missed the deadline.
    pub last_instance_handle: Option<u64>,
}

/// Status information for incompatible QoS events.
#[derive(Debug, Clone, Default)]
pub struct RequestedIncompatibleQosStatus {
    /// Total cumulative count of incompatible QoS offers.
    pub total_count: u32,
    /// Change in total_count since last callback.
    pub total_count_change: i32,
    /// ID of the last incompatible QoS policy.
    pub last_policy_id: u32,
}

/// Listener for reader-adapter events.
///
/// All methods have default no-op implementations, so implementers only
/// override the events they care about. `on_data_available` carries no
/// sample: assembled samples are pulled through `read()`/`take()` after the
/// notification.
pub trait CombinedReaderListener: Send + Sync {
    /// Called when newly assembled combined samples may be available.
    fn on_data_available(&self) {}

    /// Called when the reader matches or unmatches with a writer.
    fn on_subscription_matched(&self, status: SubscriptionMatchedStatus) {
        let _ = status;
    }

    /// Called when liveliness of a matched writer changes.
    fn on_liveliness_changed(&self, status: LivelinessChangedStatus) {
        let _ = status;
    }

    /// Called when samples are lost.
    fn on_sample_lost(&self, status: SampleLostStatus) {
        let _ = status;
    }

    /// Called when samples are rejected due to resource limits.
    fn on_sample_rejected(&self, status: SampleRejectedStatus) {
        let _ = status;
    }

    /// Called when the requested deadline is missed.
    fn on_requested_deadline_missed(&self, status: RequestedDeadlineMissedStatus) {
        let _ = status;
    }

    /// Called when QoS is incompatible with a matched writer.
    fn on_requested_incompatible_qos(&self, status: RequestedIncompatibleQosStatus) {
        let _ = status;
    }
}

/// Listener for writer-adapter events. All methods default to no-ops.
pub trait CombinedWriterListener: Send + Sync {
    /// Called when any writer in the decorator tree matches or unmatches
    /// with a reader.
    fn on_publication_matched(&self, status: PublicationMatchedStatus) {
        let _ = status;
    }

    /// Called when an offered deadline is missed.
    fn on_offered_deadline_missed(&self, instance_handle: Option<u64>) {
        let _ = instance_handle;
    }

    /// Called when QoS is incompatible with a matched reader.
    fn on_offered_incompatible_qos(&self, policy_id: u32, policy_name: &str) {
        let _ = (policy_id, policy_name);
    }

    /// Called when liveliness is lost.
    fn on_liveliness_lost(&self) {}
}

/// Reader lifecycle event, matched over by the forwarding boundary.
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// Newly assembled data may be available.
    DataAvailable,
    /// Subscription matched/unmatched.
    SubscriptionMatched(SubscriptionMatchedStatus),
    /// Liveliness of a matched writer changed.
    LivelinessChanged(LivelinessChangedStatus),
    /// Samples lost.
    SampleLost(SampleLostStatus),
    /// Samples rejected.
    SampleRejected(SampleRejectedStatus),
    /// Requested deadline missed.
    RequestedDeadlineMissed(RequestedDeadlineMissedStatus),
    /// Requested QoS incompatible.
    RequestedIncompatibleQos(RequestedIncompatibleQosStatus),
}

impl ReaderEvent {
    /// Mask bit this event corresponds to.
    pub fn mask(&self) -> StatusMask {
        match self {
            ReaderEvent::DataAvailable => StatusMask::DATA_AVAILABLE,
            ReaderEvent::SubscriptionMatched(_) => StatusMask::SUBSCRIPTION_MATCHED,
            ReaderEvent::LivelinessChanged(_) => StatusMask::LIVELINESS_CHANGED,
            ReaderEvent::SampleLost(_) => StatusMask::SAMPLE_LOST,
            ReaderEvent::SampleRejected(_) => StatusMask::SAMPLE_REJECTED,
            ReaderEvent::RequestedDeadlineMissed(_) => StatusMask::REQUESTED_DEADLINE_MISSED,
            ReaderEvent::RequestedIncompatibleQos(_) => StatusMask::REQUESTED_INCOMPATIBLE_QOS,
        }
    }
}

/// Writer lifecycle event.
#[derive(Debug, Clone)]
pub enum WriterEvent {
    /// Publication matched/unmatched.
    PublicationMatched(PublicationMatchedStatus),
    /// Offered deadline missed.
    OfferedDeadlineMissed(Option<u64>),
    /// Offered QoS incompatible.
    OfferedIncompatibleQos {
        /// Policy id.
        policy_id: u32,
        /// Policy name (e.g. "RELIABILITY").
        policy_name: String,
    },
    /// Liveliness lost.
    LivelinessLost,
}

impl WriterEvent {
    /// Mask bit this event corresponds to.
    pub fn mask(&self) -> StatusMask {
        match self {
            WriterEvent::PublicationMatched(_) => StatusMask::PUBLICATION_MATCHED,
            WriterEvent::OfferedDeadlineMissed(_) => StatusMask::OFFERED_DEADLINE_MISSED,
            WriterEvent::OfferedIncompatibleQos { .. } => StatusMask::OFFERED_INCOMPATIBLE_QOS,
            WriterEvent::LivelinessLost => StatusMask::LIVELINESS_LOST,
        }
    }
}

/// Forward a reader event to a user listener, applying the mask filter and
/// containing panics at the boundary.
pub(crate) fn forward_reader_event(
    listener: &Arc<dyn CombinedReaderListener>,
    user_mask: StatusMask,
    event: &ReaderEvent,
) {
    if !user_mask.contains(event.mask()) {
        return;
    }
    let outcome = catch_unwind(AssertUnwindSafe(|| match event {
        ReaderEvent::DataAvailable => listener.on_data_available(),
        ReaderEvent::SubscriptionMatched(s) => listener.on_subscription_matched(s.clone()),
        ReaderEvent::LivelinessChanged(s) => listener.on_liveliness_changed(s.clone()),
        ReaderEvent::SampleLost(s) => listener.on_sample_lost(s.clone()),
        ReaderEvent::SampleRejected(s) => listener.on_sample_rejected(s.clone()),
        ReaderEvent::RequestedDeadlineMissed(s) => {
            listener.on_requested_deadline_missed(s.clone());
        }
        ReaderEvent::RequestedIncompatibleQos(s) => {
            listener.on_requested_incompatible_qos(s.clone());
        }
    }));
    if outcome.is_err() {
        log::warn!(
            "[LISTENER] user reader listener panicked on {:?}; event dropped",
            event.mask()
        );
    }
}

/// Writer-side counterpart of [`forward_reader_event`].
pub(crate) fn forward_writer_event(
    listener: &Arc<dyn CombinedWriterListener>,
    user_mask: StatusMask,
    event: &WriterEvent,
) {
    if !user_mask.contains(event.mask()) {
        return;
    }
    let outcome = catch_unwind(AssertUnwindSafe(|| match event {
        WriterEvent::PublicationMatched(s) => listener.on_publication_matched(s.clone()),
        WriterEvent::OfferedDeadlineMissed(h) => listener.on_offered_deadline_missed(*h),
        WriterEvent::OfferedIncompatibleQos {
            policy_id,
            policy_name,
        } => listener.on_offered_incompatible_qos(*policy_id, policy_name),
        WriterEvent::LivelinessLost => listener.on_liveliness_lost(),
    }));
    if outcome.is_err() {
        log::warn!(
            "[LISTENER] user writer listener panicked on {:?}; event dropped",
            event.mask()
        );
    }
}

/// Closure-based listener for simple data-availability callbacks.
pub struct ClosureReaderListener<F: Fn() + Send + Sync> {
    callback: F,
}

impl<F: Fn() + Send + Sync> ClosureReaderListener<F> {
    /// Create a new closure-based listener.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: Fn() + Send + Sync> CombinedReaderListener for ClosureReaderListener<F> {
    fn on_data_available(&self) {
        (self.callback)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn mask_operations() {
        let mask = StatusMask::DATA_AVAILABLE | StatusMask::SUBSCRIPTION_MATCHED;
        assert!(mask.contains(StatusMask::DATA_AVAILABLE));
        assert!(!mask.contains(StatusMask::SAMPLE_LOST));
        assert!(StatusMask::ALL.contains(mask));
        assert_eq!(mask.and(StatusMask::NONE), StatusMask::NONE);
    }

    #[test]
    fn closure_listener_counts_callbacks() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let listener = ClosureReaderListener::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        listener.on_data_available();
        listener.on_data_available();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn forwarding_respects_mask() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let listener: Arc<dyn CombinedReaderListener> =
            Arc::new(ClosureReaderListener::new(move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            }));

        forward_reader_event(
            &listener,
            StatusMask::SUBSCRIPTION_MATCHED,
            &ReaderEvent::DataAvailable,
        );
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        forward_reader_event(&listener, StatusMask::ALL, &ReaderEvent::DataAvailable);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_is_contained() {
        struct Panicker;
        impl CombinedReaderListener for Panicker {
            fn on_data_available(&self) {
                panic!("user callback misbehaving");
            }
        }

        let listener: Arc<dyn CombinedReaderListener> = Arc::new(Panicker);
        // Must not propagate.
        forward_reader_event(&listener, StatusMask::ALL, &ReaderEvent::DataAvailable);
    }

    // Default implementations must not panic.
    struct NoOpListener;
    impl CombinedReaderListener for NoOpListener {}
    impl CombinedWriterListener for NoOpListener {}

    #[test]
    fn noop_defaults() {
        let listener = NoOpListener;
        listener.on_data_available();
        listener.on_subscription_matched(SubscriptionMatchedStatus::default());
        listener.on_liveliness_changed(LivelinessChangedStatus::default());
        listener.on_sample_lost(SampleLostStatus::default());
        listener.on_sample_rejected(SampleRejectedStatus::default());
        listener.on_requested_deadline_missed(RequestedDeadlineMissedStatus::default());
        listener.on_requested_incompatible_qos(RequestedIncompatibleQosStatus::default());

        listener.on_publication_matched(PublicationMatchedStatus::default());
        listener.on_offered_deadline_missed(None);
        listener.on_offered_incompatible_qos(0, "RELIABILITY");
        listener.on_liveliness_lost();
    }
}
