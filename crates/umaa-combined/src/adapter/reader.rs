// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reader adapter: buffers assembled samples and forwards lifecycle events.
//!
//! The raw reader's notifications drive the assembly tree; completed
//! `(key, sample, info)` triples land in a locked buffer the application
//! drains with `read()`/`take()`. Assembly always runs before any user
//! callback, and user callbacks can never unwind into transport threads.

use crate::guid::Guid;
use crate::listener::{
    forward_reader_event, CombinedReaderListener, LivelinessChangedStatus, ReaderEvent,
    RequestedDeadlineMissedStatus, RequestedIncompatibleQosStatus, SampleLostStatus,
    SampleRejectedStatus, StatusMask, SubscriptionMatchedStatus,
};
use crate::sample::CombinedSample;
use crate::transport::{AssemblyNode, RawReader, SampleInfo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type BufferEntry = (Guid, Option<Arc<CombinedSample>>, Option<SampleInfo>);

/// One deduplicated buffer entry returned by `read()`/`take()`.
#[derive(Debug, Clone)]
pub struct ReadEntry {
    /// Instance key the sample was assembled for.
    pub key: Guid,
    /// Assembled snapshot; `None` for disposal markers.
    pub sample: Option<Arc<CombinedSample>>,
    /// Sample metadata; `None` when the assembler had none to attach.
    pub info: Option<SampleInfo>,
}

struct ReaderShared {
    buffer: Mutex<Vec<BufferEntry>>,
    user: Mutex<Option<(Arc<dyn CombinedReaderListener>, StatusMask)>>,
    node: Arc<dyn AssemblyNode>,
}

impl ReaderShared {
    fn push(&self, key: Guid, sample: Option<Arc<CombinedSample>>, info: Option<SampleInfo>) {
        log::trace!("[READER-ADAPTER] buffered update for key={}", key);
        self.buffer.lock().push((key, sample, info));
    }

    fn forward(&self, event: &ReaderEvent) {
        let user = self.user.lock().clone();
        if let Some((listener, mask)) = user {
            forward_reader_event(&listener, mask, event);
        }
    }
}

// Installed on the raw reader once at adapter construction. Data
// availability triggers exactly one assembly pass per notification before
// anything is forwarded; every other event is forwarded as-is.
struct InternalReaderListener {
    shared: Arc<ReaderShared>,
}

impl CombinedReaderListener for InternalReaderListener {
    fn on_data_available(&self) {
        self.shared.node.poll_once();
        self.shared.forward(&ReaderEvent::DataAvailable);
    }

    fn on_subscription_matched(&self, status: SubscriptionMatchedStatus) {
        self.shared.forward(&ReaderEvent::SubscriptionMatched(status));
    }

    fn on_liveliness_changed(&self, status: LivelinessChangedStatus) {
        self.shared.forward(&ReaderEvent::LivelinessChanged(status));
    }

    fn on_sample_lost(&self, status: SampleLostStatus) {
        self.shared.forward(&ReaderEvent::SampleLost(status));
    }

    fn on_sample_rejected(&self, status: SampleRejectedStatus) {
        self.shared.forward(&ReaderEvent::SampleRejected(status));
    }

    fn on_requested_deadline_missed(&self, status: RequestedDeadlineMissedStatus) {
        self.shared
            .forward(&ReaderEvent::RequestedDeadlineMissed(status));
    }

    fn on_requested_incompatible_qos(&self, status: RequestedIncompatibleQosStatus) {
        self.shared
            .forward(&ReaderEvent::RequestedIncompatibleQos(status));
    }
}

/// Adapter around a root raw reader plus its assembly-node tree.
pub struct UmaaReaderAdapter {
    reader: Arc<dyn RawReader>,
    shared: Arc<ReaderShared>,
}

impl UmaaReaderAdapter {
    /// Wire up the assembly callback and install the internal listener.
    ///
    /// Installation prefers the broadest mask; on failure (e.g. an older
    /// transport lacking some event kinds) it falls back to plain data
    /// availability instead of failing construction.
    pub fn new(reader: Arc<dyn RawReader>, node: Arc<dyn AssemblyNode>) -> Self {
        let shared = Arc::new(ReaderShared {
            buffer: Mutex::new(Vec::new()),
            user: Mutex::new(None),
            node: node.clone(),
        });

        let notify_shared = shared.clone();
        node.set_parent_notify(Arc::new(move |key, sample, info| {
            notify_shared.push(key, sample, info);
        }));

        let listener: Arc<dyn CombinedReaderListener> = Arc::new(InternalReaderListener {
            shared: shared.clone(),
        });
        if let Err(e) = reader.set_listener(listener.clone(), StatusMask::ALL) {
            log::warn!(
                "[READER-ADAPTER] full-mask listener rejected on topic='{}' ({}); retrying with DATA_AVAILABLE",
                reader.topic_name(),
                e
            );
            if let Err(e) = reader.set_listener(listener, StatusMask::DATA_AVAILABLE) {
                log::warn!(
                    "[READER-ADAPTER] minimal listener install failed on topic='{}': {}",
                    reader.topic_name(),
                    e
                );
            }
        }

        Self { reader, shared }
    }

    /// Attach (or detach with `None`) the user listener.
    ///
    /// Only changes which events reach user code; internal assembly runs
    /// regardless of whether anyone is listening.
    pub fn set_listener(
        &self,
        listener: Option<Arc<dyn CombinedReaderListener>>,
        mask: StatusMask,
    ) {
        *self.shared.user.lock() = listener.map(|l| (l, mask));
    }

    /// Deduplicated snapshot of the buffer, leaving it intact.
    ///
    /// When a key occurs multiple times, only its latest occurrence is
    /// returned, ordered by that latest position (stable by last write).
    pub fn read(&self) -> Vec<ReadEntry> {
        dedup_latest(&self.shared.buffer.lock())
    }

    /// Like [`UmaaReaderAdapter::read`], additionally clearing the buffer.
    pub fn take(&self) -> Vec<ReadEntry> {
        let mut buffer = self.shared.buffer.lock();
        let entries = dedup_latest(&buffer);
        buffer.clear();
        entries
    }

    /// `read()` filtered down to live data samples.
    pub fn read_data(&self) -> Vec<Arc<CombinedSample>> {
        filter_data(self.read())
    }

    /// `take()` filtered down to live data samples.
    pub fn take_data(&self) -> Vec<Arc<CombinedSample>> {
        filter_data(self.take())
    }

    /// Topic of the underlying raw reader.
    pub fn topic_name(&self) -> &str {
        self.reader.topic_name()
    }

    /// Underlying raw reader, for attribute access the adapter does not
    /// intercept (QoS, conditions, ...).
    pub fn raw_reader(&self) -> &Arc<dyn RawReader> {
        &self.reader
    }
}

/// Reader adapter over a content-filtered topic.
///
/// Delivery semantics are identical to [`UmaaReaderAdapter`]; the adapter
/// additionally remembers the filtered topic's name.
pub struct UmaaFilteredReaderAdapter {
    inner: UmaaReaderAdapter,
    filter_topic_name: String,
}

impl UmaaFilteredReaderAdapter {
    /// See [`UmaaReaderAdapter::new`].
    pub fn new(
        reader: Arc<dyn RawReader>,
        node: Arc<dyn AssemblyNode>,
        filter_topic_name: impl Into<String>,
    ) -> Self {
        Self {
            inner: UmaaReaderAdapter::new(reader, node),
            filter_topic_name: filter_topic_name.into(),
        }
    }

    /// Name of the content-filtered topic.
    pub fn filter_topic_name(&self) -> &str {
        &self.filter_topic_name
    }

    /// Unfiltered adapter surface.
    pub fn adapter(&self) -> &UmaaReaderAdapter {
        &self.inner
    }
}

impl std::ops::Deref for UmaaFilteredReaderAdapter {
    type Target = UmaaReaderAdapter;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

// Latest occurrence wins; its position (not the first occurrence's)
// determines output order.
fn dedup_latest(entries: &[BufferEntry]) -> Vec<ReadEntry> {
    let mut latest: HashMap<Guid, usize> = HashMap::new();
    let mut order: Vec<Guid> = Vec::new();
    for (idx, (key, _, _)) in entries.iter().enumerate() {
        if latest.insert(*key, idx).is_some() {
            order.retain(|k| k != key);
        }
        order.push(*key);
    }
    order
        .iter()
        .filter_map(|key| latest.get(key).map(|&idx| &entries[idx]))
        .map(|(key, sample, info)| ReadEntry {
            key: *key,
            sample: sample.clone(),
            info: *info,
        })
        .collect()
}

fn filter_data(entries: Vec<ReadEntry>) -> Vec<Arc<CombinedSample>> {
    entries
        .into_iter()
        .filter(|e| e.info.map_or(true, |i| i.valid))
        .filter_map(|e| e.sample)
        .collect()
}
