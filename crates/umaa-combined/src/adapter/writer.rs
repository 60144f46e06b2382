// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Writer adapter: one combined handle in, a tree of fragment topics out.
//!
//! The adapter owns a top-level writer tree (usually generated per schema)
//! and presents it as a single publication endpoint. `new_combined` hands
//! out an edit handle pre-wired with the schema's collections and an
//! optional specialization; `write` delegates fragment splitting to the
//! tree. Listener events from every writer in the tree funnel through one
//! user listener slot.

use crate::builder::CombinedBuilder;
use crate::classify::{collection_for_metadata_field, FieldClass, FieldClassifier, SuffixClassifier};
use crate::edit::{CombinedEditHandle, EditScope};
use crate::editor::{ListEditor, SetEditor};
use crate::error::{Error, Result};
use crate::listener::{
    forward_writer_event, CombinedWriterListener, PublicationMatchedStatus, StatusMask,
    WriterEvent,
};
use crate::path::Path;
use crate::transport::{RawWriter, TopLevelWriter, WriterDecorator};
use crate::value::Value;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

struct WriterShared {
    user: Mutex<Option<(Arc<dyn CombinedWriterListener>, StatusMask)>>,
}

impl WriterShared {
    fn forward(&self, event: &WriterEvent) {
        let user = self.user.lock().clone();
        if let Some((listener, mask)) = user {
            forward_writer_event(&listener, mask, event);
        }
    }
}

// Installed on every writer in the tree at adapter construction. Events from
// any fragment topic reach the same user listener slot.
struct InternalWriterListener {
    shared: Arc<WriterShared>,
}

impl CombinedWriterListener for InternalWriterListener {
    fn on_publication_matched(&self, status: PublicationMatchedStatus) {
        self.shared.forward(&WriterEvent::PublicationMatched(status));
    }

    fn on_offered_deadline_missed(&self, instance_handle: Option<u64>) {
        self.shared
            .forward(&WriterEvent::OfferedDeadlineMissed(instance_handle));
    }

    fn on_offered_incompatible_qos(&self, policy_id: u32, policy_name: &str) {
        self.shared.forward(&WriterEvent::OfferedIncompatibleQos {
            policy_id,
            policy_name: policy_name.to_string(),
        });
    }

    fn on_liveliness_lost(&self) {
        self.shared.forward(&WriterEvent::LivelinessLost);
    }
}

/// Adapter around a top-level writer tree.
pub struct UmaaWriterAdapter {
    root: Arc<dyn TopLevelWriter>,
    shared: Arc<WriterShared>,
    classifier: Arc<dyn FieldClassifier>,
}

impl UmaaWriterAdapter {
    /// Wrap `root` with the default suffix classifier.
    pub fn new(root: Arc<dyn TopLevelWriter>) -> Self {
        Self::with_classifier(root, Arc::new(SuffixClassifier))
    }

    /// Wrap `root`, classifying schema shapes with `classifier`.
    ///
    /// Every writer in the decorator tree gets the internal listener
    /// installed once; install failures degrade to a publication-matched
    /// mask rather than failing construction.
    pub fn with_classifier(
        root: Arc<dyn TopLevelWriter>,
        classifier: Arc<dyn FieldClassifier>,
    ) -> Self {
        let shared = Arc::new(WriterShared {
            user: Mutex::new(None),
        });
        let mut seen = HashSet::new();
        instrument(&shared, root.writer(), root.decorators(), &mut seen);
        Self {
            root,
            shared,
            classifier,
        }
    }

    /// Attach (or detach with `None`) the user listener for the whole tree.
    pub fn set_listener(
        &self,
        listener: Option<Arc<dyn CombinedWriterListener>>,
        mask: StatusMask,
    ) {
        *self.shared.user.lock() = listener.map(|l| (l, mask));
    }

    /// Fresh edit handle over the tree's base-object shape, with no
    /// collection pre-creation or specialization.
    pub fn new_builder(&self) -> CombinedEditHandle {
        CombinedEditHandle::new(self.root.new_builder())
    }

    /// Fresh edit handle, optionally specialized and with collection bags
    /// pre-created from the schema classification.
    ///
    /// With `spec` but no `spec_at`, the base shape must classify to exactly
    /// one generalization field; that field becomes the overlay target. Zero
    /// or several candidates fail with `AmbiguousSpecialization`.
    pub fn new_combined(
        &self,
        spec_at: Option<Path>,
        spec: Option<Value>,
        auto_init_collections: bool,
    ) -> Result<CombinedEditHandle> {
        let mut builder = self.root.new_builder();

        if auto_init_collections {
            let classes = self.classifier.classify(builder.base());
            init_collections(&mut builder, &Path::root(), &classes)?;
        }

        if let Some(spec) = spec {
            let target = match spec_at {
                Some(path) => path,
                None => {
                    let mut candidates: Vec<Path> = self
                        .classifier
                        .classify(builder.base())
                        .into_iter()
                        .filter(|(_, class)| *class == FieldClass::Generalization)
                        .map(|(path, _)| path)
                        .collect();
                    if candidates.len() != 1 {
                        return Err(Error::AmbiguousSpecialization(format!(
                            "{} generalization fields on '{}'",
                            candidates.len(),
                            self.topic_name()
                        )));
                    }
                    candidates.remove(0)
                }
            };
            if auto_init_collections {
                let classes = self.classifier.classify(&spec);
                init_collections(&mut builder, &target, &classes)?;
            }
            log::debug!("[WRITER-ADAPTER] specialization registered at {}", target);
            builder.add_overlay_at(target, spec);
        }

        Ok(CombinedEditHandle::new(builder))
    }

    /// Split and publish every fragment of `handle`.
    pub fn write(&self, handle: &CombinedEditHandle) -> Result<()> {
        self.root.write(handle.builder())
    }

    /// Publish a bare builder, for callers managing builders directly.
    pub fn write_builder(&self, builder: &CombinedBuilder) -> Result<()> {
        self.root.write(builder)
    }

    /// Set editor anchored at `scope`'s path extended by `rel`.
    pub fn editor_for_set<'a>(
        &self,
        scope: &'a mut dyn EditScope,
        rel: &Path,
        name: impl Into<String>,
    ) -> SetEditor<'a> {
        let path = scope.scope_path().join(rel);
        SetEditor::new(scope.scope_builder_mut(), path, name)
    }

    /// List editor anchored at `scope`'s path extended by `rel`.
    pub fn editor_for_list<'a>(
        &self,
        scope: &'a mut dyn EditScope,
        rel: &Path,
        name: impl Into<String>,
    ) -> ListEditor<'a> {
        let path = scope.scope_path().join(rel);
        ListEditor::new(scope.scope_builder_mut(), path, name)
    }

    /// Topic of the root fragment writer.
    pub fn topic_name(&self) -> String {
        self.root.writer().topic_name().to_string()
    }

    /// Underlying top-level writer tree.
    pub fn root(&self) -> &Arc<dyn TopLevelWriter> {
        &self.root
    }
}

fn instrument(
    shared: &Arc<WriterShared>,
    writer: Arc<dyn RawWriter>,
    decorators: Vec<Arc<dyn WriterDecorator>>,
    seen: &mut HashSet<*const ()>,
) {
    // Dedup by writer identity, not topic: distinct writers may share a
    // topic string, and a shared writer may appear under several decorators.
    if seen.insert(Arc::as_ptr(&writer) as *const ()) {
        let listener: Arc<dyn CombinedWriterListener> = Arc::new(InternalWriterListener {
            shared: shared.clone(),
        });
        if let Err(e) = writer.set_listener(listener.clone(), StatusMask::ALL) {
            log::warn!(
                "[WRITER-ADAPTER] full-mask listener rejected on topic='{}' ({}); retrying with PUBLICATION_MATCHED",
                writer.topic_name(),
                e
            );
            if let Err(e) = writer.set_listener(listener, StatusMask::PUBLICATION_MATCHED) {
                log::warn!(
                    "[WRITER-ADAPTER] minimal listener install failed on topic='{}': {}",
                    writer.topic_name(),
                    e
                );
            }
        }
    }
    for decorator in decorators {
        for child in decorator.children() {
            instrument(shared, child.writer(), child.decorators(), seen);
        }
    }
}

// Each classified metadata field pre-creates the collection it names, in the
// bag of the node owning the field. Paths are absolute after joining `root`.
fn init_collections(
    builder: &mut CombinedBuilder,
    root: &Path,
    classes: &[(Path, FieldClass)],
) -> Result<()> {
    for (rel, class) in classes {
        if !matches!(class, FieldClass::LargeList | FieldClass::LargeSet) {
            continue;
        }
        let Some((node, seg)) = rel.split_last() else {
            continue;
        };
        let Some(field) = seg.as_attr() else {
            continue;
        };
        let Some((name, kind)) = collection_for_metadata_field(field) else {
            continue;
        };
        let at = root.join(&node);
        builder.ensure_collection_at(&at, name, kind)?;
        log::trace!("[WRITER-ADAPTER] pre-created {:?} '{}' at {}", kind, name, at);
    }
    Ok(())
}
