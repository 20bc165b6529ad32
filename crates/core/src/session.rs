//! The extraction session: one document, its caches, and the inbound
//! command surface.
//!
//! A session owns the document behind a mutex and exposes the operations a
//! host layer drives: `texts` (the full aggregating extraction), the
//! child-frame surface (`frame_texts`, `handle_frame_request`), cache
//! control, and visibility tracking. Lock sections are synchronous; the only
//! suspension points are the frame channel and the math collaborator, both
//! awaited with no guard held.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{info, warn};

use lector_protocol::{
    FrameInfo, FrameRequest, FrameResponse, METHOD_GET_FRAME_INFO, METHOD_GET_FRAME_TEXTS,
};

use crate::cache::SessionCache;
use crate::config::ExtractOptions;
use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::error::Error;
use crate::extract::extract_passages;
use crate::frames::aggregator::{
    FrameAccess, channel_frame_texts, direct_frame_texts, discover_frames,
};
use crate::frames::channel::FrameChannel;
use crate::frames::merge::merge_document_order;
use crate::math::{MathScope, MathSpeech, MathSubstitutions, collect_math_markup};

/// Page visibility as reported by the host layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

pub struct ExtractionSession {
    doc: Mutex<Document>,
    info: FrameInfo,
    opts: ExtractOptions,
    cache: SessionCache,
    channel: Option<Arc<dyn FrameChannel>>,
    math: Option<Arc<dyn MathSpeech>>,
    math_subs: Mutex<Option<MathSubstitutions>>,
    visibility: Mutex<Visibility>,
}

impl ExtractionSession {
    pub fn new(doc: Document, info: FrameInfo) -> Self {
        Self {
            doc: Mutex::new(doc),
            info,
            opts: ExtractOptions::default(),
            cache: SessionCache::new(),
            channel: None,
            math: None,
            math_subs: Mutex::new(None),
            visibility: Mutex::new(Visibility::Visible),
        }
    }

    pub fn with_options(mut self, opts: ExtractOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn with_channel(mut self, channel: Arc<dyn FrameChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_math(mut self, math: Arc<dyn MathSpeech>) -> Self {
        self.math = Some(math);
        self
    }

    /// The index of the logical page to read. The tree is a single page.
    pub fn current_index(&self) -> usize {
        0
    }

    pub fn frame_info(&self) -> FrameInfo {
        self.info.clone()
    }

    /// Drop the cached aggregation result.
    pub fn clear_cache(&self) -> bool {
        self.cache.invalidate();
        true
    }

    /// Record a visibility change. Returning to visible invalidates the
    /// cache: the page may have changed while hidden.
    pub fn set_visibility(&self, visibility: Visibility) {
        let mut current = self.visibility.lock();
        if *current == Visibility::Hidden && visibility == Visibility::Visible {
            self.cache.invalidate();
        }
        *current = visibility;
    }

    /// The full extraction: local block pipeline, then sub-document
    /// aggregation and document-order merge. `None` for an unknown index.
    pub async fn texts(&self, index: usize, quietly: bool) -> Option<Vec<String>> {
        if index != self.current_index() {
            return None;
        }
        self.resolve_math().await;

        let (base, threshold, pending) = {
            let mut doc = self.doc.lock();
            let base;
            let threshold;
            {
                let subs = self.math_subs.lock();
                let empty = MathSubstitutions::default();
                let mut scope =
                    MathScope::new(&mut doc, subs.as_ref().unwrap_or(&empty));
                let body = scope.doc_mut().body();
                let extraction = extract_passages(scope.doc_mut(), body, &self.opts, quietly);
                base = extraction.passages;
                threshold = extraction.threshold;
            }

            let descriptors = discover_frames(&doc, doc.body());
            let mut pending = Vec::new();
            for descriptor in descriptors {
                let texts = match descriptor.access {
                    FrameAccess::Direct => {
                        let content_root = doc
                            .frame_state(descriptor.node)
                            .map(|s| s.content_root)
                            .unwrap_or(NodeId::NONE);
                        Some(direct_frame_texts(&doc, content_root))
                    }
                    FrameAccess::Channel => None,
                    FrameAccess::Inaccessible => Some(Vec::new()),
                };
                pending.push((descriptor, texts));
            }
            (base, threshold, pending)
        };

        if !self.info.is_main_frame || pending.is_empty() {
            return Some(base);
        }
        if base.is_empty() {
            return Some(base);
        }
        if let Some(cached) = self.cache.get() {
            return Some(cached);
        }
        let Some(guard) = self.cache.try_begin() else {
            if !quietly {
                info!(
                    target: "lector.session",
                    "aggregation already in flight, returning parent-only passages"
                );
            }
            return Some(base);
        };

        let mut frame_texts: HashMap<NodeId, Vec<String>> = HashMap::new();
        for (descriptor, collected) in pending {
            let texts = match collected {
                Some(texts) => texts,
                None => {
                    let frame_id = descriptor.frame_id.as_deref().unwrap_or_default();
                    let result = match self.channel.as_ref() {
                        Some(channel) => {
                            channel_frame_texts(channel.as_ref(), frame_id, index, quietly).await
                        }
                        None => Err(Error::Inaccessible("no frame channel configured".to_string())),
                    };
                    match result {
                        Ok(texts) => texts,
                        Err(error) => {
                            warn!(
                                target: "lector.frames",
                                frame_id,
                                %error,
                                "sub-document extraction failed, skipping"
                            );
                            continue;
                        }
                    }
                }
            };
            if !texts.is_empty() {
                frame_texts.insert(descriptor.node, texts);
            }
        }

        let merged = {
            let mut doc = self.doc.lock();
            merge_document_order(&mut doc, base, &frame_texts, threshold)
        };
        guard.complete(merged.clone());
        Some(merged)
    }

    /// The child-frame surface: local block pipeline only, no aggregation.
    pub async fn frame_texts(&self, index: usize, quietly: bool) -> Vec<String> {
        if index != self.current_index() {
            return Vec::new();
        }
        self.resolve_math().await;

        let mut doc = self.doc.lock();
        let subs = self.math_subs.lock();
        let empty = MathSubstitutions::default();
        let mut scope = MathScope::new(&mut doc, subs.as_ref().unwrap_or(&empty));
        let body = scope.doc_mut().body();
        extract_passages(scope.doc_mut(), body, &self.opts, quietly).passages
    }

    /// The responder side of the frame channel.
    pub async fn handle_frame_request(&self, request: FrameRequest) -> FrameResponse {
        match request.method.as_str() {
            METHOD_GET_FRAME_TEXTS => {
                let texts = self.frame_texts(request.index, request.quietly).await;
                FrameResponse::success(request.request_id, json!(texts))
            }
            METHOD_GET_FRAME_INFO => {
                let info = serde_json::to_value(self.frame_info()).unwrap_or(Value::Null);
                FrameResponse::success(request.request_id, info)
            }
            method => FrameResponse::failure(
                request.request_id,
                Error::UnknownMethod(method.to_string()).to_string(),
            ),
        }
    }

    /// Resolve math substitutions once per session.
    async fn resolve_math(&self) {
        let Some(math) = self.math.as_ref() else { return };
        if self.math_subs.lock().is_some() {
            return;
        }
        let points = {
            let doc = self.doc.lock();
            collect_math_markup(&doc, doc.body())
        };
        let subs = MathSubstitutions::resolve(points, math.as_ref()).await;
        *self.math_subs.lock() = Some(subs);
    }
}
