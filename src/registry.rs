//! Content-type → codec registry.
//!
//! # Responsibilities
//! - Map MIME type strings to shared [`Marshaler`] instances
//! - Offer one-call helpers that register each codec under its own type
//! - Build the whole set from a [`WireConfig`]
//!
//! # Design Decisions
//! - Lookup is exact string match; there is no pattern or parameter matching
//! - `*` is an ordinary key holding the catch-all codec
//! - Registering an existing type replaces it (last write wins)
//! - All codecs built by one registry share its [`BufferPool`]

use std::collections::HashMap;
use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{
    BinaryMarshaler, FormMarshaler, Marshaler, MultipartMarshaler, TextMarshaler, XmlMarshaler,
    MIME_JSON, MIME_WILDCARD,
};
use crate::config::WireConfig;
use crate::error::CodecResult;
use crate::json::{JsonMarshaler, JsonOptions};

#[derive(Debug, Clone)]
pub struct MarshalerRegistry {
    marshalers: HashMap<String, Arc<dyn Marshaler>>,
    pool: Arc<BufferPool>,
}

impl MarshalerRegistry {
    /// Empty registry whose codecs use the global buffer pool.
    pub fn new() -> Self {
        Self::with_pool(BufferPool::global().clone())
    }

    pub fn with_pool(pool: Arc<BufferPool>) -> Self {
        Self {
            marshalers: HashMap::new(),
            pool,
        }
    }

    /// Build a registry with every codec enabled in `config`.
    pub fn from_config(config: &WireConfig) -> CodecResult<Self> {
        let pool = Arc::new(BufferPool::new(config.buffer_pool.max_idle));
        let mut registry = Self::with_pool(pool).with_json(config.json.clone());

        if config.form.enabled {
            registry = registry.with_form_support();
        }
        if config.xml.enabled {
            registry = registry.with_xml_support_indented(&config.xml.indent);
        }
        if config.binary.enabled {
            registry = registry.with_binary_support();
        }
        if config.multipart.enabled {
            registry = registry.with_multipart_support_max_memory(config.multipart.max_memory_bytes);
        }
        if config.text.enabled {
            registry = registry
                .with_text_support_fields(&config.text.input_field, &config.text.output_field);
        }

        tracing::debug!(
            codecs = registry.len(),
            mime_types = ?registry.mime_types(),
            "Built marshaler registry"
        );
        Ok(registry)
    }

    /// Register `marshaler` for `mime_type`, returning the one it replaced.
    pub fn register(
        &mut self,
        mime_type: impl Into<String>,
        marshaler: Arc<dyn Marshaler>,
    ) -> Option<Arc<dyn Marshaler>> {
        let mime_type = mime_type.into();
        let previous = self.marshalers.insert(mime_type.clone(), marshaler);
        if previous.is_some() {
            tracing::debug!(mime_type = %mime_type, "Replaced registered marshaler");
        }
        previous
    }

    /// Register several entries in order; later duplicates win.
    pub fn register_all<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, Arc<dyn Marshaler>)>,
        S: Into<String>,
    {
        for (mime_type, marshaler) in entries {
            self.register(mime_type, marshaler);
        }
    }

    pub fn lookup(&self, mime_type: &str) -> Option<Arc<dyn Marshaler>> {
        self.marshalers.get(mime_type).cloned()
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.marshalers.contains_key(mime_type)
    }

    /// Registered MIME types, sorted.
    pub fn mime_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.marshalers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.marshalers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marshalers.is_empty()
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    fn with_codec(mut self, marshaler: impl Marshaler + 'static) -> Self {
        let mime_type = marshaler.content_type();
        self.register(mime_type, Arc::new(marshaler));
        self
    }

    /// JSON for `application/json` and the `*` catch-all.
    pub fn with_json(mut self, options: JsonOptions) -> Self {
        let json: Arc<dyn Marshaler> = Arc::new(JsonMarshaler::with_pool(options, self.pool.clone()));
        self.register(MIME_JSON, json.clone());
        self.register(MIME_WILDCARD, json);
        self
    }

    pub fn with_form_support(self) -> Self {
        let codec = FormMarshaler::with_pool(self.pool.clone());
        self.with_codec(codec)
    }

    pub fn with_xml_support(self) -> Self {
        self.with_codec(XmlMarshaler::new())
    }

    /// `indent` is written once per nesting level; empty means compact.
    pub fn with_xml_support_indented(self, indent: &str) -> Self {
        self.with_codec(XmlMarshaler::indented(indent))
    }

    pub fn with_binary_support(self) -> Self {
        let codec = BinaryMarshaler::with_pool(self.pool.clone());
        self.with_codec(codec)
    }

    pub fn with_multipart_support(self) -> Self {
        self.with_multipart_support_max_memory(0)
    }

    /// Zero keeps the 32 MiB default.
    pub fn with_multipart_support_max_memory(self, max_memory: u64) -> Self {
        let codec = MultipartMarshaler::with_max_memory(max_memory).with_pool(self.pool.clone());
        self.with_codec(codec)
    }

    pub fn with_text_support(self) -> Self {
        let codec = TextMarshaler::new().with_pool(self.pool.clone());
        self.with_codec(codec)
    }

    pub fn with_text_support_fields(self, input_field: &str, output_field: &str) -> Self {
        let codec = TextMarshaler::with_fields(input_field, output_field).with_pool(self.pool.clone());
        self.with_codec(codec)
    }
}

impl Default for MarshalerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
