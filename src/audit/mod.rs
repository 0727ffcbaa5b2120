use std::sync::Mutex;

use serde::Serialize;

/// Severity of an emitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A structured observability event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub level: EventLevel,
    pub tags: Vec<String>,
    pub message: String,
}

impl Event {
    pub fn new(level: EventLevel, tags: &[&str], message: impl Into<String>) -> Self {
        Self {
            level,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            message: message.into(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Observability sink handed to every component that must emit audit events.
///
/// There is no implicit global sink: callers pass one in explicitly.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);

    fn log(&self, level: EventLevel, tags: &[&str], message: &str) {
        self.emit(Event::new(level, tags, message));
    }
}

/// Forwards events to `tracing`, tags joined into a single field
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        let tags = event.tags.join(",");
        match event.level {
            EventLevel::Debug => tracing::debug!(tags = %tags, "{}", event.message),
            EventLevel::Info => tracing::info!(tags = %tags, "{}", event.message),
            EventLevel::Warn => tracing::warn!(tags = %tags, "{}", event.message),
            EventLevel::Error => tracing::error!(tags = %tags, "{}", event.message),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
