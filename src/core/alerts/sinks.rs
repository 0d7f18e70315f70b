// Delivery sinks. Each is an opaque collaborator; a sink that is not
// installed is simply absent from the bundle and gets skipped.

use crate::core::error::SinkError;

/// Someone currently connected who may receive overlay notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: String,
    pub name: String,
}

pub trait ChatBroadcast {
    fn broadcast(&self, text: &str, icon_id: u64) -> Result<(), SinkError>;
}

pub trait PopupSink {
    fn show_popup(&self, text: &str) -> Result<(), SinkError>;
}

pub trait OverlaySink {
    fn notify(&self, recipient: &Recipient, style: i32, text: &str) -> Result<(), SinkError>;
}

pub trait WebhookSink {
    fn send_text(&self, url: &str, text: &str) -> Result<(), SinkError>;
    fn send_panel(&self, url: &str, title: &str, color: u32, body_json: &str) -> Result<(), SinkError>;
}

/// Connected recipients and their permissions.
pub trait RecipientDirectory {
    fn connected(&self) -> Vec<Recipient>;
    fn has_capability(&self, recipient_id: &str, capability: &str) -> bool;
}

/// Durable record of notifications.
pub trait LogSink {
    fn write_console(&self, text: &str) -> Result<(), SinkError>;
    fn append_file(&self, line: &str) -> Result<(), SinkError>;
}

/// Every sink the dispatcher may fan out to.
#[derive(Default)]
pub struct Sinks {
    pub chat: Option<Box<dyn ChatBroadcast>>,
    pub popup: Option<Box<dyn PopupSink>>,
    pub overlay: Option<Box<dyn OverlaySink>>,
    pub recipients: Option<Box<dyn RecipientDirectory>>,
    pub webhook: Option<Box<dyn WebhookSink>>,
    pub log: Option<Box<dyn LogSink>>,
}

impl Sinks {
    pub fn with_chat(mut self, sink: impl ChatBroadcast + 'static) -> Self {
        self.chat = Some(Box::new(sink));
        self
    }

    pub fn with_popup(mut self, sink: impl PopupSink + 'static) -> Self {
        self.popup = Some(Box::new(sink));
        self
    }

    pub fn with_overlay(
        mut self,
        sink: impl OverlaySink + 'static,
        recipients: impl RecipientDirectory + 'static,
    ) -> Self {
        self.overlay = Some(Box::new(sink));
        self.recipients = Some(Box::new(recipients));
        self
    }

    pub fn with_webhook(mut self, sink: impl WebhookSink + 'static) -> Self {
        self.webhook = Some(Box::new(sink));
        self
    }

    pub fn with_log(mut self, sink: impl LogSink + 'static) -> Self {
        self.log = Some(Box::new(sink));
        self
    }
}
