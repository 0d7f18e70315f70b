// Notification fan-out. One composed message goes to every enabled sink,
// independently: a failing sink never stops the others, and nothing is
// retried.

use chrono::Local;
use serde::Serialize;

use super::composer::{sanitize, NotificationComposer};
use super::sinks::Sinks;
use crate::core::config::Settings;
use crate::core::error::SinkError;
use crate::core::lang::{keys, Localization};

const WEBHOOK_PATH: &str = "/api/webhooks/";

/// Single field of a webhook panel body.
#[derive(Debug, Serialize)]
struct PanelField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

/// What happened during one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Sink calls made, successful or not (log writes excluded)
    pub attempted: u32,
    pub failed: u32,
    pub logged: bool,
}

pub struct NotificationDispatcher {
    settings: Settings,
    sinks: Sinks,
}

impl NotificationDispatcher {
    pub fn new(settings: Settings, sinks: Sinks) -> Self {
        Self { settings, sinks }
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Fan `text` out. `alert` selects user-facing delivery; the durable log
    /// is written for alerts, or for everything when `all_events` is set.
    pub fn dispatch<L: Localization>(
        &self,
        composer: &NotificationComposer<L>,
        text: &str,
        alert: bool,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        if text.is_empty() {
            return report;
        }

        let msg = sanitize(text);

        if alert {
            let notifications = &self.settings.notifications;

            if notifications.chat {
                if let Some(chat) = &self.sinks.chat {
                    record(&mut report, "chat", chat.broadcast(text, notifications.chat_icon_id));
                }
            }

            if notifications.popup {
                if let Some(popup) = &self.sinks.popup {
                    record(&mut report, "popup", popup.show_popup(&msg));
                }
            }

            if self.settings.ui_notify.enabled {
                self.send_overlay(&msg, &mut report);
            }

            if self.settings.webhook.enabled && is_webhook_url(&self.settings.webhook.url) {
                self.send_webhook(composer, &msg, &mut report);
            }
        }

        if alert || self.settings.logging.all_events {
            report.logged = self.log_message(&msg);
        }

        report
    }

    fn send_overlay(&self, msg: &str, report: &mut DispatchReport) {
        let (Some(overlay), Some(directory)) = (&self.sinks.overlay, &self.sinks.recipients) else {
            return;
        };
        let ui = &self.settings.ui_notify;
        for recipient in directory.connected() {
            if directory.has_capability(&recipient.id, &ui.capability) {
                let sink = format!("overlay for {}", recipient.name);
                record(report, &sink, overlay.notify(&recipient, ui.style, msg));
            }
        }
    }

    fn send_webhook<L: Localization>(
        &self,
        composer: &NotificationComposer<L>,
        msg: &str,
        report: &mut DispatchReport,
    ) {
        let Some(webhook) = &self.sinks.webhook else {
            return;
        };
        let text = composer.compose(keys::DISCORD_MESSAGE, &[msg.to_string()]);
        if text.trim().is_empty() {
            return;
        }

        let cfg = &self.settings.webhook;
        if cfg.embedded {
            let fields = [PanelField {
                name: &cfg.embed_title,
                value: &text,
                inline: false,
            }];
            match serde_json::to_string(&fields) {
                Ok(body) => record(
                    report,
                    "webhook",
                    webhook.send_panel(&cfg.url, "", cfg.embed_color, &body),
                ),
                Err(e) => log::warn!("Failed to encode webhook panel: {}", e),
            }
        } else {
            record(report, "webhook", webhook.send_text(&cfg.url, &text));
        }
    }

    /// Returns true if at least one log write was made.
    fn log_message(&self, msg: &str) -> bool {
        let Some(log_sink) = &self.sinks.log else {
            return false;
        };
        let logging = &self.settings.logging;
        let mut wrote = false;

        if logging.console {
            wrote = true;
            if let Err(e) = log_sink.write_console(msg) {
                log::warn!("Console log failed: {}", e);
            }
        }

        if logging.file {
            wrote = true;
            let line = format!("[{}] {}", Local::now().format("%H:%M:%S"), msg);
            if let Err(e) = log_sink.append_file(&line) {
                log::warn!("File log failed: {}", e);
            }
        }

        wrote
    }
}

fn record(report: &mut DispatchReport, sink: &str, result: Result<(), SinkError>) {
    report.attempted += 1;
    if let Err(e) = result {
        report.failed += 1;
        log::warn!("{} delivery failed: {}", sink, e);
    }
}

/// Guards against pointing the webhook sink at an arbitrary endpoint.
pub fn is_webhook_url(url: &str) -> bool {
    url.starts_with("https://") && url.contains(WEBHOOK_PATH)
}
