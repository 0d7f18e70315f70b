// Notification pipeline: from an inbound event to every delivery channel.
//
// Architecture:
// - model.rs: Alert kinds and the transient notification event
// - composer.rs: Template resolution and rich-text stripping
// - sinks.rs: Delivery channel capabilities
// - dispatcher.rs: Fans one message out to all enabled sinks and the log

pub mod composer;
pub mod dispatcher;
pub mod model;
pub mod sinks;

#[cfg(test)]
pub(crate) mod testing;
