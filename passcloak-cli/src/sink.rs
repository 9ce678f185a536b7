use passcloak_core::{EventSink, RewriteEvent};
use tracing::{debug, error, warn};

/// Forwards rewrite events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: RewriteEvent) {
        match &event {
            RewriteEvent::ConfigLoadFailed { .. } => error!("{}", event),
            RewriteEvent::ConfigParseFailed { .. } | RewriteEvent::UnknownPass { .. } => {
                warn!("{}", event)
            }
            _ => debug!("{}", event),
        }
    }
}
