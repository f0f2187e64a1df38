use crate::Result;
use chromiumoxide::cdp::js_protocol::runtime::{ConsoleApiCalledType, EventConsoleApiCalled};
use chromiumoxide::page::Page;
use futures::StreamExt;
use shrike_core::{ConsoleLevel, ConsoleMessage};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Ordered, append-only accumulator of console messages, fed by the CDP
/// `Runtime.consoleAPICalled` event stream.
///
/// Must be attached to the page before navigation so messages emitted by
/// early page scripts are not lost. Messages are recorded in arrival order
/// and never reordered or deduplicated.
pub struct ConsoleObserver {
    messages: Arc<Mutex<Vec<ConsoleMessage>>>,
    listener_task: JoinHandle<()>,
}

impl ConsoleObserver {
    /// Subscribe to console events on the page and start accumulating.
    pub async fn attach(page: &Page) -> Result<Self> {
        let mut events = page.event_listener::<EventConsoleApiCalled>().await?;

        let messages: Arc<Mutex<Vec<ConsoleMessage>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();

        let listener_task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let message = parse_console_event(&event);
                tracing::debug!("Console [{}]: {}", message.level.as_str(), message.text);
                if let Ok(mut sink) = sink.lock() {
                    sink.push(message);
                }
            }
        });

        Ok(Self {
            messages,
            listener_task,
        })
    }

    /// Snapshot of everything captured so far, in arrival order.
    pub fn snapshot(&self) -> Vec<ConsoleMessage> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|m| m.level.is_error())
            .count()
    }

    /// Stop listening and hand over the full captured sequence.
    pub fn finish(self) -> Vec<ConsoleMessage> {
        self.listener_task.abort();
        Arc::try_unwrap(self.messages)
            .map(|m| {
                m.into_inner()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
            })
            .unwrap_or_else(|arc| {
                arc.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone()
            })
    }
}

/// Converts a raw CDP console event into a report message. Arguments are
/// joined with spaces; non-primitive arguments render as "<object>".
fn parse_console_event(event: &EventConsoleApiCalled) -> ConsoleMessage {
    let level = match event.r#type {
        ConsoleApiCalledType::Log => ConsoleLevel::Log,
        ConsoleApiCalledType::Info => ConsoleLevel::Info,
        ConsoleApiCalledType::Warning => ConsoleLevel::Warning,
        ConsoleApiCalledType::Error => ConsoleLevel::Error,
        ConsoleApiCalledType::Debug => ConsoleLevel::Debug,
        _ => ConsoleLevel::Other,
    };

    let text = event
        .args
        .iter()
        .map(|arg| {
            arg.value
                .as_ref()
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .unwrap_or_else(|| "<object>".to_string())
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut message = ConsoleMessage::new(level, text);

    if let Some(stack_trace) = &event.stack_trace {
        if let Some(frame) = stack_trace.call_frames.first() {
            message = message.with_source(format!(
                "{}:{}:{}",
                frame.url, frame.line_number, frame.column_number
            ));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    // Accumulator behavior is testable without a browser by driving the
    // shared vector directly; the event-stream plumbing is covered by the
    // live Chrome tests in tests/live_chrome.rs.

    fn push(messages: &Arc<Mutex<Vec<ConsoleMessage>>>, level: ConsoleLevel, text: &str) {
        messages.lock().unwrap().push(ConsoleMessage::new(level, text));
    }

    #[tokio::test]
    async fn test_snapshot_preserves_arrival_order() {
        let messages: Arc<Mutex<Vec<ConsoleMessage>>> = Arc::new(Mutex::new(Vec::new()));
        let observer = ConsoleObserver {
            messages: messages.clone(),
            listener_task: tokio::spawn(async {}),
        };

        push(&messages, ConsoleLevel::Log, "A");
        push(&messages, ConsoleLevel::Error, "B");
        push(&messages, ConsoleLevel::Warning, "C");

        let texts: Vec<String> = observer.snapshot().iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_error_count_uses_severity() {
        let messages: Arc<Mutex<Vec<ConsoleMessage>>> = Arc::new(Mutex::new(Vec::new()));
        let observer = ConsoleObserver {
            messages: messages.clone(),
            listener_task: tokio::spawn(async {}),
        };

        push(&messages, ConsoleLevel::Log, "an error walks into a bar");
        push(&messages, ConsoleLevel::Error, "actual failure");
        push(&messages, ConsoleLevel::Error, "another failure");

        assert_eq!(observer.error_count(), 2);
    }

    #[tokio::test]
    async fn test_finish_returns_full_sequence() {
        let messages: Arc<Mutex<Vec<ConsoleMessage>>> = Arc::new(Mutex::new(Vec::new()));
        let observer = ConsoleObserver {
            messages: messages.clone(),
            listener_task: tokio::spawn(async {}),
        };

        push(&messages, ConsoleLevel::Info, "one");
        push(&messages, ConsoleLevel::Debug, "two");
        drop(messages);

        let captured = observer.finish();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[1].text, "two");
    }
}
