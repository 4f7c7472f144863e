//! Server-sent events adapter for streamed completions

use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Response;

use super::llm::TextStream;
use crate::error::{Error, Result};

/// Adapt a `text/event-stream` response into text deltas.
///
/// `parse` maps one event's data to an optional delta; `Ok(None)` marks
/// keep-alives and terminators. Empty deltas are dropped.
pub(crate) fn text_stream(
    response: Response,
    provider: &'static str,
    parse: fn(&str) -> Result<Option<String>>,
) -> TextStream {
    response
        .bytes_stream()
        .eventsource()
        .filter_map(move |event| {
            let delta = match event {
                Ok(event) => parse(&event.data).transpose(),
                Err(e) => Some(Err(Error::llm(format!("{} stream error: {}", provider, e)))),
            };
            futures::future::ready(delta.filter(|d| !matches!(d, Ok(text) if text.is_empty())))
        })
        .boxed()
}
