use std::pin::Pin;

use futures::stream::{Stream, StreamExt};

use crate::error::GatewayError;

/// Incremental splitter for a `text/event-stream` body.
///
/// Bytes are buffered raw and only decoded once a whole event is present, so
/// a UTF-8 sequence or a CRLF pair cut by a chunk boundary is never seen half.
#[derive(Debug, Default)]
pub(crate) struct EventBuffer {
    pending: Vec<u8>,
}

impl EventBuffer {
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Removes and returns the next complete event, without its blank-line
    /// terminator and with carriage returns dropped.
    pub(crate) fn next_event(&mut self) -> Option<String> {
        let (end, terminator) = event_boundary(&self.pending)?;
        let raw: Vec<u8> = self.pending.drain(..end + terminator).take(end).collect();
        Some(String::from_utf8_lossy(&raw).replace('\r', ""))
    }
}

/// Position and length of the earliest `\n\n` or `\r\n\r\n`.
fn event_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|pos| (pos, 2));
    let crlf = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| (pos, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if lf.0 <= crlf.0 { lf } else { crlf }),
        (lf, crlf) => lf.or(crlf),
    }
}

/// Turns a streaming HTTP response into a stream of parsed events.
///
/// `parser` sees one event at a time; `Ok(None)` drops the event (comments,
/// `[DONE]`). Transport errors are yielded in place and do not end the stream.
pub(crate) fn create_sse_stream<T, F>(
    response: reqwest::Response,
    parser: F,
) -> Pin<Box<dyn Stream<Item = Result<T, GatewayError>> + Send>>
where
    T: Send + 'static,
    F: Fn(&str) -> Result<Option<T>, GatewayError> + Send + 'static,
{
    let events = response
        .bytes_stream()
        .scan(EventBuffer::default(), move |buffer, chunk| {
            let items: Vec<Result<T, GatewayError>> = match chunk {
                Err(err) => vec![Err(GatewayError::from(err))],
                Ok(bytes) => {
                    buffer.push(&bytes);
                    std::iter::from_fn(|| buffer.next_event())
                        .filter_map(|event| parser(&event).transpose())
                        .collect()
                }
            };
            futures::future::ready(Some(items))
        })
        .flat_map(futures::stream::iter);

    Box::pin(events)
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
