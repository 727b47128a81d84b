// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-delimited event stream parser for the analysis endpoint.
//!
//! The backend writes one `data: {json}` line per event, separated by blank
//! lines. Chunk boundaries from the transport are arbitrary: a line, or a
//! multi-byte character inside it, may be split across chunks. [`LineDecoder`]
//! reassembles complete lines and [`parse_event_stream`] turns them into typed
//! [`StreamEvent`]s, skipping anything it cannot interpret.

use std::collections::VecDeque;
use std::pin::Pin;

use epigraph_core::{decode_line, ByteStream, EpigraphError, EventDecodeError, StreamEvent};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

/// Stream of decoded events. Transport failures surface as `Err` and end the stream.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, EpigraphError>> + Send>>;

/// Longest line kept while waiting for its terminator.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Reassembles newline-terminated lines from arbitrary byte chunks.
///
/// A line that outgrows the limit is dropped up to its next newline.
#[derive(Debug)]
pub struct LineDecoder {
    buf: Vec<u8>,
    /// Prefix of `buf` already known to contain no newline.
    scanned: usize,
    max_line: usize,
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_BYTES)
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_line: usize) -> Self {
        Self {
            buf: Vec::new(),
            scanned: 0,
            max_line,
            discarding: false,
        }
    }

    /// Appends `chunk` and returns every line it completed, without terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.buf[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            if self.discarding {
                self.discarding = false;
            } else {
                lines.push(to_line(&self.buf[start..end]));
            }
            start = end + 1;
            from = start;
        }
        self.buf.drain(..start);
        self.scanned = self.buf.len();

        if self.buf.len() > self.max_line {
            if !self.discarding {
                warn!(
                    limit = self.max_line,
                    "dropping stream line that exceeds the length limit"
                );
                self.discarding = true;
            }
            self.buf.clear();
            self.scanned = 0;
        }
        lines
    }

    /// Returns the unterminated tail, if any. Called once the transport is exhausted.
    pub fn finish(&mut self) -> Option<String> {
        let discarded = std::mem::take(&mut self.discarding);
        self.scanned = 0;
        if self.buf.is_empty() || discarded {
            self.buf.clear();
            return None;
        }
        let tail = to_line(&self.buf);
        self.buf.clear();
        Some(tail)
    }
}

fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

struct DecodeState {
    bytes: ByteStream,
    decoder: LineDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

/// Parses a raw byte stream into a stream of typed [`StreamEvent`]s.
///
/// Lines are decoded lazily: once the caller stops polling, lines already
/// buffered behind the last yielded event are never interpreted. Unknown
/// event types are skipped at debug level, malformed payloads at warn level.
pub fn parse_event_stream(bytes: ByteStream) -> EventStream {
    let state = DecodeState {
        bytes,
        decoder: LineDecoder::new(),
        pending: VecDeque::new(),
        exhausted: false,
    };

    let events = stream::unfold(state, |mut state| async move {
        loop {
            while let Some(line) = state.pending.pop_front() {
                match decode_line(&line) {
                    None => {}
                    Some(Ok(event)) => return Some((Ok(event), state)),
                    Some(Err(EventDecodeError::UnknownType(kind))) => {
                        debug!(kind = %kind, "skipping unknown stream event");
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "skipping malformed stream event");
                    }
                }
            }

            if state.exhausted {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let lines = state.decoder.push(&chunk);
                    state.pending.extend(lines);
                }
                Some(Err(e)) => {
                    state.exhausted = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.exhausted = true;
                    let tail = state.decoder.finish();
                    state.pending.extend(tail);
                }
            }
        }
    });

    Box::pin(events)
}
