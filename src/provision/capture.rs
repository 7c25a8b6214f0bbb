//! # Output Capture
//!
//! Bounded capture of subprocess output streams. Streams are always drained to EOF so a
//! chatty process never blocks on a full pipe, but only the first `limit` characters are
//! kept. The remainder is counted and reported in a suffix.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::warn;

fn truncation_suffix(omitted_chars: usize) -> String {
    format!("\n... truncated ({omitted_chars} chars)")
}

/// Cut `text` to `max_chars` characters, noting how many were dropped
///
/// Text at or below the limit is returned unchanged.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let omitted = text[cut..].chars().count();
            format!("{}{}", &text[..cut], truncation_suffix(omitted))
        }
    }
}

/// Incremental version of [`truncate`] for byte streams
///
/// Characters are counted by UTF-8 lead bytes so the count matches `truncate` for valid
/// UTF-8 regardless of how the stream is chunked.
#[derive(Debug)]
pub struct BoundedCapture {
    limit: usize,
    kept: Vec<u8>,
    kept_chars: usize,
    omitted_chars: usize,
    keeping: bool,
}

impl BoundedCapture {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            kept: Vec::new(),
            kept_chars: 0,
            omitted_chars: 0,
            keeping: true,
        }
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            // Continuation bytes (10xxxxxx) belong to the previous character
            if byte & 0xC0 != 0x80 {
                self.keeping = self.kept_chars < self.limit;
                if self.keeping {
                    self.kept_chars += 1;
                } else {
                    self.omitted_chars += 1;
                }
            }
            if self.keeping {
                self.kept.push(byte);
            }
        }
    }

    /// Decode the kept bytes (lossily) and append the truncation note if needed
    pub fn finish(self) -> String {
        let text = String::from_utf8_lossy(&self.kept).into_owned();
        if self.omitted_chars == 0 {
            text
        } else {
            text + &truncation_suffix(self.omitted_chars)
        }
    }
}

/// Drain `reader` to EOF, keeping at most `limit` characters
///
/// A read error ends the capture early; whatever was read so far is returned.
pub async fn capture_stream<R>(reader: Option<R>, limit: usize) -> String
where
    R: AsyncRead + Unpin,
{
    let mut capture = BoundedCapture::new(limit);
    let Some(mut reader) = reader else {
        return capture.finish();
    };

    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => capture.extend(&buf[..n]),
            Err(e) => {
                warn!("Stopped capturing subprocess output after read error: {}", e);
                break;
            }
        }
    }
    capture.finish()
}
