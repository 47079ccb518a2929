//! WebExtension native messaging framing: every message is a 32-bit length in native byte
//! order followed by that many bytes of UTF-8 JSON.

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{self, AsyncRead, AsyncReadExt};
use tracing::{trace, warn};

use super::{BrowserEvent, EventSource};

/// Browsers never send more than 64 MiB in one message.
pub const MAX_INCOMING_MESSAGE: usize = 64 * 1024 * 1024;

/// Reads one frame. Returns `None` if the stream ended cleanly before a new frame started.
pub async fn read_frame(reader: &mut (impl AsyncRead + Unpin)) -> Result<Option<Vec<u8>>, io::Error> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let read = reader.read(&mut header[filled..]).await?;
        if read == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Stream ended inside a frame header",
            ));
        }
        filled += read;
    }

    let length = u32::from_ne_bytes(header) as usize;
    if length > MAX_INCOMING_MESSAGE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Frame of {length} bytes exceeds the native messaging limit"),
        ));
    }

    let mut payload = vec![0; length];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// [EventSource] reading frames from the browser, usually through stdin.
pub struct NativeMessagingSource<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin + Send> NativeMessagingSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> EventSource for NativeMessagingSource<R> {
    async fn next_event(&mut self) -> Result<Option<BrowserEvent>> {
        loop {
            let Some(frame) = read_frame(&mut self.reader).await? else {
                return Ok(None);
            };
            match serde_json::from_slice::<BrowserEvent>(&frame) {
                Ok(event) => {
                    trace!("Decoded {event:?}");
                    return Ok(Some(event));
                }
                Err(e) => {
                    // An extension newer than the host may send messages we don't know yet.
                    warn!(
                        "Skipping message that isn't a known event {}: {e}",
                        String::from_utf8_lossy(&frame)
                    )
                }
            }
        }
    }
}
