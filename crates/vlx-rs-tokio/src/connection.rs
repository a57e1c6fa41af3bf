// crates/vlx-rs-tokio/src/connection.rs

//! Runs API calls over a SLIP framed byte stream.
//!
//! Establishing the stream (TCP, TLS, serial, ...) and authenticating are left
//! to the caller; [`Connection`] takes any `AsyncRead + AsyncWrite` once it is
//! ready to carry gateway frames.

use crate::config::ConnectionConfig;
use log::{debug, error, trace, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use vlx_rs::frame::{SlipDecoder, slip};
use vlx_rs::{ApiCall, FrameEnvelope, ProtocolError, Session, SessionIdAllocator};

const READ_CHUNK: usize = 256;

/// The stream together with the bytes read but not yet decoded.
struct FramedStream<T> {
    io: T,
    decoder: SlipDecoder,
}

impl<T> FramedStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write_frame(&mut self, frame: &FrameEnvelope) -> Result<(), ProtocolError> {
        debug!("[CONN] -> {}", frame.command());
        let bytes = slip::encode(&frame.to_bytes());
        self.io.write_all(&bytes).await.map_err(io_error)?;
        self.io.flush().await.map_err(io_error)
    }

    /// Reads until one frame could be decoded. Packets that do not decode
    /// (e.g. notifications outside the command catalog) are skipped.
    async fn read_frame(&mut self) -> Result<FrameEnvelope, ProtocolError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            while let Some(packet) = self.decoder.next_packet() {
                match packet.and_then(|bytes| FrameEnvelope::from_bytes(&bytes)) {
                    Ok(frame) => {
                        debug!("[CONN] <- {}", frame.command());
                        return Ok(frame);
                    }
                    Err(e) => debug!("[CONN] Skipping undecodable packet: {}", e),
                }
            }

            let read = self.io.read(&mut chunk).await.map_err(io_error)?;
            if read == 0 {
                return Err(ProtocolError::ConnectionClosed);
            }
            self.decoder.push(&chunk[..read]);
        }
    }
}

fn io_error(e: std::io::Error) -> ProtocolError {
    error!("[CONN] I/O error: {}", e);
    ProtocolError::Io
}

/// A gateway session over a byte stream.
///
/// Exchanges are serialized: a call owns the stream from sending its request
/// until it completes or times out. `api_timeout` bounds the whole exchange.
pub struct Connection<T> {
    stream: Mutex<FramedStream<T>>,
    api_timeout: Duration,
    session_ids: SessionIdAllocator,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(io: T, config: &ConnectionConfig) -> Self {
        Self {
            stream: Mutex::new(FramedStream {
                io,
                decoder: SlipDecoder::new(),
            }),
            api_timeout: config.api_timeout(),
            session_ids: SessionIdAllocator::new(),
        }
    }

    pub fn api_timeout(&self) -> Duration {
        self.api_timeout
    }

    /// Gives back the underlying stream.
    pub fn into_inner(self) -> T {
        self.stream.into_inner().io
    }
}

impl<T> Session for Connection<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn do_api_call<C>(&self, call: &mut C) -> Result<(), ProtocolError>
    where
        C: ApiCall + Send,
    {
        let request = call.request_frame()?;
        let command = request.command();

        // Waiting for the stream, writing the request and reading the answer
        // all count against the timeout.
        let exchange = async {
            let mut stream = self.stream.lock().await;
            stream.write_frame(&request).await?;
            loop {
                let frame = stream.read_frame().await?;
                if call.handle_frame(&frame) {
                    return Ok::<(), ProtocolError>(());
                }
                trace!("[CONN] {} not part of pending {}", frame.command(), command);
            }
        };

        match tokio::time::timeout(self.api_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!("[CONN] Exchange for {} not completed within {:?}", command, self.api_timeout);
                Err(ProtocolError::Timeout(command))
            }
        }
    }

    fn next_session_id(&self) -> u16 {
        self.session_ids.next()
    }
}
