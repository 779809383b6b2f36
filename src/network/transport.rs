//! Framed TCP transport: dialing, the writer task and the listener task.

use crate::error::ConnectionError;
use futures_util::{SinkExt, StreamExt};
use slirc_proto::LineCodec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, info, trace, warn};

use super::actor::ServerEvent;

pub(super) type LineReader = FramedRead<OwnedReadHalf, LineCodec>;
pub(super) type LineWriter = FramedWrite<OwnedWriteHalf, LineCodec>;

/// Work item for a server's writer task.
#[derive(Debug)]
pub enum Outbound {
    /// Line to send, without terminator.
    Line(String),
    /// Acknowledged once every line queued before it has been written.
    Flush(oneshot::Sender<()>),
}

/// Dial `address` and frame both halves of the socket.
pub(super) async fn connect(
    address: &str,
    max_line_len: usize,
) -> Result<(LineReader, LineWriter), ConnectionError> {
    let stream = TcpStream::connect(address)
        .await
        .map_err(|source| ConnectionError {
            address: address.to_string(),
            source,
        })?;
    // Interactive traffic: small lines, no batching
    let _ = stream.set_nodelay(true);

    let (read_half, write_half) = stream.into_split();
    let reader = FramedRead::new(read_half, LineCodec::with_max_len(max_line_len));
    let writer = FramedWrite::new(write_half, LineCodec::with_max_len(max_line_len));
    Ok((reader, writer))
}

/// Spawn the writer task.
///
/// Ends when every sender is dropped or a write fails.
pub(super) fn spawn_writer(
    mut writer: LineWriter,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    connected: Arc<AtomicBool>,
) {
    tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            match item {
                Outbound::Line(line) => {
                    debug!(line = %line, "send");
                    if let Err(e) = writer.send(line).await {
                        warn!(error = %e, "write failed");
                        connected.store(false, Ordering::SeqCst);
                        break;
                    }
                }
                Outbound::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        // Graceful half-close so the server sees QUIT before EOF
        let _ = writer.close().await;
    }
    .in_current_span());
}

/// Spawn the listener task.
///
/// `PING` lines are answered directly through the writer queue and never
/// reach the actor. Every other line is forwarded as
/// [`ServerEvent::Inbound`]. On EOF or a read error the connection is marked
/// down and [`ServerEvent::Closed`] is sent.
pub(super) fn spawn_listener(
    mut reader: LineReader,
    events: mpsc::Sender<ServerEvent>,
    outbound: mpsc::UnboundedSender<Outbound>,
    connected: Arc<AtomicBool>,
) {
    tokio::spawn(async move {
        let reason = loop {
            match reader.next().await {
                Some(Ok(line)) => {
                    trace!(line = %line, "recv");
                    if line.starts_with("PING") {
                        let _ = outbound.send(Outbound::Line(line.replacen("PING", "PONG", 1)));
                        continue;
                    }
                    if events.send(ServerEvent::Inbound(line)).await.is_err() {
                        // Actor gone; nobody left to read for
                        break "actor stopped".to_string();
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "read failed");
                    break e.to_string();
                }
                None => {
                    info!("server closed the connection");
                    break "connection closed by server".to_string();
                }
            }
        };
        connected.store(false, Ordering::SeqCst);
        let _ = events.send(ServerEvent::Closed(reason)).await;
    }
    .in_current_span());
}
