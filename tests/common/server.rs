//! Scripted fake IRC server.
//!
//! Binds `127.0.0.1:0`, accepts client connections and lets a test write
//! raw lines to the client and assert on the lines it sends back.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

use super::WAIT;

/// A listening fake server.
pub struct TestServer {
    listener: TcpListener,
    address: String,
}

impl TestServer {
    /// Bind on an ephemeral local port.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?.to_string();
        Ok(Self { listener, address })
    }

    /// `host:port` to hand to `server`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Accept the next client.
    pub async fn accept(&self) -> anyhow::Result<TestPeer> {
        let (stream, _) = timeout(WAIT, self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(TestPeer {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }
}

/// The server side of one accepted client connection.
pub struct TestPeer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

#[allow(dead_code)]
impl TestPeer {
    /// Send one line to the client, adding the terminator.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next line from the client, terminator stripped.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(WAIT).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read lines until one satisfies `predicate`; returns that line.
    pub async fn recv_until<F>(&mut self, predicate: F) -> anyhow::Result<String>
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let line = self.recv().await?;
            if predicate(&line) {
                return Ok(line);
            }
        }
    }

    /// Consume the `NICK`/`USER` registration burst.
    pub async fn expect_registration(&mut self) -> anyhow::Result<(String, String)> {
        let nick = self.recv().await?;
        let user = self.recv().await?;
        Ok((nick, user))
    }
}
