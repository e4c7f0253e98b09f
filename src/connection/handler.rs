//! Per-connection frame loop.
//!
//! Each accepted socket gets its own task running a [`ConnectionHandler`].
//! The loop drains every complete frame already buffered (and fully flushes
//! the response for each) before reading more bytes from the socket, so a
//! pipelining client gets its answers strictly in request order and a slow
//! reader backpressures its own connection rather than the server.

use crate::commands::Command;
use crate::protocol::{decode_request, encode_response, extract};
use crate::scheduler::{SchedulerError, SchedulerHandle};
use bytes::BytesMut;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Initial capacity of the per-connection read buffer.
const READ_BUFFER_CAPACITY: usize = 4096;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Counters reported when a connection closes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectionStats {
    pub frames_received: u64,
    pub frames_dropped: u64,
    pub responses_sent: u64,
}

pub struct ConnectionHandler {
    stream: TcpStream,
    addr: SocketAddr,
    scheduler: SchedulerHandle,
    /// Database chosen via SELECT; `None` means the default database.
    selected: Option<usize>,
    buffer: BytesMut,
    stats: ConnectionStats,
}

impl ConnectionHandler {
    pub fn new(stream: TcpStream, addr: SocketAddr, scheduler: SchedulerHandle) -> Self {
        Self {
            stream,
            addr,
            scheduler,
            selected: None,
            buffer: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
            stats: ConnectionStats::default(),
        }
    }

    /// Serves the connection until the peer closes it or an error ends it.
    pub async fn run(mut self) -> Result<ConnectionStats, ConnectionError> {
        debug!(addr = %self.addr, "connection open");
        loop {
            while let Some(frame) = extract(&mut self.buffer) {
                self.stats.frames_received += 1;
                self.handle_frame(&frame).await?;
            }
            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                break;
            }
        }
        debug!(addr = %self.addr, stats = ?self.stats, "connection closed");
        Ok(self.stats)
    }

    async fn handle_frame(&mut self, frame: &[u8]) -> Result<(), ConnectionError> {
        let Some(request) = decode_request(frame) else {
            self.stats.frames_dropped += 1;
            trace!(addr = %self.addr, "malformed frame dropped");
            return Ok(());
        };
        let Some(command) = Command::from_request(&request) else {
            // Unknown verbs get no reply at all.
            self.stats.frames_dropped += 1;
            let verb = request.first().map(String::as_str).unwrap_or("");
            trace!(addr = %self.addr, verb, "unknown verb dropped");
            return Ok(());
        };

        let completion = self.scheduler.submit(self.selected, command).await?;
        self.selected = completion.db;

        let payload = encode_response(&completion.response)?;
        self.stream.write_all(payload.as_bytes()).await?;
        self.stream.flush().await?;
        self.stats.responses_sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use tokio::net::TcpListener;

    async fn spawn_server() -> SocketAddr {
        let (scheduler, handle) = Scheduler::new(4);
        tokio::spawn(scheduler.run());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (stream, peer) = listener.accept().await.unwrap();
                let handler = ConnectionHandler::new(stream, peer, handle.clone());
                tokio::spawn(async move {
                    let _ = handler.run().await;
                });
            }
        });
        addr
    }

    async fn send(stream: &mut TcpStream, request: &[&str]) {
        let payload = serde_json::to_string(request).unwrap();
        stream.write_all(payload.as_bytes()).await.unwrap();
    }

    async fn recv(stream: &mut TcpStream, buf: &mut BytesMut) -> Vec<String> {
        loop {
            if let Some(frame) = extract(buf) {
                return decode_request(&frame).unwrap();
            }
            let n = stream.read_buf(buf).await.unwrap();
            assert_ne!(n, 0, "server closed before replying");
        }
    }

    #[tokio::test]
    async fn test_set_incr_get_over_tcp() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = BytesMut::new();

        send(&mut stream, &["SET", "counter", "5"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["INCRBY", "counter", "3"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["GET", "counter"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["8"]);
    }

    #[tokio::test]
    async fn test_pipelined_frames_answered_in_order() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = BytesMut::new();

        // Two frames in one write.
        stream
            .write_all(br#"["LPUSHB","pl","a"]["LPUSHB","pl","b"]"#)
            .await
            .unwrap();
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["LPOPF", "pl"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_split_frame_reassembly() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = BytesMut::new();

        stream.write_all(br#"["SET","split","#).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        stream.write_all(br#""whole"]"#).await.unwrap();
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["GET", "split"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["whole"]);
    }

    #[tokio::test]
    async fn test_unknown_verb_gets_no_reply() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = BytesMut::new();

        stream
            .write_all(br#"["FROBNICATE","x"]["SET","after","1"]"#)
            .await
            .unwrap();
        // The first reply on the wire belongs to SET.
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["GET", "after"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["1"]);
    }

    #[tokio::test]
    async fn test_hash_roundtrip_with_missing_field() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = BytesMut::new();

        send(&mut stream, &["HSET", "h", "name", "ember", "port", "8080"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["OK"]);
        send(&mut stream, &["HGET", "h", "name", "nosuch"]).await;
        assert_eq!(recv(&mut stream, &mut buf).await, vec!["ember", ""]);
    }

    #[tokio::test]
    async fn test_select_isolates_connections_keyspace() {
        let addr = spawn_server().await;
        let mut a = TcpStream::connect(addr).await.unwrap();
        let mut b = TcpStream::connect(addr).await.unwrap();
        let mut abuf = BytesMut::new();
        let mut bbuf = BytesMut::new();

        send(&mut a, &["SELECT", "1"]).await;
        assert_eq!(recv(&mut a, &mut abuf).await, vec!["OK"]);
        send(&mut a, &["SET", "only", "here"]).await;
        assert_eq!(recv(&mut a, &mut abuf).await, vec!["OK"]);

        // Connection b still points at database 0.
        send(&mut b, &["GET", "only"]).await;
        assert_eq!(recv(&mut b, &mut bbuf).await, vec![""]);
    }
}
