//! The duplex transport between the two peers.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, trace, warn};

use crate::error::ChannelError;
use crate::protocol::{FrameKind, Message, codec};
use crate::session::InputEvent;

/// Outbound half of the peer connection.
///
/// Inbound traffic is not read through this trait: a transport forwards it
/// as [`InputEvent`]s to the tick scheduler.
pub trait SyncChannel {
    /// Send one message. Delivery is at most once, with no acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport failed to write.
    fn send(&mut self, msg: &Message) -> Result<(), ChannelError>;

    /// Release the transport. Further sends fail.
    fn close(&mut self);
}

/// A single TCP stream used for both directions of traffic.
#[derive(Debug)]
pub struct TcpChannel {
    stream: TcpStream,
    peer: SocketAddr,
    closed: bool,
}

impl TcpChannel {
    /// Listen on `addr` and accept exactly one peer.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or accepting fails.
    pub fn accept<A: ToSocketAddrs + std::fmt::Debug>(addr: A) -> Result<Self, ChannelError> {
        let listener = TcpListener::bind(&addr).map_err(|e| ChannelError::Bind {
            addr: format!("{addr:?}"),
            message: e.to_string(),
        })?;
        if let Ok(local) = listener.local_addr() {
            info!(%local, "waiting for peer");
        }
        Self::accept_from(&listener)
    }

    /// Accept one peer from an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting fails.
    pub fn accept_from(listener: &TcpListener) -> Result<Self, ChannelError> {
        let (stream, peer) = listener.accept().map_err(ChannelError::io)?;
        info!(%peer, "peer connected");
        Self::from_stream(stream, peer)
    }

    /// Connect to a listening peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connect<A: ToSocketAddrs + std::fmt::Debug>(addr: A) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(&addr).map_err(|e| ChannelError::Connect {
            addr: format!("{addr:?}"),
            message: e.to_string(),
        })?;
        let peer = stream.peer_addr().map_err(ChannelError::io)?;
        info!(%peer, "connected to peer");
        Self::from_stream(stream, peer)
    }

    fn from_stream(stream: TcpStream, peer: SocketAddr) -> Result<Self, ChannelError> {
        stream.set_nodelay(true).map_err(ChannelError::io)?;
        Ok(Self {
            stream,
            peer,
            closed: false,
        })
    }

    /// Address of the other peer.
    #[must_use]
    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Start a thread that reads `expect` frames and forwards them as events.
    ///
    /// The thread ends at end of stream, on a read error, or once the
    /// receiving side of `events` is gone. End of stream and read errors are
    /// forwarded as [`InputEvent::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be cloned or the thread cannot
    /// be spawned.
    pub fn spawn_reader(
        &self,
        expect: FrameKind,
        events: Sender<InputEvent>,
    ) -> Result<JoinHandle<()>, ChannelError> {
        let stream = self.stream.try_clone().map_err(ChannelError::io)?;
        thread::Builder::new()
            .name("warptag-reader".to_string())
            .spawn(move || read_frames(stream, expect, &events))
            .map_err(ChannelError::io)
    }
}

fn read_frames(mut stream: TcpStream, expect: FrameKind, events: &Sender<InputEvent>) {
    let mut buf = vec![0u8; expect.frame_len()];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => {
                debug!("peer closed the stream");
                let _ = events.send(InputEvent::Disconnected);
                return;
            }
            Ok(n) => {
                if n < buf.len() {
                    trace!(n, expected = buf.len(), "short frame");
                }
                let msg = codec::decode(&buf[..n], expect);
                trace!(?msg, "frame received");
                if events.send(InputEvent::Remote(msg)).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!(error = %e, "read failed");
                let _ = events.send(InputEvent::Disconnected);
                return;
            }
        }
    }
}

impl SyncChannel for TcpChannel {
    fn send(&mut self, msg: &Message) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        let frame = codec::encode(msg);
        trace!(?msg, len = frame.len(), "sending frame");
        self.stream.write_all(&frame).map_err(ChannelError::io)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            warn!(error = %e, "shutdown failed");
        }
    }
}
