//! Transport layer for MAVLink over UDP.
//!
//! GCS software usually listens on port 14550. Each datagram carries one
//! [MavFrame].
use crate::{
    protocol::{Message, MavFrame},
    Error, Result,
};
use binrw::{BinRead, BinWrite};
use std::{
    io::{Cursor, ErrorKind},
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    sync::atomic::{AtomicU8, Ordering},
    time::Duration,
};
use tokio::net::{ToSocketAddrs, UdpSocket};

/// A UDP link to a GCS.
///
/// Outgoing frames are stamped with this component's IDs and a sequence
/// number.
pub struct MavUdpChannel {
    sock: Option<UdpSocket>,
    system_id: u8,
    component_id: u8,
    sequence: AtomicU8,
}

impl MavUdpChannel {
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            sock: None,
            system_id,
            component_id,
            sequence: AtomicU8::new(0),
        }
    }

    /// Binds an ephemeral port, and connects it to `addr`.
    pub async fn connect<A: ToSocketAddrs>(&mut self, addr: A) -> Result {
        let sock = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
        sock.connect(addr).await?;
        self.sock = Some(sock);
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        let sock = self.sock.as_ref().ok_or(Error::ChannelUnavailable)?;
        Ok(sock.local_addr()?)
    }

    /// Frames and sends a message.
    pub async fn send(&self, message: &Message) -> Result {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let frame = MavFrame::new(sequence, self.system_id, self.component_id, message)?;
        self.send_frame(&frame).await
    }

    pub async fn send_frame(&self, frame: &MavFrame) -> Result {
        let sock = self.sock.as_ref().ok_or(Error::ChannelUnavailable)?;
        let mut out = Cursor::new(Vec::with_capacity(MavFrame::MAX_FRAME_LENGTH));
        frame.write(&mut out)?;
        let out = out.into_inner();
        sock.send(&out).await?;
        Ok(())
    }

    pub async fn recv(&self) -> Result<MavFrame> {
        let sock = self.sock.as_ref().ok_or(Error::ChannelUnavailable)?;
        let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];
        let l = sock.recv(&mut b).await?;
        let b = &b[..l];

        Ok(MavFrame::read(&mut Cursor::new(b))?)
    }

    /// Receives a frame, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when no message is available: either nothing
    /// arrived in time, or the peer isn't listening (yet).
    pub async fn recv_timeout(&self, timeout: Duration) -> Result<Option<MavFrame>> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Err(_) => Ok(None),
            Ok(Ok(frame)) => Ok(Some(frame)),
            // An earlier send got an ICMP port unreachable.
            Ok(Err(Error::IoError(e))) if e.kind() == ErrorKind::ConnectionRefused => {
                trace!("peer not listening");
                Ok(None)
            }
            Ok(Err(e)) => Err(e),
        }
    }
}
