//! Native ICMP echo prober.
//!
//! Sends a single echo request over a layer-4 raw socket and waits for the
//! matching reply. This avoids spawning a process per address but needs
//! raw socket access.
//!
//! # Privileges Required
//!
//! Opening the raw socket requires root (or `CAP_NET_RAW` on Linux). Without
//! it every probe reports "not live"; a warning is logged once when the
//! prober is built.

use crate::discovery::traits::{LivenessProber, ProbeKind};
use crate::error::{ScanError, ScanResult};
use async_trait::async_trait;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{self, IcmpPacket, IcmpTypes};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::Packet;
use pnet::transport::{icmp_packet_iter, transport_channel, TransportChannelType, TransportProtocol};
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// ICMP echo header size in bytes.
const ECHO_HEADER_SIZE: usize = 8;
/// Echo payload size in bytes.
const PAYLOAD_SIZE: usize = 8;

/// Raw-socket ICMP echo prober.
#[derive(Debug, Clone)]
pub struct IcmpProber {
    timeout: Duration,
}

impl IcmpProber {
    pub fn new(timeout: Duration) -> Self {
        if !is_root() {
            warn!("ICMP probing needs root privileges; hosts will appear down without them");
        }
        Self { timeout }
    }
}

#[async_trait]
impl LivenessProber for IcmpProber {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Icmp
    }

    fn requires_privileges(&self) -> bool {
        true
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn is_alive(&self, addr: Ipv4Addr) -> bool {
        let wait = self.timeout;
        let identifier: u16 = rand::random();

        let outcome =
            tokio::task::spawn_blocking(move || echo_blocking(addr, identifier, wait)).await;

        match outcome {
            Ok(Ok(alive)) => alive,
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "icmp probe failed");
                false
            }
            Err(e) => {
                trace!(%addr, error = %e, "icmp probe task aborted");
                false
            }
        }
    }
}

/// Send one echo request and wait up to `wait` for its reply.
fn echo_blocking(target: Ipv4Addr, identifier: u16, wait: Duration) -> ScanResult<bool> {
    let protocol =
        TransportChannelType::Layer4(TransportProtocol::Ipv4(IpNextHeaderProtocols::Icmp));
    let (mut tx, mut rx) = transport_channel(1024, protocol).map_err(classify_socket_error)?;

    let mut buffer = [0u8; ECHO_HEADER_SIZE + PAYLOAD_SIZE];
    let request = build_echo_request(&mut buffer, identifier)?;
    tx.send_to(request, IpAddr::V4(target))?;

    let deadline = Instant::now() + wait;
    let mut replies = icmp_packet_iter(&mut rx);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }

        match replies.next_with_timeout(remaining)? {
            Some((packet, from)) => {
                if from == IpAddr::V4(target) && is_matching_reply(&packet, identifier) {
                    return Ok(true);
                }
            }
            None => return Ok(false),
        }
    }
}

fn build_echo_request(
    buffer: &mut [u8],
    identifier: u16,
) -> ScanResult<MutableEchoRequestPacket<'_>> {
    let mut packet = MutableEchoRequestPacket::new(buffer)
        .ok_or_else(|| ScanError::InvalidConfig("echo buffer too small".to_string()))?;

    packet.set_icmp_type(IcmpTypes::EchoRequest);
    packet.set_identifier(identifier);
    packet.set_sequence_number(1);

    let checksum = IcmpPacket::new(packet.packet())
        .map(|view| icmp::checksum(&view))
        .ok_or_else(|| ScanError::InvalidConfig("echo buffer too small".to_string()))?;
    packet.set_checksum(checksum);

    Ok(packet)
}

fn is_matching_reply(packet: &IcmpPacket<'_>, identifier: u16) -> bool {
    if packet.get_icmp_type() != IcmpTypes::EchoReply {
        return false;
    }
    EchoReplyPacket::new(packet.packet())
        .map(|reply| reply.get_identifier() == identifier)
        .unwrap_or(false)
}

fn classify_socket_error(err: std::io::Error) -> ScanError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        ScanError::PermissionDenied("raw ICMP sockets require root/sudo privileges".to_string())
    } else {
        ScanError::Io(err)
    }
}

/// Check if running with root/admin privileges.
fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
