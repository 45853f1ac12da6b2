//! Service names for well-known ports.
//!
//! Display-only annotation. Nothing in the scanning path consults this table.

use crate::types::Port;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (445, "SMB"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5432, "PostgreSQL"),
        (5900, "VNC"),
        (8080, "HTTP-Alt"),
        (8443, "HTTPS-Alt"),
        (27017, "MongoDB"),
    ])
});

/// Look up the service name for a port, or `"Unknown"`.
pub fn get_service_name(port: u16) -> &'static str {
    PORT_SERVICES.get(&port).copied().unwrap_or("Unknown")
}

/// Render ports as `22 (SSH), 80 (HTTP)`.
pub fn annotate_ports(ports: &[Port]) -> String {
    ports
        .iter()
        .map(|p| format!("{} ({})", p, get_service_name(p.as_u16())))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(get_service_name(22), "SSH");
        assert_eq!(get_service_name(80), "HTTP");
        assert_eq!(get_service_name(27017), "MongoDB");
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(get_service_name(502), "Unknown");
        assert_eq!(get_service_name(12345), "Unknown");
    }

    #[test]
    fn test_annotate_ports() {
        let ports = [Port::new(22).unwrap(), Port::new(502).unwrap()];
        assert_eq!(annotate_ports(&ports), "22 (SSH), 502 (Unknown)");
        assert_eq!(annotate_ports(&[]), "");
    }
}
