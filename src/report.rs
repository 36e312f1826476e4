use roxmltree::{Document, Node};
use serde::Serialize;
use tracing::{debug, warn};

/// A discovered device, emitted as one JSON line on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: String,
    pub ip: String,
    pub open_ports: Vec<u16>,
}

/// Extract device records from raw nmap output.
///
/// The text may carry banner noise before the report, so parsing starts at
/// the first XML declaration. Anything that cannot be parsed produces an
/// empty result and a diagnostic on stderr; this function never fails.
pub fn parse_report(raw: &str) -> Vec<Device> {
    if raw.trim().is_empty() {
        debug!("scan output is empty, nothing to parse");
        return Vec::new();
    }

    let Some(start) = raw.find("<?xml") else {
        warn!("no XML declaration found in scan output");
        debug!("raw scan output: {}", raw);
        return Vec::new();
    };

    // remove the DTD and stylesheet lines nmap emits; the XML parser
    // rejects doctype declarations
    let cleaned: String = raw[start..]
        .lines()
        .filter(|line| !line.contains("<!DOCTYPE") && !line.contains("<?xml-stylesheet"))
        .collect::<Vec<_>>()
        .join("\n");

    let doc = match Document::parse(&cleaned) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("failed to parse scan report: {}", e);
            debug!("raw scan output: {}", raw);
            return Vec::new();
        }
    };

    doc.descendants()
        .filter(|n| n.has_tag_name("host"))
        .filter_map(parse_host)
        .collect()
}

fn parse_host(host: Node) -> Option<Device> {
    let status = host
        .children()
        .find(|n| n.has_tag_name("status"))
        .and_then(|n| n.attribute("state"));
    if status == Some("down") {
        return None;
    }

    // only hosts with an IPv4 address are reported
    let ip = host
        .children()
        .filter(|n| n.has_tag_name("address"))
        .find(|n| n.attribute("addrtype") == Some("ipv4"))
        .and_then(|n| n.attribute("addr"))?
        .to_string();

    let hostname = host
        .children()
        .find(|n| n.has_tag_name("hostnames"))
        .and_then(|names| {
            names
                .children()
                .filter(|n| n.has_tag_name("hostname"))
                .find_map(|n| n.attribute("name").filter(|name| !name.is_empty()))
        });

    let mut open_ports = Vec::new();
    if let Some(ports) = host.children().find(|n| n.has_tag_name("ports")) {
        for port in ports.children().filter(|n| n.has_tag_name("port")) {
            let state = port
                .children()
                .find(|n| n.has_tag_name("state"))
                .and_then(|n| n.attribute("state"));
            if state != Some("open") {
                continue;
            }

            let Some(port_id) = port.attribute("portid") else {
                continue;
            };
            match port_id.parse::<u16>() {
                Ok(number) => open_ports.push(number),
                Err(_) => warn!("could not parse port id '{}' as a number, skipping", port_id),
            }
        }
    }

    Some(Device {
        name: hostname.map(str::to_string).unwrap_or_else(|| ip.clone()),
        ip,
        open_ports,
    })
}
