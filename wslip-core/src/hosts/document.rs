//! In-memory model of a hosts file.

use crate::error::{Result, WslIpError};
use crate::text::TextFormat;
use std::net::IpAddr;

/// One address with the hostnames bound to it on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Address as written, possibly with an IPv6 zone (`fe80::1%lo0`).
    address: String,
    ip: IpAddr,
    hostnames: Vec<String>,
    /// Trailing comment including the leading `#`.
    comment: Option<String>,
    /// Original text while the line is untouched.
    raw: Option<String>,
}

impl Binding {
    fn new(ip: IpAddr, hostname: &str) -> Self {
        Self {
            address: ip.to_string(),
            ip,
            hostnames: vec![hostname.to_string()],
            comment: None,
            raw: None,
        }
    }

    pub fn address(&self) -> IpAddr {
        self.ip
    }

    pub fn hostnames(&self) -> &[String] {
        &self.hostnames
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.hostnames.iter().any(|h| h.eq_ignore_ascii_case(hostname))
    }

    fn set_address(&mut self, ip: IpAddr) {
        self.address = ip.to_string();
        self.ip = ip;
        self.raw = None;
    }

    /// Drop `hostname`; returns whether it was there.
    fn remove_hostname(&mut self, hostname: &str) -> bool {
        let before = self.hostnames.len();
        self.hostnames.retain(|h| !h.eq_ignore_ascii_case(hostname));
        let removed = self.hostnames.len() != before;
        if removed {
            self.raw = None;
        }
        removed
    }

    fn render(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let mut line = format!("{}  {}", self.address, self.hostnames.join(" "));
        if let Some(comment) = &self.comment {
            line.push(' ');
            line.push_str(comment);
        }
        line
    }
}

/// A physical line of the hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostsLine {
    /// Blank line or comment, kept as is.
    Verbatim(String),
    Binding(Binding),
}

impl HostsLine {
    fn as_binding(&self) -> Option<&Binding> {
        match self {
            HostsLine::Binding(binding) => Some(binding),
            HostsLine::Verbatim(_) => None,
        }
    }

    fn render(&self) -> String {
        match self {
            HostsLine::Verbatim(text) => text.clone(),
            HostsLine::Binding(binding) => binding.render(),
        }
    }
}

/// The hosts file as an ordered list of lines.
///
/// Bindings added by [`HostsDocument::upsert`] go to the end of the managed
/// region, which ends right after the last binding line so that trailing
/// comments stay at the bottom of the file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostsDocument {
    lines: Vec<HostsLine>,
    format: TextFormat,
}

impl HostsDocument {
    /// Parse raw file content. `origin` names the file in parse errors.
    pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Self> {
        let (raw_lines, format) = TextFormat::decode(bytes, origin)?;
        let lines = raw_lines
            .into_iter()
            .enumerate()
            .map(|(index, raw)| parse_line(raw, origin, index + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lines, format })
    }

    /// Parse UTF-8 text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes(), "<memory>")
    }

    /// Serialize back to file content in the original encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let rendered: Vec<String> = self.lines.iter().map(HostsLine::render).collect();
        self.format.encode(rendered.iter().map(String::as_str))
    }

    pub fn lines(&self) -> &[HostsLine] {
        &self.lines
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.lines.iter().filter_map(HostsLine::as_binding)
    }

    /// Address `hostname` is bound to, from the first line naming it.
    pub fn lookup(&self, hostname: &str) -> Option<IpAddr> {
        self.bindings().find(|b| b.contains(hostname)).map(Binding::address)
    }

    /// Make sure `hostname` resolves to `address` through exactly one line.
    /// Returns whether the document changed.
    pub fn upsert(&mut self, address: IpAddr, hostname: &str) -> bool {
        let positions = self.positions_of(hostname);

        let Some(&first) = positions.first() else {
            self.insert_managed(Binding::new(address, hostname));
            return true;
        };

        let Some((current, shared)) =
            self.lines[first].as_binding().map(|b| (b.address(), b.hostnames.len() > 1))
        else {
            return false;
        };

        if current == address {
            return self.remove_at(hostname, &positions[1..]);
        }

        if !shared {
            if let HostsLine::Binding(binding) = &mut self.lines[first] {
                binding.set_address(address);
            }
            self.remove_at(hostname, &positions[1..]);
            return true;
        }

        self.remove_at(hostname, &positions);
        self.insert_managed(Binding::new(address, hostname));
        true
    }

    /// Unbind `hostname` everywhere. Returns whether the document changed.
    pub fn remove(&mut self, hostname: &str) -> bool {
        let positions = self.positions_of(hostname);
        self.remove_at(hostname, &positions)
    }

    fn positions_of(&self, hostname: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_binding().is_some_and(|b| b.contains(hostname)))
            .map(|(index, _)| index)
            .collect()
    }

    /// Remove `hostname` from the given binding lines, deleting lines left
    /// without hostnames.
    fn remove_at(&mut self, hostname: &str, positions: &[usize]) -> bool {
        let mut changed = false;
        for &index in positions.iter().rev() {
            let now_empty = match &mut self.lines[index] {
                HostsLine::Binding(binding) => {
                    changed |= binding.remove_hostname(hostname);
                    binding.hostnames.is_empty()
                }
                HostsLine::Verbatim(_) => false,
            };
            if now_empty {
                self.lines.remove(index);
            }
        }
        changed
    }

    fn insert_managed(&mut self, binding: Binding) {
        let position = self
            .lines
            .iter()
            .rposition(|line| line.as_binding().is_some())
            .map_or(self.lines.len(), |last| last + 1);
        self.lines.insert(position, HostsLine::Binding(binding));
    }
}

fn parse_line(raw: String, origin: &str, line: usize) -> Result<HostsLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(HostsLine::Verbatim(raw));
    }

    let error = |reason: String| WslIpError::Parse { origin: origin.to_string(), line, reason };

    let (body, comment) = match raw.find('#') {
        Some(pos) => (&raw[..pos], Some(raw[pos..].trim_end().to_string())),
        None => (raw.as_str(), None),
    };

    let mut fields = body.split_whitespace();
    let address = fields.next().unwrap_or_default().to_string();
    let without_zone = address.split('%').next().unwrap_or_default();
    let ip: IpAddr =
        without_zone.parse().map_err(|_| error(format!("'{}' is not an IP address", address)))?;

    let hostnames: Vec<String> = fields.map(str::to_string).collect();
    if hostnames.is_empty() {
        return Err(error(format!("no hostname bound to {}", address)));
    }

    Ok(HostsLine::Binding(Binding { address, ip, hostnames, comment, raw: Some(raw.clone()) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const HOSTS: &str = "\
# Copyright (c) 1993-2009 Microsoft Corp.
#
127.0.0.1\tlocalhost   ubuntu # shared
::1             localhost

192.168.1.10  nas.lan
# end of file
";

    fn ip(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    fn render(doc: &HostsDocument) -> String {
        String::from_utf8(doc.to_bytes()).unwrap()
    }

    #[test]
    fn test_untouched_round_trip_is_identical() {
        let doc = HostsDocument::parse(HOSTS).unwrap();
        assert_eq!(render(&doc), HOSTS);
        assert_eq!(doc.bindings().count(), 3);
    }

    #[test]
    fn test_parse_tolerates_tabs_comments_and_zones() {
        let doc = HostsDocument::parse("fe80::1%lo0\tlocalhost\n10.0.0.1 a b  # c\n").unwrap();
        let bindings: Vec<&Binding> = doc.bindings().collect();
        assert_eq!(bindings[0].hostnames(), ["localhost"]);
        assert_eq!(bindings[1].hostnames(), ["a", "b"]);
        assert_eq!(bindings[1].comment(), Some("# c"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            HostsDocument::parse("# ok\nnot-an-ip host\n").unwrap_err(),
            WslIpError::Parse { line: 2, .. }
        ));
        assert!(HostsDocument::parse("10.0.0.1\n").is_err());
    }

    #[test]
    fn test_upsert_new_hostname_goes_after_last_binding() {
        let mut doc = HostsDocument::parse(HOSTS).unwrap();
        assert!(doc.upsert(ip(172, 16, 0, 2), "debian"));
        assert_eq!(
            render(&doc),
            HOSTS.replace("nas.lan\n", "nas.lan\n172.16.0.2  debian\n")
        );
        assert!(!doc.upsert(ip(172, 16, 0, 2), "Debian"), "second upsert is a no-op");
    }

    #[test]
    fn test_upsert_corrects_sole_binding_in_place() {
        let mut doc = HostsDocument::parse("172.16.0.2  ubuntu\n# tail\n").unwrap();
        assert!(doc.upsert(ip(172, 16, 0, 9), "ubuntu"));
        assert_eq!(render(&doc), "172.16.0.9  ubuntu\n# tail\n");
        assert_eq!(doc.lookup("UBUNTU"), Some(ip(172, 16, 0, 9)));
    }

    #[test]
    fn test_upsert_twice_leaves_one_line() {
        let mut doc = HostsDocument::default();
        doc.upsert(ip(172, 16, 0, 2), "ubuntu");
        doc.upsert(ip(172, 16, 0, 9), "ubuntu");

        let lines: Vec<&Binding> = doc.bindings().filter(|b| b.contains("ubuntu")).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].address(), ip(172, 16, 0, 9));
    }

    #[test]
    fn test_upsert_splits_shared_line() {
        let mut doc = HostsDocument::parse(HOSTS).unwrap();
        assert!(doc.upsert(ip(172, 16, 0, 5), "ubuntu"));

        let text = render(&doc);
        assert!(text.contains("127.0.0.1  localhost # shared\n"), "{}", text);
        assert!(text.contains("nas.lan\n172.16.0.5  ubuntu\n# end of file\n"), "{}", text);
        assert_eq!(doc.lookup("localhost"), Some(ip(127, 0, 0, 1)));
    }

    #[test]
    fn test_upsert_removes_duplicate_occurrences() {
        let mut doc = HostsDocument::parse("172.16.0.2 ubuntu\n172.16.0.3 ubuntu\n").unwrap();
        assert!(doc.upsert(ip(172, 16, 0, 2), "ubuntu"));
        assert_eq!(render(&doc), "172.16.0.2 ubuntu\n");
    }

    #[test]
    fn test_remove_from_shared_line_keeps_localhost() {
        let mut doc = HostsDocument::parse(HOSTS).unwrap();
        assert!(doc.remove("ubuntu"));
        assert!(!doc.remove("ubuntu"));

        let text = render(&doc);
        assert!(text.contains("127.0.0.1  localhost # shared\n"));
        assert_eq!(doc.lookup("ubuntu"), None);
        assert_eq!(doc.bindings().count(), 3);
    }

    #[test]
    fn test_remove_sole_hostname_deletes_line() {
        let mut doc = HostsDocument::parse(HOSTS).unwrap();
        assert!(doc.remove("nas.lan"));
        assert_eq!(render(&doc), HOSTS.replace("192.168.1.10  nas.lan\n", ""));
    }
}
