//! In-memory model of the INI-style config file.
//!
//! Every physical line is kept. Entries remember the exact text they were
//! read from until they are modified, so an untouched document serializes
//! back to the bytes it was parsed from.

use crate::error::{Result, WslIpError};
use crate::text::TextFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry { key: String, value: String, raw: Option<String> },
    /// Blank line or comment.
    Other(String),
}

impl Line {
    fn entry_key(&self) -> Option<&str> {
        match self {
            Line::Entry { key, .. } => Some(key),
            Line::Other(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Line::Other(text) if text.trim().is_empty())
    }

    fn render(&self) -> String {
        match self {
            Line::Entry { raw: Some(raw), .. } => raw.clone(),
            Line::Entry { key, value, raw: None } => format!("{} = {}", key, value),
            Line::Other(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    /// Header line as read from disk; `None` for the root section.
    header: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    fn root() -> Self {
        Self { name: String::new(), header: None, lines: Vec::new() }
    }

    fn has_entries(&self) -> bool {
        self.lines.iter().any(|line| line.entry_key().is_some())
    }

    /// Where a new key goes: after the last entry, else after the last
    /// comment, else right below the header.
    fn insert_position(&self) -> usize {
        self.lines
            .iter()
            .rposition(|line| line.entry_key().is_some())
            .or_else(|| self.lines.iter().rposition(|line| !line.is_blank()))
            .map_or(0, |pos| pos + 1)
    }
}

/// Ordered sections of ordered `key = value` entries.
///
/// Lines before the first header form the root section, named `""`.
/// Section and key names are matched ASCII case-insensitively; the spelling
/// found on disk is kept. A repeated section header continues the same
/// logical section, and for repeated keys the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
    format: TextFormat,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self { sections: vec![Section::root()], format: TextFormat::default() }
    }
}

impl ConfigDocument {
    /// Parse raw file content. `origin` names the file in parse errors.
    pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Self> {
        let (lines, format) = TextFormat::decode(bytes, origin)?;
        Self::parse_lines(lines, format, origin)
    }

    /// Parse UTF-8 text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes(), "<memory>")
    }

    fn parse_lines(lines: Vec<String>, format: TextFormat, origin: &str) -> Result<Self> {
        let mut sections = vec![Section::root()];

        for (index, raw) in lines.into_iter().enumerate() {
            let error = |reason: &str| WslIpError::Parse {
                origin: origin.to_string(),
                line: index + 1,
                reason: reason.to_string(),
            };

            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                push_line(&mut sections, Line::Other(raw));
                continue;
            }

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| error("unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(error("empty section name"));
                }
                sections.push(Section {
                    name: name.to_string(),
                    header: Some(raw.clone()),
                    lines: Vec::new(),
                });
                continue;
            }

            let (key, value) = raw.split_once('=').ok_or_else(|| error("expected `key = value`"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(error("empty key"));
            }
            let line =
                Line::Entry { key: key.to_string(), value: value.trim().to_string(), raw: Some(raw.clone()) };
            push_line(&mut sections, line);
        }

        Ok(Self { sections, format })
    }

    /// Serialize back to file content in the original encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let rendered = self.render_lines();
        self.format.encode(rendered.iter().map(String::as_str))
    }

    fn render_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for section in &self.sections {
            if let Some(header) = &section.header {
                out.push(header.clone());
            }
            out.extend(section.lines.iter().map(Line::render));
        }
        out
    }

    /// Value of `key` in `section`, if present.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.matching(section)
            .flat_map(|s| s.lines.iter())
            .filter_map(|line| match line {
                Line::Entry { key: k, value, .. } if k.eq_ignore_ascii_case(key) => Some(value.as_str()),
                _ => None,
            })
            .last()
    }

    /// Entries of a section in first-seen key order, last duplicate winning.
    pub fn entries(&self, section: &str) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = Vec::new();
        for line in self.matching(section).flat_map(|s| s.lines.iter()) {
            if let Line::Entry { key, value, .. } = line {
                match out.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
                    Some(existing) => existing.1 = value.as_str(),
                    None => out.push((key.as_str(), value.as_str())),
                }
            }
        }
        out
    }

    /// Distinct section names in document order, root excluded.
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for section in self.sections.iter().skip(1) {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&section.name)) {
                names.push(&section.name);
            }
        }
        names
    }

    /// Store `value` under `key`. Returns whether the stored value changed.
    ///
    /// Creates the section at the end of the document when missing. Existing
    /// duplicates of the key collapse into the position of the last one.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        if self.get(section, key) == Some(value) {
            return false;
        }

        let last = self.locate(section, key).last().copied();
        match last {
            Some((s, l)) => {
                let spelled = self.sections[s].lines[l].entry_key().unwrap_or(key).to_string();
                self.sections[s].lines[l] = Line::Entry { key: spelled, value: value.to_string(), raw: None };
                self.remove_where(section, key, Some((s, l)));
            }
            None => {
                let s = match self.sections.iter().rposition(|sec| sec.name.eq_ignore_ascii_case(section)) {
                    Some(s) => s,
                    None => self.push_section(section),
                };
                let position = self.sections[s].insert_position();
                let line = Line::Entry { key: key.to_string(), value: value.to_string(), raw: None };
                self.sections[s].lines.insert(position, line);
            }
        }
        true
    }

    /// Remove `key` from `section`. Returns whether anything was removed.
    ///
    /// A named section left without entries is removed as a whole.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        if !self.remove_where(section, key, None) {
            return false;
        }
        if !section.is_empty() && !self.matching(section).any(Section::has_entries) {
            self.drop_sections(section);
        }
        true
    }

    /// Remove a whole section. For the root section only its entries go.
    pub fn remove_section(&mut self, section: &str) -> bool {
        if section.is_empty() {
            let root = &mut self.sections[0];
            let before = root.lines.len();
            root.lines.retain(|line| line.entry_key().is_none());
            return root.lines.len() != before;
        }
        self.drop_sections(section)
    }

    /// Sections named `section`; the result borrows only from `self`.
    fn matching<'a>(&'a self, section: &str) -> impl Iterator<Item = &'a Section> + 'a {
        let wanted = section.to_string();
        self.sections.iter().filter(move |s| s.name.eq_ignore_ascii_case(&wanted))
    }

    /// (section index, line index) of every occurrence of `key`.
    fn locate(&self, section: &str, key: &str) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for (s, sec) in self.sections.iter().enumerate() {
            if !sec.name.eq_ignore_ascii_case(section) {
                continue;
            }
            for (l, line) in sec.lines.iter().enumerate() {
                if line.entry_key().is_some_and(|k| k.eq_ignore_ascii_case(key)) {
                    found.push((s, l));
                }
            }
        }
        found
    }

    /// Remove every occurrence of `key` except the one at `keep`.
    fn remove_where(&mut self, section: &str, key: &str, keep: Option<(usize, usize)>) -> bool {
        let mut removed = false;
        for (s, sec) in self.sections.iter_mut().enumerate() {
            if !sec.name.eq_ignore_ascii_case(section) {
                continue;
            }
            let mut l = 0;
            sec.lines.retain(|line| {
                let index = l;
                l += 1;
                let hit = line.entry_key().is_some_and(|k| k.eq_ignore_ascii_case(key))
                    && keep != Some((s, index));
                removed |= hit;
                !hit
            });
        }
        removed
    }

    fn drop_sections(&mut self, section: &str) -> bool {
        let was_last = self.sections.last().is_some_and(|s| s.name.eq_ignore_ascii_case(section));
        let before = self.sections.len();
        let mut first = true;
        self.sections.retain(|s| {
            let keep = first || !s.name.eq_ignore_ascii_case(section);
            first = false;
            keep
        });
        let removed = self.sections.len() != before;

        // Undo the separator added in front of a section appended by `set`
        if removed && was_last {
            if let Some(last) = self.sections.last_mut() {
                if last.lines.last().is_some_and(Line::is_blank) {
                    last.lines.pop();
                }
            }
        }
        removed
    }

    fn push_section(&mut self, name: &str) -> usize {
        let has_content = self.sections.len() > 1 || !self.sections[0].lines.is_empty();
        if let Some(last) = self.sections.last_mut() {
            if has_content && !last.lines.last().is_some_and(Line::is_blank) {
                last.lines.push(Line::Other(String::new()));
            }
        }
        self.sections.push(Section {
            name: name.to_string(),
            header: Some(format!("[{}]", name)),
            lines: Vec::new(),
        });
        self.sections.len() - 1
    }
}

fn push_line(sections: &mut [Section], line: Line) {
    if let Some(current) = sections.last_mut() {
        current.lines.push(line);
    }
}
