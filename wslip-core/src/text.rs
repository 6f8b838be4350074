//! Line-oriented text codec for files edited in place.
//!
//! The config file may have been written by Windows tools in UTF-16 or with a
//! byte order mark, and the hosts file usually uses CRLF line endings. Both
//! stores keep their documents as plain lines and use [`TextFormat`] to write
//! them back exactly the way they were read.

use crate::error::{Result, WslIpError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Character encoding of a text file, detected from its byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

/// Line terminator used when writing lines back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Native line ending for newly created files.
    pub const fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Everything needed to re-encode a file's lines byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    pub encoding: Encoding,
    pub line_ending: LineEnding,
    /// Whether the last line is followed by a line terminator.
    pub final_newline: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self { encoding: Encoding::Utf8, line_ending: LineEnding::native(), final_newline: true }
    }
}

impl TextFormat {
    /// Decode raw file content into lines, remembering the file's format.
    ///
    /// `origin` names the file in parse errors.
    pub fn decode(bytes: &[u8], origin: &str) -> Result<(Vec<String>, TextFormat)> {
        let (encoding, text) = decode_text(bytes, origin)?;

        if text.is_empty() {
            let format = TextFormat { encoding, line_ending: LineEnding::native(), final_newline: true };
            return Ok((Vec::new(), format));
        }

        let final_newline = text.ends_with('\n');
        let body = if final_newline { &text[..text.len() - 1] } else { text.as_str() };
        let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();

        // CRLF only when every terminated line uses it. In a mixed file each
        // `\r` stays part of its line, so untouched lines keep their ending.
        let terminated = if final_newline { lines.len() } else { lines.len() - 1 };
        let line_ending = if terminated == 0 {
            LineEnding::native()
        } else if lines[..terminated].iter().all(|line| line.ends_with('\r')) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };

        if line_ending == LineEnding::CrLf {
            for line in &mut lines[..terminated] {
                line.pop();
            }
        }

        Ok((lines, TextFormat { encoding, line_ending, final_newline }))
    }

    /// Encode lines using this format.
    pub fn encode<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
        let separator = self.line_ending.as_str();
        let mut text = String::new();
        let mut any = false;
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push_str(separator);
            }
            text.push_str(line);
            any = true;
        }
        if any && self.final_newline {
            text.push_str(separator);
        }

        match self.encoding {
            Encoding::Utf8 => text.into_bytes(),
            Encoding::Utf8Bom => {
                let mut bytes = UTF8_BOM.to_vec();
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
            Encoding::Utf16Le => {
                let mut bytes = UTF16_LE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
            Encoding::Utf16Be => {
                let mut bytes = UTF16_BE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
        }
    }
}

fn decode_text(bytes: &[u8], origin: &str) -> Result<(Encoding, String)> {
    let invalid = |reason: &str| WslIpError::Parse {
        origin: origin.to_string(),
        line: 0,
        reason: reason.to_string(),
    };

    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        let text = std::str::from_utf8(rest).map_err(|_| invalid("file is not valid UTF-8"))?;
        return Ok((Encoding::Utf8Bom, text.to_string()));
    }

    let utf16 = if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        Some((Encoding::Utf16Le, rest, u16::from_le_bytes as fn([u8; 2]) -> u16))
    } else {
        bytes
            .strip_prefix(UTF16_BE_BOM)
            .map(|rest| (Encoding::Utf16Be, rest, u16::from_be_bytes as fn([u8; 2]) -> u16))
    };

    if let Some((encoding, rest, to_unit)) = utf16 {
        if rest.len() % 2 != 0 {
            return Err(invalid("truncated UTF-16 content"));
        }
        let units: Vec<u16> = rest.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]])).collect();
        let text = String::from_utf16(&units).map_err(|_| invalid("file is not valid UTF-16"))?;
        return Ok((encoding, text));
    }

    let text = std::str::from_utf8(bytes).map_err(|_| invalid("file is not valid UTF-8"))?;
    Ok((Encoding::Utf8, text.to_string()))
}
