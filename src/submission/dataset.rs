//! Submission dataset
//!
//! An ordered list of (name, value, kind) entries collected from the form's
//! controls for a single submission attempt. A dataset is rebuilt fresh per
//! attempt and supports exactly three serializations: urlencoded, multipart
//! and plaintext.

use ring::rand::{SecureRandom, SystemRandom};
use url::form_urlencoded;

/// Value carried by a single dataset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Text(String),
    File(FilePayload),
}

/// A file selected into a file control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub filename: String,
    /// Content type reported in multipart framing; empty means octet-stream
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// The placeholder entry contributed by a file control with no selection
    pub fn empty() -> Self {
        Self::new("", "application/octet-stream", Vec::new())
    }
}

/// One (name, value, kind) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Control kind that produced the entry ("text", "file", "submit", ...)
    pub kind: String,
    pub name: String,
    pub value: EntryValue,
}

/// Ordered dataset collected for one submission attempt
#[derive(Debug, Clone)]
pub struct FormDataset {
    entries: Vec<DatasetEntry>,
    /// Selected character set label, reported through `_charset_` entries
    character_set: String,
}

impl FormDataset {
    pub fn new(character_set: String) -> Self {
        Self {
            entries: Vec::new(),
            character_set,
        }
    }

    pub fn character_set(&self) -> &str {
        &self.character_set
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a textual entry. Stray CR and LF in names and values are
    /// normalized to CRLF pairs, except for textarea values which keep the
    /// control's own line structure.
    pub fn push_text(&mut self, kind: &str, name: &str, value: &str) {
        let name = normalize_crlf(name);
        let value = if kind == "textarea" {
            value.to_string()
        } else {
            normalize_crlf(value)
        };
        self.entries.push(DatasetEntry {
            kind: kind.to_string(),
            name,
            value: EntryValue::Text(value),
        });
    }

    /// Append a file entry
    pub fn push_file(&mut self, name: &str, payload: FilePayload) {
        self.entries.push(DatasetEntry {
            kind: "file".to_string(),
            name: normalize_crlf(name),
            value: EntryValue::File(payload),
        });
    }

    /// The textual value an entry contributes outside multipart framing.
    /// A hidden `_charset_` entry reports the selected character set and a
    /// file entry contributes its filename.
    fn effective_value(&self, entry: &DatasetEntry) -> String {
        if entry.name == "_charset_" && entry.kind == "hidden" {
            return self.character_set.clone();
        }
        match &entry.value {
            EntryValue::Text(s) => s.clone(),
            EntryValue::File(f) => f.filename.clone(),
        }
    }

    /// application/x-www-form-urlencoded serialization
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for entry in &self.entries {
            serializer.append_pair(&entry.name, &self.effective_value(entry));
        }
        serializer.finish()
    }

    /// text/plain serialization: one name=value line per entry, CRLF-joined
    pub fn to_plaintext(&self) -> String {
        let mut result = String::new();
        for entry in &self.entries {
            result.push_str(&format!(
                "{}={}\r\n",
                entry.name,
                self.effective_value(entry)
            ));
        }
        result
    }

    /// multipart/form-data serialization
    ///
    /// Returns the full MIME type (carrying the boundary parameter) together
    /// with the framed body. The boundary is generated fresh and is
    /// guaranteed not to occur in any entry's content.
    pub fn to_multipart(&self) -> (String, Vec<u8>) {
        let boundary = self.generate_boundary();
        let mime = format!("multipart/form-data; boundary={}", boundary);

        let mut body = Vec::new();
        for entry in &self.entries {
            body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            match &entry.value {
                EntryValue::File(file) => {
                    let content_type = if file.content_type.is_empty() {
                        "application/octet-stream"
                    } else {
                        &file.content_type
                    };
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {}\r\n\r\n",
                            entry.name, file.filename, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&file.bytes);
                }
                EntryValue::Text(_) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}",
                            entry.name,
                            self.effective_value(entry)
                        )
                        .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        (mime, body)
    }

    /// Pick a boundary token absent from every entry's bytes
    fn generate_boundary(&self) -> String {
        loop {
            let candidate = format!("---------------------------{}", random_token());
            if !self.contains_bytes(candidate.as_bytes()) {
                return candidate;
            }
        }
    }

    fn contains_bytes(&self, needle: &[u8]) -> bool {
        let in_haystack = |haystack: &[u8]| {
            haystack
                .windows(needle.len())
                .any(|window| window == needle)
        };
        self.entries.iter().any(|entry| {
            in_haystack(entry.name.as_bytes()) ||
                match &entry.value {
                    EntryValue::Text(s) => in_haystack(s.as_bytes()),
                    EntryValue::File(f) => {
                        in_haystack(f.filename.as_bytes()) || in_haystack(&f.bytes)
                    }
                }
        })
    }
}

/// Normalize lone CR or LF characters to CRLF pairs
fn normalize_crlf(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut prev = ' ';
    for ch in s.chars() {
        // Complete a dangling CR before handling anything but its LF
        if prev == '\r' && ch != '\n' {
            buf.push('\n');
        }
        match ch {
            '\n' if prev != '\r' => buf.push_str("\r\n"),
            _ => buf.push(ch),
        }
        prev = ch;
    }
    if prev == '\r' {
        buf.push('\n');
    }
    buf
}

/// Map a candidate charset label to its canonical name
pub fn recognize_charset(label: &str) -> Option<&'static str> {
    match label.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" | "unicode-1-1-utf-8" => Some("UTF-8"),
        "iso-8859-1" | "latin1" | "l1" | "iso_8859-1" => Some("ISO-8859-1"),
        "windows-1252" | "cp1252" => Some("windows-1252"),
        "us-ascii" | "ascii" => Some("US-ASCII"),
        "utf-16" => Some("UTF-16"),
        _ => None,
    }
}

/// Random hex token for multipart boundaries
fn random_token() -> String {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 12];
    if rng.fill(&mut bytes).is_err() {
        // Entropy failure leaves a fixed token; the containment loop in
        // generate_boundary still guarantees a usable boundary.
        bytes = *b"formixbounda";
    }
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
