//! Marker scanner for blobs embedded in registry records.
//!
//! A blob lives in the routing section of a record, usually spread over
//! `remarks:` lines:
//!
//! ```text
//! route6:         2001:db8::/32
//! remarks:        rbs$/index.html$text/html$
//! remarks:        <h1>hello</h1>
//! remarks:        rbs$
//! ```
//!
//! Scanning runs in four stages that only ever move forward: the anchor
//! (`route6:`), the header start (`rbs$<path>$`), the terminator (the next
//! bare `rbs$`) and the header end (the line break after the header).

/// Start of the routing section. Nothing before it is scanned.
pub const ROUTE_ANCHOR: &str = "route6:";

/// Tag that opens a blob header and closes a blob payload.
pub const PROTOCOL_TAG: &str = "rbs$";

/// Separator between header fields.
pub const FIELD_DELIMITER: char = '$';

/// Content type used when the header does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Scan stage that failed to find its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// The record has no `route6:` section.
    MissingRouteSection,
    /// No `rbs$<path>$` header for the requested path.
    MissingHeader,
    /// The header is never followed by a closing `rbs$`.
    MissingTerminator,
}

impl NotFound {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFound::MissingRouteSection => "missing_route_section",
            NotFound::MissingHeader => "missing_header",
            NotFound::MissingTerminator => "missing_terminator",
        }
    }
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `rbs$<path>$<content-type>$` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHeader<'a> {
    /// Path the blob is served under.
    pub path: &'a str,
    /// Declared content type, verbatim, or [`DEFAULT_CONTENT_TYPE`].
    pub content_type: &'a str,
}

impl<'a> BlobHeader<'a> {
    /// Parse a header line. Split on `$`, segment 1 is the path and segment 2
    /// the content type. Later segments are ignored.
    pub fn parse(line: &'a str) -> Self {
        let mut fields = line.split(FIELD_DELIMITER);

        let path = fields.nth(1).unwrap_or_default();
        let content_type = fields
            .next()
            .filter(|content_type| !content_type.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        Self { path, content_type }
    }
}

/// One blob located inside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobSpan<'a> {
    pub header: BlobHeader<'a>,
    /// Text between the header line and the terminator, not yet normalized.
    pub payload: &'a str,
}

/// Locate the blob served under `path`.
pub fn locate<'a>(record: &'a str, path: &str) -> Result<BlobSpan<'a>, NotFound> {
    let scanner = Scanner::anchor(record)?;
    let header_start = scanner.header_start(path)?;
    let terminator = scanner.terminator(header_start)?;
    let header_end = scanner.header_end(header_start);

    let header = BlobHeader::parse(&scanner.section[header_start..header_end]);
    // A header that runs past the terminator leaves no room for a payload.
    let payload = scanner.section.get(header_end..terminator).unwrap_or_default();

    Ok(BlobSpan { header, payload })
}

/// Forward-only view over the routing section of a record.
struct Scanner<'a> {
    section: &'a str,
}

impl<'a> Scanner<'a> {
    fn anchor(record: &'a str) -> Result<Self, NotFound> {
        record
            .find(ROUTE_ANCHOR)
            .map(|ix| Self {
                section: &record[ix..],
            })
            .ok_or(NotFound::MissingRouteSection)
    }

    fn header_start(&self, path: &str) -> Result<usize, NotFound> {
        let marker = format!("{PROTOCOL_TAG}{path}{FIELD_DELIMITER}");
        self.section.find(&marker).ok_or(NotFound::MissingHeader)
    }

    /// The header opens with an ASCII tag, so `header_start + 1` is a char boundary.
    fn terminator(&self, header_start: usize) -> Result<usize, NotFound> {
        let from = header_start + 1;
        self.section[from..]
            .find(PROTOCOL_TAG)
            .map(|ix| from + ix)
            .ok_or(NotFound::MissingTerminator)
    }

    fn header_end(&self, header_start: usize) -> usize {
        self.section[header_start..]
            .find('\n')
            .map_or(self.section.len(), |ix| header_start + ix)
    }
}
