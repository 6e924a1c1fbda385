//! EPUB 3 renderer.
//!
//! Packages the document as a single XHTML content document plus a
//! navigation document built from the headings seen in the stream.
//!
//! ## Layout
//!
//! ```text
//! mimetype                  stored, first entry
//! META-INF/container.xml
//! OEBPS/content.opf
//! OEBPS/nav.xhtml
//! OEBPS/content.xhtml
//! ```
//!
//! Images stay remote: the content document references them by URL and the
//! manifest item is flagged `remote-resources`.

use std::io::{Cursor, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::events::Event;
use crate::Result;

use super::escape::escape_xml;
use super::html::HtmlBody;
use super::{Format, Renderer};

/// Configuration for EPUB export.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// `dc:language` of the publication.
    pub language: String,
    /// `dcterms:modified` timestamp (`YYYY-MM-DDThh:mm:ssZ`). Defaults to
    /// the time the archive is built.
    pub modified: Option<String>,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            language: "en".to_string(),
            modified: None,
        }
    }
}

/// EPUB format renderer.
#[derive(Debug, Default)]
pub struct EpubRenderer {
    config: EpubConfig,
    body: HtmlBody,
    remote_resources: bool,
}

impl EpubRenderer {
    /// Create a new renderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the renderer with custom settings.
    pub fn with_config(config: EpubConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn title(&self) -> &str {
        let title = self.body.title.trim();
        if title.is_empty() { "Untitled" } else { title }
    }

    fn content_document(&self) -> String {
        let title = escape_xml(self.title());
        let lang = escape_xml(&self.config.language);
        let mut out = String::with_capacity(self.body.markup().len() + 512);
        out.push_str(&xhtml_head(&title, &lang));
        if !self.body.title.trim().is_empty() {
            out.push_str(&format!("<h1>{title}</h1>\n"));
        }
        out.push_str(self.body.markup());
        out.push_str("</body>\n</html>\n");
        out
    }

    fn nav_document(&self) -> String {
        let title = escape_xml(self.title());
        let lang = escape_xml(&self.config.language);
        let mut out = xhtml_head(&title, &lang);
        out.push_str("<nav epub:type=\"toc\" id=\"toc\">\n");
        out.push_str(&format!("<h1>{title}</h1>\n<ol>\n"));

        let entries: Vec<_> = self
            .body
            .headings
            .iter()
            .filter(|h| !h.anchor.is_empty())
            .collect();
        if entries.is_empty() {
            out.push_str(&format!("<li><a href=\"content.xhtml\">{title}</a></li>\n"));
        }
        for heading in entries {
            out.push_str(&format!(
                "<li><a href=\"content.xhtml#{}\">{}</a></li>\n",
                escape_xml(&heading.anchor),
                escape_xml(&heading.text)
            ));
        }

        out.push_str("</ol>\n</nav>\n</body>\n</html>\n");
        out
    }

    fn package_document(&self) -> String {
        let identifier = sha1_smol::Sha1::from(self.body.title.as_bytes())
            .digest()
            .to_string();
        let modified = self
            .config
            .modified
            .clone()
            .unwrap_or_else(|| iso8601(now_secs()));
        let properties = if self.remote_resources {
            " properties=\"remote-resources\""
        } else {
            ""
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="BookId">urn:sha1:{identifier}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>{language}</dc:language>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="content" href="content.xhtml" media-type="application/xhtml+xml"{properties}/>
  </manifest>
  <spine>
    <itemref idref="content"/>
  </spine>
</package>
"#,
            title = escape_xml(self.title()),
            language = escape_xml(&self.config.language),
            modified = escape_xml(&modified),
        )
    }
}

impl Renderer for EpubRenderer {
    fn format(&self) -> Format {
        Format::Epub
    }

    fn handle(&mut self, event: &Event) {
        if matches!(event, Event::Image { .. }) {
            self.remote_resources = true;
        }
        self.body.handle(event);
    }

    fn result(&mut self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let compression_level = self.config.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(compression_level)));

        // mimetype must be first and uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(self.package_document().as_bytes())?;

        zip.start_file("OEBPS/nav.xhtml", deflated)?;
        zip.write_all(self.nav_document().as_bytes())?;

        zip.start_file("OEBPS/content.xhtml", deflated)?;
        zip.write_all(self.content_document().as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn xhtml_head(title: &str, lang: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
<meta charset="utf-8"/>
<title>{title}</title>
</head>
<body>
"#
    )
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Format seconds since the Unix epoch as `YYYY-MM-DDThh:mm:ssZ`.
fn iso8601(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
