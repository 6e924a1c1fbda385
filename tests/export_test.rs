//! Export tests.
//!
//! End-to-end tests for `export_book`: every format written to a temporary
//! directory, EPUB archives read back, and per-format failure reporting.

use std::fs;
use std::io::{Cursor, Read};

use docstream::export::{ExportConfig, Format};
use docstream::model::{
    BodyElement, Bullet, Chapter, NamedStyle, Paragraph, Run, Table, TableCell, TableRow,
    TextStyle,
};
use docstream::{Book, Error, export_book, optimize};
use tempfile::TempDir;
use zip::ZipArchive;

fn sample_book() -> Book {
    let mut book = Book::new("Field Guide")
        .with_chapter(Chapter::new("Getting Started", "h.start"))
        .with_inline_object("kix.1", "https://img.example/map.png");

    book.push_paragraph(
        Paragraph::new(vec![Run::text("Getting Started\n")])
            .with_named_style(NamedStyle::Heading1)
            .with_heading_id("h.start"),
    );
    book.push_paragraph(Paragraph::new(vec![
        Run::text("Read the "),
        Run::styled("manual", TextStyle::bold()),
        Run::text(" or visit "),
        Run::styled("the site", TextStyle::linked("https://example.com/docs")),
        Run::text(".\n"),
    ]));
    let bullet = Bullet::new("l1", 0, false);
    book.push_paragraph(Paragraph::new(vec![Run::text("pack light\n")]).with_bullet(bullet.clone()));
    book.push_paragraph(Paragraph::new(vec![Run::text("bring water\n")]).with_bullet(bullet));
    book.push_table(Table::new(vec![
        TableRow::new(vec![
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text("Day")]))]),
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text(
                "Distance",
            )]))]),
        ]),
        TableRow::new(vec![
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text("1")]))]),
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text(
                "12 km",
            )]))]),
        ]),
    ]));
    book.push_paragraph(Paragraph::new(vec![Run::inline_object("kix.1")]));
    book
}

// ============================================================================
// All Formats
// ============================================================================

#[test]
fn test_export_all_formats() {
    let dir = TempDir::new().unwrap();
    let mut book = sample_book();
    optimize(&mut book);

    let config = ExportConfig::new(dir.path(), Format::ALL.to_vec());
    let report = export_book(&book, "guide", &config);

    assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
    assert_eq!(report.book, "guide");
    assert_eq!(report.outputs.len(), 5);

    for format in Format::ALL {
        let path = dir.path().join(format!("guide.{}", format.extension()));
        assert!(path.exists(), "missing {}", path.display());
    }
}

#[test]
fn test_markdown_output() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::new(dir.path(), vec![Format::Markdown]);
    export_book(&sample_book(), "guide", &config);

    let markdown = fs::read_to_string(dir.path().join("guide.md")).unwrap();
    assert_eq!(
        markdown,
        "# Field Guide\n\n\
         ## Getting Started\n\n\
         Read the **manual** or visit [the site](https://example.com/docs).\n\n\
         - pack light\n\
         - bring water\n\n\
         | Day | Distance |\n\
         | --- | --- |\n\
         | 1 | 12 km |\n\n\
         ![image](https://img.example/map.png)\n"
    );
}

#[test]
fn test_html_output() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::new(dir.path(), vec![Format::Html]);
    export_book(&sample_book(), "guide", &config);

    let html = fs::read_to_string(dir.path().join("guide.html")).unwrap();
    assert!(html.contains("<h2 id=\"getting-started\">Getting Started</h2>"));
    assert!(html.contains("<strong>manual</strong>"));
    assert!(html.contains("<a href=\"https://example.com/docs\">the site</a>"));
    assert!(html.contains("<ul>\n<li>pack light\n</li>\n<li>bring water\n</li>\n</ul>"));
    assert!(html.contains("<img src=\"https://img.example/map.png\" alt=\"image\"/>"));
}

#[test]
fn test_latex_output() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::new(dir.path(), vec![Format::Latex]);
    export_book(&sample_book(), "guide", &config);

    let tex = fs::read_to_string(dir.path().join("guide.tex")).unwrap();
    assert!(tex.contains("\\section{Getting Started}\\label{getting-started}"));
    assert!(tex.contains("\\textbf{manual}"));
    assert!(tex.contains("\\href{https://example.com/docs}{the site}"));
    assert!(tex.contains("\\begin{itemize}\n  \\item pack light\n  \\item bring water\n\\end{itemize}"));
    assert!(tex.contains("Day & Distance \\\\"));
}

#[test]
fn test_plaintext_output() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::new(dir.path(), vec![Format::Plaintext]);
    export_book(&sample_book(), "guide", &config);

    let text = fs::read_to_string(dir.path().join("guide.txt")).unwrap();
    assert!(text.starts_with("Field Guide\n===========\n\nGetting Started\n---------------\n"));
    assert!(text.contains("the site <https://example.com/docs>."));
    assert!(text.contains("* pack light\n* bring water"));
    assert!(text.contains("Day | Distance\n1 | 12 km"));
}

// ============================================================================
// EPUB
// ============================================================================

#[test]
fn test_epub_archive_readback() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::new(dir.path(), vec![Format::Epub]);
    let report = export_book(&sample_book(), "guide", &config);
    assert!(report.is_success());

    let bytes = fs::read(dir.path().join("guide.epub")).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    for expected in [
        "mimetype",
        "META-INF/container.xml",
        "OEBPS/content.opf",
        "OEBPS/nav.xhtml",
        "OEBPS/content.xhtml",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    {
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        let mut mimetype = String::new();
        first.read_to_string(&mut mimetype).unwrap();
        assert_eq!(mimetype, "application/epub+zip");
    }

    let mut nav = String::new();
    archive
        .by_name("OEBPS/nav.xhtml")
        .unwrap()
        .read_to_string(&mut nav)
        .unwrap();
    assert!(nav.contains("content.xhtml#getting-started"));

    let mut opf = String::new();
    archive
        .by_name("OEBPS/content.opf")
        .unwrap()
        .read_to_string(&mut opf)
        .unwrap();
    assert!(opf.contains("<dc:title>Field Guide</dc:title>"));
    assert!(opf.contains("remote-resources"));
}

// ============================================================================
// Failure Reporting
// ============================================================================

#[test]
fn test_write_failure_is_reported_per_format() {
    let dir = TempDir::new().unwrap();
    // A directory where the HTML file should go makes that one write fail.
    fs::create_dir(dir.path().join("guide.html")).unwrap();

    let config = ExportConfig::new(dir.path(), vec![Format::Markdown, Format::Html, Format::Plaintext]);
    let report = export_book(&sample_book(), "guide", &config);

    assert!(!report.is_success());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Format::Html);
    assert!(matches!(failures[0].1, Error::Io(_)));

    assert!(dir.path().join("guide.md").is_file());
    assert!(dir.path().join("guide.txt").is_file());
}

#[test]
fn test_output_dir_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let config = ExportConfig::new(&nested, vec![Format::Markdown]);

    assert!(export_book(&sample_book(), "guide", &config).is_success());
    assert!(nested.join("guide.md").is_file());
}

// ============================================================================
// JSON Loading
// ============================================================================

#[test]
fn test_open_json_book() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(
        &path,
        r#"{
            "title": "Notes",
            "body": [
                { "paragraph": { "elements": [
                    { "textRun": { "content": "plain " } },
                    { "textRun": { "content": "bold", "textStyle": { "bold": true } } }
                ] } }
            ]
        }"#,
    )
    .unwrap();

    let book = Book::open(&path).unwrap();
    assert_eq!(book.title, "Notes");

    let out = dir.path().join("out");
    let report = export_book(&book, "notes", &ExportConfig::new(&out, vec![Format::Markdown]));
    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(out.join("notes.md")).unwrap(),
        "# Notes\n\nplain **bold**\n"
    );
}

#[test]
fn test_open_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Book::open(&path), Err(Error::InvalidDocument(_))));
}
