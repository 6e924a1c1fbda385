//! Lazy document-to-event generator.

use std::collections::{HashMap, VecDeque};

use crate::model::{BodyElement, Book, Chapter, Paragraph, Run, Table};
use crate::style::{Style, close_all, diff, relink};

use super::{Event, slugify};

/// Alt text attached to every image event.
pub const IMAGE_ALT_TEXT: &str = "image";

/// Stream the events of a book.
pub fn events(book: &Book) -> EventStream<'_> {
    EventStream::new(book)
}

/// Pull-based iterator over the events of one book.
///
/// The generator keeps an explicit stack of cursors (body, table, run list)
/// and advances only as far as needed to produce the next event, so a
/// consumer that stops early leaves the rest of the document untouched.
/// Dropping the stream is the only cancellation needed. To traverse again,
/// build a new stream.
pub struct EventStream<'a> {
    chapters: HashMap<&'a str, &'a Chapter>,
    objects: &'a HashMap<String, String>,
    stack: Vec<Frame<'a>>,
    pending: VecDeque<Event>,
}

impl<'a> EventStream<'a> {
    pub fn new(book: &'a Book) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(Event::StartDoc {
            title: book.title.clone(),
        });

        Self {
            chapters: book.chapter_index(),
            objects: &book.inline_objects,
            stack: vec![Frame::Blocks(BlockCursor::document(&book.body, &book.title))],
            pending,
        }
    }

    /// Advance the innermost cursor by one step.
    fn step(&mut self) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };

        let next = match frame {
            Frame::Blocks(cursor) => cursor.step(&self.chapters, &mut self.pending),
            Frame::Table(cursor) => cursor.step(&mut self.pending),
            Frame::Runs(cursor) => cursor.step(self.objects, &mut self.pending),
        };

        match next {
            Step::Continue => {}
            Step::Enter(frame) => self.stack.push(frame),
            Step::Leave => {
                self.stack.pop();
            }
        }
    }
}

impl Iterator for EventStream<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.stack.is_empty() {
                return None;
            }
            self.step();
        }
    }
}

enum Frame<'a> {
    Blocks(BlockCursor<'a>),
    Table(TableCursor<'a>),
    Runs(RunCursor<'a>),
}

/// What the stack should do after a cursor step.
enum Step<'a> {
    Continue,
    Enter(Frame<'a>),
    Leave,
}

/// Where a block sequence lives. Chapter headings only bind at document
/// level; cells have no chapter reference.
#[derive(Clone, Copy)]
enum Scope<'a> {
    Document { title: &'a str },
    Cell,
}

#[derive(Clone, Copy)]
struct OpenList {
    level: u32,
    ordered: bool,
}

struct BlockCursor<'a> {
    blocks: &'a [BodyElement],
    index: usize,
    scope: Scope<'a>,
    list: Option<OpenList>,
}

impl<'a> BlockCursor<'a> {
    fn document(blocks: &'a [BodyElement], title: &'a str) -> Self {
        Self {
            blocks,
            index: 0,
            scope: Scope::Document { title },
            list: None,
        }
    }

    fn cell(blocks: &'a [BodyElement]) -> Self {
        Self {
            blocks,
            index: 0,
            scope: Scope::Cell,
            list: None,
        }
    }

    fn step(
        &mut self,
        chapters: &HashMap<&'a str, &'a Chapter>,
        out: &mut VecDeque<Event>,
    ) -> Step<'a> {
        let blocks: &'a [BodyElement] = self.blocks;
        let Some(block) = blocks.get(self.index) else {
            self.close_list(out);
            if let Scope::Document { title } = self.scope {
                out.push_back(Event::EndDoc {
                    title: title.to_string(),
                });
            }
            return Step::Leave;
        };
        self.index += 1;

        match block {
            BodyElement::Table(table) => {
                self.close_list(out);
                out.push_back(Event::StartTable {
                    columns: table.columns(),
                    rows: table.rows(),
                });
                Step::Enter(Frame::Table(TableCursor::new(table)))
            }
            BodyElement::Paragraph(paragraph) => self.paragraph(paragraph, chapters, out),
        }
    }

    fn paragraph(
        &mut self,
        paragraph: &'a Paragraph,
        chapters: &HashMap<&'a str, &'a Chapter>,
        out: &mut VecDeque<Event>,
    ) -> Step<'a> {
        let named_style = paragraph.named_style();

        if let Some(chapter) = self.chapter_for(paragraph, chapters) {
            // The chapter title is the canonical heading text; runs are not streamed.
            self.close_list(out);
            push_heading(out, named_style.heading_level(), &chapter.title);
            return Step::Continue;
        }

        let has_text = paragraph.has_text();
        if !has_text && !paragraph.has_inline_objects() {
            return Step::Continue;
        }

        if named_style.is_heading() {
            if !has_text {
                return Step::Continue;
            }
            self.close_list(out);
            push_heading(out, named_style.heading_level(), &paragraph.plain_text());
            return Step::Continue;
        }

        match &paragraph.bullet {
            Some(bullet) => {
                if self.list.is_none() {
                    let list = OpenList {
                        level: 0,
                        ordered: bullet.ordered,
                    };
                    out.push_back(Event::StartList {
                        level: list.level,
                        ordered: list.ordered,
                    });
                    self.list = Some(list);
                }
            }
            None => self.close_list(out),
        }

        out.push_back(Event::StartParagraph);
        Step::Enter(Frame::Runs(RunCursor::new(
            &paragraph.elements,
            Event::EndParagraph,
        )))
    }

    fn chapter_for(
        &self,
        paragraph: &Paragraph,
        chapters: &HashMap<&'a str, &'a Chapter>,
    ) -> Option<&'a Chapter> {
        if !matches!(self.scope, Scope::Document { .. }) {
            return None;
        }
        let id = paragraph.heading_id.as_deref()?;
        chapters.get(id).copied()
    }

    fn close_list(&mut self, out: &mut VecDeque<Event>) {
        if let Some(list) = self.list.take() {
            out.push_back(Event::EndList {
                level: list.level,
                ordered: list.ordered,
            });
        }
    }
}

fn push_heading(out: &mut VecDeque<Event>, level: u8, text: &str) {
    let anchor = slugify(text);
    out.push_back(Event::StartHeading {
        level,
        text: text.to_string(),
        anchor: anchor.clone(),
    });
    out.push_back(Event::EndHeading {
        level,
        text: text.to_string(),
        anchor,
    });
}

struct TableCursor<'a> {
    table: &'a Table,
    row: usize,
    cell: usize,
    row_open: bool,
    cell_open: bool,
}

impl<'a> TableCursor<'a> {
    fn new(table: &'a Table) -> Self {
        Self {
            table,
            row: 0,
            cell: 0,
            row_open: false,
            cell_open: false,
        }
    }

    fn step(&mut self, out: &mut VecDeque<Event>) -> Step<'a> {
        if self.cell_open {
            out.push_back(Event::EndTableCell);
            self.cell_open = false;
            self.cell += 1;
        }

        let table: &'a Table = self.table;
        let Some(row) = table.table_rows.get(self.row) else {
            out.push_back(Event::EndTable {
                columns: table.columns(),
                rows: table.rows(),
            });
            return Step::Leave;
        };

        if !self.row_open {
            out.push_back(Event::StartTableRow);
            self.row_open = true;
        }

        if let Some(cell) = row.table_cells.get(self.cell) {
            out.push_back(Event::StartTableCell);
            self.cell_open = true;
            return Step::Enter(Frame::Blocks(BlockCursor::cell(&cell.content)));
        }

        out.push_back(Event::EndTableRow);
        self.row_open = false;
        self.row += 1;
        self.cell = 0;
        Step::Continue
    }
}

/// Streams one run list, tracking the open formatting between runs.
struct RunCursor<'a> {
    runs: &'a [Run],
    index: usize,
    style: Style,
    link: Option<&'a str>,
    end: Option<Event>,
}

impl<'a> RunCursor<'a> {
    fn new(runs: &'a [Run], end: Event) -> Self {
        Self {
            runs,
            index: 0,
            style: Style::EMPTY,
            link: None,
            end: Some(end),
        }
    }

    fn step(&mut self, objects: &HashMap<String, String>, out: &mut VecDeque<Event>) -> Step<'a> {
        let runs: &'a [Run] = self.runs;
        let Some(run) = runs.get(self.index) else {
            for flag in close_all(self.style) {
                out.push_back(Event::EndFormatting {
                    style: flag,
                    link: self.link.map(str::to_string),
                });
            }
            self.style = Style::EMPTY;
            self.link = None;
            if let Some(end) = self.end.take() {
                out.push_back(end);
            }
            return Step::Leave;
        };
        self.index += 1;

        match run {
            Run::TextRun(text) => {
                let style = Style::of(&text.text_style);
                let link = text.text_style.link_url();
                self.transition(style, link, out);
                if !text.content.is_empty() {
                    out.push_back(Event::Text(text.content.clone()));
                }
            }
            Run::InlineObjectElement(object) => match objects.get(&object.inline_object_id) {
                Some(url) => out.push_back(Event::Image {
                    url: url.clone(),
                    alt: IMAGE_ALT_TEXT.to_string(),
                }),
                None => log::debug!(
                    "skipping unresolved inline object {:?}",
                    object.inline_object_id
                ),
            },
            Run::PageBreak | Run::HorizontalRule => {}
        }

        Step::Continue
    }

    fn transition(&mut self, style: Style, link: Option<&'a str>, out: &mut VecDeque<Event>) {
        if style == self.style && link == self.link {
            return;
        }

        let both_linked = self.style.contains(Style::LINK) && style.contains(Style::LINK);
        let transitions = if both_linked && link != self.link {
            relink(self.style, style)
        } else {
            diff(self.style, style)
        };

        for flag in transitions.close {
            out.push_back(Event::EndFormatting {
                style: flag,
                link: self.link.map(str::to_string),
            });
        }
        for flag in transitions.open {
            out.push_back(Event::StartFormatting {
                style: flag,
                link: link.map(str::to_string),
            });
        }

        self.style = style;
        self.link = link;
    }
}
