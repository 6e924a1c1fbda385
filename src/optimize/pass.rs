//! Traversal utilities for optimization passes.

use crate::model::{BodyElement, Book, Paragraph};

/// Visit every paragraph of the book in document order, including the
/// paragraphs nested inside table cells.
pub fn walk_paragraphs_mut<F>(book: &mut Book, mut visitor: F)
where
    F: FnMut(&mut Paragraph),
{
    walk_blocks(&mut book.body, &mut visitor);
}

fn walk_blocks<F>(blocks: &mut [BodyElement], visitor: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    for block in blocks {
        match block {
            BodyElement::Paragraph(paragraph) => visitor(paragraph),
            BodyElement::Table(table) => {
                for row in &mut table.table_rows {
                    for cell in &mut row.table_cells {
                        walk_blocks(&mut cell.content, visitor);
                    }
                }
            }
        }
    }
}
