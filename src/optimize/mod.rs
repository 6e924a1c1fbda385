//! Document optimization passes.
//!
//! Passes run after loading but before event generation. They follow the
//! same rules as the rest of the pipeline: O(n) traversal, in-place mutation,
//! no reordering of content.
//!
//! ## Passes
//!
//! 1. **Run merge** - Coalesce adjacent text runs that render identically
//!
//! The pass is applied to every paragraph, including those inside table
//! cells, exactly once per export job.

mod merge;
mod pass;
mod predicates;

use crate::model::Book;

pub use merge::consolidate_runs;
pub use pass::walk_paragraphs_mut;

/// Run all optimization passes on a book.
///
/// Returns the number of runs removed by consolidation.
pub fn optimize(book: &mut Book) -> usize {
    let mut removed = 0;
    walk_paragraphs_mut(book, |paragraph| {
        removed += consolidate_runs(paragraph);
    });
    log::debug!("consolidated {removed} fragmented runs in {:?}", book.title);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BodyElement, Paragraph, Run, Table, TableCell, TableRow, TextStyle};

    #[test]
    fn test_full_pipeline_reaches_table_cells() {
        let fragmented = || {
            Paragraph::new(vec![
                Run::styled("T", TextStyle::bold()),
                Run::styled("HE ", TextStyle::bold()),
            ])
        };

        let mut book = Book::new("Book");
        book.push_paragraph(fragmented());
        book.push_table(Table::new(vec![TableRow::new(vec![TableCell::new(vec![
            BodyElement::Paragraph(fragmented()),
        ])])]));

        assert_eq!(optimize(&mut book), 2);

        let BodyElement::Paragraph(para) = &book.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.elements.len(), 1);

        let BodyElement::Table(table) = &book.body[1] else {
            panic!("expected table");
        };
        let BodyElement::Paragraph(cell_para) = &table.table_rows[0].table_cells[0].content[0]
        else {
            panic!("expected paragraph in cell");
        };
        assert_eq!(cell_para.elements, vec![Run::styled("THE ", TextStyle::bold())]);
    }
}
