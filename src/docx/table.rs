//! The vertical merge pass for tables.
//!
//! Word encodes merged cells as a normal cell in the first row plus
//! continuation cells below it. This pass rewrites that into explicit
//! `rowspan`s: the starting cell absorbs each continuation that begins at the
//! same column offset, and the continuations are removed.

use std::collections::{HashMap, HashSet};

use crate::common::{Message, WithMessages};

use super::document::DocumentElement;

/// Fold vertical-merge continuation cells into their starting cell.
///
/// If the table contains anything other than rows of cells the content is
/// left untouched and a warning is raised instead; the shape is too irregular
/// to merge safely.
pub(crate) fn calculate_row_spans(
    rows: Vec<DocumentElement>,
) -> WithMessages<Vec<DocumentElement>> {
    let all_rows = rows
        .iter()
        .all(|row| matches!(row, DocumentElement::TableRow(_)));
    if !all_rows {
        return WithMessages::with(
            rows,
            vec![Message::warning(
                "unexpected non-row element in table, cell merging may be incorrect",
            )],
        );
    }
    let all_cells = rows.iter().all(|row| match row {
        DocumentElement::TableRow(row) => row
            .children
            .iter()
            .all(|cell| matches!(cell, DocumentElement::TableCell(_))),
        _ => true,
    });
    if !all_cells {
        return WithMessages::with(
            rows,
            vec![Message::warning(
                "unexpected non-cell element in table row, cell merging may be incorrect",
            )],
        );
    }

    let mut rows = rows;
    // Starting column offset → (row index, cell index) of the current owner.
    let mut owners: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut span_increments: HashMap<(usize, usize), usize> = HashMap::new();
    let mut removed: HashSet<(usize, usize)> = HashSet::new();

    for (row_index, row) in rows.iter().enumerate() {
        let DocumentElement::TableRow(row) = row else {
            continue;
        };
        let mut column = 0;
        for (cell_index, cell) in row.children.iter().enumerate() {
            let DocumentElement::TableCell(cell) = cell else {
                continue;
            };
            match owners.get(&column) {
                Some(&owner) if cell.vmerge => {
                    *span_increments.entry(owner).or_insert(0) += 1;
                    removed.insert((row_index, cell_index));
                }
                _ => {
                    owners.insert(column, (row_index, cell_index));
                }
            }
            column += cell.colspan;
        }
    }

    for ((row_index, cell_index), increment) in span_increments {
        if let DocumentElement::TableRow(row) = &mut rows[row_index] {
            if let DocumentElement::TableCell(cell) = &mut row.children[cell_index] {
                cell.rowspan += increment;
            }
        }
    }
    for (row_index, row) in rows.iter_mut().enumerate() {
        let DocumentElement::TableRow(row) = row else {
            continue;
        };
        let mut cell_index = 0;
        row.children.retain(|_| {
            let keep = !removed.contains(&(row_index, cell_index));
            cell_index += 1;
            keep
        });
        for cell in &mut row.children {
            if let DocumentElement::TableCell(cell) = cell {
                cell.vmerge = false;
            }
        }
    }

    WithMessages::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::document::{TableCell, TableRow};

    fn row(cells: Vec<DocumentElement>) -> DocumentElement {
        DocumentElement::TableRow(TableRow {
            children: cells,
            is_header: false,
        })
    }

    fn cell(colspan: usize, vmerge: bool) -> DocumentElement {
        let mut cell = TableCell::new(vec![], colspan);
        cell.vmerge = vmerge;
        DocumentElement::TableCell(cell)
    }

    fn spans(rows: &[DocumentElement]) -> Vec<Vec<(usize, usize)>> {
        rows.iter()
            .map(|row| match row {
                DocumentElement::TableRow(row) => row
                    .children
                    .iter()
                    .map(|cell| match cell {
                        DocumentElement::TableCell(cell) => (cell.colspan, cell.rowspan),
                        _ => panic!("expected a cell"),
                    })
                    .collect(),
                _ => panic!("expected a row"),
            })
            .collect()
    }

    #[test]
    fn test_continuation_cells_fold_into_starting_cell() {
        let result = calculate_row_spans(vec![
            row(vec![cell(1, false), cell(1, false)]),
            row(vec![cell(1, true), cell(1, false)]),
            row(vec![cell(1, true), cell(1, false)]),
        ]);
        assert!(result.messages.is_empty());
        assert_eq!(
            spans(&result.value),
            vec![vec![(1, 3), (1, 1)], vec![(1, 1)], vec![(1, 1)]]
        );
    }

    #[test]
    fn test_cells_at_different_column_offsets_do_not_merge() {
        // The continuation starts at column 2 but the candidate above starts
        // at column 0, so both stay separate single-row cells.
        let result = calculate_row_spans(vec![
            row(vec![cell(2, false)]),
            row(vec![cell(1, false), cell(1, true)]),
        ]);
        assert!(result.messages.is_empty());
        assert_eq!(spans(&result.value), vec![vec![(2, 1)], vec![(1, 1), (1, 1)]]);
    }

    #[test]
    fn test_merge_pass_is_idempotent() {
        let once = calculate_row_spans(vec![
            row(vec![cell(1, false)]),
            row(vec![cell(1, true)]),
        ]);
        let twice = calculate_row_spans(once.value.clone());
        assert_eq!(once.value, twice.value);
        assert!(twice.messages.is_empty());
    }

    #[test]
    fn test_non_row_content_warns_and_is_left_untouched() {
        let input = vec![
            DocumentElement::Text("not a row".to_string()),
            row(vec![cell(1, true)]),
        ];
        let result = calculate_row_spans(input.clone());
        assert_eq!(result.value, input);
        assert_eq!(
            result.messages,
            vec![Message::warning(
                "unexpected non-row element in table, cell merging may be incorrect"
            )]
        );
    }

    #[test]
    fn test_non_cell_content_warns_and_is_left_untouched() {
        let input = vec![row(vec![DocumentElement::Text("not a cell".to_string())])];
        let result = calculate_row_spans(input.clone());
        assert_eq!(result.value, input);
        assert_eq!(
            result.messages,
            vec![Message::warning(
                "unexpected non-cell element in table row, cell merging may be incorrect"
            )]
        );
    }
}
