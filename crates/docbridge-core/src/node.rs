use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Normalized document content node.
///
/// The variant set is closed: backends normalize their native representation
/// into exactly these shapes, and the engine matches exhaustively. Parents
/// exclusively own their children and document order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Text(String),
    Paragraph(Vec<Node>),
    Table(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    Image { uri: String },
    ThematicBreak,
}

impl Node {
    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph(children)
            | Node::Table(children)
            | Node::TableRow(children)
            | Node::TableCell(children) => children,
            Node::Text(_) | Node::Image { .. } | Node::ThematicBreak => &[],
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Node::Table(_))
    }

    /// Text content of this subtree. Inline runs are concatenated;
    /// block-level children (table rows, cells, cell paragraphs) are joined
    /// with a newline.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Paragraph(children) => {
                children.iter().map(Node::plain_text).collect::<String>()
            }
            Node::Table(children) | Node::TableRow(children) | Node::TableCell(children) => {
                children
                    .iter()
                    .map(Node::plain_text)
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Node::Image { .. } | Node::ThematicBreak => String::new(),
        }
    }

    /// Build a table row from plain cell values. Multi-line values become one
    /// paragraph per line, so `plain_text` reproduces the input.
    pub fn table_row(cells: &[String]) -> Node {
        Node::TableRow(
            cells
                .iter()
                .map(|cell| {
                    Node::TableCell(
                        cell.split('\n')
                            .map(|line| Node::Paragraph(vec![Node::Text(line.to_string())]))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    /// Build a table from a rectangular value matrix, first row included.
    pub fn table_from_matrix(data: &[Vec<String>]) -> Node {
        Node::Table(data.iter().map(|row| Node::table_row(row)).collect())
    }
}

/// Rectangular matrix of plain cell values, row-major.
pub type CellMatrix = Vec<Vec<String>>;

/// Check that `data` is non-empty and rectangular.
pub fn validate_matrix(data: &CellMatrix) -> Result<(), StoreError> {
    let first = match data.first() {
        Some(row) => row,
        None => {
            return Err(StoreError::InvalidArgument(
                "data matrix must not be empty".to_string(),
            ))
        }
    };
    if first.is_empty() {
        return Err(StoreError::InvalidArgument(
            "data matrix rows must not be empty".to_string(),
        ));
    }
    if let Some(row) = data.iter().find(|row| row.len() != first.len()) {
        return Err(StoreError::InvalidArgument(format!(
            "data matrix is not rectangular: expected {} columns, found {}",
            first.len(),
            row.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matrix(rows: &[&[&str]]) -> CellMatrix {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn plain_text_joins_cell_paragraphs_with_newline() {
        let cell = Node::TableCell(vec![
            Node::Paragraph(vec![Node::Text("first".to_string())]),
            Node::Paragraph(vec![Node::Text("second".to_string())]),
        ]);
        assert_eq!(cell.plain_text(), "first\nsecond");
    }

    #[test]
    fn table_from_matrix_round_trips_multiline_values() {
        let table = Node::table_from_matrix(&matrix(&[&["Key", "a\nb"]]));
        let Node::Table(rows) = &table else {
            panic!("expected a table");
        };
        let Node::TableRow(cells) = &rows[0] else {
            panic!("expected a row");
        };
        assert_eq!(cells[0].plain_text(), "Key");
        assert_eq!(cells[1].plain_text(), "a\nb");
    }

    #[test]
    fn validate_matrix_rejects_empty_and_ragged_input() {
        assert!(validate_matrix(&matrix(&[&["a", "b"], &["c", "d"]])).is_ok());
        assert!(matches!(
            validate_matrix(&Vec::new()),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_matrix(&matrix(&[&[]])),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_matrix(&matrix(&[&["a", "b"], &["c"]])),
            Err(StoreError::InvalidArgument(_))
        ));
    }
}
