use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Paragraph texts that act as section separators in the native form.
pub const BREAK_MARKERS: [&str; 2] = ["---", "—"];

/// Offset-addressed native document snapshot.
///
/// Backends with a position-addressed edit protocol expose their raw content
/// as an ordered list of elements carrying the integer offsets the write
/// protocol anchors on. The snapshot is fetched fresh for every logical
/// operation and discarded after the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeDocument {
    pub elements: Vec<NativeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeElement {
    pub start_offset: usize,
    pub end_offset: usize,
    pub body: NativeBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NativeBody {
    Paragraph { text: String },
    Table(NativeTable),
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTable {
    pub rows: Vec<NativeTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTableRow {
    pub start_offset: usize,
    pub end_offset: usize,
    pub cells: Vec<NativeTableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTableCell {
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

impl NativeElement {
    /// Whether this element is a section separator.
    pub fn is_break(&self) -> bool {
        match &self.body {
            NativeBody::Paragraph { text } => BREAK_MARKERS.contains(&text.trim()),
            _ => false,
        }
    }

    /// Whether this element contributes a node to the normalized tree.
    /// Break markers, blank paragraphs, and unsupported elements do not count
    /// as positions within a section.
    pub fn is_substantive(&self) -> bool {
        match &self.body {
            NativeBody::Paragraph { text } => !self.is_break() && !text.trim().is_empty(),
            NativeBody::Table(_) => true,
            NativeBody::Other => false,
        }
    }
}

impl NativeDocument {
    /// Offset of the start of the document body.
    pub fn body_start(&self) -> usize {
        self.elements.first().map(|el| el.start_offset).unwrap_or(1)
    }

    /// Normalize the native form into the common node model.
    ///
    /// Break-marker paragraphs become `ThematicBreak`, blank paragraphs and
    /// unsupported elements are dropped, and multi-line cell text becomes one
    /// paragraph per line. Document order is preserved.
    pub fn normalize(&self) -> Vec<Node> {
        self.elements
            .iter()
            .filter_map(|el| match &el.body {
                NativeBody::Paragraph { text } => {
                    if el.is_break() {
                        Some(Node::ThematicBreak)
                    } else if text.trim().is_empty() {
                        // Same emptiness rule as `is_substantive`, so normalized
                        // positions stay 1:1 with the offset scan.
                        None
                    } else {
                        Some(Node::Paragraph(vec![Node::Text(
                            text.trim_end_matches('\n').to_string(),
                        )]))
                    }
                }
                NativeBody::Table(table) => Some(Node::Table(
                    table
                        .rows
                        .iter()
                        .map(|row| {
                            Node::TableRow(
                                row.cells
                                    .iter()
                                    .map(|cell| {
                                        Node::TableCell(
                                            cell.text
                                                .trim_end_matches('\n')
                                                .split('\n')
                                                .filter(|line| !line.is_empty())
                                                .map(|line| {
                                                    Node::Paragraph(vec![Node::Text(
                                                        line.to_string(),
                                                    )])
                                                })
                                                .collect(),
                                        )
                                    })
                                    .collect(),
                            )
                        })
                        .collect(),
                )),
                NativeBody::Other => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para(start: usize, end: usize, text: &str) -> NativeElement {
        NativeElement {
            start_offset: start,
            end_offset: end,
            body: NativeBody::Paragraph {
                text: text.to_string(),
            },
        }
    }

    #[test]
    fn normalize_maps_break_markers_and_drops_blanks() {
        let doc = NativeDocument {
            elements: vec![
                para(1, 5, "Intro\n"),
                para(5, 9, "---\n"),
                para(9, 10, "\n"),
                para(10, 12, " \t\n"),
                para(12, 14, "—\n"),
                para(14, 20, "Outro\n"),
            ],
        };
        assert_eq!(
            doc.normalize(),
            vec![
                Node::Paragraph(vec![Node::Text("Intro".to_string())]),
                Node::ThematicBreak,
                Node::ThematicBreak,
                Node::Paragraph(vec![Node::Text("Outro".to_string())]),
            ]
        );
    }

    #[test]
    fn normalize_splits_multiline_cell_text_into_paragraphs() {
        let doc = NativeDocument {
            elements: vec![NativeElement {
                start_offset: 1,
                end_offset: 30,
                body: NativeBody::Table(NativeTable {
                    rows: vec![NativeTableRow {
                        start_offset: 2,
                        end_offset: 29,
                        cells: vec![NativeTableCell {
                            start_offset: 3,
                            end_offset: 28,
                            text: "one\ntwo\n".to_string(),
                        }],
                    }],
                }),
            }],
        };
        let nodes = doc.normalize();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].plain_text(), "one\ntwo");
    }

    #[test]
    fn substantive_excludes_breaks_and_blank_paragraphs() {
        assert!(!para(1, 5, "---\n").is_substantive());
        assert!(!para(1, 2, " \n").is_substantive());
        assert!(para(1, 5, "text").is_substantive());
    }

    #[test]
    fn normalized_nodes_correspond_to_substantive_or_break_elements() {
        // Whitespace-only paragraphs must be dropped by the same rule that
        // the offset position scan applies.
        let doc = NativeDocument {
            elements: vec![
                para(1, 5, "A\n"),
                para(5, 7, " \n"),
                para(7, 11, "---\n"),
                para(11, 16, "B\n"),
            ],
        };
        let counted = doc
            .elements
            .iter()
            .filter(|el| el.is_substantive() || el.is_break())
            .count();
        assert_eq!(doc.normalize().len(), counted);
    }
}
