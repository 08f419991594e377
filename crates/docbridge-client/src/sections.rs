use docbridge_core::Node;

/// A contiguous run of top-level nodes bounded by thematic breaks or the
/// document edges. Derived on every request from the live tree, never stored;
/// break markers themselves belong to no section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub index: usize,
    pub nodes: Vec<&'a Node>,
}

/// Indices of the non-break top-level nodes belonging to each section.
///
/// This is the single break-counting scan: the section counter starts at 0
/// and increments on every `ThematicBreak`, so a document with k breaks has
/// exactly k+1 sections and a break-free document is one section. The edit
/// strategies reuse this same rule to compute insertion positions, so
/// indexing and editing never disagree.
pub(crate) fn section_spans(nodes: &[Node]) -> Vec<Vec<usize>> {
    let mut spans = vec![Vec::new()];
    for (i, node) in nodes.iter().enumerate() {
        if matches!(node, Node::ThematicBreak) {
            spans.push(Vec::new());
        } else if let Some(span) = spans.last_mut() {
            span.push(i);
        }
    }
    spans
}

/// Derive the ordered section list from a document's top-level nodes.
pub fn sections(nodes: &[Node]) -> Vec<Section<'_>> {
    section_spans(nodes)
        .into_iter()
        .enumerate()
        .map(|(index, span)| Section {
            index,
            nodes: span.iter().map(|&i| &nodes[i]).collect(),
        })
        .collect()
}
