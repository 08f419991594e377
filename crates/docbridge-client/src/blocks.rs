use docbridge_core::Node;

/// Ordered key/value mapping derived from a block's rows after the header.
pub type Metadata = Vec<(String, String)>;

/// Header text of a table-shaped block: the plain text of the first cell of
/// the first row.
pub fn header_text(table: &Node) -> Option<String> {
    let Node::Table(rows) = table else {
        return None;
    };
    let Some(Node::TableRow(cells)) = rows.first() else {
        return None;
    };
    cells.first().map(Node::plain_text)
}

fn header_matches(table: &Node, name: &str) -> bool {
    // Case-insensitive only; whitespace and punctuation variance is
    // deliberately not normalized.
    header_text(table).is_some_and(|header| header.eq_ignore_ascii_case(name))
}

/// All top-level tables in document order.
pub(crate) fn tables(nodes: &[Node]) -> Vec<&Node> {
    nodes.iter().filter(|node| node.is_table()).collect()
}

/// First table whose header cell text equals `name` case-insensitively.
pub fn find_block<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Node> {
    tables(nodes)
        .into_iter()
        .find(|table| header_matches(table, name))
}

/// All tables whose header cell text equals `name` case-insensitively,
/// document order.
pub fn find_blocks<'a>(nodes: &'a [Node], name: &str) -> Vec<&'a Node> {
    tables(nodes)
        .into_iter()
        .filter(|table| header_matches(table, name))
        .collect()
}

/// Positional indices (among all tables) of blocks named `name`.
pub(crate) fn named_block_positions(nodes: &[Node], name: &str) -> Vec<usize> {
    tables(nodes)
        .iter()
        .enumerate()
        .filter(|(_, table)| header_matches(table, name))
        .map(|(i, _)| i)
        .collect()
}

/// Derive a block's metadata: each row after the header contributes one
/// key/value pair from its first two cells, multi-line cell content joined
/// with a newline.
pub fn block_metadata(table: &Node) -> Metadata {
    let Node::Table(rows) = table else {
        return Vec::new();
    };
    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let Node::TableRow(cells) = row else {
                return None;
            };
            let key = cells.first().map(Node::plain_text)?;
            let value = cells.get(1).map(Node::plain_text).unwrap_or_default();
            Some((key, value))
        })
        .collect()
}
