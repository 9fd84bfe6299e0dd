//! Tagged cells of the flat node buffer, and the splice primitives that
//! operate on them.
//!
//! Every link is an index into the same buffer, so a `&mut [Node]` is all
//! the splicing code ever needs.

/// One cell of the node buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    /// Left neighbour in the item list. Only meaningful for headers.
    pub left: usize,
    /// Right neighbour in the item list. Only meaningful for headers.
    pub right: usize,
    /// Upper neighbour in a column, or the first cell of the preceding
    /// option for a spacer.
    pub up: usize,
    /// Lower neighbour in a column, or the last cell of the following
    /// option for a spacer.
    pub down: usize,
    pub kind: NodeKind,
}

/// The field that Knuth's layout overloads between `LEN` and `TOP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Item header (or the root header at index 0) with the number of live
    /// cells in its column.
    Header { len: usize },
    /// A cell of some option, belonging to `item`'s column.
    Cell { item: usize },
    /// Boundary between two option runs; `option` is the 0-based index of
    /// the option that starts right after it.
    Spacer { option: usize },
}

/// Value of slots that no option has been written to yet.
pub(crate) const UNUSED: Node = Node::self_ref(0, NodeKind::Header { len: 0 });

impl Node {
    /// A node whose links all point back at itself.
    pub const fn self_ref(index: usize, kind: NodeKind) -> Self {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            kind,
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.kind, NodeKind::Spacer { .. })
    }

    pub fn is_header(&self) -> bool {
        matches!(self.kind, NodeKind::Header { .. })
    }
}

// NOTE: each splice reads both neighbours before writing either. When the
// two neighbours are the same node (a list of length two) both writes land
// on it and the result is still correct.

/// Remove `index` from its horizontal list. The node keeps its own links so
/// that [`restore_horizontal`] can put it back.
pub(crate) fn remove_horizontal(nodes: &mut [Node], index: usize) {
    let Node { left, right, .. } = nodes[index];
    nodes[left].right = right;
    nodes[right].left = left;
}

pub(crate) fn restore_horizontal(nodes: &mut [Node], index: usize) {
    let Node { left, right, .. } = nodes[index];
    nodes[left].right = index;
    nodes[right].left = index;
}

/// Remove `index` from its vertical list. Same contract as
/// [`remove_horizontal`].
pub(crate) fn remove_vertical(nodes: &mut [Node], index: usize) {
    let Node { up, down, .. } = nodes[index];
    nodes[up].down = down;
    nodes[down].up = up;
}

pub(crate) fn restore_vertical(nodes: &mut [Node], index: usize) {
    let Node { up, down, .. } = nodes[index];
    nodes[up].down = index;
    nodes[down].up = index;
}

/// Link `index` in as the new bottom of the column headed by `header`.
pub(crate) fn push_below(nodes: &mut [Node], header: usize, index: usize) {
    let bottom = nodes[header].up;
    nodes[index].up = bottom;
    nodes[index].down = header;
    nodes[bottom].down = index;
    nodes[header].up = index;
}

/// Iterators that walk one of the four circular lists, not yielding the
/// node they started from.
pub(crate) mod iter {
    use super::Node;

    #[derive(Debug, Clone, Copy)]
    pub(crate) enum Direction {
        Right,
        Down,
        Up,
    }

    #[derive(Debug)]
    pub(crate) struct Links<'n> {
        nodes: &'n [Node],
        original: usize,
        current: usize,
        direction: Direction,
    }

    impl Iterator for Links<'_> {
        type Item = usize;

        fn next(&mut self) -> Option<Self::Item> {
            let node = &self.nodes[self.current];
            let next = match self.direction {
                Direction::Right => node.right,
                Direction::Down => node.down,
                Direction::Up => node.up,
            };

            if next == self.original {
                None
            } else {
                self.current = next;
                Some(next)
            }
        }
    }

    pub(crate) fn right(nodes: &[Node], original: usize) -> Links<'_> {
        walk(nodes, original, Direction::Right)
    }

    pub(crate) fn down(nodes: &[Node], original: usize) -> Links<'_> {
        walk(nodes, original, Direction::Down)
    }

    #[allow(dead_code)]
    pub(crate) fn up(nodes: &[Node], original: usize) -> Links<'_> {
        walk(nodes, original, Direction::Up)
    }

    fn walk(nodes: &[Node], original: usize, direction: Direction) -> Links<'_> {
        Links {
            nodes,
            original,
            current: original,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(len: usize) -> Vec<Node> {
        (0..len)
            .map(|index| Node {
                left: (index + len - 1) % len,
                right: (index + 1) % len,
                up: (index + len - 1) % len,
                down: (index + 1) % len,
                kind: NodeKind::Header { len: 0 },
            })
            .collect()
    }

    #[test]
    fn remove_then_restore_is_identity() {
        let mut nodes = ring(5);
        let before = nodes.clone();

        remove_horizontal(&mut nodes, 2);
        remove_horizontal(&mut nodes, 3);
        assert_eq!(iter::right(&nodes, 0).collect::<Vec<_>>(), vec![1, 4]);
        restore_horizontal(&mut nodes, 3);
        restore_horizontal(&mut nodes, 2);

        assert_eq!(nodes, before);
    }

    #[test]
    fn splice_in_two_element_ring() {
        let mut nodes = ring(2);
        let before = nodes.clone();

        remove_vertical(&mut nodes, 1);
        assert_eq!(nodes[0].up, 0);
        assert_eq!(nodes[0].down, 0);
        restore_vertical(&mut nodes, 1);

        assert_eq!(nodes, before);
    }

    #[test]
    fn push_below_appends_to_column() {
        let mut nodes = vec![
            Node::self_ref(0, NodeKind::Header { len: 0 }),
            Node::self_ref(1, NodeKind::Cell { item: 0 }),
            Node::self_ref(2, NodeKind::Cell { item: 0 }),
        ];

        push_below(&mut nodes, 0, 1);
        push_below(&mut nodes, 0, 2);

        assert_eq!(iter::down(&nodes, 0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(iter::up(&nodes, 0).collect::<Vec<_>>(), vec![2, 1]);
    }
}
