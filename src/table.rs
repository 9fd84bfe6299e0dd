//! The sparse exact cover matrix.
//!
//! All of the matrix lives in one slice allocated from a [`Bump`] arena:
//!
//! ```text
//! index:  0      1 ..= n_items      n_items + 1   ...cells and spacers...
//!         root   item headers       first spacer  option 0 | spacer | option 1 | spacer ...
//! ```
//!
//! Item headers form the circular horizontal list around the root. Each
//! option is a contiguous run of cells followed by a spacer, so walking an
//! option never needs horizontal links.

use crate::{
    node::{self, iter, Node, NodeKind, UNUSED},
    Error, Result,
};
use bumpalo::{collections::Vec as BumpVec, Bump};
use core::fmt;

/// Index of the header that the item list is threaded around.
pub(crate) const ROOT: usize = 0;

/// Identifies a node of a [`Table`].
///
/// Solutions are reported as the ids of the cells that were chosen; use
/// [`Table::option_of`] or [`Table::handle_of`] to turn them back into
/// options. The default value is the root header, which is never a cell,
/// and can be used to pre-fill a solution buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// Return the raw position of this node inside the table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A dancing links table with fixed capacities.
///
/// The lifetime `'a` is the lifetime of the arena that the table was built
/// in, and `H` is the type of the handle the caller attaches to each option.
pub struct Table<'a, H> {
    nodes: &'a mut [Node],
    handles: BumpVec<'a, H>,
    /// Items covered by the caller outside of a search, oldest first.
    pre_covered: BumpVec<'a, usize>,

    n_items: usize,
    n_options: usize,
    n_option_nodes: usize,

    /// One past the last node that has been written by `append_options`.
    end: usize,
    filled: bool,
}

impl<'a, H> Table<'a, H> {
    /// Create a table for `n_items` items and exactly `n_options` options
    /// holding at most `n_option_nodes` cells in total.
    ///
    /// The node buffer and the option handle storage are allocated from
    /// `arena` once, here; nothing is allocated afterwards.
    pub fn new_in(
        arena: &'a Bump,
        n_items: usize,
        n_options: usize,
        n_option_nodes: usize,
    ) -> Result<Self> {
        // root + headers + one spacer per option plus a leading one + cells
        let len = n_items
            .checked_add(1)
            .and_then(|len| len.checked_add(n_options))
            .and_then(|len| len.checked_add(1))
            .and_then(|len| len.checked_add(n_option_nodes))
            .ok_or(Error::LayoutOverflow)?;

        let nodes = arena
            .try_alloc_slice_fill_copy(len, UNUSED)
            .map_err(|_| Error::LayoutOverflow)?;

        for (index, node) in nodes.iter_mut().enumerate().take(n_items + 1) {
            *node = Node {
                left: if index == ROOT { n_items } else { index - 1 },
                right: if index == n_items { ROOT } else { index + 1 },
                up: index,
                down: index,
                kind: NodeKind::Header { len: 0 },
            };
        }

        let first_spacer = n_items + 1;
        nodes[first_spacer] = Node::self_ref(first_spacer, NodeKind::Spacer { option: 0 });

        let mut handles = BumpVec::new_in(arena);
        handles
            .try_reserve_exact(n_options)
            .map_err(|_| Error::LayoutOverflow)?;
        let mut pre_covered = BumpVec::new_in(arena);
        pre_covered
            .try_reserve_exact(n_items)
            .map_err(|_| Error::LayoutOverflow)?;

        log::debug!(
            "Allocated table with [{}] items, [{}] options and [{}] option nodes ([{}] nodes \
             total).",
            n_items,
            n_options,
            n_option_nodes,
            len
        );

        Ok(Table {
            nodes,
            handles,
            pre_covered,
            n_items,
            n_options,
            n_option_nodes,
            end: first_spacer + 1,
            filled: false,
        })
    }

    /// Number of items, numbered `1..=n_items`.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of options the table was built for.
    pub fn n_options(&self) -> usize {
        self.n_options
    }

    /// Maximum number of cells across all options.
    pub fn n_option_nodes(&self) -> usize {
        self.n_option_nodes
    }

    /// Return true once [`append_options`](Self::append_options) has
    /// succeeded.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Append all of the options of the problem.
    ///
    /// `options` must produce exactly `n_options` pairs of a caller handle
    /// and the item ids of that option. Every option needs at least one item,
    /// item ids must be in `1..=n_items` and must not repeat inside an option,
    /// and all options together may not use more than `n_option_nodes` cells.
    ///
    /// On error the table is rolled back to the state it had before the call.
    /// Items that were covered with [`cover_item`](Self::cover_item) before
    /// this call hide the options appended here, exactly as if they had been
    /// covered afterwards in the same order.
    pub fn append_options<I, O>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (H, O)>,
        O: IntoIterator<Item = usize>,
    {
        if self.filled {
            return Err(Error::AlreadyFilled);
        }

        if let Err(err) = self.link_options(options) {
            log::debug!("Rolling back options after error [{}].", err);
            self.unlink_options();
            return Err(err);
        }
        self.filled = true;

        for position in 0..self.pre_covered.len() {
            let item = self.pre_covered[position];
            self.hide_column(item);
        }

        log::debug!(
            "Appended [{}] options using [{}] nodes.",
            self.handles.len(),
            self.end - self.first_spacer() - 1 - self.handles.len()
        );

        Ok(())
    }

    fn link_options<I, O>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (H, O)>,
        O: IntoIterator<Item = usize>,
    {
        let mut cells = 0;

        for (option, (handle, items)) in options.into_iter().enumerate() {
            if option == self.n_options {
                return Err(Error::OptionCount {
                    expected: self.n_options,
                    found: option + 1,
                });
            }

            let spacer = self.end - 1;
            let first = self.end;

            for item in items {
                if item == ROOT || item > self.n_items {
                    return Err(Error::ItemOutOfRange {
                        item,
                        n_items: self.n_items,
                    });
                }
                if self.nodes[first..self.end]
                    .iter()
                    .any(|node| node.kind == NodeKind::Cell { item })
                {
                    return Err(Error::DuplicateItem { option, item });
                }
                if cells == self.n_option_nodes {
                    return Err(Error::TooManyNodes {
                        capacity: self.n_option_nodes,
                    });
                }

                let index = self.end;
                self.nodes[index] = Node::self_ref(index, NodeKind::Cell { item });
                node::push_below(self.nodes, item, index);
                *self.len_mut(item) += 1;

                self.end += 1;
                cells += 1;
            }

            if self.end == first {
                return Err(Error::EmptyOption { option });
            }

            let last = self.end - 1;
            self.nodes[spacer].down = last;

            let next_spacer = self.end;
            self.nodes[next_spacer] = Node {
                up: first,
                ..Node::self_ref(next_spacer, NodeKind::Spacer { option: option + 1 })
            };
            self.end += 1;

            self.handles.push(handle);
        }

        if self.handles.len() == self.n_options {
            Ok(())
        } else {
            Err(Error::OptionCount {
                expected: self.n_options,
                found: self.handles.len(),
            })
        }
    }

    /// Undo a partial `link_options`.
    ///
    /// Every cell was linked in as the bottom of its column, so unlinking
    /// them newest first restores each column exactly.
    fn unlink_options(&mut self) {
        let first_spacer = self.first_spacer();

        for index in (first_spacer + 1..self.end).rev() {
            if let NodeKind::Cell { item } = self.nodes[index].kind {
                node::remove_vertical(self.nodes, index);
                *self.len_mut(item) -= 1;
            }
        }

        self.nodes[first_spacer + 1..self.end].fill(UNUSED);
        self.nodes[first_spacer] = Node::self_ref(first_spacer, NodeKind::Spacer { option: 0 });
        self.end = first_spacer + 1;
        self.handles.clear();
    }

    /// Cover `item` before searching, marking it as already satisfied.
    ///
    /// Every option that contains `item` is hidden from the search. Covers
    /// made this way stay in effect across searches until undone with
    /// [`uncover_item`](Self::uncover_item).
    pub fn cover_item(&mut self, item: usize) -> Result<()> {
        self.check_item(item)?;
        if self.is_covered(item) {
            return Err(Error::AlreadyCovered { item });
        }

        log::trace!("Pre-covering item [{}].", item);

        self.pre_covered.push(item);
        self.cover(item);

        Ok(())
    }

    /// Undo the most recent [`cover_item`](Self::cover_item).
    ///
    /// Pre-covers form a stack; only the item on top of it can be
    /// uncovered.
    pub fn uncover_item(&mut self, item: usize) -> Result<()> {
        self.check_item(item)?;

        match self.pre_covered.last().copied() {
            Some(last) if last == item => {
                log::trace!("Uncovering pre-covered item [{}].", item);

                self.pre_covered.pop();
                self.uncover(item);

                Ok(())
            }
            expected => Err(Error::UncoverOrder { item, expected }),
        }
    }

    /// Return true if `item` has been covered with
    /// [`cover_item`](Self::cover_item).
    pub fn is_covered(&self, item: usize) -> bool {
        self.pre_covered.contains(&item)
    }

    /// Return an iterator over the items that remain to be covered, in
    /// their original order.
    pub fn remaining_items(&self) -> impl Iterator<Item = usize> + '_ {
        iter::right(self.nodes, ROOT)
    }

    /// Return the number of live options in the column of `item`, or `None`
    /// if there is no such item.
    pub fn item_len(&self, item: usize) -> Option<usize> {
        if item == ROOT || item > self.n_items {
            return None;
        }

        match self.nodes[item].kind {
            NodeKind::Header { len } => Some(len),
            _ => None,
        }
    }

    /// Return the 0-based index of the option that contains `cell`, or
    /// `None` if `cell` is not a cell of this table.
    pub fn option_of(&self, cell: CellId) -> Option<usize> {
        let index = cell.0;
        if index >= self.end || !matches!(self.nodes[index].kind, NodeKind::Cell { .. }) {
            return None;
        }

        self.nodes[..index]
            .iter()
            .rev()
            .find_map(|node| match node.kind {
                NodeKind::Spacer { option } => Some(option),
                _ => None,
            })
    }

    /// Return the handle that was supplied for the given option.
    pub fn handle(&self, option: usize) -> Option<&H> {
        self.handles.get(option)
    }

    /// Return the handle of the option that contains `cell`.
    pub fn handle_of(&self, cell: CellId) -> Option<&H> {
        self.option_of(cell).and_then(|option| self.handle(option))
    }

    fn check_item(&self, item: usize) -> Result<()> {
        if item == ROOT || item > self.n_items {
            Err(Error::ItemOutOfRange {
                item,
                n_items: self.n_items,
            })
        } else {
            Ok(())
        }
    }

    fn first_spacer(&self) -> usize {
        self.n_items + 1
    }

    fn len_mut(&mut self, item: usize) -> &mut usize {
        match &mut self.nodes[item].kind {
            NodeKind::Header { len } => len,
            kind => unreachable!("node [{}] is not an item header: {:?}", item, kind),
        }
    }
}

// Cover and uncover. Every `uncover*` walks the exact reverse path of its
// `cover*` counterpart; calling them in anything but LIFO order corrupts the
// links without any visible error.
impl<'a, H> Table<'a, H> {
    /// The leftmost uncovered item, if any remain.
    pub(crate) fn first_item(&self) -> Option<usize> {
        let first = self.nodes[ROOT].right;
        (first != ROOT).then_some(first)
    }

    pub(crate) fn down(&self, index: usize) -> usize {
        self.nodes[index].down
    }

    pub(crate) fn is_header(&self, index: usize) -> bool {
        self.nodes[index].is_header()
    }

    pub(crate) fn item_of(&self, cell: usize) -> usize {
        match self.nodes[cell].kind {
            NodeKind::Cell { item } => item,
            kind => unreachable!("node [{}] is not a cell: {:?}", cell, kind),
        }
    }

    /// Remove every other cell of `cell`'s option from its column.
    fn hide(&mut self, cell: usize) {
        let mut current = cell + 1;
        while current != cell {
            match self.nodes[current].kind {
                NodeKind::Spacer { .. } => current = self.nodes[current].up,
                NodeKind::Cell { item } => {
                    node::remove_vertical(self.nodes, current);
                    *self.len_mut(item) -= 1;
                    current += 1;
                }
                NodeKind::Header { .. } => unreachable!("option run reached header [{}]", current),
            }
        }
    }

    fn unhide(&mut self, cell: usize) {
        let mut current = cell - 1;
        while current != cell {
            match self.nodes[current].kind {
                NodeKind::Spacer { .. } => current = self.nodes[current].down,
                NodeKind::Cell { item } => {
                    node::restore_vertical(self.nodes, current);
                    *self.len_mut(item) += 1;
                    current -= 1;
                }
                NodeKind::Header { .. } => unreachable!("option run reached header [{}]", current),
            }
        }
    }

    fn hide_column(&mut self, item: usize) {
        let mut current = self.nodes[item].down;
        while current != item {
            self.hide(current);
            current = self.nodes[current].down;
        }
    }

    fn unhide_column(&mut self, item: usize) {
        let mut current = self.nodes[item].up;
        while current != item {
            self.unhide(current);
            current = self.nodes[current].up;
        }
    }

    pub(crate) fn cover(&mut self, item: usize) {
        self.hide_column(item);
        node::remove_horizontal(self.nodes, item);
    }

    pub(crate) fn uncover(&mut self, item: usize) {
        node::restore_horizontal(self.nodes, item);
        self.unhide_column(item);
    }

    /// Cover the items of every other cell in `cell`'s option, left to
    /// right.
    pub(crate) fn cover_row(&mut self, cell: usize) {
        let mut current = cell + 1;
        while current != cell {
            if self.nodes[current].is_spacer() {
                current = self.nodes[current].up;
            } else {
                self.cover(self.item_of(current));
                current += 1;
            }
        }
    }

    pub(crate) fn uncover_row(&mut self, cell: usize) {
        let mut current = cell - 1;
        while current != cell {
            if self.nodes[current].is_spacer() {
                current = self.nodes[current].down;
            } else {
                self.uncover(self.item_of(current));
                current -= 1;
            }
        }
    }
}

#[cfg(test)]
impl<'a, H> Table<'a, H> {
    pub(crate) fn snapshot(&self) -> Vec<Node> {
        self.nodes.to_vec()
    }

    /// Check that the item list is in increasing order and that every
    /// column's length matches the cells reachable from its header.
    pub(crate) fn assert_consistent(&self) {
        let remaining: Vec<_> = self.remaining_items().collect();
        assert!(
            remaining.windows(2).all(|pair| pair[0] < pair[1]),
            "item list out of order: {:?}",
            remaining
        );

        for item in remaining {
            let reachable = iter::down(self.nodes, item).count();
            assert_eq!(self.item_len(item), Some(reachable), "LEN of item [{}]", item);
            assert_eq!(iter::up(self.nodes, item).count(), reachable);
            assert!(iter::down(self.nodes, item).all(|cell| self.item_of(cell) == item));
        }
    }
}

impl<H> fmt::Debug for Table<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("n_items", &self.n_items)
            .field("n_options", &self.n_options)
            .field("n_option_nodes", &self.n_option_nodes)
            .field("filled", &self.filled)
            .field("pre_covered", &self.pre_covered)
            .field("nodes_used", &self.end)
            .finish()
    }
}
