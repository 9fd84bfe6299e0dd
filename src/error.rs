use thiserror::Error;

/// Alias for results produced by this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Things that may go wrong while building a [`Table`](crate::Table) or
/// pre-covering its items.
///
/// All of these are programmer errors: the table has a fixed layout that
/// cannot grow, so malformed input is rejected up front instead of being
/// discovered during the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested capacities do not fit in a `usize` index space, or the
    /// arena could not allocate storage for them.
    #[error("table capacities overflow the addressable node count or arena")]
    LayoutOverflow,
    /// The options supplied more cells than were reserved.
    #[error("options need more than the {capacity} reserved option nodes")]
    TooManyNodes {
        /// The `n_option_nodes` the table was built with.
        capacity: usize,
    },
    /// More or fewer options were supplied than were reserved.
    #[error("expected exactly {expected} options, found {found}")]
    OptionCount {
        /// The `n_options` the table was built with.
        expected: usize,
        /// How many options the source produced (at least this many when
        /// there were too many).
        found: usize,
    },
    /// An item id outside `1..=n_items`.
    #[error("item {item} is outside of 1..={n_items}")]
    ItemOutOfRange {
        /// The offending item id.
        item: usize,
        /// The number of items in the table.
        n_items: usize,
    },
    /// An option without any items.
    #[error("option {option} has no items")]
    EmptyOption {
        /// 0-based index of the option.
        option: usize,
    },
    /// An option that lists the same item more than once.
    #[error("option {option} lists item {item} more than once")]
    DuplicateItem {
        /// 0-based index of the option.
        option: usize,
        /// The repeated item id.
        item: usize,
    },
    /// Options were already appended to this table.
    #[error("options can only be appended once")]
    AlreadyFilled,
    /// The item was already pre-covered.
    #[error("item {item} is already covered")]
    AlreadyCovered {
        /// The item id.
        item: usize,
    },
    /// Pre-covers have to be undone in the reverse order they were made.
    #[error("cannot uncover item {item}, the most recently covered item is {expected:?}")]
    UncoverOrder {
        /// The item that was asked to be uncovered.
        item: usize,
        /// The only item that may be uncovered right now, if any.
        expected: Option<usize>,
    },
}
