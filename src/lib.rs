#![deny(missing_docs)]

//! Implementation of [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links)
//! and [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) for solving
//!  [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problems.
//!
//! The whole sparse matrix lives in a single slice allocated from a
//! [`bumpalo::Bump`] arena with fixed capacities, and links are indices into
//! that slice. Searching never allocates: the chosen cells are written into a
//! buffer owned by the caller.
//!
//! ```
//! use bumpalo::Bump;
//! use core::ops::ControlFlow;
//! use dlx_arena::{CellId, SearchOutcome, Table};
//!
//! let arena = Bump::new();
//! let mut table = Table::new_in(&arena, 3, 3, 5).unwrap();
//! table
//!     .append_options(vec![("x", vec![1, 2]), ("y", vec![3]), ("z", vec![2, 3])])
//!     .unwrap();
//!
//! let mut buffer = [CellId::default(); 3];
//! let mut found = Vec::new();
//! let outcome = table.search_solutions(&mut buffer, |solution| {
//!     found.extend(solution.handles().copied());
//!     ControlFlow::Continue(())
//! });
//!
//! assert_eq!(outcome, SearchOutcome::Exhausted);
//! assert_eq!(found, vec!["x", "y"]);
//! ```
//!
//! Items are chosen leftmost first rather than by smallest column, so
//! solutions are always found in the same order as the textbook algorithm.

mod error;
pub(crate) mod node;
pub mod search;
pub mod table;

pub use error::{Error, Result};
pub use search::{Search, SearchOutcome, Solution};
pub use table::{CellId, Table};
