//! Algorithm X over a [`Table`], as a resumable state machine.
//!
//! The states follow the steps of Algorithm X in TAOCP 7.2.2.1: entering a
//! level, trying the current option of the chosen item, retrying with the
//! next option after backtracking, and leaving a level. Solutions are
//! written straight into the caller's buffer, so the search itself never
//! allocates.

use crate::table::{CellId, Table};
use core::{fmt, ops::ControlFlow};

/// How a search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// Every solution was visited.
    Exhausted,
    /// The caller asked to stop, or dropped the search early.
    Stopped,
    /// A partial solution needed more entries than the solution buffer has.
    /// The buffer holds the prefix that was chosen when the search stopped.
    Truncated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    // Check for a solution, else choose and cover an item
    Enter,
    // Take the current option of this level, or backtrack if there are none
    Try,
    // Undo the current option and move to the next one in the column
    Retry,
    // Go back up a level
    Leave,
    Done,
}

/// A search in progress over a [`Table`].
///
/// Created by [`Table::search`]. Each call to
/// [`next_solution`](Self::next_solution) resumes where the previous one
/// returned. Dropping the search backtracks out of every level, leaving the
/// table exactly as it was before the search began.
pub struct Search<'t, 'a, H> {
    table: &'t mut Table<'a, H>,
    buffer: &'t mut [CellId],
    level: usize,
    step: Step,
    outcome: Option<SearchOutcome>,
    solutions: usize,
}

impl<'t, 'a, H> Search<'t, 'a, H> {
    fn new(table: &'t mut Table<'a, H>, buffer: &'t mut [CellId]) -> Self {
        Search {
            table,
            buffer,
            level: 0,
            step: Step::Enter,
            outcome: None,
            solutions: 0,
        }
    }

    /// Compute up to the next solution, returning `None` if there are no
    /// more or the solution buffer ran out of space.
    pub fn next_solution(&mut self) -> Option<Solution<'_, H>> {
        loop {
            match self.step {
                Step::Enter => {
                    let Some(item) = self.table.first_item() else {
                        self.step = Step::Leave;
                        self.solutions += 1;
                        log::trace!(
                            "Found solution [{}] with [{}] options.",
                            self.solutions,
                            self.level
                        );

                        return Some(Solution {
                            table: &*self.table,
                            cells: &self.buffer[..self.level],
                        });
                    };

                    if self.level == self.buffer.len() {
                        if self.table.down(item) == item {
                            // dead end, nothing would be written at this level
                            self.step = Step::Leave;
                            continue;
                        }

                        log::debug!(
                            "Solution buffer of [{}] entries is too small, stopping.",
                            self.buffer.len()
                        );
                        self.finish(SearchOutcome::Truncated);
                        return None;
                    }

                    self.table.cover(item);
                    self.buffer[self.level] = CellId(self.table.down(item));
                    self.step = Step::Try;
                }
                Step::Try => {
                    let current = self.buffer[self.level].index();

                    if self.table.is_header(current) {
                        // wrapped around the column of the chosen item
                        self.table.uncover(current);
                        self.step = Step::Leave;
                    } else {
                        self.table.cover_row(current);
                        self.level += 1;
                        self.step = Step::Enter;
                    }
                }
                Step::Retry => {
                    let current = self.buffer[self.level].index();

                    self.table.uncover_row(current);
                    self.buffer[self.level] = CellId(self.table.down(current));
                    self.step = Step::Try;
                }
                Step::Leave => {
                    if self.level == 0 {
                        self.step = Step::Done;
                        self.outcome = Some(SearchOutcome::Exhausted);
                        return None;
                    }

                    self.level -= 1;
                    self.step = Step::Retry;
                }
                Step::Done => return None,
            }
        }
    }

    /// Return how the search finished, or `None` while it can still produce
    /// solutions.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.outcome
    }

    /// Return the number of solutions produced so far.
    pub fn solutions_found(&self) -> usize {
        self.solutions
    }

    /// Stop searching and restore the table.
    ///
    /// If the search had already finished this returns how it finished.
    pub fn stop(mut self) -> SearchOutcome {
        if self.step != Step::Done {
            self.finish(SearchOutcome::Stopped);
        }

        self.outcome.unwrap_or(SearchOutcome::Stopped)
    }

    fn finish(&mut self, outcome: SearchOutcome) {
        self.unwind();
        self.step = Step::Done;
        self.outcome = Some(outcome);
    }

    /// Backtrack out of every level whose option has been taken.
    ///
    /// Only valid between steps, when each of the levels below `self.level`
    /// has its item covered and its option's other items covered.
    fn unwind(&mut self) {
        while self.level > 0 {
            self.level -= 1;

            let current = self.buffer[self.level].index();
            self.table.uncover_row(current);
            self.table.uncover(self.table.item_of(current));
        }
    }
}

impl<H> Drop for Search<'_, '_, H> {
    fn drop(&mut self) {
        if self.step != Step::Done {
            self.finish(SearchOutcome::Stopped);
        }
    }
}

impl<H> Iterator for Search<'_, '_, H> {
    /// The 0-based indices of the options in a solution.
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution()
            .map(|solution| solution.options().collect())
    }
}

impl<H> fmt::Debug for Search<'_, '_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("level", &self.level)
            .field("step", &self.step)
            .field("outcome", &self.outcome)
            .field("solutions", &self.solutions)
            .finish()
    }
}

/// A solution produced by a search, borrowed from the table and the
/// solution buffer.
pub struct Solution<'s, H> {
    table: &'s Table<'s, H>,
    cells: &'s [CellId],
}

impl<'s, H> Solution<'s, H> {
    /// Return the number of options in this solution.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return true if the solution uses no options, which only happens when
    /// no items were left to cover.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the chosen cells, one per level of the search.
    pub fn cells(&self) -> &'s [CellId] {
        self.cells
    }

    /// Return the 0-based indices of the chosen options, in the order they
    /// were chosen.
    pub fn options(&self) -> impl Iterator<Item = usize> + 's {
        let table = self.table;
        self.cells
            .iter()
            .filter_map(move |&cell| table.option_of(cell))
    }

    /// Return the handles of the chosen options, in the order they were
    /// chosen.
    pub fn handles(&self) -> impl Iterator<Item = &'s H> + 's {
        let table = self.table;
        self.cells
            .iter()
            .filter_map(move |&cell| table.handle_of(cell))
    }
}

impl<H> Clone for Solution<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Solution<'_, H> {}

impl<H> fmt::Debug for Solution<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.options()).finish()
    }
}

impl<'a, H> Table<'a, H> {
    /// Start a search for exact covers of the items that are not covered.
    ///
    /// The length of `solution_buffer` is the largest solution the search
    /// can hold; pass a shorter slice to lower it.
    pub fn search<'t>(&'t mut self, solution_buffer: &'t mut [CellId]) -> Search<'t, 'a, H> {
        log::debug!(
            "Starting search over [{}] remaining items with room for [{}] options.",
            self.remaining_items().count(),
            solution_buffer.len()
        );

        Search::new(self, solution_buffer)
    }

    /// Visit every exact cover of the items that are not covered, in the
    /// order Algorithm X finds them.
    ///
    /// `visit` is called once per solution and can return
    /// [`ControlFlow::Break`] to stop the search. If a solution would need
    /// more than `solution_buffer.len()` options the search stops with
    /// [`SearchOutcome::Truncated`] and the buffer holds the prefix that had
    /// been chosen. A full buffer only stops the search when the leftmost
    /// remaining item still has options, so the prefix may belong to a
    /// partial cover that would not have led to a solution. The table is
    /// restored before this returns, whatever the outcome, so it can be
    /// searched again.
    pub fn search_solutions<F>(&mut self, solution_buffer: &mut [CellId], mut visit: F) -> SearchOutcome
    where
        F: FnMut(Solution<'_, H>) -> ControlFlow<()>,
    {
        let mut search = self.search(solution_buffer);

        let outcome = loop {
            let Some(solution) = search.next_solution() else {
                break search.stop();
            };
            if visit(solution).is_break() {
                break search.stop();
            }
        };

        log::debug!("Search finished with [{:?}].", outcome);

        outcome
    }
}
