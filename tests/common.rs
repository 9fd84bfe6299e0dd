use bumpalo::Bump;
use core::ops::ControlFlow;
use dlx_arena::{CellId, SearchOutcome, Table};

/// Install a logger for the test binary, ignoring repeated calls.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A value placed at a position of a Sudoku grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// Ranges from 0 to `side_length - 1`.
    pub row: usize,
    /// Ranges from 0 to `side_length - 1`.
    pub column: usize,
    /// Ranges from 1 to `side_length`.
    pub value: usize,
}

impl Placement {
    /// The index of the box containing this position.
    pub fn square(self, box_side_length: usize) -> usize {
        (self.row / box_side_length) * box_side_length + self.column / box_side_length
    }

    /// The four items satisfied by this placement: its position, and its value
    /// in its row, its column and its box. Each group of items occupies a
    /// consecutive block of `side_length^2` ids.
    pub fn items(self, box_side_length: usize) -> [usize; 4] {
        let side_length = box_side_length * box_side_length;
        let block = side_length * side_length;
        let value = self.value - 1;

        [
            1 + self.row * side_length + self.column,
            1 + block + self.row * side_length + value,
            1 + 2 * block + self.column * side_length + value,
            1 + 3 * block + self.square(box_side_length) * side_length + value,
        ]
    }

    /// Every placement for a grid of the given box size.
    pub fn all(box_side_length: usize) -> impl Iterator<Item = Placement> {
        let side_length = box_side_length * box_side_length;

        (0..side_length).flat_map(move |row| {
            (0..side_length).flat_map(move |column| {
                (1..=side_length).map(move |value| Placement { row, column, value })
            })
        })
    }
}

/// Parse the filled values of a Sudoku puzzle.
///
/// # Expected Format
///  - 0 denotes an empty value
///  - The numbers are presented in row-major order. So the first `side_length`
///    numbers are the first row, the next `side_length` numbers are the second
///    row, etc.
///
/// # Panics
///  - If the string is not exactly `side_length` * `side_length` characters
///  - If any character in the string is not [0-9]
pub fn parse_sudoku(sudoku_input: &str, box_side_length: usize) -> Vec<Placement> {
    let side_length = box_side_length * box_side_length;

    log::debug!(
        "Parsing sudoku puzzle input [{}] for side length [{}].",
        sudoku_input,
        side_length
    );

    assert_eq!(
        sudoku_input.len(),
        side_length * side_length,
        "Input needs to be `side_length` * `side_length` characters long."
    );

    sudoku_input
        .char_indices()
        .filter_map(|(index, c)| {
            let value = c.to_digit(10).expect("Input characters must be digits.");
            (value != 0).then(|| Placement {
                row: index / side_length,
                column: index % side_length,
                value: value as usize,
            })
        })
        .collect()
}

/// Format placements into the string format read by `parse_sudoku`.
///
/// # Panics
///  - If there is more that one placement at the same position.
///  - If any value has more than a single digit.
pub fn format_sudoku<'p>(
    placements: impl IntoIterator<Item = &'p Placement>,
    box_side_length: usize,
) -> String {
    let side_length = box_side_length * box_side_length;
    let mut output = vec![b'0'; side_length * side_length];

    for placement in placements {
        let index = placement.row * side_length + placement.column;
        assert_eq!(
            output[index], b'0',
            "Overwriting an existing value at position [{},{}]",
            placement.row, placement.column
        );

        let formatted = placement.value.to_string();
        assert_eq!(formatted.len(), 1);
        output[index] = formatted.as_bytes()[0];
    }

    String::from_utf8(output).unwrap()
}

/// Solve a Sudoku puzzle, returning every completed grid in the order the
/// search finds them.
///
/// The filled values are covered before the options are appended.
pub fn solve_sudoku(sudoku_input: &str, box_side_length: usize) -> Vec<String> {
    let side_length = box_side_length * box_side_length;
    let filled = parse_sudoku(sudoku_input, box_side_length);
    let placements: Vec<_> = Placement::all(box_side_length).collect();

    let arena = Bump::new();
    let mut table = Table::new_in(
        &arena,
        4 * side_length * side_length,
        placements.len(),
        4 * placements.len(),
    )
    .unwrap();

    for placement in &filled {
        for item in placement.items(box_side_length) {
            table.cover_item(item).unwrap();
        }
    }
    table
        .append_options(
            placements
                .iter()
                .map(|placement| (*placement, placement.items(box_side_length))),
        )
        .unwrap();

    let mut buffer = vec![CellId::default(); side_length * side_length];
    let mut solved = Vec::new();
    let outcome = table.search_solutions(&mut buffer, |solution| {
        solved.push(format_sudoku(
            filled.iter().chain(solution.handles()),
            box_side_length,
        ));
        ControlFlow::Continue(())
    });
    assert_eq!(outcome, SearchOutcome::Exhausted);

    solved
}

/// Return true if every row, column and box of the grid holds each value
/// exactly once.
#[allow(dead_code)]
pub fn is_complete_grid(grid: &str, box_side_length: usize) -> bool {
    let side_length = box_side_length * box_side_length;
    let values: Vec<_> = grid
        .chars()
        .map(|c| c.to_digit(10).unwrap_or(0) as usize)
        .collect();

    let mut seen = std::collections::HashSet::new();
    values.iter().enumerate().all(|(index, &value)| {
        let placement = Placement {
            row: index / side_length,
            column: index % side_length,
            value,
        };

        (1..=side_length).contains(&value)
            && placement.items(box_side_length)
                .into_iter()
                .all(|item| seen.insert(item))
    })
}
