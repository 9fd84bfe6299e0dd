#![no_main]

use bumpalo::Bump;
use core::ops::ControlFlow;
use dlx_arena::{CellId, SearchOutcome, Table};
use libfuzzer_sys::fuzz_target;

const NUM_ITEMS: usize = 8;

#[derive(Debug)]
struct OptionsInput {
    options: Vec<Vec<usize>>,
    pre_covered: Vec<usize>,
    buffer_len: usize,
}

impl<'a> arbitrary::Arbitrary<'a> for OptionsInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        // each option is a non-empty bitmask over the items
        let options = u
            .arbitrary::<Vec<u8>>()?
            .into_iter()
            .filter(|mask| *mask != 0)
            .map(|mask| (1..=NUM_ITEMS).filter(|item| mask & (1 << (item - 1)) != 0).collect())
            .collect();
        let pre_covered_mask = u.arbitrary::<u8>()?;
        let pre_covered = (1..=NUM_ITEMS)
            .filter(|item| pre_covered_mask & (1 << (item - 1)) != 0)
            .collect();
        let buffer_len = usize::from(u.arbitrary::<u8>()? % (NUM_ITEMS as u8 + 1));

        Ok(OptionsInput {
            options,
            pre_covered,
            buffer_len,
        })
    }
}

fuzz_target!(|input: OptionsInput| {
    let n_option_nodes = input.options.iter().map(Vec::len).sum();

    let arena = Bump::new();
    let mut table = Table::new_in(&arena, NUM_ITEMS, input.options.len(), n_option_nodes).unwrap();
    table
        .append_options(input.options.iter().enumerate().map(|(index, items)| (index, items.clone())))
        .unwrap();
    for item in &input.pre_covered {
        table.cover_item(*item).unwrap();
    }

    let mut buffer = vec![CellId::default(); input.buffer_len];
    let mut first_run = Vec::new();
    let outcome = table.search_solutions(&mut buffer, |solution| {
        // every remaining item is covered exactly once
        let mut counts = [0usize; NUM_ITEMS + 1];
        for option in solution.options() {
            for item in &input.options[option] {
                counts[*item] += 1;
            }
        }
        for item in 1..=NUM_ITEMS {
            let expected = usize::from(!input.pre_covered.contains(&item));
            assert_eq!(counts[item], expected, "item {} in {:?}", item, input);
        }

        first_run.push(solution.options().collect::<Vec<_>>());
        ControlFlow::Continue(())
    });

    // the table was restored, so a second search sees the same solutions
    let mut second_run = Vec::new();
    let second_outcome = table.search_solutions(&mut buffer, |solution| {
        second_run.push(solution.options().collect::<Vec<_>>());
        ControlFlow::Continue(())
    });

    assert_eq!(outcome, second_outcome);
    assert_eq!(first_run, second_run);
    assert!(outcome == SearchOutcome::Exhausted || outcome == SearchOutcome::Truncated);
});
