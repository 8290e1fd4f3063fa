use proptest::prelude::*;
use slicebench::{partition, DispatchStrategy, Op, ParallelProcessor, Span};

proptest! {
    // Slices are contiguous, cover [0, size) and the last one ends at size.
    #[test]
    fn prop_partition_covers_range(size in 1usize..100_000, nb_workers in 1usize..64) {
        let plan = partition(size, nb_workers).unwrap();

        prop_assert_eq!(plan.len(), nb_workers);
        prop_assert_eq!(plan[0].start, 0);
        prop_assert_eq!(plan[nb_workers - 1].end, size);
        for pair in plan.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        prop_assert_eq!(plan.iter().map(|r| r.len()).sum::<usize>(), size);
    }

    // Only the last slice can be longer, and by fewer than nb_workers elements.
    #[test]
    fn prop_remainder_goes_to_last(size in 0usize..10_000, nb_workers in 1usize..32) {
        let plan = partition(size, nb_workers).unwrap();
        let work_slice = size / nb_workers;

        for range in &plan[..nb_workers - 1] {
            prop_assert_eq!(range.len(), work_slice);
        }
        prop_assert!(plan[nb_workers - 1].len() - work_slice < nb_workers);
    }
}

#[test]
fn test_single_worker_is_full_range() {
    assert_eq!(partition(12_345, 1).unwrap(), vec![0..12_345]);
}

#[test]
fn test_workers_beyond_elements_leave_empty_slices() {
    let plan = partition(2, 4).unwrap();
    assert_eq!(plan.len(), 4);
    assert!(plan[..3].iter().all(|r| r.is_empty()));
    assert_eq!(plan[3], 0..2);
}

#[test]
fn test_dispatch_matches_sequential_for_every_worker_count() {
    let size = 64;
    let x: Vec<f64> = (0..size).map(|i| (i as f64) * 0.25).collect();
    let square_into_y = |span: Span<'_, f64>| {
        for (out, &v) in span.y.iter_mut().zip(span.x) {
            *out = v * v + 1.0;
        }
        0.0
    };

    let mut expected = vec![0.0; size];
    square_into_y(Span::full(&mut expected, &x));

    for strategy in [DispatchStrategy::Spawn, DispatchStrategy::Pool] {
        let processor = ParallelProcessor::new(strategy, size).unwrap();
        for nb_workers in 1..=size {
            let mut y = vec![0.0; size];
            processor
                .dispatch(&mut y, &x, nb_workers, &square_into_y)
                .unwrap();
            assert_eq!(y, expected, "{strategy:?} with {nb_workers} workers");
        }
    }
}

#[test]
fn test_partial_sums_total_the_input() {
    let processor = ParallelProcessor::new(DispatchStrategy::Spawn, 8).unwrap();
    let mut y = vec![0.0f64; 100_000];
    let x = vec![1.0f64; 100_000];

    let partials = processor.dispatch(&mut y, &x, 8, &Op::Reduce).unwrap();

    assert_eq!(partials.len(), 8);
    assert_eq!(partials.iter().sum::<f64>(), 100_000.0);
}

#[test]
fn test_zero_workers_rejected_before_dispatch() {
    let processor = ParallelProcessor::new(DispatchStrategy::Spawn, 4).unwrap();
    let mut y = vec![0i32; 8];
    let x = vec![0i32; 8];
    assert!(processor.dispatch(&mut y, &x, 0, &Op::Copy).is_err());
}
