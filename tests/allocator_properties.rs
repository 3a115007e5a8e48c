use bittrip_core::{
    errors::PlannerError,
    planner::{AllocatorAction, BudgetAllocator, CategoryTemplate, SUM_TOLERANCE},
};

fn shares(allocator: &BudgetAllocator) -> Vec<f64> {
    allocator
        .categories()
        .iter()
        .map(|category| category.percentage())
        .collect()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

fn assert_consistent(allocator: &BudgetAllocator) {
    assert!((allocator.total_percentage() - 100.0).abs() <= SUM_TOLERANCE);
    for category in allocator.categories() {
        assert!((0.0..=100.0).contains(&category.percentage()));
        let expected = allocator.total_budget() * category.percentage() / 100.0;
        assert!((category.amount() - expected).abs() < 1e-6);
    }
}

#[test]
fn default_split_starts_at_twenty_thirty_forty_ten() {
    let allocator = BudgetAllocator::initialize(1000.0).unwrap();
    assert_close(&shares(&allocator), &[20.0, 30.0, 40.0, 10.0]);
    let amounts: Vec<f64> = allocator.categories().iter().map(|c| c.amount()).collect();
    assert_close(&amounts, &[200.0, 300.0, 400.0, 100.0]);
}

#[test]
fn raising_one_share_takes_proportionally_from_the_rest() {
    let allocator = BudgetAllocator::initialize(1000.0).unwrap();
    let next = allocator.set_percentage(0, 40.0).unwrap();
    assert_close(&shares(&next), &[40.0, 22.5, 30.0, 7.5]);
    assert_consistent(&next);
    // The original state is untouched.
    assert_close(&shares(&allocator), &[20.0, 30.0, 40.0, 10.0]);
}

#[test]
fn lowering_one_share_gives_back_proportionally() {
    let allocator = BudgetAllocator::initialize(1000.0).unwrap();
    let next = allocator.set_percentage(2, 20.0).unwrap();
    assert_close(&shares(&next), &[26.666_666_666_666_668, 40.0, 20.0, 13.333_333_333_333_334]);
    assert_consistent(&next);
}

#[test]
fn full_share_zeroes_everything_else() {
    let allocator = BudgetAllocator::initialize(500.0).unwrap();
    let next = allocator.set_percentage(3, 100.0).unwrap();
    assert_close(&shares(&next), &[0.0, 0.0, 0.0, 100.0]);
    assert_consistent(&next);
}

#[test]
fn out_of_range_requests_are_clamped() {
    let allocator = BudgetAllocator::initialize(1000.0).unwrap();
    let high = allocator.set_percentage(1, 250.0).unwrap();
    assert_close(&shares(&high), &[0.0, 100.0, 0.0, 0.0]);
    let low = allocator.set_percentage(1, -40.0).unwrap();
    assert_eq!(low.categories()[1].percentage(), 0.0);
    assert_consistent(&low);
}

#[test]
fn bad_inputs_are_rejected() {
    let allocator = BudgetAllocator::initialize(1000.0).unwrap();
    assert!(matches!(
        allocator.set_percentage(4, 10.0),
        Err(PlannerError::InvalidIndex { index: 4, len: 4 })
    ));
    assert!(matches!(
        allocator.set_percentage(0, f64::NAN),
        Err(PlannerError::InvalidInput(_))
    ));
    assert!(BudgetAllocator::initialize(-5.0).is_err());
    assert!(BudgetAllocator::initialize(f64::INFINITY).is_err());
}

#[test]
fn arbitrary_edit_sequences_stay_consistent() {
    let templates = vec![
        CategoryTemplate::new("a", "A", 12.5),
        CategoryTemplate::new("b", "B", 37.5),
        CategoryTemplate::new("c", "C", 25.0),
        CategoryTemplate::new("d", "D", 15.0),
        CategoryTemplate::new("e", "E", 10.0),
    ];
    let mut allocator = BudgetAllocator::with_templates(2345.67, &templates).unwrap();
    let edits = [
        (0, 55.0),
        (4, 0.0),
        (2, 99.9),
        (1, 3.3),
        (3, 100.0),
        (3, 0.0),
        (0, 33.3),
        (4, 61.0),
        (2, 0.5),
        (1, 47.25),
    ];
    for (index, value) in edits {
        allocator = allocator.set_percentage(index, value).unwrap();
        assert_consistent(&allocator);
        assert!((allocator.categories()[index].percentage() - value).abs() <= SUM_TOLERANCE + 1e-9);
    }
}

#[test]
fn reinitializing_resets_split_and_amounts() {
    let allocator = BudgetAllocator::initialize(1000.0)
        .unwrap()
        .set_percentage(0, 70.0)
        .unwrap();
    let reset = allocator
        .apply(AllocatorAction::Reinitialize {
            total_budget: 3000.0,
        })
        .unwrap();
    assert_close(&shares(&reset), &[20.0, 30.0, 40.0, 10.0]);
    assert_eq!(reset.categories()[2].amount(), 1200.0);
}
