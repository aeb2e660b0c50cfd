use crate::{
    aggregate::{AggregateKind, SingleValueAggregate},
    arena::Arena,
    column::{Column, NullableColumn, PrimitiveColumn, StringColumn},
    error::ErrorClass,
    obs::{MetricsEvent, MetricsSink, with_metrics_sink},
    policy::{Any, AnyHeavy, AnyLast, Max, Min, OrNull, Policy},
    serialize::{ReadBuffer, WriteBuffer},
    slot::{FixedSlot, GenericSlot, StringSlot},
};
use proptest::prelude::*;
use repval_primitives::ScalarKind;
use std::{cell::RefCell, fmt::Debug};

#[derive(Default)]
struct CapturingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for CapturingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

fn aggregate<'a, P: Policy<'a>>(scalar: ScalarKind) -> SingleValueAggregate<'a, P> {
    SingleValueAggregate::try_new(scalar).expect("valid aggregate")
}

fn fold<'a, P>(
    agg: &SingleValueAggregate<'a, P>,
    column: &PrimitiveColumn<i64>,
    arena: &'a Arena,
) -> P
where
    P: Policy<'a, Slot = FixedSlot<i64>>,
{
    let mut state = agg.create_state();
    agg.add_batch(&mut state, column, 0..column.len(), arena, None, None)
        .expect("batch in range");

    state
}

fn fixed_result<'a, P>(agg: &SingleValueAggregate<'a, P>, state: &P) -> i64
where
    P: Policy<'a, Slot = FixedSlot<i64>, Output = PrimitiveColumn<i64>>,
{
    let mut output = PrimitiveColumn::new();
    agg.insert_result_into(state, &mut output);

    output.get(0)
}

fn nullable_result<'a>(
    agg: &SingleValueAggregate<'a, OrNull<FixedSlot<i64>>>,
    state: &OrNull<FixedSlot<i64>>,
) -> Option<i64> {
    let mut output = NullableColumn::new(PrimitiveColumn::new()).expect("empty nested");
    agg.insert_result_into(state, &mut output);

    (!output.is_null(0)).then(|| output.nested().get(0))
}

fn partition_merge<'a, P>(
    agg: &SingleValueAggregate<'a, P>,
    values: &[i64],
    split: usize,
    arena: &'a Arena,
) -> P
where
    P: Policy<'a, Slot = FixedSlot<i64>>,
{
    let split = split.min(values.len());
    let left = PrimitiveColumn::from(values[..split].to_vec());
    let right = PrimitiveColumn::from(values[split..].to_vec());

    let mut dst = fold(agg, &left, arena);
    let src = fold(agg, &right, arena);
    agg.merge(&mut dst, &src, arena);

    dst
}

fn fold_strings<'a, P>(agg: &SingleValueAggregate<'a, P>, rows: &[String], arena: &'a Arena) -> P
where
    P: Policy<'a, Slot = StringSlot<'a>>,
{
    let column: StringColumn = rows.iter().collect();
    let mut state = agg.create_state();
    agg.add_batch(&mut state, &column, 0..column.len(), arena, None, None)
        .expect("batch in range");

    state
}

fn reload<'a, P: Policy<'a>>(agg: &SingleValueAggregate<'a, P>, state: &P, arena: &'a Arena) -> P {
    let mut buf = WriteBuffer::new();
    agg.serialize(state, &mut buf).expect("serialize");
    let bytes = buf.into_inner();

    let mut decoded = agg.create_state();
    let mut read = ReadBuffer::new(&bytes);
    agg.deserialize(&mut decoded, &mut read, arena)
        .expect("deserialize");
    assert!(read.is_exhausted());

    decoded
}

fn emitted<'a, P>(agg: &SingleValueAggregate<'a, P>, state: &P) -> P::Output
where
    P: Policy<'a>,
    P::Output: Default,
{
    let mut output = P::Output::default();
    agg.insert_result_into(state, &mut output);

    output
}

// A reloaded string state must merge and keep folding exactly like the
// live state it was written from.
fn check_reloaded_strings<'a, P>(
    left: &[String],
    right: &[String],
    arena: &'a Arena,
) -> Result<(), TestCaseError>
where
    P: Policy<'a, Slot = StringSlot<'a>>,
    P::Output: Default + PartialEq + Debug,
{
    let agg = aggregate::<P>(ScalarKind::String);

    let src = fold_strings(&agg, right, arena);
    let mut live = fold_strings(&agg, left, arena);
    let mut mixed = fold_strings(&agg, left, arena);
    agg.merge(&mut live, &src, arena);
    agg.merge(&mut mixed, &reload(&agg, &src, arena), arena);
    prop_assert_eq!(emitted(&agg, &mixed), emitted(&agg, &live));

    let column: StringColumn = right.iter().collect();
    let mut resumed = reload(&agg, &fold_strings(&agg, left, arena), arena);
    agg.add_batch(&mut resumed, &column, 0..column.len(), arena, None, None)
        .expect("batch in range");
    let whole = fold_strings(&agg, &[left, right].concat(), arena);
    prop_assert_eq!(emitted(&agg, &resumed), emitted(&agg, &whole));

    Ok(())
}

fn arb_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 1..48)
}

fn arb_strings() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof!["[a-z]{0,6}", "[a-z]{60,120}"],
        1..12,
    )
}

// Short, long, and zero-terminated rows.
fn arb_string_rows() -> impl Strategy<Value = Vec<String>> {
    let row = (prop_oneof!["[a-c]{0,4}", "[a-c]{60,90}"], any::<bool>()).prop_map(
        |(mut row, terminated)| {
            if terminated {
                row.push('\0');
            }
            row
        },
    );

    prop::collection::vec(row, 1..8)
}

fn arb_majority() -> impl Strategy<Value = (i64, Vec<i64>)> {
    (-5i64..5, prop::collection::vec(-5i64..5, 0..16)).prop_flat_map(|(major, others)| {
        let mut rows = vec![major; others.len() + 1];
        rows.extend(others);

        (Just(major), Just(rows).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn min_max_match_sequential_fold(values in arb_values()) {
        let arena = Arena::new();
        let column = PrimitiveColumn::from(values.clone());
        let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);
        let max = aggregate::<Max<FixedSlot<i64>>>(ScalarKind::Int64);

        let min_state = fold(&min, &column, &arena);
        let max_state = fold(&max, &column, &arena);

        prop_assert_eq!(Some(fixed_result(&min, &min_state)), values.iter().copied().min());
        prop_assert_eq!(Some(fixed_result(&max, &max_state)), values.iter().copied().max());
    }

    #[test]
    fn partition_and_merge_match_single_pass(values in arb_values(), split in 0usize..48) {
        let arena = Arena::new();
        let column = PrimitiveColumn::from(values.clone());

        let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);
        prop_assert_eq!(
            fixed_result(&min, &partition_merge(&min, &values, split, &arena)),
            fixed_result(&min, &fold(&min, &column, &arena))
        );

        let max = aggregate::<Max<FixedSlot<i64>>>(ScalarKind::Int64);
        prop_assert_eq!(
            fixed_result(&max, &partition_merge(&max, &values, split, &arena)),
            fixed_result(&max, &fold(&max, &column, &arena))
        );

        let last = aggregate::<AnyLast<FixedSlot<i64>>>(ScalarKind::Int64);
        prop_assert_eq!(
            fixed_result(&last, &partition_merge(&last, &values, split, &arena)),
            fixed_result(&last, &fold(&last, &column, &arena))
        );

        let single = aggregate::<OrNull<FixedSlot<i64>>>(ScalarKind::Int64);
        prop_assert_eq!(
            nullable_result(&single, &partition_merge(&single, &values, split, &arena)),
            nullable_result(&single, &fold(&single, &column, &arena))
        );
    }

    #[test]
    fn any_merge_keeps_first_partition_value(values in arb_values(), split in 1usize..48) {
        let arena = Arena::new();
        let any = aggregate::<Any<FixedSlot<i64>>>(ScalarKind::Int64);
        let state = partition_merge(&any, &values, split, &arena);

        prop_assert_eq!(fixed_result(&any, &state), values[0]);
    }

    #[test]
    fn string_states_survive_serialization(values in arb_strings()) {
        let arena = Arena::new();
        let column: StringColumn = values.iter().collect();
        let min = aggregate::<Min<StringSlot<'_>>>(ScalarKind::String);

        let mut state = min.create_state();
        min.add_batch(&mut state, &column, 0..column.len(), &arena, None, None)
            .expect("batch in range");

        let mut buf = WriteBuffer::new();
        min.serialize(&state, &mut buf).expect("serialize");
        let bytes = buf.into_inner();

        let mut decoded = min.create_state();
        let mut read = ReadBuffer::new(&bytes);
        min.deserialize(&mut decoded, &mut read, &arena).expect("deserialize");
        prop_assert!(read.is_exhausted());

        let mut expected = StringColumn::new();
        let mut actual = StringColumn::new();
        min.insert_result_into(&state, &mut expected);
        min.insert_result_into(&decoded, &mut actual);

        prop_assert_eq!(actual.get(0), expected.get(0));
        let smallest = values.iter().min().map(String::as_bytes);
        prop_assert_eq!(Some(actual.get(0)), smallest);
    }

    #[test]
    fn reloaded_string_states_behave_like_live_ones(
        left in arb_string_rows(),
        right in arb_string_rows(),
    ) {
        let arena = Arena::new();

        check_reloaded_strings::<Min<StringSlot<'_>>>(&left, &right, &arena)?;
        check_reloaded_strings::<Max<StringSlot<'_>>>(&left, &right, &arena)?;
        check_reloaded_strings::<Any<StringSlot<'_>>>(&left, &right, &arena)?;
        check_reloaded_strings::<AnyLast<StringSlot<'_>>>(&left, &right, &arena)?;
        check_reloaded_strings::<AnyHeavy<StringSlot<'_>>>(&left, &right, &arena)?;
        check_reloaded_strings::<OrNull<StringSlot<'_>>>(&left, &right, &arena)?;
    }

    #[test]
    fn any_heavy_reports_strict_majority((major, rows) in arb_majority()) {
        let arena = Arena::new();
        let column = PrimitiveColumn::from(rows);
        let heavy = aggregate::<AnyHeavy<FixedSlot<i64>>>(ScalarKind::Int64);

        let state = fold(&heavy, &column, &arena);

        prop_assert_eq!(fixed_result(&heavy, &state), major);
    }
}

// ---------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------

#[test]
fn min_over_unordered_kind_is_illegal_argument() {
    let err = SingleValueAggregate::<Min<GenericSlot>>::try_new(ScalarKind::Map)
        .expect_err("maps are not comparable");

    assert_eq!(err.class, ErrorClass::IllegalArgument);
}

#[test]
fn any_over_unordered_kind_is_allowed() {
    let agg = SingleValueAggregate::<Any<GenericSlot>>::try_new(ScalarKind::Map)
        .expect("any needs no ordering");

    assert_eq!(agg.name(), "any");
}

#[test]
fn slot_storage_must_match_argument_kind() {
    let width = SingleValueAggregate::<Min<FixedSlot<i32>>>::try_new(ScalarKind::Int64)
        .expect_err("width mismatch");
    let storage = SingleValueAggregate::<Min<FixedSlot<i64>>>::try_new(ScalarKind::String)
        .expect_err("storage mismatch");

    assert_eq!(width.class, ErrorClass::IllegalArgument);
    assert_eq!(storage.class, ErrorClass::IllegalArgument);
}

#[test]
fn function_names_resolve_and_unknown_names_are_unsupported() {
    for kind in AggregateKind::ALL {
        assert_eq!(
            AggregateKind::from_name(kind.name()).expect("known name"),
            kind
        );
    }

    let err = AggregateKind::from_name("median").expect_err("unknown name");
    assert_eq!(err.class, ErrorClass::Unsupported);
}

#[test]
fn only_single_value_or_null_is_nullable() {
    let single = aggregate::<OrNull<FixedSlot<i64>>>(ScalarKind::Int64);
    let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);

    assert!(single.result_is_nullable());
    assert!(!min.result_is_nullable());
    assert_eq!(single.name(), "singleValueOrNull");
}

#[test]
fn only_string_slots_allocate_in_arena() {
    assert!(aggregate::<Max<StringSlot<'_>>>(ScalarKind::String).allocates_memory_in_arena());
    assert!(!aggregate::<Max<FixedSlot<i64>>>(ScalarKind::Int64).allocates_memory_in_arena());
}

// ---------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------

#[test]
fn batch_skips_filtered_rows() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![5i64, 1, 3]);
    let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = min.create_state();

    min.add_batch(&mut state, &column, 0..3, &arena, Some(&[true, false, true]), None)
        .expect("batch in range");

    assert_eq!(fixed_result(&min, &state), 3);
}

#[test]
fn batch_skips_null_rows() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![5i64, 9, 3]);
    let max = aggregate::<Max<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = max.create_state();

    max.add_batch(&mut state, &column, 0..3, &arena, None, Some(&[false, true, false]))
        .expect("batch in range");

    assert_eq!(fixed_result(&max, &state), 5);
}

#[test]
fn batch_honours_sub_range() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![1i64, 8, 6, 0]);
    let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = min.create_state();

    min.add_batch(&mut state, &column, 1..3, &arena, None, None)
        .expect("batch in range");

    assert_eq!(fixed_result(&min, &state), 6);
}

#[test]
fn any_batch_stops_after_first_applied_row() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![7i64, 8, 9]);
    let any = aggregate::<Any<FixedSlot<i64>>>(ScalarKind::Int64);
    let sink = CapturingSink::default();
    let mut state = any.create_state();

    with_metrics_sink(&sink, || {
        any.add_batch(&mut state, &column, 0..3, &arena, Some(&[false, true, true]), None)
            .expect("batch in range");
        any.add_batch(&mut state, &column, 0..3, &arena, None, None)
            .expect("batch in range");
    });

    assert_eq!(fixed_result(&any, &state), 8);
    assert_eq!(
        sink.events.borrow().as_slice(),
        &[
            MetricsEvent::Batch {
                kind: AggregateKind::Any,
                rows_scanned: 2,
                short_circuited: true,
            },
            MetricsEvent::Batch {
                kind: AggregateKind::Any,
                rows_scanned: 0,
                short_circuited: true,
            },
        ]
    );
}

#[test]
fn any_batch_of_only_filtered_rows_leaves_state_empty() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![7i64, 8]);
    let any = aggregate::<Any<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = any.create_state();

    any.add_batch(&mut state, &column, 0..2, &arena, Some(&[false, false]), None)
        .expect("batch in range");

    assert!(!state.has());
}

#[test]
fn batch_range_beyond_column_is_invariant_violation() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![1i64, 2, 3]);
    let min = aggregate::<Min<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = min.create_state();

    let err = min
        .add_batch(&mut state, &column, 0..5, &arena, None, None)
        .expect_err("range past column end");
    assert_eq!(err.class, ErrorClass::InvariantViolation);

    let err = min
        .add_batch(&mut state, &column, 0..3, &arena, Some(&[true]), None)
        .expect_err("filter shorter than range");
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert!(!state.has());
}

#[test]
fn add_many_defaults_votes_for_every_repetition() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![4i64, 2]);
    let heavy = aggregate::<AnyHeavy<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = heavy.create_state();

    heavy.add_many_defaults(&mut state, &column, 3, &arena);
    heavy.add(&mut state, &column, 1, &arena);
    heavy.add(&mut state, &column, 1, &arena);

    assert_eq!(fixed_result(&heavy, &state), 4);
    assert_eq!(state.counter(), 1);
}

fn assert_empty_merge_stays_empty<'a, P: Policy<'a>>(scalar: ScalarKind, arena: &'a Arena) {
    let agg = aggregate::<P>(scalar);
    let mut dst = agg.create_state();

    agg.merge(&mut dst, &agg.create_state(), arena);

    assert!(!dst.has(), "{}", agg.name());
}

#[test]
fn merging_empty_states_stays_empty() {
    let arena = Arena::new();

    assert_empty_merge_stays_empty::<Min<FixedSlot<i64>>>(ScalarKind::Int64, &arena);
    assert_empty_merge_stays_empty::<Max<StringSlot<'_>>>(ScalarKind::String, &arena);
    assert_empty_merge_stays_empty::<Any<GenericSlot>>(ScalarKind::Array, &arena);
    assert_empty_merge_stays_empty::<AnyLast<FixedSlot<i64>>>(ScalarKind::Int64, &arena);
    assert_empty_merge_stays_empty::<AnyHeavy<FixedSlot<i64>>>(ScalarKind::Int64, &arena);
    assert_empty_merge_stays_empty::<OrNull<StringSlot<'_>>>(ScalarKind::String, &arena);
}

// ---------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------

#[test]
fn deserialize_reports_corrupt_state() {
    let arena = Arena::new();
    let single = aggregate::<OrNull<FixedSlot<i64>>>(ScalarKind::Int64);
    let mut state = single.create_state();

    let err = single
        .deserialize(&mut state, &mut ReadBuffer::new(&[7]), &arena)
        .expect_err("invalid has byte");

    assert!(err.is_corruption());
}

#[test]
fn serialize_records_state_bytes() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![3i64]);
    let max = aggregate::<Max<FixedSlot<i64>>>(ScalarKind::Int64);
    let state = fold(&max, &column, &arena);
    let sink = CapturingSink::default();
    let mut buf = WriteBuffer::new();

    with_metrics_sink(&sink, || max.serialize(&state, &mut buf))
        .expect("serialize");

    assert_eq!(buf.len(), 9);
    assert_eq!(
        sink.events.borrow().as_slice(),
        &[MetricsEvent::Serialize {
            kind: AggregateKind::Max,
            bytes: 9,
        }]
    );
}

#[test]
fn single_value_string_state_agrees_with_its_reloaded_copy() {
    let arena = Arena::new();
    let agg = aggregate::<OrNull<StringSlot<'_>>>(ScalarKind::String);
    let column: StringColumn = ["abc"].into_iter().collect();

    let mut live = agg.create_state();
    let mut other = agg.create_state();
    agg.add(&mut live, &column, 0, &arena);
    agg.add(&mut other, &column, 0, &arena);
    agg.merge(&mut live, &reload(&agg, &other, &arena), &arena);

    assert!(!live.is_conflicted());
    let output = emitted(&agg, &live);
    assert!(!output.is_null(0));
    assert_eq!(output.nested().get(0), b"abc");
}

#[test]
fn any_heavy_string_vote_counts_after_reload() {
    let arena = Arena::new();
    let agg = aggregate::<AnyHeavy<StringSlot<'_>>>(ScalarKind::String);
    let column: StringColumn = ["abc"].into_iter().collect();

    let mut state = agg.create_state();
    agg.add(&mut state, &column, 0, &arena);
    let mut reloaded = reload(&agg, &state, &arena);
    agg.add(&mut reloaded, &column, 0, &arena);

    assert_eq!(reloaded.counter(), 2);
    assert_eq!(reloaded.bytes(), b"abc");
}
