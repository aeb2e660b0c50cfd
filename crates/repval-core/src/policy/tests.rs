use crate::{
    arena::Arena,
    column::{NullableColumn, PrimitiveColumn, StringColumn},
    policy::{Any, AnyHeavy, AnyLast, Max, Min, OrNull, Policy},
    serialize::{ReadBuffer, WriteBuffer},
    slot::{FixedSlot, StringSlot},
};

fn fold_rows<'a, P>(values: &[i32], arena: &'a Arena) -> P
where
    P: Policy<'a, Slot = FixedSlot<i32>>,
{
    let column = PrimitiveColumn::from(values.to_vec());
    let mut state = P::default();
    for row in 0..values.len() {
        state.change_if_better(&column, row, arena);
    }

    state
}

fn round_trip<'a, P: Policy<'a>>(state: &P, arena: &'a Arena) -> P {
    let mut buf = WriteBuffer::new();
    state.write(&mut buf).expect("write state");
    let bytes = buf.into_inner();

    let mut decoded = P::default();
    let mut read = ReadBuffer::new(&bytes);
    decoded.read(&mut read, arena).expect("read state");
    assert!(read.is_exhausted(), "state must consume its whole payload");

    decoded
}

fn or_null_result(state: &OrNull<FixedSlot<i32>>) -> Option<i32> {
    let mut output = NullableColumn::new(PrimitiveColumn::new()).expect("empty nested");
    state.insert_result_into(&mut output);

    (!output.is_null(0)).then(|| output.nested().get(0))
}

// ---------------------------------------------------------------------
// Min / Max / Any / AnyLast
// ---------------------------------------------------------------------

#[test]
fn min_and_max_track_extremes() {
    let arena = Arena::new();
    let values = [4, -2, 9, -2, 7];

    let min: Min<FixedSlot<i32>> = fold_rows(&values, &arena);
    let max: Max<FixedSlot<i32>> = fold_rows(&values, &arena);

    assert_eq!(min.value(), Some(-2));
    assert_eq!(max.value(), Some(9));
}

#[test]
fn any_keeps_first_and_any_last_keeps_last() {
    let arena = Arena::new();
    let values = [3, 1, 4, 1, 5];

    let any: Any<FixedSlot<i32>> = fold_rows(&values, &arena);
    let last: AnyLast<FixedSlot<i32>> = fold_rows(&values, &arena);

    assert_eq!(any.value(), Some(3));
    assert_eq!(last.value(), Some(5));
}

#[test]
fn any_merge_keeps_destination_once_populated() {
    let arena = Arena::new();
    let mut dst: Any<FixedSlot<i32>> = fold_rows(&[1], &arena);
    let src: Any<FixedSlot<i32>> = fold_rows(&[2], &arena);

    assert!(!dst.change_if_better_from(&src, &arena));
    assert_eq!(dst.value(), Some(1));

    let mut empty = Any::<FixedSlot<i32>>::default();
    assert!(empty.change_if_better_from(&src, &arena));
    assert_eq!(empty.value(), Some(2));
}

#[test]
fn any_last_merge_ignores_empty_source() {
    let arena = Arena::new();
    let mut dst: AnyLast<FixedSlot<i32>> = fold_rows(&[1], &arena);

    assert!(!dst.change_if_better_from(&AnyLast::default(), &arena));
    assert_eq!(dst.value(), Some(1));
}

#[test]
fn min_over_strings_uses_overflow_storage() {
    let arena = Arena::new();
    let long = "z".repeat(200);
    let column: StringColumn = [long.as_str(), "m", "q"].into_iter().collect();
    let mut min = Min::<StringSlot<'_>>::default();

    for row in 0..3 {
        min.change_if_better(&column, row, &arena);
    }

    let mut output = StringColumn::new();
    min.insert_result_into(&mut output);
    assert_eq!(output.get(0), b"m");
    assert!(min.capacity() >= 200);
}

// ---------------------------------------------------------------------
// AnyHeavy
// ---------------------------------------------------------------------

#[test]
fn any_heavy_reports_strict_majority() {
    let arena = Arena::new();
    let heavy: AnyHeavy<FixedSlot<i32>> = fold_rows(&[1, 2, 1, 3, 1], &arena);

    assert_eq!(heavy.value(), Some(1));
    assert_eq!(heavy.counter(), 1);
}

#[test]
fn any_heavy_counter_tracks_votes() {
    let arena = Arena::new();
    let heavy: AnyHeavy<FixedSlot<i32>> = fold_rows(&[7, 7, 7, 2], &arena);

    assert_eq!(heavy.value(), Some(7));
    assert_eq!(heavy.counter(), 2);
}

#[test]
fn any_heavy_many_defaults_counts_every_repetition() {
    let arena = Arena::new();
    let column = PrimitiveColumn::from(vec![5i32]);
    let mut heavy = AnyHeavy::<FixedSlot<i32>>::default();

    heavy.add_many_defaults(&column, 4, &arena);

    assert_eq!(heavy.value(), Some(5));
    assert_eq!(heavy.counter(), 4);
}

#[test]
fn any_heavy_merge_prefers_larger_counter() {
    let arena = Arena::new();
    let mut dst: AnyHeavy<FixedSlot<i32>> = fold_rows(&[1], &arena);
    let src: AnyHeavy<FixedSlot<i32>> = fold_rows(&[2, 2, 2], &arena);

    assert!(dst.change_if_better_from(&src, &arena));
    assert_eq!(dst.value(), Some(2));
    assert_eq!(dst.counter(), 3);
}

#[test]
fn any_heavy_merge_of_equal_values_adds_counters() {
    let arena = Arena::new();
    let mut dst: AnyHeavy<FixedSlot<i32>> = fold_rows(&[4, 4], &arena);
    let src: AnyHeavy<FixedSlot<i32>> = fold_rows(&[4, 4, 4], &arena);

    assert!(!dst.change_if_better_from(&src, &arena));
    assert_eq!(dst.counter(), 5);
}

#[test]
fn any_heavy_merge_with_weaker_source_decrements() {
    let arena = Arena::new();
    let mut dst: AnyHeavy<FixedSlot<i32>> = fold_rows(&[1, 1, 1], &arena);
    let src: AnyHeavy<FixedSlot<i32>> = fold_rows(&[2], &arena);

    assert!(!dst.change_if_better_from(&src, &arena));
    assert_eq!(dst.value(), Some(1));
    assert_eq!(dst.counter(), 2);
}

#[test]
fn any_heavy_round_trip_keeps_counter() {
    let arena = Arena::new();
    let heavy: AnyHeavy<FixedSlot<i32>> = fold_rows(&[9, 9, 9, 1], &arena);

    let decoded = round_trip(&heavy, &arena);

    assert_eq!(decoded.value(), Some(9));
    assert_eq!(decoded.counter(), heavy.counter());
}

// ---------------------------------------------------------------------
// OrNull
// ---------------------------------------------------------------------

#[test]
fn or_null_emits_the_single_value() {
    let arena = Arena::new();
    let state: OrNull<FixedSlot<i32>> = fold_rows(&[5, 5, 5], &arena);

    assert_eq!(or_null_result(&state), Some(5));
}

#[test]
fn or_null_emits_null_on_conflict() {
    let arena = Arena::new();
    let state: OrNull<FixedSlot<i32>> = fold_rows(&[5, 7], &arena);

    assert!(state.is_conflicted());
    assert_eq!(or_null_result(&state), None);
}

#[test]
fn or_null_emits_null_without_input() {
    let arena = Arena::new();
    let state: OrNull<FixedSlot<i32>> = fold_rows(&[], &arena);

    assert_eq!(or_null_result(&state), None);
}

#[test]
fn or_null_conflict_is_sticky() {
    let arena = Arena::new();
    let state: OrNull<FixedSlot<i32>> = fold_rows(&[5, 7, 5, 5], &arena);

    assert_eq!(or_null_result(&state), None);
}

#[test]
fn or_null_conflict_survives_round_trip() {
    let arena = Arena::new();
    let state: OrNull<FixedSlot<i32>> = fold_rows(&[5, 7], &arena);

    let decoded = round_trip(&state, &arena);

    assert!(decoded.is_conflicted());
    assert_eq!(or_null_result(&decoded), None);
}

#[test]
fn or_null_merge_with_empty_source_is_a_no_op() {
    let arena = Arena::new();
    let mut dst: OrNull<FixedSlot<i32>> = fold_rows(&[5], &arena);

    assert!(!dst.change_if_better_from(&OrNull::default(), &arena));
    assert_eq!(or_null_result(&dst), Some(5));
}

#[test]
fn or_null_merge_detects_cross_partition_conflict() {
    let arena = Arena::new();
    let mut dst: OrNull<FixedSlot<i32>> = fold_rows(&[5, 5], &arena);
    let src: OrNull<FixedSlot<i32>> = fold_rows(&[6], &arena);

    dst.change_if_better_from(&src, &arena);

    assert_eq!(or_null_result(&dst), None);
}

#[test]
fn or_null_merge_into_empty_adopts_source() {
    let arena = Arena::new();
    let mut dst = OrNull::<FixedSlot<i32>>::default();
    let src: OrNull<FixedSlot<i32>> = fold_rows(&[8, 8], &arena);

    assert!(dst.change_if_better_from(&src, &arena));
    assert_eq!(or_null_result(&dst), Some(8));
}

#[test]
fn or_null_read_rejects_unknown_flag_bits() {
    let arena = Arena::new();
    let mut state = OrNull::<FixedSlot<i32>>::default();

    let err = state
        .read(&mut ReadBuffer::new(&[0, 0x04]), &arena)
        .expect_err("unknown flag bits must fail");

    assert!(err.is_corruption());
}
