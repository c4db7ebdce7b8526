use nm_autocorr::SnapshotSchedule;

#[test]
fn chain_length_is_a_multiple_of_the_lcm() {
    // lcm 6, the coarsest thinning sees 2 snapshots per block, 3 blocks for 5
    let schedule = SnapshotSchedule::new(&[2, 3], 5, 100).unwrap();
    assert_eq!(schedule.lcm(), 6);
    assert_eq!(schedule.chain_length(), 18);
    assert_eq!(schedule.snapshot_count(2), 9);
    assert_eq!(schedule.snapshot_count(3), 6);
    assert_eq!(
        schedule.snapshots(),
        &[2, 3, 4, 6, 8, 9, 10, 12, 14, 15, 16, 18]
    );
    assert_eq!(schedule.last_snapshot_for(3), Some(18));
}

#[test]
fn one_block_suffices_for_small_minimums() {
    let schedule = SnapshotSchedule::new(&[4, 6], 1, 100).unwrap();
    assert_eq!(schedule.lcm(), 12);
    assert_eq!(schedule.chain_length(), 12);
    assert_eq!(schedule.points_for(4), vec![4, 8, 12]);
    assert_eq!(schedule.points_for(6), vec![6, 12]);

    let schedule = SnapshotSchedule::new(&[4, 6], 0, 100).unwrap();
    assert_eq!(schedule.chain_length(), 12);
}

#[test]
fn snapshot_cap_truncates_points() {
    let schedule = SnapshotSchedule::new(&[1], 20, 5).unwrap();
    assert_eq!(schedule.chain_length(), 20);
    assert_eq!(schedule.points_for(1), vec![1, 2, 3, 4, 5]);
    assert_eq!(schedule.last_snapshot_for(1), Some(5));
    assert_eq!(schedule.snapshots().len(), 5);
    assert_eq!(schedule.thinnings(), &[1]);
    assert_eq!(schedule.min_snapshots(), 20);
    assert_eq!(schedule.max_snapshots(), 5);
}

#[test]
fn thinnings_outside_the_schedule_take_no_snapshots() {
    let schedule = SnapshotSchedule::new(&[2], 2, 10).unwrap();
    assert_eq!(schedule.chain_length(), 4);
    assert_eq!(schedule.snapshot_count(8), 0);
    assert_eq!(schedule.last_snapshot_for(8), None);
    assert_eq!(schedule.snapshot_count(0), 0);
}

#[test]
fn invalid_schedules_are_rejected() {
    let err = SnapshotSchedule::new(&[], 5, 10).unwrap_err();
    assert_eq!(err.info().code, "empty-thinnings");
    let err = SnapshotSchedule::new(&[2, 0], 5, 10).unwrap_err();
    assert_eq!(err.info().code, "zero-thinning");
    assert_eq!(err.info().context.get("position").map(String::as_str), Some("1"));
    let err = SnapshotSchedule::new(&[2], 5, 0).unwrap_err();
    assert_eq!(err.info().code, "max-snapshots");
    let err = SnapshotSchedule::new(&[usize::MAX, usize::MAX - 1], 1, 10).unwrap_err();
    assert_eq!(err.info().code, "thinning-overflow");
}
