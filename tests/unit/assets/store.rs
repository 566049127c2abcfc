use super::*;
use crate::foundation::error::ScrollseqError;

fn store(n: usize) -> FrameStore {
    FrameStore::new(FrameCount::new(n).unwrap())
}

#[test]
fn new_store_is_all_pending() {
    let s = store(300);
    assert_eq!(s.count().get(), 300);
    assert_eq!(s.pending_count(), 300);
    assert!(!s.is_ready(FrameIndex(0)));
    assert!(s.get(FrameIndex(0)).is_none());
    assert!(!s.is_settled());
}

#[test]
fn out_of_range_is_never_ready() {
    let mut s = store(2);
    assert!(s.slot(FrameIndex(2)).is_none());
    assert!(!s.is_ready(FrameIndex(2)));
    assert!(s.get(FrameIndex(99)).is_none());
    assert!(!s.complete(FrameIndex(2), Ok(PreparedImage::solid(1, 1, [0, 0, 0, 255]))));
    assert_eq!(s.pending_count(), 2);
}

#[test]
fn completions_in_any_order() {
    let mut s = store(3);
    assert!(s.complete(FrameIndex(2), Ok(PreparedImage::solid(4, 2, [1, 2, 3, 255]))));
    assert!(s.is_ready(FrameIndex(2)));
    assert!(!s.is_ready(FrameIndex(0)));

    let img = s.get(FrameIndex(2)).unwrap();
    assert_eq!((img.width, img.height), (4, 2));
    assert_eq!(img.rgba8_premul.len(), 4 * 2 * 4);

    assert!(s.complete(FrameIndex(0), Ok(PreparedImage::solid(4, 2, [0, 0, 0, 255]))));
    assert_eq!(s.ready_count(), 2);
    assert_eq!(s.pending_count(), 1);
}

#[test]
fn failed_load_is_never_ready_and_settles() {
    let mut s = store(2);
    assert!(s.complete(FrameIndex(1), Err(ScrollseqError::decode("corrupt"))));
    assert!(matches!(s.slot(FrameIndex(1)), Some(FrameSlot::Failed)));
    assert!(s.get(FrameIndex(1)).is_none());
    assert_eq!(s.failed_count(), 1);

    s.complete(FrameIndex(0), Ok(PreparedImage::solid(1, 1, [0, 0, 0, 255])));
    assert!(s.is_settled());
}

#[test]
fn settled_slots_are_not_overwritten() {
    let mut s = store(1);
    s.complete(FrameIndex(0), Ok(PreparedImage::solid(2, 2, [9, 9, 9, 255])));
    assert!(!s.complete(FrameIndex(0), Err(ScrollseqError::decode("late failure"))));
    assert!(s.is_ready(FrameIndex(0)));
    assert_eq!(s.ready_count(), 1);
    assert_eq!(s.failed_count(), 0);
}
