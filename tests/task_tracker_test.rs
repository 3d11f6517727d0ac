use caresight::application::services::TaskTracker;
use caresight::domain::{ReviewKey, TaskStatus};

fn key() -> ReviewKey {
    ReviewKey::new("counselor-1", "20250805-101500_session.mp4")
}

#[test]
fn given_no_record_when_try_begin_then_creates_processing_record() {
    let tracker = TaskTracker::new();

    let task = tracker.try_begin(&key()).unwrap();

    assert_eq!(task.status, TaskStatus::Processing);
    assert_eq!(task.progress, 0.0);
    assert!(tracker.get(&key()).is_some());
}

#[test]
fn given_processing_record_when_try_begin_then_refuses_duplicate() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();

    let second = tracker.try_begin(&key());

    assert!(second.is_err());
}

#[test]
fn given_completed_record_when_try_begin_then_replaces_with_fresh_record() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();
    tracker.complete(&key());

    let fresh = tracker.try_begin(&key()).unwrap();

    assert_eq!(fresh.status, TaskStatus::Processing);
    assert_eq!(fresh.progress, 0.0);
}

#[test]
fn given_progress_updates_when_lower_value_arrives_then_progress_does_not_regress() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();

    tracker.update(&key(), 0.5, "halfway");
    tracker.update(&key(), 0.3, "stale update");

    let task = tracker.get(&key()).unwrap();
    assert_eq!(task.progress, 0.5);
}

#[test]
fn given_progress_above_one_when_updated_then_clamped_to_one() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();

    tracker.update(&key(), 1.5, "overshoot");

    assert_eq!(tracker.get(&key()).unwrap().progress, 1.0);
}

#[test]
fn given_completed_record_when_updated_or_failed_then_terminal_state_sticks() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();
    tracker.complete(&key());

    tracker.update(&key(), 0.2, "late stage message");
    tracker.fail(&key(), "late failure");

    let task = tracker.get(&key()).unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.progress, 1.0);
    assert!(task.error.is_none());
}

#[test]
fn given_failed_run_when_inspected_then_error_detail_is_kept() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();

    tracker.fail(&key(), "transcription: api request failed");

    let task = tracker.get(&key()).unwrap();
    assert_eq!(task.status, TaskStatus::Error);
    assert_eq!(
        task.error.as_deref(),
        Some("transcription: api request failed")
    );
    assert!(task.finished_at.is_some());
}

#[test]
fn given_evicted_record_when_fetched_then_absent() {
    let tracker = TaskTracker::new();
    tracker.try_begin(&key()).unwrap();

    tracker.evict(&key());

    assert!(tracker.get(&key()).is_none());
}

#[test]
fn given_object_eviction_when_multiple_subjects_reviewed_it_then_all_records_dropped() {
    let tracker = TaskTracker::new();
    let a = ReviewKey::new("counselor-1", "shared.mp4");
    let b = ReviewKey::new("counselor-2", "shared.mp4");
    let other = ReviewKey::new("counselor-1", "other.mp4");
    tracker.try_begin(&a).unwrap();
    tracker.try_begin(&b).unwrap();
    tracker.try_begin(&other).unwrap();

    tracker.evict_object("shared.mp4");

    assert!(tracker.get(&a).is_none());
    assert!(tracker.get(&b).is_none());
    assert!(tracker.get(&other).is_some());
}

#[test]
fn given_independent_keys_when_begun_then_both_process_concurrently() {
    let tracker = TaskTracker::new();
    let a = ReviewKey::new("counselor-1", "monday.mp4");
    let b = ReviewKey::new("counselor-1", "tuesday.mp4");

    assert!(tracker.try_begin(&a).is_ok());
    assert!(tracker.try_begin(&b).is_ok());
}
