use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::modules::{
    error::code::ErrorCode,
    fileset::{flatten, memory::MemFile, FileHandle},
    selection::{Aggregate, SelectionState},
};

fn state_with_sizes(sizes: &[u64]) -> SelectionState {
    let roots: Vec<FileHandle> = sizes
        .iter()
        .enumerate()
        .map(|(i, size)| MemFile::file(&format!("/f{}", i), *size))
        .collect();
    SelectionState::new(flatten(&roots).unwrap())
}

fn expected(state: &SelectionState) -> Aggregate {
    state
        .entries()
        .iter()
        .filter(|e| e.included())
        .fold(Aggregate::default(), |mut acc, e| {
            acc.included_count += 1;
            acc.included_bytes += e.file().size();
            acc
        })
}

#[test]
fn test_everything_included_at_start() {
    let state = state_with_sizes(&[10, 20, 30, 40]);
    assert_eq!(
        state.aggregate(),
        Aggregate {
            included_count: 4,
            included_bytes: 100
        }
    );
    assert_eq!(state.included_files().len(), 4);
}

#[test]
fn test_double_toggle_restores_aggregate() {
    let mut state = state_with_sizes(&[5, 7, 11]);
    let before = state.aggregate();
    let after_first = state.toggle(1).unwrap();
    assert_eq!(
        after_first,
        Aggregate {
            included_count: 2,
            included_bytes: 16
        }
    );
    assert_eq!(state.toggle(1).unwrap(), before);
}

#[test]
fn test_aggregate_matches_included_entries_for_any_toggle_sequence() {
    let mut state = state_with_sizes(&[1, 2, 4, 8, 16, 32, 64]);
    // Deterministic walk over a mix of single and repeated toggles.
    let sequence = [0usize, 3, 3, 6, 2, 5, 0, 1, 4, 6, 6, 2];
    for index in sequence {
        let aggregate = state.toggle(index).unwrap();
        assert_eq!(aggregate, expected(&state));
        assert_eq!(state.aggregate(), aggregate);
    }
    let included: Vec<u64> = state
        .included_files()
        .iter()
        .map(|f| f.size())
        .collect();
    assert_eq!(included, vec![1, 4, 8]);
}

#[test]
fn test_out_of_range_toggle_changes_nothing() {
    let mut state = state_with_sizes(&[3, 3]);
    let err = state.toggle(2).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IndexOutOfRange);
    assert_eq!(state.aggregate().included_count, 2);
}

#[test]
fn test_listeners_see_each_change() {
    let mut state = state_with_sizes(&[100, 200]);
    let seen: Arc<Mutex<Vec<Aggregate>>> = Arc::default();
    let sink = seen.clone();
    state.subscribe(move |aggregate| sink.lock().unwrap().push(*aggregate));

    state.toggle(0).unwrap();
    state.set_included(1, false).unwrap();
    // No change, no notification.
    state.set_included(1, false).unwrap();
    state.set_included(0, true).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.iter()
            .map(|a| (a.included_count, a.included_bytes))
            .collect::<Vec<_>>(),
        vec![(1, 200), (0, 0), (1, 100)]
    );
}

#[test]
fn test_rejected_toggle_does_not_notify() {
    let mut state = state_with_sizes(&[1]);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    state.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(state.toggle(9).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_summary_line() {
    let mut state = state_with_sizes(&[1024, 512]);
    assert_eq!(state.summary(), "2 files (1.5 KB)");
    state.toggle(0).unwrap();
    assert_eq!(state.summary(), "1 file (512 bytes)");
    state.toggle(1).unwrap();
    assert_eq!(state.summary(), "0 files");
}

#[test]
fn test_empty_selection() {
    let state = SelectionState::new(flatten(&[MemFile::dir("/empty", vec![])]).unwrap());
    assert!(state.is_empty());
    assert_eq!(state.aggregate(), Aggregate::default());
}

#[test]
fn test_labels_show_index_flag_name_and_size() {
    let mut state = state_with_sizes(&[12, 1536]);
    assert_eq!(state.entries()[1].to_string(), "f1 (1.5 KB)");
    assert_eq!(
        state.labels(),
        vec!["[0] [x] f0 (12 bytes)", "[1] [x] f1 (1.5 KB)"]
    );

    state.set_included(0, false).unwrap();
    assert_eq!(state.labels()[0], "[0] [ ] f0 (12 bytes)");
    // Same value again is a no-op.
    state.set_included(0, false).unwrap();
    assert_eq!(state.aggregate().included_count, 1);
}
