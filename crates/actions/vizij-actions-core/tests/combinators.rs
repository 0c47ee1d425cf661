use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use vizij_actions_core::{Action, ActionError, ActionState, PropertyNode, RepeatCount};

fn delays(durations: &[f32]) -> Vec<Action> {
    durations
        .iter()
        .map(|d| Action::delay(*d).unwrap())
        .collect()
}

fn counter() -> (Arc<AtomicUsize>, Action) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let action = Action::callback(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, action)
}

#[test]
fn durations_compose() {
    let seq = Action::sequence(delays(&[1.0, 2.0, 0.5]));
    let spawn = Action::spawn(delays(&[1.0, 2.0, 0.5]));
    assert_abs_diff_eq!(seq.duration(), 3.5, epsilon = 1e-6);
    assert_abs_diff_eq!(spawn.duration(), 2.0, epsilon = 1e-6);

    let repeated = Action::repeat(Action::sequence(delays(&[0.25, 0.25])), 3);
    assert_abs_diff_eq!(repeated.duration(), 1.5, epsilon = 1e-6);

    let forever = Action::repeat_forever(Action::delay(1.0).unwrap()).unwrap();
    assert!(forever.duration().is_infinite());
}

#[test]
fn sequence_carries_overflow_into_next_child() {
    let mut node = PropertyNode::new();
    let mut seq = Action::sequence(vec![
        Action::move_by(1.0, [10.0, 0.0]).unwrap(),
        Action::move_by(1.0, [0.0, 10.0]).unwrap(),
    ]);

    assert!(!seq.tick(1.5, &mut node).unwrap());
    assert_abs_diff_eq!(node.position[0], 10.0, epsilon = 1e-5);
    assert_abs_diff_eq!(node.position[1], 5.0, epsilon = 1e-5);
    match &seq {
        Action::Sequence(s) => {
            assert_eq!(s.current_index(), 1);
            assert!(s.children()[0].is_finished());
        }
        other => panic!("expected sequence, got {other:?}"),
    }

    assert!(seq.tick(0.5, &mut node).unwrap());
    assert_eq!(node.position, [10.0, 10.0]);
}

#[test]
fn sequence_children_capture_after_predecessor() {
    let mut node = PropertyNode::new();
    let mut seq = Action::sequence(vec![
        Action::move_to(1.0, [50.0, 0.0]).unwrap(),
        Action::move_by(1.0, [0.0, 10.0]).unwrap(),
    ]);
    // A single large tick runs both children to completion
    assert!(seq.tick(5.0, &mut node).unwrap());
    assert_eq!(node.position, [50.0, 10.0]);
}

#[test]
fn small_ticks_and_one_big_tick_agree() {
    let third = 1.0_f32 / 3.0;
    let mut node = PropertyNode::new();
    let mut action = Action::rotate_by(1.0, 30.0).unwrap();
    assert!(!action.tick(third, &mut node).unwrap());
    assert!(!action.tick(third, &mut node).unwrap());
    assert!(action.tick(third, &mut node).unwrap());
    assert_eq!(node.rotation, 30.0);

    // Same for a sequence: the second child starts in the tick that finishes the first
    let mut a = PropertyNode::new();
    let mut b = PropertyNode::new();
    let make = || {
        Action::sequence(vec![
            Action::rotate_by(0.5, 10.0).unwrap(),
            Action::rotate_by(0.5, 10.0).unwrap(),
        ])
    };
    let mut stepped = make();
    for _ in 0..10 {
        stepped.tick(0.1, &mut a).unwrap();
    }
    let mut jumped = make();
    jumped.tick(1.0, &mut b).unwrap();
    assert!(stepped.is_finished());
    assert!(jumped.is_finished());
    assert_abs_diff_eq!(a.rotation, b.rotation, epsilon = 1e-4);
}

#[test]
fn spawn_runs_children_concurrently() {
    let mut node = PropertyNode::new();
    let mut spawn = Action::spawn(vec![
        Action::move_by(1.0, [10.0, 0.0]).unwrap(),
        Action::rotate_by(2.0, 90.0).unwrap(),
    ]);

    assert!(!spawn.tick(1.5, &mut node).unwrap());
    // The shorter child holds its final value while the longer one keeps going
    assert_eq!(node.position, [10.0, 0.0]);
    assert_abs_diff_eq!(node.rotation, 67.5, epsilon = 1e-4);
    assert_eq!(spawn.state(), ActionState::Running);

    assert!(spawn.tick(0.5, &mut node).unwrap());
    assert_eq!(node.rotation, 90.0);
}

#[test]
fn spawn_inside_sequence_passes_leftover() {
    let mut node = PropertyNode::new();
    let mut seq = Action::sequence(vec![
        Action::spawn(vec![
            Action::delay(0.5).unwrap(),
            Action::rotate_by(1.0, 10.0).unwrap(),
        ]),
        Action::fade_to(1.0, 0.0).unwrap(),
    ]);
    seq.tick(1.5, &mut node).unwrap();
    assert_eq!(node.rotation, 10.0);
    assert_abs_diff_eq!(node.opacity, 0.5, epsilon = 1e-5);
}

#[test]
fn repeat_recaptures_start_each_iteration() {
    let mut node = PropertyNode::new();
    let mut action = Action::repeat(Action::rotate_by(1.0, 10.0).unwrap(), 3);

    action.tick(1.0, &mut node).unwrap();
    assert_eq!(node.rotation, 10.0);

    assert!(action.tick(2.0, &mut node).unwrap());
    assert_eq!(node.rotation, 30.0);
    match &action {
        Action::Repeat(r) => {
            assert_eq!(r.completed(), 3);
            assert_eq!(r.count(), RepeatCount::Times(3));
        }
        other => panic!("expected repeat, got {other:?}"),
    }
}

#[test]
fn repeat_zero_times_finishes_without_writes() {
    let mut node = PropertyNode::new();
    let mut action = Action::repeat(Action::rotate_by(1.0, 10.0).unwrap(), 0);
    assert!(action.tick(0.1, &mut node).unwrap());
    assert_eq!(node.rotation, 0.0);
}

#[test]
fn repeat_forever_never_finishes() {
    let mut node = PropertyNode::new();
    let mut action = Action::repeat_forever(Action::rotate_by(1.0, 10.0).unwrap()).unwrap();
    for _ in 0..10 {
        assert!(!action.tick(0.5, &mut node).unwrap());
    }
    assert_abs_diff_eq!(node.rotation, 50.0, epsilon = 1e-4);
    let progress = action.progress();
    assert!((0.0..=1.0).contains(&progress));
}

#[test]
fn repeat_forever_rejects_zero_duration_children() {
    let (_, cb) = counter();
    assert_eq!(
        Action::repeat_forever(cb).unwrap_err(),
        ActionError::ZeroDurationRepeat
    );
    assert_eq!(
        Action::repeat_forever(Action::sequence(Vec::new())).unwrap_err(),
        ActionError::ZeroDurationRepeat
    );
    assert_eq!(
        Action::repeat_forever(Action::delay(0.0).unwrap()).unwrap_err(),
        ActionError::ZeroDurationRepeat
    );
}

#[test]
fn repeat_forever_of_sub_epsilon_leaves_yields_each_tick() {
    let mut node = PropertyNode::new();
    // The total is above the rounding tolerance even though every leaf snaps on its own
    let inner = Action::sequence(vec![
        Action::delay(0.9e-6).unwrap(),
        Action::delay(0.9e-6).unwrap(),
    ]);
    let mut action = Action::repeat_forever(inner).unwrap();
    for _ in 0..3 {
        assert!(!action.tick(1.0 / 60.0, &mut node).unwrap());
    }
    assert!(!action.tick(0.0, &mut node).unwrap());
    assert_eq!(action.state(), ActionState::Running);
}

#[test]
fn empty_combinators_finish_immediately() {
    let mut node = PropertyNode::new();
    assert!(Action::sequence(Vec::new()).tick(0.1, &mut node).unwrap());
    assert!(Action::spawn(Vec::new()).tick(0.1, &mut node).unwrap());
}

#[test]
fn callback_fires_once_per_run() {
    let mut node = PropertyNode::new();
    let (count, cb) = counter();
    let mut seq = Action::sequence(vec![cb, Action::delay(1.0).unwrap()]);
    for _ in 0..5 {
        seq.tick(0.1, &mut node).unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let (count, cb) = counter();
    let mut repeated = Action::repeat(
        Action::sequence(vec![Action::delay(0.25).unwrap(), cb]),
        4,
    );
    assert!(repeated.tick(1.0, &mut node).unwrap());
    assert_eq!(count.load(Ordering::SeqCst), 4);
}

#[test]
fn cloned_templates_do_not_share_state() {
    let mut node = PropertyNode::new();
    let template = Action::sequence(vec![Action::rotate_by(1.0, 10.0).unwrap()]);
    let mut first = template.clone();
    first.tick(0.5, &mut node).unwrap();
    assert_eq!(template.state(), ActionState::Pending);
    assert_eq!(template.elapsed(), 0.0);
}
