use approx::assert_abs_diff_eq;
use vizij_actions_core::{
    Action, ActionError, ActionState, Easing, Property, PropertyNode, Target, Value,
};

fn run_to_end(action: &mut Action, node: &mut PropertyNode, dt: f32) -> usize {
    let mut ticks = 0;
    while !action.tick(dt, node).unwrap() {
        ticks += 1;
        assert!(ticks < 10_000, "action never finished");
    }
    ticks + 1
}

#[test]
fn by_adds_delta_to_start() {
    let mut node = PropertyNode::new();
    node.rotation = 10.0;
    let mut action = Action::rotate_by(1.0, 90.0).unwrap();

    assert!(!action.tick(0.5, &mut node).unwrap());
    assert_abs_diff_eq!(node.rotation, 55.0, epsilon = 1e-5);
    assert_eq!(action.state(), ActionState::Running);

    assert!(action.tick(0.5, &mut node).unwrap());
    assert_abs_diff_eq!(node.rotation, 100.0, epsilon = 1e-5);
    assert_eq!(action.state(), ActionState::Finished);
}

#[test]
fn to_lands_exactly_on_end_value() {
    let mut node = PropertyNode::new();
    let mut action = Action::fade_to(2.0, 0.0).unwrap();

    action.tick(1.0, &mut node).unwrap();
    assert_abs_diff_eq!(node.opacity, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(action.progress(), 0.5, epsilon = 1e-6);

    // Overshooting the duration still lands on the end value
    assert!(action.tick(1.5, &mut node).unwrap());
    assert_eq!(node.opacity, 0.0);
}

#[test]
fn finished_actions_never_write_again() {
    let mut node = PropertyNode::new();
    let mut action = Action::move_to(1.0, [10.0, 20.0]).unwrap();
    run_to_end(&mut action, &mut node, 0.25);
    assert_eq!(node.position, [10.0, 20.0]);

    node.position = [-1.0, -1.0];
    assert!(action.tick(0.5, &mut node).unwrap());
    assert_eq!(node.position, [-1.0, -1.0]);
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let mut node = PropertyNode::new();
    let mut action = Action::place(Property::Rotation, Value::Float(45.0)).unwrap();
    assert_eq!(action.duration(), 0.0);
    assert!(action.tick(0.0, &mut node).unwrap());
    assert_eq!(node.rotation, 45.0);
    assert_eq!(action.progress(), 1.0);
}

#[test]
fn start_value_is_captured_on_first_tick() {
    let mut node = PropertyNode::at([5.0, 5.0]);
    let mut action = Action::move_by(1.0, [10.0, 0.0]).unwrap();

    // The target changes between construction and the first tick
    node.position = [100.0, 0.0];
    run_to_end(&mut action, &mut node, 0.5);
    assert_eq!(node.position, [110.0, 0.0]);
    match &action {
        Action::Tween(t) => assert_eq!(t.start_value(), Some(&Value::Vec2([100.0, 0.0]))),
        other => panic!("expected tween, got {other:?}"),
    }
}

#[test]
fn eased_tween_keeps_endpoints() {
    let mut node = PropertyNode::new();
    let mut action = Action::rotate_to(1.0, 180.0)
        .unwrap()
        .with_easing(Easing::BackInOut);
    let mut min = f32::MAX;
    while !action.tick(0.05, &mut node).unwrap() {
        min = min.min(node.rotation);
    }
    // Back easing overshoots below the start on the way in
    assert!(min < 0.0);
    assert_eq!(node.rotation, 180.0);
}

#[test]
fn color_tint_interpolates_each_channel() {
    let mut node = PropertyNode::new();
    let mut action = Action::tint_to(1.0, [0.0, 0.5, 1.0, 0.0]).unwrap();
    action.tick(0.5, &mut node).unwrap();
    assert_abs_diff_eq!(node.color[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(node.color[1], 0.75, epsilon = 1e-6);
    assert_abs_diff_eq!(node.color[2], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(node.color[3], 0.5, epsilon = 1e-6);
}

#[test]
fn frames_step_by_truncation() {
    let mut node = PropertyNode::new();
    let mut action = Action::frames_by(1.0, 4).unwrap();
    action.tick(0.3, &mut node).unwrap();
    assert_eq!(node.frame, 1);
    action.tick(0.3, &mut node).unwrap();
    assert_eq!(node.frame, 2);
    assert!(action.tick(0.4, &mut node).unwrap());
    assert_eq!(node.frame, 4);
}

#[test]
fn scale_drives_both_axes() {
    let mut node = PropertyNode::new();
    let mut action = Action::scale_to(1.0, 2.0, 3.0).unwrap();
    run_to_end(&mut action, &mut node, 0.1);
    assert_eq!(node.scale, [2.0, 3.0]);
}

#[test]
fn custom_slot_values_are_animated() {
    let mut node = PropertyNode::new().with_custom(3, Value::Vec3([0.0, 0.0, 0.0]));
    let mut action = Action::by(Property::Custom(3), 1.0, Value::Vec3([1.0, 2.0, 3.0])).unwrap();
    run_to_end(&mut action, &mut node, 0.5);
    assert_eq!(
        node.get_property(Property::Custom(3)).unwrap(),
        Value::Vec3([1.0, 2.0, 3.0])
    );
}

#[test]
fn construction_rejects_bad_input() {
    assert_eq!(
        Action::delay(-1.0).unwrap_err(),
        ActionError::InvalidDuration { duration: -1.0 }
    );
    assert!(matches!(
        Action::rotate_by(f32::NAN, 1.0),
        Err(ActionError::InvalidDuration { .. })
    ));
    assert!(matches!(
        Action::by(Property::Position, 1.0, Value::Float(1.0)),
        Err(ActionError::ValueKindMismatch { .. })
    ));
}

#[test]
fn tick_time_errors_are_reported() {
    let mut node = PropertyNode::new();
    let mut missing = Action::by(Property::Custom(9), 1.0, Value::Float(1.0)).unwrap();
    assert_eq!(
        missing.tick(0.1, &mut node).unwrap_err(),
        ActionError::UnsupportedProperty {
            property: Property::Custom(9)
        }
    );

    let mut action = Action::rotate_by(1.0, 1.0).unwrap();
    assert!(matches!(
        action.tick(-0.1, &mut node),
        Err(ActionError::InvalidDelta { .. })
    ));
}

#[test]
fn fresh_copy_starts_over() {
    let mut node = PropertyNode::new();
    let mut action = Action::rotate_by(1.0, 10.0).unwrap();
    run_to_end(&mut action, &mut node, 0.5);

    let mut again = action.fresh();
    assert_eq!(again.state(), ActionState::Pending);
    assert_eq!(again.elapsed(), 0.0);
    run_to_end(&mut again, &mut node, 0.5);
    assert_eq!(node.rotation, 20.0);
    // The original is untouched
    assert!(action.is_finished());
}
