//! Drives one node through a scripted sequence and prints its state every few frames.
//!
//! Run with `RUST_LOG=debug` to see runner lifecycle logs.

use anyhow::Result;
use hashbrown::HashMap;
use vizij_actions_core::{Action, ActionRunner, Config, Easing, PropertyNode, Tag, TargetId};

fn main() -> Result<()> {
    env_logger::init();

    let mut runner = ActionRunner::new(Config {
        max_frame_delta: Some(0.1),
        ..Config::default()
    });
    let node = runner.register_target();
    let mut nodes: HashMap<TargetId, PropertyNode> = HashMap::new();
    nodes.insert(node, PropertyNode::at([0.0, 0.0]));

    let there = Action::sequence(vec![
        Action::spawn(vec![
            Action::move_by(1.0, [120.0, 0.0])?,
            Action::rotate_by(1.0, 180.0)?,
        ])
        .with_easing(Easing::CubicInOut),
        Action::delay(0.25)?,
        Action::fade_to(0.5, 0.2)?,
        Action::callback(|| println!("arrived")),
    ]);
    let handle = runner.run(node, there, Some(Tag(1)))?;

    let dt = 1.0 / 30.0;
    let mut frame = 0u32;
    while runner.is_running(handle) {
        let out = runner.update(dt, &mut nodes)?;
        for event in &out.events {
            println!("event: {event:?}");
        }
        if frame % 6 == 0 {
            let n = &nodes[&node];
            println!(
                "frame {frame:>3}: pos=({:.1}, {:.1}) rot={:.1} opacity={:.2}",
                n.position[0], n.position[1], n.rotation, n.opacity
            );
        }
        frame += 1;
    }

    // By-actions reverse without having run, so the way back can be built up front.
    let back = Action::sequence(vec![
        Action::fade_to(0.5, 1.0)?,
        Action::spawn(vec![
            Action::move_by(1.0, [120.0, 0.0])?,
            Action::rotate_by(1.0, 180.0)?,
        ])
        .reverse()?,
    ]);
    runner.run(node, back, Some(Tag(1)))?;
    for _ in 0..60 {
        runner.update(dt, &mut nodes)?;
    }
    let n = &nodes[&node];
    println!(
        "back home: pos=({:.1}, {:.1}) rot={:.1} opacity={:.2}",
        n.position[0], n.position[1], n.rotation, n.opacity
    );
    Ok(())
}
