use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::info;

use traversal_core::engine::game_loop::FixedTimestep;
use traversal_core::engine::input::{Action, PlayerInput};
use traversal_core::game::characters::DEFAULT_CONTROLLER;
use traversal_core::game::platforms::{FinishAction, LoopPolicy, PathSegment};
use traversal_core::game::{Stage, SurfaceTag};

/// Scripted button changes: (tick, action, pressed)
const SCRIPT: &[(u64, Action, bool)] = &[
    (30, Action::MoveRight, true),
    (90, Action::Jump, true),
    (91, Action::Jump, false),
    (110, Action::Up, true),
    (110, Action::Dash, true),
    (111, Action::Dash, false),
    (112, Action::Up, false),
    (150, Action::MoveRight, false),
    (240, Action::Down, true),
    (242, Action::Down, false),
];

const DEMO_TICKS: u64 = 360;

fn build_stage() -> Result<Stage> {
    let mut stage = Stage::new();

    stage.add_ground(Vec2::new(0.0, -0.5), Vec2::new(30.0, 0.5), SurfaceTag::Full);
    stage.add_ground(Vec2::new(12.0, 3.0), Vec2::new(2.0, 0.1), SurfaceTag::Half);
    stage.add_ground(Vec2::new(20.0, 5.0), Vec2::new(0.5, 5.0), SurfaceTag::Full);

    stage.add_platform(
        Vec2::new(-6.0, 2.0),
        Vec2::new(1.5, 0.2),
        SurfaceTag::Full,
        vec![
            PathSegment::linear(Vec2::new(4.0, 0.0), 2.0).with_waits(0.5, 0.0),
            PathSegment::circular(1.0, 90.0, 180.0, 3.0),
        ],
        LoopPolicy::PingPong,
        FinishAction::Freeze,
    )?;

    Ok(stage)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting traversal demo...");

    let mut stage = build_stage()?;
    let player = stage.spawn_character(Vec2::new(0.0, 1.0), DEFAULT_CONTROLLER)?;
    let mut input = PlayerInput::new(0);
    let mut timestep = FixedTimestep::new();

    // Uneven frame times, as a real display loop would report them
    let frames = [15, 17, 16, 18, 14].map(Duration::from_millis);

    'frames: for frame_time in frames.iter().cycle() {
        for _ in 0..timestep.advance(*frame_time) {
            let tick = stage.tick_count();
            if tick >= DEMO_TICKS {
                break 'frames;
            }

            for &(at, action, pressed) in SCRIPT {
                if at == tick {
                    if pressed {
                        input.press(action);
                    } else {
                        input.release(action);
                    }
                }
            }

            let origin = stage.character_position(player).unwrap_or_default();
            stage.step(&[(player, input.frame(origin))]);
            input.update();

            if tick % 30 == 0 {
                let position = stage.character_position(player).unwrap_or_default();
                let locomotion = stage.controller(player).map(|c| c.locomotion());
                info!(
                    "tick {tick}: position ({:.2}, {:.2}), {locomotion:?}",
                    position.x, position.y
                );
            }
        }
    }

    info!(
        "Demo finished after {} frames and {} ticks ({:?} simulated)",
        timestep.frame_count(),
        timestep.tick_count(),
        timestep.simulated_time()
    );

    Ok(())
}
