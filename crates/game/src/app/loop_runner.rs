use std::process::ExitCode;

use scroller_engine::{GameWorld, RenderList};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::physics::DemoPhysics;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) frames: u64,
    pub(crate) spawned: usize,
    pub(crate) removed: usize,
    pub(crate) stomped: usize,
    pub(crate) player_hits: usize,
    pub(crate) respawns: usize,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let mut world = match GameWorld::from_config(&app.config.world) {
        Ok(world) => world,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    let summary = run_frames(&mut world, &app);
    info!(
        frames = summary.frames,
        spawned = summary.spawned,
        removed = summary.removed,
        stomped = summary.stomped,
        player_hits = summary.player_hits,
        respawns = summary.respawns,
        "shutdown"
    );
    ExitCode::SUCCESS
}

pub(crate) fn run_frames(world: &mut GameWorld, app: &AppWiring) -> RunSummary {
    let config = &app.config;
    let mut physics = DemoPhysics::new(&config.demo, config.world.grid.world_height);
    let mut viewport = config.world.viewport;
    let mut render_list = RenderList::default();
    let mut summary = RunSummary::default();
    let player_config = &config.world.player;

    for _ in 0..config.world.frames {
        let report = world.tick(&mut physics, &viewport, &mut render_list);
        summary.frames = report.frame;
        summary.spawned += usize::from(report.spawned.is_some());
        summary.removed += report.removed.len();

        let resolved = physics.resolve(world.sprites_mut());
        summary.stomped += resolved.stomped;
        summary.player_hits += resolved.player_hits;

        let sprites = world.sprites_mut();
        if sprites.player().is_dead() {
            sprites.player_mut().begin_respawn(
                player_config.x,
                player_config.y,
                player_config.hit_points,
                player_config.respawn_flicker_frames,
            );
            summary.respawns += 1;
        } else {
            let physical = sprites.player_mut().sprite_mut().physical_mut();
            physical.x = (physical.x + config.demo.player_walk_speed)
                .clamp(0.0, config.world.grid.world_width);
        }

        let player = world.sprites().player().sprite().physical();
        let max_x = (config.world.grid.world_width - viewport.width as f32).max(0.0);
        let max_y = (config.world.grid.world_height - viewport.height as f32).max(0.0);
        viewport.set_position(
            (player.x - viewport.width as f32 * 0.5).clamp(0.0, max_x),
            (player.y - viewport.height as f32 * 0.5).clamp(0.0, max_y),
        );

        let interval = config.demo.summary_interval_frames.max(1);
        if report.frame.is_multiple_of(interval) {
            info!(
                frame = report.frame,
                active = world.sprites().active_count(),
                dying = world.sprites().dying_count(),
                collidables = physics.collidable_count(),
                render_items = render_list.len(),
                "frame_summary"
            );
        }
    }
    summary
}
