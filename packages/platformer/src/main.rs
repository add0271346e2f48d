#[macro_use]
extern crate tracing;

use platformer::{
    logging::init_logging,
    settings::{
        PhysicsSettings,
        SETTINGS_FILE_NAME,
    },
    physics::prelude::*,
    viewport::Viewport,
};
use tile_grid::{
    AaRect,
    TileGrid,
    TypeMask,
    TypeRegistry,
};
use std::env::args;
use vek::*;


const CLI_HELP: &'static str = r#"Runs a scripted platformer level headlessly and logs what happens.

Examples:

    [this command]
    Run the demo level.

    [this command] --write-settings
    Write the current physics settings to physics.json and exit.

Env var examples:
    RUST_LOG=platformer::physics=trace
    Changes logging levels"#;

const TICK: f32 = 1.0 / 60.0;

const LEVEL: &[&str] = &[
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "...............##.............",
    "..............###.............",
    "....../#.....####.............",
    "#####/###___#####.....########",
    "##############################",
];


fn main() {
    init_logging();
    let mut write_settings = false;
    for arg in args().skip(1) {
        match arg.as_str() {
            "--write-settings" => write_settings = true,
            "-h" | "--help" => {
                println!("{}", CLI_HELP);
                return;
            }
            _ => {
                error!("unknown argument {:?}", arg);
                println!("{}", CLI_HELP);
                return;
            }
        }
    }

    let settings = PhysicsSettings::read(SETTINGS_FILE_NAME);
    if write_settings {
        match settings.write(SETTINGS_FILE_NAME) {
            Ok(()) => info!("wrote {}", SETTINGS_FILE_NAME),
            Err(e) => error!(%e, "failed to write settings"),
        }
        return;
    }

    let mut registry = TypeRegistry::new();
    let lava = registry.register("lava");
    let types = registry.finalize();

    let tile_ext = Extent2::new(16.0, 16.0);
    let grid = TileGrid::from_rows(LEVEL, tile_ext, TypeMask::DEFAULT | TypeMask::DOCKABLE);
    let mut stage = Stage::new(grid, types, settings.clone());

    let player = stage.add_body(
        Body::new(AaRect::new(8.0, 80.0, 10.0, 16.0), TypeMask::FRIENDLY | TypeMask::DOCKABLE)
            .with_physics(PlatformerPhysics::new(&settings.body))
            .with_mask(TypeMask::ENEMY | TypeMask::PARTICLE | TypeMask::EXIT | TypeMask::ONE_WAY_PLATFORM)
            .with_brain()
    );

    let mut rock_physics = PlatformerPhysics::new(&settings.body);
    rock_physics.vx_max = 10.0;
    rock_physics.is_heavy = true;
    rock_physics.is_pushable = true;
    let rock = stage.add_body(
        Body::new(AaRect::new(120.0, 80.0, 16.0, 16.0), TypeMask::DEFAULT | TypeMask::DOCKABLE)
            .with_physics(rock_physics)
    );

    stage.add_body(
        Body::new(
            AaRect::new(192.0, 48.0, 16.0, 64.0),
            TypeMask::LADDER | TypeMask::ONE_WAY_PLATFORM | TypeMask::DOCKABLE,
        )
    );
    stage.add_body(Body::new(
        AaRect::new(224.0, 80.0, 48.0, 8.0),
        TypeMask::ONE_WAY_PLATFORM | TypeMask::DOCKABLE,
    ));
    stage.add_body(
        Body::new(AaRect::new(288.0, 112.0, 64.0, 16.0), TypeMask::LIQUID | lava)
            .with_description("lava")
    );
    stage.add_body(Body::new(AaRect::new(448.0, 96.0, 16.0, 16.0), TypeMask::EXIT));

    let mut viewport = Viewport::new(320.0, 180.0).bounded_by(&stage);
    viewport.follow(&stage, player, true);

    // (commands, seconds to hold them)
    let script = [
        (Commands::empty(), 0.5),
        (Commands::RIGHT, 1.5),
        (Commands::RIGHT | Commands::JUMP, 0.3),
        (Commands::RIGHT, 1.0),
        (Commands::UP, 0.5),
        (Commands::RIGHT, 4.0),
    ];

    let mut events: Vec<(BodyKey, PhysicsEvent)> = Vec::new();
    let mut elapsed = 0.0;
    'script: for (commands, duration) in script {
        debug!(?commands, duration, "holding");
        let mut held = 0.0;
        while held < duration {
            if let Some(body) = stage.body_mut(player) {
                body.command(commands);
            }
            stage.tick(TICK, &mut events);
            for (key, event) in events.drain(..) {
                match event {
                    PhysicsEvent::ShakeViewport => {
                        let settings = stage.settings();
                        viewport.shake(settings.shake_amplitude, settings.shake_duration);
                        info!(key, "viewport shaking");
                    }
                    PhysicsEvent::ReachedExit if key == player => {
                        info!(elapsed, "player reached the exit");
                        break 'script;
                    }
                    PhysicsEvent::HitLiquid { description } if key == player => {
                        info!(elapsed, ?description, "player fell in");
                    }
                    event => trace!(key, ?event),
                }
            }
            viewport.update(&stage, TICK);
            held += TICK;
            elapsed += TICK;
        }
    }

    for (key, body) in stage.bodies() {
        info!(
            key,
            types = %stage.types().describe(body.types),
            x = body.rect.pos.x,
            y = body.rect.pos.y,
            docked = body.dock.is_docked(),
            "final position",
        );
    }
    info!(rock_x = ?stage.body(rock).map(|body| body.rect.pos.x), offsets = ?viewport.offsets(), "done");
}
