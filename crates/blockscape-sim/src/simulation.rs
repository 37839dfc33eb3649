//! The headless sandbox: one player driven by the [`Pilot`], an optional
//! follower, item drops, liquid ticks and a mesh cache kept in step with
//! world edits.

use glam::Vec3;
use tracing::{debug, info, warn};

use blockscape_config::{Config, GameMode};
use blockscape_mesh::{MeshCache, chunks_in_radius};
use blockscape_physics::{
    Drops, FollowerController, FollowerSettings, MiningProgress, MiningState, PlayerController,
    PlayerSettings, can_place, raycast,
};
use blockscape_terrain::TerrainParams;
use blockscape_voxel::{BlockKind, ChunkPos, WorldPos};
use blockscape_world::VoxelWorld;

use crate::game_loop::FixedTimestep;
use crate::pilot::Pilot;

/// How far the player can reach to mine or place.
pub const REACH: f32 = 5.0;

/// Direction, in radians around Y, in which the follower appears.
const FOLLOWER_SPAWN_ANGLE: f32 = 0.7;

/// Length of one simulated frame fed to the fixed-timestep loop.
const FRAME_TIME: f32 = 1.0 / 30.0;

/// Counters collected over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationSummary {
    pub steps: u64,
    pub sim_time: f32,
    pub blocks_broken: u32,
    pub blocks_placed: u32,
    pub drops_spawned: u32,
    pub drops_collected: u32,
    pub fluid_ticks: u32,
    pub fluid_cells_converted: usize,
    /// Chunk mesh rebuilds, including the initial build.
    pub chunks_meshed: usize,
    pub fall_damage: u32,
    pub void_respawns: u32,
    pub follower_respawns: u32,
    pub overrides: usize,
    pub player_position: Vec3,
    pub follower_position: Option<Vec3>,
}

pub struct Simulation {
    world: VoxelWorld,
    meshes: MeshCache,
    player: PlayerController,
    follower: Option<FollowerController>,
    drops: Drops,
    mining: MiningProgress,
    pilot: Pilot,
    creative: bool,
    spawn: Vec3,
    render_distance: u32,
    fixed_timestep: f32,
    max_frame_delta: f32,
    fluid_interval: f32,
    fluid_timer: f32,
    poured: bool,
    elapsed: f32,
    summary: SimulationSummary,
}

impl Simulation {
    /// Builds the world from `config`, spawns the player over column (0, 0)
    /// and meshes the chunks around it.
    pub fn new(config: &Config) -> Self {
        let params = TerrainParams {
            seed: config.world.seed,
            water_level: config.world.water_level,
            ..TerrainParams::default()
        };
        let world = VoxelWorld::new(params);
        let spawn = Vec3::new(0.5, world.find_spawn_height(0, 0) as f32, 0.5);

        let physics = &config.physics;
        let settings = PlayerSettings {
            gravity: physics.gravity,
            walk_speed: physics.walk_speed,
            fly_speed: physics.fly_speed,
            jump_speed: physics.jump_speed,
            ..PlayerSettings::default()
        };
        let creative = config.simulation.game_mode == GameMode::Creative;
        let mut player = PlayerController::new(spawn, settings);
        player.creative = creative;

        let follower = config.simulation.follower_enabled.then(|| {
            FollowerController::spawn_near(spawn, FOLLOWER_SPAWN_ANGLE, FollowerSettings::default())
        });

        let fixed_timestep = physics.fixed_timestep.max(1e-4);
        let mut sim = Self {
            world,
            meshes: MeshCache::new(),
            player,
            follower,
            drops: Drops::new(config.world.seed),
            mining: MiningProgress::new(),
            pilot: Pilot,
            creative,
            spawn,
            render_distance: config.render.render_distance,
            fixed_timestep,
            max_frame_delta: physics.max_frame_delta,
            fluid_interval: config.simulation.fluid_tick_interval.max(fixed_timestep),
            fluid_timer: 0.0,
            poured: false,
            elapsed: 0.0,
            summary: SimulationSummary::default(),
        };
        sim.summary.chunks_meshed = sim.refresh_meshes();

        info!(
            "Spawned at ({:.1}, {:.1}, {:.1}), meshed {} chunks, mode {:?}",
            spawn.x, spawn.y, spawn.z, sim.summary.chunks_meshed, config.simulation.game_mode
        );
        sim
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    /// Runs `duration` simulated seconds in fixed steps and returns the summary.
    pub fn run(&mut self, duration: f32) -> SimulationSummary {
        let mut stepper = FixedTimestep::new(self.fixed_timestep, self.max_frame_delta);
        let mut remaining = duration;
        while remaining > 0.0 {
            let frame = remaining.min(FRAME_TIME);
            remaining -= frame;
            stepper.advance(frame, |dt, _| self.step(dt));
        }
        debug!(
            "Ran {} fixed steps covering {:.2}s",
            stepper.update_count(),
            stepper.total_sim_time()
        );
        self.summary()
    }

    /// Advances every system by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let command = self.pilot.command(self.elapsed);

        let report = self.player.step(&self.world, &command.input, dt);
        self.summary.fall_damage += report.fall_damage;
        if report.in_void {
            warn!("Player fell out of the world, returning to spawn");
            self.player.teleport(self.spawn);
            self.summary.void_respawns += 1;
        }

        let hit = raycast(&self.world, self.player.eye_position(), command.look, REACH);

        if command.pour
            && !self.poured
            && let Some(hit) = hit
        {
            let cell = hit.adjacent();
            if can_place(BlockKind::Water, cell, self.player.position(), &self.player.shape)
                && self.world.place(cell, BlockKind::Water)
            {
                self.poured = true;
                self.summary.blocks_placed += 1;
                info!("Poured water at {}", cell);
            }
        }

        let target = hit.map(|hit| (hit.cell, hit.kind));
        if let MiningState::Broken { cell, kind } =
            self.mining.update(target, command.mine, self.creative, dt)
        {
            self.break_block(cell, kind);
        }

        self.drops.step(&self.world, dt);
        let collected = self.drops.collect(self.player.center(), |_| true);
        self.summary.drops_collected += collected.len() as u32;

        if let Some(follower) = &mut self.follower
            && follower.step(&self.world, self.player.position(), dt).respawned
        {
            self.summary.follower_respawns += 1;
        }

        self.fluid_timer += dt;
        while self.fluid_timer >= self.fluid_interval {
            self.fluid_timer -= self.fluid_interval;
            let report = self.world.tick_fluids();
            self.summary.fluid_ticks += 1;
            self.summary.fluid_cells_converted += report.converted;
        }

        self.summary.chunks_meshed += self.refresh_meshes();
        self.summary.steps += 1;
        self.elapsed += dt;
    }

    /// Snapshot of the counters and positions so far.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            sim_time: self.elapsed,
            overrides: self.world.override_count(),
            player_position: self.player.position(),
            follower_position: self.follower.as_ref().map(FollowerController::position),
            ..self.summary.clone()
        }
    }

    fn break_block(&mut self, cell: WorldPos, kind: BlockKind) {
        if !self.world.remove(cell) {
            return;
        }
        self.summary.blocks_broken += 1;
        debug!("Broke {} at {}", kind, cell);

        if self.creative {
            return;
        }
        if let Some(item) = kind.drop_kind() {
            let [x, y, z] = cell.center();
            self.drops.spawn(item, Vec3::new(x, y, z));
            self.summary.drops_spawned += 1;
        }
    }

    /// Rebuilds stale meshes within the render distance and evicts the rest.
    fn refresh_meshes(&mut self) -> usize {
        let feet = self.player.position();
        let center = ChunkPos::containing_point(feet.x, feet.z);
        let chunks = chunks_in_radius(center, self.render_distance);
        let world = &self.world;
        let rebuilt = self
            .meshes
            .refresh(world, &chunks, |chunk| world.chunk_version(chunk));
        let evicted = self.meshes.retain_within(center, self.render_distance);
        if evicted > 0 {
            debug!("Evicted {} out-of-range chunk meshes", evicted);
        }
        rebuilt
    }
}

#[cfg(test)]
mod tests {
    use blockscape_config::SimulationConfig;
    use blockscape_physics::is_supported;
    use blockscape_voxel::VoxelSource;

    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const PLATFORM_TOP: i32 = 50;

    fn small_config(mode: GameMode) -> Config {
        let mut config = Config::default();
        config.render.render_distance = 1;
        config.simulation = SimulationConfig {
            follower_enabled: false,
            game_mode: mode,
            ..SimulationConfig::default()
        };
        config
    }

    /// Puts the player on a stone slab high above the generated terrain.
    fn on_platform(mode: GameMode) -> Simulation {
        let mut sim = Simulation::new(&small_config(mode));
        for x in -4..=14 {
            for z in -4..=4 {
                sim.world
                    .place(WorldPos::new(x, PLATFORM_TOP - 1, z), BlockKind::Stone);
            }
        }
        sim.player
            .teleport(Vec3::new(0.5, PLATFORM_TOP as f32, 0.5));
        sim
    }

    #[test]
    fn test_initial_meshing_covers_render_distance() {
        let sim = Simulation::new(&small_config(GameMode::Survival));
        let feet = sim.player().position();
        let center = ChunkPos::containing_point(feet.x, feet.z);
        let expected = chunks_in_radius(center, 1);
        assert_eq!(sim.meshes().len(), expected.len());
        assert_eq!(sim.summary().chunks_meshed, expected.len());
        for chunk in expected {
            assert!(sim.meshes().meshes(chunk).is_some());
        }
    }

    #[test]
    fn test_spawn_is_above_ground() {
        let sim = Simulation::new(&small_config(GameMode::Survival));
        let feet = sim.player().position();
        let below = WorldPos::containing(feet.x, feet.y - 2.0, feet.z);
        assert!(sim.world().block(below).is_solid());
        assert!(!sim.world().is_solid(WorldPos::containing(feet.x, feet.y, feet.z)));
    }

    #[test]
    fn test_player_lands_on_solid_ground() {
        let mut sim = Simulation::new(&small_config(GameMode::Survival));
        let mut grounded = false;
        for _ in 0..600 {
            sim.step(DT);
            if sim.player().body.grounded {
                grounded = true;
                break;
            }
        }
        assert!(grounded);
        let player = sim.player();
        assert!(is_supported(sim.world(), player.position(), &player.shape));
    }

    #[test]
    fn test_survival_mining_breaks_pours_and_drops() {
        let mut sim = on_platform(GameMode::Survival);
        let summary = sim.run(4.6);

        assert_eq!(summary.blocks_broken, 1);
        assert_eq!(summary.drops_spawned, 1);
        assert_eq!(summary.blocks_placed, 1);
        // Poured water may already have run into the hole.
        let mined = sim.world().block(WorldPos::new(10, PLATFORM_TOP - 1, 0));
        assert!(!mined.is_solid(), "mined cell still {mined}");
        assert!(summary.fluid_ticks > 0);
        assert!(summary.fluid_cells_converted > 0);
        assert_eq!(summary.fall_damage, 0);
    }

    #[test]
    fn test_creative_mining_leaves_no_drops() {
        let mut sim = on_platform(GameMode::Creative);
        let summary = sim.run(4.6);
        assert!(summary.blocks_broken >= 2);
        assert_eq!(summary.drops_spawned, 0);
    }

    #[test]
    fn test_edits_trigger_remesh() {
        let mut sim = on_platform(GameMode::Survival);
        let before = sim.summary().chunks_meshed;
        sim.step(DT);
        assert!(sim.summary().chunks_meshed > before);
        let settled = sim.summary().chunks_meshed;
        sim.step(DT);
        assert_eq!(sim.summary().chunks_meshed, settled);
    }

    #[test]
    fn test_run_is_deterministic() {
        let mut config = small_config(GameMode::Survival);
        config.simulation.follower_enabled = true;
        let a = Simulation::new(&config).run(3.0);
        let b = Simulation::new(&config).run(3.0);
        assert_eq!(a, b);
        assert!(a.follower_position.is_some());
        assert!(a.steps >= 179 && a.steps <= 180, "steps {}", a.steps);
    }
}
