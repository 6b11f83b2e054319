//! crossing — smallest demo for the mutex-zone framework.
//!
//! Three trains share one line: an express running east and a freight
//! running west meet at a single-track crossing, and a shunter cuts north
//! across a junction the express also passes through.  The crossing is
//! locked whole; the junction only locks the cells actually travelled.
//!
//! Run with `RUST_LOG=debug` to see every grant, denial and release.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mz_agent::{GroupLookup, GroupStoreBuilder};
use mz_core::{BlockPos, Facing, GroupId, SimConfig, Tick, Vec3, WorldId};
use mz_lock::{EnterResult, RecordingSignals, SlotConflict, SlotRelease};
use mz_output::{CsvWriter, EventLogObserver, OutputWriter};
use mz_sim::{LinearMover, SimBuilder, SimObserver, Track};
use mz_spatial::{ConflictHit, ExtendOutcome, RegionKey};
use mz_world::{PathOptions, ZoneWorld, load_paths, load_regions_reader, save_paths};

// ── Inputs ────────────────────────────────────────────────────────────────────

const CONFIG_JSON: &str = r#"{
    "total_ticks": 80,
    "output_interval_ticks": 10,
    "mutex": { "short_delay_ticks": 6, "long_delay_ticks": 20 }
}"#;

const REGIONS_CSV: &str = "\
marker_x,marker_y,marker_z,facing,policy,name,predicate,x1,y1,z1,x2,y2,z2,spacing\n\
12,70,0,front,whole,,!n@inspection*,10,64,-1,13,65,1,\n\
41,70,0,front,path_crossing,junction,,38,64,-3,44,66,3,0.5\n\
41,70,0,back,path_crossing,junction,,38,64,6,44,66,10,0.5\n\
";

const OUTPUT_DIR: &str = "output/crossing";

// ── Observer wrapper to count outcomes ────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:    EventLogObserver<W>,
    granted:  usize,
    denied:   usize,
    released: usize,
    conflicts: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: EventLogObserver<W>) -> Self {
        Self { inner, granted: 0, denied: 0, released: 0, conflicts: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_decision(&mut self, tick: Tick, world: WorldId, group: GroupId, hit: &ConflictHit, result: EnterResult) {
        match result {
            EnterResult::Granted => self.granted += 1,
            EnterResult::Denied => self.denied += 1,
            EnterResult::Ignored => {}
        }
        self.inner.on_decision(tick, world, group, hit, result);
    }

    fn on_release(&mut self, world: WorldId, release: &SlotRelease) {
        self.released += 1;
        self.inner.on_release(world, release);
    }

    fn on_conflict(&mut self, world: WorldId, conflict: &SlotConflict) {
        self.conflicts += 1;
        self.inner.on_conflict(world, conflict);
    }

    fn on_tick_end(&mut self, tick: Tick, moved: usize) {
        self.inner.on_tick_end(tick, moved);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

fn line(from: (f64, f64), to: (f64, f64)) -> Result<Track> {
    Ok(Track::new(vec![Vec3::new(from.0, 64.5, from.1), Vec3::new(to.0, 64.5, to.1)])?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== crossing — mutex-zone demo ===");

    // 1. Configuration.
    let config: SimConfig = serde_json::from_str(CONFIG_JSON)?;
    config.validate()?;
    println!(
        "Sim: {} ticks, delays short={} long={}",
        config.total_ticks, config.mutex.short_delay_ticks, config.mutex.long_delay_ticks
    );

    // 2. Regions.
    let regions = load_regions_reader(Cursor::new(REGIONS_CSV), &config.mutex)?;
    println!("Loaded {} regions", regions.len());

    // 3. Groups and their tracks.
    let groups = GroupStoreBuilder::new()
        .group_with_tags("express1", ["express"])
        .group_with_tags("freight2", ["freight"])
        .group_with_tags("shunter3", ["yard"])
        .build()?;

    let mut mover = LinearMover::new();
    mover.add_group(line((0.0, 0.5), (64.0, 0.5))?, 1.0, 3.0);
    mover.add_group(line((28.0, 0.5), (-36.0, 0.5))?, 1.0, 3.0);
    mover.add_group(line((41.5, -24.0), (41.5, 40.0))?, 1.0, 2.0);

    // 4. Build sim.
    let mut sim = SimBuilder::new(config.clone(), groups, mover, RecordingSignals::new())
        .regions(WorldId(0), regions)
        .build()?;

    // 5. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(EventLogObserver::new(writer, &config));

    // 6. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  granted  : {}", obs.granted);
    println!("  denied   : {}", obs.denied);
    println!("  released : {}", obs.released);
    println!("  conflicts: {}", obs.conflicts);
    println!("  signals  : {} raise/lower events", sim.signals.events.len());
    println!();

    // 7. Final positions table.
    println!("{:<10} {:<10} {:<10}", "Group", "Head", "Finished");
    println!("{}", "-".repeat(32));
    for group in sim.groups.group_ids() {
        println!(
            "{:<10} {:<10.1} {:<10}",
            sim.groups.name(group).unwrap_or("?"),
            sim.mover.head(group),
            if sim.mover.is_finished(group) { "yes" } else { "no" },
        );
    }
    println!();

    // 8. Lay a growing path ahead of the express and persist it.
    let express = sim.groups.find_by_name("express1").unwrap_or(GroupId(0));
    let marker = RegionKey::new(BlockPos::new(64, 70, 0), Facing::Front);
    let options = PathOptions::new(&config.mutex).name("siding");
    let world = sim.zones.world_mut(WorldId(0));
    let path = world.get_or_create_path(marker, express, BlockPos::new(64, 64, 0), &options, sim.now, &mut sim.signals);
    let mut laid = 1;
    for x in 65..80 {
        match world.extend_path(path, BlockPos::new(x, 64, 0), sim.now) {
            ExtendOutcome::Saturated => break,
            ExtendOutcome::Added { .. } => laid += 1,
            ExtendOutcome::AlreadyPresent => {}
        }
    }
    info!(cells = laid, "path laid");

    let paths_file = Path::new(OUTPUT_DIR).join("paths.json");
    save_paths(world, &sim.groups, &paths_file)?;

    let mut reloaded = ZoneWorld::new(WorldId(0), config.mutex.clone());
    let restored = load_paths(&mut reloaded, &paths_file, &sim.groups, sim.now, &mut sim.signals)?;
    println!("Saved and reloaded {restored} path(s) to {}", paths_file.display());

    Ok(())
}
