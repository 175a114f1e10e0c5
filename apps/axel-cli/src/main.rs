use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use axel_assets::{Scene, SceneFile};
use axel_input::{InputScript, Intent, PlayerController};
use axel_kernel::{AxisOrder, Contact, MovementResolver, collides_at, is_grounded};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec2;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "axel-cli", about = "Headless driver for the axel movement engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the built-in scene's contents
    Info,
    /// Run a scene frame by frame with scripted input
    Simulate {
        /// Scene file (YAML); the built-in prototype room if omitted
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Frames to run; defaults to the script length
        #[arg(short, long)]
        frames: Option<usize>,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Intent script, e.g. "R*30,J,L*10,.*20"
        #[arg(long, default_value = "")]
        script: String,
        /// Which axis resolves first
        #[arg(long, value_enum, default_value_t = OrderArg::Xy)]
        axis_order: OrderArg,
        /// Emit the frame trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Probe one candidate position for an actor
    Probe {
        /// Scene file (YAML); the built-in prototype room if omitted
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Actor name; the controlled actor if omitted
        #[arg(short, long)]
        actor: Option<String>,
        /// Candidate x, in pixels
        #[arg(allow_negative_numbers = true)]
        x: f32,
        /// Candidate y, in pixels
        #[arg(allow_negative_numbers = true)]
        y: f32,
    },
    /// Write the built-in prototype scene as YAML
    DumpScene {
        /// Output file; stdout if omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Horizontal, then vertical
    Xy,
    /// Vertical, then horizontal
    Yx,
}

impl From<OrderArg> for AxisOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Xy => AxisOrder::XThenY,
            OrderArg::Yx => AxisOrder::YThenX,
        }
    }
}

/// One simulated frame, as reported by `simulate`.
#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    intent: String,
    position: Vec2,
    velocity: Vec2,
    grounded: bool,
    contacts: Vec<Contact>,
}

#[derive(Serialize)]
struct SimulationTrace {
    frames: Vec<FrameRecord>,
    state_hash: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("axel-cli v{}", env!("CARGO_PKG_VERSION"));
            let scene = SceneFile::prototype().build()?;
            println!(
                "prototype: tile_size={} tiles={} solids={} actors={}",
                scene.tile_size,
                scene.level.catalog().len(),
                scene.level.solids().len(),
                scene.actors.len()
            );
            for (kind, def) in scene.level.catalog().iter() {
                println!(
                    "  tile #{} {:<8} collider={:?}",
                    kind.index(),
                    def.name,
                    def.collider
                );
            }
            let t = scene.tunables;
            println!(
                "tunables: gravity={} walk={} jump={}",
                t.gravity, t.walk_velocity, t.jump_velocity
            );
        }
        Commands::Simulate {
            scene,
            frames,
            dt,
            script,
            axis_order,
            json,
        } => {
            let scene = load_scene(scene.as_deref())?;
            let script = InputScript::parse(&script).context("parsing --script")?;
            let frames = frames.unwrap_or(script.len());
            tracing::info!(frames, dt, "simulating");

            let (trace, summary) = simulate(&scene, &script, frames, dt, axis_order.into())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trace)?);
            } else {
                for r in &trace.frames {
                    println!(
                        "{:>5} {:<3} pos=({:>6}, {:>6}) vel=({:>7.2}, {:>7.2}) {}{}",
                        r.frame,
                        r.intent,
                        r.position.x,
                        r.position.y,
                        r.velocity.x,
                        r.velocity.y,
                        if r.grounded { "grounded" } else { "airborne" },
                        format_contacts(&r.contacts)
                    );
                }
                println!("{summary}");
                println!("state_hash={}", trace.state_hash);
            }
        }
        Commands::Probe { scene, actor, x, y } => {
            let scene = load_scene(scene.as_deref())?;
            let spawn = match actor.as_deref() {
                Some(name) => scene
                    .actor(name)
                    .ok_or_else(|| anyhow!("no actor named '{name}'"))?,
                None => scene
                    .player()
                    .ok_or_else(|| anyhow!("scene has no controlled actor"))?,
            };
            let candidate = Vec2::new(x, y);
            anyhow::ensure!(candidate.is_finite(), "probe position must be finite");

            let mut actor = spawn.actor;
            let hit = collides_at(&scene.level, &actor, candidate)?;
            actor.position = candidate;
            let grounded = is_grounded(&scene.level, &actor)?;
            let collider = scene.level.collider(actor.kind())?.translated(candidate);
            println!("actor={} at ({x}, {y}) collider={collider:?}", spawn.name);
            println!("collides={hit} grounded={grounded}");
        }
        Commands::DumpScene { out } => {
            let yaml = SceneFile::prototype().to_yaml()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, yaml)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => print!("{yaml}"),
            }
        }
    }

    Ok(())
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<Scene> {
    let scene = match path {
        Some(path) => Scene::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SceneFile::prototype().build()?,
    };
    Ok(scene)
}

/// Drive the controlled actor through `frames` frames, idle once the script
/// runs out. Other actors coast on their own velocity.
fn simulate(
    scene: &Scene,
    script: &InputScript,
    frames: usize,
    dt: f32,
    order: AxisOrder,
) -> anyhow::Result<(SimulationTrace, axel_kernel::WorldSummary)> {
    let (mut world, spawned) = scene.instantiate(MovementResolver::new(order))?;
    let player = spawned
        .iter()
        .find(|s| s.controlled)
        .map(|s| s.id)
        .ok_or_else(|| anyhow!("scene has no controlled actor"))?;
    let controller = PlayerController::new(scene.tunables);

    let intents = script.frames().chain(std::iter::repeat(Intent::IDLE));
    let mut records = Vec::with_capacity(frames);
    for (frame, intent) in intents.take(frames).enumerate() {
        controller.drive(&mut world, player, intent, dt)?;
        let reports = world.step(dt)?;
        let contacts: Vec<Contact> = reports
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, report)| report.contacts().collect())
            .unwrap_or_default();
        let body = world
            .get(player)
            .ok_or_else(|| anyhow!("controlled actor vanished"))?;
        records.push(FrameRecord {
            frame,
            intent: intent.to_string(),
            position: body.actor.position,
            velocity: body.velocity,
            grounded: world.is_grounded(player)?,
            contacts,
        });
    }

    let trace = SimulationTrace {
        frames: records,
        state_hash: format!("{:#018x}", world.state_hash()),
    };
    Ok((trace, world.summary()))
}

fn format_contacts(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(|c| format!(" hit {}{}", if c.sign > 0 { '+' } else { '-' }, c.axis))
        .collect()
}
