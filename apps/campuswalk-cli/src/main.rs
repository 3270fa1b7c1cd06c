use std::cell::RefCell;
use std::rc::Rc;

use campuswalk_common::Time;
use campuswalk_input::{InputState, Key};
use campuswalk_net::{Message, NetLink, UpdateLocation};
use campuswalk_render::{
    AvatarSkin, DrawCommand, DrawContext, FrameSetup, PostProcessPass, RecordingBackend,
    RenderBackend, ResourceRegistry,
};
use campuswalk_scene::{build_ecs, spawn_campus, spawn_local_player, Player};
use campuswalk_world::World;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3, Vec4};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campuswalk-cli", about = "Headless campuswalk simulation and diagnostics")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info
    Info,
    /// Run the campus headless with synthetic remote peers
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Frame duration in milliseconds
        #[arg(short, long, default_value = "16")]
        delta: u64,
        /// Number of synthetic peers
        #[arg(short, long, default_value = "3")]
        peers: usize,
    },
}

/// Recording backend handle that stays inspectable after the world takes
/// ownership of the boxed half.
#[derive(Clone, Default)]
struct SharedBackend(Rc<RefCell<RecordingBackend>>);

impl RenderBackend for SharedBackend {
    fn begin_frame(&mut self, setup: &FrameSetup) {
        self.0.borrow_mut().begin_frame(setup);
    }
    fn set_view(&mut self, view: &Mat4) {
        self.0.borrow_mut().set_view(view);
    }
    fn set_warp(&mut self, plane: Vec4, singularity: Vec3, radius: f32) {
        self.0.borrow_mut().set_warp(plane, singularity, radius);
    }
    fn submit(&mut self, command: &DrawCommand) {
        self.0.borrow_mut().submit(command);
    }
    fn post_process(&mut self, passes: &[PostProcessPass]) {
        self.0.borrow_mut().post_process(passes);
    }
    fn resize(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().resize(width, height);
    }
    fn release(&mut self) {
        self.0.borrow_mut().release();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("campuswalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", campuswalk_common::crate_info());
            println!("ecs: {}", campuswalk_ecs::crate_info());
            println!("input: {}", campuswalk_input::crate_info());
            println!("render: {}", campuswalk_render::crate_info());
            println!("net: {}", campuswalk_net::crate_info());
            println!("world: {}", campuswalk_world::crate_info());
            println!("scene: {}", campuswalk_scene::crate_info());
        }
        Commands::Run {
            frames,
            delta,
            peers,
        } => run(frames, delta as f64, peers)?,
    }

    Ok(())
}

fn peer_message(index: usize, now: f64) -> UpdateLocation {
    // bots orbit the plaza on staggered circles
    let phase = now / 4000.0 * std::f64::consts::TAU + index as f64;
    let radius = 4.0 + index as f32;
    UpdateLocation {
        auth_token: String::new(),
        user_id: format!("bot-{index}"),
        player_type: "ta".to_owned(),
        area: "campus".to_owned(),
        chunk: [0, 0],
        position: [
            phase.cos() as f32 * radius,
            phase.sin() as f32 * radius,
        ],
        emotion: if (now as u64 / 5000) % 2 == 0 && index == 0 {
            "🎉".to_owned()
        } else {
            String::new()
        },
        update_chunk: false,
    }
}

fn run(frames: u64, delta: f64, peers: usize) -> anyhow::Result<()> {
    let backend = SharedBackend::default();
    let record = backend.0.clone();

    let draw = DrawContext::new(
        Box::new(backend),
        ResourceRegistry::fully_loaded(),
        1280.0,
        720.0,
    );
    let mut ecs = build_ecs().map_err(anyhow::Error::from)?;
    spawn_campus(&mut ecs).map_err(anyhow::Error::from)?;
    spawn_local_player(
        &mut ecs,
        AvatarSkin::Ta,
        "walker",
        "walker",
        Vec3::new(0.0, -3.0, 0.0),
    )
    .map_err(anyhow::Error::from)?;

    let mut world = World::new(
        ecs,
        InputState::new(1280.0, 720.0),
        draw,
        NetLink::new(String::new(), "campus".into()),
    );

    let published: Rc<RefCell<u64>> = Rc::default();
    let counter = published.clone();
    world.init_socket(Box::new(move |raw| {
        *counter.borrow_mut() += 1;
        tracing::debug!(len = raw.len(), "outbound frame");
    }));

    for frame in 0..frames {
        let now = frame as f64 * delta;

        // wander: hold Right for the first half, Up for the rest
        if frame == 0 {
            world.input.on_key_down(Key::Right);
        } else if frame == frames / 2 {
            world.input.on_key_up(Key::Right);
            world.input.on_key_down(Key::Up);
        }

        // peers report on their own publish cadence
        if now as u64 % 200 < delta as u64 {
            for index in 0..peers {
                let body = Message::UpdateLocation(peer_message(index, now));
                world.enqueue_raw(&body.encode().map_err(anyhow::Error::from)?);
            }
        }

        world.frame(Time::new(now, delta));

        if frame % 60 == 0 {
            let record = record.borrow();
            println!(
                "frame {frame:>4}: draws={:>3} labels={:>2} peers={}",
                record.submitted.len(),
                world.draw.overlay.len(),
                world.ecs.keys::<Player>().map_err(anyhow::Error::from)?.len() - 1,
            );
        }
    }

    let record = record.borrow();
    println!("---");
    println!("frames simulated: {}", record.frames);
    println!("draw commands in final frame: {}", record.submitted.len());
    println!("post-process chains run: {}", record.post_processed);
    println!("location updates published: {}", published.borrow());
    println!("overlay labels live: {}", world.draw.overlay.len());

    Ok(())
}
