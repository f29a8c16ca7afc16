use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use soundshapes::{
    Config, DragGesture, Point, RegistryError, ShapeGenerator, ShapeRegistry, SilentBackend, VoiceBackend, Waveform,
    WaveformOverrides,
};

/// Headless soundshapes sketch: spawns random shapes, drags the newest one
/// around so its voice glides, then clears the canvas.
#[derive(Parser, Debug)]
#[command(name = "soundshapes", version, about)]
struct Cli {
    /// Config file (defaults to ./soundshapes.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of shapes to spawn
    #[arg(short = 'n', long, default_value_t = 8)]
    shapes: usize,

    /// Delay between spawns, milliseconds
    #[arg(long, default_value_t = 400)]
    interval_ms: u64,

    /// How long to hold the final state before clearing, milliseconds
    #[arg(long, default_value_t = 1500)]
    hold_ms: u64,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Play every shape with this waveform (sine, triangle, sawtooth, square)
    #[arg(short, long)]
    waveform: Option<Waveform>,

    /// Never open an audio device
    #[arg(long)]
    silent: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());
    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let result = run_with_output(&cli, &config);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "playback")]
fn run_with_output(cli: &Cli, config: &Config) -> Result<(), RegistryError> {
    if !cli.silent {
        match soundshapes::audio::RodioBackend::new(config.glide_time(), config.master_volume) {
            Ok(backend) => return run(backend, cli, config),
            Err(e) => warn!("{e}; continuing without sound"),
        }
    }
    run(SilentBackend::new(), cli, config)
}

#[cfg(not(feature = "playback"))]
fn run_with_output(cli: &Cli, config: &Config) -> Result<(), RegistryError> {
    if !cli.silent {
        warn!("built without the `playback` feature; running silently");
    }
    run(SilentBackend::new(), cli, config)
}

fn run<B: VoiceBackend>(backend: B, cli: &Cli, config: &Config) -> Result<(), RegistryError> {
    let mut registry = ShapeRegistry::new(backend, config.registry_options())?;
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    info!("seed {seed}");
    let mut generator = ShapeGenerator::new(StdRng::seed_from_u64(seed), config.canvas())
        .with_palette(config.palette.clone())
        .with_margins(config.margin_x, config.margin_y)
        .with_waveforms(cli.waveform.map_or(config.waveforms, WaveformOverrides::all));

    let interval = Duration::from_millis(cli.interval_ms);
    for _ in 0..cli.shapes {
        let spec = generator.generate();
        let id = registry.add(spec.position, spec.outline, spec.style)?;
        let params = registry.get(id).map(|s| s.params());
        if let Some(p) = params {
            info!(
                "{} {} at ({:.0}, {:.0}) -> {:.1}Hz, gain {:.3} [{}/{} live]",
                spec.kind.name(),
                id,
                spec.position.x,
                spec.position.y,
                p.frequency,
                p.gain,
                registry.len(),
                registry.capacity()
            );
        }
        thread::sleep(interval);
    }

    drag_newest(&mut registry)?;

    thread::sleep(Duration::from_millis(cli.hold_ms));
    registry.clear();
    info!("cleared");
    Ok(())
}

/// Grab the newest shape by the middle of its box and pull it upwards, the
/// way a pointer would.
fn drag_newest<B: VoiceBackend>(registry: &mut ShapeRegistry<B>) -> Result<(), RegistryError> {
    let Some(grab) = registry.iter().next_back().map(|s| {
        let b = s.bounds();
        Point::new((b.min.x + b.max.x) / 2.0, (b.min.y + b.max.y) / 2.0)
    }) else {
        return Ok(());
    };

    let mut drag = DragGesture::new();
    let Some(id) = drag.press(registry, grab) else {
        return Ok(());
    };
    let mut pointer = grab;
    for _ in 0..12 {
        pointer.y -= 10.0;
        drag.drag_to(registry, pointer)?;
        thread::sleep(Duration::from_millis(40));
    }
    drag.release();
    if let Some(shape) = registry.get(id) {
        info!("dragged {} up to {:.1}Hz", id, shape.params().frequency);
    }
    Ok(())
}
