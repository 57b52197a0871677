use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use swarm_shooter::compute::{init_state, tick};
use swarm_shooter::config::Settings;
use swarm_shooter::display::{self, Viewport};
use swarm_shooter::entities::{Difficulty, EnemyMotion, GameState, GameStatus};
use swarm_shooter::input::{command_for, Command, KeyTracker};

#[derive(Parser, Debug)]
#[command(name = "swarm_shooter", version, about = "Single-screen terminal arcade shooter")]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// chase or descend
    #[arg(long)]
    motion: Option<EnemyMotion>,

    /// Fixed RNG seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,

    /// Live projectile cap (0 = uncapped)
    #[arg(long)]
    max_projectiles: Option<usize>,

    /// Write logs here (the terminal itself is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

/// File settings first, CLI flags on top.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(motion) = cli.motion {
        settings.enemy_motion = motion;
    }
    if let Some(seed) = cli.seed {
        settings.seed = Some(seed);
    }
    if let Some(cap) = cli.max_projectiles {
        settings.max_projectiles = cap;
    }
    if let Some(path) = &cli.log_file {
        settings.log_file = Some(path.clone());
    }
    settings.validate()?;
    Ok(settings)
}

/// Logs go to `log_file` when set.  Without one they are dropped: stderr is
/// the alternate screen while the game runs.
fn init_logging(settings: &Settings) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match &settings.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.try_init().context("installing logger")?;
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn new_round(settings: &Settings, view: &Viewport) -> GameState {
    let field = view.field();
    log::info!(
        "round start: {} / {:?}, field {:.0}x{:.0}",
        settings.difficulty.as_str(),
        settings.enemy_motion,
        field.width,
        field.height
    );
    init_state(settings.tuning(), field)
}

/// Drive rounds until the player quits.
///
/// This is the only place state is mutated: each frame the pure `tick`
/// replaces the round state wholesale.  Restart builds a fresh round.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let frame_period = Duration::from_secs(1) / settings.fps;

    let (width, height) = terminal::size()?;
    let mut view = Viewport::new(width, height, settings.cell_aspect)?;
    let mut state = new_round(settings, &view);
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => match command_for(&key) {
                    Some(Command::Quit) => {
                        log::info!("quit at frame {}, score {}", state.frame, state.score);
                        return Ok(());
                    }
                    Some(Command::Restart) if state.status == GameStatus::GameOver => {
                        log::info!("restart");
                        state = new_round(settings, &view);
                        keys.clear();
                    }
                    _ => keys.record(&key, frame),
                },
                Event::Resize(w, h) => match Viewport::new(w, h, settings.cell_aspect) {
                    // The field keeps its size until the next round
                    Ok(resized) => view = resized,
                    Err(err) => log::warn!("ignoring resize: {err}"),
                },
                _ => {}
            }
        }

        let input = keys.frame_input(frame);
        let was_playing = state.status == GameStatus::Playing;
        state = tick(&state, &input, rng);
        if was_playing && state.status == GameStatus::GameOver {
            log::info!("game over at frame {}, score {}", state.frame, state.score);
        }

        display::render(out, &state, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            thread::sleep(frame_period - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    if cli.print_config {
        println!("{}", settings.to_json());
        return Ok(());
    }

    init_logging(&settings)?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    log::debug!("keyboard enhancement: {keyboard_enhanced}");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                log::warn!("event reader stopped: {err}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, &settings, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}
