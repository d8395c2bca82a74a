use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use pursuit_common::{GameConfig, Variant};
use pursuit_input::{Control, InputState};
use pursuit_kernel::{Driver, GameEvent, GameSession, ManualClock};
use pursuit_render::{DebugTextRenderer, Projection, RenderView, Renderer};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pursuit-cli", about = "Headless tools for the pursuit game")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the game headless for a number of frames
    Simulate {
        /// Frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Game variant (follow or orbit)
        #[arg(long, default_value = "follow")]
        variant: Variant,
        /// YAML config file; overrides --variant
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keys held for the whole run (w, a, s, d, space)
        #[arg(long = "hold", value_name = "KEY")]
        held: Vec<String>,
        /// Load startup assets from this root before spawning the player
        #[arg(long)]
        assets_dir: Option<PathBuf>,
        /// Print the session every N frames (0 prints only the final state)
        #[arg(long, default_value = "0")]
        every: u64,
    },
    /// Replay the stationary-contact damage timeline
    Scenario {
        /// Frames to run
        #[arg(short, long, default_value = "130")]
        frames: u64,
        /// Milliseconds between frames
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Starting distance between player and enemy
        #[arg(long, default_value = "1.0")]
        distance: f32,
        /// Enemy speed per frame
        #[arg(long, default_value = "0.07")]
        enemy_speed: f32,
    },
    /// Print the resolved configuration as YAML
    Config {
        /// Game variant (follow or orbit)
        #[arg(long, default_value = "follow")]
        variant: Variant,
        /// YAML config file to validate and print
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(variant: Variant, path: Option<&PathBuf>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => GameConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::for_variant(variant),
    };
    config.validate()?;
    Ok(config)
}

fn held_input(keys: &[String]) -> Result<InputState> {
    let mut input = InputState::new();
    for key in keys {
        anyhow::ensure!(input.key_down(key), "unrecognised key `{key}`");
    }
    Ok(input)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("pursuit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", pursuit_common::crate_info());
            println!("input: {}", pursuit_input::crate_info());
            println!("assets: {}", pursuit_assets::crate_info());
            println!("render: {}", pursuit_render::crate_info());
            let controls: Vec<&str> = Control::ALL.iter().map(|c| c.name()).collect();
            println!("controls: {}", controls.join(", "));
        }
        Commands::Simulate {
            frames,
            variant,
            config,
            held,
            assets_dir,
            every,
        } => {
            let config = load_config(variant, config.as_ref())?;
            let input = held_input(&held)?;
            let clock = ManualClock::new();
            let mut driver = Driver::new(GameSession::new(config), &clock);

            match assets_dir {
                Some(root) => match pursuit_assets::load_startup_assets(&root) {
                    Ok(_) => {
                        driver.assets_ready();
                    }
                    Err(err) => driver.report_asset_failure(err.to_string()),
                },
                None => {
                    driver.assets_ready();
                }
            }

            let renderer = DebugTextRenderer::new();
            let step = driver.step();
            let mut ran = 0;
            while ran < frames && driver.is_running() {
                clock.advance(step);
                ran += u64::from(driver.tick(step, &input));
                if every > 0 && ran % every == 0 {
                    let view = RenderView::of_session(driver.session(), Projection::default());
                    print!("{}", renderer.render(driver.session(), &view));
                }
            }

            let session = driver.session();
            let hits = session
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Damaged { .. }))
                .count();
            let view = RenderView::of_session(session, Projection::default());
            print!("{}", renderer.render(session, &view));
            println!("Frames run: {ran}  Hits: {hits}  State: {:?}", driver.state());
            println!("State hash: {:#018x}", session.state_hash());
        }
        Commands::Scenario {
            frames,
            frame_ms,
            distance,
            enemy_speed,
        } => {
            let base = GameConfig::follow();
            let config = GameConfig {
                enemy_spawn: base.player_spawn + Vec3::new(distance, 0.0, 0.0),
                enemy_speed,
                ..base
            };
            config.validate()?;
            println!(
                "Scenario: distance={distance}, enemy_speed={enemy_speed}, cooldown={}ms, frame={frame_ms}ms",
                config.damage_cooldown_ms
            );

            let clock = ManualClock::new();
            let mut driver = Driver::new(GameSession::new(config), &clock);
            driver.assets_ready();
            driver.session_mut().drain_events();

            let input = InputState::new();
            for i in 0..frames {
                clock.set(Duration::from_millis(i * frame_ms));
                if !driver.step_frame(&input) {
                    break;
                }
                for event in driver.session_mut().drain_events() {
                    match event {
                        GameEvent::Damaged { health, at } => {
                            println!("frame {i:>4}  t={:>6}ms  health={health}", at.as_millis());
                        }
                        GameEvent::GameOver { .. } => println!("frame {i:>4}  game over"),
                        _ => {}
                    }
                }
            }
            println!("Final health: {}", driver.session().health());
        }
        Commands::Config { variant, config } => {
            let config = load_config(variant, config.as_ref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
