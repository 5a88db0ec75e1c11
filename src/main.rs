//! whitted_rt: render sphere scenes with shadows and mirror reflections
//!
//! Usage:
//!   whitted_rt render                        - Render the built-in scene to render.png
//!   whitted_rt render --config scene.yaml    - Render a scene description
//!   whitted_rt render --ascii                - Print a terminal preview instead
//!   whitted_rt check-config --config FILE    - Validate a scene description

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use whitted_rt::config::RenderConfig;
use whitted_rt::{Environment, Renderer, Scene, MAX_BOUNCES};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "whitted_rt")]
#[command(version)]
#[command(about = "Whitted-style sphere ray tracer")]
struct Cli {
    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to a PNG file or the terminal
    Render {
        /// Scene description (YAML); the built-in scene is used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override image width
        #[arg(long)]
        width: Option<u32>,
        /// Override image height
        #[arg(long)]
        height: Option<u32>,
        /// Override bounce limit
        #[arg(short, long)]
        bounces: Option<u32>,
        /// Print an ASCII preview sized for the terminal instead of writing a file
        #[arg(long)]
        ascii: bool,
    },

    /// Validate a scene description
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command line overrides applied on top of the loaded configuration
struct Overrides {
    output: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    bounces: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            config,
            output,
            width,
            height,
            bounces,
            ascii,
        } => {
            let overrides = Overrides {
                output,
                width,
                height,
                bounces,
            };
            render(config, overrides, ascii)?;
        }
        Commands::CheckConfig { config } => {
            check_config(config)?;
        }
    }

    Ok(())
}

/// Render the configured or built-in scene
fn render(config_path: Option<PathBuf>, overrides: Overrides, ascii: bool) -> anyhow::Result<()> {
    let (mut config, mut scene) = match config_path {
        Some(path) => {
            tracing::info!("Loading scene from {:?}", path);
            let config = RenderConfig::from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let scene = config.build_scene()?;
            (config, scene)
        }
        None => {
            tracing::info!("No scene file given, using the built-in showcase");
            (RenderConfig::default(), Scene::showcase())
        }
    };

    if let Some(output) = overrides.output {
        config.output = output;
    }
    if let Some(width) = overrides.width {
        config.image.width = width;
    }
    if let Some(height) = overrides.height {
        config.image.height = height;
    }
    if let Some(bounces) = overrides.bounces {
        scene.set_bounce_limit(bounces);
    }
    config.validate()?;

    let camera = config.build_camera();

    if ascii {
        let (cols, rows) = terminal_size();
        let mut renderer = Renderer::for_terminal(cols, rows);
        renderer.render(&scene, &camera);
        print!("{}", renderer.to_ascii());
        return Ok(());
    }

    let mut renderer = Renderer::new(config.image.width as usize, config.image.height as usize);
    renderer.render(&scene, &camera);
    renderer
        .save(&config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    println!("Rendered {}", config.output.display());
    Ok(())
}

/// Terminal size in cells, leaving one row for the prompt
fn terminal_size() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((w, h)) => ((w as usize).max(10), (h.saturating_sub(1) as usize).max(5)),
        Err(e) => {
            tracing::warn!(error = %e, "Could not get terminal size, using 80x24");
            (80, 23)
        }
    }
}

/// Validate a scene description and print a summary
fn check_config(config_path: PathBuf) -> anyhow::Result<()> {
    let config = RenderConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let scene = config.build_scene()?;

    println!("✓ Configuration file is valid\n");
    println!("Image:");
    println!("  Size: {}x{}", config.image.width, config.image.height);
    println!("  Output: {}", config.output.display());
    println!("\nCamera:");
    println!("  Origin: {:?}", config.camera.origin);
    println!("  Look at: {:?}", config.camera.look_at);
    println!("  FOV: {}°", config.camera.fov);
    println!("\nScene:");
    println!("  Spheres: {}", scene.spheres.len());
    println!("  Lights: {}", scene.lights.len());
    println!("  Environment: {}", scene.environment.name());
    println!("  Bounce limit: {} (max {})", scene.bounce_limit, MAX_BOUNCES);

    Ok(())
}
