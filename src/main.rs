use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod color;
mod config;
mod error;
mod export;
mod grouping;
mod loader;
mod models;
mod render;
mod summary;
mod timeline;

use config::{ChartConfig, ChartOptions, Palette, DEFAULT_OVERTIME_MINUTES};
use grouping::Rotation;
use loader::GameData;
use models::Stat;
use timeline::TimeAxis;

const DATA_DIR_ENV: &str = "ROTATION_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "rotation-chart")]
#[command(about = "Render basketball rotation charts from game rotation data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the rotation chart as SVG (and optionally PNG)
    Render {
        /// Directory holding boxscore.json, gamerotation.json, players.json and teams/
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, default_value = "rotation-chart.svg")]
        out: PathBuf,
        /// Also rasterize the chart to this PNG file
        #[arg(long)]
        png: Option<PathBuf>,
        #[arg(long, default_value_t = 2.0)]
        png_scale: f32,
        #[arg(long, value_enum, default_value_t = Stat::PlayerPts)]
        stat: Stat,
        #[arg(long, value_enum, default_value_t = Palette::Rdbu)]
        palette: Palette,
        #[arg(long, default_value_t = DEFAULT_OVERTIME_MINUTES)]
        overtime_minutes: f64,
    },
    /// Export every session with absolute timeline offsets as CSV
    Sessions {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_OVERTIME_MINUTES)]
        overtime_minutes: f64,
    },
    /// Summarize minutes, points and net rating per player
    Summary {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_OVERTIME_MINUTES)]
        overtime_minutes: f64,
    },
}

struct PreparedChart {
    game: GameData,
    config: ChartConfig,
    rotation: Rotation,
    axis: TimeAxis,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            data_dir,
            out,
            png,
            png_scale,
            stat,
            palette,
            overtime_minutes,
        } => {
            let options = ChartOptions {
                stat,
                palette,
                overtime_minutes,
                ..ChartOptions::default()
            };
            let prepared = prepare(data_dir, options)?;
            let chart = render::render_chart(
                &prepared.rotation,
                &prepared.axis,
                &prepared.config,
                &prepared.game.players,
            );
            std::fs::write(&out, &chart.svg)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(
                rows = chart.rows,
                width = chart.width,
                height = chart.height,
                path = %out.display(),
                "chart written"
            );
            println!("Chart with {} players written to {}.", chart.rows, out.display());

            if let Some(png) = png {
                let (width, height) = export::rasterize_png(&chart.svg, &png, png_scale)
                    .with_context(|| format!("failed to rasterize {}", png.display()))?;
                println!("PNG {}x{} written to {}.", width, height, png.display());
            }
        }
        Commands::Sessions {
            data_dir,
            out,
            overtime_minutes,
        } => {
            let prepared = prepare(data_dir, with_overtime(overtime_minutes))?;
            let mut buffer = Vec::new();
            let written = export::write_sessions_csv(
                &prepared.rotation,
                &prepared.axis,
                &prepared.game.players,
                &mut buffer,
            )?;
            emit(out.as_deref(), &buffer)?;
            info!(sessions = written, "session export complete");
        }
        Commands::Summary {
            data_dir,
            out,
            overtime_minutes,
        } => {
            let prepared = prepare(data_dir, with_overtime(overtime_minutes))?;
            let report = summary::build_summary(
                &prepared.game.box_score,
                &prepared.rotation,
                &prepared.axis,
                &prepared.game.players,
            );
            emit(out.as_deref(), report.as_bytes())?;
        }
    }

    Ok(())
}

fn with_overtime(overtime_minutes: f64) -> ChartOptions {
    ChartOptions {
        overtime_minutes,
        ..ChartOptions::default()
    }
}

fn prepare(data_dir: Option<PathBuf>, options: ChartOptions) -> anyhow::Result<PreparedChart> {
    let data_dir = resolve_data_dir(data_dir);
    let game = loader::load_game(&data_dir)
        .with_context(|| format!("failed to load game data from {}", data_dir.display()))?;
    let config = ChartConfig::from_box_score(&game.box_score, options)?;
    let rotation = Rotation::from_sessions(&game.sessions, &game.teams);
    let axis = TimeAxis::for_game(&config, &game.box_score, rotation.max_period());
    for team_id in game.teams.keys() {
        if rotation.team(*team_id).is_none() {
            debug!(%team_id, "team descriptor has no sessions in this game");
        }
    }
    info!(
        game_id = %game.box_score.game_id,
        teams = rotation.teams().len(),
        players = rotation.player_count(),
        periods = axis.period_count(),
        "prepared rotation chart"
    );

    Ok(PreparedChart {
        game,
        config,
        rotation,
        axis,
    })
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn emit(out: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rotation_chart=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
