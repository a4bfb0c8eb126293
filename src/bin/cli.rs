use clap::Parser;
use outline_grid::{GeneratorConfig, generate};
use rand::Rng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Генератор фэнтезийных карт: сетка тайлов, биомы, города, дороги и берега
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию — встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределяет сид из конфигурации
    #[arg(short, long, conflicts_with = "random_seed")]
    seed: Option<f64>,

    /// Случайный сид из [0, 1)
    #[arg(long)]
    random_seed: bool,

    /// Путь для сохранения карты в JSON (по умолчанию: ./map.json)
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("🔍 Загрузка конфигурации из {:?}...", path);
            GeneratorConfig::from_toml_file(path)?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    } else if cli.random_seed {
        config.seed = rand::thread_rng().gen_range(0.0..1.0);
    }

    info!(
        "Генерация карты (seed = {}, сетка {}×{})...",
        config.seed, config.grid.width, config.grid.height
    );
    let map = generate(&config)?;

    let output = cli.output.to_str().ok_or("output path is not valid UTF-8")?;
    info!("Сохранение в {:?}", cli.output);
    map.save_as_json(output)?;

    info!("Готово! Карта сохранена.");
    Ok(())
}
