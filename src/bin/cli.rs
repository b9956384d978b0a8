use clap::Parser;
use hexmapgen::{MapGenerationParams, generate, summarize};
use std::path::PathBuf;

/// Генератор гексагональных карт для Chronicles of Realms: Tactics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (без него — значения
    /// по умолчанию)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения карты (по умолчанию: ./map.hexmap)
    #[arg(short, long, default_value = "map.hexmap")]
    output: PathBuf,

    /// Сид генератора случайных чисел
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Ширина карты в ячейках (кратна 5)
    #[arg(long, default_value_t = 40)]
    width: i32,

    /// Высота карты в ячейках (кратна 5)
    #[arg(long, default_value_t = 30)]
    height: i32,

    /// Дополнительно сохранить PNG-превью по этому пути
    #[arg(short, long)]
    preview: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации из {path:?}...");
            MapGenerationParams::from_toml_file(path)?
        }
        None => MapGenerationParams::default(),
    };

    println!(
        "Генерация карты {}×{} (сид {})...",
        cli.width, cli.height, cli.seed
    );
    let grid = generate(cli.width, cli.height, cli.seed, &params)?;

    println!("Сохранение в {:?}", cli.output);
    grid.save_to_file(&cli.output)?;

    if let Some(preview) = &cli.preview {
        println!("Превью: {preview:?}");
        grid.save_preview_png(preview)?;
    }

    let summary = summarize(&grid);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
