use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use imgconv::api;
use imgconv::assets::{AssetCategory, AssetLoader};
use imgconv::models::{all_formats, AppConfig, SupportedFormat};
use imgconv::server;
use imgconv::services::{quality, Converter};

#[derive(Parser)]
#[command(name = "imgconv")]
#[command(about = "Convert images between JPEG, PNG, WebP, TIFF, GIF and AVIF")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a single file (no server needed)
    Convert {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Target format (jpeg, png, webp, tiff, gif, avif)
        #[arg(short, long)]
        to: String,

        /// Declared source format; guessed from the input extension if omitted
        #[arg(short, long)]
        from: Option<String>,

        /// Quality from 1 to 100
        #[arg(short, long)]
        quality: Option<i64>,
    },
    /// List supported formats and how quality applies to each
    Formats,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract page templates
        #[arg(long)]
        templates: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgconv API",
        description = "Image format conversion service",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_convert,
        api::handle_convert_status,
        api::handle_formats,
    ),
    components(schemas(
        api::ConvertUpload,
        api::ConvertStatusResponse,
        api::ErrorResponse,
        api::FormatInfo,
        api::FormatsResponse,
        imgconv::models::SupportedFormat,
        imgconv::services::QualityRule,
    )),
    tags(
        (name = "Conversion", description = "Image format conversion")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            to,
            from,
            quality,
        }) => run_convert_command(&input, &output, &to, from.as_deref(), quality),
        Some(Commands::Formats) => {
            run_formats_command();
            Ok(())
        }
        Some(Commands::Init {
            templates,
            config,
            all,
            force,
            list,
        }) => run_init_command(templates, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().map(PathBuf::from)
}

/// Guess the declared source format from a file extension
fn format_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let label = match ext.as_str() {
        "jpg" => "jpeg",
        "tif" => "tiff",
        other => other,
    };
    SupportedFormat::from_label(label).map(SupportedFormat::label)
}

/// Convert one file (no server needed)
fn run_convert_command(
    input: &Path,
    output: &Path,
    to: &str,
    from: Option<&str>,
    quality: Option<i64>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgconv=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = AssetLoader::new(None, env_path("CONFIG_FILE"));
    let config = AppConfig::load_from_assets(&loader);
    let converter = Converter::from_config(&config.codec);

    let source = from
        .or_else(|| format_from_extension(input))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot tell the source format of {}; pass --from",
                input.display()
            )
        })?;

    let payload = std::fs::read(input)?;
    let result = converter.convert_labels(payload, source, to, quality)?;

    std::fs::write(output, &result.bytes)?;
    println!(
        "Converted {} -> {} ({}, {} bytes)",
        input.display(),
        output.display(),
        result.content_type,
        result.bytes.len()
    );

    Ok(())
}

/// Print the format table
fn run_formats_command() {
    println!("{:<6} {:<11} {:<9} QUALITY", "FORMAT", "MIME", "LOSSLESS");
    for format in all_formats() {
        println!(
            "{:<6} {:<11} {:<9} {}",
            format.label(),
            format!("image/{format}"),
            if format.is_lossless() { "yes" } else { "no" },
            quality::rule_for(*format).describe()
        );
    }
}

/// Extract embedded assets to filesystem
fn run_init_command(
    templates: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Templates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || templates {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --templates, or --config");
        eprintln!("\nRun 'imgconv init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::new(env_path("TEMPLATES_DIR"), env_path("CONFIG_FILE"));
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_dir = std::env::var("TEMPLATES_DIR").ok();

    println!("imgconv v{VERSION}");
    println!("Image format conversion service\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_DIR = {}",
        templates_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {config_source}");

    let embedded_count = AssetLoader::list_embedded(AssetCategory::Templates).len();
    match templates_dir {
        Some(ref path) if Path::new(path).exists() => {
            let loader = AssetLoader::new(Some(PathBuf::from(path)), None);
            let count = loader.list_templates().map(|t| t.len()).unwrap_or(0);
            println!("  Templates: {path} ({count} files, {embedded_count} embedded)");
        }
        _ => println!("  Templates: embedded ({embedded_count} files)"),
    }

    let formats: Vec<_> = all_formats().iter().map(|f| f.label()).collect();
    println!("\nFormats: {}", formats.join(", "));

    println!("\nCommands:");
    println!("  imgconv serve     Start the HTTP server");
    println!("  imgconv convert   Convert a file from the command line");
    println!("  imgconv formats   List supported formats");
    println!("  imgconv init      Extract embedded assets");
    println!("\nRun 'imgconv --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgconv=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let templates_dir = env_path("TEMPLATES_DIR");
    let config_file = env_path("CONFIG_FILE");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let asset_loader = Arc::new(AssetLoader::new(
        templates_dir.clone(),
        config_file.clone(),
    ));

    // Log asset sources
    tracing::info!(
        templates = ?templates_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    // Seed if configured paths are empty
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                templates = report.templates_seeded.len(),
                config = report.config_seeded,
                "Seeded empty paths with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    // Build router: start with shared routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Static file serving (production only)
        .nest_service("/static", ServeDir::new("./static"));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "imgconv server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
