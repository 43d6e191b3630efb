use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use inkpress::api;
use inkpress::models::{
    AppConfig, EffectSettings, EnhanceSettings, PrintLocation, PrintSpec, SeparationSettings,
    ShirtSize, Tool, UpscaleFactor,
};
use inkpress::server;
use inkpress::services::{Pipeline, PrintExporter, ProcessRequest};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(about = "Inkpress - raster effects and print-ready export for DTF transfers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Run the processing pipeline on an image file
    Process {
        /// Source image (PNG, JPEG, ... or a file holding a data URI)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Tool: separation, halftone, stippling, dithering, grain, engraving, ...
        #[arg(short, long, default_value = "separation")]
        tool: Tool,

        /// Effect strength in percent (1-100)
        #[arg(long, default_value_t = 50.0)]
        intensity: f32,

        /// Cell, dot or line spacing in pixels (3-50)
        #[arg(long, default_value_t = 6.0)]
        scale: f32,

        /// Screen angle in degrees (0-90)
        #[arg(long, default_value_t = 45.0)]
        angle: f32,

        /// Hue rotation in degrees (0-360)
        #[arg(long, default_value_t = 0.0)]
        hue: f32,

        /// Saturation in percent (0-200)
        #[arg(long, default_value_t = 100.0)]
        saturation: f32,

        /// Contrast in percent (0-200)
        #[arg(long, default_value_t = 100.0)]
        contrast: f32,

        /// Brightness in percent (0-200)
        #[arg(long, default_value_t = 100.0)]
        brightness: f32,

        /// Upscale factor: 1, 2 or 4
        #[arg(long, default_value_t = 1)]
        upscale: u32,

        /// Clear pixels matching the top-left corner color
        #[arg(long)]
        remove_bg: bool,
    },
    /// Export a print-ready PNG at a physical size
    Export {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write the print file into
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Shirt size: S, M, L, XL, XXL, XXXL
        #[arg(short, long, default_value = "M")]
        shirt_size: ShirtSize,

        /// Placement: front_center, front_pocket, back_center, back_neck
        #[arg(short, long, default_value = "front_center")]
        location: PrintLocation,

        /// Print width in cm, overriding the garment preset
        #[arg(short, long)]
        width_cm: Option<f32>,

        /// Resolution in dots per inch
        #[arg(long)]
        dpi: Option<u32>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkpress API",
        description = "Raster effects and print-ready export for DTF apparel printing",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_process,
        api::handle_submit_preview,
        api::handle_get_preview,
        api::handle_export,
        api::handle_layout,
        api::handle_login,
        api::handle_list_users,
        api::handle_create_user,
        api::handle_delete_user,
        api::handle_export_users,
        api::handle_import_users,
        api::handle_analyze,
        api::handle_chat,
    ),
    components(schemas(
        api::ProcessBody,
        api::ExportBody,
        api::PreviewAccepted,
        api::Credentials,
        api::ImportResponse,
        api::AnalyzeRequest,
        api::ChatRequest,
        api::AssistantReply,
        inkpress::models::PrintLayout,
        inkpress::models::User,
    )),
    modifiers(&BasicAuth),
    tags(
        (name = "Processing", description = "Raster effect pipeline"),
        (name = "Preview", description = "Debounced preview rendering"),
        (name = "Export", description = "Print-ready export"),
        (name = "Users", description = "Accounts and login; management requires admin basic auth"),
        (name = "Assistant", description = "Generative design assistant")
    )
)]
struct ApiDoc;

/// Registers the basic auth scheme used by the user management routes
struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Process {
            input,
            output,
            tool,
            intensity,
            scale,
            angle,
            hue,
            saturation,
            contrast,
            brightness,
            upscale,
            remove_bg,
        }) => {
            let upscale = UpscaleFactor::try_from(upscale).map_err(anyhow::Error::msg)?;
            let request = ProcessRequest {
                tool,
                separation: SeparationSettings {
                    hue,
                    saturation,
                    contrast,
                    brightness,
                },
                effect: EffectSettings {
                    intensity,
                    scale,
                    angle,
                },
                enhance: EnhanceSettings { upscale, remove_bg },
            };
            run_process_command(&input, &output, &request)
        }
        Some(Commands::Export {
            input,
            output_dir,
            shirt_size,
            location,
            width_cm,
            dpi,
        }) => run_export_command(&input, &output_dir, shirt_size, location, width_cm, dpi),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Process an image file (no server needed)
fn run_process_command(input: &Path, output: &Path, request: &ProcessRequest) -> anyhow::Result<()> {
    init_cli_logging();

    let config = AppConfig::from_env();
    let pipeline = Pipeline::new(config.pipeline);

    let source = std::fs::read(input)?;
    let image = pipeline
        .process(&source, request)
        .map_err(|e| anyhow::anyhow!("Processing error: {e}"))?;

    std::fs::write(output, &image.png)?;
    println!(
        "Processed {} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        image.width,
        image.height,
        image.png.len()
    );

    Ok(())
}

/// Export a print file (no server needed)
fn run_export_command(
    input: &Path,
    output_dir: &Path,
    shirt_size: ShirtSize,
    location: PrintLocation,
    width_cm: Option<f32>,
    dpi: Option<u32>,
) -> anyhow::Result<()> {
    init_cli_logging();

    let config = AppConfig::from_env();
    let exporter = PrintExporter::new(
        Arc::new(Pipeline::new(config.pipeline)),
        config.export.clone(),
    );

    let mut spec =
        PrintSpec::new(shirt_size, location).with_dpi(dpi.unwrap_or(config.export.default_dpi));
    if let Some(width_cm) = width_cm {
        spec.set_width_cm(width_cm);
    }

    let source = std::fs::read(input)?;
    let export = exporter
        .export(Some(&source), &spec)
        .map_err(|e| anyhow::anyhow!("Export error: {e}"))?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&export.filename);
    std::fs::write(&path, &export.png)?;

    println!(
        "Exported {} ({}x{} px, {} cm x {} cm at {} DPI, {} bytes)",
        path.display(),
        export.layout.width_px,
        export.layout.height_px,
        export.layout.width_cm,
        export.layout.height_cm,
        export.layout.dpi,
        export.png.len()
    );
    if export.layout.quality_warning {
        println!(
            "Warning: width exceeds {} px, upsampling artifacts may be visible",
            config.export.quality_warning_px
        );
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let api_key = std::env::var("GEMINI_API_KEY").ok();

    println!("Inkpress v{VERSION}");
    println!("Raster effects and print-ready export for DTF transfers\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR      = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE    = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  GEMINI_API_KEY = {}",
        if api_key.is_some() { "(set)" } else { "(not set)" }
    );

    println!("\nTools:");
    let tools: Vec<&str> = Tool::ALL.iter().map(|t| t.as_str()).collect();
    println!("  {}", tools.join(", "));

    println!("\nCommands:");
    println!("  inkpress serve     Start the HTTP server");
    println!("  inkpress process   Run the pipeline on an image file");
    println!("  inkpress export    Write a print-ready PNG");
    println!("\nRun 'inkpress --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = AppConfig::from_env();

    tracing::info!(
        max_dimension = config.pipeline.max_dimension,
        debounce_ms = config.preview.debounce_ms,
        assistant_model = %config.assistant.model,
        assistant_key = config.assistant.api_key.is_some(),
        "Configuration loaded"
    );

    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Inkpress server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
