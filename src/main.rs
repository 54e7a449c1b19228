use cardpress::{
    AutoPrompt, CsvDataSource, EngineConfig, ExportMode, FieldId, FontAsset, PageSizeKey,
    PipelineError, RasterFormat, Session, Size, SoftwareSurface, TerminalPrompt, UserPrompt,
};
use cardpress_render_raster::encode_frame;
use cardpress_resource::{FilesystemResourceProvider, RoutingResourceProvider};
use cardpress_traits::ResourceProvider;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "cardpress", version)]
#[command(about = "Render one PDF page or image per CSV row from a field layout")]
struct Cli {
    /// Configuration file (default: ./cardpress.toml or $CARDPRESS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every data row as a PDF page or as images in a zip archive
    Export(ExportArgs),
    /// Write the interactive preview for the first row as a PNG
    Preview(PreviewArgs),
    /// List the page size presets
    Pages,
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with a header row
    #[arg(long, conflicts_with = "sheet_url")]
    csv: Option<String>,

    /// URL of a published spreadsheet in CSV format
    #[arg(long)]
    sheet_url: Option<String>,

    /// Layout JSON (a map of field id to field); defaults to the starter layout
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Page size: 6x9, a4 or a5
    #[arg(long, default_value = "6x9")]
    page: PageSizeKey,

    /// Background image (PNG or JPEG) stretched over the page
    #[arg(long)]
    background: Option<String>,

    /// TrueType font path or URL; overrides the configured font
    #[arg(long)]
    font: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format: pdf, png or jpeg
    #[arg(long, default_value = "pdf")]
    format: ExportMode,

    /// Directory the export is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Don't ask before generating a batch of images
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG file
    #[arg(long, default_value = "preview.png")]
    out: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    viewport_width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 1000.0)]
    viewport_height: f32,

    /// Field id to show as selected
    #[arg(long)]
    select: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(Some(path), true)?,
        None => EngineConfig::load()?,
    };

    match cli.command {
        Commands::Pages => {
            print_pages();
            Ok(())
        }
        Commands::Export(args) => export(config, args),
        Commands::Preview(args) => preview(config, args),
    }
}

fn print_pages() {
    for key in PageSizeKey::ALL {
        let page = key.page_size();
        println!(
            "{:<4} {:<16} {:>7.2} x {:>7.2} pt   margins: inner {} mm, outer {} mm, top/bottom {} mm",
            key.as_str(),
            page.name,
            page.width_pt,
            page.height_pt,
            page.margin.inner_mm,
            page.margin.outer_mm,
            page.margin.top_bottom_mm,
        );
    }
}

/// Every input is fetched before the runtime starts; the runtime only drives
/// the export itself.
fn export(config: EngineConfig, args: ExportArgs) -> Result<(), PipelineError> {
    let prompt: Box<dyn UserPrompt> = if args.yes {
        Box::new(AutoPrompt::yes())
    } else {
        Box::new(TerminalPrompt)
    };
    let mut session = build_session(config, &args.input, prompt)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let exported = runtime.block_on(session.export(args.format));
    drop(runtime);

    let Some(output) = exported? else {
        println!("Export cancelled.");
        return Ok(());
    };

    fs::create_dir_all(&args.out)?;
    let path = args.out.join(&output.filename);
    fs::write(&path, &output.bytes)?;
    println!("Wrote {} ({} {})", path.display(), output.units, unit_name(args.format));
    if !output.skipped_rows.is_empty() {
        let rows: Vec<String> = output.skipped_rows.iter().map(|r| (r + 1).to_string()).collect();
        println!("Rows with rendering errors: {}", rows.join(", "));
    }
    Ok(())
}

fn unit_name(mode: ExportMode) -> &'static str {
    match mode {
        ExportMode::Vector => "pages",
        ExportMode::Raster(_) => "images",
    }
}

fn preview(config: EngineConfig, args: PreviewArgs) -> Result<(), PipelineError> {
    let mut session = build_session(config, &args.input, Box::new(TerminalPrompt))?;
    session.resize_viewport(Size::new(args.viewport_width, args.viewport_height));
    if let Some(id) = args.select {
        session.select(Some(FieldId::from(id)));
    }
    session.refresh_preview();

    let frame = session.capture_preview()?;
    let png = encode_frame(&frame, RasterFormat::Png)?;
    write_file(&args.out, &png)?;
    println!(
        "Wrote {} ({}x{} px, {}%)",
        args.out.display(),
        frame.width,
        frame.height,
        session.zoom_percent()
    );
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn resource_provider() -> Result<RoutingResourceProvider, PipelineError> {
    let provider =
        RoutingResourceProvider::new(Box::new(FilesystemResourceProvider::unrestricted(".")));
    #[cfg(feature = "remote")]
    let provider =
        provider.with_remote(Box::new(cardpress_resource::HttpResourceProvider::new()?));
    Ok(provider)
}

#[cfg(feature = "system-fonts")]
fn fallback_surface() -> Option<SoftwareSurface> {
    SoftwareSurface::with_system_font()
}

#[cfg(not(feature = "system-fonts"))]
fn fallback_surface() -> Option<SoftwareSurface> {
    None
}

/// Fetches every input before anything renders; a fetch failure aborts here.
fn build_session(
    config: EngineConfig,
    input: &InputArgs,
    prompt: Box<dyn UserPrompt>,
) -> Result<Session<SoftwareSurface>, PipelineError> {
    let provider = resource_provider()?;

    let font = match input.font.as_deref().or(config.font.as_deref()) {
        Some(path) => match provider.load(path) {
            Ok(data) => Some(FontAsset::new(FontAsset::name_from_path(path), data)),
            Err(e) => {
                log::warn!("Font '{}' could not be loaded: {}", path, e);
                prompt.notify("The font file could not be loaded. Text may not display correctly.");
                None
            }
        },
        None => None,
    };

    let surface = match &font {
        Some(font) => SoftwareSurface::from_font_bytes(&font.data).ok().or_else(|| {
            log::warn!("Preview cannot use font '{}', looking for a system font", font.name);
            fallback_surface()
        }),
        None => fallback_surface(),
    }
    .unwrap_or_else(|| {
        log::warn!("No usable font; images will be refused until one is configured");
        SoftwareSurface::new()
    })
    .with_line_height(config.line_height);

    let mut session = Session::new(surface, config, prompt);
    session.set_font(font);
    session.set_page_size(input.page);

    if let Some(path) = &input.layout {
        session.load_layout_json(&fs::read_to_string(path)?)?;
    }

    if let Some(path) = &input.background {
        let bytes = provider.load(path)?;
        session.set_background(Some(bytes.to_vec()))?;
    }

    if let Some(path) = input.csv.as_deref().or(input.sheet_url.as_deref()) {
        let mut source = CsvDataSource::load(&provider, path)?;
        session.load_rows(&mut source)?;
    }

    Ok(session)
}
