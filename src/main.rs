use clap::{Args, Parser, Subcommand};
use imgrunner::favicon::{self, Background};
use imgrunner::metadata::{
    self, ExifTagSource, FileContext, MetadataSummary, categorize, extract_metadata,
    strip_metadata,
};
use imgrunner::palette::{self, ExportFormat, PixelBuffer};
use imgrunner::{config, naming, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imgrunner")]
#[command(about = "Color palettes, image metadata and favicons from the command line")]
#[command(long_about = "\
Color palettes, image metadata and favicons from the command line

  palette   dominant colors as a table plus CSS/SCSS/Tailwind/JSON export
  metadata  EXIF, GPS and container fields grouped for reading; JSON export
            and a metadata-free copy on request
  favicon   a multi-size favicon.ico, optionally standalone PNGs

Run 'imgrunner gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory written files go to
    #[arg(long, default_value = ".", global = true)]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PaletteArgs {
    image: PathBuf,
    /// Number of colors (1-20)
    #[arg(long, short = 'k')]
    colors: Option<usize>,
    /// Export format: css, scss, tailwind or json
    #[arg(long, short)]
    format: Option<ExportFormat>,
    /// Also save the export as palette.<ext>
    #[arg(long)]
    write: bool,
}

#[derive(Args)]
struct MetadataArgs {
    image: PathBuf,
    /// Write <name>_metadata.json
    #[arg(long)]
    json: bool,
    /// Write <name>_clean.<ext> with all metadata removed
    #[arg(long)]
    strip: bool,
    /// Print a flat text dump instead of grouped fields
    #[arg(long)]
    text: bool,
    /// Only show fields whose name or value contains this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct FaviconArgs {
    image: PathBuf,
    /// ICO file name inside the output directory
    #[arg(long, default_value = naming::FAVICON_ICO)]
    output: PathBuf,
    /// Comma-separated sizes, overriding the config
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u32>>,
    /// Background: "transparent" or #rrggbb
    #[arg(long)]
    background: Option<Background>,
    /// Also write favicon-NxN.png for every preview size
    #[arg(long)]
    png: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the dominant colors of an image
    Palette(PaletteArgs),
    /// Show, export or remove image metadata
    Metadata(MetadataArgs),
    /// Build favicon.ico from an image
    Favicon(FaviconArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Palette(args) => run_palette(&config, &cli.out_dir, args)?,
        Command::Metadata(args) => run_metadata(&config, &cli.out_dir, args)?,
        Command::Favicon(args) => run_favicon(&config, &cli.out_dir, args)?,
        Command::GenConfig => {}
    }
    Ok(())
}

fn run_palette(
    config: &config::ToolConfig,
    out_dir: &Path,
    args: PaletteArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = config.palette.options();
    if let Some(colors) = args.colors {
        if !(1..=20).contains(&colors) {
            return Err(format!("--colors must be 1-20, got {colors}").into());
        }
        options.colors = colors;
    }
    let format = args.format.unwrap_or(config.palette.format);

    let img = image::open(&args.image)?;
    let entries = palette::extract_palette(&PixelBuffer::from(img.to_rgba8()), &options);
    output::print_palette(&entries);

    let export = palette::render(&entries, format);
    println!();
    println!("{export}");

    if args.write {
        let path = write_output(out_dir, &naming::palette_file_name(format), export.as_bytes())?;
        output::print_written(&[path]);
    }
    Ok(())
}

fn run_metadata(
    config: &config::ToolConfig,
    out_dir: &Path,
    args: MetadataArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&args.image)?;
    let file_name = file_name_of(&args.image);
    let mime = sniff_mime(&bytes);

    let mut file = FileContext::new(&file_name, &bytes, mime);
    if let Ok(modified) = std::fs::metadata(&args.image).and_then(|m| m.modified()) {
        file = file.modified(chrono::DateTime::<chrono::Local>::from(modified).naive_local());
    }
    match image::image_dimensions(&args.image) {
        Ok((w, h)) => file = file.dimensions(w, h),
        Err(err) => log::debug!("{file_name}: dimensions unavailable: {err}"),
    }

    let record = extract_metadata(&file, &ExifTagSource::new(), &config.metadata.options());

    if let Some(query) = &args.search {
        for key in record.search(query) {
            if let Some(value) = record.get(key) {
                println!("{}: {}", metadata::display_name(key), metadata::format_value(key, value));
            }
        }
    } else if args.text {
        println!("{}", metadata::export::to_text(&record, &file_name));
    } else {
        output::print_metadata(&MetadataSummary::from_record(&record), &categorize(&record));
        output::print_location(&record);
    }

    let mut written = Vec::new();
    if args.json {
        let json = metadata::export::to_json(&record)?;
        written.push(write_output(
            out_dir,
            &naming::metadata_json_name(&file_name),
            json.as_bytes(),
        )?);
    }
    if args.strip {
        let clean = strip_metadata(&bytes, mime)?;
        let name = naming::clean_file_name(&file_name, naming::extension_for_mime(clean.mime));
        written.push(write_output(out_dir, &name, &clean.bytes)?);
    }
    output::print_written(&written);
    Ok(())
}

fn run_favicon(
    config: &config::ToolConfig,
    out_dir: &Path,
    args: FaviconArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let sizes = args.sizes.unwrap_or_else(|| config.favicon.sizes.clone());
    let background = match args.background {
        Some(bg) => bg,
        None => config.favicon.background()?,
    };

    let img = image::open(&args.image)?;
    let ico = favicon::create_favicon(&img, &sizes, background)?;
    let entries: Vec<(u32, usize)> = favicon::IcoDirectory::parse(&ico)?
        .entries
        .iter()
        .map(|e| (u32::from(e.width), e.size as usize))
        .collect();

    std::fs::create_dir_all(out_dir)?;
    let ico_path = out_dir.join(&args.output);
    std::fs::write(&ico_path, &ico)?;
    output::print_favicon_output(&ico_path, ico.len(), &entries);

    if args.png {
        let mut written = Vec::new();
        for (size, png) in favicon::preview_pngs(&img, &ico, &favicon::PREVIEW_SIZES, background)? {
            written.push(write_output(out_dir, &naming::favicon_png_name(size), &png)?);
        }
        output::print_written(&written);
    }
    Ok(())
}

fn write_output(dir: &Path, name: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// MIME type from the file's magic bytes; empty when unrecognized.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("")
}
