use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ascii_art::{
    ArtAssembler, AsciiOptions, GlyphBrightnessTable, GlyphGrid, ResolutionBounds, SourceImage,
};
use clap::{ArgAction, Parser, Subcommand};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

mod charspec;
mod config;
mod logging;
mod output;
mod shell;

use charspec::CharSpec;
use config::ShellConfig;
use output::{html_document, write_console};
use shell::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert images to brightness-matched ASCII art")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load an image and tune the art interactively
    Shell(ShellArgs),
    /// Convert a single image and print it or write it as HTML
    Render(RenderArgs),
    /// Convert every image under a directory to text files
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct ShellArgs {
    /// Input image path
    input: PathBuf,
    /// TOML file with the initial shell settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image path
    input: PathBuf,
    /// Write an HTML page to this path instead of printing
    #[arg(long)]
    html: Option<PathBuf>,
    /// Font family used in the HTML page
    #[arg(long, default_value = "Courier New")]
    font: String,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory for the text files
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Characters per output row
    #[arg(short, long, default_value_t = 64)]
    resolution: u32,
    /// Characters to draw with: `all`, `space`, one character or a range
    /// like `a-z`; may be repeated
    #[arg(long = "chars", value_name = "SPEC", default_value = "all")]
    chars: Vec<CharSpec>,
    /// Invert brightness before matching
    #[arg(long, default_value_t = false)]
    invert: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Shell(args) => shell(args),
        Commands::Render(args) => render(args),
        Commands::Batch(args) => batch(args),
    }
}

fn shell(args: ShellArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    let image = load_image(&args.input)?;
    let mut shell = Shell::new(image, config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout).context("failed to run shell")
}

fn render(args: RenderArgs) -> Result<()> {
    let image = load_image(&args.input)?;
    let table = args.settings.table()?;
    let grid = args.settings.convert(&image, &table, &mut ArtAssembler::new())?;

    match &args.html {
        Some(path) => std::fs::write(path, html_document(&grid, &args.font))
            .with_context(|| format!("failed to write {:?}", path))?,
        None => write_console(&grid, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let inputs = find_images(&args.input)?;
    let table = args.settings.table()?;
    let mut assembler = ArtAssembler::new();

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )
        .context("invalid progress template")?
        .progress_chars("=> "),
    );

    let mut written = 0;
    for input in &inputs {
        match convert_file(input, &args, &table, &mut assembler) {
            Ok(()) => written += 1,
            Err(err) => {
                tracing::warn!("skipping {}: {err:#}", input.display());
                progress.println(format!("skipped {:?}: {err:#}", input));
            },
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "{written} of {} images written to {:?}",
        inputs.len(),
        args.out_dir
    ));
    Ok(())
}

fn convert_file(
    input: &Path,
    args: &BatchArgs,
    table: &GlyphBrightnessTable,
    assembler: &mut ArtAssembler,
) -> Result<()> {
    let image = load_image(input)?;
    let grid = args.settings.convert(&image, table, assembler)?;

    let target = output_path(&args.input, input, &args.out_dir);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {:?}", parent))?;
    }
    let file = File::create(&target).with_context(|| format!("failed to create {:?}", target))?;
    let mut writer = BufWriter::new(file);
    write_console(&grid, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Text file for `input`, mirroring its place under `root` with `.txt` appended
/// to the full file name, so `a.v1.png` and `a.v2.png` stay apart.
fn output_path(root: &Path, input: &Path, out_dir: &Path) -> PathBuf {
    let relative = match input.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => Path::new(input.file_name().unwrap_or(input.as_os_str())),
    };
    let mut name = relative.as_os_str().to_os_string();
    name.push(".txt");
    out_dir.join(name)
}

fn find_images(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| ImageFormat::from_path(path).is_ok())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }
    Ok(entries)
}

fn load_image(path: &Path) -> Result<SourceImage> {
    SourceImage::open(path).with_context(|| format!("failed to open image {:?}", path))
}

impl RenderSettings {
    fn to_options(&self) -> AsciiOptions {
        AsciiOptions { resolution: self.resolution, invert: self.invert }
    }

    fn table(&self) -> Result<GlyphBrightnessTable> {
        let chars = self.chars.iter().flat_map(|spec| spec.chars().iter().copied());
        let table = GlyphBrightnessTable::with_chars(chars);
        if table.len() < 2 {
            anyhow::bail!("at least two distinct characters are needed, got {}", table.len());
        }
        Ok(table)
    }

    fn convert(
        &self,
        image: &SourceImage,
        table: &GlyphBrightnessTable,
        assembler: &mut ArtAssembler,
    ) -> Result<GlyphGrid> {
        let options = self.to_options();
        ResolutionBounds::for_image(image.width(), image.height()).check(options.resolution)?;
        Ok(assembler.render(image, table, &options)?)
    }
}
