use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_stamp::{
    Alignment, BatchInput, CompanySettings, LayoutElement, PositionPreset, RelativePosition,
    StampContext, StampOptions, StampPages, Stamper,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp company details, signature and QR code onto PDF pages
    Stamp {
        /// Input PDF file(s) - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file (single input) or output directory
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Show where the stamp would land on each page, without writing a PDF
    Layout {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        stamp: StampArgs,
    },
}

#[derive(Args)]
struct StampArgs {
    /// Company settings JSON file
    #[arg(long)]
    settings: PathBuf,

    /// Stamp options JSON file (defaults are used when omitted)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Pages to stamp: first, last, all, or a range such as "1-3,5,8-"
    #[arg(long)]
    pages: Option<String>,

    /// Block position
    #[arg(long, value_enum)]
    position: Option<PositionArg>,

    /// Horizontal block position as a fraction of the page width (custom position)
    #[arg(long)]
    x: Option<f32>,

    /// Vertical block position as a fraction of the page height (custom position)
    #[arg(long)]
    y: Option<f32>,

    /// Signature position as fractions "x,y" of the page (custom position)
    #[arg(long, value_parser = parse_fraction_pair)]
    signature_at: Option<RelativePosition>,

    /// Alignment of the block's elements
    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    /// Text color as hex, e.g. "#003399"
    #[arg(long)]
    color: Option<String>,

    /// Base font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Opacity from 0 to 1
    #[arg(long)]
    opacity: Option<f32>,

    /// Font for text signatures: an installed family name or a font file
    #[arg(long)]
    signature_font: Option<String>,

    /// Leave out the logo
    #[arg(long)]
    no_logo: bool,

    /// Leave out the signature
    #[arg(long)]
    no_signature: bool,

    /// Add the current date
    #[arg(long)]
    date: bool,

    /// Add the source file name
    #[arg(long)]
    filename: bool,

    /// Add a QR code with this payload
    #[arg(long)]
    qr: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PositionArg {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    Custom,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<PositionArg> for PositionPreset {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::BottomRight => Self::BottomRight,
            PositionArg::TopLeft => Self::TopLeft,
            PositionArg::TopRight => Self::TopRight,
            PositionArg::Custom => Self::Custom,
        }
    }
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Self::Left,
            AlignArg::Center => Self::Center,
            AlignArg::Right => Self::Right,
        }
    }
}

fn parse_fraction_pair(value: &str) -> std::result::Result<RelativePosition, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| "expected \"x,y\"".to_string())?;
    let parse = |s: &str| s.trim().parse::<f32>().map_err(|e| e.to_string());
    Ok(RelativePosition::new(parse(x)?, parse(y)?))
}

impl StampArgs {
    /// Load settings and options from disk and apply command-line overrides
    async fn load(&self) -> Result<Stamper> {
        let mut settings = CompanySettings::load(&self.settings)
            .await
            .with_context(|| format!("Failed to load settings {}", self.settings.display()))?;

        let mut options = match &self.options {
            Some(path) => StampOptions::load(path)
                .await
                .with_context(|| format!("Failed to load options {}", path.display()))?,
            None => StampOptions::default(),
        };

        if let Some(font) = &self.signature_font {
            settings.signature_font = Some(font.clone());
        }
        self.apply(&mut options);

        Ok(Stamper::load(settings, options).await?)
    }

    fn apply(&self, options: &mut StampOptions) {
        if let Some(pages) = &self.pages {
            match pages.trim() {
                "first" => options.pages = StampPages::First,
                "last" => options.pages = StampPages::Last,
                "all" => options.pages = StampPages::All,
                range => {
                    options.pages = StampPages::Custom;
                    options.page_range = range.to_string();
                }
            }
        }

        if let Some(position) = self.position {
            options.position.preset = position.into();
        }
        if self.x.is_some() || self.y.is_some() {
            options.position.preset = PositionPreset::Custom;
            options.position.x = self.x.or(options.position.x);
            options.position.y = self.y.or(options.position.y);
        }
        if let Some(position) = self.signature_at {
            options.signature_position = Some(position);
        }

        if let Some(align) = self.align {
            options.alignment = align.into();
        }
        if let Some(color) = &self.color {
            options.color = color.clone();
        }
        if let Some(size) = self.font_size {
            options.font_size = size;
        }
        if let Some(opacity) = self.opacity {
            options.opacity = opacity;
        }

        if self.no_logo {
            options.include_logo = false;
        }
        if self.no_signature {
            options.include_signature = false;
        }
        if self.date {
            options.include_date = true;
        }
        if self.filename {
            options.include_filename = true;
        }
        if let Some(data) = &self.qr {
            options.include_qr_code = true;
            options.qr_code_data = data.clone();
        }
    }
}

/// Where each input's stamped copy goes. Inputs sharing a file stem get
/// numbered names so no output is written twice.
fn output_paths(inputs: &[PathBuf], output: &Path) -> Vec<PathBuf> {
    let single_file = inputs.len() == 1
        && output
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if single_file {
        return vec![output.to_path_buf()];
    }

    let mut used = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());

            let mut name = format!("{}-stamped.pdf", stem);
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}-stamped-{}.pdf", stem, n);
                n += 1;
            }
            output.join(name)
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn run_stamp(input: Vec<PathBuf>, output: PathBuf, args: StampArgs) -> Result<()> {
    let stamper = args.load().await?;
    let targets = output_paths(&input, &output);
    log::info!("Stamping {} file(s)", input.len());
    if let Some(dir) = targets.first().and_then(|p| p.parent()) {
        if !dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let failed = stamp_files(&stamper, &input, &targets).await;
    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, targets.len());
    }
    Ok(())
}

/// Stamp each input into its target path. A file that cannot be read,
/// stamped or written is reported and counted; the rest still go through.
async fn stamp_files(stamper: &Stamper, inputs: &[PathBuf], targets: &[PathBuf]) -> usize {
    let mut failed = 0;
    let mut batch = Vec::with_capacity(inputs.len());
    let mut batch_targets = Vec::with_capacity(inputs.len());
    for (path, target) in inputs.iter().zip(targets) {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                batch.push(BatchInput {
                    name: display_name(path),
                    bytes,
                });
                batch_targets.push(target);
            }
            Err(e) => {
                failed += 1;
                eprintln!("Failed to read {}: {}", path.display(), e);
            }
        }
    }

    let outcomes = stamper.stamp_batch(batch).await;
    for (outcome, target) in outcomes.into_iter().zip(batch_targets) {
        let written = match outcome.result {
            Ok(bytes) => tokio::fs::write(target, bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display())),
            Err(e) => Err(e.into()),
        };
        match written {
            Ok(()) => println!("Stamped {} → {}", outcome.name, target.display()),
            Err(e) => {
                failed += 1;
                eprintln!("Failed {}: {:#}", outcome.name, e);
            }
        }
    }
    failed
}

async fn run_layout(input: PathBuf, args: StampArgs) -> Result<()> {
    let stamper = args.load().await?;
    let mut surface = pdf_stamp::load_pdf(&input)
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let layouts = stamper.plan(&mut surface, &StampContext::new(Some(display_name(&input))))?;

    for layout in layouts {
        println!(
            "Page {} ({}x{} pt, rotated {}°): block {:.1}x{:.1} at ({:.1}, {:.1})",
            layout.page_index + 1,
            layout.geometry.visual_width(),
            layout.geometry.visual_height(),
            layout.geometry.rotation.degrees(),
            layout.block_width,
            layout.block_height,
            layout.block_origin.x,
            layout.block_origin.y,
        );
        for item in &layout.items {
            let (x, y, w, h) = item.visual_rect();
            let label = match &item.element {
                LayoutElement::Text(line) => format!("text {:?}", line.text),
                LayoutElement::Image { role, .. } => format!("{:?}", role).to_lowercase(),
            };
            println!(
                "  {:<28} {:.1}x{:.1} at ({:.1}, {:.1}){}",
                label,
                w,
                h,
                x,
                y,
                if item.detached { " [detached]" } else { "" }
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stamp {
            input,
            output,
            stamp,
        } => run_stamp(input, output, stamp).await?,
        Commands::Layout { input, stamp } => run_layout(input, stamp).await?,
    }

    Ok(())
}
