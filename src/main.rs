//! ddsdecode CLI - Command-line tool for decoding DDS textures.
//!
//! This is the main entry point for the ddsdecode command-line application.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use ddsdecode::{DdsHeader, SurfaceInfo, Texture};

/// ddsdecode - DDS texture decoding tool
#[derive(Parser)]
#[command(name = "ddsdecode")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a DDS file to PNG
    Convert {
        /// Input DDS file
        #[arg(short, long, env = "DDS_INPUT")]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long, env = "DDS_OUTPUT")]
        output: PathBuf,
    },

    /// Show header fields and surface classification of a DDS file
    Info {
        /// Input DDS file
        #[arg(short, long, env = "DDS_INPUT")]
        input: PathBuf,
    },

    /// Decode every DDS file under a directory to PNG
    Batch {
        /// Input directory
        #[arg(short, long, env = "DDS_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "DDS_OUTPUT")]
        output: PathBuf,

        /// Filter pattern (glob-style, matched against the relative path)
        #[arg(short, long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert { input, output } => {
            cmd_convert(&input, &output)?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Batch { input, output, filter } => {
            cmd_batch(&input, &output, filter.as_deref())?;
        }
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn decode_file(path: &Path) -> Result<Texture> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let texture = ddsdecode::decode(&mut reader)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(texture)
}

fn write_png(texture: Texture, output: &Path) -> Result<()> {
    let (width, height) = (texture.width, texture.height * texture.faces);
    let image = RgbaImage::from_raw(width, height, texture.into_data())
        .context("Decoded buffer does not match image dimensions")?;
    image
        .save_with_format(output, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> Result<()> {
    info!("Converting: {} -> {}", input.display(), output.display());

    let start = Instant::now();
    let texture = decode_file(input)?;
    debug!(
        width = texture.width,
        height = texture.height,
        dxt = texture.dxt,
        faces = texture.faces,
        elapsed = ?start.elapsed(),
        "decoded"
    );

    write_png(texture, output)?;

    info!("Conversion complete");

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let header = DdsHeader::read(&mut BufReader::new(file)).context("Failed to read DDS header")?;

    println!("File:          {}", input.display());
    println!("Magic:         {:?}", String::from_utf8_lossy(&header.magic));
    println!("Header size:   {}", header.size);
    println!("Flags:         {:#010X}", header.flags.bits());
    println!("Dimensions:    {}x{}", header.width, header.height);
    println!("Pitch/linear:  {}", header.pitch_or_linear_size);
    println!("Depth:         {}", header.depth);
    println!("Mip count:     {}", header.mipmap_count);
    println!(
        "Pixel format:  flags {:#010X}, FourCC {}",
        header.pixel_format.flags.bits(),
        header.pixel_format.four_cc
    );
    println!("RGB bit count: {}", header.pixel_format.rgb_bit_count);
    println!(
        "Caps:          {:#010X} / {:#010X}",
        header.caps.caps1.bits(),
        header.caps.caps2.bits()
    );

    if let Err(e) = header.validate() {
        println!("Validation:    FAILED ({})", e);
        return Ok(());
    }
    println!("Validation:    ok");

    let info = SurfaceInfo::from_header(&header).context("Failed to classify surface")?;
    match info.variant {
        Some(variant) => println!(
            "Format:        DXT{} ({} bytes/block{})",
            variant.family(),
            variant.block_bytes(),
            if variant.is_premultiplied() { ", premultiplied" } else { "" }
        ),
        None => println!("Format:        uncompressed, {} channels", info.channels()),
    }
    println!("Faces:         {}", info.cubemap_faces);
    println!("Mipmaps:       {}", if info.has_mipmap { "yes" } else { "no" });
    if info.is_compressed() {
        println!("Blocks:        {} ({} per row)", info.num_blocks, info.block_pitch);
    }

    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, filter: Option<&str>) -> Result<()> {
    let filter = filter
        .map(Pattern::new)
        .transpose()
        .context("Invalid glob pattern")?;

    info!("Scanning {}", input.display());

    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("dds"))
        })
        .filter(|p| match &filter {
            Some(pattern) => p
                .strip_prefix(input)
                .is_ok_and(|rel| matches_filter(pattern, rel)),
            None => true,
        })
        .collect();

    info!("Converting {} files...", files.len());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let rel = path.strip_prefix(input).unwrap_or(path);
        let target = output.join(rel).with_extension("png");

        let result = target
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(anyhow::Error::from)
            .and_then(|_| decode_file(path))
            .and_then(|texture| write_png(texture, &target));

        if let Err(e) = result {
            pb.suspend(|| warn!("{}: {:#}", path.display(), e));
            errors.fetch_add(1, Ordering::Relaxed);
        }
        pb.inc(1);
    });

    pb.finish_with_message("Done");
    let errors = errors.into_inner();
    info!(
        "Converted {} files in {:?} ({} errors)",
        files.len() - errors,
        start.elapsed(),
        errors
    );

    Ok(())
}

/// Match a path relative to the batch root, case-insensitively and with
/// `/` as the separator on every platform.
fn matches_filter(pattern: &Pattern, rel: &Path) -> bool {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    rel.to_str()
        .is_some_and(|rel| pattern.matches_with(&rel.replace('\\', "/"), options))
}
