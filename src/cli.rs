use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, CloudConfig};
use crate::input::{parse_words, read_words, sort_by_weight};
use crate::render::default_output_path;
use crate::{ColorScheme, WeightedWord};

#[derive(Parser, Debug)]
#[command(name = "tagcloud", version, about = "Render a weighted word list as a spiral tag cloud")]
pub struct Args {
    /// Word list, one `word weight` pair per line; '-' or omitted reads stdin
    pub input: Option<PathBuf>,

    /// Output image (.jpg/.png/.svg). Defaults to a random word's name + .jpg
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// TrueType/OpenType font used to measure and draw the words
    #[arg(short = 'f', long = "font")]
    pub font: Option<PathBuf>,

    #[arg(short = 'w', long = "width")]
    pub width: Option<u32>,

    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    /// Initial spiral radius
    #[arg(short = 'r', long = "radius")]
    pub radius: Option<f64>,

    /// Palette name (classic, ocean, sunset, forest, berry, monochrome, rainbow)
    #[arg(long = "scheme")]
    pub scheme: Option<String>,

    /// Seed for start angles and colours
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Give up on a word after this many candidate positions
    #[arg(long = "max-iterations")]
    pub max_iterations: Option<usize>,

    /// JPEG quality (1-100)
    #[arg(short = 'q', long = "quality")]
    pub quality: Option<u8>,

    /// Sort words by weight, heaviest first, before layout
    #[arg(long = "sort")]
    pub sort: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = merge_args(load_config(args.config.as_deref())?, &args)?;
    let mut words = read_input(args.input.as_deref())?;
    if words.is_empty() {
        return Err(anyhow!("No words found in input"));
    }
    if args.sort {
        sort_by_weight(&mut words);
    }

    let font = config
        .font
        .as_deref()
        .ok_or_else(|| anyhow!("A font is required (--font or \"font\" in the config file)"))?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => {
            let mut rng = match config.seed {
                Some(s) => ChaCha8Rng::seed_from_u64(s),
                None => ChaCha8Rng::from_os_rng(),
            };
            default_output_path(&words, &mut rng)?
        }
    };

    let cloud = config
        .builder()
        .font_file(font)?
        .build(&words)
        .context("layout failed")?;
    info!(
        words = words.len(),
        kept = cloud.labels.len(),
        "tag cloud laid out"
    );

    cloud
        .save(&output, config.quality)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn merge_args(mut config: CloudConfig, args: &Args) -> Result<CloudConfig> {
    if let Some(v) = args.width {
        config.width = v;
    }
    if let Some(v) = args.height {
        config.height = v;
    }
    if let Some(v) = args.radius {
        config.radius = v;
    }
    if let Some(v) = &args.font {
        config.font = Some(v.clone());
    }
    if let Some(v) = args.seed {
        config.seed = Some(v);
    }
    if let Some(v) = args.max_iterations {
        config.max_iterations = Some(v);
    }
    if let Some(v) = args.quality {
        config.quality = v;
    }
    if let Some(name) = &args.scheme {
        let scheme =
            ColorScheme::from_name(name).ok_or_else(|| anyhow!("Unknown color scheme '{name}'"))?;
        config.colors = scheme.colors().into_iter().map(String::from).collect();
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<Vec<WeightedWord>> {
    if let Some(path) = path.filter(|p| *p != Path::new("-")) {
        return read_words(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(parse_words(&buf)?)
}
