use bmpkit::{BmpError, BmpResult, NamedFilter, Session, Transform};
use clap::{Parser, Subcommand};
use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Read, write, and filter 8-bit and 24-bit BMP images.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print the size and depth of a bitmap.
  Info { file: PathBuf },

  /// Apply transforms in order and save the result.
  ///
  /// Transforms are: negative, grayscale, brightness=N, threshold=N,
  /// box-blur, gaussian-blur, outline, emboss, sharpen, equalize.
  Apply {
    input: PathBuf,
    output: PathBuf,
    #[arg(required = true)]
    transforms: Vec<Transform>,
  },

  /// Run every transform on a grayscale and a color image, saving one
  /// numbered file per transform.
  Batch {
    /// An 8-bit indexed bitmap.
    #[arg(long)]
    gray: PathBuf,

    /// A 24-bit truecolor bitmap.
    #[arg(long)]
    color: PathBuf,

    #[arg(long, env = "BMPKIT_OUT_GRAY", default_value = "tests_8bits")]
    out_gray: PathBuf,

    #[arg(long, env = "BMPKIT_OUT_COLOR", default_value = "tests_24bits")]
    out_color: PathBuf,
  },

  /// Interactive text menu.
  Menu,
}

const GRAY_BATCH: [Transform; 10] = [
  Transform::Negative,
  Transform::Brightness(50),
  Transform::Brightness(-50),
  Transform::Threshold(128),
  Transform::Filter(NamedFilter::BoxBlur),
  Transform::Filter(NamedFilter::GaussianBlur),
  Transform::Filter(NamedFilter::Outline),
  Transform::Filter(NamedFilter::Emboss),
  Transform::Filter(NamedFilter::Sharpen),
  Transform::Equalize,
];

const COLOR_BATCH: [Transform; 10] = [
  Transform::Negative,
  Transform::Grayscale,
  Transform::Brightness(50),
  Transform::Brightness(-50),
  Transform::Filter(NamedFilter::BoxBlur),
  Transform::Filter(NamedFilter::GaussianBlur),
  Transform::Filter(NamedFilter::Outline),
  Transform::Filter(NamedFilter::Emboss),
  Transform::Filter(NamedFilter::Sharpen),
  Transform::Equalize,
];

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bmpkit=info")),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let result = match cli.command {
    Command::Info { file } => print_info(&file),
    Command::Apply { input, output, transforms } => apply(&input, &output, &transforms),
    Command::Batch { gray, color, out_gray, out_color } => {
      let failures =
        batch(&gray, &out_gray, &GRAY_BATCH) + batch(&color, &out_color, &COLOR_BATCH);
      if failures == 0 {
        Ok(())
      } else {
        error!(failures, "batch finished with failures");
        std::process::exit(1);
      }
    }
    Command::Menu => menu(),
  };
  if let Err(e) = result {
    error!("{e}");
    std::process::exit(1);
  }
}

fn print_info(file: &Path) -> BmpResult<()> {
  let image = bmpkit::load(file)?;
  println!("{}", image.info());
  Ok(())
}

fn apply(input: &Path, output: &Path, transforms: &[Transform]) -> BmpResult<()> {
  let mut session = Session::new();
  session.open(input)?;
  for &transform in transforms {
    session.apply(transform)?;
  }
  session.save(output)
}

/// Name of the batch output file for a given step, `01_copy.bmp` and so on.
fn batch_file_name(step: usize, transform: Option<Transform>) -> String {
  let label = match transform {
    None => "copy".to_string(),
    Some(Transform::Brightness(v)) if v >= 0 => format!("brightness_plus_{v}"),
    Some(Transform::Brightness(v)) => format!("brightness_minus_{}", v.unsigned_abs()),
    Some(Transform::Threshold(level)) => format!("threshold_{level}"),
    Some(t) => t.to_string().replace('-', "_"),
  };
  format!("{step:02}_{label}.bmp")
}

/// Runs every step from a fresh load of `input`, returning how many failed.
fn batch(input: &Path, out_dir: &Path, transforms: &[Transform]) -> usize {
  if let Err(e) = std::fs::create_dir_all(out_dir) {
    error!(dir = %out_dir.display(), "can't create output directory: {e}");
    return transforms.len() + 1;
  }
  let steps = core::iter::once(None).chain(transforms.iter().copied().map(Some));
  let mut failures = 0;
  for (i, transform) in steps.enumerate() {
    let out = out_dir.join(batch_file_name(i + 1, transform));
    match batch_step(input, transform, &out) {
      Ok(()) => info!(out = %out.display(), "wrote batch output"),
      Err(e) => {
        warn!(input = %input.display(), out = %out.display(), "batch step failed: {e}");
        failures += 1;
      }
    }
  }
  failures
}

fn batch_step(input: &Path, transform: Option<Transform>, out: &Path) -> BmpResult<()> {
  let mut session = Session::new();
  session.open(input)?;
  if let Some(t) = transform {
    session.apply(t)?;
  }
  session.save(out)
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> Option<String> {
  print!("{text}");
  io::stdout().flush().ok()?;
  lines.next()?.ok().map(|s| s.trim().to_string())
}

fn menu() -> BmpResult<()> {
  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();
  let mut session = Session::new();
  loop {
    println!();
    println!("1. Open image");
    println!("2. Save image");
    println!("3. Apply filter");
    println!("4. Show image info");
    println!("5. Quit");
    let Some(choice) = prompt(&mut lines, "> ") else { return Ok(()) };
    let result = match choice.as_str() {
      "1" => match prompt(&mut lines, "file to open: ") {
        Some(path) => session.open(path).map(|info| println!("{info}")),
        None => return Ok(()),
      },
      "2" => match prompt(&mut lines, "file to save: ") {
        Some(path) => session.save(path),
        None => return Ok(()),
      },
      "3" => menu_apply(&mut session, &mut lines),
      "4" => session.info().map(|info| println!("{info}")),
      "5" | "q" | "quit" => return Ok(()),
      other => {
        println!("unknown choice `{other}`");
        Ok(())
      }
    };
    if let Err(e) = result {
      println!("error: {e}");
    }
  }
}

fn menu_apply(
  session: &mut Session, lines: &mut impl Iterator<Item = io::Result<String>>,
) -> BmpResult<()> {
  let depth = session.info()?.bits_per_pixel;
  let choices: Vec<Transform> = [
    Transform::Negative,
    Transform::Grayscale,
    Transform::Brightness(0),
    Transform::Threshold(0),
  ]
  .into_iter()
  .chain(NamedFilter::ALL.into_iter().map(Transform::Filter))
  .chain([Transform::Equalize])
  .filter(|t| t.supports_depth(depth))
  .collect();
  for (i, t) in choices.iter().enumerate() {
    let name = match t {
      Transform::Brightness(_) => "brightness".to_string(),
      Transform::Threshold(_) => "threshold".to_string(),
      t => t.to_string(),
    };
    println!("{}. {name}", i + 1);
  }
  let Some(choice) = prompt(lines, "filter: ") else { return Ok(()) };
  let transform = choice
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .and_then(|n| choices.get(n).copied())
    .ok_or_else(|| BmpError::InvalidParameter(format!("no filter numbered `{choice}`")))?;
  let transform = match transform {
    Transform::Brightness(_) => Transform::Brightness(read_number(lines, "brightness change: ")?),
    Transform::Threshold(_) => Transform::Threshold(read_number(lines, "threshold level: ")?),
    t => t,
  };
  session.apply(transform)?;
  println!("applied {transform}");
  Ok(())
}

fn read_number(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> BmpResult<i32> {
  let s = prompt(lines, text).unwrap_or_default();
  s.parse().map_err(|e| BmpError::InvalidParameter(format!("`{s}` is not a number: {e}")))
}
