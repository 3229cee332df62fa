use anyhow::{Context, Result, bail};
use folio_config::Config;
use folio_engine::{io, segment_content, split_str_in_blocks};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "Usage:
  folio pages <file-or-glob>... [--out DIR]
  folio blocks <file> [--start N] [--in-place]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pages {
        inputs: Vec<String>,
        out: Option<PathBuf>,
    },
    Blocks {
        file: PathBuf,
        start: usize,
        in_place: bool,
    },
}

fn parse_args(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command");
    };
    match command.as_str() {
        "pages" => {
            let mut inputs = Vec::new();
            let mut out = None;
            let mut rest = rest.iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--out" => {
                        let dir = rest.next().context("--out needs a directory")?;
                        out = Some(PathBuf::from(dir));
                    }
                    _ => inputs.push(arg.clone()),
                }
            }
            if inputs.is_empty() {
                bail!("pages needs at least one file");
            }
            Ok(Command::Pages { inputs, out })
        }
        "blocks" => {
            let mut file = None;
            let mut start = 0;
            let mut in_place = false;
            let mut rest = rest.iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--start" => {
                        let n = rest.next().context("--start needs a number")?;
                        start = n
                            .parse()
                            .with_context(|| format!("invalid start index {n:?}"))?;
                    }
                    "--in-place" => in_place = true,
                    _ if file.is_none() => file = Some(PathBuf::from(arg)),
                    _ => bail!("unexpected argument {arg:?}"),
                }
            }
            let file = file.context("blocks needs a file")?;
            Ok(Command::Blocks {
                file,
                start,
                in_place,
            })
        }
        other => bail!("unknown command {other:?}"),
    }
}

/// Expands glob patterns; a pattern without matches is kept as a plain path
/// so the read reports it as missing.
fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let matches: Vec<PathBuf> = glob::glob(input)
            .with_context(|| format!("invalid pattern {input:?}"))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("skipping unreadable path: {e}");
                    None
                }
            })
            .collect();
        if matches.is_empty() {
            paths.push(PathBuf::from(input));
        } else {
            paths.extend(matches);
        }
    }
    Ok(paths)
}

fn run_pages(config: &Config, inputs: &[String], out: Option<PathBuf>) -> Result<()> {
    let segmentation = config.segmentation_config();
    let language = config.language_config()?;

    for path in expand_inputs(inputs)? {
        let content = io::read_file(&path)?;
        let source = io::source_name(&path);
        let result = segment_content(&content, &source, &segmentation, &language);

        if result.too_short_to_split || !result.is_splittable() {
            println!("{}: too short to split", path.display());
            continue;
        }

        let dir = out
            .clone()
            .or_else(|| config.output_dir.clone())
            .or_else(|| path.parent().map(PathBuf::from))
            .unwrap_or_default();
        let written = io::write_pages(&dir, &source, &result)
            .with_context(|| format!("writing pages of {}", path.display()))?;
        log::info!("{}: {} pages", path.display(), written.len());
        for page in written {
            println!("{}", page.display());
        }
    }
    Ok(())
}

fn run_blocks(config: &Config, file: &Path, start: usize, in_place: bool) -> Result<()> {
    let markers = config.block_marker_config()?;
    let content = io::read_file(file)?;
    let split = split_str_in_blocks(&content, start, &markers);
    log::info!("{}: {} blocks", file.display(), split.block_count);

    if in_place {
        io::write_file(file, &format!("{}\n", split.marked_text))?;
    } else {
        println!("{}", split.marked_text);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::debug!(
                "no config file at {}, using defaults",
                Config::config_path().display()
            );
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    config.validate()?;

    match command {
        Command::Pages { inputs, out } => run_pages(&config, &inputs, out),
        Command::Blocks {
            file,
            start,
            in_place,
        } => run_blocks(&config, &file, start, in_place),
    }
}
