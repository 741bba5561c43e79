use clap::{Parser, error::ErrorKind};
use color_eyre::{Result, eyre::WrapErr};
use pest_nn::{AppPaths, InferenceRunner, canned_predictions};
use serde::Serialize;
use std::{
    io::{self, BufRead, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process::ExitCode,
};

#[cfg(feature = "cuda")]
type Backend = burn::backend::Cuda<f32, i32>;
#[cfg(not(feature = "cuda"))]
type Backend = burn::backend::NdArray<f32>;

const LOG_ENV: &str = "PEST_NN_LOG";

/// Classify a pest image and print the top predictions as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Image to classify. Without it an empty list is printed.
    image_path: Option<PathBuf>,

    /// Number of predictions to return.
    #[arg(short = 'k', long, default_value = "1")]
    topk: NonZeroUsize,

    /// Weights file, overriding PEST_NN_WEIGHTS_PATH.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Read one image path per line from stdin and answer one JSON line each.
    #[arg(long, conflicts_with = "image_path")]
    stdin: bool,
}

#[derive(Serialize)]
struct ErrorReport {
    error: String,
}

fn print_error(message: String) {
    let body = serde_json::to_string(&ErrorReport { error: message })
        .unwrap_or_else(|_| r#"{"error":"unprintable error"}"#.to_string());
    let mut stderr = io::stderr().lock();
    write!(stderr, "{body}").ok();
    stderr.flush().ok();
}

fn init_logging() {
    // stderr is the error channel: stay silent unless asked.
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "off")).init();
}

fn classify_lines(runner: &InferenceRunner<Backend>, topk: NonZeroUsize) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.wrap_err("Failed to read image path from stdin")?;
        let path = line.trim();
        if path.is_empty() {
            continue;
        }
        let answer = match runner.classify(Path::new(path), topk) {
            Ok(predictions) => serde_json::to_string(&predictions)?,
            Err(err) => serde_json::to_string(&ErrorReport {
                error: err.to_string(),
            })?,
        };
        writeln!(stdout, "{answer}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut paths = AppPaths::from_env();
    if let Some(weights) = args.weights {
        paths = paths.with_weights_path(weights);
    }
    let runner = InferenceRunner::<Backend>::new(paths, Default::default());

    if args.stdin {
        return classify_lines(&runner, args.topk);
    }

    let predictions = match args.image_path {
        Some(image_path) => runner
            .classify(&image_path, args.topk)
            .wrap_err_with(|| format!("Prediction failed for {}", image_path.display()))?,
        None if runner.paths().dummy_predict => canned_predictions(),
        None => Vec::new(),
    };

    println!("{}", serde_json::to_string(&predictions)?);
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().ok();
            return ExitCode::SUCCESS;
        }
        // canned mode answers whatever the arguments look like
        Err(_) if AppPaths::from_env().dummy_predict => {
            return match serde_json::to_string(&canned_predictions()) {
                Ok(body) => {
                    println!("{body}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    print_error(err.to_string());
                    ExitCode::FAILURE
                }
            };
        }
        Err(err) => {
            print_error(err.render().to_string().trim().to_string());
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            print_error(format!("{report:#}"));
            ExitCode::FAILURE
        }
    }
}
