// Differ: side-by-side structural comparison of two text files.
// Wires settings, the editor buffers, the diff view and the terminal renderer.

mod rendering;
mod settings;
mod theme;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use differ_core::{DiffError, Side};
use differ_editor::{DiffView, EditorState};
use differ_engine::{CompareOptions, DetailMode};

use rendering::{ColorMode, TerminalSink};
use settings::DifferSettings;
use theme::DiffTheme;

// ──────────────────────────────────────────────
// Command line
// ──────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "differ", version, about = "Compare two text files side by side")]
struct Args {
    /// Original file (left column).
    #[arg(value_name = "LEFT")]
    left: PathBuf,

    /// Modified file (right column).
    #[arg(value_name = "RIGHT")]
    right: PathBuf,

    /// Minimum similarity (0..=1) for two replaced lines to be paired.
    #[arg(long)]
    cutoff: Option<f64>,

    /// Report replaced blocks without pairing lines or marking characters.
    #[arg(long, conflicts_with = "block_detail")]
    no_detail: bool,

    /// Mark changed characters across whole replaced blocks.
    #[arg(long)]
    block_detail: bool,

    /// Also list the differing blocks as (a0, a1, b0, b1).
    #[arg(long)]
    map: bool,

    /// Width of each column in terminal cells.
    #[arg(long, default_value_t = 60)]
    width: usize,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Always,
    Never,
    Auto,
}

impl ColorChoice {
    fn mode(self) -> ColorMode {
        let ansi = match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        };
        if ansi {
            ColorMode::Ansi
        } else {
            ColorMode::Plain
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Identical,
    Different,
}

impl Outcome {
    /// Follows diff(1): 0 identical, 1 different; 2 is left for errors.
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Identical => ExitCode::SUCCESS,
            Outcome::Different => ExitCode::from(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Diff(#[from] DiffError),
}

// ──────────────────────────────────────────────
// Entry point
// ──────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args, settings::load_settings()) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("differ: {}", e);
            ExitCode::from(2)
        }
    }
}

fn compare_options(args: &Args, settings: &DifferSettings) -> Result<CompareOptions, DiffError> {
    let detail = if args.no_detail {
        DetailMode::None
    } else if args.block_detail {
        DetailMode::Block
    } else {
        settings.detail
    };
    CompareOptions::default()
        .with_detail_mode(detail)
        .with_cutoff(args.cutoff.unwrap_or(settings.cutoff))
}

fn open(path: &Path) -> Result<EditorState, AppError> {
    EditorState::open(path).map_err(|source| AppError::Read { path: path.to_path_buf(), source })
}

fn run(args: &Args, settings: DifferSettings) -> Result<Outcome, AppError> {
    let options = compare_options(args, &settings)?;
    let theme = DiffTheme::from_settings(&settings.colors);
    let sink = TerminalSink::new(theme, args.color.mode());

    let mut view = DiffView::new(open(&args.left)?, open(&args.right)?, sink, options);
    view.refresh()?;

    if view.difference_map().is_empty() {
        println!("The two files are identical.");
        return Ok(Outcome::Identical);
    }

    let session = view.session();
    println!(
        "{:<w$}   {}",
        view.editor(Side::A).file_display_name(),
        view.editor(Side::B).file_display_name(),
        w = args.width + number_width(session.sequence(Side::A).len(), session.sequence(Side::B).len()) + 3
    );
    print!(
        "{}",
        view.sink().render(session.sequence(Side::A), session.sequence(Side::B), args.width)
    );

    if args.map {
        println!();
        for block in view.difference_map() {
            println!("{}", block);
        }
    }
    log::info!("{} blocks, {} events", view.difference_map().len(), view.sink().event_count());
    Ok(Outcome::Different)
}

fn number_width(a_len: usize, b_len: usize) -> usize {
    a_len.max(b_len).max(1).to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["differ", "left.txt", "right.txt"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_override_settings() {
        let settings = DifferSettings { cutoff: 0.5, detail: DetailMode::Block, ..Default::default() };

        let opts = compare_options(&args(&[]), &settings).unwrap();
        assert_eq!((opts.detail, opts.cutoff()), (DetailMode::Block, 0.5));

        let opts = compare_options(&args(&["--no-detail", "--cutoff", "0.9"]), &settings).unwrap();
        assert_eq!((opts.detail, opts.cutoff()), (DetailMode::None, 0.9));
    }

    #[test]
    fn out_of_range_cutoff_is_rejected() {
        let err = compare_options(&args(&["--cutoff", "1.5"]), &DifferSettings::default()).unwrap_err();
        assert_eq!(err, DiffError::InvalidCutoff(1.5));
    }

    #[test]
    fn detail_flags_conflict() {
        let res = Args::try_parse_from(["differ", "a", "b", "--no-detail", "--block-detail"]);
        assert!(res.is_err());
    }

    #[test]
    fn identical_and_different_files() {
        let dir = tempfile::tempdir().unwrap();
        let left = dir.path().join("left.txt");
        let right = dir.path().join("right.txt");
        std::fs::write(&left, "a\nb\n").unwrap();
        std::fs::write(&right, "a\nb\n").unwrap();

        let mut a = args(&["--color", "never"]);
        a.left = left.clone();
        a.right = right.clone();
        assert_eq!(run(&a, DifferSettings::default()).unwrap(), Outcome::Identical);

        std::fs::write(&right, "a\nc\n").unwrap();
        assert_eq!(run(&a, DifferSettings::default()).unwrap(), Outcome::Different);

        a.right = dir.path().join("missing.txt");
        assert!(matches!(run(&a, DifferSettings::default()), Err(AppError::Read { .. })));
    }
}
