use std::fmt;
use std::path::PathBuf;

pub const OUT_DIR_ENV: &str = "PIXELSPORTS_OUT_DIR";
pub const PER_CATEGORY_ENV: &str = "PIXELSPORTS_PER_CATEGORY";
pub const EVENTS_JSON_ENV: &str = "PIXELSPORTS_EVENTS_JSON";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub per_category: bool,
    /// Local snapshot to read instead of hitting the network.
    pub events_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { out_dir: PathBuf::from("."), per_category: false, events_file: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Settings),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    Unknown(String),
    MissingValue(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::Unknown(arg) => write!(f, "Unknown argument: {arg}"),
            ArgsError::MissingValue(flag) => write!(f, "Missing value for {flag}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl Settings {
    pub fn load() -> Result<Command, ArgsError> {
        Self::from_parts(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Environment first, then command-line flags on top.
    pub fn from_parts<I, E>(args: I, env: E) -> Result<Command, ArgsError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut settings = Settings::default();
        if let Some(dir) = non_empty(OUT_DIR_ENV) {
            settings.out_dir = PathBuf::from(dir);
        }
        settings.per_category = non_empty(PER_CATEGORY_ENV).is_some_and(|v| is_truthy(&v));
        settings.events_file = non_empty(EVENTS_JSON_ENV).map(PathBuf::from);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-V" | "--version" => return Ok(Command::Version),
                "--per-category" => settings.per_category = true,
                "-o" | "--out-dir" => {
                    let dir = args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                    settings.out_dir = PathBuf::from(dir);
                }
                other => return Err(ArgsError::Unknown(other.to_owned())),
            }
        }

        Ok(Command::Run(settings))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn usage_text() -> &'static str {
    "pixelsports - PixelSport live events to M3U playlists

Usage:
  pixelsports [--per-category] [-o <DIR>]
  pixelsports --help
  pixelsports --version

Options:
  --per-category        Also write one TiviMate playlist per league
  -o, --out-dir <DIR>   Directory to write playlists into (default .)

Environment:
  PIXELSPORTS_OUT_DIR        Output directory (overridden by --out-dir)
  PIXELSPORTS_PER_CATEGORY   Set to 1 to enable --per-category
  PIXELSPORTS_EVENTS_JSON    Path to local events JSON snapshot (skips the network)
  RUST_LOG                   Log filter (default info)"
}
