use std::path::PathBuf;

use backdrop::gpu::GpuPower;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "backdropctl",
    author,
    version,
    about = "Drive overlay backdrop transitions from the command line"
)]
pub struct Cli {
    /// Settings file; defaults to `settings.toml` in the config directory.
    #[arg(long, global = true, value_name = "FILE", env = "BACKDROP_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an overlay transition over a sequence of frames and print the state.
    Simulate(SimulateArgs),
    /// Step the focus volume duck through a focus pattern.
    Audio(AudioArgs),
    /// Composite one overlay frame offscreen and write it as PNG.
    Render(RenderArgs),
    /// Validate the settings file and print the effective values.
    Check,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Overlay type tag to open at frame 0 (e.g. `PauseMenu`).
    #[arg(long, value_name = "TAG")]
    pub overlay: String,

    /// Number of frames to run.
    #[arg(long, default_value_t = 16)]
    pub frames: u32,

    /// Host frame interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    pub frame_ms: u32,

    /// Close the overlay at this frame index.
    #[arg(long, value_name = "FRAME")]
    pub close_at: Option<u32>,

    /// Print one JSON object per frame.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Focus per host tick: `a` active, `i` inactive, `m` minimized.
    #[arg(long, value_name = "PATTERN", value_parser = parse_focus_pattern)]
    pub pattern: FocusPattern,

    /// User volume of the ducked channel before attenuation.
    #[arg(long, value_name = "VOLUME", default_value_t = 1.0)]
    pub channel_volume: f32,

    /// Print one JSON object per tick.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Overlay type tag to open; omit to render the bare scene.
    #[arg(long, value_name = "TAG")]
    pub overlay: Option<String>,

    /// Milliseconds since the fade began.
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub elapsed: i64,

    /// Output size (e.g. `640x360`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "640x360")]
    pub size: (u32, u32),

    /// Scene image drawn beneath the overlay; a checkerboard when omitted.
    #[arg(long, value_name = "IMAGE", conflicts_with = "no_scene")]
    pub scene: Option<PathBuf>,

    /// Render as if no scene were loaded.
    #[arg(long)]
    pub no_scene: bool,

    /// Host ambient blur amount applied before the overlay.
    #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
    pub ambient: u32,

    /// Render without the blur post chain.
    #[arg(long)]
    pub no_chain: bool,

    /// GPU power preference.
    #[arg(long, value_enum, default_value_t = PowerArg::Low)]
    pub gpu_power: PowerArg,

    /// Destination PNG path.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    Low,
    High,
}

impl From<PowerArg> for GpuPower {
    fn from(value: PowerArg) -> Self {
        match value {
            PowerArg::Low => GpuPower::Low,
            PowerArg::High => GpuPower::High,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Active,
    Inactive,
    Minimized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusPattern(pub Vec<Focus>);

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_focus_pattern(value: &str) -> Result<FocusPattern, String> {
    let steps = value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .map(|ch| match ch.to_ascii_lowercase() {
            'a' => Ok(Focus::Active),
            'i' => Ok(Focus::Inactive),
            'm' => Ok(Focus::Minimized),
            other => Err(format!(
                "unknown focus '{other}'; expected a (active), i (inactive), or m (minimized)"
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if steps.is_empty() {
        return Err("focus pattern must not be empty".to_string());
    }
    Ok(FocusPattern(steps))
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("size must be greater than zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_focus_patterns() {
        assert_eq!(
            parse_focus_pattern("a, i m").unwrap(),
            FocusPattern(vec![Focus::Active, Focus::Inactive, Focus::Minimized])
        );
        assert_eq!(
            parse_focus_pattern("III").unwrap().0,
            vec![Focus::Inactive; 3]
        );
        assert!(parse_focus_pattern("").is_err());
        assert!(parse_focus_pattern("ax").is_err());
    }

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("640x360").unwrap(), (640, 360));
        assert_eq!(parse_size(" 8X4 ").unwrap(), (8, 4));
        assert!(parse_size("0x4").is_err());
        assert!(parse_size("640").is_err());
        assert!(parse_size("wide x 4").is_err());
    }

    #[test]
    fn settings_flag_is_global() {
        let cli =
            Cli::try_parse_from(["backdropctl", "check", "--settings", "/tmp/s.toml"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.toml")));
        assert!(matches!(cli.command, Command::Check));
    }
}
