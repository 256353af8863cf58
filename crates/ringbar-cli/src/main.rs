//! Ringbar CLI - drive a gauge headlessly and print every frame.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ringbar_core::{RecordingSurface, Surface};
use ringbar_widgets::{GaugeOptions, RingGauge};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Upper bound on delivered frames per run.
const MAX_FRAMES: usize = 100_000;

#[derive(Parser)]
#[command(name = "ringbar")]
#[command(about = "Headless driver for ringbar gauges")]
#[command(version)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug` or `ringbar_widgets=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run value assignments and print each animation frame
    Simulate {
        /// Options file (.json, .yaml, .yml or .toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Initial values, comma separated
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        values: String,

        /// Further value sets, applied in order
        #[arg(short, long, allow_hyphen_values = true)]
        then: Vec<String>,

        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Apply the next value set after this many ms instead of waiting for the transition to settle
        #[arg(long)]
        interrupt_ms: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: FrameFormat,
    },

    /// Print the default options
    Defaults {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OptionsFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FrameFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OptionsFormat {
    Json,
    Yaml,
    Toml,
}

/// One observed state of the gauge.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    time: f64,
    values: Vec<f64>,
    text: String,
    background: String,
}

impl Frame {
    fn capture(surface: &RecordingSurface, gauge: &RingGauge) -> Self {
        Self {
            time: surface.now(),
            values: gauge.values(surface),
            text: gauge.text().to_string(),
            background: surface
                .style_of(gauge.element(), "background")
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "time": self.time,
            "values": self.values,
            "text": self.text,
            "background": self.background,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Simulate {
            config,
            values,
            then,
            fps,
            interrupt_ms,
            format,
        } => {
            let options = match config {
                Some(path) => load_options(&path)?,
                None => GaugeOptions::default(),
            };
            let initial = parse_values(&values)?;
            let steps = then
                .iter()
                .map(|s| parse_values(s))
                .collect::<Result<Vec<_>>>()?;
            let frames = simulate(options, &initial, &steps, fps, interrupt_ms)?;
            print_frames(&frames, format)?;
        }
        Commands::Defaults { format } => {
            println!("{}", render_defaults(format)?);
        }
    }
    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Parse `"10, 20.5,3"` into values. An empty string is an empty set.
fn parse_values(input: &str) -> Result<Vec<f64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .with_context(|| format!("invalid value '{part}'"))
        })
        .collect()
}

fn load_options(path: &Path) -> Result<GaugeOptions> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let options = match extension.as_deref() {
        Some("json") => GaugeOptions::from_json(&content),
        Some("yaml" | "yml") => GaugeOptions::from_yaml(&content),
        Some("toml") => GaugeOptions::from_toml(&content),
        _ => bail!(
            "unsupported config format for {} (expected .json, .yaml, .yml or .toml)",
            path.display()
        ),
    };
    let options = options.with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "options loaded");
    Ok(options)
}

/// Build a gauge, apply each value set in turn and record every frame.
fn simulate(
    options: GaugeOptions,
    initial: &[f64],
    steps: &[Vec<f64>],
    fps: f64,
    interrupt_ms: Option<f64>,
) -> Result<Vec<Frame>> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("fps must be positive, got {fps}");
    }
    let frame_ms = 1000.0 / fps;

    let mut surface = RecordingSurface::new();
    let container = surface.root();
    let mut gauge = RingGauge::new(&mut surface, initial, options);
    gauge.append_to(&mut surface, container);

    let mut frames = vec![Frame::capture(&surface, &gauge)];
    for (i, values) in steps.iter().enumerate() {
        run(&mut surface, &mut gauge, frame_ms, interrupt_ms, &mut frames)?;
        let report = gauge.set_values(&mut surface, values);
        debug!(step = i + 1, ?report, "values assigned");
        frames.push(Frame::capture(&surface, &gauge));
    }
    run(&mut surface, &mut gauge, frame_ms, None, &mut frames)?;
    Ok(frames)
}

/// Deliver frames until the gauge settles, or until `limit_ms` has passed.
fn run(
    surface: &mut RecordingSurface,
    gauge: &mut RingGauge,
    frame_ms: f64,
    limit_ms: Option<f64>,
    frames: &mut Vec<Frame>,
) -> Result<()> {
    let deadline = limit_ms.map(|ms| surface.now() + ms);
    loop {
        if deadline.is_some_and(|d| surface.now() >= d) {
            return Ok(());
        }
        let tokens = surface.take_frames();
        if tokens.is_empty() {
            // Idle but asked to wait: let the clock run to the deadline.
            if let Some(d) = deadline {
                surface.set_now(d);
            }
            return Ok(());
        }
        surface.advance(frame_ms);
        for token in tokens {
            if gauge.on_frame(surface, token) {
                frames.push(Frame::capture(surface, gauge));
            }
        }
        if frames.len() > MAX_FRAMES {
            bail!("simulation exceeded {MAX_FRAMES} frames");
        }
    }
}

fn print_frames(frames: &[Frame], format: FrameFormat) -> Result<()> {
    match format {
        FrameFormat::Text => {
            for frame in frames {
                let values: Vec<String> = frame.values.iter().map(|v| format!("{v:.3}")).collect();
                println!(
                    "{:>9.1}ms  [{}]  {}  {}",
                    frame.time,
                    values.join(", "),
                    frame.text,
                    frame.background
                );
            }
        }
        FrameFormat::Json => {
            let json: Vec<serde_json::Value> = frames.iter().map(Frame::to_json).collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn render_defaults(format: OptionsFormat) -> Result<String> {
    let options = GaugeOptions::default();
    let rendered = match format {
        OptionsFormat::Json => serde_json::to_string_pretty(&options)?,
        OptionsFormat::Yaml => serde_yaml_ng::to_string(&options)?,
        OptionsFormat::Toml => toml::to_string(&options)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("10, 20.5,3").unwrap(), vec![10.0, 20.5, 3.0]);
        assert_eq!(parse_values("  ").unwrap(), Vec::<f64>::new());
        assert_eq!(parse_values("-1").unwrap(), vec![-1.0]);
        assert!(parse_values("1,,2").is_err());
        assert!(parse_values("abc").is_err());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "ringbar", "simulate", "--values", "10,20", "--then", "5", "--then", "", "--fps",
            "30",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                values, then, fps, ..
            } => {
                assert_eq!(values, "10,20");
                assert_eq!(then, vec!["5".to_string(), String::new()]);
                assert_eq!(fps, 30.0);
            }
            Commands::Defaults { .. } => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_simulate_settles_on_last_values() {
        let frames = simulate(
            GaugeOptions::default(),
            &[0.0],
            &[vec![50.0], vec![20.0, 20.0]],
            60.0,
            None,
        )
        .unwrap();
        let first = frames.first().unwrap();
        assert_eq!(first.values, vec![0.0]);
        assert_eq!(first.time, 0.0);

        let last = frames.last().unwrap();
        assert_eq!(last.values, vec![20.0, 20.0]);
        assert_eq!(last.text, "40%");
        assert!(frames.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_simulate_interrupts() {
        let frames = simulate(
            GaugeOptions::default(),
            &[0.0],
            &[vec![100.0], vec![0.0]],
            50.0,
            Some(100.0),
        )
        .unwrap();
        // The second assignment lands while the first is still in flight.
        let peak = frames
            .iter()
            .map(|f| f.values[0])
            .fold(f64::MIN, f64::max);
        assert!(peak > 0.0 && peak < 100.0);
        assert_eq!(frames.last().unwrap().values, vec![0.0]);
    }

    #[test]
    fn test_simulate_rejects_bad_fps() {
        assert!(simulate(GaugeOptions::default(), &[1.0], &[], 0.0, None).is_err());
    }

    #[test]
    fn test_render_defaults_roundtrip() {
        let json = render_defaults(OptionsFormat::Json).unwrap();
        assert_eq!(GaugeOptions::from_json(&json).unwrap(), GaugeOptions::default());

        let yaml = render_defaults(OptionsFormat::Yaml).unwrap();
        assert_eq!(GaugeOptions::from_yaml(&yaml).unwrap().size, 150.0);

        let toml = render_defaults(OptionsFormat::Toml).unwrap();
        assert_eq!(GaugeOptions::from_toml(&toml).unwrap().colors.len(), 6);
    }

    #[test]
    fn test_load_options_rejects_unknown_extension() {
        assert!(load_options(Path::new("gauge.ini")).is_err());
    }
}
