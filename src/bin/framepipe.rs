use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framepipe::{
    CaptureController, CaptureEvent, CaptureSettings, EncoderConfig, FixedSizeHost, FrameFormat,
    FrameRate, RecordLength, SharedFrameRate,
};

#[derive(Parser, Debug)]
#[command(name = "framepipe", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Encoder config JSON (binary, output_dir, extra_args, container_ext, loglevel).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the encoder binary resolves and print its version.
    Check,
    /// Record a synthetic test pattern through a capture controller.
    Record(RecordArgs),
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Session name (output file prefix).
    #[arg(long, default_value = "capture")]
    name: String,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Capture frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Recording window length in seconds.
    #[arg(long, default_value_t = 2.0)]
    length: f64,

    /// Render into a dedicated fixed-size target instead of the native surface.
    #[arg(long, default_value_t = false)]
    fixed_resolution: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    framepipe::logging::init_logging(&cli.log_level, cli.json_logs);

    let config = match &cli.config {
        Some(path) => EncoderConfig::from_path(path)
            .with_context(|| format!("load encoder config '{}'", path.display()))?,
        None => EncoderConfig::default(),
    };

    match cli.cmd {
        Command::Check => cmd_check(&config),
        Command::Record(args) => cmd_record(config, args),
    }
}

fn cmd_check(config: &EncoderConfig) -> anyhow::Result<()> {
    let binary = config.resolve_binary()?;
    let version = config.probe_version()?;
    println!("{}", binary.display());
    println!("{version}");
    Ok(())
}

fn cmd_record(config: EncoderConfig, args: RecordArgs) -> anyhow::Result<()> {
    let format = FrameFormat::new(args.width, args.height)?;
    let rate = FrameRate::new(args.fps)?;

    let mut settings = CaptureSettings::new(args.name, rate)
        .with_record_length(RecordLength::from_secs(args.length));
    if args.fixed_resolution {
        settings = settings.with_resolution(format);
    }

    let mut ctl = CaptureController::new(
        Arc::new(config),
        SharedFrameRate::new(),
        settings,
        FixedSizeHost::new(format),
    );
    for event in ctl.enable() {
        if let CaptureEvent::SetupFailed(msg) = event {
            anyhow::bail!("encoder unavailable: {msg}");
        }
    }

    let step = rate.frame_duration();
    let mut delta = Duration::ZERO;
    let mut frame = vec![0u8; format.frame_len()];
    let mut index = 0u64;

    loop {
        let size = ctl.frame_format().unwrap_or(format);
        frame.resize(size.frame_len(), 0);
        draw_test_pattern(&mut frame, size, index);

        for event in ctl.tick(delta, Some(&frame)) {
            match event {
                CaptureEvent::Stopped(report) => {
                    println!("{}", report.path.display());
                    eprintln!("wrote {} frame(s)", report.frames_written);
                    if report.has_diagnostics() {
                        eprintln!("{}", report.diagnostics.trim_end());
                    }
                    if report.failed() {
                        anyhow::bail!("encoder exited with failure status");
                    }
                    return Ok(());
                }
                CaptureEvent::SetupFailed(msg) => anyhow::bail!("capture setup failed: {msg}"),
                CaptureEvent::OpenFailed(msg) => anyhow::bail!("capture could not start: {msg}"),
                _ => {}
            }
        }

        delta = step;
        index += 1;
    }
}

/// Moving diagonal RGB gradient.
fn draw_test_pattern(buf: &mut [u8], format: FrameFormat, index: u64) {
    let shift = (index % 256) as u32;
    for (y, row) in buf.chunks_exact_mut(format.row_len()).enumerate() {
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let (x, y) = (x as u32, y as u32);
            px[0] = ((x * 255 / format.width.max(1)) + shift) as u8;
            px[1] = ((y * 255 / format.height.max(1)) + shift) as u8;
            px[2] = ((x + y + shift) % 256) as u8;
        }
    }
}
