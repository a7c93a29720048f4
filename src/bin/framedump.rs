use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use framedump::{
    ExtractOptions, ExtractionJob, ExtractionPlan, FfmpegLogLevel, FrameDirectory,
    ProgressCallback, ProgressInfo, VideoFile, VideoMetadata, extract_frames,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framedump input.mp4 frames\n  framedump input.mp4 frames --skip 5 --offset 120\n  framedump input.mp4 frames --end-frame 1000 --json\n  framedump --completions zsh > _framedump";

#[derive(Debug, Parser)]
#[command(
    name = "framedump",
    version,
    about = "Dump every Nth video frame to numbered PNG images plus a timestamped manifest",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path to the input video.
    #[arg(required_unless_present = "completions")]
    video_path: Option<PathBuf>,

    /// Output directory for frames and the manifest (created if missing,
    /// including parents).
    #[arg(required_unless_present = "completions")]
    save_dir: Option<PathBuf>,

    /// Export every Nth frame.
    #[arg(long, default_value_t = 10)]
    skip: u64,

    /// Stop once this logical frame index is reached (-1 = unlimited).
    #[arg(long, alias = "end_frame", default_value_t = -1, allow_negative_numbers = true)]
    end_frame: i64,

    /// Number of leading frames to discard before extraction begins.
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Print the startup metadata block as machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate shell completion scripts and exit.
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

/// Map the CLI's `-1 = unlimited` sentinel to an optional end frame.
fn parse_end_frame(value: i64) -> Option<u64> {
    if value < 0 { None } else { Some(value as u64) }
}

/// Bridges [`ProgressCallback`] to an indicatif progress bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.current);
    }
}

fn print_metadata(metadata: &VideoMetadata, plan: &ExtractionPlan, json_output: bool) {
    if json_output {
        let payload = json!({
            "width": metadata.width,
            "height": metadata.height,
            "fps": metadata.frames_per_second,
            "frame_count": metadata.frame_count,
            "codec": metadata.codec,
            "container": metadata.container,
            "duration_seconds": metadata.duration.as_secs_f64(),
            "skip": plan.skip,
            "offset": plan.offset,
            "end_frame": plan.end_frame,
            "frames_to_extract": plan.frames_to_extract,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{text}"),
            Err(error) => eprintln!("error: failed to serialize metadata: {error}"),
        }
    } else {
        println!(
            "Video: {}x{} @ {:.2} fps [{}]",
            metadata.width, metadata.height, metadata.frames_per_second, metadata.codec,
        );
        println!(
            "Frames: {} ({}, {:.2}s)",
            metadata.frame_count,
            metadata.container,
            metadata.duration.as_secs_f64(),
        );
        println!(
            "Extracting from frame {} with skip {}: {} frame(s) to export.",
            plan.offset, plan.skip, plan.frames_to_extract,
        );
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "framedump", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        framedump::set_ffmpeg_log_level(parsed);
    }

    let video_path = cli.video_path.ok_or("missing video path")?;
    let save_dir = cli.save_dir.ok_or("missing output directory")?;

    let mut video = VideoFile::open(&video_path)?;
    let metadata = video.metadata().clone();

    // Validate before anything is written to disk.
    let plan = ExtractionJob::new()
        .with_skip(cli.skip)
        .with_end_frame(parse_end_frame(cli.end_frame))
        .with_offset(cli.offset)
        .plan(metadata.frame_count)?;

    print_metadata(&metadata, &plan, cli.json);

    let progress_bar = ProgressBar::new(plan.frames_to_extract);
    let style =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    progress_bar.set_style(style.progress_chars("##-"));

    let options = ExtractOptions::new().with_progress(Arc::new(TerminalProgress {
        bar: progress_bar.clone(),
    }));

    let mut sink = FrameDirectory::create(&save_dir)?;
    let mut stream = video.frames()?;
    let summary = extract_frames(&mut stream, &mut sink, &plan, &options)?;

    progress_bar.finish_with_message("done");

    if summary.frames_exported < plan.frames_to_extract {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "stream ended early; {} of {} planned frame(s) exported",
                summary.frames_exported, plan.frames_to_extract,
            )
            .yellow()
        );
    }

    println!(
        "{} {}",
        "success:".green().bold(),
        format!(
            "Extracted {} frame(s) to {}",
            summary.frames_exported,
            save_dir.display()
        )
        .green()
    );

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_end_frame, parse_log_level};

    #[test]
    fn end_frame_sentinel() {
        assert_eq!(parse_end_frame(-1), None);
        assert_eq!(parse_end_frame(-42), None);
        assert_eq!(parse_end_frame(0), Some(0));
        assert_eq!(parse_end_frame(1000), Some(1000));
    }

    #[test]
    fn log_level_aliases() {
        assert!(parse_log_level("quiet").is_some());
        assert!(parse_log_level("WARN").is_some());
        assert!(parse_log_level("warning").is_some());
        assert!(parse_log_level("trace").is_some());
        assert!(parse_log_level("loud").is_none());
    }
}
