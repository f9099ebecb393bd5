//! `signa` - headless text-to-animation and gesture analysis
//!
//! ```text
//! signa translate "good morning" --avatar assets/stacy.json
//! signa analyze --recording session.jsonl --mode video --fps 30
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use signa_anim::{AvatarAsset, PlayerSession};
use signa_client::{InterpretationClient, TranslationClient};
use signa_core::{SignaError, SignaResult};
use signa_gesture::{BlankFrameSource, GestureClassifier, RecordedClassifier};
use signa_runtime::{
    init_tracing, run_analysis, run_translation, AnalysisMode, AnalysisOptions, AnalysisSession,
    Notice, RenderOptions, RuntimeConfig, TranslationDesk,
};

#[derive(Debug, Parser)]
#[command(name = "signa", version, about = "Text-to-sign animation and gesture analysis")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print the final report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate text and play the returned animation on the avatar
    Translate {
        text: String,
        /// Avatar asset JSON
        #[arg(long)]
        avatar: Option<PathBuf>,
        /// Translation service base URL
        #[arg(long)]
        url: Option<String>,
        /// Render tick in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Give up after this many seconds
        #[arg(long, default_value_t = 60)]
        deadline_secs: u64,
    },
    /// Replay recorded classifier output through the gesture pipeline
    Analyze {
        /// JSON-lines recording, one recognition per frame
        #[arg(long)]
        recording: PathBuf,
        #[arg(long, default_value = "video")]
        mode: AnalysisMode,
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Frames to capture; defaults to the recording length
        #[arg(long)]
        frames: Option<u64>,
        #[arg(long)]
        threshold: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    let config = RuntimeConfig::from_env();

    let result = match cli.command {
        Command::Translate {
            text,
            avatar,
            url,
            tick_ms,
            deadline_secs,
        } => {
            let mut config = config;
            if let Some(avatar) = avatar {
                config.avatar = Some(avatar);
            }
            if let Some(url) = url {
                config.translate_url = url;
            }
            if let Some(ms) = tick_ms.filter(|ms| *ms > 0) {
                config.tick_interval = Duration::from_millis(ms);
            }
            translate(&config, text, Duration::from_secs(deadline_secs), cli.json).await
        }
        Command::Analyze {
            recording,
            mode,
            fps,
            frames,
            threshold,
        } => {
            let mut config = config;
            match threshold.map(|t| config.set_confidence_threshold(t)) {
                Some(Err(err)) => Err(err),
                _ => analyze(&config, recording, mode, fps, frames, cli.json).await,
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "signa failed");
            eprintln!("{}", Notice::error(err.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn load_avatar(config: &RuntimeConfig) -> SignaResult<AvatarAsset> {
    match &config.avatar {
        Some(path) => AvatarAsset::load(path)
            .map_err(|e| SignaError::Asset(format!("{}: {e}", path.display()))),
        None => Ok(AvatarAsset::default_humanoid()),
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "Failed to serialize report"),
    }
}

async fn translate(
    config: &RuntimeConfig,
    text: String,
    deadline: Duration,
    json: bool,
) -> SignaResult<()> {
    let asset = load_avatar(config)?;
    let mut session = PlayerSession::new(asset).map_err(|e| SignaError::Asset(e.to_string()))?;
    let client = TranslationClient::with_client(config.http_client()?, &config.translate_url);

    let mut desk = TranslationDesk::new();
    desk.set_input(text);
    let options = RenderOptions {
        tick: config.tick_interval,
        deadline,
    };

    let report = match run_translation(client, &mut desk, &mut session, options).await {
        Ok(report) => report,
        Err(err) => {
            for notice in desk.take_notices() {
                eprintln!("{notice}");
            }
            return Err(err);
        }
    };

    if json {
        print_json(&report);
        return Ok(());
    }
    for notice in &report.notices {
        println!("{notice}");
    }
    if let Some(translation) = &report.translation {
        println!("Sign grammar: {translation}");
    }
    if let Some(expression) = &report.facial_expression {
        println!("Facial expression: {expression}");
    }
    println!(
        "Playback {:?} after {} ticks ({} ms)",
        report.phase, report.ticks, report.elapsed_ms
    );
    for (joint, position) in &report.pose {
        println!(
            "  {joint:<16} [{:.3}, {:.3}, {:.3}]",
            position.x, position.y, position.z
        );
    }
    Ok(())
}

async fn analyze(
    config: &RuntimeConfig,
    recording: PathBuf,
    mode: AnalysisMode,
    fps: u32,
    frames: Option<u64>,
    json: bool,
) -> SignaResult<()> {
    let mut session = AnalysisSession::new(mode, config.confidence_threshold);

    let classifier = match RecordedClassifier::load(&recording) {
        Ok(classifier) => classifier,
        Err(err) => {
            session.set_recognizer_ready(false);
            return Err(SignaError::Asset(format!("{}: {err}", recording.display())));
        }
    };
    session.set_recognizer_ready(classifier.is_ready());
    session.set_video_source(Some(recording.display().to_string()));

    let total = frames.unwrap_or(classifier.len() as u64);
    let source = match mode {
        AnalysisMode::Video => BlankFrameSource::video_file(total, fps),
        AnalysisMode::Live => BlankFrameSource::camera(fps),
    };
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; interpretation requests will likely be rejected");
    }
    let interpreter = InterpretationClient::with_client(
        config.http_client()?,
        &config.interpret_url,
        config.api_key.clone(),
    );
    let options = AnalysisOptions {
        frame_interval: Duration::from_millis(1000 / u64::from(fps.max(1))),
        max_frames: Some(total),
    };

    let report = run_analysis(
        &mut session,
        source,
        Arc::new(Mutex::new(classifier)),
        interpreter,
        options,
    )
    .await?;

    if json {
        print_json(&report);
        return Ok(());
    }
    println!(
        "Frames: {} captured, {} classified, {} dropped",
        report.frames, report.classified, report.dropped
    );
    println!("Batches: {}", report.batches);
    for (i, text) in report.interpretations.iter().enumerate() {
        println!("Interpretation {}: {text}", i + 1);
    }
    for entry in report.log.iter().rev() {
        println!("  {}", entry.message);
    }
    Ok(())
}
