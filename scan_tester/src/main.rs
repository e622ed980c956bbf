use anyhow::Context;
use clap::Parser;
use cube_scan::pipeline::FaceSummary;
use cube_scan::{
    DebugSink, FrameOutcome, OverlayRenderer, PixelBuffer, ScanConfig, ScanPipeline,
    ValidationResult,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Feeds still frames through a scan session and reports the assembled cube.
#[derive(Parser, Debug)]
#[command(name = "scan_tester", version)]
struct Args {
    /// Frame images, processed in the order given
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// JSON scanner config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for one annotated PNG per frame
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FrameLine {
    path: PathBuf,
    outcome: &'static str,
    face: Option<char>,
    colors: Option<String>,
}

#[derive(Serialize)]
struct Report {
    frames: Vec<FrameLine>,
    faces: Vec<FaceSummary>,
    state: Option<String>,
    validation: ValidationResult,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(dir) = &args.overlay_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating overlay dir {}", dir.display()))?;
    }

    let sample_radius = config.sample_radius;
    let mut pipeline = ScanPipeline::new(config)?;
    let mut lines = Vec::with_capacity(args.frames.len());

    for (index, path) in args.frames.iter().enumerate() {
        let image = image::open(path)
            .with_context(|| format!("reading frame {}", path.display()))?
            .to_rgba8();
        let buffer = PixelBuffer::try_from(&image)?;
        let outcome = pipeline.process_frame(&buffer)?;

        let (region, classifications) = match &outcome {
            FrameOutcome::NoDetection => (None, None),
            FrameOutcome::Unidentified {
                region,
                classifications,
            } => (Some(region), Some(classifications)),
            FrameOutcome::FaceObserved(report) => {
                (Some(&report.region), Some(&report.classifications))
            }
        };

        if let (Some(dir), Some(region), Some(classifications)) =
            (&args.overlay_dir, region, classifications)
        {
            let mut overlay =
                OverlayRenderer::over_frame(image.clone()).with_sample_radius(sample_radius);
            overlay.draw(region, classifications);
            let target = dir.join(format!("frame_{index:04}.png"));
            overlay
                .save_png(&target)
                .with_context(|| format!("writing overlay {}", target.display()))?;
        }

        lines.push(frame_line(path, &outcome));
    }

    let snapshot = pipeline.snapshot();
    let report = Report {
        frames: lines,
        faces: snapshot.faces,
        state: pipeline.state_string().map(|state| state.to_string()),
        validation: pipeline.validate(),
    };
    tracing::info!(
        complete = report.state.is_some(),
        valid = report.validation.valid,
        errors = report.validation.errors.len(),
        warnings = report.validation.warnings.len(),
        "scan finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn frame_line(path: &Path, outcome: &FrameOutcome) -> FrameLine {
    let line = match outcome {
        FrameOutcome::NoDetection => FrameLine {
            path: path.to_path_buf(),
            outcome: "no_detection",
            face: None,
            colors: None,
        },
        FrameOutcome::Unidentified {
            classifications, ..
        } => FrameLine {
            path: path.to_path_buf(),
            outcome: "unidentified",
            face: None,
            colors: Some(classifications.iter().map(|c| c.color.letter()).collect()),
        },
        FrameOutcome::FaceObserved(report) => FrameLine {
            path: path.to_path_buf(),
            outcome: "observed",
            face: Some(report.label.letter()),
            colors: Some(report.observation.letters()),
        },
    };
    tracing::info!(
        frame = %path.display(),
        outcome = line.outcome,
        face = ?line.face,
        colors = line.colors.as_deref().unwrap_or(""),
        "frame processed"
    );
    line
}

fn print_text(report: &Report) {
    for line in &report.frames {
        let face = line.face.map(String::from).unwrap_or_else(|| "-".into());
        let colors = line.colors.as_deref().unwrap_or("");
        println!(
            "{:<40} {:<13} {} {}",
            line.path.display(),
            line.outcome,
            face,
            colors
        );
    }
    println!();

    for face in &report.faces {
        match &face.colors {
            Some(colors) => println!(
                "{}: {} (confidence {:.2}, {} frames)",
                face.label, colors, face.confidence, face.frames
            ),
            None => println!("{}: not scanned", face.label),
        }
    }

    match &report.state {
        Some(state) => println!("\nState: {state}"),
        None => println!("\nState: incomplete"),
    }
    println!("Valid: {}", report.validation.valid);
    for error in &report.validation.errors {
        println!("  error: {error}");
    }
    for warning in &report.validation.warnings {
        println!("  warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_scan::{Classification, FaceletColor, Region};

    #[test]
    fn empty_frame_line() {
        let line = frame_line(Path::new("a.png"), &FrameOutcome::NoDetection);
        assert_eq!(line.outcome, "no_detection");
        assert_eq!(line.face, None);
        assert_eq!(line.colors, None);
    }

    #[test]
    fn unidentified_frame_line_lists_colors() {
        let classification = Classification {
            color: FaceletColor::Red,
            confidence: 0.85,
        };
        let outcome = FrameOutcome::Unidentified {
            region: Region {
                x: 0.0,
                y: 0.0,
                width: 30.0,
                height: 30.0,
                confidence: 0.7,
            },
            classifications: [classification; 9],
        };
        let line = frame_line(Path::new("b.png"), &outcome);
        assert_eq!(line.outcome, "unidentified");
        assert_eq!(line.colors.as_deref(), Some("RRRRRRRRR"));
    }
}
