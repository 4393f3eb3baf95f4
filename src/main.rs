// src/main.rs
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use image::{DynamicImage, RgbaImage};

use gesture_intent::audio::SimAudioEndpoint;
use gesture_intent::detector::{IdleSource, LandmarkSource, ScriptedSource};
use gesture_intent::engine::GestureEngine;
use gesture_intent::landmarks::FrameSize;
use gesture_intent::overlay;
use gesture_intent::session::{default_output_dir, SessionLog};

struct Options {
    frames: u32,
    idle: bool,
    realtime: bool,
    output_dir: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frames: 300,
            idle: false,
            realtime: false,
            output_dir: default_output_dir(),
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    if let Ok(p) = std::env::current_exe() {
        eprintln!("Running from: {}", p.display());
    }

    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: gesture_intent [--frames N] [--idle] [--realtime] [--out DIR]");
            return;
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error running session: {:?}", e);
    }
}

fn parse_args() -> Result<Options> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().ok_or_else(|| anyhow::anyhow!("--frames needs a value"))?;
                options.frames = value.parse()?;
            }
            "--idle" => options.idle = true,
            "--realtime" => options.realtime = true,
            "--out" => {
                let value = args.next().ok_or_else(|| anyhow::anyhow!("--out needs a value"))?;
                options.output_dir = PathBuf::from(value);
            }
            other => return Err(anyhow::anyhow!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn run(options: Options) -> Result<()> {
    let frame_size = FrameSize::VGA;

    // The scripted source stands in for a camera + landmark model; --idle
    // exercises the degraded mode where no detector could be brought up.
    let mut source: Box<dyn LandmarkSource> = if options.idle {
        eprintln!("No landmark detector: running degraded, every frame reports Listening...");
        Box::new(IdleSource)
    } else {
        Box::new(ScriptedSource::new(frame_size))
    };

    let mut engine = GestureEngine::new(Some(Box::new(SimAudioEndpoint::new())));
    let mut log = SessionLog::new(&options.output_dir, None);

    let frame = DynamicImage::new_rgba8(frame_size.width, frame_size.height);
    let mut canvas = RgbaImage::new(frame_size.width, frame_size.height);
    let start = Instant::now();

    for n in 0..options.frames {
        let hand = match source.detect(&frame) {
            Ok(hand) => hand,
            Err(e) => {
                // A failed detector is a degraded frame, not a dead session.
                tracing::warn!("landmark detection failed: {}", e);
                None
            }
        };

        let output = engine.process(hand.as_ref(), frame_size);
        log.add_frame(n, start.elapsed().as_secs_f64(), &output);

        canvas = RgbaImage::new(frame_size.width, frame_size.height);
        overlay::annotate(&mut canvas, hand.as_ref(), &output);

        if options.realtime {
            std::thread::sleep(Duration::from_millis(33));
        }
    }

    let session_dir = log.session_dir();
    let frames_csv = log.export_frames()?;
    let transitions_csv = log.export_transitions()?;
    let status_json = log.write_status(&engine.status())?;
    let overlay_png = session_dir.join("last_frame.png");
    canvas.save(&overlay_png)?;

    println!("Session complete: {} frames, {} intent transitions", log.frame_count(), log.transition_count());
    println!("  frames:      {}", frames_csv.display());
    println!("  transitions: {}", transitions_csv.display());
    println!("  status:      {}", status_json.display());
    println!("  overlay:     {}", overlay_png.display());
    println!("Final intent: {}", engine.current_intent());

    Ok(())
}
