use anyhow::{bail, Context as AnyhowContext, Result};
use clap::Parser;

use itrack::capture::{DepthCameraSource, FrameSource, VideoSource};
use itrack::config::{Config, CONFIG};
use itrack::session::Session;
use itrack::tracker::create_tracker;

#[derive(Parser)]
#[clap(about = "Interactive single-object tracking")]
pub struct Args {
    /// Input mode: 0 = video file, 1 = webcam, 2 = depth camera
    pub mode: i32,
    /// Video file path for mode 0, device index for mode 1, unused for mode 2
    pub path: Option<String>,
    #[clap(flatten)]
    pub config: Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _ = CONFIG.set(args.config);
    let config = Config::global();

    // setup logging
    tracing_subscriber::fmt().with_target(false).init();

    let source: Box<dyn FrameSource> = match args.mode {
        0 => {
            let path = args
                .path
                .context("mode 0 needs a video file path, e.g. itrack 0 clip.mp4")?;
            Box::new(VideoSource::from_file(&path)?)
        }
        1 => {
            let path = args
                .path
                .context("mode 1 needs a webcam index, e.g. itrack 1 0")?;
            let index: i32 = path
                .parse()
                .with_context(|| format!("webcam index is not a number: {}", path))?;
            Box::new(VideoSource::from_webcam(index)?)
        }
        2 => Box::new(DepthCameraSource::open(config)?),
        mode => bail!("unknown mode {}: 0 = video file, 1 = webcam, 2 = depth camera", mode),
    };

    let tracker = create_tracker(config)?;

    let mut session = Session::new(source, tracker)?;
    session.run()
}
