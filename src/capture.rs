use anyhow::{bail, Context as AnyhowContext, Result};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;
use tracing::{info, warn};

use crate::config::Config;
use crate::pinhole::Intrinsics;

/// Fallback focal length for a depth stream whose backend does not
/// report one, roughly a RealSense D435 at 640x480.
const DEFAULT_DEPTH_FOCAL: f64 = 616.;

/// One iteration worth of input. The depth map, when present, is
/// already registered to the color pixel grid by the capture backend.
pub struct CapturedFrame {
    pub color: Mat,
    pub depth: Option<Mat>,
}

pub trait FrameSource {
    /// Next frame, or None once the source is exhausted or the device
    /// stops delivering.
    fn next(&mut self) -> Result<Option<CapturedFrame>>;

    /// Intrinsics of the aligned depth stream, for sources that have one.
    fn intrinsics(&self) -> Option<Intrinsics> {
        None
    }
}

/// Video file or webcam through the default videoio backend.
pub struct VideoSource {
    capture: videoio::VideoCapture,
}

impl VideoSource {
    pub fn from_file(path: &str) -> Result<Self> {
        let capture = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)
            .with_context(|| format!("failed to open video file {}", path))?;
        if !capture.is_opened()? {
            bail!("failed to open video file {}", path);
        }
        info!("opened video file {}", path);
        Ok(Self { capture })
    }

    pub fn from_webcam(index: i32) -> Result<Self> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("failed to open webcam {}", index))?;
        if !capture.is_opened()? {
            bail!("failed to open webcam {}", index);
        }
        info!("opened webcam {}", index);
        Ok(Self { capture })
    }
}

impl FrameSource for VideoSource {
    fn next(&mut self) -> Result<Option<CapturedFrame>> {
        let mut color = Mat::default();
        if !self.capture.read(&mut color)? {
            return Ok(None);
        }
        if color.size()?.width == 0 {
            return Ok(None);
        }
        Ok(Some(CapturedFrame { color, depth: None }))
    }
}

/// RealSense depth camera through videoio's CAP_REALSENSE backend,
/// delivering a color image plus a depth map aligned to it.
pub struct DepthCameraSource {
    capture: videoio::VideoCapture,
    intrinsics: Intrinsics,
}

impl DepthCameraSource {
    pub fn open(config: &Config) -> Result<Self> {
        let mut capture = videoio::VideoCapture::new(0, videoio::CAP_REALSENSE)
            .context("failed to open depth camera")?;
        if !capture.is_opened()? {
            bail!("no depth camera found");
        }
        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.cam_width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.cam_height as f64)?;
        capture.set(videoio::CAP_PROP_FPS, config.cam_rate as f64)?;

        // Queried once at open, the stream profile does not change.
        let intrinsics = Self::query_intrinsics(&capture, config)?;
        info!(
            "opened depth camera {}x{}@{}, fx {:.1} fy {:.1}",
            config.cam_width, config.cam_height, config.cam_rate, intrinsics.fx, intrinsics.fy,
        );
        Ok(Self { capture, intrinsics })
    }

    fn query_intrinsics(capture: &videoio::VideoCapture, config: &Config) -> Result<Intrinsics> {
        let mut fx = capture.get(
            videoio::CAP_INTELPERC_DEPTH_GENERATOR
                + videoio::CAP_PROP_INTELPERC_DEPTH_FOCAL_LENGTH_HORZ,
        )?;
        let mut fy = capture.get(
            videoio::CAP_INTELPERC_DEPTH_GENERATOR
                + videoio::CAP_PROP_INTELPERC_DEPTH_FOCAL_LENGTH_VERT,
        )?;
        if fx <= 0. || fy <= 0. {
            warn!("depth backend reports no focal length, using defaults");
            fx = DEFAULT_DEPTH_FOCAL;
            fy = DEFAULT_DEPTH_FOCAL;
        }
        Ok(Intrinsics {
            fx,
            fy,
            cx: config.cam_width as f64 / 2.,
            cy: config.cam_height as f64 / 2.,
        })
    }
}

impl FrameSource for DepthCameraSource {
    fn next(&mut self) -> Result<Option<CapturedFrame>> {
        if !self.capture.grab()? {
            return Ok(None);
        }
        let mut color = Mat::default();
        let mut depth = Mat::default();
        if !self
            .capture
            .retrieve(&mut color, videoio::CAP_INTELPERC_IMAGE)?
        {
            return Ok(None);
        }
        if !self
            .capture
            .retrieve(&mut depth, videoio::CAP_INTELPERC_DEPTH_MAP)?
        {
            warn!("depth frame missing, continuing with color only");
            return Ok(Some(CapturedFrame { color, depth: None }));
        }
        Ok(Some(CapturedFrame {
            color,
            depth: Some(depth),
        }))
    }

    fn intrinsics(&self) -> Option<Intrinsics> {
        Some(self.intrinsics)
    }
}
