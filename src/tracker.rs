use std::path::Path;

use anyhow::{bail, Context as AnyhowContext, Result};
use opencv::core::{Mat, Ptr, Rect};
use opencv::prelude::*;
use opencv::video::{TrackerMIL, TrackerMIL_Params, TrackerNano, TrackerNano_Params};
use tracing::warn;

use crate::config::{Backend, Config};

/// Capability interface of a single-object tracker. Backends are
/// interchangeable, selected once at startup.
pub trait ObjectTracker {
    /// (Re)initialize on a frame and a user-selected box.
    fn init(&mut self, frame: &Mat, bbox: Rect) -> Result<()>;

    /// Advance by one frame and return the updated box. When the
    /// backend loses the target the last known box is returned.
    fn track(&mut self, frame: &Mat) -> Result<Rect>;

    fn name(&self) -> &'static str;
}

pub fn create_tracker(config: &Config) -> Result<Box<dyn ObjectTracker>> {
    match config.backend {
        Backend::Mil => Ok(Box::new(MilTracker::new()?)),
        Backend::Nano => Ok(Box::new(NanoTracker::new(
            &config.nano_backbone,
            &config.nano_head,
        )?)),
    }
}

pub struct MilTracker {
    inner: Ptr<TrackerMIL>,
    last_bbox: Rect,
}

impl MilTracker {
    pub fn new() -> Result<Self> {
        let params = TrackerMIL_Params::default()?;
        let inner = TrackerMIL::create(params).context("failed to create MIL tracker")?;
        Ok(Self {
            inner,
            last_bbox: Rect::default(),
        })
    }
}

impl ObjectTracker for MilTracker {
    fn init(&mut self, frame: &Mat, bbox: Rect) -> Result<()> {
        self.inner.init(frame, bbox)?;
        self.last_bbox = bbox;
        Ok(())
    }

    fn track(&mut self, frame: &Mat) -> Result<Rect> {
        let mut bbox = self.last_bbox;
        if self.inner.update(frame, &mut bbox)? {
            self.last_bbox = bbox;
        } else {
            warn!("target lost, keeping last box");
        }
        Ok(self.last_bbox)
    }

    fn name(&self) -> &'static str {
        "mil"
    }
}

/// NanoTrack, loaded from a backbone and a head model file.
pub struct NanoTracker {
    inner: Ptr<TrackerNano>,
    last_bbox: Rect,
}

impl NanoTracker {
    pub fn new(backbone: &str, head: &str) -> Result<Self> {
        ensure_model_exists(backbone)?;
        ensure_model_exists(head)?;
        let mut params = TrackerNano_Params::default()?;
        params.set_backbone(backbone);
        params.set_neckhead(head);
        let inner = TrackerNano::create(&params).context("failed to create nano tracker")?;
        Ok(Self {
            inner,
            last_bbox: Rect::default(),
        })
    }
}

impl ObjectTracker for NanoTracker {
    fn init(&mut self, frame: &Mat, bbox: Rect) -> Result<()> {
        self.inner.init(frame, bbox)?;
        self.last_bbox = bbox;
        Ok(())
    }

    fn track(&mut self, frame: &Mat) -> Result<Rect> {
        let mut bbox = self.last_bbox;
        if self.inner.update(frame, &mut bbox)? {
            self.last_bbox = bbox;
        } else {
            warn!("target lost, keeping last box");
        }
        Ok(self.last_bbox)
    }

    fn name(&self) -> &'static str {
        "nano"
    }
}

fn ensure_model_exists(path: &str) -> Result<()> {
    if !Path::new(path).is_file() {
        bail!("tracker model file missing: {}", path);
    }
    Ok(())
}
