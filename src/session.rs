use std::time::Instant;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use opencv::core::{Mat, Rect};
use opencv::highgui;
use tracing::{info, warn};

use crate::capture::{CapturedFrame, FrameSource};
use crate::config::Config;
use crate::my_types::*;
use crate::pinhole::{self, Intrinsics};
use crate::selection::{Selection, SelectionEvent};
use crate::tracker::ObjectTracker;
use crate::visualization;

const WINDOW_NAME: &str = "Track";

const KEY_ESC: i32 = 27;
const KEY_RESET: i32 = 114; // 'r'

/// Display window plus its mouse callback. Dropping it tears the
/// window down, so every exit path releases it.
struct DisplayWindow;

impl DisplayWindow {
    fn open(events: Sender<SelectionEvent>) -> Result<Self> {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
        highgui::set_mouse_callback(
            WINDOW_NAME,
            Some(Box::new(move |event, x, y, _flags| {
                if let Some(event) = SelectionEvent::from_highgui(event, x, y) {
                    // The loop end may already be gone during shutdown.
                    let _ = events.send(event);
                }
            })),
        )?;
        Ok(Self)
    }

    fn present(&self, frame: &Mat) -> Result<()> {
        highgui::imshow(WINDOW_NAME, frame)?;
        Ok(())
    }

    /// Poll for a key, blocking at most `timeout_ms`. The mouse
    /// callback runs inside this call, so event handling stays
    /// cooperative and single threaded.
    fn poll_key(&self, timeout_ms: i32) -> Result<i32> {
        Ok(highgui::wait_key(timeout_ms)?)
    }
}

impl Drop for DisplayWindow {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}

/// The interactive capture/select/track/display loop.
pub struct Session {
    source: Box<dyn FrameSource>,
    tracker: Box<dyn ObjectTracker>,
    selection: Selection,
    events: Receiver<SelectionEvent>,
    window: DisplayWindow,
    intrinsics: Option<Intrinsics>,
}

impl Session {
    pub fn new(source: Box<dyn FrameSource>, tracker: Box<dyn ObjectTracker>) -> Result<Self> {
        let (event_tx, event_rx) = unbounded();
        let window = DisplayWindow::open(event_tx)?;
        let intrinsics = source.intrinsics();
        Ok(Self {
            source,
            tracker,
            selection: Selection::new(),
            events: event_rx,
            window,
            intrinsics,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let config = Config::global();
        info!("tracking with the {} backend", self.tracker.name());

        loop {
            let mut frame = match self.source.next()? {
                Some(frame) => frame,
                None => {
                    // Source exhausted, terminal but not an error.
                    warn!("read failed, no more frames");
                    break;
                }
            };

            for event in self.events.try_iter() {
                self.selection.handle(event);
            }

            if let Some(bbox) = self.selection.take_committed() {
                self.tracker.init(&frame.color, bbox)?;
                info!("tracker initialized on {:?}", bbox);
            } else if self.selection.is_tracking() {
                let start = Instant::now();
                let bbox = self.tracker.track(&frame.color)?;
                let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
                info!("inference time {:.2} ms", elapsed_ms);
                visualization::draw_tracked_box(&mut frame.color, bbox)?;
                self.report_position(&frame, bbox)?;
            } else if let Some(bbox) = self.selection.preview() {
                visualization::draw_selection(&mut frame.color, bbox)?;
            }

            visualization::draw_caption(&mut frame.color)?;
            self.window.present(&frame.color)?;

            let key = self.window.poll_key(config.poll_ms)?;
            if key == KEY_ESC {
                break;
            }
            if key == KEY_RESET {
                self.selection.reset();
            }
        }

        Ok(())
    }

    /// Project the box center into camera space when depth is available.
    fn report_position(&self, frame: &CapturedFrame, bbox: Rect) -> Result<()> {
        let (Some(depth_map), Some(intrinsics)) = (frame.depth.as_ref(), self.intrinsics) else {
            return Ok(());
        };
        let center_x = bbox.x + bbox.width / 2;
        let center_y = bbox.y + bbox.height / 2;
        let depth = pinhole::depth_at(depth_map, center_x, center_y)?;
        let point = intrinsics.deproject(Vector2d::new(center_x as f64, center_y as f64), depth);
        info!(
            "target at X {:.3} Y {:.3} Z {:.3} m",
            point[0], point[1], point[2]
        );
        Ok(())
    }
}
