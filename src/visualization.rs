use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;

const CAPTION: &str = "Esc to quit, r to reset";

fn blue() -> Scalar {
    Scalar::new(255., 0., 0., 0.)
}

fn green() -> Scalar {
    Scalar::new(0., 255., 0., 0.)
}

/// In-progress selection rectangle.
pub fn draw_selection(frame: &mut Mat, bbox: Rect) -> Result<()> {
    imgproc::rectangle(frame, bbox, blue(), 2, imgproc::LINE_8, 0)?;
    Ok(())
}

/// Box reported by the tracker.
pub fn draw_tracked_box(frame: &mut Mat, bbox: Rect) -> Result<()> {
    imgproc::rectangle(frame, bbox, green(), 2, imgproc::LINE_8, 0)?;
    Ok(())
}

pub fn draw_caption(frame: &mut Mat) -> Result<()> {
    imgproc::put_text(
        frame,
        CAPTION,
        Point::new(20, 30),
        imgproc::FONT_HERSHEY_SIMPLEX,
        1.,
        blue(),
        1,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}
