use opencv::core::Rect;
use opencv::highgui;

/// Mouse event as seen by the selection state machine. Produced by the
/// highgui callback and consumed by the loop on its next iteration.
#[derive(Debug, Clone, Copy)]
pub enum SelectionEvent {
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up { x: i32, y: i32 },
}

impl SelectionEvent {
    /// Map a raw highgui mouse event. Events other than left-button
    /// down/up and move are ignored.
    pub fn from_highgui(event: i32, x: i32, y: i32) -> Option<Self> {
        match event {
            highgui::EVENT_LBUTTONDOWN => Some(Self::Down { x, y }),
            highgui::EVENT_MOUSEMOVE => Some(Self::Move { x, y }),
            highgui::EVENT_LBUTTONUP => Some(Self::Up { x, y }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Left button held, box spans anchor to cursor
    Drawing,
    /// Box released with nonzero area, waiting for the loop to pick it up
    Committed,
    /// Box handed to the tracker
    Tracking,
}

/// Box selection state shared between the mouse events and the loop.
/// Single instance owned by the loop, no globals.
#[derive(Debug)]
pub struct Selection {
    phase: Phase,
    /// Anchored at the mouse-down point. Width and height may be
    /// negative while drawing, normalized on release.
    bbox: Rect,
}

impl Selection {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            bbox: Rect::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn handle(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::Down { x, y } => {
                // A new press always starts over, dropping any prior
                // committed or tracked box.
                self.phase = Phase::Drawing;
                self.bbox = Rect::new(x, y, 0, 0);
            }
            SelectionEvent::Move { x, y } => {
                if self.phase == Phase::Drawing {
                    self.bbox.width = x - self.bbox.x;
                    self.bbox.height = y - self.bbox.y;
                }
            }
            SelectionEvent::Up { x, y } => {
                if self.phase != Phase::Drawing {
                    return;
                }
                self.bbox.width = x - self.bbox.x;
                self.bbox.height = y - self.bbox.y;
                self.bbox = normalized(self.bbox);
                // Degenerate boxes are silently dropped.
                if self.bbox.width != 0 && self.bbox.height != 0 {
                    self.phase = Phase::Committed;
                } else {
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    /// Take a committed box, transitioning to Tracking. The caller is
    /// expected to initialize the tracker with it.
    pub fn take_committed(&mut self) -> Option<Rect> {
        if self.phase == Phase::Committed {
            self.phase = Phase::Tracking;
            Some(self.bbox)
        } else {
            None
        }
    }

    /// In-progress rectangle for visual feedback, only while the drag
    /// has a positive span.
    pub fn preview(&self) -> Option<Rect> {
        if self.phase == Phase::Drawing && self.bbox.width > 0 && self.bbox.height > 0 {
            Some(self.bbox)
        } else {
            None
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == Phase::Drawing
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == Phase::Tracking
    }

    /// Back to selection mode, from any phase.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.bbox = Rect::default();
    }
}

/// Flip the origin so width and height come out non-negative.
pub fn normalized(mut rect: Rect) -> Rect {
    if rect.width < 0 {
        rect.x += rect.width;
        rect.width = -rect.width;
    }
    if rect.height < 0 {
        rect.y += rect.height;
        rect.height = -rect.height;
    }
    rect
}
