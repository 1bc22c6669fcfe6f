//! Marquee selection state machine
//!
//! Drives drawing and repositioning of the single selection rectangle from
//! pointer events. It knows nothing about egui; the overlay feeds it events
//! and reads back the mode, region and cursor hint.

use crate::shared::{Point, Region};

/// Current interaction mode
///
/// Gesture data lives inside its variant, so drawing and dragging at the same
/// time cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectorMode {
    /// Overlay removed, pointer passes through to the desktop
    #[default]
    Idle,
    /// Overlay installed, waiting for the first press
    Armed,
    /// Primary button held after pressing at `anchor`
    Drawing { anchor: Point },
    /// Moving the existing region; `grab_offset` is pointer minus region origin
    Dragging { grab_offset: Point },
}

/// What a press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The floating result panel
    Panel,
    /// Inside the current selection rectangle
    Marquee,
    /// Anywhere else on the overlay
    Surface,
}

/// Cursor to show over the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
    Grab,
}

/// Region selector for one marquee
#[derive(Debug, Clone, Default)]
pub struct RegionSelector {
    mode: SelectorMode,
    region: Option<Region>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectorMode {
        self.mode
    }

    /// The current rectangle, usable or not
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// The current rectangle if it is large enough to extract
    pub fn usable_region(&self) -> Option<Region> {
        self.region.filter(Region::is_usable)
    }

    /// Whether the overlay must swallow pointer input
    pub fn captures_input(&self) -> bool {
        !matches!(self.mode, SelectorMode::Idle)
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match self.mode {
            SelectorMode::Idle => CursorHint::Default,
            SelectorMode::Armed | SelectorMode::Drawing { .. } => CursorHint::Crosshair,
            SelectorMode::Dragging { .. } => CursorHint::Grab,
        }
    }

    /// Arm or disarm drawing. Returns false while a gesture is in progress.
    pub fn toggle_selection(&mut self) -> bool {
        match self.mode {
            SelectorMode::Idle => {
                self.mode = SelectorMode::Armed;
                true
            }
            SelectorMode::Armed => {
                self.mode = SelectorMode::Idle;
                true
            }
            SelectorMode::Drawing { .. } | SelectorMode::Dragging { .. } => false,
        }
    }

    /// Primary button pressed at `pos`
    pub fn pointer_pressed(&mut self, pos: Point, target: PressTarget) {
        match (self.mode, target) {
            (_, PressTarget::Panel) => {}
            (SelectorMode::Armed, _) => {
                self.mode = SelectorMode::Drawing { anchor: pos };
                self.region = Some(Region::from_corners(pos, pos));
            }
            (SelectorMode::Idle, PressTarget::Marquee) => {
                if let Some(region) = self.region {
                    let origin = region.origin();
                    self.mode = SelectorMode::Dragging {
                        grab_offset: Point::new(pos.x - origin.x, pos.y - origin.y),
                    };
                }
            }
            _ => {}
        }
    }

    /// Pointer moved to `pos`. Only has an effect during a gesture.
    pub fn pointer_moved(&mut self, pos: Point) {
        match self.mode {
            SelectorMode::Drawing { anchor } => {
                self.region = Some(Region::from_corners(anchor, pos));
            }
            SelectorMode::Dragging { grab_offset } => {
                if let Some(region) = self.region.as_mut() {
                    region.x = pos.x - grab_offset.x;
                    region.y = pos.y - grab_offset.y;
                }
            }
            SelectorMode::Idle | SelectorMode::Armed => {}
        }
    }

    /// Primary button released at `pos`. Ends any gesture; drawing does not re-arm.
    pub fn pointer_released(&mut self, pos: Point) {
        match self.mode {
            SelectorMode::Drawing { .. } | SelectorMode::Dragging { .. } => {
                self.pointer_moved(pos);
                self.mode = SelectorMode::Idle;
            }
            SelectorMode::Idle | SelectorMode::Armed => {}
        }
    }

    /// Remove the rectangle, in any mode
    pub fn erase(&mut self) {
        self.region = None;
        self.mode = match self.mode {
            SelectorMode::Drawing { .. } => SelectorMode::Armed,
            SelectorMode::Dragging { .. } => SelectorMode::Idle,
            other => other,
        };
    }

    /// Leave selection mode unconditionally
    pub fn exit(&mut self) {
        if let SelectorMode::Drawing { .. } = self.mode {
            self.region = None;
        }
        self.mode = SelectorMode::Idle;
    }
}
