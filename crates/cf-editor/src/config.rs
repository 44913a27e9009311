//! Editor configuration.

use cf_core::model::{Point, Size};

/// Tunables for a [`CanvasStore`](crate::store::CanvasStore).
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum undo depth. Default: **100**.
    pub history_depth: usize,

    /// Shift applied to pasted nodes. Default: **(50, 50)**.
    pub paste_offset: Point,

    /// Stacking order for new group containers, so they render beneath
    /// their children. Default: **-1**.
    pub group_z_index: i32,

    /// Initial size of new group containers. Default: **400 × 300**.
    pub group_size: Size,

    /// Initial size of new image nodes. Default: **200 × 200**.
    pub image_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            paste_offset: Point::new(50.0, 50.0),
            group_z_index: -1,
            group_size: Size::new(400.0, 300.0),
            image_size: Size::new(200.0, 200.0),
        }
    }
}
