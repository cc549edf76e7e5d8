//! Default colors used when a draw call passes [`EMPTY`].

pub type Color = [f32; 4];

/// Sentinel meaning "use the default color for this shape".
pub const EMPTY: Color = [0.0, 0.0, 0.0, 0.0];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const CHARTREUSE: Color = [0.5, 1.0, 0.0, 1.0];
pub const CRIMSON: Color = [0.86, 0.08, 0.24, 1.0];
pub const DARK_ORANGE: Color = [1.0, 0.55, 0.0, 1.0];
pub const DARK_GREEN: Color = [0.0, 0.39, 0.0, 1.0];
pub const DARK_SALMON: Color = [0.91, 0.59, 0.48, 1.0];
pub const FOREST_GREEN: Color = [0.13, 0.55, 0.13, 1.0];
pub const LIGHT_GREEN: Color = [0.56, 0.93, 0.56, 1.0];
pub const ORANGE_RED: Color = [1.0, 0.27, 0.0, 1.0];
pub const RED_ORANGE: Color = [1.0, 0.33, 0.0, 1.0];
pub const SKY_BLUE: Color = [0.53, 0.81, 0.92, 1.0];

/// Color of the visible-bounds overlay.
pub const DEBUG_BOUNDS: Color = [1.0, 0.55, 0.0, 1.0];
/// Default fill of plane patches.
pub const PLANE: Color = [0.53, 0.81, 0.92, 0.3];
/// Color of the frustum lines.
pub const FRUSTUM: Color = DARK_ORANGE;
pub const AXIS_X: Color = RED;
pub const AXIS_Y: Color = GREEN;
pub const AXIS_Z: Color = BLUE;

/// Returns `color`, or `default` when `color` is [`EMPTY`].
pub fn or_default(color: Color, default: Color) -> Color {
    if color == EMPTY { default } else { color }
}
