//! Shared crate-wide constants.

use std::time::Duration;

/// Distance (in cells, on either axis) the pointer must travel after a
/// header press before the panel detaches and starts floating.
pub const DRAG_THRESHOLD: i32 = 3;

/// Two clicks on the same node within this window count as a double-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// How long the easing marker stays on the panel after a placement reset.
pub const RESET_EASING: Duration = Duration::from_millis(250);

/// Stacking level applied to the panel once it has been dragged.
pub const FLOATING_Z_INDEX: i32 = 9999;

/// Intrinsic panel height when no explicit height is set.
pub const PANEL_DEFAULT_HEIGHT: u16 = 14;

/// Smallest size the resize affordance will shrink the panel to.
pub const PANEL_MIN_WIDTH: u16 = 24;
pub const PANEL_MIN_HEIGHT: u16 = 5;

/// Default panel margins (`my-1 mx-2`), restored on placement reset.
pub const PANEL_MARGIN_TOP: u16 = 1;
pub const PANEL_MARGIN_LEFT: u16 = 2;

/// Text shown before the input field.
pub const PROMPT: &str = "User> ";

/// Marker class carried by the panel root.
pub const PANEL_CLASS: &str = "sconsole";
pub const PLACEHOLDER_CLASS: &str = "sconsole-placeholder";
pub const CLOSE_BUTTON_CLASS: &str = "close-button";
pub const BODY_ID: &str = "consoleParent";
pub const OUTPUT_ID: &str = "consoleOutput";
pub const INPUT_ID: &str = "consoleInput";
