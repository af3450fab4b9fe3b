//! Design tokens: spacing, typography, and layout constants.
//!
//! Spacing sits on a 4px grid.

// ── Spacing ──────────────────────────────────────────────────────

pub const SPACE_XS: f32 = 4.0;
pub const SPACE_SM: f32 = 8.0;
pub const SPACE_MD: f32 = 12.0;
pub const SPACE_LG: f32 = 16.0;
pub const SPACE_XL: f32 = 24.0;

// ── Typography ───────────────────────────────────────────────────

pub const TEXT_SM: f32 = 12.0;
pub const TEXT_BASE: f32 = 15.0;
pub const TEXT_LG: f32 = 16.0;
pub const TEXT_XL: f32 = 22.0;
pub const TEXT_2XL: f32 = 28.0;

pub const LINE_HEIGHT_TIGHT: f32 = 1.2;
pub const LINE_HEIGHT_LOOSE: f32 = 1.6;

// ── Layout ───────────────────────────────────────────────────────

pub const NAV_HEIGHT: f32 = 64.0;
pub const BOX_WIDTH: f32 = 420.0;
pub const BOX_RADIUS: f32 = 9.0;
pub const LIST_ROW_HEIGHT: f32 = 56.0;
pub const SEARCH_WIDTH: f32 = 360.0;

// ── Star rating ──────────────────────────────────────────────────

pub const STAR_SIZE: f32 = 22.0;
pub const PAGE_BUTTON_WIDTH: f32 = 36.0;
