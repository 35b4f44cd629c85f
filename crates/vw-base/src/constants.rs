/// Directory name used under the per-user state/config directory.
pub const APP_DIR: &str = "vinw";

/// Sub-directory holding one session record per watched root.
pub const SESSIONS_DIR: &str = "sessions";

/// Log file written under [`APP_DIR`].
pub const LOG_FILE: &str = "vinw.log";

/// Environment variable read for the log filter.
pub const LOG_ENV: &str = "VINW_LOG";

/// Default log directive when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "vinw=info,vw_mod_tree=info,vw_mod_git=info,vw_mod_files=info";

// =============================================================================
// SCROLLING
// =============================================================================

/// Lines moved per mouse wheel notch
pub const SCROLL_WHEEL_LINES: usize = 3;

/// Lines kept from the previous page on PageUp/PageDown
pub const PAGE_OVERLAP: usize = 1;

// =============================================================================
// LAYOUT
// =============================================================================

pub const HEADER_HEIGHT: u16 = 1;
pub const FOOTER_HEIGHT: u16 = 3;

/// Maximum length accepted in the create prompt
pub const NAME_CHAR_LIMIT: usize = 255;
