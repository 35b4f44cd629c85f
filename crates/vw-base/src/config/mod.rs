//! YAML configuration embedded at compile time: runtime tunables and themes.
use std::sync::LazyLock;
use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub refresh: RefreshConfig,
    pub tree: TreeConfig,
    pub viewer: ViewerConfig,
    pub side_channel: SideChannelConfig,
}

#[derive(Debug, Deserialize)]
pub struct RefreshConfig {
    pub tick_secs: u64,
    pub event_poll_ms: u64,
    pub render_throttle_ms: u64,
    pub hint_secs: u64,
    pub status_secs: u64,
}

impl RefreshConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }
    pub fn event_poll(&self) -> Duration {
        Duration::from_millis(self.event_poll_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct TreeConfig {
    /// Ignore-rules file looked up at the watch root
    pub ignore_file: String,
    /// Names starting with this are hidden unless shown explicitly
    pub hidden_prefix: String,
    /// VCS metadata directory, never listed
    pub vcs_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewerConfig {
    pub command: String,
}

#[derive(Debug, Deserialize)]
pub struct SideChannelConfig {
    pub program: String,
    pub current_file: String,
    pub theme_bg: String,
    pub theme_fg: String,
}

// ============================================================================
// Theme Configuration
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ThemesConfig {
    pub themes: Vec<ThemeSpec>,
    pub tree_colors: TreeColors,
}

/// One header palette (ANSI 256-color indices)
#[derive(Debug, Deserialize)]
pub struct ThemeSpec {
    pub name: String,
    pub description: String,
    pub header_bg: u8,
    pub header_fg: u8,
}

#[derive(Debug, Deserialize)]
pub struct TreeColors {
    pub directory: u8,
    pub file: u8,
    pub change: u8,
    pub guide: u8,
    pub footer_bg: u8,
    pub footer_fg: u8,
    pub error: u8,
}

// ============================================================================
// Loading Functions
// ============================================================================

fn parse_yaml<T: for<'de> Deserialize<'de>>(name: &str, content: &str) -> T {
    serde_yaml::from_str(content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

pub static CONFIG: LazyLock<AppConfig> =
    LazyLock::new(|| parse_yaml("config.yaml", include_str!("../../../../yamls/config.yaml")));
pub static THEMES: LazyLock<ThemesConfig> =
    LazyLock::new(|| parse_yaml("themes.yaml", include_str!("../../../../yamls/themes.yaml")));

// ============================================================================
// Theme value
// ============================================================================

/// A resolved theme. Plain value: the app keeps one in its state and passes
/// it to every render call; changing theme means replacing the value.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    index: usize,
    spec: &'static ThemeSpec,
    colors: &'static TreeColors,
}

impl PartialEq for Theme {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Theme {}

impl Default for Theme {
    fn default() -> Self {
        Self::at(0)
    }
}

impl Theme {
    /// Theme at `index`, wrapping around the configured list.
    pub fn at(index: usize) -> Self {
        let count = Self::count();
        let index = if count == 0 { 0 } else { index % count };
        Self { index, spec: &THEMES.themes[index], colors: &THEMES.tree_colors }
    }

    pub fn count() -> usize {
        THEMES.themes.len()
    }

    pub fn next(self) -> Self {
        Self::at(self.index + 1)
    }

    pub fn prev(self) -> Self {
        Self::at(self.index + Self::count() - 1)
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn name(&self) -> &'static str {
        &self.spec.name
    }
    pub fn description(&self) -> &'static str {
        &self.spec.description
    }

    /// Raw header colors, as broadcast to the viewer
    pub fn header_codes(&self) -> (u8, u8) {
        (self.spec.header_bg, self.spec.header_fg)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .bg(Color::Indexed(self.spec.header_bg))
            .fg(Color::Indexed(self.spec.header_fg))
            .add_modifier(Modifier::BOLD)
    }
    pub fn footer(&self) -> Style {
        Style::default().bg(Color::Indexed(self.colors.footer_bg)).fg(Color::Indexed(self.colors.footer_fg))
    }
    pub fn accent(&self) -> Color {
        Color::Indexed(self.spec.header_bg)
    }
    pub fn directory(&self) -> Style {
        Style::default().fg(Color::Indexed(self.colors.directory))
    }
    pub fn file(&self) -> Style {
        Style::default().fg(Color::Indexed(self.colors.file))
    }
    pub fn change(&self) -> Style {
        Style::default().fg(Color::Indexed(self.colors.change)).add_modifier(Modifier::BOLD)
    }
    pub fn guide(&self) -> Style {
        Style::default().fg(Color::Indexed(self.colors.guide))
    }
    pub fn error(&self) -> Style {
        Style::default().fg(Color::Indexed(self.colors.error)).add_modifier(Modifier::BOLD)
    }
    pub fn selected(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}
