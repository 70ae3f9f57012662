//! Theme selection for the site.
//!
//! A [`Themes`] value can only be obtained through [`Themes::new`] (or by
//! deserializing, which goes through the same constructor), so every value in
//! circulation already satisfies the selection rules:
//!
//! * every included theme is bundled and listed once,
//! * the default theme is one of the included themes, or `auto` in
//!   `light-dark-auto` mode, where a named default must be one of the first
//!   two included themes,
//! * in `light-dark-auto` mode the first two included themes are a light and a
//!   dark theme, in that order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;

/// The literal accepted as `themes.default` in `light-dark-auto` mode.
pub const AUTO: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    /// One theme for the whole site, no switcher.
    Single,
    /// Visitors pick from every included theme.
    Select,
    /// Follows the visitor's color-scheme preference.
    LightDarkAuto,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Single => "single",
            ThemeMode::Select => "select",
            ThemeMode::LightDarkAuto => "light-dark-auto",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    fn as_str(self) -> &'static str {
        match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
        }
    }
}

/// Syntax-highlighting themes shipped with the renderer.
pub const BUNDLED_THEMES: &[(&str, Appearance)] = &[
    ("andromeeda", Appearance::Dark),
    ("aurora-x", Appearance::Dark),
    ("ayu-dark", Appearance::Dark),
    ("catppuccin-frappe", Appearance::Dark),
    ("catppuccin-latte", Appearance::Light),
    ("catppuccin-macchiato", Appearance::Dark),
    ("catppuccin-mocha", Appearance::Dark),
    ("dark-plus", Appearance::Dark),
    ("dracula", Appearance::Dark),
    ("dracula-soft", Appearance::Dark),
    ("everforest-dark", Appearance::Dark),
    ("everforest-light", Appearance::Light),
    ("github-dark", Appearance::Dark),
    ("github-dark-default", Appearance::Dark),
    ("github-dark-dimmed", Appearance::Dark),
    ("github-dark-high-contrast", Appearance::Dark),
    ("github-light", Appearance::Light),
    ("github-light-default", Appearance::Light),
    ("github-light-high-contrast", Appearance::Light),
    ("gruvbox-dark-hard", Appearance::Dark),
    ("gruvbox-dark-medium", Appearance::Dark),
    ("gruvbox-dark-soft", Appearance::Dark),
    ("gruvbox-light-hard", Appearance::Light),
    ("gruvbox-light-medium", Appearance::Light),
    ("gruvbox-light-soft", Appearance::Light),
    ("houston", Appearance::Dark),
    ("kanagawa-dragon", Appearance::Dark),
    ("kanagawa-lotus", Appearance::Light),
    ("kanagawa-wave", Appearance::Dark),
    ("laserwave", Appearance::Dark),
    ("light-plus", Appearance::Light),
    ("material-theme", Appearance::Dark),
    ("material-theme-darker", Appearance::Dark),
    ("material-theme-lighter", Appearance::Light),
    ("material-theme-ocean", Appearance::Dark),
    ("material-theme-palenight", Appearance::Dark),
    ("min-dark", Appearance::Dark),
    ("min-light", Appearance::Light),
    ("monokai", Appearance::Dark),
    ("night-owl", Appearance::Dark),
    ("nord", Appearance::Dark),
    ("one-dark-pro", Appearance::Dark),
    ("one-light", Appearance::Light),
    ("plastic", Appearance::Dark),
    ("poimandres", Appearance::Dark),
    ("red", Appearance::Dark),
    ("rose-pine", Appearance::Dark),
    ("rose-pine-dawn", Appearance::Light),
    ("rose-pine-moon", Appearance::Dark),
    ("slack-dark", Appearance::Dark),
    ("slack-ochin", Appearance::Light),
    ("snazzy-light", Appearance::Light),
    ("solarized-dark", Appearance::Dark),
    ("solarized-light", Appearance::Light),
    ("synthwave-84", Appearance::Dark),
    ("tokyo-night", Appearance::Dark),
    ("vesper", Appearance::Dark),
    ("vitesse-black", Appearance::Dark),
    ("vitesse-dark", Appearance::Dark),
    ("vitesse-light", Appearance::Light),
];

/// Looks up the appearance of a bundled theme.
pub fn appearance(theme: &str) -> Option<Appearance> {
    BUNDLED_THEMES
        .iter()
        .find(|(name, _)| *name == theme)
        .map(|(_, appearance)| *appearance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultTheme<'a> {
    Named(&'a str),
    Auto,
}

/// The validated `themes` block of the site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThemes", into = "RawThemes")]
pub struct Themes {
    mode: ThemeMode,
    default: String,
    include: Vec<String>,
}

/// Wire shape of the `themes` block before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawThemes {
    pub mode: ThemeMode,
    pub default: String,
    pub include: Vec<String>,
}

impl Themes {
    pub fn new(
        mode: ThemeMode,
        default: impl Into<String>,
        include: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let default = default.into();

        if include.is_empty() {
            return Err(ConfigError::NoThemes);
        }

        let mut seen = HashSet::new();
        for theme in &include {
            if appearance(theme).is_none() {
                return Err(ConfigError::UnknownTheme(theme.clone()));
            }
            if !seen.insert(theme.as_str()) {
                return Err(ConfigError::DuplicateTheme(theme.clone()));
            }
        }

        if mode == ThemeMode::LightDarkAuto {
            if include.len() < 2 {
                return Err(ConfigError::LightDarkNeedsPair(include.len()));
            }
            for (position, expected) in [(0, Appearance::Light), (1, Appearance::Dark)] {
                let theme = &include[position];
                if appearance(theme) != Some(expected) {
                    return Err(ConfigError::LightDarkOrder {
                        theme: theme.clone(),
                        position,
                        expected: expected.as_str(),
                    });
                }
            }
            if include.len() > 2 {
                tracing::warn!(
                    ignored = ?&include[2..],
                    "light-dark-auto mode only uses the first two included themes"
                );
            }
        }

        if default == AUTO {
            if mode != ThemeMode::LightDarkAuto {
                return Err(ConfigError::AutoOutsideLightDarkAuto);
            }
        } else if !include.contains(&default) {
            return Err(ConfigError::DefaultNotIncluded(default));
        } else if mode == ThemeMode::LightDarkAuto && !include[..2].contains(&default) {
            return Err(ConfigError::DefaultOutsidePair(default));
        }

        if mode == ThemeMode::Single && include.len() > 1 {
            tracing::warn!(
                default = %default,
                "single mode only uses the default theme, other included themes are bundled but unused"
            );
        }

        Ok(Themes { mode, default, include })
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn default_theme(&self) -> DefaultTheme<'_> {
        if self.default == AUTO {
            DefaultTheme::Auto
        } else {
            DefaultTheme::Named(&self.default)
        }
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// The `(light, dark)` pair in `light-dark-auto` mode.
    pub fn light_dark(&self) -> Option<(&str, &str)> {
        match self.mode {
            ThemeMode::LightDarkAuto => Some((&self.include[0], &self.include[1])),
            _ => None,
        }
    }
}

impl TryFrom<RawThemes> for Themes {
    type Error = ConfigError;

    fn try_from(raw: RawThemes) -> Result<Self, Self::Error> {
        Themes::new(raw.mode, raw.default, raw.include)
    }
}

impl From<Themes> for RawThemes {
    fn from(themes: Themes) -> Self {
        RawThemes {
            mode: themes.mode,
            default: themes.default,
            include: themes.include,
        }
    }
}
