use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use crate::bridge;
use crate::dom::{self, document};

const THEME_KEY: &str = "theme-preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Marker class on the document element.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Dark => "theme-dark",
            Self::Light => "theme-light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme: {other:?}")),
        }
    }
}

/// Set `checked` on every checkbox matching `selector`.
pub fn set_toggles(selector: &str, checked: bool) {
    for element in dom::query_all(selector) {
        if let Ok(input) = element.dyn_into::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }
}

/// Mark the document with `theme` and sync the theme checkboxes (checked is dark).
pub fn set_theme(theme: ThemeKind, toggle_selector: &str) {
    set_toggles(toggle_selector, theme == ThemeKind::Dark);

    if let Some(root) = document().and_then(|d| d.document_element()) {
        let classes = root.class_list();
        if let Err(e) = classes.remove_2(
            ThemeKind::Dark.class_name(),
            ThemeKind::Light.class_name(),
        ) {
            log::warn!("failed to clear theme classes: {e:?}");
        }
        if let Err(e) = classes.add_1(theme.class_name()) {
            log::warn!("failed to mark document with {}: {e:?}", theme.class_name());
        }
    }

    set_cached_theme_preference(theme);
}

/// Theme currently marked on the document. Falls back to light when no marker is set.
pub fn get_theme() -> ThemeKind {
    let classes = document()
        .and_then(|d| d.document_element())
        .map(|root| root.class_list());

    match classes {
        Some(classes) if classes.contains(ThemeKind::Light.class_name()) => ThemeKind::Light,
        Some(classes) if classes.contains(ThemeKind::Dark.class_name()) => ThemeKind::Dark,
        _ => {
            log::warn!("no theme marker set on the document; assuming light");
            ThemeKind::Light
        }
    }
}

/// Apply the theme reported by the host window. Without a host answer, use the
/// cached preference, then `fallback`.
pub async fn set_detected_theme(toggle_selector: &str, fallback: ThemeKind) -> ThemeKind {
    let detected = match bridge::app_window_theme().await {
        Ok(reported) => match reported.parse::<ThemeKind>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("host reported {e}");
                None
            }
        },
        Err(e) => {
            log::debug!("theme detection unavailable: {e}");
            None
        }
    };

    let theme = detected
        .or_else(get_cached_theme_preference)
        .unwrap_or(fallback);
    set_theme(theme, toggle_selector);
    theme
}

pub fn get_cached_theme_preference() -> Option<ThemeKind> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten())
        .and_then(|theme| theme.parse().ok())
}

pub fn set_cached_theme_preference(theme: ThemeKind) {
    if let Some(storage) =
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    {
        if let Err(e) = storage.set_item(THEME_KEY, theme.as_str()) {
            log::warn!("failed to cache theme preference: {e:?}");
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum HexCodeError {
    #[error("hex code must start with '#', found {0:?}")]
    InvalidFirstCharacter(char),
    #[error("hex code must be 4 or 7 characters including '#', found {0}")]
    InvalidLength(usize),
    #[error("hex code digits must be in 0..=F, found {0:?}")]
    InvalidCharacter(char),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ThemeDataError {
    #[error("CSS property {0} is not set")]
    MissingProperty(&'static str),
    #[error("CSS property {property} is not a colour: {source}")]
    HexCode {
        property: &'static str,
        #[source]
        source: HexCodeError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Parse `#rgb` or `#rrggbb`. Surrounding whitespace from computed styles is ignored.
    pub fn from_hex_code(code: &str) -> Result<Color, HexCodeError> {
        let code = code.trim();
        let mut chars = code.chars();
        match chars.next() {
            Some('#') => {}
            Some(c) => return Err(HexCodeError::InvalidFirstCharacter(c)),
            None => return Err(HexCodeError::InvalidLength(0)),
        }

        let digits = chars
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(HexCodeError::InvalidCharacter(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        match digits.as_slice() {
            [r, g, b] => Ok(Color(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Ok(Color(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
            _ => Err(HexCodeError::InvalidLength(code.chars().count())),
        }
    }
}

/// Palette published by the stylesheet as `--theme-*` custom properties on `:root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeData {
    pub theme_primary: Color,
    pub theme_secondary: Color,
    pub theme_background_primary: Color,
    pub theme_background_secondary: Color,
    pub theme_background_tertiary: Color,
    pub theme_text: Color,
}

impl ThemeData {
    /// Read the palette for whichever theme is currently applied.
    pub fn from_document() -> Result<Self, ThemeDataError> {
        Self::from_lookup(|property| dom::get_style(":root", property))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ThemeDataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let color = |property: &'static str| -> Result<Color, ThemeDataError> {
            let value = lookup(property).ok_or(ThemeDataError::MissingProperty(property))?;
            Color::from_hex_code(&value)
                .map_err(|source| ThemeDataError::HexCode { property, source })
        };

        Ok(Self {
            theme_primary: color("--theme-primary")?,
            theme_secondary: color("--theme-secondary")?,
            theme_background_primary: color("--theme-background-primary")?,
            theme_background_secondary: color("--theme-background-secondary")?,
            theme_background_tertiary: color("--theme-background-tertiary")?,
            theme_text: color("--theme-text")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_and_classes() {
        assert_eq!(ThemeKind::Dark.as_str(), "dark");
        assert_eq!(ThemeKind::Light.class_name(), "theme-light");
        assert_eq!("dark".parse::<ThemeKind>(), Ok(ThemeKind::Dark));
        assert_eq!(" light ".parse::<ThemeKind>(), Ok(ThemeKind::Light));
        assert!("solarized".parse::<ThemeKind>().is_err());
        assert_eq!(ThemeKind::Dark.toggled(), ThemeKind::Light);
    }

    #[test]
    fn hex_codes_parse_short_and_long_forms() {
        assert_eq!(Color::from_hex_code("#fff"), Ok(Color(255, 255, 255)));
        assert_eq!(Color::from_hex_code("#1a2B3c"), Ok(Color(0x1a, 0x2b, 0x3c)));
        assert_eq!(Color::from_hex_code(" #000000"), Ok(Color(0, 0, 0)));
    }

    #[test]
    fn bad_hex_codes_report_the_problem() {
        assert_eq!(
            Color::from_hex_code("fff"),
            Err(HexCodeError::InvalidFirstCharacter('f'))
        );
        assert_eq!(Color::from_hex_code(""), Err(HexCodeError::InvalidLength(0)));
        assert_eq!(Color::from_hex_code("#ffff"), Err(HexCodeError::InvalidLength(5)));
        assert_eq!(
            Color::from_hex_code("#ggg"),
            Err(HexCodeError::InvalidCharacter('g'))
        );
    }

    #[test]
    fn theme_data_reports_missing_property() {
        let data = ThemeData::from_lookup(|property| match property {
            "--theme-text" => None,
            _ => Some("#123456".to_string()),
        });
        assert_eq!(data, Err(ThemeDataError::MissingProperty("--theme-text")));

        let data = ThemeData::from_lookup(|property| match property {
            "--theme-primary" => Some("red".to_string()),
            _ => Some("#123456".to_string()),
        });
        assert_eq!(
            data,
            Err(ThemeDataError::HexCode {
                property: "--theme-primary",
                source: HexCodeError::InvalidFirstCharacter('r'),
            })
        );

        let data = ThemeData::from_lookup(|_| Some("#abc".to_string())).unwrap();
        assert_eq!(data.theme_primary, Color(0xaa, 0xbb, 0xcc));
    }
}
