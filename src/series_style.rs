// src/series_style.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::constants::{
    COLOR_CORNFLOWERBLUE, COLOR_DARKVIOLET, COLOR_GREY, COLOR_LIGHTSTEELBLUE, COLOR_ORANGE,
    COLOR_SLATEGREY, DEFAULT_SERIES_ALPHA, DEFAULT_SERIES_COLORS,
};

/// Line dash pattern, written the matplotlib way in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

/// Cycle applied to datasets without an override.
pub const DEFAULT_LINE_STYLES: [LineStyle; 3] =
    [LineStyle::Dashed, LineStyle::DashDot, LineStyle::Dotted];

impl LineStyle {
    /// Dash length and gap in pixels, `None` for a continuous line.
    pub fn dash_pattern(self) -> Option<(u32, u32)> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some((12, 6)),
            LineStyle::DashDot => Some((8, 4)),
            LineStyle::Dotted => Some((2, 4)),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::DashDot => "-.",
            LineStyle::Dotted => ":",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            "-." | "dashdot" => Ok(LineStyle::DashDot),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            other => Err(format!(
                "Unknown line style '{other}'. Use one of: -, --, -., :"
            )),
        }
    }
}

/// Parse `#rrggbb`, `C0`..`C9` (tableau cycle) or a named colour.
pub fn parse_color(s: &str) -> Result<RGBColor, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(v) = u32::from_str_radix(hex, 16) {
                return Ok(RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8));
            }
        }
        return Err(format!("Invalid hex colour '{s}'"));
    }
    if let Some(idx) = s.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
        return Ok(tableau_color(idx));
    }
    let named = match s.to_ascii_lowercase().as_str() {
        "red" | "r" => RGBColor(255, 0, 0),
        "green" | "g" => RGBColor(0, 128, 0),
        "blue" | "b" => RGBColor(0, 0, 255),
        "black" | "k" => RGBColor(0, 0, 0),
        "white" | "w" => RGBColor(255, 255, 255),
        "cyan" | "c" => RGBColor(0, 191, 191),
        "magenta" | "m" => RGBColor(191, 0, 191),
        "yellow" | "y" => RGBColor(191, 191, 0),
        "grey" | "gray" => COLOR_GREY,
        "orange" => COLOR_ORANGE,
        "cornflowerblue" => COLOR_CORNFLOWERBLUE,
        "lightsteelblue" => COLOR_LIGHTSTEELBLUE,
        "slategrey" | "slategray" => COLOR_SLATEGREY,
        "darkviolet" => COLOR_DARKVIOLET,
        _ => return Err(format!("Unknown colour '{s}'")),
    };
    Ok(named)
}

/// Categorical colour `index` of the tableau palette, wrapping around.
pub fn tableau_color(index: usize) -> RGBColor {
    let palette = colorous::TABLEAU10;
    let c = palette[index % palette.len()];
    RGBColor(c.r, c.g, c.b)
}

/// Resolved appearance of one plotted dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub line: LineStyle,
    pub color: RGBColor,
    pub alpha: f64,
}

impl SeriesStyle {
    pub fn solid(color: RGBColor) -> Self {
        Self {
            line: LineStyle::Solid,
            color,
            alpha: 1.0,
        }
    }

    /// Default cyclic style for the dataset at position `index`.
    pub fn cyclic(index: usize) -> Self {
        Self {
            line: DEFAULT_LINE_STYLES[index % DEFAULT_LINE_STYLES.len()],
            color: DEFAULT_SERIES_COLORS[index % DEFAULT_SERIES_COLORS.len()],
            alpha: DEFAULT_SERIES_ALPHA,
        }
    }
}

/// Per-dataset style override as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StyleOverride {
    pub style: Option<String>,
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

impl StyleOverride {
    /// Overlay this override on `base`; unparsable fields fall back to `base`.
    pub fn apply(&self, name: &str, base: SeriesStyle) -> SeriesStyle {
        let mut style = base;
        if let Some(s) = &self.style {
            match s.parse() {
                Ok(line) => style.line = line,
                Err(e) => log::warn!("Style override for '{name}': {e}"),
            }
        }
        if let Some(c) = &self.color {
            match parse_color(c) {
                Ok(color) => style.color = color,
                Err(e) => log::warn!("Style override for '{name}': {e}"),
            }
        }
        if let Some(alpha) = self.alpha {
            style.alpha = alpha.clamp(0.0, 1.0);
        }
        style
    }
}

/// Overrides and skip list for multi-file comparison plots.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleRules {
    pub overrides: BTreeMap<String, StyleOverride>,
    pub skip: Vec<String>,
}

impl StyleRules {
    /// Skip list with overridden names removed; each conflict is logged.
    pub fn effective_skip(&self) -> BTreeSet<&str> {
        let mut skip: BTreeSet<&str> = self.skip.iter().map(String::as_str).collect();
        let conflicts: Vec<&str> = skip
            .iter()
            .copied()
            .filter(|name| self.overrides.contains_key(*name))
            .collect();
        if !conflicts.is_empty() {
            log::warn!(
                "Conflicting files between style overrides and skip list: {conflicts:?}. \
                 Keeping them and applying the overrides."
            );
            for name in conflicts {
                skip.remove(name);
            }
        }
        skip
    }

    /// Style for every dataset name that is not skipped, in input order.
    ///
    /// The default cycle is indexed by position among all `names`, so skipping
    /// a file does not shift the styles of the others.
    pub fn resolve<'a>(&self, names: &'a [String]) -> Vec<(&'a str, SeriesStyle)> {
        let skip = self.effective_skip();
        let mut resolved = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if skip.contains(name.as_str()) {
                log::info!("Skipping dataset: {name}");
                continue;
            }
            let base = SeriesStyle::cyclic(i);
            let style = match self.overrides.get(name) {
                Some(ov) => ov.apply(name, base),
                None => base,
            };
            resolved.push((name.as_str(), style));
        }
        log::info!(
            "Generated line styles: {:?}",
            resolved.iter().map(|(_, s)| s.line.symbol()).collect::<Vec<_>>()
        );
        log::debug!(
            "Generated line alphas: {:?}",
            resolved.iter().map(|(_, s)| s.alpha).collect::<Vec<_>>()
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_line_style() {
        assert_eq!("--".parse::<LineStyle>().unwrap(), LineStyle::Dashed);
        assert_eq!("-.".parse::<LineStyle>().unwrap(), LineStyle::DashDot);
        assert_eq!(":".parse::<LineStyle>().unwrap(), LineStyle::Dotted);
        assert_eq!("-".parse::<LineStyle>().unwrap(), LineStyle::Solid);
        assert!("~~".parse::<LineStyle>().is_err());
        assert_eq!(LineStyle::Solid.dash_pattern(), None);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff7f0e").unwrap(), RGBColor(255, 127, 14));
        assert_eq!(parse_color("red").unwrap(), RGBColor(255, 0, 0));
        assert_eq!(parse_color("cornflowerblue").unwrap(), COLOR_CORNFLOWERBLUE);
        assert_eq!(parse_color("C0").unwrap(), tableau_color(0));
        assert!(parse_color("#12").is_err());
        assert!(parse_color("not-a-colour").is_err());
    }

    #[test]
    fn test_default_cycle() {
        let rules = StyleRules::default();
        let files = names(&["a", "b", "c", "d", "e", "f"]);
        let resolved = rules.resolve(&files);
        assert_eq!(resolved.len(), 6);
        assert_eq!(resolved[0].1.line, LineStyle::Dashed);
        assert_eq!(resolved[3].1.line, LineStyle::Dashed);
        assert_eq!(resolved[5].1.color, COLOR_CORNFLOWERBLUE);
        assert!(resolved.iter().all(|(_, s)| s.alpha == DEFAULT_SERIES_ALPHA));
    }

    #[test]
    fn test_override_beats_skip() {
        let mut rules = StyleRules {
            skip: vec!["omega15".to_string(), "omega304".to_string()],
            ..Default::default()
        };
        rules.overrides.insert(
            "omega304".to_string(),
            StyleOverride {
                style: Some("-".to_string()),
                color: Some("red".to_string()),
                alpha: Some(1.0),
            },
        );
        let files = names(&["omega15", "omega304", "omega50"]);
        let resolved = rules.resolve(&files);
        let kept: Vec<&str> = resolved.iter().map(|(n, _)| *n).collect();
        assert_eq!(kept, vec!["omega304", "omega50"]);
        assert_eq!(resolved[0].1, SeriesStyle::solid(RGBColor(255, 0, 0)));
        // Cycle position follows the full file list.
        assert_eq!(resolved[1].1, SeriesStyle::cyclic(2));
    }

    #[test]
    fn test_bad_override_field_falls_back() {
        let ov = StyleOverride {
            style: Some("wavy".to_string()),
            color: None,
            alpha: Some(3.0),
        };
        let style = ov.apply("x", SeriesStyle::cyclic(1));
        assert_eq!(style.line, LineStyle::DashDot);
        assert_eq!(style.alpha, 1.0);
    }
}
