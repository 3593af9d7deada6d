//! The host's default theme scales that plugins derive their defaults from.

use crate::theme::{scale, ThemeScale, ThemeValue};
use indexmap::IndexMap;

/// Default breakpoints for responsive variants.
pub const SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

const SPACING: &[(&str, &str)] = &[
    ("px", "1px"),
    ("0", "0px"),
    ("0.5", "0.125rem"),
    ("1", "0.25rem"),
    ("1.5", "0.375rem"),
    ("2", "0.5rem"),
    ("2.5", "0.625rem"),
    ("3", "0.75rem"),
    ("3.5", "0.875rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("7", "1.75rem"),
    ("8", "2rem"),
    ("9", "2.25rem"),
    ("10", "2.5rem"),
    ("11", "2.75rem"),
    ("12", "3rem"),
    ("14", "3.5rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
    ("28", "7rem"),
    ("32", "8rem"),
    ("36", "9rem"),
    ("40", "10rem"),
    ("44", "11rem"),
    ("48", "12rem"),
    ("52", "13rem"),
    ("56", "14rem"),
    ("60", "15rem"),
    ("64", "16rem"),
    ("72", "18rem"),
    ("80", "20rem"),
    ("96", "24rem"),
];

const COLUMNS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("10", "10"),
    ("11", "11"),
    ("12", "12"),
    ("3xs", "16rem"),
    ("2xs", "18rem"),
    ("xs", "20rem"),
    ("sm", "24rem"),
    ("md", "28rem"),
    ("lg", "32rem"),
    ("xl", "36rem"),
    ("2xl", "42rem"),
    ("3xl", "48rem"),
    ("4xl", "56rem"),
    ("5xl", "64rem"),
    ("6xl", "72rem"),
    ("7xl", "80rem"),
];

const BORDER_WIDTH: &[(&str, &str)] = &[
    ("DEFAULT", "1px"),
    ("0", "0px"),
    ("2", "2px"),
    ("4", "4px"),
    ("8", "8px"),
];

const WIDTH_FRACTIONS: &[(&str, &str)] = &[
    ("1/2", "50%"),
    ("1/3", "33.333333%"),
    ("2/3", "66.666667%"),
    ("1/4", "25%"),
    ("2/4", "50%"),
    ("3/4", "75%"),
    ("1/5", "20%"),
    ("2/5", "40%"),
    ("3/5", "60%"),
    ("4/5", "80%"),
    ("1/6", "16.666667%"),
    ("2/6", "33.333333%"),
    ("3/6", "50%"),
    ("4/6", "66.666667%"),
    ("5/6", "83.333333%"),
    ("1/12", "8.333333%"),
    ("2/12", "16.666667%"),
    ("3/12", "25%"),
    ("4/12", "33.333333%"),
    ("5/12", "41.666667%"),
    ("6/12", "50%"),
    ("7/12", "58.333333%"),
    ("8/12", "66.666667%"),
    ("9/12", "75%"),
    ("10/12", "83.333333%"),
    ("11/12", "91.666667%"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("svw", "100svw"),
    ("lvw", "100lvw"),
    ("dvw", "100dvw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];

const SHADES: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

const PLAIN_COLORS: &[(&str, &str)] = &[
    ("inherit", "inherit"),
    ("current", "currentColor"),
    ("transparent", "transparent"),
    ("black", "#000"),
    ("white", "#fff"),
];

const PALETTE: &[(&str, [&str; 11])] = &[
    ("slate", ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a", "#020617"]),
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827", "#030712"]),
    ("zinc", ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b", "#09090b"]),
    ("neutral", ["#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040", "#262626", "#171717", "#0a0a0a"]),
    ("stone", ["#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c", "#292524", "#1c1917", "#0c0a09"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#450a0a"]),
    ("orange", ["#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c", "#9a3412", "#7c2d12", "#431407"]),
    ("amber", ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f", "#451a03"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#422006"]),
    ("lime", ["#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f", "#3f6212", "#365314", "#1a2e05"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d", "#052e16"]),
    ("emerald", ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b", "#022c22"]),
    ("teal", ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a", "#042f2e"]),
    ("cyan", ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63", "#083344"]),
    ("sky", ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e", "#082f49"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81", "#1e1b4b"]),
    ("violet", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"]),
    ("purple", ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87", "#3b0764"]),
    ("fuchsia", ["#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf", "#86198f", "#701a75", "#4a044e"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843", "#500724"]),
    ("rose", ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337", "#4c0519"]),
];

/// Fallback border color, `gray-200`.
const DEFAULT_BORDER_COLOR: &str = "#e5e7eb";

pub fn screens() -> IndexMap<String, String> {
    SCREENS
        .iter()
        .map(|(name, width)| (name.to_string(), width.to_string()))
        .collect()
}

pub fn spacing() -> ThemeScale {
    scale(SPACING)
}

pub fn columns() -> ThemeScale {
    scale(COLUMNS)
}

pub fn gap() -> ThemeScale {
    spacing()
}

/// The color palette; every hue is a group of shades.
pub fn colors() -> ThemeScale {
    let mut colors = scale(PLAIN_COLORS);
    for (hue, values) in PALETTE {
        let shades: Vec<(&str, &str)> = SHADES.iter().copied().zip(values.iter().copied()).collect();
        colors.insert(hue.to_string(), ThemeValue::group(&shades));
    }
    colors
}

pub fn border_color() -> ThemeScale {
    let mut border = colors();
    border.insert("DEFAULT".to_string(), ThemeValue::value(DEFAULT_BORDER_COLOR));
    border
}

pub fn border_width() -> ThemeScale {
    scale(BORDER_WIDTH)
}

pub fn width() -> ThemeScale {
    let mut width = scale(&[("auto", "auto")]);
    width.extend(spacing());
    width.extend(scale(WIDTH_FRACTIONS));
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::RawValue;

    #[test]
    fn test_palette_is_grouped() {
        let colors = colors();
        assert_eq!(colors.len(), PLAIN_COLORS.len() + PALETTE.len());
        match &colors["teal"] {
            ThemeValue::Group(shades) => {
                assert_eq!(shades.len(), 11);
                assert_eq!(shades["500"], RawValue::from("#14b8a6"));
            }
            other => panic!("expected shade group, got {:?}", other),
        }
    }

    #[test]
    fn test_border_color_default() {
        assert_eq!(border_color()["DEFAULT"], ThemeValue::value("#e5e7eb"));
    }

    #[test]
    fn test_width_includes_spacing_and_fractions() {
        let width = width();
        assert_eq!(width["auto"], ThemeValue::value("auto"));
        assert_eq!(width["4"], ThemeValue::value("1rem"));
        assert_eq!(width["1/2"], ThemeValue::value("50%"));
        assert_eq!(width["fit"], ThemeValue::value("fit-content"));
    }

    #[test]
    fn test_screens_order() {
        let screens = screens();
        let names: Vec<&str> = screens.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["sm", "md", "lg", "xl", "2xl"]);
    }
}
