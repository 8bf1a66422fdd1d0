//! Theme-dependent style computation, independent of any renderer

use serde::{Serialize, Serializer};

use crate::model::Theme;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleVariant {
    Screen,
    Card,
    Input,
    PrimaryButton,
    Text,
    MutedText,
    TotalBanner,
}

impl StyleVariant {
    pub const ALL: [StyleVariant; 7] = [
        StyleVariant::Screen,
        StyleVariant::Card,
        StyleVariant::Input,
        StyleVariant::PrimaryButton,
        StyleVariant::Text,
        StyleVariant::MutedText,
        StyleVariant::TotalBanner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StyleVariant::Screen => "screen",
            StyleVariant::Card => "card",
            StyleVariant::Input => "input",
            StyleVariant::PrimaryButton => "primary-button",
            StyleVariant::Text => "text",
            StyleVariant::MutedText => "muted-text",
            StyleVariant::TotalBanner => "total-banner",
        }
    }
}

impl std::str::FromStr for StyleVariant {
    type Err = fieldbill_types::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        StyleVariant::ALL
            .into_iter()
            .find(|v| v.name() == wanted)
            .ok_or_else(|| fieldbill_types::Error::Validation(format!("unknown style variant: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub background: Color,
    pub foreground: Color,
    pub border: Option<Color>,
    pub padding: u8,
    pub corner_radius: u8,
    pub font_size: u8,
    pub bold: bool,
}

struct Palette {
    background: Color,
    surface: Color,
    text: Color,
    muted: Color,
    accent: Color,
    on_accent: Color,
    border: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color(0xf5, 0xf6, 0xf8),
            surface: Color(0xff, 0xff, 0xff),
            text: Color(0x1c, 0x1e, 0x21),
            muted: Color(0x6b, 0x72, 0x80),
            accent: Color(0x1f, 0x6f, 0xeb),
            on_accent: Color(0xff, 0xff, 0xff),
            border: Color(0xd0, 0xd5, 0xdd),
        },
        Theme::Dark => Palette {
            background: Color(0x12, 0x14, 0x17),
            surface: Color(0x1e, 0x21, 0x26),
            text: Color(0xe8, 0xea, 0xed),
            muted: Color(0x9a, 0xa0, 0xa6),
            accent: Color(0x4c, 0x8d, 0xf6),
            on_accent: Color(0x0b, 0x0d, 0x10),
            border: Color(0x3c, 0x40, 0x46),
        },
    }
}

pub fn compute_style(theme: Theme, variant: StyleVariant) -> StyleDescriptor {
    let p = palette(theme);
    match variant {
        StyleVariant::Screen => StyleDescriptor {
            background: p.background,
            foreground: p.text,
            border: None,
            padding: 16,
            corner_radius: 0,
            font_size: 14,
            bold: false,
        },
        StyleVariant::Card => StyleDescriptor {
            background: p.surface,
            foreground: p.text,
            border: Some(p.border),
            padding: 12,
            corner_radius: 8,
            font_size: 14,
            bold: false,
        },
        StyleVariant::Input => StyleDescriptor {
            background: p.surface,
            foreground: p.text,
            border: Some(p.border),
            padding: 8,
            corner_radius: 4,
            font_size: 14,
            bold: false,
        },
        StyleVariant::PrimaryButton => StyleDescriptor {
            background: p.accent,
            foreground: p.on_accent,
            border: None,
            padding: 12,
            corner_radius: 6,
            font_size: 15,
            bold: true,
        },
        StyleVariant::Text => StyleDescriptor {
            background: p.background,
            foreground: p.text,
            border: None,
            padding: 0,
            corner_radius: 0,
            font_size: 14,
            bold: false,
        },
        StyleVariant::MutedText => StyleDescriptor {
            background: p.background,
            foreground: p.muted,
            border: None,
            padding: 0,
            corner_radius: 0,
            font_size: 12,
            bold: false,
        },
        StyleVariant::TotalBanner => StyleDescriptor {
            background: p.surface,
            foreground: p.accent,
            border: Some(p.accent),
            padding: 12,
            corner_radius: 8,
            font_size: 18,
            bold: true,
        },
    }
}
