//! Palette registry for glyph rendering.

/// Standard density ramp (29 glyphs).
/// Index 0 is the densest glyph, the last entry is blank.
pub const STANDARD_PALETTE: &[char] = &[
    'Ñ', '@', '#', 'W', '$', '9', '8', '7', '6', '5', '4', '3', '2', '1', '0', '?', '!', 'a', 'b',
    'c', ';', ':', '+', '=', '-', ',', '.', '_', ' ',
];

/// Shade blocks (5 glyphs).
pub const MINIMAL_PALETTE: &[char] = &['█', '▓', '▒', '░', ' '];

/// Vertical fill blocks (9 glyphs, the two lightest levels are blank).
pub const BLOCKS_PALETTE: &[char] = &['█', '▇', '▆', '▅', '▄', '▃', '▂', ' ', ' '];

/// Half-width katakana rain (51 glyphs).
pub const MATRIX_PALETTE: &[char] = &[
    'ﾊ', 'ﾐ', 'ﾋ', 'ｰ', 'ｳ', 'ｼ', 'ﾅ', 'ﾓ', 'ﾆ', 'ｻ', 'ﾜ', 'ﾂ', 'ｵ', 'ﾘ', 'ｱ', 'ﾎ', 'ﾃ', 'ﾏ', 'ｹ',
    'ﾒ', 'ｴ', 'ｶ', 'ｷ', 'ﾑ', 'ﾕ', 'ﾗ', 'ｾ', 'ﾈ', 'ｽ', 'ﾀ', 'ﾇ', 'ﾍ', '1', '2', '3', '4', '5', '6',
    '7', '8', '9', '0', ':', '・', '.', '=', '*', '+', '-', '<', '>',
];

/// Named palette used by the glyph mapper.
///
/// Palettes are selected by name from the UI layer; [`Palette::from_name`]
/// falls back to [`Palette::Standard`] for names it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Mixed glyph density ramp
    #[default]
    Standard,
    /// Shade blocks for a clean look
    Minimal,
    /// Vertical fill blocks
    Blocks,
    /// Katakana and digits
    Matrix,
}

impl Palette {
    /// Every registered palette, in cycling order.
    pub const ALL: [Palette; 4] = [
        Palette::Standard,
        Palette::Minimal,
        Palette::Blocks,
        Palette::Matrix,
    ];

    /// Get the glyph slice for this palette.
    pub fn chars(&self) -> &'static [char] {
        match self {
            Palette::Standard => STANDARD_PALETTE,
            Palette::Minimal => MINIMAL_PALETTE,
            Palette::Blocks => BLOCKS_PALETTE,
            Palette::Matrix => MATRIX_PALETTE,
        }
    }

    /// Get the registry name of the palette.
    pub fn name(&self) -> &'static str {
        match self {
            Palette::Standard => "standard",
            Palette::Minimal => "minimal",
            Palette::Blocks => "blocks",
            Palette::Matrix => "matrix",
        }
    }

    /// Look a palette up by name, case-insensitively.
    pub fn lookup(name: &str) -> Option<Palette> {
        let name = name.trim();
        Palette::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a palette name, falling back to the default palette.
    pub fn from_name(name: &str) -> Palette {
        Palette::lookup(name).unwrap_or_else(|| {
            log::debug!("Unknown palette '{}', using {}", name, Palette::default().name());
            Palette::default()
        })
    }

    /// Cycle to the next palette.
    ///
    /// Order: Standard -> Minimal -> Blocks -> Matrix -> Standard
    pub fn next(&self) -> Self {
        match self {
            Palette::Standard => Palette::Minimal,
            Palette::Minimal => Palette::Blocks,
            Palette::Blocks => Palette::Matrix,
            Palette::Matrix => Palette::Standard,
        }
    }
}
