use crate::models::ImageSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    Landscape3x2,
    Portrait2x3,
    Landscape4x3,
    Portrait3x4,
    Wide16x9,
    Tall9x16,
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Landscape3x2
    }
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::Square,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait2x3,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
        AspectRatio::Wide16x9,
        AspectRatio::Tall9x16,
    ];

    /// Exact token match only; no trimming or normalization.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1:1" => Some(AspectRatio::Square),
            "3:2" => Some(AspectRatio::Landscape3x2),
            "2:3" => Some(AspectRatio::Portrait2x3),
            "4:3" => Some(AspectRatio::Landscape4x3),
            "3:4" => Some(AspectRatio::Portrait3x4),
            "16:9" => Some(AspectRatio::Wide16x9),
            "9:16" => Some(AspectRatio::Tall9x16),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Wide16x9 => "16:9",
            AspectRatio::Tall9x16 => "9:16",
        }
    }

    pub fn size(&self) -> ImageSize {
        let (width, height) = match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Landscape3x2 => (1536, 1024),
            AspectRatio::Portrait2x3 => (1024, 1536),
            AspectRatio::Landscape4x3 => (1365, 1024),
            AspectRatio::Portrait3x4 => (1024, 1365),
            AspectRatio::Wide16x9 => (1536, 864),
            AspectRatio::Tall9x16 => (864, 1536),
        };
        ImageSize { width, height }
    }
}

/// Pixel size for a ratio token; unknown or missing tokens get the 3:2 size.
pub fn image_size_for(token: Option<&str>) -> ImageSize {
    token
        .and_then(AspectRatio::from_token)
        .unwrap_or_default()
        .size()
}
