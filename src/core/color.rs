use serde::Deserialize;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Premultiplied channels in RGBA order
    pub fn premultiplied(&self) -> [u8; 4] {
        let a = self.a as u32;
        let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        [mul(self.r), mul(self.g), mul(self.b), self.a]
    }

    /// Recover straight alpha from premultiplied RGBA channels
    pub fn from_premultiplied([r, g, b, a]: [u8; 4]) -> Self {
        if a == 0 {
            return Self::TRANSPARENT;
        }
        let a32 = a as u32;
        let div = |c: u8| ((c as u32 * 255 + a32 / 2) / a32).min(255) as u8;
        Self::rgba(div(r), div(g), div(b), a)
    }

    /// Normalized premultiplied channels, as the GPU consumes them
    pub fn to_premultiplied_f32(&self) -> [f32; 4] {
        let [r, g, b, a] = self.premultiplied();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }
}

/// Memory layout of a 32-bit pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// R, G, B, A bytes, premultiplied. Matches `Rgba8Unorm` textures.
    Rgba8Premul,
    /// B, G, R, A bytes, premultiplied. Native 32-bit window buffers on little-endian.
    Bgra8Premul,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        4
    }

    /// Encode premultiplied RGBA channels into this format's byte order
    pub fn encode(&self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba8Premul => [r, g, b, a],
            PixelFormat::Bgra8Premul => [b, g, r, a],
        }
    }

    /// Decode bytes in this format into premultiplied RGBA channels
    pub fn decode(&self, [c0, c1, c2, c3]: [u8; 4]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba8Premul => [c0, c1, c2, c3],
            PixelFormat::Bgra8Premul => [c2, c1, c0, c3],
        }
    }
}

/// Order in which rows are laid out in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RowOrder {
    /// Row 0 is the top of the image
    #[default]
    TopDown,
    /// Row 0 is the bottom of the image (GL framebuffer convention)
    BottomUp,
}

impl RowOrder {
    /// Whether copying from `self` into `target` must reverse the rows
    pub fn needs_flip(&self, target: RowOrder) -> bool {
        *self != target
    }
}
