//! Colors of the diagram view.

use palette::{IntoColor, Oklab, Srgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend towards `background` as `opacity` drops, in Oklab so fades stay
    /// perceptually even.
    pub fn fade(self, background: Rgb, opacity: f32) -> Rgb {
        let t = opacity.clamp(0.0, 1.0);
        if t >= 1.0 {
            return self;
        }
        if t <= 0.0 {
            return background;
        }
        let fg = self.to_oklab();
        let bg = background.to_oklab();
        Rgb::from_oklab(Oklab::new(
            bg.l + (fg.l - bg.l) * t,
            bg.a + (fg.a - bg.a) * t,
            bg.b + (fg.b - bg.b) * t,
        ))
    }

    fn to_oklab(self) -> Oklab {
        Srgb::new(self.r, self.g, self.b)
            .into_format::<f32>()
            .into_color()
    }

    fn from_oklab(lab: Oklab) -> Rgb {
        let srgb: Srgb = lab.into_color();
        let (r, g, b) = srgb.into_format::<u8>().into_components();
        Rgb::new(r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub panel: Rgb,
    pub border: Rgb,
    pub link: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub directory: Rgb,
    pub file: Rgb,
    pub control: Rgb,
    pub control_disabled: Rgb,
    pub accent: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x0f, 0x17, 0x2a),
            panel: Rgb::new(0x1e, 0x29, 0x3b),
            border: Rgb::new(0x33, 0x41, 0x55),
            link: Rgb::new(0x47, 0x55, 0x69),
            text: Rgb::new(0xcb, 0xd5, 0xe1),
            muted: Rgb::new(0x64, 0x74, 0x8b),
            directory: Rgb::new(0x22, 0xc5, 0x5e),
            file: Rgb::new(0xc7, 0xcc, 0xd8),
            control: Rgb::new(0xe2, 0xe8, 0xf0),
            control_disabled: Rgb::new(0x47, 0x55, 0x69),
            accent: Rgb::new(0x38, 0xbd, 0xf8),
        }
    }
}
