// THEORY:
// The `Pixel` module is the most fundamental unit of the scanner. It is a "dumb"
// data container for a single RGBA sample plus the handful of single-pixel
// heuristics the color classifier needs: hue, HSL saturation, HSL lightness and
// Euclidean RGB distance. Anything that needs more than one pixel (window
// averaging, grids, history) lives in higher modules such as the facelet sampler
// and the consensus builder.
//
// Key principles:
// 1) Single-pixel scope: heuristics never read neighbors or history.
// 2) Color-space math stays on the integer channels until one final division,
//    so a sample whose hue sits exactly on a bucket boundary reports exactly
//    that boundary.
// 3) All color-space math uses gamma-encoded sRGB. Sticker classification is
//    coarse bucketing, so linearization buys nothing here.

pub mod pixel {
    pub type Channel = u8;
    pub type Hue = f64;
    pub type SaturationHSL = f64;
    pub type LightnessHSL = f64;
    pub type Chroma = u8;

    const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha channel value (0-255). Carried through, never used for color.
        pub alpha: Channel,
    }

    impl Default for Pixel {
        fn default() -> Self {
            Pixel::new(0, 0, 0, 255)
        }
    }

    impl From<&[u8]> for Pixel {
        /// Builds a pixel from an RGBA byte window. Short windows are padded
        /// with zero color and opaque alpha.
        fn from(bytes: &[u8]) -> Self {
            let channel = |i: usize| bytes.get(i).copied();
            Pixel::new(
                channel(0).unwrap_or(0),
                channel(1).unwrap_or(0),
                channel(2).unwrap_or(0),
                if bytes.len() >= CHANNELS { bytes[3] } else { 255 },
            )
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Opaque pixel from an RGB triple.
        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, 255)
        }

        pub fn channels(&self) -> (Channel, Channel, Channel) {
            (self.red, self.green, self.blue)
        }

        fn max_channel(&self) -> i32 {
            self.red.max(self.green).max(self.blue) as i32
        }

        fn min_channel(&self) -> i32 {
            self.red.min(self.green).min(self.blue) as i32
        }

        /// Chroma (C): color purity = max(R,G,B) - min(R,G,B), 0..255.
        pub fn chroma(&self) -> Chroma {
            (self.max_channel() - self.min_channel()) as Chroma
        }

        /// Hue angle in degrees [0, 360).
        ///
        /// Achromatic pixels (zero chroma) report 0.0; callers must gate on
        /// saturation before trusting the angle.
        pub fn hue(&self) -> Hue {
            let (red, green, blue) = (self.red as i32, self.green as i32, self.blue as i32);
            let maximum_channel = self.max_channel();
            let chroma = maximum_channel - self.min_channel();

            if chroma == 0 {
                return 0.0;
            }

            // Degrees scaled by chroma.
            let mut scaled_degrees = if maximum_channel == red {
                60 * (green - blue)
            } else if maximum_channel == green {
                60 * (blue - red) + 120 * chroma
            } else {
                60 * (red - green) + 240 * chroma
            };
            if scaled_degrees < 0 {
                scaled_degrees += 360 * chroma;
            }
            scaled_degrees as f64 / chroma as f64
        }

        /// HSL Lightness as a percentage: midpoint of max and min channels.
        pub fn lightness_percent(&self) -> LightnessHSL {
            ((self.max_channel() + self.min_channel()) * 100) as f64 / 510.0
        }

        /// HSL Saturation as a percentage: chroma / (1 - |2L - 1|).
        pub fn saturation_percent(&self) -> SaturationHSL {
            let chroma = self.max_channel() - self.min_channel();
            let sum = self.max_channel() + self.min_channel();
            let denominator = 255 - (sum - 255).abs();
            if chroma == 0 || denominator == 0 {
                return 0.0;
            }
            (chroma * 100) as f64 / denominator as f64
        }

        /// Euclidean distance in raw 0..255 RGB space. Alpha is ignored.
        pub fn distance(&self, other: &Pixel) -> f64 {
            let dr = self.red as f64 - other.red as f64;
            let dg = self.green as f64 - other.green as f64;
            let db = self.blue as f64 - other.blue as f64;
            (dr * dr + dg * dg + db * db).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::Pixel;

    #[test]
    fn primary_hues() {
        assert_eq!(Pixel::rgb(255, 0, 0).hue(), 0.0);
        assert_eq!(Pixel::rgb(0, 255, 0).hue(), 120.0);
        assert_eq!(Pixel::rgb(0, 0, 255).hue(), 240.0);
        assert_eq!(Pixel::rgb(255, 255, 0).hue(), 60.0);
    }

    #[test]
    fn whole_degree_hues_are_exact() {
        assert_eq!(Pixel::rgb(128, 96, 0).hue(), 45.0);
        assert_eq!(Pixel::rgb(112, 28, 0).hue(), 15.0);
        assert_eq!(Pixel::rgb(120, 0, 30).hue(), 345.0);
        assert_eq!(Pixel::rgb(80, 0, 240).hue(), 260.0);
    }

    #[test]
    fn magenta_side_wraps_below_360() {
        let hue = Pixel::rgb(255, 0, 10).hue();
        assert!(hue > 350.0 && hue < 360.0, "got {hue}");
    }

    #[test]
    fn achromatic_pixels_have_no_saturation() {
        let white = Pixel::rgb(255, 255, 255);
        assert_eq!(white.saturation_percent(), 0.0);
        assert_eq!(white.lightness_percent(), 100.0);
        let black = Pixel::rgb(0, 0, 0);
        assert_eq!(black.saturation_percent(), 0.0);
        assert_eq!(black.lightness_percent(), 0.0);
    }

    #[test]
    fn pure_colors_are_fully_saturated() {
        let red = Pixel::rgb(255, 0, 0);
        assert_eq!(red.saturation_percent(), 100.0);
        assert_eq!(red.lightness_percent(), 50.0);
        // 357 / 510 is exactly 70%.
        assert_eq!(Pixel::rgb(255, 102, 102).lightness_percent(), 70.0);
    }

    #[test]
    fn from_rgba_bytes() {
        let pixel = Pixel::from(&[10u8, 20, 30, 40][..]);
        assert_eq!(pixel.channels(), (10, 20, 30));
        assert_eq!(pixel.alpha, 40);
    }

    #[test]
    fn distance_between_black_and_white() {
        let d = Pixel::rgb(0, 0, 0).distance(&Pixel::rgb(255, 255, 255));
        assert!((d - 441.672).abs() < 1e-2);
    }
}
