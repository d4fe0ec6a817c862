//! RGBA colors shared by the simulation and the GPU backend

/// Linear RGBA in 0..1, laid out the way the vertex buffer expects it
pub type Rgba = [f32; 4];

/// Convert a `0xRRGGBB` literal to an opaque color
pub const fn hex(rgb: u32) -> Rgba {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Replace the alpha channel
pub const fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

/// HSL to RGB (hue in degrees, saturation and lightness in 0..1)
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Rgba {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Game palette
pub mod palette {
    use super::{Rgba, hex};

    pub const BACKGROUND: Rgba = [13.0 / 255.0, 13.0 / 255.0, 21.0 / 255.0, 1.0];
    /// Alpha of the per-frame overlay that leaves motion trails behind
    pub const TRAIL_ALPHA: f32 = 0.2;
    pub const PLAYER: Rgba = hex(0x00ffcc);
    pub const TURRET: Rgba = hex(0xffffff);
    pub const ENEMY_EYE: Rgba = hex(0xffffff);
    pub const PROJECTILE: Rgba = hex(0xffff00);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_hex_channels() {
        assert!(close(hex(0xff6600), [1.0, 0.4, 0.0, 1.0]));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
        // Hue wraps
        assert!(close(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5)));
    }
}
