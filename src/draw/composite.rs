use crate::draw::model::Color;

/// Source-over blend of straight-alpha colors.
pub fn blend_pixel(bottom: Color, top: Color) -> Color {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }

    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

/// Composites an RGBA buffer over a solid background. The result is fully
/// opaque whenever `background` is.
pub fn flatten_over_background(rgba: &[u8], background: Color) -> Vec<u8> {
    let mut output = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let blended = blend_pixel(background, Color::rgba(px[0], px[1], px[2], px[3]));
        output.extend_from_slice(&blended.to_rgba_array());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{blend_pixel, flatten_over_background};
    use crate::draw::model::Color;

    #[test]
    fn half_transparent_red_over_gray() {
        let out = blend_pixel(Color::rgb(100, 100, 100), Color::rgba(200, 0, 0, 128));
        assert_eq!(out, Color::rgb(150, 50, 50));
    }

    #[test]
    fn opaque_and_clear_tops_short_circuit() {
        let bottom = Color::rgb(1, 2, 3);
        assert_eq!(blend_pixel(bottom, Color::rgb(9, 9, 9)), Color::rgb(9, 9, 9));
        assert_eq!(blend_pixel(bottom, Color::TRANSPARENT), bottom);
    }

    #[test]
    fn flatten_replaces_transparency_with_background() {
        let rgba = vec![255, 255, 255, 0, 0, 255, 0, 255];
        let bg = Color::rgb(10, 20, 30);
        let out = flatten_over_background(&rgba, bg);
        assert_eq!(out, vec![10, 20, 30, 255, 0, 255, 0, 255]);
    }
}
