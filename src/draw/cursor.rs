use crate::draw::model::{BrushShape, Tool};

/// Pointer cursor to show over the surface for the current tool.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorIcon {
    /// An SVG image of the brush footprint with its hotspot.
    Footprint { svg: String, hotspot: (f32, f32) },
    Text,
    Crosshair,
}

impl CursorIcon {
    /// CSS `cursor` value for the icon.
    pub fn to_css(&self) -> String {
        match self {
            CursorIcon::Footprint { svg, hotspot } => format!(
                "url(\"data:image/svg+xml;utf8,{}\") {} {}, auto",
                escape_svg(svg),
                hotspot.0,
                hotspot.1
            ),
            CursorIcon::Text => "text".to_string(),
            CursorIcon::Crosshair => "crosshair".to_string(),
        }
    }
}

pub fn cursor_for(tool: Tool, shape: BrushShape, size: u32) -> CursorIcon {
    let size = size.max(1);
    let svg = match tool {
        Tool::Brush => brush_svg(shape, size),
        Tool::Eraser => svg_document(
            size,
            format!("<rect width='{size}' height='{size}' fill='gray'/>"),
        ),
        Tool::Text => return CursorIcon::Text,
        Tool::Shape(_) => return CursorIcon::Crosshair,
    };
    let half = size as f32 / 2.0;
    CursorIcon::Footprint {
        svg,
        hotspot: (half, half),
    }
}

fn brush_svg(shape: BrushShape, size: u32) -> String {
    let half = size as f32 / 2.0;
    let body = match shape {
        BrushShape::Circle => format!("<circle cx='{half}' cy='{half}' r='{half}' fill='black'/>"),
        BrushShape::Square => format!("<rect width='{size}' height='{size}' fill='black'/>"),
        BrushShape::Triangle => {
            format!("<polygon points='{half},0 {size},{size} 0,{size}' fill='black'/>")
        }
    };
    svg_document(size, body)
}

fn svg_document(size: u32, body: String) -> String {
    format!("<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'>{body}</svg>")
}

// Percent-encodes the characters a data URL cannot carry verbatim.
fn escape_svg(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len() * 2);
    for ch in svg.chars() {
        match ch {
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '#' => out.push_str("%23"),
            '"' => out.push_str("%22"),
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::model::ShapeKind;

    #[test]
    fn circle_brush_cursor_is_centred_disk() {
        let cursor = cursor_for(Tool::Brush, BrushShape::Circle, 10);
        let CursorIcon::Footprint { svg, hotspot } = cursor else {
            panic!("expected footprint cursor");
        };
        assert_eq!(hotspot, (5.0, 5.0));
        assert!(svg.contains("<circle cx='5' cy='5' r='5' fill='black'/>"));
        assert!(svg.contains("width='10' height='10'"));
    }

    #[test]
    fn triangle_brush_cursor_points_up() {
        let CursorIcon::Footprint { svg, .. } = cursor_for(Tool::Brush, BrushShape::Triangle, 8)
        else {
            panic!("expected footprint cursor");
        };
        assert!(svg.contains("points='4,0 8,8 0,8'"));
    }

    #[test]
    fn eraser_cursor_ignores_brush_shape() {
        let CursorIcon::Footprint { svg, .. } = cursor_for(Tool::Eraser, BrushShape::Circle, 6)
        else {
            panic!("expected footprint cursor");
        };
        assert!(svg.contains("fill='gray'"));
        assert!(!svg.contains("circle"));
    }

    #[test]
    fn text_and_shape_tools_use_system_cursors() {
        assert_eq!(cursor_for(Tool::Text, BrushShape::Square, 5), CursorIcon::Text);
        assert_eq!(
            cursor_for(Tool::Shape(ShapeKind::Ellipse), BrushShape::Square, 5),
            CursorIcon::Crosshair
        );
    }

    #[test]
    fn css_value_is_encoded_data_url() {
        let css = cursor_for(Tool::Brush, BrushShape::Square, 4).to_css();
        assert!(css.starts_with("url(\"data:image/svg+xml;utf8,%3Csvg"));
        assert!(css.ends_with(") 2 2, auto"));
        assert_eq!(CursorIcon::Text.to_css(), "text");
    }
}
