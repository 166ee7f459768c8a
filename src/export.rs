//! Rasterize or convert the SVG preview.

use std::sync::Arc;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::RenderError;

/// Output formats picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, RenderError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderError::Scale(scale));
    }

    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    let sans = pick_sans_family(opts.fontdb.faces().flat_map(|f| f.families.iter()));
    if let Some(family) = sans {
        opts.fontdb_mut().set_sans_serif_family(family);
    }

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| RenderError::Svg(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| RenderError::Png(e.to_string()))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, RenderError> {
    let mut fontdb = svg2pdf::usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let sans = pick_sans_family(fontdb.faces().flat_map(|f| f.families.iter()));
    if let Some(family) = sans {
        fontdb.set_sans_serif_family(family);
    }

    let opts = svg2pdf::usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| RenderError::Svg(e.to_string()))?;

    // Text as paths so viewers without the fonts still show labels.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };
    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

/// First family whose name mentions "sans", else the first family at all.
fn pick_sans_family<'a, L: 'a>(
    families: impl Iterator<Item = &'a (String, L)>,
) -> Option<String> {
    let mut first: Option<&str> = None;
    for (family, _) in families {
        if first.is_none() {
            first = Some(family.as_str());
        }
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family.clone());
        }
    }
    first.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(OutputFormat::from_extension("SVG"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_extension("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension("Pdf"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::from_extension("html"), None);
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(matches!(svg_to_png("<svg/>", 0.0), Err(RenderError::Scale(_))));
        assert!(matches!(svg_to_png("<svg/>", f32::NAN), Err(RenderError::Scale(_))));
    }

    #[test]
    fn rasterizes_simple_svg() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#ff0000"/></svg>"##;
        let png = svg_to_png(svg, 2.0).expect("png");
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn sans_family_preferred() {
        let families = [
            ("Serif One".to_string(), ()),
            ("Noto Sans".to_string(), ()),
        ];
        assert_eq!(pick_sans_family(families.iter()), Some("Noto Sans".to_string()));
        let none: [(String, ()); 0] = [];
        assert_eq!(pick_sans_family(none.iter()), None);
    }
}
