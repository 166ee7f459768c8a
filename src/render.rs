//! SVG preview of a [`LayoutReport`]: one square panel per group.

use std::f64::consts::PI;

use crate::trend::{GroupLayout, LayoutReport, Point, RankedEntry};

const PALETTE: &[&str] = &["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

/// Visual settings for the SVG preview.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub width: f32,
    pub margin: f32,
    pub panel_gap: f32,
    pub title_height: f32,
    pub background: String,
    pub text_color: String,
    pub muted_color: String,
    pub font_family: String,
    pub label_font_size: f32,
    pub marker_opacity: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 1120.0,
            margin: 18.0,
            panel_gap: 36.0,
            title_height: 30.0,
            background: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
            muted_color: "#6b7280".to_string(),
            font_family: "system-ui, -apple-system, 'Helvetica Neue', Arial, sans-serif"
                .to_string(),
            label_font_size: 11.0,
            marker_opacity: 0.82,
        }
    }
}

/// Square drawing area of one group, in pixels.
#[derive(Debug, Clone, Copy)]
struct Panel {
    x: f32,
    y: f32,
    size: f32,
    range: f64,
}

impl Panel {
    fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    /// Layout coordinates (y up) to pixels (y down).
    fn project(&self, x: f64, y: f64) -> (f32, f32) {
        let (cx, cy) = self.center();
        let half = f64::from(self.size) / 2.0;
        let px = f64::from(cx) + x / self.range * half;
        let py = f64::from(cy) - y / self.range * half;
        (px as f32, py as f32)
    }
}

/// Render the whole report as a standalone SVG document.
pub fn render_report(report: &LayoutReport, style: &MapStyle) -> String {
    let count = report.groups.len().max(1);
    let cols = if count > 1 { 2 } else { 1 };
    let rows = count.div_ceil(cols);

    let panel_size =
        (style.width - style.margin * 2.0 - style.panel_gap * (cols as f32 - 1.0)) / cols as f32;
    let row_height = style.title_height + panel_size;
    let height =
        style.margin * 2.0 + row_height * rows as f32 + style.panel_gap * (rows as f32 - 1.0);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="{font}">"#,
        w = style.width,
        h = height,
        font = escape_xml(&style.font_family),
    ));
    svg.push_str(&format!(
        r#"<rect width="{:.0}" height="{:.0}" fill="{}"/>"#,
        style.width,
        height,
        escape_xml(&style.background)
    ));

    if report.groups.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}" font-size="14">No groups to display</text>"#,
            style.width / 2.0,
            height / 2.0,
            escape_xml(&style.muted_color)
        ));
    }

    for (idx, group) in report.groups.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        let panel = Panel {
            x: style.margin + col as f32 * (panel_size + style.panel_gap),
            y: style.margin + row as f32 * (row_height + style.panel_gap) + style.title_height,
            size: panel_size,
            range: report.plot_range,
        };
        let color = escape_xml(
            group
                .color
                .as_deref()
                .unwrap_or(PALETTE[idx % PALETTE.len()]),
        );
        svg.push_str(&render_group(group, panel, &color, style));
    }

    svg.push_str("</svg>");
    svg
}

fn render_group(group: &GroupLayout, panel: Panel, color: &str, style: &MapStyle) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}" font-size="13" font-weight="600">{}</text>"#,
        panel.x + panel.size / 2.0,
        panel.y - 10.0,
        escape_xml(&style.text_color),
        escape_xml(&group.title)
    ));

    // Larger markers first so small ones stay on top.
    let mut order: Vec<&Point> = group.points.iter().collect();
    order.sort_by(|a, b| b.size.total_cmp(&a.size));
    for point in &order {
        svg.push_str(&render_point(point, panel, color, style));
    }

    svg.push_str(&render_center(group.center_label.as_deref(), panel));

    if !group.top_trends.is_empty() {
        svg.push_str(&render_top_trends(&group.top_trends, panel, style));
    }

    svg
}

fn render_point(point: &Point, panel: Panel, color: &str, style: &MapStyle) -> String {
    let (px, py) = panel.project(point.position.x, point.position.y);
    let r = point.size as f32 / 2.0;
    format!(
        r##"<g><title>{hover}</title><circle cx="{px:.2}" cy="{py:.2}" r="{r:.2}" fill="{color}" fill-opacity="{opacity}" stroke="#ffffff" stroke-opacity="0.95" stroke-width="1"/><text x="{px:.2}" y="{ty:.2}" text-anchor="middle" fill="{text}" font-size="{fs}">{label}</text></g>"##,
        hover = escape_xml(&point.hover),
        opacity = style.marker_opacity,
        ty = py - r - 4.0,
        text = escape_xml(&style.text_color),
        fs = style.label_font_size,
        label = escape_xml(&point.place),
    )
}

fn render_center(label: Option<&str>, panel: Panel) -> String {
    let (cx, cy) = panel.center();
    let tooltip = match label {
        Some(label) => format!("{} CENTER\nReference point", label),
        None => "Reference point".to_string(),
    };

    format!(
        r##"<circle cx="{cx:.2}" cy="{cy:.2}" r="26" fill="#000000" fill-opacity="0.05"/><g><title>{tooltip}</title><path d="{star}" fill="#000000" stroke="#ffffff" stroke-width="1"/></g>"##,
        tooltip = escape_xml(&tooltip),
        star = star_path(cx, cy, 11.0, 4.5),
    )
}

fn render_top_trends(entries: &[RankedEntry], panel: Panel, style: &MapStyle) -> String {
    let line_height = 16.0;
    let mut lines = vec!["🔥 Top Trends".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("{} {}", entry.medal.symbol(), entry.place)),
    );

    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_w = longest as f32 * 6.8 + 20.0;
    let box_h = lines.len() as f32 * line_height + 14.0;
    let right = panel.x + panel.size * 0.95;
    let top = panel.y + panel.size * 0.05;
    let left = right - box_w;

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<rect x="{left:.2}" y="{top:.2}" width="{box_w:.2}" height="{box_h:.2}" rx="6" fill="#ffffff" fill-opacity="0.85" stroke="#e5e7eb" stroke-width="1"/>"##
    ));
    let text_color = escape_xml(&style.text_color);
    for (i, line) in lines.iter().enumerate() {
        let weight = if i == 0 { r#" font-weight="700""# } else { "" };
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="11"{}>{}</text>"#,
            left + 10.0,
            top + 7.0 + line_height * (i as f32 + 0.8),
            text_color,
            weight,
            escape_xml(line)
        ));
    }
    svg
}

/// Five-pointed star centered on `(cx, cy)`.
fn star_path(cx: f32, cy: f32, outer: f32, inner: f32) -> String {
    let mut d = String::new();
    for i in 0..10 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = -PI / 2.0 + f64::from(i) * PI / 5.0;
        let x = cx + radius * angle.cos() as f32;
        let y = cy + radius * angle.sin() as f32;
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{x:.2},{y:.2} "));
    }
    d.push('Z');
    d
}

/// Escape text for SVG content and attributes, dropping characters XML 1.0
/// cannot carry.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < ' ' || matches!(c, '\u{FFFE}' | '\u{FFFF}') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::survey::{Mention, SurveyGroup, SurveyInput};
    use crate::trend::TrendLayout;

    fn sample_report(groups: usize) -> LayoutReport {
        let survey = SurveyInput {
            metrics: [
                ("gangnam".to_string(), Some(2e7)),
                ("a&b <cafe>".to_string(), Some(3e4)),
            ]
            .into_iter()
            .collect(),
            groups: (0..groups)
                .map(|i| SurveyGroup {
                    title: format!("Group {i}"),
                    center_label: Some("SEOUL".to_string()),
                    color: None,
                    mentions: vec![
                        Mention::new("gangnam", Some("shopping")),
                        Mention::new("a&b <cafe>", None),
                    ],
                })
                .collect(),
        };
        TrendLayout::new(LayoutConfig::default())
            .unwrap()
            .layout_survey(&survey)
    }

    #[test]
    fn escape_special_and_control_chars() {
        assert_eq!(escape_xml(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
        assert_eq!(escape_xml("a\u{0007}b\nc"), "ab\nc");
    }

    #[test]
    fn renders_one_panel_per_group() {
        let svg = render_report(&sample_report(3), &MapStyle::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("SEOUL CENTER").count(), 3);
        assert_eq!(svg.matches("🔥 Top Trends").count(), 3);
        assert!(svg.contains("Group 2"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = render_report(&sample_report(1), &MapStyle::default());
        assert!(svg.contains("a&amp;b &lt;cafe&gt;"));
        assert!(!svg.contains("<cafe>"));
    }

    #[test]
    fn palette_is_used_when_group_has_no_color() {
        let svg = render_report(&sample_report(2), &MapStyle::default());
        assert!(svg.contains(r##"fill="#1f77b4""##));
        assert!(svg.contains(r##"fill="#ff7f0e""##));
    }

    #[test]
    fn untrusted_colors_are_escaped_in_attributes() {
        let mut report = sample_report(1);
        report.groups[0].color = Some(r#"red" onload="x"#.to_string());
        let style = MapStyle {
            background: "<white>".to_string(),
            text_color: r#"#000" x="1"#.to_string(),
            ..MapStyle::default()
        };
        let svg = render_report(&report, &style);

        assert!(!svg.contains(r#"onload="x""#));
        assert!(svg.contains("fill=\"red&quot; onload=&quot;x\""));
        assert!(svg.contains("fill=\"&lt;white&gt;\""));
        assert!(!svg.contains(r#"x="1""#));
        assert!(!svg.contains("<white>"));
    }

    #[test]
    fn empty_report_still_renders() {
        let report = LayoutReport {
            plot_range: 10.0,
            groups: Vec::new(),
        };
        let svg = render_report(&report, &MapStyle::default());
        assert!(svg.contains("No groups to display"));
    }

    #[test]
    fn origin_maps_to_panel_center() {
        let panel = Panel {
            x: 10.0,
            y: 20.0,
            size: 200.0,
            range: 10.0,
        };
        assert_eq!(panel.project(0.0, 0.0), (110.0, 120.0));
        assert_eq!(panel.project(10.0, 10.0), (210.0, 20.0));
    }
}
