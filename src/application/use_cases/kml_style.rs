//! `<Style>` / `<StyleMap>` resolution and ABGR color decoding.

use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::domain::kml::{Rgba, Style};

/// Decode a KML `aabbggrr` color. Six digits (`bbggrr`) are read as opaque.
pub fn decode_abgr(text: &str) -> Option<Rgba> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    let (alpha, rest) = match hex.len() {
        8 => (byte(0)?, 2),
        6 => (0xff, 0),
        _ => return None,
    };

    Some(Rgba {
        r: byte(rest + 4)?,
        g: byte(rest + 2)?,
        b: byte(rest)?,
        a: (f64::from(alpha) / 255.0 * 100.0).round() / 100.0,
    })
}

/// First element child with the given local name
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed text of a child element, `None` when missing or blank
pub(crate) fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn child_f64(node: Node, name: &str) -> Option<f64> {
    child_text(node, name)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn child_color(node: Node, name: &str) -> Option<Rgba> {
    child_text(node, name).and_then(|s| decode_abgr(&s))
}

/// Read the sub-styles of one `<Style>` element
pub fn parse_style(node: Node) -> Style {
    let mut style = Style::default();

    if let Some(line) = child(node, "LineStyle") {
        if let Some(color) = child_color(line, "color") {
            style.line_color = Some(color.to_hex());
            style.line_opacity = Some(color.a);
        }
        style.line_width = child_f64(line, "width");
    }

    if let Some(poly) = child(node, "PolyStyle") {
        if let Some(color) = child_color(poly, "color") {
            style.polygon_color = Some(color.to_hex());
            style.polygon_opacity = Some(color.a);
        }
    }

    if let Some(icon) = child(node, "IconStyle") {
        style.icon_color = child_color(icon, "color").map(|c| c.to_hex());
        style.icon_scale = child_f64(icon, "scale");
        style.icon_href = child(icon, "Icon").and_then(|i| child_text(i, "href"));
    }

    if let Some(label) = child(node, "LabelStyle") {
        style.label_color = child_color(label, "color").map(|c| c.to_hex());
        style.label_scale = child_f64(label, "scale");
    }

    style
}

/// `#id` or `file.kml#id` -> `id`
pub fn style_id_from_url(url: &str) -> &str {
    let url = url.trim();
    match url.rfind('#') {
        Some(pos) => &url[pos + 1..],
        None => url,
    }
}

/// Style id -> resolved style, built once per document
#[derive(Debug, Default)]
pub struct StyleTable {
    styles: HashMap<String, Style>,
}

impl StyleTable {
    /// Shared `<Style id>` blocks first, then `<StyleMap>` entries forwarded
    /// through their `normal` pair. Inline placemark styles have no id and
    /// are not part of the table.
    pub fn from_document(doc: &Document) -> Self {
        let mut styles = HashMap::new();

        for node in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "Style")
        {
            if let Some(id) = node.attribute("id") {
                styles.insert(id.to_string(), parse_style(node));
            }
        }

        let mut forwarded = Vec::new();
        for node in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "StyleMap")
        {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            let normal = node
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "Pair")
                .find(|pair| child_text(*pair, "key").as_deref() == Some("normal"));

            let Some(pair) = normal else {
                continue;
            };
            let target = child_text(pair, "styleUrl")
                .and_then(|url| styles.get(style_id_from_url(&url)).cloned())
                .or_else(|| child(pair, "Style").map(parse_style));

            if let Some(style) = target {
                forwarded.push((id.to_string(), style));
            }
        }
        styles.extend(forwarded);

        tracing::debug!(styles = styles.len(), "Built KML style table");
        Self { styles }
    }

    pub fn resolve(&self, style_url: &str) -> Option<&Style> {
        self.styles.get(style_id_from_url(style_url))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
