//! Vector Document Builder
//!
//! Accumulates definitions (gradients, masks, clip paths, filters) and
//! elements, then serializes one self-contained SVG document. Definition ids
//! are unique within a single builder only; a new builder is created per
//! candidate.

use crate::geometry::fmt_num;
use serde::{Deserialize, Serialize};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Ordered attribute list. Order is preserved so output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) an attribute.
    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
        self
    }

    pub fn num(self, key: &str, value: f64) -> Self {
        self.set(key, fmt_num(value))
    }

    pub fn fill(self, paint: &str) -> Self {
        self.set("fill", paint)
    }

    /// `url(#id)` reference to a definition.
    pub fn fill_ref(self, id: &str) -> Self {
        self.set("fill", format!("url(#{})", id))
    }

    pub fn stroke(self, paint: &str, width: f64) -> Self {
        self.set("stroke", paint).num("stroke-width", width)
    }

    pub fn opacity(self, value: f64) -> Self {
        self.num("opacity", value.clamp(0.0, 1.0))
    }

    pub fn even_odd(self) -> Self {
        self.set("fill-rule", "evenodd")
    }

    pub fn clip_ref(self, id: &str) -> Self {
        self.set("clip-path", format!("url(#{})", id))
    }

    pub fn mask_ref(self, id: &str) -> Self {
        self.set("mask", format!("url(#{})", id))
    }

    pub fn filter_ref(self, id: &str) -> Self {
        self.set("filter", format!("url(#{})", id))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn write(&self, out: &mut String) {
        for (k, v) in &self.0 {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v, true));
            out.push('"');
        }
    }
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialized document tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Attrs,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    fn write(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape(t, false)),
            Node::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                attrs.write(out);
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in children {
                        child.write(out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }
}

fn leaf(tag: &'static str, attrs: Attrs) -> Node {
    Node::Element { tag, attrs, children: vec![] }
}

/// One gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

impl GradientStop {
    pub fn new(offset: f64, color: &str, opacity: f64) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color: color.to_string(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GradientKind {
    /// Direction in degrees, 0 = left to right, 90 = top to bottom.
    Linear { angle: f64 },
    /// Center and radius as fractions of the bounding box.
    Radial { cx: f64, cy: f64, r: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl GradientSpec {
    pub fn linear(angle: f64, stops: Vec<GradientStop>) -> Self {
        Self { kind: GradientKind::Linear { angle }, stops }
    }

    pub fn radial(cx: f64, cy: f64, r: f64, stops: Vec<GradientStop>) -> Self {
        Self { kind: GradientKind::Radial { cx, cy, r }, stops }
    }

    fn to_node(&self, id: &str) -> Node {
        let pct = |v: f64| format!("{}%", fmt_num(v * 100.0));
        let (tag, attrs) = match self.kind {
            GradientKind::Linear { angle } => {
                let (s, c) = angle.to_radians().sin_cos();
                let attrs = Attrs::new()
                    .set("id", id)
                    .set("x1", pct(0.5 - c * 0.5))
                    .set("y1", pct(0.5 - s * 0.5))
                    .set("x2", pct(0.5 + c * 0.5))
                    .set("y2", pct(0.5 + s * 0.5));
                ("linearGradient", attrs)
            }
            GradientKind::Radial { cx, cy, r } => {
                let attrs = Attrs::new()
                    .set("id", id)
                    .set("cx", pct(cx))
                    .set("cy", pct(cy))
                    .set("r", pct(r));
                ("radialGradient", attrs)
            }
        };
        let children = self
            .stops
            .iter()
            .map(|s| {
                leaf(
                    "stop",
                    Attrs::new()
                        .set("offset", pct(s.offset))
                        .set("stop-color", &s.color)
                        .num("stop-opacity", s.opacity),
                )
            })
            .collect();
        Node::Element { tag, attrs, children }
    }
}

/// Element sink shared by the document root and nested groups.
pub trait Canvas {
    fn push_node(&mut self, node: Node);

    fn path(&mut self, d: &str, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        self.push_node(leaf("path", attrs.set("d", d)));
        self
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        let attrs = attrs.num("x", x).num("y", y).num("width", w.max(0.0)).num("height", h.max(0.0));
        self.push_node(leaf("rect", attrs));
        self
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        self.push_node(leaf("circle", attrs.num("cx", cx).num("cy", cy).num("r", r.max(0.0))));
        self
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        let attrs = attrs.num("cx", cx).num("cy", cy).num("rx", rx.max(0.0)).num("ry", ry.max(0.0));
        self.push_node(leaf("ellipse", attrs));
        self
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        let attrs = attrs.num("x1", x1).num("y1", y1).num("x2", x2).num("y2", y2);
        self.push_node(leaf("line", attrs));
        self
    }

    fn text(&mut self, x: f64, y: f64, content: &str, attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        self.push_node(Node::Element {
            tag: "text",
            attrs: attrs.num("x", x).num("y", y),
            children: vec![Node::Text(content.to_string())],
        });
        self
    }

    fn polyline(&mut self, points: &[crate::geometry::Point], attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        self.push_node(leaf("polyline", attrs.set("points", points_attr(points))));
        self
    }

    fn polygon(&mut self, points: &[crate::geometry::Point], attrs: Attrs) -> &mut Self
    where
        Self: Sized,
    {
        self.push_node(leaf("polygon", attrs.set("points", points_attr(points))));
        self
    }

    /// Nested unnamed group under `transform` (empty string for none).
    fn group<F>(&mut self, transform: &str, attrs: Attrs, build: F) -> &mut Self
    where
        Self: Sized,
        F: FnOnce(&mut Group),
    {
        let mut group = Group::default();
        build(&mut group);
        let attrs = if transform.is_empty() { attrs } else { attrs.set("transform", transform) };
        self.push_node(Node::Element { tag: "g", attrs, children: group.nodes });
        self
    }
}

fn points_attr(points: &[crate::geometry::Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Children of a `<g>`, `<mask>` or `<clipPath>`.
#[derive(Debug, Default)]
pub struct Group {
    nodes: Vec<Node>,
}

impl Canvas for Group {
    fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }
}

/// Fluent SVG document accumulator.
#[derive(Debug)]
pub struct SvgBuilder {
    view_box: [f64; 4],
    defs: Vec<Node>,
    elements: Vec<Node>,
    next_id: usize,
    gradients: usize,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for SvgBuilder {
    fn push_node(&mut self, node: Node) {
        self.elements.push(node);
    }
}

impl SvgBuilder {
    /// New document on the standard 100x100 canvas.
    pub fn new() -> Self {
        Self {
            view_box: [0.0, 0.0, 100.0, 100.0],
            defs: vec![],
            elements: vec![],
            next_id: 0,
            gradients: 0,
        }
    }

    pub fn view_box(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.view_box = [x, y, w.max(1.0), h.max(1.0)];
        self
    }

    fn alloc_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a gradient definition and return its id.
    pub fn gradient(&mut self, spec: &GradientSpec) -> String {
        let id = self.alloc_id("grad");
        self.defs.push(spec.to_node(&id));
        self.gradients += 1;
        id
    }

    pub fn linear_gradient(&mut self, angle: f64, stops: Vec<GradientStop>) -> String {
        self.gradient(&GradientSpec::linear(angle, stops))
    }

    pub fn radial_gradient(&mut self, cx: f64, cy: f64, r: f64, stops: Vec<GradientStop>) -> String {
        self.gradient(&GradientSpec::radial(cx, cy, r, stops))
    }

    /// Luminance mask: white shows, black hides.
    pub fn mask<F: FnOnce(&mut Group)>(&mut self, build: F) -> String {
        let id = self.alloc_id("mask");
        let mut group = Group::default();
        build(&mut group);
        self.defs.push(Node::Element {
            tag: "mask",
            attrs: Attrs::new().set("id", &id).set("maskUnits", "userSpaceOnUse"),
            children: group.nodes,
        });
        id
    }

    pub fn clip_path<F: FnOnce(&mut Group)>(&mut self, build: F) -> String {
        let id = self.alloc_id("clip");
        let mut group = Group::default();
        build(&mut group);
        self.defs.push(Node::Element {
            tag: "clipPath",
            attrs: Attrs::new().set("id", &id),
            children: group.nodes,
        });
        id
    }

    /// Soft drop shadow filter.
    pub fn drop_shadow(&mut self, dx: f64, dy: f64, blur: f64, color: &str, opacity: f64) -> String {
        let id = self.alloc_id("filter");
        let shadow = leaf(
            "feDropShadow",
            Attrs::new()
                .num("dx", dx)
                .num("dy", dy)
                .num("stdDeviation", blur.max(0.0))
                .set("flood-color", color)
                .num("flood-opacity", opacity.clamp(0.0, 1.0)),
        );
        self.defs.push(Node::Element {
            tag: "filter",
            attrs: Attrs::new()
                .set("id", &id)
                .set("x", "-20%")
                .set("y", "-20%")
                .set("width", "140%")
                .set("height", "140%"),
            children: vec![shadow],
        });
        id
    }

    pub fn gradient_count(&self) -> usize {
        self.gradients
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialize definitions, then elements, into one document.
    pub fn build(&self) -> String {
        let [x, y, w, h] = self.view_box;
        let mut out = String::with_capacity(4096);
        out.push_str("<svg");
        Attrs::new()
            .set("xmlns", SVG_NS)
            .set("viewBox", format!("{} {} {} {}", fmt_num(x), fmt_num(y), fmt_num(w), fmt_num(h)))
            .num("width", w)
            .num("height", h)
            .write(&mut out);
        out.push('>');
        if !self.defs.is_empty() {
            out.push_str("<defs>");
            for def in &self.defs {
                def.write(&mut out);
            }
            out.push_str("</defs>");
        }
        for el in &self.elements {
            el.write(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_empty_document() {
        let svg = SvgBuilder::new().build();
        assert_eq!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100"></svg>"#
        );
    }

    #[test]
    fn test_definition_ids_unique() {
        let mut b = SvgBuilder::new();
        let g1 = b.linear_gradient(0.0, vec![GradientStop::new(0.0, "#fff", 1.0)]);
        let g2 = b.radial_gradient(0.5, 0.5, 0.5, vec![GradientStop::new(1.0, "#000", 1.0)]);
        let m = b.mask(|m| {
            m.rect(0.0, 0.0, 100.0, 100.0, Attrs::new().fill("white"));
        });
        let c = b.clip_path(|c| {
            c.circle(50.0, 50.0, 40.0, Attrs::new());
        });
        let f = b.drop_shadow(0.0, 1.0, 2.0, "#000", 0.3);
        let ids = [g1, g2, m, c, f];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(b.gradient_count(), 2);
    }

    #[test]
    fn test_defs_precede_elements() {
        let mut b = SvgBuilder::new();
        b.path("M0 0 L10 10 Z", Attrs::new().fill("#000"));
        let id = b.linear_gradient(90.0, vec![GradientStop::new(0.0, "#111", 1.0)]);
        b.circle(50.0, 50.0, 10.0, Attrs::new().fill_ref(&id));
        let svg = b.build();
        let defs_at = svg.find("<defs>").unwrap();
        let path_at = svg.find("<path").unwrap();
        assert!(defs_at < path_at);
        assert!(svg.contains(r#"fill="url(#grad-0)""#));
        assert_eq!(b.element_count(), 2);
    }

    #[test]
    fn test_linear_gradient_direction() {
        let mut b = SvgBuilder::new();
        b.linear_gradient(0.0, vec![]);
        let svg = b.build();
        assert!(svg.contains(r#"x1="0%" y1="50%" x2="100%" y2="50%""#));
    }

    #[test]
    fn test_group_nesting() {
        let mut b = SvgBuilder::new();
        b.group("rotate(45 50 50)", Attrs::new().opacity(0.5), |g| {
            g.rect(10.0, 10.0, 20.0, 20.0, Attrs::new());
            g.group("", Attrs::new(), |inner| {
                inner.line(0.0, 0.0, 1.0, 1.0, Attrs::new());
            });
        });
        let svg = b.build();
        assert!(svg.contains(r#"<g opacity="0.5" transform="rotate(45 50 50)"><rect"#));
        assert!(svg.contains("<g><line"));
    }

    #[test]
    fn test_escaping() {
        let mut b = SvgBuilder::new();
        b.text(50.0, 50.0, "A & <B>", Attrs::new().set("font-family", "\"Inter\""));
        let svg = b.build();
        assert!(svg.contains("A &amp; &lt;B&gt;"));
        assert!(svg.contains("&quot;Inter&quot;"));
    }

    #[test]
    fn test_polyline_points() {
        let mut b = SvgBuilder::new();
        b.polyline(&[Point::new(1.0, 2.0), Point::new(3.5, 4.0)], Attrs::new());
        b.polygon(&[Point::new(0.0, 0.0)], Attrs::new());
        let svg = b.build();
        assert!(svg.contains(r#"points="1,2 3.5,4""#));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_attrs_replace() {
        let a = Attrs::new().fill("red").fill("blue");
        assert_eq!(a.get("fill"), Some("blue"));
    }
}
