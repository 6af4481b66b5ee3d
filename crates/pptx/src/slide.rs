//! Slide content and its PresentationML.

use crate::template::{NS_DRAWING, NS_MAIN, NS_REL};
use crate::xml::XmlWriter;
use pdfdeck_core::{Bitmap, PositionedTextBox, Result, SlideSink};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Smallest and largest font size PowerPoint accepts, in hundredths of a point.
const MIN_FONT_SIZE: i64 = 100;
const MAX_FONT_SIZE: i64 = 400_000;

/// Line height relative to font size, used to size boxes without a height.
const LINE_SPACING: f64 = 1.2;

/// Default top plus bottom text inset, in inches.
const VERTICAL_INSETS: f64 = 0.1;

/// Convert inches to EMU.
pub fn emu(inches: f64) -> i64 {
    if inches.is_finite() {
        (inches * EMU_PER_INCH).round() as i64
    } else {
        0
    }
}

/// A shape on a slide, in insertion order.
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    /// Full-slide picture; holds the index of its media part.
    Picture { media: usize },
    TextBox(PositionedTextBox),
}

/// A slide being assembled.
#[derive(Debug, Default)]
pub struct SlideDraft {
    pub(crate) shapes: Vec<Shape>,
    pub(crate) images: Vec<Vec<u8>>,
}

impl SlideDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Text boxes in insertion order.
    pub fn text_boxes(&self) -> impl Iterator<Item = &PositionedTextBox> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::TextBox(tb) => Some(tb),
            Shape::Picture { .. } => None,
        })
    }

    /// Generate the slide part.
    ///
    /// `image_rel_ids[i]` is the relationship id of `self.images[i]`.
    pub(crate) fn to_xml(&self, slide_cx: i64, slide_cy: i64, image_rel_ids: &[String]) -> Result<String> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "p:sld",
            &[("xmlns:a", NS_DRAWING), ("xmlns:r", NS_REL), ("xmlns:p", NS_MAIN)],
        )?;
        xml.start("p:cSld", &[])?;
        xml.start("p:spTree", &[])?;

        xml.start("p:nvGrpSpPr", &[])?;
        xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
        xml.empty("p:cNvGrpSpPr", &[])?;
        xml.empty("p:nvPr", &[])?;
        xml.end("p:nvGrpSpPr")?;
        xml.start("p:grpSpPr", &[])?;
        xml.start("a:xfrm", &[])?;
        xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
        xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
        xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
        xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
        xml.end("a:xfrm")?;
        xml.end("p:grpSpPr")?;

        // Shape ids start after the group's id 1.
        for (i, shape) in self.shapes.iter().enumerate() {
            let id = (i + 2).to_string();
            match shape {
                Shape::Picture { media } => {
                    let rel_id = image_rel_ids.get(*media).map(String::as_str).unwrap_or("rId2");
                    write_picture(&mut xml, &id, rel_id, slide_cx, slide_cy)?;
                }
                Shape::TextBox(tb) => write_text_box(&mut xml, &id, tb)?,
            }
        }

        xml.end("p:spTree")?;
        xml.end("p:cSld")?;
        xml.start("p:clrMapOvr", &[])?;
        xml.empty("a:masterClrMapping", &[])?;
        xml.end("p:clrMapOvr")?;
        xml.end("p:sld")?;
        xml.into_string()
    }
}

impl SlideSink for SlideDraft {
    fn add_image(&mut self, image: &Bitmap) {
        self.images.push(image.png.clone());
        self.shapes.push(Shape::Picture {
            media: self.images.len() - 1,
        });
    }

    fn add_text_box(&mut self, text_box: &PositionedTextBox) {
        self.shapes.push(Shape::TextBox(text_box.clone()));
    }
}

fn write_xfrm(xml: &mut XmlWriter, x: i64, y: i64, cx: i64, cy: i64) -> Result<()> {
    let (x, y, cx, cy) = (x.to_string(), y.to_string(), cx.max(0).to_string(), cy.max(0).to_string());
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")
}

fn write_rect_geometry(xml: &mut XmlWriter) -> Result<()> {
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")
}

fn write_picture(xml: &mut XmlWriter, id: &str, rel_id: &str, cx: i64, cy: i64) -> Result<()> {
    let name = format!("Background {}", id);
    xml.start("p:pic", &[])?;
    xml.start("p:nvPicPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id), ("name", name.as_str())])?;
    xml.start("p:cNvPicPr", &[])?;
    xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    xml.end("p:cNvPicPr")?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvPicPr")?;

    xml.start("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rel_id)])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("p:blipFill")?;

    xml.start("p:spPr", &[])?;
    write_xfrm(xml, 0, 0, cx, cy)?;
    write_rect_geometry(xml)?;
    xml.end("p:spPr")?;
    xml.end("p:pic")
}

fn write_text_box(xml: &mut XmlWriter, id: &str, tb: &PositionedTextBox) -> Result<()> {
    let name = format!("Text {}", id);
    let height = tb
        .h
        .unwrap_or(tb.font_size / 72.0 * LINE_SPACING + VERTICAL_INSETS);
    let size = ((tb.font_size * 100.0).round() as i64).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    let size = size.to_string();
    let color = tb.color.to_hex();

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id), ("name", name.as_str())])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    write_xfrm(xml, emu(tb.x), emu(tb.y), emu(tb.w), emu(height))?;
    write_rect_geometry(xml)?;
    if tb.transparent {
        xml.empty("a:noFill", &[])?;
    } else {
        xml.start("a:solidFill", &[])?;
        xml.empty("a:srgbClr", &[("val", "FFFFFF")])?;
        xml.end("a:solidFill")?;
    }
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0"), ("anchor", "t")])?;
    if tb.h.is_none() {
        xml.empty("a:spAutoFit", &[])?;
    } else {
        xml.empty("a:noAutofit", &[])?;
    }
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    let mut lines: Vec<&str> = tb.text.lines().collect();
    if lines.is_empty() {
        lines.push("");
    }
    for line in lines {
        xml.start("a:p", &[])?;
        xml.start("a:r", &[])?;
        xml.start("a:rPr", &[("sz", size.as_str()), ("dirty", "0")])?;
        xml.start("a:solidFill", &[])?;
        xml.empty("a:srgbClr", &[("val", color.as_str())])?;
        xml.end("a:solidFill")?;
        xml.empty("a:latin", &[("typeface", tb.font_face.as_str())])?;
        xml.empty("a:ea", &[("typeface", tb.font_face.as_str())])?;
        xml.empty("a:cs", &[("typeface", tb.font_face.as_str())])?;
        xml.end("a:rPr")?;
        xml.text_element("a:t", &[], line)?;
        xml.end("a:r")?;
        xml.end("a:p")?;
    }

    xml.end("p:txBody")?;
    xml.end("p:sp")
}
