//! PPTX deck assembly and packaging.

use crate::slide::SlideDraft;
use crate::template::*;
use crate::xml::XmlWriter;
use pdfdeck_core::{DeckAssembler, Error, Result};
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Width of the wide (16:9) layout in EMU.
pub const WIDE_WIDTH_EMU: i64 = 12_192_000;

/// Height of the wide (16:9) layout in EMU.
pub const WIDE_HEIGHT_EMU: i64 = 6_858_000;

/// First id of the slide id list.
const FIRST_SLIDE_ID: usize = 256;

/// An in-memory PPTX presentation.
#[derive(Debug)]
pub struct PptxDeck {
    title: String,
    slides: Vec<SlideDraft>,
    slide_width: i64,
    slide_height: i64,
}

impl PptxDeck {
    /// Create an empty deck in the wide layout.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
            slide_width: WIDE_WIDTH_EMU,
            slide_height: WIDE_HEIGHT_EMU,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideDraft] {
        &self.slides
    }

    /// Write the complete package to `writer`.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        // Media is already compressed.
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        add_part(&mut zip, "[Content_Types].xml", self.content_types_xml()?.as_bytes(), options)?;
        add_part(&mut zip, "_rels/.rels", root_rels_xml()?.as_bytes(), options)?;
        add_part(&mut zip, "docProps/core.xml", self.core_props_xml()?.as_bytes(), options)?;
        add_part(&mut zip, "docProps/app.xml", self.app_props_xml()?.as_bytes(), options)?;
        add_part(&mut zip, "ppt/presentation.xml", self.presentation_xml()?.as_bytes(), options)?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            self.presentation_rels_xml()?.as_bytes(),
            options,
        )?;
        add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML.as_bytes(), options)?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            SLIDE_MASTER_RELS.as_bytes(),
            options,
        )?;
        add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML.as_bytes(), options)?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            SLIDE_LAYOUT_RELS.as_bytes(),
            options,
        )?;
        add_part(&mut zip, "ppt/theme/theme1.xml", THEME_XML.as_bytes(), options)?;
        add_part(&mut zip, "ppt/presProps.xml", PRES_PROPS_XML.as_bytes(), options)?;
        add_part(&mut zip, "ppt/viewProps.xml", VIEW_PROPS_XML.as_bytes(), options)?;
        add_part(&mut zip, "ppt/tableStyles.xml", TABLE_STYLES_XML.as_bytes(), options)?;

        let mut media_number = 0;
        for (i, slide) in self.slides.iter().enumerate() {
            let slide_number = i + 1;

            // rId1 is the layout; images follow.
            let mut media_targets = Vec::with_capacity(slide.images.len());
            let mut image_rel_ids = Vec::with_capacity(slide.images.len());
            for (j, png) in slide.images.iter().enumerate() {
                media_number += 1;
                let name = format!("image{}.png", media_number);
                add_part(&mut zip, &format!("ppt/media/{}", name), png, stored)?;
                media_targets.push(format!("../media/{}", name));
                image_rel_ids.push(format!("rId{}", j + 2));
            }

            let xml = slide.to_xml(self.slide_width, self.slide_height, &image_rel_ids)?;
            add_part(&mut zip, &format!("ppt/slides/slide{}.xml", slide_number), xml.as_bytes(), options)?;
            add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", slide_number),
                slide_rels_xml(&media_targets)?.as_bytes(),
                options,
            )?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        log::debug!("Wrote PPTX with {} slides and {} images", self.slides.len(), media_number);
        Ok(())
    }

    fn content_types_xml(&self) -> Result<String> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "Types",
            &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
        )?;
        xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)])?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        xml.empty("Default", &[("Extension", "png"), ("ContentType", "image/png")])?;

        let overrides = [
            ("/ppt/presentation.xml", CT_PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
            ("/ppt/theme/theme1.xml", CT_THEME),
            ("/ppt/presProps.xml", CT_PRES_PROPS),
            ("/ppt/viewProps.xml", CT_VIEW_PROPS),
            ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
            ("/docProps/core.xml", CT_CORE_PROPERTIES),
            ("/docProps/app.xml", CT_EXTENDED_PROPERTIES),
        ];
        for (part, content_type) in overrides {
            xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
        }
        for i in 1..=self.slides.len() {
            let part = format!("/ppt/slides/slide{}.xml", i);
            xml.empty("Override", &[("PartName", part.as_str()), ("ContentType", CT_SLIDE)])?;
        }

        xml.end("Types")?;
        xml.into_string()
    }

    fn presentation_xml(&self) -> Result<String> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "p:presentation",
            &[
                ("xmlns:a", NS_DRAWING),
                ("xmlns:r", NS_REL),
                ("xmlns:p", NS_MAIN),
                ("saveSubsetFonts", "1"),
            ],
        )?;

        xml.start("p:sldMasterIdLst", &[])?;
        xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
        xml.end("p:sldMasterIdLst")?;

        if !self.slides.is_empty() {
            xml.start("p:sldIdLst", &[])?;
            for i in 0..self.slides.len() {
                let id = (FIRST_SLIDE_ID + i).to_string();
                let rel_id = format!("rId{}", i + 2);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
            }
            xml.end("p:sldIdLst")?;
        }

        let (cx, cy) = (self.slide_width.to_string(), self.slide_height.to_string());
        xml.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
        xml.end("p:presentation")?;
        xml.into_string()
    }

    fn presentation_rels_xml(&self) -> Result<String> {
        let mut rels = vec![(REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string())];
        for i in 1..=self.slides.len() {
            rels.push((REL_SLIDE, format!("slides/slide{}.xml", i)));
        }
        rels.push((REL_PRES_PROPS, "presProps.xml".to_string()));
        rels.push((REL_VIEW_PROPS, "viewProps.xml".to_string()));
        rels.push((REL_THEME, "theme/theme1.xml".to_string()));
        rels.push((REL_TABLE_STYLES, "tableStyles.xml".to_string()));
        relationships_xml(&rels)
    }

    fn core_props_xml(&self) -> Result<String> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        xml.text_element("dc:title", &[], &self.title)?;
        xml.text_element("dc:creator", &[], "pdfdeck")?;
        xml.end("cp:coreProperties")?;
        xml.into_string()
    }

    fn app_props_xml(&self) -> Result<String> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "Properties",
            &[(
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            )],
        )?;
        xml.text_element("Application", &[], "pdfdeck")?;
        xml.text_element("Slides", &[], &self.slides.len().to_string())?;
        xml.text_element("PresentationFormat", &[], "Widescreen")?;
        xml.end("Properties")?;
        xml.into_string()
    }
}

impl DeckAssembler for PptxDeck {
    type Slide = SlideDraft;

    fn add_slide(&mut self) -> &mut SlideDraft {
        self.slides.push(SlideDraft::new());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    data: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", path, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))?;
    Ok(())
}

fn root_rels_xml() -> Result<String> {
    relationships_xml(&[
        (REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
        (REL_CORE_PROPERTIES, "docProps/core.xml".to_string()),
        (REL_EXTENDED_PROPERTIES, "docProps/app.xml".to_string()),
    ])
}

fn slide_rels_xml(media_targets: &[String]) -> Result<String> {
    let mut rels = vec![(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string())];
    for target in media_targets {
        rels.push((REL_IMAGE, target.clone()));
    }
    relationships_xml(&rels)
}

/// A relationships part with ids `rId1..` in the given order.
fn relationships_xml(rels: &[(&str, String)]) -> Result<String> {
    let mut xml = XmlWriter::new()?;
    xml.start(
        "Relationships",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships")],
    )?;
    for (i, (rel_type, target)) in rels.iter().enumerate() {
        let id = format!("rId{}", i + 1);
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    xml.into_string()
}
