//! Reads generated decks back for verification in tests.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A text shape found on a slide.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ShapeText {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub font_size: Option<i64>,
    pub color: Option<String>,
}

/// What a slide part contains.
#[derive(Debug, Default)]
pub(crate) struct SlideSummary {
    pub pictures: usize,
    pub image_targets: Vec<String>,
    pub texts: Vec<ShapeText>,
}

/// Read every slide of a deck in presentation order.
pub(crate) fn read_deck<R: Read + Seek>(reader: R) -> Vec<SlideSummary> {
    let mut archive = ZipArchive::new(reader).expect("deck is a zip archive");
    let rels = read_file(&mut archive, "ppt/_rels/presentation.xml.rels");

    let mut slides: Vec<(usize, String)> = Vec::new();
    let mut xml = Reader::from_str(&rels);
    xml.trim_text(true);
    loop {
        match xml.read_event().expect("valid rels") {
            Event::Empty(ref e) if e.name().as_ref() == b"Relationship" => {
                let mut rel_type = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }
                if rel_type.ends_with("/slide") {
                    let number = extract_slide_number(&target).expect("numbered slide");
                    slides.push((number, format!("ppt/{}", target)));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    slides.sort();

    slides
        .into_iter()
        .map(|(number, path)| {
            let content = read_file(&mut archive, &path);
            let rels_path = format!("ppt/slides/_rels/slide{}.xml.rels", number);
            let mut summary = parse_slide(&content);
            summary.image_targets = image_targets(&read_file(&mut archive, &rels_path));
            summary
        })
        .collect()
}

fn parse_slide(xml_content: &str) -> SlideSummary {
    let mut summary = SlideSummary::default();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut current: Option<ShapeText> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().expect("valid slide xml") {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"pic" => summary.pictures += 1,
                b"t" => in_text = true,
                b"rPr" => read_run_props(e, current.as_mut()),
                _ => {}
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                b"off" => {
                    if let Some(ref mut shape) = current {
                        for attr in e.attributes().flatten() {
                            let value = String::from_utf8_lossy(&attr.value).parse().unwrap_or(0);
                            match attr.key.as_ref() {
                                b"x" => shape.x = value,
                                b"y" => shape.y = value,
                                _ => {}
                            }
                        }
                    }
                }
                b"srgbClr" => {
                    if let Some(ref mut shape) = current {
                        if shape.font_size.is_some() && shape.color.is_none() {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"val" {
                                    shape.color = Some(String::from_utf8_lossy(&attr.value).to_string());
                                }
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                if let Some(ref mut shape) = current {
                    shape.text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"sp" => {
                    if let Some(shape) = current.take() {
                        summary.texts.push(shape);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    summary
}

fn read_run_props(e: &quick_xml::events::BytesStart, shape: Option<&mut ShapeText>) {
    if let Some(shape) = shape {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"sz" {
                shape.font_size = String::from_utf8_lossy(&attr.value).parse().ok();
            }
        }
    }
}

fn image_targets(rels: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut reader = Reader::from_str(rels);
    loop {
        match reader.read_event().expect("valid rels") {
            Event::Empty(ref e) if e.name().as_ref() == b"Relationship" => {
                let mut is_image = false;
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => is_image = attr.value.ends_with(b"/image"),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }
                if is_image {
                    targets.push(target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    targets
}

pub(crate) fn read_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> String {
    let mut file = archive
        .by_name(path)
        .unwrap_or_else(|e| panic!("missing part '{}': {}", path, e));
    let mut content = String::new();
    file.read_to_string(&mut content).expect("readable part");
    content
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}

#[test]
fn test_extract_slide_number() {
    assert_eq!(extract_slide_number("slides/slide1.xml"), Some(1));
    assert_eq!(extract_slide_number("slides/slide123.xml"), Some(123));
    assert_eq!(extract_slide_number("nodigits"), None);
}

#[test]
fn test_local_name() {
    assert_eq!(local_name(b"p:sp"), b"sp");
    assert_eq!(local_name(b"sp"), b"sp");
}
