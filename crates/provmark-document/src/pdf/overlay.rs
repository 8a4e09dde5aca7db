// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF overlay — stamps header, footer and a diagonal marker onto every page
// using the `lopdf` crate, then rewrites the document information dictionary.
//
// Existing page content is never touched: each page's content list becomes
// [save-state, original streams..., restore-state + overlay], so whatever
// graphics state the original leaves behind cannot leak into the overlay.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use provmark_core::error::{ProvmarkError, Result};
use tracing::{debug, info, instrument};

use crate::pdf::capability::PdfCapability;
use crate::template::PdfStamp;

/// Resource name the overlay font is registered under on each page.
const FONT_RESOURCE: &str = "PvmkF1";
/// US Letter, used when no MediaBox is found anywhere in the page tree.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];
/// Upper bound on Parent links followed when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

const EDGE_FONT_SIZE: i64 = 8;
const DIAGONAL_FONT_SIZE: i64 = 60;
const LINE_SPACING: f32 = 10.0;
const MARGIN: f32 = 20.0;

/// Watermarks PDFs in-process with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfOverlay;

impl LopdfOverlay {
    pub fn new() -> Self {
        Self
    }
}

impl PdfCapability for LopdfOverlay {
    fn name(&self) -> &str {
        "lopdf overlay"
    }

    fn available(&self) -> bool {
        true
    }

    #[instrument(skip_all, fields(bytes_len = input.len()))]
    fn watermark(&self, input: &[u8], stamp: &PdfStamp) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(input)
            .map_err(|err| ProvmarkError::PdfError(format!("failed to load PDF: {err}")))?;
        if doc.is_encrypted() {
            return Err(ProvmarkError::PdfError(
                "encrypted PDFs cannot be watermarked".into(),
            ));
        }

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(ProvmarkError::PdfError("document has no pages".into()));
        }

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

        for &page_id in &pages {
            stamp_page(&mut doc, page_id, font_id, save_id, stamp)?;
        }
        set_info(&mut doc, &stamp.metadata);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|err| ProvmarkError::PdfError(format!("failed to serialise PDF: {err}")))?;

        info!(pages = pages.len(), output_bytes = output.len(), "PDF watermarked");
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Per-page work
// ---------------------------------------------------------------------------

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    save_id: ObjectId,
    stamp: &PdfStamp,
) -> Result<()> {
    let media_box = media_box(doc, page_id);
    let resources = page_resources(doc, page_id, font_id);
    let mut contents = vec![Object::Reference(save_id)];
    contents.extend(existing_contents(doc, page_id)?);

    let overlay = overlay_content(stamp, media_box)
        .encode()
        .map_err(|err| ProvmarkError::PdfError(format!("failed to encode overlay: {err}")))?;
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|err| ProvmarkError::PdfError(format!("page {page_id:?}: {err}")))?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));

    debug!(?page_id, "page stamped");
    Ok(())
}

/// Effective resources for the page (own or inherited), copied inline with
/// the overlay font added. Shared resource objects stay unmodified.
fn page_resources(doc: &Document, page_id: ObjectId, font_id: ObjectId) -> Dictionary {
    let mut resources = match inherited(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font").ok().map(|font| resolve(doc, font)) {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));
    resources
}

/// The page's current content streams as a flat list of objects.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|err| ProvmarkError::PdfError(format!("page {page_id:?}: {err}")))?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let list = match contents {
        Object::Array(items) => items.clone(),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        other => vec![other.clone()],
    };
    Ok(list)
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(Object::Array(items)) = inherited(doc, page_id, b"MediaBox") else {
        return DEFAULT_MEDIA_BOX;
    };
    let numbers: Vec<f32> = items
        .iter()
        .filter_map(|item| number(resolve(doc, item)))
        .collect();
    match numbers.as_slice() {
        [a, b, c, d] => [a.min(*c), b.min(*d), a.max(*c), b.max(*d)],
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// Look `key` up on the page, then up its Parent chain.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    let mut current = object;
    for _ in 0..MAX_TREE_DEPTH {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => current = target,
                Err(_) => return current,
            },
            _ => return current,
        }
    }
    current
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Overlay drawing
// ---------------------------------------------------------------------------

fn overlay_content(stamp: &PdfStamp, media_box: [f32; 4]) -> Content {
    let [llx, lly, urx, ury] = media_box;
    let mut ops = vec![op("Q", vec![]), op("q", vec![])];

    let header_top = ury - MARGIN - EDGE_FONT_SIZE as f32;
    let header: Vec<(f32, &str)> = stamp
        .header_lines
        .iter()
        .enumerate()
        .map(|(i, line)| (header_top - i as f32 * LINE_SPACING, line.as_str()))
        .collect();
    text_lines(&mut ops, llx + MARGIN, &header);

    let footer_count = stamp.footer_lines.len() as f32;
    let footer_top = lly + MARGIN + (footer_count - 1.0).max(0.0) * LINE_SPACING;
    let footer: Vec<(f32, &str)> = stamp
        .footer_lines
        .iter()
        .enumerate()
        .map(|(i, line)| (footer_top - i as f32 * LINE_SPACING, line.as_str()))
        .collect();
    text_lines(&mut ops, llx + MARGIN, &footer);

    // Diagonal marker, rotated 45 degrees about the page centre.
    let (cx, cy) = ((llx + urx) / 2.0, (lly + ury) / 2.0);
    let angle = std::f32::consts::FRAC_PI_4;
    let (sin, cos) = angle.sin_cos();
    let half_width = stamp.diagonal.chars().count() as f32 * DIAGONAL_FONT_SIZE as f32 * 0.33;
    ops.extend([
        op("q", vec![]),
        op(
            "cm",
            vec![real(cos), real(sin), real(-sin), real(cos), real(cx), real(cy)],
        ),
        op("rg", vec![real(0.85), real(0.85), real(0.85)]),
        op("BT", vec![]),
        op(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.into()), Object::Integer(DIAGONAL_FONT_SIZE)],
        ),
        op("Td", vec![real(-half_width), real(0.0)]),
        op("Tj", vec![Object::string_literal(pdf_text(&stamp.diagonal))]),
        op("ET", vec![]),
        op("Q", vec![]),
        op("Q", vec![]),
    ]);

    Content { operations: ops }
}

fn text_lines(ops: &mut Vec<Operation>, x: f32, lines: &[(f32, &str)]) {
    if lines.is_empty() {
        return;
    }
    ops.push(op("BT", vec![]));
    ops.push(op(
        "Tf",
        vec![Object::Name(FONT_RESOURCE.into()), Object::Integer(EDGE_FONT_SIZE)],
    ));
    ops.push(op("rg", vec![real(0.4), real(0.4), real(0.4)]));
    for (y, line) in lines {
        ops.push(op(
            "Tm",
            vec![real(1.0), real(0.0), real(0.0), real(1.0), real(x), real(*y)],
        ));
        ops.push(op("Tj", vec![Object::string_literal(pdf_text(line))]));
    }
    ops.push(op("ET", vec![]));
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Reduce `text` to ASCII for the base-14 font.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '©' => out.push_str("(C)"),
            '®' => out.push_str("(R)"),
            '™' => out.push_str("(TM)"),
            '—' | '–' => out.push('-'),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Document information
// ---------------------------------------------------------------------------

/// Merge `metadata` over any existing Info entries.
fn set_info(doc: &mut Document, metadata: &[(String, String)]) {
    let existing = {
        let view: &Document = doc;
        match view.trailer.get(b"Info").ok().map(|obj| resolve(view, obj)) {
            Some(Object::Dictionary(dict)) => Some(dict.clone()),
            _ => None,
        }
    };
    let mut info = existing.unwrap_or_default();
    for (key, value) in metadata {
        info.set(key.as_bytes().to_vec(), text_string(value));
    }
    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));
}

/// PDF text string: literal when ASCII, otherwise UTF-16BE with a BOM.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use provmark_core::config::OrganizationInfo;
    use provmark_core::types::Timestamp;

    /// Two-page PDF with Resources and MediaBox only on the Pages node.
    fn sample_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let mut kids: Vec<Object> = Vec::new();
        for text in ["page one", "page two"] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 2,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn stamp() -> PdfStamp {
        let generated = Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        PdfStamp::new(
            &OrganizationInfo::default(),
            "provmark 0.0.0",
            "sample.pdf",
            &"a".repeat(64),
            generated,
        )
    }

    #[test]
    fn every_page_gets_the_overlay() {
        let output = LopdfOverlay::new().watermark(&sample_pdf(), &stamp()).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        for (_, page_id) in pages {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            assert!(text.contains("(PROPRIETARY) Tj"), "{text}");
            assert!(text.contains("page "), "original content kept");
            assert!(text.contains(&format!("Hash: {}...", "a".repeat(32))));
        }
    }

    #[test]
    fn inherited_resources_keep_original_fonts() {
        let output = LopdfOverlay::new().watermark(&sample_pdf(), &stamp()).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(FONT_RESOURCE.as_bytes()));
    }

    #[test]
    fn info_dictionary_is_written() {
        let output = LopdfOverlay::new().watermark(&sample_pdf(), &stamp()).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(
            info.get(b"Title").unwrap().as_str().unwrap(),
            b"Protected Document - sample.pdf"
        );
        assert_eq!(
            info.get(b"Subject").unwrap().as_str().unwrap(),
            b"IP Protected Document"
        );
    }

    #[test]
    fn garbage_input_is_a_pdf_error() {
        let err = LopdfOverlay::new().watermark(b"not a pdf", &stamp()).unwrap_err();
        assert!(matches!(err, ProvmarkError::PdfError(_)));
    }

    #[test]
    fn non_ascii_text_is_reduced_for_the_page() {
        assert_eq!(pdf_text("© 2025 Acme — ok™ ü"), "(C) 2025 Acme - ok(TM) ?");
    }

    #[test]
    fn non_ascii_metadata_uses_utf16() {
        match text_string("Acme™") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(bytes.len(), 2 + 5 * 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
