//! In-process rendering strategy.
//!
//! Loads the selected template, centers the registrant's name on the first
//! page and re-serializes the document, all inside this process. The name is
//! drawn in Helvetica-Bold so the output stays self-contained without
//! embedding a font program, and nothing date- or random-dependent is written,
//! so rendering the same name twice produces byte-identical documents.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use super::metrics;
use super::renderer::Renderer;
use super::store::TemplateStore;
use super::{CertificateError, TemplateKind};

/// Point size of the overlaid name.
const FONT_SIZE: f32 = 28.0;

/// Baseline distance below the vertical page midpoint, identical for every
/// template kind.
const BASELINE_DROP: f32 = 24.0;

/// Resource name the overlay registers its font under.
const FONT_RES_NAME: &str = "FCert";

pub struct OverlayRenderer {
    templates: Arc<TemplateStore>,
}

impl OverlayRenderer {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Renderer for OverlayRenderer {
    async fn render(
        &self,
        kind: TemplateKind,
        display_text: &str,
    ) -> Result<Vec<u8>, CertificateError> {
        let asset = self.templates.get(kind)?;
        let bytes = asset.bytes.clone();
        let text = display_text.to_owned();

        // Parsing and re-serializing the document is CPU-bound work.
        tokio::task::spawn_blocking(move || overlay_name(&bytes, &text))
            .await
            .map_err(|e| CertificateError::Render(format!("overlay task failed: {e}")))?
    }
}

/// Draw `text` centered onto the first page of `template` and return the
/// finished document. Either a complete buffer or an error, never partial
/// output.
fn overlay_name(template: &[u8], text: &str) -> Result<Vec<u8>, CertificateError> {
    let mut doc = Document::load_mem(template).map_err(CertificateError::TemplateCorrupt)?;

    let pages = doc.get_pages();
    let page_id = *pages
        .values()
        .next()
        .ok_or_else(|| CertificateError::Render("template has no pages".to_string()))?;

    let (page_width, page_height) = page_size(&doc, page_id)?;
    let text_width = metrics::text_width(text, FONT_SIZE);
    let x = ((page_width - text_width) / 2.0).max(0.0);
    let y = page_height / 2.0 - BASELINE_DROP;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    attach_font(&mut doc, page_id, font_id)?;

    let data = doc
        .get_page_content(page_id)
        .map_err(CertificateError::TemplateCorrupt)?;
    let mut content = Content::decode(&data).map_err(CertificateError::TemplateCorrupt)?;
    content.operations.extend([
        Operation::new("q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![FONT_RES_NAME.into(), FONT_SIZE.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]);
    let encoded = content
        .encode()
        .map_err(CertificateError::TemplateCorrupt)?;
    doc.change_page_content(page_id, encoded)
        .map_err(CertificateError::TemplateCorrupt)?;

    let mut out = Cursor::new(Vec::new());
    doc.save_to(&mut out)
        .map_err(|e| CertificateError::Render(format!("failed to serialize certificate: {e}")))?;
    Ok(out.into_inner())
}

/// Register the overlay font on the page, preserving whatever resources the
/// template already carries (page-local or inherited).
fn attach_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), CertificateError> {
    let mut resources = match page_attr(doc, page_id, b"Resources")? {
        Some(Object::Dictionary(d)) => d,
        _ => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .map_err(CertificateError::TemplateCorrupt)?
            .clone(),
        _ => Dictionary::new(),
    };
    fonts.set(FONT_RES_NAME, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc
        .get_object_mut(page_id)
        .and_then(|obj| obj.as_dict_mut())
        .map_err(CertificateError::TemplateCorrupt)?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Look up a page attribute, following the Pages inheritance chain and one
/// level of indirection.
fn page_attr(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>, CertificateError> {
    let mut current = page_id;
    for _ in 0..16 {
        let dict = doc
            .get_dictionary(current)
            .map_err(CertificateError::TemplateCorrupt)?;
        if let Ok(value) = dict.get(key) {
            let resolved = match value {
                Object::Reference(id) => doc
                    .get_object(*id)
                    .map_err(CertificateError::TemplateCorrupt)?
                    .clone(),
                other => other.clone(),
            };
            return Ok(Some(resolved));
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => break,
        }
    }
    Ok(None)
}

fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f32, f32), CertificateError> {
    let media_box = page_attr(doc, page_id, b"MediaBox")?
        .ok_or_else(|| CertificateError::Render("template page has no MediaBox".to_string()))?;
    let rect = media_box
        .as_array()
        .map_err(CertificateError::TemplateCorrupt)?;
    if rect.len() != 4 {
        return Err(CertificateError::Render(
            "template MediaBox is malformed".to_string(),
        ));
    }
    let mut nums = [0.0f32; 4];
    for (slot, obj) in nums.iter_mut().zip(rect.iter()) {
        *slot = number(obj)?;
    }
    Ok((nums[2] - nums[0], nums[3] - nums[1]))
}

fn number(obj: &Object) -> Result<f32, CertificateError> {
    match obj {
        Object::Integer(i) => Ok(*i as f32),
        Object::Real(r) => Ok(*r as f32),
        _ => Err(CertificateError::Render(
            "non-numeric MediaBox entry".to_string(),
        )),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::store::TemplateAsset;
    use std::collections::HashMap;

    const PAGE_W: f32 = 612.0;
    const PAGE_H: f32 = 792.0;

    fn store_with(bytes: Vec<u8>) -> Arc<TemplateStore> {
        let assets = HashMap::from([(
            TemplateKind::Day1,
            TemplateAsset {
                path: "day1.pdf".into(),
                bytes,
            },
        )]);
        Arc::new(TemplateStore::from_assets(assets))
    }

    fn renderer() -> OverlayRenderer {
        OverlayRenderer::new(store_with(test_support::blank_template(PAGE_W, PAGE_H)))
    }

    #[tokio::test]
    async fn produces_a_nonempty_parseable_document() {
        let bytes = renderer().render(TemplateKind::Day1, "Ada").await.unwrap();
        assert!(!bytes.is_empty());
        Document::load_mem(&bytes).unwrap();
    }

    #[tokio::test]
    async fn output_contains_the_overlay_text() {
        let bytes = renderer()
            .render(TemplateKind::Day1, "Mr. Ada")
            .await
            .unwrap();
        let needle = b"Mr. Ada";
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[tokio::test]
    async fn rendering_is_deterministic() {
        let r = renderer();
        let first = r.render(TemplateKind::Day1, "Ada").await.unwrap();
        let second = r.render(TemplateKind::Day1, "Ada").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn text_is_horizontally_centered() {
        let bytes = renderer().render(TemplateKind::Day1, "Ada").await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let td = content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .expect("overlay emits a Td operation");
        let x = match &td.operands[0] {
            Object::Real(r) => *r as f32,
            Object::Integer(i) => *i as f32,
            _ => panic!("Td x operand is not numeric"),
        };
        let expected = (PAGE_W - metrics::text_width("Ada", FONT_SIZE)) / 2.0;
        assert!((x - expected).abs() < 0.5, "x={x} expected={expected}");
    }

    #[tokio::test]
    async fn corrupt_template_bytes_are_reported() {
        let r = OverlayRenderer::new(store_with(b"definitely not a pdf".to_vec()));
        let err = r.render(TemplateKind::Day1, "Ada").await.unwrap_err();
        assert!(matches!(err, CertificateError::TemplateCorrupt(_)));
    }

    #[tokio::test]
    async fn missing_template_is_reported() {
        let r = OverlayRenderer::new(Arc::new(TemplateStore::from_assets(HashMap::new())));
        let err = r.render(TemplateKind::Day1, "Ada").await.unwrap_err();
        assert!(matches!(err, CertificateError::TemplateNotFound(_)));
    }
}
