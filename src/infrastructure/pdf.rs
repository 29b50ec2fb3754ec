//! PDF 生成与编辑
//!
//! HTML 渲染借用浏览器的打印能力，图片叠加用 lopdf 直接改写 PDF

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use lopdf::{Document, ObjectId};
use tracing::debug;

use crate::error::{AppResult, PdfError};

/// US Letter，页面没有声明 MediaBox 时使用
const FALLBACK_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// PDF 工具
#[async_trait]
pub trait PdfToolkit: Send + Sync {
    /// 把一段 HTML 渲染成 PDF 文件
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()>;

    /// 把图片作为整页水印叠加到 PDF 上，原地覆盖
    async fn overlay_image(&self, pdf: &Path, image: &Path) -> AppResult<()>;
}

/// 用一个独立的浏览器页面渲染回执
pub struct ChromePdfToolkit {
    render_page: Page,
}

impl ChromePdfToolkit {
    pub fn new(render_page: Page) -> Self {
        Self { render_page }
    }
}

#[async_trait]
impl PdfToolkit for ChromePdfToolkit {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()> {
        let document = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            html
        );
        let render_failed = |e: chromiumoxide::error::CdpError| PdfError::RenderFailed {
            path: output.to_path_buf(),
            source: Box::new(e),
        };

        self.render_page
            .set_content(document)
            .await
            .map_err(render_failed)?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        self.render_page
            .save_pdf(params, output)
            .await
            .map_err(render_failed)?;

        debug!("回执已渲染: {}", output.display());
        Ok(())
    }

    async fn overlay_image(&self, pdf: &Path, image: &Path) -> AppResult<()> {
        let pdf = pdf.to_path_buf();
        let image = image.to_path_buf();
        tokio::task::spawn_blocking(move || overlay_image_blocking(&pdf, &image)).await??;
        Ok(())
    }
}

fn overlay_image_blocking(pdf: &Path, image: &Path) -> AppResult<()> {
    let overlay_failed = |e: lopdf::Error| PdfError::OverlayFailed {
        path: pdf.to_path_buf(),
        source: Box::new(e),
    };

    let mut doc = Document::load(pdf).map_err(overlay_failed)?;
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    for page_id in pages {
        let stream = lopdf::xobject::image(image).map_err(overlay_failed)?;
        let image_size = (
            stream.dict.get(b"Width").and_then(|o| o.as_float()).unwrap_or(1.0),
            stream.dict.get(b"Height").and_then(|o| o.as_float()).unwrap_or(1.0),
        );
        let page_size = page_size(&doc, page_id);
        let (position, size) = fit_centered(image_size, page_size);
        doc.insert_image(page_id, stream, position, size)
            .map_err(overlay_failed)?;
    }

    doc.save(pdf).map_err(|e| PdfError::OverlayFailed {
        path: pdf.to_path_buf(),
        source: Box::new(e),
    })?;
    debug!("截图已嵌入: {}", pdf.display());
    Ok(())
}

/// 读取页面 MediaBox 的宽高
fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let media_box = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(|obj| obj.as_array());

    match media_box {
        Ok(values) if values.len() == 4 => {
            let coords: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
            if coords.len() == 4 {
                (coords[2] - coords[0], coords[3] - coords[1])
            } else {
                FALLBACK_PAGE_SIZE
            }
        }
        _ => FALLBACK_PAGE_SIZE,
    }
}

/// 保持宽高比把图片缩放到页面内并居中，返回 (左下角位置, 尺寸)
fn fit_centered(image: (f32, f32), page: (f32, f32)) -> ((f32, f32), (f32, f32)) {
    let (image_w, image_h) = (image.0.max(1.0), image.1.max(1.0));
    let scale = (page.0 / image_w).min(page.1 / image_h);
    let (w, h) = (image_w * scale, image_h * scale);
    (((page.0 - w) / 2.0, (page.1 - h) / 2.0), (w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;
    use lopdf::{dictionary, Object, Stream};

    /// 只有一页、内容为空的 PDF
    fn one_page_pdf(path: &Path, media_box: Option<[i64; 4]>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if let Some(coords) = media_box {
            page.set(
                "MediaBox",
                coords.iter().map(|&c| Object::Integer(c)).collect::<Vec<_>>(),
            );
        }
        let page_id = doc.add_object(page);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn screenshot(path: &Path) {
        image::RgbImage::from_pixel(4, 2, image::Rgb([200, 30, 30]))
            .save(path)
            .unwrap();
    }

    /// 第一页上 `cm` 操作的六个参数
    fn placement(doc: &Document) -> Vec<f32> {
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .unwrap()
            .operands
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect()
    }

    #[test]
    fn overlay_embeds_the_image_into_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("receipt_1.pdf");
        let png = dir.path().join("robot_1.png");
        one_page_pdf(&pdf, Some([0, 0, 600, 800]));
        screenshot(&png);
        let before = std::fs::read(&pdf).unwrap();

        overlay_image_blocking(&pdf, &png).unwrap();

        assert_ne!(std::fs::read(&pdf).unwrap(), before);
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["receipt_1.pdf", "robot_1.png"]);

        let doc = Document::load(&pdf).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        assert_eq!(doc.get_page_images(page_id).unwrap().len(), 1);
        assert_eq!(placement(&doc), [600.0, 0.0, 0.0, 300.0, 0.0, 250.0]);
    }

    #[test]
    fn page_without_media_box_uses_letter_size() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("receipt_2.pdf");
        let png = dir.path().join("robot_2.png");
        one_page_pdf(&pdf, None);
        screenshot(&png);

        overlay_image_blocking(&pdf, &png).unwrap();

        let doc = Document::load(&pdf).unwrap();
        assert_eq!(placement(&doc), [612.0, 0.0, 0.0, 306.0, 0.0, 243.0]);
    }

    #[test]
    fn missing_pdf_is_an_overlay_error() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("robot_3.png");
        screenshot(&png);

        let err = overlay_image_blocking(&dir.path().join("nope.pdf"), &png).unwrap_err();

        assert!(matches!(
            err,
            crate::error::AppError::Pdf(PdfError::OverlayFailed { .. })
        ));
    }

    #[test]
    fn wide_image_fills_page_width() {
        let ((x, y), (w, h)) = fit_centered((200.0, 100.0), (600.0, 800.0));
        assert_eq!((x, w), (0.0, 600.0));
        assert_eq!(h, 300.0);
        assert_eq!(y, 250.0);
    }

    #[test]
    fn tall_image_fills_page_height() {
        let ((x, y), (w, h)) = fit_centered((100.0, 400.0), (600.0, 800.0));
        assert_eq!((y, h), (0.0, 800.0));
        assert_eq!(w, 200.0);
        assert_eq!(x, 200.0);
    }
}
