use super::font_fitter::fit_font_size;
use crate::tools::ensure_directory_exists;
use ab_glyph::{Font, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::debug;
use std::path::{Path, PathBuf};

/// 字幕圖片尺寸
pub const CANVAS_WIDTH: u32 = 980;
pub const CANVAS_HEIGHT: u32 = 170;

/// 圓角底框上下留白
const BOX_INSET_Y: u32 = 14;
const CORNER_RADIUS: u32 = 24;
const BOX_FILL: Rgba<u8> = Rgba([0, 0, 0, 150]);

/// 文字左右合計保留的寬度
const HORIZONTAL_PADDING: u32 = 70;
/// 文字相對垂直置中再往上移的像素
const TEXT_LIFT: i32 = 4;

const STROKE_WIDTH: u32 = 3;
const TEXT_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const STROKE_FILL: Rgba<u8> = Rgba([10, 10, 10, 255]);

/// 已輸出的字幕圖片
#[derive(Debug, Clone)]
pub struct RenderedCaption {
    /// 從 1 開始，對應 ffmpeg 的輸入編號
    pub index: usize,
    pub text: String,
    pub path: PathBuf,
    pub font_size: u32,
}

/// 字幕圖片的檔名（index 從 1 開始）
#[must_use]
pub fn caption_file_name(index: usize) -> String {
    format!("cap_{index}.png")
}

/// 將字幕文字繪製成半透明圓角底框的 PNG
pub struct CaptionRenderer<'a, F: Font> {
    font: &'a F,
}

impl<'a, F: Font> CaptionRenderer<'a, F> {
    pub const fn new(font: &'a F) -> Self {
        Self { font }
    }

    /// 繪製所有字幕行並寫入 `folder/cap_<n>.png`
    pub fn render_all(&self, lines: &[String], folder: &Path) -> Result<Vec<RenderedCaption>> {
        ensure_directory_exists(folder)?;

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let index = i + 1;
                let path = folder.join(caption_file_name(index));
                let (image, font_size) = self.render_image(line);

                image
                    .save(&path)
                    .with_context(|| format!("無法寫入字幕圖片: {}", path.display()))?;

                debug!(
                    "字幕 [{index}] 字型 {font_size}px -> {}: {line}",
                    path.display()
                );

                Ok(RenderedCaption {
                    index,
                    text: line.clone(),
                    path,
                    font_size,
                })
            })
            .collect()
    }

    /// 繪製單行字幕，回傳圖片與採用的字型大小
    #[must_use]
    pub fn render_image(&self, text: &str) -> (RgbaImage, u32) {
        let mut image = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 0]));

        draw_caption_box(&mut image);

        let max_width = CANVAS_WIDTH - HORIZONTAL_PADDING;
        let font_size = fit_font_size(max_width, |size| self.measure(text, size).0);
        let (text_w, text_h) = self.measure(text, font_size);

        // 外框含描邊，實際文字原點需內縮描邊寬度
        let stroke = STROKE_WIDTH as i32;
        let x = (CANVAS_WIDTH as i32 - text_w as i32) / 2 + stroke;
        let y = (CANVAS_HEIGHT as i32 - text_h as i32) / 2 - TEXT_LIFT + stroke;
        let scale = self.scale_for(font_size);

        for (dx, dy) in stroke_offsets(stroke) {
            draw_text_mut(&mut image, STROKE_FILL, x + dx, y + dy, scale, self.font, text);
        }
        draw_text_mut(&mut image, TEXT_FILL, x, y, scale, self.font, text);

        (image, font_size)
    }

    /// 量測指定字型大小下的文字外框（含兩側描邊）
    #[must_use]
    pub fn measure(&self, text: &str, font_size: u32) -> (u32, u32) {
        let (w, h) = text_size(self.scale_for(font_size), self.font, text);
        (w + 2 * STROKE_WIDTH, h + 2 * STROKE_WIDTH)
    }

    /// 以 em 大小換算 ab_glyph 的像素比例
    fn scale_for(&self, font_size: u32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size as f32 * self.font.height_unscaled() / units_per_em)
    }
}

/// 底框上下緣皆包含在內：列 `BOX_INSET_Y` 到 `CANVAS_HEIGHT - BOX_INSET_Y`
fn draw_caption_box(image: &mut RgbaImage) {
    draw_rounded_rect(
        image,
        0,
        BOX_INSET_Y,
        CANVAS_WIDTH,
        CANVAS_HEIGHT - BOX_INSET_Y + 1,
        CORNER_RADIUS,
        BOX_FILL,
    );
}

/// 描邊使用的位移（半徑內的所有整數點，不含原點）
fn stroke_offsets(radius: i32) -> Vec<(i32, i32)> {
    (-radius..=radius)
        .flat_map(|dx| (-radius..=radius).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| (dx, dy) != (0, 0) && dx * dx + dy * dy <= radius * radius)
        .collect()
}

/// 在 `[left, right) x [top, bottom)` 範圍繪製實心圓角矩形
///
/// 直接覆寫像素而非混色，重疊區域的 alpha 不會累加
fn draw_rounded_rect(
    image: &mut RgbaImage,
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
    radius: u32,
    color: Rgba<u8>,
) {
    if right <= left || bottom <= top {
        return;
    }

    let width = right - left;
    let height = bottom - top;
    let radius = radius.min((width - 1) / 2).min((height - 1) / 2);

    draw_filled_rect_mut(
        image,
        Rect::at((left + radius) as i32, top as i32).of_size(width - 2 * radius, height),
        color,
    );
    draw_filled_rect_mut(
        image,
        Rect::at(left as i32, (top + radius) as i32).of_size(width, height - 2 * radius),
        color,
    );

    let r = radius as i32;
    let (l, t) = (left as i32, top as i32);
    let (rgt, btm) = (right as i32 - 1, bottom as i32 - 1);
    for center in [(l + r, t + r), (rgt - r, t + r), (l + r, btm - r), (rgt - r, btm - r)] {
        draw_filled_circle_mut(image, center, r, color);
    }
}
