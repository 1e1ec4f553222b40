// Image previews rendered as half-block character art, with zoom and center cropping

use crate::tui::zoom::DEFAULT_ZOOM_PERCENT;
use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::io;
use std::path::Path;

/// Viewport width in terminal columns
pub const VIEWPORT_WIDTH: u32 = 160;
/// Viewport height in image pixels; two pixels share one terminal row
pub const VIEWPORT_HEIGHT: u32 = 100;

/// A rendered preview ready to draw
#[derive(Debug, Clone)]
pub struct PreviewContent {
    pub lines: Vec<Line<'static>>,
    /// Size of the source image in pixels
    pub dimensions: (u32, u32),
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        // Image is smaller than max dimensions, don't upscale
        (original_width, original_height)
    } else {
        let new_width = (original_width as f64 * ratio) as u32;
        let new_height = (original_height as f64 * ratio) as u32;
        (new_width, new_height)
    }
}

/// Dimensions of the image at `zoom_percent`.
///
/// The default zoom shows the image fitted to the viewport; other levels scale
/// that fitted size proportionally. Never returns a zero side for a non-empty image.
pub fn zoomed_dimensions(
    original_width: u32,
    original_height: u32,
    zoom_percent: u16,
) -> (u32, u32) {
    let (fit_width, fit_height) = calculate_resize_dimensions(
        original_width,
        original_height,
        VIEWPORT_WIDTH,
        VIEWPORT_HEIGHT,
    );
    if fit_width == 0 || fit_height == 0 {
        return (0, 0);
    }

    let scale = zoom_percent as f64 / DEFAULT_ZOOM_PERCENT as f64;
    let width = ((fit_width as f64 * scale).round() as u32).max(1);
    let height = ((fit_height as f64 * scale).round() as u32).max(1);
    (width, height)
}

/// Resizes to `width`×`height` and keeps the centered part that fits the viewport
pub fn zoom_and_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let resized = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    if width <= VIEWPORT_WIDTH && height <= VIEWPORT_HEIGHT {
        return resized;
    }

    let crop_width = width.min(VIEWPORT_WIDTH);
    let crop_height = height.min(VIEWPORT_HEIGHT);
    let x = (width - crop_width) / 2;
    let y = (height - crop_height) / 2;
    resized.crop_imm(x, y, crop_width, crop_height)
}

/// Converts an image to styled lines using half-block characters for terminal display.
/// Uses the upper half block character (▀) with foreground color for the upper pixel
/// and background color for the lower pixel, effectively displaying 2 pixels per cell.
/// The image is drawn at its own size.
pub fn image_to_halfblock_lines(img: &DynamicImage) -> Vec<Line<'static>> {
    let img = img.to_rgb8();
    let (width, height) = img.dimensions();

    let term_height = height.div_ceil(2);
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);

        for x in 0..width {
            let upper_pixel = img.get_pixel(x, upper_y).to_rgb();
            let lower_pixel = if lower_y < height {
                img.get_pixel(x, lower_y).to_rgb()
            } else {
                upper_pixel
            };

            let style = Style::default()
                .fg(Color::Rgb(upper_pixel[0], upper_pixel[1], upper_pixel[2]))
                .bg(Color::Rgb(lower_pixel[0], lower_pixel[1], lower_pixel[2]));

            spans.push(Span::styled("▀", style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Generates the preview for an image file at the given zoom level
pub fn generate_image_preview(path: &Path, zoom_percent: u16) -> io::Result<PreviewContent> {
    let img = load_image(path)?;
    let (original_width, original_height) = img.dimensions();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let info_style = Style::default().fg(Color::Gray);

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(vec![
            Span::styled("Image: ", header_style),
            Span::styled(name, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("Dimensions: {}×{} px", original_width, original_height),
                info_style,
            ),
            Span::raw("  "),
            Span::styled(format!("Zoom: {}%", zoom_percent), info_style),
        ]),
        Line::from(""),
    ];

    let (width, height) = zoomed_dimensions(original_width, original_height, zoom_percent);
    if width > 0 && height > 0 {
        let view = zoom_and_crop(&img, width, height);
        lines.extend(image_to_halfblock_lines(&view));
    }

    Ok(PreviewContent {
        lines,
        dimensions: (original_width, original_height),
    })
}
