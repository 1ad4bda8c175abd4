// src/render.rs
use image::{Rgb, RgbImage};

use crate::raster::Raster;

/// One entry of the joint-mask legend; label text is drawn by the
/// dashboard, the core only supplies the pairing of label and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: [u8; 3],
}

/// Legend for the three joint-mask codes, indexed by code.
pub const MASK_LEGEND: [LegendEntry; 3] = [
    LegendEntry {
        label: "Non-Veg",
        color: [200, 30, 30],
    },
    LegendEntry {
        label: "Healthy",
        color: [30, 160, 30],
    },
    LegendEntry {
        label: "Potential Stress",
        color: [30, 60, 200],
    },
];

fn lerp(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Red-yellow-green ramp over [0,1], low values red, high values green.
pub fn heatmap_color(value: f32) -> [u8; 3] {
    const LOW: [u8; 3] = [215, 25, 28];
    const MID: [u8; 3] = [255, 255, 191];
    const HIGH: [u8; 3] = [26, 150, 65];

    let t = value.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp(LOW, MID, t * 2.0)
    } else {
        lerp(MID, HIGH, (t - 0.5) * 2.0)
    }
}

pub fn mask_color(code: u8) -> [u8; 3] {
    MASK_LEGEND[(code as usize).min(MASK_LEGEND.len() - 1)].color
}

/// Renders a [0,1] raster through the heatmap ramp.
pub fn render_heatmap(raster: &Raster) -> RgbImage {
    RgbImage::from_fn(raster.width() as u32, raster.height() as u32, |x, y| {
        Rgb(heatmap_color(raster.get(x as usize, y as usize)))
    })
}

/// Renders a joint mask through the legend palette.
pub fn render_mask(mask: &[u8], width: usize, height: usize) -> RgbImage {
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb(mask_color(mask[y as usize * width + x as usize]))
    })
}

const HISTOGRAM_BINS: usize = 50;

fn bin_counts(values: &[f32]) -> [usize; HISTOGRAM_BINS] {
    let mut counts = [0usize; HISTOGRAM_BINS];
    for &v in values {
        let bin = ((v.clamp(0.0, 1.0) * HISTOGRAM_BINS as f32) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }
    counts
}

fn blend(base: Rgb<u8>, over: [u8; 3]) -> Rgb<u8> {
    let mix = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    Rgb([
        mix(base.0[0], over[0]),
        mix(base.0[1], over[1]),
        mix(base.0[2], over[2]),
    ])
}

/// Overlaid 50-bin histogram of both index distributions in the [0,1]
/// domain, with dashed vertical markers at the two joint thresholds.
/// NDVI bars are green, VARI bars orange; overlap blends.
pub fn render_histogram(
    ndvi_values: &[f32],
    vari_values: &[f32],
    ndvi_threshold: f32,
    vari_threshold: f32,
    width: u32,
    height: u32,
) -> RgbImage {
    const NDVI_COLOR: [u8; 3] = [34, 139, 34];
    const VARI_COLOR: [u8; 3] = [255, 140, 0];
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    let ndvi_counts = bin_counts(ndvi_values);
    let vari_counts = bin_counts(vari_values);
    let max_count = ndvi_counts
        .iter()
        .chain(vari_counts.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    let mut img = RgbImage::from_pixel(width, height, WHITE);
    let bar_height =
        |count: usize| ((count as f64 / max_count as f64) * height as f64).round() as u32;

    for x in 0..width {
        let bin = ((x as usize * HISTOGRAM_BINS) / width as usize).min(HISTOGRAM_BINS - 1);
        let ndvi_h = bar_height(ndvi_counts[bin]);
        let vari_h = bar_height(vari_counts[bin]);
        for y in 0..height {
            // Bars grow upward from the bottom edge.
            let from_bottom = height - y;
            let mut pixel = WHITE;
            if from_bottom <= ndvi_h {
                pixel = blend(pixel, NDVI_COLOR);
            }
            if from_bottom <= vari_h {
                pixel = blend(pixel, VARI_COLOR);
            }
            img.put_pixel(x, y, pixel);
        }
    }

    let marker = |img: &mut RgbImage, threshold: f32, color: [u8; 3]| {
        let x = ((threshold.clamp(0.0, 1.0) * (width - 1) as f32).round()) as u32;
        for y in 0..height {
            if y % 6 < 3 {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    };
    marker(&mut img, ndvi_threshold, NDVI_COLOR);
    marker(&mut img, vari_threshold, VARI_COLOR);

    img
}

const GUTTER: u32 = 8;
const SWATCH: u32 = 10;

/// Stitches the three panels side by side on a white canvas and draws the
/// legend color swatches under the first panel.
pub fn composite(panels: &[&RgbImage], legend: &[LegendEntry]) -> RgbImage {
    let panel_width: u32 = panels.iter().map(|p| p.width() + GUTTER).sum::<u32>() + GUTTER;
    let panel_height = panels.iter().map(|p| p.height()).max().unwrap_or(0);
    let legend_height = SWATCH + 2 * GUTTER;
    let mut canvas = RgbImage::from_pixel(
        panel_width,
        GUTTER + panel_height + legend_height,
        Rgb([255, 255, 255]),
    );

    let mut offset_x = GUTTER;
    for panel in panels {
        for (x, y, pixel) in panel.enumerate_pixels() {
            canvas.put_pixel(offset_x + x, GUTTER + y, *pixel);
        }
        offset_x += panel.width() + GUTTER;
    }

    let swatch_y = GUTTER + panel_height + GUTTER;
    for (i, entry) in legend.iter().enumerate() {
        let start_x = GUTTER + i as u32 * (SWATCH + GUTTER);
        for dy in 0..SWATCH {
            for dx in 0..SWATCH {
                let x = start_x + dx;
                if x < canvas.width() && swatch_y + dy < canvas.height() {
                    canvas.put_pixel(x, swatch_y + dy, Rgb(entry.color));
                }
            }
        }
    }

    canvas
}
