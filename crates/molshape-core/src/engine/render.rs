use super::config::RenderConfig;
use super::layout::Layout;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError, Rgb, RgbImage};
use nalgebra::Vector2;
use thiserror::Error;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BOND_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const LINE_SPACING: f64 = 4.0;
const ATOM_RADIUS: f64 = 5.0;
const DASH_LENGTH: f64 = 3.0;
/// Upper bound on the on-canvas bond length, as a fraction of the shorter
/// canvas side, so that tiny molecules are not blown up.
const MAX_BOND_FRACTION: f64 = 0.2;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Structure has no atoms to draw")]
    EmptyStructure,
    #[error("Failed to encode diagram: {0}")]
    Encoding(#[from] ImageError),
}

/// A rendered structure diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded image data.
    pub png: Vec<u8>,
}

/// Produces a 2D depiction of a parsed molecule.
pub trait DiagramRenderer: Send + Sync {
    fn render(&self, molecule: &Molecule) -> Result<Diagram, RenderError>;
}

/// Rasterizes a force-directed layout onto an RGB canvas and encodes it as PNG.
///
/// Carbon is implicit; heteroatoms (and isolated atoms) are drawn as discs in
/// their CPK color. Double and triple bonds become offset parallel lines and
/// aromatic bonds a solid line with a dashed companion.
pub struct PngRenderer {
    config: RenderConfig,
}

impl PngRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl DiagramRenderer for PngRenderer {
    fn render(&self, molecule: &Molecule) -> Result<Diagram, RenderError> {
        let layout = Layout::compute(molecule);
        let (lo, hi) = layout.bounds().ok_or(RenderError::EmptyStructure)?;

        let RenderConfig { width, height } = self.config;
        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

        let short_side = f64::from(width.min(height));
        let margin = 0.08 * short_side + ATOM_RADIUS;
        let span = hi - lo;
        let fit_x = (f64::from(width) - 2.0 * margin) / span.x.max(1e-6);
        let fit_y = (f64::from(height) - 2.0 * margin) / span.y.max(1e-6);
        let scale = fit_x.min(fit_y).min(MAX_BOND_FRACTION * short_side);

        let center = (lo.coords + hi.coords) / 2.0;
        let canvas_center = Vector2::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
        let to_canvas = |index: usize| {
            let p = (layout.positions[index].coords - center) * scale;
            Vector2::new(canvas_center.x + p.x, canvas_center.y - p.y)
        };

        for bond in &layout.bonds {
            let a = to_canvas(bond.from);
            let b = to_canvas(bond.to);
            draw_bond(&mut canvas, a, b, bond.order);
        }

        for (index, &id) in layout.atoms.iter().enumerate() {
            let Some(atom) = molecule.atom(id) else {
                continue;
            };
            let isolated = layout
                .bonds
                .iter()
                .all(|bond| bond.from != index && bond.to != index);
            if atom.element.atomic_number == 6 && !isolated {
                continue;
            }
            draw_disc(
                &mut canvas,
                to_canvas(index),
                ATOM_RADIUS,
                cpk_color(atom.element.atomic_number),
            );
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            canvas.as_raw(),
            width,
            height,
            ColorType::Rgb8.into(),
        )?;

        Ok(Diagram { width, height, png })
    }
}

fn draw_bond(canvas: &mut RgbImage, a: Vector2<f64>, b: Vector2<f64>, order: BondOrder) {
    let along = b - a;
    let normal = if along.norm() > 0.0 {
        Vector2::new(-along.y, along.x).normalize()
    } else {
        Vector2::zeros()
    };
    let line = |canvas: &mut RgbImage, offset: f64, dashed: bool| {
        let shift = normal * offset;
        draw_line(canvas, a + shift, b + shift, dashed);
    };

    match order {
        BondOrder::Single => line(canvas, 0.0, false),
        BondOrder::Double => {
            line(canvas, -LINE_SPACING / 2.0, false);
            line(canvas, LINE_SPACING / 2.0, false);
        }
        BondOrder::Triple => {
            for offset in [-LINE_SPACING, 0.0, LINE_SPACING] {
                line(canvas, offset, false);
            }
        }
        BondOrder::Quadruple => {
            for offset in [-1.5, -0.5, 0.5, 1.5] {
                line(canvas, offset * LINE_SPACING, false);
            }
        }
        BondOrder::Aromatic => {
            line(canvas, 0.0, false);
            line(canvas, LINE_SPACING, true);
        }
    }
}

/// Samples the segment at half-pixel steps and stamps a 2×2 brush.
fn draw_line(canvas: &mut RgbImage, from: Vector2<f64>, to: Vector2<f64>, dashed: bool) {
    let length = (to - from).norm();
    let steps = (length * 2.0).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        if dashed && ((t * length / DASH_LENGTH) as usize) % 2 == 1 {
            continue;
        }
        let point = from + (to - from) * t;
        for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            put_pixel(canvas, point.x - 0.5 + dx, point.y - 0.5 + dy, BOND_COLOR);
        }
    }
}

fn draw_disc(canvas: &mut RgbImage, center: Vector2<f64>, radius: f64, color: Rgb<u8>) {
    let reach = radius.ceil() as i64;
    let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);
    for y in (cy - reach)..=(cy + reach) {
        for x in (cx - reach)..=(cx + reach) {
            let (fx, fy) = (x as f64 - center.x, y as f64 - center.y);
            if fx * fx + fy * fy <= radius * radius {
                put_pixel(canvas, x as f64, y as f64, color);
            }
        }
    }
}

fn put_pixel(canvas: &mut RgbImage, x: f64, y: f64, color: Rgb<u8>) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}

fn cpk_color(atomic_number: u8) -> Rgb<u8> {
    match atomic_number {
        0 => Rgb([150, 150, 150]),
        1 => Rgb([200, 200, 200]),
        6 => Rgb([60, 60, 60]),
        7 => Rgb([48, 80, 248]),
        8 => Rgb([255, 13, 13]),
        9 | 17 => Rgb([31, 240, 31]),
        15 => Rgb([255, 128, 0]),
        16 => Rgb([230, 200, 40]),
        35 => Rgb([166, 41, 41]),
        53 => Rgb([148, 0, 148]),
        _ => Rgb([221, 119, 255]),
    }
}
