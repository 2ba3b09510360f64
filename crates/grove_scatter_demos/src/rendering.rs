use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use grove_scatter::prelude::{Category, ExcludedZone, PlacedItem, SurfaceQuery};
use image::{Rgb, RgbImage};

/// Filled circle drawn per item.
#[derive(Debug, Clone, Copy)]
pub struct ItemStyle {
    pub color: [u8; 3],
    /// Radius in pixels.
    pub radius: i32,
}

/// Output image and the square world region (centered on the origin) it shows.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub world_extent: f32,
    pub background: [u8; 3],
    pub hole_color: [u8; 3],
    pub zone_color: [u8; 3],
    styles: HashMap<Category, ItemStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), world_extent: f32) -> Self {
        let styles = HashMap::from([
            (Category::Grass, style([120, 190, 90], 2)),
            (Category::Bush, style([60, 140, 60], 4)),
            (Category::Rock, style([150, 150, 155], 4)),
            (Category::Tree, style([30, 90, 40], 7)),
            (Category::Seed, style([230, 200, 60], 4)),
        ]);
        Self {
            image_size,
            world_extent,
            background: [96, 78, 56],
            hole_color: [20, 20, 28],
            zone_color: [220, 60, 60],
            styles,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn set_style(&mut self, category: Category, style: ItemStyle) {
        self.styles.insert(category, style);
    }

    fn style_for(&self, category: Category) -> ItemStyle {
        self.styles
            .get(&category)
            .copied()
            .unwrap_or(style([255, 255, 255], 2))
    }

    fn to_pixel(&self, p: Vec3) -> (i32, i32) {
        let (w, h) = self.image_size;
        let u = p.x / self.world_extent + 0.5;
        let v = 0.5 - p.z / self.world_extent;
        ((u * w as f32) as i32, (v * h as f32) as i32)
    }

    fn to_world(&self, px: u32, py: u32) -> (f32, f32) {
        let (w, h) = self.image_size;
        let x = ((px as f32 + 0.5) / w as f32 - 0.5) * self.world_extent;
        let z = (0.5 - (py as f32 + 0.5) / h as f32) * self.world_extent;
        (x, z)
    }
}

fn style(color: [u8; 3], radius: i32) -> ItemStyle {
    ItemStyle { color, radius }
}

/// What to draw.
pub struct Scene<'a> {
    pub items: &'a [PlacedItem],
    pub zones: &'a [ExcludedZone],
    /// When set, columns without ground are drawn as holes.
    pub ground: Option<&'a dyn SurfaceQuery>,
}

pub fn render_scene_to_png(
    scene: &Scene<'_>,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));

    if let Some(ground) = scene.ground {
        for py in 0..h {
            for px in 0..w {
                let (x, z) = rc.to_world(px, py);
                if ground.query(x, z, 10.0, 20.0).is_none() {
                    img.put_pixel(px, py, Rgb(rc.hole_color));
                }
            }
        }
    }

    let px_per_unit = w as f32 / rc.world_extent;
    for zone in scene.zones {
        let (cx, cy) = rc.to_pixel(zone.center);
        draw_ring(&mut img, cx, cy, (zone.radius * px_per_unit) as i32, rc.zone_color);
    }

    for item in scene.items {
        let s = rc.style_for(item.category);
        let (cx, cy) = rc.to_pixel(item.position);
        let r = ((s.radius as f32) * item.scale).round() as i32;
        draw_disk(&mut img, cx, cy, r.max(1), s.color);
    }

    img.save(path)?;
    Ok(())
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn draw_disk(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: [u8; 3]) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_ring(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: [u8; 3]) {
    let inner = (r - 1).max(0);
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = dx * dx + dy * dy;
            if d2 <= r * r && d2 >= inner * inner {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}
