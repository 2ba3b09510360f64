//! Ground surface queries.
//!
//! The planner never inspects terrain directly. It asks a [`SurfaceQuery`]
//! for the first walkable hit of a downward ray above a candidate column.
use glam::{Vec2, Vec3};

/// First walkable intersection of a downward ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub position: Vec3,
}

impl SurfacePoint {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Downward ray query against the walkable ground.
pub trait SurfaceQuery {
    /// Casts a ray straight down at column `(x, z)`, starting at height
    /// `search_height_above` and travelling `search_depth` units. Returns the
    /// first walkable hit, or `None` when the ray finds no surface.
    fn query(
        &self,
        x: f32,
        z: f32,
        search_height_above: f32,
        search_depth: f32,
    ) -> Option<SurfacePoint>;
}

impl<S: SurfaceQuery + ?Sized> SurfaceQuery for &S {
    #[inline]
    fn query(&self, x: f32, z: f32, from: f32, depth: f32) -> Option<SurfacePoint> {
        (**self).query(x, z, from, depth)
    }
}

/// Returns `Some(hit)` when `height` lies within the ray's span.
#[inline]
fn hit_within_ray(x: f32, z: f32, height: f32, from: f32, depth: f32) -> Option<SurfacePoint> {
    (height <= from && height >= from - depth).then(|| SurfacePoint::new(Vec3::new(x, height, z)))
}

/// Infinite flat ground at a fixed height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatSurface {
    pub height: f32,
}

impl FlatSurface {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl SurfaceQuery for FlatSurface {
    fn query(&self, x: f32, z: f32, from: f32, depth: f32) -> Option<SurfacePoint> {
        hit_within_ray(x, z, self.height, from, depth)
    }
}

/// Regular grid of cell heights on the x/z plane. `None` cells are holes.
///
/// Each cell covers `[origin + i * cell_size, origin + (i + 1) * cell_size)`
/// and reports a constant height. Columns outside the grid miss.
#[derive(Clone, Debug)]
pub struct HeightfieldSurface {
    /// World-space x/z of the grid's lower corner.
    pub origin: Vec2,
    /// Cell edge length in world units.
    pub cell_size: f32,
    /// Cells along x.
    pub width: usize,
    /// Cells along z.
    pub depth: usize,
    heights: Vec<Option<f32>>,
}

impl HeightfieldSurface {
    /// Creates a grid where every cell is a hole.
    pub fn new(origin: Vec2, cell_size: f32, width: usize, depth: usize) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be > 0");
        Self {
            origin,
            cell_size,
            width,
            depth,
            heights: vec![None; width * depth],
        }
    }

    /// Creates a grid centered on the origin and fills every cell from `f(center_of_cell)`.
    pub fn from_fn(
        extent: f32,
        cell_size: f32,
        mut f: impl FnMut(Vec2) -> Option<f32>,
    ) -> Self {
        let cells = (extent / cell_size).ceil().max(1.0) as usize;
        let origin = Vec2::splat(-(cells as f32) * cell_size * 0.5);
        let mut surface = Self::new(origin, cell_size, cells, cells);
        for iz in 0..cells {
            for ix in 0..cells {
                let center = origin + (Vec2::new(ix as f32, iz as f32) + 0.5) * cell_size;
                surface.set(ix, iz, f(center));
            }
        }
        surface
    }

    pub fn set(&mut self, ix: usize, iz: usize, height: Option<f32>) {
        if ix < self.width && iz < self.depth {
            self.heights[iz * self.width + ix] = height;
        }
    }

    pub fn get(&self, ix: usize, iz: usize) -> Option<f32> {
        if ix < self.width && iz < self.depth {
            self.heights[iz * self.width + ix]
        } else {
            None
        }
    }

    /// Cell indices containing world column `(x, z)`, if inside the grid.
    pub fn cell_at(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let fx = ((x - self.origin.x) / self.cell_size).floor();
        let fz = ((z - self.origin.y) / self.cell_size).floor();
        if fx < 0.0 || fz < 0.0 {
            return None;
        }
        let (ix, iz) = (fx as usize, fz as usize);
        (ix < self.width && iz < self.depth).then_some((ix, iz))
    }

    /// Fraction of cells that have ground.
    pub fn coverage(&self) -> f32 {
        if self.heights.is_empty() {
            return 0.0;
        }
        let solid = self.heights.iter().filter(|h| h.is_some()).count();
        solid as f32 / self.heights.len() as f32
    }
}

impl SurfaceQuery for HeightfieldSurface {
    fn query(&self, x: f32, z: f32, from: f32, depth: f32) -> Option<SurfacePoint> {
        let (ix, iz) = self.cell_at(x, z)?;
        let height = self.get(ix, iz)?;
        hit_within_ray(x, z, height, from, depth)
    }
}

/// Adapter that answers queries with a closure.
pub struct FnSurface<F>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    f: F,
}

impl<F> FnSurface<F>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    /// Wraps `f(x, z) -> Option<height>`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SurfaceQuery for FnSurface<F>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    fn query(&self, x: f32, z: f32, from: f32, depth: f32) -> Option<SurfacePoint> {
        let height = (self.f)(x, z)?;
        hit_within_ray(x, z, height, from, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_surface_hits_within_ray_span() {
        let s = FlatSurface::new(0.0);
        let hit = s.query(3.0, -4.0, 10.0, 20.0).expect("hit");
        assert_eq!(hit.position, Vec3::new(3.0, 0.0, -4.0));
    }

    #[test]
    fn flat_surface_misses_out_of_span() {
        let s = FlatSurface::new(-15.0);
        assert!(s.query(0.0, 0.0, 10.0, 20.0).is_none());
        let above = FlatSurface::new(12.0);
        assert!(above.query(0.0, 0.0, 10.0, 20.0).is_none());
    }

    #[test]
    fn heightfield_reports_holes_and_bounds() {
        let mut hf = HeightfieldSurface::new(Vec2::new(-2.0, -2.0), 1.0, 4, 4);
        hf.set(0, 0, Some(1.5));
        assert_eq!(hf.cell_at(-1.5, -1.5), Some((0, 0)));
        assert_eq!(
            hf.query(-1.5, -1.5, 10.0, 20.0).map(|p| p.position.y),
            Some(1.5)
        );
        assert!(hf.query(0.5, 0.5, 10.0, 20.0).is_none());
        assert!(hf.query(5.0, 0.0, 10.0, 20.0).is_none());
        assert!(hf.query(-3.0, 0.0, 10.0, 20.0).is_none());
    }

    #[test]
    fn heightfield_from_fn_covers_extent() {
        let hf = HeightfieldSurface::from_fn(10.0, 1.0, |p| (p.x > 0.0).then_some(0.0));
        assert_eq!(hf.width, 10);
        assert!((hf.coverage() - 0.5).abs() < 1e-6);
        assert!(hf.query(2.5, 0.0, 10.0, 20.0).is_some());
        assert!(hf.query(-2.5, 0.0, 10.0, 20.0).is_none());
    }

    #[test]
    fn fn_surface_forwards_to_closure() {
        let s = FnSurface::new(|x, _z| (x < 0.0).then_some(2.0));
        assert!(s.query(1.0, 0.0, 10.0, 20.0).is_none());
        assert_eq!(s.query(-1.0, 0.0, 10.0, 20.0).unwrap().position.y, 2.0);
    }
}
