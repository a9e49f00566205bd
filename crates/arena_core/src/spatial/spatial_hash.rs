//! Uniform spatial hash on the X/Z plane
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! The grid is rebuilt from scratch every processed frame, so it never has to
//! support removal or relocation of individual entries.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// Integer cell coordinate `(floor(x / cell_size), floor(z / cell_size))`
pub type CellKey = (i32, i32);

/// Spatial hash grid bucketing handles of type `T` by cell
pub struct SpatialHashGrid<T> {
    cell_size: f32,
    cells: FxHashMap<CellKey, Vec<T>>,
    inserted: FxHashSet<T>,
    /// Lowest and highest occupied cell on each axis
    bounds: Option<(CellKey, CellKey)>,
}

impl<T: Copy + Eq + Hash> SpatialHashGrid<T> {
    /// Create an empty grid; non-positive or non-finite sizes fall back to 1.0
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            cells: FxHashMap::default(),
            inserted: FxHashSet::default(),
            bounds: None,
        }
    }

    /// Edge length of one cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a point
    pub fn cell_key(&self, x: f32, z: f32) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Remove every entry (start of a rebuild)
    pub fn clear(&mut self) {
        self.cells.clear();
        self.inserted.clear();
        self.bounds = None;
    }

    /// Insert a handle at a point
    ///
    /// Returns `false` without touching the grid when the point is not finite
    /// or the handle was already inserted since the last `clear`.
    pub fn insert(&mut self, handle: T, x: f32, z: f32) -> bool {
        if !(x.is_finite() && z.is_finite()) {
            return false;
        }
        if !self.inserted.insert(handle) {
            return false;
        }
        let key = self.cell_key(x, z);
        self.cells.entry(key).or_default().push(handle);
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (
                (lo.0.min(key.0), lo.1.min(key.1)),
                (hi.0.max(key.0), hi.1.max(key.1)),
            ),
            None => (key, key),
        });
        true
    }

    /// Handles in the square block of cells covering `radius` around a point
    ///
    /// The block spans `ceil(radius / cell_size)` cells in each direction, so
    /// it can return handles outside the true circle. Callers filter with
    /// their own narrow phase. Cells are visited in `(x, z)` order and
    /// handles within a cell in insertion order.
    ///
    /// The block is clipped to the occupied bounds. When it still covers more
    /// cells than are occupied, the occupied cells are scanned instead, so
    /// the cost never exceeds the number of non-empty cells. Returns the
    /// number of cells examined.
    pub fn query_nearby_into(&self, x: f32, z: f32, radius: f32, buf: &mut Vec<T>) -> usize {
        buf.clear();
        if !(x.is_finite() && z.is_finite() && radius.is_finite()) || radius < 0.0 {
            return 0;
        }
        let Some((lo, hi)) = self.bounds else {
            return 0;
        };

        let r = (radius / self.cell_size).ceil() as i32;
        let (cx, cz) = self.cell_key(x, z);
        let (x0, x1) = (cx.saturating_sub(r).max(lo.0), cx.saturating_add(r).min(hi.0));
        let (z0, z1) = (cz.saturating_sub(r).max(lo.1), cz.saturating_add(r).min(hi.1));
        if x0 > x1 || z0 > z1 {
            return 0;
        }

        let width = (i64::from(x1) - i64::from(x0) + 1) as u64;
        let depth = (i64::from(z1) - i64::from(z0) + 1) as u64;
        let window = width.saturating_mul(depth);
        if window > self.cells.len() as u64 {
            let mut hits: Vec<(CellKey, &Vec<T>)> = self
                .cells
                .iter()
                .filter(|&(&(ix, iz), _)| (x0..=x1).contains(&ix) && (z0..=z1).contains(&iz))
                .map(|(&key, handles)| (key, handles))
                .collect();
            hits.sort_unstable_by_key(|&(key, _)| key);
            for (_, handles) in hits {
                buf.extend_from_slice(handles);
            }
            return self.cells.len();
        }

        for ix in x0..=x1 {
            for iz in z0..=z1 {
                if let Some(handles) = self.cells.get(&(ix, iz)) {
                    buf.extend_from_slice(handles);
                }
            }
        }
        window as usize
    }

    /// Allocating form of [`Self::query_nearby_into`]
    pub fn query_nearby(&self, x: f32, z: f32, radius: f32) -> Vec<T> {
        let mut buf = Vec::new();
        self.query_nearby_into(x, z, radius, &mut buf);
        buf
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of handles stored
    pub fn entity_count(&self) -> usize {
        self.inserted.len()
    }

    /// Whether the grid holds nothing
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }
}
