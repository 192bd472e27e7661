use serde::{Deserialize, Serialize};

/// A laser stripe centroid in image space.
///
/// Integer pixel coordinates, no sub-pixel fraction is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel2d {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Pixel2d {
    /// Create a new pixel coordinate.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A reconstructed point in normalized object space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate (height above the turntable base)
    pub z: f64,
    /// The rotation step that produced the point.
    pub step: u32,
}

impl Point3d {
    /// Create a new point tagged with its rotation step.
    pub fn new(x: f64, y: f64, z: f64, step: u32) -> Self {
        Self { x, y, z, step }
    }

    /// A rejected candidate: all coordinates zero, provenance kept.
    pub fn zeroed(step: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            step,
        }
    }

    /// The coordinates as an array.
    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Error returned when appending to a full [`BoundedPointList`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Point quantity overloaded: the list is full with {max} points")]
pub struct CapacityError {
    /// The configured maximum number of points.
    pub max: usize,
}

/// An append-only list of points with a fixed maximum capacity.
///
/// Insertion order is kept and is meaningful: the i-th 2D centroid of a camera
/// pairs with the i-th 3D point of the same camera.
#[derive(Clone, Debug)]
pub struct BoundedPointList<T> {
    items: Vec<T>,
    max: usize,
}

impl<T> BoundedPointList<T> {
    /// Create an empty list that can hold at most `max` points.
    pub fn new(max: usize) -> Self {
        Self {
            items: Vec::new(),
            max,
        }
    }

    /// Append a point at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when the list already holds `max` points. The
    /// stored points are left untouched.
    pub fn push(&mut self, item: T) -> Result<(), CapacityError> {
        if self.items.len() >= self.max {
            return Err(CapacityError { max: self.max });
        }
        self.items.push(item);
        Ok(())
    }

    /// Number of used slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of free slots left.
    pub fn remaining(&self) -> usize {
        self.max - self.items.len()
    }

    /// The stored points in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Get the point at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterate over the stored points in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a BoundedPointList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
