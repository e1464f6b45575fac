//! In-memory pixel buffers
//!
//! A `PixelArray` is always held as `rows x columns x bands`; 2-D input is
//! promoted to a single band.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::errors::{RasterError, RasterResult};
use crate::raster::pixel::RasterElement;

/// Numeric raster buffer laid out as rows x columns x bands
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray<T> {
    data: Array3<T>,
}

impl<T: RasterElement> PixelArray<T> {
    /// Wrap a 3-D array; the third axis indexes bands
    pub fn from_3d(data: Array3<T>) -> Self {
        PixelArray { data }
    }

    /// Wrap a 2-D array as a single-band buffer
    pub fn from_2d(data: Array2<T>) -> Self {
        PixelArray { data: data.insert_axis(Axis(2)) }
    }

    /// Build from row-major samples with bands interleaved per pixel
    pub fn from_vec(rows: usize, columns: usize, bands: usize, values: Vec<T>) -> RasterResult<Self> {
        let data = Array3::from_shape_vec((rows, columns, bands), values)
            .map_err(|e| RasterError::InvalidArgument(format!("pixel buffer shape: {}", e)))?;
        Ok(PixelArray { data })
    }

    /// Stack equally-sized band planes
    pub fn from_bands(bands: &[Array2<T>]) -> RasterResult<Self> {
        let views: Vec<ArrayView2<T>> = bands.iter().map(|band| band.view()).collect();
        let data = ndarray::stack(Axis(2), &views)
            .map_err(|e| RasterError::InvalidArgument(format!("cannot stack bands: {}", e)))?;
        Ok(PixelArray { data })
    }

    /// Buffer of the given shape filled with one value
    pub fn filled(rows: usize, columns: usize, bands: usize, value: T) -> Self {
        PixelArray { data: Array3::from_elem((rows, columns, bands), value) }
    }

    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    pub fn columns(&self) -> usize {
        self.data.dim().1
    }

    pub fn band_count(&self) -> usize {
        self.data.dim().2
    }

    /// `(rows, columns, bands)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// View of one band plane (0-based)
    pub fn band(&self, index: usize) -> RasterResult<ArrayView2<'_, T>> {
        if index >= self.band_count() {
            return Err(RasterError::InvalidArgument(format!(
                "band index {} out of range for {} bands", index, self.band_count())));
        }
        Ok(self.data.index_axis(Axis(2), index))
    }

    /// One band plane widened to f64
    pub fn band_as_f64(&self, index: usize) -> RasterResult<Array2<f64>> {
        Ok(self.band(index)?.mapv(|value| value.to_f64()))
    }

    pub fn as_array(&self) -> &Array3<T> {
        &self.data
    }

    pub fn into_inner(self) -> Array3<T> {
        self.data
    }
}

impl<T: RasterElement> From<Array2<T>> for PixelArray<T> {
    fn from(data: Array2<T>) -> Self {
        PixelArray::from_2d(data)
    }
}

impl<T: RasterElement> From<Array3<T>> for PixelArray<T> {
    fn from(data: Array3<T>) -> Self {
        PixelArray::from_3d(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn two_dimensional_input_is_one_band() {
        let array = PixelArray::from(array![[1u8, 2, 3], [4, 5, 6]]);
        assert_eq!(array.shape(), (2, 3, 1));
        assert_eq!(array.band(0).unwrap()[[1, 2]], 6);
        assert!(array.band(1).is_err());
    }

    #[test]
    fn from_vec_interleaves_bands() {
        // pixel (0,0) = [1, 10], pixel (0,1) = [2, 20]
        let array = PixelArray::from_vec(1, 2, 2, vec![1i16, 10, 2, 20]).unwrap();
        assert_eq!(array.band(0).unwrap(), array![[1i16, 2]]);
        assert_eq!(array.band(1).unwrap(), array![[10i16, 20]]);
        assert!(PixelArray::from_vec(2, 2, 2, vec![0i16; 3]).is_err());
    }

    #[test]
    fn stacks_bands() {
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];
        let b = array![[5.0f32, 6.0], [7.0, 8.0]];
        let array = PixelArray::from_bands(&[a, b.clone()]).unwrap();
        assert_eq!(array.band_count(), 2);
        assert_eq!(array.band(1).unwrap(), b.view());
        assert_eq!(array.band_as_f64(0).unwrap()[[1, 0]], 3.0);
    }
}
