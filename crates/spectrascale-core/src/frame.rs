use ndarray::{Array3, ArrayView2, ArrayViewMut2, Axis};

/// A channel-planar image.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarImage {
    /// Pixel data, shape = (channels, height, width)
    pub data: Array3<f32>,
}

impl PlanarImage {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(channels: usize, height: usize, width: usize) -> Self {
        Self {
            data: Array3::zeros((channels, height, width)),
        }
    }

    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn plane(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), channel)
    }

    pub fn plane_mut(&mut self, channel: usize) -> ArrayViewMut2<'_, f32> {
        self.data.index_axis_mut(Axis(0), channel)
    }

    /// Largest absolute per-pixel difference. Shapes must match.
    pub fn max_abs_diff(&self, other: &PlanarImage) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}
