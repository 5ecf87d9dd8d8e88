//! Zero-padding windows and the spectral shift map.
//!
//! A forward transform of an `n`-sample axis leaves positive frequencies in
//! `[0, ceil(n/2))` and negative frequencies in `[ceil(n/2), n)`. Upscaling
//! to `s` samples keeps the positive half where it is, moves the negative
//! half to the top of `[0, s)`, and fills the middle with zeros.

/// Zero region `[start, end)` along one axis of an `extent`-long spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisWindow {
    pub start: u32,
    pub end: u32,
    pub extent: u32,
}

impl AxisWindow {
    /// Window for a full (two-sided) spectrum axis of `n` samples enlarged to `s`.
    ///
    /// An even-length axis has an unpaired Nyquist bin; when the axis is
    /// enlarged it is dropped so the padded spectrum stays conjugate
    /// symmetric. An axis that is not enlarged gets an empty window.
    pub fn full(n: u32, s: u32) -> Self {
        debug_assert!(s >= n);
        let low = n.div_ceil(2);
        if s == n {
            return Self {
                start: low,
                end: low,
                extent: s,
            };
        }
        let high = n.saturating_sub(1) / 2;
        Self {
            start: low,
            end: s - high,
            extent: s,
        }
    }

    /// Window for the half-spectrum axis of a real-input transform.
    ///
    /// The extent is `s/2 + 1`; content stays contiguous at the low end.
    pub fn half_spectrum(n: u32, s: u32) -> Self {
        debug_assert!(s >= n);
        let extent = s / 2 + 1;
        if s == n {
            return Self {
                start: extent,
                end: extent,
                extent,
            };
        }
        Self {
            start: n.div_ceil(2),
            end: extent,
            extent,
        }
    }

    pub fn zero_count(&self) -> u32 {
        self.end - self.start
    }

    pub fn content_count(&self) -> u32 {
        self.extent - self.zero_count()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index < self.end
    }
}

/// Per-axis zero windows of the enlarged spectrum (axis 0 = x, axis 1 = y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZeroPadWindow {
    pub axes: [AxisWindow; 2],
}

impl ZeroPadWindow {
    /// Elements whose x or y index falls inside a window.
    pub fn zero_elements(&self) -> u64 {
        let [x, y] = self.axes;
        let zx = x.zero_count() as u64;
        let zy = y.zero_count() as u64;
        zx * y.extent as u64 + zy * x.extent as u64 - zx * zy
    }

    /// Elements carrying low-frequency content.
    pub fn content_elements(&self) -> u64 {
        self.axes[0].content_count() as u64 * self.axes[1].content_count() as u64
    }

    pub fn total_elements(&self) -> u64 {
        self.axes[0].extent as u64 * self.axes[1].extent as u64
    }

    pub fn is_zero(&self, x: u32, y: u32) -> bool {
        self.axes[0].contains(x) || self.axes[1].contains(y)
    }
}

/// Rotation of `[split, extent)` by `offset` positions.
///
/// Indices below `split` stay put. Indices in `[split, n)` (the negative
/// frequencies) move up by `extent - n`; the stale tail `[n, extent)` wraps
/// into the gap, which is the zero window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisShift {
    pub split: u32,
    pub offset: u32,
    pub span: u32,
    pub extent: u32,
}

impl AxisShift {
    pub fn identity(extent: u32) -> Self {
        Self {
            split: extent,
            offset: 0,
            span: 1,
            extent,
        }
    }

    pub fn centered(n: u32, s: u32) -> Self {
        let split = n.div_ceil(2);
        Self {
            split,
            offset: s - n,
            span: (s - split).max(1),
            extent: s,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.offset == 0
    }

    pub fn map(&self, index: u32) -> u32 {
        if index < self.split {
            index
        } else {
            self.split + (index - self.split + self.offset) % self.span
        }
    }
}

/// Source-to-destination index map applied by the shift stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftMap {
    pub axes: [AxisShift; 2],
}

impl ShiftMap {
    pub fn map(&self, x: u32, y: u32) -> (u32, u32) {
        (self.axes[0].map(x), self.axes[1].map(y))
    }

    pub fn extent(&self) -> [u32; 2] {
        [self.axes[0].extent, self.axes[1].extent]
    }
}
