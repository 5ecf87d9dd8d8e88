use std::path::{Path, PathBuf};

use crate::consts::BATCH_INDEX_WIDTH;

/// `{folder}/{index:06}.png`. Batch indices start at 1.
pub fn batch_file(folder: &Path, index: usize) -> PathBuf {
    folder.join(format!("{index:0width$}.png", width = BATCH_INDEX_WIDTH))
}

/// Output name used when a single-file run gives none: `{W}_{SW}_upscaled.png`
/// in the current directory.
pub fn default_output(width: u32, out_width: u32) -> PathBuf {
    PathBuf::from(format!("{width}_{out_width}_upscaled.png"))
}

/// 1-based indices of the files worker `worker` handles out of `count`, with
/// `workers` workers splitting files round robin.
pub fn worker_indices(count: usize, workers: usize, worker: usize) -> Vec<usize> {
    (0..count)
        .filter(|i| i % workers.max(1) == worker)
        .map(|i| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(batch_file(Path::new("in"), 7), PathBuf::from("in/000007.png"));
    }

    #[test]
    fn round_robin_partition() {
        assert_eq!(worker_indices(5, 2, 0), vec![1, 3, 5]);
        assert_eq!(worker_indices(5, 2, 1), vec![2, 4]);
    }
}
