//! Gaze tensor coercion
//!
//! Recorders disagree about gaze array layout: some write one `(x, y)` pair
//! per frame, some write several candidate points per frame, some a flat
//! interleaved stream. This module coerces any of those into the canonical
//! one-point-per-frame [`GazeTrack`].

use crate::model::GazeTrack;
use crate::tensor::Tensor;
use tracing::warn;

/// Coerce a decoded tensor to a gaze track.
///
/// Accepted layouts:
/// - `(N, C)` with `C >= 2`: first two columns per row;
/// - `(F, P, C)` with `C >= 2`: first point per frame, first two coordinates;
/// - `(N,)` flat: consecutive pairs, a trailing odd element is dropped.
///
/// Anything else yields an empty track. NaN coordinates become `-1.0`, the
/// off-screen sentinel. The sequence counts as normalized when the maximum
/// of each coordinate is at most 1.5.
pub fn coerce_gaze(tensor: &Tensor) -> GazeTrack {
    let points = match tensor.shape.as_slice() {
        [rows, cols] if *cols >= 2 => tensor
            .values
            .chunks_exact(*cols)
            .take(*rows)
            .map(|row| [row[0], row[1]])
            .collect(),
        [frames, points_per_frame, cols] if *cols >= 2 && *points_per_frame >= 1 => {
            let frame_stride = points_per_frame * cols;
            tensor
                .values
                .chunks_exact(frame_stride)
                .take(*frames)
                .map(|frame| [frame[0], frame[1]])
                .collect()
        }
        [n] if *n >= 2 => tensor
            .values
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect(),
        other => {
            if !tensor.values.is_empty() {
                warn!(shape = ?other, "gaze tensor has no usable point layout");
            }
            Vec::new()
        }
    };

    let points: Vec<[f64; 2]> = points
        .into_iter()
        .map(|[x, y]: [f64; 2]| {
            [
                if x.is_nan() { -1.0 } else { x },
                if y.is_nan() { -1.0 } else { y },
            ]
        })
        .collect();

    let (max_x, max_y) = points.iter().fold((0.0f64, 0.0f64), |(mx, my), p| {
        (mx.max(p[0]), my.max(p[1]))
    });
    let normalized = max_x <= 1.5 && max_y <= 1.5;

    GazeTrack { points, normalized }
}
