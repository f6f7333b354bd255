//! Keyframe merging
//!
//! Gathers the channel curves that animate one transform component into
//! [`KeyFrameList`]s (clipped to the stack range) and merges their key ticks
//! into one strictly increasing [`KeyTimeList`].

use crate::document::{Axis, CurveNodeKey, Document, LayerBlend};
use crate::transform::component::TransformComponent;

/// A curve node reference together with the blend of the layer it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveNodeRef {
    pub key: CurveNodeKey,
    pub blend: LayerBlend,
}

/// The contribution of one channel curve to a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFrameList {
    /// Non-decreasing key ticks.
    pub times: Vec<i64>,
    pub values: Vec<f32>,
    /// Channel of the 3-vector this curve drives.
    pub channel: Axis,
    pub blend: LayerBlend,
}

pub type KeyFrameListList = Vec<KeyFrameList>;

impl KeyFrameList {
    #[must_use]
    pub fn new(times: Vec<i64>, values: Vec<f32>, channel: Axis) -> Self {
        Self {
            times,
            values,
            channel,
            blend: LayerBlend::default(),
        }
    }

    /// Samples the curve at `tick`.
    ///
    /// Clamps to the first / last value outside the key range and
    /// interpolates linearly between keys. An exact key tick returns the
    /// stored value unchanged.
    #[must_use]
    pub fn sample(&self, tick: i64) -> f32 {
        sample_sorted(&self.times, &self.values, tick)
    }
}

/// Linear sample of sorted `(times, values)`; the lists must be non-empty.
fn sample_sorted(times: &[i64], values: &[f32], tick: i64) -> f32 {
    // partition_point finds the first index where t > tick, i.e. next_index
    let next = times.partition_point(|&t| t <= tick);
    if next == 0 {
        return values[0];
    }
    if next >= times.len() {
        return values[times.len() - 1];
    }
    let (t0, t1) = (times[next - 1], times[next]);
    let (v0, v1) = (values[next - 1], values[next]);
    let factor = (tick - t0) as f64 / (t1 - t0) as f64;
    v0 + (v1 - v0) * factor as f32
}

/// The strictly increasing union of the ticks of a [`KeyFrameListList`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTimeList {
    ticks: Vec<i64>,
}

impl KeyTimeList {
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.ticks
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ticks.iter().copied()
    }
}

/// Builds one keyframe list per channel curve of `nodes`.
///
/// `range` clips every curve to `[start, stop]`; keys outside are replaced by
/// a boundary key carrying the curve's value at the boundary. Rotation curves
/// additionally get intermediate keys wherever two neighbours are 180° or
/// more apart.
#[must_use]
pub fn get_keyframe_list(
    doc: &Document,
    nodes: &[CurveNodeRef],
    range: Option<(i64, i64)>,
    component: TransformComponent,
) -> KeyFrameListList {
    let mut inputs = KeyFrameListList::new();

    for node_ref in nodes {
        let Some(node) = doc.curve_node(node_ref.key) else {
            log::warn!("Skipping missing curve node {:?}", node_ref.key);
            continue;
        };

        for (channel_name, curve_key) in &node.channels {
            let Some(channel) = Axis::from_channel_name(channel_name) else {
                log::warn!(
                    "Ignoring {} animation curve '{channel_name}' on {}, did not recognize target channel",
                    component.name(),
                    node.target
                );
                continue;
            };
            let Some(curve) = doc.curve(*curve_key) else {
                log::warn!("Curve {curve_key:?} referenced by {} is missing", node.target);
                continue;
            };
            if curve.is_empty() {
                continue;
            }

            let (mut times, mut values) = sanitize(&curve.times, &curve.values, node.target);
            if let Some((start, stop)) = range {
                (times, values) = clip(&times, &values, start, stop);
            }
            if component == TransformComponent::Rotation {
                (times, values) = subdivide_large_steps(&times, &values);
            }

            inputs.push(KeyFrameList {
                times,
                values,
                channel,
                blend: node_ref.blend,
            });
        }
    }

    inputs
}

/// Truncates mismatched key/value arrays and sorts unordered keys.
fn sanitize(times: &[i64], values: &[f32], target: crate::document::NodeId) -> (Vec<i64>, Vec<f32>) {
    let count = times.len().min(values.len());
    if times.len() != values.len() {
        log::warn!(
            "Curve on {target} has {} times but {} values, truncating to {count}",
            times.len(),
            values.len()
        );
    }
    let (times, values) = (&times[..count], &values[..count]);

    if times.is_sorted() {
        return (times.to_vec(), values.to_vec());
    }
    let mut keys: Vec<(i64, f32)> = times.iter().copied().zip(values.iter().copied()).collect();
    keys.sort_by_key(|&(t, _)| t);
    keys.into_iter().unzip()
}

fn clip(times: &[i64], values: &[f32], start: i64, stop: i64) -> (Vec<i64>, Vec<f32>) {
    let first = times.partition_point(|&t| t < start);
    let end = times.partition_point(|&t| t <= stop);

    let mut out_times = Vec::with_capacity(end.saturating_sub(first) + 2);
    let mut out_values = Vec::with_capacity(out_times.capacity());

    if first > 0 && times.get(first) != Some(&start) {
        out_times.push(start);
        out_values.push(sample_sorted(times, values, start));
    }
    if first < end {
        out_times.extend_from_slice(&times[first..end]);
        out_values.extend_from_slice(&values[first..end]);
    }
    if end < times.len() && out_times.last() != Some(&stop) {
        out_times.push(stop);
        out_values.push(sample_sorted(times, values, stop));
    }

    (out_times, out_values)
}

/// Largest angular step a rotation segment may span after subdivision.
const MAX_ROTATION_STEP: f32 = 179.0;

fn subdivide_large_steps(times: &[i64], values: &[f32]) -> (Vec<i64>, Vec<f32>) {
    let mut out_times = Vec::with_capacity(times.len());
    let mut out_values = Vec::with_capacity(values.len());

    for i in 0..times.len() {
        if i > 0 {
            let (t0, t1) = (times[i - 1], times[i]);
            let (v0, v1) = (values[i - 1], values[i]);
            let delta = v1 - v0;
            let span = t1 - t0;
            if delta.abs() >= 180.0 && span > 1 {
                let segments = ((delta.abs() / MAX_ROTATION_STEP).ceil() as i64).clamp(2, span);
                for k in 1..segments {
                    let tick = t0 + ((i128::from(span) * i128::from(k)) / i128::from(segments)) as i64;
                    let factor = (tick - t0) as f64 / span as f64;
                    out_times.push(tick);
                    out_values.push(v0 + delta * factor as f32);
                }
            }
        }
        out_times.push(times[i]);
        out_values.push(values[i]);
    }

    (out_times, out_values)
}

/// Multi-way merge of all input ticks into one strictly increasing list.
///
/// Accepts a slice of lists or any iterator over list references, so the
/// lists of several components can be merged without copying them.
#[must_use]
pub fn get_key_time_list<'a>(inputs: impl IntoIterator<Item = &'a KeyFrameList>) -> KeyTimeList {
    let inputs: Vec<&KeyFrameList> = inputs.into_iter().collect();
    let estimate = inputs.iter().map(|l| l.times.len()).sum();
    let mut ticks = Vec::with_capacity(estimate);
    let mut cursors = vec![0usize; inputs.len()];

    loop {
        let next = inputs
            .iter()
            .zip(&cursors)
            .filter_map(|(list, &cursor)| list.times.get(cursor).copied())
            .min();
        let Some(tick) = next else {
            break;
        };
        ticks.push(tick);

        for (list, cursor) in inputs.iter().zip(cursors.iter_mut()) {
            while list.times.get(*cursor) == Some(&tick) {
                *cursor += 1;
            }
        }
    }

    KeyTimeList { ticks }
}
