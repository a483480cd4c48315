//! Delta-channel summary statistics

use statrs::statistics::Statistics;

use crate::types::{ChannelStatistics, DeltaStatistics, PercentileSnapshot};

/// Borrowed view of the delta channels on a common grid.
pub struct DeltaChannels<'a> {
    pub md: &'a [f64],
    pub delta_x: &'a [f64],
    pub delta_y: &'a [f64],
    pub delta_z: &'a [f64],
    pub delta_horizontal: &'a [f64],
    pub delta_total: &'a [f64],
    pub delta_inc: &'a [f64],
    pub delta_azi: &'a [f64],
}

/// max |Δ|, mean |Δ| and population std of the signed Δ.
pub fn channel_statistics(values: &[f64]) -> ChannelStatistics {
    if values.is_empty() {
        return ChannelStatistics::default();
    }
    let max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let avg = values.iter().map(|v| v.abs()).mean();
    let std = values.population_std_dev();
    ChannelStatistics { max, avg, std }
}

/// Index of the largest |value|; first one wins on ties.
fn argmax_abs(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b >= v.abs() => best,
            _ => Some((i, v.abs())),
        })
        .map(|(i, _)| i)
}

/// Grid index for a percentile position: round(p / 100 · (n − 1)).
pub fn percentile_index(percentile: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let p = percentile.clamp(0.0, 100.0);
    ((p / 100.0) * (len - 1) as f64).round() as usize
}

pub fn summarize(channels: &DeltaChannels<'_>, percentiles: &[f64]) -> DeltaStatistics {
    let md_at = |idx: Option<usize>| idx.map(|i| channels.md[i]).unwrap_or(f64::NAN);

    let snapshots = if channels.md.is_empty() {
        Vec::new()
    } else {
        percentiles
            .iter()
            .map(|&p| {
                let index = percentile_index(p, channels.md.len());
                PercentileSnapshot {
                    percentile: p,
                    index,
                    md: channels.md[index],
                    delta_horizontal: channels.delta_horizontal[index],
                    delta_total: channels.delta_total[index],
                    delta_inc: channels.delta_inc[index],
                    delta_azi: channels.delta_azi[index],
                }
            })
            .collect()
    };

    DeltaStatistics {
        delta_x: channel_statistics(channels.delta_x),
        delta_y: channel_statistics(channels.delta_y),
        delta_z: channel_statistics(channels.delta_z),
        delta_horizontal: channel_statistics(channels.delta_horizontal),
        delta_total: channel_statistics(channels.delta_total),
        delta_inc: channel_statistics(channels.delta_inc),
        delta_azi: channel_statistics(channels.delta_azi),
        max_horizontal_md: md_at(argmax_abs(channels.delta_horizontal)),
        max_total_md: md_at(argmax_abs(channels.delta_total)),
        snapshots,
    }
}
