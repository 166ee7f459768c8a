use crate::config::LayoutConfig;

/// Radial distance for a place, or `None` when it cannot be placed.
///
/// Places without a usable metric (absent, NaN, infinite, `<= 1`) are left
/// out of the layout rather than pushed to either end of the range. Higher
/// metrics and more local votes pull a place toward the center; the result is
/// always clamped to `[min_d, max_d]`.
///
/// # Panics
///
/// Panics if `min_d > max_d` or either bound is NaN. [`LayoutConfig::validate`]
/// rejects such configs, and `TrendLayout::new` always runs it.
pub fn trend_distance(metric: Option<f64>, count: u32, config: &LayoutConfig) -> Option<f64> {
    let metric = metric.filter(|m| m.is_finite())?;
    if metric <= 1.0 {
        return None;
    }

    let denom = metric.log10();
    if denom <= 0.0 {
        return None;
    }

    let base = config.k / denom;
    let vote_bonus = (f64::from(count) - 1.0) * config.vote_weight;
    Some((base - vote_bonus).clamp(config.min_d, config.max_d))
}

/// Marker size for a vote count: `base + scale * count^alpha`, capped at
/// `size_max`.
pub fn marker_size(count: u32, config: &LayoutConfig) -> f64 {
    if count == 0 {
        return config.size_base;
    }
    let size = config.size_base + config.size_scale * f64::from(count).powf(config.size_alpha);
    size.min(config.size_max)
}
