//! Grid samples with an explicit "no data" state.

/// A normalized sample: a single-precision value or an explicit gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Value(f32),
    NoData,
}

impl Sample {
    pub fn value(self) -> Option<f32> {
        match self {
            Sample::Value(v) => Some(v),
            Sample::NoData => None,
        }
    }

    pub fn is_no_data(self) -> bool {
        matches!(self, Sample::NoData)
    }
}

impl From<Option<f32>> for Sample {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Sample::NoData, Sample::Value)
    }
}

/// Minimum and maximum over the valid samples, or `None` when every sample
/// is "no data".
pub fn value_range<'a, I>(samples: I) -> Option<(f32, f32)>
where
    I: IntoIterator<Item = &'a Sample>,
{
    samples
        .into_iter()
        .filter_map(|s| s.value())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
