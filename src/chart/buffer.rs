/// Default number of samples a chart keeps when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 16;
/// Fixed-capacity rolling window of samples, oldest first.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    capacity: usize,
}
impl SampleBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }
    /// Stores `value` as the newest sample, evicting the oldest once full.
    /// A zero-capacity buffer drops every value.
    pub fn append(&mut self, value: f32) {
        if self.samples.len() < self.capacity {
            self.samples.push(value);
            return;
        }
        let Some(last) = self.samples.len().checked_sub(1) else {
            return;
        };
        self.samples.copy_within(1.., 0);
        self.samples[last] = value;
    }
    /// Valid samples, index 0 being the oldest.
    pub fn snapshot(&self) -> &[f32] {
        &self.samples
    }
    pub fn latest(&self) -> Option<f32> {
        self.samples.last().copied()
    }
    /// Largest stored sample. Any NaN poisons the result, and an empty
    /// buffer yields negative infinity.
    pub fn max(&self) -> f32 {
        auto_fit_max(&self.samples)
    }
}
impl Default for SampleBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
pub(crate) fn auto_fit_max(samples: &[f32]) -> f32 {
    let mut max = f32::NEG_INFINITY;
    for &v in samples {
        if v.is_nan() {
            return f32::NAN;
        }
        max = max.max(v);
    }
    max
}
#[cfg(test)]
mod tests {
    use super::*;
    fn filled(capacity: usize, values: &[f32]) -> SampleBuffer {
        let mut buffer = SampleBuffer::with_capacity(capacity);
        for &v in values {
            buffer.append(v);
        }
        buffer
    }
    #[test]
    fn keeps_every_value_until_full() {
        for capacity in 1..8 {
            let values: Vec<f32> = (0..capacity).map(|v| v as f32 * 1.5).collect();
            for n in 0..=capacity {
                let buffer = filled(capacity, &values[..n]);
                assert_eq!(buffer.len(), n);
                assert_eq!(buffer.snapshot(), &values[..n]);
            }
        }
    }
    #[test]
    fn slides_window_past_capacity() {
        for capacity in 1..6 {
            let values: Vec<f32> = (0..capacity * 3 + 1).map(|v| v as f32).collect();
            let buffer = filled(capacity, &values);
            assert_eq!(buffer.len(), capacity);
            assert!(buffer.is_full());
            assert_eq!(buffer.snapshot(), &values[values.len() - capacity..]);
        }
    }
    #[test]
    fn evicts_oldest_sample() {
        let buffer = filled(3, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buffer.snapshot(), &[2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), Some(4.0));
    }
    #[test]
    fn zero_capacity_stores_nothing() {
        let buffer = filled(0, &[1.0, 2.0]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
    }
    #[test]
    fn default_capacity_is_sixteen() {
        assert_eq!(SampleBuffer::default().capacity(), 16);
    }
    #[test]
    fn non_finite_values_are_stored_as_is() {
        let buffer = filled(4, &[1.0, f32::NAN, f32::INFINITY]);
        assert_eq!(buffer.len(), 3);
        assert!(buffer.snapshot()[1].is_nan());
        assert!(buffer.max().is_nan());
    }
    #[test]
    fn max_of_negative_samples() {
        let buffer = filled(4, &[-3.0, -1.0, -2.0]);
        assert_eq!(buffer.max(), -1.0);
    }
}
