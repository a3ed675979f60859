use std::collections::VecDeque;

use crate::drivers::error::ScopeError;
use crate::types::Channel;

/// One timestamped, converted reading of both channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Receipt time in seconds.
    pub timestamp: f64,
    pub channel1: f64,
    pub channel2: f64,
}

impl Sample {
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::One => self.channel1,
            Channel::Two => self.channel2,
        }
    }
}

/// Plot-ready view of the window, times shifted so the oldest sample sits at `t = 0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeriesFrame {
    pub channel1: Vec<[f64; 2]>,
    pub channel2: Vec<[f64; 2]>,
}

impl TimeSeriesFrame {
    pub fn series(&self, channel: Channel) -> &[[f64; 2]] {
        match channel {
            Channel::One => &self.channel1,
            Channel::Two => &self.channel2,
        }
    }

    pub fn len(&self) -> usize {
        self.channel1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel1.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.channel1.last().map(|p| p[0]).unwrap_or(0.0)
    }
}

/// Fixed-capacity FIFO of the most recent samples.
pub struct SlidingWindowBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SlidingWindowBuffer {
    pub fn new(capacity: usize) -> Result<Self, ScopeError> {
        if capacity == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
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

    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Lazily yields `[t - t_oldest, value]` for one channel.
    ///
    /// The origin is read from the current front on every call, since eviction moves it.
    pub fn relative_points(&self, channel: Channel) -> impl Iterator<Item = [f64; 2]> + '_ {
        let origin = self.oldest().map(|s| s.timestamp).unwrap_or(0.0);
        self.samples
            .iter()
            .map(move |s| [s.timestamp - origin, s.value(channel)])
    }

    pub fn to_relative_time_series(&self) -> TimeSeriesFrame {
        TimeSeriesFrame {
            channel1: self.relative_points(Channel::One).collect(),
            channel2: self.relative_points(Channel::Two).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> Sample {
        Sample {
            timestamp: t,
            channel1: t * 2.0,
            channel2: -t,
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            SlidingWindowBuffer::new(0),
            Err(ScopeError::InvalidCapacity)
        ));
    }

    #[test]
    fn keeps_only_the_last_capacity_samples_in_order() {
        let mut buffer = SlidingWindowBuffer::new(4).unwrap();
        for i in 0..11 {
            buffer.append(sample(i as f64));
            assert!(buffer.len() <= buffer.capacity());
        }
        assert_eq!(buffer.len(), 4);
        let kept: Vec<f64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(kept, vec![7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn relative_times_follow_the_oldest_sample() {
        let mut buffer = SlidingWindowBuffer::new(3).unwrap();
        for t in [10.0, 10.5, 11.0] {
            buffer.append(sample(t));
        }
        let xs: Vec<f64> = buffer.relative_points(Channel::One).map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 0.5, 1.0]);

        let mut buffer = SlidingWindowBuffer::new(2).unwrap();
        for t in [10.0, 10.5, 11.0] {
            buffer.append(sample(t));
        }
        let frame = buffer.to_relative_time_series();
        let xs: Vec<f64> = frame.channel1.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 0.5]);
        assert_eq!(frame.channel2, vec![[0.0, -10.5], [0.5, -11.0]]);
    }

    #[test]
    fn empty_and_single_sample_windows() {
        let mut buffer = SlidingWindowBuffer::new(5).unwrap();
        let frame = buffer.to_relative_time_series();
        assert!(frame.is_empty());
        assert_eq!(frame.duration_seconds(), 0.0);

        buffer.append(sample(42.0));
        let frame = buffer.to_relative_time_series();
        assert_eq!(frame.channel1, vec![[0.0, 84.0]]);
        assert_eq!(frame.channel2, vec![[0.0, -42.0]]);
    }

    #[test]
    fn both_channels_stay_aligned() {
        let mut buffer = SlidingWindowBuffer::new(3).unwrap();
        for i in 0..7 {
            buffer.append(sample(i as f64));
        }
        let frame = buffer.to_relative_time_series();
        assert_eq!(frame.channel1.len(), frame.channel2.len());
        for (a, b) in frame.channel1.iter().zip(&frame.channel2) {
            assert_eq!(a[0], b[0]);
        }
    }
}
