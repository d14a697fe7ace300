//! Multi-channel sample buffers
//!
//! Two layouts behind one trait:
//! - [`JointBuffer`]: interleaved frames in one contiguous block
//! - [`SplitBuffer`]: one contiguous block per channel
//!
//! Channel views ([`AudioBuffer::span`]) borrow the buffer, so resizing while a
//! view is alive does not compile.

use sfzr_core::Element;

use crate::simd::{Kernel, Scalar};

// ============ Channel Views ============

/// Read access to one channel of a buffer
pub trait ChannelSpan<T: Element> {
    fn len(&self) -> usize;

    /// Element at `index`, `None` past the end
    fn get(&self, index: usize) -> Option<T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Write access to one channel of a buffer
pub trait ChannelSpanMut<T: Element>: ChannelSpan<T> {
    /// Store `value` at `index`; out of range writes are dropped
    fn set(&mut self, index: usize, value: T);

    fn fill(&mut self, value: T) {
        for i in 0..self.len() {
            self.set(i, value);
        }
    }
}

impl<T: Element> ChannelSpan<T> for &[T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<T> {
        <[T]>::get(self, index).copied()
    }
}

impl<T: Element> ChannelSpan<T> for &mut [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<T> {
        <[T]>::get(self, index).copied()
    }
}

impl<T: Element> ChannelSpanMut<T> for &mut [T] {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        if let Some(sample) = <[T]>::get_mut(self, index) {
            *sample = value;
        }
    }

    fn fill(&mut self, value: T) {
        <[T]>::fill(self, value);
    }
}

/// Strided view of one channel inside an interleaved block
#[derive(Debug, Clone, Copy)]
pub struct Strided<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T: Element> Strided<'a, T> {
    pub fn new(data: &'a [T], offset: usize, stride: usize, len: usize) -> Self {
        Self {
            data,
            offset,
            stride,
            len,
        }
    }

    fn empty() -> Self {
        Self::new(&[], 0, 1, 0)
    }
}

impl<T: Element> ChannelSpan<T> for Strided<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            <[T]>::get(self.data, self.offset + index * self.stride).copied()
        } else {
            None
        }
    }
}

/// Mutable strided view; writes land in the interleaved block directly
#[derive(Debug)]
pub struct StridedMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T: Element> StridedMut<'a, T> {
    pub fn new(data: &'a mut [T], offset: usize, stride: usize, len: usize) -> Self {
        Self {
            data,
            offset,
            stride,
            len,
        }
    }

    fn empty() -> Self {
        Self::new(&mut [], 0, 1, 0)
    }
}

impl<T: Element> ChannelSpan<T> for StridedMut<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            <[T]>::get(self.data, self.offset + index * self.stride).copied()
        } else {
            None
        }
    }
}

impl<T: Element> ChannelSpanMut<T> for StridedMut<'_, T> {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        if index < self.len {
            if let Some(sample) = self.data.get_mut(self.offset + index * self.stride) {
                *sample = value;
            }
        }
    }
}

// ============ Buffer Trait ============

/// Layout-independent multi-channel buffer
pub trait AudioBuffer<T: Element> {
    type Span<'a>: ChannelSpan<T>
    where
        Self: 'a;
    type SpanMut<'a>: ChannelSpanMut<T>
    where
        Self: 'a;

    fn num_channels(&self) -> usize;
    fn num_frames(&self) -> usize;

    /// Change the frame count; new frames are zero
    fn resize(&mut self, frames: usize);

    /// Set every element of every channel to `value`
    fn fill_with<K: Kernel>(&mut self, value: T);

    /// Set channel `c` to `values[c]`
    ///
    /// `K` runs every contiguous fill. An interleaved buffer holding distinct
    /// per-channel values is written frame by frame instead.
    fn fill_channels_with<K: Kernel>(&mut self, values: &[T]);

    /// View of `channel`; empty when out of range
    fn span(&self, channel: usize) -> Self::Span<'_>;
    fn span_mut(&mut self, channel: usize) -> Self::SpanMut<'_>;

    fn fill(&mut self, value: T) {
        self.fill_with::<Scalar>(value);
    }

    fn fill_channels(&mut self, values: &[T]) {
        self.fill_channels_with::<Scalar>(values);
    }

    fn is_empty(&self) -> bool {
        self.num_channels() == 0 || self.num_frames() == 0
    }
}

// ============ Joint (Interleaved) ============

/// Interleaved buffer: channel `c` of frame `k` lives at `k * channels + c`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointBuffer<T> {
    data: Vec<T>,
    channels: usize,
    frames: usize,
}

impl<T: Element> JointBuffer<T> {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            data: vec![T::ZERO; channels * frames],
            channels,
            frames,
        }
    }

    /// The interleaved block
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy a stereo buffer out into two contiguous channels
    pub fn read_stereo<K: Kernel>(&self, left: &mut [T], right: &mut [T]) {
        debug_assert_eq!(self.channels, 2, "read_stereo on a non-stereo buffer");
        if self.channels != 2 {
            return;
        }
        let frames = self.frames.min(left.len()).min(right.len());
        K::read_interleaved(&self.data[..2 * frames], &mut left[..frames], &mut right[..frames]);
    }

    /// Copy two contiguous channels into a stereo buffer
    pub fn write_stereo<K: Kernel>(&mut self, left: &[T], right: &[T]) {
        debug_assert_eq!(self.channels, 2, "write_stereo on a non-stereo buffer");
        if self.channels != 2 {
            return;
        }
        let frames = self.frames.min(left.len()).min(right.len());
        K::write_interleaved(&left[..frames], &right[..frames], &mut self.data[..2 * frames]);
    }
}

impl<T: Element> AudioBuffer<T> for JointBuffer<T> {
    type Span<'a> = Strided<'a, T>;
    type SpanMut<'a> = StridedMut<'a, T>;

    #[inline]
    fn num_channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn num_frames(&self) -> usize {
        self.frames
    }

    fn resize(&mut self, frames: usize) {
        // Frame-major layout, so existing frames keep their place
        self.data.resize(frames * self.channels, T::ZERO);
        self.frames = frames;
    }

    fn fill_with<K: Kernel>(&mut self, value: T) {
        K::fill(&mut self.data, value);
    }

    fn fill_channels_with<K: Kernel>(&mut self, values: &[T]) {
        debug_assert_eq!(values.len(), self.channels, "fill_channels: one value per channel");
        let count = values.len().min(self.channels);
        if count == 0 {
            return;
        }

        // Same value everywhere: one pass over the whole block
        if count == self.channels && values.iter().all(|&v| v == values[0]) {
            K::fill(&mut self.data, values[0]);
            return;
        }

        // Distinct values interleave, so the kernel tag has nothing to vectorize
        for frame in self.data.chunks_exact_mut(self.channels) {
            frame[..count].copy_from_slice(&values[..count]);
        }
    }

    fn span(&self, channel: usize) -> Strided<'_, T> {
        debug_assert!(channel < self.channels, "channel {channel} out of range");
        if channel >= self.channels {
            return Strided::empty();
        }
        Strided::new(&self.data, channel, self.channels, self.frames)
    }

    fn span_mut(&mut self, channel: usize) -> StridedMut<'_, T> {
        debug_assert!(channel < self.channels, "channel {channel} out of range");
        if channel >= self.channels {
            return StridedMut::empty();
        }
        StridedMut::new(&mut self.data, channel, self.channels, self.frames)
    }
}

// ============ Split (Per-Channel) ============

/// Per-channel buffer: each channel is its own contiguous block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitBuffer<T> {
    channels: Vec<Vec<T>>,
    frames: usize,
}

impl<T: Element> SplitBuffer<T> {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            channels: vec![vec![T::ZERO; frames]; channels],
            frames,
        }
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &[T] {
        debug_assert!(channel < self.channels.len(), "channel {channel} out of range");
        self.channels.get(channel).map(Vec::as_slice).unwrap_or_default()
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [T] {
        debug_assert!(channel < self.channels.len(), "channel {channel} out of range");
        self.channels
            .get_mut(channel)
            .map(Vec::as_mut_slice)
            .unwrap_or_default()
    }

    /// Write all channels into an interleaved buffer of the same shape
    pub fn interleave_into<K: Kernel>(&self, joint: &mut JointBuffer<T>) {
        debug_assert_eq!(self.channels.len(), joint.channels, "channel count mismatch");
        let channels = self.channels.len().min(joint.channels);
        let frames = self.frames.min(joint.frames);

        if channels == 2 && joint.channels == 2 {
            K::write_interleaved(
                &self.channels[0][..frames],
                &self.channels[1][..frames],
                &mut joint.data[..2 * frames],
            );
            return;
        }

        let stride = joint.channels;
        for (c, source) in self.channels.iter().take(channels).enumerate() {
            for (k, &sample) in source[..frames].iter().enumerate() {
                joint.data[k * stride + c] = sample;
            }
        }
    }

    /// Read all channels from an interleaved buffer of the same shape
    pub fn deinterleave_from<K: Kernel>(&mut self, joint: &JointBuffer<T>) {
        debug_assert_eq!(self.channels.len(), joint.channels, "channel count mismatch");
        let channels = self.channels.len().min(joint.channels);
        let frames = self.frames.min(joint.frames);

        if channels == 2 && joint.channels == 2 {
            let (left, right) = self.channels.split_at_mut(1);
            K::read_interleaved(
                &joint.data[..2 * frames],
                &mut left[0][..frames],
                &mut right[0][..frames],
            );
            return;
        }

        let stride = joint.channels;
        for (c, target) in self.channels.iter_mut().take(channels).enumerate() {
            for (k, sample) in target[..frames].iter_mut().enumerate() {
                *sample = joint.data[k * stride + c];
            }
        }
    }
}

impl<T: Element> AudioBuffer<T> for SplitBuffer<T> {
    type Span<'a> = &'a [T];
    type SpanMut<'a> = &'a mut [T];

    #[inline]
    fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    fn num_frames(&self) -> usize {
        self.frames
    }

    fn resize(&mut self, frames: usize) {
        for channel in &mut self.channels {
            channel.resize(frames, T::ZERO);
        }
        self.frames = frames;
    }

    fn fill_with<K: Kernel>(&mut self, value: T) {
        for channel in &mut self.channels {
            K::fill(channel, value);
        }
    }

    fn fill_channels_with<K: Kernel>(&mut self, values: &[T]) {
        debug_assert_eq!(values.len(), self.channels.len(), "fill_channels: one value per channel");
        for (channel, &value) in self.channels.iter_mut().zip(values) {
            K::fill(channel, value);
        }
    }

    fn span(&self, channel: usize) -> &[T] {
        self.channel(channel)
    }

    fn span_mut(&mut self, channel: usize) -> &mut [T] {
        self.channel_mut(channel)
    }
}
