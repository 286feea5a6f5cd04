//! CPU/GPU frame synchronization on top of a monotonically increasing fence.
//!
//! The GPU side is abstracted behind [`GpuTimeline`] so the protocol can be
//! driven by a real `ID3D12Fence` (see `d3d12::fence`) or by a simulated
//! timeline in tests.
//!
//! Two protocols are provided:
//!
//! * [`FenceCounter`] flushes the queue after every frame. Simple, and the
//!   GPU sits idle while the CPU records the next frame.
//! * [`FrameFences`] keeps one fence value per back buffer so the CPU only
//!   waits when it is about to reuse a command allocator the GPU may still
//!   be reading from.

use eyre::eyre;
use tracing::trace;

use crate::hello_error::HelloResult;

/// A queue that can be told to signal a fence, and a fence the CPU can
/// observe and block on.
pub trait GpuTimeline {
    /// Enqueue a signal of `value` once all previously submitted work is done.
    fn signal(&mut self, value: u64) -> HelloResult<()>;

    /// The last value the GPU has reached.
    fn completed_value(&self) -> u64;

    /// Block the calling thread until [`Self::completed_value`] is at least `value`.
    fn wait_for(&mut self, value: u64) -> HelloResult<()>;
}

/// Single-counter flush protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceCounter {
    next_value: u64,
}

impl Default for FenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FenceCounter {
    pub fn new() -> Self {
        Self { next_value: 1 }
    }

    /// The value the next [`Self::signal_and_wait`] will signal.
    pub fn next_value(&self) -> u64 {
        self.next_value
    }

    /// Signal the current value, advance the counter, and block until the
    /// GPU reaches the signalled value.
    ///
    /// Returns the value that was signalled.
    pub fn signal_and_wait<T: GpuTimeline + ?Sized>(&mut self, timeline: &mut T) -> HelloResult<u64> {
        let fence = self.next_value;
        timeline.signal(fence)?;
        self.next_value += 1;

        if timeline.completed_value() < fence {
            trace!(fence, "waiting for previous frame");
            timeline.wait_for(fence)?;
        }
        Ok(fence)
    }
}

/// Per-back-buffer fence values for frame-buffered rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFences {
    values: Vec<u64>,
    frame_index: usize,
}

impl FrameFences {
    pub fn new(frame_count: usize, frame_index: usize) -> HelloResult<Self> {
        if frame_count == 0 {
            return Err(eyre!("frame count must be at least 1").into());
        }
        if frame_index >= frame_count {
            return Err(eyre!("frame index {frame_index} out of range for {frame_count} frames").into());
        }
        let mut values = vec![0; frame_count];
        values[frame_index] = 1;
        Ok(Self { values, frame_index })
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.values.len()
    }

    /// Fence value that will be signalled when the work recorded for `frame` completes.
    pub fn value(&self, frame: usize) -> Option<u64> {
        self.values.get(frame).copied()
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Wait for all work submitted so far, then bump the current frame's value.
    pub fn wait_for_gpu<T: GpuTimeline + ?Sized>(&mut self, timeline: &mut T) -> HelloResult<()> {
        let fence = self.values[self.frame_index];
        timeline.signal(fence)?;
        if timeline.completed_value() < fence {
            timeline.wait_for(fence)?;
        }
        self.values[self.frame_index] += 1;
        Ok(())
    }

    /// Signal the frame just submitted and make `next_index` current, waiting
    /// only if the GPU is still working on the last frame that used it.
    pub fn move_to_next_frame<T: GpuTimeline + ?Sized>(
        &mut self,
        timeline: &mut T,
        next_index: usize,
    ) -> HelloResult<()> {
        if next_index >= self.values.len() {
            return Err(eyre!(
                "back buffer index {next_index} out of range for {} frames",
                self.values.len()
            )
            .into());
        }

        let current_fence = self.values[self.frame_index];
        timeline.signal(current_fence)?;

        self.frame_index = next_index;
        let pending = self.values[next_index];
        if timeline.completed_value() < pending {
            trace!(frame = next_index, fence = pending, "back buffer still in flight");
            timeline.wait_for(pending)?;
        }

        self.values[next_index] = current_fence + 1;
        Ok(())
    }

    /// After the swap chain buffers have been recreated every frame starts
    /// from the current frame's value and `frame_index` becomes current.
    ///
    /// The queue must be idle (see [`Self::wait_for_gpu`]) before calling this.
    pub fn rebase_after_resize(&mut self, frame_index: usize) -> HelloResult<()> {
        if frame_index >= self.values.len() {
            return Err(eyre!("frame index {frame_index} out of range").into());
        }
        let current = self.values[self.frame_index];
        self.values.iter_mut().for_each(|value| *value = current);
        self.frame_index = frame_index;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// GPU that completes signals lazily, keeping up to `max_in_flight`
    /// of them pending until the CPU waits.
    #[derive(Debug, Default)]
    pub(crate) struct SimulatedGpu {
        pub completed: u64,
        pub pending: Vec<u64>,
        pub signalled: Vec<u64>,
        pub waits: Vec<u64>,
        pub max_in_flight: usize,
    }

    impl SimulatedGpu {
        pub(crate) fn with_latency(max_in_flight: usize) -> Self {
            Self {
                max_in_flight,
                ..Default::default()
            }
        }

        fn retire_front(&mut self) {
            let value = self.pending.remove(0);
            self.completed = self.completed.max(value);
        }
    }

    impl GpuTimeline for SimulatedGpu {
        fn signal(&mut self, value: u64) -> HelloResult<()> {
            self.signalled.push(value);
            self.pending.push(value);
            while self.pending.len() > self.max_in_flight {
                self.retire_front();
            }
            Ok(())
        }

        fn completed_value(&self) -> u64 {
            self.completed
        }

        fn wait_for(&mut self, value: u64) -> HelloResult<()> {
            self.waits.push(value);
            while self.completed < value {
                if self.pending.is_empty() {
                    return Err(eyre!("deadlock: waiting for {value} which was never signalled").into());
                }
                self.retire_front();
            }
            Ok(())
        }
    }

    fn strictly_increasing(values: &[u64]) -> bool {
        values.windows(2).all(|pair| pair[0] < pair[1])
    }

    #[test]
    fn flush_signals_increasing_values_and_waits_each_frame() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(1);
        let mut counter = FenceCounter::new();
        for expected in 1..=5 {
            assert_eq!(counter.signal_and_wait(&mut gpu)?, expected);
            assert!(gpu.completed_value() >= expected);
        }
        assert_eq!(gpu.signalled, vec![1, 2, 3, 4, 5]);
        assert_eq!(gpu.waits, vec![1, 2, 3, 4, 5]);
        assert_eq!(counter.next_value(), 6);
        Ok(())
    }

    #[test]
    fn flush_skips_the_wait_when_gpu_is_already_done() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(0);
        let mut counter = FenceCounter::new();
        counter.signal_and_wait(&mut gpu)?;
        counter.signal_and_wait(&mut gpu)?;
        assert!(gpu.waits.is_empty());
        assert_eq!(gpu.completed_value(), 2);
        Ok(())
    }

    #[test]
    fn frame_fences_start_with_current_frame_at_one() -> HelloResult<()> {
        let fences = FrameFences::new(2, 1)?;
        assert_eq!(fences.values(), &[0, 1]);
        assert_eq!(fences.frame_index(), 1);
        Ok(())
    }

    #[test]
    fn frame_fences_reject_bad_indices() {
        assert!(FrameFences::new(0, 0).is_err());
        assert!(FrameFences::new(2, 2).is_err());
    }

    #[test]
    fn initial_wait_for_gpu_bumps_current_frame() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(1);
        let mut fences = FrameFences::new(2, 0)?;
        fences.wait_for_gpu(&mut gpu)?;
        assert_eq!(gpu.signalled, vec![1]);
        assert_eq!(gpu.completed_value(), 1);
        assert_eq!(fences.values(), &[2, 0]);
        Ok(())
    }

    #[test]
    fn buffered_frames_never_reuse_an_allocator_in_flight() -> HelloResult<()> {
        let frame_count = 2;
        let mut gpu = SimulatedGpu::with_latency(frame_count);
        let mut fences = FrameFences::new(frame_count, 0)?;
        fences.wait_for_gpu(&mut gpu)?;

        // Fence value guarding each allocator's last submission.
        let mut allocator_guard = vec![0u64; frame_count];
        let mut back_buffer = 0;
        for _ in 0..20 {
            let frame = fences.frame_index();
            assert!(
                gpu.completed_value() >= allocator_guard[frame],
                "allocator {frame} reset while fence {} still pending",
                allocator_guard[frame]
            );
            allocator_guard[frame] = fences.value(frame).unwrap_or_default();

            back_buffer = (back_buffer + 1) % frame_count;
            fences.move_to_next_frame(&mut gpu, back_buffer)?;
        }

        assert!(strictly_increasing(&gpu.signalled));
        Ok(())
    }

    #[test]
    fn buffered_frames_only_wait_when_the_gpu_falls_behind() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(0);
        let mut fences = FrameFences::new(2, 0)?;
        fences.wait_for_gpu(&mut gpu)?;
        for index in [1, 0, 1, 0] {
            fences.move_to_next_frame(&mut gpu, index)?;
        }
        assert!(gpu.waits.is_empty());

        let mut slow_gpu = SimulatedGpu::with_latency(8);
        let mut fences = FrameFences::new(2, 0)?;
        fences.wait_for_gpu(&mut slow_gpu)?;
        for index in [1, 0, 1, 0] {
            fences.move_to_next_frame(&mut slow_gpu, index)?;
        }
        // The first wait is the initial flush, the rest are back-pressure.
        assert!(slow_gpu.waits.len() > 1);
        assert!(strictly_increasing(&slow_gpu.signalled));
        Ok(())
    }

    #[test]
    fn move_to_next_frame_records_the_next_value() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(4);
        let mut fences = FrameFences::new(2, 0)?;
        fences.wait_for_gpu(&mut gpu)?;
        fences.move_to_next_frame(&mut gpu, 1)?;
        assert_eq!(gpu.signalled.last(), Some(&2));
        assert_eq!(fences.values(), &[2, 3]);
        assert_eq!(fences.frame_index(), 1);
        Ok(())
    }

    #[test]
    fn move_to_next_frame_rejects_out_of_range_buffers() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(1);
        let mut fences = FrameFences::new(2, 0)?;
        assert!(fences.move_to_next_frame(&mut gpu, 2).is_err());
        assert!(gpu.signalled.is_empty());
        Ok(())
    }

    #[test]
    fn wait_for_gpu_drains_everything_before_teardown() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(3);
        let mut fences = FrameFences::new(3, 0)?;
        fences.wait_for_gpu(&mut gpu)?;
        for index in [1, 2, 0, 1] {
            fences.move_to_next_frame(&mut gpu, index)?;
        }
        let last_signalled = *gpu.signalled.last().unwrap_or(&0);
        fences.wait_for_gpu(&mut gpu)?;
        assert!(gpu.completed_value() > last_signalled);
        assert!(gpu.pending.is_empty());
        Ok(())
    }

    #[test]
    fn rebase_after_resize_keeps_signals_increasing() -> HelloResult<()> {
        let mut gpu = SimulatedGpu::with_latency(2);
        let mut fences = FrameFences::new(2, 0)?;
        fences.wait_for_gpu(&mut gpu)?;
        fences.move_to_next_frame(&mut gpu, 1)?;
        fences.move_to_next_frame(&mut gpu, 0)?;

        fences.wait_for_gpu(&mut gpu)?;
        fences.rebase_after_resize(0)?;
        let rebased = fences.values()[0];
        assert!(fences.values().iter().all(|value| *value == rebased));

        fences.move_to_next_frame(&mut gpu, 1)?;
        fences.move_to_next_frame(&mut gpu, 0)?;
        assert!(strictly_increasing(&gpu.signalled));
        Ok(())
    }

    #[test]
    fn rebase_after_resize_rejects_out_of_range_buffers() -> HelloResult<()> {
        let mut fences = FrameFences::new(2, 1)?;
        let before = fences.values().to_vec();
        assert!(fences.rebase_after_resize(2).is_err());
        assert_eq!(fences.values(), &before[..]);
        assert_eq!(fences.frame_index(), 1);
        Ok(())
    }
}
