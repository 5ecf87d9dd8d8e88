//! Recording, submission and fence wait for `batch x [Forward, Shift, Inverse, Sharpen]`.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::consts::FENCE_TIMEOUT;
use crate::error::{Result, SpectraError};
use crate::pipeline::PipelineStage;

use super::context::GpuContext;
use super::fft::FftApplication;
use super::kernel_app::KernelApplication;
use super::recorder::{CommandRecorder, MemoryBarrier, RecordedOp};

/// One entry of a recorded schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleStep {
    Stage { batch: u32, stage: PipelineStage },
    Barrier(MemoryBarrier),
}

/// Lay out `batch_count` repetitions of `stages`, with a barrier wherever a
/// stage writes something the following stage reads or writes.
pub fn schedule(stages: &[PipelineStage], batch_count: u32) -> Vec<ScheduleStep> {
    let mut steps = Vec::with_capacity(stages.len() * batch_count as usize * 2);
    let mut previous: Option<PipelineStage> = None;
    for batch in 0..batch_count {
        for &stage in stages {
            if previous.is_some_and(|p| p.hazard_with(stage)) {
                steps.push(ScheduleStep::Barrier(MemoryBarrier::WRITE_TO_READ));
            }
            steps.push(ScheduleStep::Stage { batch, stage });
            previous = Some(stage);
        }
    }
    steps
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Recording,
    Submitted,
    Signaled,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    Begin,
    Submit,
    Signal,
    Timeout,
    Reset,
}

impl SchedulerState {
    /// Next state, or `None` when `event` is not valid here.
    pub fn advance(self, event: SchedulerEvent) -> Option<SchedulerState> {
        use SchedulerEvent as E;
        use SchedulerState as S;
        match (self, event) {
            (S::Idle, E::Begin) => Some(S::Recording),
            (S::Recording, E::Submit) => Some(S::Submitted),
            (S::Submitted, E::Signal) => Some(S::Signaled),
            (S::Submitted, E::Timeout) => Some(S::TimedOut),
            (S::Signaled | S::TimedOut, E::Reset) => Some(S::Idle),
            _ => None,
        }
    }
}

/// The four bound stages of one plan.
pub struct StageSet<'a> {
    pub forward: &'a FftApplication,
    pub shift: &'a KernelApplication,
    pub inverse: &'a FftApplication,
    pub sharpen: &'a KernelApplication,
}

impl StageSet<'_> {
    fn record(&self, stage: PipelineStage, recorder: &mut CommandRecorder) {
        match stage {
            PipelineStage::Forward => self.forward.record(recorder),
            PipelineStage::Shift => recorder.dispatch(self.shift),
            PipelineStage::Inverse => self.inverse.record(recorder),
            PipelineStage::Sharpen => recorder.dispatch(self.sharpen),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub batch_count: u32,
    pub elapsed: Duration,
    /// Everything that went into the submission, in order.
    pub ops: Vec<RecordedOp>,
}

impl RunReport {
    pub fn per_batch(&self) -> Duration {
        self.elapsed / self.batch_count.max(1)
    }
}

pub struct PipelineScheduler {
    state: SchedulerState,
}

impl Default for PipelineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
        }
    }

    fn transition(&mut self, event: SchedulerEvent) -> Result<()> {
        self.state = self.state.advance(event).ok_or_else(|| {
            SpectraError::Device(format!("scheduler cannot {event:?} while {:?}", self.state))
        })?;
        Ok(())
    }

    /// Record `batch_count` repetitions of the pipeline into one submission
    /// and block until it completes.
    pub fn run(
        &mut self,
        ctx: &GpuContext,
        stages: &StageSet<'_>,
        batch_count: u32,
    ) -> Result<RunReport> {
        let steps = schedule(&PipelineStage::ORDER, batch_count.max(1));
        self.transition(SchedulerEvent::Begin)?;
        let mut recorder = CommandRecorder::new(ctx.encoder("upscale"));
        for step in &steps {
            match *step {
                ScheduleStep::Stage { stage, .. } => stages.record(stage, &mut recorder),
                ScheduleStep::Barrier(barrier) => recorder.barrier(barrier),
            }
        }
        let (commands, ops) = recorder.finish();

        let start = Instant::now();
        let index = ctx.queue.submit(std::iter::once(commands));
        self.transition(SchedulerEvent::Submit)?;
        match ctx.poll_submission(index) {
            Ok(()) => {
                self.transition(SchedulerEvent::Signal)?;
            }
            Err(wgpu::PollError::Timeout) => {
                self.transition(SchedulerEvent::Timeout)?;
                self.transition(SchedulerEvent::Reset)?;
                warn!(timeout = ?FENCE_TIMEOUT, "Submission timed out");
                return Err(SpectraError::Device(format!(
                    "submission did not signal within {FENCE_TIMEOUT:?}"
                )));
            }
            Err(e) => {
                self.state = SchedulerState::Idle;
                return Err(SpectraError::Device(format!("submission failed: {e}")));
            }
        }
        let elapsed = start.elapsed();
        self.transition(SchedulerEvent::Reset)?;

        let report = RunReport {
            batch_count: batch_count.max(1),
            elapsed,
            ops,
        };
        debug!(
            batches = report.batch_count,
            ops = report.ops.len(),
            per_batch_ms = report.per_batch().as_secs_f64() * 1000.0,
            "Pipeline submission complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_barrier_before_first_stage() {
        let steps = schedule(&PipelineStage::ORDER, 1);
        assert!(matches!(steps[0], ScheduleStep::Stage { .. }));
        assert!(matches!(steps.last(), Some(ScheduleStep::Stage { .. })));
    }

    #[test]
    fn repeated_stage_waits_on_its_own_writes() {
        let steps = schedule(&[PipelineStage::Shift, PipelineStage::Shift], 1);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1], ScheduleStep::Barrier(MemoryBarrier::WRITE_TO_READ));
    }
}
