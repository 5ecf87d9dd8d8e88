use spectrascale_core::gpu::{schedule, MemoryBarrier, ScheduleStep, SchedulerEvent, SchedulerState};
use spectrascale_core::pipeline::{BufferRole, PipelineStage};

// ---------------------------------------------------------------------------
// Stage hazards
// ---------------------------------------------------------------------------

#[test]
fn test_stage_bindings() {
    assert_eq!(PipelineStage::Shift.reads(), &[BufferRole::Working]);
    assert_eq!(PipelineStage::Shift.writes(), &[BufferRole::Scratch]);
    assert_eq!(PipelineStage::Sharpen.reads(), &[BufferRole::Scratch]);
    assert_eq!(PipelineStage::Sharpen.writes(), &[BufferRole::Working]);
    assert!(PipelineStage::Forward.reads().contains(&BufferRole::Input));
    assert!(PipelineStage::ORDER
        .iter()
        .all(|s| !s.writes().contains(&BufferRole::Input)));
}

#[test]
fn test_every_consecutive_stage_has_a_hazard() {
    for pair in PipelineStage::ORDER.windows(2) {
        assert!(pair[0].hazard_with(pair[1]), "{} -> {}", pair[0], pair[1]);
    }
    // Next batch's forward transform overwrites what sharpen wrote.
    assert!(PipelineStage::Sharpen.hazard_with(PipelineStage::Forward));
}

// ---------------------------------------------------------------------------
// Schedule layout
// ---------------------------------------------------------------------------

fn stages(steps: &[ScheduleStep]) -> Vec<(u32, PipelineStage)> {
    steps
        .iter()
        .filter_map(|s| match *s {
            ScheduleStep::Stage { batch, stage } => Some((batch, stage)),
            ScheduleStep::Barrier(_) => None,
        })
        .collect()
}

#[test]
fn test_single_batch_schedule() {
    let steps = schedule(&PipelineStage::ORDER, 1);
    // 4 stages with a barrier between each pair.
    assert_eq!(steps.len(), 7);
    for (i, step) in steps.iter().enumerate() {
        if i % 2 == 1 {
            assert_eq!(*step, ScheduleStep::Barrier(MemoryBarrier::WRITE_TO_READ));
        } else {
            assert!(matches!(step, ScheduleStep::Stage { batch: 0, .. }));
        }
    }
}

#[test]
fn test_repeated_batches_are_serialised() {
    let steps = schedule(&PipelineStage::ORDER, 2);
    assert_eq!(steps.len(), 15);
    assert!(matches!(steps[0], ScheduleStep::Stage { .. }));
    assert!(matches!(steps[14], ScheduleStep::Stage { .. }));
    // Barrier between batch 0 sharpen and batch 1 forward.
    assert_eq!(
        steps[6],
        ScheduleStep::Stage {
            batch: 0,
            stage: PipelineStage::Sharpen
        }
    );
    assert!(matches!(steps[7], ScheduleStep::Barrier(_)));
    assert_eq!(
        steps[8],
        ScheduleStep::Stage {
            batch: 1,
            stage: PipelineStage::Forward
        }
    );

    let order = stages(&steps);
    assert_eq!(order.len(), 8);
    for (i, (batch, stage)) in order.iter().enumerate() {
        assert_eq!(*batch as usize, i / 4);
        assert_eq!(*stage, PipelineStage::ORDER[i % 4]);
    }
}

#[test]
fn test_empty_schedule() {
    assert!(schedule(&PipelineStage::ORDER, 0).is_empty());
    assert!(schedule(&[], 3).is_empty());
}

#[test]
fn test_stage_repeated_on_itself_waits() {
    // Shift writes scratch, so a second shift must wait for the first.
    let steps = schedule(&[PipelineStage::Shift], 3);
    let barriers = steps
        .iter()
        .filter(|s| matches!(s, ScheduleStep::Barrier(_)))
        .count();
    assert_eq!(barriers, 2);
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[test]
fn test_successful_submission_cycle() {
    let mut state = SchedulerState::Idle;
    for (event, expected) in [
        (SchedulerEvent::Begin, SchedulerState::Recording),
        (SchedulerEvent::Submit, SchedulerState::Submitted),
        (SchedulerEvent::Signal, SchedulerState::Signaled),
        (SchedulerEvent::Reset, SchedulerState::Idle),
    ] {
        state = state.advance(event).unwrap();
        assert_eq!(state, expected);
    }
}

#[test]
fn test_timeout_returns_to_idle() {
    let state = SchedulerState::Submitted
        .advance(SchedulerEvent::Timeout)
        .unwrap();
    assert_eq!(state, SchedulerState::TimedOut);
    assert_eq!(state.advance(SchedulerEvent::Reset), Some(SchedulerState::Idle));
}

#[test]
fn test_invalid_transitions() {
    assert_eq!(SchedulerState::Idle.advance(SchedulerEvent::Submit), None);
    assert_eq!(SchedulerState::Recording.advance(SchedulerEvent::Begin), None);
    assert_eq!(SchedulerState::Submitted.advance(SchedulerEvent::Reset), None);
    assert_eq!(SchedulerState::Signaled.advance(SchedulerEvent::Timeout), None);
}
