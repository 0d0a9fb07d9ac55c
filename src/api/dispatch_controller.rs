use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FigureError, FigureResult};
use crate::extensions::FigureEvent;
use crate::protocol::{Instruction, InvalidationLevel, InvalidationTopic, RenderDelta};
use crate::render::Renderer;

use super::FigureSession;

/// Origin of an instruction, reported back with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionSource {
    Api,
    Menu { menu: usize, option: usize },
    Slider { slider: usize, step: usize },
}

/// Result of committing one queued instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub source: InstructionSource,
    pub method: &'static str,
    pub result: Result<RenderDelta, FigureError>,
}

impl CommitOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub(super) struct QueuedInstruction {
    pub(super) source: InstructionSource,
    pub(super) instruction: Instruction,
}

impl<R: Renderer> FigureSession<R> {
    /// Queues `instruction` for the next `process_pending` call.
    pub fn submit(&mut self, instruction: Instruction) -> FigureResult<()> {
        self.enqueue(InstructionSource::Api, instruction)
    }

    #[must_use]
    pub fn pending_instruction_count(&self) -> usize {
        self.queue.len()
    }

    /// Commits queued instructions in FIFO order, each all-or-nothing.
    ///
    /// A rejected instruction does not stop the ones queued after it.
    pub fn process_pending(&mut self) -> Vec<CommitOutcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(queued) = self.queue.pop_front() {
            let result = self.commit(queued.source, &queued.instruction);
            outcomes.push(CommitOutcome {
                source: queued.source,
                method: queued.instruction.method(),
                result,
            });
        }
        debug!(
            committed = outcomes.iter().filter(|outcome| outcome.is_committed()).count(),
            rejected = outcomes.iter().filter(|outcome| !outcome.is_committed()).count(),
            "pending instructions processed"
        );
        outcomes
    }

    /// Commits `instruction` immediately, bypassing the queue.
    pub fn dispatch(&mut self, instruction: &Instruction) -> FigureResult<RenderDelta> {
        self.commit(InstructionSource::Api, instruction)
    }

    pub(super) fn enqueue(
        &mut self,
        source: InstructionSource,
        instruction: Instruction,
    ) -> FigureResult<()> {
        let capacity = self.config.max_queued_instructions;
        if self.queue.len() >= capacity {
            warn!(
                capacity,
                method = instruction.method(),
                "instruction queue is full"
            );
            return Err(FigureError::QueueFull { capacity });
        }
        self.queue.push_back(QueuedInstruction {
            source,
            instruction,
        });
        Ok(())
    }

    pub(super) fn commit(
        &mut self,
        source: InstructionSource,
        instruction: &Instruction,
    ) -> FigureResult<RenderDelta> {
        let previous_frame = self.figure.playback().active_frame().map(ToOwned::to_owned);
        let mut delta = match self.figure.apply(instruction) {
            Ok(delta) => delta,
            Err(err) => {
                warn!(
                    error = %err,
                    method = instruction.method(),
                    ?source,
                    "instruction rejected"
                );
                self.emit_event(FigureEvent::InstructionRejected {
                    method: instruction.method().to_owned(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        let activated = self.mark_control_active(source);
        if activated.is_some() {
            delta
                .mask
                .raise(InvalidationLevel::Style, InvalidationTopic::Controls);
        }
        self.record_delta(&delta);
        self.emit_event(FigureEvent::InstructionCommitted {
            method: instruction.method().to_owned(),
            level: delta.mask.level(),
            traces: delta.traces.clone(),
        });
        if let Some((control, index)) = activated {
            self.emit_event(FigureEvent::ControlActivated { control, index });
        }
        if self.figure.playback().active_frame() != previous_frame.as_deref()
            || delta.transition.is_some()
        {
            self.emit_playback_changed();
        }
        self.render_after_commit(&delta);
        Ok(delta)
    }

    /// Folds a committed delta into the generation counter and the pending
    /// invalidation.
    pub(super) fn record_delta(&mut self, delta: &RenderDelta) {
        if delta.is_none() {
            return;
        }
        self.generation += 1;
        self.pending.merge(delta.mask);
    }

    pub(super) fn render_after_commit(&mut self, delta: &RenderDelta) {
        if delta.is_none() || !self.config.render_on_commit {
            return;
        }
        if let Err(err) = self.render() {
            warn!(error = %err, "render after commit failed; invalidation kept pending");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{FigureSession, SessionConfig};
    use crate::core::{Figure, Trace, TraceKind};
    use crate::error::FigureError;
    use crate::protocol::{Instruction, LayoutPatch};
    use crate::render::NullRenderer;

    fn session(capacity: usize) -> FigureSession<NullRenderer> {
        let figure = Figure::builder()
            .trace(Trace::xy(TraceKind::Bar, ["a"], [1.0]).expect("bar"))
            .build()
            .expect("figure");
        let config = SessionConfig::new().with_max_queued_instructions(capacity);
        FigureSession::new(NullRenderer::default(), figure, config).expect("session")
    }

    #[test]
    fn queue_rejects_overflow() {
        let mut session = session(1);
        session.submit(Instruction::Skip).expect("first fits");
        let err = session.submit(Instruction::Skip).expect_err("second overflows");
        assert_eq!(err, FigureError::QueueFull { capacity: 1 });
        assert_eq!(session.pending_instruction_count(), 1);
    }

    #[test]
    fn skip_does_not_bump_generation() {
        let mut session = session(4);
        session.dispatch(&Instruction::Skip).expect("skip");
        assert_eq!(session.generation(), 0);
        session
            .dispatch(&Instruction::relayout(LayoutPatch::new().with_title("t")))
            .expect("relayout");
        assert_eq!(session.generation(), 1);
    }
}
