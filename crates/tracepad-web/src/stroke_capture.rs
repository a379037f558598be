#![forbid(unsafe_code)]

//! Deterministic pointer lifecycle adapter for freehand strokes.
//!
//! Browser hosts forward raw pointer signals here and get back:
//! - the stroke action to apply (begin, extend, end), if any,
//! - an optional pointer-capture command for the host, and
//! - a structured log entry describing what happened and why.
//!
//! Only one pointer draws at a time. A second finger or a stray mouse button
//! is ignored rather than interleaved into the active stroke. Interruption
//! paths (cancel, blur, lost capture, leaving the surface without capture)
//! end the stroke the same way a pointer-up does.

use tracepad_render::Point;

/// Mouse button, or the equivalent for pen and touch contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeCaptureConfig {
    /// Button required to start a stroke.
    pub activation_button: PointerButton,
    /// If true, leaving the surface ends the stroke unless capture was
    /// acknowledged by the host.
    pub end_on_leave_without_capture: bool,
}

impl Default for StrokeCaptureConfig {
    fn default() -> Self {
        Self {
            activation_button: PointerButton::Primary,
            end_on_leave_without_capture: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Requested,
    Acquired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    pointer_id: u32,
    button: PointerButton,
    capture_state: CaptureState,
}

impl ActivePointer {
    fn release_command(self) -> Option<CaptureCommand> {
        (self.capture_state == CaptureState::Acquired).then_some(CaptureCommand::Release {
            pointer_id: self.pointer_id,
        })
    }
}

/// Pointer-capture command for the host (`setPointerCapture` /
/// `releasePointerCapture` in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Lifecycle signal recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    Blur,
    LostPointerCapture,
    CaptureAcquired,
}

/// Why a signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ButtonMismatch,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    LeaveWhileCaptured,
    /// The position could not be mapped onto the surface.
    Unmappable,
}

/// What the controller should do with the stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeAction {
    Begin(Point),
    Extend(Point),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutcome {
    StrokeForwarded,
    CaptureStateUpdated,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub phase: PointerPhase,
    pub sequence: Option<u64>,
    pub pointer_id: Option<u32>,
    pub position: Option<Point>,
    pub capture_command: Option<CaptureCommand>,
    pub outcome: LogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDispatch {
    pub action: Option<StrokeAction>,
    pub capture_command: Option<CaptureCommand>,
    pub log: LogEntry,
}

impl StrokeDispatch {
    pub(crate) fn ignored(
        phase: PointerPhase,
        reason: IgnoredReason,
        pointer_id: Option<u32>,
        position: Option<Point>,
    ) -> Self {
        Self {
            action: None,
            capture_command: None,
            log: LogEntry {
                phase,
                sequence: None,
                pointer_id,
                position,
                capture_command: None,
                outcome: LogOutcome::Ignored(reason),
            },
        }
    }

    fn capture_state_updated(phase: PointerPhase, pointer_id: u32) -> Self {
        Self {
            action: None,
            capture_command: None,
            log: LogEntry {
                phase,
                sequence: None,
                pointer_id: Some(pointer_id),
                position: None,
                capture_command: None,
                outcome: LogOutcome::CaptureStateUpdated,
            },
        }
    }

    /// True when the signal changed the stroke.
    #[must_use]
    pub const fn is_forwarded(&self) -> bool {
        matches!(self.log.outcome, LogOutcome::StrokeForwarded)
    }
}

/// Single-pointer stroke lifecycle tracker.
#[derive(Debug, Clone, Default)]
pub struct StrokeCaptureAdapter {
    config: StrokeCaptureConfig,
    active: Option<ActivePointer>,
    next_sequence: u64,
}

impl StrokeCaptureAdapter {
    #[must_use]
    pub fn new(config: StrokeCaptureConfig) -> Self {
        Self {
            config,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> StrokeCaptureConfig {
        self.config
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    fn forward(
        &mut self,
        phase: PointerPhase,
        pointer_id: u32,
        action: StrokeAction,
        position: Option<Point>,
        capture_command: Option<CaptureCommand>,
    ) -> StrokeDispatch {
        let sequence = self.next_sequence.max(1);
        self.next_sequence = sequence.saturating_add(1);
        StrokeDispatch {
            action: Some(action),
            capture_command,
            log: LogEntry {
                phase,
                sequence: Some(sequence),
                pointer_id: Some(pointer_id),
                position,
                capture_command,
                outcome: LogOutcome::StrokeForwarded,
            },
        }
    }

    /// Start a stroke at `position`.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
    ) -> StrokeDispatch {
        let phase = PointerPhase::PointerDown;
        if pointer_id == 0 {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::InvalidPointerId,
                Some(pointer_id),
                Some(position),
            );
        }
        if button != self.config.activation_button {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::ButtonNotAllowed,
                Some(pointer_id),
                Some(position),
            );
        }
        if self.active.is_some() {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::ActivePointerAlreadyInProgress,
                Some(pointer_id),
                Some(position),
            );
        }
        self.active = Some(ActivePointer {
            pointer_id,
            button,
            capture_state: CaptureState::Requested,
        });
        self.forward(
            phase,
            pointer_id,
            StrokeAction::Begin(position),
            Some(position),
            Some(CaptureCommand::Acquire { pointer_id }),
        )
    }

    /// Host confirmed pointer capture.
    pub fn capture_acquired(&mut self, pointer_id: u32) -> StrokeDispatch {
        let phase = PointerPhase::CaptureAcquired;
        let Some(mut active) = self.active else {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }
        active.capture_state = CaptureState::Acquired;
        self.active = Some(active);
        StrokeDispatch::capture_state_updated(phase, pointer_id)
    }

    /// Extend the active stroke to `position`.
    pub fn pointer_move(&mut self, pointer_id: u32, position: Point) -> StrokeDispatch {
        let phase = PointerPhase::PointerMove;
        let Some(active) = self.active else {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                Some(position),
            );
        };
        if active.pointer_id != pointer_id {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(position),
            );
        }
        self.forward(
            phase,
            pointer_id,
            StrokeAction::Extend(position),
            Some(position),
            None,
        )
    }

    /// Finish the active stroke.
    pub fn pointer_up(&mut self, pointer_id: u32, button: PointerButton) -> StrokeDispatch {
        let phase = PointerPhase::PointerUp;
        let Some(active) = self.active else {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }
        if active.button != button {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::ButtonMismatch,
                Some(pointer_id),
                None,
            );
        }
        self.end_active(phase, active)
    }

    /// Browser pointer-cancel. `None` cancels whatever pointer is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> StrokeDispatch {
        self.interrupt(PointerPhase::PointerCancel, pointer_id)
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> StrokeDispatch {
        self.interrupt(PointerPhase::LostPointerCapture, Some(pointer_id))
    }

    /// Window lost focus.
    pub fn blur(&mut self) -> StrokeDispatch {
        self.interrupt(PointerPhase::Blur, None)
    }

    /// Pointer left the surface. Ends the stroke unless the host holds
    /// capture, in which case moves keep arriving from outside.
    pub fn pointer_leave(&mut self, pointer_id: u32) -> StrokeDispatch {
        let phase = PointerPhase::PointerLeave;
        let Some(active) = self.active else {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return StrokeDispatch::ignored(
                phase,
                IgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }
        if active.capture_state == CaptureState::Requested
            && self.config.end_on_leave_without_capture
        {
            self.end_active(phase, active)
        } else {
            StrokeDispatch::ignored(
                phase,
                IgnoredReason::LeaveWhileCaptured,
                Some(pointer_id),
                None,
            )
        }
    }

    /// Forget the active pointer without emitting a stroke action. Returns
    /// the release command the host still owes, if capture was held.
    pub fn reset(&mut self) -> Option<CaptureCommand> {
        self.active.take().and_then(ActivePointer::release_command)
    }

    fn interrupt(&mut self, phase: PointerPhase, pointer_id: Option<u32>) -> StrokeDispatch {
        let Some(active) = self.active else {
            return StrokeDispatch::ignored(phase, IgnoredReason::NoActivePointer, pointer_id, None);
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return StrokeDispatch::ignored(phase, IgnoredReason::PointerMismatch, Some(id), None);
        }
        self.end_active(phase, active)
    }

    fn end_active(&mut self, phase: PointerPhase, active: ActivePointer) -> StrokeDispatch {
        self.active = None;
        let release = if phase == PointerPhase::LostPointerCapture {
            None
        } else {
            active.release_command()
        };
        self.forward(phase, active.pointer_id, StrokeAction::End, None, release)
    }
}

#[cfg(test)]
mod tests {
    use tracepad_render::Point;

    use super::{
        CaptureCommand, IgnoredReason, LogOutcome, PointerButton, PointerPhase, StrokeAction,
        StrokeCaptureAdapter, StrokeCaptureConfig,
    };

    fn adapter() -> StrokeCaptureAdapter {
        StrokeCaptureAdapter::new(StrokeCaptureConfig::default())
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn down_move_up_forwards_begin_extend_end() {
        let mut adapter = adapter();
        let down = adapter.pointer_down(7, PointerButton::Primary, p(1.0, 2.0));
        assert_eq!(down.action, Some(StrokeAction::Begin(p(1.0, 2.0))));
        assert_eq!(
            down.capture_command,
            Some(CaptureCommand::Acquire { pointer_id: 7 })
        );
        assert_eq!(down.log.sequence, Some(1));

        let moved = adapter.pointer_move(7, p(3.0, 4.0));
        assert_eq!(moved.action, Some(StrokeAction::Extend(p(3.0, 4.0))));
        assert_eq!(moved.log.sequence, Some(2));

        let up = adapter.pointer_up(7, PointerButton::Primary);
        assert_eq!(up.action, Some(StrokeAction::End));
        // Capture was requested but never acknowledged, so nothing to release.
        assert_eq!(up.capture_command, None);
        assert_eq!(adapter.active_pointer_id(), None);
    }

    #[test]
    fn second_pointer_is_ignored_while_one_is_drawing() {
        let mut adapter = adapter();
        adapter.pointer_down(1, PointerButton::Primary, p(0.0, 0.0));
        let second = adapter.pointer_down(2, PointerButton::Primary, p(5.0, 5.0));
        assert_eq!(
            second.log.outcome,
            LogOutcome::Ignored(IgnoredReason::ActivePointerAlreadyInProgress)
        );
        let foreign_move = adapter.pointer_move(2, p(6.0, 6.0));
        assert_eq!(
            foreign_move.log.outcome,
            LogOutcome::Ignored(IgnoredReason::PointerMismatch)
        );
        assert_eq!(adapter.active_pointer_id(), Some(1));
    }

    #[test]
    fn invalid_id_and_wrong_button_never_start_a_stroke() {
        let mut adapter = adapter();
        let zero = adapter.pointer_down(0, PointerButton::Primary, p(0.0, 0.0));
        assert_eq!(
            zero.log.outcome,
            LogOutcome::Ignored(IgnoredReason::InvalidPointerId)
        );
        let right = adapter.pointer_down(3, PointerButton::Secondary, p(0.0, 0.0));
        assert_eq!(
            right.log.outcome,
            LogOutcome::Ignored(IgnoredReason::ButtonNotAllowed)
        );
        assert_eq!(adapter.active_pointer_id(), None);
    }

    #[test]
    fn acquired_capture_is_released_on_up() {
        let mut adapter = adapter();
        adapter.pointer_down(4, PointerButton::Primary, p(0.0, 0.0));
        let acquired = adapter.capture_acquired(4);
        assert_eq!(acquired.log.outcome, LogOutcome::CaptureStateUpdated);
        let up = adapter.pointer_up(4, PointerButton::Primary);
        assert_eq!(
            up.capture_command,
            Some(CaptureCommand::Release { pointer_id: 4 })
        );
    }

    #[test]
    fn leave_ends_stroke_only_without_capture() {
        let mut adapter = adapter();
        adapter.pointer_down(1, PointerButton::Primary, p(0.0, 0.0));
        let leave = adapter.pointer_leave(1);
        assert_eq!(leave.action, Some(StrokeAction::End));
        assert_eq!(leave.log.phase, PointerPhase::PointerLeave);

        adapter.pointer_down(2, PointerButton::Primary, p(0.0, 0.0));
        adapter.capture_acquired(2);
        let leave = adapter.pointer_leave(2);
        assert_eq!(
            leave.log.outcome,
            LogOutcome::Ignored(IgnoredReason::LeaveWhileCaptured)
        );
        assert_eq!(adapter.active_pointer_id(), Some(2));
    }

    #[test]
    fn interruptions_end_the_stroke() {
        let mut adapter = adapter();
        adapter.pointer_down(1, PointerButton::Primary, p(0.0, 0.0));
        adapter.capture_acquired(1);
        let blur = adapter.blur();
        assert_eq!(blur.action, Some(StrokeAction::End));
        assert_eq!(
            blur.capture_command,
            Some(CaptureCommand::Release { pointer_id: 1 })
        );

        adapter.pointer_down(2, PointerButton::Primary, p(0.0, 0.0));
        adapter.capture_acquired(2);
        let lost = adapter.lost_pointer_capture(2);
        assert_eq!(lost.action, Some(StrokeAction::End));
        // Capture is already gone; nothing to release.
        assert_eq!(lost.capture_command, None);

        let idle_cancel = adapter.pointer_cancel(None);
        assert_eq!(
            idle_cancel.log.outcome,
            LogOutcome::Ignored(IgnoredReason::NoActivePointer)
        );
    }

    #[test]
    fn up_with_other_button_is_ignored() {
        let mut adapter = adapter();
        adapter.pointer_down(1, PointerButton::Primary, p(0.0, 0.0));
        let up = adapter.pointer_up(1, PointerButton::Middle);
        assert_eq!(
            up.log.outcome,
            LogOutcome::Ignored(IgnoredReason::ButtonMismatch)
        );
        assert_eq!(adapter.active_pointer_id(), Some(1));
    }

    #[test]
    fn reset_reports_owed_release() {
        let mut adapter = adapter();
        adapter.pointer_down(9, PointerButton::Primary, p(0.0, 0.0));
        adapter.capture_acquired(9);
        assert_eq!(
            adapter.reset(),
            Some(CaptureCommand::Release { pointer_id: 9 })
        );
        assert_eq!(adapter.reset(), None);
    }
}
