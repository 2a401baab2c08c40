//! The upload/process/download flow as a pure state machine.
//!
//! Four states, three events. `step` returns the next state plus a command
//! for the caller to execute; it performs no I/O itself, so the same flow
//! can sit behind a CLI, a web handler, or a test harness.

/// Where a session currently is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No files uploaded.
    #[default]
    Idle,
    /// Files present, processing not yet requested.
    Ready,
    /// Batch running to completion.
    Processing,
    /// A download has been offered.
    Done,
}

/// External stimulus applied to a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The uploaded file set changed; `count` is the new number of files.
    FileSetChanged { count: usize },
    /// The user asked for processing to start.
    ProcessTriggered,
    /// The batch ran to completion.
    ProcessingFinished,
}

/// Side effect the caller must perform after a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    None,
    RunBatch,
    OfferDownload,
}

/// Advance the session state machine by one event.
pub fn step(state: SessionState, event: Event) -> (SessionState, Command) {
    use Command as C;
    use SessionState as S;

    match (state, event) {
        // A running batch cannot be cancelled, retriggered, or have its
        // inputs swapped out from under it.
        (S::Processing, Event::ProcessingFinished) => (S::Done, C::OfferDownload),
        (S::Processing, _) => (S::Processing, C::None),

        (_, Event::FileSetChanged { count: 0 }) => (S::Idle, C::None),
        (_, Event::FileSetChanged { .. }) => (S::Ready, C::None),

        (S::Ready, Event::ProcessTriggered) => (S::Processing, C::RunBatch),

        (state, _) => (state, C::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command as C;
    use SessionState as S;

    #[test]
    fn test_happy_path() {
        let (s, c) = step(S::Idle, Event::FileSetChanged { count: 2 });
        assert_eq!((s, c), (S::Ready, C::None));

        let (s, c) = step(s, Event::ProcessTriggered);
        assert_eq!((s, c), (S::Processing, C::RunBatch));

        let (s, c) = step(s, Event::ProcessingFinished);
        assert_eq!((s, c), (S::Done, C::OfferDownload));
    }

    #[test]
    fn test_trigger_without_files_is_a_noop() {
        let (s, c) = step(S::Idle, Event::ProcessTriggered);
        assert_eq!((s, c), (S::Idle, C::None));
    }

    #[test]
    fn test_clearing_files_returns_to_idle() {
        for state in [S::Ready, S::Done] {
            let (s, c) = step(state, Event::FileSetChanged { count: 0 });
            assert_eq!((s, c), (S::Idle, C::None));
        }
    }

    #[test]
    fn test_new_files_after_done_make_session_ready_again() {
        let (s, c) = step(S::Done, Event::FileSetChanged { count: 1 });
        assert_eq!((s, c), (S::Ready, C::None));
    }

    #[test]
    fn test_processing_only_leaves_via_finish() {
        let events = [
            Event::FileSetChanged { count: 0 },
            Event::FileSetChanged { count: 3 },
            Event::ProcessTriggered,
        ];
        for event in events {
            let (s, c) = step(S::Processing, event);
            assert_eq!((s, c), (S::Processing, C::None));
        }
    }

    #[test]
    fn test_finish_outside_processing_is_a_noop() {
        for state in [S::Idle, S::Ready, S::Done] {
            let (s, c) = step(state, Event::ProcessingFinished);
            assert_eq!((s, c), (state, C::None));
        }
    }
}
