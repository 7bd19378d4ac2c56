//! The turn controller state machine.
//!
//! One controller runs for the lifetime of a session. It owns the
//! transcript, the capability mode, and the request state, and it is the
//! only writer of all three; the UI reads them and forwards intents in.
//! There is never more than one request in flight: submissions while
//! InFlight are ignored entirely, with no queueing and no cancellation.

use tracing::debug;

use crate::core::dispatch::{route, Mode, RequestDescriptor, RoutingConfig};
use crate::core::message::{Message, Transcript};

/// Lifecycle of the single in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
    Failed(String),
}

pub struct TurnController {
    transcript: Transcript,
    mode: Mode,
    state: RequestState,
    routing: RoutingConfig,
}

impl TurnController {
    pub fn new(routing: RoutingConfig, system_prompt: &str) -> Self {
        Self {
            transcript: Transcript::new(system_prompt),
            mode: Mode::Text,
            state: RequestState::Idle,
            routing,
        }
    }

    pub fn entries(&self) -> &[Message] {
        self.transcript.entries()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == RequestState::InFlight
    }

    /// The stored failure message, if the last turn failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Submit one user turn. From Idle or Failed, a non-blank submission
    /// appends the user entry, clears any stored failure, moves to
    /// InFlight, and returns the routed descriptor for dispatch. Blank
    /// input is a no-op, as is any submission while a request is already
    /// in flight.
    pub fn submit(&mut self, text: &str) -> Option<RequestDescriptor> {
        if self.is_in_flight() {
            debug!("submission ignored while a request is in flight");
            return None;
        }

        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let descriptor = route(self.mode, &self.routing, self.transcript.entries(), text);
        self.transcript.append(Message::user(text));
        self.state = RequestState::InFlight;
        Some(descriptor)
    }

    /// Apply a successful turn: append the normalized assistant entry and
    /// return to Idle. Deliveries that arrive when no request is in flight
    /// are discarded.
    pub fn finish_turn(&mut self, entry: Message) {
        if !self.is_in_flight() {
            debug!("discarding turn completion delivered while not in flight");
            return;
        }
        self.transcript.append(entry);
        self.state = RequestState::Idle;
    }

    /// Apply a failed turn: store the failure message. No assistant entry
    /// is appended; the user entry from submission remains permanently.
    pub fn fail_turn(&mut self, message: String) {
        if !self.is_in_flight() {
            debug!("discarding turn failure delivered while not in flight");
            return;
        }
        self.state = RequestState::Failed(message);
    }

    /// Toggle between text and image mode. Refused while a request is in
    /// flight, so a completion can never be normalized under a different
    /// mode than it was routed with. Returns whether the toggle happened.
    pub fn toggle_mode(&mut self) -> bool {
        if self.is_in_flight() {
            debug!("mode toggle ignored while a request is in flight");
            return false;
        }
        self.mode = self.mode.toggled();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;

    fn controller() -> TurnController {
        TurnController::new(
            RoutingConfig {
                base_url: "https://api.example.test/v1".to_string(),
                chat_model: "gpt-4".to_string(),
                image_model: "dall-e-3".to_string(),
            },
            "You are a helpful assistant.",
        )
    }

    #[test]
    fn accepted_submission_appends_exactly_one_user_entry() {
        let mut c = controller();
        let descriptor = c.submit("hello");
        assert!(descriptor.is_some());
        assert_eq!(c.entries().len(), 2);
        assert_eq!(c.entries()[1].role, TranscriptRole::User);
        assert_eq!(c.entries()[1].content, "hello");
        assert_eq!(*c.state(), RequestState::InFlight);
    }

    #[test]
    fn blank_submission_is_a_no_op() {
        let mut c = controller();
        assert!(c.submit("").is_none());
        assert!(c.submit("   \t ").is_none());
        assert_eq!(c.entries().len(), 1);
        assert_eq!(*c.state(), RequestState::Idle);
    }

    #[test]
    fn submission_while_in_flight_is_rejected() {
        let mut c = controller();
        c.submit("first").unwrap();
        let len_before = c.entries().len();

        assert!(c.submit("second").is_none());
        assert_eq!(c.entries().len(), len_before);
        assert_eq!(*c.state(), RequestState::InFlight);
    }

    #[test]
    fn successful_turn_appends_assistant_entry_and_returns_to_idle() {
        let mut c = controller();
        c.submit("hello").unwrap();
        c.finish_turn(Message::assistant("hi"));

        assert_eq!(*c.state(), RequestState::Idle);
        let last = c.entries().last().unwrap();
        assert_eq!(last.role, TranscriptRole::Assistant);
        assert_eq!(last.content, "hi");
        assert!(last.image_url.is_none());
    }

    #[test]
    fn failed_turn_keeps_the_dangling_user_entry() {
        let mut c = controller();
        c.submit("hello").unwrap();
        c.fail_turn("request failed with status 500".to_string());

        assert_eq!(
            *c.state(),
            RequestState::Failed("request failed with status 500".to_string())
        );
        assert_eq!(c.failure(), Some("request failed with status 500"));
        let last = c.entries().last().unwrap();
        assert_eq!(last.role, TranscriptRole::User);
    }

    #[test]
    fn resubmission_from_failed_clears_the_stored_failure() {
        let mut c = controller();
        c.submit("hello").unwrap();
        c.fail_turn("request failed".to_string());

        let descriptor = c.submit("again");
        assert!(descriptor.is_some());
        assert_eq!(*c.state(), RequestState::InFlight);
        assert!(c.failure().is_none());
    }

    #[test]
    fn late_deliveries_are_discarded_when_not_in_flight() {
        let mut c = controller();
        let len_before = c.entries().len();

        c.finish_turn(Message::assistant("stale"));
        assert_eq!(c.entries().len(), len_before);
        assert_eq!(*c.state(), RequestState::Idle);

        c.fail_turn("stale failure".to_string());
        assert_eq!(*c.state(), RequestState::Idle);
    }

    #[test]
    fn mode_toggle_is_refused_while_in_flight() {
        let mut c = controller();
        assert_eq!(c.mode(), Mode::Text);
        assert!(c.toggle_mode());
        assert_eq!(c.mode(), Mode::Image);

        c.submit("a cat").unwrap();
        assert!(!c.toggle_mode());
        assert_eq!(c.mode(), Mode::Image);

        c.finish_turn(Message::assistant_image("a cat", "https://x/img.png"));
        assert!(c.toggle_mode());
        assert_eq!(c.mode(), Mode::Text);
    }

    #[test]
    fn image_mode_routes_the_image_descriptor() {
        let mut c = controller();
        c.toggle_mode();
        let descriptor = c.submit("a red panda").unwrap();
        assert!(matches!(descriptor, RequestDescriptor::Image { .. }));
    }

    #[test]
    fn entries_reads_are_idempotent_between_transitions() {
        let mut c = controller();
        c.submit("hello").unwrap();
        let first: Vec<Message> = c.entries().to_vec();
        let second: Vec<Message> = c.entries().to_vec();
        assert_eq!(first, second);
    }
}
