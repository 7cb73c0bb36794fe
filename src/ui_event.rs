//! One-shot instructions from a controller to the screen it drives.
//!
//! Unlike screen state, an event is delivered once and then forgotten, e.g. a snackbar should
//! not reappear when the screen redraws.

use tokio::sync::mpsc;

use crate::MessageRef;

/// Something the active screen should do exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Show a snackbar with `message`, formatted with `args`.
    ShowSnackbar {
        /// The message to show.
        message: MessageRef,
        /// Values for any placeholders in the message.
        args: Vec<String>,
    },
    /// Show a toast with `message`, formatted with `args`.
    ShowToast {
        /// The message to show.
        message: MessageRef,
        /// Values for any placeholders in the message.
        args: Vec<String>,
    },
    /// Go back to the previous screen.
    NavigateUp,
}

impl UiEvent {
    /// A snackbar without format arguments.
    pub fn snackbar(message: MessageRef) -> Self {
        UiEvent::ShowSnackbar {
            message,
            args: Vec::new(),
        }
    }

    /// A toast without format arguments.
    pub fn toast(message: MessageRef) -> Self {
        UiEvent::ShowToast {
            message,
            args: Vec::new(),
        }
    }
}

/// Create a connected event sender and receiver.
///
/// Events are received in the order they were sent.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();

    (EventSender(sender), EventReceiver(receiver))
}

/// The sending half of an event channel.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<UiEvent>);

impl EventSender {
    /// Queue `event` for the screen.
    ///
    /// If the screen has gone away the event is dropped.
    pub fn send(&self, event: UiEvent) {
        if let Err(error) = self.0.send(event) {
            tracing::debug!("dropping UI event, nobody is listening: {:?}", error.0);
        }
    }
}

/// The receiving half of an event channel. There is only ever one per channel.
#[derive(Debug)]
pub struct EventReceiver(mpsc::UnboundedReceiver<UiEvent>);

impl EventReceiver {
    /// Wait for the next event.
    ///
    /// Returns `None` once every sender has been dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<UiEvent> {
        self.0.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<UiEvent> {
        self.0.try_recv().ok()
    }

    /// Take every event that is currently queued.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
