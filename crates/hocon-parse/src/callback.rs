//! Callback trait for receiving parse events.

use crate::Event;

/// Receives events from the parser.
///
/// Return `false` from [`event`](ParseCallback::event) to halt parsing;
/// the parser then returns [`ErrorKind::ReaderAborted`](crate::ErrorKind).
/// Ownership of any tokens carried by the event passes to the callback.
pub trait ParseCallback {
    /// Handle a parse event. Return `false` to abort the parse.
    fn event(&mut self, event: Event) -> bool;
}

/// Collect all events into a vector. Useful for tests and debugging.
impl ParseCallback for Vec<Event> {
    fn event(&mut self, event: Event) -> bool {
        self.push(event);
        true
    }
}
