use rdb_types::Entity;

use crate::error::DecodeError;

/// Receiver for everything a decoder produces.
///
/// Events are delivered synchronously from inside `feed` and `finish`,
/// in stream order:
///
/// ```text
///   on_entity(Entity)   zero or more
///   on_error(err)       at most once, terminal: nothing follows it
///   on_end()            exactly once, only after a clean end-of-stream
/// ```
///
/// A stream produces either `on_error` or `on_end`, never both. A stream
/// whose caller simply stops feeding produces neither.
pub trait EntitySink {
    fn on_entity(&mut self, entity: Entity);

    fn on_error(&mut self, error: DecodeError);

    fn on_end(&mut self) {}
}

impl<S: EntitySink + ?Sized> EntitySink for &mut S {
    fn on_entity(&mut self, entity: Entity) {
        (**self).on_entity(entity);
    }

    fn on_error(&mut self, error: DecodeError) {
        (**self).on_error(error);
    }

    fn on_end(&mut self) {
        (**self).on_end();
    }
}

/// One delivered event, as recorded by [`EventCollector`].
#[derive(Debug)]
pub enum DecoderEvent {
    Entity(Entity),
    Error(DecodeError),
    End,
}

/// Sink that records every event in order.
///
/// Mostly useful in tests and for small in-memory payloads.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<DecoderEvent>,
}

impl EventCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[DecoderEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<DecoderEvent> {
        self.events
    }

    /// The decoded entities, in order, ignoring other events.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.events.iter().filter_map(|event| match event {
            DecoderEvent::Entity(entity) => Some(entity),
            _ => None,
        })
    }

    /// The reported error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&DecodeError> {
        self.events.iter().find_map(|event| match event {
            DecoderEvent::Error(err) => Some(err),
            _ => None,
        })
    }

    #[must_use]
    pub fn ended(&self) -> bool {
        matches!(self.events.last(), Some(DecoderEvent::End))
    }
}

impl EntitySink for EventCollector {
    fn on_entity(&mut self, entity: Entity) {
        self.events.push(DecoderEvent::Entity(entity));
    }

    fn on_error(&mut self, error: DecodeError) {
        self.events.push(DecoderEvent::Error(error));
    }

    fn on_end(&mut self) {
        self.events.push(DecoderEvent::End);
    }
}

/// Sink that forwards entities to a closure and keeps the outcome.
///
/// ```rust
/// use rdb_decoder::{FnSink, RdbDecoder};
///
/// let mut keys = Vec::new();
/// let mut decoder = RdbDecoder::new(FnSink::new(|entity| keys.push(entity.key)));
/// decoder.feed(b"REDIS0002\xff");
/// decoder.finish();
/// assert!(decoder.sink().ended());
/// drop(decoder);
/// assert!(keys.is_empty());
/// ```
pub struct FnSink<F> {
    callback: F,
    error: Option<DecodeError>,
    ended: bool,
}

impl<F: FnMut(Entity)> FnSink<F> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            error: None,
            ended: false,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<DecodeError> {
        self.error.take()
    }

    #[must_use]
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl<F: FnMut(Entity)> EntitySink for FnSink<F> {
    fn on_entity(&mut self, entity: Entity) {
        (self.callback)(entity);
    }

    fn on_error(&mut self, error: DecodeError) {
        self.error = Some(error);
    }

    fn on_end(&mut self) {
        self.ended = true;
    }
}
