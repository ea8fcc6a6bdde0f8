//! Consumer Callback
//!
//! The parser is generic over a single consumer-supplied handler covering
//! both `key = value` assignments and section open/close. This collapses
//! the source's two separate callbacks — `kv(key, value, ctx) ->
//! errmsg-or-null` and `sect(type, name, ctx, &errmsg) -> bool` — into one
//! trait so a single implementing type can hold both behaviors without the
//! caller needing two independent mutable borrows of the same value.
//!
//! A consumer that only cares about assignments can skip `open`/`close`
//! entirely: the defaults skip every section, matching a null section
//! callback.

/// Receives parser events. `assign` is mandatory; `open`/`close` default to
/// "skip every section" for consumers that only care about flat keys.
pub trait ConfigHandler {
    /// Handle one `key = value` assignment. Not invoked while the parser is
    /// in skip mode or still navigating toward an unreached target section.
    /// Return `Err(message)` to abort the parse; the message is reported
    /// with file/line context, enriched with the enclosing section's
    /// location when one is open.
    fn assign(&mut self, key: &str, value: &str, quoted: bool) -> Result<(), String>;

    /// Called when `TYPE [NAME] {` is seen. `name` is empty when the
    /// section has no name. Return `Ok(true)` to dispatch the section's
    /// body, `Ok(false)` to skip it silently, or `Err(message)` to abort.
    fn open(&mut self, _kind: &str, _name: &str) -> Result<bool, String> {
        Ok(false)
    }

    /// Called when the matching `}` is seen for a section whose body was
    /// dispatched (i.e. `open` returned `Ok(true)`).
    fn close(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// One parser event, for consumers that want a flat log rather than
/// callback-style dispatch (e.g. the CLI's `--json` mode). Covers the
/// events actually reaching a [`ConfigHandler`] — `kv`/`sect` per the
/// external interface. Includes are resolved transparently by the parser
/// (the including frame's contents are spliced into the event stream in
/// place) and never surface as their own event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Assignment { key: String, value: String, quoted: bool },
    SectionOpen { kind: String, name: String },
    SectionClose,
}

/// A handler that records every dispatched event instead of acting on it,
/// accepting every section it's offered. Useful for tests asserting an
/// exact event sequence, and for the CLI's `--json` output.
#[derive(Default)]
pub struct RecordingHandler {
    pub events: Vec<Event>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigHandler for RecordingHandler {
    fn assign(&mut self, key: &str, value: &str, quoted: bool) -> Result<(), String> {
        self.events.push(Event::Assignment {
            key: key.to_string(),
            value: value.to_string(),
            quoted,
        });
        Ok(())
    }

    fn open(&mut self, kind: &str, name: &str) -> Result<bool, String> {
        self.events.push(Event::SectionOpen {
            kind: kind.to_string(),
            name: name.to_string(),
        });
        Ok(true)
    }

    fn close(&mut self) -> Result<(), String> {
        self.events.push(Event::SectionClose);
        Ok(())
    }
}
