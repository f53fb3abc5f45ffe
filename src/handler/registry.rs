use super::Handler;
use crate::Attribute;

/// The handlers used by a cookie specification, keyed by attribute.
///
/// Handlers run in registration order. Re-registering an attribute replaces
/// its handler in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct HandlerRegistry {
    handlers: Vec<(Attribute, Handler)>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn register(&mut self, attribute: Attribute, handler: Handler) {
        match self.handlers.iter_mut().find(|(a, _)| *a == attribute) {
            Some(entry) => entry.1 = handler,
            None => self.handlers.push((attribute, handler)),
        }
    }

    /// Looks up the handler for the attribute named `name`, ignoring case.
    pub(crate) fn find(&self, name: &str) -> Option<&Handler> {
        let attribute = Attribute::from_name(name)?;
        self.get(attribute)
    }

    pub(crate) fn get(&self, attribute: Attribute) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, handler)| handler)
    }

    pub(crate) fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter().map(|(_, handler)| handler)
    }

    pub(crate) fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.handlers.iter().map(|(attribute, _)| *attribute)
    }
}
