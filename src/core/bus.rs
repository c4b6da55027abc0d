use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// Single-threaded typed publish/subscribe channel
///
/// Handlers run synchronously, in subscription order, on the publishing thread.
/// `publish` works from a snapshot of the handler list, so a handler may
/// subscribe, unsubscribe or publish again without invalidating the delivery.
pub struct EventBus<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register a handler; it stays registered until the returned handle is dropped
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let handler: Handler<T> = Rc::new(handler);
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, handler));
            id
        };

        let registry: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    // the handler may own subscriptions on this bus; drop it after the borrow ends
                    let removed = {
                        let mut registry = registry.borrow_mut();
                        let position = registry
                            .handlers
                            .iter()
                            .position(|(handler_id, _)| *handler_id == id);
                        let removed = position.map(|index| registry.handlers.remove(index));
                        removed
                    };
                    drop(removed);
                }
            })),
        }
    }

    /// Deliver an event to every current subscriber, returning how many were called
    pub fn publish(&self, event: &T) -> usize {
        let snapshot: Vec<Handler<T>> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in &snapshot {
            handler(event);
        }

        snapshot.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.registry.borrow().handlers.len())
            .finish()
    }
}

/// Handle for a registered bus handler; dropping it unsubscribes
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the handler registered for as long as the bus lives
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
