//! Observable state cells.

use tokio::sync::watch;

/// State owned by one component and observed by any number of subscribers.
///
/// Writes go through [`Published::update`]; subscribers are woken only when
/// the closure reports a change.
#[derive(Debug)]
pub struct Published<T> {
    sender: watch::Sender<T>,
}

impl<T: Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Published<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.sender.borrow().clone()
    }

    /// Read without cloning
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.sender.borrow())
    }

    /// Mutate in place and notify subscribers
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.sender.send_modify(modify);
    }

    /// Mutate in place; subscribers are notified only if `modify` returns true
    pub fn update_if(&self, modify: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(modify)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}
