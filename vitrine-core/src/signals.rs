//! Typed pause signals.
//!
//! Each signal is an open/closed flag with exactly one writer (the
//! component owning the modal or menu) and any number of readers (every
//! column's pause coordinator). A `watch` channel gives readers the latest
//! value synchronously, so a column never has to replay missed events.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

/// Marker for the concept a signal represents.
pub trait SignalKind: fmt::Debug + Send + Sync + 'static {
    const NAME: &'static str;
}

/// The product detail modal.
#[derive(Debug, Clone, Copy)]
pub enum Modal {}

impl SignalKind for Modal {
    const NAME: &'static str = "modal";
}

/// A wishlist or category menu.
#[derive(Debug, Clone, Copy)]
pub enum Menu {}

impl SignalKind for Menu {
    const NAME: &'static str = "menu";
}

/// Writer half of an open/closed signal.
///
/// Cloning shares the same channel; by convention only the owner of the
/// modal or menu calls [`PauseSignal::set_open`].
pub struct PauseSignal<K: SignalKind> {
    sender: Arc<watch::Sender<bool>>,
    _kind: PhantomData<K>,
}

impl<K: SignalKind> Clone for PauseSignal<K> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            _kind: PhantomData,
        }
    }
}

impl<K: SignalKind> fmt::Debug for PauseSignal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PauseSignal")
            .field("kind", &K::NAME)
            .field("open", &self.is_open())
            .finish()
    }
}

impl<K: SignalKind> Default for PauseSignal<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SignalKind> PauseSignal<K> {
    /// New signal, initially closed.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            _kind: PhantomData,
        }
    }

    /// Publish the open state. Works with or without live receivers.
    pub fn set_open(&self, open: bool) {
        let previous = self.sender.send_replace(open);
        if previous != open {
            trace!(signal = K::NAME, open, "pause signal changed");
        }
    }

    pub fn is_open(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> SignalReceiver<K> {
        SignalReceiver {
            receiver: self.sender.subscribe(),
            _kind: PhantomData,
        }
    }
}

/// Reader half of a [`PauseSignal`].
pub struct SignalReceiver<K: SignalKind> {
    receiver: watch::Receiver<bool>,
    _kind: PhantomData<K>,
}

impl<K: SignalKind> Clone for SignalReceiver<K> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: SignalKind> fmt::Debug for SignalReceiver<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalReceiver")
            .field("kind", &K::NAME)
            .field("open", &self.is_open())
            .finish()
    }
}

impl<K: SignalKind> SignalReceiver<K> {
    /// Latest published value.
    pub fn is_open(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Every pause source shared by the columns of one feed.
#[derive(Debug, Clone, Default)]
pub struct PauseSignals {
    pub modal: PauseSignal<Modal>,
    pub wishlist_menu: PauseSignal<Menu>,
    pub category_menu: PauseSignal<Menu>,
}

impl PauseSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> PauseReceivers {
        PauseReceivers {
            modal: self.modal.subscribe(),
            wishlist_menu: self.wishlist_menu.subscribe(),
            category_menu: self.category_menu.subscribe(),
        }
    }
}

/// One column's view of [`PauseSignals`].
#[derive(Debug, Clone)]
pub struct PauseReceivers {
    pub modal: SignalReceiver<Modal>,
    pub wishlist_menu: SignalReceiver<Menu>,
    pub category_menu: SignalReceiver<Menu>,
}

impl PauseReceivers {
    pub fn modal_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn menu_open(&self) -> bool {
        self.wishlist_menu.is_open() || self.category_menu.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receivers_see_latest_value() {
        let signals = PauseSignals::new();
        let receivers = signals.subscribe();
        assert!(!receivers.modal_open());

        signals.modal.set_open(true);
        assert!(receivers.modal_open());
        assert!(!receivers.menu_open());

        signals.category_menu.set_open(true);
        signals.modal.set_open(false);
        assert!(!receivers.modal_open());
        assert!(receivers.menu_open());
    }

    #[test]
    fn late_subscribers_read_current_state() {
        let signal = PauseSignal::<Modal>::new();
        signal.set_open(true);
        assert!(signal.subscribe().is_open());
    }

    #[test]
    fn clones_share_the_channel() {
        let signals = PauseSignals::new();
        let writer = signals.wishlist_menu.clone();
        let receivers = signals.subscribe();
        writer.set_open(true);
        assert!(signals.wishlist_menu.is_open());
        assert!(receivers.menu_open());
    }
}
