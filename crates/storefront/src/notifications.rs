//! Toast notifications shown bottom-right on the next rendered page.
//!
//! Cart toasts are not pushed by route handlers: the notification centre
//! subscribes to the cart's change events and turns each one into a toast
//! when the page is rendered. Checkout failures, which never touch the cart,
//! are pushed explicitly.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::cart::CartEvent;

/// Shown after a product is added to the cart.
pub const ITEM_ADDED: &str = "Produto adicionado no carrinho";
/// Shown after an item is removed from the cart.
pub const ITEM_REMOVED: &str = "Produto removido do carrinho";
/// Shown when the login endpoint rejects the credentials.
pub const INVALID_LOGIN: &str = "Login inválido";
/// Shown when the sell endpoint rejects the purchase.
pub const INVALID_PURCHASE: &str = "Compra inválida";

/// Toast auto-dismiss delay, in milliseconds.
pub const AUTO_CLOSE_MS: u32 = 3000;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// CSS modifier class used by the template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Error => "toast--error",
        }
    }
}

/// One pending notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    fn for_event(event: &CartEvent) -> Option<Self> {
        match event {
            CartEvent::ItemAdded { .. } => Some(Self::success(ITEM_ADDED)),
            CartEvent::ItemRemoved { .. } => Some(Self::success(ITEM_REMOVED)),
            CartEvent::Cleared => None,
        }
    }
}

/// Queue of toasts waiting to be rendered.
#[derive(Debug)]
pub struct Notifications {
    cart_events: Mutex<broadcast::Receiver<CartEvent>>,
    pending: Mutex<VecDeque<Toast>>,
}

impl Notifications {
    /// Follow the cart through `cart_events`.
    #[must_use]
    pub fn new(cart_events: broadcast::Receiver<CartEvent>) -> Self {
        Self {
            cart_events: Mutex::new(cart_events),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a toast.
    pub fn push(&self, toast: Toast) {
        let mut pending = self.sync_cart_events();
        pending.push_back(toast);
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        let mut pending = self.sync_cart_events();
        pending.drain(..).collect()
    }

    /// Move cart events received so far into the pending queue.
    fn sync_cart_events(&self) -> std::sync::MutexGuard<'_, VecDeque<Toast>> {
        let mut receiver = self
            .cart_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            match receiver.try_recv() {
                Ok(event) => pending.extend(Toast::for_event(&event)),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Notification centre lagged behind cart events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        pending
    }
}
