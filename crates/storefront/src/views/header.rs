//! Header state: auth-dependent actions and the account menu.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::services::AuthService;
use crate::views::delay::DelayedTask;

/// How long the account menu stays open after the pointer leaves it.
pub const MENU_CLOSE_DELAY: Duration = Duration::from_millis(200);

/// Routes the header links to.
pub mod routes {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const CART: &str = "/cart";
    pub const PROFILE: &str = "/profile";
    pub const ORDERS: &str = "/orders";
}

/// Label shown when the user record is missing or unreadable.
const FALLBACK_ACCOUNT_LABEL: &str = "My account";

/// Entries of the account drop-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEntry {
    Profile,
    Orders,
    Logout,
}

impl MenuEntry {
    /// All entries in display order.
    pub const ALL: [Self; 3] = [Self::Profile, Self::Orders, Self::Logout];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Orders => "Order history",
            Self::Logout => "Log out",
        }
    }

    /// Link target, `None` for entries that are actions.
    #[must_use]
    pub const fn route(&self) -> Option<&'static str> {
        match self {
            Self::Profile => Some(routes::PROFILE),
            Self::Orders => Some(routes::ORDERS),
            Self::Logout => None,
        }
    }

    /// Carry out the entry. Choosing any entry closes the menu.
    pub fn activate(self, auth: &AuthService, menu: &mut AccountMenu) -> MenuAction {
        menu.close_now();
        match self.route() {
            Some(route) => MenuAction::Navigate(route),
            None => {
                auth.logout();
                MenuAction::LoggedOut
            }
        }
    }
}

/// Result of choosing a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(&'static str),
    LoggedOut,
}

/// What the right-hand side of the header shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderModel {
    /// No stored token: offer login and registration.
    Guest {
        login_href: &'static str,
        register_href: &'static str,
    },
    /// Stored token: cart link and the account menu.
    Member {
        account_label: String,
        cart_href: &'static str,
        cart_count: u32,
        menu: Vec<MenuEntry>,
    },
}

impl HeaderModel {
    /// Build the header from the stored session.
    #[must_use]
    pub fn from_auth(auth: &AuthService) -> Self {
        if !auth.is_authenticated() {
            return Self::Guest {
                login_href: routes::LOGIN,
                register_href: routes::REGISTER,
            };
        }

        let account_label = auth
            .current_user()
            .map(|user| user.username)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_ACCOUNT_LABEL.to_string());

        // No cart backend yet, so the badge always reads zero.
        Self::Member {
            account_label,
            cart_href: routes::CART,
            cart_count: 0,
            menu: MenuEntry::ALL.to_vec(),
        }
    }

    #[must_use]
    pub const fn is_member(&self) -> bool {
        matches!(self, Self::Member { .. })
    }
}

/// Visible state of the account menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Default)]
struct MenuShared {
    state: MenuState,
    /// Bumped on every pointer-enter so a close scheduled earlier can tell it
    /// has been superseded even if its abort arrives late.
    epoch: u64,
}

/// Hover-driven account menu with a debounced close.
///
/// Pointer-enter opens it immediately. Pointer-leave closes it after
/// [`MENU_CLOSE_DELAY`] unless the pointer comes back first. Leaving schedules
/// a tokio task, so it must be called inside a tokio runtime.
#[derive(Debug)]
pub struct AccountMenu {
    shared: Arc<Mutex<MenuShared>>,
    pending_close: Option<DelayedTask>,
    close_delay: Duration,
}

impl Default for AccountMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountMenu {
    /// A closed menu using [`MENU_CLOSE_DELAY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_close_delay(MENU_CLOSE_DELAY)
    }

    /// A closed menu with a custom close delay.
    #[must_use]
    pub fn with_close_delay(close_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(MenuShared::default())),
            pending_close: None,
            close_delay,
        }
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        lock(&self.shared).state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == MenuState::Open
    }

    /// Pointer entered the account button or the drop-down.
    pub fn pointer_enter(&mut self) {
        if let Some(task) = self.pending_close.take() {
            task.cancel();
            debug!("Pending menu close cancelled");
        }
        let mut shared = lock(&self.shared);
        shared.epoch = shared.epoch.wrapping_add(1);
        shared.state = MenuState::Open;
    }

    /// Pointer left the account button or the drop-down.
    pub fn pointer_leave(&mut self) {
        let epoch = {
            let shared = lock(&self.shared);
            if shared.state == MenuState::Closed {
                return;
            }
            shared.epoch
        };

        let shared = Arc::clone(&self.shared);
        self.pending_close = Some(DelayedTask::schedule(self.close_delay, move || {
            let mut shared = lock(&shared);
            if shared.epoch == epoch {
                shared.state = MenuState::Closed;
            }
        }));
    }

    /// Close immediately, dropping any pending close.
    pub fn close_now(&mut self) {
        if let Some(task) = self.pending_close.take() {
            task.cancel();
        }
        let mut shared = lock(&self.shared);
        shared.epoch = shared.epoch.wrapping_add(1);
        shared.state = MenuState::Closed;
    }
}

fn lock(shared: &Mutex<MenuShared>) -> std::sync::MutexGuard<'_, MenuShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
