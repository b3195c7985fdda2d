//! Presentation-layer state for the storefront pages.
//!
//! Nothing here renders. Each type holds the state a page needs and derives
//! what should be shown, so it can be driven from a terminal, a GUI or a test.
//!
//! - `home` - Product listing: category chips, search box, add-to-cart gate
//! - `header` - Auth-dependent header actions and the account menu
//! - `delay` - Cancellable delayed task used by the account menu

pub mod delay;
pub mod header;
pub mod home;

pub use delay::DelayedTask;
pub use header::{AccountMenu, HeaderModel, MenuAction, MenuEntry, MenuState};
pub use home::{AddToCart, CategoryChip, FetchTicket, HomePage, LoadState};
