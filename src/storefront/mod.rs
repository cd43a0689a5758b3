//! Cart and checkout state for a single storefront visit.

pub mod cart;
pub mod checkout;
pub mod session;

pub use cart::{Cart, CartComponent, CartItem, CartSummary, MAX_QUANTITY_PER_COMPONENT};
pub use checkout::{AvailableMethods, CheckoutMethod, CheckoutOptions, MethodSelector};
pub use session::TenantSession;
