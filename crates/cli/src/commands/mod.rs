//! Subcommand implementations.

pub mod cart;
pub mod catalog;

use imagine_shop_storefront::cart::CartError;
use imagine_shop_storefront::catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog request failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart could not be written.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Item id argument is not a cart item id.
    #[error("Invalid item id: {0}")]
    InvalidItemId(String),
}
