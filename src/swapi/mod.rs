//! Read-only access to the Star Wars API (SWAPI).
//!
//! Records are fetched either by resource locator or by a category search.
//! Everything downstream talks to a [`ResourceSource`] so the Echo Base
//! sequence can run without the network.

mod client;
#[cfg(test)]
pub(crate) mod memory;
mod types;

pub use self::client::SwapiClient;
pub use self::types::*;

use crate::{Entity, Result};

#[allow(async_fn_in_trait)]
pub trait ResourceSource {
    /// Fetches the record at `locator`.
    async fn get_resource(&self, locator: &str) -> Result<Entity>;

    /// Returns the first record of `category` matching `query`.
    async fn search(&self, category: Category, query: &str) -> Result<Entity>;

    /// Builds the locator of record `id` in `category`.
    fn resource_locator(&self, category: Category, id: u32) -> String;
}
