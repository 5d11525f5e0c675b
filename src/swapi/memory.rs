//! In-memory [`ResourceSource`] for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::{Category, ResourceSource};
use crate::{Entity, Error, Result};

pub const MEMORY_ENDPOINT: &str = "memory://swapi";

#[derive(Debug, Default)]
pub struct MemorySource {
    resources: HashMap<String, Entity>,
    searches: HashMap<(Category, String), Entity>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, locator: &str, value: Value) -> Self {
        self.resources.insert(locator.to_string(), into_entity(value));
        self
    }

    pub fn with_search(mut self, category: Category, query: &str, value: Value) -> Self {
        self.searches
            .insert((category, query.to_string()), into_entity(value));
        self
    }

    /// Every locator or search served so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ResourceSource for MemorySource {
    async fn get_resource(&self, locator: &str) -> Result<Entity> {
        self.requests.borrow_mut().push(locator.to_string());
        self.resources
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::Shape(format!("{} (no such resource)", locator)))
    }

    async fn search(&self, category: Category, query: &str) -> Result<Entity> {
        self.requests
            .borrow_mut()
            .push(format!("{}?search={}", category, query));
        self.searches
            .get(&(category, query.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                category: category.to_string(),
                query: query.to_string(),
            })
    }

    fn resource_locator(&self, category: Category, id: u32) -> String {
        format!("{}/{}/{}/", MEMORY_ENDPOINT, category, id)
    }
}

fn into_entity(value: Value) -> Entity {
    match value {
        Value::Object(map) => map,
        other => panic!("test fixtures must be objects, got {other}"),
    }
}
