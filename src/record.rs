//! Projection, merge and crew assignment over [`Entity`] maps.

use serde_json::Value;

use crate::Entity;

/// Returns a new entity holding only the `keys` present in `data`, in the
/// order `keys` lists them. Missing keys are skipped.
pub fn filter_data<K: AsRef<str>>(data: &Entity, keys: &[K]) -> Entity {
    let mut record = Entity::new();
    for key in keys {
        let key = key.as_ref();
        if let Some(value) = data.get(key) {
            record.insert(key.to_string(), value.clone());
        }
    }
    record
}

/// Shallow copy of `default_data` with every entry of `override_data`
/// applied on top. Nested values are replaced wholesale.
pub fn combine_data(default_data: &Entity, override_data: &Entity) -> Entity {
    let mut combined = default_data.clone();
    for (key, value) in override_data {
        combined.insert(key.clone(), value.clone());
    }
    combined
}

/// Overlays role to entity pairs (`pilot`, `copilot`, `astromech_droid`...)
/// onto a starship.
pub fn assign_crew<I, K>(mut starship: Entity, crew: I) -> Entity
where
    I: IntoIterator<Item = (K, Entity)>,
    K: Into<String>,
{
    for (role, member) in crew {
        starship.insert(role.into(), Value::Object(member));
    }
    starship
}
