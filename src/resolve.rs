//! Dereferences `homeworld` and `species` locators before cleaning.

use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;
use tracing::debug;

use crate::cleaner::{EntityCleaner, Related, HOMEWORLD_KEY, SPECIES_KEY};
use crate::coerce::is_unknown;
use crate::swapi::ResourceSource;
use crate::whitelist::{Whitelist, PLANET, SPECIES};
use crate::{Entity, Result, TARGET_CLEAN};

/// Cleans `entity`, first fetching, projecting and recursively cleaning the
/// records its `homeworld` and `species` fields point at. Only the first
/// species locator is followed.
pub fn clean_entity<'a, S: ResourceSource + 'a>(
    source: &'a S,
    cleaner: &'a EntityCleaner,
    entity: &'a Entity,
) -> LocalBoxFuture<'a, Result<Entity>> {
    async move {
        let homeworld = match entity.get(HOMEWORLD_KEY) {
            Some(Value::String(locator)) if !is_unknown(locator) => {
                Some(fetch_related(source, cleaner, locator, PLANET).await?)
            }
            _ => None,
        };

        let species = match entity.get(SPECIES_KEY) {
            Some(Value::Array(locators)) => match locators.first() {
                Some(Value::String(locator)) => {
                    Some(fetch_related(source, cleaner, locator, SPECIES).await?)
                }
                _ => None,
            },
            _ => None,
        };

        Ok(cleaner.clean(entity, &Related { homeworld, species }))
    }
    .boxed_local()
}

/// Projects a fetched record through `whitelist` and cleans it.
pub async fn project_and_clean<S: ResourceSource>(
    source: &S,
    cleaner: &EntityCleaner,
    entity: &Entity,
    whitelist: Whitelist,
) -> Result<Entity> {
    clean_entity(source, cleaner, &whitelist.project(entity)).await
}

async fn fetch_related<S: ResourceSource>(
    source: &S,
    cleaner: &EntityCleaner,
    locator: &str,
    whitelist: Whitelist,
) -> Result<Entity> {
    debug!(target: TARGET_CLEAN, "Resolving {} {}", whitelist.kind, locator);
    let related = source.get_resource(locator).await?;
    project_and_clean(source, cleaner, &related, whitelist).await
}
