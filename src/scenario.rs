//! The Echo Base run: builds the uninhabited planet list and the enriched
//! Echo Base document from the local fixtures and SWAPI.

use serde_json::Value;
use tracing::{debug, info};

use crate::cleaner::EntityCleaner;
use crate::coerce::is_unknown;
use crate::environment::Settings;
use crate::fixtures::{read_json, write_json};
use crate::record::{assign_crew, combine_data};
use crate::resolve::{clean_entity, project_and_clean};
use crate::swapi::{Category, ResourceSource};
use crate::whitelist::{Whitelist, PERSON, PLANET, PLANET_HOTH, STARSHIP, VEHICLE};
use crate::{Entity, Error, Result};

const HOTH_ID: u32 = 4;
const EVAC_TRANSPORT_NAME: &str = "Bright Hope";

// Locations inside the Echo Base fixture
const HOTH: &str = "/location/planet";
const COMMANDER: &str = "/garrison/commander";
const PERSONNEL: &str = "/garrison/personnel";
const SMUGGLER: &str = "/visiting_starships/freighters/1/pilot";
const FALCON: &str = "/visiting_starships/freighters/0";
const SNOWSPEEDER: &str = "/vehicle_assets/snowspeeders/0/type";
const STARFIGHTER: &str = "/starship_assets/starfighters/0/type";
const TRANSPORT: &str = "/starship_assets/transports/0/type";
const TRANSPORTS_AVAILABLE: &str = "/starship_assets/transports/0/num_available";
const EVACUATION_PLAN: &str = "/evacuation_plan";

/// Runs both halves against `source`, reading and writing the files named
/// in `settings`.
pub async fn run<S: ResourceSource>(source: &S, settings: &Settings) -> Result<()> {
    let scenario =
        Scenario::with_cleaner(source, EntityCleaner::new().with_fallback(settings.unparsed));

    let planets: Vec<Value> = read_json(&settings.planets_input)?;
    let uninhabited = scenario.uninhabited_planets(&planets).await?;
    info!("Found {} uninhabited planet(s)", uninhabited.len());
    write_json(&settings.planets_output, &uninhabited)?;

    let echo_base: Value = read_json(&settings.echo_base_input)?;
    let echo_base = scenario.build_echo_base(echo_base).await?;
    write_json(&settings.echo_base_output, &echo_base)?;

    Ok(())
}

pub struct Scenario<'a, S> {
    source: &'a S,
    cleaner: EntityCleaner,
}

impl<'a, S: ResourceSource> Scenario<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_cleaner(source, EntityCleaner::new())
    }

    pub fn with_cleaner(source: &'a S, cleaner: EntityCleaner) -> Self {
        Self { source, cleaner }
    }

    /// Projects and cleans every planet whose population is unknown.
    pub async fn uninhabited_planets(&self, planets: &[Value]) -> Result<Vec<Entity>> {
        let mut uninhabited = Vec::new();

        for (index, planet) in planets.iter().enumerate() {
            let planet = planet
                .as_object()
                .ok_or_else(|| Error::Shape(format!("/{}", index)))?;
            let population = planet
                .get("population")
                .ok_or_else(|| Error::Shape(format!("/{}/population", index)))?;

            if population.as_str().is_some_and(is_unknown) {
                debug!("{} looks uninhabited", planet_name(planet));
                uninhabited.push(self.project(planet, PLANET).await?);
            }
        }

        Ok(uninhabited)
    }

    /// Merges SWAPI data into the Echo Base fixture, assigns crews and
    /// computes the evacuation plan.
    pub async fn build_echo_base(&self, mut echo_base: Value) -> Result<Value> {
        let hoth_locator = self.source.resource_locator(Category::Planets, HOTH_ID);
        let swapi_hoth = self.source.get_resource(&hoth_locator).await?;
        let hoth = combine_data(&object_at(&echo_base, HOTH)?, &swapi_hoth);
        let hoth = self.project(&hoth, PLANET_HOTH).await?;
        replace_at(&mut echo_base, HOTH, hoth)?;

        let commander = self.clean(&object_at(&echo_base, COMMANDER)?).await?;
        replace_at(&mut echo_base, COMMANDER, commander)?;

        let smuggler = self.clean(&object_at(&echo_base, SMUGGLER)?).await?;
        replace_at(&mut echo_base, SMUGGLER, smuggler)?;

        let snowspeeder = self
            .merge_asset(&echo_base, SNOWSPEEDER, Category::Vehicles, "snowspeeder", VEHICLE)
            .await?;
        replace_at(&mut echo_base, SNOWSPEEDER, snowspeeder)?;

        let x_wing = self
            .merge_asset(&echo_base, STARFIGHTER, Category::Starships, "t-65 x-wing", STARSHIP)
            .await?;
        replace_at(&mut echo_base, STARFIGHTER, x_wing.clone())?;

        let gr_75 = self
            .merge_asset(
                &echo_base,
                TRANSPORT,
                Category::Starships,
                "gr-75 medium transport",
                STARSHIP,
            )
            .await?;
        replace_at(&mut echo_base, TRANSPORT, gr_75.clone())?;

        let falcon = self
            .merge_asset(&echo_base, FALCON, Category::Starships, "millennium falcon", STARSHIP)
            .await?;
        let han = self.person("han solo").await?;
        let chewie = self.person("chewbacca").await?;
        let falcon = assign_crew(falcon, [("pilot", han), ("copilot", chewie)]);
        replace_at(&mut echo_base, FALCON, falcon)?;

        let mut plan = object_at(&echo_base, EVACUATION_PLAN)?;

        let max_base_personnel = object_at(&echo_base, PERSONNEL)?
            .iter()
            .map(|(role, count)| {
                count
                    .as_i64()
                    .ok_or_else(|| Error::Shape(format!("{}/{}", PERSONNEL, role)))
            })
            .sum::<Result<i64>>()?;
        let max_available_transports = int_at(&echo_base, TRANSPORTS_AVAILABLE)?;
        let overload_multiplier = plan
            .get("passenger_overload_multiplier")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::Shape(format!("{}/passenger_overload_multiplier", EVACUATION_PLAN))
            })?;
        let passengers = gr_75
            .get("passengers")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::Shape(format!("{}/passengers", TRANSPORT)))?;
        let max_passenger_overload_capacity = max_available_transports
            .checked_mul(overload_multiplier)
            .and_then(|n| n.checked_mul(passengers))
            .ok_or_else(|| {
                Error::Shape(format!("{}/max_passenger_overload_capacity", EVACUATION_PLAN))
            })?;

        info!(
            "Evacuation: {} personnel, {} transports, overload capacity {}",
            max_base_personnel, max_available_transports, max_passenger_overload_capacity
        );

        plan.insert("max_base_personnel".into(), max_base_personnel.into());
        plan.insert("max_available_transports".into(), max_available_transports.into());
        plan.insert(
            "max_passenger_overload_capacity".into(),
            max_passenger_overload_capacity.into(),
        );

        let mut evac_transport = gr_75;
        evac_transport.insert("name".into(), EVAC_TRANSPORT_NAME.into());
        let passenger_manifest = vec![
            Value::Object(self.person("leia organa").await?),
            Value::Object(self.person("C-3PO").await?),
        ];
        evac_transport.insert("passenger_manifest".into(), Value::Array(passenger_manifest));

        let luke_x_wing = assign_crew(
            x_wing.clone(),
            [
                ("pilot", self.person("luke skywalker").await?),
                ("astromech_droid", self.person("r2-d2").await?),
            ],
        );
        let wedge_x_wing = assign_crew(
            x_wing,
            [
                ("pilot", self.person("wedge antilles").await?),
                ("astromech_droid", self.person("r5-d4").await?),
            ],
        );
        evac_transport.insert(
            "escorts".into(),
            Value::Array(vec![Value::Object(luke_x_wing), Value::Object(wedge_x_wing)]),
        );

        plan.insert(
            "transport_assignments".into(),
            Value::Array(vec![Value::Object(evac_transport)]),
        );
        replace_at(&mut echo_base, EVACUATION_PLAN, plan)?;

        Ok(echo_base)
    }

    async fn project(&self, entity: &Entity, whitelist: Whitelist) -> Result<Entity> {
        project_and_clean(self.source, &self.cleaner, entity, whitelist).await
    }

    async fn clean(&self, entity: &Entity) -> Result<Entity> {
        clean_entity(self.source, &self.cleaner, entity).await
    }

    async fn person(&self, query: &str) -> Result<Entity> {
        let person = self.source.search(Category::People, query).await?;
        self.project(&person, PERSON).await
    }

    /// Overlays the first SWAPI match for `query` on the fixture record at
    /// `pointer`, then projects and cleans the result.
    async fn merge_asset(
        &self,
        echo_base: &Value,
        pointer: &str,
        category: Category,
        query: &str,
        whitelist: Whitelist,
    ) -> Result<Entity> {
        let swapi_record = self.source.search(category, query).await?;
        let merged = combine_data(&object_at(echo_base, pointer)?, &swapi_record);
        self.project(&merged, whitelist).await
    }
}

fn planet_name(planet: &Entity) -> &str {
    planet.get("name").and_then(Value::as_str).unwrap_or("unnamed planet")
}

fn object_at(doc: &Value, pointer: &str) -> Result<Entity> {
    doc.pointer(pointer)
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| Error::Shape(pointer.to_string()))
}

fn int_at(doc: &Value, pointer: &str) -> Result<i64> {
    doc.pointer(pointer)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Shape(pointer.to_string()))
}

fn replace_at(doc: &mut Value, pointer: &str, entity: Entity) -> Result<()> {
    let slot = doc
        .pointer_mut(pointer)
        .ok_or_else(|| Error::Shape(pointer.to_string()))?;
    *slot = Value::Object(entity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::Fallback;
    use crate::swapi::memory::MemorySource;
    use serde_json::json;
    use tempfile::tempdir;

    const TATOOINE: &str = "memory://swapi/planets/1/";
    const HUMAN: &str = "memory://swapi/species/1/";
    const DROID: &str = "memory://swapi/species/2/";

    fn person(name: &str, species: &str) -> Value {
        json!({
            "name": name,
            "height": "172",
            "mass": "unknown",
            "hair_color": "n/a",
            "skin_color": "fair, gold",
            "homeworld": TATOOINE,
            "species": [species],
            "films": ["memory://swapi/films/1/"],
        })
    }

    fn source() -> MemorySource {
        MemorySource::new()
            .with_resource(
                "memory://swapi/planets/4/",
                json!({
                    "name": "Hoth",
                    "rotation_period": "23",
                    "orbital_period": "549",
                    "diameter": "7200",
                    "climate": "frozen",
                    "gravity": "1.1 standard",
                    "terrain": "tundra, ice caves, mountain ranges",
                    "surface_water": "100",
                    "population": "unknown",
                    "residents": [],
                    "url": "memory://swapi/planets/4/",
                }),
            )
            .with_resource(
                TATOOINE,
                json!({"name": "Tatooine", "climate": "arid", "population": "200000"}),
            )
            .with_resource(HUMAN, json!({"name": "Human", "average_height": "180"}))
            .with_resource(DROID, json!({"name": "Droid", "average_lifespan": "indefinite"}))
            .with_search(
                Category::Vehicles,
                "snowspeeder",
                json!({
                    "name": "Snowspeeder",
                    "vehicle_class": "airspeeder",
                    "length": "4.5",
                    "crew": "2",
                    "passengers": "0",
                    "pilots": [],
                }),
            )
            .with_search(
                Category::Starships,
                "t-65 x-wing",
                json!({
                    "name": "X-wing",
                    "hyperdrive_rating": "1.0",
                    "MGLT": "100",
                    "crew": "1",
                    "passengers": "0",
                }),
            )
            .with_search(
                Category::Starships,
                "gr-75 medium transport",
                json!({
                    "name": "Rebel transport",
                    "length": "90",
                    "crew": "6",
                    "passengers": "90",
                    "cargo_capacity": "19000000",
                }),
            )
            .with_search(
                Category::Starships,
                "millennium falcon",
                json!({
                    "name": "Millennium Falcon",
                    "length": "34.37",
                    "crew": "4",
                    "passengers": "6",
                }),
            )
            .with_search(Category::People, "han solo", person("Han Solo", HUMAN))
            .with_search(Category::People, "chewbacca", person("Chewbacca", HUMAN))
            .with_search(Category::People, "leia organa", person("Leia Organa", HUMAN))
            .with_search(Category::People, "C-3PO", person("C-3PO", DROID))
            .with_search(Category::People, "luke skywalker", person("Luke Skywalker", HUMAN))
            .with_search(Category::People, "r2-d2", person("R2-D2", DROID))
            .with_search(Category::People, "wedge antilles", person("Wedge Antilles", HUMAN))
            .with_search(Category::People, "r5-d4", person("R5-D4", DROID))
    }

    fn echo_base_fixture() -> Value {
        json!({
            "base": {"name": "Echo Base"},
            "location": {
                "planet": {
                    "name": "Hoth",
                    "system_position": 6,
                    "natural_satellites": 3,
                    "population": "n/a",
                    "indigenous_life_forms": ["Tauntaun", "Wampa"],
                }
            },
            "garrison": {
                "commander": {
                    "name": "Carlist Rieekan",
                    "height": "180",
                    "homeworld": "unknown",
                },
                "personnel": {
                    "officers": 50,
                    "enlisted": 300,
                    "pilots": 50,
                    "droids": 50,
                }
            },
            "vehicle_assets": {
                "snowspeeders": [{"type": {"name": "Snowspeeder", "crew": "3"}, "num_available": 24}]
            },
            "starship_assets": {
                "starfighters": [{"type": {"name": "T-65 X-wing"}, "num_available": 30}],
                "transports": [{"type": {"name": "GR-75 medium transport"}, "num_available": 3}]
            },
            "visiting_starships": {
                "freighters": [
                    {"name": "Millennium Falcon", "pilot": "unassigned"},
                    {"name": "Outrider", "pilot": {"name": "Dash Rendar", "height": "1.8 m"}}
                ]
            },
            "evacuation_plan": {
                "max_base_personnel": null,
                "max_available_transports": null,
                "max_passenger_overload_capacity": null,
                "passenger_overload_multiplier": 3
            }
        })
    }

    #[tokio::test]
    async fn test_uninhabited_planets() {
        let source = MemorySource::new();
        let planets = vec![
            json!({"name": "Dagobah", "population": "unknown", "gravity": "N/A", "films": []}),
            json!({"name": "Tatooine", "population": "200000"}),
            json!({"name": "Mustafar", "population": " Unknown ", "diameter": "4200"}),
        ];

        let scenario = Scenario::new(&source);
        let uninhabited = scenario.uninhabited_planets(&planets).await.unwrap();

        assert_eq!(
            Value::from(uninhabited.into_iter().map(Value::Object).collect::<Vec<_>>()),
            json!([
                {"name": "Dagobah", "gravity": null, "population": null},
                {"name": "Mustafar", "diameter": 4200, "population": null},
            ])
        );
    }

    #[tokio::test]
    async fn test_planet_without_population_is_rejected() {
        let source = MemorySource::new();
        let planets = vec![json!({"name": "Yavin IV"})];
        let scenario = Scenario::new(&source);

        match scenario.uninhabited_planets(&planets).await {
            Err(Error::Shape(pointer)) => assert_eq!(pointer, "/0/population"),
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_build_echo_base() {
        let source = source();
        let scenario = Scenario::new(&source);
        let echo_base = scenario.build_echo_base(echo_base_fixture()).await.unwrap();

        // SWAPI values win over the fixture, fixture-only fields survive
        let hoth = &echo_base["location"]["planet"];
        assert_eq!(hoth["population"], Value::Null);
        assert_eq!(hoth["gravity"], json!(1.1));
        assert_eq!(hoth["system_position"], json!(6));
        assert_eq!(hoth["indigenous_life_forms"], json!(["Tauntaun", "Wampa"]));
        assert_eq!(hoth["terrain"], json!(["tundra", "ice caves", "mountain ranges"]));
        assert!(hoth.get("residents").is_none());

        assert_eq!(
            echo_base["garrison"]["commander"],
            json!({"name": "Carlist Rieekan", "height": 180, "homeworld": null})
        );
        assert_eq!(
            echo_base["visiting_starships"]["freighters"][1]["pilot"],
            json!({"name": "Dash Rendar", "height": "1.8 m"})
        );

        let snowspeeder = &echo_base["vehicle_assets"]["snowspeeders"][0];
        assert_eq!(snowspeeder["num_available"], json!(24));
        assert_eq!(snowspeeder["type"]["crew"], json!(2));
        assert_eq!(snowspeeder["type"]["length"], json!(4.5));
        assert!(snowspeeder["type"].get("pilots").is_none());

        let falcon = &echo_base["visiting_starships"]["freighters"][0];
        assert_eq!(falcon["length"], json!(34.37));
        assert_eq!(falcon["pilot"]["name"], json!("Han Solo"));
        assert_eq!(falcon["pilot"]["homeworld"]["name"], json!("Tatooine"));
        assert_eq!(falcon["pilot"]["species"], json!([{"name": "Human", "average_height": 180}]));
        assert_eq!(falcon["copilot"]["name"], json!("Chewbacca"));

        let plan = &echo_base["evacuation_plan"];
        assert_eq!(plan["max_base_personnel"], json!(450));
        assert_eq!(plan["max_available_transports"], json!(3));
        assert_eq!(plan["max_passenger_overload_capacity"], json!(810));

        let transports = plan["transport_assignments"].as_array().unwrap();
        assert_eq!(transports.len(), 1);
        let bright_hope = &transports[0];
        assert_eq!(bright_hope["name"], json!("Bright Hope"));
        assert_eq!(bright_hope["passengers"], json!(90));
        assert_eq!(bright_hope["passenger_manifest"][0]["name"], json!("Leia Organa"));
        assert_eq!(bright_hope["passenger_manifest"][1]["name"], json!("C-3PO"));
        assert_eq!(
            bright_hope["passenger_manifest"][1]["species"],
            json!([{"name": "Droid", "average_lifespan": "indefinite"}])
        );
        assert_eq!(bright_hope["escorts"][0]["pilot"]["name"], json!("Luke Skywalker"));
        assert_eq!(bright_hope["escorts"][0]["astromech_droid"]["name"], json!("R2-D2"));
        assert_eq!(bright_hope["escorts"][1]["pilot"]["name"], json!("Wedge Antilles"));
        assert_eq!(bright_hope["escorts"][1]["astromech_droid"]["name"], json!("R5-D4"));
        assert_eq!(bright_hope["escorts"][1]["MGLT"], json!(100));

        // The GR-75 stored under starship assets keeps its own name
        assert_eq!(
            echo_base["starship_assets"]["transports"][0]["type"]["name"],
            json!("Rebel transport")
        );

        let han = &falcon["pilot"];
        assert_eq!(han["mass"], Value::Null);
        assert_eq!(han["hair_color"], Value::Null);
        assert_eq!(han["skin_color"], json!(["fair", "gold"]));
        assert!(han.get("films").is_none());
    }

    #[tokio::test]
    async fn test_missing_fixture_section() {
        let source = source();
        let scenario = Scenario::new(&source);
        let mut fixture = echo_base_fixture();
        fixture["garrison"].as_object_mut().unwrap().remove("commander");

        match scenario.build_echo_base(fixture).await {
            Err(Error::Shape(pointer)) => assert_eq!(pointer, COMMANDER),
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_writes_both_documents() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            planets_input: dir.path().join("planets.json"),
            echo_base_input: dir.path().join("echo_base.json"),
            planets_output: dir.path().join("planets_out.json"),
            echo_base_output: dir.path().join("echo_base_out.json"),
            unparsed: Fallback::Null,
            ..Settings::default()
        };
        write_json(
            &settings.planets_input,
            &json!([{
                "name": "Hoth",
                "population": "unknown",
                "climate": "frozen",
                "diameter": "about 7200",
            }]),
        )
        .unwrap();
        write_json(&settings.echo_base_input, &echo_base_fixture()).unwrap();

        run(&source(), &settings).await.unwrap();

        let planets: Value = read_json(&settings.planets_output).unwrap();
        assert_eq!(
            planets,
            json!([{"name": "Hoth", "diameter": null, "climate": ["frozen"], "population": null}])
        );
        let echo_base: Value = read_json(&settings.echo_base_output).unwrap();
        assert_eq!(
            echo_base["evacuation_plan"]["transport_assignments"][0]["name"],
            json!("Bright Hope")
        );
    }
}
