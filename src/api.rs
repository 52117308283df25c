//! PokeAPI client

use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::state::{CatalogEntry, DetailRecord, StatValue};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const CATALOG_FETCH_CONCURRENCY: usize = 12;

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenerationResponse {
    pokemon_species: Vec<NamedResource>,
}

/// Fetch the name index and project every referenced detail document into a
/// `CatalogEntry`.
///
/// Detail documents are fetched concurrently but collected into slots keyed
/// by their listing position, so the returned catalog preserves request
/// order no matter how the fetches complete. An entry whose detail fetch
/// fails is dropped; a partial catalog beats a total failure. Only a failed
/// listing fetch is an error.
pub async fn fetch_catalog(limit: usize) -> Result<Vec<CatalogEntry>, String> {
    let url = format!("{API_BASE}/pokemon?limit={limit}");
    let listing: ListResponse = fetch_json(&url).await?;

    let mut slots: Vec<Option<CatalogEntry>> = vec![None; listing.results.len()];
    let semaphore = Arc::new(Semaphore::new(CATALOG_FETCH_CONCURRENCY));
    let mut join_set = JoinSet::new();
    for (index, resource) in listing.results.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (index, None);
            };
            let entry = fetch_entry(&resource.url).await.ok();
            (index, entry)
        });
    }

    while let Some(result) = join_set.join_next().await {
        if let Ok((index, entry)) = result {
            slots[index] = entry;
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Fetch the full detail document for one entry. Called fresh on every
/// overlay open; results are never cached.
pub async fn fetch_detail(id: u16) -> Result<DetailRecord, String> {
    let url = format!("{API_BASE}/pokemon/{id}");
    let response: PokemonResponse = fetch_json(&url).await?;

    let stats = response
        .stats
        .iter()
        .map(|slot| StatValue {
            name: slot.stat.name.clone(),
            value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .iter()
        .map(|slot| slot.ability.name.clone())
        .collect();

    Ok(DetailRecord {
        id: response.id,
        name: response.name.clone(),
        types: type_names(&response),
        stats,
        abilities,
        height: response.height,
        weight: response.weight,
        sprite: pointer_string(&response.sprites, "/front_default"),
    })
}

/// Resolve the species names belonging to a generation.
pub async fn fetch_generation_members(id: u8) -> Result<Vec<String>, String> {
    let url = format!("{API_BASE}/generation/{id}");
    let response: GenerationResponse = fetch_json(&url).await?;
    Ok(response
        .pokemon_species
        .into_iter()
        .map(|species| species.name)
        .collect())
}

async fn fetch_entry(url: &str) -> Result<CatalogEntry, String> {
    let response: PokemonResponse = fetch_json(url).await?;

    let get_stat = |stat_name: &str| -> u16 {
        response
            .stats
            .iter()
            .find(|slot| slot.stat.name == stat_name)
            .map(|slot| slot.base_stat)
            .unwrap_or(0)
    };

    Ok(CatalogEntry {
        id: response.id,
        name: response.name.clone(),
        types: type_names(&response),
        hp: get_stat("hp"),
        attack: get_stat("attack"),
        defense: get_stat("defense"),
        sprite: pointer_string(&response.sprites, "/front_default"),
        url: url.to_string(),
    })
}

fn type_names(response: &PokemonResponse) -> Vec<String> {
    response
        .types
        .iter()
        .map(|slot| slot.type_info.name.clone())
        .collect()
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let client = http_client();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = response.error_for_status().map_err(|err| err.to_string())?;
    response.json().await.map_err(|err| err.to_string())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
