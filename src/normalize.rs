//! Columnas derivadas: `decade` en películas y `collaboration_count` en
//! colaboraciones. Ambos pasos comprueban antes si la columna ya existe.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::dataset::{CollaborationTable, DataContext, MovieTable};

/// Qué columnas derivadas se han calculado en este arranque.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct NormalizeReport {
    pub decade_derived: bool,
    pub collaboration_count_derived: bool,
}

/// Década de un año: división entera por 10 con suelo, por 10.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Aplica los dos pasos de normalización. Es idempotente.
pub fn normalize(ctx: &mut DataContext) -> NormalizeReport {
    NormalizeReport {
        decade_derived: derive_decades(&mut ctx.movies),
        collaboration_count_derived: derive_collaboration_counts(&mut ctx.collaborations),
    }
}

fn derive_decades(movies: &mut MovieTable) -> bool {
    if movies.has_decade {
        return false;
    }
    for record in &mut movies.records {
        record.decade = Some(decade_of(record.year_of_release));
    }
    movies.has_decade = true;
    info!("Columna 'decade' calculada para {} películas.", movies.records.len());
    true
}

fn derive_collaboration_counts(collabs: &mut CollaborationTable) -> bool {
    if collabs.has_collaboration_count {
        return false;
    }

    let mut films: HashMap<(&str, &str), HashSet<&str>> = HashMap::new();
    for record in &collabs.records {
        let entry = films
            .entry((record.actor.as_str(), record.director.as_str()))
            .or_default();
        if let Some(id) = record.imdb_id.as_deref().filter(|id| !id.is_empty()) {
            entry.insert(id);
        }
    }
    let counts: HashMap<(String, String), i64> = films
        .into_iter()
        .map(|((actor, director), ids)| ((actor.to_string(), director.to_string()), ids.len() as i64))
        .collect();

    for record in &mut collabs.records {
        let key = (record.actor.clone(), record.director.clone());
        record.collaboration_count = Some(counts.get(&key).copied().unwrap_or(0));
    }
    collabs.has_collaboration_count = true;
    info!("Columna 'collaboration_count' calculada para {} parejas actor-director.", counts.len());
    true
}
