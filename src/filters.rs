//! Pipeline de filtrado y agregación.
//!
//! Cada función recibe las tablas cargadas y la parte de la selección que le
//! afecta, y devuelve una vista nueva. Nada se modifica en sitio.
//!
//! Resumen por vista:
//!   - películas: género (OR sobre genre1..3) → década → actor → director.
//!   - timeline: sólo género.
//!   - valoraciones por década: precalculadas, o recalculadas si hay género.
//!   - mezcla de géneros: subcadena sin distinguir mayúsculas, máximo 10 filas.
//!   - colaboraciones: igualdad exacta de actor y/o director.
//!   - premios por año: agrupación (año, genre1) sobre las películas filtradas.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    dataset::MovieTable,
    models::{
        CollaborationRecord, FilterSelection, GenreBlendingRow, GenreTimelinePoint, MovieRecord,
        RatingsByDecade, WinsByYear,
    },
};

/// Número máximo de combinaciones de géneros que se muestran.
pub const GENRE_BLENDING_LIMIT: usize = 10;

/// Resultado del filtrado de películas: filas que pasan y avisos visibles
/// para el usuario (columnas ausentes).
#[derive(Debug, Default)]
pub struct MovieFilterOutcome<'a> {
    pub records: Vec<&'a MovieRecord>,
    pub warnings: Vec<String>,
}

pub fn missing_column_warning(column: &str) -> String {
    format!("Falta la columna '{column}' en el conjunto de datos.")
}

/// Aplica los cuatro filtros sobre la tabla de películas, en orden
/// género → década → actor → director.
pub fn filter_movies<'a>(movies: &'a MovieTable, selection: &FilterSelection) -> MovieFilterOutcome<'a> {
    let mut outcome = MovieFilterOutcome {
        records: movies.records.iter().collect(),
        warnings: Vec::new(),
    };

    if let Some(genre) = selection.genre.as_deref() {
        outcome.records.retain(|m| m.has_genre(genre));
    }

    if let Some(decade) = selection.decade {
        outcome.records.retain(|m| m.decade == Some(decade));
    }

    if let Some(actor) = selection.actor.as_deref() {
        if movies.has_actors {
            outcome.records.retain(|m| contains(m.actors.as_deref(), actor));
        } else {
            warn!("Filtro de actor '{actor}' ignorado: no existe la columna 'actors'.");
            outcome.warnings.push(missing_column_warning("actors"));
        }
    }

    if let Some(director) = selection.director.as_deref() {
        if movies.has_directors {
            outcome.records.retain(|m| contains(m.directors.as_deref(), director));
        } else {
            warn!("Filtro de director '{director}' ignorado: no existe la columna 'directors'.");
            outcome.warnings.push(missing_column_warning("directors"));
        }
    }

    outcome
}

/// Subcadena sensible a mayúsculas; un valor ausente nunca coincide.
fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.contains(needle))
}

pub fn filter_timeline(points: &[GenreTimelinePoint], genre: Option<&str>) -> Vec<GenreTimelinePoint> {
    match genre {
        Some(genre) => points.iter().filter(|p| p.genre == genre).cloned().collect(),
        None => points.to_vec(),
    }
}

/// Valoración media por década.
///
/// Sin género se devuelve la tabla precalculada tal cual. Con género se
/// recalcula la media de `imdb_rating` por década sobre las películas que
/// cumplen el predicado OR de género (el resto de filtros no influye).
/// Las décadas sin filas no aparecen; una década cuyas películas no tienen
/// ninguna valoración aparece con `imdb_rating: None`.
pub fn ratings_by_decade(
    precomputed: &[RatingsByDecade],
    movies: &[MovieRecord],
    genre: Option<&str>,
) -> Vec<RatingsByDecade> {
    let Some(genre) = genre else {
        return precomputed.to_vec();
    };

    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for movie in movies.iter().filter(|m| m.has_genre(genre)) {
        let Some(decade) = movie.decade else {
            continue;
        };
        let entry = groups.entry(decade).or_insert((0.0, 0));
        if let Some(rating) = movie.imdb_rating {
            entry.0 += rating;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(decade, (sum, n))| RatingsByDecade {
            decade,
            imdb_rating: (n > 0).then(|| sum / n as f64),
        })
        .collect()
}

/// Combinaciones de géneros que contienen el género (sin distinguir
/// mayúsculas), limitadas a las 10 primeras en el orden del fichero.
pub fn genre_blending(rows: &[GenreBlendingRow], genre: Option<&str>) -> Vec<GenreBlendingRow> {
    let needle = genre.map(str::to_lowercase);
    rows.iter()
        .filter(|row| match &needle {
            Some(needle) => row.genre_combination.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .take(GENRE_BLENDING_LIMIT)
        .cloned()
        .collect()
}

pub fn filter_collaborations(
    records: &[CollaborationRecord],
    actor: Option<&str>,
    director: Option<&str>,
) -> Vec<CollaborationRecord> {
    records
        .iter()
        .filter(|r| actor.map_or(true, |a| r.actor == a))
        .filter(|r| director.map_or(true, |d| r.director == d))
        .cloned()
        .collect()
}

/// Suma de premios agrupada por (año, genre1). `genre2`/`genre3` no se usan
/// como clave aunque sí participen en el filtro de género previo.
/// Las filas sin `genre1` quedan fuera; los premios ausentes cuentan 0.
pub fn winning_trends(movies: &[&MovieRecord]) -> Vec<WinsByYear> {
    let mut groups: BTreeMap<(i32, &str), i64> = BTreeMap::new();
    for movie in movies {
        let Some(genre1) = movie.genre1.as_deref() else {
            continue;
        };
        *groups.entry((movie.year_of_release, genre1)).or_insert(0) += movie.wins.unwrap_or(0);
    }

    groups
        .into_iter()
        .map(|((year_of_release, genre1), wins)| WinsByYear {
            year_of_release,
            genre1: genre1.to_string(),
            wins,
        })
        .collect()
}
