//! Carga de las cinco tablas CSV del dashboard en un contexto inmutable.
//!
//! API pública:
//!   - `load(&DatasetPaths)` lee y valida los ficheros.
//!   - `DataContext` agrupa las tablas ya cargadas (y normalizadas).

use std::{collections::HashSet, fs::File, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    config::DatasetPaths,
    models::{CollaborationRecord, GenreBlendingRow, GenreTimelinePoint, MovieRecord, RatingsByDecade},
};

/// Tabla de películas junto con las columnas opcionales presentes en el CSV.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    pub records: Vec<MovieRecord>,
    pub has_actors: bool,
    pub has_directors: bool,
    pub has_decade: bool,
}

/// Tabla de colaboraciones actor-director.
#[derive(Debug, Clone, Default)]
pub struct CollaborationTable {
    pub records: Vec<CollaborationRecord>,
    pub has_collaboration_count: bool,
}

/// Todas las tablas del dashboard. Se construye una vez al arrancar y
/// después sólo se lee.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    pub genre_timeline: Vec<GenreTimelinePoint>,
    pub ratings_by_decade: Vec<RatingsByDecade>,
    pub genre_blending: Vec<GenreBlendingRow>,
    pub movies: MovieTable,
    pub collaborations: CollaborationTable,
}

/// Lee los cinco ficheros. Cualquier error de E/S o de esquema es fatal.
pub fn load(paths: &DatasetPaths) -> Result<DataContext> {
    let (genre_timeline, _) =
        read_table::<GenreTimelinePoint>(&paths.genre_timeline, &["genre", "year_of_release", "count"])?;
    let (ratings_by_decade, _) =
        read_table::<RatingsByDecade>(&paths.ratings_by_decade, &["decade", "imdb_rating"])?;
    let (genre_blending, _) =
        read_table::<GenreBlendingRow>(&paths.genre_blending, &["genre_combination", "count"])?;

    let (movie_records, movie_columns) = read_table::<MovieRecord>(
        &paths.movies,
        &["year_of_release", "genre1", "genre2", "genre3", "imdb_rating", "wins"],
    )?;
    let movies = MovieTable {
        records: movie_records,
        has_actors: movie_columns.contains("actors"),
        has_directors: movie_columns.contains("directors"),
        has_decade: movie_columns.contains("decade"),
    };

    let (collab_records, collab_columns) =
        read_table::<CollaborationRecord>(&paths.collaborations, &["actor", "name"])?;
    let has_collaboration_count = collab_columns.contains("collaboration_count");
    if !has_collaboration_count && !collab_columns.contains("imdb_id") {
        return Err(anyhow!(
            "Falta la columna 'imdb_id' en {} (necesaria para calcular 'collaboration_count')",
            paths.collaborations.display()
        ));
    }
    let collaborations = CollaborationTable {
        records: collab_records,
        has_collaboration_count,
    };

    let ctx = DataContext {
        genre_timeline,
        ratings_by_decade,
        genre_blending,
        movies,
        collaborations,
    };
    info!(
        "Datos cargados: {} puntos de timeline, {} décadas, {} combinaciones de géneros, {} películas, {} colaboraciones.",
        ctx.genre_timeline.len(),
        ctx.ratings_by_decade.len(),
        ctx.genre_blending.len(),
        ctx.movies.records.len(),
        ctx.collaborations.records.len()
    );
    Ok(ctx)
}

/// Lee un CSV con cabecera, comprueba las columnas obligatorias y
/// deserializa cada fila. Devuelve también el conjunto de columnas leídas.
fn read_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<(Vec<T>, HashSet<String>)> {
    let file = File::open(path).with_context(|| format!("No se pudo abrir {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(file);

    let columns: HashSet<String> = reader
        .headers()
        .with_context(|| format!("No se pudo leer la cabecera de {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    if let Some(missing) = required.iter().find(|c| !columns.contains(**c)) {
        return Err(anyhow!("Falta la columna '{}' en {}", missing, path.display()));
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        // +2: la cabecera es la línea 1 y las filas se numeran desde 1.
        let row = result.with_context(|| format!("Fila {} no válida en {}", index + 2, path.display()))?;
        rows.push(row);
    }
    Ok((rows, columns))
}
