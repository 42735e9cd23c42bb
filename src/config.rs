//! Carga y gestión de configuración de la aplicación (datos + servidor).

use std::env;
use std::path::PathBuf;
use anyhow::{anyhow, Result};

/// Rutas de los cinco ficheros CSV del dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetPaths {
    pub genre_timeline: PathBuf,
    pub ratings_by_decade: PathBuf,
    pub genre_blending: PathBuf,
    pub movies: PathBuf,
    pub collaborations: PathBuf,
}

impl DatasetPaths {
    /// Rutas con los nombres de fichero por defecto dentro de `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        Self {
            genre_timeline: dir.join("genre_timeline.csv"),
            ratings_by_decade: dir.join("ratings_by_decade.csv"),
            genre_blending: dir.join("genre_blending.csv"),
            movies: dir.join("bollywood_full_preprocessed_split.csv"),
            collaborations: dir.join("merged_actor_director_data.csv"),
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub datasets: DatasetPaths,
    pub server_addr: String,
    pub frontend_dir: PathBuf,
    pub open_browser: bool,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, pero leyendo de una función arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()));

        let defaults = DatasetPaths::in_dir(&data_dir);
        let file = |key: &str, default: PathBuf| -> PathBuf {
            lookup(key).map(|name| data_dir.join(name)).unwrap_or(default)
        };
        let datasets = DatasetPaths {
            genre_timeline: file("GENRE_TIMELINE_FILE", defaults.genre_timeline),
            ratings_by_decade: file("RATINGS_BY_DECADE_FILE", defaults.ratings_by_decade),
            genre_blending: file("GENRE_BLENDING_FILE", defaults.genre_blending),
            movies: file("MOVIES_FILE", defaults.movies),
            collaborations: file("COLLABORATIONS_FILE", defaults.collaborations),
        };

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8501".to_string());
        let frontend_dir = PathBuf::from(lookup("FRONTEND_DIR").unwrap_or_else(|| "frontend".to_string()));

        let open_browser = match lookup("OPEN_BROWSER") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| anyhow!("Valor no válido para OPEN_BROWSER: {value}"))?,
            None => true,
        };

        Ok(Self {
            data_dir,
            datasets,
            server_addr,
            frontend_dir,
            open_browser,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "si" | "sí" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
