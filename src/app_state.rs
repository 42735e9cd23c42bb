use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use crate::{config::AppConfig, dataset::DataContext, normalize::NormalizeReport};

#[derive(Clone)]
pub struct AppState {
    /// Tablas cargadas al arrancar; sólo lectura.
    pub data: Arc<DataContext>,
    pub status: Arc<Status>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

/// Resumen de la carga de datos que se expone en `/api/status`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Status {
    pub data_dir: PathBuf,
    pub loaded_at: DateTime<Utc>,
    pub genre_timeline_rows: usize,
    pub ratings_by_decade_rows: usize,
    pub genre_blending_rows: usize,
    pub movie_rows: usize,
    pub collaboration_rows: usize,
    pub derived: NormalizeReport,
}

impl Status {
    pub fn from_data(config: &AppConfig, data: &DataContext, derived: NormalizeReport) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            loaded_at: Utc::now(),
            genre_timeline_rows: data.genre_timeline.len(),
            ratings_by_decade_rows: data.ratings_by_decade.len(),
            genre_blending_rows: data.genre_blending.len(),
            movie_rows: data.movies.records.len(),
            collaboration_rows: data.collaborations.records.len(),
            derived,
        }
    }
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        data: DataContext,
        derived: NormalizeReport,
        shutdown_sender: Option<oneshot::Sender<()>>,
    ) -> Self {
        let status = Status::from_data(config, &data, derived);
        Self {
            data: Arc::new(data),
            status: Arc::new(status),
            shutdown_sender: Arc::new(Mutex::new(shutdown_sender)),
        }
    }
}
