//! Especificaciones declarativas de los cinco gráficos.
//!
//! El frontend las pinta con Plotly; aquí sólo se decide tipo de gráfico,
//! ejes, codificación de tamaño/color, títulos y etiquetas.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::models::{CollaborationRecord, GenreBlendingRow, GenreTimelinePoint, RatingsByDecade, WinsByYear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Gráfico listo para serializar a JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    /// Cabecera de la sección del dashboard.
    pub section: &'static str,
    pub kind: ChartKind,
    pub title: String,
    pub x: &'static str,
    pub y: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_shape: Option<&'static str>,
    pub markers: bool,
    pub labels: BTreeMap<&'static str, &'static str>,
    pub data: Vec<serde_json::Value>,
}

impl ChartSpec {
    fn new(id: &'static str, section: &'static str, kind: ChartKind, title: impl Into<String>, x: &'static str, y: &'static str) -> Self {
        Self {
            id,
            section,
            kind,
            title: title.into(),
            x,
            y,
            size: None,
            color: None,
            orientation: Orientation::Vertical,
            color_scale: None,
            size_max: None,
            line_shape: None,
            markers: false,
            labels: BTreeMap::new(),
            data: Vec::new(),
        }
    }

    fn labels(mut self, labels: &[(&'static str, &'static str)]) -> Self {
        self.labels.extend(labels.iter().copied());
        self
    }

    fn rows<T: Serialize>(mut self, rows: &[T]) -> Result<Self> {
        self.data = rows.iter().map(serde_json::to_value).collect::<Result<_, _>>()?;
        Ok(self)
    }
}

/// Popularidad de géneros: dispersión año/recuento, tamaño por recuento.
pub fn genre_timeline_chart(points: &[GenreTimelinePoint]) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new(
        "genre_timeline",
        "Genre Popularity Over Time",
        ChartKind::Scatter,
        "Genre Popularity Over Time",
        "year_of_release",
        "count",
    )
    .labels(&[("year_of_release", "Year"), ("count", "Number of Movies")]);
    chart.size = Some("count");
    chart.color = Some("genre");
    chart.size_max = Some(30);
    chart.rows(points)
}

/// Título del gráfico de valoraciones; menciona el género si hay uno.
pub fn ratings_title(genre: Option<&str>) -> String {
    match genre {
        Some(genre) => format!("Average IMDb Ratings by Decade for {genre}"),
        None => "Average IMDb Ratings by Decade".to_string(),
    }
}

pub fn ratings_by_decade_chart(ratings: &[RatingsByDecade], genre: Option<&str>) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new(
        "ratings_by_decade",
        "IMDb Ratings by Decade",
        ChartKind::Bar,
        ratings_title(genre),
        "decade",
        "imdb_rating",
    )
    .labels(&[("decade", "Decade"), ("imdb_rating", "Average IMDb Rating")]);
    chart.color = Some("imdb_rating");
    chart.color_scale = Some("Blues");
    chart.rows(ratings)
}

/// Barras horizontales con las combinaciones de géneros más frecuentes.
pub fn genre_blending_chart(rows: &[GenreBlendingRow]) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new(
        "genre_blending",
        "Genre Blending Trends",
        ChartKind::Bar,
        "Top Genre Combinations",
        "count",
        "genre_combination",
    )
    .labels(&[("count", "Number of Movies"), ("genre_combination", "Genre Combination")]);
    chart.orientation = Orientation::Horizontal;
    chart.color = Some("count");
    chart.color_scale = Some("sunset");
    chart.rows(rows)
}

pub fn collaborations_chart(records: &[CollaborationRecord]) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new(
        "collaborations",
        "Actor-Director Collaboration Network",
        ChartKind::Scatter,
        "Top Actor-Director Collaborations",
        "actor",
        "name",
    )
    .labels(&[("actor", "Actor"), ("name", "Director"), ("collaboration_count", "Collaborations")]);
    chart.size = Some("collaboration_count");
    chart.color = Some("collaboration_count");
    chart.size_max = Some(40);
    chart.rows(records)
}

/// Evolución de premios por año, una línea por género principal.
pub fn winning_trends_chart(wins: &[WinsByYear]) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new(
        "winning_trends",
        "Winning Trends by Year",
        ChartKind::Line,
        "Winning Trends Over the Years",
        "year_of_release",
        "wins",
    )
    .labels(&[("year_of_release", "Year"), ("wins", "Number of Wins"), ("genre1", "Genre")]);
    chart.color = Some("genre1");
    chart.line_shape = Some("spline");
    chart.markers = true;
    chart.rows(wins)
}
