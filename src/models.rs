//! Modelos de dominio (filas de las tablas CSV y selección de filtros).

use serde::{Deserialize, Deserializer, Serialize};

/// Enteros de los CSV exportados con pandas: una columna entera con huecos
/// se escribe como flotante (`3.0`). Se aceptan ambas formas siempre que el
/// valor no tenga parte decimal.
pub mod integral {
    use super::*;
    use serde::de::Error;

    pub fn parse<T: TryFrom<i64>>(raw: &str) -> Result<T, String> {
        let raw = raw.trim();
        let value = match raw.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                let float = raw
                    .parse::<f64>()
                    .map_err(|_| format!("'{raw}' no es un número entero"))?;
                if !float.is_finite() || float.fract() != 0.0 || float.abs() > i64::MAX as f64 {
                    return Err(format!("'{raw}' no es un número entero"));
                }
                float as i64
            }
        };
        T::try_from(value).map_err(|_| format!("'{raw}' está fuera de rango"))
    }

    pub fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse(&raw).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Fila de la tabla principal de películas.
/// Las columnas que no aparecen aquí se ignoran al leer el CSV.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MovieRecord {
    #[serde(deserialize_with = "integral::required")]
    pub year_of_release: i32,
    #[serde(default)]
    pub genre1: Option<String>,
    #[serde(default)]
    pub genre2: Option<String>,
    #[serde(default)]
    pub genre3: Option<String>,
    /// Texto libre con varios nombres.
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub directors: Option<String>,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "integral::optional")]
    pub wins: Option<i64>,
    /// Derivada de `year_of_release` si el CSV no la trae (ver `normalize`).
    #[serde(default, deserialize_with = "integral::optional")]
    pub decade: Option<i32>,
}

impl MovieRecord {
    /// Predicado OR de género: coincide si alguno de los tres campos es igual.
    pub fn has_genre(&self, genre: &str) -> bool {
        [&self.genre1, &self.genre2, &self.genre3]
            .into_iter()
            .any(|g| g.as_deref() == Some(genre))
    }
}

/// Punto de la serie temporal de popularidad por género (precalculada).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenreTimelinePoint {
    pub genre: String,
    #[serde(deserialize_with = "integral::required")]
    pub year_of_release: i32,
    #[serde(deserialize_with = "integral::required")]
    pub count: i64,
}

/// Valoración media de IMDb por década. `None` cuando ninguna película de
/// la década tiene valoración (se serializa como `null`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RatingsByDecade {
    #[serde(deserialize_with = "integral::required")]
    pub decade: i32,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
}

/// Combinación de géneros y número de películas que la comparten.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenreBlendingRow {
    pub genre_combination: String,
    #[serde(deserialize_with = "integral::required")]
    pub count: i64,
}

/// Fila de la tabla de colaboraciones actor-director.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CollaborationRecord {
    pub actor: String,
    /// En el CSV el director viene en la columna `name`.
    #[serde(rename = "name")]
    pub director: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "integral::optional")]
    pub collaboration_count: Option<i64>,
}

/// Agregado de premios por (año, género principal).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WinsByYear {
    pub year_of_release: i32,
    pub genre1: String,
    pub wins: i64,
}

/// Selección actual de filtros. `None` equivale a la opción "sin filtro".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSelection {
    pub genre: Option<String>,
    pub decade: Option<i32>,
    pub actor: Option<String>,
    pub director: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::integral;

    #[test]
    fn integral_accepts_integer_and_whole_float_text() {
        assert_eq!(integral::parse::<i64>("3"), Ok(3));
        assert_eq!(integral::parse::<i64>("3.0"), Ok(3));
        assert_eq!(integral::parse::<i32>(" 1990.0 "), Ok(1990));
        assert_eq!(integral::parse::<i64>("-2.0"), Ok(-2));
    }

    #[test]
    fn integral_rejects_fractions_and_text() {
        assert!(integral::parse::<i64>("3.5").is_err());
        assert!(integral::parse::<i64>("NaN").is_err());
        assert!(integral::parse::<i64>("mil").is_err());
        assert!(integral::parse::<i32>("1e12").is_err());
    }
}
