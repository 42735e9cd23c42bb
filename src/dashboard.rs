//! Montaje del dashboard: función pura de (tablas, selección) a los cinco
//! gráficos, más las listas de opciones de los selectores.

use std::collections::HashSet;
use std::hash::Hash;

use anyhow::Result;
use serde::Serialize;

use crate::{
    charts::{self, ChartSpec},
    dataset::DataContext,
    filters,
    models::FilterSelection,
};

/// Respuesta completa para una selección de filtros.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub filters: FilterSelection,
    pub charts: Vec<ChartSpec>,
    /// Avisos no fatales que el frontend muestra al usuario.
    pub warnings: Vec<String>,
    pub matched_movies: usize,
}

/// Valores distintos para los selectores, en orden de primera aparición.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub decades: Vec<i32>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
}

/// Recalcula todas las vistas desde cero. No guarda estado entre llamadas.
pub fn render(ctx: &DataContext, selection: &FilterSelection) -> Result<Dashboard> {
    let genre = selection.genre.as_deref();

    let movies = filters::filter_movies(&ctx.movies, selection);
    let timeline = filters::filter_timeline(&ctx.genre_timeline, genre);
    let ratings = filters::ratings_by_decade(&ctx.ratings_by_decade, &ctx.movies.records, genre);
    let blending = filters::genre_blending(&ctx.genre_blending, genre);
    let collaborations = filters::filter_collaborations(
        &ctx.collaborations.records,
        selection.actor.as_deref(),
        selection.director.as_deref(),
    );
    let wins = filters::winning_trends(&movies.records);

    let charts = vec![
        charts::genre_timeline_chart(&timeline)?,
        charts::ratings_by_decade_chart(&ratings, genre)?,
        charts::genre_blending_chart(&blending)?,
        charts::collaborations_chart(&collaborations)?,
        charts::winning_trends_chart(&wins)?,
    ];

    Ok(Dashboard {
        filters: selection.clone(),
        charts,
        warnings: movies.warnings,
        matched_movies: movies.records.len(),
    })
}

pub fn filter_options(ctx: &DataContext) -> FilterOptions {
    FilterOptions {
        genres: unique(ctx.genre_timeline.iter().map(|p| p.genre.clone())),
        decades: unique(ctx.ratings_by_decade.iter().map(|r| r.decade)),
        actors: unique(ctx.collaborations.records.iter().map(|r| r.actor.clone())),
        directors: unique(ctx.collaborations.records.iter().map(|r| r.director.clone())),
    }
}

fn unique<T: Eq + Hash + Clone>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{self, tests::{write_fixture, COLLABS, MOVIES}};
    use crate::normalize;

    fn context() -> DataContext {
        let (_dir, paths) = write_fixture(MOVIES, COLLABS);
        let mut ctx = dataset::load(&paths).unwrap();
        normalize::normalize(&mut ctx);
        ctx
    }

    fn chart<'a>(dashboard: &'a Dashboard, id: &str) -> &'a ChartSpec {
        dashboard.charts.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn unfiltered_dashboard_has_five_charts_in_order() -> Result<()> {
        let ctx = context();
        let dashboard = render(&ctx, &FilterSelection::default())?;

        let ids: Vec<_> = dashboard.charts.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec!["genre_timeline", "ratings_by_decade", "genre_blending", "collaborations", "winning_trends"]
        );
        assert_eq!(dashboard.matched_movies, 4);
        assert!(dashboard.warnings.is_empty());
        assert_eq!(chart(&dashboard, "genre_timeline").data.len(), 3);
        // Sin género se usa la tabla precalculada.
        assert_eq!(chart(&dashboard, "ratings_by_decade").data.len(), 2);
        assert_eq!(chart(&dashboard, "ratings_by_decade").title, "Average IMDb Ratings by Decade");
        Ok(())
    }

    #[test]
    fn genre_selection_flows_through_every_view() -> Result<()> {
        let ctx = context();
        let selection = FilterSelection {
            genre: Some("Drama".into()),
            ..Default::default()
        };
        let dashboard = render(&ctx, &selection)?;

        assert_eq!(dashboard.matched_movies, 3);
        assert_eq!(chart(&dashboard, "genre_timeline").data.len(), 2);

        let ratings = chart(&dashboard, "ratings_by_decade");
        assert_eq!(ratings.title, "Average IMDb Ratings by Decade for Drama");
        // 1990: 7.5; 2000: 6.5 (la película de 2003 no tiene valoración).
        assert_eq!(ratings.data.len(), 2);
        assert_eq!(ratings.data[0]["decade"], 1990);
        assert_eq!(ratings.data[0]["imdb_rating"], 7.5);
        assert_eq!(ratings.data[1]["imdb_rating"], 6.5);

        assert_eq!(chart(&dashboard, "genre_blending").data.len(), 2);
        // Las colaboraciones no dependen del género.
        assert_eq!(chart(&dashboard, "collaborations").data.len(), 4);

        // Tres películas, agrupadas por (año, genre1): la de 2001 es "Action".
        let wins = &chart(&dashboard, "winning_trends").data;
        assert_eq!(wins.len(), 3);
        assert_eq!(wins[1]["genre1"], "Action");
        Ok(())
    }

    #[test]
    fn actor_and_director_narrow_movies_and_collaborations() -> Result<()> {
        let ctx = context();
        let selection = FilterSelection {
            actor: Some("Shah Rukh Khan".into()),
            director: Some("Karan Johar".into()),
            ..Default::default()
        };
        let dashboard = render(&ctx, &selection)?;

        assert_eq!(dashboard.matched_movies, 1);
        let collabs = chart(&dashboard, "collaborations");
        assert_eq!(collabs.data.len(), 2);
        assert!(collabs.data.iter().all(|r| r["collaboration_count"] == 2));
        Ok(())
    }

    #[test]
    fn empty_results_are_not_errors() -> Result<()> {
        let ctx = context();
        let selection = FilterSelection {
            genre: Some("Thriller".into()),
            decade: Some(1950),
            ..Default::default()
        };
        let dashboard = render(&ctx, &selection)?;
        assert_eq!(dashboard.matched_movies, 0);
        assert!(chart(&dashboard, "winning_trends").data.is_empty());
        assert!(chart(&dashboard, "ratings_by_decade").data.is_empty());
        Ok(())
    }

    #[test]
    fn missing_actor_column_surfaces_warning() -> Result<()> {
        let mut ctx = context();
        ctx.movies.has_actors = false;
        let selection = FilterSelection {
            actor: Some("Nadie".into()),
            ..Default::default()
        };
        let dashboard = render(&ctx, &selection)?;
        assert_eq!(dashboard.matched_movies, 4);
        assert_eq!(dashboard.warnings, vec![filters::missing_column_warning("actors")]);
        Ok(())
    }

    #[test]
    fn options_are_distinct_in_first_seen_order() {
        let ctx = context();
        let options = filter_options(&ctx);
        assert_eq!(options.genres, vec!["Drama", "Comedy"]);
        assert_eq!(options.decades, vec![1990, 2000]);
        assert_eq!(options.actors, vec!["Shah Rukh Khan", "Kajol"]);
        assert_eq!(options.directors, vec!["Karan Johar", "Farah Khan"]);
    }
}
