//! Loading of the movie table and the precomputed similarity matrix.
//!
//! Both files are JSON. The movie table is accepted either as a list of rows
//! or in the column-oriented layout dataframe exports produce, where every
//! column maps a positional index ("0", "1", ...) to a value.
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    services::similarity::SimilarityMatrix,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum MovieTableFile {
    Rows(Vec<Movie>),
    Columns(MovieColumns),
}

#[derive(Deserialize)]
struct MovieColumns {
    #[serde(alias = "movie_id")]
    id: BTreeMap<String, i64>,
    title: BTreeMap<String, String>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl MovieColumns {
    fn into_movies(self) -> AppResult<Vec<Movie>> {
        let mut indexed = Vec::with_capacity(self.title.len());

        for (key, title) in self.title {
            let position: usize = key.parse().map_err(|_| {
                AppError::DataLoad(format!("Invalid row index '{}' in movie table", key))
            })?;
            let id = *self.id.get(&key).ok_or_else(|| {
                AppError::DataLoad(format!("Row '{}' has a title but no id", key))
            })?;
            let tags = self.tags.get(&key).cloned().unwrap_or_default();

            indexed.push((position, Movie { id, title, tags }));
        }

        // BTreeMap orders keys as strings ("10" < "2"), so sort on the parsed index
        indexed.sort_by_key(|(position, _)| *position);

        Ok(indexed.into_iter().map(|(_, movie)| movie).collect())
    }
}

/// Parses a movie table from JSON text
pub fn parse_movies(json: &str) -> AppResult<Vec<Movie>> {
    let file: MovieTableFile = serde_json::from_str(json)
        .map_err(|e| AppError::DataLoad(format!("Malformed movie table: {}", e)))?;

    let movies = match file {
        MovieTableFile::Rows(rows) => rows,
        MovieTableFile::Columns(columns) => columns.into_movies()?,
    };

    if movies.is_empty() {
        return Err(AppError::DataLoad("Movie table is empty".to_string()));
    }

    Ok(movies)
}

/// Loads the movie table from disk
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<Movie>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        AppError::DataLoad(format!("Cannot read movie table {}: {}", path.display(), e))
    })?;

    let movies = parse_movies(&json)?;

    tracing::info!(
        path = %path.display(),
        movies = movies.len(),
        "Loaded movie table"
    );

    Ok(movies)
}

/// Loads a precomputed similarity matrix (a JSON array of rows)
pub fn load_similarity(path: impl AsRef<Path>) -> AppResult<SimilarityMatrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AppError::DataLoad(format!(
            "Cannot read similarity matrix {}: {}",
            path.display(),
            e
        ))
    })?;

    let rows: Vec<Vec<f32>> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::DataLoad(format!("Malformed similarity matrix: {}", e)))?;

    let matrix = SimilarityMatrix::from_rows(rows)?;

    tracing::info!(
        path = %path.display(),
        size = matrix.len(),
        "Loaded precomputed similarity matrix"
    );

    Ok(matrix)
}

/// Writes a similarity matrix in the format `load_similarity` reads
pub fn save_similarity(path: impl AsRef<Path>, matrix: &SimilarityMatrix) -> AppResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let rows: Vec<&[f32]> = matrix.rows().collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &rows)?;
    writer.flush()?;

    tracing::info!(path = %path.display(), size = matrix.len(), "Saved similarity matrix");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_row_layout() {
        let json = r#"[
            {"movie_id": 1, "title": "Inception", "tags": "dream heist"},
            {"id": 2, "title": "Tenet"}
        ]"#;

        let movies = parse_movies(json).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0], Movie::new(1, "Inception", "dream heist"));
        assert_eq!(movies[1], Movie::new(2, "Tenet", ""));
    }

    #[test]
    fn test_parse_column_layout_orders_by_numeric_index() {
        let mut ids = serde_json::Map::new();
        let mut titles = serde_json::Map::new();
        let mut tags = serde_json::Map::new();
        for i in 0..12 {
            ids.insert(i.to_string(), serde_json::json!(100 + i));
            titles.insert(i.to_string(), serde_json::json!(format!("Movie {}", i)));
            tags.insert(i.to_string(), serde_json::json!(format!("tag{}", i)));
        }
        let json = serde_json::json!({ "movie_id": ids, "title": titles, "tags": tags }).to_string();

        let movies = parse_movies(&json).unwrap();
        assert_eq!(movies.len(), 12);
        for (i, movie) in movies.iter().enumerate() {
            assert_eq!(movie.id, 100 + i as i64);
            assert_eq!(movie.title, format!("Movie {}", i));
        }
    }

    #[test]
    fn test_parse_column_layout_missing_id() {
        let json = r#"{"movie_id": {"0": 1}, "title": {"0": "A", "1": "B"}}"#;
        assert!(matches!(parse_movies(json), Err(AppError::DataLoad(_))));
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(parse_movies("[]"), Err(AppError::DataLoad(_))));
        assert!(matches!(parse_movies("not json"), Err(AppError::DataLoad(_))));
        assert!(matches!(
            parse_movies(r#"{"foo": 1}"#),
            Err(AppError::DataLoad(_))
        ));
    }

    #[test]
    fn test_load_movies_missing_file() {
        let result = load_movies("/nonexistent/movies.json");
        assert!(matches!(result, Err(AppError::DataLoad(_))));
    }

    #[test]
    fn test_load_movies_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 7, "title": "Memento", "tags": "memory"}}]"#).unwrap();

        let movies = load_movies(file.path()).unwrap();
        assert_eq!(movies, vec![Movie::new(7, "Memento", "memory")]);
    }

    #[test]
    fn test_similarity_save_then_load() {
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.25], vec![0.25, 1.0]]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("similarity.json");

        save_similarity(&path, &matrix).unwrap();
        let loaded = load_similarity(&path).unwrap();

        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_load_similarity_rejects_non_square() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[[1.0, 0.5], [0.5]]").unwrap();

        assert!(matches!(
            load_similarity(file.path()),
            Err(AppError::DataLoad(_))
        ));
    }
}
