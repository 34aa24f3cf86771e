//! Wire types for the Xtream Codes `player_api.php` responses.
//!
//! Providers are loose with JSON types: ids and timestamps arrive as strings
//! or numbers depending on the panel software, and cover art may live in any
//! of several fields. Everything deserializes into `String` through lenient
//! shims and normalizes into the catalog types from there.

use serde::Deserialize;

use flickstash_catalog::{ItemKind, VodCategory, VodMovie, VodSeries};

/// A category entry from `get_vod_categories` or `get_series_categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct XtreamCategory {
    #[serde(deserialize_with = "string_or_number")]
    pub category_id: String,
    pub category_name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub parent_id: i64,
}

/// A movie entry from `get_vod_streams`.
#[derive(Debug, Clone, Deserialize)]
pub struct XtreamMovie {
    #[serde(deserialize_with = "string_or_number")]
    pub stream_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
    #[serde(default)]
    pub movie_image: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub cover_big: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub backdrop_path: Vec<String>,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub duration: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, rename = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub added: Option<String>,
    #[serde(default)]
    pub container_extension: Option<String>,
}

/// A series entry from `get_series`.
#[derive(Debug, Clone, Deserialize)]
pub struct XtreamSeries {
    #[serde(deserialize_with = "string_or_number")]
    pub series_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub backdrop_path: Vec<String>,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub rating: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, rename = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default, deserialize_with = "string_or_number_opt")]
    pub last_modified: Option<String>,
}

// ── Normalization ───────────────────────────────────────────────────────────

impl XtreamCategory {
    pub fn into_category(self, playlist_id: &str, kind: ItemKind) -> VodCategory {
        VodCategory {
            playlist_id: playlist_id.to_string(),
            category_id: self.category_id,
            name: self.category_name,
            kind,
            parent_id: self.parent_id,
            item_count: 0,
        }
    }
}

impl XtreamMovie {
    /// Pick the first populated cover field, in the order the panels most
    /// reliably fill them.
    pub fn cover_url(&self) -> String {
        first_non_empty(&[
            self.stream_icon.as_deref(),
            self.movie_image.as_deref(),
            self.cover.as_deref(),
            self.cover_big.as_deref(),
        ])
    }

    /// Direct playback URL: `{base}/movie/{user}/{pass}/{stream_id}.{ext}`.
    pub fn stream_url(&self, base_url: &str, username: &str, password: &str) -> String {
        let ext = self.container_extension.as_deref().unwrap_or("mp4");
        format!(
            "{}/movie/{}/{}/{}.{}",
            base_url.trim_end_matches('/'),
            username,
            password,
            self.stream_id,
            ext
        )
    }

    pub fn into_movie(
        self,
        playlist_id: &str,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> VodMovie {
        let cover_url = self.cover_url();
        let stream_url = self.stream_url(base_url, username, password);
        let backdrop_url = self.backdrop_path.into_iter().find(|u| !u.is_empty());
        VodMovie {
            playlist_id: playlist_id.to_string(),
            movie_id: self.stream_id,
            category_id: self.category_id.unwrap_or_default(),
            name: self.name,
            stream_url,
            cover_url,
            backdrop_url: backdrop_url.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            plot: self.plot.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            cast: self.cast.unwrap_or_default(),
            added: self.added.unwrap_or_default(),
            container_extension: self.container_extension.unwrap_or_else(|| "mp4".to_string()),
        }
    }
}

impl XtreamSeries {
    pub fn into_series(self, playlist_id: &str) -> VodSeries {
        let backdrop_url = self.backdrop_path.into_iter().find(|u| !u.is_empty());
        VodSeries {
            playlist_id: playlist_id.to_string(),
            series_id: self.series_id,
            category_id: self.category_id.unwrap_or_default(),
            name: self.name,
            cover_url: self.cover.unwrap_or_default(),
            backdrop_url: backdrop_url.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            plot: self.plot.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            cast: self.cast.unwrap_or_default(),
            episodes_count: 0,
            seasons_count: 0,
            added: self.last_modified.clone().unwrap_or_default(),
            last_updated: self.last_modified.unwrap_or_default(),
        }
    }
}

fn first_non_empty(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

// ── Lenient Deserializers ───────────────────────────────────────────────────

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn string_or_number_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(0)),
        serde_json::Value::String(s) => Ok(s.parse().unwrap_or(0)),
        serde_json::Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "expected integer, got {other}"
        ))),
    }
}

/// `backdrop_path` arrives as an array of URLs, a bare string, or null.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect()),
        serde_json::Value::String(s) => Ok(vec![s]),
        serde_json::Value::Null => Ok(Vec::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected array or string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_and_timestamps_parse() {
        let movie: XtreamMovie = serde_json::from_str(
            r#"{"stream_id": 42, "name": "Test", "category_id": 7, "added": 1700000000, "rating": 6.5}"#,
        )
        .unwrap();
        assert_eq!(movie.stream_id, "42");
        assert_eq!(movie.category_id.as_deref(), Some("7"));
        assert_eq!(movie.added.as_deref(), Some("1700000000"));
        assert_eq!(movie.rating.as_deref(), Some("6.5"));
    }

    #[test]
    fn string_ids_pass_through() {
        let cat: XtreamCategory = serde_json::from_str(
            r#"{"category_id": "12", "category_name": "Action", "parent_id": "0"}"#,
        )
        .unwrap();
        assert_eq!(cat.category_id, "12");
        assert_eq!(cat.parent_id, 0);
    }

    #[test]
    fn cover_falls_back_through_candidates() {
        let movie: XtreamMovie = serde_json::from_str(
            r#"{"stream_id": 1, "name": "A", "stream_icon": "", "movie_image": null, "cover": "http://img/cover.jpg"}"#,
        )
        .unwrap();
        assert_eq!(movie.cover_url(), "http://img/cover.jpg");
    }

    #[test]
    fn missing_cover_fields_yield_empty_url() {
        let movie: XtreamMovie =
            serde_json::from_str(r#"{"stream_id": 1, "name": "A"}"#).unwrap();
        assert_eq!(movie.cover_url(), "");
    }

    #[test]
    fn stream_url_uses_container_extension() {
        let movie: XtreamMovie = serde_json::from_str(
            r#"{"stream_id": 9, "name": "A", "container_extension": "mkv"}"#,
        )
        .unwrap();
        assert_eq!(
            movie.stream_url("http://host:8080/", "u", "p"),
            "http://host:8080/movie/u/p/9.mkv"
        );
    }

    #[test]
    fn backdrop_accepts_string_or_array() {
        let a: XtreamSeries = serde_json::from_str(
            r#"{"series_id": 1, "name": "S", "backdrop_path": ["http://img/b.jpg"]}"#,
        )
        .unwrap();
        assert_eq!(a.backdrop_path, vec!["http://img/b.jpg"]);

        let b: XtreamSeries = serde_json::from_str(
            r#"{"series_id": 2, "name": "S", "backdrop_path": "http://img/c.jpg"}"#,
        )
        .unwrap();
        assert_eq!(b.backdrop_path, vec!["http://img/c.jpg"]);
    }
}
