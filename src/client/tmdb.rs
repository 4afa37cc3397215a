use serde::Deserialize;

pub const BASE_URL: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Genres the browsing UI asks for, with their catalog ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Action,
    Comedy,
    Horror,
    Romance,
    Documentary,
}

impl Genre {
    pub fn id(self) -> u32 {
        match self {
            Genre::Action => 28,
            Genre::Comedy => 35,
            Genre::Horror => 27,
            Genre::Romance => 10749,
            Genre::Documentary => 99,
        }
    }
}

// Network id used for the "originals" row.
const NETFLIX_NETWORK_ID: u32 = 213;

/// One catalog entry. Movies carry `title`, TV entries `name`; either may be
/// missing, so display goes through [`Movie::display_title`].
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
}

impl Movie {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Untitled")
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| format!("{IMAGE_BASE_URL}{p}"))
    }

    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|p| format!("{IMAGE_BASE_URL}{p}"))
    }
}

/// Paginated result list as the catalog API returns it.
#[derive(Debug, Deserialize)]
pub struct Page {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Read-only wrapper around the third-party movie catalog. Each method is a
/// single outbound call with the static API key; failures propagate
/// untranslated and nothing is cached or retried.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get(&self, path: &str, extra: &[(&str, String)]) -> Result<Page, reqwest::Error> {
        let mut query = vec![("api_key", self.api_key.clone())];
        query.extend(extra.iter().cloned());
        self.http
            .get(format!("{}{}", self.base_url, path))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Page>()
            .await
    }

    pub async fn trending(&self) -> Result<Page, reqwest::Error> {
        self.get("/trending/movie/week", &[]).await
    }

    pub async fn top_rated(&self) -> Result<Page, reqwest::Error> {
        self.get("/movie/top_rated", &[]).await
    }

    pub async fn discover(&self, genre: Genre) -> Result<Page, reqwest::Error> {
        self.get(
            "/discover/movie",
            &[("with_genres", genre.id().to_string())],
        )
        .await
    }

    pub async fn netflix_originals(&self) -> Result<Page, reqwest::Error> {
        self.get(
            "/discover/movie",
            &[("with_networks", NETFLIX_NETWORK_ID.to_string())],
        )
        .await
    }
}
