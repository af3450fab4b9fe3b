use reqwest::{Client, Request};
use url::Url;

use super::error::OmdbError;
use super::types::{OmdbDetailResponse, OmdbSearchResponse};
use crate::traits::{MovieDetail, MovieService, SearchPage};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb HTTP client.
///
/// Both endpoints share one base URL and differ only in query parameters:
/// `?s=<query>&page=<n>` for search, `?i=<id>` for detail.
#[derive(Clone)]
pub struct OmdbClient {
    api_key: String,
    base_url: Url,
    http: Client,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, OmdbError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: Url::parse(base_url)?,
            http: Client::new(),
        })
    }

    /// Build the search request without sending it.
    pub fn search_request(&self, query: &str, page: u32) -> Result<Request, OmdbError> {
        let page = page.max(1).to_string();
        Ok(self
            .http
            .get(self.base_url.clone())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("page", page.as_str()),
            ])
            .build()?)
    }

    /// Build the detail request without sending it.
    pub fn detail_request(&self, id: &str) -> Result<Request, OmdbError> {
        Ok(self
            .http
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str()), ("i", id)])
            .build()?)
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, OmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(OmdbError::Api {
                status,
                message: body,
            })
        }
    }
}

impl MovieService for OmdbClient {
    type Error = OmdbError;

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, OmdbError> {
        let req = self.search_request(query, page)?;
        tracing::debug!(query, page, "omdb search");

        let resp = Self::check_response(self.http.execute(req).await?).await?;
        let body: OmdbSearchResponse = resp
            .json()
            .await
            .map_err(|e| OmdbError::Parse(e.to_string()))?;

        if let Some(message) = body.failure() {
            return Err(OmdbError::NotFound(message));
        }
        Ok(body.into_page())
    }

    async fn movie_detail(&self, id: &str) -> Result<MovieDetail, OmdbError> {
        let req = self.detail_request(id)?;
        tracing::debug!(id, "omdb detail");

        let resp = Self::check_response(self.http.execute(req).await?).await?;
        let body: OmdbDetailResponse = resp
            .json()
            .await
            .map_err(|e| OmdbError::Parse(e.to_string()))?;

        if let Some(message) = body.failure() {
            return Err(OmdbError::NotFound(message));
        }
        Ok(body.into_detail(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_pairs(req: &Request) -> Vec<(String, String)> {
        req.url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_search_request_params() {
        let client = OmdbClient::new("k3y", DEFAULT_BASE_URL).unwrap();
        let req = client.search_request("the matrix", 3).unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().host_str(), Some("www.omdbapi.com"));
        assert_eq!(
            query_pairs(&req),
            vec![
                ("apikey".to_string(), "k3y".to_string()),
                ("s".to_string(), "the matrix".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_request_page_floor() {
        let client = OmdbClient::new("k3y", DEFAULT_BASE_URL).unwrap();
        let req = client.search_request("alien", 0).unwrap();
        assert!(query_pairs(&req).contains(&("page".to_string(), "1".to_string())));
    }

    #[test]
    fn test_detail_request_params() {
        let client = OmdbClient::new("k3y", "http://localhost:8080/api").unwrap();
        let req = client.detail_request("tt1375666").unwrap();

        assert_eq!(req.url().path(), "/api");
        assert_eq!(
            query_pairs(&req),
            vec![
                ("apikey".to_string(), "k3y".to_string()),
                ("i".to_string(), "tt1375666".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            OmdbClient::new("k3y", "not a url"),
            Err(OmdbError::BaseUrl(_))
        ));
    }

    /// Answer exactly one HTTP request with `status` and a JSON `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let base = serve_once(
            "200 OK",
            r#"{"Search":[{"Title":"Inception","Year":"2010","imdbID":"tt1375666","Type":"movie","Poster":"N/A"}],"totalResults":"1","Response":"True"}"#,
        )
        .await;
        let client = OmdbClient::new("k3y", &base).unwrap();

        let page = client.search("inception", 1).await.unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(page.results[0].id, "tt1375666");
        assert!(page.results[0].poster_url.is_none());
    }

    #[tokio::test]
    async fn test_failure_payload_becomes_not_found() {
        let base = serve_once("200 OK", r#"{"Response":"False","Error":"Movie not found!"}"#).await;
        let client = OmdbClient::new("k3y", &base).unwrap();

        let err = client.search("zzzzzz", 1).await.unwrap_err();
        assert!(matches!(&err, OmdbError::NotFound(m) if m == "Movie not found!"));
        assert_eq!(err.to_string(), "Movie not found!");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = serve_once("401 Unauthorized", r#"{"Response":"False","Error":"Invalid API key!"}"#).await;
        let client = OmdbClient::new("bad", &base).unwrap();

        let err = client.movie_detail("tt1375666").await.unwrap_err();
        assert!(matches!(err, OmdbError::Api { status: 401, .. }));
    }
}
