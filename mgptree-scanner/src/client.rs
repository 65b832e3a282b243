use crate::error::{FetchError, Result};
use crate::fetcher::Fetcher;
use crate::page::{extract_profile, extract_search_results};
use crate::record::{PersonId, PersonName, PersonProfile};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.mathgenealogy.org/";

/// HTTP client for the Mathematics Genealogy Project.
pub struct GenealogyClient {
    client: Client,
    base_url: Url,
}

impl GenealogyClient {
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_options(base_url, 10, false)
    }

    /// The project's certificate chain has a history of failing validation,
    /// so `accept_invalid_certs` lets the caller opt out of verification.
    pub fn with_options(mut base_url: Url, timeout_secs: u64, accept_invalid_certs: bool) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("mgptree/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn get_text(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Fetcher for GenealogyClient {
    async fn resolve(&self, name: &PersonName) -> Result<PersonId> {
        info!(
            "Searching for primary key. last={}, first={}, middle={}",
            name.last,
            name.first,
            name.middle.as_deref().unwrap_or("")
        );

        let url = self.endpoint("query-prep.php")?;
        let form = [
            ("given_name", name.first.as_str()),
            ("family_name", name.last.as_str()),
            ("other_names", name.middle.as_deref().unwrap_or("")),
        ];
        let body = self.get_text(self.client.post(url.clone()).form(&form), &url).await?;

        let mut ids: Vec<PersonId> = Vec::new();
        for (id, text) in extract_search_results(&body)? {
            match PersonName::parse(&text) {
                Ok(candidate) if candidate.matches(name) => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                Ok(_) => {}
                Err(e) => debug!("Ignoring search row {} ({}): {}", id, text, e),
            }
        }

        match ids.as_slice() {
            [] => Err(FetchError::UnknownName(name.to_string())),
            [id] => {
                info!("Found id {} for {}", id, name);
                Ok(*id)
            }
            _ => {
                warn!("Found {} ids for {}: {:?}", ids.len(), name, ids);
                Err(FetchError::AmbiguousName {
                    name: name.to_string(),
                    count: ids.len(),
                })
            }
        }
    }

    async fn fetch(&self, id: PersonId) -> Result<PersonProfile> {
        let mut url = self.endpoint("id.php")?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        debug!("Fetching {}", url);

        let body = self.get_text(self.client.get(url.clone()), &url).await?;
        let profile = extract_profile(id, &body)?;

        info!(
            "Recovered record: {} {} {} {}",
            profile.name.label(),
            profile.title.as_deref().unwrap_or(""),
            profile.institution.as_deref().unwrap_or(""),
            profile.year.as_deref().unwrap_or("")
        );
        Ok(profile)
    }
}
