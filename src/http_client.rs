use crate::app_config::AppConfig;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, InvalidHeaderValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("unable to build the HTTP client: {0}")]
    Build(#[from] reqwest::Error),
    #[error("invalid user agent: {0}")]
    InvalidUserAgent(#[from] InvalidHeaderValue),
}

/// Client shared by the geocoder and the arrival message provider. Nominatim refuses requests without a user agent.
pub fn new_client(config: &AppConfig) -> Result<Client, HttpClientError> {
    let geocoder = config.geocoder();
    let user_agent = HeaderValue::from_str(geocoder.user_agent())?;
    let headers = HeaderMap::from_iter([(ACCEPT, HeaderValue::from_static("application/json"))]);

    Ok(Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(geocoder.request_timeout())
        .build()?)
}
