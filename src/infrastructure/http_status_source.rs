// HTTP status source - Reaches the FHEM server with optional basic auth
use crate::application::status_source::{ServerStatus, StatusSource};
use crate::domain::settings::{BasicAuth, ServerSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: Url,
    auth: Option<BasicAuth>,
}

impl HttpStatusSource {
    pub fn new(server: &ServerSettings, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: server.url()?,
            auth: server.credentials(),
        })
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let request = self.client.get(self.url.clone());
        match &self.auth {
            Some(auth) => request.basic_auth(&auth.username, Some(&auth.password)),
            None => request,
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<ServerStatus> {
        let started = Instant::now();
        let response = self
            .request()
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        let http_status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .context("Failed to read status server response")?;

        Ok(ServerStatus {
            http_status,
            body_len: body.len(),
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_basic_auth_header_when_user_set() {
        let source = HttpStatusSource::new(&ServerSettings::default(), "test").unwrap();
        let request = source.request().build().unwrap();
        assert_eq!(request.url().as_str(), "http://192.168.1.1:8083/fhem");
        // base64("Username:Password")
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Basic VXNlcm5hbWU6UGFzc3dvcmQ="
        );
    }

    #[test]
    fn test_no_auth_header_without_user() {
        let server = ServerSettings {
            username: String::new(),
            ..ServerSettings::default()
        };
        let source = HttpStatusSource::new(&server, "test").unwrap();
        let request = source.request().build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let server = ServerSettings {
            base_url: "http://192.168.1.1/fhem".to_string(),
            ..ServerSettings::default()
        };
        assert!(HttpStatusSource::new(&server, "test").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Nothing listens on the loopback discard port
        let server = ServerSettings {
            base_url: "http://127.0.0.1:9/fhem".to_string(),
            username: String::new(),
            password: String::new(),
        };
        let source = HttpStatusSource::new(&server, "test").unwrap();
        assert!(source.fetch_status().await.is_err());
    }
}
