use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use super::prompts::PromptItem;
use super::types::{decode_data_url, truncate, ChatRequest, ChatResponse, ImageRef, ModelInfo, ModelList};
use crate::config::ApiConfig;
use crate::error::{ApiError, CompositorError, Result};

/// Blocking client for the model-listing and image-generation endpoints.
///
/// Requests are sent one at a time and never retried; a failing model is
/// simply skipped in favour of the next one in the fallback list.
pub struct ModelApiClient {
    http: Client,
    base_url: String,
    referer: String,
    api_key: String,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl ModelApiClient {
    pub fn new<K: Into<String>>(api_key: K, config: &ApiConfig) -> Result<Self> {
        let http = Client::builder().build().map_err(ApiError::from)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
        })
    }

    /// Build a client with the credential read from `config.api_key_env`.
    pub fn from_env(config: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::MissingCredential {
                var: config.api_key_env.clone(),
            })?;
        Self::new(api_key, config)
    }

    /// List every model the endpoint advertises.
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .timeout(self.request_timeout)
            .send()
            .map_err(ApiError::from)?;

        let response = ensure_success(response)?;
        let list: ModelList = response.json().map_err(ApiError::from)?;
        info!("{} models listed", list.data.len());
        Ok(list.data)
    }

    /// Ask `model` to draw `prompt` and return the bytes of the first image it yields.
    pub fn generate_image(&self, prompt: &str, model: &str) -> Result<Vec<u8>> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("Generating with {}: {}...", model, truncate(prompt, 70));

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &self.referer)
            .timeout(self.request_timeout)
            .json(&ChatRequest::image_prompt(model, prompt))
            .send()
            .map_err(ApiError::from)?;

        let body = ensure_success(response)?.text().map_err(ApiError::from)?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| ApiError::InvalidPayload {
            reason: e.to_string(),
        })?;

        for image_ref in parsed.image_refs() {
            match image_ref {
                ImageRef::DataUrl(data_url) => return Ok(decode_data_url(&data_url)?),
                ImageRef::Remote(remote) => match self.download(&remote) {
                    Ok(bytes) => return Ok(bytes),
                    Err(e) => warn!("Download of {} failed: {}", remote, e),
                },
            }
        }

        debug!("Response without image: {}", truncate(&body, 700));
        Err(ApiError::NoImage {
            model: model.to_string(),
        }
        .into())
    }

    /// Try each model in order and write the first image produced to `output`.
    ///
    /// Returns the model that succeeded, or `None` if every model failed.
    pub fn generate_with_fallback(
        &self,
        prompt: &str,
        models: &[String],
        output: &Path,
    ) -> Result<Option<String>> {
        for model in models {
            match self.generate_image(prompt, model) {
                Ok(bytes) => {
                    std::fs::write(output, &bytes)?;
                    info!("Saved generated image: {:?} ({} bytes)", output, bytes.len());
                    return Ok(Some(model.clone()));
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Failed with {}, trying next: {}", model, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Run every prompt sequentially into `out_dir`. Returns how many succeeded.
    pub fn run_prompts(&self, prompts: &[PromptItem], models: &[String], out_dir: &Path) -> Result<usize> {
        if models.is_empty() {
            return Err(CompositorError::generic("no image models configured"));
        }
        std::fs::create_dir_all(out_dir)?;

        let mut succeeded = 0;
        for item in prompts {
            let output = out_dir.join(&item.filename);
            info!("Generating {}", item.filename);
            if self.generate_with_fallback(&item.prompt, models, &output)?.is_some() {
                succeeded += 1;
            } else {
                warn!("No model produced {}", item.filename);
            }
        }

        info!("Complete: {}/{} images generated", succeeded, prompts.len());
        Ok(succeeded)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .map_err(ApiError::from)?;
        let bytes = ensure_success(response)?.bytes().map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }
}

/// Models whose id contains any of `keywords`, case-insensitively.
pub fn filter_image_models<'a>(models: &'a [ModelInfo], keywords: &[String]) -> Vec<&'a ModelInfo> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    models
        .iter()
        .filter(|model| {
            let id = model.id.to_lowercase();
            keywords.iter().any(|k| id.contains(k.as_str()))
        })
        .collect()
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body: truncate(&body, 300),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            name: None,
            pricing: None,
        }
    }

    #[test]
    fn test_filter_image_models() {
        let models = vec![
            model("google/gemini-2.5-flash-IMAGE"),
            model("openai/gpt-4o"),
            model("black-forest-labs/FLUX.1-pro"),
            model("stabilityai/sdxl"),
        ];
        let keywords = crate::config::ApiConfig::default().image_keywords;

        let ids: Vec<&str> = filter_image_models(&models, &keywords)
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["google/gemini-2.5-flash-IMAGE", "black-forest-labs/FLUX.1-pro", "stabilityai/sdxl"]
        );
    }

    #[test]
    fn test_missing_credential() {
        let config = ApiConfig {
            api_key_env: "BRAND_COMPOSITOR_TEST_UNSET_KEY".to_string(),
            ..ApiConfig::default()
        };
        let err = ModelApiClient::from_env(&config).err().unwrap();
        assert!(matches!(err, CompositorError::Api(ApiError::MissingCredential { .. })));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://example.test/api/v1/".to_string(),
            ..ApiConfig::default()
        };
        let client = ModelApiClient::new("key", &config).unwrap();
        assert_eq!(client.base_url, "https://example.test/api/v1");
        assert_eq!(client.bearer(), "Bearer key");
    }

    #[test]
    fn test_unreachable_endpoint_is_recoverable() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..ApiConfig::default()
        };
        let client = ModelApiClient::new("key", &config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        let outcome = client
            .generate_with_fallback("a trophy", &config.models, &output)
            .unwrap();
        assert!(outcome.is_none());
        assert!(!output.exists());
    }

    #[test]
    fn test_run_prompts_requires_models() {
        let client = ModelApiClient::new("key", &ApiConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("images");

        let err = client
            .run_prompts(&crate::api::default_prompts(), &[], &out_dir)
            .unwrap_err();
        assert!(matches!(err, CompositorError::Generic(_)));
        assert!(!out_dir.exists());
    }
}
