//! OCC endpoint URL builder
//!
//! URLs are `{base_url}{prefix}{base_site}/{template}` where the template
//! comes from [`OccConfig`]. `${name}` placeholders are replaced with
//! percent-encoded url params; query pairs from the template are merged with
//! the explicit query params (explicit params win).

use crate::config::OccConfig;
use crate::error::EndpointError;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Parameters for [`OccEndpoints::build_url`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildUrlOptions {
    /// Values for `${name}` placeholders
    pub url_params: BTreeMap<String, String>,
    /// Query pairs, appended in order
    pub query_params: Vec<(String, String)>,
}

impl BuildUrlOptions {
    /// Empty options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a placeholder value
    #[inline]
    #[must_use]
    pub fn url_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.url_params.insert(name.into(), value.into());
        self
    }

    /// With query pairs
    #[inline]
    #[must_use]
    pub fn query_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query_params.extend(params);
        self
    }
}

/// Builds OCC URLs from named endpoint templates
#[derive(Debug, Clone)]
pub struct OccEndpoints {
    config: Arc<OccConfig>,
}

impl OccEndpoints {
    /// Builder over a configuration
    #[inline]
    #[must_use]
    pub fn new(config: OccConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Underlying configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OccConfig {
        &self.config
    }

    /// Base URL every endpoint is resolved against
    ///
    /// # Errors
    /// - `EndpointError::InvalidUrl` if `base_url` does not parse
    /// - `EndpointError::CannotBeABase` if it cannot carry a path
    pub fn base_url(&self) -> Result<Url, EndpointError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|source| EndpointError::InvalidUrl {
            url: self.config.base_url.clone(),
            source,
        })?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| EndpointError::CannotBeABase(self.config.base_url.clone()))?;
            segments.pop_if_empty();
            segments.extend(self.config.prefix.split('/').filter(|s| !s.is_empty()));
            if !self.config.base_site.is_empty() {
                segments.push(&self.config.base_site);
            }
        }
        Ok(url)
    }

    /// Build the URL of a named endpoint
    ///
    /// # Errors
    /// - `EndpointError::UnknownEndpoint` if no template has this name
    /// - `EndpointError::UnresolvedParam` if a placeholder has no value
    /// - base URL errors, see [`Self::base_url`]
    pub fn build_url(&self, endpoint: &str, options: &BuildUrlOptions) -> Result<Url, EndpointError> {
        let template = self
            .config
            .endpoint_template(endpoint)
            .ok_or_else(|| EndpointError::UnknownEndpoint(endpoint.to_string()))?;
        let (path_template, template_query) = match template.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (template, None),
        };

        let mut url = self.base_url()?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| EndpointError::CannotBeABase(self.config.base_url.clone()))?;
            for segment in path_template.split('/').filter(|s| !s.is_empty()) {
                segments.push(&fill_placeholders(endpoint, segment, &options.url_params)?);
            }
        }

        let mut query: Vec<(String, String)> = template_query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        for (key, value) in &options.query_params {
            match query.iter_mut().find(|(existing, _)| existing == key) {
                Some(pair) => pair.1.clone_from(value),
                None => query.push((key.clone(), value.clone())),
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        tracing::trace!(endpoint, url = %url, "Built OCC url");
        Ok(url)
    }
}

fn fill_placeholders(
    endpoint: &str,
    segment: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, EndpointError> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        let value = params.get(name).ok_or_else(|| EndpointError::UnresolvedParam {
            endpoint: endpoint.to_string(),
            param: name.to_string(),
        })?;
        out.push_str(&rest[..start]);
        out.push_str(value);
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn endpoints() -> OccEndpoints {
        OccEndpoints::new(OccConfig::new().with_base_url("https://api.example.com"))
    }

    #[test]
    fn base_url_includes_prefix_and_site() {
        assert_eq!(
            endpoints().base_url().unwrap().as_str(),
            "https://api.example.com/occ/v2/electronics-spa"
        );
    }

    #[test]
    fn build_url_fills_placeholders() {
        let url = endpoints()
            .build_url("page", &BuildUrlOptions::new().url_param("id", "homepage"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/occ/v2/electronics-spa/cms/pages/homepage");
    }

    #[test]
    fn placeholder_values_are_percent_encoded() {
        let url = endpoints()
            .build_url(
                "userPage",
                &BuildUrlOptions::new()
                    .url_param("id", "/my page")
                    .url_param("userId", "current"),
            )
            .unwrap();
        assert_eq!(
            url.path(),
            "/occ/v2/electronics-spa/users/current/cms/pages/%2Fmy%20page"
        );
    }

    #[test]
    fn query_params_are_appended() {
        let url = endpoints()
            .build_url(
                "pages",
                &BuildUrlOptions::new().query_params(vec![
                    ("pageType".to_string(), "ContentPage".to_string()),
                    ("pageLabelOrId".to_string(), "/faq".to_string()),
                ]),
            )
            .unwrap();
        assert_eq!(url.query(), Some("pageType=ContentPage&pageLabelOrId=%2Ffaq"));
    }

    #[test]
    fn template_query_merges_with_explicit_params() {
        let endpoints = OccEndpoints::new(
            OccConfig::new().with_endpoint("pages", "cms/pages?fields=DEFAULT&lang=en"),
        );
        let url = endpoints
            .build_url(
                "pages",
                &BuildUrlOptions::new().query_params(vec![
                    ("lang".to_string(), "de".to_string()),
                    ("code".to_string(), "1234".to_string()),
                ]),
            )
            .unwrap();
        assert_eq!(url.query(), Some("fields=DEFAULT&lang=de&code=1234"));
    }

    #[test]
    fn missing_placeholder_is_error() {
        let err = endpoints().build_url("page", &BuildUrlOptions::new()).unwrap_err();
        assert!(matches!(err, EndpointError::UnresolvedParam { ref param, .. } if param == "id"));
    }

    #[test]
    fn unknown_endpoint_is_error() {
        let err = endpoints().build_url("nope", &BuildUrlOptions::new()).unwrap_err();
        assert!(matches!(err, EndpointError::UnknownEndpoint(_)));
    }

    #[test]
    fn invalid_base_url_is_error() {
        let endpoints = OccEndpoints::new(OccConfig::new().with_base_url("not a url"));
        assert!(matches!(
            endpoints.base_url().unwrap_err(),
            EndpointError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn base_url_with_trailing_slash() {
        let endpoints = OccEndpoints::new(OccConfig::new().with_base_url("https://api.example.com/"));
        let url = endpoints
            .build_url("pages", &BuildUrlOptions::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/occ/v2/electronics-spa/cms/pages");
    }
}
