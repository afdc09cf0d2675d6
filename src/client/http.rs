use std::fmt::Display;

use curl::easy::{Easy, List};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    client::forms::MultipartUpload,
    errors::{HttpError, SyncError, SyncResult},
    logvbln,
};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A request target: URL, query parameters and extra headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    base: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl Endpoint {
    pub fn of(base: &str) -> Self {
        Self {
            base: base.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Appends `segments` below the current path.
    pub fn path(mut self, segments: &[&str]) -> Self {
        if !self.base.ends_with('/') {
            self.base.push('/');
        }
        self.base.push_str(&segments.join("/"));
        self
    }

    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        self.query.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.base.clone();
        }

        let query: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        format!("{}?{}", self.base, query.join("&"))
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Status, header lines and body of one exchange.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u32,
    pub headers: Vec<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim())
            } else {
                None
            }
        })
    }

    /// Parses a successful response as JSON. Blank bodies read as an empty object.
    pub fn json<R: DeserializeOwned>(&self) -> SyncResult<R> {
        if !self.is_success() {
            return Err(HttpError::from_response(self.status, &self.body).into());
        }

        let body = if self.body.trim().is_empty() {
            "{}"
        } else {
            self.body.as_str()
        };

        serde_json::from_str(body)
            .map_err(|e| SyncError::upstream(&format!("Unable to deserialize body: {}", e)))
    }
}

/// Runs the request already configured on `handle`, collecting the response.
pub fn perform(handle: &mut Easy) -> SyncResult<RawResponse> {
    let mut body = Vec::new();
    let mut headers = Vec::new();

    {
        let mut transfer = handle.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.header_function(|line| {
            headers.push(String::from_utf8_lossy(line).trim_end().to_string());
            true
        })?;
        transfer.perform()?;
    }

    Ok(RawResponse {
        status: handle.response_code()?,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Blocking JSON client. Every call uses a fresh handle, so nothing leaks between requests.
pub struct ObjectHttpClient;

impl ObjectHttpClient {
    const CC: &'static str = "HttpClient";

    pub fn get<R: DeserializeOwned>(endpoint: &Endpoint) -> SyncResult<R> {
        let mut handle = ObjectHttpClient::handle(endpoint, Some(JSON_CONTENT_TYPE))?;
        handle.get(true)?;

        ObjectHttpClient::send(endpoint, &mut handle)?.json()
    }

    /// POSTs `request` as JSON, or an empty body when there is none.
    pub fn post<Q: Serialize, R: DeserializeOwned>(
        endpoint: &Endpoint,
        request: Option<&Q>,
    ) -> SyncResult<R> {
        let body = match request {
            Some(request) => serde_json::to_vec(request).map_err(|e| {
                SyncError::upstream(&format!("Unable to serialize request body: {}", e))
            })?,
            None => Vec::new(),
        };

        let mut handle = ObjectHttpClient::handle(endpoint, Some(JSON_CONTENT_TYPE))?;
        handle.post(true)?;
        handle.post_fields_copy(&body)?;

        ObjectHttpClient::send(endpoint, &mut handle)?.json()
    }

    pub fn upload<R: DeserializeOwned>(
        endpoint: &Endpoint,
        filename: &str,
        file_content: &str,
    ) -> SyncResult<R> {
        let upload = MultipartUpload::of(filename, file_content);

        let mut handle = ObjectHttpClient::handle(endpoint, Some(&upload.content_type()))?;
        handle.post(true)?;
        handle.post_fields_copy(upload.content.as_bytes())?;

        ObjectHttpClient::send(endpoint, &mut handle)?.json()
    }

    fn handle(endpoint: &Endpoint, content_type: Option<&str>) -> SyncResult<Easy> {
        let mut handle = Easy::new();
        handle.url(&endpoint.url())?;

        let mut list = List::new();
        list.append("Accept: application/json")?;
        if let Some(content_type) = content_type {
            list.append(&format!("Content-Type: {}", content_type))?;
        }
        for (name, value) in endpoint.headers() {
            list.append(&format!("{}: {}", name, value))?;
        }
        handle.http_headers(list)?;

        Ok(handle)
    }

    fn send(endpoint: &Endpoint, handle: &mut Easy) -> SyncResult<RawResponse> {
        let response = perform(handle)?;
        logvbln!("{} -> {}", endpoint.base, response.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_path_and_escapes_query() {
        let endpoint = Endpoint::of("https://connect.garmin.com/modern/")
            .path(&["proxy", "gear-service", "gear", "filterGear"])
            .query("availableGearDate", "2021-03-01")
            .query("name", "Bike & Co")
            .header("nk", "NT");

        assert_eq!(
            endpoint.url(),
            "https://connect.garmin.com/modern/proxy/gear-service/gear/filterGear\
             ?availableGearDate=2021-03-01&name=Bike%20%26%20Co"
        );
        assert_eq!(endpoint.headers(), &[("nk".to_string(), "NT".to_string())]);
    }

    #[test]
    fn path_adds_missing_separator() {
        let endpoint = Endpoint::of("https://api.onepeloton.com").path(&["auth", "login"]);

        assert_eq!(endpoint.url(), "https://api.onepeloton.com/auth/login");
    }

    #[test]
    fn blank_success_body_reads_as_empty_object() {
        let response = RawResponse {
            status: 204,
            headers: vec![],
            body: "  ".to_string(),
        };

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn failed_status_keeps_body() {
        let response = RawResponse {
            status: 401,
            headers: vec![],
            body: "{\"status\":\"unauthorized\"}".to_string(),
        };

        let error = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(
            error,
            SyncError::Upstream(HttpError { status: 401, .. })
        ));
    }

    #[test]
    fn headers_are_case_insensitive() {
        let response = RawResponse {
            status: 302,
            headers: vec![
                "HTTP/1.1 302 Found".to_string(),
                "location: https://connect.garmin.com/modern/".to_string(),
            ],
            body: String::new(),
        };

        assert_eq!(
            response.header("Location"),
            Some("https://connect.garmin.com/modern/")
        );
        assert_eq!(response.header("Set-Cookie"), None);
    }
}
