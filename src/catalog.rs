//! Driver catalog lookup.
//!
//! The vendor's driver-lookup endpoint answers a product/OS query with an
//! HTML fragment containing a results table, or with the bare URL of a
//! results page holding that table. The first row carries the latest
//! version and a relative link to its download page.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{DriverCheckError, Result};
use crate::platform::PlatformProfile;

/// Language id sent with every query (English, US).
pub const LANGUAGE_ID: u32 = 1;

static VERSION_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td#tdVersion").expect("valid version cell selector"));
static DOWNLOAD_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a#lnkDwnldBtn").expect("valid download button selector"));

/// Desktop or notebook variant of a graphics card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

/// Product identifiers the catalog expects for a device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceClassParams {
    /// `psid`
    pub product_series_id: u32,
    /// `pfid`
    pub product_family_id: u32,
}

/// Device name test for one row of the class table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatcher {
    /// The name contains the substring anywhere.
    Contains(&'static str),
}

impl NameMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Contains(needle) => name.contains(needle),
        }
    }
}

/// Device class rows, evaluated top to bottom; no match means desktop.
///
/// Any name containing a capital `M` counts as mobile, so a desktop model
/// with an `M` in its name is misclassified.
pub const DEVICE_CLASS_TABLE: &[(NameMatcher, DeviceClass)] =
    &[(NameMatcher::Contains("M"), DeviceClass::Mobile)];

impl DeviceClass {
    /// Classify a device by its display name.
    pub fn from_device_name(name: &str) -> Self {
        DEVICE_CLASS_TABLE
            .iter()
            .find(|(matcher, _)| matcher.matches(name))
            .map(|(_, class)| *class)
            .unwrap_or(Self::Desktop)
    }

    pub fn params(&self) -> DeviceClassParams {
        match self {
            Self::Desktop => DeviceClassParams {
                product_series_id: 98,
                product_family_id: 756,
            },
            Self::Mobile => DeviceClassParams {
                product_series_id: 99,
                product_family_id: 758,
            },
        }
    }
}

/// Latest release listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRelease {
    /// Version cell text, e.g. `528.02 WHQL`.
    pub version_text: String,
    /// Absolute URL of the download page.
    pub download_url: String,
}

/// Build the query string for a lookup.
pub fn query_string(params: &DeviceClassParams, profile: &PlatformProfile) -> String {
    format!(
        "psid={}&pfid={}&rpf=1&osid={}&lid={}&dtcid={}&ctk=0",
        params.product_series_id,
        params.product_family_id,
        profile.os_code,
        LANGUAGE_ID,
        profile.branch_flag
    )
}

/// Extract the first release from a catalog page.
///
/// Relative download links are resolved against `origin`.
pub fn parse_catalog_page(body: &str, origin: &str) -> Result<RemoteRelease> {
    let document = Html::parse_document(body);

    let version_text = document
        .select(&VERSION_CELL)
        .next()
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| DriverCheckError::MalformedCatalogResponse {
            message: "no version cell (td#tdVersion) in response".to_string(),
        })?;

    let button = document.select(&DOWNLOAD_BUTTON).next().ok_or_else(|| {
        DriverCheckError::MalformedCatalogResponse {
            message: "no download button (a#lnkDwnldBtn) in response".to_string(),
        }
    })?;

    let href = button
        .value()
        .attr("href")
        .ok_or_else(|| DriverCheckError::MalformedCatalogResponse {
            message: "download button has no href".to_string(),
        })?;

    Ok(RemoteRelease {
        version_text,
        download_url: absolute_url(origin, href),
    })
}

fn absolute_url(origin: &str, href: &str) -> String {
    if href.starts_with("https://") || href.starts_with("http://") {
        return href.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

/// URL of the results page, when the lookup answers with one instead of
/// the results themselves.
///
/// Scheme-relative URLs take the scheme of `origin`.
pub fn results_page_url(body: &str, origin: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() || body.contains('<') || body.contains(char::is_whitespace) {
        return None;
    }

    if body.starts_with("https://") || body.starts_with("http://") {
        Some(body.to_string())
    } else if let Some(rest) = body.strip_prefix("//") {
        let scheme = origin.split_once("://").map_or("https", |(scheme, _)| scheme);
        Some(format!("{}://{}", scheme, rest))
    } else {
        None
    }
}

/// Source of the latest published release.
pub trait ReleaseCatalog {
    /// Look up the latest release for a device on this platform.
    fn latest_release(&self, device_name: &str, profile: &PlatformProfile)
        -> Result<RemoteRelease>;
}

/// Queries the vendor's driver-lookup endpoint over HTTP.
pub struct CatalogClient {
    client: Client,
    origin: String,
    endpoint: String,
}

impl CatalogClient {
    /// Create a client for `origin` + `endpoint`.
    pub fn new(origin: &str, endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("drivercheck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    /// Create a client from the loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.origin, &settings.endpoint, settings.timeout())
    }

    /// Full lookup URL for a device class on a platform.
    pub fn lookup_url(&self, params: &DeviceClassParams, profile: &PlatformProfile) -> String {
        format!(
            "{}{}?{}",
            self.origin,
            self.endpoint,
            query_string(params, profile)
        )
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        let network_error = |message: String| DriverCheckError::NetworkError {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| network_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(network_error(format!("HTTP {}", response.status())));
        }

        response.text().map_err(|e| network_error(e.to_string()))
    }
}

impl ReleaseCatalog for CatalogClient {
    fn latest_release(
        &self,
        device_name: &str,
        profile: &PlatformProfile,
    ) -> Result<RemoteRelease> {
        let class = DeviceClass::from_device_name(device_name);
        let url = self.lookup_url(&class.params(), profile);
        debug!("Classified '{}' as {:?}; querying {}", device_name, class, url);

        let mut body = self.fetch_page(&url)?;
        if let Some(results_url) = results_page_url(&body, &self.origin) {
            debug!("Lookup answered with results page {}", results_url);
            body = self.fetch_page(&results_url)?;
        }
        let release = parse_catalog_page(&body, &self.origin)?;
        info!(
            "Catalog lists {} at {}",
            release.version_text, release.download_url
        );
        Ok(release)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::prelude::*;

    pub(crate) const ENDPOINT: &str = "/Download/processDriver.aspx";

    pub(crate) fn catalog_page(version: &str, href: &str) -> String {
        format!(
            r#"<table id="tblDriverResults">
  <tr><td class="gridItem">GeForce Game Ready Driver</td>
      <td class="gridItem" id="tdVersion">
        {}
      </td>
      <td class="gridItem">February 8, 2023</td>
      <td><a id="lnkDwnldBtn" href="{}"><img alt="Download"></a></td>
  </tr>
</table>"#,
            version, href
        )
    }

    fn profile() -> PlatformProfile {
        PlatformProfile {
            os_code: 57,
            arch_flag: 1,
            branch_flag: 1,
        }
    }

    #[test]
    fn mobile_name_uses_mobile_params() {
        let class = DeviceClass::from_device_name("NVIDIA GeForce RTX 3080M");
        assert_eq!(class, DeviceClass::Mobile);
        assert_eq!(class.params().product_series_id, 99);
        assert_eq!(class.params().product_family_id, 758);
    }

    #[test]
    fn desktop_name_uses_desktop_params() {
        let class = DeviceClass::from_device_name("NVIDIA GeForce RTX 3080");
        assert_eq!(class, DeviceClass::Desktop);
        assert_eq!(class.params().product_series_id, 98);
        assert_eq!(class.params().product_family_id, 756);
    }

    #[test]
    fn any_capital_m_counts_as_mobile() {
        assert_eq!(
            DeviceClass::from_device_name("NVIDIA GeForce MX450"),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::from_device_name("nvidia geforce gtx 1060 max-q"),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn query_string_layout() {
        let query = query_string(&DeviceClass::Desktop.params(), &profile());
        assert_eq!(query, "psid=98&pfid=756&rpf=1&osid=57&lid=1&dtcid=1&ctk=0");
    }

    #[test]
    fn parses_version_and_link() {
        let body = catalog_page("528.02 WHQL", "/download/driverResults.aspx/199657/en-us/");
        let release = parse_catalog_page(&body, "https://www.nvidia.com").unwrap();
        assert_eq!(release.version_text, "528.02 WHQL");
        assert_eq!(
            release.download_url,
            "https://www.nvidia.com/download/driverResults.aspx/199657/en-us/"
        );
    }

    #[test]
    fn takes_first_row_only() {
        let body = format!(
            "{}{}",
            catalog_page("531.18 WHQL", "/first"),
            catalog_page("528.49 WHQL", "/second")
        );
        let release = parse_catalog_page(&body, "https://www.nvidia.com/").unwrap();
        assert_eq!(release.version_text, "531.18 WHQL");
        assert_eq!(release.download_url, "https://www.nvidia.com/first");
    }

    #[test]
    fn absolute_href_is_kept() {
        let body = catalog_page("528.02", "https://us.download.nvidia.com/528.02.exe");
        let release = parse_catalog_page(&body, "https://www.nvidia.com").unwrap();
        assert_eq!(release.download_url, "https://us.download.nvidia.com/528.02.exe");
    }

    #[test]
    fn relative_href_without_slash_gets_one() {
        let body = catalog_page("528.02", "download/driverResults.aspx/199657/en-us/");
        let release = parse_catalog_page(&body, "https://www.nvidia.com").unwrap();
        assert_eq!(
            release.download_url,
            "https://www.nvidia.com/download/driverResults.aspx/199657/en-us/"
        );
    }

    #[test]
    fn results_page_url_detection() {
        let origin = "https://www.nvidia.com";
        let results = "https://www.nvidia.com/Download/driverResults.aspx/199657/en-us";

        assert_eq!(
            results_page_url(&format!("  {}\r\n", results), origin),
            Some(results.to_string())
        );
        assert_eq!(
            results_page_url("//www.nvidia.com/Download/x", "http://127.0.0.1:9000"),
            Some("http://www.nvidia.com/Download/x".to_string())
        );
        assert_eq!(results_page_url(&catalog_page("528.02", "/x"), origin), None);
        assert_eq!(results_page_url("No certified downloads were found", origin), None);
        assert_eq!(results_page_url("", origin), None);
    }

    #[test]
    fn missing_version_cell_is_malformed() {
        let body = r#"<a id="lnkDwnldBtn" href="/x">Download</a>"#;
        let err = parse_catalog_page(body, "https://www.nvidia.com").unwrap_err();
        assert!(matches!(err, DriverCheckError::MalformedCatalogResponse { .. }));
        assert!(err.to_string().contains("tdVersion"));
    }

    #[test]
    fn blank_version_cell_is_malformed() {
        let body = catalog_page("   ", "/x");
        let err = parse_catalog_page(&body, "https://www.nvidia.com").unwrap_err();
        assert!(matches!(err, DriverCheckError::MalformedCatalogResponse { .. }));
    }

    #[test]
    fn missing_download_button_is_malformed() {
        let body = r#"<table><tr><td id="tdVersion">528.02</td></tr></table>"#;
        let err = parse_catalog_page(body, "https://www.nvidia.com").unwrap_err();
        assert!(err.to_string().contains("lnkDwnldBtn"));
    }

    #[test]
    fn download_button_without_href_is_malformed() {
        let body = r#"<table><tr><td id="tdVersion">528.02</td></tr></table><a id="lnkDwnldBtn">x</a>"#;
        let err = parse_catalog_page(body, "https://www.nvidia.com").unwrap_err();
        assert!(err.to_string().contains("no href"));
    }

    #[test]
    fn default_settings_client() {
        let client = CatalogClient::from_settings(&Settings::default()).unwrap();
        assert_eq!(
            client.lookup_url(&DeviceClass::Mobile.params(), &profile()),
            "https://www.nvidia.com/Download/processDriver.aspx?psid=99&pfid=758&rpf=1&osid=57&lid=1&dtcid=1&ctk=0"
        );
    }

    // --- Mock HTTP tests ---

    #[test]
    fn latest_release_queries_desktop_params() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(ENDPOINT)
                .query_param("psid", "98")
                .query_param("pfid", "756")
                .query_param("rpf", "1")
                .query_param("osid", "57")
                .query_param("lid", "1")
                .query_param("dtcid", "1")
                .query_param("ctk", "0");
            then.status(200)
                .body(catalog_page("528.02 WHQL", "/download/driverResults.aspx/199657/en-us/"));
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        let release = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap();

        mock.assert();
        assert_eq!(release.version_text, "528.02 WHQL");
        assert_eq!(
            release.download_url,
            format!(
                "{}/download/driverResults.aspx/199657/en-us/",
                server.base_url()
            )
        );
    }

    #[test]
    fn latest_release_queries_mobile_params() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(ENDPOINT)
                .query_param("psid", "99")
                .query_param("pfid", "758");
            then.status(200).body(catalog_page("528.02", "/m"));
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        client
            .latest_release("NVIDIA GeForce RTX 3080M", &profile())
            .unwrap();

        mock.assert();
    }

    #[test]
    fn server_error_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(ENDPOINT);
            then.status(500).body("Internal Server Error");
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        let err = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap_err();

        assert!(matches!(err, DriverCheckError::NetworkError { .. }));
        assert!(err.to_string().contains("500"), "Error should mention 500: {}", err);
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let client =
            CatalogClient::new("http://127.0.0.1:1", ENDPOINT, Duration::from_secs(2)).unwrap();
        let err = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap_err();
        assert!(matches!(err, DriverCheckError::NetworkError { .. }));
    }

    #[test]
    fn empty_results_page_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(ENDPOINT);
            then.status(200).body("<html><body>No certified downloads were found</body></html>");
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        let err = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap_err();
        assert!(matches!(err, DriverCheckError::MalformedCatalogResponse { .. }));
    }

    #[test]
    fn follows_results_page_url() {
        let server = MockServer::start();
        let results_path = "/Download/driverResults.aspx/199657/en-us";
        let lookup = server.mock(|when, then| {
            when.method(GET).path(ENDPOINT).query_param("psid", "98");
            then.status(200).body(server.url(results_path));
        });
        let results = server.mock(|when, then| {
            when.method(GET).path(results_path);
            then.status(200)
                .body(catalog_page("528.02 WHQL", "/download/driverResults.aspx/199657/en-us/"));
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        let release = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap();

        lookup.assert();
        results.assert();
        assert_eq!(release.version_text, "528.02 WHQL");
        assert_eq!(
            release.download_url,
            format!(
                "{}/download/driverResults.aspx/199657/en-us/",
                server.base_url()
            )
        );
    }

    #[test]
    fn missing_results_page_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(ENDPOINT);
            then.status(200).body(server.url("/Download/driverResults.aspx/0/en-us"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/Download/driverResults.aspx/0/en-us");
            then.status(404);
        });

        let client = CatalogClient::new(&server.base_url(), ENDPOINT, Duration::from_secs(5))
            .unwrap();
        let err = client
            .latest_release("NVIDIA GeForce RTX 3080", &profile())
            .unwrap_err();

        match err {
            DriverCheckError::NetworkError { url, .. } => {
                assert!(url.ends_with("/Download/driverResults.aspx/0/en-us"));
            }
            other => panic!("Expected NetworkError, got {:?}", other),
        }
    }
}
