//! Mock catalog site shared by the integration tests

use catalog_sweep::config::{parse_config, Config};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn slug(name: &str) -> String {
    name.to_lowercase()
}

pub fn listing_path(brand: &str, page: usize) -> String {
    if page <= 1 {
        format!("/devices/{}", slug(brand))
    } else {
        format!("/devices/{}/page/{}", slug(brand), page)
    }
}

pub fn detail_path(brand: &str, model: &str) -> String {
    format!("/devices/{}/{}", slug(brand), slug(model))
}

pub fn detail_title(brand: &str, model: &str) -> String {
    format!("{} {}", brand, model)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

pub async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Answers `status` on every request for `at`, expecting exactly `times` hits
pub async fn mount_failure(server: &MockServer, at: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_catalog(server: &MockServer, brands: &[&str]) {
    let links: String = brands
        .iter()
        .map(|b| format!(r#"<li><a href="{}">{}</a></li>"#, listing_path(b, 1), b))
        .collect();
    let body = format!(
        r#"<html><body>
        <div class="manufacturer-group"><h2>A-Z</h2><ul>{}</ul></div>
        </body></html>"#,
        links
    );
    mount_html(server, "/devices/", body).await;
}

/// Mounts a brand whose listing spans `pages`, plus a detail page per model
pub async fn mount_brand(server: &MockServer, brand: &str, pages: &[&[&str]]) {
    for (index, models) in pages.iter().enumerate() {
        let page = index + 1;
        let links: String = models
            .iter()
            .map(|m| format!(r#"<p><a href="{}">{}</a></p>"#, detail_path(brand, m), m))
            .collect();
        let pager = if page < pages.len() {
            format!(
                r#"<a href="{}" title="Previous">◄</a><a href="{}" title="Next">►</a>"#,
                listing_path(brand, page.saturating_sub(1)),
                listing_path(brand, page + 1)
            )
        } else {
            r##"<a href="/devices/" title="Previous">◄</a><a href="#">►</a>"##.to_string()
        };
        let body = format!(
            r#"<html><body>
            <div id="vendor-browser-container"><div>{}</div></div>
            <div class="nav-pages">{}</div>
            </body></html>"#,
            links, pager
        );
        mount_html(server, &listing_path(brand, page), body).await;

        for model in models.iter() {
            let body = format!(
                r#"<html><body><div id="product-data">
                <h1 class="device-title">{}</h1>
                </div></body></html>"#,
                detail_title(brand, model)
            );
            mount_html(server, &detail_path(brand, model), body).await;
        }
    }
}

/// Parses a config pointing at `server` and writing under `dir`
pub fn test_config(server: &MockServer, dir: &Path, brands_per_batch: usize) -> Config {
    let toml = format!(
        r#"
[source]
base-url = "{}"
catalog-path = "/devices/"
request-timeout-ms = 2000
accept-language = "en-GB"

[crawler]
brand-workers = 2
device-workers = 3
brands-per-batch = {}

[retry]
max-attempts = 2
base-delay-ms = 1
user-agents = ["ua-1", "ua-2"]

[output]
checkpoint-dir = '{}'
"#,
        server.uri(),
        brands_per_batch,
        dir.display()
    );
    parse_config(&toml).expect("test config must be valid")
}
