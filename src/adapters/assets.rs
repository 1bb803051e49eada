//! Embedded web UI.
//!
//! The single-page client is compiled into the image with `include_str!`
//! and served from a fixed route table.  Asset URLs may carry a
//! cache-busting suffix (`/app.js?v=3`, `/styles.css.v3`), so lookups fall
//! back to a prefix match for the two static assets.

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// A fully resolved HTTP response for an asset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: &'static str,
}

impl AssetResponse {
    const fn ok(content_type: &'static str, body: &'static str) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    const NO_CONTENT: Self = Self {
        status: 204,
        content_type: "text/plain",
        body: "",
    };

    const NOT_FOUND: Self = Self {
        status: 404,
        content_type: "text/plain",
        body: "Not Found",
    };
}

/// Map a request URI (path plus optional query) to its response.
pub fn resolve(uri: &str) -> AssetResponse {
    let path = uri.split_once('?').map_or(uri, |(path, _)| path);
    match path {
        "/" | "/index.html" => AssetResponse::ok("text/html", INDEX_HTML),
        "/favicon.ico" => AssetResponse::NO_CONTENT,
        _ if path.starts_with("/styles.css") => AssetResponse::ok("text/css", STYLES_CSS),
        _ if path.starts_with("/app.js") => AssetResponse::ok("application/javascript", APP_JS),
        _ => AssetResponse::NOT_FOUND,
    }
}

#[cfg(target_os = "espidf")]
pub use device::mount;

#[cfg(target_os = "espidf")]
mod device {
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::EspHttpServer;
    use esp_idf_svc::io::Write;

    use super::resolve;

    /// Register GET and HEAD for every path.  Must be mounted after any
    /// more specific routes (such as `/ws`).
    pub fn mount(server: &mut EspHttpServer<'static>) -> anyhow::Result<()> {
        server.fn_handler("/*", Method::Get, |req| -> anyhow::Result<()> {
            let asset = resolve(req.uri());
            let mut resp =
                req.into_response(asset.status, None, &[("Content-Type", asset.content_type)])?;
            resp.write_all(asset.body.as_bytes())?;
            Ok(())
        })?;
        server.fn_handler("/*", Method::Head, |req| -> anyhow::Result<()> {
            let asset = resolve(req.uri());
            req.into_response(asset.status, None, &[("Content-Type", asset.content_type)])?;
            Ok(())
        })?;
        Ok(())
    }
}
