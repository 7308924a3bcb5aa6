//! Bundled webview assets and the `pets://` URI scheme.
//!
//! The shell HTML is generated per request with a fresh script nonce and a
//! CSP that only allows the bundled stylesheets, sprite images, and the
//! nonce-tagged script. Everything else under `media/` is served verbatim
//! from the binary.

use std::sync::Arc;

use include_dir::{include_dir, Dir};
use tauri::http::{Response, StatusCode};
use tauri::Manager;

use crate::config::PetsConfig;
use crate::pets::{PetColor, PetSize, PetSpecification, PetType};
use crate::state::AppState;

/// media/ embedded at compile time for single-binary distribution.
static MEDIA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/media");

/// Origin the webview loads everything from.
pub(crate) const PETS_ORIGIN: &str = "pets://localhost";

/// Register the `pets://` custom URI scheme on the Tauri builder.
///
/// `pets://localhost/index.html?type=..&color=..&size=..` returns the shell;
/// any other path is looked up in the embedded `media/` directory. Path
/// traversal attempts are rejected.
pub(crate) fn register_pets_protocol(builder: tauri::Builder<tauri::Wry>) -> tauri::Builder<tauri::Wry> {
    builder.register_uri_scheme_protocol("pets", |ctx, request| {
        let uri = request.uri();
        let path = uri.path().trim_start_matches('/');

        if path.is_empty() || path == "index.html" {
            // Window URLs carry the spec in the query; anything missing or
            // invalid falls back to the configured values.
            let (fallback, theme) = match ctx.app_handle().try_state::<Arc<AppState>>() {
                Some(state) => {
                    let config = state.config.read();
                    (PetSpecification::from_config(&config), config.theme.clone())
                }
                None => {
                    let config = PetsConfig::default();
                    (PetSpecification::from_config(&config), config.theme)
                }
            };
            let spec = spec_from_query(uri.query(), &fallback);
            return Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/html")
                .body(render_shell(&spec, &theme).into_bytes())
                .unwrap();
        }

        if is_path_escape(path) {
            return Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "text/plain")
                .body(b"Invalid asset path".to_vec())
                .unwrap();
        }

        match MEDIA.get_file(path) {
            Some(file) => {
                let mime = mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .to_string();
                Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", mime)
                    .body(file.contents().to_vec())
                    .unwrap()
            }
            None => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header("Content-Type", "text/plain")
                .body(b"Not found".to_vec())
                .unwrap(),
        }
    })
}

/// Reject `..` components and absolute/backslash paths.
fn is_path_escape(path: &str) -> bool {
    path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg == "..")
}

/// Parse a shell query string (`type=cat&color=brown&size=nano`), falling
/// back to the given spec for missing or unknown values.
fn spec_from_query(query: Option<&str>, fallback: &PetSpecification) -> PetSpecification {
    let mut spec = fallback.clone();
    let Some(query) = query else {
        return spec;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "type" => {
                if let Some(t) = PetType::from_name(&value) {
                    spec.kind = t;
                }
            }
            "color" => {
                if let Some(c) = PetColor::from_name(&value) {
                    spec.color = c;
                }
            }
            "size" => {
                if let Some(s) = PetSize::from_name(&value) {
                    spec.size = s;
                }
            }
            _ => {}
        }
    }
    spec
}

/// Random nonce so the CSP only admits the scripts we inject.
fn script_nonce() -> String {
    use rand::RngExt;
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the shell HTML for one pet window. The spec is normalized here so
/// the webview never sees an illegal species/color combination.
pub(crate) fn render_shell(spec: &PetSpecification, theme: &str) -> String {
    let spec = spec.normalized();
    let nonce = script_nonce();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src {origin}; img-src {origin} https:; script-src 'nonce-{nonce}';">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link href="{origin}/reset.css" rel="stylesheet">
    <link href="{origin}/pets.css" rel="stylesheet">
    <title>Deskpets</title>
</head>
<body class="theme-{theme}">
    <canvas id="petCanvas"></canvas><div id="petsContainer"></div>
    <script nonce="{nonce}" src="{origin}/main-bundle.js"></script>
    <script nonce="{nonce}">petApp.petPanelApp("{origin}", "{color}", "{size}", "{kind}");</script>
</body>
</html>"#,
        origin = PETS_ORIGIN,
        nonce = nonce,
        theme = theme,
        color = spec.color.as_str(),
        size = spec.size.as_str(),
        kind = spec.kind.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_spec() -> PetSpecification {
        PetSpecification::from_config(&PetsConfig::default())
    }

    #[test]
    fn nonce_is_32_alphanumeric_chars() {
        let nonce = script_nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn nonces_differ_between_loads() {
        assert_ne!(script_nonce(), script_nonce());
    }

    #[test]
    fn shell_bootstraps_with_spec() {
        let spec = PetSpecification::new(PetColor::Black, PetType::Dog, PetSize::Large);
        let html = render_shell(&spec, "none");
        assert!(html.contains(r#"petApp.petPanelApp("pets://localhost", "black", "large", "dog");"#));
        assert!(html.contains("petCanvas"));
        assert!(html.contains("petsContainer"));
        assert!(html.contains(r#"class="theme-none""#));
    }

    #[test]
    fn shell_normalizes_illegal_colors() {
        let spec = PetSpecification::new(PetColor::Brown, PetType::Snake, PetSize::Nano);
        let html = render_shell(&spec, "none");
        assert!(html.contains(r#""green", "nano", "snake""#));
    }

    #[test]
    fn shell_csp_pins_script_nonce() {
        let html = render_shell(&default_spec(), "none");
        // The nonce in the CSP must match the nonce on both script tags
        let nonce = html
            .split("'nonce-")
            .nth(1)
            .and_then(|s| s.split('\'').next())
            .unwrap();
        assert_eq!(html.matches(&format!(r#"nonce="{nonce}""#)).count(), 2);
        assert!(html.contains("default-src 'none'"));
    }

    #[test]
    fn query_overrides_fallback() {
        let spec = spec_from_query(
            Some("type=rubber-duck&color=yellow&size=medium"),
            &default_spec(),
        );
        assert_eq!(spec.kind, PetType::RubberDuck);
        assert_eq!(spec.color, PetColor::Yellow);
        assert_eq!(spec.size, PetSize::Medium);
    }

    #[test]
    fn unknown_query_values_keep_fallback() {
        let fallback = PetSpecification::new(PetColor::Black, PetType::Clippy, PetSize::Large);
        let spec = spec_from_query(Some("type=dragon&color=purple&size=giant"), &fallback);
        assert_eq!(spec, fallback);
    }

    #[test]
    fn missing_query_keeps_fallback() {
        let fallback = default_spec();
        assert_eq!(spec_from_query(None, &fallback), fallback);
    }

    #[test]
    fn path_escape_detection() {
        assert!(is_path_escape("../etc/passwd"));
        assert!(is_path_escape("a/../../b"));
        assert!(is_path_escape("/absolute"));
        assert!(is_path_escape("a\\b"));
        assert!(!is_path_escape("pets.css"));
        assert!(!is_path_escape("sprites/cat/brown_idle.gif"));
    }

    #[test]
    fn bundled_stylesheets_are_embedded() {
        assert!(MEDIA.get_file("pets.css").is_some());
        assert!(MEDIA.get_file("reset.css").is_some());
        assert!(MEDIA.get_file("main-bundle.js").is_some());
        assert!(MEDIA.get_file("nope.css").is_none());
    }

    #[test]
    fn mime_types_resolve_from_extension() {
        assert_eq!(
            mime_guess::from_path("pets.css").first_or_octet_stream(),
            "text/css"
        );
        assert!(mime_guess::from_path("main-bundle.js")
            .first_or_octet_stream()
            .to_string()
            .contains("javascript"));
    }
}
