//! Usage: Hook the webview's TLS failure surface and apply the localhost allow-list.

use crate::domain::tls_policy;

/// WebKitGTK raises the TLS failure signal for main-frame loads only; subframes keep the
/// engine's default rejection.
#[cfg(target_os = "linux")]
pub(crate) fn install(window: &tauri::WebviewWindow) {
    let result = window.with_webview(|platform| {
        use webkit2gtk::{WebContextExt, WebViewExt};

        platform
            .inner()
            .connect_load_failed_with_tls_errors(|webview, failing_uri, certificate, _errors| {
                if tls_policy::decide(failing_uri) != tls_policy::CertificateDecision::Accept {
                    tracing::warn!(url = %failing_uri, "certificate error rejected");
                    return false;
                }
                let Some(host) = url::Url::parse(failing_uri)
                    .ok()
                    .and_then(|url| url.host_str().map(str::to_string))
                else {
                    return false;
                };
                let Some(context) = webview.context() else {
                    return false;
                };

                tracing::info!(url = %failing_uri, "accepting certificate for local development origin");
                context.allow_tls_certificate_for_host(certificate, &host);
                webview.load_uri(failing_uri);
                true
            });
    });
    if let Err(err) = result {
        tracing::warn!("failed to install certificate policy: {}", err);
    }
}

/// Other engines keep their default rejection for every origin.
#[cfg(not(target_os = "linux"))]
pub(crate) fn install(window: &tauri::WebviewWindow) {
    tracing::debug!(
        window = %window.label(),
        allow_listed_host = tls_policy::LOCAL_DEV_HOST,
        "certificate override not available on this webview engine"
    );
}
