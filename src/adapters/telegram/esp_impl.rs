//! ESP-IDF `esp_http_client` backend for [`TelegramHttp`](super::TelegramHttp).
//!
//! Compiled only for `target_os = "espidf"`.  One request per client
//! handle: init → open → write body → fetch headers → read → cleanup.

use std::ffi::CString;

use log::warn;

use esp_idf_svc::sys::{
    ESP_OK, esp_crt_bundle_attach, esp_http_client_cleanup, esp_http_client_close,
    esp_http_client_config_t, esp_http_client_fetch_headers, esp_http_client_get_status_code,
    esp_http_client_handle_t, esp_http_client_init, esp_http_client_method_t_HTTP_METHOD_GET,
    esp_http_client_method_t_HTTP_METHOD_POST, esp_http_client_open, esp_http_client_read,
    esp_http_client_set_header, esp_http_client_transport_t_HTTP_TRANSPORT_OVER_SSL,
    esp_http_client_write,
};

use super::{MAX_RESPONSE_LEN, TransportError};

const READ_CHUNK: usize = 512;

/// Owns a client handle; cleaned up exactly once on drop.
struct ClientHandle(esp_http_client_handle_t);

impl Drop for ClientHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from `esp_http_client_init` and is not
        // used after this point.
        unsafe {
            esp_http_client_close(self.0);
            esp_http_client_cleanup(self.0);
        }
    }
}

/// Perform one HTTPS request.  `json` selects POST with that body,
/// otherwise GET.
pub(super) fn perform(url: &str, json: Option<&[u8]>, timeout_ms: u32) -> Result<Vec<u8>, TransportError> {
    let url_c = CString::new(url).map_err(|_| TransportError::Malformed)?;

    // SAFETY: all-zero is the documented "unset" value for every field.
    let mut cfg: esp_http_client_config_t = unsafe { core::mem::zeroed() };
    cfg.url = url_c.as_ptr();
    cfg.method = if json.is_some() {
        esp_http_client_method_t_HTTP_METHOD_POST
    } else {
        esp_http_client_method_t_HTTP_METHOD_GET
    };
    cfg.transport_type = esp_http_client_transport_t_HTTP_TRANSPORT_OVER_SSL;
    cfg.crt_bundle_attach = Some(esp_crt_bundle_attach);
    cfg.timeout_ms = timeout_ms as i32;

    // SAFETY: `cfg` and `url_c` outlive the client handle.
    let raw = unsafe { esp_http_client_init(&cfg) };
    if raw.is_null() {
        warn!("HTTP(espidf): esp_http_client_init failed");
        return Err(TransportError::Io);
    }
    let client = ClientHandle(raw);

    let body = json.unwrap_or_default();
    if json.is_some() {
        let name = c"Content-Type";
        let value = c"application/json";
        // SAFETY: both strings are NUL-terminated literals.
        unsafe { esp_http_client_set_header(client.0, name.as_ptr(), value.as_ptr()) };
    }

    // SAFETY: valid handle; `body.len()` is the exact number of bytes written below.
    let rc = unsafe { esp_http_client_open(client.0, body.len() as i32) };
    if rc != ESP_OK {
        warn!("HTTP(espidf): open failed (rc={})", rc);
        return Err(TransportError::Io);
    }

    if !body.is_empty() {
        // SAFETY: `body` is valid for `body.len()` bytes.
        let written = unsafe { esp_http_client_write(client.0, body.as_ptr().cast(), body.len() as i32) };
        if written < 0 || written as usize != body.len() {
            warn!("HTTP(espidf): short write ({} of {})", written, body.len());
            return Err(TransportError::Io);
        }
    }

    // SAFETY: valid, opened handle.
    if unsafe { esp_http_client_fetch_headers(client.0) } < 0 {
        warn!("HTTP(espidf): no response headers");
        return Err(TransportError::Io);
    }
    let status = unsafe { esp_http_client_get_status_code(client.0) };

    let mut out = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        // SAFETY: `chunk` is valid for `READ_CHUNK` bytes.
        let n = unsafe { esp_http_client_read(client.0, chunk.as_mut_ptr().cast(), READ_CHUNK as i32) };
        if n < 0 {
            return Err(TransportError::Io);
        }
        if n == 0 {
            break;
        }
        if out.len() + n as usize > MAX_RESPONSE_LEN {
            return Err(TransportError::TooLarge);
        }
        out.extend_from_slice(&chunk[..n as usize]);
    }

    if !(200..300).contains(&status) {
        return Err(TransportError::Http(status as u16));
    }
    Ok(out)
}
