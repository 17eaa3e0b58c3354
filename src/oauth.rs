use std::io::{ErrorKind, Read, Write};
use std::net::TcpListener;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tauri::{Emitter, Manager};
use tauri_plugin_opener::OpenerExt;

use crate::secrets::{SecretKind, SecretVault};
use crate::state::AppState;
use crate::status::{TauriStatusSink, Tone};

pub const OAUTH_EVENT: &str = "notion-oauth";
const OAUTH_LISTEN_ADDR: &str = "127.0.0.1:5173";
const OAUTH_TIMEOUT: Duration = Duration::from_secs(120);
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const NOTION_TOKEN_URL: &str = "https://api.notion.com/v1/oauth/token";
const NOTION_AUTHORIZE_URL: &str = "https://api.notion.com/v1/oauth/authorize";

fn client_id() -> String {
    std::env::var("TASKLIGHT_NOTION_CLIENT_ID").unwrap_or_default()
}

fn authorize_url() -> String {
    if let Ok(url) = std::env::var("TASKLIGHT_NOTION_AUTH_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }
    format!(
        "{NOTION_AUTHORIZE_URL}?client_id={}&response_type=code&owner=user&redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Foauth",
        client_id()
    )
}

pub(crate) fn extract_code(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let path = line.split_whitespace().nth(1)?;
    let query = path.split('?').nth(1)?;
    query
        .split('&')
        .find(|p| p.starts_with("code="))
        .map(|p| p.trim_start_matches("code=").to_string())
        .filter(|code| !code.is_empty())
}

fn send_response(stream: &mut impl Write, message: &str) {
    let body = format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding: 40px;\">\
         <h2>{message}</h2></body></html>"
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn exchange_code_for_token(code: &str) -> Result<String, String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| error.to_string())?;

    let response = client
        .post(NOTION_TOKEN_URL)
        .basic_auth(
            client_id(),
            std::env::var("TASKLIGHT_NOTION_CLIENT_SECRET").ok(),
        )
        .json(&json!({
            "grant_type": "authorization_code",
            "code": code,
            "redirect_uri": "http://localhost:5173/oauth",
        }))
        .send()
        .map_err(|error| error.to_string())?;

    let status = response.status();
    let body = response.text().map_err(|error| error.to_string())?;
    if !status.is_success() {
        return Err(format!("token exchange failed ({}): {body}", status.as_u16()));
    }
    let value: Value = serde_json::from_str(&body).map_err(|error| error.to_string())?;
    value
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| "token exchange response missing access_token".to_string())
}

#[derive(Debug)]
enum RedirectWait {
    Code(String),
    Denied,
    TimedOut,
    Failed,
}

// Polls accept against a deadline instead of blocking, so the listener is
// always dropped on return and the port is free for the next attempt.
fn wait_for_code(listener: TcpListener, timeout: Duration) -> RedirectWait {
    let deadline = Instant::now() + timeout;
    if let Err(error) = listener.set_nonblocking(true) {
        log::error!("could not configure oauth listener: {error}");
        return RedirectWait::Failed;
    }

    loop {
        match listener.accept() {
            Ok((mut stream, _)) => {
                let _ = stream.set_nonblocking(false);
                let mut buffer = [0u8; 4096];
                let n = match stream.read(&mut buffer) {
                    Ok(n) => n,
                    Err(error) => {
                        log::warn!("could not read oauth redirect: {error}");
                        return RedirectWait::Failed;
                    }
                };
                let request = String::from_utf8_lossy(&buffer[..n]);
                return match extract_code(&request) {
                    Some(code) => {
                        send_response(
                            &mut stream,
                            "Notion connected! You can close this tab and return to Tasklight.",
                        );
                        RedirectWait::Code(code)
                    }
                    None => {
                        send_response(
                            &mut stream,
                            "Authorization failed. You can close this tab.",
                        );
                        RedirectWait::Denied
                    }
                };
            }
            Err(error) if error.kind() == ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return RedirectWait::TimedOut;
                }
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(error) => {
                log::warn!("oauth listener accept failed: {error}");
                return RedirectWait::Failed;
            }
        }
    }
}

fn post_status(app: &tauri::AppHandle, sink: &TauriStatusSink, text: &str, tone: Tone) {
    let state = app.state::<AppState>();
    if let Ok(mut status) = state.status.lock() {
        status.post(sink, text, tone);
    };
}

fn finish(app: &tauri::AppHandle, connected: bool) {
    let state = app.state::<AppState>();
    state.connecting.store(false, Ordering::SeqCst);
    if let Err(e) = app.emit(OAUTH_EVENT, connected) {
        log::warn!("failed to emit oauth result: {e}");
    }
}

// The listener binds before the browser opens; the flow gives up after two
// minutes so an abandoned tab cannot wedge the connecting state or the port.
pub fn start(app: tauri::AppHandle) {
    std::thread::spawn(move || {
        let sink = TauriStatusSink::new(app.clone());

        let listener = match TcpListener::bind(OAUTH_LISTEN_ADDR) {
            Ok(listener) => listener,
            Err(error) => {
                log::error!("could not bind oauth listener: {error}");
                post_status(
                    &app,
                    &sink,
                    "Could not start the Notion connection flow.",
                    Tone::Negative,
                );
                finish(&app, false);
                return;
            }
        };

        if let Err(error) = app.opener().open_url(authorize_url(), None::<&str>) {
            log::error!("could not open browser for oauth: {error}");
            post_status(
                &app,
                &sink,
                "Could not open the browser to connect Notion.",
                Tone::Negative,
            );
            finish(&app, false);
            return;
        }

        let code = match wait_for_code(listener, OAUTH_TIMEOUT) {
            RedirectWait::Code(code) => code,
            RedirectWait::Denied => {
                post_status(&app, &sink, "Notion authorization was denied.", Tone::Warning);
                finish(&app, false);
                return;
            }
            RedirectWait::TimedOut => {
                post_status(
                    &app,
                    &sink,
                    "Notion connection timed out. Try again.",
                    Tone::Warning,
                );
                finish(&app, false);
                return;
            }
            RedirectWait::Failed => {
                post_status(
                    &app,
                    &sink,
                    "Could not complete the Notion connection.",
                    Tone::Negative,
                );
                finish(&app, false);
                return;
            }
        };

        match exchange_code_for_token(&code) {
            Ok(token) => {
                let stored = {
                    let state = app.state::<AppState>();
                    state.vault.store(SecretKind::Notion, &token)
                };
                if let Err(error) = stored {
                    log::error!("could not store Notion token: {error}");
                    post_status(
                        &app,
                        &sink,
                        "Could not store the Notion token in the keychain.",
                        Tone::Negative,
                    );
                    finish(&app, false);
                    return;
                }
                {
                    let state = app.state::<AppState>();
                    if let Ok(mut store) = state.store.lock() {
                        store.apply(|s| s.has_notion_secret = true);
                    };
                }
                post_status(&app, &sink, "Notion workspace connected.", Tone::Positive);
                finish(&app, true);
            }
            Err(error) => {
                log::error!("oauth token exchange failed: {error}");
                post_status(
                    &app,
                    &sink,
                    "Could not complete the Notion connection.",
                    Tone::Negative,
                );
                finish(&app, false);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpStream;

    #[test]
    fn code_extraction_reads_the_query_parameter() {
        let request = "GET /oauth?code=abc123&state=xyz HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(extract_code(request), Some("abc123".to_string()));
    }

    #[test]
    fn code_extraction_handles_trailing_and_missing_params() {
        let only = "GET /oauth?code=abc HTTP/1.1\r\n";
        assert_eq!(extract_code(only), Some("abc".to_string()));

        let denied = "GET /oauth?error=access_denied HTTP/1.1\r\n";
        assert_eq!(extract_code(denied), None);

        let empty = "GET /oauth?code= HTTP/1.1\r\n";
        assert_eq!(extract_code(empty), None);

        let bare = "GET /oauth HTTP/1.1\r\n";
        assert_eq!(extract_code(bare), None);
    }

    #[test]
    fn timeout_releases_the_listen_port_for_retry() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let outcome = wait_for_code(listener, Duration::from_millis(50));
        assert!(matches!(outcome, RedirectWait::TimedOut));

        TcpListener::bind(addr).expect("port should be free after timeout");
    }

    #[test]
    fn redirect_connection_yields_the_code() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let handle = std::thread::spawn(move || wait_for_code(listener, Duration::from_secs(5)));

        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .write_all(b"GET /oauth?code=abc123 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .expect("write");
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response);
        assert!(response.contains("200 OK"));

        let outcome = handle.join().expect("join");
        assert!(matches!(outcome, RedirectWait::Code(code) if code == "abc123"));
    }

    #[test]
    fn denied_redirect_reports_denial() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");

        let handle = std::thread::spawn(move || wait_for_code(listener, Duration::from_secs(5)));

        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .write_all(b"GET /oauth?error=access_denied HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .expect("write");
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response);

        let outcome = handle.join().expect("join");
        assert!(matches!(outcome, RedirectWait::Denied));
    }
}
