//! Helpers shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;

use crate::auth::{AuthBackend, AuthError, AuthResult, AuthSession, AuthUser, SignUpOutcome};
use crate::models::UserId;

/// Serve a single canned HTTP response on a random local port.
///
/// Returns the base URL and a receiver yielding the whole request (request
/// line, headers and body) as received.
pub async fn spawn_one_shot_server(
    status_line: &str,
    extra_headers: &[(&str, &str)],
    body: &str,
) -> (String, oneshot::Receiver<String>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let address = listener.local_addr().expect("local address");
    let mut head = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    for (name, value) in extra_headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    let response = format!("{head}\r\n{body}");
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let request = read_request(&mut socket).await;
            let _ = sender.send(request);
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    (format!("http://{address}"), receiver)
}

// Reads the head, then as many body bytes as content-length announces.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut received = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let read = socket.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        received.extend_from_slice(&chunk[..read]);
        let text = String::from_utf8_lossy(&received);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let expected = request_header(&text[..head_end], "content-length")
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= head_end + 4 + expected {
                break;
            }
        }
    }
    String::from_utf8_lossy(&received).into_owned()
}

/// Decode the percent-encoded request target of a captured request
pub fn request_target(request: &str) -> String {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default();
    urlencoding::decode(target)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| target.to_string())
}

/// Parse the JSON body of a captured request
pub fn request_body(request: &str) -> serde_json::Value {
    let body = request
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or_default();
    serde_json::from_str(body).expect("request body is JSON")
}

/// Request method of a captured request
pub fn request_method(request: &str) -> &str {
    request.split_whitespace().next().unwrap_or_default()
}

/// Case-insensitive header lookup in a captured request
pub fn request_header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    request.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then_some(value.trim())
    })
}

/// Scripted [`AuthBackend`] for session tests.
///
/// Accepts the password `"correct"`; everything else is rejected the way
/// GoTrue rejects bad credentials.
pub struct FakeAuth {
    pub user_id: UserId,
    pub stored: Mutex<Option<AuthSession>>,
    pub require_confirmation: bool,
    pub fail_sign_out: bool,
    pub reset_requests: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            user_id: UserId::new(),
            stored: Mutex::new(None),
            require_confirmation: false,
            fail_sign_out: false,
            reset_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn session(&self) -> AuthSession {
        AuthSession {
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: crate::util::unix_timestamp_now() + 3_600,
            user: AuthUser {
                id: self.user_id,
                email: Some("ada@example.com".to_string()),
            },
        }
    }

    /// Pretend a previous run left a session in secure storage
    pub fn with_stored_session(self) -> Self {
        *self.stored.lock().unwrap() = Some(self.session());
        self
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> AuthResult<SignUpOutcome> {
        if self.require_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired);
        }
        let session = self.session();
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_in(
        &self,
        _email: &str,
        password: &str,
    ) -> AuthResult<AuthSession> {
        if password != "correct" {
            return Err(AuthError::Api(
                "Invalid login credentials (400)".to_string(),
            ));
        }
        let session = self.session();
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self, _access_token: &str) -> AuthResult<()> {
        if self.fail_sign_out {
            return Err(AuthError::Api("Network is down".to_string()));
        }
        *self.stored.lock().unwrap() = None;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> AuthResult<()> {
        self.reset_requests.lock().unwrap().push(email.to_string());
        Ok(())
    }
}
