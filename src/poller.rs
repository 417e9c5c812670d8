use std::thread;
use std::time::Instant;

use tracing::{debug, warn};

use crate::auth::{AuthBackend, AuthSession, PollOutcome};
use crate::config::PollSettings;
use crate::error::AuthError;

/// Polls until the backend hands out a token for `session`.
///
/// Transport and decoding failures on a tick are logged and retried on the
/// next tick. An explicit error from the backend ends the attempt at once.
/// No request is issued once the deadline has passed.
pub fn poll_for_token<B: AuthBackend + ?Sized>(
    backend: &B,
    session: &AuthSession,
    settings: &PollSettings,
) -> Result<String, AuthError> {
    let started = Instant::now();
    let deadline = started + settings.timeout;
    let mut attempt: u32 = 0;

    loop {
        thread::sleep(settings.interval);

        if Instant::now() >= deadline {
            return Err(AuthError::TimedOut {
                waited: started.elapsed(),
            });
        }

        attempt += 1;
        let response = match backend.check(session) {
            Ok(response) => response,
            Err(e) => {
                warn!(attempt, "{}", e);
                continue;
            }
        };

        match response.outcome() {
            PollOutcome::Success(token) => {
                debug!(attempt, "received auth token");
                return Ok(token);
            }
            PollOutcome::Failure(message) => {
                return Err(AuthError::Rejected { message });
            }
            PollOutcome::Pending => debug!(attempt, "auth still pending"),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::auth::AuthResponse;
    use crate::error::PollError;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays canned poll results and records how often it was asked.
    pub struct ScriptedBackend {
        replies: RefCell<VecDeque<Result<AuthResponse, PollError>>>,
        pub starts: Cell<usize>,
        pub checks: Cell<usize>,
    }

    impl ScriptedBackend {
        pub fn new(
            replies: Vec<Result<AuthResponse, PollError>>,
        ) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                starts: Cell::new(0),
                checks: Cell::new(0),
            }
        }
    }

    impl AuthBackend for ScriptedBackend {
        fn start_session(&self) -> Result<AuthSession, AuthError> {
            self.starts.set(self.starts.get() + 1);
            Ok(AuthSession {
                code: "abc123".to_string(),
            })
        }

        fn check(
            &self,
            _session: &AuthSession,
        ) -> Result<AuthResponse, PollError> {
            self.checks.set(self.checks.get() + 1);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(pending()))
        }

        fn login_url(&self, session: &AuthSession) -> String {
            format!("http://lane.test/auth/cli?code={}", session.code)
        }
    }

    pub fn pending() -> AuthResponse {
        AuthResponse {
            status: "pending".to_string(),
            ..Default::default()
        }
    }

    pub fn token(value: &str) -> AuthResponse {
        AuthResponse {
            token: value.to_string(),
            ..Default::default()
        }
    }

    pub fn rejected(message: &str) -> AuthResponse {
        AuthResponse {
            error: message.to_string(),
            ..Default::default()
        }
    }

    pub fn decode_failure() -> PollError {
        PollError::Decode {
            source: serde_json::from_str::<AuthResponse>("not json")
                .unwrap_err(),
        }
    }

    pub fn fast_settings() -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(1),
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            code: "abc123".to_string(),
        }
    }

    #[test]
    fn first_token_wins() {
        let backend = ScriptedBackend::new(vec![Ok(token("abc"))]);

        let result = poll_for_token(&backend, &session(), &fast_settings());

        assert_eq!(result.unwrap(), "abc");
        assert_eq!(backend.checks.get(), 1);
    }

    #[test]
    fn pending_then_token() {
        let backend = ScriptedBackend::new(vec![
            Ok(pending()),
            Ok(pending()),
            Ok(token("abc")),
        ]);

        let result = poll_for_token(&backend, &session(), &fast_settings());

        assert_eq!(result.unwrap(), "abc");
        assert_eq!(backend.checks.get(), 3);
    }

    #[test]
    fn explicit_error_stops_immediately() {
        let backend = ScriptedBackend::new(vec![
            Ok(rejected("expired")),
            Ok(token("never-reached")),
        ]);
        let started = Instant::now();

        let result = poll_for_token(&backend, &session(), &fast_settings());

        match result {
            Err(AuthError::Rejected { message }) => assert_eq!(message, "expired"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(backend.checks.get(), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn only_pending_times_out() {
        let backend = ScriptedBackend::new(vec![]);
        let settings = PollSettings {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(55),
            request_timeout: Duration::from_secs(1),
        };

        let result = poll_for_token(&backend, &session(), &settings);

        assert!(matches!(result, Err(AuthError::TimedOut { .. })));
        let checks = backend.checks.get();
        assert!(checks <= 5, "checked {} times", checks);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(backend.checks.get(), checks);
    }

    #[test]
    fn expired_deadline_issues_no_request() {
        let backend = ScriptedBackend::new(vec![Ok(token("abc"))]);
        let settings = PollSettings {
            interval: Duration::from_millis(10),
            timeout: Duration::ZERO,
            request_timeout: Duration::from_secs(1),
        };

        let result = poll_for_token(&backend, &session(), &settings);

        assert!(matches!(result, Err(AuthError::TimedOut { .. })));
        assert_eq!(backend.checks.get(), 0);
    }

    #[test]
    fn transient_failures_keep_polling() {
        let backend = ScriptedBackend::new(vec![
            Err(decode_failure()),
            Ok(pending()),
            Err(decode_failure()),
            Ok(token("abc")),
        ]);

        let result = poll_for_token(&backend, &session(), &fast_settings());

        assert_eq!(result.unwrap(), "abc");
        assert_eq!(backend.checks.get(), 4);
    }

    #[test]
    fn transport_error_then_token_over_http() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/auth/cli")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"token":"tok_live"}"#)
            .create();

        // The first tick goes to a closed port, the rest reach the server.
        struct FlakyFirst {
            down: crate::auth::HttpAuthBackend,
            up: crate::auth::HttpAuthBackend,
            calls: Cell<usize>,
        }

        impl AuthBackend for FlakyFirst {
            fn start_session(&self) -> Result<AuthSession, AuthError> {
                self.up.start_session()
            }

            fn check(
                &self,
                session: &AuthSession,
            ) -> Result<AuthResponse, PollError> {
                self.calls.set(self.calls.get() + 1);
                if self.calls.get() == 1 {
                    self.down.check(session)
                } else {
                    self.up.check(session)
                }
            }

            fn login_url(&self, session: &AuthSession) -> String {
                self.up.login_url(session)
            }
        }

        let timeout = Duration::from_secs(1);
        let backend = FlakyFirst {
            down: crate::auth::HttpAuthBackend::new("http://127.0.0.1:1", timeout)
                .unwrap(),
            up: crate::auth::HttpAuthBackend::new(&server.url(), timeout)
                .unwrap(),
            calls: Cell::new(0),
        };

        let result = poll_for_token(&backend, &session(), &fast_settings());

        assert_eq!(result.unwrap(), "tok_live");
        assert_eq!(backend.calls.get(), 2);
    }

    #[test]
    fn token_with_null_error_over_http() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/auth/cli")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":null,"token":"abc","status":"complete","error":null}"#)
            .create();
        let backend = crate::auth::HttpAuthBackend::new(
            &server.url(),
            Duration::from_secs(1),
        )
        .unwrap();
        let settings = PollSettings {
            timeout: Duration::from_millis(300),
            ..fast_settings()
        };

        let result = poll_for_token(&backend, &session(), &settings);

        assert_eq!(result.unwrap(), "abc");
    }
}
