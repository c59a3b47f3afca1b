//! Access guard: only the native shell may reach the privileged routes.
//!
//! # Credentials
//!
//! A request is accepted when the `X-NativePHP-Secret` header or the
//! `_php_native` cookie carries either
//!
//! - the configured shared secret itself, or
//! - a token previously handed out by the cookie route.
//!
//! Tokens are stateless.  Each one is a random nonce plus an HMAC-SHA256 of
//! that nonce keyed with the shared secret:
//!
//! ```text
//! 3f2a9c0e5b7d4e1f8a6b2c9d0e1f2a3b.9c1d...e4   (nonce "." hex(mac))
//! ```
//!
//! Verifying a token recomputes the MAC, so the bridge keeps no list of issued
//! tokens and any token signed with the current secret is valid.  All
//! comparisons run in constant time.
//!
//! # Browser navigation
//!
//! Browsers mark top-level page loads with `Sec-Fetch-Mode: navigate`.  Such a
//! request is refused even when it carries a valid cookie, so a user pointing
//! the embedded browser at a privileged route cannot trigger it.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::application::bridge_service::BridgeError;

type HmacSha256 = Hmac<Sha256>;

/// Credential material extracted from one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentedCredentials {
    /// Value of the `X-NativePHP-Secret` header.
    pub header: Option<String>,
    /// Value of the `_php_native` cookie.
    pub cookie: Option<String>,
    /// Value of the `Sec-Fetch-Mode` header.
    pub fetch_mode: Option<String>,
}

/// Checks shell credentials and issues new tokens.
#[derive(Clone)]
pub struct AccessGuard {
    secret: String,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").field("secret", &"<redacted>").finish()
    }
}

impl AccessGuard {
    /// Creates a guard for `secret`.  An empty secret makes the guard refuse
    /// every request.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues a fresh token signed with the shared secret.
    pub fn issue_token(&self) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        let signature = self.sign(&nonce);
        format!("{nonce}.{signature}")
    }

    /// Returns `true` if `presented` is the shared secret or a token signed
    /// with it.
    pub fn verify(&self, presented: &str) -> bool {
        if self.secret.is_empty() || presented.is_empty() {
            return false;
        }

        if bool::from(presented.as_bytes().ct_eq(self.secret.as_bytes())) {
            return true;
        }

        match presented.split_once('.') {
            Some((nonce, signature)) if !nonce.is_empty() => {
                let expected = self.sign(nonce);
                expected.as_bytes().ct_eq(signature.as_bytes()).into()
            }
            _ => false,
        }
    }

    /// Admits or rejects one request.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Forbidden`] when the request is a browser navigation or
    /// neither the header nor the cookie verifies.
    pub fn check(&self, presented: &PresentedCredentials) -> Result<(), BridgeError> {
        if presented
            .fetch_mode
            .as_deref()
            .is_some_and(|mode| mode.eq_ignore_ascii_case("navigate"))
        {
            return Err(BridgeError::Forbidden);
        }

        let admitted = [presented.header.as_deref(), presented.cookie.as_deref()]
            .into_iter()
            .flatten()
            .any(|value| self.verify(value));

        if admitted {
            Ok(())
        } else {
            Err(BridgeError::Forbidden)
        }
    }

    fn sign(&self, nonce: &str) -> String {
        // The `expect` is safe: HMAC accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC takes keys of any size");
        mac.update(nonce.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
