//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use crate::domain::ports::{
    MockAuthCommand, MockOrderCommand, MockOrderQuery, MockTokenService, TokenError,
};
use crate::domain::{AuthenticatedUser, Email, Role, TokenClaims, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token accepted by [`MockPorts::accept_tokens`].
pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLIENT_TOKEN: &str = "client-token";

/// Mocked driving ports plus the token verifier used by the auth middleware.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthCommand,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
    pub tokens: MockTokenService,
}

impl MockPorts {
    /// Accept [`ADMIN_TOKEN`] and [`CLIENT_TOKEN`] for the given identities and
    /// reject everything else as invalid.
    pub fn accept_tokens(&mut self, admin: &AuthenticatedUser, client: &AuthenticatedUser) {
        let admin = claims_for(admin);
        let client = claims_for(client);
        self.tokens.expect_verify().returning(move |token| match token {
            ADMIN_TOKEN => Ok(admin.clone()),
            CLIENT_TOKEN => Ok(client.clone()),
            _ => Err(TokenError::invalid("signature mismatch")),
        });
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            auth: Arc::new(self.auth),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
            tokens: Arc::new(self.tokens),
        })
    }
}

pub fn user(role: Role, email: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: UserId::random(),
        email: Email::new(email).expect("valid email"),
        role,
    }
}

pub fn admin() -> AuthenticatedUser {
    user(Role::Admin, "ops@example.com")
}

pub fn client() -> AuthenticatedUser {
    user(Role::Client, "ada@example.com")
}

fn claims_for(user: &AuthenticatedUser) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        subject: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role,
        issued_at: now,
        expires_at: now + TimeDelta::hours(1),
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {token}"))
}
