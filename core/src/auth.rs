//! Authentication payload helpers.
//!
//! # Design
//! Login and user-interactive-auth payloads are built from a closed set of
//! mechanisms, each mapping to a fixed protocol `type` string. `Auth` keeps
//! the mechanism and the optional in-progress session id separate so that a
//! multi-step flow can attach the session to any mechanism with
//! [`Auth::with_session`]. `to_json` produces exactly the wire shape — a
//! token auth serializes to `{type, token}` and nothing else.

use serde_json::{json, Map, Value};

/// Identifier carried by a password login, naming the account to
/// authenticate as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    /// `m.id.user`: a localpart or full user id.
    User { user: String },
    /// `m.id.thirdparty`: a bound third-party identifier (email or msisdn).
    ThirdParty { medium: String, address: String },
    /// `m.id.phone`: a phone number split into country code and number.
    Phone { country: String, phone: String },
}

impl UserIdentifier {
    pub fn user(user: &str) -> Self {
        UserIdentifier::User { user: user.to_string() }
    }

    pub fn third_party(medium: &str, address: &str) -> Self {
        UserIdentifier::ThirdParty {
            medium: medium.to_string(),
            address: address.to_string(),
        }
    }

    pub fn phone(country: &str, phone: &str) -> Self {
        UserIdentifier::Phone {
            country: country.to_string(),
            phone: phone.to_string(),
        }
    }

    /// Wire shape of the identifier, including its `type` tag.
    pub fn to_json(&self) -> Value {
        match self {
            UserIdentifier::User { user } => json!({ "type": "m.id.user", "user": user }),
            UserIdentifier::ThirdParty { medium, address } => {
                json!({ "type": "m.id.thirdparty", "medium": medium, "address": address })
            }
            UserIdentifier::Phone { country, phone } => {
                json!({ "type": "m.id.phone", "country": country, "phone": phone })
            }
        }
    }
}

/// Authentication mechanism, each mapping to a fixed protocol `type` string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AuthKind {
    /// `m.login.dummy`: no credential, used to satisfy a trivial UIA stage.
    Dummy,
    /// `m.login.token`: a one-time login token.
    Token { token: String },
    /// `m.login.password`: password plus an identifier naming the account.
    Password { identifier: UserIdentifier, password: String },
    /// `m.login.recaptcha`: a captcha response.
    Recaptcha { response: String },
    /// `m.login.email.identity`: a validated third-party identifier session.
    EmailIdentity { sid: String, client_secret: String },
}

/// An authentication payload: mechanism plus optional UIA session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    kind: AuthKind,
    session: Option<String>,
}

impl Auth {
    pub fn dummy() -> Self {
        Self { kind: AuthKind::Dummy, session: None }
    }

    pub fn token(token: &str) -> Self {
        Self {
            kind: AuthKind::Token { token: token.to_string() },
            session: None,
        }
    }

    pub fn password(identifier: UserIdentifier, password: &str) -> Self {
        Self {
            kind: AuthKind::Password {
                identifier,
                password: password.to_string(),
            },
            session: None,
        }
    }

    /// Password login identified by localpart or full user id.
    pub fn user_password(user: &str, password: &str) -> Self {
        Self::password(UserIdentifier::user(user), password)
    }

    pub fn recaptcha(response: &str) -> Self {
        Self {
            kind: AuthKind::Recaptcha { response: response.to_string() },
            session: None,
        }
    }

    /// A validated email third-party-identifier credential, referencing the
    /// validation session (`sid`) and the client secret used during it.
    pub fn email_identity(sid: &str, client_secret: &str) -> Self {
        Self {
            kind: AuthKind::EmailIdentity {
                sid: sid.to_string(),
                client_secret: client_secret.to_string(),
            },
            session: None,
        }
    }

    /// Attach the in-progress UIA session id reported by the server.
    pub fn with_session(mut self, session: &str) -> Self {
        self.session = Some(session.to_string());
        self
    }

    /// Wire shape of the payload: `type`, mechanism fields, and `session`
    /// when one was attached.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match &self.kind {
            AuthKind::Dummy => {
                map.insert("type".to_string(), "m.login.dummy".into());
            }
            AuthKind::Token { token } => {
                map.insert("type".to_string(), "m.login.token".into());
                map.insert("token".to_string(), token.as_str().into());
            }
            AuthKind::Password { identifier, password } => {
                map.insert("type".to_string(), "m.login.password".into());
                map.insert("identifier".to_string(), identifier.to_json());
                map.insert("password".to_string(), password.as_str().into());
            }
            AuthKind::Recaptcha { response } => {
                map.insert("type".to_string(), "m.login.recaptcha".into());
                map.insert("response".to_string(), response.as_str().into());
            }
            AuthKind::EmailIdentity { sid, client_secret } => {
                map.insert("type".to_string(), "m.login.email.identity".into());
                map.insert(
                    "threepid_creds".to_string(),
                    json!({ "sid": sid, "client_secret": client_secret }),
                );
            }
        }
        if let Some(session) = &self.session {
            map.insert("session".to_string(), session.as_str().into());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_wire_shape() {
        let json = Value::Object(Auth::dummy().to_json());
        assert_eq!(json, json!({ "type": "m.login.dummy" }));
    }

    #[test]
    fn token_wire_shape_has_no_extraneous_keys() {
        let json = Value::Object(Auth::token("abc").to_json());
        assert_eq!(json, json!({ "type": "m.login.token", "token": "abc" }));
    }

    #[test]
    fn password_wire_shape_with_user_identifier() {
        let json = Value::Object(Auth::user_password("alice", "wonderland").to_json());
        assert_eq!(
            json,
            json!({
                "type": "m.login.password",
                "identifier": { "type": "m.id.user", "user": "alice" },
                "password": "wonderland"
            })
        );
    }

    #[test]
    fn password_wire_shape_with_phone_identifier() {
        let auth = Auth::password(UserIdentifier::phone("GB", "7700900000"), "pw");
        let json = Value::Object(auth.to_json());
        assert_eq!(
            json["identifier"],
            json!({ "type": "m.id.phone", "country": "GB", "phone": "7700900000" })
        );
    }

    #[test]
    fn third_party_identifier_wire_shape() {
        let json = UserIdentifier::third_party("email", "alice@example.org").to_json();
        assert_eq!(
            json,
            json!({ "type": "m.id.thirdparty", "medium": "email", "address": "alice@example.org" })
        );
    }

    #[test]
    fn recaptcha_wire_shape() {
        let json = Value::Object(Auth::recaptcha("captcha-response").to_json());
        assert_eq!(
            json,
            json!({ "type": "m.login.recaptcha", "response": "captcha-response" })
        );
    }

    #[test]
    fn email_identity_wire_shape() {
        let json = Value::Object(Auth::email_identity("sid1", "secret").to_json());
        assert_eq!(
            json,
            json!({
                "type": "m.login.email.identity",
                "threepid_creds": { "sid": "sid1", "client_secret": "secret" }
            })
        );
    }

    #[test]
    fn with_session_attaches_session_to_any_kind() {
        let json = Value::Object(Auth::dummy().with_session("xyz").to_json());
        assert_eq!(json, json!({ "type": "m.login.dummy", "session": "xyz" }));

        let json = Value::Object(Auth::recaptcha("r").with_session("xyz").to_json());
        assert_eq!(json["session"], "xyz");
    }
}
