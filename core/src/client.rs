//! Stateless request builder for the Matrix client-server r0 API.
//!
//! # Design
//! `Client` holds only a `base_url` and carries no mutable state between
//! calls. Every operation is a pure method producing a [`Request`]
//! descriptor — no I/O, no validation beyond what the type system enforces.
//! The caller (usually a [`Dispatcher`](crate::dispatch::Dispatcher))
//! executes the HTTP round-trip, keeping the builder deterministic and free
//! of transport dependencies.
//!
//! Shared construction rules:
//! - Method and path are fixed per operation; only embedded identifiers vary,
//!   and each one passes through [`encode_path_segment`] exactly once.
//! - Authenticated operations take `token` and add a single
//!   `authorization: Bearer` header; anonymous operations never do.
//! - Option maps merge into the body with required-fields-win semantics, or
//!   into the query parameters (sorted by key) for read operations.

use serde_json::{Map, Value};

use crate::auth::Auth;
use crate::encode::encode_path_segment;
use crate::events::{RoomEvent, StateEvent};
use crate::http::{Method, Request};

const R0: &str = "/_matrix/client/r0";

/// Stateless builder for Matrix client-server API requests.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -----------------------------------------------------------------
    // Server administration and discovery
    // -----------------------------------------------------------------

    /// GET `/_matrix/client/versions` — supported spec versions. Anonymous.
    pub fn spec_versions(&self) -> Request {
        self.get("/_matrix/client/versions".to_string())
    }

    /// GET `/.well-known/matrix/client` — homeserver discovery. Anonymous.
    pub fn server_discovery(&self) -> Request {
        self.get("/.well-known/matrix/client".to_string())
    }

    /// GET `/capabilities` — capabilities of this server.
    pub fn server_capabilities(&self, token: &str) -> Request {
        bearer(self.get(format!("{R0}/capabilities")), token)
    }

    // -----------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------

    /// GET `/login` — the login flows the server supports. Anonymous.
    pub fn login_flows(&self) -> Request {
        self.get(format!("{R0}/login"))
    }

    /// POST `/login` — authenticate and obtain an access token. Anonymous.
    ///
    /// The auth payload's keys are required and cannot be overridden by
    /// `opts` (`device_id`, `initial_device_display_name`).
    pub fn login(&self, auth: &Auth, opts: Map<String, Value>) -> Request {
        let mut req = self.post(format!("{R0}/login"));
        req.body = auth.to_json();
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/logout` — invalidate the access token.
    pub fn logout(&self, token: &str) -> Request {
        bearer(self.post(format!("{R0}/logout")), token)
    }

    /// POST `/logout/all` — invalidate every access token of the account.
    pub fn logout_all(&self, token: &str) -> Request {
        bearer(self.post(format!("{R0}/logout/all")), token)
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    /// POST `/register?kind=guest` — register a guest account. Anonymous.
    ///
    /// The `?kind=guest` suffix is part of the fixed wire path, not a query
    /// parameter entry.
    pub fn register_guest(&self, opts: Map<String, Value>) -> Request {
        let mut req = self.post(format!("{R0}/register?kind=guest"));
        req.body = opts;
        req
    }

    /// POST `/register` — register a user account with a dummy auth stage.
    /// Anonymous. `opts`: `username`, `device_id`,
    /// `initial_device_display_name`, `inhibit_login`.
    pub fn register_user(&self, password: &str, opts: Map<String, Value>) -> Request {
        let mut req = self.post(format!("{R0}/register"));
        req.body.insert("auth".to_string(), Value::Object(Auth::dummy().to_json()));
        req.body.insert("password".to_string(), password.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/register/email/requestToken` — request an email validation
    /// token for registration. Anonymous. `opts`: `next_link`.
    pub fn registration_email_token(
        &self,
        client_secret: &str,
        email: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = self.post(format!("{R0}/register/email/requestToken"));
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("email".to_string(), email.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/register/msisdn/requestToken` — request a phone validation
    /// token for registration. Anonymous. `opts`: `next_link`.
    pub fn registration_msisdn_token(
        &self,
        client_secret: &str,
        country: &str,
        phone: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = self.post(format!("{R0}/register/msisdn/requestToken"));
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("country".to_string(), country.into());
        req.body.insert("phone_number".to_string(), phone.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// GET `/register/available` — check whether a username is available.
    /// Anonymous. The username travels as an (encoded) query parameter.
    pub fn username_availability(&self, username: &str) -> Request {
        let mut req = self.get(format!("{R0}/register/available"));
        set_query(&mut req, vec![("username".to_string(), username.to_string())]);
        req
    }

    // -----------------------------------------------------------------
    // Account management
    // -----------------------------------------------------------------

    /// POST `/account/password` — change the account password.
    /// `opts`: `logout_devices`.
    pub fn change_password(
        &self,
        new_password: &str,
        auth: &Auth,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = self.post(format!("{R0}/account/password"));
        req.body.insert("new_password".to_string(), new_password.into());
        req.body.insert("auth".to_string(), Value::Object(auth.to_json()));
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/password/email/requestToken`. Anonymous.
    pub fn password_email_token(
        &self,
        client_secret: &str,
        email: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = self.post(format!("{R0}/account/password/email/requestToken"));
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("email".to_string(), email.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/password/msisdn/requestToken`. Anonymous.
    pub fn password_msisdn_token(
        &self,
        client_secret: &str,
        country: &str,
        phone: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = self.post(format!("{R0}/account/password/msisdn/requestToken"));
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("country".to_string(), country.into());
        req.body.insert("phone_number".to_string(), phone.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/deactivate` — deactivate the account.
    /// `opts`: `auth`, `id_server`.
    pub fn deactivate_account(&self, token: &str, opts: Map<String, Value>) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/deactivate")), token);
        req.body = opts;
        req
    }

    // -----------------------------------------------------------------
    // Third-party identifiers
    // -----------------------------------------------------------------

    /// GET `/account/3pid` — list bound third-party identifiers.
    pub fn account_3pids(&self, token: &str) -> Request {
        bearer(self.get(format!("{R0}/account/3pid")), token)
    }

    /// POST `/account/3pid/add` — add a validated 3pid to the account.
    /// `opts`: `auth`.
    pub fn account_add_3pid(
        &self,
        token: &str,
        client_secret: &str,
        sid: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/add")), token);
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("sid".to_string(), sid.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/3pid/bind` — bind a 3pid through an identity server.
    pub fn account_bind_3pid(
        &self,
        token: &str,
        client_secret: &str,
        id_server: &str,
        id_access_token: &str,
        sid: &str,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/bind")), token);
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("id_server".to_string(), id_server.into());
        req.body.insert("id_access_token".to_string(), id_access_token.into());
        req.body.insert("sid".to_string(), sid.into());
        req
    }

    /// POST `/account/3pid/delete` — remove a 3pid from the account.
    /// `opts`: `id_server`.
    pub fn account_delete_3pid(
        &self,
        token: &str,
        medium: &str,
        address: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/delete")), token);
        req.body.insert("medium".to_string(), medium.into());
        req.body.insert("address".to_string(), address.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/3pid/unbind` — unbind a 3pid from an identity server
    /// without removing it from the account. `opts`: `id_server`.
    pub fn account_unbind_3pid(
        &self,
        token: &str,
        medium: &str,
        address: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/unbind")), token);
        req.body.insert("medium".to_string(), medium.into());
        req.body.insert("address".to_string(), address.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/3pid/email/requestToken`. `opts`: `next_link`.
    pub fn account_email_token(
        &self,
        token: &str,
        client_secret: &str,
        email: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/email/requestToken")), token);
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("email".to_string(), email.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/account/3pid/msisdn/requestToken`. `opts`: `next_link`.
    pub fn account_msisdn_token(
        &self,
        token: &str,
        client_secret: &str,
        country: &str,
        phone: &str,
        send_attempt: u64,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/account/3pid/msisdn/requestToken")), token);
        req.body.insert("client_secret".to_string(), client_secret.into());
        req.body.insert("country".to_string(), country.into());
        req.body.insert("phone_number".to_string(), phone.into());
        req.body.insert("send_attempt".to_string(), send_attempt.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// GET `/account/whoami` — the user id owning this access token.
    pub fn whoami(&self, token: &str) -> Request {
        bearer(self.get(format!("{R0}/account/whoami")), token)
    }

    // -----------------------------------------------------------------
    // Sync and room event retrieval
    // -----------------------------------------------------------------

    /// GET `/sync` — poll for events. `opts` (`filter`, `since`,
    /// `full_state`, `set_presence`, `timeout`) become query parameters.
    pub fn sync(&self, token: &str, opts: Map<String, Value>) -> Request {
        let mut req = bearer(self.get(format!("{R0}/sync")), token);
        set_query(&mut req, query_pairs(&opts));
        req
    }

    /// GET `/rooms/{room_id}/event/{event_id}` — a single event.
    pub fn room_event(&self, token: &str, room_id: &str, event_id: &str) -> Request {
        bearer(
            self.get(format!(
                "{R0}/rooms/{}/event/{}",
                encode_path_segment(room_id),
                encode_path_segment(event_id)
            )),
            token,
        )
    }

    /// GET `/rooms/{room_id}/state/{event_type}/{state_key}` — current
    /// content of one state event. The event type is caller-supplied here,
    /// so it is encoded like any other identifier.
    pub fn room_state_event(
        &self,
        token: &str,
        room_id: &str,
        event_type: &str,
        state_key: &str,
    ) -> Request {
        bearer(
            self.get(format!(
                "{R0}/rooms/{}/state/{}/{}",
                encode_path_segment(room_id),
                encode_path_segment(event_type),
                encode_path_segment(state_key)
            )),
            token,
        )
    }

    /// GET `/rooms/{room_id}/state` — all current state of a room.
    pub fn room_state(&self, token: &str, room_id: &str) -> Request {
        bearer(
            self.get(format!("{R0}/rooms/{}/state", encode_path_segment(room_id))),
            token,
        )
    }

    /// GET `/rooms/{room_id}/members` — room membership list.
    /// `opts`: `at`, `membership`, `not_membership`.
    pub fn room_members(&self, token: &str, room_id: &str, opts: Map<String, Value>) -> Request {
        let mut req = bearer(
            self.get(format!("{R0}/rooms/{}/members", encode_path_segment(room_id))),
            token,
        );
        set_query(&mut req, query_pairs(&opts));
        req
    }

    /// GET `/rooms/{room_id}/joined_members` — joined members keyed by id.
    pub fn room_joined_members(&self, token: &str, room_id: &str) -> Request {
        bearer(
            self.get(format!(
                "{R0}/rooms/{}/joined_members",
                encode_path_segment(room_id)
            )),
            token,
        )
    }

    /// GET `/rooms/{room_id}/messages` — paginate message history.
    /// `from` and `dir` are required query parameters; `opts` (`to`,
    /// `limit`, `filter`) merge into the query.
    pub fn room_messages(
        &self,
        token: &str,
        room_id: &str,
        from: &str,
        dir: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(
            self.get(format!("{R0}/rooms/{}/messages", encode_path_segment(room_id))),
            token,
        );
        let mut pairs = vec![
            ("from".to_string(), from.to_string()),
            ("dir".to_string(), dir.to_string()),
        ];
        pairs.extend(query_pairs(&opts));
        set_query(&mut req, pairs);
        req
    }

    // -----------------------------------------------------------------
    // Room state write and event send
    // -----------------------------------------------------------------

    /// PUT `/rooms/{room_id}/state/{event_type}/{state_key}` — write a
    /// state event. Latest write wins per `(type, state_key)`.
    pub fn send_state_event(&self, token: &str, event: &StateEvent) -> Request {
        let mut req = bearer(self.put(event.path()), token);
        req.body = event.content.clone();
        req
    }

    /// PUT `/rooms/{room_id}/send/{event_type}/{txn_id}` — send a timeline
    /// event. The transaction id is the caller's idempotency key; the server
    /// deduplicates retried sends by it.
    pub fn send_room_event(&self, token: &str, event: &RoomEvent) -> Request {
        let mut req = bearer(
            self.put(format!(
                "{R0}/rooms/{}/send/{}/{}",
                encode_path_segment(&event.room_id),
                encode_path_segment(&event.event_type),
                encode_path_segment(&event.transaction_id)
            )),
            token,
        );
        req.body = event.content.clone();
        req
    }

    /// PUT `/rooms/{room_id}/redact/{event_id}/{txn_id}` — redact an event.
    /// `opts`: `reason`.
    pub fn redact_room_event(
        &self,
        token: &str,
        room_id: &str,
        event_id: &str,
        transaction_id: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(
            self.put(format!(
                "{R0}/rooms/{}/redact/{}/{}",
                encode_path_segment(room_id),
                encode_path_segment(event_id),
                encode_path_segment(transaction_id)
            )),
            token,
        );
        req.body = opts;
        req
    }

    // -----------------------------------------------------------------
    // Room creation and listing
    // -----------------------------------------------------------------

    /// POST `/createRoom`. `opts`: `visibility`, `room_alias_name`, `name`,
    /// `topic`, `invite`, `preset`, ...
    pub fn create_room(&self, token: &str, opts: Map<String, Value>) -> Request {
        let mut req = bearer(self.post(format!("{R0}/createRoom")), token);
        req.body = opts;
        req
    }

    /// GET `/joined_rooms` — rooms this user has joined.
    pub fn joined_rooms(&self, token: &str) -> Request {
        bearer(self.get(format!("{R0}/joined_rooms")), token)
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    /// POST `/rooms/{room_id}/invite` — invite a user to a room.
    pub fn room_invite(&self, token: &str, room_id: &str, user_id: &str) -> Request {
        let mut req = bearer(
            self.post(format!("{R0}/rooms/{}/invite", encode_path_segment(room_id))),
            token,
        );
        req.body.insert("user_id".to_string(), user_id.into());
        req
    }

    /// POST `/join/{room_id_or_alias}` — join by room id or alias.
    /// `opts`: `third_party_signed`.
    pub fn join_room(&self, token: &str, room_id_or_alias: &str, opts: Map<String, Value>) -> Request {
        let mut req = bearer(
            self.post(format!("{R0}/join/{}", encode_path_segment(room_id_or_alias))),
            token,
        );
        req.body = opts;
        req
    }

    /// POST `/rooms/{room_id}/leave`.
    pub fn leave_room(&self, token: &str, room_id: &str) -> Request {
        bearer(
            self.post(format!("{R0}/rooms/{}/leave", encode_path_segment(room_id))),
            token,
        )
    }

    /// POST `/rooms/{room_id}/forget` — discard local history of a left room.
    pub fn forget_room(&self, token: &str, room_id: &str) -> Request {
        bearer(
            self.post(format!("{R0}/rooms/{}/forget", encode_path_segment(room_id))),
            token,
        )
    }

    /// POST `/rooms/{room_id}/kick`. `opts`: `reason`.
    pub fn room_kick(
        &self,
        token: &str,
        room_id: &str,
        user_id: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(
            self.post(format!("{R0}/rooms/{}/kick", encode_path_segment(room_id))),
            token,
        );
        req.body.insert("user_id".to_string(), user_id.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/rooms/{room_id}/ban`. `opts`: `reason`.
    pub fn room_ban(
        &self,
        token: &str,
        room_id: &str,
        user_id: &str,
        opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(
            self.post(format!("{R0}/rooms/{}/ban", encode_path_segment(room_id))),
            token,
        );
        req.body.insert("user_id".to_string(), user_id.into());
        merge_opts(&mut req.body, opts);
        req
    }

    /// POST `/rooms/{room_id}/unban`.
    pub fn room_unban(&self, token: &str, room_id: &str, user_id: &str) -> Request {
        let mut req = bearer(
            self.post(format!("{R0}/rooms/{}/unban", encode_path_segment(room_id))),
            token,
        );
        req.body.insert("user_id".to_string(), user_id.into());
        req
    }

    // -----------------------------------------------------------------
    // Room directory and visibility
    // -----------------------------------------------------------------

    /// GET `/directory/list/room/{room_id}` — directory visibility of a
    /// room. Anonymous.
    pub fn room_visibility(&self, room_id: &str) -> Request {
        self.get(format!(
            "{R0}/directory/list/room/{}",
            encode_path_segment(room_id)
        ))
    }

    /// PUT `/directory/list/room/{room_id}` — set directory visibility.
    pub fn set_room_visibility(&self, token: &str, room_id: &str, visibility: &str) -> Request {
        let mut req = bearer(
            self.put(format!(
                "{R0}/directory/list/room/{}",
                encode_path_segment(room_id)
            )),
            token,
        );
        req.body.insert("visibility".to_string(), visibility.into());
        req
    }

    /// GET `/publicRooms` — list the public room directory. Anonymous.
    /// `opts` (`limit`, `since`, `server`) become query parameters.
    pub fn public_rooms(&self, opts: Map<String, Value>) -> Request {
        let mut req = self.get(format!("{R0}/publicRooms"));
        set_query(&mut req, query_pairs(&opts));
        req
    }

    /// POST `/publicRooms` — list public rooms with server-side filtering.
    ///
    /// The `filters` map becomes the entire request body rather than being
    /// merged key-by-key; this asymmetry is part of the protocol. An
    /// optional `server` routes the query to another homeserver's directory.
    pub fn public_rooms_filtered(
        &self,
        token: &str,
        filters: Map<String, Value>,
        server: Option<&str>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/publicRooms")), token);
        if let Some(server) = server {
            set_query(&mut req, vec![("server".to_string(), server.to_string())]);
        }
        req.body = filters;
        req
    }

    // -----------------------------------------------------------------
    // User directory
    // -----------------------------------------------------------------

    /// POST `/user_directory/search` — search users by display name or id.
    ///
    /// `opts`: `limit` merges into the body; a `language` option becomes an
    /// `accept-language` header instead of a body field.
    pub fn user_directory_search(
        &self,
        token: &str,
        search_term: &str,
        mut opts: Map<String, Value>,
    ) -> Request {
        let mut req = bearer(self.post(format!("{R0}/user_directory/search")), token);
        if let Some(language) = opts.remove("language") {
            req.headers
                .push(("accept-language".to_string(), scalar_to_string(&language)));
        }
        req.body.insert("search_term".to_string(), search_term.into());
        merge_opts(&mut req.body, opts);
        req
    }

    // -----------------------------------------------------------------
    // User profile
    // -----------------------------------------------------------------

    /// PUT `/profile/{user_id}/displayname`.
    pub fn set_display_name(&self, token: &str, user_id: &str, display_name: &str) -> Request {
        let mut req = bearer(
            self.put(format!(
                "{R0}/profile/{}/displayname",
                encode_path_segment(user_id)
            )),
            token,
        );
        req.body.insert("displayname".to_string(), display_name.into());
        req
    }

    /// GET `/profile/{user_id}/displayname`. Anonymous.
    pub fn display_name(&self, user_id: &str) -> Request {
        self.get(format!(
            "{R0}/profile/{}/displayname",
            encode_path_segment(user_id)
        ))
    }

    /// PUT `/profile/{user_id}/avatar_url`.
    pub fn set_avatar_url(&self, token: &str, user_id: &str, avatar_url: &str) -> Request {
        let mut req = bearer(
            self.put(format!(
                "{R0}/profile/{}/avatar_url",
                encode_path_segment(user_id)
            )),
            token,
        );
        req.body.insert("avatar_url".to_string(), avatar_url.into());
        req
    }

    /// GET `/profile/{user_id}/avatar_url`. Anonymous.
    pub fn avatar_url(&self, user_id: &str) -> Request {
        self.get(format!(
            "{R0}/profile/{}/avatar_url",
            encode_path_segment(user_id)
        ))
    }

    /// GET `/profile/{user_id}` — combined profile. Anonymous.
    pub fn user_profile(&self, user_id: &str) -> Request {
        self.get(format!("{R0}/profile/{}", encode_path_segment(user_id)))
    }

    // -----------------------------------------------------------------
    // Shared construction
    // -----------------------------------------------------------------

    fn request(&self, method: Method, path: String) -> Request {
        Request {
            method,
            base_url: self.base_url.clone(),
            path,
            query_params: Vec::new(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: Map::new(),
        }
    }

    fn get(&self, path: String) -> Request {
        self.request(Method::Get, path)
    }

    fn post(&self, path: String) -> Request {
        let mut req = self.request(Method::Post, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req
    }

    fn put(&self, path: String) -> Request {
        let mut req = self.request(Method::Put, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req
    }
}

/// Add the bearer authorization header. Builder methods call this at most
/// once per request.
fn bearer(mut request: Request, token: &str) -> Request {
    request
        .headers
        .push(("authorization".to_string(), format!("Bearer {token}")));
    request
}

/// Merge options into a body with required-fields-win semantics: keys the
/// builder already set are never overwritten.
fn merge_opts(body: &mut Map<String, Value>, opts: Map<String, Value>) {
    for (key, value) in opts {
        body.entry(key).or_insert(value);
    }
}

/// Convert an options map into query pairs; strings verbatim, other scalars
/// via their JSON rendering.
fn query_pairs(opts: &Map<String, Value>) -> Vec<(String, String)> {
    opts.iter()
        .map(|(k, v)| (k.clone(), scalar_to_string(v)))
        .collect()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Install query parameters sorted by key, so descriptors compare
/// deterministically.
fn set_query(request: &mut Request, mut pairs: Vec<(String, String)>) {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    request.query_params = pairs;
}
