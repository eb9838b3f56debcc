#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use listbackup_client::{
	_preludet::*,
	auth::{RegisterRequest, SessionEvent, UnauthenticatedReason},
	store::{StoreKey, TokenStore},
};

fn stored(store: &dyn TokenStore, key: StoreKey) -> Option<String> {
	store.get(key).expect("Store read should succeed.")
}

#[tokio::test]
async fn login_stores_session_from_envelope() {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_reqwest_test_client(test_config(&server.base_url()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({ "email": "ops@example.com", "password": "hunter2" }));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"accessToken\":\"T1\",\"refreshToken\":\"R1\",\"user\":{\"userId\":\"u1\",\"email\":\"ops@example.com\"}}}",
			);
		})
		.await;
	let response = client
		.auth()
		.login("ops@example.com", "hunter2")
		.await
		.expect("Login should succeed.");

	mock.assert_async().await;

	assert_eq!(response.session.access_token.expose(), "T1");
	assert_eq!(response.user.map(|user| user.user_id.to_string()).as_deref(), Some("u1"));
	assert_eq!(stored(&*store, StoreKey::AccessToken).as_deref(), Some("T1"));
	assert_eq!(stored(&*store, StoreKey::ServiceToken).as_deref(), Some("T1"));
	assert_eq!(stored(&*store, StoreKey::RefreshToken).as_deref(), Some("R1"));
	assert_eq!(listener.events(), vec![SessionEvent::Established]);
}

#[tokio::test]
async fn register_replaces_previous_session() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_tokens(&*store, "old-access", Some("old-refresh"));

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register").json_body(serde_json::json!({
				"email": "new@example.com",
				"password": "s3cret",
				"name": "New User",
				"company": "Acme",
			}));
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"T9\"}");
		})
		.await;
	let request = RegisterRequest {
		email: "new@example.com".into(),
		password: "s3cret".into(),
		name: "New User".into(),
		company: Some("Acme".into()),
	};

	client.auth().register(&request).await.expect("Register should succeed.");
	mock.assert_async().await;

	assert_eq!(stored(&*store, StoreKey::AccessToken).as_deref(), Some("T9"));
	assert_eq!(stored(&*store, StoreKey::RefreshToken), None);
}

#[tokio::test]
async fn rejected_login_envelope_keeps_store_untouched() {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_reqwest_test_client(test_config(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"error\":\"Invalid credentials\"}");
		})
		.await;

	let err = client.auth().login("ops@example.com", "wrong").await.expect_err("Login should fail.");

	assert!(matches!(err, Error::Rejected { ref message } if message == "Invalid credentials"));
	assert!(store.is_empty());
	assert!(listener.events().is_empty());
}

#[tokio::test]
async fn auth_unauthorized_is_terminal() {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_tokens(&*store, "T0", Some("R0"));

	let status = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/status").header("authorization", "Bearer T0");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body("{\"accessToken\":\"T1\"}");
		})
		.await;
	let err = client.auth().status().await.expect_err("Status should fail.");

	status.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.status(), Some(401));
	assert!(store.is_empty());
	assert_eq!(listener.events(), vec![SessionEvent::Unauthenticated {
		redirect_to: "/login".into(),
		reason: UnauthenticatedReason::AuthRejected,
	}]);
}

#[tokio::test]
async fn logout_clears_store_even_when_backend_fails() {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_tokens(&*store, "T0", Some("R0"));

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer T0");
			then.status(500).body("{\"error\":\"Session table unavailable\"}");
		})
		.await;
	let err = client.auth().logout().await.expect_err("Backend failure should surface.");

	mock.assert_async().await;

	assert_eq!(err.status(), Some(500));
	assert!(store.is_empty());
	assert_eq!(listener.events(), vec![SessionEvent::LoggedOut]);
}

#[tokio::test]
async fn status_reports_authenticated_user() {
	let server = MockServer::start_async().await;
	let (client, store, _) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_tokens(&*store, "T0", Some("R0"));
	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/status");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"authenticated\":true,\"user\":{\"userId\":\"u1\",\"email\":\"ops@example.com\",\"currentAccountId\":\"acc1\"}}}",
			);
		})
		.await;

	let status = client.auth().status().await.expect("Status should succeed.");
	let user = status.user.expect("Status should include the user.");

	assert!(status.authenticated);
	assert_eq!(user.current_account_id.as_deref(), Some("acc1"));
}

#[tokio::test]
async fn unauthorized_logout_reports_only_the_logout() {
	let server = MockServer::start_async().await;
	let (client, store, listener) = build_reqwest_test_client(test_config(&server.base_url()));

	seed_tokens(&*store, "T0", Some("R0"));

	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer T0");
			then.status(401).body("{\"error\":\"Session already revoked\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body("{\"accessToken\":\"T1\"}");
		})
		.await;
	let err = client.auth().logout().await.expect_err("Rejected logout should surface.");

	logout.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.status(), Some(401));
	assert!(store.is_empty());
	assert_eq!(listener.events(), vec![SessionEvent::LoggedOut]);
}
