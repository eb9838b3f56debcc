//! Logs in against a mock ListBackup backend, lets the first source listing hit an expired
//! token, and shows the client refreshing the session before retrying the request.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use listbackup_client::{
	ReqwestApiClient,
	auth::SessionEvent,
	config::ClientConfig,
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"accessToken\":\"expired-access\",\"refreshToken\":\"demo-refresh\"}}",
			);
		})
		.await;
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/sources").header("authorization", "Bearer expired-access");
			then.status(401).body("{\"error\":\"Token expired\"}");
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.json_body(serde_json::json!({ "refreshToken": "demo-refresh" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"fresh-access\"}");
		})
		.await;
	let sources_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/sources").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":[{\"sourceId\":\"src-keap\",\"name\":\"Keap CRM\"}]}",
			);
		})
		.await;
	let base_url = Url::parse(&server.base_url())?;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let client = ReqwestApiClient::new(ClientConfig::new(base_url.clone(), base_url), store)
		.with_listener(|event: &SessionEvent| println!("Session event: {}.", event.as_str()));

	client.auth().login("ops@example.com", "hunter2").await?;

	for source in client.sources().list().await? {
		println!("Backed-up source {}: {}.", source.source_id, source.name);
	}

	println!("Refresh attempts: {}.", client.refresh.metrics().attempts());

	for mock in [login_mock, stale_mock, refresh_mock, sources_mock] {
		mock.assert_async().await;
	}

	Ok(())
}
