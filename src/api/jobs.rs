//! Backup jobs and their runs.

// self
use crate::{
	_prelude::*,
	api::{AccountId, Extra, JobId, RunId, SourceId, Timestamp},
	client::{ApiClient, ApiRequest},
	transport::HttpTransport,
};

/// Scheduled backup of a data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJob {
	/// Server-assigned identifier.
	pub job_id: JobId,
	/// Owning account.
	#[serde(default)]
	pub account_id: Option<AccountId>,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Source the job backs up.
	#[serde(default)]
	pub source_id: Option<SourceId>,
	/// Schedule expression, when the job is recurring.
	#[serde(default)]
	pub schedule: Option<String>,
	/// Backend lifecycle status.
	#[serde(default)]
	pub status: Option<String>,
	/// Start time of the latest run.
	#[serde(default)]
	pub last_run_at: Option<Timestamp>,
	/// Next scheduled start.
	#[serde(default)]
	pub next_run_at: Option<Timestamp>,
	/// Creation time.
	#[serde(default)]
	pub created_at: Option<Timestamp>,
	/// Last modification time.
	#[serde(default)]
	pub updated_at: Option<Timestamp>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// One execution of a backup job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRun {
	/// Server-assigned identifier.
	pub run_id: RunId,
	/// Job that produced the run.
	#[serde(default)]
	pub job_id: Option<JobId>,
	/// Owning account.
	#[serde(default)]
	pub account_id: Option<AccountId>,
	/// Run status (`pending`, `running`, `completed`, `failed`).
	#[serde(default)]
	pub status: Option<String>,
	/// Records written so far.
	#[serde(default)]
	pub records_processed: Option<u64>,
	/// Failure description.
	#[serde(default)]
	pub error: Option<String>,
	/// Start time.
	#[serde(default)]
	pub started_at: Option<Timestamp>,
	/// Completion time.
	#[serde(default)]
	pub completed_at: Option<Timestamp>,
	/// Creation time.
	#[serde(default)]
	pub created_at: Option<Timestamp>,
	/// Fields not modeled explicitly.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Payload for `POST /jobs`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
	/// Display name.
	pub name: String,
	/// Source to back up.
	pub source_id: SourceId,
	/// Schedule expression; omitted for manual jobs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schedule: Option<String>,
	/// Job-specific settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settings: Option<serde_json::Value>,
}

/// Payload for `PUT /jobs/{id}`; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New schedule expression.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schedule: Option<String>,
	/// New lifecycle status (`active`, `paused`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Replacement settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settings: Option<serde_json::Value>,
}

/// Handle for `/jobs` endpoints.
pub struct JobsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) client: &'a ApiClient<T>,
}
impl<T> JobsApi<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// `GET /jobs`.
	pub async fn list(&self) -> Result<Vec<BackupJob>> {
		self.client.fetch(ApiRequest::get("/jobs")).await
	}

	/// `GET /jobs/{id}`.
	pub async fn get(&self, id: &JobId) -> Result<BackupJob> {
		self.client.fetch(ApiRequest::get(format!("/jobs/{id}"))).await
	}

	/// `POST /jobs`.
	pub async fn create(&self, job: &NewJob) -> Result<BackupJob> {
		self.client.fetch(ApiRequest::post("/jobs").with_json(job)?).await
	}

	/// `PUT /jobs/{id}`.
	pub async fn update(&self, id: &JobId, update: &JobUpdate) -> Result<BackupJob> {
		self.client.fetch(ApiRequest::put(format!("/jobs/{id}")).with_json(update)?).await
	}

	/// `DELETE /jobs/{id}`.
	pub async fn delete(&self, id: &JobId) -> Result<()> {
		self.client.fetch_unit(ApiRequest::delete(format!("/jobs/{id}"))).await
	}

	/// `POST /jobs/{id}/run`: starts the job now.
	pub async fn run(&self, id: &JobId) -> Result<JobRun> {
		self.client.fetch(ApiRequest::post(format!("/jobs/{id}/run"))).await
	}

	/// `GET /jobs/{id}/runs`: run history, newest first.
	pub async fn runs(&self, id: &JobId, limit: Option<u32>) -> Result<Vec<JobRun>> {
		let request = ApiRequest::get(format!("/jobs/{id}/runs")).with_optional_query("limit", limit);

		self.client.fetch(request).await
	}
}
