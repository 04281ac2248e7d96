//! Booking creation, dashboards, and status updates.
//!
//! Booking status is a flat set of backend-owned labels mutated through
//! direct PATCH calls; the client performs no transition validation and a
//! wrapper type keeps unknown labels readable instead of rejecting them.

// self
use crate::{_prelude::*, client::ApiClient};

/// Backend-owned booking status label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingStatus(String);
impl BookingStatus {
	/// Awaiting employee response.
	pub const PENDING: &'static str = "pending";
	/// Accepted by the employee.
	pub const CONFIRMED: &'static str = "confirmed";
	/// Work underway.
	pub const IN_PROGRESS: &'static str = "in_progress";
	/// Work abandoned before completion.
	pub const INCOMPLETED: &'static str = "incompleted";
	/// Canceled by either side.
	pub const CANCELED: &'static str = "canceled";
	/// Work finished.
	pub const COMPLETED: &'static str = "completed";

	/// Wraps a raw label.
	pub fn new(label: impl Into<String>) -> Self {
		Self(label.into())
	}

	/// Returns the raw label.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Case-insensitive label comparison; the backend and the hosted UI
	/// disagree on casing for some labels.
	pub fn is(&self, label: &str) -> bool {
		self.0.eq_ignore_ascii_case(label)
	}

	/// Returns `true` for the `completed` label.
	pub fn is_completed(&self) -> bool {
		self.is(Self::COMPLETED)
	}

	/// Returns `true` for labels that still demand attention
	/// (`pending`, `confirmed`, `in_progress`).
	pub fn is_active(&self) -> bool {
		self.is(Self::PENDING) || self.is(Self::CONFIRMED) || self.is(Self::IN_PROGRESS)
	}
}
impl Display for BookingStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<&str> for BookingStatus {
	fn from(label: &str) -> Self {
		Self::new(label)
	}
}

/// Tradesperson entry from the nearby listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NearbyEmployee {
	/// Backend identifier used for booking and profile lookups.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Trade label (electrician, plumber, ...).
	#[serde(default)]
	pub job: Option<String>,
	/// Locality string.
	#[serde(default)]
	pub place: Option<String>,
	/// Distance from the client, when the backend computes one.
	#[serde(default)]
	pub distance_km: Option<f64>,
	/// Avatar URL.
	#[serde(default)]
	pub profile_image: Option<String>,
}

/// Payload for creating a booking.
#[derive(Clone, Debug, Serialize)]
pub struct BookingRequest {
	/// Employee being booked.
	pub employee: u64,
	/// Requested service date, as entered (`YYYY-MM-DD`).
	pub booking_date: String,
	/// Free-text description of the job.
	pub job: String,
}

/// Booking row shared by the client and employee dashboards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
	/// Backend identifier.
	pub book_id: u64,
	/// Current status label.
	pub status: BookingStatus,
	/// Requested service date.
	#[serde(default)]
	pub booking_date: Option<String>,
	/// Job description.
	#[serde(default)]
	pub job: Option<String>,
	/// Hours logged by the employee, set alongside completion.
	#[serde(default)]
	pub working_hours: Option<f64>,
	/// Amount billed, present once working hours are logged.
	#[serde(default)]
	pub amount: Option<f64>,
	/// Counterparty names, populated per dashboard.
	#[serde(default)]
	pub client_name: Option<String>,
	/// Employee display name for the client dashboard.
	#[serde(default)]
	pub employee_name: Option<String>,
}

/// Status mutation submitted by the employee dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct BookingStatusUpdate {
	/// New status label.
	pub status: BookingStatus,
	/// Hours to log with the update, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub working_hours: Option<f64>,
}
impl BookingStatusUpdate {
	/// Builds a plain status change.
	pub fn to_status(status: impl Into<BookingStatus>) -> Self {
		Self { status: status.into(), working_hours: None }
	}

	/// Attaches logged hours to the update.
	pub fn with_working_hours(mut self, hours: f64) -> Self {
		self.working_hours = Some(hours);

		self
	}
}

impl ApiClient {
	/// Lists tradespeople near the authenticated client.
	pub async fn nearby_employees(&self) -> Result<Vec<NearbyEmployee>> {
		self.get_json("/book/nearby/").await
	}

	/// Creates a booking for the authenticated client.
	pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
		self.post_json("/book/create/", request).await
	}

	/// Bookings placed by the authenticated client.
	pub async fn client_bookings(&self) -> Result<Vec<Booking>> {
		self.get_json("/book/client/").await
	}

	/// Bookings assigned to the authenticated employee.
	pub async fn employee_bookings(&self) -> Result<Vec<Booking>> {
		self.get_json("/book/employee/").await
	}

	/// Updates one booking's status label (and optionally logged hours).
	pub async fn update_booking_status(
		&self,
		book_id: u64,
		update: &BookingStatusUpdate,
	) -> Result<Booking> {
		self.patch_json(&format!("/book/update/{book_id}/"), update).await
	}
}
