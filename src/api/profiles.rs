//! Client and employee profile fetch/update endpoints.
//!
//! Profile updates travel as multipart form data because they may carry an
//! avatar upload; text-only updates still use the same encoding, matching the
//! backend contract.

// self
use crate::{
	_prelude::*,
	api::RoleLabel,
	client::ApiClient,
	http::{FilePart, FormPart},
};

/// Profile payload for booking customers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
	/// Backend identifier.
	#[serde(default)]
	pub id: Option<u64>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Account email.
	pub email: String,
	/// Role label.
	#[serde(default)]
	pub role: Option<RoleLabel>,
	/// Contact number.
	#[serde(default)]
	pub phone: Option<String>,
	/// Locality string.
	#[serde(default)]
	pub place: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub profile_image: Option<String>,
}

/// Profile payload for tradespeople; extends the user shape with trade fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmployeeProfile {
	/// Backend identifier.
	#[serde(default)]
	pub id: Option<u64>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Account email.
	pub email: String,
	/// Contact number.
	#[serde(default)]
	pub phone: Option<String>,
	/// Locality string.
	#[serde(default)]
	pub place: Option<String>,
	/// Trade label (electrician, plumber, ...).
	#[serde(default)]
	pub job: Option<String>,
	/// Years of experience.
	#[serde(default)]
	pub experience: Option<u32>,
	/// Hourly rate used to derive booking amounts.
	#[serde(default)]
	pub hourly_rate: Option<f64>,
	/// Free-text introduction shown on the booking page.
	#[serde(default)]
	pub about: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub profile_image: Option<String>,
}

/// Field-wise profile mutation; only populated fields are submitted.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
	/// New display name.
	pub name: Option<String>,
	/// New contact number.
	pub phone: Option<String>,
	/// New locality string.
	pub place: Option<String>,
	/// New trade label (employee profiles only).
	pub job: Option<String>,
	/// New experience figure (employee profiles only).
	pub experience: Option<u32>,
	/// New hourly rate (employee profiles only).
	pub hourly_rate: Option<f64>,
	/// New introduction text (employee profiles only).
	pub about: Option<String>,
	/// Avatar upload.
	pub avatar: Option<FilePart>,
}
impl ProfileUpdate {
	pub(crate) fn into_parts(self) -> Vec<FormPart> {
		let mut parts = Vec::new();
		let mut push_text = |name: &str, value: Option<String>| {
			if let Some(value) = value {
				parts.push(FormPart::text(name, value));
			}
		};

		push_text("name", self.name);
		push_text("phone", self.phone);
		push_text("place", self.place);
		push_text("job", self.job);
		push_text("experience", self.experience.map(|value| value.to_string()));
		push_text("hourly_rate", self.hourly_rate.map(|value| value.to_string()));
		push_text("about", self.about);

		if let Some(avatar) = self.avatar {
			parts.push(FormPart::file("profile_image", avatar));
		}

		parts
	}
}

impl ApiClient {
	/// Fetches the authenticated client's profile.
	pub async fn user_profile(&self) -> Result<UserProfile> {
		self.get_json("/user/profile/").await
	}

	/// Updates the authenticated client's profile.
	pub async fn update_user_profile(&self, update: ProfileUpdate) -> Result<UserProfile> {
		self.put_multipart("/user/profile/", update.into_parts()).await
	}

	/// Fetches the authenticated employee's profile.
	pub async fn employee_profile(&self) -> Result<EmployeeProfile> {
		self.get_json("/employee/profile/").await
	}

	/// Updates the authenticated employee's profile.
	pub async fn update_employee_profile(&self, update: ProfileUpdate) -> Result<EmployeeProfile> {
		self.put_multipart("/employee/profile/", update.into_parts()).await
	}

	/// Fetches one employee's public profile by identifier (booking page view).
	pub async fn employee_profile_by_id(&self, employee_id: u64) -> Result<EmployeeProfile> {
		self.get_json(&format!("/book/employee/{employee_id}/")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::FormValue;

	#[test]
	fn update_serializes_only_populated_fields() {
		let update = ProfileUpdate {
			name: Some("Asha".into()),
			hourly_rate: Some(450.0),
			..Default::default()
		};
		let parts = update.into_parts();
		let names: Vec<_> = parts.iter().map(|part| part.name.as_str()).collect();

		assert_eq!(names, ["name", "hourly_rate"]);
	}

	#[test]
	fn avatar_lands_in_the_image_field() {
		let update = ProfileUpdate {
			avatar: Some(FilePart {
				file_name: "me.png".into(),
				content_type: "image/png".into(),
				bytes: vec![0x89],
			}),
			..Default::default()
		};
		let parts = update.into_parts();

		assert_eq!(parts.len(), 1);
		assert_eq!(parts[0].name, "profile_image");
		assert!(matches!(&parts[0].value, FormValue::File(_)));
	}

	#[test]
	fn employee_profile_tolerates_sparse_payloads() {
		let profile: EmployeeProfile = serde_json::from_str("{\"email\":\"e@x.test\"}")
			.expect("Sparse employee profile should decode.");

		assert_eq!(profile.email, "e@x.test");
		assert!(profile.hourly_rate.is_none());
	}
}
