//! Employee showcase posts, likes, and comments.

// self
use crate::{
	_prelude::*,
	api::Page,
	client::ApiClient,
	http::{FilePart, FormPart},
};

/// Showcase post published by an employee.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
	/// Backend identifier.
	pub id: u64,
	/// Post title.
	#[serde(default)]
	pub title: Option<String>,
	/// Body text.
	#[serde(default)]
	pub content: Option<String>,
	/// Attached image URL.
	#[serde(default)]
	pub image: Option<String>,
	/// Publishing employee's identifier.
	#[serde(default)]
	pub employee: Option<u64>,
	/// Like counter maintained server-side.
	#[serde(default)]
	pub likes_count: u64,
	/// Whether the authenticated account has liked this post.
	#[serde(default)]
	pub is_liked: bool,
	/// Publication timestamp string.
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Comment on a post.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
	/// Backend identifier.
	pub id: u64,
	/// Comment text.
	pub text: String,
	/// Author display name.
	#[serde(default)]
	pub author: Option<String>,
	/// Creation timestamp string.
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Acknowledgement returned by the like toggle endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct LikeAck {
	/// Raw backend message (`Post liked` / `Post unliked`).
	pub msg: String,
}
impl LikeAck {
	/// Returns `true` when the toggle resulted in a like.
	pub fn liked(&self) -> bool {
		self.msg.eq_ignore_ascii_case("post liked")
	}
}

/// Draft payload for publishing a post; uploaded as multipart form data.
#[derive(Clone, Debug)]
pub struct NewPost {
	/// Post title.
	pub title: String,
	/// Body text.
	pub content: String,
	/// Optional image attachment.
	pub image: Option<FilePart>,
}
impl NewPost {
	pub(crate) fn into_parts(self) -> Vec<FormPart> {
		let mut parts =
			vec![FormPart::text("title", self.title), FormPart::text("content", self.content)];

		if let Some(image) = self.image {
			parts.push(FormPart::file("image", image));
		}

		parts
	}
}

#[derive(Serialize)]
struct CommentText<'a> {
	text: &'a str,
}

impl ApiClient {
	/// Fetches one page of the public post feed.
	pub async fn all_posts(&self, page: u32) -> Result<Page<Post>> {
		let request = self
			.request(crate::http::HttpMethod::Get, "/post/all-posts/")?
			.with_query("page", &page.to_string());

		self.execute(request).await?.json()
	}

	/// Toggles the authenticated account's like on a post.
	pub async fn like_post(&self, post_id: u64) -> Result<LikeAck> {
		self.execute(self.request(crate::http::HttpMethod::Post, &format!("/posts/{post_id}/like/"))?)
			.await?
			.json()
	}

	/// Lists comments on a post.
	pub async fn comments(&self, post_id: u64) -> Result<Vec<Comment>> {
		self.get_json(&format!("/posts/{post_id}/comments/")).await
	}

	/// Adds a comment to a post.
	pub async fn add_comment(&self, post_id: u64, text: &str) -> Result<Comment> {
		self.post_json(&format!("/posts/{post_id}/comments/"), &CommentText { text }).await
	}

	/// Rewrites an existing comment.
	pub async fn update_comment(&self, comment_id: u64, text: &str) -> Result<Comment> {
		self.put_json(&format!("/comments/{comment_id}/"), &CommentText { text }).await
	}

	/// Deletes a comment.
	pub async fn delete_comment(&self, comment_id: u64) -> Result<()> {
		self.delete(&format!("/comments/{comment_id}/")).await
	}

	/// Publishes a post for the authenticated employee.
	pub async fn create_post(&self, draft: NewPost) -> Result<Post> {
		self.post_multipart("/post/posts/", draft.into_parts()).await
	}

	/// Lists the posts published by one employee.
	pub async fn employee_posts(&self, employee_id: u64) -> Result<Vec<Post>> {
		self.get_json(&format!("/post/posts/employee/{employee_id}/")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::FormValue;

	#[test]
	fn like_ack_parses_both_outcomes() {
		let liked: LikeAck = serde_json::from_str("{\"msg\":\"Post liked\"}")
			.expect("Like acknowledgement should decode.");
		let unliked: LikeAck = serde_json::from_str("{\"msg\":\"Post unliked\"}")
			.expect("Unlike acknowledgement should decode.");

		assert!(liked.liked());
		assert!(!unliked.liked());
	}

	#[test]
	fn draft_without_image_produces_two_parts() {
		let draft =
			NewPost { title: "Rewiring".into(), content: "Before/after.".into(), image: None };
		let parts = draft.into_parts();

		assert_eq!(parts.len(), 2);
		assert!(parts.iter().all(|part| matches!(part.value, FormValue::Text(_))));
	}

	#[test]
	fn draft_with_image_appends_file_part() {
		let draft = NewPost {
			title: "Rewiring".into(),
			content: "Before/after.".into(),
			image: Some(FilePart {
				file_name: "site.jpg".into(),
				content_type: "image/jpeg".into(),
				bytes: vec![0xFF, 0xD8],
			}),
		};
		let parts = draft.into_parts();

		assert_eq!(parts.len(), 3);
		assert!(matches!(&parts[2].value, FormValue::File(file) if file.file_name == "site.jpg"));
	}

	#[test]
	fn post_rows_tolerate_sparse_payloads() {
		let post: Post = serde_json::from_str("{\"id\":3}")
			.expect("Sparse post row should decode with defaults.");

		assert_eq!(post.id, 3);
		assert_eq!(post.likes_count, 0);
		assert!(!post.is_liked);
	}
}
