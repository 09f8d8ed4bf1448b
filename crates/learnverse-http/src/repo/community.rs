//! Community feed: posts, comments, likes and follows.

use reqwest::Method;
use tracing::instrument;

use learnverse_core::Result;
use learnverse_core::error::InvalidInputError;
use learnverse_core::model::{Comment, Page, Post, UploadFile};

use crate::client::ApiClient;
use crate::endpoints::{
    COMMUNITY_FEED, COMMUNITY_POSTS, COMMUNITY_USERS, CommentRequest, PageQuery,
};
use crate::request::FormField;

#[derive(Debug, Clone)]
pub struct CommunityRepository {
    client: ApiClient,
}

impl CommunityRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn feed(&self, page: u32, size: u32) -> Result<Page<Post>> {
        let request = self
            .client
            .get(COMMUNITY_FEED)
            .query(&PageQuery { page, size })?;
        self.client.send_json(request).await
    }

    /// Publish a post, optionally with an image (multipart upload).
    #[instrument(skip(self, content, image), fields(has_image = image.is_some()))]
    pub async fn create_post(&self, content: &str, image: Option<UploadFile>) -> Result<Post> {
        if content.trim().is_empty() && image.is_none() {
            return Err(InvalidInputError::Required { field: "content" }.into());
        }

        let mut fields = vec![FormField::text("content", content)];
        if let Some(image) = image {
            fields.push(FormField::file("image", image));
        }

        let request = self.client.post(COMMUNITY_POSTS).multipart(fields);
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.client.send_json(self.post_path(Method::GET, post_id, "comments")).await
    }

    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment> {
        if content.trim().is_empty() {
            return Err(InvalidInputError::Required { field: "comment" }.into());
        }
        let request = self
            .post_path(Method::POST, post_id, "comments")
            .json(&CommentRequest { content })?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn like(&self, post_id: i64) -> Result<()> {
        self.client.send_empty(self.post_path(Method::POST, post_id, "like")).await
    }

    #[instrument(skip(self))]
    pub async fn unlike(&self, post_id: i64) -> Result<()> {
        self.client.send_empty(self.post_path(Method::DELETE, post_id, "like")).await
    }

    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: i64) -> Result<()> {
        self.client.send_empty(self.user_follow(Method::POST, user_id)).await
    }

    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: i64) -> Result<()> {
        self.client.send_empty(self.user_follow(Method::DELETE, user_id)).await
    }

    fn post_path(&self, method: Method, post_id: i64, action: &str) -> crate::ApiRequest {
        self.client
            .request_at(method, COMMUNITY_POSTS, [post_id.to_string().as_str(), action])
    }

    fn user_follow(&self, method: Method, user_id: i64) -> crate::ApiRequest {
        self.client
            .request_at(method, COMMUNITY_USERS, [user_id.to_string().as_str(), "follow"])
    }
}
