use crate::TransportError;
use harness_primitives::{HeaderList, HttpResponse, Verb};

/// An implementation of the trait issues HTTP requests on behalf of the harness.
///
/// `url` is either absolute or a path resolved by the implementation against the node it is
/// connected to. The returned headers always carry the
/// [`STATUS_LINE_HEADER`](harness_primitives::STATUS_LINE_HEADER) entry. A non-success status is
/// not an error at this level.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Transport: Send + Sync {
    /// Issues a request with the provided verb.
    async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError>;

    /// Issues a `GET` request.
    async fn get(&self, url: &str, headers: &HeaderList) -> Result<HttpResponse, TransportError> {
        self.request(Verb::Get, url, None, headers).await
    }

    /// Issues a `PUT` request.
    async fn put(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Verb::Put, url, body, headers).await
    }

    /// Issues a `POST` request.
    async fn post(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Verb::Post, url, body, headers).await
    }

    /// Issues a `DELETE` request.
    async fn delete(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError> {
        self.request(Verb::Delete, url, body, headers).await
    }
}
