//! GraphQL schema assembly and execution
//!
//! [`GraphQLService`] couples the executable schema with the
//! [`DepthLimit`] so that every request is depth-checked before any
//! resolver runs.

use super::depth_limit::DepthLimit;
use super::mutation::MutationRoot;
use super::query::QueryRoot;
use crate::core::Store;
use async_graphql::{EmptySubscription, ErrorExtensionValues, Request, Response, Schema, ServerError};

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with the store as context data
pub fn build_schema(store: Store) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// Depth-checked GraphQL executor
#[derive(Clone)]
pub struct GraphQLService {
    schema: ApiSchema,
    depth_limit: DepthLimit,
}

impl GraphQLService {
    pub fn new(store: Store, max_depth: usize) -> Self {
        Self {
            schema: build_schema(store),
            depth_limit: DepthLimit::new(max_depth),
        }
    }

    pub fn schema(&self) -> &ApiSchema {
        &self.schema
    }

    pub fn depth_limit(&self) -> DepthLimit {
        self.depth_limit
    }

    /// Validate the request depth, then execute it
    ///
    /// The document parsed here is kept on the request and reused by the
    /// executor.
    pub async fn execute(&self, mut request: Request) -> Response {
        let checked = match request.parsed_query() {
            Ok(document) => self
                .depth_limit
                .check_document(document)
                .map_err(|e| rejection(e.to_string(), e.error_code())),
            Err(e) => Err(rejection(e.to_string(), "GRAPHQL_PARSE_FAILED")),
        };

        match checked {
            Ok(depths) => {
                tracing::debug!(?depths, "Query depth accepted");
            }
            Err(error) => {
                tracing::warn!(error = %error.message, "Query rejected before execution");
                return Response::from_errors(vec![error]);
            }
        }

        let response = self.schema.execute(request).await;
        if response.is_err() {
            tracing::debug!(errors = ?response.errors, "Query finished with errors");
        }
        response
    }

    /// Convenience wrapper for a bare query string
    pub async fn execute_query(&self, query: &str) -> Response {
        self.execute(Request::new(query)).await
    }
}

fn rejection(message: String, code: &'static str) -> ServerError {
    let mut extensions = ErrorExtensionValues::default();
    extensions.set("code", code);
    let mut error = ServerError::new(message, None);
    error.extensions = Some(extensions);
    error
}
