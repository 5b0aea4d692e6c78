//! GraphQL API exposure
//!
//! This module provides GraphQL routing, schema assembly and the
//! depth-limiting validation step. It consumes a `ServerHost` and produces
//! an Axum `Router`.

mod depth_limit;
mod mutation;
mod query;
mod schema;
mod types;

pub use depth_limit::{DepthLimit, DepthLimitError, OperationDepth};
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use schema::{ApiSchema, GraphQLService, build_schema};

use crate::server::host::ServerHost;
use anyhow::Result;
use async_graphql::{
    Request, Variables,
    http::{GraphQLPlaygroundConfig, playground_source},
};
use async_graphql_axum::GraphQLResponse;
use axum::{
    Router,
    extract::{Extension, Json as AxumJson},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

/// Body accepted by `POST /graphql`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphQLRequestBody {
    query: String,
    #[serde(default)]
    variables: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, rename = "operationName")]
    operation_name: Option<String>,
}

impl GraphQLRequestBody {
    fn into_request(self) -> Request {
        let mut request = Request::new(self.query);
        if let Some(variables) = self.variables {
            request = request.variables(Variables::from_json(serde_json::Value::Object(variables)));
        }
        if let Some(name) = self.operation_name {
            request = request.operation_name(name);
        }
        request
    }
}

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router from a host
    ///
    /// Returns a router with:
    /// - `POST /graphql` query and mutation endpoint
    /// - `GET /graphql/schema` SDL export
    /// - `GET /graphql/playground` when enabled in the config
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = Arc::new(builder.build_host()?);
    /// let graphql_app = GraphQLExposure::build_router(host)?;
    /// ```
    pub fn build_router(host: Arc<ServerHost>) -> Result<Router> {
        let service = Arc::new(GraphQLService::new(
            host.store.clone(),
            host.config.graphql.max_depth,
        ));

        let mut router = Router::new()
            .route("/graphql", post(graphql_handler))
            .route("/graphql/schema", get(graphql_schema));

        if host.config.graphql.playground {
            router = router.route("/graphql/playground", get(graphql_playground));
        }

        Ok(router.layer(Extension(service)))
    }
}

/// Handler for GraphQL queries and mutations
async fn graphql_handler(
    Extension(service): Extension<Arc<GraphQLService>>,
    AxumJson(body): AxumJson<GraphQLRequestBody>,
) -> GraphQLResponse {
    tracing::debug!(query = %body.query, "GraphQL request");
    service.execute(body.into_request()).await.into()
}

/// Handler for GraphQL playground UI
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

/// Handler for GraphQL schema SDL export
async fn graphql_schema(Extension(service): Extension<Arc<GraphQLService>>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        service.schema().sdl(),
    )
}
