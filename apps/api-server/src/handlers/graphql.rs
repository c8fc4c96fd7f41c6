//! GraphQL endpoint and playground.

use actix_web::{HttpResponse, web};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::graphql::ScribeSchema;
use crate::middleware::auth::Credentials;
use crate::observability::RequestId;

/// POST /graphql
///
/// Bearer credentials are attached as request data; each resolver decides
/// through the gate whether it needs them. Errors carry the request id in
/// `extensions.requestId`.
pub async fn graphql(
    schema: web::Data<ScribeSchema>,
    credentials: Credentials,
    request_id: RequestId,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(credentials);
    let mut response = schema.execute(request).await;
    for error in &mut response.errors {
        error
            .extensions
            .get_or_insert_with(Default::default)
            .set("requestId", request_id.as_str());
    }
    response.into()
}

/// GET /graphql - GraphiQL playground.
pub async fn playground() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
