pub mod analytics;
pub mod comment;
pub mod post;
pub mod user;

use actix_web::{
    web::{FormConfig, JsonConfig, PathConfig, QueryConfig, ServiceConfig},
    Error,
};

use crate::app::AppError;

fn bad_request(err: impl ToString) -> Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Registers every endpoint of the service
pub fn configure(cfg: &mut ServiceConfig) {
    cfg
        //Malformed input is answered with the same `{"detail": ...}` body as every other error
        .app_data(JsonConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(QueryConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(FormConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(PathConfig::default().error_handler(|err, _req| bad_request(err)))
        //User routes
        .service(user::create_new_user)
        .service(user::login)
        .service(user::current_user)
        //Post routes
        .service(post::create_new_post)
        .service(post::get_posts)
        .service(post::get_post)
        .service(post::edit_post)
        .service(post::delete_post)
        //Comment routes
        .service(comment::create_comment)
        .service(comment::get_comments)
        .service(comment::edit_comment)
        .service(comment::delete_comment)
        //Analytics routes
        .service(analytics::comments_daily_breakdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_state, bearer, seed_user, MemoryStore, ScriptedModerator};
    use actix_web::{http::StatusCode, test, web::Data, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_malformed_input_uses_detail_body() {
        let store = Arc::new(MemoryStore::new());
        let user = seed_user(&store, "testuser").await;
        let state = app_state(store.clone(), Arc::new(ScriptedModerator::default()));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/posts/")
            .insert_header(bearer(&state, &user))
            .set_json(json!({ "title": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());

        let req = test::TestRequest::get()
            .uri("/api/comments-daily-breakdown?date_from=yesterday")
            .insert_header(bearer(&state, &user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());

        let req = test::TestRequest::get()
            .uri("/posts/first")
            .insert_header(bearer(&state, &user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());

        let req = test::TestRequest::post()
            .uri("/token")
            .set_form([("username", "testuser")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }
}
