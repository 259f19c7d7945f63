//! Tests for the dispatcher and the response builder.

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    use crate::binding::{BindError, ParamSpec, ParamType};
    use crate::codec;
    use crate::dispatch::{
        build, DispatchError, Dispatcher, Entity, ErrorBody, HandlerError, HandlerResult, IncomingRequest,
        ResponseSpec,
    };
    use crate::parser::Method;
    use crate::routing::{ResolveError, RouteTable};
    use crate::server::{HttpResponse, StatusCode};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Student {
        id: i64,
        first_name: String,
        last_name: String,
    }

    impl Student {
        fn new(id: i64, first_name: &str, last_name: &str) -> Self {
            Self {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            }
        }
    }

    fn student_dispatcher() -> Dispatcher {
        let mut routes = RouteTable::builder();

        routes
            .register(Method::GET, "students", vec![], StatusCode::OK, |_| async {
                HandlerResult::json(&vec![Student::new(1, "Andrei", "Avram"), Student::new(2, "Alex", "Muntean")])
            })
            .unwrap()
            .register(
                Method::GET,
                "students/{id}",
                vec![ParamSpec::path("id", ParamType::Integer)],
                StatusCode::OK,
                |params| async move { HandlerResult::json(&Student::new(params.integer("id")?, "Valentin", "Miron")) },
            )
            .unwrap()
            .register(
                Method::GET,
                "students/query",
                vec![
                    ParamSpec::query("id", ParamType::Integer),
                    ParamSpec::query("firstName", ParamType::Text),
                    ParamSpec::query("lastName", ParamType::Text),
                ],
                StatusCode::OK,
                |params| async move {
                    let student = Student::new(
                        params.integer("id")?,
                        params.text("firstName")?,
                        params.text("lastName")?,
                    );
                    HandlerResult::json(&student)
                },
            )
            .unwrap()
            .register(
                Method::POST,
                "students/create",
                vec![ParamSpec::body::<Student>("student")],
                StatusCode::CREATED,
                |mut params| async move {
                    let student: Student = params.take_entity("student")?;
                    HandlerResult::json(&student)
                },
            )
            .unwrap()
            .register(
                Method::DELETE,
                "students/{id}/delete",
                vec![ParamSpec::path("id", ParamType::Integer)],
                StatusCode::OK,
                |_| async { Ok(HandlerResult::text("Student deleted successfully")) },
            )
            .unwrap()
            .register(Method::GET, "responseentity/header/student", vec![], StatusCode::OK, |_| async {
                let body = Entity::json(&Student::new(1, "Alex", "Mihai"))?;
                Ok(ResponseSpec::ok(body).with_header("custom-header", "Alexandru").into())
            })
            .unwrap()
            .register(Method::GET, "failing", vec![], StatusCode::OK, |_| async {
                Err(HandlerError::message("database password is hunter2"))
            })
            .unwrap()
            .register(Method::GET, "panicking", vec![], StatusCode::OK, |_| async {
                if true {
                    panic!("handler bug");
                }
                Ok(HandlerResult::text("unreachable"))
            })
            .unwrap();

        Dispatcher::new(routes.seal())
    }

    fn json_body(response: &HttpResponse) -> Value {
        codec::decode(&response.body).unwrap()
    }

    fn error_body(response: &HttpResponse) -> ErrorBody {
        codec::decode(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_get_with_path_variable() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/5")).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(
            json_body(&response),
            json!({"id": 5, "firstName": "Valentin", "lastName": "Miron"})
        );
    }

    #[tokio::test]
    async fn test_collection_result() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students")).await;

        assert_eq!(response.status, StatusCode::OK);
        let students: Vec<Student> = codec::decode(&response.body).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1], Student::new(2, "Alex", "Muntean"));
    }

    #[tokio::test]
    async fn test_literal_route_preferred_over_variable() {
        let dispatcher = student_dispatcher();
        let request = IncomingRequest::new(Method::GET, "/students/query")
            .with_query_param("id", "1")
            .with_query_param("firstName", "Ale")
            .with_query_param("lastName", "Popa");

        let response = dispatcher.handle(request).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(json_body(&response), json!({"id": 1, "firstName": "Ale", "lastName": "Popa"}));
    }

    #[tokio::test]
    async fn test_missing_query_parameter_is_bad_request() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/query")).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body = error_body(&response);
        assert_eq!(body.error, "missing_parameter");
        assert_eq!(body.parameter.as_deref(), Some("id"));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_bad_request() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/abc")).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body = error_body(&response);
        assert_eq!(body.error, "type_mismatch");
        assert_eq!(body.parameter.as_deref(), Some("id"));
        assert!(body.message.contains("\"abc\""), "{}", body.message);
    }

    #[tokio::test]
    async fn test_created_status_for_body_route() {
        let dispatcher = student_dispatcher();
        let request = IncomingRequest::new(Method::POST, "/students/create")
            .with_header("Content-Type", "application/json")
            .with_body(br#"{"id": 9, "firstName": "Ioana", "lastName": "Stan"}"#.to_vec());

        let response = dispatcher.handle(request).await;
        assert_eq!(response.status, StatusCode::CREATED);
        let student: Student = codec::decode(&response.body).unwrap();
        assert_eq!(student, Student::new(9, "Ioana", "Stan"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let dispatcher = student_dispatcher();
        let request = IncomingRequest::new(Method::POST, "/students/create").with_body(b"{\"id\":".to_vec());

        let response = dispatcher.handle(request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body = error_body(&response);
        assert_eq!(body.error, "malformed_body");
        assert_eq!(body.parameter.as_deref(), Some("student"));
    }

    #[tokio::test]
    async fn test_text_result() {
        let dispatcher = student_dispatcher();
        let response = dispatcher
            .handle(IncomingRequest::new(Method::DELETE, "/students/3/delete"))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
        assert_eq!(response.body, b"Student deleted successfully".to_vec());
    }

    #[tokio::test]
    async fn test_response_spec_headers_are_kept() {
        let dispatcher = student_dispatcher();
        let response = dispatcher
            .handle(IncomingRequest::new(Method::GET, "/responseentity/header/student"))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("custom-header"), Some("Alexandru"));
        assert_eq!(json_body(&response), json!({"id": 1, "firstName": "Alex", "lastName": "Mihai"}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/teachers")).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(error_body(&response).error, "route_not_found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_not_allowed() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::PUT, "/students")).await;

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("Allow"), Some("GET"));
        assert_eq!(error_body(&response).error, "method_not_allowed");
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/failing")).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(&response);
        assert_eq!(body.error, "handler_failure");
        assert_eq!(body.message, "Internal server error");
        assert!(!String::from_utf8_lossy(&response.body).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let dispatcher = student_dispatcher();
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/panicking")).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

        // The dispatcher keeps serving afterwards
        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/1")).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dispatch_reports_typed_errors() {
        let dispatcher = student_dispatcher();

        let err = dispatcher
            .dispatch(IncomingRequest::new(Method::GET, "/students/abc"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Bind(BindError::TypeMismatch { ref parameter, ref raw, expected: "integer" })
                if parameter == "id" && raw == "abc"
        ));

        let err = dispatcher
            .dispatch(IncomingRequest::new(Method::PATCH, "/students/1/delete"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Resolve(ResolveError::MethodNotAllowed { ref allowed, .. }) if allowed == &[Method::DELETE]
        ));
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let dispatcher = student_dispatcher();
        let mut tasks = tokio::task::JoinSet::new();

        for id in 0..32 {
            let dispatcher = dispatcher.clone();
            tasks.spawn(async move {
                let response = dispatcher
                    .handle(IncomingRequest::new(Method::GET, format!("/students/{id}")))
                    .await;
                (id, response)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (id, response) = joined.unwrap();
            assert_eq!(response.status, StatusCode::OK);
            let student: Student = codec::decode(&response.body).unwrap();
            assert_eq!(student.id, id);
        }
    }

    #[test]
    fn test_build_bare_entity_uses_success_status() {
        let student = Student::new(1, "Alex", "Mihai");
        let response = build(HandlerResult::json(&student).unwrap(), StatusCode::CREATED).unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        let decoded: Student = codec::decode(&response.body).unwrap();
        assert_eq!(decoded, student);
    }

    #[test]
    fn test_build_wrapped_takes_status_and_headers() {
        let spec = ResponseSpec::new(StatusCode::ACCEPTED, Entity::text("queued"))
            .with_header("custom-header", "Alexandru")
            .with_header("content-type", "text/csv");

        let response = build(spec.into(), StatusCode::CREATED).unwrap();
        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert_eq!(response.header("custom-header"), Some("Alexandru"));
        // Explicit headers win, whatever their case
        assert_eq!(response.header("Content-Type"), Some("text/csv"));
        assert_eq!(response.headers.len(), 2);
        assert_eq!(response.body, b"queued".to_vec());
    }

    #[tokio::test]
    async fn test_header_from_path_variable_cannot_inject_lines() {
        let mut routes = RouteTable::builder();
        routes
            .register(
                Method::GET,
                "greet/{name}",
                vec![ParamSpec::path("name", ParamType::Text)],
                StatusCode::OK,
                |params| async move {
                    let name = params.text("name")?.to_string();
                    Ok(ResponseSpec::ok(Entity::text("hi")).with_header("x-name", name).into())
                },
            )
            .unwrap();
        let dispatcher = Dispatcher::new(routes.seal());

        let response = dispatcher
            .handle(IncomingRequest::new(Method::GET, "/greet/a%0D%0ASet-Cookie:%20evil=1"))
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_body(&response).error, "invalid_header");
        assert!(response.header("Set-Cookie").is_none());
        assert!(!String::from_utf8_lossy(&response.to_bytes()).contains("evil"));

        let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/greet/Ana")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("x-name"), Some("Ana"));
    }

    #[test]
    fn test_build_rejects_malformed_header_names() {
        for name in ["", "bad name", "x-name:"] {
            let spec = ResponseSpec::ok(Entity::text("body")).with_header(name, "value");
            let err = build(spec.into(), StatusCode::OK).unwrap_err();
            assert!(matches!(err, DispatchError::InvalidHeader(ref n) if n == name), "{name:?}");
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_build_accepts_any_status_code() {
        for code in [302, 418, 422, 429] {
            let status = StatusCode::from_u16(code).unwrap();
            let spec = ResponseSpec::new(status, Entity::text("custom"));
            let response = build(spec.into(), StatusCode::OK).unwrap();
            assert_eq!(response.status.as_u16(), code);
        }

        let response = build(HandlerResult::text("slow down"), StatusCode::TOO_MANY_REQUESTS).unwrap();
        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_error_body_omits_parameter_when_absent() {
        let err = DispatchError::Resolve(ResolveError::RouteNotFound {
            method: Method::GET,
            path: "/x".to_string(),
        });
        let text = String::from_utf8(err.into_response().body).unwrap();
        assert!(!text.contains("parameter"), "{text}");
        assert!(text.contains("route_not_found"));
    }
}
