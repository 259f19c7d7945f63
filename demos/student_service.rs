//! A student REST service demonstrating routing, parameter binding and
//! response building on top of the microroute-rs server.
//!
//! Run with `RUST_LOG=debug cargo run --example student_service`, then try:
//!
//! ```text
//! curl http://127.0.0.1:8080/students/1
//! curl "http://127.0.0.1:8080/students/query?id=1&firstName=Ale&lastName=Popa"
//! curl -X POST -d '{"id":5,"firstName":"Ana","lastName":"Pop"}' http://127.0.0.1:8080/students/create
//! curl -i http://127.0.0.1:8080/responseentity/header/student
//! ```

use log::info;
use serde::{Deserialize, Serialize};

use microroute_rs::{
    Dispatcher, Entity, HandlerResult, HttpServer, Method, ParamSpec, ParamType, ResponseSpec, RouteTable,
    ServerConfig, StatusCode,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Student {
    id: i64,
    first_name: String,
    last_name: String,
}

impl Student {
    fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

fn student_routes() -> Result<RouteTable, microroute_rs::RouteError> {
    let mut routes = RouteTable::builder();

    routes.register(Method::GET, "hello-world", vec![], StatusCode::OK, |_| async {
        Ok(HandlerResult::text("Hello world!"))
    })?;

    routes.register(Method::GET, "student", vec![], StatusCode::OK, |_| async {
        HandlerResult::json(&Student::new(1, "Alex", "Mihai"))
    })?;

    routes.register(Method::GET, "students", vec![], StatusCode::OK, |_| async {
        let students = vec![
            Student::new(1, "Andrei", "Avram"),
            Student::new(2, "Alex", "Muntean"),
            Student::new(3, "Daniel", "Popa"),
            Student::new(4, "Bogdan", "Nicolae"),
        ];
        HandlerResult::json(&students)
    })?;

    // Path variables
    for pattern in ["students/{id}", "pathvariable/students/{id}"] {
        routes.register(
            Method::GET,
            pattern,
            vec![ParamSpec::path("id", ParamType::Integer)],
            StatusCode::OK,
            |params| async move { HandlerResult::json(&Student::new(params.integer("id")?, "Valentin", "Miron")) },
        )?;
    }

    routes.register(
        Method::GET,
        "students/{id}/{first-name}/{last-name}",
        vec![
            ParamSpec::path("id", ParamType::Integer),
            ParamSpec::path("first-name", ParamType::Text),
            ParamSpec::path("last-name", ParamType::Text),
        ],
        StatusCode::OK,
        |params| async move {
            let student = Student::new(
                params.integer("id")?,
                params.text("first-name")?,
                params.text("last-name")?,
            );
            HandlerResult::json(&student)
        },
    )?;

    // Query parameters; the literal "query" segment wins over students/{id}
    routes.register(
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
    )?;

    // Request bodies
    routes.register(
        Method::POST,
        "students/create",
        vec![ParamSpec::body::<Student>("student")],
        StatusCode::CREATED,
        |mut params| async move {
            let student: Student = params.take_entity("student")?;
            info!("Creating student {student:?}");
            HandlerResult::json(&student)
        },
    )?;

    routes.register(
        Method::PUT,
        "students/{id}/update",
        vec![
            ParamSpec::body::<Student>("student"),
            ParamSpec::path("id", ParamType::Integer),
        ],
        StatusCode::OK,
        |mut params| async move {
            let id = params.integer("id")?;
            let student: Student = params.take_entity("student")?;
            info!("Updating student {id}: {} {}", student.first_name, student.last_name);
            HandlerResult::json(&student)
        },
    )?;

    routes.register(
        Method::DELETE,
        "students/{id}/delete",
        vec![ParamSpec::path("id", ParamType::Integer)],
        StatusCode::OK,
        |params| async move {
            info!("Deleting student {}", params.integer("id")?);
            Ok(HandlerResult::text("Student deleted successfully"))
        },
    )?;

    // Explicit responses
    routes.register(Method::GET, "responseentity/student", vec![], StatusCode::OK, |_| async {
        let body = Entity::json(&Student::new(1, "Alex", "Mihai"))?;
        Ok(ResponseSpec::ok(body).into())
    })?;

    routes.register(Method::GET, "responseentity/header/student", vec![], StatusCode::OK, |_| async {
        let body = Entity::json(&Student::new(1, "Alex", "Mihai"))?;
        Ok(ResponseSpec::ok(body).with_header("custom-header", "Alexandru").into())
    })?;

    Ok(routes.seal())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let config = ServerConfig {
        addr: "127.0.0.1:8080".parse()?,
        ..ServerConfig::default()
    };

    let server = HttpServer::new(config, Dispatcher::new(student_routes()?));

    // Start the server
    server.start().await?;

    Ok(())
}
