use hashblock::{compile_file, Context, Engine, Error, EvaluateErrorKind};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const VIEWS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

#[derive(Serialize)]
struct Location {
    id: u32,
    title: &'static str,
    dry_grade: Option<&'static str>,
}

fn init_tracing() {
    // Another test may have installed the subscriber already.
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn engine() -> Engine {
    let mut engine = Engine::default();
    engine.load_directory(VIEWS, "html").unwrap();
    engine
}

fn report(data: Option<Vec<Location>>) -> Context {
    let mut context = Context::new();
    context.insert("lat", 34.0259).unwrap();
    context.insert("range", 20).unwrap();
    context.insert("data", data).unwrap();
    context
}

#[test]
fn test_report_lists_locations() {
    init_tracing();
    let context = report(Some(vec![
        Location {
            id: 1,
            title: "Zuma <Beach>",
            dry_grade: Some("A"),
        },
        Location {
            id: 2,
            title: "Venice",
            dry_grade: None,
        },
    ]));

    let output = engine().render_named("beach", &context).unwrap();
    let zuma = output
        .find(r#"<a href="/detail/1">Zuma &lt;Beach&gt;</a> A</li>"#)
        .unwrap();
    let venice = output
        .find(r#"<a href="/detail/2">Venice</a> N/A</li>"#)
        .unwrap();

    assert!(zuma < venice);
    assert!(output.starts_with("<h1>Beach Report</h1>\n"));
    assert!(output.contains("<p>Within 20 miles of 34.03</p>"));
    assert!(!output.contains("No locations found"));
    assert!(!output.contains("Enter a latitude"));
}

#[test]
fn test_report_without_results() {
    init_tracing();
    let output = engine().render_named("beach", &report(Some(vec![]))).unwrap();

    assert!(output.contains("<li>No locations found</li>"));
    assert!(!output.contains("<a href"));
}

#[test]
fn test_report_without_query() {
    init_tracing();
    let output = engine().render_named("beach", &report(None)).unwrap();

    assert_eq!(
        output,
        "<h1>Beach Report</h1>\n\n<p>Enter a latitude and range.</p>\n\n"
    );
}

#[test]
fn test_report_missing_value() {
    init_tracing();
    let context = Context::new()
        .with("lat", 34.0259)
        .unwrap()
        .with("data", vec!["Zuma"])
        .unwrap();

    let Err(Error::Render(error)) = engine().render_named("beach", &context) else {
        panic!("expected a render error");
    };
    assert_eq!(error.kind(), EvaluateErrorKind::UndefinedReference);
    assert_eq!(error.line(), 3);
    assert_eq!(error.diagnostic().get_name(), Some("beach"));
}

#[test]
fn test_compile_file_matches_engine() {
    init_tracing();
    let template = compile_file(format!("{VIEWS}/beach.html")).unwrap();
    let context = report(None);

    assert_eq!(template.name(), Some("beach"));
    assert_eq!(
        template.render(&context).unwrap(),
        engine().render_named("beach", &context).unwrap()
    );
}
