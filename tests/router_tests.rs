use kahless::router::{RoutePattern, Router};
use kahless::{Handler, PatternError, RouteError};

fn noop() -> Handler {
    Handler::function(|_req, _resp, _params| Ok(()))
}

fn zoo_router() -> Router {
    let mut router = Router::new();
    for template in [
        "/",
        "/zoo/animals",
        "/zoo/animals/{id}",
        "/zoo/animals/{id}/feedings/{feeding_id}",
        "/zoo/{section}",
        "/files/{name}.txt",
    ] {
        router.register(template, noop()).unwrap();
    }
    router
}

#[test]
fn test_root_matches_only_root() {
    let router = zoo_router();
    let m = router.lookup("/").unwrap();
    assert_eq!(m.template(), "/");
    assert!(m.path_params.is_empty());
}

#[test]
fn test_literal_route_beats_later_capture() {
    let router = zoo_router();
    let m = router.lookup("/zoo/animals").unwrap();
    assert_eq!(m.template(), "/zoo/animals");
}

#[test]
fn test_capture_routes() {
    let router = zoo_router();

    let m = router.lookup("/zoo/animals/42").unwrap();
    assert_eq!(m.template(), "/zoo/animals/{id}");
    assert_eq!(m.get_path_param("id"), Some("42"));

    let m = router.lookup("/zoo/animals/42/feedings/7").unwrap();
    assert_eq!(
        m.path_params.iter().collect::<Vec<_>>(),
        vec![("id", "42"), ("feeding_id", "7")]
    );

    let m = router.lookup("/zoo/reptiles").unwrap();
    assert_eq!(m.get_path_param("section"), Some("reptiles"));
}

#[test]
fn test_capture_inside_segment() {
    let router = zoo_router();
    let m = router.lookup("/files/report.txt").unwrap();
    assert_eq!(m.get_path_param("name"), Some("report"));
    assert!(router.lookup("/files/report.csv").is_none());
}

#[test]
fn test_captures_do_not_span_segments() {
    let router = zoo_router();
    assert!(router.lookup("/zoo/animals/42/extra").is_none());
    assert!(router.lookup("/zoo/animals/").is_none());
    assert!(router.lookup("/zoo/animals/42/").is_none());
}

#[test]
fn test_lookup_is_anchored() {
    let router = zoo_router();
    assert!(router.lookup("/prefix/zoo/animals").is_none());
    assert!(router.lookup("/files/report.txt/more").is_none());
    assert!(router.lookup("").is_none());
}

#[test]
fn test_literal_text_is_not_a_regex() {
    let mut router = Router::new();
    router.register("/v1.0/items", noop()).unwrap();
    router.register("/a+b", noop()).unwrap();
    assert!(router.lookup("/v1.0/items").is_some());
    assert!(router.lookup("/v1x0/items").is_none());
    assert!(router.lookup("/a+b").is_some());
    assert!(router.lookup("/aab").is_none());
}

#[test]
fn test_duplicate_raw_template_rejected() {
    let mut router = zoo_router();
    let before = router.templates().into_iter().map(String::from).collect::<Vec<_>>();
    let err = router.register("/zoo/animals/{id}", noop()).unwrap_err();
    assert_eq!(err, RouteError::Duplicate("/zoo/animals/{id}".to_string()));
    assert_eq!(router.templates(), before);
}

#[test]
fn test_invalid_templates_rejected() {
    let mut router = Router::new();
    assert!(matches!(
        router.register("/a/{id", noop()),
        Err(RouteError::InvalidTemplate(PatternError::UnclosedBrace { .. }))
    ));
    assert!(matches!(
        router.register("/a/{}", noop()),
        Err(RouteError::InvalidTemplate(PatternError::EmptyCapture { .. }))
    ));
    assert!(matches!(
        router.register("/a/{x}/{x}", noop()),
        Err(RouteError::InvalidTemplate(PatternError::DuplicateCapture { .. }))
    ));
    assert!(router.is_empty());
}

#[test]
fn test_pattern_round_trip() {
    let pattern = RoutePattern::compile("/users/{user_id}/posts/{post_id}").unwrap();
    assert_eq!(pattern.raw(), "/users/{user_id}/posts/{post_id}");
    let names: Vec<&str> = pattern.param_names().iter().map(|n| n.as_ref()).collect();
    assert_eq!(names, vec!["user_id", "post_id"]);
    let params = pattern.extract("/users/3/posts/abc").unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[1].1, "abc");
}
