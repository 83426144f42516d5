use kahless::{cli::run_cli, Api, HandlerResult, Params, Request, Resource, Response, Verb};
use serde_json::json;

struct BookResource;

impl Resource for BookResource {
    fn verbs(&self) -> &[Verb] {
        &[Verb::Get, Verb::Post]
    }

    fn get(&self, _req: &Request, resp: &mut Response, _params: &Params) -> HandlerResult {
        resp.text("Books page");
        Ok(())
    }

    fn post(&self, _req: &Request, resp: &mut Response, _params: &Params) -> HandlerResult {
        resp.text("Endpoint to create a book");
        Ok(())
    }
}

fn build_app(api: &mut Api) -> anyhow::Result<()> {
    api.route("/home", |_req, resp, _params| {
        resp.text("Home");
        Ok(())
    })?
    .route("/about", |_req, resp, _params| {
        resp.text("About");
        Ok(())
    })?
    .route("/hello/{name}", |_req, resp, params| {
        resp.text(format!("Hello, {}", params.get("name").unwrap_or_default()));
        Ok(())
    })?
    .resource("/book", BookResource)?
    .route("/json", |_req, resp, _params| {
        resp.json(&json!({"name": "data", "type": "JSON"}))?;
        Ok(())
    })?
    .route("/text", |_req, resp, _params| {
        resp.text("This is a simple text");
        Ok(())
    })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    run_cli(|config| {
        let mut api = Api::with_config(config);
        build_app(&mut api)?;

        let templates = api.templates();
        api.route("/template", move |_req, resp, _params| {
            let page = templates.render(
                "index.html",
                json!({"name": "kahless", "title": "Best Framework"}),
            )?;
            resp.html(page);
            Ok(())
        })?;
        Ok(api)
    })
}
