use std::sync::Arc;
use std::{fs, io};

use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::config::Config;
use crate::content::Post;
use crate::paginator::Paginator;
use crate::query_string::QueryString;
use crate::repository::PostRepository;
use crate::search::filter_posts;
use crate::view::list_renderer::{ListContext, ListRenderer};
use crate::view::post_renderer::PostRenderer;
use crate::view::rss_renderer::RssChannel;

struct AppState {
    config: Config,
    repository: PostRepository,
}

fn read_template(state: &AppState, file_name: &str) -> io::Result<String> {
    let full_path = state.config.paths.template_dir.join(file_name);
    fs::read_to_string(full_path)
}

fn parse_query(req: &HttpRequest) -> QueryString {
    QueryString::from(req.uri().query().unwrap_or(""))
}

fn render_list(state: &AppState, req: &HttpRequest, tag: Option<&str>) -> io::Result<String> {
    let qs = parse_query(req);
    let query = qs.get_query();
    let cur_page = qs.get_page();

    let mut posts = state.repository.list_sorted();
    if let Some(tag) = tag {
        posts.retain(|post| post.meta.tags.iter().any(|t| t == tag));
    }

    let outcome = filter_posts(&posts, query);
    let tags = state.repository.list_tags();
    let recommended = PostRepository::recommended(&posts);

    let template_src = read_template(state, "postlist.tpl")?;

    if outcome.searching {
        // Search results are a single page
        let renderer = ListRenderer::new(&template_src, 1)?;
        let ctx = ListContext {
            site_title: &state.config.site.title,
            tags: &tags,
            cur_page: 1,
            searching: true,
            query,
        };
        return Ok(renderer.render(&outcome.results, &recommended, &ctx));
    }

    let paginator = Paginator::new(&posts, state.config.render.page_size);
    let cur_page = match cur_page {
        x if x > paginator.page_count() => 1,
        x => x,
    };

    let page: Vec<&Post> = if paginator.page_count() == 0 {
        vec![]
    } else {
        match paginator.get_page(cur_page) {
            Ok(page) => page.iter().collect(),
            Err(err_desc) => return Err(io::Error::new(io::ErrorKind::InvalidInput, err_desc)),
        }
    };

    let renderer = ListRenderer::new(&template_src, paginator.page_count())?;
    let ctx = ListContext {
        site_title: &state.config.site.title,
        tags: &tags,
        cur_page,
        searching: false,
        query: "",
    };
    Ok(renderer.render(&page, &recommended, &ctx))
}

#[web::get("/")]
async fn index(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_list(&state, &req, None) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Error rendering post list: {}", e);
            web::HttpResponse::InternalServerError().body(format!("Error listing posts: {}", e))
        }
    }
}

#[web::get("/tags/{tag}/")]
async fn list_with_tag(
    req: HttpRequest,
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let tag = path.into_inner();
    match render_list(&state, &req, Some(&tag)) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Error rendering tag list for {}: {}", tag, e);
            web::HttpResponse::InternalServerError().body(format!("Error listing posts: {}", e))
        }
    }
}

#[web::get("/view/{post}")]
async fn view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", path.into_inner() + "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/view/{post}/")]
async fn view(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let slug = path.into_inner();

    let post = match state.repository.get_by_slug(&slug) {
        Some(post) => post,
        None => {
            return web::HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(format!("Post not found: {}", slug));
        }
    };

    let rendered = read_template(&state, "view.tpl")
        .and_then(|src| Ok(PostRenderer::new(&src)?.render(&post)));
    match rendered {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Error rendering post {}: {}", slug, e);
            web::HttpResponse::InternalServerError().body(format!("Error loading post: {}", e))
        }
    }
}

#[web::get("/images/{file_name}")]
async fn image_files(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state
        .config
        .paths
        .public_dir
        .join("images")
        .join(path.into_inner());
    Ok(NamedFile::open(file_path)?)
}

#[web::get("/rss.xml")]
async fn rss_feed(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = state.repository.list_sorted();
    let channel = RssChannel {
        site: &state.config.site,
    };

    match channel.render(&posts) {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/rss+xml; charset=utf-8")
            .body(xml),
        Err(e) => {
            error!("Error rendering RSS feed: {}", e);
            web::HttpResponse::InternalServerError().body(format!("Error rendering feed: {}", e))
        }
    }
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let repository = PostRepository::new(
        config.paths.posts_dir.clone(),
        config.render.diagram_base_url(),
    );
    for post in repository.list_all() {
        info!("Post: {}", post.slug);
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { config, repository });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(list_with_tag)
            .service(view)
            .service(view_wo_slash)
            .service(image_files)
            .service(rss_feed)
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await
}
