use crate::session::{BrowseMode, Selection, SessionStore, DEFAULT_TOP_N, TOP_N_RANGE};
use crate::view::{recommendation_cards, PickerEntry, ProductCard};
use actix_cors::Cors;
use actix_files::NamedFile;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use skinmatch_core::{
    BrandMode, Engine, Error, IndexedProduct, Limit, RecommendRequest, SearchRequest,
};
use skinmatch_storage::{Artifacts, ImageIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared, read-only artifacts plus the session table
pub struct AppState {
    pub engine: Engine,
    pub images: ImageIndex,
    pub sessions: SessionStore,
    pub default_top_n: usize,
}

impl AppState {
    pub fn new(engine: Engine, images: ImageIndex) -> Self {
        Self {
            engine,
            images,
            sessions: SessionStore::new(),
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self::new(artifacts.engine, artifacts.images)
    }

    /// Clamped to the range the product-list selector allows
    #[must_use]
    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n.clamp(*TOP_N_RANGE.start(), *TOP_N_RANGE.end());
        self
    }

    #[must_use]
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.sessions = SessionStore::with_idle_timeout(timeout);
        self
    }

    fn card(&self, index: usize) -> Option<ProductCard> {
        self.engine
            .product(index)
            .map(|p| ProductCard::new(index, p, &self.images))
    }

    /// Target card and recommendation cards; an out-of-range product reads as
    /// an empty result
    fn recommendations_json(&self, request: &RecommendRequest) -> Result<serde_json::Value, Error> {
        let recommendations = match self.engine.recommend(request) {
            Ok(recs) => recs,
            Err(Error::ProductOutOfRange { index, len }) => {
                debug!("Product {} out of range ({} products)", index, len);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(serde_json::json!({
            "target": self.card(request.product),
            "recommendations": recommendation_cards(&recommendations, &self.images),
        }))
    }
}

#[derive(Deserialize)]
struct ProductListQuery {
    brand: Option<String>,
}

#[derive(Deserialize)]
struct RecommendBody {
    product: usize,
    limit: Option<usize>,
    #[serde(default)]
    unbounded: bool,
    brand: Option<String>,
    category: Option<String>,
    #[serde(default)]
    same_brand_only: bool,
    #[serde(default)]
    different_brand_only: bool,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum BrandModeParam {
    #[default]
    All,
    SameAsFirst,
    Specific,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    term: String,
    #[serde(default)]
    brand_mode: BrandModeParam,
    brand: Option<String>,
}

impl SearchBody {
    fn into_request(self) -> SearchRequest {
        let mode = match (self.brand_mode, self.brand) {
            (BrandModeParam::SameAsFirst, _) => BrandMode::SameAsFirst,
            (BrandModeParam::Specific, Some(brand)) if !brand.is_empty() => BrandMode::Specific(brand),
            // specific mode without a chosen brand narrows nothing
            _ => BrandMode::All,
        };
        SearchRequest::new(self.term).brand_mode(mode)
    }
}

#[derive(Deserialize)]
struct ModeBody {
    mode: BrowseMode,
}

#[derive(Deserialize)]
struct SelectionBody {
    product: usize,
    top_n: Option<usize>,
    category: Option<String>,
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message }))
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
        info!("Serving {} products on port {}", state.engine.catalog().len(), port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/stats", web::get().to(stats))
            .route("/brands", web::get().to(list_brands))
            .route("/categories", web::get().to(list_categories))
            .route("/products", web::get().to(list_products))
            .route("/products/{index}", web::get().to(get_product))
            .route("/products/{index}/image", web::get().to(product_image))
            .route("/recommendations", web::post().to(recommend))
            .route("/search", web::post().to(search))
            .route("/sessions", web::post().to(create_session))
            .route("/sessions/{id}", web::get().to(get_session))
            .route("/sessions/{id}", web::delete().to(delete_session))
            .route("/sessions/{id}/mode", web::put().to(set_session_mode))
            .route("/sessions/{id}/selection", web::put().to(select_product))
            .route("/sessions/{id}/selection", web::delete().to(reset_selection))
            .route("/sessions/{id}/recommendations", web::get().to(session_recommendations));
    }
}

async fn stats(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": state.engine.stats() })))
}

async fn list_brands(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": state.engine.catalog().brands() })))
}

async fn list_categories(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let categories = state.engine.catalog().categories();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "available": categories.is_some(),
        "result": categories,
    })))
}

async fn list_products(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ProductListQuery>,
) -> ActixResult<HttpResponse> {
    let catalog = state.engine.catalog();
    let to_entry = |p: IndexedProduct<'_>| PickerEntry {
        index: p.index,
        label: p.product.label(),
    };
    let entries: Vec<PickerEntry> = match query.brand.as_deref() {
        Some(brand) => catalog.by_brand(brand).map(to_entry).collect(),
        None => catalog.iter().map(to_entry).collect(),
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": entries })))
}

async fn get_product(
    state: web::Data<Arc<AppState>>,
    path: web::Path<usize>,
) -> ActixResult<HttpResponse> {
    match state.card(path.into_inner()) {
        Some(card) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": card }))),
        None => Ok(not_found("Product not found")),
    }
}

async fn product_image(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<usize>,
) -> ActixResult<HttpResponse> {
    let Some(image) = state.images.get(path.into_inner()) else {
        return Ok(not_found("No image for product"));
    };
    match NamedFile::open(image) {
        Ok(file) => Ok(file.into_response(&req)),
        Err(e) => {
            debug!("Indexed image {:?} unreadable: {}", image, e);
            Ok(not_found("No image for product"))
        }
    }
}

async fn recommend(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RecommendBody>,
) -> ActixResult<HttpResponse> {
    let body = req.into_inner();
    let limit = if body.unbounded {
        Limit::Unbounded
    } else {
        Limit::Top(body.limit.unwrap_or(state.default_top_n))
    };
    let request = RecommendRequest {
        product: body.product,
        limit,
        brand: body.brand,
        category: body.category,
        same_brand_only: body.same_brand_only,
        different_brand_only: body.different_brand_only,
    };

    match state.recommendations_json(&request) {
        Ok(result) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": result }))),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn search(
    state: web::Data<Arc<AppState>>,
    req: web::Json<SearchBody>,
) -> ActixResult<HttpResponse> {
    let request = req.into_inner().into_request();
    let hits = state.engine.search(&request);
    let executed = hits.is_some();
    let cards: Vec<ProductCard> = hits
        .unwrap_or_default()
        .iter()
        .map(|hit| ProductCard::new(hit.index, &hit.product, &state.images))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "term": request.term,
        "executed": executed,
        "count": cards.len(),
        "result": cards,
    })))
}

async fn create_session(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let session = state.sessions.create();
    debug!("Session {} created ({} active)", session.id, state.sessions.len());
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": session })))
}

async fn get_session(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    match state.sessions.get(&path.into_inner()) {
        Some(session) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": session }))),
        None => Ok(not_found("Session not found")),
    }
}

async fn delete_session(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    if state.sessions.remove(&path.into_inner()) {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true })))
    } else {
        Ok(not_found("Session not found"))
    }
}

async fn set_session_mode(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
    req: web::Json<ModeBody>,
) -> ActixResult<HttpResponse> {
    let mode = req.mode;
    match state.sessions.update(&path.into_inner(), |s| s.set_mode(mode)) {
        Some(session) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": session }))),
        None => Ok(not_found("Session not found")),
    }
}

async fn select_product(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
    req: web::Json<SelectionBody>,
) -> ActixResult<HttpResponse> {
    let body = req.into_inner();
    if state.engine.product(body.product).is_none() {
        return Ok(not_found("Product not found"));
    }
    let selection = match Selection::new(
        body.product,
        body.top_n.unwrap_or(state.default_top_n),
        body.category,
    ) {
        Ok(selection) => selection,
        Err(e) => return Ok(bad_request(e)),
    };

    match state.sessions.update(&path.into_inner(), |s| s.select(selection)) {
        Some(session) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": session }))),
        None => Ok(not_found("Session not found")),
    }
}

async fn reset_selection(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    match state.sessions.update(&path.into_inner(), |s| s.reset()) {
        Some(session) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": session }))),
        None => Ok(not_found("Session not found")),
    }
}

async fn session_recommendations(
    state: web::Data<Arc<AppState>>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let Some(session) = state.sessions.get(&path.into_inner()) else {
        return Ok(not_found("Session not found"));
    };
    let Some(request) = session.recommend_request() else {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "error": "No product selected"
        })));
    };

    match state.recommendations_json(&request) {
        Ok(result) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": result }))),
        Err(e) => Ok(bad_request(e)),
    }
}
