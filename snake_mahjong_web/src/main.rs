use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use snake_mahjong_core::{
    best_claim_request, claim_request, draw_request, evaluate_request, highlight_request,
    sort_request, BestClaimRequest, BestClaimResult, ClaimRequest, ClaimResult, DrawRequest,
    DrawResult, EvaluateRequest, EvaluateResult, HighlightResult, Rules, SortRequest, SortResult,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Default)]
struct AppState {
    rules: Rules,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("SNAKE_MAHJONG_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let app = app(Arc::new(AppState::default()));

    info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/evaluate", post(evaluate))
        .route("/api/claim", post(claim))
        .route("/api/claim/best", post(best_claim))
        .route("/api/claim/highlights", post(highlights))
        .route("/api/draw", post(draw))
        .route("/api/sort", post(sort))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn evaluate(
    State(state): State<Arc<AppState>>,
    req: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResult>, ApiError> {
    let Json(req) = req?;
    let result = evaluate_request(&req, &state.rules)?;
    debug!(
        tiles = req.tiles.len(),
        win = result.is_win,
        score = result.score,
        "evaluate"
    );
    Ok(Json(result))
}

async fn claim(
    State(state): State<Arc<AppState>>,
    req: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Json<ClaimResult>, ApiError> {
    let Json(req) = req?;
    let result = claim_request(&req, &state.rules)?;
    debug!(kind = ?result.claim.as_ref().map(|c| c.kind), "claim");
    Ok(Json(result))
}

async fn best_claim(
    State(state): State<Arc<AppState>>,
    req: Result<Json<BestClaimRequest>, JsonRejection>,
) -> Result<Json<BestClaimResult>, ApiError> {
    let Json(req) = req?;
    let result = best_claim_request(&req, &state.rules)?;
    Ok(Json(result))
}

async fn highlights(
    State(state): State<Arc<AppState>>,
    req: Result<Json<BestClaimRequest>, JsonRejection>,
) -> Result<Json<HighlightResult>, ApiError> {
    let Json(req) = req?;
    let result = highlight_request(&req, &state.rules)?;
    Ok(Json(result))
}

async fn draw(
    State(state): State<Arc<AppState>>,
    req: Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<DrawResult>, ApiError> {
    let Json(req) = req?;
    let result = draw_request(&req, &state.rules)?;
    debug!(concealed_quad = result.lock_plan.is_some(), "draw");
    Ok(Json(result))
}

async fn sort(req: Result<Json<SortRequest>, JsonRejection>) -> Result<Json<SortResult>, ApiError> {
    let Json(req) = req?;
    Ok(Json(sort_request(&req)?))
}

#[derive(Debug)]
struct ApiError(String);

impl From<String> for ApiError {
    fn from(msg: String) -> Self {
        ApiError(msg)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError(rej.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self.0, "rejected request");
        (StatusCode::BAD_REQUEST, self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_mahjong_core::{ClaimKind, GroupId, Pattern, Tile};

    fn hand(codes: &str) -> Vec<Tile> {
        codes
            .split_whitespace()
            .map(|c| Tile::from_code(c).unwrap())
            .collect()
    }

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState::default()))
    }

    #[tokio::test]
    async fn health_says_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn evaluate_reports_patterns() {
        let req = EvaluateRequest {
            tiles: hand("2p 3p 4p 3p 4p 5p 5p 6p 7p 6p 7p 8p 8p 8p"),
            capacity: Some(14),
        };
        let Json(res) = evaluate(state(), Ok(Json(req))).await.unwrap();
        assert!(res.is_win);
        assert_eq!(
            res.patterns,
            vec![Pattern::Standard, Pattern::AllSimples, Pattern::FullFlush]
        );
        assert_eq!(res.score, 8);
    }

    #[tokio::test]
    async fn evaluate_rejects_zero_capacity() {
        let req = EvaluateRequest {
            tiles: hand("1m"),
            capacity: Some(0),
        };
        let err = evaluate(state(), Ok(Json(req))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn claim_and_best_claim() {
        let req = ClaimRequest {
            attacker: hand("3s 4s"),
            defender_tile: Some(Tile::from_code("5s").unwrap()),
            upstream: true,
            at_capacity: None,
            capacity: None,
            fresh_group: None,
        };
        let Json(res) = claim(state(), Ok(Json(req))).await.unwrap();
        let c = res.claim.unwrap();
        assert_eq!(c.kind, ClaimKind::Run);
        assert_eq!(c.effect_label, "Chow!");
        assert_eq!(res.points, 50);
        assert_eq!(res.lock_plan.unwrap().slots, vec![0, 1]);

        let req = BestClaimRequest {
            attacker: hand("3s 4s E E"),
            defender: vec![
                Some(Tile::from_code("5s").unwrap()),
                None,
                Some(Tile::from_code("E").unwrap()),
            ],
            upstream: true,
            at_capacity: None,
            capacity: None,
            fresh_group: None,
        };
        let Json(res) = best_claim(state(), Ok(Json(req.clone()))).await.unwrap();
        assert_eq!(res.slot, Some(2));
        assert_eq!(res.claim.unwrap().kind, ClaimKind::Triplet);

        let Json(res) = highlights(state(), Ok(Json(req))).await.unwrap();
        assert_eq!(res.highlights.len(), 2);
    }

    #[tokio::test]
    async fn oversized_hand_is_a_bad_request() {
        let req = EvaluateRequest {
            tiles: hand("1m 1m 1m 2m 2m 2m 3m 3m 3m 4m 4m 4m 5m 5m 5m 6m 6m 6m 7m"),
            capacity: None,
        };
        let err = evaluate(state(), Ok(Json(req))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn draw_reports_concealed_quad() {
        let req = DrawRequest {
            hand: hand("S S S 4p"),
            gained: Tile::from_code("S").unwrap(),
            fresh_group: Some(GroupId(3)),
        };
        let Json(res) = draw(state(), Ok(Json(req))).await.unwrap();
        assert_eq!(res.lock_plan.unwrap().group, GroupId(3));
        assert_eq!(res.points, 300);
    }

    #[tokio::test]
    async fn sort_arranges_tiles() {
        let req = SortRequest {
            tiles: hand("W 2s 1m"),
        };
        let Json(res) = sort(Ok(Json(req))).await.unwrap();
        let codes: Vec<String> = res.tiles.iter().map(|t| t.key().code()).collect();
        assert_eq!(codes, ["1m", "2s", "W"]);
    }
}
