//! HTTP handlers for the leaderboard API.

use actix_web::{web, HttpResponse};

use crate::error::{AppError, Result};
use crate::models::{
    CounterInitRequest, CounterResponse, MemberRankResponse, MemberScoreResponse, RangeEntry,
    RangeQuery, RangeResponse, ScoreResponse, SubmitScoreRequest,
};
use crate::services::weight::format_score;
use crate::services::LeaderboardService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaderboards")
            .route("/{board}/scores", web::post().to(submit_score))
            .route("/{board}/members/{member}/score", web::get().to(member_score))
            .route("/{board}/members/{member}/rank", web::get().to(member_rank))
            .route("/{board}/range", web::get().to(rank_range))
            .route("/{board}/counter", web::get().to(counter_peek))
            .route("/{board}/counter", web::put().to(counter_init)),
    );
}

/// Submit a score contribution for a member.
async fn submit_score(
    svc: web::Data<LeaderboardService>,
    board: web::Path<String>,
    req: web::Json<SubmitScoreRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let score = svc.submit(&board, &req.member, req.score).await?;
    Ok(HttpResponse::Created().json(ScoreResponse {
        board: board.into_inner(),
        member: req.member,
        score: format_score(score, svc.decimal_places()),
    }))
}

/// Display-precision score for one member; 404 when absent.
async fn member_score(
    svc: web::Data<LeaderboardService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (board, member) = path.into_inner();
    let score = svc
        .rank_score(&board, &member)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("member {member:?} in {board:?}")))?;
    Ok(HttpResponse::Ok().json(MemberScoreResponse {
        score: format_score(score, svc.decimal_places()),
    }))
}

/// 1-based rank for one member; 404 when absent.
async fn member_rank(
    svc: web::Data<LeaderboardService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (board, member) = path.into_inner();
    let rank = svc
        .rank_number(&board, &member)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("member {member:?} in {board:?}")))?;
    Ok(HttpResponse::Ok().json(MemberRankResponse { rank }))
}

/// Ranked listing; an unknown board is an empty listing, not a 404.
async fn rank_range(
    svc: web::Data<LeaderboardService>,
    board: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let entries = svc.rank_range(&board, query.start, query.end).await?;
    Ok(HttpResponse::Ok().json(RangeResponse {
        entries: entries
            .into_iter()
            .map(|entry| RangeEntry {
                member: entry.member,
                score: format_score(entry.score, svc.decimal_places()),
            })
            .collect(),
    }))
}

async fn counter_peek(
    svc: web::Data<LeaderboardService>,
    board: web::Path<String>,
) -> Result<HttpResponse> {
    let value = svc.counter().peek(&board).await?;
    Ok(HttpResponse::Ok().json(CounterResponse { value }))
}

async fn counter_init(
    svc: web::Data<LeaderboardService>,
    board: web::Path<String>,
    req: web::Json<CounterInitRequest>,
) -> Result<HttpResponse> {
    svc.counter().init(&board, req.value).await?;
    Ok(HttpResponse::NoContent().finish())
}
