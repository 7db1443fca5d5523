use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{
        LevelsResponse, MatchSnapshot, QuestionView, SelectOptionRequest, SetLevelRequest,
        SetNameRequest, ShareResponse,
    },
    error::AppError,
    services::match_service,
    state::SharedState,
};

/// Routes carrying the player's intents for the single match session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/match", get(get_match))
        .route("/match/name", post(set_name))
        .route("/match/name/random", post(random_name))
        .route("/match/level", post(set_level))
        .route("/match/find", post(find_opponent))
        .route("/match/answer", post(select_option))
        .route("/match/quit", post(quit_match))
        .route("/match/play-again", post(play_again))
        .route("/match/home", post(go_home))
        .route("/match/share", get(share))
        .route("/match/question", get(current_question))
        .route("/levels", get(list_levels))
}

/// Current match snapshot.
#[utoipa::path(
    get,
    path = "/match",
    tag = "match",
    responses((status = 200, description = "Current match snapshot", body = MatchSnapshot))
)]
pub async fn get_match(State(state): State<SharedState>) -> Json<MatchSnapshot> {
    Json(match_service::snapshot(&state).await)
}

/// Replace the player name on the home screen.
#[utoipa::path(
    post,
    path = "/match/name",
    tag = "match",
    request_body = SetNameRequest,
    responses(
        (status = 200, description = "Name updated", body = MatchSnapshot),
        (status = 400, description = "Name rejected"),
        (status = 409, description = "Not on the home screen")
    )
)]
pub async fn set_name(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SetNameRequest>>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::set_name(&state, payload.name).await?;
    Ok(Json(snapshot))
}

/// Pick a random guest name.
#[utoipa::path(
    post,
    path = "/match/name/random",
    tag = "match",
    responses(
        (status = 200, description = "Name generated", body = MatchSnapshot),
        (status = 409, description = "Not on the home screen")
    )
)]
pub async fn random_name(
    State(state): State<SharedState>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::random_name(&state).await?;
    Ok(Json(snapshot))
}

/// Select the difficulty of the next match.
#[utoipa::path(
    post,
    path = "/match/level",
    tag = "match",
    request_body = SetLevelRequest,
    responses(
        (status = 200, description = "Level selected", body = MatchSnapshot),
        (status = 409, description = "Not on the home screen")
    )
)]
pub async fn set_level(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SetLevelRequest>>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::set_level(&state, payload.level).await?;
    Ok(Json(snapshot))
}

/// Start searching for an opponent.
#[utoipa::path(
    post,
    path = "/match/find",
    tag = "match",
    responses(
        (status = 200, description = "Searching for an opponent", body = MatchSnapshot),
        (status = 400, description = "Player name is blank"),
        (status = 409, description = "Not on the home screen")
    )
)]
pub async fn find_opponent(
    State(state): State<SharedState>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::find_opponent(&state).await?;
    Ok(Json(snapshot))
}

/// Answer the current question.
#[utoipa::path(
    post,
    path = "/match/answer",
    tag = "match",
    request_body = SelectOptionRequest,
    responses(
        (status = 200, description = "Answer recorded or ignored", body = MatchSnapshot),
        (status = 400, description = "Option index out of range"),
        (status = 409, description = "No match in progress")
    )
)]
pub async fn select_option(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SelectOptionRequest>>,
) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::select_option(&state, payload.index).await?;
    Ok(Json(snapshot))
}

/// Abandon the running match.
#[utoipa::path(
    post,
    path = "/match/quit",
    tag = "match",
    responses(
        (status = 200, description = "Back on the home screen", body = MatchSnapshot),
        (status = 409, description = "No match in progress")
    )
)]
pub async fn quit_match(State(state): State<SharedState>) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::quit_match(&state).await?;
    Ok(Json(snapshot))
}

/// Leave the result screen for a fresh round.
#[utoipa::path(
    post,
    path = "/match/play-again",
    tag = "match",
    responses(
        (status = 200, description = "Back on the home screen", body = MatchSnapshot),
        (status = 409, description = "Not on the result screen")
    )
)]
pub async fn play_again(State(state): State<SharedState>) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::play_again(&state).await?;
    Ok(Json(snapshot))
}

/// Leave the result screen.
#[utoipa::path(
    post,
    path = "/match/home",
    tag = "match",
    responses(
        (status = 200, description = "Back on the home screen", body = MatchSnapshot),
        (status = 409, description = "Not on the result screen")
    )
)]
pub async fn go_home(State(state): State<SharedState>) -> Result<Json<MatchSnapshot>, AppError> {
    let snapshot = match_service::go_home(&state).await?;
    Ok(Json(snapshot))
}

/// Shareable line for the current score.
#[utoipa::path(
    get,
    path = "/match/share",
    tag = "match",
    responses((status = 200, description = "Share text", body = ShareResponse))
)]
pub async fn share(State(state): State<SharedState>) -> Json<ShareResponse> {
    Json(match_service::share(&state).await)
}

/// Question currently on screen.
#[utoipa::path(
    get,
    path = "/match/question",
    tag = "match",
    responses(
        (status = 200, description = "Current question", body = QuestionView),
        (status = 404, description = "No question on screen")
    )
)]
pub async fn current_question(
    State(state): State<SharedState>,
) -> Result<Json<QuestionView>, AppError> {
    let question = match_service::current_question(&state).await?;
    Ok(Json(question))
}

/// Levels with their countdown, opponent strength and pool size.
#[utoipa::path(
    get,
    path = "/levels",
    tag = "match",
    responses((status = 200, description = "Available levels", body = LevelsResponse))
)]
pub async fn list_levels(State(state): State<SharedState>) -> Json<LevelsResponse> {
    Json(match_service::levels(&state))
}
