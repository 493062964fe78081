use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{find_category_id, get_all_categories},
            questions::{self, get_questions_page, QuestionOrder},
        },
        Category, NewQuestion, Page, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_lenient_i64,
        error::ApiError,
        extractors::{JsonBody, PathId, QueryParams},
    },
};

use super::{ApiResponse, CurrentCategory, Success};

#[derive(Deserialize)]
struct QuestionsQuery {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    category: Option<i64>,
}

#[derive(Deserialize)]
struct NewQuestionBody {
    question: String,
    answer: String,
    /// Category label, not id
    category: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    pages: Vec<i64>,
    total_questions: i64,
    current_category: CurrentCategory,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<QuestionsQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let category = query.category.filter(|id| *id > 0);
    let page = Page::new(query.page.unwrap_or(1));

    let questions = get_questions_page(&pool, category, QuestionOrder::Category, page).await?;
    if questions.is_out_of_range() {
        return Err(ApiError::NotFound);
    }
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        pages: questions.page_numbers(),
        total_questions: questions.total,
        questions: questions.items,
        current_category: CurrentCategory::All,
        categories,
    }))
}

async fn question(
    State(pool): State<SqlitePool>,
    PathId(id): PathId<i64>,
) -> ApiResponse<Json<Question>> {
    questions::get_question(&pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_question(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<NewQuestionBody>,
) -> ApiResponse<Json<Success>> {
    if body.question.trim().is_empty() || body.answer.trim().is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "question and answer must not be empty".to_owned(),
        ));
    }
    let category = find_category_id(&pool, &body.category)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!("Unknown category {}", body.category))
        })?;

    let id = questions::create_question(
        &pool,
        &NewQuestion {
            question: body.question,
            answer: body.answer,
            category,
            difficulty: body.difficulty,
        },
    )
    .await?;
    tracing::info!(id, category, "Question created");

    Ok(Json(Success::ok()))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    PathId(id): PathId<i64>,
) -> ApiResponse<Json<Success>> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "Question deleted");
    Ok(Json(Success::ok()))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    let questions = questions::search_questions(&pool, &body.search_term).await?;
    Ok(Json(SearchResults {
        total_questions: questions.len(),
        questions,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", get(question).delete(delete_question))
        .route("/search_questions", post(search_questions))
}
