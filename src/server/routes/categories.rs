use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::{get_questions_page, QuestionOrder},
        },
        Category, Page, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_lenient_i64,
        error::ApiError,
        extractors::{PathId, QueryParams},
    },
};

use super::{ApiResponse, CurrentCategory};

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
}

#[derive(Serialize)]
struct CategoriesList {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    total_questions: i64,
    current_category: CurrentCategory,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesList { categories }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    PathId(id): PathId<i64>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let page = Page::new(query.page.unwrap_or(1));

    // ids below one mean "every category"
    if id <= 0 {
        let questions = get_questions_page(&pool, None, QuestionOrder::Category, page).await?;
        if questions.is_out_of_range() {
            return Err(ApiError::NotFound);
        }
        return Ok(Json(CategoryQuestions {
            total_questions: questions.total,
            questions: questions.items,
            current_category: CurrentCategory::All,
        }));
    }

    let questions = get_questions_page(&pool, Some(id), QuestionOrder::Id, page).await?;
    if questions.is_out_of_range() || questions.items.is_empty() {
        return Err(ApiError::NotFound);
    }
    match get_category(&pool, id).await? {
        Some(category) => Ok(Json(CategoryQuestions {
            total_questions: questions.total,
            questions: questions.items,
            current_category: CurrentCategory::Named(category.kind),
        })),
        None => Err(ApiError::NotFound),
    }
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
}
