use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_question, get_question_ids},
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::JsonBody,
        quiz::{QuizRng, ALL_CATEGORIES},
    },
    telemetry::QUIZ_QUESTION_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    // the web client sends ids as strings, and an empty id for "all"
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizTurn {
    question: Option<Question>,
    previous_questions: Vec<i64>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(quiz): State<QuizRng>,
    JsonBody(body): JsonBody<QuizBody>,
) -> ApiResponse<Json<QuizTurn>> {
    let category = if body.quiz_category.kind == ALL_CATEGORIES {
        None
    } else {
        let id = body.quiz_category.id.ok_or_else(|| {
            ApiError::UnprocessableEntity(format!(
                "quiz category {} has no id",
                body.quiz_category.kind
            ))
        })?;
        Some(id)
    };

    let candidates = get_question_ids(&pool, category).await?;
    let question = match quiz.pick(&candidates, &body.previous_questions)? {
        Some(id) => get_question(&pool, id).await?,
        None => None,
    };

    if let Some(question) = &question {
        let label = question.category.to_string();
        QUIZ_QUESTION_CNTR.with_label_values(&[label.as_str()]).inc();
    } else {
        tracing::debug!(?category, "Quiz pool exhausted");
    }

    Ok(Json(QuizTurn {
        question,
        previous_questions: body.previous_questions,
    }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_question))
}
