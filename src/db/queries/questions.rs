use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::db::pagination::{Page, Paginated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    /// By category, ties by id
    Category,
    Id,
}

impl QuestionOrder {
    fn as_sql(self) -> &'static str {
        match self {
            QuestionOrder::Category => "category, id",
            QuestionOrder::Id => "id",
        }
    }
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// One page of questions, optionally restricted to a single category.
pub async fn get_questions_page(
    pool: &SqlitePool,
    category: Option<i64>,
    order: QuestionOrder,
    page: Page,
) -> sqlx::Result<Paginated<Question>> {
    let total: i64 = sqlx::query_scalar(
        r#"
SELECT COUNT(*) FROM questions WHERE (?1 IS NULL OR questions.category = ?1)
        "#,
    )
    .bind(category)
    .fetch_one(pool)
    .await?;

    let query = format!(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE (?1 IS NULL OR questions.category = ?1)
ORDER BY {}
LIMIT ?2 OFFSET ?3
        "#,
        order.as_sql()
    );
    let items = sqlx::query_as::<_, Question>(&query)
        .bind(category)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated { items, page, total })
}

/// Case-insensitive substring match on the question text, ordered by category.
/// SQLite only folds ASCII case, so matching happens after the fetch.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY category, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn get_question_ids(pool: &SqlitePool, category: Option<i64>) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(
        r#"
SELECT id FROM questions WHERE (?1 IS NULL OR questions.category = ?1) ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no question had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn add(pool: &SqlitePool, text: &str, category: i64) -> i64 {
        create_question(
            pool,
            &NewQuestion {
                question: text.to_owned(),
                answer: "answer".to_owned(),
                category,
                difficulty: 1,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_delete() {
        let pool = test_pool().await;
        let id = add(&pool, "Who painted the Mona Lisa?", 2).await;

        let question = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(question.category, 2);

        assert!(delete_question(&pool, id).await.unwrap());
        assert!(get_question(&pool, id).await.unwrap().is_none());
        assert!(!delete_question(&pool, id).await.unwrap());
    }

    #[tokio::test]
    async fn pages_are_ordered_by_category_then_id() {
        let pool = test_pool().await;
        let sport = add(&pool, "sport", 6).await;
        let science = add(&pool, "science", 1).await;
        let art = add(&pool, "art", 2).await;

        let page = get_questions_page(&pool, None, QuestionOrder::Category, Page::new(1))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![science, art, sport]);
        assert_eq!(page.total, 3);

        let page = get_questions_page(&pool, None, QuestionOrder::Id, Page::new(1))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![sport, science, art]);
    }

    #[tokio::test]
    async fn page_slices_and_category_filter() {
        let pool = test_pool().await;
        for n in 0..23 {
            add(&pool, &format!("question {n}"), 1 + n % 2).await;
        }

        let third = get_questions_page(&pool, None, QuestionOrder::Category, Page::new(3))
            .await
            .unwrap();
        assert_eq!(third.items.len(), 3);
        assert_eq!(third.total_pages(), 3);

        let art = get_questions_page(&pool, Some(2), QuestionOrder::Id, Page::new(2))
            .await
            .unwrap();
        assert_eq!(art.total, 11);
        assert_eq!(art.items.len(), 1);
        assert!(art.items.iter().all(|q| q.category == 2));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_literal_substring() {
        let pool = test_pool().await;
        add(&pool, "Which Movie won best picture?", 5).await;
        add(&pool, "What is 100% of 3?", 1).await;
        add(&pool, "Name a movie star", 5).await;
        add(&pool, "Who wrote Hamlet?", 4).await;

        let found = search_questions(&pool, "movie").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = search_questions(&pool, "0%").await.unwrap();
        assert_eq!(found.len(), 1);

        let ecole = add(&pool, "Which ÉCOLE is oldest?", 4).await;
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.iter().map(|q| q.id).collect::<Vec<_>>(), vec![ecole]);

        assert_eq!(search_questions(&pool, "").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn question_ids_by_category() {
        let pool = test_pool().await;
        let first = add(&pool, "one", 3).await;
        let second = add(&pool, "two", 4).await;

        assert_eq!(get_question_ids(&pool, None).await.unwrap(), vec![first, second]);
        assert_eq!(get_question_ids(&pool, Some(4)).await.unwrap(), vec![second]);
        assert!(get_question_ids(&pool, Some(6)).await.unwrap().is_empty());
    }
}
