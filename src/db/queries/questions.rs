use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub category: String,
    pub question: String,
    pub answer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub category: String,
    pub question: String,
    pub answer: String,
}

impl Question {
    pub fn from_new(id: i64, new: NewQuestion) -> Self {
        Question {
            id,
            category: new.category,
            question: new.question,
            answer: new.answer,
        }
    }
}

pub async fn create_question<'e, E>(executor: E, question: &NewQuestion) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query(
        r#"
INSERT INTO questions (category, question, answer) VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(&question.category)
    .bind(&question.question)
    .bind(&question.answer)
    .execute(executor)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn create_question_with_id<'e, E>(executor: E, question: &Question) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
INSERT INTO questions (id, category, question, answer) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question.id)
    .bind(&question.category)
    .bind(&question.question)
    .bind(&question.answer)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_question_by_id<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<Question>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, answer FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_all_questions<'e, E>(executor: E) -> sqlx::Result<Vec<Question>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, answer FROM questions ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Exact, case-sensitive match on the category column (BINARY collation).
pub async fn get_questions_by_category<'e, E>(executor: E, category: &str) -> sqlx::Result<Vec<Question>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, answer FROM questions WHERE questions.category = ?1 ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(executor)
    .await
}

pub async fn get_categories<'e, E>(executor: E) -> sqlx::Result<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT category FROM questions ORDER BY category
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Returns `false` when no row has `question.id`.
pub async fn update_question<'e, E>(executor: E, question: &Question) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE questions SET category=?1, question=?2, answer=?3 WHERE questions.id = ?4
        "#,
    )
    .bind(&question.category)
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_question<'e, E>(executor: E, id: i64) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_questions<'e, E>(executor: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(executor)
        .await
}

/// Replaces the stored set with `questions`, matching rows by id. Runs in one
/// transaction: on any error the table is left as it was.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    let existing_ids: HashSet<i64> = get_all_questions(&mut *tx)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    for id in existing_ids.difference(&new_ids) {
        delete_question(&mut *tx, *id).await?;
    }
    for question in questions {
        if existing_ids.contains(&question.id) {
            update_question(&mut *tx, &question).await?;
        } else {
            create_question_with_id(&mut *tx, &question).await?;
        }
    }
    tx.commit().await?;
    tracing::info!(
        deleted = existing_ids.difference(&new_ids).count(),
        "Imported questions"
    );
    Ok(())
}
