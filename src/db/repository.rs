//! Repository ports over the `questions` table.
//!
//! [`CrudRepository`] is the generic persistence surface; [`QuestionRepository`]
//! adds the lookup by category on top of it. [`SqliteQuestionRepository`]
//! implements both with the statements in [`crate::db::queries::questions`].
//! Engine failures are returned as-is.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::queries::questions;
use super::{NewQuestion, Question};

/// Generic create / read / update / delete / count over one entity type.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Entity;
    type Id;
    type New;

    /// Stores a new entity and returns it with its assigned id.
    async fn create(&self, new: Self::New) -> sqlx::Result<Self::Entity>;
    async fn find_by_id(&self, id: Self::Id) -> sqlx::Result<Option<Self::Entity>>;
    /// All entities, ordered by id.
    async fn find_all(&self) -> sqlx::Result<Vec<Self::Entity>>;
    /// Returns `false` if the entity does not exist.
    async fn update(&self, entity: Self::Entity) -> sqlx::Result<bool>;
    /// Returns `false` if the entity does not exist.
    async fn delete(&self, id: Self::Id) -> sqlx::Result<bool>;
    async fn count(&self) -> sqlx::Result<i64>;
}

#[async_trait]
pub trait QuestionRepository:
    CrudRepository<Entity = Question, Id = i64, New = NewQuestion>
{
    /// Every question whose category equals `category` byte for byte, ordered by id.
    /// No match is an empty vector.
    async fn find_by_category(&self, category: &str) -> sqlx::Result<Vec<Question>>;

    /// Distinct categories in use, sorted.
    async fn categories(&self) -> sqlx::Result<Vec<String>>;
}

#[derive(Clone)]
pub struct SqliteQuestionRepository {
    pool: SqlitePool,
}

impl SqliteQuestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository for SqliteQuestionRepository {
    type Entity = Question;
    type Id = i64;
    type New = NewQuestion;

    #[tracing::instrument(skip(self, new), fields(category = %new.category))]
    async fn create(&self, new: NewQuestion) -> sqlx::Result<Question> {
        let id = questions::create_question(&self.pool, &new).await?;
        tracing::debug!(id, "Question created");
        Ok(Question::from_new(id, new))
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<Question>> {
        questions::get_question_by_id(&self.pool, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> sqlx::Result<Vec<Question>> {
        questions::get_all_questions(&self.pool).await
    }

    #[tracing::instrument(skip(self, question), fields(id = question.id))]
    async fn update(&self, question: Question) -> sqlx::Result<bool> {
        questions::update_question(&self.pool, &question).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> sqlx::Result<bool> {
        questions::delete_question(&self.pool, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> sqlx::Result<i64> {
        questions::count_questions(&self.pool).await
    }
}

#[async_trait]
impl QuestionRepository for SqliteQuestionRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_category(&self, category: &str) -> sqlx::Result<Vec<Question>> {
        let found = questions::get_questions_by_category(&self.pool, category).await?;
        tracing::debug!(found = found.len(), "Category lookup");
        Ok(found)
    }

    #[tracing::instrument(skip(self))]
    async fn categories(&self) -> sqlx::Result<Vec<String>> {
        questions::get_categories(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::DatabaseSettings;
    use crate::db::{establish_connection, run_migrations, tests::test_pool};

    fn new_question(category: &str, text: &str) -> NewQuestion {
        NewQuestion {
            category: category.to_owned(),
            question: text.to_owned(),
            answer: "42".to_owned(),
        }
    }

    async fn seeded(categories: &[&str]) -> (SqliteQuestionRepository, Vec<Question>) {
        let repo = SqliteQuestionRepository::new(test_pool().await);
        let mut stored = Vec::new();
        for (n, category) in categories.iter().enumerate() {
            stored.push(
                repo.create(new_question(category, &format!("question {n}")))
                    .await
                    .unwrap(),
            );
        }
        (repo, stored)
    }

    fn ids(questions: &[Question]) -> Vec<i64> {
        questions.iter().map(|q| q.id).collect()
    }

    #[tokio::test]
    async fn returns_only_matching_category() {
        let (repo, stored) = seeded(&["math", "history", "math"]).await;

        let math = repo.find_by_category("math").await.unwrap();
        assert_eq!(ids(&math), vec![stored[0].id, stored[2].id]);
        assert!(math.iter().all(|q| q.category == "math"));

        assert!(repo.find_by_category("science").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_store_yields_empty_result() {
        let repo = SqliteQuestionRepository::new(test_pool().await);
        assert_eq!(repo.find_by_category("math").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn match_is_case_sensitive_and_exact() {
        let (repo, stored) = seeded(&["Math", "math", " math", "mathematics", ""]).await;

        assert_eq!(ids(&repo.find_by_category("math").await.unwrap()), vec![stored[1].id]);
        assert_eq!(ids(&repo.find_by_category("Math").await.unwrap()), vec![stored[0].id]);
        assert_eq!(ids(&repo.find_by_category("").await.unwrap()), vec![stored[4].id]);
        assert!(repo.find_by_category("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_is_idempotent() {
        let (repo, _) = seeded(&["math", "history", "math", "math"]).await;
        let first = repo.find_by_category("math").await.unwrap();
        let second = repo.find_by_category("math").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn lookup_equals_filtered_find_all() {
        let (repo, _) = seeded(&["a", "b", "c", "a", "b", "a", "d"]).await;
        let all = repo.find_all().await.unwrap();
        let categories: HashSet<&str> = all.iter().map(|q| q.category.as_str()).collect();
        for category in categories.into_iter().chain(["e"]) {
            let expected: Vec<Question> = all
                .iter()
                .filter(|q| q.category == category)
                .cloned()
                .collect();
            assert_eq!(repo.find_by_category(category).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn update_moves_question_between_categories() {
        let (repo, stored) = seeded(&["math", "history"]).await;
        let mut moved = stored[0].clone();
        moved.category = "history".to_owned();
        assert!(repo.update(moved.clone()).await.unwrap());

        assert!(repo.find_by_category("math").await.unwrap().is_empty());
        assert_eq!(
            ids(&repo.find_by_category("history").await.unwrap()),
            vec![stored[0].id, stored[1].id]
        );
        assert_eq!(repo.find_by_id(moved.id).await.unwrap(), Some(moved));
    }

    #[tokio::test]
    async fn crud_round() {
        let (repo, stored) = seeded(&["math", "history"]).await;
        assert_eq!(repo.count().await.unwrap(), 2);

        assert!(repo.delete(stored[0].id).await.unwrap());
        assert!(!repo.delete(stored[0].id).await.unwrap());
        assert_eq!(repo.find_by_id(stored[0].id).await.unwrap(), None);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_all().await.unwrap(), vec![stored[1].clone()]);

        let ghost = Question::from_new(999, new_question("math", "ghost"));
        assert!(!repo.update(ghost).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_lookups_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings {
            path: dir.path().join("quiz.db"),
            max_connections: 4,
            ..Default::default()
        };
        let pool = establish_connection(&settings).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteQuestionRepository::new(pool);
        for category in ["math", "history", "math", "science", "math"] {
            repo.create(new_question(category, "?")).await.unwrap();
        }

        let (math, history, science, none, math_again) = tokio::join!(
            repo.find_by_category("math"),
            repo.find_by_category("history"),
            repo.find_by_category("science"),
            repo.find_by_category("art"),
            repo.find_by_category("math"),
        );
        let math = math.unwrap();
        assert_eq!(math.len(), 3);
        assert_eq!(history.unwrap().len(), 1);
        assert_eq!(science.unwrap().len(), 1);
        assert!(none.unwrap().is_empty());
        assert_eq!(math_again.unwrap(), math);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let (repo, _) = seeded(&["math", "history", "math"]).await;
        let repo: std::sync::Arc<dyn QuestionRepository> = std::sync::Arc::new(repo);
        assert_eq!(repo.find_by_category("math").await.unwrap().len(), 2);
        assert_eq!(
            repo.categories().await.unwrap(),
            vec!["history".to_owned(), "math".to_owned()]
        );
    }
}
