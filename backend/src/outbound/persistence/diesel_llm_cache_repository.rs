//! PostgreSQL-backed `LlmCacheRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LlmCacheError, LlmCacheRepository};
use crate::domain::{CacheKey, CachedAnswer, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LlmCacheRow, NewLlmCacheRow};
use super::pool::{DbPool, PoolError};
use super::schema::llm_cache;

/// Diesel-backed implementation of the `LlmCacheRepository` port.
#[derive(Clone)]
pub struct DieselLlmCacheRepository {
    pool: DbPool,
}

impl DieselLlmCacheRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LlmCacheError {
    map_pool_error(error, LlmCacheError::connection)
}

fn diesel_error(error: diesel::result::Error) -> LlmCacheError {
    map_diesel_error(error, LlmCacheError::query, LlmCacheError::connection)
}

#[async_trait]
impl LlmCacheRepository for DieselLlmCacheRepository {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedAnswer>, LlmCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = llm_cache::table
            .filter(llm_cache::model_name.eq(key.model_name()))
            .filter(llm_cache::prompt_hash.eq(key.prompt_hash()))
            .filter(llm_cache::user_id.eq(key.user_id().get()))
            .select(LlmCacheRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(|row| CachedAnswer {
            response: row.response,
            expires_at: row.expiration_time,
        }))
    }

    async fn upsert(&self, key: &CacheKey, answer: &CachedAnswer) -> Result<(), LlmCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(llm_cache::table)
            .values(NewLlmCacheRow {
                model_name: key.model_name(),
                prompt: key.prompt(),
                prompt_hash: key.prompt_hash(),
                response: &answer.response,
                user_id: key.user_id().get(),
                expiration_time: answer.expires_at,
            })
            .on_conflict((
                llm_cache::model_name,
                llm_cache::prompt_hash,
                llm_cache::user_id,
            ))
            .do_update()
            .set((
                llm_cache::prompt.eq(excluded(llm_cache::prompt)),
                llm_cache::response.eq(excluded(llm_cache::response)),
                llm_cache::expiration_time.eq(excluded(llm_cache::expiration_time)),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn invalidate_user(&self, user_id: UserId) -> Result<usize, LlmCacheError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(llm_cache::table.filter(llm_cache::user_id.eq(user_id.get())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)
    }
}
