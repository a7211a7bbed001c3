use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel as _, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, SelectTwoMany, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use booknet_auth_schema::{activation_tokens, roles, user_roles, users};

use crate::domain::repository::{ActivationTokenRepository, RoleRepository, UserRepository};
use crate::domain::types::{ActivationOutcome, ActivationToken, Role, User};
use crate::error::AuthServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let rows = with_roles(users::Entity::find_by_id(id))
            .all(&self.db)
            .await
            .context("find user by id")?;
        Ok(rows.into_iter().next().map(user_from_models))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let rows = with_roles(users::Entity::find().filter(users::Column::Email.eq(email)))
            .all(&self.db)
            .await
            .context("find user by email")?;
        Ok(rows.into_iter().next().map(user_from_models))
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        let user = user.clone();
        let result = self
            .db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    for role in &user.roles {
                        user_roles::ActiveModel {
                            user_id: Set(user.id),
                            role_id: Set(role.id),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(AuthServiceError::UserAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::from(e).context("create user").into()),
        }
    }
}

/// Attach roles in the order they were created, so authorities are stable.
fn with_roles(select: Select<users::Entity>) -> SelectTwoMany<users::Entity, roles::Entity> {
    select
        .find_with_related(roles::Entity)
        .order_by_asc(roles::Column::Id)
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> Result<(), DbErr> {
    users::ActiveModel {
        id: Set(user.id),
        firstname: Set(user.firstname.clone()),
        lastname: Set(user.lastname.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password.clone()),
        account_locked: Set(user.account_locked),
        enabled: Set(user.enabled),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn user_from_models((model, roles): (users::Model, Vec<roles::Model>)) -> User {
    User {
        id: model.id,
        firstname: model.firstname,
        lastname: model.lastname,
        email: model.email,
        password: model.password,
        account_locked: model.account_locked,
        enabled: model.enabled,
        roles: roles.into_iter().map(role_from_model).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError> {
        let model = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find role by name")?;
        Ok(model.map(role_from_model))
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}

// ── Activation token repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivationTokenRepository {
    pub db: DatabaseConnection,
}

impl ActivationTokenRepository for DbActivationTokenRepository {
    async fn create(&self, token: &ActivationToken) -> Result<(), AuthServiceError> {
        activation_tokens::ActiveModel {
            id: Set(token.id),
            user_id: Set(token.user_id),
            code: Set(token.code.clone()),
            created_at: Set(token.created_at),
            expired_at: Set(token.expired_at),
            validated_at: Set(token.validated_at),
        }
        .insert(&self.db)
        .await
        .context("create activation token")?;
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ActivationToken>, AuthServiceError> {
        let model = activation_tokens::Entity::find()
            .filter(activation_tokens::Column::Code.eq(code))
            .order_by_desc(activation_tokens::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find activation token by code")?;
        Ok(model.map(token_from_model))
    }

    async fn is_code_taken(&self, code: &str) -> Result<bool, AuthServiceError> {
        let count = activation_tokens::Entity::find()
            .filter(activation_tokens::Column::Code.eq(code))
            .count(&self.db)
            .await
            .context("count activation tokens by code")?;
        Ok(count > 0)
    }

    async fn activate(
        &self,
        token_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ActivationOutcome, AuthServiceError> {
        let outcome = self
            .db
            .transaction::<_, ActivationOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    let token = activation_tokens::Entity::find_by_id(token_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    let Some(token) = token else {
                        return Ok(ActivationOutcome::TokenMissing);
                    };
                    if token.validated_at.is_some() {
                        return Ok(ActivationOutcome::AlreadyActivated);
                    }

                    let Some(user) = users::Entity::find_by_id(token.user_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(ActivationOutcome::UserMissing);
                    };

                    let mut user = user.into_active_model();
                    user.enabled = Set(true);
                    user.updated_at = Set(now);
                    user.update(txn).await?;

                    let mut token = token.into_active_model();
                    token.validated_at = Set(Some(now));
                    token.update(txn).await?;

                    Ok(ActivationOutcome::Activated)
                })
            })
            .await
            .context("activate account")?;
        Ok(outcome)
    }
}

fn token_from_model(model: activation_tokens::Model) -> ActivationToken {
    ActivationToken {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        created_at: model.created_at,
        expired_at: model.expired_at,
        validated_at: model.validated_at,
    }
}
