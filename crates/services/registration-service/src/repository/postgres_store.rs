//! PostgreSQL account store backed by SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set, SqlErr, Statement, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    user::{self, ActiveModel, Entity as UserEntity},
    user_role::{self, Entity as UserRoleEntity},
};
use super::user_store::{StoreError, UserStore};
use domain::{
    EmailAddress, NewUserAccount, PasswordHash, Role, RoleSet, UserAccount, INITIAL_VERSION,
};

/// Concrete implementation of UserStore on a relational database
pub struct PostgresUserStore {
    db: DatabaseConnection,
}

impl PostgresUserStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate a database error, singling out unique constraint violations.
pub(crate) fn map_db_err(err: DbErr) -> StoreError {
    classify(err.sql_err(), || err.to_string())
}

/// Store error for a classified SQL failure; `detail` renders the raw error.
fn classify(sql_err: Option<SqlErr>, detail: impl FnOnce() -> String) -> StoreError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::UniqueViolation,
        _ => StoreError::Unavailable(detail()),
    }
}

/// Convert database rows to a domain account
fn to_account(model: user::Model, role_rows: Vec<user_role::Model>) -> UserAccount {
    let roles: RoleSet = role_rows
        .iter()
        .filter_map(|row| {
            let role = Role::parse(&row.role);
            if role.is_none() {
                tracing::warn!(user_id = %model.id, role = %row.role, "Ignoring unknown stored role");
            }
            role
        })
        .collect();

    UserAccount {
        id: model.id,
        version: model.version,
        email: EmailAddress::from_normalized(model.email),
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: PasswordHash::from_hash(model.password_hash),
        roles,
        validated: model.validated,
        disabled: model.disabled,
        created_at: model.created_at,
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserAccount>, StoreError> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .find_with_related(UserRoleEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found
            .into_iter()
            .next()
            .map(|(model, roles)| to_account(model, roles)))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, StoreError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn save(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Dropping the transaction before commit rolls it back
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = ActiveModel {
            id: Set(id),
            version: Set(INITIAL_VERSION),
            email: Set(account.email.as_str().to_string()),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            password_hash: Set(account.password_hash.as_str().to_string()),
            validated: Set(account.validated),
            disabled: Set(account.disabled),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let role_rows: Vec<user_role::ActiveModel> = account
            .roles
            .iter()
            .map(|role| user_role::ActiveModel {
                user_id: Set(id),
                role: Set(role.as_str().to_string()),
            })
            .collect();

        if !role_rows.is_empty() {
            UserRoleEntity::insert_many(role_rows)
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;

        Ok(account.into_account(model.id, model.created_at))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_model() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            version: 3,
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            validated: true,
            disabled: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_non_constraint_errors_are_unavailable() {
        let err = map_db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, StoreError::Unavailable(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn test_unique_constraint_is_unique_violation() {
        let err = classify(
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"idx_users_email_unique\""
                    .to_string(),
            )),
            || "insert failed".to_string(),
        );
        assert_eq!(err, StoreError::UniqueViolation);
    }

    #[test]
    fn test_other_constraints_are_unavailable() {
        let err = classify(
            Some(SqlErr::ForeignKeyConstraintViolation("fk_user_roles_user_id".to_string())),
            || "insert failed".to_string(),
        );
        assert_eq!(err, StoreError::Unavailable("insert failed".to_string()));
    }

    #[test]
    fn test_to_account_maps_rows() {
        let model = user_model();
        let id = model.id;
        let roles = vec![
            user_role::Model {
                user_id: id,
                role: "USER".to_string(),
            },
            user_role::Model {
                user_id: id,
                role: "SUPERUSER".to_string(),
            },
        ];

        let account = to_account(model, roles);

        assert_eq!(account.id, id);
        assert_eq!(account.version, 3);
        assert_eq!(account.email.as_str(), "jane@example.com");
        assert_eq!(account.roles, RoleSet::from([Role::User]));
        assert!(account.validated);
    }
}
