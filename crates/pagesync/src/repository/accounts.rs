//! Account and page lookups.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::prelude::{Account, Page};
use crate::entity::{account, page};

use super::errors::Result;

/// Resolved sync context for one account: the credential plus the
/// remote/local page mapping. Loaded once per run, read-only afterwards.
#[derive(Debug, Clone)]
pub struct AccountContext {
    pub account_id: Uuid,
    pub access_token: String,
    pub page_id: Uuid,
    pub remote_page_id: String,
}

/// Resolve the sync context for an account.
///
/// Returns `None` when either the account or its page mapping is missing;
/// the caller decides whether that is fatal.
pub async fn find_account_context(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> Result<Option<AccountContext>> {
    let Some(account) = Account::find_by_id(account_id).one(db).await? else {
        return Ok(None);
    };

    let Some(page) = Page::find()
        .filter(page::Column::AccountId.eq(account_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(AccountContext {
        account_id: account.id,
        access_token: account.access_token,
        page_id: page.id,
        remote_page_id: page.remote_page_id,
    }))
}

/// Register a new account with its access credential.
pub async fn insert_account(db: &DatabaseConnection, access_token: &str) -> Result<account::Model> {
    let model = account::ActiveModel {
        id: Set(Uuid::new_v4()),
        access_token: Set(access_token.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    };
    Ok(model.insert(db).await?)
}

/// Register a page mapping under an account.
pub async fn insert_page(
    db: &DatabaseConnection,
    account_id: Uuid,
    remote_page_id: &str,
) -> Result<page::Model> {
    let model = page::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(account_id),
        remote_page_id: Set(remote_page_id.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    };
    Ok(model.insert(db).await?)
}

/// List all accounts with their page mappings.
pub async fn list_accounts(
    db: &DatabaseConnection,
) -> Result<Vec<(account::Model, Option<page::Model>)>> {
    Ok(Account::find().find_also_related(Page).all(db).await?)
}
