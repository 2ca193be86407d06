//! Typed reads and writes over the helpdesk schema.
//!
//! Every function issues plain, non-transactional statements; uniqueness and
//! referential integrity are left to the database constraints.

use chrono::Utc;
use entity::{message, ticket, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    DbErr, EntityTrait, LoaderTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use std::collections::HashMap;

/// A user with everything they own embedded.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRelations {
    #[serde(flatten)]
    pub user: user::Model,
    pub tickets: Vec<ticket::Model>,
    pub messages: Vec<message::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageWithAuthor {
    #[serde(flatten)]
    pub message: message::Model,
    pub user: Option<user::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketWithRelations {
    #[serde(flatten)]
    pub ticket: ticket::Model,
    pub user: Option<user::Model>,
    pub messages: Vec<MessageWithAuthor>,
}

/// Optional narrowing for ticket listings; `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub status: Option<String>,
    pub user_id: Option<i32>,
}

// -------------------- USERS --------------------

pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    name: String,
    email: String,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        name: Set(name),
        email: Set(email),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<UserWithRelations>, DbErr> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;

    let tickets = users
        .load_many(
            ticket::Entity::find()
                .order_by_asc(ticket::Column::CreatedAt)
                .order_by_asc(ticket::Column::Id),
            db,
        )
        .await?;
    let messages = users
        .load_many(
            message::Entity::find()
                .order_by_asc(message::Column::CreatedAt)
                .order_by_asc(message::Column::Id),
            db,
        )
        .await?;

    Ok(users
        .into_iter()
        .zip(tickets)
        .zip(messages)
        .map(|((user, tickets), messages)| UserWithRelations {
            user,
            tickets,
            messages,
        })
        .collect())
}

pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

// -------------------- TICKETS --------------------

pub async fn list_tickets<C: ConnectionTrait>(
    db: &C,
    filter: TicketFilter,
) -> Result<Vec<TicketWithRelations>, DbErr> {
    let mut query = ticket::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(ticket::Column::Status.eq(status));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(ticket::Column::UserId.eq(user_id));
    }

    let tickets = query
        .order_by_desc(ticket::Column::CreatedAt)
        .order_by_desc(ticket::Column::Id)
        .all(db)
        .await?;

    let owners = tickets.load_one(user::Entity, db).await?;
    let messages = tickets
        .load_many(
            message::Entity::find()
                .order_by_asc(message::Column::CreatedAt)
                .order_by_asc(message::Column::Id),
            db,
        )
        .await?;

    let author_ids: Vec<i32> = messages.iter().flatten().filter_map(|m| m.user_id).collect();
    let authors = users_by_id(db, author_ids).await?;

    Ok(tickets
        .into_iter()
        .zip(owners)
        .zip(messages)
        .map(|((ticket, user), messages)| TicketWithRelations {
            ticket,
            user,
            messages: messages
                .into_iter()
                .map(|message| MessageWithAuthor {
                    user: message.user_id.and_then(|id| authors.get(&id).cloned()),
                    message,
                })
                .collect(),
        })
        .collect())
}

pub async fn create_ticket<C: ConnectionTrait>(
    db: &C,
    title: String,
    description: String,
    user_id: Option<i32>,
) -> Result<ticket::Model, DbErr> {
    ticket::ActiveModel {
        title: Set(title),
        description: Set(description),
        status: Set(ticket::DEFAULT_STATUS.to_string()),
        created_at: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_ticket<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<ticket::Model>, DbErr> {
    ticket::Entity::find_by_id(id).one(db).await
}

pub async fn find_ticket_by_title<C: ConnectionTrait>(
    db: &C,
    title: &str,
) -> Result<Option<ticket::Model>, DbErr> {
    ticket::Entity::find()
        .filter(ticket::Column::Title.eq(title))
        .one(db)
        .await
}

/// Fails with a `DbErr` when no ticket has the given id.
pub async fn update_ticket_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: String,
) -> Result<ticket::Model, DbErr> {
    ticket::ActiveModel {
        id: Unchanged(id),
        status: Set(status),
        ..Default::default()
    }
    .update(db)
    .await
}

// -------------------- MESSAGES --------------------

pub async fn create_message<C: ConnectionTrait>(
    db: &C,
    ticket_id: i32,
    content: String,
    user_id: Option<i32>,
) -> Result<message::Model, DbErr> {
    message::ActiveModel {
        content: Set(content),
        created_at: Set(Utc::now()),
        ticket_id: Set(ticket_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn list_messages<C: ConnectionTrait>(
    db: &C,
    ticket_id: i32,
) -> Result<Vec<MessageWithAuthor>, DbErr> {
    let messages = message::Entity::find()
        .filter(message::Column::TicketId.eq(ticket_id))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await?;

    let authors = messages.load_one(user::Entity, db).await?;

    Ok(messages
        .into_iter()
        .zip(authors)
        .map(|(message, user)| MessageWithAuthor { message, user })
        .collect())
}

pub async fn find_message<C: ConnectionTrait>(
    db: &C,
    ticket_id: i32,
    content: &str,
) -> Result<Option<message::Model>, DbErr> {
    message::Entity::find()
        .filter(message::Column::TicketId.eq(ticket_id))
        .filter(message::Column::Content.eq(content))
        .one(db)
        .await
}

async fn users_by_id<C: ConnectionTrait>(
    db: &C,
    mut ids: Vec<i32>,
) -> Result<HashMap<i32, user::Model>, DbErr> {
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect())
}
